use crate::clock::TickClock;
use crate::control::ControlCommand;
use crate::simulation::CollisionSimulation;
use std::time::Instant;

/// How much the tick interval changes per key press (milliseconds)
const INTERVAL_STEP_MS: i64 = 10;

/// Added to each color channel so dark particles read on a black terminal
const DEFAULT_BRIGHTEN: u8 = 96;

/// Focus state for parameter editing in the sidebar
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Focus {
    Interval,
    Radius,
    RadiusStep,
    // Controls box (not a param)
    Controls,
}

impl Focus {
    /// Tab cycles through parameters
    pub fn next(&self) -> Focus {
        match self {
            Focus::Controls => Focus::Interval,
            Focus::Interval => Focus::Radius,
            Focus::Radius => Focus::RadiusStep,
            Focus::RadiusStep => Focus::Interval,
        }
    }

    /// Shift+Tab cycles in reverse
    pub fn prev(&self) -> Focus {
        match self {
            Focus::Controls | Focus::Interval => Focus::RadiusStep,
            Focus::Radius => Focus::Interval,
            Focus::RadiusStep => Focus::Radius,
        }
    }

    /// Check if focus is on a parameter (not the controls box)
    pub fn is_param(&self) -> bool {
        !matches!(self, Focus::Controls)
    }
}

/// Main application state
pub struct App {
    pub simulation: CollisionSimulation,
    pub clock: TickClock,
    pub focus: Focus,
    pub fullscreen_mode: bool,
    pub show_help: bool,
    pub help_scroll: u16,
    pub controls_scroll: u16,
    pub brighten: u8,
    pub last_command: Option<ControlCommand>,
}

impl App {
    pub fn new(simulation: CollisionSimulation, now: Instant) -> Self {
        let clock = TickClock::new(simulation.settings.tick_interval(), now);
        Self {
            simulation,
            clock,
            focus: Focus::Controls,
            fullscreen_mode: false,
            show_help: false,
            help_scroll: 0,
            controls_scroll: 0,
            brighten: DEFAULT_BRIGHTEN,
            last_command: None,
        }
    }

    /// Run one simulation tick if the clock says one is due
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.clock.poll(now) {
            self.simulation.tick();
            true
        } else {
            false
        }
    }

    /// Apply a control command between ticks
    pub fn apply(&mut self, command: ControlCommand) {
        command.apply(&mut self.simulation);
        self.last_command = Some(command);
    }

    /// Handle adjusting the currently focused parameter
    pub fn adjust_focused_up(&mut self, now: Instant) {
        match self.focus {
            Focus::Controls => {}
            Focus::Interval => self.adjust_interval(INTERVAL_STEP_MS, now),
            Focus::Radius => self.apply(ControlCommand::GrowRadius),
            Focus::RadiusStep => self.simulation.settings.adjust_radius_step(1),
        }
    }

    /// Handle adjusting the currently focused parameter
    pub fn adjust_focused_down(&mut self, now: Instant) {
        match self.focus {
            Focus::Controls => {}
            Focus::Interval => self.adjust_interval(-INTERVAL_STEP_MS, now),
            Focus::Radius => self.apply(ControlCommand::ShrinkRadius),
            Focus::RadiusStep => self.simulation.settings.adjust_radius_step(-1),
        }
    }

    /// Change the tick interval and reschedule the clock
    pub fn adjust_interval(&mut self, delta_ms: i64, now: Instant) {
        self.simulation.settings.adjust_tick_interval(delta_ms);
        self.clock
            .set_interval(self.simulation.settings.tick_interval(), now);
        log::debug!("Tick interval now {} ms", self.simulation.settings.tick_interval_ms);
    }

    /// Cycle to next focus
    pub fn next_focus(&mut self) {
        self.focus = self.focus.next();
    }

    /// Navigate to previous parameter (Shift+Tab)
    pub fn prev_focus(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Fresh population from the same settings
    pub fn reset(&mut self) {
        self.simulation.reset();
        self.last_command = None;
    }

    /// Toggle fullscreen mode
    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen_mode = !self.fullscreen_mode;
    }

    /// Switch between raw dark colors and brightened ones
    pub fn toggle_brighten(&mut self) {
        self.brighten = if self.brighten == 0 { DEFAULT_BRIGHTEN } else { 0 };
    }

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
        if self.show_help {
            self.help_scroll = 0; // Reset scroll when opening
        }
    }

    /// Scroll help content up
    pub fn scroll_help_up(&mut self) {
        self.help_scroll = self.help_scroll.saturating_sub(1);
    }

    /// Scroll help content down
    pub fn scroll_help_down(&mut self, max_scroll: u16) {
        self.help_scroll = (self.help_scroll + 1).min(max_scroll);
    }

    /// Scroll controls box up
    pub fn scroll_controls_up(&mut self) {
        self.controls_scroll = self.controls_scroll.saturating_sub(1);
    }

    /// Scroll controls box down
    pub fn scroll_controls_down(&mut self, max_scroll: u16) {
        self.controls_scroll = (self.controls_scroll + 1).min(max_scroll);
    }
}
