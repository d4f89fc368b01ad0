use crate::rng::RngPolicy;
use crate::simulation::CollisionSimulation;
use crossterm::event::MouseButton;

/// A user request that mutates the whole population at once.
///
/// Commands are applied between ticks by the loop that drives the
/// simulation, so a tick never sees one half-applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    ShrinkRadius,
    GrowRadius,
    ToggleRun,
}

impl ControlCommand {
    /// Left click shrinks, right click grows, anything else toggles run state
    pub fn from_mouse(button: MouseButton) -> Self {
        match button {
            MouseButton::Left => ControlCommand::ShrinkRadius,
            MouseButton::Right => ControlCommand::GrowRadius,
            MouseButton::Middle => ControlCommand::ToggleRun,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ControlCommand::ShrinkRadius => "shrink",
            ControlCommand::GrowRadius => "grow",
            ControlCommand::ToggleRun => "pause/resume",
        }
    }

    /// Returns whether the simulation changed
    pub fn apply<R: RngPolicy>(self, simulation: &mut CollisionSimulation<R>) -> bool {
        match self {
            ControlCommand::ShrinkRadius => simulation.shrink_radius(),
            ControlCommand::GrowRadius => simulation.grow_radius(),
            ControlCommand::ToggleRun => {
                simulation.toggle_run_state();
                true
            }
        }
    }
}
