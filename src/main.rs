mod app;
mod braille;
mod clock;
mod color;
mod config;
mod control;
mod error;
mod particle;
mod presets;
mod rng;
mod settings;
mod simulation;
mod ui;

use app::{App, Focus};
use clap::Parser;
use config::AppConfig;
use control::ControlCommand;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind,
        KeyModifiers, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use error::SimError;
use presets::{Preset, PresetManager};
use ratatui::{backend::CrosstermBackend, Terminal};
use settings::SimulationSettings;
use simulation::CollisionSimulation;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "collision-simulator")]
#[command(about = "Particles bouncing and meandering inside a box, in the terminal")]
struct Args {
    // === Container ===
    /// Container width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Container height in pixels
    #[arg(long)]
    height: Option<u32>,

    // === Population ===
    /// Number of particles
    #[arg(short = 'p', long)]
    particles: Option<usize>,

    /// Initial particle radius
    #[arg(short = 'r', long)]
    radius: Option<u32>,

    /// Distance traveled per tick
    #[arg(long)]
    speed: Option<u32>,

    /// Milliseconds between ticks
    #[arg(short = 'i', long)]
    interval: Option<u64>,

    /// Smallest radius the shrink command allows
    #[arg(long = "min-radius")]
    min_radius: Option<u32>,

    /// Largest radius the grow command allows
    #[arg(long = "max-radius")]
    max_radius: Option<u32>,

    /// Radius change per grow/shrink command
    #[arg(long = "radius-step")]
    radius_step: Option<u32>,

    /// RNG seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    // === Configuration files ===
    /// Load settings from a JSON config file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Write the resolved settings to a JSON config file
    #[arg(long = "export-config")]
    export_config: Option<PathBuf>,

    /// Start from a named preset (see --list-presets)
    #[arg(long)]
    preset: Option<String>,

    /// List available presets and exit
    #[arg(long = "list-presets", default_value = "false")]
    list_presets: bool,

    /// Save the resolved settings as a user preset with this name
    #[arg(long = "save-preset")]
    save_preset: Option<String>,

    // === Headless ===
    /// Run without the terminal UI and print a summary
    #[arg(long, default_value = "false")]
    headless: bool,

    /// Number of ticks to run in headless mode
    #[arg(long, default_value = "200")]
    ticks: u64,

    /// Write log output to this file instead of stderr
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

/// Layer settings: defaults, then preset, then config file, then flags
fn resolve_settings(args: &Args, presets: &PresetManager) -> Result<SimulationSettings, SimError> {
    let mut settings = match &args.preset {
        Some(name) => presets
            .find(name)
            .map(|p| p.settings.clone())
            .ok_or_else(|| SimError::Preset(format!("unknown preset '{}'", name)))?,
        None => SimulationSettings::default(),
    };

    if let Some(path) = &args.config {
        settings = AppConfig::load_from_file(path)?.settings;
    }

    if let Some(v) = args.width {
        settings.width = v;
    }
    if let Some(v) = args.height {
        settings.height = v;
    }
    if let Some(v) = args.particles {
        settings.particle_count = v;
    }
    if let Some(v) = args.radius {
        settings.initial_radius = v;
    }
    if let Some(v) = args.speed {
        settings.speed = v;
    }
    if let Some(v) = args.interval {
        settings.tick_interval_ms = v;
    }
    if let Some(v) = args.min_radius {
        settings.min_radius = v;
    }
    if let Some(v) = args.max_radius {
        settings.max_radius = v;
    }
    if let Some(v) = args.radius_step {
        settings.radius_step = v;
    }
    if args.seed.is_some() {
        settings.seed = args.seed;
    }

    settings.validate()?;
    Ok(settings)
}

fn init_logging(log_file: Option<&Path>) -> io::Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(path) = log_file {
        let file = File::create(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let mut presets = PresetManager::new();
    if args.list_presets {
        for preset in presets.all_presets() {
            println!("{:<14} {}", preset.name, preset.description);
        }
        return Ok(());
    }

    let settings = resolve_settings(&args, &presets)?;

    if let Some(path) = &args.export_config {
        AppConfig::new(settings.clone()).save_to_file(path)?;
    }
    if let Some(name) = &args.save_preset {
        let preset = Preset::new(name.as_str(), "Saved from the command line", settings.clone());
        let path = presets.save_preset(preset)?;
        println!("Saved preset '{}' to {}", name, path.display());
    }

    let simulation = CollisionSimulation::new(settings)?;

    if args.headless {
        run_headless(simulation, args.ticks);
        return Ok(());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(simulation, Instant::now());

    // Run the app
    let res = run_app(&mut terminal, &mut app);

    // Cleanup
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

/// Tick back to back without a UI and report collision statistics
fn run_headless(mut simulation: CollisionSimulation, ticks: u64) {
    let started = Instant::now();
    for _ in 0..ticks {
        simulation.tick();
    }
    let elapsed = started.elapsed();

    log::info!("Headless run finished in {:?}", elapsed);
    println!("particles:        {}", simulation.len());
    println!("ticks:            {}", simulation.ticks);
    println!("overlapping pairs: {}", simulation.total_collisions);
    println!("mean per tick:    {:.2}", simulation.mean_collisions());
    println!(
        "time per tick:    {:.3} ms",
        elapsed.as_secs_f64() * 1000.0 / ticks.max(1) as f64
    );
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        // Render current state
        terminal.draw(|frame| ui::render(frame, app))?;

        // Wait for input until the next tick is due
        let timeout = app.clock.time_until_due(Instant::now());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Mouse(mouse) => {
                    if let MouseEventKind::Down(button) = mouse.kind {
                        app.apply(ControlCommand::from_mouse(button));
                    }
                }
                Event::Key(key) => {
                    // Only process Press events
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }

                    // Handle Ctrl+C
                    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                        return Ok(());
                    }

                    let now = Instant::now();
                    match key.code {
                        // System controls
                        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
                        KeyCode::Char(' ') => app.apply(ControlCommand::ToggleRun),
                        KeyCode::Char('-') | KeyCode::Char('_') => {
                            app.apply(ControlCommand::ShrinkRadius);
                            app.focus = Focus::Radius;
                        }
                        KeyCode::Char('+') | KeyCode::Char('=') => {
                            app.apply(ControlCommand::GrowRadius);
                            app.focus = Focus::Radius;
                        }
                        KeyCode::Char('[') => {
                            app.adjust_interval(-10, now);
                            app.focus = Focus::Interval;
                        }
                        KeyCode::Char(']') => {
                            app.adjust_interval(10, now);
                            app.focus = Focus::Interval;
                        }
                        KeyCode::Char('r') | KeyCode::Char('R') => app.reset(),
                        KeyCode::Char('b') | KeyCode::Char('B') => app.toggle_brighten(),
                        KeyCode::Char('v') | KeyCode::Char('V') => app.toggle_fullscreen(),
                        KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => {
                            app.toggle_help()
                        }

                        // Navigation
                        KeyCode::Tab => app.next_focus(),
                        KeyCode::BackTab => app.prev_focus(),
                        KeyCode::Up => {
                            if !app.show_help {
                                if app.focus.is_param() {
                                    app.adjust_focused_up(now);
                                } else {
                                    app.scroll_controls_up();
                                }
                            }
                        }
                        KeyCode::Down => {
                            if !app.show_help {
                                if app.focus.is_param() {
                                    app.adjust_focused_down(now);
                                } else {
                                    let term_size = terminal.size().unwrap_or_default();
                                    let visible = ui::get_controls_visible_lines(term_size.height);
                                    app.scroll_controls_down(ui::CONTROLS_CONTENT_LINES.saturating_sub(visible));
                                }
                            }
                        }
                        KeyCode::Esc => {
                            if app.show_help {
                                app.toggle_help();
                            } else if app.focus.is_param() {
                                app.focus = Focus::Controls;
                            }
                        }
                        KeyCode::Char('j') | KeyCode::Char('J') => {
                            if app.show_help {
                                app.scroll_help_down(ui::HELP_CONTENT_LINES);
                            }
                        }
                        KeyCode::Char('k') | KeyCode::Char('K') => {
                            if app.show_help {
                                app.scroll_help_up();
                            }
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
        }

        // Run simulation tick
        app.tick(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn parse(args: &[&str]) -> Args {
        Args::parse_from(std::iter::once("collision-simulator").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults_without_flags() {
        let settings = resolve_settings(&parse(&[]), &PresetManager::builtin_only()).unwrap();
        assert_eq!(settings, SimulationSettings::default());
    }

    #[test]
    fn test_flags_override_preset() {
        let args = parse(&["--preset", "giants", "-p", "10", "--seed", "3"]);
        let settings = resolve_settings(&args, &PresetManager::builtin_only()).unwrap();
        assert_eq!(settings.initial_radius, 30);
        assert_eq!(settings.particle_count, 10);
        assert_eq!(settings.seed, Some(3));
    }

    #[test]
    fn test_config_file_overrides_preset() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "version": 1, "settings": {{ "speed": 3 }} }}"#).unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let args = parse(&["--preset", "slow motion", "--config", &path, "-i", "70"]);
        let settings = resolve_settings(&args, &PresetManager::builtin_only()).unwrap();
        // Config replaces the preset wholesale; flags still win
        assert_eq!(settings.speed, 3);
        assert_eq!(settings.tick_interval_ms, 70);
    }

    #[test]
    fn test_unknown_preset_rejected() {
        let args = parse(&["--preset", "nope"]);
        let result = resolve_settings(&args, &PresetManager::builtin_only());
        assert!(matches!(result, Err(SimError::Preset(_))));
    }

    #[test]
    fn test_degenerate_flags_rejected() {
        let args = parse(&["--width", "50", "--radius", "8"]);
        let result = resolve_settings(&args, &PresetManager::builtin_only());
        assert!(matches!(result, Err(SimError::InvalidSettings(_))));
    }
}
