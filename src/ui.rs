use crate::app::{App, Focus};
use crate::braille;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const SIDEBAR_WIDTH: u16 = 24;

/// Max scroll for help content (generous to account for text wrapping on small screens)
pub const HELP_CONTENT_LINES: u16 = 40;

/// Number of lines in controls content
pub const CONTROLS_CONTENT_LINES: u16 = 12;

// UI color scheme
const BORDER_COLOR: Color = Color::Cyan;
const HIGHLIGHT_COLOR: Color = Color::Yellow;
const TEXT_COLOR: Color = Color::White;
const DIM_TEXT_COLOR: Color = Color::Gray;

/// Creates a standard styled block with rounded borders
fn styled_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_COLOR))
        .title(title)
}

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if app.fullscreen_mode {
        render_canvas(frame, area, app);
    } else {
        let layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
            .split(area);

        render_sidebar(frame, layout[0], app);
        render_canvas(frame, layout[1], app);
    }

    if app.show_help {
        render_help_overlay(frame, area, app);
    }
}

/// Number of visible lines in the controls box for a terminal height
pub fn get_controls_visible_lines(terminal_height: u16) -> u16 {
    // Status (6) + parameters (7) + borders (2)
    terminal_height.saturating_sub(6 + 7 + 2)
}

fn render_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Status
            Constraint::Length(7), // Parameters
            Constraint::Min(6),    // Controls
        ])
        .split(area);

    render_status_box(frame, sections[0], app);
    render_params_box(frame, sections[1], app);
    render_controls_box(frame, sections[2], app);
}

fn render_status_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" Collision Sim ");
    let sim = &app.simulation;

    let status_color = if sim.is_paused() {
        HIGHLIGHT_COLOR
    } else {
        Color::Green
    };

    let last_command = app
        .last_command
        .map(|c| c.name().to_string())
        .unwrap_or_else(|| "-".to_string());

    let content = vec![
        Line::from(Span::styled(
            format!("Tick {}", sim.ticks),
            Style::default().fg(TEXT_COLOR),
        )),
        Line::from(Span::styled(
            format!("Hits {} (avg {:.1})", sim.last_report.collisions, sim.mean_collisions()),
            Style::default().fg(TEXT_COLOR),
        )),
        Line::from(Span::styled(
            sim.run_state().name().to_string(),
            Style::default().fg(status_color),
        )),
        Line::from(Span::styled(
            format!("Last: {}", last_command),
            Style::default().fg(DIM_TEXT_COLOR),
        )),
    ];

    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
}

fn render_params_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" Parameters ");

    let make_line = |label: &str, value: String, focused: bool| {
        let prefix = if focused { "> " } else { "  " };
        let style = if focused {
            Style::default().fg(HIGHLIGHT_COLOR)
        } else {
            Style::default().fg(TEXT_COLOR)
        };
        Line::from(Span::styled(format!("{}{}: {}", prefix, label, value), style))
    };

    let sim = &app.simulation;
    let settings = &sim.settings;

    let content = vec![
        make_line(
            "Interval",
            format!("{} ms", settings.tick_interval_ms),
            app.focus == Focus::Interval,
        ),
        make_line(
            "Radius",
            format!("{} [{}-{}]", sim.radius(), settings.min_radius, settings.max_radius),
            app.focus == Focus::Radius,
        ),
        make_line(
            "Step",
            format!("{}", settings.radius_step),
            app.focus == Focus::RadiusStep,
        ),
        Line::from(Span::styled(
            format!("  Particles: {}", sim.len()),
            Style::default().fg(DIM_TEXT_COLOR),
        )),
        Line::from(Span::styled(
            format!("  Box: {}x{}", sim.bounds().width, sim.bounds().height),
            Style::default().fg(DIM_TEXT_COLOR),
        )),
    ];

    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
}

fn render_controls_box(frame: &mut Frame, area: Rect, app: &App) {
    let key_style = Style::default().fg(HIGHLIGHT_COLOR);
    let desc_style = Style::default().fg(DIM_TEXT_COLOR);

    // Helper to create a control line
    let make_control = |key: &str, desc: &str| -> Line<'static> {
        Line::from(vec![
            Span::styled(format!("{:>5}", key), key_style),
            Span::styled(format!(" {}", desc), desc_style),
        ])
    };

    let content = vec![
        make_control("LMB", "shrink radius"),
        make_control("RMB", "grow radius"),
        make_control("MMB", "pause/resume"),
        make_control("Space", "pause/resume"),
        make_control("-/+", "radius"),
        make_control("[/]", "tick interval"),
        make_control("Tab", "select param"),
        make_control("R", "new population"),
        make_control("B", "brighten colors"),
        make_control("V", "fullscreen"),
        make_control("H", "help"),
        make_control("Q", "quit"),
    ];

    let content_height = content.len() as u16;
    let visible_height = area.height.saturating_sub(2); // minus borders
    let max_scroll = content_height.saturating_sub(visible_height);
    let is_scrollable = max_scroll > 0;

    let title = if is_scrollable {
        " Controls (↑↓) "
    } else {
        " Controls "
    };

    let block = styled_block(title);

    let paragraph = Paragraph::new(content)
        .block(block)
        .scroll((app.controls_scroll, 0));
    frame.render_widget(paragraph, area);
}

fn render_canvas(frame: &mut Frame, area: Rect, app: &App) {
    let sim = &app.simulation;
    let bounds = sim.bounds();

    // Shrink the frame to the container's aspect ratio, centered
    let inner_avail = styled_block("").inner(area);
    let (width, height) = braille::fit_canvas(inner_avail.width, inner_avail.height, bounds);
    let canvas = Rect {
        x: inner_avail.x + (inner_avail.width - width) / 2,
        y: inner_avail.y + (inner_avail.height - height) / 2,
        width,
        height,
    };
    let outer = Rect {
        x: canvas.x.saturating_sub(1),
        y: canvas.y.saturating_sub(1),
        width: width + 2,
        height: height + 2,
    };

    let block = styled_block("");
    frame.render_widget(block, outer);

    let cells = braille::render_to_braille(sim.particles(), bounds, width, height, app.brighten);

    let buf = frame.buffer_mut();
    for cell in cells {
        let x = canvas.x + cell.x;
        let y = canvas.y + cell.y;
        if let Some(target) = buf.cell_mut((x, y)) {
            target.set_char(cell.char).set_fg(cell.color);
        }
    }
}

fn render_help_overlay(frame: &mut Frame, area: Rect, app: &App) {
    // Calculate the canvas area (exclude sidebar unless fullscreen)
    let canvas_x = if app.fullscreen_mode { 0 } else { SIDEBAR_WIDTH };
    let canvas_width = if app.fullscreen_mode {
        area.width
    } else {
        area.width.saturating_sub(SIDEBAR_WIDTH)
    };

    // Center the help dialog within the canvas
    let help_width = 56.min(canvas_width.saturating_sub(4));
    let help_height = area.height.saturating_sub(4).min(30);
    let x = canvas_x + (canvas_width.saturating_sub(help_width)) / 2;
    let y = (area.height.saturating_sub(help_height)) / 2;

    let help_area = Rect {
        x: area.x + x,
        y: area.y + y,
        width: help_width,
        height: help_height,
    };

    // Clear the background
    frame.render_widget(Clear, help_area);

    let content = vec![
        Line::from(""),
        Line::from(Span::styled("COLLISION SIMULATOR", Style::default().fg(BORDER_COLOR))),
        Line::from(""),
        Line::from("Particles travel in straight lines and bounce off the walls. Whenever the bounding squares of two particles overlap, both pick a new random heading."),
        Line::from(""),
        Line::from(Span::styled("MOUSE:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("Left click shrinks every particle, right click grows them, middle click pauses or resumes."),
        Line::from(""),
        Line::from(Span::styled("PARAMETERS:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from(Span::styled("Interval", Style::default().fg(TEXT_COLOR))),
        Line::from("Milliseconds between ticks ([ and ] or Tab + arrows)"),
        Line::from(Span::styled("Radius", Style::default().fg(TEXT_COLOR))),
        Line::from("Shared radius, kept within its min/max bounds"),
        Line::from(Span::styled("Step", Style::default().fg(TEXT_COLOR))),
        Line::from("How much one grow/shrink changes the radius"),
        Line::from(""),
        Line::from(Span::styled("BASIC CONTROLS:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("Space=Pause, -/+=Radius, R=New population, B=Brighten, V=Fullscreen, Q=Quit"),
        Line::from(""),
    ];

    let content_height = content.len() as u16;
    let visible_height = help_height.saturating_sub(2); // minus borders
    let max_scroll = content_height.saturating_sub(visible_height);
    let is_scrollable = max_scroll > 0;

    // Update title to show scroll hint if scrollable
    let title = if is_scrollable {
        " Help (J/K scroll, H to close) "
    } else {
        " Help (H to close) "
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(HIGHLIGHT_COLOR))
        .title(title);

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((app.help_scroll, 0));

    frame.render_widget(paragraph, help_area);
}
