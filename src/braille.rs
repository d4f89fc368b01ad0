use crate::color::Rgb;
use crate::particle::{Bounds, Particle};
use ratatui::style::Color;

/// Braille character rendering for high-resolution terminal graphics.
/// Each Braille character represents a 2x4 grid of dots (8 dots total).
///
/// Dot positions and their bit values:
/// ```text
/// (0,0)=0x01  (1,0)=0x08
/// (0,1)=0x02  (1,1)=0x10
/// (0,2)=0x04  (1,2)=0x20
/// (0,3)=0x40  (1,3)=0x80
/// ```
///
/// Unicode Braille patterns: U+2800 to U+28FF (256 patterns)
const BRAILLE_BASE: u32 = 0x2800;

/// Dot position to bit mapping for Braille characters
const BRAILLE_DOTS: [[u8; 4]; 2] = [
    [0x01, 0x02, 0x04, 0x40], // Left column (x=0): rows 0,1,2,3
    [0x08, 0x10, 0x20, 0x80], // Right column (x=1): rows 0,1,2,3
];

/// A single rendered Braille cell with position and color
#[derive(Clone, Copy, Debug)]
pub struct BrailleCell {
    pub x: u16,
    pub y: u16,
    pub char: char,
    pub color: Color,
}

/// Dot raster the particles are painted into before packing into cells
struct DotGrid {
    width: usize,
    height: usize,
    dots: Vec<Option<Rgb>>,
}

impl DotGrid {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            dots: vec![None; width * height],
        }
    }

    fn get(&self, x: usize, y: usize) -> Option<Rgb> {
        if x < self.width && y < self.height {
            self.dots[y * self.width + x]
        } else {
            None
        }
    }

    /// Paint a filled disc; later particles cover earlier ones
    fn fill_disc(&mut self, cx: f64, cy: f64, r: f64, color: Rgb) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let x0 = (cx - r).floor().max(0.0) as usize;
        let y0 = (cy - r).floor().max(0.0) as usize;
        let x1 = ((cx + r).ceil() as usize).min(self.width - 1);
        let y1 = ((cy + r).ceil() as usize).min(self.height - 1);
        let r_sq = r * r;
        let mut painted = false;

        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f64 + 0.5 - cx;
                let dy = y as f64 + 0.5 - cy;
                if dx * dx + dy * dy <= r_sq {
                    self.dots[y * self.width + x] = Some(color);
                    painted = true;
                }
            }
        }

        // Sub-dot particles still show up as a single dot
        if !painted {
            let x = (cx.max(0.0) as usize).min(self.width - 1);
            let y = (cy.max(0.0) as usize).min(self.height - 1);
            self.dots[y * self.width + x] = Some(color);
        }
    }
}

/// Dots per container unit so the whole container fits the canvas
fn dot_scale(canvas_width: u16, canvas_height: u16, bounds: Bounds) -> f64 {
    if bounds.width == 0 || bounds.height == 0 {
        return 0.0;
    }
    let sx = (canvas_width as f64 * 2.0) / bounds.width as f64;
    let sy = (canvas_height as f64 * 4.0) / bounds.height as f64;
    sx.min(sy)
}

/// Largest canvas (in cells) inside the available area that keeps the
/// container's aspect ratio
pub fn fit_canvas(available_width: u16, available_height: u16, bounds: Bounds) -> (u16, u16) {
    let scale = dot_scale(available_width, available_height, bounds);
    let width = ((bounds.width as f64 * scale) / 2.0).ceil() as u16;
    let height = ((bounds.height as f64 * scale) / 4.0).ceil() as u16;
    (width.min(available_width), height.min(available_height))
}

/// Render particles to Braille characters, each cell colored after the
/// topmost particle covering it
pub fn render_to_braille(
    particles: &[Particle],
    bounds: Bounds,
    canvas_width: u16,
    canvas_height: u16,
    brighten: u8,
) -> Vec<BrailleCell> {
    // Braille effective resolution
    let braille_width = canvas_width as usize * 2;
    let braille_height = canvas_height as usize * 4;
    let scale = dot_scale(canvas_width, canvas_height, bounds);

    let mut grid = DotGrid::new(braille_width, braille_height);
    for particle in particles {
        grid.fill_disc(
            particle.x * scale,
            particle.y * scale,
            particle.radius * scale,
            particle.color,
        );
    }

    let mut cells = Vec::new();

    for cy in 0..canvas_height {
        for cx in 0..canvas_width {
            let mut pattern: u8 = 0;
            let mut color = None;

            // Sample the 2x4 dots for this Braille character
            let base_bx = cx as usize * 2;
            let base_by = cy as usize * 4;

            for dx in 0..2 {
                for dy in 0..4 {
                    if let Some(dot) = grid.get(base_bx + dx, base_by + dy) {
                        pattern |= BRAILLE_DOTS[dx][dy];
                        color = Some(dot);
                    }
                }
            }

            // Only emit cells that have at least one dot
            if let Some(color) = color {
                let braille_char = char::from_u32(BRAILLE_BASE + pattern as u32).unwrap_or(' ');
                cells.push(BrailleCell {
                    x: cx,
                    y: cy,
                    char: braille_char,
                    color: color.brightened(brighten).into(),
                });
            }
        }
    }

    cells
}
