//! Read-only rendering sink.

use std::io::Write;

use tracing::warn;

use crate::boundary::BoundaryType;
use crate::geometry::{Cell, Direction};
use crate::grid::Grid;

/// Snapshot handed to a renderer once per tick and once after the episode ends.
#[derive(Clone, Copy, Debug)]
pub struct Frame<'a> {
    pub grid: &'a Grid,
    pub boundary: BoundaryType,
    /// Live segments, head first.
    pub segments: &'a [Cell],
    pub direction: Direction,
    pub length: usize,
    pub apple: Cell,
    pub score: u64,
    pub loss: Option<f64>,
}

pub trait Renderer {
    fn render(&mut self, frame: &Frame<'_>);
}

/// Draws the board as text lines: box border for a hard boundary, dotted
/// border for a periodic one.
pub fn render_lines(frame: &Frame<'_>) -> Vec<String> {
    let grid = frame.grid;
    let step = grid.step_size();
    let (horizontal, vertical, corners) = match frame.boundary {
        BoundaryType::HardBoundary => ('═', '║', ['╔', '╗', '╚', '╝']),
        BoundaryType::PeriodicBoundary => ('┄', '┆', ['┌', '┐', '└', '┘']),
    };
    let border = |left: char, right: char| {
        let mut line = String::with_capacity(grid.columns() + 2);
        line.push(left);
        line.extend(std::iter::repeat_n(horizontal, grid.columns()));
        line.push(right);
        line
    };

    let mut lines = Vec::with_capacity(grid.rows() + 3);
    lines.push(border(corners[0], corners[1]));
    for row in 0..grid.rows() {
        let mut line = String::with_capacity(grid.columns() + 2);
        line.push(vertical);
        for col in 0..grid.columns() {
            let cell = Cell::new(col as i32 * step, row as i32 * step);
            let glyph = if frame.segments.first() == Some(&cell) {
                match frame.direction {
                    Direction::Up => '▲',
                    Direction::Down => '▼',
                    Direction::Left => '◄',
                    Direction::Right => '►',
                }
            } else if frame.segments.contains(&cell) {
                'o'
            } else if frame.apple == cell {
                '●'
            } else {
                '·'
            };
            line.push(glyph);
        }
        line.push(vertical);
        lines.push(line);
    }
    lines.push(border(corners[2], corners[3]));

    let mut status = format!("Score: {}  │  Length: {}", frame.score, frame.length);
    if let Some(loss) = frame.loss {
        status.push_str(&format!("  │  Loss: {loss:.2}"));
    }
    lines.push(status);
    lines
}

/// Writes each frame as text to `out`. Write failures are logged and
/// otherwise ignored.
pub struct TextRenderer<W: Write> {
    out: W,
    clear_screen: bool,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, clear_screen: false }
    }

    /// Prefix every frame with an ANSI clear so a terminal shows an animation.
    pub fn clear_screen(mut self, clear: bool) -> Self {
        self.clear_screen = clear;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, frame: &Frame<'_>) {
        let mut text = String::new();
        if self.clear_screen {
            text.push_str("\x1b[2J\x1b[H");
        }
        for line in render_lines(frame) {
            text.push_str(&line);
            text.push('\n');
        }
        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|_| self.out.flush()) {
            warn!(error = %e, "failed to write frame");
        }
    }
}
