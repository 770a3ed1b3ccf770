//! GameView: maps a `core::GameSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{GameSnapshot, PieceSnapshot};
use crate::fb::{FrameBuffer, Glyph, Style};
use crate::types::{Rgb, BOARD_HEIGHT, BOARD_WIDTH};

/// Side panel width in terminal columns.
const PANEL_W: u16 = 18;

/// Gap between the board frame and the side panel.
const PANEL_GAP: u16 = 2;

const BLOCK: char = '█';
const GHOST: char = '░';
const EMPTY: char = '·';

const CONTROLS: [&str; 7] = [
    "←→  move",
    "↑   rotate",
    "↓   soft drop",
    "SPC hard drop",
    "P   pause",
    "R   restart",
    "Q   quit",
];

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Chrome colors; piece colors always come from the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Play area background
    pub background: Rgb,
    pub border: Rgb,
    pub text: Rgb,
    /// Score flash, combo counter and overlay titles
    pub accent: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Rgb::new(30, 30, 40),
            border: Rgb::new(200, 200, 200),
            text: Rgb::new(220, 220, 220),
            accent: Rgb::new(241, 196, 15),
        }
    }
}

/// Presentation settings, passed explicitly to the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewConfig {
    /// Board cell width in terminal columns.
    pub cell_w: u16,
    /// Board cell height in terminal rows.
    pub cell_h: u16,
    pub show_ghost: bool,
    pub show_controls: bool,
    pub palette: Palette,
}

impl Default for ViewConfig {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
            show_ghost: true,
            show_controls: true,
            palette: Palette::default(),
        }
    }
}

/// Board frame placement inside the viewport.
#[derive(Debug, Clone, Copy)]
struct Layout {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

/// A lightweight terminal renderer for the game.
#[derive(Debug, Clone, Default)]
pub struct GameView {
    config: ViewConfig,
}

impl GameView {
    pub fn new(config: ViewConfig) -> Self {
        let config = ViewConfig {
            cell_w: config.cell_w.max(1),
            cell_h: config.cell_h.max(1),
            ..config
        };
        Self { config }
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Columns and rows needed to show the board and side panel in full.
    pub fn min_size(&self) -> Viewport {
        let frame_w = BOARD_WIDTH as u16 * self.config.cell_w + 2;
        let frame_h = BOARD_HEIGHT as u16 * self.config.cell_h + 2;
        Viewport::new(frame_w + PANEL_GAP + PANEL_W, frame_h)
    }

    /// Render a snapshot into an existing framebuffer.
    ///
    /// This is the allocation-free hot path. Callers can reuse a framebuffer
    /// across frames and only resize when the terminal size changes.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Glyph::new(' ', self.text_style()));

        let min = self.min_size();
        let layout = Layout {
            x: viewport.width.saturating_sub(min.width) / 2,
            y: viewport.height.saturating_sub(min.height) / 2,
            w: BOARD_WIDTH as u16 * self.config.cell_w + 2,
            h: min.height,
        };

        let palette = self.config.palette;
        let border = Style::new(palette.border, Rgb::new(0, 0, 0));
        self.draw_border(fb, layout, border);

        for y in 0..BOARD_HEIGHT {
            for x in 0..BOARD_WIDTH {
                match snap.board[y as usize][x as usize] {
                    Some(color) => self.draw_block(fb, layout, x as i8, y as i8, color),
                    None => {
                        let style =
                            Style::new(palette.background.scaled(3, 1), palette.background).dim();
                        self.fill_cell_rect(fb, layout, x as i8, y as i8, EMPTY, style);
                    }
                }
            }
        }

        if !snap.game_over {
            if let Some(ghost) = snap.ghost.filter(|_| self.config.show_ghost) {
                let style = Style::new(ghost.color.scaled(1, 2), palette.background);
                for (x, y) in ghost.cells {
                    self.fill_cell_rect(fb, layout, x, y, GHOST, style);
                }
            }
            for (x, y) in snap.current.cells {
                self.draw_block(fb, layout, x, y, snap.current.color);
            }
        }

        self.draw_side_panel(fb, snap, viewport, layout);

        if snap.game_over {
            self.draw_game_over(fb, layout, snap.score);
        } else if snap.paused {
            self.draw_overlay_text(fb, layout, 0, "PAUSED", self.title_style());
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn text_style(&self) -> Style {
        Style::new(self.config.palette.text, Rgb::new(0, 0, 0))
    }

    fn title_style(&self) -> Style {
        Style::new(self.config.palette.accent, Rgb::new(0, 0, 0)).bold()
    }

    fn draw_border(&self, fb: &mut FrameBuffer, layout: Layout, style: Style) {
        let Layout { x, y, w, h } = layout;

        fb.put_char(x, y, '┌', style);
        fb.put_char(x + w - 1, y, '┐', style);
        fb.put_char(x, y + h - 1, '└', style);
        fb.put_char(x + w - 1, y + h - 1, '┘', style);

        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }
    }

    fn draw_block(&self, fb: &mut FrameBuffer, layout: Layout, x: i8, y: i8, color: Rgb) {
        let style = Style::new(color, self.config.palette.background).bold();
        self.fill_cell_rect(fb, layout, x, y, BLOCK, style);
    }

    /// Fill one board cell; cells outside the visible field are skipped.
    fn fill_cell_rect(
        &self,
        fb: &mut FrameBuffer,
        layout: Layout,
        x: i8,
        y: i8,
        ch: char,
        style: Style,
    ) {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return;
        }
        let px = layout.x + 1 + x as u16 * self.config.cell_w;
        let py = layout.y + 1 + y as u16 * self.config.cell_h;
        fb.fill_rect(px, py, self.config.cell_w, self.config.cell_h, ch, style);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        viewport: Viewport,
        layout: Layout,
    ) {
        let panel_x = layout.x.saturating_add(layout.w).saturating_add(PANEL_GAP);
        if panel_x >= viewport.width || viewport.width - panel_x < 12 {
            return;
        }

        let label = self.text_style().bold();
        let value = self.text_style();
        let accent = self.title_style();

        let mut y = layout.y;
        fb.put_str(panel_x, y, "SCORE", label);
        y += 1;
        let score_style = if snap.score_flash() { accent } else { value };
        fb.put_u32(panel_x, y, snap.score, score_style);
        y += 2;

        fb.put_str(panel_x, y, "LEVEL", label);
        y += 1;
        fb.put_u32(panel_x, y, snap.level, value);
        y += 2;

        fb.put_str(panel_x, y, "LINES", label);
        y += 1;
        fb.put_u32(panel_x, y, snap.lines, value);
        y += 1;

        if snap.combo > 1 {
            fb.put_str(panel_x, y, "COMBO x", accent);
            fb.put_u32(panel_x + 7, y, snap.combo, accent);
        }
        y += 2;

        fb.put_str(panel_x, y, "NEXT", label);
        y += 1;
        y += self.draw_preview(fb, panel_x, y, &snap.next) + 1;

        if self.config.show_controls {
            let dim = value.dim();
            for line in CONTROLS {
                if y >= viewport.height {
                    break;
                }
                fb.put_str(panel_x, y, line, dim);
                y += 1;
            }
        }
    }

    /// Draw `piece` trimmed to its bounding box; returns the rows used.
    fn draw_preview(&self, fb: &mut FrameBuffer, x: u16, y: u16, piece: &PieceSnapshot) -> u16 {
        let min_x = piece.cells.iter().map(|c| c.0).min().unwrap_or(0);
        let min_y = piece.cells.iter().map(|c| c.1).min().unwrap_or(0);
        let max_y = piece.cells.iter().map(|c| c.1).max().unwrap_or(0);

        let style = Style::new(piece.color, Rgb::new(0, 0, 0)).bold();
        let w = self.config.cell_w;
        for (cx, cy) in piece.cells {
            let px = x + (cx - min_x) as u16 * w;
            let py = y + (cy - min_y) as u16;
            fb.fill_rect(px, py, w, 1, BLOCK, style);
        }
        (max_y - min_y) as u16 + 1
    }

    fn draw_game_over(&self, fb: &mut FrameBuffer, layout: Layout, score: u32) {
        let value = self.text_style();
        self.draw_overlay_text(fb, layout, -1, "GAME OVER", self.title_style());

        let mid_y = layout.y + layout.h / 2;
        let label = "Score: ";
        let digits = digit_count(score);
        let text_w = label.chars().count() as u16 + digits;
        let x = layout.x + layout.w.saturating_sub(text_w) / 2;
        fb.put_str(x, mid_y, label, value);
        fb.put_u32(x + label.chars().count() as u16, mid_y, score, value);

        self.draw_overlay_text(fb, layout, 2, "Press R to restart", value);
    }

    fn draw_overlay_text(
        &self,
        fb: &mut FrameBuffer,
        layout: Layout,
        row: i16,
        text: &str,
        style: Style,
    ) {
        let mid_y = layout.y + layout.h / 2;
        let y = (mid_y as i16 + row).max(0) as u16;
        fb.put_str_centered(layout.x, layout.w, y, text, style);
    }
}

fn digit_count(mut value: u32) -> u16 {
    let mut n = 1;
    while value >= 10 {
        value /= 10;
        n += 1;
    }
    n
}
