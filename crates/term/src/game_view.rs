//! GameView: maps `core::GameState` into a terminal framebuffer.
//!
//! Pure (no I/O), so it can be unit-tested.

use crate::core::{Capsule, CapsuleRegistry, GameState, GameStatus, Piece, PieceKind};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{Color, Orientation, GRID_HEIGHT, GRID_WIDTH, SPAWN_COL};

const BOTTLE_BG: Rgb = Rgb::new(20, 24, 36);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);

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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// How a grid cell is drawn: two glyphs repeated across the cell width
type Glyph = [char; 2];

const PATHOGEN: Glyph = ['<', '>'];
const HALF_LEFT: Glyph = ['(', '█'];
const HALF_RIGHT: Glyph = ['█', ')'];
const HALF_TOP: Glyph = ['▄', '▄'];
const HALF_BOTTOM: Glyph = ['▀', '▀'];
const HALF_LOOSE: Glyph = ['(', ')'];
const POP: Glyph = ['*', '*'];
const EMPTY: Glyph = ['·', ' '];

/// Terminal renderer for the bottle and its side panel.
pub struct GameView {
    /// Grid cell width in terminal columns.
    cell_w: u16,
    /// Grid cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 roughly squares cells for common terminal fonts.
        Self {
            cell_w: 2,
            cell_h: 1,
            anchor_y: AnchorY::Center,
        }
    }
}

/// Bottle placement inside the viewport
#[derive(Debug, Clone, Copy)]
struct Frame {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    fn frame(&self, viewport: Viewport) -> Frame {
        let w = (GRID_WIDTH as u16) * self.cell_w + 2;
        let h = (GRID_HEIGHT as u16) * self.cell_h + 2;
        Frame {
            x: viewport.width.saturating_sub(w + PANEL_WIDTH) / 2,
            y: match self.anchor_y {
                AnchorY::Center => viewport.height.saturating_sub(h) / 2,
                AnchorY::Top => 0,
            },
            w,
            h,
        }
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    ///
    /// Callers reuse one framebuffer across frames.
    pub fn render_into(&self, game: &GameState, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let frame = self.frame(viewport);
        self.draw_bottle(fb, frame);

        let field = game.playfield();
        for row in 0..GRID_HEIGHT as i8 {
            for col in 0..GRID_WIDTH as i8 {
                match field.grid.get(col, row) {
                    Some(piece) => {
                        let glyph = piece_glyph(piece, link_orientation(&field.capsules, piece));
                        self.draw_cell(fb, frame, col, row, glyph, piece_style(piece));
                    }
                    None => self.draw_cell(fb, frame, col, row, EMPTY, empty_style()),
                }
            }
        }

        for popped in game.clearing() {
            let style = color_style(popped.color).bold();
            self.draw_cell(fb, frame, popped.col, popped.row, POP, style);
        }

        if let Some(active) = game.active() {
            self.draw_capsule(fb, frame, &active);
        }

        self.draw_side_panel(fb, game, viewport, frame);

        let overlay = if game.paused() {
            Some("PAUSED")
        } else {
            match game.status() {
                GameStatus::Ready => Some("PRESS R"),
                GameStatus::Won => Some("CLEAR!"),
                GameStatus::Lost => Some("GAME OVER"),
                GameStatus::Playing => None,
            }
        };
        if let Some(text) = overlay {
            self.draw_overlay_text(fb, frame, text);
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, game: &GameState, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(game, viewport, &mut fb);
        fb
    }

    fn draw_bottle(&self, fb: &mut FrameBuffer, f: Frame) {
        let border = CellStyle::new(Rgb::new(200, 200, 210), PANEL_BG);
        fb.fill_rect(
            f.x + 1,
            f.y + 1,
            f.w - 2,
            f.h - 2,
            ' ',
            CellStyle::new(BOTTLE_BG, BOTTLE_BG),
        );

        fb.put_char(f.x, f.y, '┌', border);
        fb.put_char(f.x + f.w - 1, f.y, '┐', border);
        fb.put_char(f.x, f.y + f.h - 1, '└', border);
        fb.put_char(f.x + f.w - 1, f.y + f.h - 1, '┘', border);
        for dx in 1..f.w - 1 {
            fb.put_char(f.x + dx, f.y, '─', border);
            fb.put_char(f.x + dx, f.y + f.h - 1, '─', border);
        }
        for dy in 1..f.h - 1 {
            fb.put_char(f.x, f.y + dy, '│', border);
            fb.put_char(f.x + f.w - 1, f.y + dy, '│', border);
        }

        // Open neck above the spawn columns.
        let neck_x = f.x + 1 + (SPAWN_COL as u16) * self.cell_w;
        fb.put_char(neck_x.saturating_sub(1), f.y, '┘', border);
        fb.put_char(neck_x + 2 * self.cell_w, f.y, '└', border);
        for dx in 0..2 * self.cell_w {
            fb.put_char(neck_x + dx, f.y, ' ', border);
        }
    }

    fn draw_cell(&self, fb: &mut FrameBuffer, f: Frame, col: i8, row: i8, glyph: Glyph, style: CellStyle) {
        if col < 0 || row < 0 || col >= GRID_WIDTH as i8 || row >= GRID_HEIGHT as i8 {
            return;
        }
        let px = f.x + 1 + (col as u16) * self.cell_w;
        let py = f.y + 1 + (row as u16) * self.cell_h;
        for dy in 0..self.cell_h {
            for dx in 0..self.cell_w {
                fb.put_char(px + dx, py + dy, glyph[(dx % 2) as usize], style);
            }
        }
    }

    fn draw_capsule(&self, fb: &mut FrameBuffer, f: Frame, capsule: &Capsule) {
        let (first, second) = match capsule.orientation {
            Orientation::Horizontal => (HALF_LEFT, HALF_RIGHT),
            Orientation::Vertical => (HALF_TOP, HALF_BOTTOM),
        };
        let (c, r) = capsule.first_pos();
        self.draw_cell(fb, f, c, r, first, color_style(capsule.first.color).bold());
        let (c, r) = capsule.second_pos();
        self.draw_cell(fb, f, c, r, second, color_style(capsule.second.color).bold());
    }

    fn draw_side_panel(&self, fb: &mut FrameBuffer, game: &GameState, viewport: Viewport, f: Frame) {
        let panel_x = f.x.saturating_add(f.w).saturating_add(2);
        if panel_x.saturating_add(10) > viewport.width {
            return;
        }

        let label = CellStyle::new(Rgb::new(220, 220, 220), PANEL_BG).bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);

        let mut y = f.y;
        let mut stat = |fb: &mut FrameBuffer, name: &str, n: u32| {
            fb.put_str(panel_x, y, name, label);
            fb.put_u32(panel_x, y + 1, n, value);
            y += 3;
        };
        stat(fb, "SCORE", game.score());
        stat(fb, "LEVEL", game.level());
        stat(fb, "PATHOGENS", game.pathogens_remaining() as u32);

        fb.put_str(panel_x, y, "SPEED", label);
        fb.put_str(panel_x, y + 1, game.speed().as_str(), value);
        y += 3;

        fb.put_str(panel_x, y, "NEXT", label);
        let (a, b) = game.next_colors();
        fb.put_char(panel_x, y + 1, HALF_LEFT[0], color_style(a).bold());
        fb.put_char(panel_x + 1, y + 1, HALF_LEFT[1], color_style(a).bold());
        fb.put_char(panel_x + 2, y + 1, HALF_RIGHT[0], color_style(b).bold());
        fb.put_char(panel_x + 3, y + 1, HALF_RIGHT[1], color_style(b).bold());
        y += 3;

        if game.chain() > 1 {
            let end = fb.put_str(panel_x, y, "CHAIN x", label);
            fb.put_u32(end, y, game.chain(), label);
        }
    }

    fn draw_overlay_text(&self, fb: &mut FrameBuffer, f: Frame, text: &str) {
        let mid_y = f.y.saturating_add(f.h / 2);
        let text_w = text.chars().count() as u16;
        let x = f.x.saturating_add(f.w.saturating_sub(text_w) / 2);
        let style = CellStyle::new(Rgb::new(255, 255, 255), PANEL_BG).bold();
        fb.put_str(x, mid_y, text, style);
    }
}

/// Columns reserved for the side panel when centering
const PANEL_WIDTH: u16 = 14;

/// Orientation of the capsule a landed half still belongs to
fn link_orientation(capsules: &CapsuleRegistry, piece: &Piece) -> Option<Orientation> {
    piece
        .link()
        .and_then(|link| capsules.get(link.capsule))
        .map(|c| c.orientation)
}

fn piece_glyph(piece: &Piece, orientation: Option<Orientation>) -> Glyph {
    use crate::core::HalfRole::{First, Second};
    match (piece.kind, orientation) {
        (PieceKind::Pathogen { .. }, _) => PATHOGEN,
        (PieceKind::Half { link: Some(link), .. }, Some(o)) => match (o, link.role) {
            (Orientation::Horizontal, First) => HALF_LEFT,
            (Orientation::Horizontal, Second) => HALF_RIGHT,
            (Orientation::Vertical, First) => HALF_TOP,
            (Orientation::Vertical, Second) => HALF_BOTTOM,
        },
        (PieceKind::Half { .. }, _) => HALF_LOOSE,
    }
}

fn color_style(color: Color) -> CellStyle {
    let fg = match color {
        Color::Red => Rgb::new(230, 70, 70),
        Color::Yellow => Rgb::new(240, 210, 70),
        Color::Blue => Rgb::new(80, 140, 240),
    };
    CellStyle::new(fg, BOTTLE_BG)
}

fn piece_style(piece: &Piece) -> CellStyle {
    let style = color_style(piece.color());
    if piece.is_pathogen() {
        style.bold()
    } else {
        style
    }
}

fn empty_style() -> CellStyle {
    CellStyle::new(Rgb::new(70, 74, 90), BOTTLE_BG).dim()
}
