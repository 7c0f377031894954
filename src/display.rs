/// Rendering layer — all terminal I/O lives here.
///
/// The game window draws its objects onto a `FrameBuffer` (our `Canvas`),
/// which maps world coordinates onto terminal cells.  `render` then turns the
/// buffer plus a HUD into terminal commands.  No game logic is performed.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use invaders::assets::SpriteKind;
use invaders::compute::GameWindow;
use invaders::entities::{Canvas, Sprite};
use invaders::input::{Key, KeyBindings};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD: Color = Color::Yellow;
const C_HUD_COOLDOWN: Color = Color::Red;
const C_PLAYER: Color = Color::White;
const C_ALIEN: Color = Color::Green;
const C_BULLET: Color = Color::Cyan;
const C_EXPLOSION: Color = Color::Red;
const C_HINT: Color = Color::DarkGrey;

fn glyph(kind: SpriteKind) -> (char, Color) {
    match kind {
        SpriteKind::Player => ('█', C_PLAYER),
        SpriteKind::Alien => ('▼', C_ALIEN),
        SpriteKind::Bullet => ('║', C_BULLET),
        SpriteKind::Explosion => ('*', C_EXPLOSION),
    }
}

// ── Frame buffer ──────────────────────────────────────────────────────────────

/// The play area as a grid of cells.  Row 0 is the top of the screen, while
/// world y grows upward from the bottom.
pub struct FrameBuffer {
    cols: u16,
    rows: u16,
    world_width: f32,
    world_height: f32,
    cells: Vec<Option<(char, Color)>>,
}

impl FrameBuffer {
    pub fn new(cols: u16, rows: u16, world_width: f32, world_height: f32) -> Self {
        Self {
            cols,
            rows,
            world_width,
            world_height,
            cells: vec![None; cols as usize * rows as usize],
        }
    }

    fn col_of(&self, x: f32) -> i32 {
        (x / self.world_width * self.cols as f32).floor() as i32
    }

    fn row_of(&self, y: f32) -> i32 {
        self.rows as i32 - 1 - (y / self.world_height * self.rows as f32).floor() as i32
    }

    fn put(&mut self, col: i32, row: i32, cell: (char, Color)) {
        if col < 0 || row < 0 || col >= self.cols as i32 || row >= self.rows as i32 {
            return;
        }
        self.cells[row as usize * self.cols as usize + col as usize] = Some(cell);
    }
}

impl Canvas for FrameBuffer {
    fn draw_sprite(&mut self, sprite: &Sprite) {
        let (left, bottom) = sprite.origin();
        let first_col = self.col_of(left);
        // Anything narrower than a cell still gets one.
        let last_col = self.col_of(left + sprite.width).max(first_col + 1);
        let bottom_row = self.row_of(bottom);
        let top_row = self.row_of(bottom + sprite.height).min(bottom_row - 1);

        let cell = glyph(sprite.kind);
        for row in (top_row + 1)..=bottom_row {
            for col in first_col..last_col {
                self.put(col, row, cell);
            }
        }
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, window: &GameWindow) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    let play_cols = width.saturating_sub(2);
    let play_rows = height.saturating_sub(4);

    let mut frame = FrameBuffer::new(
        play_cols,
        play_rows,
        window.config.world_width,
        window.config.world_height,
    );
    window.draw(&mut frame);

    out.queue(terminal::Clear(terminal::ClearType::All))?;
    draw_border(out, width, height)?;
    draw_hud(out, window, width)?;
    draw_frame(out, &frame)?;
    draw_controls_hint(out, &window.config.key_bindings, height)?;

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let w = width as usize;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    // Row 1 — top bar
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    // Row h-2 — bottom bar
    out.queue(cursor::MoveTo(0, height.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    // Side walls
    for row in 2..height.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, window: &GameWindow, width: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD))?;
    out.queue(Print(format!(
        "Time:{:>7.1}s  Bullets:{:>3}  Aliens:{:>3}",
        window.now(),
        window.bullets.len(),
        window.aliens.len()
    )))?;

    let (tag, color) = if window.player.is_cooling() {
        ("[ RELOADING ]", C_HUD_COOLDOWN)
    } else {
        ("[ READY ]", C_HUD)
    };
    let rx = width.saturating_sub(tag.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(tag))?;

    Ok(())
}

// ── Play area ─────────────────────────────────────────────────────────────────

fn draw_frame<W: Write>(out: &mut W, frame: &FrameBuffer) -> std::io::Result<()> {
    for row in 0..frame.rows {
        for col in 0..frame.cols {
            if let Some((ch, color)) = frame.cells[row as usize * frame.cols as usize + col as usize] {
                out.queue(cursor::MoveTo(col + 1, row + 2))?;
                out.queue(style::SetForegroundColor(color))?;
                out.queue(Print(ch))?;
            }
        }
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn key_label(key: Key) -> String {
    match key {
        Key::Left => "←".to_string(),
        Key::Right => "→".to_string(),
        Key::Up => "↑".to_string(),
        Key::Down => "↓".to_string(),
        Key::Space => "SPACE".to_string(),
        Key::Char(c) => c.to_uppercase().to_string(),
    }
}

fn draw_controls_hint<W: Write>(out: &mut W, keys: &KeyBindings, height: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(format!(
        "{} {} : Move   {} : Shoot   Q : Quit",
        key_label(keys.move_left),
        key_label(keys.move_right),
        key_label(keys.fire)
    )))?;
    Ok(())
}
