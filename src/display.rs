//! Rendering layer. All terminal I/O lives here.
//!
//! The playfield is in pixels; it is drawn onto a character grid where one
//! cell covers `CELL_W` × `CELL_H` pixels. Nothing here mutates the world.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use river_leap::entities::{Entity, EntityKind, GameStatus};
use river_leap::world::World;

const CELL_W: f32 = 12.0;
const CELL_H: f32 = 48.0;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_GRASS: Color = Color::DarkGreen;
const C_WATER: Color = Color::DarkBlue;
const C_TREE: Color = Color::Green;
const C_LOG: Color = Color::DarkYellow;
const C_TURTLE: Color = Color::Cyan;
const C_VEHICLE: Color = Color::Red;
const C_BULLDOZER: Color = Color::Yellow;
const C_HOLE: Color = Color::Grey;
const C_PLAYER: Color = Color::White;
const C_BONUS: Color = Color::Magenta;
const C_HUD: Color = Color::Yellow;
const C_HINT: Color = Color::DarkGrey;

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, world: &World) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let (cols, rows) = terminal::size()?;
    let grid = Grid { cols, rows };

    // Terrain first so everything else draws over it.
    for entity in world.scenery().iter().filter(|e| is_terrain(e)) {
        draw_entity(out, &grid, entity)?;
    }
    for hole in world.holes().iter().filter(|h| !h.filled) {
        let width = world.config().holes.width;
        grid.span(out, hole.x, hole.y, width, C_HOLE, '·')?;
    }
    for log in world.logs() {
        draw_entity(out, &grid, log)?;
    }
    for entity in world.scenery().iter().filter(|e| !is_terrain(e)) {
        draw_entity(out, &grid, entity)?;
    }
    if let Some(bonus) = world.bonus() {
        draw_entity(out, &grid, &bonus.body)?;
    }
    draw_entity(out, &grid, world.player().body())?;

    draw_hud(out, &grid, world)?;

    match world.status() {
        GameStatus::Playing => {}
        GameStatus::GameOver => draw_banner(out, &grid, "GAME  OVER", Color::Red)?,
        GameStatus::Completed => draw_banner(out, &grid, "ALL LEVELS CLEARED", Color::Green)?,
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Grid mapping ──────────────────────────────────────────────────────────────

struct Grid {
    cols: u16,
    rows: u16,
}

impl Grid {
    fn row(&self, y: f32) -> Option<u16> {
        let row = (y / CELL_H).round();
        (row >= 0.0 && row < self.rows as f32).then_some(row as u16)
    }

    /// Fill the cells covered by a sprite `width` pixels wide centred on
    /// `(x, y)`, clipped to the terminal.
    fn span<W: Write>(
        &self,
        out: &mut W,
        x: f32,
        y: f32,
        width: f32,
        color: Color,
        glyph: char,
    ) -> std::io::Result<()> {
        let Some(row) = self.row(y) else {
            return Ok(());
        };
        let first = ((x - width / 2.0) / CELL_W).floor().max(0.0);
        let last = ((x + width / 2.0) / CELL_W).ceil().min(self.cols as f32);
        if last <= first {
            return Ok(());
        }
        let count = (last - first) as usize;
        out.queue(cursor::MoveTo(first as u16, row))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(glyph.to_string().repeat(count)))?;
        Ok(())
    }
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn is_terrain(entity: &Entity) -> bool {
    matches!(
        entity.kind(),
        EntityKind::Grass | EntityKind::Water | EntityKind::Tree
    )
}

fn glyph_for(kind: EntityKind) -> (char, Color) {
    match kind {
        EntityKind::Grass => ('░', C_GRASS),
        EntityKind::Water => ('≈', C_WATER),
        EntityKind::Tree => ('♣', C_TREE),
        EntityKind::Bus | EntityKind::Racecar => ('█', C_VEHICLE),
        EntityKind::Bike => ('ð', C_VEHICLE),
        EntityKind::Bulldozer => ('▓', C_BULLDOZER),
        EntityKind::Turtle => ('o', C_TURTLE),
        EntityKind::Log | EntityKind::LongLog => ('=', C_LOG),
        EntityKind::Player | EntityKind::HoleMarker => ('@', C_PLAYER),
        EntityKind::Bonus => ('♥', C_BONUS),
    }
}

fn draw_entity<W: Write>(out: &mut W, grid: &Grid, entity: &Entity) -> std::io::Result<()> {
    if !entity.is_visible() {
        return Ok(());
    }
    let (glyph, color) = glyph_for(entity.kind());
    grid.span(out, entity.x(), entity.y(), entity.width(), color, glyph)
}

// ── HUD ───────────────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, grid: &Grid, world: &World) -> std::io::Result<()> {
    let field_rows = (world.config().field.height / CELL_H) as u16;
    let hud_row = field_rows.min(grid.rows.saturating_sub(2));

    let hearts = "♥".repeat(world.player().lives().len());
    let filled = world.holes().iter().filter(|h| h.filled).count();
    let hud = format!(
        "Level {}/{}   Holes {}/{}   Lives {}",
        world.level_index() + 1,
        world.level_count(),
        filled,
        world.holes().len(),
        hearts
    );
    out.queue(cursor::MoveTo(1, hud_row))?;
    out.queue(style::SetForegroundColor(C_HUD))?;
    out.queue(Print(hud))?;

    out.queue(cursor::MoveTo(1, hud_row + 1))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← → ↑ ↓ / W A S D : Hop   Q : Quit"))?;
    Ok(())
}

// ── End-of-game overlay ───────────────────────────────────────────────────────

fn draw_banner<W: Write>(out: &mut W, grid: &Grid, title: &str, color: Color) -> std::io::Result<()> {
    let inner = title.chars().count() + 8;
    let lines = [
        format!("╔{}╗", "═".repeat(inner)),
        format!("║    {}    ║", title),
        format!("╚{}╝", "═".repeat(inner)),
        "Press any key to exit".to_string(),
    ];

    let cx = grid.cols / 2;
    let start_row = (grid.rows / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, line) in lines.iter().enumerate() {
        let col = cx.saturating_sub(line.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(style::SetForegroundColor(if i < 3 { color } else { Color::White }))?;
        out.queue(Print(line))?;
    }
    Ok(())
}
