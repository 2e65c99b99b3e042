/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// Layout:
///   row 0        HUD (tick, lever position, held item)
///   row 2..      every map side by side, one panel per map
///   below maps   action / speech text, event log, key help

use std::collections::VecDeque;
use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::group::ObjectGroup;
use crate::domain::lever::{BridgeSlot, LeverPosition};
use crate::domain::object::ObjectKind;
use crate::domain::sprite::SpriteId;
use crate::sim::event::MapEvent;
use crate::sim::map::MapInstance;
use crate::sim::world::World;

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel used to invalidate the back buffer so every cell is re-emitted.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        let bg = match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        };
        Cell { ch, fg, bg }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell::new(ch, fg, bg));
        }
    }
}

// ── Tile glyphs ──

const GROUND_BG: Color = Color::Rgb { r: 34, g: 58, b: 34 };
const WATER_BG: Color = Color::Rgb { r: 20, g: 40, b: 90 };
const BRIDGE_BG: Color = Color::Rgb { r: 110, g: 80, b: 40 };
const HUD_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };

fn lever_glyph(position: Option<LeverPosition>) -> char {
    match position {
        Some(LeverPosition::Left) => '\\',
        Some(LeverPosition::Center) => '|',
        Some(LeverPosition::Right) => '/',
        None => '?',
    }
}

/// What one map tile looks like, highest priority first:
/// sprite, lever, holdable, magic area, open bridge, ground, water.
fn tile_glyph(world: &World, map: &MapInstance, x: usize, y: usize) -> (char, Color, Color) {
    let walkable = map.is_walkable(x, y);
    let on_bridge = BridgeSlot::ALL.iter().any(|slot| {
        map.layer_visible(slot.layer_name()) == Some(true)
            && map.find_object(slot.in_bounds_name(), ObjectGroup::Reference)
                .and_then(|id| map.object(id))
                .map_or(false, |o| o.rect.contains(x, y))
    });
    let bg = if on_bridge {
        BRIDGE_BG
    } else if walkable {
        GROUND_BG
    } else {
        WATER_BG
    };

    if world.sprites.iter().any(|s| s.map == map.name && s.x == x && s.y == y) {
        return ('@', Color::White, bg);
    }

    let visible = map.members(ObjectGroup::Props).iter()
        .chain(map.members(ObjectGroup::Triggers))
        .filter_map(|id| map.object(*id))
        .filter(|o| o.rect.contains(x, y));
    let mut area = None;
    for obj in visible {
        match obj.kind {
            ObjectKind::Lever => {
                let position = obj.lever.and_then(|id| world.lever_position(id));
                return (lever_glyph(position), Color::Magenta, bg);
            }
            ObjectKind::Holdable => return ('!', Color::Yellow, bg),
            ObjectKind::MagicArea => area = Some(('*', Color::Cyan, bg)),
            ObjectKind::Other(_) => {}
        }
    }
    if let Some(glyph) = area {
        return glyph;
    }

    if on_bridge {
        ('=', Color::Rgb { r: 220, g: 190, b: 120 }, bg)
    } else if walkable {
        ('.', Color::DarkGreen, bg)
    } else {
        ('~', Color::Blue, bg)
    }
}

// ── Renderer ──

/// Each map tile is two terminal columns wide.
const CELL_W: usize = 2;
/// Columns between map panels.
const PANEL_GAP: usize = 4;

const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;

const LOG_LINES: usize = 8;

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    log: VecDeque<String>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            log: VecDeque::with_capacity(LOG_LINES),
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    /// Append a tick's events to the log, skipping per-tick prompts.
    pub fn record(&mut self, tick: u64, events: &[MapEvent]) {
        for event in events.iter().filter(|e| !e.is_prompt()) {
            if self.log.len() == LOG_LINES {
                self.log.pop_front();
            }
            self.log.push_back(format!("[{tick:>5}] {}", event.describe()));
        }
    }

    pub fn render(&mut self, world: &World, player: SpriteId) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        self.front.clear();
        self.compose(world, player);
        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut cursor_at: Option<(usize, usize)> = None;

        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    continue;
                }
                if cursor_at != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }
                queue!(self.writer, Print(cell.ch))?;
                cursor_at = Some((x + 1, y));
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose(&mut self, world: &World, player: SpriteId) {
        self.compose_hud(world, player);

        let mut col = 0;
        let mut map_rows = 0;
        for map in world.maps() {
            self.compose_map(world, map, player, col);
            col += map.width * CELL_W + PANEL_GAP;
            map_rows = map_rows.max(map.height + 1);
        }

        let mut row = MAP_ROW + map_rows + 1;
        if let Some(sprite) = world.sprite(player) {
            let action = sprite.action_text.as_deref().unwrap_or("");
            let speech = sprite.speech_text.as_deref().map(|s| format!("\"{s}\"")).unwrap_or_default();
            self.front.put_str(1, row, action, Color::Black, Color::Rgb { r: 200, g: 180, b: 50 });
            self.front.put_str(1, row + 1, &speech, Color::Cyan, Color::Reset);
        }
        row += 3;

        self.front.put_str(1, row, "Events", Color::Grey, Color::Reset);
        for (i, line) in self.log.iter().enumerate() {
            self.front.put_str(1, row + 1 + i, line, Color::DarkGrey, Color::Reset);
        }
        row += LOG_LINES + 2;

        let help = " Arrows/WASD:Move  Space/Enter:Act  G:Drop  T:Travel  Esc/Q:Quit";
        self.front.put_str(0, row, help, Color::DarkGrey, Color::Reset);
    }

    fn compose_hud(&mut self, world: &World, player: SpriteId) {
        let lever = world.mechanics.iter()
            .find_map(|m| m.lever.as_ref())
            .and_then(|m| world.levers.get(m.lever))
            .map_or_else(|| "-".to_string(), |l| format!("{} ({})", l.position().label(), l.gid()));
        let held = world.sprite(player)
            .and_then(|s| s.holding.as_ref())
            .map_or("nothing", |h| h.name.as_str());
        let hud = format!(" bridgeworks  tick {:<6} lever: {:<14} holding: {}", world.tick, lever, held);

        for x in 0..self.front.width {
            self.front.set(x, HUD_ROW, Cell::new(' ', Color::White, HUD_BG));
        }
        self.front.put_str(0, HUD_ROW, &hud, Color::White, HUD_BG);
    }

    fn compose_map(&mut self, world: &World, map: &MapInstance, player: SpriteId, col: usize) {
        let here = world.sprite(player).map_or(false, |s| s.map == map.name);
        let open: Vec<&str> = map.layers().iter()
            .filter(|l| l.visible && l.name.starts_with("bridge"))
            .map(|l| l.name.as_str())
            .collect();
        let marker = if here { " *" } else { "" };
        let title = format!("{}{marker}  [{}]", map.name, open.join(" "));
        self.front.put_str(col, MAP_ROW, &title, if here { Color::White } else { Color::Grey }, Color::Reset);

        for y in 0..map.height {
            for x in 0..map.width {
                let (ch, fg, bg) = tile_glyph(world, map, x, y);
                let cx = col + x * CELL_W;
                self.front.set(cx, MAP_ROW + 1 + y, Cell::new(ch, fg, bg));
                self.front.set(cx + 1, MAP_ROW + 1 + y, Cell::new(' ', fg, bg));
            }
        }
    }
}
