//! UI rendering using ratatui
//!
//! Screen regions:
//! - Header: title, timer, moves/matches, live score
//! - Board: the tile grid with the keyboard cursor
//! - Past-games panel (shown once history exists)
//! - Footer: key hints
//!
//! The board is laid out with explicit cell math (`BoardGeometry`) so
//! mouse clicks can be hit-tested against the exact same rectangles the
//! renderer draws.

use crate::engine::{Phase, Snapshot};
use crate::game::TileState;
use crate::stats::ScoreRecord;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

/// Cell width including borders.
const TILE_WIDTH: u16 = 7;

/// Cell height including borders.
const TILE_HEIGHT: u16 = 3;

/// Horizontal spacing between cells.
const TILE_GAP_X: u16 = 1;

/// Width of the past-games side panel.
const HISTORY_PANEL_WIDTH: u16 = 38;

/// Grid placement for a tile count, anchored inside a screen area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardGeometry {
    origin_x: u16,
    origin_y: u16,
    columns: u16,
    tile_count: usize,
    fits: bool,
}

impl BoardGeometry {
    /// Center a grid of `tile_count` cells inside `area`.
    pub fn new(area: Rect, tile_count: usize) -> Self {
        let columns = columns_for(tile_count) as u16;
        let rows = rows_for(tile_count) as u16;
        let width = columns * (TILE_WIDTH + TILE_GAP_X) - TILE_GAP_X;
        let height = rows * TILE_HEIGHT;

        BoardGeometry {
            origin_x: area.x + area.width.saturating_sub(width) / 2,
            origin_y: area.y + area.height.saturating_sub(height) / 2,
            columns,
            tile_count,
            fits: width <= area.width && height <= area.height,
        }
    }

    /// Whether the whole grid fits inside the area it was anchored to.
    pub fn fits(&self) -> bool {
        self.fits
    }

    /// Screen rectangle of the tile at `index`.
    pub fn tile_rect(&self, index: usize) -> Rect {
        let col = index as u16 % self.columns;
        let row = index as u16 / self.columns;
        Rect::new(
            self.origin_x + col * (TILE_WIDTH + TILE_GAP_X),
            self.origin_y + row * TILE_HEIGHT,
            TILE_WIDTH,
            TILE_HEIGHT,
        )
    }

    /// The tile under a screen coordinate, if any. Gaps between cells
    /// and coordinates outside the grid map to nothing.
    pub fn tile_at(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.origin_x || y < self.origin_y {
            return None;
        }
        let dx = x - self.origin_x;
        let dy = y - self.origin_y;

        if dx % (TILE_WIDTH + TILE_GAP_X) >= TILE_WIDTH {
            return None;
        }
        let col = dx / (TILE_WIDTH + TILE_GAP_X);
        if col >= self.columns {
            return None;
        }

        let index = (dy / TILE_HEIGHT * self.columns + col) as usize;
        (index < self.tile_count).then_some(index)
    }
}

/// Grid columns for a tile count. Boards come out wider than tall
/// (24 tiles -> 6x4).
pub fn columns_for(tile_count: usize) -> usize {
    ((tile_count as f64 * 1.5).sqrt().ceil() as usize).max(1)
}

fn rows_for(tile_count: usize) -> usize {
    tile_count.div_ceil(columns_for(tile_count))
}

/// The screen region the board occupies, shared with mouse hit-testing.
pub fn board_area(frame_area: Rect, has_history: bool) -> Rect {
    let rows = split_vertical(frame_area);
    if has_history {
        split_board_and_history(rows[1])[0]
    } else {
        rows[1]
    }
}

fn split_vertical(frame_area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with timer, stats, score
            Constraint::Min(0),    // Board (and history panel)
            Constraint::Length(2), // Footer
        ])
        .split(frame_area)
}

fn split_board_and_history(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),                          // Board
            Constraint::Length(HISTORY_PANEL_WIDTH),     // Past games
        ])
        .split(area)
}

/// Render the whole screen from an engine snapshot.
pub fn render(frame: &mut Frame, snapshot: &Snapshot, cursor: usize, history: &[ScoreRecord]) {
    let rows = split_vertical(frame.area());

    render_header(frame, rows[0], snapshot);

    let content = if history.is_empty() {
        rows[1]
    } else {
        let split = split_board_and_history(rows[1]);
        render_history(frame, split[1], history);
        split[0]
    };

    if snapshot.phase == Phase::Complete {
        render_win(frame, content, snapshot);
    } else {
        render_board(frame, content, snapshot, cursor);
    }

    render_footer(frame, rows[2]);
}

/// Render the header: title, timer, stats, score
fn render_header(frame: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let header_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(10), // Title
            Constraint::Min(20),    // Stats (centered, flexible)
            Constraint::Length(14), // Score
        ])
        .split(inner);

    let title = Paragraph::new("PAIRUP")
        .style(Style::default().fg(Color::Yellow).bold())
        .alignment(Alignment::Left);
    frame.render_widget(title, header_layout[0]);

    let stats_display = format!(
        "Time {}s  Moves {}  Matches {}/{}",
        snapshot.elapsed_seconds, snapshot.move_count, snapshot.match_count, snapshot.pair_count
    );
    let stats = Paragraph::new(stats_display)
        .style(Style::default().fg(Color::Cyan).bold())
        .alignment(Alignment::Center);
    frame.render_widget(stats, header_layout[1]);

    let score = Paragraph::new(format!("Score {}", snapshot.score))
        .style(Style::default().fg(Color::Magenta).bold())
        .alignment(Alignment::Right);
    frame.render_widget(score, header_layout[2]);
}

/// Render the tile grid
fn render_board(frame: &mut Frame, area: Rect, snapshot: &Snapshot, cursor: usize) {
    let geometry = BoardGeometry::new(area, snapshot.tiles.len());

    if !geometry.fits() {
        let warning = Paragraph::new("Terminal too small for the board")
            .style(Style::default().fg(Color::Red))
            .alignment(Alignment::Center);
        frame.render_widget(warning, area);
        return;
    }

    for tile in &snapshot.tiles {
        let rect = geometry.tile_rect(tile.id);

        let (face, face_style) = match tile.state {
            TileState::FaceDown => ("♥".to_string(), Style::default().fg(Color::DarkGray)),
            TileState::FaceUp => (
                face_label(&tile.pair_key),
                Style::default().fg(Color::Cyan).bold(),
            ),
            TileState::Matched => (
                face_label(&tile.pair_key),
                Style::default().fg(Color::Green),
            ),
        };

        let border_style = if tile.id == cursor {
            Style::default().fg(Color::Yellow).bold()
        } else {
            match tile.state {
                TileState::FaceDown => Style::default().fg(Color::DarkGray),
                TileState::FaceUp => Style::default().fg(Color::Cyan),
                TileState::Matched => Style::default().fg(Color::Green),
            }
        };

        let cell = Paragraph::new(face)
            .style(face_style)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).border_style(border_style));
        frame.render_widget(cell, rect);
    }
}

/// Render the win message in place of the board
fn render_win(frame: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(35),
            Constraint::Length(2), // Banner
            Constraint::Length(1), // Time and moves
            Constraint::Length(1), // Score
            Constraint::Length(2), // Hint
            Constraint::Percentage(35),
        ])
        .margin(1)
        .split(area);

    let banner = Paragraph::new("YOU WIN!")
        .style(Style::default().fg(Color::Yellow).bold())
        .alignment(Alignment::Center);
    frame.render_widget(banner, layout[1]);

    let totals = Paragraph::new(format!(
        "Time: {}s   Moves: {}",
        snapshot.elapsed_seconds, snapshot.move_count
    ))
    .style(Style::default().fg(Color::White))
    .alignment(Alignment::Center);
    frame.render_widget(totals, layout[2]);

    let score = Paragraph::new(format!("Score: {}", snapshot.score))
        .style(Style::default().fg(Color::Magenta).bold())
        .alignment(Alignment::Center);
    frame.render_widget(score, layout[3]);

    let hint = Paragraph::new("Press N for a new game")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(hint, layout[4]);
}

/// Render the past-games side panel
fn render_history(frame: &mut Frame, area: Rect, history: &[ScoreRecord]) {
    let best = history.iter().map(|r| r.score).max().unwrap_or(0);

    let items: Vec<ListItem> = history
        .iter()
        .map(|record| {
            let style = if record.score == best {
                Style::default().fg(Color::Yellow).bold()
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(format!(
                "{:>4} pts  {:>3} mv  {:>4}s  {}",
                record.score, record.move_count, record.elapsed_seconds, record.completed_on
            ))
            .style(style)
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Past Games"));
    frame.render_widget(list, area);
}

/// Render the key hints footer
fn render_footer(frame: &mut Frame, area: Rect) {
    let footer = Paragraph::new("↑↓←→ Move  Enter/Click Flip  N New Game  Esc Quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(footer, area);
}

/// Display label for a pair key: sequential keys map to letters
/// ("1" -> "A"), anything past "Z" shows the key itself.
fn face_label(pair_key: &str) -> String {
    match pair_key.parse::<u32>() {
        Ok(n) if (1..=26).contains(&n) => {
            char::from(b'A' + (n - 1) as u8).to_string()
        }
        _ => pair_key.to_string(),
    }
}
