//! pairup - terminal memory-matching game
//!
//! Flip two tiles a turn; matches stay up, mismatches re-hide.
//! Find every pair before the clock eats your score.

mod engine;
mod game;
mod stats;
mod tui;

use crossterm::event::{
    self, Event, KeyCode, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use engine::{GameEngine, ResolutionToken, DEFAULT_PAIR_COUNT};
use std::io;
use std::time::{Duration, Instant};
use tui::{ui, TileCursor, Tui};

fn main() -> io::Result<()> {
    // Build the engine before touching the terminal so a bad pair count
    // surfaces as a plain error instead of garbling a raw-mode screen.
    let mut engine = GameEngine::new(DEFAULT_PAIR_COUNT).map_err(io::Error::other)?;

    // Initialize terminal
    let mut terminal = Tui::new()?;
    terminal.enter()?;

    let mut cursor = TileCursor::new(DEFAULT_PAIR_COUNT * 2);

    // The scheduled match/mismatch resolution: the token from the second
    // flip of a turn plus its deadline. Dropped on reset; a token that
    // outlives its session is ignored by the engine anyway.
    let mut pending: Option<(ResolutionToken, Instant)> = None;

    // Main event loop
    let tick_rate = Duration::from_secs(1);
    let mut last_tick = Instant::now();
    let mut should_quit = false;

    while !should_quit {
        // Render
        let snapshot = engine.snapshot();
        let history = engine.history().to_vec();
        terminal.draw(|frame| tui::render(frame, &snapshot, cursor.index(), &history))?;

        // Wake for whichever deadline comes first: the 1 Hz tick or a
        // due resolution
        let mut timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if let Some((_, due)) = pending {
            timeout = timeout.min(due.saturating_duration_since(Instant::now()));
        }

        // Poll for events with timeout
        if event::poll(timeout)? {
            match event::read()? {
                // Only handle key press events (not release)
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Esc | KeyCode::Char('q') => {
                        should_quit = true;
                    }
                    KeyCode::Left | KeyCode::Char('h') => cursor.move_left(),
                    KeyCode::Right | KeyCode::Char('l') => cursor.move_right(),
                    KeyCode::Up | KeyCode::Char('k') => cursor.move_up(),
                    KeyCode::Down | KeyCode::Char('j') => cursor.move_down(),
                    KeyCode::Enter | KeyCode::Char(' ') => {
                        if let Some(token) = engine.flip(cursor.index()) {
                            pending = Some((token, Instant::now() + token.delay()));
                        }
                    }
                    KeyCode::Char('n') | KeyCode::Char('r') => {
                        engine
                            .reset(DEFAULT_PAIR_COUNT)
                            .map_err(io::Error::other)?;
                        cursor = TileCursor::new(DEFAULT_PAIR_COUNT * 2);
                        pending = None;
                    }
                    _ => {}
                },
                Event::Mouse(MouseEvent {
                    kind: MouseEventKind::Down(MouseButton::Left),
                    column,
                    row,
                    ..
                }) => {
                    // Hit-test the click against the board layout
                    let board = ui::board_area(terminal.area()?, !history.is_empty());
                    let geometry = ui::BoardGeometry::new(board, snapshot.tiles.len());
                    if let Some(tile_id) = geometry.tile_at(column, row) {
                        cursor.set(tile_id);
                        if let Some(token) = engine.flip(tile_id) {
                            pending = Some((token, Instant::now() + token.delay()));
                        }
                    }
                }
                _ => {}
            }
        }

        // Handle timer tick
        if last_tick.elapsed() >= tick_rate {
            engine.tick();
            last_tick = Instant::now();
        }

        // Apply a due resolution
        if let Some((token, due)) = pending {
            if Instant::now() >= due {
                engine.resolve(token);
                pending = None;
            }
        }
    }

    // Terminal cleanup happens automatically via Tui::drop
    Ok(())
}
