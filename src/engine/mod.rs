#![allow(dead_code)]
//! Game engine: the turn/flip state machine
//!
//! The engine owns the deck and the live session and reacts to discrete
//! events from the driver loop: flip requests, the 1 Hz tick, reset
//! requests, and the deferred match/mismatch resolution. After a second
//! flip the engine locks input and hands the driver a `ResolutionToken`
//! carrying the reveal delay; the driver calls `resolve` with that token
//! once the delay has passed. Tokens are tagged with the session
//! generation, so a token captured before a reset can never mutate the
//! session that replaced it.

pub mod clock;

use crate::game::{self, score, Deck, GameError, Tile, TileState};
use crate::stats::{ScoreRecord, SessionRecorder};
use chrono::Local;
use clock::SessionClock;
use rand::Rng;
use std::time::Duration;

/// Number of pairs in a standard game.
pub const DEFAULT_PAIR_COUNT: usize = 12;

/// How long a matched pair stays highlighted before being retired.
pub const MATCH_REVEAL_DELAY: Duration = Duration::from_millis(600);

/// How long a mismatched pair stays visible before re-hiding. Longer
/// than the match delay so the player can see why the guess failed.
pub const MISMATCH_REVEAL_DELAY: Duration = Duration::from_millis(1000);

/// The state machine's current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Fewer than two tiles face up, accepting input.
    Idle,
    /// Two tiles face up, input locked, outcome pending.
    Evaluating,
    /// All pairs found.
    Complete,
}

/// Outcome of comparing the two face-up tiles, decided at flip time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Match,
    Mismatch,
}

impl Outcome {
    fn reveal_delay(self) -> Duration {
        match self {
            Outcome::Match => MATCH_REVEAL_DELAY,
            Outcome::Mismatch => MISMATCH_REVEAL_DELAY,
        }
    }
}

/// Handle for a scheduled resolution, returned by the second flip of a
/// turn. The driver waits out `delay()` and then passes the token back
/// to [`GameEngine::resolve`]. The embedded generation makes tokens
/// from a previous session inert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionToken {
    generation: u64,
    delay: Duration,
}

impl ResolutionToken {
    /// How long the tiles should stay revealed before resolution.
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

/// The outcome waiting to be applied while input is locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending {
    outcome: Outcome,
    tiles: [usize; 2],
}

/// Per-game mutable state, replaced wholesale on reset.
#[derive(Debug, Clone, Default)]
struct Session {
    started: bool,
    face_up: Vec<usize>,
    move_count: u32,
    match_count: u32,
    input_locked: bool,
    clock: SessionClock,
}

impl Session {
    fn new() -> Self {
        Self::default()
    }
}

/// Read-only copy of engine state handed to observers and pulled by the
/// presentation adapter after every change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub tiles: Vec<Tile>,
    pub pair_count: usize,
    pub move_count: u32,
    pub match_count: u32,
    pub elapsed_seconds: u32,
    pub score: u32,
    pub phase: Phase,
}

type Observer = Box<dyn FnMut(&Snapshot)>;

/// The game engine: deck, session, recorder, and scheduled-resolution
/// bookkeeping.
pub struct GameEngine {
    deck: Deck,
    pair_count: usize,
    session: Session,
    /// Bumped on every reset; pending tokens from older generations are
    /// ignored by `resolve`.
    generation: u64,
    pending: Option<Pending>,
    recorder: SessionRecorder,
    observers: Vec<Observer>,
}

impl GameEngine {
    /// Create an engine with a freshly shuffled deck of `pair_count`
    /// pairs. Fails with `InvalidConfig` for a zero pair count, before
    /// any UI is built.
    pub fn new(pair_count: usize) -> Result<Self, GameError> {
        Ok(Self::from_deck(game::build_deck(pair_count)?, pair_count))
    }

    /// Create an engine using a specific RNG for the shuffle
    /// (for testing/seeding).
    pub fn new_with_rng<R: Rng>(pair_count: usize, rng: &mut R) -> Result<Self, GameError> {
        Ok(Self::from_deck(
            game::build_deck_with_rng(pair_count, rng)?,
            pair_count,
        ))
    }

    fn from_deck(deck: Deck, pair_count: usize) -> Self {
        GameEngine {
            deck,
            pair_count,
            session: Session::new(),
            generation: 0,
            pending: None,
            recorder: SessionRecorder::new(),
            observers: Vec::new(),
        }
    }

    /// Register an observer called with a snapshot after every state
    /// change.
    pub fn subscribe(&mut self, observer: impl FnMut(&Snapshot) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// The state machine's current phase.
    pub fn phase(&self) -> Phase {
        if self.session.match_count as usize == self.pair_count {
            Phase::Complete
        } else if self.session.input_locked {
            Phase::Evaluating
        } else {
            Phase::Idle
        }
    }

    /// Build a read-only copy of the current state.
    pub fn snapshot(&self) -> Snapshot {
        let session = &self.session;
        Snapshot {
            tiles: self.deck.clone(),
            pair_count: self.pair_count,
            move_count: session.move_count,
            match_count: session.match_count,
            elapsed_seconds: session.clock.elapsed_seconds(),
            score: score::compute_score(
                session.clock.elapsed_seconds(),
                session.move_count,
                session.match_count,
            ),
            phase: self.phase(),
        }
    }

    /// Completed-game results in recording order.
    pub fn history(&self) -> &[ScoreRecord] {
        self.recorder.history()
    }

    /// Flip a tile face up.
    ///
    /// Silently ignored while input is locked, for tiles that are not
    /// face down, and for unknown ids (misclicks are not errors). The
    /// first flip of a session starts the clock. The second flip of a
    /// turn counts a move, locks input, and returns a token the driver
    /// schedules for resolution after `token.delay()`.
    pub fn flip(&mut self, tile_id: usize) -> Option<ResolutionToken> {
        if self.session.input_locked {
            return None;
        }
        match self.deck.get(tile_id) {
            Some(tile) if tile.state == TileState::FaceDown => {}
            _ => return None,
        }

        if !self.session.started {
            self.session.started = true;
            self.session.clock.start();
        }

        self.deck[tile_id].state = TileState::FaceUp;
        self.session.face_up.push(tile_id);

        let token = if self.session.face_up.len() == 2 {
            let first = self.session.face_up[0];
            let second = self.session.face_up[1];
            let outcome = if self.deck[first].pair_key == self.deck[second].pair_key {
                Outcome::Match
            } else {
                Outcome::Mismatch
            };

            self.session.move_count += 1;
            self.session.input_locked = true;
            self.pending = Some(Pending {
                outcome,
                tiles: [first, second],
            });
            Some(ResolutionToken {
                generation: self.generation,
                delay: outcome.reveal_delay(),
            })
        } else {
            None
        };

        self.notify();
        token
    }

    /// Apply the pending match/mismatch outcome.
    ///
    /// No-op if the token predates the current session (reset happened
    /// while the resolution was scheduled) or nothing is pending.
    pub fn resolve(&mut self, token: ResolutionToken) {
        if token.generation != self.generation {
            return;
        }
        let Some(pending) = self.pending.take() else {
            return;
        };

        match pending.outcome {
            Outcome::Match => {
                for id in pending.tiles {
                    self.deck[id].state = TileState::Matched;
                }
                self.session.face_up.clear();
                self.session.match_count += 1;
                self.session.input_locked = false;

                if self.session.match_count as usize == self.pair_count {
                    self.complete();
                }
            }
            Outcome::Mismatch => {
                for id in pending.tiles {
                    self.deck[id].state = TileState::FaceDown;
                }
                self.session.face_up.clear();
                self.session.input_locked = false;
            }
        }

        self.notify();
    }

    /// All pairs found: stop the clock and record the final result.
    fn complete(&mut self) {
        self.session.clock.stop();
        self.recorder.record(ScoreRecord {
            elapsed_seconds: self.session.clock.elapsed_seconds(),
            move_count: self.session.move_count,
            score: score::compute_score(
                self.session.clock.elapsed_seconds(),
                self.session.move_count,
                self.session.match_count,
            ),
            completed_on: Local::now().date_naive(),
        });
    }

    /// Discard the current session and deck and start over with a fresh
    /// shuffle. Any scheduled resolution is invalidated; recorded
    /// history is preserved.
    pub fn reset(&mut self, pair_count: usize) -> Result<(), GameError> {
        let deck = game::build_deck(pair_count)?;

        self.session.clock.stop();
        self.generation += 1;
        self.pending = None;
        self.deck = deck;
        self.pair_count = pair_count;
        self.session = Session::new();

        self.notify();
        Ok(())
    }

    /// Advance the session clock one second. Driven at 1 Hz by the main
    /// loop; does nothing before the first flip or after completion.
    pub fn tick(&mut self) {
        if self.session.clock.tick() {
            self.notify();
        }
    }

    fn notify(&mut self) {
        if self.observers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for observer in &mut self.observers {
            observer(&snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn engine(pair_count: usize) -> GameEngine {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        GameEngine::new_with_rng(pair_count, &mut rng).unwrap()
    }

    /// Ids of two face-down tiles sharing a pair key.
    fn matching_pair(engine: &GameEngine) -> (usize, usize) {
        let tiles = engine.snapshot().tiles;
        for a in &tiles {
            if a.state != TileState::FaceDown {
                continue;
            }
            for b in &tiles {
                if b.id != a.id && b.state == TileState::FaceDown && b.pair_key == a.pair_key {
                    return (a.id, b.id);
                }
            }
        }
        panic!("no face-down pair left");
    }

    /// Ids of two face-down tiles with different pair keys.
    fn mismatched_pair(engine: &GameEngine) -> (usize, usize) {
        let tiles = engine.snapshot().tiles;
        for a in &tiles {
            if a.state != TileState::FaceDown {
                continue;
            }
            for b in &tiles {
                if b.id != a.id && b.state == TileState::FaceDown && b.pair_key != a.pair_key {
                    return (a.id, b.id);
                }
            }
        }
        panic!("no mismatched face-down tiles left");
    }

    fn tile_state(engine: &GameEngine, id: usize) -> TileState {
        engine.snapshot().tiles[id].state
    }

    #[test]
    fn test_new_engine_is_idle_and_face_down() {
        let engine = engine(12);
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.phase, Phase::Idle);
        assert_eq!(snapshot.tiles.len(), 24);
        assert_eq!(snapshot.move_count, 0);
        assert_eq!(snapshot.match_count, 0);
        assert_eq!(snapshot.elapsed_seconds, 0);
        assert!(snapshot
            .tiles
            .iter()
            .all(|t| t.state == TileState::FaceDown));
    }

    #[test]
    fn test_zero_pair_count_is_rejected() {
        assert!(matches!(
            GameEngine::new(0),
            Err(GameError::InvalidConfig { pair_count: 0 })
        ));
    }

    #[test]
    fn test_first_flip_starts_clock() {
        let mut engine = engine(12);
        engine.tick();
        assert_eq!(engine.snapshot().elapsed_seconds, 0);

        engine.flip(0);
        engine.tick();
        engine.tick();
        assert_eq!(engine.snapshot().elapsed_seconds, 2);
    }

    #[test]
    fn test_first_flip_reveals_without_token() {
        let mut engine = engine(12);
        assert!(engine.flip(3).is_none());
        assert_eq!(tile_state(&engine, 3), TileState::FaceUp);
        assert_eq!(engine.phase(), Phase::Idle);
        assert_eq!(engine.snapshot().move_count, 0);
    }

    #[test]
    fn test_flipping_same_tile_twice_is_noop() {
        let mut engine = engine(12);
        engine.flip(5);
        assert!(engine.flip(5).is_none());
        assert_eq!(engine.phase(), Phase::Idle);
        assert_eq!(engine.snapshot().move_count, 0);
        // Only one tile face up
        let face_up = engine
            .snapshot()
            .tiles
            .iter()
            .filter(|t| t.state == TileState::FaceUp)
            .count();
        assert_eq!(face_up, 1);
    }

    #[test]
    fn test_unknown_tile_id_is_noop() {
        let mut engine = engine(12);
        assert!(engine.flip(999).is_none());
        assert_eq!(engine.phase(), Phase::Idle);
    }

    #[test]
    fn test_second_flip_locks_and_counts_a_move() {
        let mut engine = engine(12);
        let (a, b) = mismatched_pair(&engine);

        engine.flip(a);
        let token = engine.flip(b);

        assert!(token.is_some());
        assert_eq!(engine.phase(), Phase::Evaluating);
        assert_eq!(engine.snapshot().move_count, 1);
    }

    #[test]
    fn test_third_flip_while_evaluating_is_noop() {
        let mut engine = engine(12);
        let (a, b) = mismatched_pair(&engine);
        engine.flip(a);
        engine.flip(b);

        let third = (0..24).find(|id| *id != a && *id != b).unwrap();
        assert!(engine.flip(third).is_none());
        assert_eq!(tile_state(&engine, third), TileState::FaceDown);
        assert_eq!(engine.snapshot().move_count, 1);
    }

    #[test]
    fn test_match_delay_is_shorter_than_mismatch_delay() {
        let mut engine = engine(12);
        let (a, b) = matching_pair(&engine);
        engine.flip(a);
        let token = engine.flip(b).unwrap();
        assert_eq!(token.delay(), MATCH_REVEAL_DELAY);
        engine.resolve(token);

        let (c, d) = mismatched_pair(&engine);
        engine.flip(c);
        let token = engine.flip(d).unwrap();
        assert_eq!(token.delay(), MISMATCH_REVEAL_DELAY);
        assert!(MATCH_REVEAL_DELAY < MISMATCH_REVEAL_DELAY);
    }

    #[test]
    fn test_match_resolution_retires_both_tiles() {
        let mut engine = engine(12);
        let (a, b) = matching_pair(&engine);

        engine.flip(a);
        let token = engine.flip(b).unwrap();
        engine.resolve(token);

        assert_eq!(tile_state(&engine, a), TileState::Matched);
        assert_eq!(tile_state(&engine, b), TileState::Matched);
        assert_eq!(engine.snapshot().match_count, 1);
        assert_eq!(engine.phase(), Phase::Idle);
    }

    #[test]
    fn test_mismatch_resolution_rehides_both_tiles() {
        let mut engine = engine(12);
        let (a, b) = mismatched_pair(&engine);

        engine.flip(a);
        let token = engine.flip(b).unwrap();
        engine.resolve(token);

        assert_eq!(tile_state(&engine, a), TileState::FaceDown);
        assert_eq!(tile_state(&engine, b), TileState::FaceDown);
        assert_eq!(engine.snapshot().move_count, 1);
        assert_eq!(engine.snapshot().match_count, 0);
        assert_eq!(engine.phase(), Phase::Idle);
    }

    #[test]
    fn test_single_pair_game_completes_and_records() {
        let mut engine = engine(1);

        engine.flip(0);
        let token = engine.flip(1).unwrap();
        assert_eq!(token.delay(), MATCH_REVEAL_DELAY);
        engine.resolve(token);

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.phase, Phase::Complete);
        assert_eq!(snapshot.match_count, 1);
        assert_eq!(tile_state(&engine, 0), TileState::Matched);
        assert_eq!(tile_state(&engine, 1), TileState::Matched);

        assert_eq!(engine.history().len(), 1);
        let record = &engine.history()[0];
        assert_eq!(record.move_count, 1);
        assert_eq!(record.elapsed_seconds, 0);
        assert_eq!(record.score, snapshot.score);
    }

    #[test]
    fn test_clock_stops_on_completion() {
        let mut engine = engine(1);
        engine.flip(0);
        engine.tick();
        let token = engine.flip(1).unwrap();
        engine.resolve(token);

        let elapsed = engine.snapshot().elapsed_seconds;
        engine.tick();
        engine.tick();
        assert_eq!(engine.snapshot().elapsed_seconds, elapsed);
    }

    #[test]
    fn test_twelve_matches_complete_exactly_once() {
        let mut engine = engine(12);

        let completions = Rc::new(RefCell::new(0u32));
        let seen = Rc::clone(&completions);
        engine.subscribe(move |snapshot| {
            if snapshot.phase == Phase::Complete {
                *seen.borrow_mut() += 1;
            }
        });

        for round in 1..=12u32 {
            let (a, b) = matching_pair(&engine);
            engine.flip(a);
            let token = engine.flip(b).unwrap();
            engine.resolve(token);
            assert_eq!(engine.snapshot().match_count, round);
        }

        assert_eq!(engine.phase(), Phase::Complete);
        assert_eq!(engine.history().len(), 1);
        assert_eq!(engine.history()[0].move_count, 12);
        // Only the final resolution notified in the Complete phase
        assert_eq!(*completions.borrow(), 1);
    }

    #[test]
    fn test_stale_resolution_after_reset_is_inert() {
        let mut engine = engine(12);
        let (a, b) = matching_pair(&engine);
        engine.flip(a);
        let token = engine.flip(b).unwrap();

        engine.reset(12).unwrap();
        engine.resolve(token);

        let snapshot = engine.snapshot();
        assert!(snapshot
            .tiles
            .iter()
            .all(|t| t.state == TileState::FaceDown));
        assert_eq!(snapshot.move_count, 0);
        assert_eq!(snapshot.match_count, 0);
        assert_eq!(snapshot.phase, Phase::Idle);
    }

    #[test]
    fn test_resolving_twice_is_noop() {
        let mut engine = engine(12);
        let (a, b) = matching_pair(&engine);
        engine.flip(a);
        let token = engine.flip(b).unwrap();
        engine.resolve(token);
        engine.resolve(token);
        assert_eq!(engine.snapshot().match_count, 1);
    }

    #[test]
    fn test_reset_zeroes_session_and_keeps_history() {
        let mut engine = engine(1);
        engine.flip(0);
        let token = engine.flip(1).unwrap();
        engine.resolve(token);
        assert_eq!(engine.history().len(), 1);

        engine.reset(12).unwrap();

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.pair_count, 12);
        assert_eq!(snapshot.tiles.len(), 24);
        assert_eq!(snapshot.move_count, 0);
        assert_eq!(snapshot.match_count, 0);
        assert_eq!(snapshot.elapsed_seconds, 0);
        assert_eq!(snapshot.phase, Phase::Idle);
        assert_eq!(engine.history().len(), 1);
    }

    #[test]
    fn test_reset_with_zero_pairs_fails_and_leaves_session() {
        let mut engine = engine(12);
        engine.flip(0);
        assert!(engine.reset(0).is_err());
        assert_eq!(tile_state(&engine, 0), TileState::FaceUp);
    }

    #[test]
    fn test_ticks_before_first_flip_do_not_count() {
        let mut engine = engine(12);
        engine.tick();
        engine.tick();
        assert_eq!(engine.snapshot().elapsed_seconds, 0);
    }

    #[test]
    fn test_snapshot_score_tracks_session() {
        let mut engine = engine(12);
        assert_eq!(engine.snapshot().score, 1000);

        let (a, b) = matching_pair(&engine);
        engine.flip(a);
        engine.tick();
        let token = engine.flip(b).unwrap();
        engine.resolve(token);

        // 1000 - 2*1 - 5*1 + 20*1
        assert_eq!(engine.snapshot().score, 1013);
    }

    #[test]
    fn test_observer_sees_every_mutation() {
        let mut engine = engine(12);
        let notifications = Rc::new(RefCell::new(0u32));
        let seen = Rc::clone(&notifications);
        engine.subscribe(move |_| *seen.borrow_mut() += 1);

        let (a, b) = mismatched_pair(&engine);
        engine.flip(a); // 1
        engine.tick(); // 2
        let token = engine.flip(b).unwrap(); // 3
        engine.resolve(token); // 4
        engine.reset(12).unwrap(); // 5

        assert_eq!(*notifications.borrow(), 5);
    }

    #[test]
    fn test_noop_flip_still_notifies_nothing_extra() {
        let mut engine = engine(12);
        let notifications = Rc::new(RefCell::new(0u32));
        let seen = Rc::clone(&notifications);
        engine.subscribe(move |_| *seen.borrow_mut() += 1);

        engine.flip(999);
        assert_eq!(*notifications.borrow(), 0);
    }
}
