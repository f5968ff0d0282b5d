#![allow(dead_code)]
//! Game logic: tiles, deck building, shuffling, scoring

pub mod score;
pub mod shuffle;

use rand::prelude::*;
use std::fmt;

/// Face state of a single tile on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileState {
    FaceDown,
    FaceUp,
    Matched,
}

/// One card instance on the board.
///
/// `id` is the tile's stable position in the shuffled deck; `pair_key`
/// identifies which pair it belongs to (each key appears exactly twice).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub id: usize,
    pub pair_key: String,
    pub state: TileState,
}

/// An ordered sequence of `2 * pair_count` tiles.
pub type Deck = Vec<Tile>;

/// Errors from deck construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// Pair count must be at least 1.
    InvalidConfig { pair_count: usize },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::InvalidConfig { pair_count } => {
                write!(f, "invalid pair count: {} (must be at least 1)", pair_count)
            }
        }
    }
}

impl std::error::Error for GameError {}

/// Build a shuffled deck of `pair_count` pairs.
///
/// Pair keys are sequential ids `"1"..="pair_count"`, each duplicated,
/// shuffled, then assigned positional tile ids. Every tile starts face
/// down. Fails with `InvalidConfig` when `pair_count` is zero.
pub fn build_deck(pair_count: usize) -> Result<Deck, GameError> {
    build_deck_with_rng(pair_count, &mut rand::rng())
}

/// Build a deck using a specific RNG (for testing/seeding).
pub fn build_deck_with_rng<R: Rng>(pair_count: usize, rng: &mut R) -> Result<Deck, GameError> {
    if pair_count == 0 {
        return Err(GameError::InvalidConfig { pair_count });
    }

    let mut keys: Vec<String> = Vec::with_capacity(pair_count * 2);
    for i in 1..=pair_count {
        keys.push(i.to_string());
        keys.push(i.to_string());
    }

    let deck = shuffle::shuffle_with_rng(&keys, rng)
        .into_iter()
        .enumerate()
        .map(|(id, pair_key)| Tile {
            id,
            pair_key,
            state: TileState::FaceDown,
        })
        .collect();

    Ok(deck)
}
