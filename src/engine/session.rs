use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::config::GameConfig;

use super::board::Board;
use super::event::Action;
use super::moves::{self, Direction};
use super::tile::{Tile, TileIdAllocator};

/// Why a move request was rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoveError {
    /// The previous move's events are still being animated. The caller
    /// decides whether to queue the input or drop it.
    #[error("engine is busy animating the previous move")]
    Busy,
}

/// Where the session is in its move state machine.
///
/// A move computes synchronously, so the COMPUTING/COMMITTED stretch never
/// outlives the `try_move` call; what the consumer observes is `Idle` versus
/// `Animating`, the window between a committed move and the animation
/// driver finishing its replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Ready to accept a move.
    Idle,
    /// A committed move's events are with the consumer; new moves are
    /// rejected until [`GameSession::finish_animation`].
    Animating,
}

/// One game of 2048: board, id allocator, RNG, score, and the move state
/// machine. Sessions are independent; nothing here is process-global, so
/// tests and hosts can run as many as they like side by side.
pub struct GameSession {
    config: GameConfig,
    board: Board,
    allocator: TileIdAllocator,
    rng: StdRng,
    phase: Phase,
    score: u64,
}

impl GameSession {
    /// Create a session with an empty board. Call [`new_game`] to seed the
    /// initial tiles.
    ///
    /// [`new_game`]: GameSession::new_game
    pub fn new(config: GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let board = Board::new(config.board_size);
        Self {
            config,
            board,
            allocator: TileIdAllocator::new(),
            rng,
            phase: Phase::Idle,
            score: 0,
        }
    }

    /// Clear the board, reset the allocator and score, and seed the
    /// configured number of starting tiles. Returns one `CreateTile` per
    /// seeded tile; seeding is not a move, so there are no
    /// `StartMove`/`EndMove` brackets.
    pub fn new_game(&mut self) -> Vec<Action> {
        self.board.clear();
        self.allocator.reset();
        self.score = 0;
        self.phase = Phase::Idle;

        let count = self.config.spawn.initial_tiles;
        let mut events = Vec::with_capacity(count);
        for _ in 0..count {
            if let Some(tile) = self.spawn_tile() {
                events.push(Action::CreateTile { tile });
            }
        }
        info!(
            "new game: {}x{} board, {} seed tiles",
            self.board.size(),
            self.board.size(),
            events.len()
        );
        events
    }

    /// Compute and commit one directional move.
    ///
    /// A legal move returns the full bracketed event list: `StartMove`, the
    /// slide/merge events, the spawn's `CreateTile`, `EndMove`; the session
    /// then sits in [`Phase::Animating`] until [`finish_animation`] is
    /// called. A move that cannot slide or merge anything returns an empty
    /// list, leaves the board untouched, and spawns nothing.
    ///
    /// [`finish_animation`]: GameSession::finish_animation
    pub fn try_move(&mut self, dir: Direction) -> Result<Vec<Action>, MoveError> {
        if self.phase == Phase::Animating {
            return Err(MoveError::Busy);
        }

        let mut body = Vec::new();
        let changed = moves::slide(&mut self.board, dir, &mut body);
        if !changed {
            debug!("move {dir:?}: no-op");
            return Ok(Vec::new());
        }

        for event in &body {
            if let Action::MergeTile { destination, .. } = event {
                self.score += destination.value as u64;
            }
        }

        let mut events = Vec::with_capacity(body.len() + 3);
        events.push(Action::StartMove);
        events.append(&mut body);
        // A changed board always has at least one free cell for the spawn.
        let spawned = self.spawn_tile().expect("changed move leaves an empty cell");
        events.push(Action::CreateTile { tile: spawned });
        events.push(Action::EndMove);

        debug_assert!(self.board.validate().is_ok(), "move broke board invariants");
        self.phase = Phase::Animating;
        debug!(
            "move {dir:?}: {} events, score {}",
            events.len(),
            self.score
        );
        Ok(events)
    }

    /// Consumer acknowledgement that the last move's events have been
    /// replayed; the session accepts moves again.
    pub fn finish_animation(&mut self) {
        self.phase = Phase::Idle;
    }

    /// True while a committed move awaits [`finish_animation`].
    ///
    /// [`finish_animation`]: GameSession::finish_animation
    pub fn is_busy(&self) -> bool {
        self.phase == Phase::Animating
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Read-only view of the board for rendering and debugging.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Sum of merged-tile values accrued so far.
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Highest tile value on the board, 0 when empty.
    pub fn highest_tile(&self) -> u32 {
        self.board.tiles().map(|t| t.value).max().unwrap_or(0)
    }

    /// True if no direction can slide or merge any tile. Derived read; the
    /// host polls it after each move.
    pub fn is_game_over(&self) -> bool {
        !moves::any_move_possible(&self.board)
    }

    /// Place a fresh tile on a uniformly random empty cell. Value is 2, or 4
    /// with the configured probability.
    fn spawn_tile(&mut self) -> Option<Tile> {
        let empty = self.board.empty_cells();
        if empty.is_empty() {
            return None;
        }
        let cell = empty[self.rng.gen_range(0..empty.len())];
        let value = if self.rng.gen_bool(self.config.spawn.four_chance) {
            4
        } else {
            2
        };
        let tile = Tile::new(self.allocator.next_id(), value, cell);
        self.board.insert(tile);
        Some(tile)
    }
}
