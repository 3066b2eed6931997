//! Engine module: identity-tracked board, single-pass slide/merge ops, and
//! the per-move event log the animation layer replays.
//!
//! - `Board` holds cell occupancy and live tiles; pure data, no rendering
//!   knowledge.
//! - `moves` computes one directional slide/merge pass.
//! - `GameSession` owns the move state machine, RNG, id allocator, and score.

mod board;
mod event;
mod moves;
mod session;
mod tile;

pub use board::Board;
pub use event::Action;
pub use moves::Direction;
pub use session::{GameSession, MoveError, Phase};
pub use tile::{Tile, TileId, TileIdAllocator};
