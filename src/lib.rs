//! Grid/tile engine for a 2048-style sliding puzzle.
//!
//! The engine owns an `N x N` board of identity-stable tiles and computes the
//! full effect of one directional move (slide, pairwise merge, spawn) as an
//! ordered list of [`Action`] events. A UI layer replays that list to drive
//! its animations; the engine itself knows nothing about rendering and works
//! purely in (row, column) grid coordinates.

pub mod config;
pub mod engine;

pub use config::GameConfig;
pub use engine::{
    Action, Board, Direction, GameSession, MoveError, Phase, Tile, TileId, TileIdAllocator,
};
