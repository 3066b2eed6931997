use serde::{Deserialize, Serialize};

/// Opaque identity of a tile, stable for the tile's whole lifetime.
///
/// Ids are issued by [`TileIdAllocator`] and never reused within a session,
/// so the animation layer can key transitions on them across moves.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TileId(u64);

impl TileId {
    #[inline]
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Issues strictly increasing tile ids for one game session.
///
/// Callers request an id only when a tile is actually created: gaps in the
/// sequence are fine, duplicates are not.
#[derive(Debug, Default)]
pub struct TileIdAllocator {
    next: u64,
}

impl TileIdAllocator {
    pub fn new() -> Self {
        Self { next: 0 }
    }

    /// Issue the next id. Never returns the same id twice for one allocator.
    #[inline]
    pub fn next_id(&mut self) -> TileId {
        let id = TileId(self.next);
        self.next += 1;
        id
    }

    /// Restart the sequence. Only valid on new-game, when no tile from the
    /// previous game survives.
    pub fn reset(&mut self) {
        self.next = 0;
    }
}

/// A live tile: stable identity, current value, current cell.
///
/// `Tile` doubles as the snapshot embedded in [`Action`] events, so it is
/// `Copy` and serializes to the `{ position, value, id }` shape the
/// animation layer consumes.
///
/// [`Action`]: super::event::Action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// (row, col), both in `[0, size)`.
    pub position: (usize, usize),
    /// Positive power of two; mutates only via merge.
    pub value: u32,
    pub id: TileId,
}

impl Tile {
    pub fn new(id: TileId, value: u32, position: (usize, usize)) -> Self {
        Self {
            position,
            value,
            id,
        }
    }

    #[inline]
    pub fn row(&self) -> usize {
        self.position.0
    }

    #[inline]
    pub fn col(&self) -> usize {
        self.position.1
    }
}
