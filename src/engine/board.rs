use std::collections::BTreeMap;
use std::fmt;

use super::tile::{Tile, TileId};

/// The grid store: authoritative `size x size` occupancy plus the live tiles.
///
/// Pure data. Cells hold at most one tile id; the tile map is the single
/// owner of tile state. Mutators are crate-private so only the move engine
/// can touch the board mid-transaction; consumers get the read-only view.
///
/// Invariants (checked by `validate`, debug-asserted after every committed
/// move): every occupied cell references a live tile, every tile's stored
/// position agrees with the cell holding it, no two tiles share a cell or
/// an id.
#[derive(Debug, Clone)]
pub struct Board {
    size: usize,
    cells: Vec<Option<TileId>>,
    tiles: BTreeMap<TileId, Tile>,
}

impl Board {
    pub fn new(size: usize) -> Self {
        assert!(size >= 2, "board size must be at least 2");
        Self {
            size,
            cells: vec![None; size * size],
            tiles: BTreeMap::new(),
        }
    }

    /// Tiles per row/column.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// The tile occupying `(row, col)`, if any.
    pub fn tile_at(&self, row: usize, col: usize) -> Option<&Tile> {
        self.cells[self.idx(row, col)].and_then(|id| self.tiles.get(&id))
    }

    /// Look a live tile up by id.
    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(&id)
    }

    /// Snapshot iterator over all live tiles, in id order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    /// All unoccupied cells as (row, col), row-major.
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        let mut out = Vec::with_capacity(self.count_empty());
        for row in 0..self.size {
            for col in 0..self.size {
                if self.cells[self.idx(row, col)].is_none() {
                    out.push((row, col));
                }
            }
        }
        out
    }

    /// Sum of all live tile values.
    pub fn total_value(&self) -> u64 {
        self.tiles.values().map(|t| t.value as u64).sum()
    }

    /// Place a newly created tile on its (empty) cell.
    pub(crate) fn insert(&mut self, tile: Tile) {
        let idx = self.idx(tile.row(), tile.col());
        debug_assert!(self.cells[idx].is_none(), "insert into occupied cell");
        debug_assert!(!self.tiles.contains_key(&tile.id), "duplicate tile id");
        self.cells[idx] = Some(tile.id);
        self.tiles.insert(tile.id, tile);
    }

    /// Move a live tile to an empty cell, updating its stored position.
    pub(crate) fn relocate(&mut self, id: TileId, to: (usize, usize)) {
        let tile = self.tiles.get_mut(&id).expect("relocate of unknown tile");
        let from_idx = self.size * tile.position.0 + tile.position.1;
        let to_idx = self.size * to.0 + to.1;
        debug_assert!(self.cells[to_idx].is_none(), "relocate onto occupied cell");
        tile.position = to;
        self.cells[from_idx] = None;
        self.cells[to_idx] = Some(id);
    }

    /// Overwrite a live tile's value (merge application).
    pub(crate) fn set_value(&mut self, id: TileId, value: u32) {
        let tile = self.tiles.get_mut(&id).expect("set_value of unknown tile");
        tile.value = value;
    }

    /// Retire a tile, clearing its cell. Returns the final tile state.
    pub(crate) fn remove(&mut self, id: TileId) -> Option<Tile> {
        let tile = self.tiles.remove(&id)?;
        let idx = self.idx(tile.row(), tile.col());
        debug_assert_eq!(self.cells[idx], Some(id));
        self.cells[idx] = None;
        Some(tile)
    }

    /// Drop every tile. Used by new-game only.
    pub(crate) fn clear(&mut self) {
        self.cells.fill(None);
        self.tiles.clear();
    }

    /// Check the occupancy invariants, returning a description of the first
    /// violation. A violation means the move algorithm itself is broken, so
    /// callers treat `Err` as fatal rather than recoverable.
    pub(crate) fn validate(&self) -> Result<(), String> {
        let mut seen = 0usize;
        for row in 0..self.size {
            for col in 0..self.size {
                if let Some(id) = self.cells[self.idx(row, col)] {
                    seen += 1;
                    match self.tiles.get(&id) {
                        None => {
                            return Err(format!(
                                "cell ({row}, {col}) references retired id {id:?}"
                            ))
                        }
                        Some(tile) if tile.position != (row, col) => {
                            return Err(format!(
                                "tile {id:?} stored at ({row}, {col}) but thinks it is at {:?}",
                                tile.position
                            ))
                        }
                        Some(_) => {}
                    }
                }
            }
        }
        if seen != self.tiles.len() {
            return Err(format!(
                "{} occupied cells but {} live tiles",
                seen,
                self.tiles.len()
            ));
        }
        Ok(())
    }

    #[inline]
    fn idx(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.size && col < self.size);
        self.size * row + col
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.size {
            for col in 0..self.size {
                match self.tile_at(row, col) {
                    Some(tile) => write!(f, "{:>6}", tile.value)?,
                    None => write!(f, "{:>6}", ".")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tile::TileIdAllocator;

    fn tile(alloc: &mut TileIdAllocator, value: u32, pos: (usize, usize)) -> Tile {
        Tile::new(alloc.next_id(), value, pos)
    }

    #[test]
    fn insert_and_lookup() {
        let mut alloc = TileIdAllocator::new();
        let mut board = Board::new(4);
        let t = tile(&mut alloc, 2, (1, 2));
        board.insert(t);
        assert_eq!(board.tile_at(1, 2), Some(&t));
        assert_eq!(board.tile_at(2, 1), None);
        assert_eq!(board.tile_count(), 1);
        assert_eq!(board.count_empty(), 15);
        board.validate().unwrap();
    }

    #[test]
    fn relocate_keeps_position_consistent() {
        let mut alloc = TileIdAllocator::new();
        let mut board = Board::new(4);
        let t = tile(&mut alloc, 4, (3, 3));
        board.insert(t);
        board.relocate(t.id, (3, 0));
        assert!(board.tile_at(3, 3).is_none());
        assert_eq!(board.tile_at(3, 0).unwrap().position, (3, 0));
        board.validate().unwrap();
    }

    #[test]
    fn remove_clears_cell_and_retires_tile() {
        let mut alloc = TileIdAllocator::new();
        let mut board = Board::new(4);
        let t = tile(&mut alloc, 2, (0, 0));
        board.insert(t);
        let removed = board.remove(t.id).unwrap();
        assert_eq!(removed.id, t.id);
        assert!(board.tile_at(0, 0).is_none());
        assert!(board.tile(t.id).is_none());
        board.validate().unwrap();
    }

    #[test]
    fn empty_cells_are_row_major() {
        let mut alloc = TileIdAllocator::new();
        let mut board = Board::new(2);
        board.insert(tile(&mut alloc, 2, (0, 1)));
        assert_eq!(board.empty_cells(), vec![(0, 0), (1, 0), (1, 1)]);
    }

    #[test]
    fn validate_catches_position_drift() {
        let mut alloc = TileIdAllocator::new();
        let mut board = Board::new(4);
        let t = tile(&mut alloc, 2, (0, 0));
        board.insert(t);
        // Corrupt the stored position behind the cell's back.
        board.tiles.get_mut(&t.id).unwrap().position = (2, 2);
        assert!(board.validate().is_err());
    }
}
