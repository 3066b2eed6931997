use serde::{Deserialize, Serialize};

use super::board::Board;
use super::event::Action;
use super::tile::TileId;

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
}

/// Slide every line toward `dir`, applying pairwise merges, and append the
/// resulting `UpdateTile`/`MergeTile` events to `events` in line order.
/// Tiles that end up where they started emit nothing. Returns whether
/// anything on the board changed.
pub(crate) fn slide(board: &mut Board, dir: Direction, events: &mut Vec<Action>) -> bool {
    let mut changed = false;
    for line in 0..board.size() {
        changed |= slide_line(board, &line_cells(board.size(), dir, line), events);
    }
    changed
}

/// True if some direction would change the board. The derived game-over
/// query is the negation.
pub(crate) fn any_move_possible(board: &Board) -> bool {
    if board.count_empty() > 0 {
        return board.tile_count() > 0;
    }
    // Full board: a move is possible iff two equal tiles are adjacent.
    let size = board.size();
    for row in 0..size {
        for col in 0..size {
            let value = board.tile_at(row, col).map(|t| t.value);
            if col + 1 < size && value == board.tile_at(row, col + 1).map(|t| t.value) {
                return true;
            }
            if row + 1 < size && value == board.tile_at(row + 1, col).map(|t| t.value) {
                return true;
            }
        }
    }
    false
}

/// Cells of one row/column, ordered from the edge the move pushes toward.
fn line_cells(size: usize, dir: Direction, line: usize) -> Vec<(usize, usize)> {
    match dir {
        Direction::Left => (0..size).map(|col| (line, col)).collect(),
        Direction::Right => (0..size).rev().map(|col| (line, col)).collect(),
        Direction::Up => (0..size).map(|row| (row, line)).collect(),
        Direction::Down => (0..size).rev().map(|row| (row, line)).collect(),
    }
}

/// One pass over a single line, near edge to far edge.
///
/// `cells[0]` is the near edge. A write cursor tracks the next placement
/// slot; the last placed tile carries a merged flag so a third equal tile
/// cannot join an earlier merge in the same pass. The earliest two tiles in
/// slide order merge first, which is what makes `[4, 2, 2, 4]` come out as
/// `[4, 4, 4, _]` on a left move.
fn slide_line(board: &mut Board, cells: &[(usize, usize)], events: &mut Vec<Action>) -> bool {
    let mut changed = false;
    let mut write = 0usize;
    let mut last_placed: Option<TileId> = None;
    let mut last_merged = false;

    for &cell in cells {
        let Some(&tile) = board.tile_at(cell.0, cell.1) else {
            continue;
        };

        let mergeable = !last_merged
            && last_placed
                .and_then(|id| board.tile(id))
                .is_some_and(|dst| dst.value == tile.value);

        if let Some(dst_id) = last_placed.filter(|_| mergeable) {
            // Merge: current tile is the source, the last placed tile the
            // destination. The source retires; its snapshot carries the
            // merge cell as its final position.
            let merge_cell = cells[write - 1];
            let mut source = board.remove(tile.id).expect("source tile is live");
            source.position = merge_cell;
            board.set_value(dst_id, tile.value * 2);
            let destination = *board.tile(dst_id).expect("destination tile is live");
            events.push(Action::MergeTile {
                source,
                destination,
            });
            last_merged = true;
            changed = true;
        } else {
            let target = cells[write];
            if target != tile.position {
                board.relocate(tile.id, target);
                let moved = *board.tile(tile.id).expect("placed tile is live");
                events.push(Action::UpdateTile { tile: moved });
                changed = true;
            }
            last_placed = Some(tile.id);
            last_merged = false;
            write += 1;
        }
    }
    changed
}
