use serde::{Deserialize, Serialize};

use super::tile::Tile;

/// One observable change during a move transaction.
///
/// A committed move produces `StartMove`, the slide/merge events line by
/// line, the spawn's `CreateTile`, then `EndMove`. The consumer must apply
/// them in that order; later events assume earlier ones already happened.
/// Serializes to the tagged shape the animation layer consumes, e.g.
/// `{"type":"MERGE_TILE","source":{...},"destination":{...}}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    /// Transaction begin. No payload.
    StartMove,
    /// A new tile appeared: post-move spawn or new-game seeding.
    CreateTile { tile: Tile },
    /// An existing tile changed position without merging.
    UpdateTile { tile: Tile },
    /// `source` slid into `destination`'s cell and was destroyed;
    /// `destination` carries the doubled value. `source`'s snapshot position
    /// is the merge cell, so the consumer can animate it there before
    /// dropping it.
    MergeTile { source: Tile, destination: Tile },
    /// Transaction end. No payload.
    EndMove,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tile::TileIdAllocator;

    #[test]
    fn actions_serialize_with_type_tags() {
        let mut alloc = TileIdAllocator::new();
        let tile = Tile::new(alloc.next_id(), 2, (0, 0));

        let json = serde_json::to_string(&Action::StartMove).unwrap();
        assert_eq!(json, r#"{"type":"START_MOVE"}"#);

        let json = serde_json::to_string(&Action::CreateTile { tile }).unwrap();
        assert!(json.starts_with(r#"{"type":"CREATE_TILE","tile":"#));

        let json = serde_json::to_string(&Action::MergeTile {
            source: tile,
            destination: tile,
        })
        .unwrap();
        assert!(json.starts_with(r#"{"type":"MERGE_TILE","source":"#));
    }

    #[test]
    fn actions_round_trip_through_json() {
        let mut alloc = TileIdAllocator::new();
        let tile = Tile::new(alloc.next_id(), 4, (2, 1));
        let action = Action::UpdateTile { tile };
        let json = serde_json::to_string(&action).unwrap();
        let back: Action = serde_json::from_str(&json).unwrap();
        assert_eq!(back, action);
    }
}
