//! Serializable snapshots of a frame's placement state.
//!
//! A snapshot captures the transform and OBB arenas together with each
//! entry's ranges, for diagnostics and regression capture. Round-tripping a
//! snapshot reproduces the exact same boxes.

use std::io::{Read, Write};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geometry::Obb;

use super::transform::Range;

/// Arena ranges of one placed entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntrySnapshot {
    pub transform: Range,
    pub obbs: Range,
}

/// Frozen placement state of one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementSnapshot {
    pub transforms: Vec<Vec2>,
    pub obbs: Vec<Obb>,
    pub entries: Vec<EntrySnapshot>,
}

impl PlacementSnapshot {
    /// The screen-transform slice of entry `i`.
    pub fn entry_transform(&self, i: usize) -> &[Vec2] {
        let r = self.entries[i].transform;
        &self.transforms[r.start..r.end()]
    }

    /// The OBB slice of entry `i`.
    pub fn entry_obbs(&self, i: usize) -> &[Obb] {
        let r = self.entries[i].obbs;
        &self.obbs[r.start..r.end()]
    }

    pub fn write_json<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    pub fn read_json<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_round_trip() {
        let snapshot = PlacementSnapshot {
            transforms: vec![Vec2::new(400.0, 300.0), Vec2::new(1.0, 0.0)],
            obbs: vec![Obb::new(Vec2::new(400.0, 300.0), Vec2::X, Vec2::new(50.0, 15.0))],
            entries: vec![EntrySnapshot {
                transform: Range { start: 0, len: 2 },
                obbs: Range { start: 0, len: 1 },
            }],
        };

        let mut bytes = Vec::new();
        snapshot.write_json(&mut bytes).unwrap();
        let restored = PlacementSnapshot::read_json(bytes.as_slice()).unwrap();

        assert_eq!(snapshot, restored);
        assert_eq!(restored.entry_obbs(0), snapshot.entry_obbs(0));
        assert_eq!(restored.entry_transform(0).len(), 2);
    }
}
