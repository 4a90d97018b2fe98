use crate::grid::Grid;
use crate::overlay::{can_overlay, grids_equal, overlay_grids, SELECTION_SIZE};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Difficulty tier of a puzzle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Get all difficulties, easiest first
    pub fn all() -> &'static [Difficulty] {
        &[Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]
    }

    /// Lowercase key used in data files and URLs
    pub fn key(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Brief description shown on the difficulty picker
    pub fn blurb(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Single-color layers",
            Difficulty::Medium => "More decoys",
            Difficulty::Hard => "Mixed-color layers",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "Easy"),
            Difficulty::Medium => write!(f, "Medium"),
            Difficulty::Hard => write!(f, "Hard"),
        }
    }
}

/// Error for an unrecognized difficulty name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown difficulty {0:?} (expected easy, medium or hard)")]
pub struct ParseDifficultyError(pub String);

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ParseDifficultyError(s.to_string())),
        }
    }
}

/// Opaque puzzle identifier.
///
/// Stores and data files are not always consistent about whether ids are
/// strings or numbers, so deserialization accepts either and keeps the
/// string form. Two ids are equal iff their strings are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PuzzleId(String);

impl PuzzleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PuzzleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PuzzleId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for PuzzleId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<u64> for PuzzleId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl<'de> Deserialize<'de> for PuzzleId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Unsigned(u64),
            Signed(i64),
            Float(f64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => PuzzleId(s),
            RawId::Unsigned(n) => PuzzleId(n.to_string()),
            RawId::Signed(n) => PuzzleId(n.to_string()),
            RawId::Float(n) => PuzzleId(n.to_string()),
        })
    }
}

/// Authoring errors found by [`Puzzle::validate`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PuzzleError {
    #[error("puzzle {id} has {count} candidate grids, at least 3 required")]
    TooFewGrids { id: PuzzleId, count: usize },

    #[error("puzzle {id} solution index {index} is out of range ({count} grids)")]
    IndexOutOfRange {
        id: PuzzleId,
        index: usize,
        count: usize,
    },

    #[error("puzzle {id} repeats solution index {index}")]
    DuplicateIndex { id: PuzzleId, index: usize },

    #[error("puzzle {id} solution grids {first} and {second} overlap")]
    OverlappingSolution {
        id: PuzzleId,
        first: usize,
        second: usize,
    },

    #[error("puzzle {id} solution does not reproduce its target")]
    TargetMismatch { id: PuzzleId },
}

/// A hand-authored puzzle: a target and the candidate grids to build it from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Puzzle {
    pub id: PuzzleId,
    pub difficulty: Difficulty,
    pub target: Grid,
    pub available_grids: Vec<Grid>,
    pub solution_indices: [usize; SELECTION_SIZE],
}

impl Puzzle {
    /// Grids at the given indices; out-of-range indices are skipped
    pub fn grids_at(&self, indices: &[usize]) -> Vec<Grid> {
        indices
            .iter()
            .filter_map(|&i| self.available_grids.get(i).copied())
            .collect()
    }

    /// The authored solution grids
    pub fn solution_grids(&self) -> Vec<Grid> {
        self.grids_at(&self.solution_indices)
    }

    /// Check the authoring invariants: enough candidates, three distinct
    /// in-range solution indices, pairwise-compatible solution grids, and a
    /// solution overlay equal to the target.
    pub fn validate(&self) -> Result<(), PuzzleError> {
        let count = self.available_grids.len();
        if count < SELECTION_SIZE {
            return Err(PuzzleError::TooFewGrids {
                id: self.id.clone(),
                count,
            });
        }

        for (i, &index) in self.solution_indices.iter().enumerate() {
            if index >= count {
                return Err(PuzzleError::IndexOutOfRange {
                    id: self.id.clone(),
                    index,
                    count,
                });
            }
            if self.solution_indices[..i].contains(&index) {
                return Err(PuzzleError::DuplicateIndex {
                    id: self.id.clone(),
                    index,
                });
            }
        }

        let [a, b, c] = self.solution_indices;
        for (first, second) in [(a, b), (a, c), (b, c)] {
            if !can_overlay(&self.available_grids[first], &self.available_grids[second]) {
                return Err(PuzzleError::OverlappingSolution {
                    id: self.id.clone(),
                    first,
                    second,
                });
            }
        }

        if !grids_equal(&overlay_grids(&self.solution_grids()), &self.target) {
            return Err(PuzzleError::TargetMismatch {
                id: self.id.clone(),
            });
        }

        Ok(())
    }
}
