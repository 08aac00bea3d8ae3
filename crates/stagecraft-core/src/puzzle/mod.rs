//! Puzzle state machines.
//!
//! All four variants share one rule: a puzzle is solved when its current
//! state equals its solution element-wise. Solved is terminal until
//! [`Puzzle::reset`]. Empty or mismatched configurations never solve.

mod click_sequence;
mod lock;
mod sequence;
mod session;
mod slider;

pub use click_sequence::{ClickSequencePuzzle, ClickSequencePuzzleConfig};
pub use lock::{LockMode, LockPuzzle, LockPuzzleConfig};
pub use sequence::{SequencePuzzle, SequencePuzzleConfig};
pub use session::{PuzzleEvent, PuzzleSession};
pub use slider::{SliderPuzzle, SliderPuzzleConfig};

use crate::element::{Element, ElementKind};
use serde::{Deserialize, Serialize};

/// Solve state of a puzzle instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PuzzleStatus {
    #[default]
    Unsolved,
    Solved,
}

/// Element-wise comparison used by every variant.
pub fn matches_solution<T: PartialEq>(current: &[T], solution: &[T]) -> bool {
    !solution.is_empty() && current == solution
}

/// Shared puzzle behavior.
pub trait Puzzle {
    fn status(&self) -> PuzzleStatus;

    fn is_solved(&self) -> bool {
        self.status() == PuzzleStatus::Solved
    }

    /// Back to unsolved with a fresh current state.
    fn reset(&mut self);

    /// Configuration including the current state, for writing back.
    fn to_config(&self) -> PuzzleConfig;
}

/// Persisted configuration of any puzzle variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "variant", content = "config", rename_all = "camelCase")]
pub enum PuzzleConfig {
    Lock(LockPuzzleConfig),
    Sequence(SequencePuzzleConfig),
    ClickSequence(ClickSequencePuzzleConfig),
    Slider(SliderPuzzleConfig),
}

impl PuzzleConfig {
    /// Extract the puzzle configuration from an element kind.
    pub fn from_kind(kind: &ElementKind) -> Option<Self> {
        match kind {
            ElementKind::Puzzle { puzzle_config } => Some(Self::Lock(puzzle_config.clone())),
            ElementKind::SequencePuzzle {
                sequence_puzzle_config,
            } => Some(Self::Sequence(sequence_puzzle_config.clone())),
            ElementKind::ClickSequencePuzzle {
                click_sequence_puzzle_config,
            } => Some(Self::ClickSequence(click_sequence_puzzle_config.clone())),
            ElementKind::SliderPuzzle {
                slider_puzzle_config,
            } => Some(Self::Slider(slider_puzzle_config.clone())),
            _ => None,
        }
    }

    /// Store this configuration into a matching element kind.
    ///
    /// Returns `false` and leaves the kind untouched on a variant mismatch.
    pub fn apply_to(self, kind: &mut ElementKind) -> bool {
        match (self, kind) {
            (Self::Lock(config), ElementKind::Puzzle { puzzle_config }) => {
                *puzzle_config = config;
            }
            (
                Self::Sequence(config),
                ElementKind::SequencePuzzle {
                    sequence_puzzle_config,
                },
            ) => *sequence_puzzle_config = config,
            (
                Self::ClickSequence(config),
                ElementKind::ClickSequencePuzzle {
                    click_sequence_puzzle_config,
                },
            ) => *click_sequence_puzzle_config = config,
            (
                Self::Slider(config),
                ElementKind::SliderPuzzle {
                    slider_puzzle_config,
                },
            ) => *slider_puzzle_config = config,
            _ => return false,
        }
        true
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Lock(c) => &c.name,
            Self::Sequence(c) => &c.name,
            Self::ClickSequence(c) => &c.name,
            Self::Slider(c) => &c.name,
        }
    }
}

/// Runtime puzzle of any variant.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyPuzzle {
    Lock(LockPuzzle),
    Sequence(SequencePuzzle),
    ClickSequence(ClickSequencePuzzle),
    Slider(SliderPuzzle),
}

impl AnyPuzzle {
    pub fn from_config(config: PuzzleConfig) -> Self {
        match config {
            PuzzleConfig::Lock(c) => Self::Lock(LockPuzzle::new(c)),
            PuzzleConfig::Sequence(c) => Self::Sequence(SequencePuzzle::new(c)),
            PuzzleConfig::ClickSequence(c) => Self::ClickSequence(ClickSequencePuzzle::new(c)),
            PuzzleConfig::Slider(c) => Self::Slider(SliderPuzzle::new(c)),
        }
    }

    pub fn from_element(element: &Element) -> Option<Self> {
        PuzzleConfig::from_kind(&element.kind).map(Self::from_config)
    }

    fn inner(&self) -> &dyn Puzzle {
        match self {
            Self::Lock(p) => p,
            Self::Sequence(p) => p,
            Self::ClickSequence(p) => p,
            Self::Slider(p) => p,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Puzzle {
        match self {
            Self::Lock(p) => p,
            Self::Sequence(p) => p,
            Self::ClickSequence(p) => p,
            Self::Slider(p) => p,
        }
    }
}

impl Puzzle for AnyPuzzle {
    fn status(&self) -> PuzzleStatus {
        self.inner().status()
    }

    fn reset(&mut self) {
        self.inner_mut().reset();
    }

    fn to_config(&self) -> PuzzleConfig {
        self.inner().to_config()
    }
}

/// Re-index a list of image indices after the image at `removed` is deleted.
///
/// References to the removed image fall back to `0`, later ones shift down.
pub(crate) fn reindex_after_removal(indices: &mut [usize], removed: usize) {
    for index in indices.iter_mut() {
        if *index == removed {
            *index = 0;
        } else if *index > removed {
            *index -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementType;

    #[test]
    fn test_matches_solution() {
        assert!(matches_solution(&[1, 2], &[1, 2]));
        assert!(!matches_solution(&[1, 2], &[2, 1]));
        assert!(!matches_solution(&[1], &[1, 2]));
        assert!(!matches_solution::<usize>(&[], &[]));
    }

    #[test]
    fn test_config_roundtrip_through_kind() {
        let element = Element::new(ElementType::SliderPuzzle);
        let config = PuzzleConfig::from_kind(&element.kind).unwrap();
        assert!(matches!(config, PuzzleConfig::Slider(_)));

        let mut rect = Element::new(ElementType::Rectangle);
        assert!(!config.apply_to(&mut rect.kind));
        assert!(PuzzleConfig::from_kind(&rect.kind).is_none());
    }

    #[test]
    fn test_any_puzzle_from_element() {
        let element = Element::new(ElementType::Puzzle);
        let puzzle = AnyPuzzle::from_element(&element).unwrap();
        assert!(matches!(puzzle, AnyPuzzle::Lock(_)));
        assert_eq!(puzzle.status(), PuzzleStatus::Unsolved);
    }

    #[test]
    fn test_reindex_after_removal() {
        let mut indices = vec![0, 1, 2, 3];
        reindex_after_removal(&mut indices, 1);
        assert_eq!(indices, vec![0, 0, 1, 2]);
    }
}
