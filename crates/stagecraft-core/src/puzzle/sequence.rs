//! Ordering puzzle: drag images into the right order.

use super::{Puzzle, PuzzleConfig, PuzzleStatus, matches_solution};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Shuffle attempts before falling back to a rotation.
const MAX_SHUFFLE_ATTEMPTS: usize = 16;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequencePuzzleConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub images: Vec<String>,
    /// Image indices in the winning order.
    #[serde(default)]
    pub solution: Vec<usize>,
    /// Image indices in the order currently shown.
    #[serde(default)]
    pub current_state: Vec<usize>,
}

impl SequencePuzzleConfig {
    pub fn piece_count(&self) -> usize {
        self.images.len()
    }

    /// Append an image; it goes last in both the solution and current order.
    pub fn add_image(&mut self, src: impl Into<String>) {
        let index = self.images.len();
        self.images.push(src.into());
        self.solution.push(index);
        self.current_state.push(index);
    }

    /// Remove an image and drop it from both orders.
    pub fn remove_image(&mut self, index: usize) -> Option<String> {
        if index >= self.images.len() {
            return None;
        }
        let removed = self.images.remove(index);
        for order in [&mut self.solution, &mut self.current_state] {
            order.retain(|&i| i != index);
            for i in order.iter_mut() {
                if *i > index {
                    *i -= 1;
                }
            }
        }
        Some(removed)
    }
}

/// Sequence puzzle being played.
#[derive(Debug, Clone, PartialEq)]
pub struct SequencePuzzle {
    config: SequencePuzzleConfig,
    status: PuzzleStatus,
}

impl SequencePuzzle {
    pub fn new(mut config: SequencePuzzleConfig) -> Self {
        if config.current_state.len() != config.solution.len() {
            config.current_state = (0..config.solution.len()).collect();
        }
        Self {
            config,
            status: PuzzleStatus::Unsolved,
        }
    }

    pub fn config(&self) -> &SequencePuzzleConfig {
        &self.config
    }

    pub fn current_order(&self) -> &[usize] {
        &self.config.current_state
    }

    /// Replace the whole order. Ignored if the length differs.
    pub fn set_order(&mut self, order: Vec<usize>) -> PuzzleStatus {
        if self.is_solved() || order.len() != self.config.solution.len() {
            return self.status;
        }
        self.config.current_state = order;
        self.evaluate()
    }

    /// Move the piece at `from` so it ends up at `to`.
    pub fn move_item(&mut self, from: usize, to: usize) -> PuzzleStatus {
        let len = self.config.current_state.len();
        if self.is_solved() || from >= len || to >= len {
            return self.status;
        }
        let piece = self.config.current_state.remove(from);
        self.config.current_state.insert(to, piece);
        self.evaluate()
    }

    pub fn swap(&mut self, a: usize, b: usize) -> PuzzleStatus {
        let len = self.config.current_state.len();
        if self.is_solved() || a >= len || b >= len {
            return self.status;
        }
        self.config.current_state.swap(a, b);
        self.evaluate()
    }

    /// Randomize the order and clear the solved state.
    ///
    /// With more than one piece the result never equals the solution.
    pub fn reshuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let order = &mut self.config.current_state;
        order.shuffle(rng);
        if order.len() > 1 {
            let mut attempts = 1;
            while *order == self.config.solution && attempts < MAX_SHUFFLE_ATTEMPTS {
                order.shuffle(rng);
                attempts += 1;
            }
            if *order == self.config.solution {
                order.rotate_left(1);
            }
        }
        self.status = PuzzleStatus::Unsolved;
    }

    fn evaluate(&mut self) -> PuzzleStatus {
        if matches_solution(&self.config.current_state, &self.config.solution) {
            log::info!("Sequence puzzle '{}' solved", self.config.name);
            self.status = PuzzleStatus::Solved;
        }
        self.status
    }
}

impl Puzzle for SequencePuzzle {
    fn status(&self) -> PuzzleStatus {
        self.status
    }

    fn reset(&mut self) {
        self.config.current_state = (0..self.config.solution.len()).collect();
        self.status = PuzzleStatus::Unsolved;
    }

    fn to_config(&self) -> PuzzleConfig {
        PuzzleConfig::Sequence(self.config.clone())
    }
}
