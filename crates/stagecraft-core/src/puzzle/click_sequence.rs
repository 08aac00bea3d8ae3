//! Click-sequence puzzle: click images in the right order.

use super::{Puzzle, PuzzleConfig, PuzzleStatus, matches_solution};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickSequencePuzzleConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub images: Vec<String>,
    /// Image indices in the order they must be clicked.
    #[serde(default)]
    pub solution: Vec<usize>,
    /// Clicks so far.
    #[serde(default)]
    pub current_state: Vec<usize>,
}

impl ClickSequencePuzzleConfig {
    /// Append an image and its click to the end of the solution.
    pub fn add_image(&mut self, src: impl Into<String>) {
        let index = self.images.len();
        self.images.push(src.into());
        self.solution.push(index);
    }

    /// Remove an image; clicks on it leave the solution.
    pub fn remove_image(&mut self, index: usize) -> Option<String> {
        if index >= self.images.len() {
            return None;
        }
        let removed = self.images.remove(index);
        self.solution.retain(|&i| i != index);
        for i in &mut self.solution {
            if *i > index {
                *i -= 1;
            }
        }
        self.current_state.clear();
        Some(removed)
    }
}

/// Click-sequence puzzle being played.
#[derive(Debug, Clone, PartialEq)]
pub struct ClickSequencePuzzle {
    config: ClickSequencePuzzleConfig,
    status: PuzzleStatus,
}

impl ClickSequencePuzzle {
    pub fn new(mut config: ClickSequencePuzzleConfig) -> Self {
        // A saved partial run only counts if it is still a valid prefix
        if !config.solution.starts_with(&config.current_state) {
            config.current_state.clear();
        }
        Self {
            config,
            status: PuzzleStatus::Unsolved,
        }
    }

    pub fn config(&self) -> &ClickSequencePuzzleConfig {
        &self.config
    }

    /// Clicks accepted so far.
    pub fn progress(&self) -> &[usize] {
        &self.config.current_state
    }

    /// Register a click. A click that breaks the solution prefix silently
    /// clears the running sequence.
    pub fn click(&mut self, index: usize) -> PuzzleStatus {
        if self.is_solved() || index >= self.config.images.len() {
            return self.status;
        }
        self.config.current_state.push(index);
        if !self.config.solution.starts_with(&self.config.current_state) {
            log::debug!("Click sequence broken at image {index}, starting over");
            self.config.current_state.clear();
            return self.status;
        }
        if matches_solution(&self.config.current_state, &self.config.solution) {
            log::info!("Click-sequence puzzle '{}' solved", self.config.name);
            self.status = PuzzleStatus::Solved;
        }
        self.status
    }
}

impl Puzzle for ClickSequencePuzzle {
    fn status(&self) -> PuzzleStatus {
        self.status
    }

    fn reset(&mut self) {
        self.config.current_state.clear();
        self.status = PuzzleStatus::Unsolved;
    }

    fn to_config(&self) -> PuzzleConfig {
        PuzzleConfig::ClickSequence(self.config.clone())
    }
}
