//! Combination lock: placeholders cycle through a shared symbol set.

use super::{Puzzle, PuzzleConfig, PuzzleStatus, matches_solution, reindex_after_removal};
use serde::{Deserialize, Serialize};

/// Default number of placeholders on a new lock.
pub const DEFAULT_PLACEHOLDERS: usize = 3;

/// Symbol set the placeholders cycle through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LockMode {
    #[default]
    Images,
    /// Digits 0-9.
    Numbers,
    /// Letters A-Z.
    Letters,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockPuzzleConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mode: LockMode,
    #[serde(default)]
    pub images: Vec<String>,
    /// Symbol index per placeholder.
    #[serde(default)]
    pub solution: Vec<usize>,
    #[serde(default)]
    pub current_state: Vec<usize>,
}

impl Default for LockPuzzleConfig {
    fn default() -> Self {
        Self {
            name: "Lock".to_string(),
            mode: LockMode::Images,
            images: Vec::new(),
            solution: vec![0; DEFAULT_PLACEHOLDERS],
            current_state: vec![0; DEFAULT_PLACEHOLDERS],
        }
    }
}

impl LockPuzzleConfig {
    /// Number of symbols each placeholder can show.
    pub fn option_count(&self) -> usize {
        match self.mode {
            LockMode::Images => self.images.len(),
            LockMode::Numbers => 10,
            LockMode::Letters => 26,
        }
    }

    /// Display value for a symbol index: an image source, digit or letter.
    pub fn symbol(&self, index: usize) -> Option<String> {
        match self.mode {
            LockMode::Images => self.images.get(index).cloned(),
            LockMode::Numbers => (index < 10).then(|| index.to_string()),
            LockMode::Letters => (index < 26).then(|| char::from(b'A' + index as u8).to_string()),
        }
    }

    pub fn placeholder_count(&self) -> usize {
        self.solution.len()
    }

    /// Resize solution and current state together.
    pub fn set_placeholder_count(&mut self, count: usize) {
        self.solution.resize(count, 0);
        self.current_state.resize(count, 0);
    }

    pub fn add_image(&mut self, src: impl Into<String>) {
        self.images.push(src.into());
    }

    /// Remove an image, re-pointing any placeholder that referenced it.
    pub fn remove_image(&mut self, index: usize) -> Option<String> {
        if index >= self.images.len() {
            return None;
        }
        let removed = self.images.remove(index);
        reindex_after_removal(&mut self.solution, index);
        reindex_after_removal(&mut self.current_state, index);
        Some(removed)
    }
}

/// Lock puzzle being played.
#[derive(Debug, Clone, PartialEq)]
pub struct LockPuzzle {
    config: LockPuzzleConfig,
    status: PuzzleStatus,
}

impl LockPuzzle {
    pub fn new(mut config: LockPuzzleConfig) -> Self {
        let len = config.solution.len();
        config.current_state.resize(len, 0);
        let options = config.option_count();
        for value in &mut config.current_state {
            if *value >= options {
                *value = 0;
            }
        }
        Self {
            config,
            status: PuzzleStatus::Unsolved,
        }
    }

    pub fn config(&self) -> &LockPuzzleConfig {
        &self.config
    }

    pub fn current_state(&self) -> &[usize] {
        &self.config.current_state
    }

    /// Advance a placeholder to the next symbol, wrapping around.
    pub fn cycle(&mut self, slot: usize) -> PuzzleStatus {
        let options = self.config.option_count();
        self.update_slot(slot, |value| (value + 1) % options)
    }

    /// Step a placeholder back to the previous symbol, wrapping around.
    pub fn cycle_back(&mut self, slot: usize) -> PuzzleStatus {
        let options = self.config.option_count();
        self.update_slot(slot, |value| (value + options - 1) % options)
    }

    /// Set a placeholder to a specific symbol.
    pub fn select(&mut self, slot: usize, symbol: usize) -> PuzzleStatus {
        if symbol >= self.config.option_count() {
            return self.status;
        }
        self.update_slot(slot, |_| symbol)
    }

    fn update_slot(&mut self, slot: usize, f: impl FnOnce(usize) -> usize) -> PuzzleStatus {
        if self.is_solved() || self.config.option_count() == 0 {
            return self.status;
        }
        let Some(value) = self.config.current_state.get_mut(slot) else {
            return self.status;
        };
        *value = f(*value);
        self.evaluate()
    }

    fn evaluate(&mut self) -> PuzzleStatus {
        if matches_solution(&self.config.current_state, &self.config.solution) {
            log::info!("Lock puzzle '{}' solved", self.config.name);
            self.status = PuzzleStatus::Solved;
        }
        self.status
    }
}

impl Puzzle for LockPuzzle {
    fn status(&self) -> PuzzleStatus {
        self.status
    }

    fn reset(&mut self) {
        let len = self.config.solution.len();
        self.config.current_state = vec![0; len];
        self.status = PuzzleStatus::Unsolved;
    }

    fn to_config(&self) -> PuzzleConfig {
        PuzzleConfig::Lock(self.config.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_lock(solution: Vec<usize>) -> LockPuzzle {
        LockPuzzle::new(LockPuzzleConfig {
            images: vec!["a".into(), "b".into(), "c".into()],
            current_state: vec![0; solution.len()],
            solution,
            ..Default::default()
        })
    }

    #[test]
    fn test_cycle_to_solution() {
        let mut lock = image_lock(vec![1, 2]);
        assert_eq!(lock.cycle(0), PuzzleStatus::Unsolved);
        assert_eq!(lock.cycle(1), PuzzleStatus::Unsolved);
        assert_eq!(lock.cycle(1), PuzzleStatus::Solved);
        // Terminal until reset
        assert_eq!(lock.cycle(0), PuzzleStatus::Solved);
        assert_eq!(lock.current_state(), &[1, 2]);
    }

    #[test]
    fn test_cycle_wraps_both_ways() {
        let mut lock = image_lock(vec![2, 2]);
        lock.cycle_back(0);
        assert_eq!(lock.current_state(), &[2, 0]);
        lock.cycle(0);
        assert_eq!(lock.current_state(), &[0, 0]);
    }

    #[test]
    fn test_zero_images_never_solves() {
        let mut lock = LockPuzzle::new(LockPuzzleConfig::default());
        assert_eq!(lock.cycle(0), PuzzleStatus::Unsolved);
        assert_eq!(lock.select(0, 0), PuzzleStatus::Unsolved);
    }

    #[test]
    fn test_letters_mode() {
        let config = LockPuzzleConfig {
            mode: LockMode::Letters,
            solution: vec![2],
            current_state: vec![0],
            ..Default::default()
        };
        assert_eq!(config.symbol(2).as_deref(), Some("C"));
        assert_eq!(config.symbol(26), None);
        let mut lock = LockPuzzle::new(config);
        assert_eq!(lock.select(0, 2), PuzzleStatus::Solved);
        lock.reset();
        assert_eq!(lock.status(), PuzzleStatus::Unsolved);
        assert_eq!(lock.current_state(), &[0]);
    }

    #[test]
    fn test_remove_image_reindexes() {
        let mut config = LockPuzzleConfig {
            images: vec!["a".into(), "b".into(), "c".into()],
            solution: vec![2, 1, 0],
            current_state: vec![1, 2, 2],
            ..Default::default()
        };
        assert_eq!(config.remove_image(1).as_deref(), Some("b"));
        assert_eq!(config.solution, vec![1, 0, 0]);
        assert_eq!(config.current_state, vec![0, 1, 1]);
        assert!(config.solution.iter().all(|&i| i < config.images.len()));

        config.set_placeholder_count(5);
        assert_eq!(config.solution.len(), 5);
        assert_eq!(config.current_state.len(), 5);
    }

    #[test]
    fn test_mismatched_lengths_are_normalized() {
        let lock = LockPuzzle::new(LockPuzzleConfig {
            mode: LockMode::Numbers,
            solution: vec![1, 2, 3],
            current_state: vec![9],
            ..Default::default()
        });
        assert_eq!(lock.current_state(), &[9, 0, 0]);
    }
}
