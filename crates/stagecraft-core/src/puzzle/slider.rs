//! Slider puzzle: set N sliders to their target values, then check.

use super::{Puzzle, PuzzleConfig, PuzzleStatus, matches_solution};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SLIDER_COUNT: usize = 3;
pub const DEFAULT_MIN: i32 = 0;
pub const DEFAULT_MAX: i32 = 10;

fn default_min() -> i32 {
    DEFAULT_MIN
}

fn default_max() -> i32 {
    DEFAULT_MAX
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SliderPuzzleConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slider_count: usize,
    #[serde(default = "default_min")]
    pub min: i32,
    #[serde(default = "default_max")]
    pub max: i32,
    #[serde(default)]
    pub solution: Vec<i32>,
    #[serde(default)]
    pub current_state: Vec<i32>,
}

impl Default for SliderPuzzleConfig {
    fn default() -> Self {
        Self {
            name: "Sliders".to_string(),
            slider_count: DEFAULT_SLIDER_COUNT,
            min: DEFAULT_MIN,
            max: DEFAULT_MAX,
            solution: vec![DEFAULT_MIN; DEFAULT_SLIDER_COUNT],
            current_state: vec![DEFAULT_MIN; DEFAULT_SLIDER_COUNT],
        }
    }
}

impl SliderPuzzleConfig {
    /// Resize solution and current state together.
    pub fn set_slider_count(&mut self, count: usize) {
        self.slider_count = count;
        self.solution.resize(count, self.min);
        self.current_state.resize(count, self.min);
    }

    pub fn clamp(&self, value: i32) -> i32 {
        value.clamp(self.min, self.max.max(self.min))
    }
}

/// Slider puzzle being played.
///
/// Unlike the other variants, moving a slider never solves it. The player
/// has to ask for a [`SliderPuzzle::check`].
#[derive(Debug, Clone, PartialEq)]
pub struct SliderPuzzle {
    config: SliderPuzzleConfig,
    status: PuzzleStatus,
}

impl SliderPuzzle {
    pub fn new(mut config: SliderPuzzleConfig) -> Self {
        let count = config.solution.len();
        config.slider_count = count;
        config.current_state.resize(count, config.min);
        let (min, max) = (config.min, config.max.max(config.min));
        for value in &mut config.current_state {
            *value = (*value).clamp(min, max);
        }
        Self {
            config,
            status: PuzzleStatus::Unsolved,
        }
    }

    pub fn config(&self) -> &SliderPuzzleConfig {
        &self.config
    }

    pub fn values(&self) -> &[i32] {
        &self.config.current_state
    }

    /// Move a slider. Values are clamped to the configured range.
    pub fn set_value(&mut self, slider: usize, value: i32) {
        if self.is_solved() {
            return;
        }
        let value = self.config.clamp(value);
        if let Some(current) = self.config.current_state.get_mut(slider) {
            *current = value;
        }
    }

    /// Evaluate the current values against the solution.
    pub fn check(&mut self) -> PuzzleStatus {
        if matches_solution(&self.config.current_state, &self.config.solution) {
            log::info!("Slider puzzle '{}' solved", self.config.name);
            self.status = PuzzleStatus::Solved;
        }
        self.status
    }
}

impl Puzzle for SliderPuzzle {
    fn status(&self) -> PuzzleStatus {
        self.status
    }

    fn reset(&mut self) {
        let count = self.config.solution.len();
        self.config.current_state = vec![self.config.min; count];
        self.status = PuzzleStatus::Unsolved;
    }

    fn to_config(&self) -> PuzzleConfig {
        PuzzleConfig::Slider(self.config.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sliders(solution: Vec<i32>) -> SliderPuzzle {
        SliderPuzzle::new(SliderPuzzleConfig {
            slider_count: solution.len(),
            current_state: vec![0; solution.len()],
            solution,
            ..Default::default()
        })
    }

    #[test]
    fn test_only_solves_on_check() {
        let mut p = sliders(vec![3, 7]);
        p.set_value(0, 3);
        p.set_value(1, 7);
        assert_eq!(p.status(), PuzzleStatus::Unsolved);
        assert_eq!(p.check(), PuzzleStatus::Solved);
    }

    #[test]
    fn test_values_are_clamped() {
        let mut p = sliders(vec![10]);
        p.set_value(0, 42);
        assert_eq!(p.values(), &[10]);
        p.set_value(0, -5);
        assert_eq!(p.values(), &[0]);
        // Unknown slider index is ignored
        p.set_value(3, 5);
        assert_eq!(p.values(), &[0]);
    }

    #[test]
    fn test_wrong_check_stays_unsolved() {
        let mut p = sliders(vec![4]);
        p.set_value(0, 5);
        assert_eq!(p.check(), PuzzleStatus::Unsolved);
        p.reset();
        assert_eq!(p.values(), &[0]);
    }

    #[test]
    fn test_set_slider_count() {
        let mut config = SliderPuzzleConfig::default();
        config.set_slider_count(5);
        assert_eq!(config.solution.len(), 5);
        assert_eq!(config.current_state.len(), 5);
        config.set_slider_count(1);
        assert_eq!(config.solution, vec![0]);
    }
}
