//! One opening of a puzzle modal.

use super::{AnyPuzzle, Puzzle, PuzzleConfig, PuzzleStatus};
use crate::config::EditorConfig;
use crate::element::{Element, ElementId, ElementPatch};
use crate::schedule::{Deadline, Debouncer, Duration, Instant};

/// Something the host must act on after polling a session.
#[derive(Debug, Clone, PartialEq)]
pub enum PuzzleEvent {
    /// Write the puzzle state back to its element (committed update).
    Persist { element_id: ElementId, patch: ElementPatch },
    /// Hide the puzzle modal.
    Close,
}

/// Wraps a puzzle while its modal is open.
///
/// Every state change restarts a debounced write-back. Solving schedules the
/// modal to close after a delay so the success state stays visible.
#[derive(Debug, Clone)]
pub struct PuzzleSession {
    element_id: ElementId,
    puzzle: AnyPuzzle,
    persist: Debouncer<PuzzleConfig>,
    close: Deadline,
    close_delay: Duration,
    closed: bool,
}

impl PuzzleSession {
    /// Open a session for a puzzle element. Returns `None` for other kinds.
    pub fn open(element: &Element, config: &EditorConfig) -> Option<Self> {
        let puzzle = AnyPuzzle::from_element(element)?;
        log::debug!("Opening puzzle session for {}", element.id);
        Some(Self {
            element_id: element.id,
            puzzle,
            persist: Debouncer::new(config.persist_debounce()),
            close: Deadline::new(),
            close_delay: config.solve_close_delay(),
            closed: false,
        })
    }

    pub fn element_id(&self) -> ElementId {
        self.element_id
    }

    pub fn puzzle(&self) -> &AnyPuzzle {
        &self.puzzle
    }

    pub fn status(&self) -> PuzzleStatus {
        self.puzzle.status()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Run a player action against the puzzle.
    pub fn update<R>(&mut self, now: Instant, action: impl FnOnce(&mut AnyPuzzle) -> R) -> R {
        let before = self.puzzle.to_config();
        let was_solved = self.puzzle.is_solved();
        let result = action(&mut self.puzzle);
        if self.closed {
            return result;
        }

        let after = self.puzzle.to_config();
        if after != before {
            self.persist.call(after, now);
        }
        if !was_solved && self.puzzle.is_solved() {
            log::info!("Puzzle {} solved, closing in {:?}", self.element_id, self.close_delay);
            self.close.schedule(now, self.close_delay);
        } else if was_solved && !self.puzzle.is_solved() {
            self.close.cancel();
        }
        result
    }

    /// Reset the puzzle to a fresh unsolved state.
    pub fn reset(&mut self, now: Instant) {
        self.update(now, |puzzle| puzzle.reset());
    }

    /// Collect due events.
    pub fn poll(&mut self, now: Instant) -> Vec<PuzzleEvent> {
        let mut events = Vec::new();
        if self.closed {
            return events;
        }
        if self.close.poll(now) {
            return self.close();
        }
        if let Some(config) = self.persist.poll(now) {
            events.push(self.persist_event(config));
        }
        events
    }

    /// Close now, flushing any pending write-back first.
    pub fn close(&mut self) -> Vec<PuzzleEvent> {
        if self.closed {
            return Vec::new();
        }
        self.closed = true;
        self.close.cancel();
        let mut events = Vec::new();
        if let Some(config) = self.persist.flush() {
            events.push(self.persist_event(config));
        }
        events.push(PuzzleEvent::Close);
        events
    }

    fn persist_event(&self, config: PuzzleConfig) -> PuzzleEvent {
        PuzzleEvent::Persist {
            element_id: self.element_id,
            patch: ElementPatch::new().with_puzzle(config),
        }
    }
}
