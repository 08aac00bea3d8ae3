//! Play mode: interaction triggers, item combination and the puzzle modal.

use crate::editor::EditorStore;
use crate::element::ElementId;
use crate::interaction::{CombinationResult, CombinationType, Interaction, InteractionType};
use crate::puzzle::{PuzzleEvent, PuzzleSession};
use crate::schedule::{Deadline, Instant};
use std::collections::HashSet;

/// Side effect of a trigger that the host must present.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayEffect {
    /// A message overlay is now visible; see [`PlayEngine::message`].
    ShowMessage(String),
    /// Play the sound at this URL. Playback failures belong to the host.
    PlaySound(String),
    /// The puzzle modal for this element is open; see [`PlayEngine::puzzle`].
    OpenPuzzle(ElementId),
    /// The active canvas changed.
    Navigate { canvas_index: usize },
    /// Navigation target does not exist. Nothing changed.
    TargetNotFound(String),
    /// The element went into the inventory.
    Collected(ElementId),
}

/// Host-facing result of polling the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayNotice {
    MessageExpired,
    PuzzleClosed(ElementId),
}

#[derive(Debug, Clone)]
struct Overlay {
    text: String,
    expires: Deadline,
}

/// Evaluates interactions while the store is in game mode.
#[derive(Debug, Default)]
pub struct PlayEngine {
    overlay: Option<Overlay>,
    puzzle: Option<PuzzleSession>,
    consumed: HashSet<(ElementId, ElementId)>,
}

impl PlayEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text of the visible message overlay.
    pub fn message(&self) -> Option<&str> {
        self.overlay.as_ref().map(|o| o.text.as_str())
    }

    /// The open puzzle modal.
    pub fn puzzle(&self) -> Option<&PuzzleSession> {
        self.puzzle.as_ref()
    }

    /// The open puzzle modal, for player actions.
    pub fn puzzle_mut(&mut self) -> Option<&mut PuzzleSession> {
        self.puzzle.as_mut()
    }

    /// Whether a held item was already used on a target.
    pub fn is_consumed(&self, held: ElementId, target: ElementId) -> bool {
        self.consumed.contains(&(held, target))
    }

    /// Fire the interaction of a tapped element.
    ///
    /// Puzzle elements without an interaction of their own open their modal.
    pub fn trigger(&mut self, store: &mut EditorStore, id: ElementId, now: Instant) -> Option<PlayEffect> {
        if !store.is_game_mode() {
            return None;
        }
        let Some(element) = store.element(id) else {
            log::warn!("trigger: element {id} not found");
            return None;
        };
        let is_puzzle = element.is_puzzle();
        let interaction = element.interaction.clone().unwrap_or_default();
        log::debug!("Trigger {:?} on {id}", interaction.kind);

        match interaction.kind {
            InteractionType::None | InteractionType::Puzzle if is_puzzle => self.open_puzzle(store, id),
            InteractionType::None => None,
            InteractionType::Puzzle => {
                log::warn!("Element {id} has a puzzle interaction but is not a puzzle");
                None
            }
            InteractionType::Message => self.show_message(interaction.message, store, now),
            InteractionType::Sound => Self::sound(interaction.sound_url),
            InteractionType::CanvasNavigation => Self::navigate(store, interaction.target_canvas),
            InteractionType::AddToInventory => store.add_to_inventory(id).then_some(PlayEffect::Collected(id)),
        }
    }

    /// Drop a held inventory item onto an element.
    ///
    /// Fires the target's combination result when it accepts the item.
    /// Pairings are repeatable unless `single_use_combinations` is set.
    pub fn combine(
        &mut self,
        store: &mut EditorStore,
        held: ElementId,
        target: ElementId,
        now: Instant,
    ) -> Option<PlayEffect> {
        if !store.is_game_mode() {
            return None;
        }
        if !store.inventory().contains(held) {
            log::warn!("combine: {held} is not in the inventory");
            return None;
        }
        let result = store
            .element(target)
            .and_then(|e| e.interaction.as_ref())
            .filter(|i| i.accepts(held))
            .and_then(|i: &Interaction| i.combination_result.clone());
        let Some(result) = result else {
            log::debug!("{target} does not combine with {held}");
            return None;
        };

        let first_use = self.consumed.insert((held, target));
        if !first_use && store.config().single_use_combinations {
            log::debug!("Combination of {held} on {target} already used");
            return None;
        }
        log::info!("Combined {held} with {target}");
        self.combination_effect(store, target, result, now)
    }

    fn combination_effect(
        &mut self,
        store: &mut EditorStore,
        target: ElementId,
        result: CombinationResult,
        now: Instant,
    ) -> Option<PlayEffect> {
        match result.kind {
            CombinationType::Message => self.show_message(result.message, store, now),
            CombinationType::Sound => Self::sound(result.sound_url),
            CombinationType::CanvasNavigation => Self::navigate(store, result.target_canvas),
            CombinationType::Puzzle => self.open_puzzle(store, result.puzzle_element_id.unwrap_or(target)),
        }
    }

    fn show_message(&mut self, text: Option<String>, store: &EditorStore, now: Instant) -> Option<PlayEffect> {
        let Some(text) = text.filter(|t| !t.is_empty()) else {
            log::warn!("Message interaction without text");
            return None;
        };
        let mut expires = Deadline::new();
        expires.schedule(now, store.config().message_duration());
        self.overlay = Some(Overlay {
            text: text.clone(),
            expires,
        });
        Some(PlayEffect::ShowMessage(text))
    }

    fn sound(url: Option<String>) -> Option<PlayEffect> {
        match url.filter(|u| !u.is_empty()) {
            Some(url) => Some(PlayEffect::PlaySound(url)),
            None => {
                log::warn!("Sound interaction without a URL");
                None
            }
        }
    }

    fn navigate(store: &mut EditorStore, target: Option<String>) -> Option<PlayEffect> {
        let target = target.unwrap_or_default();
        match store.project().find_canvas(&target) {
            Some(canvas_index) => {
                store.set_active_canvas(canvas_index);
                log::info!("Navigated to canvas {canvas_index}");
                Some(PlayEffect::Navigate { canvas_index })
            }
            None => {
                log::warn!("Navigation target {target:?} not found");
                Some(PlayEffect::TargetNotFound(target))
            }
        }
    }

    fn open_puzzle(&mut self, store: &mut EditorStore, id: ElementId) -> Option<PlayEffect> {
        let element = store.element(id)?;
        let session = PuzzleSession::open(element, store.config())?;
        // Only one modal at a time
        self.close_puzzle(store);
        self.puzzle = Some(session);
        Some(PlayEffect::OpenPuzzle(id))
    }

    /// Close the puzzle modal, writing back any pending state.
    pub fn close_puzzle(&mut self, store: &mut EditorStore) -> Option<ElementId> {
        let mut session = self.puzzle.take()?;
        let events = session.close();
        Self::apply_puzzle_events(store, events);
        Some(session.element_id())
    }

    fn apply_puzzle_events(store: &mut EditorStore, events: Vec<PuzzleEvent>) -> bool {
        let mut closed = false;
        for event in events {
            match event {
                PuzzleEvent::Persist { element_id, patch } => {
                    store.update_element(element_id, &patch);
                }
                PuzzleEvent::Close => closed = true,
            }
        }
        closed
    }

    /// Advance timers: message expiry, puzzle write-back and auto-close.
    pub fn poll(&mut self, store: &mut EditorStore, now: Instant) -> Vec<PlayNotice> {
        let mut notices = Vec::new();
        if self.overlay.as_mut().is_some_and(|o| o.expires.poll(now)) {
            self.overlay = None;
            notices.push(PlayNotice::MessageExpired);
        }
        if let Some(session) = self.puzzle.as_mut() {
            let id = session.element_id();
            if Self::apply_puzzle_events(store, session.poll(now)) {
                self.puzzle = None;
                notices.push(PlayNotice::PuzzleClosed(id));
            }
        }
        notices
    }

    /// Drop transient play state, e.g. when leaving game mode.
    pub fn reset(&mut self, store: &mut EditorStore) {
        self.close_puzzle(store);
        self.overlay = None;
        self.consumed.clear();
    }
}
