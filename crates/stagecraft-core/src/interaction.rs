//! Declarative play-mode triggers attached to elements.

use crate::element::ElementId;
use serde::{Deserialize, Serialize};

/// What happens when an element is tapped in play mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InteractionType {
    #[default]
    None,
    Message,
    Sound,
    Puzzle,
    CanvasNavigation,
    AddToInventory,
}

/// Effect fired when a held inventory item is dropped on a compatible element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CombinationType {
    Message,
    Sound,
    CanvasNavigation,
    Puzzle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinationResult {
    #[serde(rename = "type")]
    pub kind: CombinationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound_url: Option<String>,
    /// Target canvas id or name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_canvas: Option<String>,
    /// Puzzle element to open; defaults to the drop target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub puzzle_element_id: Option<ElementId>,
}

impl CombinationResult {
    pub fn message(text: impl Into<String>) -> Self {
        Self {
            kind: CombinationType::Message,
            message: Some(text.into()),
            sound_url: None,
            target_canvas: None,
            puzzle_element_id: None,
        }
    }

    pub fn navigate(target: impl Into<String>) -> Self {
        Self {
            kind: CombinationType::CanvasNavigation,
            message: None,
            sound_url: None,
            target_canvas: Some(target.into()),
            puzzle_element_id: None,
        }
    }
}

/// Trigger descriptor.
///
/// Only the fields relevant to `kind` are read. Fields left over from a
/// previous kind are kept as-is so switching back restores them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    #[serde(rename = "type")]
    pub kind: InteractionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound_url: Option<String>,
    /// Target canvas id or name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_canvas: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combination_result: Option<CombinationResult>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub can_combine_with: Vec<ElementId>,
}

impl Interaction {
    pub fn message(text: impl Into<String>) -> Self {
        Self {
            kind: InteractionType::Message,
            message: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn sound(url: impl Into<String>) -> Self {
        Self {
            kind: InteractionType::Sound,
            sound_url: Some(url.into()),
            ..Self::default()
        }
    }

    pub fn puzzle() -> Self {
        Self {
            kind: InteractionType::Puzzle,
            ..Self::default()
        }
    }

    pub fn navigate(target: impl Into<String>) -> Self {
        Self {
            kind: InteractionType::CanvasNavigation,
            target_canvas: Some(target.into()),
            ..Self::default()
        }
    }

    pub fn add_to_inventory() -> Self {
        Self {
            kind: InteractionType::AddToInventory,
            ..Self::default()
        }
    }

    /// Allow combining with `item`, firing `result`.
    pub fn with_combination(mut self, item: ElementId, result: CombinationResult) -> Self {
        if !self.can_combine_with.contains(&item) {
            self.can_combine_with.push(item);
        }
        self.combination_result = Some(result);
        self
    }

    /// Check whether a held item can be dropped onto this element.
    pub fn accepts(&self, item: ElementId) -> bool {
        self.combination_result.is_some() && self.can_combine_with.contains(&item)
    }
}
