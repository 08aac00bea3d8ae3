//! Partial element updates.

use super::{Element, ImageSource};
use crate::element::ElementStyle;
use crate::interaction::Interaction;
use crate::puzzle::PuzzleConfig;
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

/// A set of optional field changes merged into an element.
///
/// Fields left `None` are untouched. Kind-specific fields (`content`, `image`,
/// `puzzle`) only apply to elements of a matching kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<ElementStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_hidden: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_inventory: Option<bool>,
    /// `Some(None)` clears the interaction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interaction: Option<Option<Interaction>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub puzzle: Option<PuzzleConfig>,
}

impl ElementPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_position(mut self, position: Point) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_layer(mut self, layer: i32) -> Self {
        self.layer = Some(layer);
        self
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = Some(rotation);
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn with_style(mut self, style: ElementStyle) -> Self {
        self.style = Some(style);
        self
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.is_hidden = Some(hidden);
        self
    }

    pub fn with_in_inventory(mut self, in_inventory: bool) -> Self {
        self.in_inventory = Some(in_inventory);
        self
    }

    pub fn with_interaction(mut self, interaction: Option<Interaction>) -> Self {
        self.interaction = Some(interaction);
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_image(mut self, image: ImageSource) -> Self {
        self.image = Some(image);
        self
    }

    pub fn with_puzzle(mut self, puzzle: PuzzleConfig) -> Self {
        self.puzzle = Some(puzzle);
        self
    }

    /// Check if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Element {
    /// Merge a patch into this element.
    pub fn apply_patch(&mut self, patch: &ElementPatch) {
        if let Some(position) = patch.position {
            self.position = position;
        }
        if let Some(size) = patch.size {
            self.size = Some(size);
        }
        if let Some(layer) = patch.layer {
            self.layer = layer;
        }
        if let Some(rotation) = patch.rotation {
            self.rotation = rotation;
        }
        if let Some(scale) = patch.scale {
            self.scale = scale;
        }
        if let Some(style) = &patch.style {
            self.style = style.clone();
        }
        if let Some(hidden) = patch.is_hidden {
            self.is_hidden = hidden;
        }
        if let Some(in_inventory) = patch.in_inventory {
            self.in_inventory = in_inventory;
        }
        if let Some(interaction) = &patch.interaction {
            self.interaction = interaction.clone();
        }

        if let Some(content) = &patch.content {
            use super::ElementKind::*;
            match &mut self.kind {
                Heading { content: c } | Subheading { content: c } | Paragraph { content: c } => {
                    *c = content.clone();
                }
                _ => log::debug!("Ignoring text content for {:?} element {}", self.element_type(), self.id),
            }
        }
        if let Some(image) = &patch.image {
            match self.kind.image_source_mut() {
                Some(source) => *source = image.clone(),
                None => log::debug!("Ignoring image source for {:?} element {}", self.element_type(), self.id),
            }
        }
        if let Some(puzzle) = &patch.puzzle {
            if !puzzle.clone().apply_to(&mut self.kind) {
                log::debug!("Ignoring puzzle config for {:?} element {}", self.element_type(), self.id);
            }
        }
    }
}
