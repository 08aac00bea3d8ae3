//! Element definitions for canvases.

mod image;
mod patch;
mod style;

pub use image::{ImageFormat, ImageSource, decode_data_url, encode_data_url, fit_within};
pub use patch::ElementPatch;
pub use style::{ElementStyle, SerializableColor, parse_hex_color};

use crate::interaction::Interaction;
use crate::puzzle::{
    ClickSequencePuzzleConfig, LockPuzzleConfig, SequencePuzzleConfig, SliderPuzzleConfig,
};
use kurbo::{Affine, BezPath, Ellipse, Point, Rect, Shape as KurboShape, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for elements. Never reused, survives canvas moves.
pub type ElementId = Uuid;

/// Layer reserved for the canvas background.
pub const BACKGROUND_LAYER: i32 = 0;

/// Where new elements land when the caller does not say otherwise.
pub const DEFAULT_POSITION: Point = Point::new(100.0, 100.0);

/// Element type discriminant, used when creating elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementType {
    Rectangle,
    Circle,
    Triangle,
    Line,
    Heading,
    Subheading,
    Paragraph,
    Image,
    Puzzle,
    SequencePuzzle,
    ClickSequencePuzzle,
    SliderPuzzle,
    Background,
}

impl ElementType {
    /// Default display size for a freshly created element.
    pub fn default_size(self) -> Option<Size> {
        let size = match self {
            ElementType::Rectangle => Size::new(150.0, 100.0),
            ElementType::Circle | ElementType::Triangle => Size::new(100.0, 100.0),
            ElementType::Line => Size::new(200.0, 4.0),
            ElementType::Heading => Size::new(300.0, 60.0),
            ElementType::Subheading => Size::new(300.0, 44.0),
            ElementType::Paragraph => Size::new(300.0, 100.0),
            ElementType::Image => Size::new(200.0, 200.0),
            ElementType::Puzzle => Size::new(300.0, 200.0),
            ElementType::SequencePuzzle | ElementType::ClickSequencePuzzle => {
                Size::new(400.0, 150.0)
            }
            ElementType::SliderPuzzle => Size::new(300.0, 250.0),
            ElementType::Background => return None,
        };
        Some(size)
    }

    /// Check if this type is one of the puzzle variants.
    pub fn is_puzzle(self) -> bool {
        matches!(
            self,
            ElementType::Puzzle
                | ElementType::SequencePuzzle
                | ElementType::ClickSequencePuzzle
                | ElementType::SliderPuzzle
        )
    }
}

/// Type-specific element data, tagged by `type` in the persisted document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ElementKind {
    Rectangle,
    Circle,
    Triangle,
    Line,
    Heading {
        #[serde(default)]
        content: String,
    },
    Subheading {
        #[serde(default)]
        content: String,
    },
    Paragraph {
        #[serde(default)]
        content: String,
    },
    Image(ImageSource),
    Puzzle {
        puzzle_config: LockPuzzleConfig,
    },
    SequencePuzzle {
        sequence_puzzle_config: SequencePuzzleConfig,
    },
    ClickSequencePuzzle {
        click_sequence_puzzle_config: ClickSequencePuzzleConfig,
    },
    SliderPuzzle {
        slider_puzzle_config: SliderPuzzleConfig,
    },
    Background(ImageSource),
}

impl ElementKind {
    /// Default data for a new element of the given type.
    pub fn default_for(element_type: ElementType) -> Self {
        match element_type {
            ElementType::Rectangle => ElementKind::Rectangle,
            ElementType::Circle => ElementKind::Circle,
            ElementType::Triangle => ElementKind::Triangle,
            ElementType::Line => ElementKind::Line,
            ElementType::Heading => ElementKind::Heading {
                content: "Heading".to_string(),
            },
            ElementType::Subheading => ElementKind::Subheading {
                content: "Subheading".to_string(),
            },
            ElementType::Paragraph => ElementKind::Paragraph {
                content: "Paragraph".to_string(),
            },
            ElementType::Image => ElementKind::Image(ImageSource::default()),
            ElementType::Puzzle => ElementKind::Puzzle {
                puzzle_config: LockPuzzleConfig::default(),
            },
            ElementType::SequencePuzzle => ElementKind::SequencePuzzle {
                sequence_puzzle_config: SequencePuzzleConfig::default(),
            },
            ElementType::ClickSequencePuzzle => ElementKind::ClickSequencePuzzle {
                click_sequence_puzzle_config: ClickSequencePuzzleConfig::default(),
            },
            ElementType::SliderPuzzle => ElementKind::SliderPuzzle {
                slider_puzzle_config: SliderPuzzleConfig::default(),
            },
            ElementType::Background => ElementKind::Background(ImageSource::default()),
        }
    }

    pub fn element_type(&self) -> ElementType {
        match self {
            ElementKind::Rectangle => ElementType::Rectangle,
            ElementKind::Circle => ElementType::Circle,
            ElementKind::Triangle => ElementType::Triangle,
            ElementKind::Line => ElementType::Line,
            ElementKind::Heading { .. } => ElementType::Heading,
            ElementKind::Subheading { .. } => ElementType::Subheading,
            ElementKind::Paragraph { .. } => ElementType::Paragraph,
            ElementKind::Image(_) => ElementType::Image,
            ElementKind::Puzzle { .. } => ElementType::Puzzle,
            ElementKind::SequencePuzzle { .. } => ElementType::SequencePuzzle,
            ElementKind::ClickSequencePuzzle { .. } => ElementType::ClickSequencePuzzle,
            ElementKind::SliderPuzzle { .. } => ElementType::SliderPuzzle,
            ElementKind::Background(_) => ElementType::Background,
        }
    }

    /// Text content for heading/subheading/paragraph elements.
    pub fn text_content(&self) -> Option<&str> {
        match self {
            ElementKind::Heading { content }
            | ElementKind::Subheading { content }
            | ElementKind::Paragraph { content } => Some(content),
            _ => None,
        }
    }

    /// Image source for image and background elements.
    pub fn image_source(&self) -> Option<&ImageSource> {
        match self {
            ElementKind::Image(source) | ElementKind::Background(source) => Some(source),
            _ => None,
        }
    }

    pub fn image_source_mut(&mut self) -> Option<&mut ImageSource> {
        match self {
            ElementKind::Image(source) | ElementKind::Background(source) => Some(source),
            _ => None,
        }
    }
}

fn default_scale() -> f64 {
    1.0
}

/// A positioned object on a canvas.
///
/// Rotation (radians, about the box center) and uniform scale are stored as
/// numbers; the CSS transform string is derived on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: ElementId,
    #[serde(flatten)]
    pub kind: ElementKind,
    /// Top-left corner of the unrotated box.
    pub position: Point,
    /// Box size. Backgrounds have none and cover the canvas.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    /// Persisted z-order.
    #[serde(default)]
    pub layer: i32,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(default)]
    pub style: ElementStyle,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default)]
    pub in_inventory: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interaction: Option<Interaction>,
}

impl Element {
    /// Create an element of the given type with default geometry and style.
    pub fn new(element_type: ElementType) -> Self {
        let style = match element_type {
            ElementType::Rectangle | ElementType::Circle | ElementType::Triangle => {
                ElementStyle::shape()
            }
            ElementType::Line => ElementStyle::line(),
            ElementType::Heading => ElementStyle::text(32.0),
            ElementType::Subheading => ElementStyle::text(24.0),
            ElementType::Paragraph => ElementStyle::text(16.0),
            _ => ElementStyle::default(),
        };
        let is_background = element_type == ElementType::Background;
        Self {
            id: Uuid::new_v4(),
            kind: ElementKind::default_for(element_type),
            position: if is_background { Point::ZERO } else { DEFAULT_POSITION },
            size: element_type.default_size(),
            layer: BACKGROUND_LAYER,
            rotation: 0.0,
            scale: 1.0,
            style,
            is_hidden: false,
            in_inventory: false,
            interaction: None,
        }
    }

    pub fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }

    pub fn is_background(&self) -> bool {
        matches!(self.kind, ElementKind::Background(_))
    }

    pub fn is_image(&self) -> bool {
        matches!(self.kind, ElementKind::Image(_))
    }

    pub fn is_puzzle(&self) -> bool {
        self.element_type().is_puzzle()
    }

    /// Box size, zero if the element has none.
    pub fn size_or_zero(&self) -> Size {
        self.size.unwrap_or(Size::ZERO)
    }

    /// Unrotated, unscaled box.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size_or_zero())
    }

    /// Center of the box; rotation and scale pivot around it.
    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    /// Transform from the unrotated box to its on-screen placement.
    pub fn affine(&self) -> Affine {
        let center = self.center().to_vec2();
        Affine::translate(center)
            * Affine::rotate(self.rotation)
            * Affine::scale(self.scale)
            * Affine::translate(-center)
    }

    /// Axis-aligned bounding box of the transformed element.
    pub fn visual_bounds(&self) -> Rect {
        self.affine().transform_rect_bbox(self.bounds())
    }

    /// CSS transform string for the view layer.
    pub fn transform_css(&self) -> String {
        format!("scale({}) rotate({}deg)", self.scale, self.rotation.to_degrees())
    }

    /// Whether resize keeps the original aspect ratio.
    pub fn locks_aspect_ratio(&self) -> bool {
        self.is_image()
    }

    /// Aspect ratio used for locked resizes: the original image's if known,
    /// else the current box.
    pub fn aspect_ratio(&self) -> Option<f64> {
        self.kind
            .image_source()
            .and_then(ImageSource::aspect_ratio)
            .or_else(|| {
                let size = self.size?;
                (size.height > 0.0).then(|| size.width / size.height)
            })
    }

    /// Check if a point (in canvas coordinates) hits this element's shape.
    pub fn contains_point(&self, point: Point) -> bool {
        let Some(size) = self.size else {
            // Backgrounds cover the whole canvas
            return self.is_background();
        };
        if size.width <= 0.0 || size.height <= 0.0 || self.scale.abs() < f64::EPSILON {
            return false;
        }

        let local = self.affine().inverse() * point;
        let rect = self.bounds();
        match self.kind {
            ElementKind::Circle => Ellipse::from_rect(rect).contains(local),
            ElementKind::Triangle => triangle_path(rect).contains(local),
            // Thin lines get a little slack so they stay grabbable
            ElementKind::Line => rect.inflate(0.0, 4.0).contains(local),
            _ => rect.contains(local),
        }
    }

    /// Assign a fresh identifier (used when duplicating).
    pub fn regenerate_id(&mut self) {
        self.id = Uuid::new_v4();
    }
}

/// Isosceles triangle with its apex at the top-center of `rect`.
fn triangle_path(rect: Rect) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(Point::new(rect.center().x, rect.y0));
    path.line_to(Point::new(rect.x1, rect.y1));
    path.line_to(Point::new(rect.x0, rect.y1));
    path.close_path();
    path
}
