//! Stagecraft Core Library
//!
//! Platform-agnostic document model, gesture math, puzzle logic and play-mode
//! engine for the Stagecraft canvas game builder.

pub mod assets;
pub mod canvas;
pub mod config;
pub mod editor;
pub mod element;
pub mod hit_test;
pub mod history;
pub mod input;
pub mod interaction;
pub mod inventory;
pub mod play;
pub mod puzzle;
pub mod schedule;
pub mod stacking;
pub mod storage;
pub mod transform;

pub use assets::{AssetError, AssetPipeline, InlineAssetPipeline, UploadedImage};
pub use canvas::{Canvas, CanvasId, Project};
pub use config::EditorConfig;
pub use editor::EditorStore;
pub use element::{Element, ElementId, ElementKind, ElementPatch, ElementStyle, ElementType, ImageSource};
pub use hit_test::{HitTestResolver, ImageRasterizer, RasterBuffer, RasterError, Rasterizer};
pub use history::History;
pub use input::{Modifiers, TouchEvent, TouchPhase, TouchPoint};
pub use interaction::{CombinationResult, CombinationType, Interaction, InteractionType};
pub use inventory::{Inventory, InventoryItem};
pub use play::{PlayEffect, PlayEngine, PlayNotice};
pub use puzzle::{AnyPuzzle, Puzzle, PuzzleConfig, PuzzleEvent, PuzzleSession, PuzzleStatus};
pub use storage::{MemoryStorage, Storage, StorageError, StorageResult};
pub use transform::{GestureController, GestureKind, GestureTarget, ResizeHandle};
