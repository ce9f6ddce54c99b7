//! Raster image annotation: shapes, labels and pixel measurements stamped
//! into a full-resolution buffer with linear undo/redo, shown through a
//! scaled preview.

pub mod app;
pub mod config;
pub mod editor;
pub mod error;
pub mod history;
pub mod mapper;
pub mod raster;
pub mod render;
pub mod shapes;
pub mod tools;

pub use app::AnnotatorApp;
pub use config::EditorConfig;
pub use editor::Editor;
pub use error::{ConfigError, EditorError};
