//! Editor configuration.
//!
//! Every field has a default, so a config file only needs to name the values
//! it changes. Without a file the defaults reproduce the stock look: green
//! rectangles, blue lines, white circles, red labels on a 900x600 canvas.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color3 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color3 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_egui(self) -> egui::Color32 {
        egui::Color32::from_rgb(self.r, self.g, self.b)
    }

    pub fn to_pixel(self) -> image::Rgb<u8> {
        image::Rgb([self.r, self.g, self.b])
    }
}

/// Outline style for shape tools.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub color: Color3,
    pub width: u32,
}

/// Style for text stamps and measurement labels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabelStyle {
    pub color: Color3,
    pub size: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolStyles {
    pub rectangle: StrokeStyle,
    pub line: StrokeStyle,
    pub circle: StrokeStyle,
    pub text: LabelStyle,
    pub measure_line: StrokeStyle,
    pub measure_label: LabelStyle,
}

impl Default for ToolStyles {
    fn default() -> Self {
        Self {
            rectangle: StrokeStyle {
                color: Color3::new(0, 128, 0),
                width: 5,
            },
            line: StrokeStyle {
                color: Color3::new(0, 0, 255),
                width: 3,
            },
            circle: StrokeStyle {
                color: Color3::new(255, 255, 255),
                width: 5,
            },
            text: LabelStyle {
                color: Color3::new(255, 0, 0),
                size: 16.0,
            },
            measure_line: StrokeStyle {
                color: Color3::new(255, 0, 0),
                width: 5,
            },
            measure_label: LabelStyle {
                color: Color3::new(0, 0, 255),
                size: 16.0,
            },
        }
    }
}

/// Fixed display area the preview is letterboxed into.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 600.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub viewport: Viewport,
    /// Undo depth limit. `None` keeps every snapshot for the session.
    pub max_history: Option<usize>,
    pub log_level: LogLevel,
    pub styles: ToolStyles,
}

impl EditorConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&data).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate().map_err(|message| ConfigError::Invalid {
            path: path.to_path_buf(),
            message,
        })?;
        Ok(config)
    }

    /// Reject values the editor cannot work with.
    pub fn validate(&self) -> Result<(), String> {
        let Viewport { width, height } = self.viewport;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(format!("viewport must be positive, got {width}x{height}"));
        }
        if self.max_history == Some(0) {
            return Err("max_history must be at least 1".to_string());
        }
        Ok(())
    }

    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }
}
