//! Editor Configuration and Theme Management
//!
//! This module handles the layout strings, status messages and
//! colour theme used when rendering the review table.

use crossterm::style::Color;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

/// Configuration for the table editor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Fixed text at the start of every rendered row
    pub prefix: String,
    /// Marker drawn over the prefix of the row awaiting a decision
    pub prompt_marker: String,
    pub highlight_color: String,
    pub theme_name: String,
    /// Shown below the table when input is rejected; `{input}` is replaced
    pub retry_message: String,
    pub farewell_message: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            prefix: "   ".to_string(),
            prompt_marker: "->".to_string(),
            highlight_color: "Green".to_string(),
            theme_name: "default".to_string(),
            retry_message:
                "Input '{input}' is not valid, please enter Y{repeat},N{repeat} or a valid version."
                    .to_string(),
            farewell_message: "Aborted, bye!".to_string(),
        }
    }
}

impl EditorConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a JSON file
    ///
    /// Fields missing from the file keep their default values. A named
    /// theme other than `default` overrides `highlight_color`.
    pub fn from_file(path: impl AsRef<Path>) -> io::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let mut config: Self = serde_json::from_str(&content)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        if config.theme_name != "default" {
            let theme = config.theme_name.clone();
            config.apply_theme(&theme);
        }
        Ok(config)
    }

    /// Apply a theme by name
    pub fn apply_theme(&mut self, theme_name: &str) {
        self.highlight_color = match theme_name {
            "ocean" => "Cyan",
            "sunset" => "Yellow",
            "mono" => "White",
            _ => "Green",
        }
        .to_string();
        self.theme_name = theme_name.to_string();
    }

    /// Get highlight color as Color
    pub fn get_highlight_color(&self) -> Color {
        match self.highlight_color.as_str() {
            "Black" => Color::Black,
            "White" => Color::White,
            "Green" => Color::Green,
            "Yellow" => Color::Yellow,
            "Red" => Color::Red,
            "Blue" => Color::Blue,
            "Cyan" => Color::Cyan,
            "Magenta" => Color::Magenta,
            _ => Color::Green,
        }
    }

    /// Render the retry banner for a rejected input line
    pub fn retry_message_for(&self, input: &str) -> String {
        self.retry_message.replace("{input}", input)
    }
}
