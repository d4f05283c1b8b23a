//! Configuration of the egui console window.

use bevy::prelude::*;
use bevy_egui::egui::{self, Color32, FontId, TextFormat};

use crate::core::LogSeverity;

/// Console window configuration.
#[derive(Resource, Clone, Debug)]
pub struct ConsoleConfig {
    /// Colors and font.
    pub theme: ConsoleTheme,
    /// Key that opens and closes the console.
    pub open_key: KeyCode,
    /// Alternative toggle key (`§` on many European layouts).
    pub alt_open_key: Option<KeyCode>,
    /// Key that submits the input line.
    pub submit_key: KeyCode,
    /// Maximum number of candidates shown in the autocomplete popup.
    pub max_completions: usize,
    /// Window title.
    pub title: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            theme: ConsoleTheme::default(),
            open_key: KeyCode::Backquote,
            alt_open_key: Some(KeyCode::IntlBackslash),
            submit_key: KeyCode::Enter,
            max_completions: 6,
            title: "Debug Console".to_string(),
        }
    }
}

impl ConsoleConfig {
    /// Whether `key` toggles the console.
    pub fn is_toggle_key(&self, key: KeyCode) -> bool {
        key == self.open_key || self.alt_open_key == Some(key)
    }
}

/// Colors and font of the console window.
#[derive(Clone, Debug)]
pub struct ConsoleTheme {
    /// Font for log rows and the input line.
    pub font: FontId,
    /// Timestamps and secondary text.
    pub dark: Color32,
    /// Regular text.
    pub text: Color32,
    /// Info lines.
    pub info: Color32,
    /// Warning lines.
    pub warning: Color32,
    /// Error and exception lines.
    pub error: Color32,
    /// Assert lines.
    pub assert: Color32,
}

impl Default for ConsoleTheme {
    fn default() -> Self {
        Self {
            font: FontId::monospace(14.0),
            dark: Color32::from_gray(130),
            text: Color32::from_gray(220),
            info: Color32::WHITE,
            warning: Color32::YELLOW,
            error: Color32::RED,
            assert: Color32::from_rgb(0, 255, 255),
        }
    }
}

impl ConsoleTheme {
    /// Color for a severity.
    pub fn severity_color(&self, severity: LogSeverity) -> Color32 {
        match severity {
            LogSeverity::Info => self.info,
            LogSeverity::Warning => self.warning,
            LogSeverity::Error | LogSeverity::Exception => self.error,
            LogSeverity::Assert => self.assert,
        }
    }

    /// Regular text.
    pub fn format_text(&self) -> TextFormat {
        TextFormat::simple(self.font.clone(), self.text)
    }

    /// Secondary text.
    pub fn format_dark(&self) -> TextFormat {
        TextFormat::simple(self.font.clone(), self.dark)
    }

    /// Highlighted text.
    pub fn format_bold(&self) -> TextFormat {
        TextFormat {
            underline: egui::Stroke::new(1.0, self.text),
            ..TextFormat::simple(self.font.clone(), Color32::WHITE)
        }
    }

    /// Text in the color of `severity`.
    pub fn format_severity(&self, severity: LogSeverity) -> TextFormat {
        TextFormat::simple(self.font.clone(), self.severity_color(severity))
    }
}
