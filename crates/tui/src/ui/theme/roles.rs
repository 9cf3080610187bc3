use std::fmt::Debug;

use mcpdash_types::Severity;
use ratatui::style::{Color, Modifier, Style};

/// Semantic color roles used throughout the UI.
#[derive(Debug, Clone)]
pub struct ThemeRoles {
    pub background: Color,
    pub surface: Color,
    pub surface_muted: Color,
    pub border: Color,

    pub text: Color,
    pub text_secondary: Color,
    pub text_muted: Color,

    pub accent_primary: Color,
    pub accent_secondary: Color,

    pub info: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,

    pub selection_bg: Color,
    pub selection_fg: Color,
    pub focus: Color,

    /// Background behind modal dialogs; darker than `background` so the
    /// dialog reads as elevated.
    pub modal_bg: Color,

    pub table_row_even: Color,
    pub table_row_odd: Color,
}

/// Theme trait exposes semantic roles and common style builders.
pub trait Theme: Send + Sync + Debug {
    fn roles(&self) -> &ThemeRoles;

    fn text_primary_style(&self) -> Style {
        Style::default().fg(self.roles().text)
    }
    fn text_secondary_style(&self) -> Style {
        Style::default().fg(self.roles().text_secondary)
    }
    fn text_muted_style(&self) -> Style {
        Style::default().fg(self.roles().text_muted)
    }

    fn border_style(&self, focused: bool) -> Style {
        let color = if focused { self.roles().focus } else { self.roles().border };
        Style::default().fg(color)
    }

    fn selection_style(&self) -> Style {
        Style::default()
            .fg(self.roles().selection_fg)
            .bg(self.roles().selection_bg)
            .add_modifier(Modifier::BOLD)
    }

    fn modal_background_style(&self) -> Style {
        Style::default().bg(self.roles().modal_bg)
    }

    fn severity_color(&self, severity: Severity) -> Color {
        match severity {
            Severity::Info => self.roles().info,
            Severity::Success => self.roles().success,
            Severity::Warning => self.roles().warning,
            Severity::Error => self.roles().error,
        }
    }
    fn severity_style(&self, severity: Severity) -> Style {
        Style::default().fg(self.severity_color(severity))
    }

    fn accent_primary_style(&self) -> Style {
        Style::default().fg(self.roles().accent_primary)
    }
    fn accent_emphasis_style(&self) -> Style {
        Style::default().fg(self.roles().accent_primary).add_modifier(Modifier::BOLD)
    }
}
