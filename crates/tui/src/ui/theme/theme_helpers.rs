use mcpdash_types::Severity;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Borders, Padding, Paragraph},
};

use super::roles::{Theme, ThemeRoles};

/// Build a standard Block with theme surfaces and borders.
pub fn block<'a, T: Theme + ?Sized>(theme: &'a T, title: Option<&'a str>, focused: bool) -> Block<'a> {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Plain)
        .border_style(theme.border_style(focused))
        .style(panel_style(theme));
    if let Some(t) = title {
        block = block.title(Span::styled(t, theme.text_secondary_style().add_modifier(Modifier::BOLD)));
    }
    block
}

/// Block whose border and title carry the severity color (dialogs, banners).
pub fn block_with_severity<'a, T: Theme + ?Sized>(
    theme: &'a T,
    severity: Severity,
    title: Option<&'a str>,
    focused: bool,
) -> Block<'a> {
    let color = theme.severity_color(severity);
    let border = if focused {
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(color)
    };
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border)
        .style(panel_style(theme));
    if let Some(t) = title {
        block = block.title(Span::styled(t, Style::default().fg(color).add_modifier(Modifier::BOLD)));
    }
    block
}

/// Style for panel-like containers (set background on widget using `.style`).
pub fn panel_style<T: Theme + ?Sized>(theme: &T) -> Style {
    let ThemeRoles { surface, text, .. } = *theme.roles();
    Style::default().bg(surface).fg(text)
}

pub fn table_header_style<T: Theme + ?Sized>(theme: &T) -> Style {
    theme.text_secondary_style().add_modifier(Modifier::BOLD)
}

/// Background style for the entire header row to avoid gaps between columns.
pub fn table_header_row_style<T: Theme + ?Sized>(theme: &T) -> Style {
    let ThemeRoles { surface_muted, .. } = *theme.roles();
    Style::default().bg(surface_muted)
}

pub fn darken_rgb(color: Color, factor: f32) -> Color {
    scale_rgb(color, factor.clamp(0.0, 1.0))
}

pub fn lighten_rgb(color: Color, amount: f32) -> Color {
    match color {
        Color::Rgb(r, g, b) => {
            let a = amount.clamp(0.0, 1.0);
            let lift = |c: u8| (c as f32 + (255.0 - c as f32) * a).round().clamp(0.0, 255.0) as u8;
            Color::Rgb(lift(r), lift(g), lift(b))
        }
        other => other,
    }
}

fn scale_rgb(color: Color, factor: f32) -> Color {
    match color {
        Color::Rgb(r, g, b) => {
            let scale = |c: u8| (c as f32 * factor).round().clamp(0.0, 255.0) as u8;
            Color::Rgb(scale(r), scale(g), scale(b))
        }
        other => other,
    }
}

/// Zebra striping for table rows.
pub fn table_row_style<T: Theme + ?Sized>(theme: &T, row_index: usize) -> Style {
    let ThemeRoles {
        table_row_even,
        table_row_odd,
        text,
        ..
    } = *theme.roles();
    let bg = if row_index % 2 == 0 { table_row_even } else { table_row_odd };
    Style::default().bg(bg).fg(text)
}

pub fn input_style<T: Theme + ?Sized>(theme: &T, valid: bool, focused: bool) -> Style {
    let ThemeRoles { surface_muted, text, error, .. } = *theme.roles();
    let mut style = Style::default().bg(surface_muted).fg(text);
    if !valid {
        style = style.fg(error);
    }
    if focused {
        style = style.add_modifier(Modifier::BOLD);
    }
    style
}

pub fn button_primary_style<T: Theme + ?Sized>(theme: &T, severity: Severity, selected: bool) -> Style {
    let color = theme.severity_color(severity);
    if selected {
        Style::default()
            .bg(color)
            .fg(theme.roles().background)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }
}

pub fn button_secondary_style<T: Theme + ?Sized>(theme: &T, selected: bool) -> Style {
    let ThemeRoles {
        accent_secondary,
        selection_bg,
        ..
    } = *theme.roles();
    let style = Style::default().fg(accent_secondary);
    if selected { style.bg(selection_bg) } else { style }
}

/// Render a bordered button. `style` comes from one of the button style
/// helpers above.
pub fn render_button<T: Theme + ?Sized>(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    style: Style,
    is_focused: bool,
    theme: &T,
    borders: Borders,
) {
    let padding = if borders.is_empty() {
        Padding::uniform(1)
    } else {
        Padding::uniform(0)
    };
    frame.render_widget(
        Paragraph::new(label)
            .centered()
            .block(
                Block::bordered()
                    .borders(borders)
                    .border_style(theme.border_style(is_focused))
                    .padding(padding),
            )
            .style(style),
        area,
    );
}

/// Build `key label` hint pairs for the footer strip.
pub fn build_hint_spans<T: Theme + ?Sized>(theme: &T, hints: &[(&str, &str)]) -> Vec<Span<'static>> {
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, label) in hints {
        spans.push(Span::styled(key.to_string(), theme.accent_emphasis_style()));
        spans.push(Span::styled(format!(" {label}  "), theme.text_muted_style()));
    }
    spans
}
