//! Rendering and key handling for [`ServerFormState`], shared by the create
//! view and the edit mode of the detail view.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use mcpdash_types::Severity;
use ratatui::{
    Frame,
    layout::{Position, Rect},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::form::{FormField, ServerFormState};
use crate::ui::theme::{Theme, theme_helpers as th};

/// Width of the label gutter, including the trailing separator.
const LABEL_WIDTH: u16 = 14;

/// What a key press asks of the owning view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    None,
    Submit,
    Cancel,
}

pub fn handle_form_key(form: &mut ServerFormState, key: KeyEvent) -> FormAction {
    let control = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('s') if control => return FormAction::Submit,
        KeyCode::Esc => return FormAction::Cancel,
        KeyCode::Tab | KeyCode::Down => form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
        KeyCode::Enter => {
            if form.focused_field() == FormField::ALL[FormField::ALL.len() - 1] {
                return FormAction::Submit;
            }
            form.focus_next();
        }
        code if form.focused_field().is_select() => match code {
            KeyCode::Left => form.cycle_option(-1),
            KeyCode::Right | KeyCode::Char(' ') => form.cycle_option(1),
            _ => {}
        },
        code => {
            let Some(input) = form.focused_input_mut() else {
                return FormAction::None;
            };
            match code {
                KeyCode::Left => input.move_left(),
                KeyCode::Right => input.move_right(),
                KeyCode::Home => input.move_home(),
                KeyCode::End => input.move_end(),
                KeyCode::Backspace => input.backspace(),
                KeyCode::Delete => input.delete(),
                KeyCode::Char(character) if !control => input.insert_char(character),
                _ => {}
            }
        }
    }
    FormAction::None
}

/// Draw one line per field, then the validation or progress line. Places
/// the terminal cursor inside the focused text field.
pub fn render_form(frame: &mut Frame, area: Rect, form: &ServerFormState, theme: &dyn Theme) {
    let focused = form.focused_field();
    let mut lines: Vec<Line> = FormField::ALL
        .iter()
        .map(|&field| {
            let is_focused = field == focused;
            let label_style = if is_focused {
                theme.accent_emphasis_style()
            } else {
                theme.text_secondary_style()
            };
            let label = format!("{:<width$}", format!("{}:", field.label()), width = LABEL_WIDTH as usize);
            let value = if field.is_select() {
                format!("< {} >", form.display_value(field))
            } else {
                form.display_value(field)
            };
            let value_style = th::input_style(theme, true, is_focused);
            Line::from(vec![Span::styled(label, label_style), Span::styled(value, value_style)])
        })
        .collect();

    lines.push(Line::default());
    if form.submitting {
        lines.push(Line::from(Span::styled("Saving…", theme.text_muted_style())));
    } else if let Some(error) = form.error.as_deref() {
        lines.push(Line::from(Span::styled(error.to_string(), theme.severity_style(Severity::Error))));
    }
    frame.render_widget(Paragraph::new(lines), area);

    if let Some(input) = form.input(focused) {
        let row = FormField::ALL.iter().position(|&field| field == focused).unwrap_or_default() as u16;
        let position = Position::new(
            area.x.saturating_add(LABEL_WIDTH).saturating_add(input.cursor_column()),
            area.y.saturating_add(row),
        );
        if area.contains(position) {
            frame.set_cursor_position(position);
        }
    }
}

pub fn form_hints() -> &'static [(&'static str, &'static str)] {
    &[("Tab/↑/↓", "Field"), ("←/→", "Option"), ("Ctrl+S", "Save"), ("Esc", "Back")]
}
