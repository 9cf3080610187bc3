use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use mcpdash_types::{ConfirmationChoice, Effect, Msg};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::{
    app::App,
    ui::{
        components::component::Component,
        theme::theme_helpers::{block_with_severity, build_hint_spans, button_primary_style, button_secondary_style, render_button},
    },
};

const BUTTON_WIDTH: u16 = 12;
const BUTTON_SPACER: u16 = 2;

/// Presentational confirm/cancel dialog. Activating a button closes the
/// modal and forwards the choice as a message; the owner of the pending
/// action decides what it means.
#[derive(Default, Debug, Clone)]
pub struct ConfirmationModal {
    button_areas: Vec<Rect>,
}

fn choose(choice: ConfirmationChoice) -> Vec<Effect> {
    vec![Effect::CloseModal, Effect::SendMsg(Msg::ConfirmationModalButtonClicked(choice))]
}

impl Component for ConfirmationModal {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let state = &app.confirmation_modal_state;
        match key.code {
            KeyCode::Tab | KeyCode::Right => {
                state.focus_next();
                Vec::new()
            }
            KeyCode::BackTab | KeyCode::Left => {
                state.focus_prev();
                Vec::new()
            }
            KeyCode::Enter => state.focused_choice().map(choose).unwrap_or_default(),
            KeyCode::Char('y') | KeyCode::Char('Y') => choose(ConfirmationChoice::Confirm),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                vec![Effect::CloseModal, Effect::SendMsg(Msg::ConfirmationModalClosed)]
            }
            _ => Vec::new(),
        }
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        let MouseEvent { kind, column, row, .. } = mouse;
        if kind != MouseEventKind::Down(MouseButton::Left) {
            return Vec::new();
        }
        let position = Position::new(column, row);
        self.button_areas
            .iter()
            .position(|area| area.contains(position))
            .and_then(|index| app.confirmation_modal_state.buttons().get(index))
            .map(|button| choose(button.choice))
            .unwrap_or_default()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let theme = &*app.ctx.theme;
        let state = &app.confirmation_modal_state;
        let severity = state.severity();
        let block = block_with_severity(theme, severity, state.title(), true);
        let inner = block.inner(rect);

        frame.render_widget(Clear, rect);
        frame.render_widget(&block, rect);

        let [message_rect, _, button_rect, ..] = self.get_preferred_layout(app, inner)[..] else {
            return;
        };

        if let Some(message) = state.message() {
            let lines = message
                .lines()
                .map(|line| Line::from(Span::styled(line.to_string(), theme.text_primary_style())))
                .collect::<Vec<Line>>();
            let paragraph = Paragraph::new(lines).block(Block::default()).wrap(Wrap { trim: false });
            frame.render_widget(paragraph, message_rect);
        }

        let buttons = state.buttons();
        let focused = state.focused_index();
        let mut button_areas = Vec::with_capacity(buttons.len());
        for (i, button) in buttons.iter().enumerate() {
            let offset = i as u16 * (BUTTON_WIDTH + BUTTON_SPACER);
            let area = Rect::new(button_rect.x + offset, button_rect.y, BUTTON_WIDTH, button_rect.height).intersection(button_rect);
            let is_focused = focused == Some(i);
            let style = if button.is_primary {
                button_primary_style(theme, severity, is_focused)
            } else {
                button_secondary_style(theme, is_focused)
            };
            render_button(frame, area, button.label.as_str(), style, is_focused, theme, Borders::ALL);
            button_areas.push(area);
        }
        self.button_areas = button_areas;
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'static>> {
        build_hint_spans(
            &*app.ctx.theme,
            &[("Tab/←/→", "Focus"), ("Enter", "Choose"), ("y", "Confirm"), ("n/Esc", "Cancel")],
        )
    }

    fn get_preferred_layout(&self, app: &App, area: Rect) -> Vec<Rect> {
        let has_message = app.confirmation_modal_state.message().is_some();
        Layout::vertical([
            Constraint::Min(if has_message { 1 } else { 0 }), // Message
            Constraint::Length(1),                            // Spacer
            Constraint::Length(3),                            // Buttons
        ])
        .split(area)
        .to_vec()
    }
}
