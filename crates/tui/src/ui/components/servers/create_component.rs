use crossterm::event::KeyEvent;
use mcpdash_types::Effect;
use ratatui::{Frame, layout::Rect, text::Span};

use super::form_view::{FormAction, form_hints, handle_form_key, render_form};
use crate::{
    app::App,
    ui::{components::component::Component, theme::theme_helpers as th},
};

/// Form for registering a new MCP server.
#[derive(Debug, Default)]
pub struct ServerCreateComponent;

impl Component for ServerCreateComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let Some(form) = app.servers.create.as_mut() else {
            return app.close_create();
        };
        match handle_form_key(form, key) {
            FormAction::Submit => app.submit_create(),
            FormAction::Cancel => app.close_create(),
            FormAction::None => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let theme = &*app.ctx.theme;
        let block = th::block(theme, Some("Add New MCP Server"), true);
        let inner = block.inner(rect);
        frame.render_widget(block, rect);
        if let Some(form) = app.servers.create.as_ref() {
            render_form(frame, inner, form, theme);
        }
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'static>> {
        th::build_hint_spans(&*app.ctx.theme, form_hints())
    }
}
