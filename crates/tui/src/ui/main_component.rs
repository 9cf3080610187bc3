use crossterm::event::{KeyCode, KeyEvent, MouseEvent};
use mcpdash_types::{Effect, Modal, Msg, Route};
use ratatui::{
    prelude::*,
    widgets::{Block, Clear, Paragraph, Wrap},
};

use super::{
    components::{
        Component,
        common::ConfirmationModal,
        servers::{ServerCreateComponent, ServerDetailsComponent, ServersTableComponent},
    },
    theme::theme_helpers as th,
    utils::centered_min_max,
};
use crate::app::App;

pub struct ModalLayout(Box<dyn Fn(Rect) -> Rect>);

impl std::fmt::Debug for ModalLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ModalLayout")
    }
}

type ModalView = (Box<dyn Component>, ModalLayout);

/// Root view: routes input to the active content view or the open modal
/// and lays out the content, notification line, and hints bar.
pub struct MainView {
    pub content_view: Box<dyn Component>,
    pub modal_view: Option<ModalView>,
}

impl Default for MainView {
    fn default() -> Self {
        Self {
            content_view: Box::new(ServersTableComponent::default()),
            modal_view: None,
        }
    }
}

impl MainView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap the content component for `route`. Use `Effect::SwitchTo`
    /// rather than calling this directly.
    pub fn set_current_route(&mut self, app: &mut App, route: Route) {
        let view: Box<dyn Component> = match route {
            Route::ServerList => Box::new(ServersTableComponent::default()),
            Route::ServerDetail if app.servers.detail.is_some() => Box::new(ServerDetailsComponent),
            Route::ServerCreate if app.servers.create.is_some() => Box::new(ServerCreateComponent),
            other => {
                tracing::warn!(route = ?other, "route has no state; staying on the list");
                return self.set_current_route(app, Route::ServerList);
            }
        };
        self.content_view = view;
        app.navigate(&Effect::SwitchTo(route));
    }

    /// Update the open modal kind (use None to clear).
    pub fn set_open_modal_kind(&mut self, app: &mut App, modal: Option<Modal>) {
        self.modal_view = modal.map(|kind| match kind {
            Modal::ConfirmDelete => (
                Box::new(ConfirmationModal::default()) as Box<dyn Component>,
                ModalLayout(Box::new(|rect| {
                    centered_min_max(45, 35, Rect::new(0, 0, 60, 10), Rect::new(0, 0, 90, 12), rect)
                })),
            ),
        });
        match modal {
            Some(kind) => app.navigate(&Effect::ShowModal(kind)),
            None => app.navigate(&Effect::CloseModal),
        };
    }

    fn render_missing_parameters(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &*app.ctx.theme;
        let missing = app.ctx.session.missing_parameters().join(", ");
        let block = th::block(theme, Some("MCP Servers"), false);
        let lines = vec![
            Line::from(Span::styled(
                "Missing required parameters: cannot load MCP servers.",
                theme.severity_style(mcpdash_types::Severity::Warning),
            )),
            Line::default(),
            Line::from(Span::styled(format!("Provide: {missing}"), theme.text_secondary_style())),
            Line::from(Span::styled(
                "Set MCPDASH_API_KEY, MCPDASH_USER_ROLE and MCPDASH_USER_ID, or pass --token, --role and --user-id.",
                theme.text_muted_style(),
            )),
        ];
        frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: true }), area);
    }

    fn notification_line(app: &App) -> Line<'static> {
        match app.notification.as_ref() {
            Some(notification) => Line::from(Span::styled(
                notification.message.clone(),
                app.ctx.theme.severity_style(notification.severity).add_modifier(Modifier::BOLD),
            )),
            None => Line::default(),
        }
    }
}

impl Component for MainView {
    fn update(&mut self, app: &mut App, msg: &Msg) -> Vec<Effect> {
        let mut effects = app.update(msg);
        match self.modal_view.as_mut() {
            Some((modal, _)) => effects.extend(modal.update(app, msg)),
            None => effects.extend(self.content_view.update(app, msg)),
        }
        effects
    }

    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        if !app.ctx.session.is_complete() {
            return match key.code {
                KeyCode::Char('q') | KeyCode::Esc => vec![Effect::Quit],
                _ => Vec::new(),
            };
        }
        if let Some((modal, _)) = self.modal_view.as_mut() {
            return modal.handle_key_events(app, key);
        }
        self.content_view.handle_key_events(app, key)
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        if !app.ctx.session.is_complete() {
            return Vec::new();
        }
        if let Some((modal, _)) = self.modal_view.as_mut() {
            return modal.handle_mouse_events(app, mouse);
        }
        self.content_view.handle_mouse_events(app, mouse)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        let bg_fill = Paragraph::new("").style(Style::default().bg(app.ctx.theme.roles().background));
        frame.render_widget(bg_fill, area);

        let layout = self.get_preferred_layout(app, area);
        let [content_area, notification_area, hints_area] = layout[..] else {
            return;
        };

        if !app.ctx.session.is_complete() {
            Self::render_missing_parameters(frame, content_area, app);
            let hints = th::build_hint_spans(&*app.ctx.theme, &[("q", "Quit")]);
            frame.render_widget(Paragraph::new(Line::from(hints)), hints_area);
            return;
        }

        self.content_view.render(frame, content_area, app);
        frame.render_widget(Paragraph::new(Self::notification_line(app)), notification_area);

        let hint_spans = self.get_hint_spans(app);
        frame.render_widget(
            Paragraph::new(Line::from(hint_spans)).style(app.ctx.theme.text_muted_style()),
            hints_area,
        );

        if let Some((modal, position)) = self.modal_view.as_mut() {
            render_overlay(frame, app);
            let modal_area = position.0(area);
            frame.render_widget(Clear, modal_area);
            modal.render(frame, modal_area, app);
        }
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'static>> {
        let mut hint_spans = vec![Span::styled("Hints: ", app.ctx.theme.text_muted_style())];
        match self.modal_view.as_ref() {
            Some((modal, _)) => hint_spans.extend(modal.get_hint_spans(app)),
            None => hint_spans.extend(self.content_view.get_hint_spans(app)),
        }
        hint_spans
    }

    fn get_preferred_layout(&self, _app: &App, area: Rect) -> Vec<Rect> {
        Layout::vertical([
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Notification
            Constraint::Length(1), // Hints
        ])
        .split(area)
        .to_vec()
    }
}

/// Dim everything behind an open modal.
fn render_overlay(frame: &mut Frame, app: &App) {
    frame.render_widget(Block::default().style(app.ctx.theme.modal_background_style()).dim(), frame.area());
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crossterm::event::KeyModifiers;
    use mcpdash_types::Session;
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::test_support::{FakeServerApi, admin_session, buffer_lines, record};

    #[test]
    fn incomplete_session_renders_missing_parameters_and_only_quits() {
        let mut app = App::new(Session::new(Some("sk-1".into()), None, None), Arc::new(FakeServerApi::default()));
        let mut view = MainView::new();
        let mut terminal = Terminal::new(TestBackend::new(120, 12)).expect("terminal");
        terminal.draw(|frame| view.render(frame, frame.area(), &mut app)).expect("draw");
        let lines = buffer_lines(terminal.backend().buffer());
        assert!(lines.iter().any(|line| line.contains("Missing required parameters")));
        assert!(lines.iter().any(|line| line.contains("user role, user id")));

        let refresh = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::NONE);
        assert!(view.handle_key_events(&mut app, refresh).is_empty());
        let quit = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(view.handle_key_events(&mut app, quit), vec![Effect::Quit]);
    }

    #[test]
    fn open_modal_receives_keys_and_renders_on_top() {
        let api = Arc::new(FakeServerApi::default());
        let mut app = App::new(admin_session(), api);
        let key = app.server_list_key().expect("credential");
        let generation = app.queries.begin_fetch(key);
        app.update(&Msg::ExecCompleted(Box::new(mcpdash_types::ExecOutcome::ServersFetched {
            generation,
            result: Ok(vec![record("srv-a")]),
        })));
        let mut view = MainView::new();
        app.request_delete("srv-a");
        view.set_open_modal_kind(&mut app, Some(Modal::ConfirmDelete));
        assert_eq!(app.open_modal, Some(Modal::ConfirmDelete));

        let mut terminal = Terminal::new(TestBackend::new(120, 30)).expect("terminal");
        terminal.draw(|frame| view.render(frame, frame.area(), &mut app)).expect("draw");
        let lines = buffer_lines(terminal.backend().buffer());
        assert!(lines.iter().any(|line| line.contains("Delete MCP Server")));

        let escape = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(
            view.handle_key_events(&mut app, escape),
            vec![Effect::CloseModal, Effect::SendMsg(Msg::ConfirmationModalClosed)]
        );
    }

    #[test]
    fn detail_route_without_state_falls_back_to_list() {
        let mut app = App::new(admin_session(), Arc::new(FakeServerApi::default()));
        let mut view = MainView::new();
        view.set_current_route(&mut app, Route::ServerDetail);
        assert_eq!(app.route, Route::ServerList);
    }
}
