//! Detail view of one server record, with an edit mode for admins.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use mcpdash_types::{Effect, ServerRecord};
use mcpdash_util::format_date_time;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use super::form_view::{FormAction, form_hints, handle_form_key, render_form};
use crate::{
    app::App,
    ui::{
        components::component::Component,
        theme::{Theme, theme_helpers as th},
    },
};

#[derive(Debug, Default)]
pub struct ServerDetailsComponent;

impl ServerDetailsComponent {
    fn field_line(label: &str, value: String, theme: &dyn Theme) -> Line<'static> {
        Line::from(vec![
            Span::styled(format!("{label:<14}"), theme.text_muted_style()),
            Span::styled(value, theme.text_primary_style()),
        ])
    }

    fn or_dash(value: Option<&str>) -> String {
        match value.map(str::trim) {
            Some(value) if !value.is_empty() => value.to_string(),
            _ => "-".to_string(),
        }
    }

    fn detail_lines(record: &ServerRecord, app: &App) -> Vec<Line<'static>> {
        let theme = &*app.ctx.theme;
        if record.is_placeholder() {
            return vec![Line::from(Span::styled(
                "This MCP server is no longer in the list. Press Esc to go back.",
                theme.text_muted_style(),
            ))];
        }
        let mut lines = vec![
            Self::field_line("Server ID", record.id.clone(), theme),
            Self::field_line("Name", Self::or_dash(record.name.as_deref()), theme),
            Self::field_line("Description", Self::or_dash(record.description.as_deref()), theme),
            Self::field_line("Transport", record.transport_kind.display().to_string(), theme),
            Self::field_line("Auth Type", record.auth_kind.display().to_string(), theme),
            Self::field_line("URL", record.endpoint_url.clone(), theme),
            Line::default(),
            Self::field_line("Created", format_date_time(record.created_at.as_deref()), theme),
            Self::field_line("Created By", Self::or_dash(record.created_by.as_deref()), theme),
            Self::field_line("Updated", format_date_time(record.updated_at.as_deref()), theme),
            Self::field_line("Updated By", Self::or_dash(record.updated_by.as_deref()), theme),
        ];
        if let Some(role) = app.ctx.session.user_role() {
            let access = if app.ctx.session.is_proxy_admin() {
                "full access"
            } else if role.is_admin() {
                "admin"
            } else {
                "read only"
            };
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(format!("Signed in as {role} ({access})"), theme.text_muted_style())));
        }
        lines
    }
}

impl Component for ServerDetailsComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let is_admin = app.is_admin();
        let Some(detail) = app.servers.detail.as_mut() else {
            return app.close_detail();
        };

        if let Some(form) = detail.form.as_mut() {
            return match handle_form_key(form, key) {
                FormAction::Submit => app.submit_update(),
                FormAction::Cancel => app.close_detail(),
                FormAction::None => Vec::new(),
            };
        }

        match key.code {
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => app.close_detail(),
            KeyCode::Char('e') if is_admin && !detail.record.is_placeholder() => {
                detail.start_editing();
                Vec::new()
            }
            KeyCode::Char('y') if key.modifiers.contains(KeyModifiers::CONTROL) && !detail.record.endpoint_url.is_empty() => {
                vec![Effect::CopyToClipboardRequested(detail.record.endpoint_url.clone())]
            }
            KeyCode::Char('q') => vec![Effect::Quit],
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let theme = &*app.ctx.theme;
        let Some(detail) = app.servers.detail.as_ref() else {
            return;
        };
        let title = if detail.is_editing {
            format!("Edit MCP Server: {}", detail.record.display_name())
        } else if detail.record.is_placeholder() {
            "MCP Server".to_string()
        } else {
            format!("MCP Server: {}", detail.record.display_name())
        };
        let block = th::block(theme, Some(title.as_str()), true);
        let inner = block.inner(rect);
        frame.render_widget(block, rect);

        match detail.form.as_ref() {
            Some(form) => {
                let [id_area, _, form_area] = Layout::vertical([
                    Constraint::Length(1),
                    Constraint::Length(1),
                    Constraint::Min(0),
                ])
                .areas(inner);
                frame.render_widget(
                    Paragraph::new(Self::field_line("Server ID", detail.record.id.clone(), theme)),
                    id_area,
                );
                render_form(frame, form_area, form, theme);
            }
            None => {
                let lines = Self::detail_lines(&detail.record, app);
                frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
            }
        }
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'static>> {
        let theme = &*app.ctx.theme;
        let editing = app.servers.detail.as_ref().is_some_and(|detail| detail.is_editing);
        if editing {
            return th::build_hint_spans(theme, form_hints());
        }
        let mut hints = vec![("Esc", "Back")];
        if app.is_admin() {
            hints.push(("e", "Edit"));
        }
        hints.push(("Ctrl+Y", "Copy URL"));
        th::build_hint_spans(theme, &hints)
    }
}
