//! List view of MCP servers: the table, its status line, and the admin
//! action buttons.

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use mcpdash_types::{Effect, ServerRecord, Severity};
use mcpdash_util::{format_date, truncate_to_width};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    text::{Line, Span},
    widgets::{Borders, HighlightSpacing, Paragraph, Row, Table, TableState},
};

use crate::{
    app::App,
    query::QueryStatus,
    ui::{
        components::component::Component,
        theme::{
            Theme,
            theme_helpers::{self as th, button_primary_style, button_secondary_style, render_button},
        },
        utils::THROBBER_FRAMES,
    },
};

const ID_COLUMN_WIDTH: u16 = 14;
const NAME_COLUMN_WIDTH: u16 = 16;
const TRANSPORT_COLUMN_WIDTH: u16 = 9;
const AUTH_COLUMN_WIDTH: u16 = 12;
const CREATED_COLUMN_WIDTH: u16 = 10;
const INFO_COLUMN_WIDTH: u16 = 7;

const TABLE_HEADERS: &[&str] = &["Server ID", "Name", "Description", "Transport", "Auth Type", "URL", "Created", "Info"];

/// Per-row markers for the edit and delete actions.
const ROW_ACTION_MARKERS: &str = "[e] [d]";

#[derive(Debug, PartialEq, Eq)]
enum ServerTableHitArea {
    Table(Rect),
    AddButton(Rect),
    EditButton(Rect),
    DeleteButton(Rect),
}

impl ServerTableHitArea {
    fn rect(&self) -> &Rect {
        match self {
            Self::Table(r) | Self::AddButton(r) | Self::EditButton(r) | Self::DeleteButton(r) => r,
        }
    }
}

#[derive(Debug, Default)]
pub struct ServersTableComponent {
    hit_areas: Vec<ServerTableHitArea>,
}

impl ServersTableComponent {
    fn selected_id(app: &App) -> Option<String> {
        app.selected_record().map(|record| record.id.clone())
    }

    fn open_selected(app: &mut App, is_editing: bool) -> Vec<Effect> {
        match Self::selected_id(app) {
            Some(id) => app.open_detail(&id, is_editing),
            None => Vec::new(),
        }
    }

    fn delete_selected(app: &mut App) -> Vec<Effect> {
        match Self::selected_id(app) {
            Some(id) => app.request_delete(&id),
            None => Vec::new(),
        }
    }

    fn widths() -> [Constraint; 8] {
        [
            Constraint::Length(ID_COLUMN_WIDTH),
            Constraint::Length(NAME_COLUMN_WIDTH),
            Constraint::Fill(1),
            Constraint::Length(TRANSPORT_COLUMN_WIDTH),
            Constraint::Length(AUTH_COLUMN_WIDTH),
            Constraint::Fill(2),
            Constraint::Length(CREATED_COLUMN_WIDTH),
            Constraint::Length(INFO_COLUMN_WIDTH),
        ]
    }

    fn create_table_header(theme: &dyn Theme) -> Row<'static> {
        let cells = TABLE_HEADERS
            .iter()
            .map(|&header| Span::styled(header, th::table_header_style(theme)));
        Row::new(cells).style(th::table_header_row_style(theme))
    }

    /// One row per record, in fetch order.
    fn create_table_rows(records: &[ServerRecord], is_admin: bool, theme: &dyn Theme) -> Vec<Row<'static>> {
        records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let created = format_date(record.created_at.as_deref());
                let info = if is_admin { ROW_ACTION_MARKERS } else { "" };
                Row::new(vec![
                    Span::styled(
                        truncate_to_width(&record.id, ID_COLUMN_WIDTH as usize),
                        theme.accent_primary_style(),
                    ),
                    Span::raw(record.name.clone().unwrap_or_default()),
                    Span::raw(record.description.clone().unwrap_or_default()),
                    Span::raw(record.transport_kind.display().to_string()),
                    Span::raw(record.auth_kind.display().to_string()),
                    Span::raw(record.endpoint_url.clone()),
                    Span::raw(created),
                    Span::styled(info, theme.text_muted_style()),
                ])
                .style(th::table_row_style(theme, index))
            })
            .collect()
    }

    fn status_line(app: &App) -> Line<'static> {
        let theme = &*app.ctx.theme;
        let count = app.server_records().len();
        if app.is_loading_servers() {
            let frame = THROBBER_FRAMES[app.throbber_idx % THROBBER_FRAMES.len()];
            return Line::from(vec![
                Span::styled(format!("{frame} "), theme.accent_emphasis_style()),
                Span::styled("Loading MCP servers…", theme.text_muted_style()),
            ]);
        }
        match app.server_list_status() {
            QueryStatus::Failed(message) => Line::from(vec![
                Span::styled(format!("Failed to load MCP servers: {message}"), theme.severity_style(Severity::Error)),
                Span::styled("  (r to retry)", theme.text_muted_style()),
            ]),
            QueryStatus::Ready | QueryStatus::Idle | QueryStatus::Loading => {
                Line::from(Span::styled(format!("{count} MCP server(s)"), theme.text_muted_style()))
            }
        }
    }

    /// Full URL of the selected row; the table column may be truncated.
    fn selection_line(app: &App) -> Line<'static> {
        let theme = &*app.ctx.theme;
        match app.selected_record() {
            Some(record) => Line::from(vec![
                Span::styled("URL: ", theme.text_muted_style()),
                Span::styled(record.endpoint_url.clone(), theme.text_primary_style()),
            ]),
            None => Line::default(),
        }
    }

    fn render_action_buttons(frame: &mut Frame, area: Rect, app: &App) -> Vec<ServerTableHitArea> {
        let theme = &*app.ctx.theme;
        let columns = Layout::horizontal([
            Constraint::Length(24), // Add button
            Constraint::Min(0),
            Constraint::Length(10), // Edit button
            Constraint::Length(2),
            Constraint::Length(12), // Delete button
        ])
        .split(area);
        let has_selection = app.selected_record().is_some();
        render_button(
            frame,
            columns[0],
            "Add New MCP Server",
            button_secondary_style(theme, false),
            false,
            theme,
            Borders::ALL,
        );
        let mut hit_areas = vec![ServerTableHitArea::AddButton(columns[0])];
        if has_selection {
            render_button(frame, columns[2], "Edit", button_secondary_style(theme, false), false, theme, Borders::ALL);
            render_button(
                frame,
                columns[4],
                "Delete",
                button_primary_style(theme, Severity::Error, false),
                false,
                theme,
                Borders::ALL,
            );
            hit_areas.push(ServerTableHitArea::EditButton(columns[2]));
            hit_areas.push(ServerTableHitArea::DeleteButton(columns[4]));
        }
        hit_areas
    }

    fn handle_table_click(app: &mut App, column: u16, row: u16) -> Vec<Effect> {
        let len = app.server_records().len();
        let Some(index) = app.servers.table.row_at(row, len) else {
            return Vec::new();
        };
        app.servers.table.selected = Some(index);
        if app.servers.table.is_in_id_column(column) {
            return Self::open_selected(app, false);
        }
        Vec::new()
    }
}

impl Component for ServersTableComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let len = app.server_records().len();
        let is_admin = app.is_admin();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                app.servers.table.select_previous(len);
                Vec::new()
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.servers.table.select_next(len);
                Vec::new()
            }
            KeyCode::Enter => Self::open_selected(app, false),
            KeyCode::Char('e') if is_admin => Self::open_selected(app, true),
            KeyCode::Char('d') if is_admin => Self::delete_selected(app),
            KeyCode::Char('n') if is_admin => app.open_create(),
            KeyCode::Char('r') => app.refresh(),
            KeyCode::Char('q') => vec![Effect::Quit],
            _ => Vec::new(),
        }
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        let MouseEvent { kind, column, row, .. } = mouse;
        let len = app.server_records().len();
        match kind {
            MouseEventKind::ScrollUp => {
                app.servers.table.select_previous(len);
                Vec::new()
            }
            MouseEventKind::ScrollDown => {
                app.servers.table.select_next(len);
                Vec::new()
            }
            MouseEventKind::Down(MouseButton::Left) => {
                let position = Position::new(column, row);
                let hit = self.hit_areas.iter().find(|area| area.rect().contains(position));
                match hit {
                    Some(ServerTableHitArea::Table(_)) => Self::handle_table_click(app, column, row),
                    Some(ServerTableHitArea::AddButton(_)) => app.open_create(),
                    Some(ServerTableHitArea::EditButton(_)) => Self::open_selected(app, true),
                    Some(ServerTableHitArea::DeleteButton(_)) => Self::delete_selected(app),
                    None => Vec::new(),
                }
            }
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let is_admin = app.is_admin();
        let block = th::block(&*app.ctx.theme, Some("MCP Servers"), app.servers.table.f_grid.get());
        let inner = block.inner(rect);
        frame.render_widget(block, rect);

        let [status_area, table_area, selection_area, actions_area] = self.get_preferred_layout(app, inner)[..] else {
            return;
        };

        frame.render_widget(Paragraph::new(Self::status_line(app)), status_area);

        // Header occupies the first line of the table area.
        let rows_area = Rect {
            y: table_area.y.saturating_add(1),
            height: table_area.height.saturating_sub(1),
            ..table_area
        };
        let len = app.server_records().len();
        app.servers.table.normalize_selection(len);
        app.servers.table.ensure_visible(rows_area.height as usize);
        app.servers.table.rows_area = rows_area;
        app.servers.table.id_column = (rows_area.x, ID_COLUMN_WIDTH);

        let theme = &*app.ctx.theme;
        let rows = Self::create_table_rows(app.server_records(), is_admin, theme);
        let table = Table::new(rows, Self::widths())
            .header(Self::create_table_header(theme))
            .row_highlight_style(theme.selection_style())
            .highlight_spacing(HighlightSpacing::Never)
            .style(th::panel_style(theme));
        let mut table_state = TableState::default()
            .with_offset(app.servers.table.offset)
            .with_selected(app.servers.table.selected);
        frame.render_stateful_widget(table, table_area, &mut table_state);

        frame.render_widget(Paragraph::new(Self::selection_line(app)), selection_area);

        self.hit_areas = vec![ServerTableHitArea::Table(rows_area)];
        if is_admin {
            self.hit_areas.extend(Self::render_action_buttons(frame, actions_area, app));
        }
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'static>> {
        let mut hints = vec![("↑/↓", "Move"), ("Enter", "Details")];
        if app.is_admin() {
            hints.extend([("e", "Edit"), ("d", "Delete"), ("n", "New")]);
        }
        hints.extend([("r", "Refresh"), ("q", "Quit")]);
        th::build_hint_spans(&*app.ctx.theme, &hints)
    }

    fn get_preferred_layout(&self, app: &App, area: Rect) -> Vec<Rect> {
        let actions_height = if app.is_admin() { 3 } else { 0 };
        Layout::vertical([
            Constraint::Length(1),              // Status
            Constraint::Min(2),                 // Table
            Constraint::Length(1),              // Selected URL
            Constraint::Length(actions_height), // Action buttons
        ])
        .split(area)
        .to_vec()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crossterm::event::KeyModifiers;
    use mcpdash_types::{ExecOutcome, Modal, Msg, Route, Session};
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::test_support::{FakeServerApi, admin_session, buffer_lines, record, viewer_session};

    fn loaded_app(session: Session, records: Vec<ServerRecord>) -> App {
        let mut app = App::new(session, Arc::new(FakeServerApi::default()));
        let key = app.server_list_key().expect("credential");
        let generation = app.queries.begin_fetch(key);
        app.update(&Msg::ExecCompleted(Box::new(ExecOutcome::ServersFetched {
            generation,
            result: Ok(records),
        })));
        app
    }

    fn render(app: &mut App, component: &mut ServersTableComponent) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(140, 20)).expect("terminal");
        terminal
            .draw(|frame| component.render(frame, frame.area(), app))
            .expect("draw");
        buffer_lines(terminal.backend().buffer())
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn renders_one_row_per_record_in_fetch_order() {
        let mut app = loaded_app(admin_session(), vec![record("srv-b"), record("srv-a"), record("srv-c")]);
        let mut component = ServersTableComponent::default();
        let lines = render(&mut app, &mut component);
        let row_lines: Vec<&String> = lines.iter().filter(|line| line.contains(" name")).collect();
        assert_eq!(row_lines.len(), 3);
        assert!(row_lines[0].contains("srv-b"));
        assert!(row_lines[1].contains("srv-a"));
        assert!(row_lines[2].contains("srv-c"));
        assert!(lines.iter().any(|line| line.contains("N/A")));
    }

    #[test]
    fn viewers_see_no_row_actions() {
        let mut app = loaded_app(viewer_session(), vec![record("srv-a"), record("srv-b")]);
        let mut component = ServersTableComponent::default();
        let lines = render(&mut app, &mut component);
        assert!(lines.iter().all(|line| !line.contains(ROW_ACTION_MARKERS)));
        assert!(lines.iter().all(|line| !line.contains("Delete")));
        assert!(component.handle_key_events(&mut app, key(KeyCode::Char('d'))).is_empty());
        assert!(component.handle_key_events(&mut app, key(KeyCode::Char('n'))).is_empty());
        assert_eq!(component.handle_key_events(&mut app, key(KeyCode::Char('e'))), Vec::new());
    }

    #[test]
    fn admins_see_row_actions() {
        let mut app = loaded_app(admin_session(), vec![record("srv-a")]);
        let mut component = ServersTableComponent::default();
        let lines = render(&mut app, &mut component);
        assert!(lines.iter().any(|line| line.contains(ROW_ACTION_MARKERS)));
        assert_eq!(
            component.handle_key_events(&mut app, key(KeyCode::Char('d'))),
            vec![Effect::ShowModal(Modal::ConfirmDelete)]
        );
    }

    #[test]
    fn enter_opens_selected_record() {
        let mut app = loaded_app(viewer_session(), vec![record("srv-a"), record("srv-b")]);
        let mut component = ServersTableComponent::default();
        component.handle_key_events(&mut app, key(KeyCode::Down));
        let effects = component.handle_key_events(&mut app, key(KeyCode::Enter));
        assert_eq!(effects, vec![Effect::SwitchTo(Route::ServerDetail)]);
        assert_eq!(app.servers.detail.as_ref().map(|d| d.record.id.as_str()), Some("srv-b"));
    }

    #[test]
    fn clicking_an_id_opens_that_record() {
        let mut app = loaded_app(viewer_session(), vec![record("srv-a"), record("srv-b")]);
        let mut component = ServersTableComponent::default();
        render(&mut app, &mut component);
        let rows_area = app.servers.table.rows_area;
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: rows_area.x + 1,
            row: rows_area.y + 1,
            modifiers: KeyModifiers::NONE,
        };
        let effects = component.handle_mouse_events(&mut app, click);
        assert_eq!(effects, vec![Effect::SwitchTo(Route::ServerDetail)]);
        assert_eq!(app.servers.detail.as_ref().map(|d| d.record.id.as_str()), Some("srv-b"));
    }

    #[test]
    fn fetch_failure_renders_inline() {
        let mut app = App::new(admin_session(), Arc::new(FakeServerApi::default()));
        let key = app.server_list_key().expect("credential");
        let generation = app.queries.begin_fetch(key);
        app.update(&Msg::ExecCompleted(Box::new(ExecOutcome::ServersFetched {
            generation,
            result: Err("connection refused".into()),
        })));
        let mut component = ServersTableComponent::default();
        let lines = render(&mut app, &mut component);
        assert!(lines.iter().any(|line| line.contains("Failed to load MCP servers: connection refused")));
    }

    #[test]
    fn refetch_shows_throbber_until_the_list_lands() {
        let mut app = loaded_app(viewer_session(), vec![record("srv-a")]);
        let key = app.server_list_key().expect("credential");
        let generation = app.queries.begin_fetch(key);
        assert!(app.is_loading_servers());
        let mut component = ServersTableComponent::default();
        let lines = render(&mut app, &mut component);
        assert!(lines.iter().any(|line| line.contains("Loading MCP servers")));

        app.update(&Msg::ExecCompleted(Box::new(ExecOutcome::ServersFetched {
            generation,
            result: Ok(vec![record("srv-a"), record("srv-b")]),
        })));
        assert!(!app.is_loading_servers());
        let lines = render(&mut app, &mut component);
        assert!(lines.iter().all(|line| !line.contains("Loading MCP servers")));
        assert!(lines.iter().any(|line| line.contains("2 MCP server(s)")));
    }
}
