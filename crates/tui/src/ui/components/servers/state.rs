//! State for the MCP server view: table cursor, detail selection, the delete
//! confirmation machine, and the create form.

use mcpdash_types::ServerRecord;
use rat_focus::FocusFlag;
use ratatui::layout::Rect;

use super::form::ServerFormState;

/// Delete confirmation machine. `Confirming` holds the target id until the
/// user either confirms or cancels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DeleteState {
    #[default]
    Idle,
    Confirming { server_id: String },
}

/// Cursor and hit-testing data for the server table.
#[derive(Debug, Clone)]
pub struct ServersTableState {
    pub f_grid: FocusFlag,
    /// Row under the cursor, as an index into the fetched collection.
    pub selected: Option<usize>,
    /// First visible row.
    pub offset: usize,
    /// Area of the rendered rows (header excluded), for mouse hit tests.
    pub rows_area: Rect,
    /// Horizontal span of the id column inside `rows_area`.
    pub id_column: (u16, u16),
}

impl Default for ServersTableState {
    fn default() -> Self {
        let f_grid = FocusFlag::named("servers.grid");
        f_grid.set(true);
        Self {
            f_grid,
            selected: None,
            offset: 0,
            rows_area: Rect::default(),
            id_column: (0, 0),
        }
    }
}

impl ServersTableState {
    /// Keep the cursor inside `len` rows after the collection changed.
    pub fn normalize_selection(&mut self, len: usize) {
        self.selected = match (self.selected, len) {
            (_, 0) => None,
            (None, _) => Some(0),
            (Some(index), len) => Some(index.min(len - 1)),
        };
        if self.offset >= len {
            self.offset = len.saturating_sub(1);
        }
    }

    pub fn select_previous(&mut self, len: usize) {
        if len == 0 {
            self.selected = None;
            return;
        }
        self.selected = Some(self.selected.map_or(0, |index| index.saturating_sub(1)));
    }

    pub fn select_next(&mut self, len: usize) {
        if len == 0 {
            self.selected = None;
            return;
        }
        self.selected = Some(self.selected.map_or(0, |index| (index + 1).min(len - 1)));
    }

    /// Scroll so the cursor is visible in a viewport of `height` rows.
    pub fn ensure_visible(&mut self, height: usize) {
        let Some(selected) = self.selected else {
            return;
        };
        if height == 0 {
            return;
        }
        if selected < self.offset {
            self.offset = selected;
        } else if selected >= self.offset + height {
            self.offset = selected + 1 - height;
        }
    }

    /// Map a terminal row to a collection index, if it falls on a row.
    pub fn row_at(&self, row: u16, len: usize) -> Option<usize> {
        let area = self.rows_area;
        if row < area.y || row >= area.y + area.height {
            return None;
        }
        let index = self.offset + (row - area.y) as usize;
        (index < len).then_some(index)
    }

    pub fn is_in_id_column(&self, column: u16) -> bool {
        let (start, width) = self.id_column;
        column >= start && column < start + width
    }
}

/// The record shown by the detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerDetailState {
    pub record: ServerRecord,
    pub is_editing: bool,
    /// Present while editing.
    pub form: Option<ServerFormState>,
}

impl ServerDetailState {
    pub fn new(record: ServerRecord, is_editing: bool) -> Self {
        let form = is_editing.then(|| ServerFormState::from_record(&record));
        Self {
            record,
            is_editing,
            form,
        }
    }

    pub fn start_editing(&mut self) {
        self.is_editing = true;
        self.form = Some(ServerFormState::from_record(&self.record));
    }

    /// Leave edit mode showing `record`.
    pub fn finish_editing(&mut self, record: ServerRecord) {
        self.record = record;
        self.is_editing = false;
        self.form = None;
    }
}

#[derive(Debug, Clone, Default)]
pub struct ServersState {
    pub table: ServersTableState,
    pub delete: DeleteState,
    /// Set while the detail route is active; cleared on the way back.
    pub detail: Option<ServerDetailState>,
    /// Set while the create route is active.
    pub create: Option<ServerFormState>,
}

impl ServersState {
    /// Look `server_id` up in `records`, or hand back an empty placeholder
    /// when it is no longer present.
    pub fn lookup(records: &[ServerRecord], server_id: &str) -> ServerRecord {
        records
            .iter()
            .find(|record| record.id == server_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn pending_delete(&self) -> Option<&str> {
        match &self.delete {
            DeleteState::Confirming { server_id } => Some(server_id.as_str()),
            DeleteState::Idle => None,
        }
    }
}
