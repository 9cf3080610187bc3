//! Application state for the server administration console.
//!
//! `App` owns the caller session, the query store holding the fetched server
//! list, the per-view UI state, and the transient notification. Components
//! mutate it through the methods below and report side effects as [`Effect`]s;
//! the runtime executes those effects and feeds results back through
//! [`App::update`].

use std::{
    mem,
    sync::Arc,
    time::{Duration, Instant},
};

use mcpdash_api::ServerApi;
use mcpdash_types::{ConfirmationChoice, Effect, ExecOutcome, Modal, Msg, Route, ServerRecord, Session, Severity};
use tracing::{debug, error, info};

use crate::{
    query::{QueryKey, QueryStatus, QueryStore},
    ui::{
        components::{
            common::{ConfirmationModalOpts, ConfirmationModalState},
            servers::{DeleteState, ServerDetailState, ServerFormState, ServersState},
        },
        theme::{self, Theme},
    },
};

/// How long a notification stays on screen.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(4);

/// Cross-cutting shared context owned by the App.
pub struct SharedCtx {
    pub theme: Box<dyn Theme>,
    pub session: Session,
    pub api: Arc<dyn ServerApi>,
}

impl SharedCtx {
    pub fn new(session: Session, api: Arc<dyn ServerApi>) -> Self {
        Self {
            theme: theme::load(),
            session,
            api,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
    pub expires_at: Instant,
}

pub struct App {
    pub ctx: SharedCtx,
    /// Current primary route
    pub route: Route,
    pub open_modal: Option<Modal>,
    pub servers: ServersState,
    pub queries: QueryStore<Vec<ServerRecord>>,
    pub confirmation_modal_state: ConfirmationModalState,
    pub notification: Option<Notification>,
    /// Whether background requests are in flight
    pub executing: bool,
    /// Throbber frame index while `executing`
    pub throbber_idx: usize,
    pub should_quit: bool,
}

impl App {
    pub fn new(session: Session, api: Arc<dyn ServerApi>) -> Self {
        Self {
            ctx: SharedCtx::new(session, api),
            route: Route::default(),
            open_modal: None,
            servers: ServersState::default(),
            queries: QueryStore::new(),
            confirmation_modal_state: ConfirmationModalState::default(),
            notification: None,
            executing: false,
            throbber_idx: 0,
            should_quit: false,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.ctx.session.is_admin()
    }

    /// Key of the list query for the current credential, if any.
    pub fn server_list_key(&self) -> Option<QueryKey> {
        self.ctx.session.credential.as_deref().map(QueryKey::server_list)
    }

    /// Last fetched collection, in fetch order.
    pub fn server_records(&self) -> &[ServerRecord] {
        self.server_list_key()
            .and_then(|key| self.queries.data(&key))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn server_list_status(&self) -> QueryStatus {
        self.server_list_key()
            .map(|key| self.queries.status(&key))
            .unwrap_or_default()
    }

    /// True while a list fetch for the current credential is in flight.
    pub fn is_loading_servers(&self) -> bool {
        self.server_list_key().is_some_and(|key| self.queries.is_loading(&key))
    }

    pub fn selected_record(&self) -> Option<&ServerRecord> {
        self.servers.table.selected.and_then(|index| self.server_records().get(index))
    }

    pub fn notify(&mut self, severity: Severity, message: impl Into<String>) {
        self.notification = Some(Notification {
            severity,
            message: message.into(),
            expires_at: Instant::now() + NOTIFICATION_TTL,
        });
    }

    /// Effects to run once the event loop is up. Nothing is requested while
    /// the session is incomplete.
    pub fn on_start(&self) -> Vec<Effect> {
        if self.ctx.session.is_complete() {
            vec![Effect::FetchServers]
        } else {
            let missing = self.ctx.session.missing_parameters();
            info!(?missing, "session incomplete; no data operations will run");
            Vec::new()
        }
    }

    pub fn refresh(&self) -> Vec<Effect> {
        self.on_start()
    }

    /// Switch to the detail view for `server_id`. Editing requires an
    /// administrative role; a non-admin request opens the read-only view.
    pub fn open_detail(&mut self, server_id: &str, is_editing: bool) -> Vec<Effect> {
        let record = ServersState::lookup(self.server_records(), server_id);
        let is_editing = is_editing && self.is_admin();
        self.servers.detail = Some(ServerDetailState::new(record, is_editing));
        vec![Effect::SwitchTo(Route::ServerDetail)]
    }

    /// Leave the detail view. The list is shown from the store as-is.
    pub fn close_detail(&mut self) -> Vec<Effect> {
        self.servers.detail = None;
        vec![Effect::SwitchTo(Route::ServerList)]
    }

    /// `idle -> confirming`: remember the target and open the dialog.
    pub fn request_delete(&mut self, server_id: &str) -> Vec<Effect> {
        if !self.is_admin() {
            return Vec::new();
        }
        let label = ServersState::lookup(self.server_records(), server_id)
            .display_name()
            .to_string();
        let label = if label.is_empty() { server_id.to_string() } else { label };
        self.servers.delete = DeleteState::Confirming {
            server_id: server_id.to_string(),
        };
        self.confirmation_modal_state.update_opts(ConfirmationModalOpts {
            title: Some("Delete MCP Server".to_string()),
            message: Some(format!(
                "Are you sure you want to delete the MCP server \"{label}\"? This action cannot be undone."
            )),
            severity: Some(Severity::Warning),
            confirm_label: Some("Delete".to_string()),
            cancel_label: Some("Cancel".to_string()),
        });
        vec![Effect::ShowModal(Modal::ConfirmDelete)]
    }

    /// `confirming -> idle` through the commit path. The stored id moves
    /// into the delete effect.
    pub fn confirm_delete(&mut self) -> Vec<Effect> {
        match mem::take(&mut self.servers.delete) {
            DeleteState::Confirming { server_id } => vec![Effect::DeleteServer(server_id)],
            DeleteState::Idle => Vec::new(),
        }
    }

    pub fn cancel_delete(&mut self) -> Vec<Effect> {
        if let Some(server_id) = self.servers.pending_delete() {
            debug!(server_id, "delete cancelled");
        }
        self.servers.delete = DeleteState::Idle;
        Vec::new()
    }

    pub fn open_create(&mut self) -> Vec<Effect> {
        if !self.is_admin() {
            return Vec::new();
        }
        self.servers.create = Some(ServerFormState::new());
        vec![Effect::SwitchTo(Route::ServerCreate)]
    }

    pub fn close_create(&mut self) -> Vec<Effect> {
        self.servers.create = None;
        vec![Effect::SwitchTo(Route::ServerList)]
    }

    pub fn submit_create(&mut self) -> Vec<Effect> {
        let Some(form) = self.servers.create.as_mut() else {
            return Vec::new();
        };
        if form.submitting {
            return Vec::new();
        }
        match form.to_new_server() {
            Ok(payload) => {
                form.error = None;
                form.submitting = true;
                vec![Effect::CreateServer(payload)]
            }
            Err(message) => {
                form.error = Some(message);
                Vec::new()
            }
        }
    }

    pub fn submit_update(&mut self) -> Vec<Effect> {
        if !self.is_admin() {
            return Vec::new();
        }
        let Some(detail) = self.servers.detail.as_mut() else {
            return Vec::new();
        };
        let server_id = detail.record.id.clone();
        let Some(form) = detail.form.as_mut() else {
            return Vec::new();
        };
        if form.submitting {
            return Vec::new();
        }
        match form.to_update(&server_id) {
            Ok(payload) => {
                form.error = None;
                form.submitting = true;
                vec![Effect::UpdateServer(payload)]
            }
            Err(message) => {
                form.error = Some(message);
                Vec::new()
            }
        }
    }

    /// Mark the list stale after a mutation and request exactly one re-fetch
    /// when the query is known.
    fn invalidate_server_list(&mut self) -> Vec<Effect> {
        match self.server_list_key() {
            Some(key) if self.queries.invalidate(&key) => vec![Effect::FetchServers],
            _ => Vec::new(),
        }
    }

    /// Apply a message and return follow-up effects.
    pub fn update(&mut self, msg: &Msg) -> Vec<Effect> {
        match msg {
            Msg::Tick => {
                if self.notification.as_ref().is_some_and(|n| n.expires_at <= Instant::now()) {
                    self.notification = None;
                }
                if self.executing {
                    self.throbber_idx = (self.throbber_idx + 1) % 10;
                }
                Vec::new()
            }
            Msg::Resize(..) => Vec::new(),
            Msg::ExecCompleted(outcome) => self.apply_outcome(outcome.as_ref().clone()),
            Msg::ConfirmationModalButtonClicked(ConfirmationChoice::Confirm) => self.confirm_delete(),
            Msg::ConfirmationModalButtonClicked(ConfirmationChoice::Cancel) | Msg::ConfirmationModalClosed => {
                self.cancel_delete()
            }
        }
    }

    fn apply_outcome(&mut self, outcome: ExecOutcome) -> Vec<Effect> {
        match outcome {
            ExecOutcome::ServersFetched { generation, result } => {
                let Some(key) = self.server_list_key() else {
                    return Vec::new();
                };
                if !self.queries.resolve(key, generation, result) {
                    debug!(generation, "discarded superseded server list");
                    return Vec::new();
                }
                let len = self.server_records().len();
                self.servers.table.normalize_selection(len);
                Vec::new()
            }
            ExecOutcome::ServerDeleted { server_id, result } => match result {
                Ok(()) => {
                    info!(%server_id, "server deleted");
                    self.notify(Severity::Success, "MCP Server deleted successfully");
                    self.invalidate_server_list()
                }
                Err(message) => {
                    error!(%server_id, error = %message, "failed to delete server");
                    self.notify(Severity::Error, format!("Failed to delete MCP server: {message}"));
                    Vec::new()
                }
            },
            ExecOutcome::ServerCreated(result) => match result {
                Ok(record) => {
                    info!(server_id = %record.id, "server created");
                    self.notify(Severity::Success, "MCP Server created successfully");
                    self.servers.create = None;
                    let mut effects = vec![Effect::SwitchTo(Route::ServerList)];
                    effects.extend(self.invalidate_server_list());
                    effects
                }
                Err(message) => {
                    if let Some(form) = self.servers.create.as_mut() {
                        form.submitting = false;
                    }
                    self.notify(Severity::Error, format!("Failed to create MCP server: {message}"));
                    Vec::new()
                }
            },
            ExecOutcome::ServerUpdated(result) => match result {
                Ok(record) => {
                    info!(server_id = %record.id, "server updated");
                    if let Some(detail) = self.servers.detail.as_mut() {
                        detail.finish_editing(record);
                    }
                    self.notify(Severity::Success, "MCP Server updated successfully");
                    self.invalidate_server_list()
                }
                Err(message) => {
                    if let Some(form) = self.servers.detail.as_mut().and_then(|detail| detail.form.as_mut()) {
                        form.submitting = false;
                    }
                    self.notify(Severity::Error, format!("Failed to update MCP server: {message}"));
                    Vec::new()
                }
            },
            ExecOutcome::Log(message) => {
                self.notify(Severity::Info, message);
                Vec::new()
            }
        }
    }

    /// Apply a navigation effect. Returns `false` for any other effect.
    pub fn navigate(&mut self, effect: &Effect) -> bool {
        match effect {
            Effect::SwitchTo(route) => {
                self.route = *route;
                true
            }
            Effect::ShowModal(modal) => {
                self.open_modal = Some(*modal);
                true
            }
            Effect::CloseModal => {
                self.open_modal = None;
                true
            }
            Effect::Quit => {
                self.should_quit = true;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use mcpdash_types::NewServer;

    use super::*;
    use crate::test_support::{FakeServerApi, admin_session, record, viewer_session};

    fn loaded_app(session: Session, records: Vec<ServerRecord>) -> App {
        let mut app = App::new(session, Arc::new(FakeServerApi::default()));
        let key = app.server_list_key().expect("credential present");
        let generation = app.queries.begin_fetch(key);
        app.update(&Msg::ExecCompleted(Box::new(ExecOutcome::ServersFetched {
            generation,
            result: Ok(records),
        })));
        app
    }

    #[test]
    fn incomplete_session_requests_nothing() {
        let app = App::new(Session::new(None, Some("proxy_admin".into()), None), Arc::new(FakeServerApi::default()));
        assert!(app.on_start().is_empty());
        assert!(app.refresh().is_empty());
    }

    #[test]
    fn complete_session_fetches_on_start() {
        let app = App::new(admin_session(), Arc::new(FakeServerApi::default()));
        assert_eq!(app.on_start(), vec![Effect::FetchServers]);
    }

    #[test]
    fn selecting_and_returning_does_not_refetch() {
        let mut app = loaded_app(viewer_session(), vec![record("a"), record("b")]);
        let effects = app.open_detail("b", false);
        assert_eq!(effects, vec![Effect::SwitchTo(Route::ServerDetail)]);
        let detail = app.servers.detail.as_ref().expect("detail open");
        assert_eq!(detail.record, record("b"));
        assert!(!detail.is_editing);

        assert_eq!(app.close_detail(), vec![Effect::SwitchTo(Route::ServerList)]);
        assert!(app.servers.detail.is_none());
    }

    #[test]
    fn unknown_id_opens_placeholder_and_viewers_cannot_edit() {
        let mut app = loaded_app(viewer_session(), vec![record("a")]);
        app.open_detail("missing", true);
        let detail = app.servers.detail.as_ref().expect("detail open");
        assert!(detail.record.is_placeholder());
        assert!(!detail.is_editing);
    }

    #[test]
    fn delete_then_cancel_has_no_effect() {
        let mut app = loaded_app(admin_session(), vec![record("a")]);
        assert_eq!(app.request_delete("a"), vec![Effect::ShowModal(Modal::ConfirmDelete)]);
        assert_eq!(app.servers.pending_delete(), Some("a"));
        assert!(app.update(&Msg::ConfirmationModalButtonClicked(ConfirmationChoice::Cancel)).is_empty());
        assert_eq!(app.servers.delete, DeleteState::Idle);
        assert_eq!(app.server_records().len(), 1);
    }

    #[test]
    fn delete_confirm_emits_one_delete_and_clears_target() {
        let mut app = loaded_app(admin_session(), vec![record("a")]);
        app.request_delete("a");
        let effects = app.update(&Msg::ConfirmationModalButtonClicked(ConfirmationChoice::Confirm));
        assert_eq!(effects, vec![Effect::DeleteServer("a".into())]);
        assert_eq!(app.servers.delete, DeleteState::Idle);
        assert!(app.confirm_delete().is_empty());
    }

    #[test]
    fn delete_success_refetches_once_and_notifies() {
        let mut app = loaded_app(admin_session(), vec![record("a")]);
        let effects = app.update(&Msg::ExecCompleted(Box::new(ExecOutcome::ServerDeleted {
            server_id: "a".into(),
            result: Ok(()),
        })));
        assert_eq!(effects, vec![Effect::FetchServers]);
        let notification = app.notification.as_ref().expect("notification");
        assert_eq!(notification.severity, Severity::Success);
        assert_eq!(notification.message, "MCP Server deleted successfully");
    }

    #[test]
    fn delete_failure_notifies_and_keeps_list() {
        let mut app = loaded_app(admin_session(), vec![record("a"), record("b")]);
        let effects = app.update(&Msg::ExecCompleted(Box::new(ExecOutcome::ServerDeleted {
            server_id: "a".into(),
            result: Err("403 forbidden".into()),
        })));
        assert!(effects.is_empty());
        assert_eq!(app.notification.as_ref().map(|n| n.severity), Some(Severity::Error));
        assert_eq!(app.server_records().len(), 2);
    }

    #[test]
    fn viewer_cannot_request_mutations() {
        let mut app = loaded_app(viewer_session(), vec![record("a")]);
        assert!(app.request_delete("a").is_empty());
        assert!(app.open_create().is_empty());
        assert_eq!(app.servers.delete, DeleteState::Idle);
    }

    #[test]
    fn create_validation_and_success_path() {
        let mut app = loaded_app(admin_session(), vec![record("a")]);
        app.open_create();
        assert!(app.submit_create().is_empty());
        assert_eq!(
            app.servers.create.as_ref().and_then(|form| form.error.clone()).as_deref(),
            Some("Required: Name, URL")
        );

        let form = app.servers.create.as_mut().expect("form");
        form.name = "docs".into();
        form.url = "https://docs.example/mcp".into();
        let effects = app.submit_create();
        assert!(matches!(effects.as_slice(), [Effect::CreateServer(NewServer { .. })]));
        assert!(app.submit_create().is_empty(), "double submit is ignored");

        let effects = app.update(&Msg::ExecCompleted(Box::new(ExecOutcome::ServerCreated(Ok(record("c"))))));
        assert_eq!(effects, vec![Effect::SwitchTo(Route::ServerList), Effect::FetchServers]);
        assert!(app.servers.create.is_none());
    }

    #[test]
    fn superseded_fetch_is_ignored() {
        let mut app = loaded_app(admin_session(), vec![record("a")]);
        let key = app.server_list_key().expect("key");
        let stale = app.queries.begin_fetch(key);
        let fresh = app.queries.begin_fetch(key);
        app.update(&Msg::ExecCompleted(Box::new(ExecOutcome::ServersFetched {
            generation: fresh,
            result: Ok(vec![record("x"), record("y")]),
        })));
        app.update(&Msg::ExecCompleted(Box::new(ExecOutcome::ServersFetched {
            generation: stale,
            result: Ok(vec![]),
        })));
        assert_eq!(app.server_records().len(), 2);
    }

    #[test]
    fn tick_expires_notifications() {
        let mut app = loaded_app(admin_session(), vec![]);
        app.notification = Some(Notification {
            severity: Severity::Info,
            message: "done".into(),
            expires_at: Instant::now() - Duration::from_millis(1),
        });
        app.update(&Msg::Tick);
        assert!(app.notification.is_none());
    }
}
