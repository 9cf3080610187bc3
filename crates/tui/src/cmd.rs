//! # Command Execution Layer
//!
//! Translates application [`Effect`]s into imperative [`Cmd`]s and executes
//! them. This is the boundary where the pure state of [`App`] meets the
//! outside world:
//! - writing to the system clipboard
//! - calling the server administration API
//!
//! Clipboard writes complete synchronously and come back as immediate
//! outcomes. API calls are spawned on the tokio runtime and their
//! [`JoinHandle`]s are handed to the runtime loop, which feeds each
//! [`ExecOutcome`] back through `Msg::ExecCompleted`.

use std::sync::Arc;

use mcpdash_api::ServerApi;
use mcpdash_types::{Effect, ExecOutcome, NewServer, ServerUpdate};
use tokio::task::{JoinHandle, spawn};
use tracing::{debug, error, warn};

use crate::app::App;

/// Side-effectful commands executed outside of pure state updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    /// Write text into the system clipboard.
    ClipboardSet(String),
    /// Fetch the server list; `generation` comes from the query store.
    ListServers { credential: String, generation: u64 },
    DeleteServer { credential: String, server_id: String },
    CreateServer { credential: String, payload: NewServer },
    UpdateServer { credential: String, payload: ServerUpdate },
}

/// Outcomes produced by a batch of commands.
#[derive(Debug, Default)]
pub struct CommandBatch {
    /// Outcomes that are already known (clipboard writes).
    pub immediate: Vec<ExecOutcome>,
    /// Spawned API calls still running.
    pub pending: Vec<JoinHandle<ExecOutcome>>,
}

/// Convert effects into commands. Navigation and message effects are not
/// commands and are ignored here; the runtime handles them first.
///
/// API effects need a credential; without one they are dropped, so an
/// incomplete session never reaches the network.
pub fn from_effects(app: &mut App, effects: Vec<Effect>) -> Vec<Cmd> {
    let mut commands = Vec::new();
    for effect in effects {
        if let Effect::CopyToClipboardRequested(text) = effect {
            commands.push(Cmd::ClipboardSet(text));
            continue;
        }
        let (Some(credential), Some(key)) = (app.ctx.session.credential.clone(), app.server_list_key()) else {
            debug!(?effect, "no credential; skipping API effect");
            continue;
        };
        let command = match effect {
            Effect::FetchServers => Cmd::ListServers {
                credential,
                generation: app.queries.begin_fetch(key),
            },
            Effect::DeleteServer(server_id) => Cmd::DeleteServer { credential, server_id },
            Effect::CreateServer(payload) => Cmd::CreateServer { credential, payload },
            Effect::UpdateServer(payload) => Cmd::UpdateServer { credential, payload },
            _ => continue,
        };
        commands.push(command);
    }
    commands
}

/// Execute commands, spawning API calls on the tokio runtime.
pub fn run_cmds(app: &App, commands: Vec<Cmd>) -> CommandBatch {
    let mut batch = CommandBatch::default();
    for command in commands {
        match command {
            Cmd::ClipboardSet(text) => batch.immediate.push(execute_clipboard_set(text)),
            other => batch.pending.push(spawn_api_call(Arc::clone(&app.ctx.api), other)),
        }
    }
    batch
}

/// Convenience wrapper running [`from_effects`] then [`run_cmds`].
pub fn run_from_effects(app: &mut App, effects: Vec<Effect>) -> CommandBatch {
    let commands = from_effects(app, effects);
    run_cmds(app, commands)
}

fn execute_clipboard_set(text: String) -> ExecOutcome {
    match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text)) {
        Ok(()) => ExecOutcome::Log("Copied to clipboard".to_string()),
        Err(err) => {
            warn!(error = %err, "clipboard write failed");
            ExecOutcome::Log(format!("Clipboard error: {err}"))
        }
    }
}

fn spawn_api_call(api: Arc<dyn ServerApi>, command: Cmd) -> JoinHandle<ExecOutcome> {
    spawn(async move { exec_api_call(api.as_ref(), command).await })
}

/// Run one API command to completion and describe the result.
pub async fn exec_api_call(api: &dyn ServerApi, command: Cmd) -> ExecOutcome {
    match command {
        Cmd::ListServers { credential, generation } => {
            let result = api.list_servers(&credential).await.map_err(|err| {
                error!(error = %err, "failed to fetch MCP servers");
                err.to_string()
            });
            ExecOutcome::ServersFetched { generation, result }
        }
        Cmd::DeleteServer { credential, server_id } => {
            let result = api.delete_server(&credential, &server_id).await.map_err(|err| err.to_string());
            ExecOutcome::ServerDeleted { server_id, result }
        }
        Cmd::CreateServer { credential, payload } => {
            let result = api.create_server(&credential, &payload).await.map_err(|err| {
                error!(error = %err, "failed to create MCP server");
                err.to_string()
            });
            ExecOutcome::ServerCreated(result)
        }
        Cmd::UpdateServer { credential, payload } => {
            let result = api.update_server(&credential, &payload).await.map_err(|err| {
                error!(server_id = %payload.server_id, error = %err, "failed to update MCP server");
                err.to_string()
            });
            ExecOutcome::ServerUpdated(result)
        }
        Cmd::ClipboardSet(text) => execute_clipboard_set(text),
    }
}

#[cfg(test)]
mod tests {
    use mcpdash_types::{Msg, Session};

    use super::*;
    use crate::test_support::{FakeCall, FakeServerApi, admin_session, record};

    async fn drain(app: &mut App, batch: CommandBatch) -> Vec<Effect> {
        let mut follow_ups = Vec::new();
        for handle in batch.pending {
            let outcome = handle.await.expect("task joined");
            follow_ups.extend(app.update(&Msg::ExecCompleted(Box::new(outcome))));
        }
        follow_ups
    }

    #[tokio::test]
    async fn incomplete_session_issues_no_calls() {
        let api = Arc::new(FakeServerApi::with_records(vec![record("a")]));
        let mut app = App::new(Session::new(None, Some("proxy_admin".into()), Some("u1".into())), api.clone());
        let effects = app.on_start();
        let batch = run_from_effects(&mut app, effects);
        assert!(batch.pending.is_empty());
        let forced = run_from_effects(&mut app, vec![Effect::FetchServers, Effect::DeleteServer("a".into())]);
        assert!(forced.pending.is_empty());
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn fetch_populates_store_in_fetch_order() {
        let api = Arc::new(FakeServerApi::with_records(vec![record("b"), record("a"), record("c")]));
        let mut app = App::new(admin_session(), api.clone());
        let effects = app.on_start();
        let batch = run_from_effects(&mut app, effects);
        assert!(app.server_list_status() == crate::query::QueryStatus::Loading);
        drain(&mut app, batch).await;
        let ids: Vec<_> = app.server_records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["b", "a", "c"]);
        assert_eq!(api.calls(), vec![FakeCall::List]);
    }

    #[tokio::test]
    async fn confirmed_delete_calls_once_then_refetches_once() {
        let api = Arc::new(FakeServerApi::with_records(vec![record("a"), record("b")]));
        let mut app = App::new(admin_session(), api.clone());
        let batch = run_from_effects(&mut app, vec![Effect::FetchServers]);
        drain(&mut app, batch).await;

        app.request_delete("a");
        let effects = app.confirm_delete();
        let batch = run_from_effects(&mut app, effects);
        let follow_ups = drain(&mut app, batch).await;
        assert_eq!(follow_ups, vec![Effect::FetchServers]);
        let batch = run_from_effects(&mut app, follow_ups);
        assert!(drain(&mut app, batch).await.is_empty());

        assert_eq!(
            api.calls(),
            vec![FakeCall::List, FakeCall::Delete("a".into()), FakeCall::List]
        );
        let ids: Vec<_> = app.server_records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["b"]);
    }

    #[tokio::test]
    async fn failed_delete_leaves_list_and_skips_refetch() {
        let api = Arc::new(FakeServerApi::with_records(vec![record("a")]).failing_deletes());
        let mut app = App::new(admin_session(), api.clone());
        let batch = run_from_effects(&mut app, vec![Effect::FetchServers]);
        drain(&mut app, batch).await;

        let batch = run_from_effects(&mut app, vec![Effect::DeleteServer("a".into())]);
        assert!(drain(&mut app, batch).await.is_empty());
        assert_eq!(api.calls(), vec![FakeCall::List, FakeCall::Delete("a".into())]);
        assert_eq!(app.server_records().len(), 1);
        assert!(app.notification.as_ref().is_some_and(|n| n.message.starts_with("Failed to delete")));
    }

    #[tokio::test]
    async fn fetch_failure_is_recorded_in_store() {
        let api = Arc::new(FakeServerApi::default().failing_lists());
        let mut app = App::new(admin_session(), api);
        let batch = run_from_effects(&mut app, vec![Effect::FetchServers]);
        drain(&mut app, batch).await;
        assert!(matches!(app.server_list_status(), crate::query::QueryStatus::Failed(_)));
    }
}
