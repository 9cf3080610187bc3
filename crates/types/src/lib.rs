//! Shared types for the mcpdash console: server records, caller session, and
//! the message/effect vocabulary the TUI components speak.

mod server;
mod session;

pub use server::{AuthKind, NewServer, ServerRecord, ServerUpdate, TransportKind};
pub use session::{Session, UserRole};

/// Visual weight of a notification or modal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Severity {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

/// Which button of the confirmation modal was activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationChoice {
    Confirm,
    Cancel,
}

/// Result of an asynchronous API call, delivered back to the UI loop.
///
/// Errors are carried as rendered strings; the originating error has already
/// been logged by the task that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecOutcome {
    /// The list fetch for `generation` finished.
    ServersFetched {
        generation: u64,
        result: Result<Vec<ServerRecord>, String>,
    },
    ServerDeleted {
        server_id: String,
        result: Result<(), String>,
    },
    ServerCreated(Result<ServerRecord, String>),
    ServerUpdated(Result<ServerRecord, String>),
    /// Plain status message (clipboard results and the like).
    Log(String),
}

/// Messages that can be sent to update the application state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Periodic UI tick (throbber, notification expiry)
    Tick,
    /// Terminal resized
    Resize(u16, u16),
    /// Background execution completed with outcome
    ExecCompleted(Box<ExecOutcome>),
    /// A confirmation modal button was activated
    ConfirmationModalButtonClicked(ConfirmationChoice),
    /// The confirmation modal was dismissed without choosing a button
    ConfirmationModalClosed,
}

/// Side effects requested by components and executed by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Issue (or re-issue) the server list query
    FetchServers,
    /// Delete the server with the given id
    DeleteServer(String),
    CreateServer(NewServer),
    UpdateServer(ServerUpdate),
    CopyToClipboardRequested(String),
    /// Feed a message back into the application
    SendMsg(Msg),
    /// Change the main view
    SwitchTo(Route),
    /// Display a modal view
    ShowModal(Modal),
    /// Hide any open modals
    CloseModal,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    ServerList,
    ServerDetail,
    ServerCreate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    ConfirmDelete,
}
