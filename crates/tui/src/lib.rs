//! # mcpdash TUI
//!
//! Terminal console for administering MCP servers: a table of registered
//! servers with detail, edit, create, and confirmed delete flows.
//!
//! The TUI follows a component-based architecture. [`app::App`] holds state,
//! components translate input into [`mcpdash_types::Effect`]s, the command
//! layer turns effects into API calls, and the runtime feeds results back as
//! messages.

mod app;
mod cmd;
mod query;
mod ui;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use anyhow::Result;
use mcpdash_api::ServerApi;
use mcpdash_types::Session;

/// Runs the TUI until the user quits.
///
/// An incomplete `session` still starts the UI; it shows which parameters
/// are missing and performs no API calls.
///
/// # Errors
///
/// Terminal setup failures (raw mode, alternate screen) and draw errors.
pub async fn run(session: Session, api: Arc<dyn ServerApi>) -> Result<()> {
    let app = app::App::new(session, api);
    ui::runtime::run_app(app).await
}
