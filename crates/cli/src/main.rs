use std::{
    fs::{self, File},
    io::{self, BufRead, Write},
    path::PathBuf,
    sync::Arc,
};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use mcpdash_api::{API_BASE_ENV, API_KEY_ENV, AdminClient, DEFAULT_API_BASE, ServerApi, discover_credential};
use mcpdash_types::{ServerRecord, Session};
use mcpdash_util::{PROFILE_PATH_ENV, Profile, default_profile_path, expand_tilde, format_date, truncate_to_width};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const USER_ROLE_ENV: &str = "MCPDASH_USER_ROLE";
const USER_ID_ENV: &str = "MCPDASH_USER_ID";
const LOG_PATH_ENV: &str = "MCPDASH_LOG_PATH";

/// Administer MCP servers registered with the management API.
#[derive(Debug, Parser)]
#[command(name = "mcpdash", version, about)]
struct Cli {
    /// Base URL of the management API
    #[arg(long, env = API_BASE_ENV, global = true)]
    base_url: Option<String>,
    /// Access token (falls back to ~/.netrc)
    #[arg(long, env = API_KEY_ENV, hide_env_values = true, global = true)]
    token: Option<String>,
    /// Role of the caller, e.g. proxy_admin or internal_user
    #[arg(long, env = USER_ROLE_ENV, global = true)]
    role: Option<String>,
    #[arg(long, env = USER_ID_ENV, global = true)]
    user_id: Option<String>,
    /// Profile file remembering base URL, role and user id
    #[arg(long, env = PROFILE_PATH_ENV, global = true)]
    profile: Option<PathBuf>,
    /// Write the resolved base URL, role and user id to the profile
    #[arg(long, global = true)]
    save_profile: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the registered MCP servers
    List {
        #[arg(long)]
        json: bool,
    },
    /// Delete one MCP server
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

/// Connection settings after merging flags, environment, and profile.
#[derive(Debug, PartialEq, Eq)]
struct Settings {
    base_url: String,
    session: Session,
}

/// Flags and environment (already merged by clap) win over the profile,
/// which wins over built-in defaults. The token never comes from the profile.
fn resolve_settings(cli: &Cli, profile: &Profile, discover: impl FnOnce(&str) -> Option<String>) -> Settings {
    let base_url = cli
        .base_url
        .clone()
        .or_else(|| profile.base_url.clone())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    let credential = cli.token.clone().or_else(|| discover(&base_url));
    let role = cli.role.clone().or_else(|| profile.user_role.clone());
    let user_id = cli.user_id.clone().or_else(|| profile.user_id.clone());
    Settings {
        session: Session::new(credential, role, user_id),
        base_url,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let interactive = cli.command.is_none();
    init_tracing(interactive)?;

    let profile_path = cli.profile.clone().map_or_else(default_profile_path, |path| {
        expand_tilde(&path.to_string_lossy())
    });
    let profile = Profile::load(&profile_path).with_context(|| format!("load profile {}", profile_path.display()))?;
    let settings = resolve_settings(&cli, &profile, discover_credential);
    debug!(base_url = %settings.base_url, missing = ?settings.session.missing_parameters(), "resolved settings");

    if cli.save_profile {
        let updated = Profile {
            base_url: Some(settings.base_url.clone()),
            user_role: settings.session.role.clone(),
            user_id: settings.session.user_id.clone(),
        };
        updated
            .save(&profile_path)
            .with_context(|| format!("save profile {}", profile_path.display()))?;
        info!(path = %profile_path.display(), "profile saved");
    }

    let client = AdminClient::new(&settings.base_url).context("configure API client")?;
    match cli.command {
        None => mcpdash_tui::run(settings.session, Arc::new(client)).await,
        Some(Command::List { json }) => list_servers(&client, &settings.session, json).await,
        Some(Command::Delete { id, yes }) => delete_server(&client, &settings.session, &id, yes).await,
    }
}

/// The TUI owns the terminal, so its logs go to a file. Subcommands log
/// warnings to stderr.
fn init_tracing(interactive: bool) -> Result<()> {
    if !interactive {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).try_init();
        return Ok(());
    }

    let path = std::env::var(LOG_PATH_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(|value| expand_tilde(value.trim()))
        .unwrap_or_else(|| {
            dirs_next::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("mcpdash")
                .join("tui.log")
        });
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create log directory {}", parent.display()))?;
    }
    let log_file = Arc::new(File::create(&path).with_context(|| format!("create log file {}", path.display()))?);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_env_filter(filter)
        .with_writer(log_file)
        .try_init();
    Ok(())
}

fn require_credential(session: &Session) -> Result<&str> {
    match session.credential.as_deref() {
        Some(credential) => Ok(credential),
        None => bail!("missing access token; pass --token or set {API_KEY_ENV}"),
    }
}

async fn list_servers(client: &AdminClient, session: &Session, json: bool) -> Result<()> {
    let credential = require_credential(session)?;
    let records = client.list_servers(credential).await.context("fetch MCP servers")?;
    let output = if json {
        serde_json::to_string_pretty(&records)?
    } else {
        render_table(&records)
    };
    println!("{output}");
    Ok(())
}

fn render_table(records: &[ServerRecord]) -> String {
    let mut out = format!(
        "{:<24}  {:<20}  {:<9}  {:<12}  {:<10}  {}\n",
        "SERVER ID", "NAME", "TRANSPORT", "AUTH", "CREATED", "URL"
    );
    for record in records {
        out.push_str(&format!(
            "{:<24}  {:<20}  {:<9}  {:<12}  {:<10}  {}\n",
            truncate_to_width(&record.id, 24),
            truncate_to_width(record.name.as_deref().unwrap_or("-"), 20),
            record.transport_kind.display(),
            record.auth_kind.display(),
            format_date(record.created_at.as_deref()),
            record.endpoint_url,
        ));
    }
    out.truncate(out.trim_end().len());
    out
}

async fn delete_server(client: &AdminClient, session: &Session, server_id: &str, yes: bool) -> Result<()> {
    let credential = require_credential(session)?;
    if !session.is_admin() {
        bail!("deleting MCP servers requires an admin role");
    }
    if !yes && !confirm(&format!("Delete MCP server {server_id}? [y/N] "))? {
        println!("Aborted.");
        return Ok(());
    }
    client
        .delete_server(credential, server_id)
        .await
        .with_context(|| format!("delete MCP server {server_id}"))?;
    println!("MCP Server deleted successfully");
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    let mut stdout = io::stdout();
    write!(stdout, "{prompt}")?;
    stdout.flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 5] = [API_BASE_ENV, API_KEY_ENV, USER_ROLE_ENV, USER_ID_ENV, PROFILE_PATH_ENV];

    fn parse(args: &[&str]) -> Cli {
        temp_env::with_vars_unset(VARS, || Cli::try_parse_from(args).expect("valid arguments"))
    }

    #[test]
    fn flags_override_profile_and_profile_overrides_defaults() {
        let profile = Profile {
            base_url: Some("https://proxy.example.com".into()),
            user_role: Some("internal_user".into()),
            user_id: Some("from-profile".into()),
        };
        let cli = parse(&["mcpdash", "--role", "proxy_admin", "list"]);
        let settings = resolve_settings(&cli, &profile, |_| Some("sk-netrc".into()));
        assert_eq!(settings.base_url, "https://proxy.example.com");
        assert_eq!(settings.session.role.as_deref(), Some("proxy_admin"));
        assert_eq!(settings.session.user_id.as_deref(), Some("from-profile"));
        assert_eq!(settings.session.credential.as_deref(), Some("sk-netrc"));

        let settings = resolve_settings(&parse(&["mcpdash"]), &Profile::default(), |_| None);
        assert_eq!(settings.base_url, DEFAULT_API_BASE);
        assert!(!settings.session.is_complete());
    }

    #[test]
    fn environment_fills_unset_flags() {
        let cli = temp_env::with_vars(
            [
                (API_KEY_ENV, Some("sk-env")),
                (USER_ROLE_ENV, Some("org_admin")),
                (USER_ID_ENV, Some("u-7")),
                (API_BASE_ENV, None),
                (PROFILE_PATH_ENV, None),
            ],
            || Cli::try_parse_from(["mcpdash", "delete", "srv-1", "--yes"]).expect("valid arguments"),
        );
        let settings = resolve_settings(&cli, &Profile::default(), |_| panic!("token came from the environment"));
        assert!(settings.session.is_complete());
        assert!(settings.session.is_admin());
        assert!(matches!(cli.command, Some(Command::Delete { ref id, yes: true }) if id == "srv-1"));
    }

    #[test]
    fn table_lists_records_in_order_with_missing_dates() {
        let records = vec![
            ServerRecord {
                id: "b".into(),
                endpoint_url: "https://b.example/mcp".into(),
                created_at: Some("2025-03-14T09:26:53Z".into()),
                ..Default::default()
            },
            ServerRecord {
                id: "a".into(),
                name: Some("alpha".into()),
                endpoint_url: "https://a.example/mcp".into(),
                ..Default::default()
            },
        ];
        let table = render_table(&records);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("b ") && lines[1].contains("2025-03-14"));
        assert!(lines[2].starts_with("a ") && lines[2].contains("alpha") && lines[2].contains("N/A"));
    }
}
