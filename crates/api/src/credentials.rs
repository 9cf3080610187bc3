//! Credential discovery for the management API.
//!
//! Resolution order:
//! - `MCPDASH_API_KEY` environment variable
//! - `~/.netrc` entry whose `machine` matches the API host

use std::{env, fs};

use url::Url;

/// Environment variable holding the access token.
pub const API_KEY_ENV: &str = "MCPDASH_API_KEY";

/// Find a credential for `base_url` from the environment or `~/.netrc`.
pub fn discover_credential(base_url: &str) -> Option<String> {
    env::var(API_KEY_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .or_else(|| netrc_token_for(base_url))
}

fn netrc_token_for(base_url: &str) -> Option<String> {
    let host = Url::parse(base_url).ok()?.host_str()?.to_string();
    let home = dirs_next::home_dir()?;
    let content = fs::read_to_string(home.join(".netrc")).ok()?;
    parse_netrc_password(&content, &host)
}

/// Extract the `password` of the `machine <host>` stanza.
///
/// Only the subset of the format needed here is understood: whitespace
/// separated `machine`, `login`, `password` tokens, plus `default`.
pub(crate) fn parse_netrc_password(content: &str, host: &str) -> Option<String> {
    let mut tokens = content.split_whitespace();
    let mut in_matching_stanza = false;
    let mut default_password = None;
    let mut in_default = false;

    while let Some(token) = tokens.next() {
        match token {
            "machine" => {
                let machine = tokens.next()?;
                in_matching_stanza = machine.eq_ignore_ascii_case(host);
                in_default = false;
            }
            "default" => {
                in_matching_stanza = false;
                in_default = true;
            }
            "password" => {
                let password = tokens.next()?;
                if in_matching_stanza {
                    return Some(password.to_string());
                }
                if in_default {
                    default_password = Some(password.to_string());
                }
            }
            _ => {}
        }
    }
    default_password
}

#[cfg(test)]
mod tests {
    use super::*;

    const NETRC: &str = "
machine api.other.dev
  login me
  password other-token
machine proxy.example.com
  login admin
  password sk-proxy-123
default
  login anon
  password fallback
";

    #[test]
    fn picks_password_for_matching_machine() {
        assert_eq!(parse_netrc_password(NETRC, "proxy.example.com").as_deref(), Some("sk-proxy-123"));
        assert_eq!(parse_netrc_password(NETRC, "PROXY.example.com").as_deref(), Some("sk-proxy-123"));
    }

    #[test]
    fn falls_back_to_default_stanza() {
        assert_eq!(parse_netrc_password(NETRC, "unknown.host").as_deref(), Some("fallback"));
        assert_eq!(parse_netrc_password("machine a login b password c", "z"), None);
    }

    #[test]
    fn environment_variable_wins() {
        temp_env::with_var(API_KEY_ENV, Some("sk-env"), || {
            assert_eq!(discover_credential("http://localhost:4000").as_deref(), Some("sk-env"));
        });
    }
}
