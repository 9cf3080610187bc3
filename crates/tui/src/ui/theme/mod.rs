//! Theme styling for the TUI: semantic roles, the Nord palette, and helper
//! builders for ratatui widgets. Prefer these helpers over hard-coded colors.

use std::env;

use tracing::debug;

pub mod nord;
pub mod roles;
pub mod theme_helpers;

pub use nord::{NordTheme, NordThemeHighContrast};
pub use roles::Theme;

/// Environment variable selecting the palette (`nord` or `nord-high-contrast`).
pub const THEME_ENV: &str = "MCPDASH_THEME";

/// Pick the theme from [`THEME_ENV`], defaulting to Nord.
pub fn load() -> Box<dyn Theme> {
    match env::var(THEME_ENV).ok().as_deref().map(str::trim) {
        Some("nord-high-contrast") | Some("high-contrast") => Box::new(NordThemeHighContrast::new()),
        Some(other) if !other.is_empty() && other != "nord" => {
            debug!(theme = other, "unknown theme; falling back to nord");
            Box::new(NordTheme::new())
        }
        _ => Box::new(NordTheme::new()),
    }
}
