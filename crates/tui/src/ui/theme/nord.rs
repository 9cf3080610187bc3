//! Nord palette mapped onto the theme roles, with a high-contrast variant.

use ratatui::style::Color;

use super::{
    roles::{Theme, ThemeRoles},
    theme_helpers::{darken_rgb, lighten_rgb},
};

// Polar Night
const N0: Color = Color::Rgb(0x2E, 0x34, 0x40);
const N1: Color = Color::Rgb(0x3B, 0x42, 0x52);
const N2: Color = Color::Rgb(0x43, 0x4C, 0x5E);
const N3: Color = Color::Rgb(0x4C, 0x56, 0x6A);

// Snow Storm
const S0: Color = Color::Rgb(0xD8, 0xDE, 0xE9);
const S1: Color = Color::Rgb(0xE5, 0xE9, 0xF0);
const S2: Color = Color::Rgb(0xEC, 0xEF, 0xF4);

// Frost
const F1: Color = Color::Rgb(0x88, 0xC0, 0xD0);
const F2: Color = Color::Rgb(0x81, 0xA1, 0xC1);
const F3: Color = Color::Rgb(0x5E, 0x81, 0xAC);

// Aurora
const A_RED: Color = Color::Rgb(0xBF, 0x61, 0x6A);
const A_ORANGE: Color = Color::Rgb(0xD0, 0x87, 0x70);
const A_YELLOW: Color = Color::Rgb(0xEB, 0xCB, 0x8B);
const A_GREEN: Color = Color::Rgb(0xA3, 0xBE, 0x8C);

const TEXT_MUTED: Color = Color::Rgb(0x61, 0x6E, 0x88);
const MODAL_OVERLAY: Color = Color::Rgb(0x1A, 0x1E, 0x28);

fn build_nord_roles() -> ThemeRoles {
    ThemeRoles {
        background: N0,
        surface: N1,
        surface_muted: N2,
        border: N1,

        text: S0,
        text_secondary: S1,
        text_muted: TEXT_MUTED,

        accent_primary: F1,
        accent_secondary: F2,

        info: F2,
        success: A_GREEN,
        warning: A_ORANGE,
        error: A_RED,

        selection_bg: N3,
        selection_fg: S2,
        focus: F1,
        modal_bg: MODAL_OVERLAY,
        table_row_even: darken_rgb(N1, 0.60),
        table_row_odd: darken_rgb(N2, 0.60),
    }
}

fn build_nord_high_contrast_roles() -> ThemeRoles {
    let mut roles = build_nord_roles();
    roles.border = lighten_rgb(roles.border, 0.30);
    roles.text = S2;
    roles.text_secondary = S2;
    roles.text_muted = S1;
    roles.warning = A_YELLOW;
    roles.focus = F3;
    roles.table_row_even = darken_rgb(N1, 0.50);
    roles.table_row_odd = darken_rgb(N3, 0.50);
    roles
}

/// Default Nord theme tuned for dark terminals.
#[derive(Debug, Clone)]
pub struct NordTheme {
    roles: ThemeRoles,
}

impl NordTheme {
    pub fn new() -> Self {
        Self { roles: build_nord_roles() }
    }
}

impl Default for NordTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl Theme for NordTheme {
    fn roles(&self) -> &ThemeRoles {
        &self.roles
    }
}

#[derive(Debug, Clone)]
pub struct NordThemeHighContrast {
    roles: ThemeRoles,
}

impl NordThemeHighContrast {
    pub fn new() -> Self {
        Self {
            roles: build_nord_high_contrast_roles(),
        }
    }
}

impl Default for NordThemeHighContrast {
    fn default() -> Self {
        Self::new()
    }
}

impl Theme for NordThemeHighContrast {
    fn roles(&self) -> &ThemeRoles {
        &self.roles
    }
}
