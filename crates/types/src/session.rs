//! Caller identity handed to the console at startup.

use std::fmt;

/// Role of the signed-in user as reported by the proxy.
///
/// Both the internal identifiers (`proxy_admin`) and the labels the
/// dashboard shows (`Admin`) are accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserRole {
    ProxyAdmin,
    ProxyAdminViewer,
    OrgAdmin,
    InternalUser,
    InternalUserViewer,
    Other(String),
}

impl UserRole {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "proxy_admin" | "Admin" => Self::ProxyAdmin,
            "proxy_admin_viewer" | "Admin Viewer" => Self::ProxyAdminViewer,
            "org_admin" => Self::OrgAdmin,
            "internal_user" | "Internal User" => Self::InternalUser,
            "internal_user_viewer" | "Internal Viewer" => Self::InternalUserViewer,
            other => Self::Other(other.to_string()),
        }
    }

    /// Whether edit and delete actions are offered to this role.
    ///
    /// This gates the UI only; the API enforces its own authorization.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::ProxyAdmin | Self::ProxyAdminViewer | Self::OrgAdmin)
    }

    pub fn is_proxy_admin(&self) -> bool {
        matches!(self, Self::ProxyAdmin)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::ProxyAdmin => "Admin",
            Self::ProxyAdminViewer => "Admin Viewer",
            Self::OrgAdmin => "Org Admin",
            Self::InternalUser => "Internal User",
            Self::InternalUserViewer => "Internal Viewer",
            Self::Other(value) => value.as_str(),
        };
        f.write_str(label)
    }
}

/// Credential, role, and user id the console runs with.
///
/// Every field is optional because each may be absent from the environment;
/// the server view refuses to operate unless all three are present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub credential: Option<String>,
    pub role: Option<String>,
    pub user_id: Option<String>,
}

impl Session {
    pub fn new(credential: Option<String>, role: Option<String>, user_id: Option<String>) -> Self {
        Self {
            credential: non_blank(credential),
            role: non_blank(role),
            user_id: non_blank(user_id),
        }
    }

    /// Names of the parameters that are missing, in display order.
    pub fn missing_parameters(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.credential.is_none() {
            missing.push("access token");
        }
        if self.role.is_none() {
            missing.push("user role");
        }
        if self.user_id.is_none() {
            missing.push("user id");
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_parameters().is_empty()
    }

    pub fn user_role(&self) -> Option<UserRole> {
        self.role.as_deref().map(UserRole::parse)
    }

    pub fn is_admin(&self) -> bool {
        self.user_role().is_some_and(|role| role.is_admin())
    }

    pub fn is_proxy_admin(&self) -> bool {
        self.user_role().is_some_and(|role| role.is_proxy_admin())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_roles_accept_ids_and_labels() {
        for role in ["proxy_admin", "Admin", "proxy_admin_viewer", "Admin Viewer", "org_admin"] {
            assert!(UserRole::parse(role).is_admin(), "{role} should be admin");
        }
        for role in ["internal_user", "Internal Viewer", "customer", ""] {
            assert!(!UserRole::parse(role).is_admin(), "{role} should not be admin");
        }
    }

    #[test]
    fn only_proxy_admin_is_proxy_admin() {
        assert!(UserRole::parse("Admin").is_proxy_admin());
        assert!(!UserRole::parse("proxy_admin_viewer").is_proxy_admin());
        assert!(!UserRole::parse("org_admin").is_proxy_admin());
    }

    #[test]
    fn blank_values_count_as_missing() {
        let session = Session::new(Some("   ".into()), Some("Admin".into()), None);
        assert_eq!(session.missing_parameters(), vec!["access token", "user id"]);
        assert!(!session.is_complete());

        let session = Session::new(Some("sk-1".into()), Some("Admin".into()), Some("u-1".into()));
        assert!(session.is_complete());
        assert!(session.is_admin());
    }
}
