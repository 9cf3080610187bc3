//! Form state shared by the create view and the edit mode of the detail view.

use mcpdash_types::{AuthKind, NewServer, ServerRecord, ServerUpdate, TransportKind};

use crate::ui::components::common::TextInputState;

/// Fields of the server form, in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Description,
    Url,
    Transport,
    Auth,
}

impl FormField {
    pub const ALL: [FormField; 5] = [
        FormField::Name,
        FormField::Description,
        FormField::Url,
        FormField::Transport,
        FormField::Auth,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Description => "Description",
            Self::Url => "URL",
            Self::Transport => "Transport",
            Self::Auth => "Auth Type",
        }
    }

    /// Select fields cycle through fixed options instead of taking text.
    pub fn is_select(self) -> bool {
        matches!(self, Self::Transport | Self::Auth)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerFormState {
    pub name: TextInputState,
    pub description: TextInputState,
    pub url: TextInputState,
    pub transport: TransportKind,
    pub auth: AuthKind,
    focused: usize,
    /// Validation message from the last submit attempt.
    pub error: Option<String>,
    /// A submit is in flight; further submits are ignored.
    pub submitting: bool,
}

impl ServerFormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_record(record: &ServerRecord) -> Self {
        Self {
            name: TextInputState::with_value(record.name.clone().unwrap_or_default()),
            description: TextInputState::with_value(record.description.clone().unwrap_or_default()),
            url: TextInputState::with_value(record.endpoint_url.clone()),
            transport: record.transport_kind.clone(),
            auth: record.auth_kind.clone(),
            ..Self::default()
        }
    }

    pub fn focused_field(&self) -> FormField {
        FormField::ALL[self.focused]
    }

    pub fn focus_next(&mut self) {
        self.focused = (self.focused + 1) % FormField::ALL.len();
    }

    pub fn focus_prev(&mut self) {
        self.focused = (self.focused + FormField::ALL.len() - 1) % FormField::ALL.len();
    }

    /// Text input backing the focused field, if it is a text field.
    pub fn focused_input_mut(&mut self) -> Option<&mut TextInputState> {
        match self.focused_field() {
            FormField::Name => Some(&mut self.name),
            FormField::Description => Some(&mut self.description),
            FormField::Url => Some(&mut self.url),
            FormField::Transport | FormField::Auth => None,
        }
    }

    pub fn input(&self, field: FormField) -> Option<&TextInputState> {
        match field {
            FormField::Name => Some(&self.name),
            FormField::Description => Some(&self.description),
            FormField::Url => Some(&self.url),
            FormField::Transport | FormField::Auth => None,
        }
    }

    /// Step the focused select field forward (`+1`) or backward (`-1`).
    pub fn cycle_option(&mut self, step: isize) {
        match self.focused_field() {
            FormField::Transport => self.transport = cycle(&TransportKind::SELECTABLE, &self.transport, step),
            FormField::Auth => self.auth = cycle(&AuthKind::SELECTABLE, &self.auth, step),
            _ => {}
        }
    }

    pub fn display_value(&self, field: FormField) -> String {
        match field {
            FormField::Transport => self.transport.display().to_string(),
            FormField::Auth => self.auth.display().to_string(),
            text_field => self.input(text_field).map(|input| input.input().to_string()).unwrap_or_default(),
        }
    }

    fn validate(&self, require_name: bool) -> Result<(), String> {
        let mut missing = Vec::new();
        if require_name && self.name.is_blank() {
            missing.push(FormField::Name.label());
        }
        if self.url.is_blank() {
            missing.push(FormField::Url.label());
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(format!("Required: {}", missing.join(", ")))
        }
    }

    /// Build a create payload; name and URL are required.
    pub fn to_new_server(&self) -> Result<NewServer, String> {
        self.validate(true)?;
        Ok(NewServer {
            alias: self.name.value(),
            description: self.description.value(),
            transport: self.transport.clone(),
            auth_type: self.auth.clone(),
            url: self.url.value().unwrap_or_default(),
        })
    }

    /// Build an update payload for `server_id`; the URL is required.
    pub fn to_update(&self, server_id: &str) -> Result<ServerUpdate, String> {
        self.validate(false)?;
        Ok(ServerUpdate {
            server_id: server_id.to_string(),
            alias: self.name.value(),
            description: self.description.value(),
            transport: self.transport.clone(),
            auth_type: self.auth.clone(),
            url: self.url.value().unwrap_or_default(),
        })
    }
}

/// Move to the neighbouring option. Values outside `options` (unknown wire
/// values) restart from the first option.
fn cycle<T: Clone + PartialEq>(options: &[T], current: &T, step: isize) -> T {
    let len = options.len() as isize;
    let next = match options.iter().position(|option| option == current) {
        Some(index) => (index as isize + step).rem_euclid(len),
        None => 0,
    };
    options[next as usize].clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_requires_name_and_url() {
        let form = ServerFormState::new();
        assert_eq!(form.to_new_server().unwrap_err(), "Required: Name, URL");

        let mut form = ServerFormState::new();
        form.url = TextInputState::with_value("https://mcp.example.com");
        assert_eq!(form.to_new_server().unwrap_err(), "Required: Name");

        form.name = TextInputState::with_value(" github ");
        let payload = form.to_new_server().expect("valid form");
        assert_eq!(payload.alias.as_deref(), Some("github"));
        assert_eq!(payload.description, None);
    }

    #[test]
    fn edit_form_round_trips_record_fields() {
        let record = ServerRecord {
            id: "srv-1".into(),
            name: Some("jira".into()),
            endpoint_url: "https://jira.example/mcp".into(),
            transport_kind: TransportKind::Sse,
            auth_kind: AuthKind::Basic,
            ..Default::default()
        };
        let update = ServerFormState::from_record(&record).to_update("srv-1").expect("valid update");
        assert_eq!(update, record.to_update());
    }

    #[test]
    fn focus_wraps_and_select_fields_cycle() {
        let mut form = ServerFormState::new();
        form.focus_prev();
        assert_eq!(form.focused_field(), FormField::Auth);
        form.cycle_option(1);
        assert_eq!(form.auth, AuthKind::ApiKey);
        form.cycle_option(-1);
        form.cycle_option(-1);
        assert_eq!(form.auth, AuthKind::Basic);
        assert!(form.focused_input_mut().is_none());

        form.focus_next();
        assert_eq!(form.focused_field(), FormField::Name);
    }

    #[test]
    fn unknown_transport_restarts_cycle() {
        let mut form = ServerFormState {
            transport: TransportKind::Other("websocket".into()),
            ..Default::default()
        };
        form.focus_next();
        form.focus_next();
        form.focus_next();
        assert_eq!(form.focused_field(), FormField::Transport);
        form.cycle_option(1);
        assert_eq!(form.transport, TransportKind::Http);
    }
}
