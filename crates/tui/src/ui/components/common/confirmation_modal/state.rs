use mcpdash_types::{ConfirmationChoice, Severity};
use rat_focus::FocusFlag;

#[derive(Debug, Clone)]
pub struct ConfirmationButton {
    pub label: String,
    pub choice: ConfirmationChoice,
    pub focus: FocusFlag,
    /// Rendered with the severity color (the destructive action).
    pub is_primary: bool,
}

#[derive(Default, Clone, Debug)]
pub struct ConfirmationModalOpts {
    pub title: Option<String>,
    pub message: Option<String>,
    pub severity: Option<Severity>,
    pub confirm_label: Option<String>,
    pub cancel_label: Option<String>,
}

/// Presentation state of the confirmation dialog. Visibility is owned by the
/// caller (the open modal in `App`); this only holds text and button focus.
#[derive(Default, Clone, Debug)]
pub struct ConfirmationModalState {
    title: Option<String>,
    message: Option<String>,
    severity: Option<Severity>,
    buttons: Vec<ConfirmationButton>,
}

impl ConfirmationModalState {
    /// Replace the dialog content. Focus starts on the cancel button so a
    /// stray Enter never confirms a destructive action.
    pub fn update_opts(&mut self, opts: ConfirmationModalOpts) {
        self.title = opts.title;
        self.message = opts.message;
        self.severity = opts.severity;
        self.buttons = vec![
            ConfirmationButton {
                label: opts.confirm_label.unwrap_or_else(|| "Confirm".to_string()),
                choice: ConfirmationChoice::Confirm,
                focus: FocusFlag::named("confirmation.confirm"),
                is_primary: true,
            },
            ConfirmationButton {
                label: opts.cancel_label.unwrap_or_else(|| "Cancel".to_string()),
                choice: ConfirmationChoice::Cancel,
                focus: FocusFlag::named("confirmation.cancel"),
                is_primary: false,
            },
        ];
        self.focus_index(1);
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn severity(&self) -> Severity {
        self.severity.unwrap_or_default()
    }

    pub fn buttons(&self) -> &[ConfirmationButton] {
        &self.buttons
    }

    pub fn focused_index(&self) -> Option<usize> {
        self.buttons.iter().position(|button| button.focus.get())
    }

    pub fn focused_choice(&self) -> Option<ConfirmationChoice> {
        self.focused_index().map(|index| self.buttons[index].choice)
    }

    pub fn focus_index(&self, index: usize) {
        for (position, button) in self.buttons.iter().enumerate() {
            button.focus.set(position == index);
        }
    }

    pub fn focus_next(&self) {
        if self.buttons.is_empty() {
            return;
        }
        let next = self.focused_index().map_or(0, |index| (index + 1) % self.buttons.len());
        self.focus_index(next);
    }

    pub fn focus_prev(&self) {
        if self.buttons.is_empty() {
            return;
        }
        let len = self.buttons.len();
        let prev = self.focused_index().map_or(0, |index| (index + len - 1) % len);
        self.focus_index(prev);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opens_with_cancel_focused_and_cycles() {
        let mut state = ConfirmationModalState::default();
        state.update_opts(ConfirmationModalOpts {
            title: Some("Delete".into()),
            confirm_label: Some("Delete".into()),
            ..Default::default()
        });
        assert_eq!(state.focused_choice(), Some(ConfirmationChoice::Cancel));
        state.focus_next();
        assert_eq!(state.focused_choice(), Some(ConfirmationChoice::Confirm));
        state.focus_prev();
        assert_eq!(state.focused_choice(), Some(ConfirmationChoice::Cancel));
        assert_eq!(state.buttons()[0].label, "Delete");
        assert_eq!(state.buttons()[1].label, "Cancel");
    }
}
