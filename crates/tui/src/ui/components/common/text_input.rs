//! UTF-8 safe single-line text input state used by the server forms.

use unicode_width::UnicodeWidthStr;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextInputState {
    input: String,
    /// Byte index into `input`, always on a char boundary.
    cursor: usize,
}

impl TextInputState {
    /// Create an input pre-filled with `value`, cursor at the end.
    pub fn with_value(value: impl Into<String>) -> Self {
        let input = value.into();
        let cursor = input.len();
        Self { input, cursor }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_blank(&self) -> bool {
        self.input.trim().is_empty()
    }

    /// Trimmed value, or `None` when blank.
    pub fn value(&self) -> Option<String> {
        let trimmed = self.input.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    /// Terminal column of the cursor relative to the start of the text.
    pub fn cursor_column(&self) -> u16 {
        self.input[..self.cursor].width() as u16
    }

    pub fn move_left(&mut self) {
        if let Some(previous) = self.input[..self.cursor].chars().next_back() {
            self.cursor -= previous.len_utf8();
        }
    }

    pub fn move_right(&mut self) {
        if let Some(next) = self.input[self.cursor..].chars().next() {
            self.cursor += next.len_utf8();
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.input.len();
    }

    pub fn insert_char(&mut self, character: char) {
        self.input.insert(self.cursor, character);
        self.cursor += character.len_utf8();
    }

    /// Delete the char immediately before the cursor.
    pub fn backspace(&mut self) {
        if let Some(previous) = self.input[..self.cursor].chars().next_back() {
            let start = self.cursor - previous.len_utf8();
            self.input.drain(start..self.cursor);
            self.cursor = start;
        }
    }

    /// Delete the char under the cursor.
    pub fn delete(&mut self) {
        if let Some(next) = self.input[self.cursor..].chars().next() {
            self.input.drain(self.cursor..self.cursor + next.len_utf8());
        }
    }
}

impl From<&str> for TextInputState {
    fn from(value: &str) -> Self {
        Self::with_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editing_respects_multibyte_chars() {
        let mut state = TextInputState::with_value("héllo");
        state.move_home();
        state.move_right();
        state.move_right();
        state.backspace();
        assert_eq!(state.input(), "hllo");
        state.insert_char('ë');
        assert_eq!(state.input(), "hëllo");
        assert_eq!(state.cursor_column(), 2);
        state.move_end();
        state.delete();
        assert_eq!(state.input(), "hëllo");
    }

    #[test]
    fn value_is_trimmed_and_blank_is_none() {
        assert_eq!(TextInputState::with_value("  docs  ").value().as_deref(), Some("docs"));
        assert_eq!(TextInputState::with_value("   ").value(), None);
        assert!(TextInputState::default().is_blank());
    }
}
