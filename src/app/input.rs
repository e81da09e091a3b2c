//! Text-input editing helpers (cursor movement, insertion, deletion).
//!
//! The cursor is a character index, not a byte index, so multi-byte input
//! (accented street names, the Coach persona's Spanish welcome replies)
//! edits cleanly.

use super::App;

impl App {
    /// Byte offset of the character at `cursor`.
    fn byte_at(&self, cursor: usize) -> usize {
        self.input
            .char_indices()
            .nth(cursor)
            .map(|(idx, _)| idx)
            .unwrap_or(self.input.len())
    }

    fn char_count(&self) -> usize {
        self.input.chars().count()
    }

    /// Insert a character at the current cursor position.
    pub(crate) fn insert_char(&mut self, ch: char) {
        if ch.is_control() {
            return;
        }
        let at = self.byte_at(self.cursor);
        self.input.insert(at, ch);
        self.cursor += 1;
    }

    /// Delete the character before the cursor.
    pub(crate) fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_at(self.cursor);
        self.input.remove(at);
    }

    /// Delete the character at the cursor.
    pub(crate) fn delete(&mut self) {
        if self.cursor >= self.char_count() {
            return;
        }
        let at = self.byte_at(self.cursor);
        self.input.remove(at);
    }

    /// Move the cursor one position to the left.
    pub(crate) fn move_cursor_left(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    /// Move the cursor one position to the right.
    pub(crate) fn move_cursor_right(&mut self) {
        if self.cursor < self.char_count() {
            self.cursor += 1;
        }
    }

    /// Move the cursor to the beginning of the input.
    pub(crate) fn move_cursor_home(&mut self) {
        self.cursor = 0;
    }

    /// Move the cursor to the end of the input.
    pub(crate) fn move_cursor_end(&mut self) {
        self.cursor = self.char_count();
    }
}

#[cfg(test)]
mod tests {
    use super::super::App;

    fn app_with_input(text: &str) -> App {
        let mut app = App::new_for_tests();
        for ch in text.chars() {
            app.insert_char(ch);
        }
        app
    }

    #[test]
    fn insert_and_backspace_handle_multibyte_text() {
        let mut app = app_with_input("número");
        assert_eq!(app.input, "número");
        assert_eq!(app.cursor, 6);

        app.backspace();
        app.backspace();
        assert_eq!(app.input, "núme");

        app.move_cursor_home();
        app.move_cursor_right();
        app.insert_char('ú');
        assert_eq!(app.input, "núúme");
        assert_eq!(app.cursor, 2);
    }

    #[test]
    fn delete_at_end_is_a_noop() {
        let mut app = app_with_input("abc");
        app.delete();
        assert_eq!(app.input, "abc");

        app.move_cursor_home();
        app.delete();
        assert_eq!(app.input, "bc");
    }

    #[test]
    fn control_characters_are_ignored() {
        let mut app = app_with_input("x");
        app.insert_char('\u{7}');
        assert_eq!(app.input, "x");
        assert_eq!(app.cursor, 1);
    }
}
