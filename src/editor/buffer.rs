use std::ops::Range;

use ropey::Rope;

use super::insert::{Insertion, insert};

/// Caret position as a line and a char column within that line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    /// Zero-based line index.
    pub line: usize,
    /// Char column within the line.
    pub col: usize,
    /// Column to aim for when moving vertically through shorter lines.
    goal_col: usize,
}

impl Cursor {
    /// Cursor at `line` and char column `col`.
    pub const fn at(line: usize, col: usize) -> Self {
        Self {
            line,
            col,
            goal_col: col,
        }
    }
}

/// Direction for cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// A prompt value being edited, backed by a rope.
///
/// The cursor is the active end of the selection. When an anchor is set the
/// selection spans from the anchor to the cursor; offsets exposed to callers
/// are char offsets into the whole text.
pub struct EditorBuffer {
    rope: Rope,
    cursor: Cursor,
    /// Char offset of the fixed end of the selection.
    anchor: Option<usize>,
    dirty: bool,
}

impl EditorBuffer {
    /// Buffer holding `text` with the cursor at the start.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            cursor: Cursor::default(),
            anchor: None,
            dirty: false,
        }
    }

    /// Buffer with no text.
    pub fn empty() -> Self {
        Self::from_text("")
    }

    /// Current cursor position.
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Whether the text changed since the buffer was created or last marked clean.
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Forget pending changes, e.g. after the text was saved elsewhere.
    pub const fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Number of lines, counting an empty trailing line.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Text of a line without its line ending.
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        (line_idx < self.rope.len_lines()).then(|| {
            let range = self.line_char_range(line_idx);
            self.rope.slice(range).to_string()
        })
    }

    /// Number of chars on a line, line ending excluded.
    pub fn line_len(&self, line_idx: usize) -> usize {
        self.line_char_range(line_idx).len()
    }

    /// Char offsets covered by a line, excluding its line ending.
    pub fn line_char_range(&self, line_idx: usize) -> Range<usize> {
        if line_idx >= self.rope.len_lines() {
            return 0..0;
        }
        let line = self.rope.line(line_idx);
        let mut len = line.len_chars();
        if len > 0 && line.char(len - 1) == '\n' {
            len -= 1;
        }
        if len > 0 && line.char(len - 1) == '\r' {
            len -= 1;
        }
        let start = self.rope.line_to_char(line_idx);
        start..start + len
    }

    /// The whole text as a `String`.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Char offset of the cursor.
    pub fn cursor_offset(&self) -> usize {
        let range = self.line_char_range(self.cursor.line);
        range.start + self.cursor.col.min(range.len())
    }

    /// Whether a non-empty selection is active.
    pub fn has_selection(&self) -> bool {
        self.anchor.is_some_and(|a| a != self.cursor_offset())
    }

    /// The selection as ordered char offsets `(start, end)`.
    ///
    /// Without a selection both ends sit at the cursor.
    pub fn selection_offsets(&self) -> (usize, usize) {
        let caret = self.cursor_offset();
        let anchor = self.anchor.unwrap_or(caret);
        (anchor.min(caret), anchor.max(caret))
    }

    /// Select `start..end` (char offsets), leaving the cursor at `end`.
    ///
    /// Offsets past the end of the buffer are clamped.
    pub fn set_selection(&mut self, start: usize, end: usize) {
        let len = self.rope.len_chars();
        let start = start.min(len);
        let end = end.min(len);
        self.place_at(end);
        self.anchor = (start != end).then_some(start);
    }

    /// Select the whole text, leaving the cursor at the end.
    pub fn select_all(&mut self) {
        self.set_selection(0, self.rope.len_chars());
    }

    /// Wrap the selection in `prefix`/`suffix`.
    ///
    /// The cursor stays at its char offset; the returned anchors are meant to
    /// be applied with [`set_selection`](Self::set_selection) once the caller
    /// has finished propagating the new text.
    pub fn apply_token(&mut self, prefix: &str, suffix: &str) -> Option<Insertion> {
        let (start, end) = self.selection_offsets();
        let caret = self.cursor_offset();
        let insertion = insert(&self.text(), start, end, prefix, suffix)?;
        self.rope = Rope::from_str(&insertion.text);
        self.anchor = None;
        self.place_at(caret);
        self.dirty = true;
        Some(insertion)
    }

    /// Type a character, replacing any selection.
    pub fn insert_char(&mut self, ch: char) {
        self.delete_selection();
        let at = self.cursor_offset();
        self.rope.insert_char(at, ch);
        self.place_at(at + 1);
        self.dirty = true;
    }

    /// Insert text at the cursor, replacing any selection.
    pub fn insert_str(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        self.delete_selection();
        let at = self.cursor_offset();
        self.rope.insert(at, s);
        self.place_at(at + s.chars().count());
        self.dirty = true;
    }

    /// Break the line at the cursor, replacing any selection.
    pub fn split_line(&mut self) {
        self.insert_char('\n');
    }

    /// Backspace. Deletes the selection when there is one.
    ///
    /// Returns `true` if anything was deleted.
    pub fn delete_back(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        let at = self.cursor_offset();
        if at == 0 {
            return false;
        }
        // A CRLF line ending goes as a unit.
        let from = if at >= 2 && self.rope.char(at - 1) == '\n' && self.rope.char(at - 2) == '\r'
        {
            at - 2
        } else {
            at - 1
        };
        self.rope.remove(from..at);
        self.place_at(from);
        self.dirty = true;
        true
    }

    /// Delete key. Deletes the selection when there is one.
    ///
    /// Returns `true` if anything was deleted.
    pub fn delete_forward(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        let at = self.cursor_offset();
        let len = self.rope.len_chars();
        if at >= len {
            return false;
        }
        let to = if self.rope.char(at) == '\r' && at + 1 < len && self.rope.char(at + 1) == '\n' {
            at + 2
        } else {
            at + 1
        };
        self.rope.remove(at..to);
        self.dirty = true;
        true
    }

    /// Move the cursor one step, dropping the selection.
    pub fn move_cursor(&mut self, direction: Direction) {
        self.anchor = None;
        self.step(direction);
    }

    /// Move the cursor one step, growing the selection from where it started.
    pub fn extend_selection(&mut self, direction: Direction) {
        if self.anchor.is_none() {
            self.anchor = Some(self.cursor_offset());
        }
        self.step(direction);
    }

    /// Move to the start of the current line.
    pub const fn move_home(&mut self) {
        self.anchor = None;
        self.cursor = Cursor::at(self.cursor.line, 0);
    }

    /// Move to the end of the current line.
    pub fn move_end(&mut self) {
        self.anchor = None;
        self.cursor = Cursor::at(self.cursor.line, self.line_len(self.cursor.line));
    }

    /// Jump back to the start of the current or previous word.
    pub fn move_word_left(&mut self) {
        self.anchor = None;
        let mut at = self.cursor_offset();
        while at > 0 && !is_word_char(self.rope.char(at - 1)) {
            at -= 1;
        }
        while at > 0 && is_word_char(self.rope.char(at - 1)) {
            at -= 1;
        }
        self.place_at(at);
    }

    /// Jump forward past the current word and the gap after it.
    pub fn move_word_right(&mut self) {
        self.anchor = None;
        let len = self.rope.len_chars();
        let mut at = self.cursor_offset();
        while at < len && is_word_char(self.rope.char(at)) {
            at += 1;
        }
        while at < len && !is_word_char(self.rope.char(at)) {
            at += 1;
        }
        self.place_at(at);
    }

    /// Move to a line and char column, clamped to the text.
    pub fn move_to(&mut self, line: usize, col: usize) {
        self.anchor = None;
        let line = line.min(self.line_count().saturating_sub(1));
        self.cursor = Cursor::at(line, col.min(self.line_len(line)));
    }

    /// Move to the start of the text.
    pub const fn move_to_start(&mut self) {
        self.anchor = None;
        self.cursor = Cursor::at(0, 0);
    }

    /// Move to the end of the text.
    pub fn move_to_end(&mut self) {
        self.anchor = None;
        self.place_at(self.rope.len_chars());
    }

    /// Put the cursor at a char offset, keeping any anchor.
    fn place_at(&mut self, offset: usize) {
        let offset = offset.min(self.rope.len_chars());
        let line = self.rope.char_to_line(offset);
        let col = offset - self.rope.line_to_char(line);
        self.cursor = Cursor::at(line, col.min(self.line_len(line)));
    }

    /// Remove the selected text. Returns `true` if anything was removed.
    fn delete_selection(&mut self) -> bool {
        if !self.has_selection() {
            self.anchor = None;
            return false;
        }
        let (start, end) = self.selection_offsets();
        self.rope.remove(start..end);
        self.anchor = None;
        self.place_at(start);
        self.dirty = true;
        true
    }

    fn step(&mut self, direction: Direction) {
        let at = self.cursor_offset();
        match direction {
            Direction::Left => {
                let range = self.line_char_range(self.cursor.line);
                if at > range.start {
                    self.place_at(at - 1);
                } else if self.cursor.line > 0 {
                    let prev = self.cursor.line - 1;
                    self.cursor = Cursor::at(prev, self.line_len(prev));
                }
            }
            Direction::Right => {
                let range = self.line_char_range(self.cursor.line);
                if at < range.end {
                    self.place_at(at + 1);
                } else if self.cursor.line + 1 < self.line_count() {
                    self.cursor = Cursor::at(self.cursor.line + 1, 0);
                }
            }
            Direction::Up if self.cursor.line > 0 => self.move_vertically(self.cursor.line - 1),
            Direction::Down if self.cursor.line + 1 < self.line_count() => {
                self.move_vertically(self.cursor.line + 1);
            }
            Direction::Up | Direction::Down => {}
        }
    }

    fn move_vertically(&mut self, line: usize) {
        let goal = self.cursor.goal_col;
        self.cursor = Cursor {
            line,
            col: goal.min(self.line_len(line)),
            goal_col: goal,
        };
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

impl std::fmt::Debug for EditorBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorBuffer")
            .field("chars", &self.rope.len_chars())
            .field("cursor", &self.cursor)
            .field("anchor", &self.anchor)
            .field("dirty", &self.dirty)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_buffer_has_one_line() {
        let buf = EditorBuffer::empty();
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line_at(0), Some(String::new()));
        assert_eq!(buf.line_at(1), None);
    }

    #[test]
    fn test_line_char_range_skips_line_endings() {
        let buf = EditorBuffer::from_text("héllo\r\nworld");
        assert_eq!(buf.line_char_range(0), 0..5);
        assert_eq!(buf.line_char_range(1), 7..12);
        assert_eq!(buf.line_at(0).as_deref(), Some("héllo"));
    }

    #[test]
    fn test_mark_clean_resets_dirty() {
        let mut buf = EditorBuffer::from_text("hello");
        assert!(!buf.is_dirty());
        buf.insert_char('!');
        assert!(buf.is_dirty());
        buf.mark_clean();
        assert!(!buf.is_dirty());
    }

    #[test]
    fn test_insert_after_multibyte_char() {
        let mut buf = EditorBuffer::from_text("éa");
        buf.move_cursor(Direction::Right);
        buf.insert_char('x');
        assert_eq!(buf.text(), "éxa");
        assert_eq!(buf.cursor(), Cursor::at(0, 2));
    }

    #[test]
    fn test_insert_str_multiline_moves_cursor_to_end() {
        let mut buf = EditorBuffer::from_text("ab");
        buf.move_to(0, 1);
        buf.insert_str("x\nyz");
        assert_eq!(buf.text(), "ax\nyzb");
        assert_eq!(buf.cursor(), Cursor::at(1, 2));
    }

    #[test]
    fn test_insert_str_empty_is_noop() {
        let mut buf = EditorBuffer::from_text("hello");
        buf.insert_str("");
        assert!(!buf.is_dirty());
    }

    #[test]
    fn test_split_line_in_middle() {
        let mut buf = EditorBuffer::from_text("hello world");
        buf.move_to(0, 5);
        buf.split_line();
        assert_eq!(buf.text(), "hello\n world");
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
    }

    #[test]
    fn test_delete_back_joins_lines() {
        let mut buf = EditorBuffer::from_text("hello\nworld");
        buf.move_to(1, 0);
        assert!(buf.delete_back());
        assert_eq!(buf.text(), "helloworld");
        assert_eq!(buf.cursor(), Cursor::at(0, 5));
    }

    #[test]
    fn test_delete_back_removes_crlf_together() {
        let mut buf = EditorBuffer::from_text("a\r\nb");
        buf.move_to(1, 0);
        buf.delete_back();
        assert_eq!(buf.text(), "ab");
    }

    #[test]
    fn test_delete_back_at_start_is_noop() {
        let mut buf = EditorBuffer::from_text("café");
        assert!(!buf.delete_back());
        buf.move_end();
        assert!(buf.delete_back());
        assert_eq!(buf.text(), "caf");
    }

    #[test]
    fn test_delete_forward_at_end_is_noop() {
        let mut buf = EditorBuffer::from_text("hello");
        buf.move_end();
        assert!(!buf.delete_forward());
        buf.move_home();
        assert!(buf.delete_forward());
        assert_eq!(buf.text(), "ello");
    }

    #[test]
    fn test_move_left_wraps_to_prev_line() {
        let mut buf = EditorBuffer::from_text("hello\nworld");
        buf.move_to(1, 0);
        buf.move_cursor(Direction::Left);
        assert_eq!(buf.cursor(), Cursor::at(0, 5));
        buf.move_cursor(Direction::Right);
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
    }

    #[test]
    fn test_vertical_moves_remember_goal_column() {
        let mut buf = EditorBuffer::from_text("hello\nhi\nworld");
        buf.move_to(0, 4);
        buf.move_cursor(Direction::Down);
        assert_eq!(buf.cursor().col, 2);
        buf.move_cursor(Direction::Down);
        assert_eq!(buf.cursor(), Cursor::at(2, 4));
    }

    #[test]
    fn test_word_moves() {
        let mut buf = EditorBuffer::from_text("hello world, again");
        buf.move_word_right();
        assert_eq!(buf.cursor_offset(), 6);
        buf.move_word_right();
        assert_eq!(buf.cursor_offset(), 13);
        buf.move_to(0, 8);
        buf.move_word_left();
        assert_eq!(buf.cursor_offset(), 6);
        buf.move_word_left();
        assert_eq!(buf.cursor_offset(), 0);
    }

    #[test]
    fn test_move_to_clamps() {
        let mut buf = EditorBuffer::from_text("hello");
        buf.move_to(100, 100);
        assert_eq!(buf.cursor(), Cursor::at(0, 5));
    }

    #[test]
    fn test_move_to_end() {
        let mut buf = EditorBuffer::from_text("hello\nworld");
        buf.move_to_end();
        assert_eq!(buf.cursor(), Cursor::at(1, 5));
        buf.move_to_start();
        assert_eq!(buf.cursor_offset(), 0);
    }

    #[test]
    fn test_no_selection_reports_caret_twice() {
        let mut buf = EditorBuffer::from_text("hello");
        buf.move_to(0, 3);
        assert!(!buf.has_selection());
        assert_eq!(buf.selection_offsets(), (3, 3));
    }

    #[test]
    fn test_extend_selection_backwards_orders_offsets() {
        let mut buf = EditorBuffer::from_text("hello");
        buf.move_to(0, 4);
        buf.extend_selection(Direction::Left);
        buf.extend_selection(Direction::Left);
        assert!(buf.has_selection());
        assert_eq!(buf.selection_offsets(), (2, 4));
    }

    #[test]
    fn test_plain_move_clears_selection() {
        let mut buf = EditorBuffer::from_text("hello");
        buf.extend_selection(Direction::Right);
        buf.move_cursor(Direction::Right);
        assert!(!buf.has_selection());
    }

    #[test]
    fn test_set_selection_round_trips_through_line_and_column() {
        let mut buf = EditorBuffer::from_text("ab\ncd");
        buf.set_selection(1, 4);
        assert_eq!(buf.selection_offsets(), (1, 4));
        assert_eq!(buf.cursor(), Cursor::at(1, 1));
        assert_eq!(buf.cursor_offset(), 4);
    }

    #[test]
    fn test_set_selection_clamps_to_length() {
        let mut buf = EditorBuffer::from_text("ab");
        buf.set_selection(1, 10);
        assert_eq!(buf.selection_offsets(), (1, 2));
    }

    #[test]
    fn test_typing_replaces_selection() {
        let mut buf = EditorBuffer::from_text("hello world");
        buf.set_selection(0, 5);
        buf.insert_char('J');
        assert_eq!(buf.text(), "J world");
        assert_eq!(buf.cursor(), Cursor::at(0, 1));
    }

    #[test]
    fn test_backspace_deletes_selection_across_lines() {
        let mut buf = EditorBuffer::from_text("ab\ncd");
        buf.set_selection(1, 4);
        assert!(buf.delete_back());
        assert_eq!(buf.text(), "ad");
        assert_eq!(buf.cursor_offset(), 1);
    }

    #[test]
    fn test_select_all() {
        let mut buf = EditorBuffer::from_text("ab\ncd");
        buf.select_all();
        assert_eq!(buf.selection_offsets(), (0, 5));
    }

    #[test]
    fn test_apply_token_wraps_selection_without_moving_caret() {
        let mut buf = EditorBuffer::from_text("hello world");
        buf.set_selection(0, 5);
        let out = buf.apply_token("**", "**").unwrap();
        assert_eq!(buf.text(), "**hello** world");
        assert_eq!((out.start, out.end), (2, 7));
        assert_eq!(buf.cursor_offset(), 5);
        assert!(!buf.has_selection());
        assert!(buf.is_dirty());

        buf.set_selection(out.start, out.end);
        assert_eq!(buf.selection_offsets(), (2, 7));
    }

    #[test]
    fn test_apply_token_at_caret_on_empty_buffer() {
        let mut buf = EditorBuffer::empty();
        let out = buf.apply_token("# ", "").unwrap();
        assert_eq!(buf.text(), "# ");
        buf.set_selection(out.start, out.end);
        assert_eq!(buf.cursor(), Cursor::at(0, 2));
    }

    #[test]
    fn test_apply_code_block_token_restores_into_new_line() {
        let mut buf = EditorBuffer::from_text("x");
        buf.select_all();
        let out = buf.apply_token("```\n", "\n```").unwrap();
        assert_eq!(buf.text(), "```\nx\n```");
        buf.set_selection(out.start, out.end);
        assert_eq!(buf.cursor(), Cursor::at(1, 1));
        assert_eq!(buf.selection_offsets(), (4, 5));
    }
}
