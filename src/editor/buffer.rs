use ropey::Rope;

/// Cursor position in the document.
///
/// Columns count characters, not bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub line: usize,
    pub col: usize,
    /// Column to return to when moving through shorter lines.
    col_memory: usize,
}

impl Cursor {
    pub const fn at(line: usize, col: usize) -> Self {
        Self {
            line,
            col,
            col_memory: col,
        }
    }

    const fn set_col(&mut self, col: usize) {
        self.col = col;
        self.col_memory = col;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// The document being edited, with its cursor.
#[derive(Clone, Default)]
pub struct DocumentBuffer {
    rope: Rope,
    cursor: Cursor,
}

impl DocumentBuffer {
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            cursor: Cursor::default(),
        }
    }

    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Replace the whole document and put the cursor at the start.
    pub fn replace_text(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
        self.cursor = Cursor::default();
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Line content without its line ending.
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let line = self.rope.line(line_idx).to_string();
        Some(line.trim_end_matches(['\n', '\r']).to_string())
    }

    /// Line length in characters, line ending excluded.
    pub fn line_len(&self, line_idx: usize) -> usize {
        if line_idx >= self.rope.len_lines() {
            return 0;
        }
        let line = self.rope.line(line_idx);
        let mut len = line.len_chars();
        let mut chars = line.chars_at(len);
        while len > 0 && matches!(chars.prev(), Some('\n' | '\r')) {
            len -= 1;
        }
        len
    }

    pub fn char_count(&self) -> usize {
        self.rope.len_chars()
    }

    /// Whitespace-separated word count.
    pub fn word_count(&self) -> usize {
        let mut count = 0;
        let mut in_word = false;
        for ch in self.rope.chars() {
            if ch.is_whitespace() {
                in_word = false;
            } else if !in_word {
                in_word = true;
                count += 1;
            }
        }
        count
    }

    pub fn insert_char(&mut self, ch: char) {
        if ch == '\n' {
            self.split_line();
            return;
        }
        self.rope.insert_char(self.cursor_char_idx(), ch);
        self.cursor.set_col(self.cursor.col + 1);
    }

    /// Insert `text` at the cursor and move past it. Carriage returns are
    /// normalized away.
    pub fn insert_str(&mut self, text: &str) {
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        if text.is_empty() {
            return;
        }
        let start = self.cursor_char_idx();
        self.rope.insert(start, &text);
        self.place_cursor_at_char(start + text.chars().count());
    }

    pub fn split_line(&mut self) {
        self.rope.insert_char(self.cursor_char_idx(), '\n');
        self.cursor.line += 1;
        self.cursor.set_col(0);
    }

    /// Backspace. Returns `true` if anything was removed.
    pub fn delete_back(&mut self) -> bool {
        let idx = self.cursor_char_idx();
        if idx == 0 {
            return false;
        }
        self.rope.remove(idx - 1..idx);
        self.place_cursor_at_char(idx - 1);
        true
    }

    /// Delete. Returns `true` if anything was removed.
    pub fn delete_forward(&mut self) -> bool {
        let idx = self.cursor_char_idx();
        if idx >= self.rope.len_chars() {
            return false;
        }
        self.rope.remove(idx..=idx);
        true
    }

    pub fn move_cursor(&mut self, direction: Direction) {
        match direction {
            Direction::Left => {
                let idx = self.cursor_char_idx();
                if idx > 0 {
                    self.place_cursor_at_char(idx - 1);
                }
            }
            Direction::Right => {
                let idx = self.cursor_char_idx();
                if idx < self.rope.len_chars() {
                    self.place_cursor_at_char(idx + 1);
                }
            }
            Direction::Up if self.cursor.line > 0 => self.move_vertically(self.cursor.line - 1),
            Direction::Down if self.cursor.line + 1 < self.line_count() => {
                self.move_vertically(self.cursor.line + 1);
            }
            Direction::Up | Direction::Down => {}
        }
    }

    /// Move `rows` lines up (negative) or down, keeping the column.
    pub fn move_lines(&mut self, rows: isize) {
        let last = self.line_count().saturating_sub(1);
        let target = self.cursor.line.saturating_add_signed(rows).min(last);
        self.move_vertically(target);
    }

    pub const fn move_home(&mut self) {
        self.cursor.set_col(0);
    }

    pub fn move_end(&mut self) {
        self.cursor.set_col(self.line_len(self.cursor.line));
    }

    /// Jump to the start of the previous word, crossing lines.
    pub fn move_word_left(&mut self) {
        let mut idx = self.cursor_char_idx();
        while idx > 0 && !is_word_char(self.rope.char(idx - 1)) {
            idx -= 1;
        }
        while idx > 0 && is_word_char(self.rope.char(idx - 1)) {
            idx -= 1;
        }
        self.place_cursor_at_char(idx);
    }

    /// Jump past the current word and the gap after it, crossing lines.
    pub fn move_word_right(&mut self) {
        let len = self.rope.len_chars();
        let mut idx = self.cursor_char_idx();
        while idx < len && is_word_char(self.rope.char(idx)) {
            idx += 1;
        }
        while idx < len && !is_word_char(self.rope.char(idx)) {
            idx += 1;
        }
        self.place_cursor_at_char(idx);
    }

    pub fn move_to(&mut self, line: usize, col: usize) {
        self.cursor.line = line.min(self.line_count().saturating_sub(1));
        self.cursor.set_col(col.min(self.line_len(self.cursor.line)));
    }

    pub const fn move_to_start(&mut self) {
        self.cursor = Cursor::at(0, 0);
    }

    pub fn move_to_end(&mut self) {
        self.place_cursor_at_char(self.rope.len_chars());
    }

    fn move_vertically(&mut self, line: usize) {
        self.cursor.line = line;
        self.cursor.col = self.cursor.col_memory.min(self.line_len(line));
    }

    fn cursor_char_idx(&self) -> usize {
        let line = self.cursor.line.min(self.line_count().saturating_sub(1));
        self.rope.line_to_char(line) + self.cursor.col.min(self.line_len(line))
    }

    fn place_cursor_at_char(&mut self, idx: usize) {
        let idx = idx.min(self.rope.len_chars());
        let line = self.rope.char_to_line(idx);
        self.cursor.line = line;
        self.cursor.set_col(idx - self.rope.line_to_char(line));
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

impl std::fmt::Debug for DocumentBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentBuffer")
            .field("lines", &self.rope.len_lines())
            .field("chars", &self.rope.len_chars())
            .field("cursor", &self.cursor)
            .finish()
    }
}
