//! Line reader shared by the interpreter loop and command handlers.

/// Walks a script's lines. Handlers may pull lines ahead of the interpreter.
#[derive(Debug, Clone)]
pub struct LineReader {
    lines: Vec<String>,
    consumed: usize,
}

impl LineReader {
    /// Splits `text` into lines (`\n` or `\r\n`).
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_owned).collect(),
            consumed: 0,
        }
    }

    /// Advances to the next line, returning its 1-based number and text.
    pub fn next_line(&mut self) -> Option<(u32, &str)> {
        let text = self.lines.get(self.consumed)?;
        self.consumed += 1;
        Some((line_number(self.consumed), text.as_str()))
    }

    /// Number of lines consumed so far.
    ///
    /// The interpreter compares this before and after a handler runs to
    /// detect that the handler read ahead.
    #[must_use]
    pub fn line_index(&self) -> usize {
        self.consumed
    }

    /// Number of the most recently consumed line (0 before the first).
    #[must_use]
    pub fn current_line_number(&self) -> u32 {
        line_number(self.consumed)
    }

    /// Text of a 1-based line, whether or not it was consumed.
    #[must_use]
    pub fn line(&self, number: u32) -> Option<&str> {
        let index = usize::try_from(number).ok()?.checked_sub(1)?;
        self.lines.get(index).map(String::as_str)
    }

    /// Returns true once every line was consumed.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.consumed >= self.lines.len()
    }

    /// Reads raw lines up to (not including) a line equal to `terminator`,
    /// compared trimmed and ignoring ASCII case.
    ///
    /// Returns `None` if input ends before the terminator.
    pub fn read_until(&mut self, terminator: &str) -> Option<Vec<String>> {
        let mut block = Vec::new();
        while let Some((_, line)) = self.next_line() {
            if line.trim().eq_ignore_ascii_case(terminator) {
                return Some(block);
            }
            block.push(line.to_owned());
        }
        None
    }
}

fn line_number(consumed: usize) -> u32 {
    u32::try_from(consumed).unwrap_or(u32::MAX)
}
