//! Statement tokenizer for Tessera scripts.
//!
//! The tokenizer is a resumable character state machine. It is fed one line
//! at a time by the interpreter, which may itself hand lines to command
//! handlers between statements, so everything that can legitimately span
//! lines (open arrays, a pending argument name, a half-built statement) lives
//! in the tokenizer rather than on the stack of a single call.

use tessera_foundation::{Error, ErrorContext, ErrorKind, Position, Result, Value};

/// Deepest array nesting accepted in a statement or a signature.
///
/// Value trees are cloned, matched and dropped recursively, so the depth
/// has to stay far below what the stack can hold.
pub const MAX_NESTING_DEPTH: usize = 64;

/// A completed statement: the command word and its argument array.
#[derive(Clone, Debug, PartialEq)]
pub struct Statement {
    /// The command name as written.
    pub name: String,
    /// Where the command name starts.
    pub position: Position,
    /// The arguments, in encounter order, as an array value.
    pub arguments: Value,
}

/// Outcome of scanning (part of) a line.
#[derive(Clone, Debug, PartialEq)]
pub enum Scan {
    /// A statement was completed by `;`.
    Statement {
        /// The completed statement.
        statement: Statement,
        /// Character offset just past the terminating `;`.
        resume_at: usize,
    },
    /// The rest of the line was consumed without completing a statement.
    EndOfLine,
}

/// An array that has been opened with `(` but not yet closed.
#[derive(Debug)]
struct Frame {
    children: Vec<Value>,
    position: Position,
    name: Option<String>,
    named: bool,
}

impl Frame {
    fn new(position: Position, name: Option<String>) -> Self {
        Self {
            children: Vec::new(),
            position,
            name,
            named: false,
        }
    }
}

/// Resumable statement tokenizer.
#[derive(Debug)]
pub struct Tokenizer {
    /// Open arrays; the first frame is the statement root.
    frames: Vec<Frame>,
    word: String,
    word_start: Position,
    pending_name: Option<(String, Position)>,
    started: Option<Position>,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    /// Creates a tokenizer with no statement in progress.
    #[must_use]
    pub fn new() -> Self {
        Self {
            frames: vec![Frame::new(Position::default(), None)],
            word: String::new(),
            word_start: Position::default(),
            pending_name: None,
            started: None,
        }
    }

    /// Returns true if a statement has been started but not terminated.
    #[must_use]
    pub fn in_statement(&self) -> bool {
        self.started.is_some()
    }

    /// Discards any partially built statement.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Scans `line` starting at character offset `from`.
    ///
    /// Returns as soon as a statement is terminated so the caller can
    /// dispatch it before deciding whether to continue with the same line.
    ///
    /// # Errors
    /// Returns a syntax error positioned at the offending character.
    pub fn scan(&mut self, line: &str, line_number: u32, from: usize) -> Result<Scan> {
        let mut quote: Option<(String, Position)> = None;

        for (index, c) in line.chars().enumerate().skip(from) {
            let pos = Position::new(line_number, column(index));

            if let Some((text, start)) = &mut quote {
                if c == '"' {
                    let value = Value::string(std::mem::take(text), *start);
                    quote = None;
                    self.push_scalar(value)?;
                } else {
                    text.push(c);
                }
                continue;
            }

            match c {
                '"' => {
                    self.complete_word()?;
                    self.mark_started(pos);
                    quote = Some((String::new(), pos));
                }
                '#' => break,
                ';' => {
                    self.complete_word()?;
                    if let Some(statement) = self.complete_statement(pos)? {
                        return Ok(Scan::Statement {
                            statement,
                            resume_at: index + 1,
                        });
                    }
                }
                '(' => {
                    self.complete_word()?;
                    self.open_array(pos)?;
                }
                ')' => {
                    self.complete_word()?;
                    self.close_array(pos)?;
                }
                ':' => self.take_name(pos)?,
                c if c.is_whitespace() || c == ',' => self.complete_word()?,
                c if is_keyword_char(c) => {
                    if self.word.is_empty() {
                        self.word_start = pos;
                        self.mark_started(pos);
                    }
                    self.word.push(c);
                }
                other => {
                    return Err(syntax_at(
                        pos,
                        format!("unexpected character '{other}' at column {}", pos.column),
                    ));
                }
            }
        }

        if let Some((_, start)) = quote {
            return Err(syntax_at(start, "unterminated string"));
        }
        self.complete_word()?;
        Ok(Scan::EndOfLine)
    }

    /// Checks that no statement is left open at end of input.
    ///
    /// # Errors
    /// Returns a syntax error pointing at the start of the open statement.
    pub fn finish(&mut self) -> Result<()> {
        match self.started.take() {
            Some(start) => {
                self.reset();
                Err(syntax_at(start, "statement is missing its terminating ';'"))
            }
            None => Ok(()),
        }
    }

    /// Tokenizes a complete multi-line source into statements.
    ///
    /// # Errors
    /// Returns the first syntax error encountered.
    pub fn tokenize(source: &str) -> Result<Vec<Statement>> {
        let mut tokenizer = Self::new();
        let mut statements = Vec::new();
        for (index, line) in source.lines().enumerate() {
            let line_number = u32::try_from(index + 1).unwrap_or(u32::MAX);
            let mut offset = 0;
            while let Scan::Statement {
                statement,
                resume_at,
            } = tokenizer.scan(line, line_number, offset)?
            {
                statements.push(statement);
                offset = resume_at;
            }
        }
        tokenizer.finish()?;
        Ok(statements)
    }

    fn mark_started(&mut self, pos: Position) {
        if self.started.is_none() {
            self.started = Some(pos);
        }
    }

    fn complete_word(&mut self) -> Result<()> {
        if self.word.is_empty() {
            return Ok(());
        }
        let word = std::mem::take(&mut self.word);
        self.push_scalar(Value::scalar(word, self.word_start))
    }

    fn push_scalar(&mut self, value: Value) -> Result<()> {
        let value = match self.pending_name.take() {
            Some((name, _)) => value.with_name(name),
            None => value,
        };
        self.attach(value)
    }

    /// Appends a finished value to the innermost open array.
    fn attach(&mut self, value: Value) -> Result<()> {
        let Some(frame) = self.frames.last_mut() else {
            return Err(Error::new(ErrorKind::Internal(
                "tokenizer lost its root frame".to_string(),
            )));
        };
        if value.name().is_some() {
            frame.named = true;
        } else if frame.named {
            return Err(syntax_at(
                value.position(),
                "positional argument follows a named argument",
            ));
        }
        frame.children.push(value);
        Ok(())
    }

    fn open_array(&mut self, pos: Position) -> Result<()> {
        // The root frame is not an array the script opened.
        if self.frames.len() > MAX_NESTING_DEPTH {
            return Err(syntax_at(
                pos,
                format!("arrays nested deeper than {MAX_NESTING_DEPTH}"),
            ));
        }
        self.mark_started(pos);
        let name = self.pending_name.take().map(|(name, _)| name);
        self.frames.push(Frame::new(pos, name));
        Ok(())
    }

    fn close_array(&mut self, pos: Position) -> Result<()> {
        if self.frames.len() <= 1 {
            return Err(syntax_at(pos, "unbalanced ')'"));
        }
        if let Some((name, at)) = self.pending_name.take() {
            return Err(syntax_at(at, format!("argument name `{name}` has no value")));
        }
        let Some(frame) = self.frames.pop() else {
            return Err(syntax_at(pos, "unbalanced ')'"));
        };
        let array = Value::array(frame.children, frame.position).renamed(frame.name);
        self.attach(array)
    }

    fn take_name(&mut self, pos: Position) -> Result<()> {
        if let Some((name, _)) = &self.pending_name {
            return Err(syntax_at(pos, format!("argument is already named `{name}`")));
        }
        if self.word.is_empty() {
            return Err(syntax_at(pos, "expected an argument name before ':'"));
        }
        let name = std::mem::take(&mut self.word);
        self.pending_name = Some((name, self.word_start));
        Ok(())
    }

    fn complete_statement(&mut self, pos: Position) -> Result<Option<Statement>> {
        if let Some(frame) = self.frames.get(1) {
            return Err(syntax_at(frame.position, "array is not closed before ';'"));
        }
        if let Some((name, at)) = &self.pending_name {
            return Err(syntax_at(*at, format!("argument name `{name}` has no value")));
        }
        self.started = None;

        let mut children = std::mem::take(&mut self.frames[0].children).into_iter();
        self.frames[0].named = false;
        let Some(command) = children.next() else {
            return Ok(None);
        };
        let name = match command.text() {
            Some(text) if command.name().is_none() => text.to_string(),
            _ => {
                return Err(syntax_at(
                    command.position(),
                    "statement must start with a command name",
                ));
            }
        };
        let arguments: Vec<Value> = children.collect();
        let start = arguments.first().map_or(pos, Value::position);
        Ok(Some(Statement {
            name,
            position: command.position(),
            arguments: Value::array(arguments, start),
        }))
    }
}

/// Returns true for characters that may appear in an unquoted word.
#[must_use]
pub fn is_keyword_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '$' | '_' | '.' | '-' | '+')
}

fn column(index: usize) -> u32 {
    u32::try_from(index + 1).unwrap_or(u32::MAX)
}

fn syntax_at(pos: Position, message: impl Into<String>) -> Error {
    Error::syntax(message).with_context(ErrorContext::new().with_position(pos))
}
