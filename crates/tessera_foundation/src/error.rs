//! Error types for the Tessera interpreter.
//!
//! Uses `thiserror` for ergonomic error definition with rich context. An
//! [`Error`] carries its [`ErrorKind`] plus an optional [`ErrorContext`]
//! describing where in which script it happened; [`Error::report`] renders
//! the user-facing diagnostic block.

use std::fmt;

use thiserror::Error;

use crate::position::Position;

/// Result type used throughout Tessera.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Tessera operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Appends a script stack frame, creating an empty context if needed.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.context
            .get_or_insert_with(ErrorContext::new)
            .stack
            .push(frame.into());
        self
    }

    /// Creates a lexical error.
    #[must_use]
    pub fn syntax(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Syntax {
            message: message.into(),
        })
    }

    /// Creates a signature format error.
    #[must_use]
    pub fn format(signature: impl Into<String>, message: impl Into<String>, column: u32) -> Self {
        Self::new(ErrorKind::Format {
            signature: signature.into(),
            message: message.into(),
            column,
        })
    }

    /// Creates an unknown command error.
    #[must_use]
    pub fn unknown_command(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownCommand { name: name.into() })
    }

    /// Creates a wrong mode error.
    #[must_use]
    pub fn wrong_mode(name: impl Into<String>, mode: i32) -> Self {
        Self::new(ErrorKind::WrongMode {
            name: name.into(),
            mode,
        })
    }

    /// Creates an overload resolution failure listing every valid form.
    #[must_use]
    pub fn no_matching_overload(command: impl Into<String>, signatures: Vec<String>) -> Self {
        Self::new(ErrorKind::NoMatchingOverload {
            command: command.into(),
            signatures,
        })
    }

    /// Creates a cyclic inclusion error.
    #[must_use]
    pub fn cyclic_load(cycle: Vec<String>) -> Self {
        Self::new(ErrorKind::CyclicLoad { cycle })
    }

    /// Creates a fatal content error (missing asset, broken environment).
    #[must_use]
    pub fn content(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Content {
            message: message.into(),
        })
    }

    /// Creates an ordinary handler error.
    #[must_use]
    pub fn handler(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Handler {
            message: message.into(),
        })
    }

    /// Creates a duplicate resource error.
    #[must_use]
    pub fn duplicate_resource(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateResource { name: name.into() })
    }

    /// Creates a missing resource error.
    #[must_use]
    pub fn missing_resource(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingResource { name: name.into() })
    }

    /// Creates a resource type mismatch error.
    #[must_use]
    pub fn resource_type(name: impl Into<String>, expected: &'static str) -> Self {
        Self::new(ErrorKind::ResourceType {
            name: name.into(),
            expected,
        })
    }

    /// Creates a duplicate registration error.
    #[must_use]
    pub fn duplicate_registration(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateRegistration { name: name.into() })
    }

    /// Creates an error for a type or command registered without overloads.
    #[must_use]
    pub fn empty_registration(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::EmptyRegistration { name: name.into() })
    }

    /// Creates a file read error.
    #[must_use]
    pub fn io(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io {
            path: path.into(),
            message: message.into(),
        })
    }

    /// Returns true for errors that abort a whole load unchanged.
    ///
    /// Fatal errors are never re-wrapped with statement context.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::CyclicLoad { .. } | ErrorKind::Content { .. } | ErrorKind::Io { .. }
        )
    }

    /// Returns true if this error already points at a script location.
    #[must_use]
    pub fn has_location(&self) -> bool {
        self.context
            .as_ref()
            .is_some_and(|ctx| ctx.source.is_some() && ctx.line.is_some())
    }

    /// Renders the full diagnostic block.
    ///
    /// The block is the location, the offending source line, an optional
    /// caret line, the message, and the script stack if there is one.
    #[must_use]
    pub fn report(&self) -> String {
        let mut out = String::new();
        if let Some(ctx) = &self.context {
            ctx.write_header(&mut out);
        }
        out.push_str(&self.kind.to_string());
        if let Some(ctx) = &self.context {
            ctx.write_stack(&mut out);
        }
        out
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Lexical error in script text.
    #[error("{message}")]
    Syntax {
        /// Description of the problem.
        message: String,
    },

    /// A signature string that cannot be compiled.
    #[error("invalid signature `{signature}` at column {column}: {message}")]
    Format {
        /// The signature text as registered.
        signature: String,
        /// Description of the problem.
        message: String,
        /// 1-based column inside the signature.
        column: u32,
    },

    /// No command of that name exists.
    #[error("`{name}` is not a valid command")]
    UnknownCommand {
        /// The command name as written.
        name: String,
    },

    /// The command exists but not in the current mode.
    #[error("`{name}` is not a valid command in mode {mode}")]
    WrongMode {
        /// The command name as written.
        name: String,
        /// The interpreter's mode at the time.
        mode: i32,
    },

    /// The command exists but none of its overloads matches.
    #[error(
        "no overload of `{command}` matches these arguments; valid forms are:{}",
        list_signatures(command, signatures)
    )]
    NoMatchingOverload {
        /// The command name as written.
        command: String,
        /// Every overload, printed as a signature.
        signatures: Vec<String>,
    },

    /// A script includes itself, directly or through other scripts.
    #[error("infinite loop detected: {}", cycle.join(" -> "))]
    CyclicLoad {
        /// The chain of scripts, ending with the repeated one.
        cycle: Vec<String>,
    },

    /// The environment is broken (missing asset file and the like).
    #[error("content error: {message}")]
    Content {
        /// Description of the problem.
        message: String,
    },

    /// A command handler rejected its arguments.
    #[error("{message}")]
    Handler {
        /// Description of the problem.
        message: String,
    },

    /// A resource with this name already exists.
    #[error("resource `{name}` already exists")]
    DuplicateResource {
        /// Resource name.
        name: String,
    },

    /// No resource with this name exists.
    #[error("resource `{name}` does not exist")]
    MissingResource {
        /// Resource name.
        name: String,
    },

    /// The resource exists but holds a different type.
    #[error("resource `{name}` is not a {expected}")]
    ResourceType {
        /// Resource name.
        name: String,
        /// The type the caller asked for.
        expected: &'static str,
    },

    /// A named type was registered twice or shadows a primitive.
    #[error("type `{name}` is already registered")]
    DuplicateRegistration {
        /// Type name.
        name: String,
    },

    /// A named type or command ended up with no overloads.
    #[error("`{name}` is registered without any signature")]
    EmptyRegistration {
        /// Type or command name.
        name: String,
    },

    /// Reading a script failed.
    #[error("failed to read {path}: {message}")]
    Io {
        /// Path that was being read.
        path: String,
        /// Underlying error text.
        message: String,
    },

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

fn list_signatures(command: &str, signatures: &[String]) -> String {
    signatures
        .iter()
        .map(|sig| format!("\n    {command} {sig}"))
        .collect()
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Script path.
    pub source: Option<String>,
    /// 1-based line number in source.
    pub line: Option<u32>,
    /// 1-based column number in source.
    pub column: Option<u32>,
    /// Text of the offending line.
    pub line_text: Option<String>,
    /// Whether to draw a caret under the column.
    pub caret: bool,
    /// Script stack trace, innermost includer first.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source path.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the line and column.
    #[must_use]
    pub fn with_position(mut self, position: Position) -> Self {
        self.line = Some(position.line);
        self.column = Some(position.column);
        self
    }

    /// Sets the offending line's text and whether a caret is drawn under it.
    #[must_use]
    pub fn with_line_text(mut self, text: impl Into<String>, caret: bool) -> Self {
        self.line_text = Some(text.into());
        self.caret = caret;
        self
    }

    /// Adds a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }

    /// Builds the caret line for `column`, copying tabs from the source
    /// prefix so the caret lines up however tabs are displayed.
    #[must_use]
    pub fn caret_line(line_text: &str, column: u32) -> String {
        let width = column.saturating_sub(1) as usize;
        let mut caret: String = line_text
            .chars()
            .chain(std::iter::repeat(' '))
            .take(width)
            .map(|c| if c == '\t' { '\t' } else { ' ' })
            .collect();
        caret.push('^');
        caret
    }

    fn write_header(&self, out: &mut String) {
        let Some(source) = &self.source else {
            return;
        };
        out.push_str(source);
        if let (Some(line), Some(column)) = (self.line, self.column) {
            out.push_str(&format!(":{line}:{column}"));
        }
        out.push('\n');
        if let Some(text) = &self.line_text {
            out.push_str(text);
            out.push('\n');
            if self.caret {
                if let Some(column) = self.column {
                    out.push_str(&Self::caret_line(text, column));
                    out.push('\n');
                }
            }
        }
    }

    fn write_stack(&self, out: &mut String) {
        if self.stack.is_empty() {
            return;
        }
        out.push_str("\nscript stack:");
        for frame in &self.stack {
            out.push_str("\n  loaded from ");
            out.push_str(frame);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "at {source}")?;
            if let (Some(line), Some(col)) = (self.line, self.column) {
                write!(f, ":{line}:{col}")?;
            }
        }
        if !self.stack.is_empty() {
            writeln!(f)?;
            for frame in &self.stack {
                writeln!(f, "  loaded from {frame}")?;
            }
        }
        Ok(())
    }
}
