//! Interpreter configuration.

/// Interpreter-defined tag selecting which commands are legal.
pub type Mode = i32;

/// Options controlling an [`Interpreter`](crate::Interpreter).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InterpreterOptions {
    /// Resource names starting with this prefix live in the temporary namespace.
    pub temporary_prefix: String,
    /// Line (trimmed, case-insensitive) that ends a block read by a handler.
    pub block_terminator: String,
    /// Whether rendered diagnostics include a caret line.
    pub show_caret: bool,
    /// Mode used when a script is run without an explicit mode.
    pub initial_mode: Mode,
    /// Name of the built-in inclusion command; `None` disables it.
    pub load_command: Option<String>,
}

impl Default for InterpreterOptions {
    fn default() -> Self {
        Self {
            temporary_prefix: "temp_".to_string(),
            block_terminator: "END;".to_string(),
            show_caret: true,
            initial_mode: 0,
            load_command: Some("LOAD".to_string()),
        }
    }
}

impl InterpreterOptions {
    /// Creates the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the temporary resource prefix.
    #[must_use]
    pub fn with_temporary_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.temporary_prefix = prefix.into();
        self
    }

    /// Sets the block terminator line.
    #[must_use]
    pub fn with_block_terminator(mut self, terminator: impl Into<String>) -> Self {
        self.block_terminator = terminator.into();
        self
    }

    /// Enables or disables the caret line in diagnostics.
    #[must_use]
    pub fn with_caret(mut self, show: bool) -> Self {
        self.show_caret = show;
        self
    }

    /// Sets the initial mode.
    #[must_use]
    pub fn with_initial_mode(mut self, mode: Mode) -> Self {
        self.initial_mode = mode;
        self
    }

    /// Renames or disables (`None`) the built-in inclusion command.
    #[must_use]
    pub fn with_load_command(mut self, name: Option<&str>) -> Self {
        self.load_command = name.map(str::to_string);
        self
    }
}
