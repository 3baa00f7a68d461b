//! What a command handler can see and do while it runs.

use std::path::Path;

use tessera_foundation::{Error, Position, Result};

use crate::interpreter::Interpreter;
use crate::options::{InterpreterOptions, Mode};
use crate::reader::LineReader;
use crate::resources::Resources;
use crate::script_stack::ScriptSource;

/// Handle passed to command handlers.
///
/// Borrowing the interpreter mutably lets a handler change the mode, fill
/// the resource table, pull raw lines from the current script, or include
/// another script.
pub struct CommandContext<'a> {
    interpreter: &'a mut Interpreter,
    reader: &'a mut LineReader,
    source: &'a ScriptSource,
    command: &'a str,
    position: Position,
}

impl<'a> CommandContext<'a> {
    pub(crate) fn new(
        interpreter: &'a mut Interpreter,
        reader: &'a mut LineReader,
        source: &'a ScriptSource,
        command: &'a str,
        position: Position,
    ) -> Self {
        Self {
            interpreter,
            reader,
            source,
            command,
            position,
        }
    }

    /// The command name as written in the script.
    #[must_use]
    pub fn command(&self) -> &str {
        self.command
    }

    /// Where the command name starts.
    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Path of the script being read.
    #[must_use]
    pub fn current_file(&self) -> &Path {
        self.source.path()
    }

    /// The interpreter's options.
    #[must_use]
    pub fn options(&self) -> &InterpreterOptions {
        self.interpreter.options()
    }

    /// The resource table.
    #[must_use]
    pub fn resources(&self) -> &Resources {
        self.interpreter.resources()
    }

    /// The resource table, mutably.
    pub fn resources_mut(&mut self) -> &mut Resources {
        self.interpreter.resources_mut()
    }

    /// The current mode.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.interpreter.mode()
    }

    /// Switches mode for the statements that follow.
    pub fn set_mode(&mut self, mode: Mode) {
        self.interpreter.set_mode(mode);
    }

    /// Takes the next raw line of the current script.
    ///
    /// The rest of the line that triggered this command is then skipped.
    pub fn next_line(&mut self) -> Option<String> {
        self.reader.next_line().map(|(_, line)| line.to_owned())
    }

    /// Takes raw lines up to the block terminator (`END;` by default).
    ///
    /// # Errors
    /// Returns a syntax error if the script ends before the terminator.
    pub fn read_block(&mut self) -> Result<Vec<String>> {
        let terminator = &self.interpreter.options().block_terminator;
        self.reader.read_until(terminator).ok_or_else(|| {
            Error::syntax(format!(
                "`{}` block is missing its terminating `{terminator}`",
                self.command
            ))
        })
    }

    /// Reads another script, resolved against the current script's directory.
    ///
    /// The nested script starts in the current mode, which is restored
    /// afterwards. Unless `share_temporary` is set it gets an empty
    /// temporary namespace and the current one is restored afterwards.
    ///
    /// # Errors
    /// Propagates any error from the nested script.
    pub fn load(&mut self, path: &str, share_temporary: bool) -> Result<()> {
        let target = self.source.resolve(path);
        self.interpreter.load_nested(target, share_temporary)
    }
}
