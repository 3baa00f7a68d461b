//! The script interpreter: reads scripts line by line and dispatches each
//! completed statement to its command handler.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use log::{debug, trace};
use tessera_foundation::{Error, Position, Result, Type, Value};
use tessera_language::{Param, Scan, Signature, Statement, Tokenizer, TypeRegistry};

use crate::context::CommandContext;
use crate::options::{InterpreterOptions, Mode};
use crate::reader::LineReader;
use crate::registry::{Command, CommandRegistry, Resolved};
use crate::resources::Resources;
use crate::script_stack::{ScriptSource, ScriptStack};

/// Command-script interpreter.
///
/// Holds the vocabulary (named types and commands), the resource table the
/// handlers fill, and the stack of scripts being read.
#[derive(Debug)]
pub struct Interpreter {
    options: InterpreterOptions,
    types: TypeRegistry,
    commands: CommandRegistry,
    resources: Resources,
    stack: ScriptStack,
    mode: Mode,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(InterpreterOptions::default())
    }
}

impl Interpreter {
    /// Creates an interpreter and registers the built-in inclusion command.
    #[must_use]
    pub fn new(options: InterpreterOptions) -> Self {
        let mut interpreter = Self {
            resources: Resources::new(options.temporary_prefix.clone()),
            mode: options.initial_mode,
            types: TypeRegistry::new(),
            commands: CommandRegistry::new(),
            stack: ScriptStack::new(),
            options,
        };
        if let Some(name) = interpreter.options.load_command.clone() {
            interpreter.register_load(&name);
        }
        interpreter
    }

    fn register_load(&mut self, name: &str) {
        let share = Param {
            default: Some(Value::scalar("false", Position::default()).with_name("share_temporary")),
            ..Param::scalar("share_temporary", Type::Bool)
        };
        let signature = Signature::new(vec![Param::scalar("path", Type::String), share]);
        self.commands
            .register(Command::new(name, &[], vec![signature], Rc::new(load_command)));
    }

    /// Registers a named type usable in later signatures.
    ///
    /// # Errors
    /// Returns a registration or format error.
    pub fn register_type(&mut self, name: &str, formats: &[&str]) -> Result<()> {
        self.types.register(name, formats)
    }

    /// Registers a command.
    ///
    /// `modes` lists the modes the command is legal in (empty for all).
    /// Each format may expand into several overloads; an empty list
    /// registers a command without arguments.
    ///
    /// # Errors
    /// Returns a format error if a signature does not compile, or
    /// `EmptyRegistration` if the formats expand to no overload at all.
    pub fn register_command<F>(
        &mut self,
        name: &str,
        modes: &[Mode],
        formats: &[&str],
        handler: F,
    ) -> Result<()>
    where
        F: Fn(&mut CommandContext<'_>, &Value) -> Result<()> + 'static,
    {
        let mut signatures = Vec::new();
        for format in formats {
            signatures.extend(self.types.parse(format)?);
        }
        if formats.is_empty() {
            signatures.push(Signature::default());
        } else if signatures.is_empty() {
            return Err(Error::empty_registration(name));
        }
        debug!(
            "registered command {name} with {} overload(s), modes {modes:?}",
            signatures.len()
        );
        self.commands
            .register(Command::new(name, modes, signatures, Rc::new(handler)));
        Ok(())
    }

    /// Reads a script file in the given mode.
    ///
    /// Either the whole script (and everything it loads) succeeds, or the
    /// resource table is left as it was before the call.
    ///
    /// # Errors
    /// Returns the first diagnostic raised while reading.
    pub fn read_script(&mut self, path: impl AsRef<Path>, mode: Mode) -> Result<()> {
        let source = ScriptSource::new(path.as_ref());
        self.top_level(mode, |this| this.read_file(&source))
    }

    /// Runs in-memory script text in the initial mode.
    ///
    /// `name` is used in diagnostics and as the base for relative loads.
    ///
    /// # Errors
    /// Returns the first diagnostic raised while reading.
    pub fn run_source(&mut self, name: &str, text: &str) -> Result<()> {
        self.run_source_in_mode(name, text, self.options.initial_mode)
    }

    /// Runs in-memory script text in the given mode.
    ///
    /// # Errors
    /// Returns the first diagnostic raised while reading.
    pub fn run_source_in_mode(&mut self, name: &str, text: &str, mode: Mode) -> Result<()> {
        let source = ScriptSource::new(name);
        self.top_level(mode, |this| this.enter(&source, |this| this.run_script(&source, text)))
    }

    /// Returns the options.
    #[must_use]
    pub fn options(&self) -> &InterpreterOptions {
        &self.options
    }

    /// Returns the named types.
    #[must_use]
    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    /// Returns the registered commands.
    #[must_use]
    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    /// Returns the resource table.
    #[must_use]
    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    /// Returns the resource table mutably.
    pub fn resources_mut(&mut self) -> &mut Resources {
        &mut self.resources
    }

    /// Returns the current mode.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Sets the current mode.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// Returns the scripts currently being read.
    #[must_use]
    pub fn script_stack(&self) -> &ScriptStack {
        &self.stack
    }

    /// Runs `body` as one all-or-nothing load in `mode`.
    fn top_level(&mut self, mode: Mode, body: impl FnOnce(&mut Self) -> Result<()>) -> Result<()> {
        self.stack.clear_completed();
        let snapshot = self.resources.clone();
        let saved_mode = std::mem::replace(&mut self.mode, mode);
        let result = body(self);
        self.mode = saved_mode;
        if result.is_err() {
            self.resources = snapshot;
        }
        result
    }

    /// Reads a script included by another one.
    pub(crate) fn load_nested(&mut self, path: PathBuf, share_temporary: bool) -> Result<()> {
        let source = ScriptSource::new(path);
        let saved_mode = self.mode;
        let saved_temporary = (!share_temporary).then(|| self.resources.take_temporary());
        let result = self.read_file(&source);
        self.mode = saved_mode;
        if let Some(scope) = saved_temporary {
            self.resources.restore_temporary(scope);
        }
        result
    }

    fn read_file(&mut self, source: &ScriptSource) -> Result<()> {
        self.enter(source, |this| {
            let text = std::fs::read_to_string(source.path())
                .map_err(|e| Error::io(source.display(), e.to_string()))?;
            this.run_script(source, &text)
        })
    }

    /// Pushes `source` on the script stack around `body`, popping it on
    /// both success and failure.
    fn enter(
        &mut self,
        source: &ScriptSource,
        body: impl FnOnce(&mut Self) -> Result<()>,
    ) -> Result<()> {
        self.stack.begin(source.clone())?;
        let result = body(self);
        self.stack.finish(source);
        result
    }

    fn run_script(&mut self, source: &ScriptSource, text: &str) -> Result<()> {
        debug!("reading {} in mode {}", source.display(), self.mode);
        let mut reader = LineReader::new(text);
        let result = self.run_lines(source, &mut reader);
        match &result {
            Ok(()) => debug!("finished {}", source.display()),
            Err(e) => debug!("aborted {}: {e}", source.display()),
        }
        result
    }

    fn run_lines(&mut self, source: &ScriptSource, reader: &mut LineReader) -> Result<()> {
        let mut tokenizer = Tokenizer::new();

        while let Some((number, line)) = reader.next_line() {
            let line = line.to_owned();
            let mut offset = 0;
            loop {
                let scan = tokenizer
                    .scan(&line, number, offset)
                    .map_err(|e| self.locate(e, source, reader, Position::new(number, 1)))?;
                let Scan::Statement {
                    statement,
                    resume_at,
                } = scan
                else {
                    break;
                };

                let before = reader.line_index();
                self.dispatch(&statement, source, reader)
                    .map_err(|e| self.locate(e, source, reader, statement.position))?;
                if reader.line_index() != before {
                    break;
                }
                offset = resume_at;
            }
        }

        let end = Position::new(reader.current_line_number(), 1);
        tokenizer
            .finish()
            .map_err(|e| self.locate(e, source, reader, end))
    }

    fn dispatch(
        &mut self,
        statement: &Statement,
        source: &ScriptSource,
        reader: &mut LineReader,
    ) -> Result<()> {
        trace!(
            "{}:{} {} {}",
            source.display(),
            statement.position,
            statement.name,
            statement.arguments
        );
        let Resolved { handler, arguments } =
            self.commands
                .resolve(&statement.name, &statement.arguments, self.mode)?;
        let mut context =
            CommandContext::new(self, reader, source, &statement.name, statement.position);
        handler(&mut context, &arguments)
    }

    /// Attaches the statement's location to an error.
    ///
    /// Fatal errors pass through untouched. Errors already located in a
    /// nested script gain a stack frame for this script instead.
    fn locate(
        &self,
        err: Error,
        source: &ScriptSource,
        reader: &LineReader,
        at: Position,
    ) -> Error {
        if err.is_fatal() {
            return err;
        }
        if err.has_location() {
            return err.with_frame(format!("{}:{at}", source.display()));
        }

        let Error { kind, context } = err;
        let mut context = context.unwrap_or_default();
        let position = match (context.line, context.column) {
            (Some(line), Some(column)) => Position::new(line, column),
            _ => at,
        };
        context = context
            .with_source(source.display())
            .with_position(position);
        if let Some(text) = reader.line(position.line) {
            context = context.with_line_text(text, self.options.show_caret);
        }
        Error::new(kind).with_context(context)
    }
}

fn load_command(ctx: &mut CommandContext<'_>, args: &Value) -> Result<()> {
    let path = args
        .get_named("path")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::handler("LOAD needs a script path"))?;
    let share_temporary = args
        .get_named("share_temporary")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    ctx.load(path, share_temporary)
}
