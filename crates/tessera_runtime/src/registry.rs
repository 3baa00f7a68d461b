//! Command registry and overload resolution.

use std::fmt;
use std::rc::Rc;

use log::trace;
use tessera_foundation::{Error, Result, Value};
use tessera_language::{Signature, resolve};

use crate::context::CommandContext;
use crate::options::Mode;

/// A command handler: receives the resolved argument array.
pub type Handler = Rc<dyn Fn(&mut CommandContext<'_>, &Value) -> Result<()>>;

/// A registered command.
#[derive(Clone)]
pub struct Command {
    name: String,
    modes: Vec<Mode>,
    signatures: Vec<Signature>,
    handler: Handler,
}

impl Command {
    /// Creates a command from compiled overloads.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        modes: &[Mode],
        signatures: Vec<Signature>,
        handler: Handler,
    ) -> Self {
        Self {
            name: name.into(),
            modes: modes.to_vec(),
            signatures,
            handler,
        }
    }

    /// Command name as registered.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Modes the command is legal in; empty means every mode.
    #[must_use]
    pub fn modes(&self) -> &[Mode] {
        &self.modes
    }

    /// Overloads in registration order.
    #[must_use]
    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    /// Returns true if the command may be used in `mode`.
    #[must_use]
    pub fn is_valid_in(&self, mode: Mode) -> bool {
        self.modes.is_empty() || self.modes.contains(&mode)
    }

    /// Returns true if `name` names this command (ignoring ASCII case).
    #[must_use]
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let signatures: Vec<String> = self.signatures.iter().map(ToString::to_string).collect();
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("modes", &self.modes)
            .field("signatures", &signatures)
            .finish_non_exhaustive()
    }
}

/// A statement bound to a handler, ready to run.
pub struct Resolved {
    /// Handler of the matching command.
    pub handler: Handler,
    /// Fully typed and defaulted arguments.
    pub arguments: Value,
}

/// All registered commands, in registration order.
#[derive(Debug, Default, Clone)]
pub struct CommandRegistry {
    commands: Vec<Command>,
}

impl CommandRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a command. Several commands may share a name; they are tried in
    /// registration order.
    pub fn register(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Returns every command registered under `name`.
    pub fn lookup<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Command> + 'a {
        self.commands.iter().filter(move |c| c.is_named(name))
    }

    /// Returns true if any command is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).next().is_some()
    }

    /// Number of registered commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Resolves a statement against the commands legal in `mode`.
    ///
    /// Overloads are tried in registration order and the first match wins.
    ///
    /// # Errors
    /// `UnknownCommand` if nothing has that name, `WrongMode` if nothing of
    /// that name is legal in `mode`, or `NoMatchingOverload` listing every
    /// overload that was tried.
    pub fn resolve(&self, name: &str, arguments: &Value, mode: Mode) -> Result<Resolved> {
        if !self.contains(name) {
            return Err(Error::unknown_command(name));
        }
        let candidates: Vec<&Command> = self.lookup(name).filter(|c| c.is_valid_in(mode)).collect();
        if candidates.is_empty() {
            return Err(Error::wrong_mode(name, mode));
        }

        for command in &candidates {
            for (index, signature) in command.signatures.iter().enumerate() {
                if let Some(resolved) = resolve(signature, arguments) {
                    trace!("{name}: matched overload {index} {signature}");
                    return Ok(Resolved {
                        handler: Rc::clone(&command.handler),
                        arguments: resolved,
                    });
                }
            }
        }

        let signatures = candidates
            .iter()
            .flat_map(|c| c.signatures.iter().map(ToString::to_string))
            .collect();
        Err(Error::no_matching_overload(name, signatures))
    }
}
