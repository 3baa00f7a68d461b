//! Script stack: the scripts currently being read, for cycle detection.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use log::warn;
use tessera_foundation::{Error, Result};

/// A script being read: the path as shown to users and its normalized key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptSource {
    path: PathBuf,
    key: PathBuf,
}

impl ScriptSource {
    /// Creates a source, normalizing the path for cycle detection.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let key = normalize(&path);
        Self { path, key }
    }

    /// Path as given (after resolution against the including script).
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Normalized path used for identity.
    #[must_use]
    pub fn key(&self) -> &Path {
        &self.key
    }

    /// Directory that relative `LOAD` paths are resolved against.
    #[must_use]
    pub fn directory(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }

    /// Resolves `relative` against this script's directory.
    #[must_use]
    pub fn resolve(&self, relative: &str) -> PathBuf {
        let relative = Path::new(relative);
        if relative.is_absolute() {
            relative.to_path_buf()
        } else {
            self.directory().join(relative)
        }
    }

    /// Display form used in diagnostics.
    #[must_use]
    pub fn display(&self) -> String {
        self.path.display().to_string()
    }
}

/// Normalizes a path: canonical if it exists, otherwise absolute with `.`
/// and `..` folded lexically.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Stack of in-progress scripts.
///
/// Pushes and pops are strictly paired by the interpreter, so the stack is
/// empty again after every top-level call.
#[derive(Debug, Default)]
pub struct ScriptStack {
    frames: Vec<ScriptSource>,
    completed: HashSet<PathBuf>,
}

impl ScriptStack {
    /// Creates an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the script is currently being read.
    #[must_use]
    pub fn is_loading(&self, source: &ScriptSource) -> bool {
        self.frames.iter().any(|f| f.key == source.key)
    }

    /// Pushes a script.
    ///
    /// # Errors
    /// Returns a `CyclicLoad` error naming the cycle if the script is
    /// already on the stack.
    pub fn begin(&mut self, source: ScriptSource) -> Result<()> {
        if self.is_loading(&source) {
            let cycle: Vec<String> = self
                .frames
                .iter()
                .skip_while(|f| f.key != source.key)
                .map(ScriptSource::display)
                .chain(std::iter::once(source.display()))
                .collect();
            return Err(Error::cyclic_load(cycle));
        }
        if self.completed.contains(&source.key) {
            warn!("{} was already read earlier; reading it again", source.display());
        }
        self.frames.push(source);
        Ok(())
    }

    /// Pops a script and remembers that it was read.
    pub fn finish(&mut self, source: &ScriptSource) {
        if let Some(pos) = self.frames.iter().rposition(|f| f.key == source.key) {
            self.frames.remove(pos);
        }
        self.completed.insert(source.key.clone());
    }

    /// Forgets which scripts were read, so a later run starts fresh.
    pub fn clear_completed(&mut self) {
        self.completed.clear();
    }

    /// Scripts currently being read, outermost first.
    #[must_use]
    pub fn frames(&self) -> &[ScriptSource] {
        &self.frames
    }

    /// Returns true if no script is being read.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Returns the number of scripts being read.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Returns true if the script finished reading at least once.
    #[must_use]
    pub fn was_read(&self, source: &ScriptSource) -> bool {
        self.completed.contains(&source.key)
    }
}
