//! Integration tests for Layer 2: Runtime
//!
//! Tests for dispatch, modes, handler blocks, resources, and script loading.

mod dispatch;
mod resources;
mod robustness;

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tessera_runtime::Interpreter;

/// Calls recorded by a test handler, rendered as resolved argument literals.
pub type Calls = Rc<RefCell<Vec<String>>>;

/// Registers a command that records every resolved argument array.
pub fn record(interp: &mut Interpreter, name: &str, formats: &[&str]) -> Calls {
    let calls: Calls = Rc::default();
    let sink = Rc::clone(&calls);
    interp
        .register_command(name, &[], formats, move |_, args| {
            sink.borrow_mut().push(args.to_string());
            Ok(())
        })
        .unwrap();
    calls
}

/// A fresh directory under the system temp dir for one test's scripts.
pub struct ScriptDir {
    root: PathBuf,
}

impl ScriptDir {
    pub fn new(test: &str) -> Self {
        let root = std::env::temp_dir().join(format!("tessera-{test}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&root);
        std::fs::create_dir_all(&root).unwrap();
        Self { root }
    }

    pub fn write(&self, name: &str, text: &str) -> PathBuf {
        let path = self.root.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, text).unwrap();
        path
    }

    pub fn path(&self) -> &Path {
        &self.root
    }
}

impl Drop for ScriptDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}
