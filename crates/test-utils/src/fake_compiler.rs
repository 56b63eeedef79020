use std::sync::{Arc, Mutex};

use rewatch::build::Compiler;
use rewatch::errors::Diagnostic;

/// Marker that makes [`FakeCompiler`] reject a source.
pub const FAIL_MARKER: &str = "@fail";

/// A fake compiler that:
/// - records every source text it was given
/// - rejects sources containing [`FAIL_MARKER`] with a diagnostic
/// - otherwise "compiles" by upper-casing the source.
#[derive(Debug, Clone, Default)]
pub struct FakeCompiler {
    compiled: Arc<Mutex<Vec<String>>>,
}

impl FakeCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sources seen so far, in call order.
    pub fn compiled(&self) -> Vec<String> {
        self.compiled.lock().unwrap().clone()
    }
}

impl Compiler for FakeCompiler {
    fn compile(&self, source: &str) -> Result<String, Diagnostic> {
        self.compiled.lock().unwrap().push(source.to_string());

        if source.contains(FAIL_MARKER) {
            return Err(Diagnostic::new(format!("unexpected {FAIL_MARKER}")));
        }
        Ok(source.to_uppercase())
    }
}
