// src/build/compiler.rs

//! Boundary to the actual source-to-source compiler.
//!
//! The orchestrator only sees the [`Compiler`] trait. Production uses
//! [`CommandCompiler`], which pipes the source through an external command;
//! tests plug in their own implementation.

use std::io::Write;
use std::process::{Command, Stdio};

use anyhow::{anyhow, Context, Result};
use tracing::{debug, trace};

use crate::errors::Diagnostic;

/// Opaque, synchronous compile step: source text in, output text or a
/// diagnostic out. Never retried by the caller.
pub trait Compiler: Send + Sync {
    fn compile(&self, source: &str) -> std::result::Result<String, Diagnostic>;
}

impl<C: Compiler + ?Sized> Compiler for Box<C> {
    fn compile(&self, source: &str) -> std::result::Result<String, Diagnostic> {
        (**self).compile(source)
    }
}

/// Runs a shell command per file: source on stdin, output on stdout.
///
/// A non-zero exit status turns stderr (or, if that is empty, the status
/// itself) into the diagnostic.
#[derive(Debug, Clone)]
pub struct CommandCompiler {
    cmd: String,
}

impl CommandCompiler {
    pub fn new(cmd: impl Into<String>) -> Self {
        Self { cmd: cmd.into() }
    }

    fn shell(&self) -> Command {
        // Build a shell command appropriate for the platform.
        if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(&self.cmd);
            c
        } else {
            let mut c = Command::new("sh");
            c.arg("-c").arg(&self.cmd);
            c
        }
    }

    fn run(&self, source: &str) -> Result<std::process::Output> {
        let mut child = self
            .shell()
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("spawning compiler `{}`", self.cmd))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| anyhow!("compiler stdin was not captured"))?;

        // Feed stdin from a helper thread so a compiler that streams output
        // before consuming all input cannot deadlock on a full pipe.
        let output = std::thread::scope(|scope| {
            let writer = scope.spawn(move || stdin.write_all(source.as_bytes()));
            let output = child.wait_with_output();
            if let Ok(Err(err)) = writer.join() {
                // A compiler that exits without reading its input closes the pipe.
                if err.kind() != std::io::ErrorKind::BrokenPipe {
                    trace!(error = %err, "failed to write source to compiler stdin");
                }
            }
            output
        })
        .with_context(|| format!("waiting for compiler `{}`", self.cmd))?;

        Ok(output)
    }
}

impl Compiler for CommandCompiler {
    fn compile(&self, source: &str) -> std::result::Result<String, Diagnostic> {
        let output = self
            .run(source)
            .map_err(|err| Diagnostic::new(format!("{err:#}")))?;

        debug!(cmd = %self.cmd, status = ?output.status, "compiler exited");

        if output.status.success() {
            String::from_utf8(output.stdout)
                .map_err(|e| Diagnostic::new(format!("compiler produced invalid UTF-8: {e}")))
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = if stderr.trim().is_empty() {
                format!("compiler exited with {}", output.status)
            } else {
                stderr.into_owned()
            };
            Err(Diagnostic::new(message))
        }
    }
}
