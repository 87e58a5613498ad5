//! Source formatters used when a file is written back.

use crate::error::{GowalkError, Result};
use std::io::Write;
use std::process::{Command, Stdio};

pub trait Formatter: Send + Sync {
    fn format(&self, src: &str) -> Result<String>;
}

/// Returns the source unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopFormatter;

impl Formatter for NoopFormatter {
    fn format(&self, src: &str) -> Result<String> {
        Ok(src.to_string())
    }
}

/// Pipes the source through an external tool such as `gofmt`.
#[derive(Debug, Clone)]
pub struct CommandFormatter {
    program: String,
    args: Vec<String>,
}

impl CommandFormatter {
    pub fn new(program: impl Into<String>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn gofmt() -> Self {
        Self::new("gofmt", Vec::<String>::new())
    }

    /// `goimports` also rewrites the import block.
    pub fn goimports() -> Self {
        Self::new("goimports", Vec::<String>::new())
    }
}

impl Formatter for CommandFormatter {
    fn format(&self, src: &str) -> Result<String> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| GowalkError::Format(format!("cannot run {}: {}", self.program, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(src.as_bytes())?;
        }
        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(GowalkError::Format(format!(
                "{} failed: {}",
                self.program,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        String::from_utf8(output.stdout)
            .map_err(|e| GowalkError::Format(format!("{} produced invalid UTF-8: {}", self.program, e)))
    }
}
