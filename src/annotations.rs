//! Workflow-command annotations (`::error::…`) consumed by the CI runner.

use crate::validation::ValidationOutcome;
use std::fmt;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Error,
    Warning,
    Notice,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Error => "error",
            Level::Warning => "warning",
            Level::Notice => "notice",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One annotation line.
pub struct Annotation {
    pub level: Level,
    pub message: String,
}

impl Annotation {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: Level::Warning,
            message: message.into(),
        }
    }

    pub fn notice(message: impl Into<String>) -> Self {
        Self {
            level: Level::Notice,
            message: message.into(),
        }
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "::{}::{}",
            self.level.as_str(),
            escape_message(&self.message)
        )
    }
}

// The runner reads one command per line; multi-line messages must be encoded.
fn escape_message(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Print the outcome of a validation run and return the process exit code.
///
/// Warnings come first and never affect the exit code; any error yields 1.
pub fn report(outcome: &ValidationOutcome, out: &mut impl Write) -> io::Result<i32> {
    for warning in &outcome.warnings {
        writeln!(out, "{}", Annotation::warning(warning.to_string()))?;
    }

    if outcome.is_clean() {
        writeln!(out, "{}", Annotation::notice("All validations passed!"))?;
        return Ok(0);
    }

    writeln!(
        out,
        "{}",
        Annotation::error("The following issues were found in your addon submission:")
    )?;
    for error in &outcome.errors {
        writeln!(out, "{}", Annotation::error(error.to_string()))?;
    }
    Ok(1)
}
