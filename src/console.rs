//! Output sinks for decoded readings and diagnostic echoes.

use std::io::{self, Stderr, Stdout, Write};

use crate::error::EspDroError;
use crate::format::{format_diagnostic, format_line};
use crate::reading::{Reading, StructuredReading};

/// Writes one line per structured reading to `out`, and optionally echoes
/// every raw message to `diag`.
#[derive(Debug)]
pub struct Console<O, D> {
    out: O,
    diag: D,
    diagnostics: bool,
}

impl Console<Stdout, Stderr> {
    /// Console bound to the process's stdout and stderr.
    pub fn stdio(diagnostics: bool) -> Self {
        Self::new(io::stdout(), io::stderr(), diagnostics)
    }
}

impl<O: Write, D: Write> Console<O, D> {
    /// Create a console over arbitrary writers.
    pub fn new(out: O, diag: D, diagnostics: bool) -> Self {
        Self {
            out,
            diag,
            diagnostics,
        }
    }

    /// Whether raw messages are echoed to the diagnostic sink.
    pub fn diagnostics_enabled(&self) -> bool {
        self.diagnostics
    }

    /// Handle one inbound message.
    ///
    /// Echoes the raw text when diagnostics are on, then prints the formatted
    /// line if the message carries a sample. Unstructured text yields `Ok(None)`
    /// and prints nothing.
    pub fn process(&mut self, reading: &Reading) -> Result<Option<StructuredReading>, EspDroError> {
        if self.diagnostics {
            writeln!(self.diag, "{}", format_diagnostic(reading.text()))?;
            self.diag.flush()?;
        }

        let Some(sample) = reading.decode()? else {
            tracing::trace!("Discarding unstructured message");
            return Ok(None);
        };

        writeln!(self.out, "{}", format_line(&sample))?;
        self.out.flush()?;
        Ok(Some(sample))
    }

    /// The output sink.
    pub fn out(&self) -> &O {
        &self.out
    }

    /// The diagnostic sink.
    pub fn diag(&self) -> &D {
        &self.diag
    }

    /// Consume the console and return both sinks.
    pub fn into_parts(self) -> (O, D) {
        (self.out, self.diag)
    }
}
