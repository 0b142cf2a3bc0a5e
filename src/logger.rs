//! Simple leveled logger that writes to stderr or a file.
//!
//! The serve loop is single-threaded, so a plain `Mutex` around the output
//! is all the synchronization needed.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::sync::Mutex;

/// Verbosity level for log output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Errors only (via the normal error path, not the logger)
    Quiet = 0,
    /// Session events and command/status traffic
    Verbose = 1,
    /// Raw frame bytes
    Trace = 2,
}

impl Default for Verbosity {
    fn default() -> Self {
        Verbosity::Quiet
    }
}

/// Output destination for logger
enum Output {
    Stderr,
    File(BufWriter<File>),
}

pub struct Logger {
    output: Mutex<Output>,
    verbosity: Verbosity,
}

impl Logger {
    /// Create a new logger writing to stderr
    pub fn stderr(verbosity: Verbosity) -> Self {
        Logger {
            output: Mutex::new(Output::Stderr),
            verbosity,
        }
    }

    /// Create a new logger writing to a file
    pub fn file(path: &str, verbosity: Verbosity) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Logger {
            output: Mutex::new(Output::File(BufWriter::new(file))),
            verbosity,
        })
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Log a message if verbosity level is met
    pub fn log(&self, level: Verbosity, msg: &str) {
        if self.verbosity >= level {
            if let Ok(mut output) = self.output.lock() {
                match &mut *output {
                    Output::Stderr => {
                        eprintln!("{}", msg);
                    }
                    Output::File(f) => {
                        let _ = writeln!(f, "{}", msg);
                        let _ = f.flush();
                    }
                }
            }
        }
    }

    /// Log at Verbose level
    pub fn verbose(&self, msg: &str) {
        self.log(Verbosity::Verbose, msg);
    }

    /// Log at Trace level
    pub fn trace(&self, msg: &str) {
        self.log(Verbosity::Trace, msg);
    }
}

/// Render bytes as space-separated uppercase hex for frame traces
pub fn hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&format!("{:02X}", b));
    }
    out
}
