//! ui::output
//!
//! Run log output.
//!
//! # Design
//!
//! Every component receives a [`Reporter`] explicitly instead of writing to
//! process-wide output. The production reporter, [`ActionsReporter`], emits
//! GitHub Actions workflow commands (`::warning::`, `::group::`, ...) so that
//! annotations and collapsible groups render in the job log. Tests use
//! [`MemoryReporter`] to assert on what a run reported.

use std::fmt::Display;
use std::io::Write;
use std::sync::Mutex;

/// Width of the separator line printed between run phases.
const SEPARATOR_WIDTH: usize = 80;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - warnings and errors only
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Severity of a reported line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Debug,
    Info,
    Warning,
    Error,
}

/// Sink for the structured run log.
///
/// Implementations must be `Send + Sync` so a reporter can be borrowed
/// across the forge's await point.
pub trait Reporter: Send + Sync {
    /// Record a single line at the given level.
    fn log(&self, level: Level, message: &str);

    /// Record a titled, collapsible block of text.
    fn group(&self, title: &str, body: &str);

    fn debug(&self, message: &str) {
        self.log(Level::Debug, message);
    }

    fn info(&self, message: &str) {
        self.log(Level::Info, message);
    }

    fn warning(&self, message: &str) {
        self.log(Level::Warning, message);
    }

    fn error(&self, message: &str) {
        self.log(Level::Error, message);
    }

    /// Print a visual separator between run phases.
    fn separator(&self) {
        self.info(&"=".repeat(SEPARATOR_WIDTH));
    }
}

/// Escape message data for a workflow command.
///
/// The runner treats `%`, `\r` and `\n` specially in command data.
pub fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Format a line as a workflow command (or plain text for info).
pub fn format_command(level: Level, message: impl Display) -> String {
    let message = message.to_string();
    match level {
        Level::Debug => format!("::debug::{}", escape_data(&message)),
        Level::Info => message,
        Level::Warning => format!("::warning::{}", escape_data(&message)),
        Level::Error => format!("::error::{}", escape_data(&message)),
    }
}

/// Reporter that writes GitHub Actions workflow commands to stdout.
#[derive(Debug, Clone, Copy)]
pub struct ActionsReporter {
    verbosity: Verbosity,
}

impl ActionsReporter {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    /// Whether a line at `level` is shown under the configured verbosity.
    pub fn enabled(&self, level: Level) -> bool {
        match level {
            Level::Debug => self.verbosity == Verbosity::Debug,
            Level::Info => self.verbosity != Verbosity::Quiet,
            Level::Warning | Level::Error => true,
        }
    }

    fn write_line(&self, line: &str) {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        // A closed stdout must not abort the run.
        let _ = writeln!(handle, "{}", line);
    }
}

impl Reporter for ActionsReporter {
    fn log(&self, level: Level, message: &str) {
        if self.enabled(level) {
            self.write_line(&format_command(level, message));
        }
    }

    fn group(&self, title: &str, body: &str) {
        if self.verbosity == Verbosity::Quiet {
            return;
        }
        self.write_line(&format!("::group::{}", escape_data(title)));
        self.write_line(body);
        self.write_line("::endgroup::");
    }
}

/// A recorded reporter line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Line { level: Level, message: String },
    Group { title: String, body: String },
}

/// Reporter that keeps every entry in memory.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    entries: Mutex<Vec<Entry>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded entries, in order.
    pub fn entries(&self) -> Vec<Entry> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    /// Messages recorded at `level`, in order.
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter_map(|entry| match entry {
                Entry::Line { level: l, message } if l == level => Some(message),
                _ => None,
            })
            .collect()
    }

    /// Whether any line (at any level) contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.entries().iter().any(|entry| match entry {
            Entry::Line { message, .. } => message.contains(needle),
            Entry::Group { title, body } => title.contains(needle) || body.contains(needle),
        })
    }

    fn push(&self, entry: Entry) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(entry);
        }
    }
}

impl Reporter for MemoryReporter {
    fn log(&self, level: Level, message: &str) {
        self.push(Entry::Line {
            level,
            message: message.to_string(),
        });
    }

    fn group(&self, title: &str, body: &str) {
        self.push(Entry::Group {
            title: title.to_string(),
            body: body.to_string(),
        });
    }
}
