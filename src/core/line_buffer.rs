//! Bounded, newest-first log of console lines.

use std::collections::VecDeque;
use std::fmt::{self, Display};
use std::time::SystemTime;

/// Severity of a console line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LogSeverity {
    /// Plain output.
    #[default]
    Info,
    /// Something looks wrong.
    Warning,
    /// Something failed.
    Error,
    /// A debug assertion fired.
    Assert,
    /// A handler panicked.
    Exception,
}

impl LogSeverity {
    /// Name used in rendered lines.
    pub fn name(&self) -> &'static str {
        match self {
            LogSeverity::Info => "Log",
            LogSeverity::Warning => "Warning",
            LogSeverity::Error => "Error",
            LogSeverity::Assert => "Assert",
            LogSeverity::Exception => "Exception",
        }
    }
}

impl Display for LogSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One entry in the console log.
///
/// Two lines are equal when header, body and severity match. Timestamp and
/// repeat count are bookkeeping and do not take part in comparison.
#[derive(Debug, Clone)]
pub struct LogLine {
    /// First line, always shown.
    pub header: String,
    /// Detail text shown under the header. May be empty.
    pub body: String,
    /// Severity.
    pub severity: LogSeverity,
    /// When the line was last appended.
    pub timestamp: SystemTime,
    /// Extra occurrences merged into this line while collapsing.
    pub count: u32,
}

impl PartialEq for LogLine {
    fn eq(&self, other: &Self) -> bool {
        self.severity == other.severity && self.header == other.header && self.body == other.body
    }
}

impl Eq for LogLine {}

impl LogLine {
    /// Create a new line stamped with the current time.
    pub fn new(header: impl Into<String>, body: impl Into<String>, severity: LogSeverity) -> Self {
        Self {
            header: header.into(),
            body: body.into(),
            severity,
            timestamp: SystemTime::now(),
            count: 0,
        }
    }

    /// An info line without body.
    pub fn info(header: impl Into<String>) -> Self {
        Self::new(header, "", LogSeverity::Info)
    }

    /// A warning line without body.
    pub fn warning(header: impl Into<String>) -> Self {
        Self::new(header, "", LogSeverity::Warning)
    }

    /// An error line without body.
    pub fn error(header: impl Into<String>) -> Self {
        Self::new(header, "", LogSeverity::Error)
    }

    /// Replace the timestamp.
    pub fn with_timestamp(mut self, timestamp: SystemTime) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// The timestamp as `HH:MM:SS` (UTC).
    pub fn time_of_day(&self) -> String {
        let secs = self
            .timestamp
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let hours = (secs / 3600) % 24;
        let minutes = (secs / 60) % 60;
        let seconds = secs % 60;
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    }

    /// Render the line as plain text.
    ///
    /// `[Severity][HH:MM:SS]: header [xN]` followed by the body on its own
    /// line. The repeat marker only appears when `show_count` is set and the
    /// line has merged duplicates.
    pub fn render(&self, show_count: bool) -> String {
        let mut out = format!("[{}][{}]: {}", self.severity, self.time_of_day(), self.header);
        if show_count && self.count > 0 {
            out.push_str(&format!(" [x{}]", self.count));
        }
        if !self.body.is_empty() {
            out.push('\n');
            out.push_str(&self.body);
        }
        out
    }
}

/// Fixed-capacity log, newest line first.
///
/// Appending to a full buffer evicts the oldest line. With collapsing enabled,
/// a line equal to one already stored bumps that entry's count instead of
/// being inserted.
///
/// # Examples
///
/// ```
/// use debug_console::core::{LineBuffer, LogLine};
///
/// let mut buffer = LineBuffer::new(2);
/// buffer.append(LogLine::info("a"));
/// buffer.append(LogLine::info("b"));
/// buffer.append(LogLine::info("c"));
///
/// let headers: Vec<_> = buffer.iter().map(|l| l.header.as_str()).collect();
/// assert_eq!(headers, vec!["c", "b"]);
/// ```
#[derive(Debug, Clone)]
pub struct LineBuffer {
    lines: VecDeque<LogLine>,
    capacity: usize,
    collapsing: bool,
    dirty: bool,
    appended: u64,
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl LineBuffer {
    /// Create an empty buffer holding at most `capacity` lines (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
            collapsing: false,
            dirty: false,
            appended: 0,
        }
    }

    /// Append a line.
    pub fn append(&mut self, mut line: LogLine) {
        self.dirty = true;

        if self.collapsing {
            // Oldest equal entry absorbs the duplicate and stays where it is
            if let Some(existing) = self.lines.iter_mut().rev().find(|l| **l == line) {
                existing.count += 1;
                existing.timestamp = line.timestamp;
                return;
            }
        }

        if self.lines.len() == self.capacity {
            self.lines.pop_back();
        }
        line.count = 0;
        self.lines.push_front(line);
        self.appended += 1;
    }

    /// Remove every line. Capacity is kept.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.dirty = true;
    }

    /// Enable or disable collapsing. Lines already stored are not merged.
    pub fn set_collapsing(&mut self, collapsing: bool) {
        if self.collapsing != collapsing {
            self.collapsing = collapsing;
            self.dirty = true;
        }
    }

    /// Whether duplicates are being collapsed.
    #[inline]
    pub fn is_collapsing(&self) -> bool {
        self.collapsing
    }

    /// Number of stored lines.
    #[inline]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Maximum number of lines.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate newest-first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &LogLine> + ExactSizeIterator {
        self.lines.iter()
    }

    /// Line at `index`, 0 being the newest.
    pub fn get(&self, index: usize) -> Option<&LogLine> {
        self.lines.get(index)
    }

    /// Whether anything changed since the last [`take_dirty`](Self::take_dirty).
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Read and reset the dirty flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Total number of lines ever inserted (merged duplicates excluded).
    ///
    /// Monotonic, unaffected by eviction and `clear`.
    #[inline]
    pub fn appended(&self) -> u64 {
        self.appended
    }
}
