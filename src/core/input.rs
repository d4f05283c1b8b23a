//! Single-line input editor with autocomplete and history.
//!
//! The editor is UI agnostic: a host feeds it text changes and key actions
//! (submit, tab, up/down) and renders `text`, `candidates` and `selected`.

use super::CommandRegistry;

/// Maximum number of remembered command lines.
pub const MAX_HISTORY: usize = 100;

/// Editing state of the console input line.
///
/// Autocomplete works in two modes. While the text does not name a command,
/// candidates are the command names it prefixes. Once the text (spaces
/// ignored) names a command, candidates are the values of that command's
/// next argument slot and completing appends the value instead of replacing
/// the text.
///
/// ```
/// use debug_console::core::{ArgSlot, Command, CommandRegistry, InputLine};
///
/// let mut registry = CommandRegistry::new();
/// registry.register(Command::new("clear", |_, _| true)).unwrap();
/// registry
///     .register(Command::new("collapse", |_, _| true).arg(ArgSlot::new([true, false])))
///     .unwrap();
///
/// let mut input = InputLine::new();
/// input.set_text("c", &registry);
/// assert_eq!(input.candidates(), ["clear", "collapse"]);
///
/// input.cycle_selection(1);
/// input.complete(&registry);
/// assert_eq!(input.text(), "collapse");
/// assert_eq!(input.candidates(), ["true", "false"]);
///
/// input.complete(&registry);
/// assert_eq!(input.text(), "collapse true ");
/// ```
#[derive(Debug, Clone, Default)]
pub struct InputLine {
    text: String,
    /// Cursor position in chars.
    cursor: usize,
    /// Set when the cursor was moved programmatically and the host should follow.
    cursor_jump: bool,
    candidates: Vec<String>,
    selected: usize,
    /// Index of the argument slot offered next.
    arg_slot: usize,
    completing_argument: bool,
    /// Submitted lines, most recent first.
    history: Vec<String>,
    /// 0 = editing the draft, n = showing `history[n - 1]`.
    history_index: usize,
    history_draft: String,
}

impl InputLine {
    /// Create an empty input line.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Cursor position in chars.
    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Current autocomplete candidates.
    #[inline]
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Index of the highlighted candidate.
    #[inline]
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// The highlighted candidate, if any.
    pub fn selected_candidate(&self) -> Option<&str> {
        self.candidates.get(self.selected).map(String::as_str)
    }

    /// Index of the argument slot autocomplete offers next.
    #[inline]
    pub fn arg_slot(&self) -> usize {
        self.arg_slot
    }

    /// Whether candidates are argument values rather than command names.
    #[inline]
    pub fn is_completing_argument(&self) -> bool {
        self.completing_argument
    }

    /// Remembered lines, most recent first.
    #[inline]
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Returns the cursor position once after it was moved by
    /// [`complete`](Self::complete) or history navigation.
    pub fn take_cursor_jump(&mut self) -> Option<usize> {
        std::mem::take(&mut self.cursor_jump).then_some(self.cursor)
    }

    /// Replace the text (an edit by the user) and recompute candidates.
    pub fn set_text(&mut self, text: impl Into<String>, registry: &CommandRegistry) {
        self.text = text.into();
        self.cursor = self.text.chars().count();
        self.refresh(registry);
    }

    /// Recompute candidates for the current text.
    pub fn refresh(&mut self, registry: &CommandRegistry) {
        self.candidates.clear();
        self.selected = 0;
        self.completing_argument = false;

        if self.text.is_empty() {
            self.arg_slot = 0;
            return;
        }

        let compact: String = self.text.chars().filter(|c| *c != ' ').collect();
        if let Some(values) = registry.slot_candidates(&compact, self.arg_slot) {
            self.completing_argument = !values.is_empty();
            self.candidates = values;
            return;
        }

        self.candidates = registry
            .names_with_prefix(&self.text)
            .into_iter()
            .map(String::from)
            .collect();
    }

    /// Move the highlighted candidate by `offset`, wrapping at both ends.
    ///
    /// Does nothing while the text is empty or there are no candidates.
    pub fn cycle_selection(&mut self, offset: isize) {
        if self.text.is_empty() || self.candidates.is_empty() {
            return;
        }

        let len = self.candidates.len() as isize;
        self.selected = (self.selected as isize + offset).rem_euclid(len) as usize;
    }

    /// Apply the highlighted candidate. Returns `false` if there was none.
    ///
    /// Argument values are appended as `" value "` and the slot counter
    /// advances; command names replace the text. The cursor moves to the end.
    pub fn complete(&mut self, registry: &CommandRegistry) -> bool {
        let Some(candidate) = self.selected_candidate().map(str::to_owned) else {
            return false;
        };

        if self.completing_argument {
            self.text.push_str(&format!(" {} ", candidate));
            self.arg_slot += 1;
        } else {
            self.text = candidate;
        }

        self.cursor = self.text.chars().count();
        self.cursor_jump = true;
        self.refresh(registry);
        true
    }

    /// Take the text for dispatch and reset the editor, keeping history.
    ///
    /// The editor is cleared either way; a blank line returns `None`.
    pub fn submit(&mut self) -> Option<String> {
        let line = std::mem::take(&mut self.text);
        self.reset();
        (!line.trim().is_empty()).then_some(line)
    }

    /// Remember a dispatched line. Repeating the most recent line is a no-op.
    pub fn record_history(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() || self.history.first().is_some_and(|last| last == line) {
            return;
        }

        self.history.insert(0, line.to_string());
        self.history.truncate(MAX_HISTORY);
    }

    /// Replace the remembered lines (most recent first).
    pub fn set_history(&mut self, history: Vec<String>) {
        self.history = history;
        self.history.truncate(MAX_HISTORY);
        self.history_index = 0;
    }

    /// Step back to an older line. The current text is kept as a draft.
    pub fn history_previous(&mut self, registry: &CommandRegistry) -> bool {
        if self.history_index >= self.history.len() {
            return false;
        }

        if self.history_index == 0 {
            self.history_draft = self.text.clone();
        }
        self.history_index += 1;
        let line = self.history[self.history_index - 1].clone();
        self.show_recalled(line, registry);
        true
    }

    /// Step forward to a newer line, ending at the saved draft.
    pub fn history_next(&mut self, registry: &CommandRegistry) -> bool {
        if self.history_index == 0 {
            return false;
        }

        self.history_index -= 1;
        let line = if self.history_index == 0 {
            std::mem::take(&mut self.history_draft)
        } else {
            self.history[self.history_index - 1].clone()
        };
        self.show_recalled(line, registry);
        true
    }

    /// Clear text and candidates. History is kept.
    pub fn reset(&mut self) {
        let history = std::mem::take(&mut self.history);
        *self = Self {
            history,
            ..Self::default()
        };
    }

    fn show_recalled(&mut self, line: String, registry: &CommandRegistry) {
        self.text = line;
        self.cursor = self.text.chars().count();
        self.cursor_jump = true;
        // A recalled line starts completion from the first slot again
        self.arg_slot = 0;
        self.refresh(registry);
    }
}
