//! Renderer-facing view models.
//!
//! Pages build a [`PageView`] snapshot under their own lock; the TUI draws it
//! without touching page state.

use brigterm_core::Phase;

/// Semantic colour class of a phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Neutral,
    Success,
    Active,
    Failure,
    Muted,
}

impl Tone {
    pub fn of(phase: Phase) -> Tone {
        match phase {
            Phase::Succeeded => Tone::Success,
            Phase::Running | Phase::Starting => Tone::Active,
            Phase::Failed | Phase::SchedulingFailed | Phase::TimedOut => Tone::Failure,
            Phase::Pending => Tone::Neutral,
            Phase::Aborted | Phase::Canceled | Phase::Unknown => Tone::Muted,
        }
    }
}

/// A titled block of `label: value` lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InfoPane {
    pub title: String,
    pub fields: Vec<(String, String)>,
    /// Border tone follows this phase when set
    pub phase: Option<Phase>,
}

impl InfoPane {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn field(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((label.into(), value.into()));
        self
    }

    pub fn with_phase(mut self, phase: Phase) -> Self {
        self.phase = Some(phase);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRow {
    /// Id used when the row is opened
    pub key: String,
    /// Drives the status icon and row tone; `None` renders as unknown
    pub phase: Option<Phase>,
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableView {
    pub title: String,
    /// Column headers, excluding the leading status column
    pub header: Vec<&'static str>,
    pub rows: Vec<TableRow>,
    pub selected: Option<usize>,
    /// Border tone follows this phase when set
    pub phase: Option<Phase>,
}

impl TableView {
    pub fn selected_row(&self) -> Option<&TableRow> {
        self.selected.and_then(|i| self.rows.get(i))
    }
}

/// Log pane contents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogView {
    pub title: String,
    pub text: String,
    pub line_count: usize,
    /// Lines scrolled back from the tail; 0 follows new output
    pub scroll_back: usize,
    pub status: String,
}

/// One entry of the usage line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyHint {
    pub key: &'static str,
    pub action: &'static str,
}

impl KeyHint {
    pub const fn new(key: &'static str, action: &'static str) -> Self {
        Self { key, action }
    }
}

pub const HINT_RELOAD: KeyHint = KeyHint::new("F5", "Reload");
pub const HINT_BACK: KeyHint = KeyHint::new("<-/Del", "Back");
pub const HINT_HOME: KeyHint = KeyHint::new("Esc", "Home");
pub const HINT_QUIT: KeyHint = KeyHint::new("Q", "Quit");

/// Everything the renderer needs for one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageView {
    pub title: String,
    pub panes: Vec<InfoPane>,
    pub table: Option<TableView>,
    pub log: Option<LogView>,
    pub hints: Vec<KeyHint>,
    /// Error indicator from the last failed refresh
    pub error: Option<String>,
}
