use std::fmt;

// ---------------------------------------------------------------------------
// Label – the reviewer's decision for one row
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Label {
    #[default]
    Unlabeled,
    Yes,
    No,
}

impl Label {
    /// Text written to the `Response` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Label::Unlabeled => "",
            Label::Yes => "Yes",
            Label::No => "No",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Review state machine
// ---------------------------------------------------------------------------

/// Coarse state of the review session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No dataset loaded.
    Empty,
    /// A row is displayed.
    Viewing,
    /// The current row is being played back.
    Playing,
}

/// Everything the reviewer mutates, independent of rendering.
///
/// `responses` always has one entry per dataset row; `index` stays inside
/// the dataset whenever it is non-empty.
#[derive(Debug, Clone, Default)]
pub struct ReviewState {
    loaded: bool,
    index: usize,
    responses: Vec<Label>,
    /// Display the low-pass filtered signal instead of the raw one.
    pub preprocessing_enabled: bool,
    pub(crate) playing: bool,
    pub(crate) current_time: f64,
}

impl ReviewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        match (self.loaded, self.playing) {
            (false, _) => Phase::Empty,
            (true, false) => Phase::Viewing,
            (true, true) => Phase::Playing,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn responses(&self) -> &[Label] {
        &self.responses
    }

    pub fn row_count(&self) -> usize {
        self.responses.len()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Playback cursor in seconds; the right edge of the visible window.
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn has_previous(&self) -> bool {
        self.loaded && self.index > 0
    }

    pub fn has_next(&self) -> bool {
        self.loaded && self.index + 1 < self.row_count()
    }

    /// Start reviewing a freshly loaded dataset of `row_count` rows.
    /// The preprocessing toggle carries over.
    pub fn load_dataset(&mut self, row_count: usize) {
        self.loaded = true;
        self.index = 0;
        self.responses = vec![Label::Unlabeled; row_count];
        self.playing = false;
        self.current_time = 0.0;
    }

    /// Record `value` for `row`, stop playback and move on to the next row
    /// when there is one. Returns `false` if `row` does not exist.
    pub fn label(&mut self, row: usize, value: Label) -> bool {
        let Some(slot) = self.responses.get_mut(row) else {
            return false;
        };
        *slot = value;
        self.playing = false;
        self.advance(1);
        true
    }

    /// Move `delta` rows, clamped to the dataset. Returns whether the row
    /// changed; at a boundary nothing happens.
    pub fn advance(&mut self, delta: isize) -> bool {
        if self.row_count() == 0 {
            return false;
        }
        let last = self.row_count() - 1;
        let target = self.index.saturating_add_signed(delta).min(last);
        if target == self.index {
            return false;
        }
        log::debug!("Row {} -> {}", self.index, target);
        self.index = target;
        self.current_time = 0.0;
        self.playing = false;
        true
    }

    pub fn toggle_preprocessing(&mut self) {
        self.preprocessing_enabled = !self.preprocessing_enabled;
    }

    /// Number of rows per label: (yes, no, unlabeled).
    pub fn tally(&self) -> (usize, usize, usize) {
        self.responses
            .iter()
            .fold((0, 0, 0), |(y, n, u), label| match label {
                Label::Yes => (y + 1, n, u),
                Label::No => (y, n + 1, u),
                Label::Unlabeled => (y, n, u + 1),
            })
    }
}
