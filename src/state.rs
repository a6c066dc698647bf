use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::ReviewConfig;
use crate::data::filter::LowPassFilter;
use crate::data::loader::load_file;
use crate::data::model::Dataset;
use crate::data::writer::PersistenceGateway;
use crate::error::{LoadError, RenderError, SaveError};
use crate::playback::{PlaybackController, TickOutcome};
use crate::render::{RenderedSeries, Viewport, render};
use crate::review::{Label, ReviewState};

// ---------------------------------------------------------------------------
// Status line
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

impl StatusMessage {
    fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: ReviewConfig,

    /// Loaded dataset (None until user loads a file).
    pub dataset: Option<Dataset>,

    /// Current row, labels, toggles and playback cursor.
    pub review: ReviewState,

    pub playback: PlaybackController,

    /// Session output file.
    pub gateway: PersistenceGateway,

    /// Status / error message shown in the UI.
    pub status: Option<StatusMessage>,

    /// `None` when the configured filter is unusable; raw samples are shown.
    filter: Option<LowPassFilter>,

    /// Last rendered frame and the inputs it was built from.
    rendered: Option<(RenderKey, Result<RenderedSeries, RenderError>)>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct RenderKey {
    index: usize,
    preprocessing: bool,
    window_end: f64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ReviewConfig::default())
    }
}

impl AppState {
    pub fn new(config: ReviewConfig) -> Self {
        let filter = match LowPassFilter::from_config(&config.filter) {
            Ok(f) => {
                log::debug!(
                    "Low-pass filter: order {}, DC gain {:.3}",
                    f.order(),
                    f.dc_gain()
                );
                Some(f)
            }
            Err(e) => {
                log::error!("Invalid filter configuration, preprocessing disabled: {e:#}");
                None
            }
        };
        Self {
            playback: PlaybackController::from_config(&config),
            config,
            dataset: None,
            review: ReviewState::new(),
            gateway: PersistenceGateway::default(),
            status: None,
            filter,
            rendered: None,
        }
    }

    /// Ingest a newly loaded dataset and restart the review.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.review.load_dataset(dataset.len());
        self.dataset = Some(dataset);
        self.rendered = None;
        self.status = None;
    }

    /// Load `path`, replacing the current dataset. On failure nothing
    /// changes except the status line.
    pub fn load(&mut self, path: &Path) -> Result<(), LoadError> {
        match load_file(path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} rows x {} samples from {}",
                    dataset.len(),
                    dataset.sample_columns(),
                    path.display()
                );
                self.set_dataset(dataset);
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to load file: {e}");
                self.status = Some(StatusMessage::error(format!("Error: {e}")));
                Err(e)
            }
        }
    }

    /// Label the current row and move on.
    pub fn label_current(&mut self, value: Label) {
        if self.review.row_count() > 0 {
            self.review.label(self.review.index(), value);
        }
    }

    pub fn previous(&mut self) {
        self.review.advance(-1);
    }

    pub fn next(&mut self) {
        self.review.advance(1);
    }

    pub fn toggle_preprocessing(&mut self) {
        self.review.toggle_preprocessing();
        let enabled = self.review.preprocessing_enabled;
        log::info!("Preprocessing {}", if enabled { "enabled" } else { "disabled" });
        if enabled {
            self.status = Some(match &self.filter {
                Some(_) => StatusMessage::info("Data preprocessing is completed."),
                None => StatusMessage::error("Filter configuration invalid; showing raw data"),
            });
        } else {
            self.status = None;
        }
    }

    /// Play/Pause; does nothing unless a row is displayed.
    pub fn toggle_playback(&mut self) {
        if self.review.row_count() > 0 {
            self.playback.toggle(&mut self.review);
        }
    }

    /// Advance the playback timer to `now`.
    pub fn poll_playback(&mut self, now: Instant) -> TickOutcome {
        self.playback.poll(&mut self.review, now)
    }

    /// Save the responses, asking `choose_destination` for a path on the
    /// first save of the session.
    pub fn save(
        &mut self,
        choose_destination: impl FnOnce() -> Option<PathBuf>,
    ) -> Result<Option<PathBuf>, SaveError> {
        let Some(dataset) = &self.dataset else {
            return Ok(None);
        };
        match self
            .gateway
            .save(dataset, self.review.responses(), choose_destination)
        {
            Ok(Some(path)) => {
                self.status = Some(StatusMessage::info(format!(
                    "Responses saved to '{}'",
                    path.display()
                )));
                Ok(Some(path))
            }
            Ok(None) => Ok(None),
            Err(e) => {
                log::error!("An error occurred while saving responses: {e}");
                self.status = Some(StatusMessage::error(format!("Error: {e}")));
                Err(e)
            }
        }
    }

    /// Build (or reuse) the frame for the current row and cursor.
    pub fn current_render(&mut self) -> Option<&Result<RenderedSeries, RenderError>> {
        let dataset = self.dataset.as_ref()?;
        if dataset.is_empty() {
            return None;
        }
        let key = RenderKey {
            index: self.review.index(),
            preprocessing: self.review.preprocessing_enabled,
            window_end: self.review.current_time(),
        };

        let stale = self.rendered.as_ref().map_or(true, |(k, _)| *k != key);
        if stale {
            let viewport = Viewport {
                duration: self.config.duration_secs,
                window_length: self.config.window_secs,
            };
            let filter = self.filter.as_ref().filter(|_| key.preprocessing);
            let result = match dataset.row(key.index) {
                Some(row) => render(key.index, row, filter, key.window_end, viewport),
                None => Err(RenderError::RowOutOfRange {
                    index: key.index,
                    len: dataset.len(),
                }),
            };
            if let Err(e) = &result {
                let repeated = matches!(
                    &self.rendered,
                    Some((k, Err(_))) if k.index == key.index && k.preprocessing == key.preprocessing
                );
                if !repeated {
                    log::error!("Render failed: {e}");
                }
            }
            self.rendered = Some((key, result));
        }
        self.rendered.as_ref().map(|(_, r)| r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> AppState {
        let mut state = AppState::default();
        state.set_dataset(Dataset::from_samples(vec![
            vec![1.0, 2.0, 3.0, 4.0, 5.0],
            vec![5.0, 4.0, 3.0, 2.0, 1.0],
            vec![0.0, 0.0, 0.0, 0.0, 0.0],
        ]));
        state
    }

    #[test]
    fn labeling_scenario() {
        let mut state = scenario();
        state.label_current(Label::Yes);
        assert_eq!(state.review.index(), 1);
        state.label_current(Label::No);
        assert_eq!(state.review.index(), 2);
        state.label_current(Label::Yes);
        assert_eq!(state.review.index(), 2);
        assert_eq!(
            state.review.responses(),
            &[Label::Yes, Label::No, Label::Yes]
        );
    }

    #[test]
    fn actions_are_ignored_without_dataset() {
        let mut state = AppState::default();
        state.label_current(Label::Yes);
        state.toggle_playback();
        state.next();
        assert!(!state.review.is_playing());
        assert!(state.current_render().is_none());
        assert_eq!(state.save(|| panic!("no dataset, no dialog")).unwrap(), None);
    }

    #[test]
    fn failed_load_keeps_current_dataset() {
        let mut state = scenario();
        state.label_current(Label::Yes);
        let dir = tempfile::tempdir().unwrap();

        assert!(state.load(&dir.path().join("missing.csv")).is_err());
        assert_eq!(state.dataset.as_ref().map(Dataset::len), Some(3));
        assert_eq!(state.review.index(), 1);
        assert!(state.status.as_ref().is_some_and(|s| s.is_error));
    }

    #[test]
    fn load_replaces_dataset_and_resets_review() {
        let mut state = scenario();
        state.label_current(Label::No);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("two.csv");
        std::fs::write(&path, "a,b\n1,2\n3,4\n").unwrap();

        state.load(&path).unwrap();
        assert_eq!(state.review.index(), 0);
        assert_eq!(state.review.responses(), &[Label::Unlabeled; 2]);
    }

    #[test]
    fn render_follows_toggle_and_cursor() {
        let mut state = scenario();
        let raw = state.current_render().unwrap().clone().unwrap();
        assert!(!raw.filtered);
        assert_eq!(raw.x_range, -3.0..=0.0);

        state.toggle_preprocessing();
        let filtered = state.current_render().unwrap().clone().unwrap();
        assert!(filtered.filtered);
        assert_ne!(raw.points, filtered.points);

        state.toggle_preprocessing();
        assert_eq!(state.current_render().unwrap().as_ref().unwrap(), &raw);

        state.toggle_playback();
        state.playback.tick(&mut state.review);
        let moved = state.current_render().unwrap().clone().unwrap();
        assert!(*moved.x_range.end() > 0.0);
    }

    #[test]
    fn header_only_file_cannot_play_or_label() {
        let mut state = AppState::default();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("header.csv");
        std::fs::write(&path, "a,b,c\n").unwrap();
        state.load(&path).unwrap();
        assert_eq!(state.review.row_count(), 0);

        state.toggle_playback();
        assert!(!state.review.is_playing());
        assert!(!state.playback.is_scheduled());
        assert_eq!(state.review.phase(), crate::review::Phase::Viewing);

        state.label_current(Label::Yes);
        assert!(state.review.responses().is_empty());
        assert!(state.current_render().is_none());
    }

    #[test]
    fn empty_rows_report_render_error() {
        let mut state = AppState::default();
        state.set_dataset(Dataset::from_cells(vec![], vec![vec![]]));
        assert_eq!(
            state.current_render().unwrap(),
            &Err(RenderError::EmptyRow { index: 0 })
        );
    }

    #[test]
    fn save_twice_appends_full_row_set() {
        let mut state = scenario();
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("responses.csv");

        state.label_current(Label::Yes);
        state.save(|| Some(target.clone())).unwrap();
        state.label_current(Label::No);
        state.save(|| None).unwrap();

        let text = std::fs::read_to_string(&target).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[1], "1,2,3,4,5,Yes");
        assert_eq!(lines[2], "5,4,3,2,1,");
        assert_eq!(lines[5], "5,4,3,2,1,No");
        assert!(state.status.as_ref().is_some_and(|s| !s.is_error));
    }
}
