use std::time::Duration;

use crate::artifact::{derive_filename, ArtifactKind, ArtifactStore};
use crate::transcript::Transcript;
use crate::view_model::AppViewModel;
use crate::ModelId;

/// Identifies one clone attempt. Responses tagged with an older run are stale.
pub type RunId = u64;

pub const DEFAULT_REVEAL_DELAY: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    #[default]
    Idle,
    Scraping,
    Generating,
    Editing,
    Complete,
    Error,
}

impl Stage {
    /// True while a service call is outstanding.
    pub fn is_busy(self) -> bool {
        matches!(self, Stage::Scraping | Stage::Generating | Stage::Editing)
    }

    pub fn accepts_url(self) -> bool {
        matches!(self, Stage::Idle | Stage::Complete | Stage::Error)
    }

    pub fn label(self) -> &'static str {
        match self {
            Stage::Idle => "idle",
            Stage::Scraping => "scraping",
            Stage::Generating => "generating",
            Stage::Editing => "editing",
            Stage::Complete => "complete",
            Stage::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    stage: Stage,
    run: RunId,
    url_input: String,
    url: Option<String>,
    model: ModelId,
    artifacts: ArtifactStore,
    raw_html_path: Option<String>,
    error: Option<String>,
    transcript: Transcript,
    edit_in_flight: bool,
    reveal_pending: bool,
    reveal_delay: Duration,
    latest_scraped_path: Option<String>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            stage: Stage::Idle,
            run: 0,
            url_input: String::new(),
            url: None,
            model: ModelId::default(),
            artifacts: ArtifactStore::new(),
            raw_html_path: None,
            error: None,
            transcript: Transcript::default(),
            edit_in_flight: false,
            reveal_pending: false,
            reveal_delay: DEFAULT_REVEAL_DELAY,
            latest_scraped_path: None,
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State whose generated artifact is revealed after `delay`.
    pub fn with_reveal_delay(delay: Duration) -> Self {
        Self {
            reveal_delay: delay,
            ..Self::default()
        }
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            stage: self.stage,
            url_input: self.url_input.clone(),
            url: self.url.clone(),
            model: self.model,
            active_kind: self.artifacts.active_kind(),
            active_html: self.artifacts.active().map(str::to_string),
            available: self.artifacts.available(),
            download_filename: derive_filename(self.stage, self.artifacts.active_kind()),
            error: self.error.clone(),
            transcript: self.transcript.entries().to_vec(),
            edit_in_flight: self.edit_in_flight,
            can_submit_url: self.stage.accepts_url(),
            can_edit: self.can_edit(),
            latest_scraped_path: self.latest_scraped_path.clone(),
        }
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn run(&self) -> RunId {
        self.run
    }

    pub fn model(&self) -> ModelId {
        self.model
    }

    pub fn artifacts(&self) -> &ArtifactStore {
        &self.artifacts
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn raw_html_path(&self) -> Option<&str> {
        self.raw_html_path.as_deref()
    }

    pub fn edit_in_flight(&self) -> bool {
        self.edit_in_flight
    }

    pub fn url_input(&self) -> &str {
        &self.url_input
    }

    pub fn reveal_delay(&self) -> Duration {
        self.reveal_delay
    }

    /// Edits need a generated artifact, a free gate, and a settled stage.
    pub fn can_edit(&self) -> bool {
        !self.edit_in_flight
            && matches!(self.stage, Stage::Complete | Stage::Error)
            && self.artifacts.contains(ArtifactKind::Generated)
            && self.artifacts.active().is_some()
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_url_input(&mut self, text: String) {
        self.url_input = text;
    }

    pub(crate) fn set_model(&mut self, model: ModelId) {
        self.model = model;
    }

    pub(crate) fn set_latest_scraped_path(&mut self, path: Option<String>) {
        self.latest_scraped_path = path;
    }

    /// Resets every per-attempt field and starts a new run.
    pub(crate) fn begin_run(&mut self, url: String) -> RunId {
        self.reset_session();
        self.url = Some(url);
        self.stage = Stage::Scraping;
        self.run
    }

    /// Drops all per-attempt state; in-flight responses become stale.
    pub(crate) fn reset_session(&mut self) {
        self.run += 1;
        self.stage = Stage::Idle;
        self.url = None;
        self.artifacts.clear();
        self.raw_html_path = None;
        self.error = None;
        self.transcript = Transcript::default();
        self.edit_in_flight = false;
        self.reveal_pending = false;
    }

    pub(crate) fn store_raw(&mut self, raw_html: String, raw_html_path: String) {
        self.artifacts.set_artifact(ArtifactKind::Raw, raw_html);
        self.artifacts.set_active(ArtifactKind::Raw);
        self.raw_html_path = Some(raw_html_path);
        self.stage = Stage::Generating;
    }

    pub(crate) fn store_generated(&mut self, generated_html: String) {
        self.artifacts
            .set_artifact(ArtifactKind::Generated, generated_html);
        self.stage = Stage::Complete;
        self.reveal_pending = true;
    }

    /// Applies the reveal timer; only flips a view that still shows the raw page.
    pub(crate) fn reveal_generated(&mut self) -> bool {
        if !std::mem::take(&mut self.reveal_pending) {
            return false;
        }
        if self.artifacts.active_kind() == Some(ArtifactKind::Raw) {
            self.artifacts.set_active(ArtifactKind::Generated)
        } else {
            false
        }
    }

    pub(crate) fn select_view(&mut self, kind: ArtifactKind) -> bool {
        let changed = self.artifacts.active_kind() != Some(kind) && self.artifacts.set_active(kind);
        if changed {
            // An explicit choice supersedes the pending automatic switch.
            self.reveal_pending = false;
        }
        changed
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.stage = Stage::Error;
        self.error = Some(message);
    }

    /// Opens the gate and records the instruction; returns the html to edit.
    pub(crate) fn begin_edit(&mut self, instruction: String) -> Option<String> {
        let html = self.artifacts.active()?.to_string();
        self.transcript.push_user(instruction);
        self.error = None;
        self.edit_in_flight = true;
        self.stage = Stage::Editing;
        Some(html)
    }

    pub(crate) fn finish_edit(&mut self, edited_html: String, confirmation: &str) {
        self.transcript.push_assistant(confirmation);
        self.artifacts.set_artifact(ArtifactKind::Edited, edited_html);
        self.artifacts.set_active(ArtifactKind::Edited);
        self.reveal_pending = false;
        self.error = None;
        self.stage = Stage::Complete;
        self.edit_in_flight = false;
    }

    pub(crate) fn fail_edit(&mut self, message: String, transcript_text: String) {
        self.transcript.push_assistant(transcript_text);
        self.edit_in_flight = false;
        self.fail(message);
    }
}
