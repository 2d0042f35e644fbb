use crate::{ArtifactKind, ModelId, RunId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User opened the pipeline view.
    PipelineEntered,
    /// User left the pipeline view; the session is discarded.
    PipelineLeft,
    /// User edited the URL input box.
    UrlInputChanged(String),
    /// User picked a model for the next requests.
    ModelSelected(ModelId),
    /// User submitted the current URL input.
    UrlSubmitted,
    ScrapeSucceeded {
        run: RunId,
        raw_html: String,
        raw_html_path: String,
    },
    ScrapeFailed {
        run: RunId,
        message: String,
    },
    GenerateSucceeded {
        run: RunId,
        generated_html: String,
    },
    GenerateFailed {
        run: RunId,
        message: String,
    },
    /// Reveal timer scheduled after a successful generate fired.
    RevealGenerated { run: RunId },
    /// User sent a chat instruction.
    EditSubmitted(String),
    EditSucceeded {
        run: RunId,
        edited_html: String,
    },
    EditFailed {
        run: RunId,
        message: String,
    },
    /// User toggled the preview between existing artifacts.
    ViewSelected(ArtifactKind),
    /// User asked to save the active artifact.
    DownloadRequested,
    /// Result of the opportunistic latest-scraped lookup.
    LatestScrapedLoaded(Option<String>),
}
