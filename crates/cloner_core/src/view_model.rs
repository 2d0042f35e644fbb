use crate::{ArtifactKind, ChatMessage, ModelId, Stage};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub stage: Stage,
    pub url_input: String,
    pub url: Option<String>,
    pub model: ModelId,
    pub active_kind: Option<ArtifactKind>,
    pub active_html: Option<String>,
    /// Artifacts the view toggle may offer.
    pub available: Vec<ArtifactKind>,
    pub download_filename: &'static str,
    pub error: Option<String>,
    pub transcript: Vec<ChatMessage>,
    pub edit_in_flight: bool,
    pub can_submit_url: bool,
    pub can_edit: bool,
    pub latest_scraped_path: Option<String>,
}

impl AppViewModel {
    /// Raw/generated toggle is shown once both exist.
    pub fn can_toggle_view(&self) -> bool {
        self.available.contains(&ArtifactKind::Raw)
            && self.available.contains(&ArtifactKind::Generated)
    }
}
