use cloner_core::{AppViewModel, ArtifactKind, ModelId, Sender, Stage};
use cloner_engine::{HtmlPreview, MAX_PREVIEW_CONTENT};

/// Turns successive view models into terminal lines, printing only what changed.
#[derive(Debug, Default)]
pub struct Renderer {
    stage: Option<Stage>,
    model: Option<ModelId>,
    transcript_len: usize,
    active: Option<(ArtifactKind, usize)>,
    error: Option<String>,
    latest_scraped_path: Option<String>,
}

impl Renderer {
    pub fn render(&mut self, view: &AppViewModel) -> Vec<String> {
        let mut lines = Vec::new();

        if self.model.is_some_and(|model| model != view.model) {
            lines.push(format!("model: {}", view.model));
        }

        if view.latest_scraped_path != self.latest_scraped_path {
            if let Some(path) = &view.latest_scraped_path {
                lines.push(format!("last scrape on the server: {path}"));
            }
        }

        if self.stage != Some(view.stage) {
            lines.push(stage_line(view));
        }

        if view.transcript.len() < self.transcript_len {
            self.transcript_len = 0;
        }
        let new_entries = &view.transcript[self.transcript_len..];
        for entry in new_entries {
            let who = match entry.sender {
                Sender::User => "you",
                Sender::Assistant => "assistant",
            };
            lines.push(format!("{who}: {}", entry.text));
        }

        let active = view
            .active_kind
            .zip(view.active_html.as_ref().map(String::len));
        if active != self.active {
            if let Some((kind, len)) = active {
                let mut line = format!(
                    "showing {} page ({len} bytes), /download saves {}",
                    kind.label(),
                    view.download_filename
                );
                if view.can_toggle_view() {
                    let kinds: Vec<_> = view.available.iter().map(|k| k.label()).collect();
                    line.push_str(&format!(", /view {}", kinds.join("|")));
                }
                lines.push(line);
            }
        }

        // Edit failures already show up in the transcript.
        if view.error != self.error && new_entries.is_empty() {
            if let Some(error) = &view.error {
                lines.push(format!("error: {error}"));
            }
        }

        self.stage = Some(view.stage);
        self.model = Some(view.model);
        self.transcript_len = view.transcript.len();
        self.active = active;
        self.error = view.error.clone();
        self.latest_scraped_path = view.latest_scraped_path.clone();
        lines
    }
}

fn stage_line(view: &AppViewModel) -> String {
    match view.stage {
        Stage::Idle => "ready: /clone <url> (or /help)".to_string(),
        Stage::Scraping => format!(
            "scraping {}...",
            view.url.as_deref().unwrap_or("the page")
        ),
        Stage::Generating => format!("generating with {}...", view.model),
        Stage::Editing => "applying edit...".to_string(),
        Stage::Complete => "done: type an instruction to edit the page".to_string(),
        Stage::Error => "failed: fix the input and try again".to_string(),
    }
}

pub fn preview_lines(kind: ArtifactKind, preview: &HtmlPreview) -> Vec<String> {
    let mut lines = vec![format!(
        "--- {} page: {} ---",
        kind.label(),
        preview.title.as_deref().unwrap_or("(untitled)")
    )];
    lines.extend(preview.text.lines().map(str::to_string));
    if preview.truncated {
        lines.push(format!(
            "[truncated at {} KiB, /download for the full page]",
            MAX_PREVIEW_CONTENT / 1024
        ));
    }
    lines.push("---".to_string());
    lines
}
