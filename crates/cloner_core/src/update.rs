use crate::transcript::{edit_failed_message, EDIT_APPLIED_MESSAGE};
use crate::{
    derive_filename, validate_instruction, validate_url, AppState, Effect, Msg, RunId, Stage,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::PipelineEntered => vec![Effect::LookupLatestScraped],
        Msg::PipelineLeft => {
            state.reset_session();
            state.set_url_input(String::new());
            state.set_latest_scraped_path(None);
            state.mark_dirty();
            Vec::new()
        }
        Msg::UrlInputChanged(text) => {
            if text != state.url_input() {
                state.set_url_input(text);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::ModelSelected(model) => {
            if model != state.model() {
                state.set_model(model);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::UrlSubmitted => {
            // Submission is disabled while a request is outstanding.
            if !state.stage().accepts_url() {
                return (state, Vec::new());
            }
            if validate_url(state.url_input()).is_err() {
                return (state, Vec::new());
            }
            let url = state.url_input().trim().to_string();
            let run = state.begin_run(url.clone());
            state.mark_dirty();
            vec![Effect::Scrape { run, url }]
        }
        Msg::ScrapeSucceeded {
            run,
            raw_html,
            raw_html_path,
        } => {
            if !is_current(&state, run, Stage::Scraping) {
                return (state, Vec::new());
            }
            state.store_raw(raw_html, raw_html_path.clone());
            state.mark_dirty();
            vec![Effect::Generate {
                run,
                raw_html_path,
                model: state.model(),
            }]
        }
        Msg::ScrapeFailed { run, message } => {
            if is_current(&state, run, Stage::Scraping) {
                state.fail(message);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::GenerateSucceeded {
            run,
            generated_html,
        } => {
            if !is_current(&state, run, Stage::Generating) {
                return (state, Vec::new());
            }
            state.store_generated(generated_html);
            state.mark_dirty();
            vec![Effect::ScheduleReveal {
                run,
                delay: state.reveal_delay(),
            }]
        }
        Msg::GenerateFailed { run, message } => {
            if is_current(&state, run, Stage::Generating) {
                state.fail(message);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::RevealGenerated { run } => {
            if run == state.run() && state.reveal_generated() {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::EditSubmitted(text) => {
            // Gate set, nothing to edit, or blank text: no observable effect.
            if validate_instruction(&text).is_err() || !state.can_edit() {
                return (state, Vec::new());
            }
            let instruction = text.trim().to_string();
            let Some(html_content) = state.begin_edit(text) else {
                return (state, Vec::new());
            };
            state.mark_dirty();
            vec![Effect::Edit {
                run: state.run(),
                html_content,
                instruction,
                model: state.model(),
            }]
        }
        Msg::EditSucceeded { run, edited_html } => {
            if is_current(&state, run, Stage::Editing) && state.edit_in_flight() {
                state.finish_edit(edited_html, EDIT_APPLIED_MESSAGE);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::EditFailed { run, message } => {
            if is_current(&state, run, Stage::Editing) && state.edit_in_flight() {
                let transcript_text = edit_failed_message(&message);
                state.fail_edit(message, transcript_text);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::ViewSelected(kind) => {
            if state.select_view(kind) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::DownloadRequested => match state.artifacts().active_artifact() {
            Some(artifact) => vec![Effect::SaveArtifact {
                filename: derive_filename(state.stage(), Some(artifact.kind)).to_string(),
                content: artifact.content,
            }],
            None => Vec::new(),
        },
        Msg::LatestScrapedLoaded(path) => {
            state.set_latest_scraped_path(path);
            state.mark_dirty();
            Vec::new()
        }
    };

    (state, effects)
}

fn is_current(state: &AppState, run: RunId, expected: Stage) -> bool {
    run == state.run() && state.stage() == expected
}
