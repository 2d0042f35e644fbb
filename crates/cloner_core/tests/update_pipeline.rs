use std::sync::Once;
use std::time::Duration;

use cloner_core::{update, AppState, ArtifactKind, Effect, ModelId, Msg, Stage};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(cloner_logging::initialize_for_tests);
}

fn submit_url(state: AppState, input: &str) -> (AppState, Vec<Effect>) {
    let (state, _) = update(state, Msg::UrlInputChanged(input.to_string()));
    update(state, Msg::UrlSubmitted)
}

fn scraped(state: AppState) -> (AppState, Vec<Effect>) {
    let run = state.run();
    update(
        state,
        Msg::ScrapeSucceeded {
            run,
            raw_html: "<html>A</html>".to_string(),
            raw_html_path: "/tmp/a.html".to_string(),
        },
    )
}

#[test]
fn submit_issues_scrape_for_trimmed_url() {
    init_logging();
    let (mut state, effects) = submit_url(AppState::new(), "  https://example.com ");

    assert_eq!(state.stage(), Stage::Scraping);
    assert_eq!(
        effects,
        vec![Effect::Scrape {
            run: state.run(),
            url: "https://example.com".to_string(),
        }]
    );
    assert!(state.consume_dirty());
    assert!(!state.view().can_submit_url);
}

#[test]
fn invalid_url_is_rejected_at_boundary() {
    init_logging();
    for input in ["", "   ", "not a url", "ftp://example.com"] {
        let (state, effects) = submit_url(AppState::new(), input);
        assert_eq!(state.stage(), Stage::Idle);
        assert_eq!(state.error(), None);
        assert!(effects.is_empty());
    }
}

#[test]
fn scrape_success_activates_raw_before_generate() {
    init_logging();
    let (state, _) = submit_url(AppState::new(), "https://example.com");
    let (state, effects) = scraped(state);

    let view = state.view();
    assert_eq!(view.stage, Stage::Generating);
    assert_eq!(view.active_kind, Some(ArtifactKind::Raw));
    assert_eq!(view.active_html.as_deref(), Some("<html>A</html>"));
    assert_eq!(
        effects,
        vec![Effect::Generate {
            run: state.run(),
            raw_html_path: "/tmp/a.html".to_string(),
            model: ModelId::Gemini25ProPreview,
        }]
    );
}

#[test]
fn generate_success_reveals_after_scheduled_timer() {
    init_logging();
    let state = AppState::with_reveal_delay(Duration::ZERO);
    let (state, _) = submit_url(state, "https://example.com");
    let (state, _) = scraped(state);
    let run = state.run();

    let (state, effects) = update(
        state,
        Msg::GenerateSucceeded {
            run,
            generated_html: "<html>B</html>".to_string(),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::ScheduleReveal {
            run,
            delay: Duration::ZERO
        }]
    );
    // Raw stays visible until the timer fires.
    assert_eq!(state.stage(), Stage::Complete);
    assert_eq!(state.artifacts().active_kind(), Some(ArtifactKind::Raw));

    let (state, effects) = update(state, Msg::RevealGenerated { run });
    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.stage, Stage::Complete);
    assert_eq!(view.active_html.as_deref(), Some("<html>B</html>"));
    assert_eq!(view.download_filename, "cloned_site_generated.html");
    assert!(view.can_toggle_view());
    assert!(view.can_edit);
}

#[test]
fn selected_model_is_used_for_generate() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::ModelSelected(ModelId::Llama2_13b));
    let (state, _) = submit_url(state, "https://example.com");
    let (_, effects) = scraped(state);

    assert!(matches!(
        effects.as_slice(),
        [Effect::Generate {
            model: ModelId::Llama2_13b,
            ..
        }]
    ));
}

#[test]
fn scrape_failure_stores_message_and_no_artifact() {
    init_logging();
    let (state, _) = submit_url(AppState::new(), "https://example.com");
    let run = state.run();
    let (state, effects) = update(
        state,
        Msg::ScrapeFailed {
            run,
            message: "site unreachable".to_string(),
        },
    );

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.stage, Stage::Error);
    assert_eq!(view.error.as_deref(), Some("site unreachable"));
    assert!(view.available.is_empty());
    assert!(view.transcript.is_empty());
    assert!(view.can_submit_url);
    assert!(!view.can_edit);
}

#[test]
fn generate_failure_keeps_raw_and_leaves_transcript_alone() {
    init_logging();
    let (state, _) = submit_url(AppState::new(), "https://example.com");
    let (state, _) = scraped(state);
    let run = state.run();
    let (state, _) = update(
        state,
        Msg::GenerateFailed {
            run,
            message: "LLM error: quota".to_string(),
        },
    );

    assert_eq!(state.stage(), Stage::Error);
    assert_eq!(state.error(), Some("LLM error: quota"));
    assert_eq!(state.artifacts().active_kind(), Some(ArtifactKind::Raw));
    assert!(state.transcript().is_empty());
    assert!(!state.can_edit());
}

#[test]
fn url_submission_is_ignored_while_busy() {
    init_logging();
    let (state, _) = submit_url(AppState::new(), "https://example.com");
    let run = state.run();

    let (state, effects) = submit_url(state, "https://other.example.com");
    assert!(effects.is_empty());
    assert_eq!(state.run(), run);
    assert_eq!(state.stage(), Stage::Scraping);

    let (state, _) = scraped(state);
    let (state, effects) = submit_url(state, "https://other.example.com");
    assert!(effects.is_empty());
    assert_eq!(state.stage(), Stage::Generating);
}

#[test]
fn resubmitting_resets_session_and_drops_stale_responses() {
    init_logging();
    let (state, _) = submit_url(AppState::new(), "https://example.com");
    let (state, _) = scraped(state);
    let first_run = state.run();
    let (state, _) = update(
        state,
        Msg::GenerateSucceeded {
            run: first_run,
            generated_html: "<html>B</html>".to_string(),
        },
    );

    let (state, effects) = submit_url(state, "https://second.example.com");
    let second_run = state.run();
    assert_ne!(first_run, second_run);
    assert_eq!(
        effects,
        vec![Effect::Scrape {
            run: second_run,
            url: "https://second.example.com".to_string(),
        }]
    );
    assert!(state.artifacts().is_empty());
    assert_eq!(state.raw_html_path(), None);

    // The first run's reveal timer must not touch the new session.
    let (state, _) = update(state, Msg::RevealGenerated { run: first_run });
    assert_eq!(state.artifacts().active_kind(), None);

    // A late scrape answer from the old run is ignored.
    let (state, effects) = update(
        state,
        Msg::ScrapeSucceeded {
            run: first_run,
            raw_html: "<html>old</html>".to_string(),
            raw_html_path: "/tmp/old.html".to_string(),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.stage(), Stage::Scraping);

    let (_, effects) = scraped(state);
    assert_eq!(
        effects,
        vec![Effect::Generate {
            run: second_run,
            raw_html_path: "/tmp/a.html".to_string(),
            model: ModelId::default(),
        }]
    );
}

#[test]
fn error_state_accepts_new_url_and_clears_error() {
    init_logging();
    let (state, _) = submit_url(AppState::new(), "https://example.com");
    let run = state.run();
    let (state, _) = update(
        state,
        Msg::ScrapeFailed {
            run,
            message: "boom".to_string(),
        },
    );
    let (state, effects) = update(state, Msg::UrlSubmitted);

    assert_eq!(effects.len(), 1);
    assert_eq!(state.stage(), Stage::Scraping);
    assert_eq!(state.error(), None);
}

#[test]
fn explicit_view_choice_cancels_pending_reveal() {
    init_logging();
    let (state, _) = submit_url(AppState::new(), "https://example.com");
    let (state, _) = scraped(state);
    let run = state.run();
    let (state, _) = update(
        state,
        Msg::GenerateSucceeded {
            run,
            generated_html: "<html>B</html>".to_string(),
        },
    );
    let (state, _) = update(state, Msg::ViewSelected(ArtifactKind::Generated));
    let (state, _) = update(state, Msg::ViewSelected(ArtifactKind::Raw));
    let (state, _) = update(state, Msg::RevealGenerated { run });

    assert_eq!(state.artifacts().active_kind(), Some(ArtifactKind::Raw));
    assert_eq!(state.view().download_filename, "cloned_site_raw.html");
}

#[test]
fn view_selection_of_missing_artifact_is_ignored() {
    init_logging();
    let (state, _) = submit_url(AppState::new(), "https://example.com");
    let (mut state, _) = scraped(state);
    state.consume_dirty();

    let (mut state, _) = update(state, Msg::ViewSelected(ArtifactKind::Edited));
    assert_eq!(state.artifacts().active_kind(), Some(ArtifactKind::Raw));
    assert!(!state.consume_dirty());
}

#[test]
fn at_most_one_request_stage_at_a_time() {
    init_logging();
    let mut seen = Vec::new();
    let (state, _) = submit_url(AppState::new(), "https://example.com");
    seen.push(state.stage());
    let (state, _) = scraped(state);
    seen.push(state.stage());
    let run = state.run();
    let (state, _) = update(
        state,
        Msg::GenerateSucceeded {
            run,
            generated_html: "<html>B</html>".to_string(),
        },
    );
    seen.push(state.stage());
    let (state, _) = update(state, Msg::RevealGenerated { run });
    let (state, _) = update(state, Msg::EditSubmitted("bigger title".to_string()));
    seen.push(state.stage());

    assert_eq!(
        seen,
        vec![
            Stage::Scraping,
            Stage::Generating,
            Stage::Complete,
            Stage::Editing
        ]
    );
    assert!(seen.iter().all(|stage| stage.is_busy() || *stage == Stage::Complete));
}

#[test]
fn pipeline_entry_looks_up_latest_scrape() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::PipelineEntered);
    assert_eq!(effects, vec![Effect::LookupLatestScraped]);

    let (state, _) = update(
        state,
        Msg::LatestScrapedLoaded(Some("/tmp/latest.html".to_string())),
    );
    assert_eq!(
        state.view().latest_scraped_path.as_deref(),
        Some("/tmp/latest.html")
    );

    let (state, _) = update(state, Msg::LatestScrapedLoaded(None));
    assert_eq!(state.view().latest_scraped_path, None);
    assert_eq!(state.stage(), Stage::Idle);
}

#[test]
fn leaving_pipeline_discards_session() {
    init_logging();
    let (state, _) = submit_url(AppState::new(), "https://example.com");
    let run = state.run();
    let (state, _) = update(state, Msg::PipelineLeft);

    assert_eq!(state.stage(), Stage::Idle);
    assert_eq!(state.url_input(), "");

    let (state, effects) = update(
        state,
        Msg::ScrapeSucceeded {
            run,
            raw_html: "<html>A</html>".to_string(),
            raw_html_path: "/tmp/a.html".to_string(),
        },
    );
    assert!(effects.is_empty());
    assert!(state.artifacts().is_empty());
}

#[test]
fn reentering_after_leave_repeats_latest_lookup() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::PipelineEntered);
    let (state, _) = update(
        state,
        Msg::LatestScrapedLoaded(Some("/data/raw.html".to_string())),
    );
    let (state, _) = update(state, Msg::PipelineLeft);
    assert_eq!(state.view().latest_scraped_path, None);

    let (_, effects) = update(state, Msg::PipelineEntered);
    assert_eq!(effects, vec![Effect::LookupLatestScraped]);
}

#[test]
fn download_uses_derived_filename() {
    init_logging();
    let (state, _) = submit_url(AppState::new(), "https://example.com");
    let (state, _) = scraped(state);
    let (_, effects) = update(state, Msg::DownloadRequested);

    assert_eq!(
        effects,
        vec![Effect::SaveArtifact {
            filename: "cloned_site_raw.html".to_string(),
            content: "<html>A</html>".to_string(),
        }]
    );
}
