use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use cloner_core::{Effect, Msg};
use cloner_engine::{ArtifactWriter, EngineEvent, EngineHandle, ServiceSettings};
use cloner_logging::{cloner_error, cloner_info};

use super::app::AppEvent;

/// Outcome of an effect that finishes synchronously and the user should see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Saved(PathBuf),
    SaveFailed(String),
}

pub struct EffectRunner {
    engine: EngineHandle,
    writer: ArtifactWriter,
}

impl EffectRunner {
    pub fn new(
        settings: ServiceSettings,
        writer: ArtifactWriter,
        app_tx: mpsc::Sender<AppEvent>,
    ) -> std::io::Result<Self> {
        let (event_tx, event_rx) = mpsc::channel();
        let engine = EngineHandle::with_settings(settings, event_tx)?;
        spawn_event_loop(event_rx, app_tx)?;
        Ok(Self { engine, writer })
    }

    pub fn run(&self, effects: Vec<Effect>) -> Vec<Notice> {
        let mut notices = Vec::new();
        for effect in effects {
            match effect {
                Effect::Scrape { run, url } => self.engine.scrape(run, url),
                Effect::Generate {
                    run,
                    raw_html_path,
                    model,
                } => self.engine.generate(run, raw_html_path, model.as_str()),
                Effect::Edit {
                    run,
                    html_content,
                    instruction,
                    model,
                } => self
                    .engine
                    .edit(run, html_content, instruction, model.as_str()),
                Effect::ScheduleReveal { run, delay } => self.engine.schedule_reveal(run, delay),
                Effect::LookupLatestScraped => self.engine.lookup_latest_scraped(),
                Effect::SaveArtifact { filename, content } => {
                    match self.writer.save(&filename, &content) {
                        Ok(path) => {
                            cloner_info!("Saved {} bytes to {:?}", content.len(), path);
                            notices.push(Notice::Saved(path));
                        }
                        Err(err) => {
                            cloner_error!("Failed to save {}: {}", filename, err);
                            notices.push(Notice::SaveFailed(err.to_string()));
                        }
                    }
                }
            }
        }
        notices
    }
}

fn spawn_event_loop(
    event_rx: mpsc::Receiver<EngineEvent>,
    app_tx: mpsc::Sender<AppEvent>,
) -> std::io::Result<()> {
    thread::Builder::new()
        .name("cloner-events".to_string())
        .spawn(move || {
            while let Ok(event) = event_rx.recv() {
                if app_tx.send(AppEvent::Msg(map_event(event))).is_err() {
                    break;
                }
            }
        })?;
    Ok(())
}

pub(crate) fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Scraped { run, result } => match result {
            Ok(output) => Msg::ScrapeSucceeded {
                run,
                raw_html: output.raw_html,
                raw_html_path: output.raw_html_path,
            },
            Err(err) => Msg::ScrapeFailed {
                run,
                message: err.message,
            },
        },
        EngineEvent::Generated { run, result } => match result {
            Ok(generated_html) => Msg::GenerateSucceeded {
                run,
                generated_html,
            },
            Err(err) => Msg::GenerateFailed {
                run,
                message: err.message,
            },
        },
        EngineEvent::Edited { run, result } => match result {
            Ok(edited_html) => Msg::EditSucceeded { run, edited_html },
            Err(err) => Msg::EditFailed {
                run,
                message: err.message,
            },
        },
        // Lookup failures are informational only.
        EngineEvent::LatestScraped(result) => Msg::LatestScrapedLoaded(result.ok().flatten()),
        EngineEvent::RevealDue { run } => Msg::RevealGenerated { run },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloner_engine::{FailureKind, ScrapeOutput, ServiceError};

    #[test]
    fn service_failures_keep_their_message() {
        let msg = map_event(EngineEvent::Scraped {
            run: 4,
            result: Err(ServiceError {
                kind: FailureKind::HttpStatus(400),
                message: "site unreachable".to_string(),
            }),
        });
        assert_eq!(
            msg,
            Msg::ScrapeFailed {
                run: 4,
                message: "site unreachable".to_string()
            }
        );
    }

    #[test]
    fn scrape_output_maps_to_success() {
        let msg = map_event(EngineEvent::Scraped {
            run: 1,
            result: Ok(ScrapeOutput {
                raw_html: "<html>A</html>".to_string(),
                raw_html_path: "/tmp/a.html".to_string(),
            }),
        });
        assert!(matches!(msg, Msg::ScrapeSucceeded { run: 1, .. }));
    }

    #[test]
    fn failed_lookup_is_treated_as_no_path() {
        let msg = map_event(EngineEvent::LatestScraped(Err(ServiceError {
            kind: FailureKind::Network,
            message: "connection refused".to_string(),
        })));
        assert_eq!(msg, Msg::LatestScrapedLoaded(None));
    }

    #[test]
    fn reveal_maps_to_message() {
        assert_eq!(
            map_event(EngineEvent::RevealDue { run: 2 }),
            Msg::RevealGenerated { run: 2 }
        );
    }
}
