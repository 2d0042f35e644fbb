use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use cloner_logging::{cloner_debug, cloner_info, cloner_warn};

use crate::client::{ClonerService, ReqwestService, ServiceSettings};
use crate::{EngineEvent, RunId};

enum EngineCommand {
    Scrape {
        run: RunId,
        url: String,
    },
    Generate {
        run: RunId,
        raw_html_path: String,
        model: String,
    },
    Edit {
        run: RunId,
        html_content: String,
        instruction: String,
        model: String,
    },
    LookupLatestScraped,
    Reveal {
        run: RunId,
        delay: Duration,
    },
}

/// Executes service calls and timers on a background tokio runtime.
///
/// Every command produces exactly one [`EngineEvent`] on the channel given at
/// construction. Calls are never cancelled once issued.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(
        service: Arc<dyn ClonerService>,
        event_tx: mpsc::Sender<EngineEvent>,
    ) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;

        thread::Builder::new()
            .name("cloner-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let service = service.clone();
                    let event_tx = event_tx.clone();
                    runtime.spawn(async move {
                        handle_command(service.as_ref(), command, event_tx).await;
                    });
                }
                cloner_debug!("engine command channel closed");
            })?;

        Ok(Self { cmd_tx })
    }

    /// Engine backed by the HTTP client.
    pub fn with_settings(
        settings: ServiceSettings,
        event_tx: mpsc::Sender<EngineEvent>,
    ) -> io::Result<Self> {
        let service = ReqwestService::new(settings).map_err(io::Error::other)?;
        Self::new(Arc::new(service), event_tx)
    }

    pub fn scrape(&self, run: RunId, url: impl Into<String>) {
        self.send(EngineCommand::Scrape {
            run,
            url: url.into(),
        });
    }

    pub fn generate(&self, run: RunId, raw_html_path: impl Into<String>, model: impl Into<String>) {
        self.send(EngineCommand::Generate {
            run,
            raw_html_path: raw_html_path.into(),
            model: model.into(),
        });
    }

    pub fn edit(
        &self,
        run: RunId,
        html_content: impl Into<String>,
        instruction: impl Into<String>,
        model: impl Into<String>,
    ) {
        self.send(EngineCommand::Edit {
            run,
            html_content: html_content.into(),
            instruction: instruction.into(),
            model: model.into(),
        });
    }

    pub fn lookup_latest_scraped(&self) {
        self.send(EngineCommand::LookupLatestScraped);
    }

    /// Emits [`EngineEvent::RevealDue`] for `run` after `delay`.
    pub fn schedule_reveal(&self, run: RunId, delay: Duration) {
        self.send(EngineCommand::Reveal { run, delay });
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            cloner_warn!("engine worker is gone; command dropped");
        }
    }
}

async fn handle_command(
    service: &dyn ClonerService,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::Scrape { run, url } => {
            cloner_info!("run={} scrape url={}", run, url);
            let result = service.scrape(&url).await;
            log_outcome(run, "scrape", result.as_ref().map(|out| out.raw_html.len()));
            EngineEvent::Scraped { run, result }
        }
        EngineCommand::Generate {
            run,
            raw_html_path,
            model,
        } => {
            cloner_info!(
                "run={} generate raw_html_path={} model={}",
                run,
                raw_html_path,
                model
            );
            let result = service.generate(&raw_html_path, &model).await;
            log_outcome(run, "generate", result.as_ref().map(String::len));
            EngineEvent::Generated { run, result }
        }
        EngineCommand::Edit {
            run,
            html_content,
            instruction,
            model,
        } => {
            cloner_info!(
                "run={} edit html_len={} instruction_len={} model={}",
                run,
                html_content.len(),
                instruction.len(),
                model
            );
            let result = service.edit(&html_content, &instruction, &model).await;
            log_outcome(run, "edit", result.as_ref().map(String::len));
            EngineEvent::Edited { run, result }
        }
        EngineCommand::LookupLatestScraped => {
            let result = service.latest_scraped().await;
            if let Err(err) = &result {
                cloner_warn!("latest scraped lookup failed ({}): {}", err.kind, err.message);
            }
            EngineEvent::LatestScraped(result)
        }
        EngineCommand::Reveal { run, delay } => {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            EngineEvent::RevealDue { run }
        }
    };
    let _ = event_tx.send(event);
}

fn log_outcome(run: RunId, call: &str, outcome: Result<usize, &crate::ServiceError>) {
    match outcome {
        Ok(len) => cloner_info!("run={} {} ok bytes={}", run, call, len),
        Err(err) => cloner_warn!("run={} {} failed ({}): {}", run, call, err.kind, err.message),
    }
}
