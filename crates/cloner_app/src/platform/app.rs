use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use clap::Parser;
use cloner_core::{
    update, validate_instruction, validate_url, AppState, AppViewModel, ModelId, Msg,
};
use cloner_engine::{render_preview, ArtifactWriter};
use cloner_logging::{cloner_info, cloner_warn, LevelFilter};

use super::cli::Cli;
use super::config::{AppConfig, Settings};
use super::effects::{EffectRunner, Notice};
use super::ui::commands::{parse_command, parse_kind, Command, HELP};
use super::ui::render::{preview_lines, Renderer};

/// Everything the main loop reacts to, in arrival order.
pub enum AppEvent {
    Msg(Msg),
    Command(Command),
    InputClosed,
}

pub fn run_app() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;
    let settings = Settings::resolve(config, &cli)?;

    if let Some(destination) = settings.log.destination() {
        cloner_logging::initialize(destination, LevelFilter::Info, &settings.log_file);
    }
    cloner_info!(
        "cloner starting backend={} model={}",
        settings.service.base_url,
        settings.model
    );

    let (app_tx, app_rx) = mpsc::channel::<AppEvent>();
    let runner = EffectRunner::new(
        settings.service.clone(),
        ArtifactWriter::new(settings.download_dir.clone()),
        app_tx.clone(),
    )
    .context("starting service engine")?;
    spawn_input_reader(app_tx)?;

    let mut shell = Shell {
        state: AppState::with_reveal_delay(settings.reveal_delay),
        runner,
        renderer: Renderer::default(),
        out: io::stdout(),
        input_closed: false,
    };
    shell.dispatch(Msg::ModelSelected(settings.model));
    shell.dispatch(Msg::PipelineEntered);
    if let Some(url) = settings.initial_url {
        shell.handle_command(Command::Clone(url));
    }

    for event in app_rx {
        let flow = match event {
            AppEvent::Msg(msg) => {
                shell.dispatch(msg);
                Flow::Continue
            }
            AppEvent::Command(command) => shell.handle_command(command),
            AppEvent::InputClosed => {
                shell.input_closed = true;
                Flow::Continue
            }
        };
        if flow == Flow::Quit || shell.finished() {
            break;
        }
    }

    cloner_info!("cloner exiting");
    Ok(())
}

/// What a command turns into once checked against the current view.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Action {
    Dispatch(Vec<Msg>),
    Say(Vec<String>),
    Quit,
}

fn say(line: impl Into<String>) -> Action {
    Action::Say(vec![line.into()])
}

/// Validates input and gates it on the pipeline state before anything reaches `update`.
fn plan_command(command: Command, view: &AppViewModel) -> Action {
    match command {
        Command::Clone(url) => {
            if !view.can_submit_url {
                say("busy: wait for the current request to finish")
            } else if let Err(err) = validate_url(&url) {
                say(err.to_string())
            } else {
                Action::Dispatch(vec![Msg::UrlInputChanged(url), Msg::UrlSubmitted])
            }
        }
        Command::Model(text) => match text.parse::<ModelId>() {
            Ok(model) => Action::Dispatch(vec![Msg::ModelSelected(model)]),
            Err(err) => say(err.to_string()),
        },
        Command::Models => Action::Say(
            ModelId::ALL
                .into_iter()
                .map(|model| {
                    let marker = if model == view.model { "*" } else { " " };
                    format!("{marker} {model}")
                })
                .collect(),
        ),
        Command::View(text) => match parse_kind(&text) {
            Some(kind) if view.available.contains(&kind) => {
                Action::Dispatch(vec![Msg::ViewSelected(kind)])
            }
            Some(kind) => say(format!("no {} page yet", kind.label())),
            None => say("usage: /view raw|generated|edited"),
        },
        Command::Preview => match (view.active_kind, view.active_html.as_deref()) {
            (Some(kind), Some(html)) => Action::Say(preview_lines(kind, &render_preview(html))),
            _ => say("nothing to preview yet"),
        },
        Command::Download => {
            if view.active_kind.is_none() {
                say("nothing to download yet")
            } else {
                Action::Dispatch(vec![Msg::DownloadRequested])
            }
        }
        // A fresh session repeats the latest-scraped lookup.
        Command::Leave => Action::Dispatch(vec![Msg::PipelineLeft, Msg::PipelineEntered]),
        Command::Help => say(HELP),
        Command::Quit => Action::Quit,
        Command::Edit(text) => {
            if let Err(err) = validate_instruction(&text) {
                say(err.to_string())
            } else if view.edit_in_flight {
                say("an edit is already in progress")
            } else if !view.can_edit {
                say("nothing to edit yet: /clone <url> first")
            } else {
                Action::Dispatch(vec![Msg::EditSubmitted(text)])
            }
        }
        Command::Empty => Action::Say(Vec::new()),
        Command::Unknown(name) => say(format!("unknown command /{name}, try /help")),
        Command::Invalid => say("ignored a line that is not valid UTF-8"),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

struct Shell {
    state: AppState,
    runner: EffectRunner,
    renderer: Renderer,
    out: io::Stdout,
    input_closed: bool,
}

impl Shell {
    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        let view = state.view();
        self.state = state;

        let notices = self.runner.run(effects);
        if was_dirty {
            self.render(&view);
        }
        for notice in notices {
            match notice {
                Notice::Saved(path) => self.say(format!("saved {}", path.display())),
                Notice::SaveFailed(err) => self.say(format!("download failed: {err}")),
            }
        }
    }

    fn handle_command(&mut self, command: Command) -> Flow {
        match plan_command(command, &self.state.view()) {
            Action::Dispatch(msgs) => {
                for msg in msgs {
                    self.dispatch(msg);
                }
            }
            Action::Say(lines) => {
                for line in lines {
                    self.say(line);
                }
            }
            Action::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    /// Stdin is gone and no request is outstanding.
    fn finished(&self) -> bool {
        self.input_closed && !self.state.stage().is_busy()
    }

    fn render(&mut self, view: &AppViewModel) {
        for line in self.renderer.render(view) {
            self.say(line);
        }
    }

    fn say(&mut self, line: impl AsRef<str>) {
        if let Err(err) = writeln!(self.out, "{}", line.as_ref()) {
            cloner_warn!("stdout write failed: {}", err);
        }
    }
}

/// Lines that are not UTF-8 become [`Command::Invalid`] instead of ending input.
fn decode_line(bytes: &[u8]) -> Command {
    match std::str::from_utf8(bytes) {
        Ok(line) => parse_command(line),
        Err(err) => {
            cloner_warn!("ignoring stdin line that is not UTF-8: {}", err);
            Command::Invalid
        }
    }
}

fn spawn_input_reader(app_tx: mpsc::Sender<AppEvent>) -> io::Result<()> {
    thread::Builder::new()
        .name("cloner-input".to_string())
        .spawn(move || {
            let mut stdin = io::stdin().lock();
            let mut buf = Vec::new();
            loop {
                buf.clear();
                match stdin.read_until(b'\n', &mut buf) {
                    Ok(0) => break,
                    Ok(_) => {}
                    Err(err) => {
                        cloner_warn!("stdin read failed: {}", err);
                        break;
                    }
                }
                if app_tx.send(AppEvent::Command(decode_line(&buf))).is_err() {
                    return;
                }
            }
            let _ = app_tx.send(AppEvent::InputClosed);
        })?;
    Ok(())
}
