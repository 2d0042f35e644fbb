use cloner_core::ArtifactKind;

pub const HELP: &str = "\
/clone <url>        scrape and regenerate a page
/model <id>         pick the model for the next requests
/models             list available models
/view <kind>        show the raw, generated or edited page
/preview            print the active page as text
/download           save the active page
/leave              discard this session
/quit               exit
anything else       edit instruction for the active page";

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Clone(String),
    Model(String),
    Models,
    View(String),
    Preview,
    Download,
    Leave,
    Help,
    Quit,
    Edit(String),
    Empty,
    Unknown(String),
    /// Input that could not be decoded as text.
    Invalid,
}

pub fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Command::Empty;
    }
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Command::Edit(line.trim_end_matches(['\r', '\n']).to_string());
    };
    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };
    match name.to_ascii_lowercase().as_str() {
        "clone" => Command::Clone(arg.to_string()),
        "model" => Command::Model(arg.to_string()),
        "models" => Command::Models,
        "view" => Command::View(arg.to_string()),
        "preview" => Command::Preview,
        "download" => Command::Download,
        "leave" => Command::Leave,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => Command::Unknown(name.to_string()),
    }
}

pub fn parse_kind(text: &str) -> Option<ArtifactKind> {
    ArtifactKind::ALL
        .into_iter()
        .find(|kind| kind.label().eq_ignore_ascii_case(text.trim()))
}
