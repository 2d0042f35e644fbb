use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

/// Clone a web page, regenerate it with an AI model, then refine it by chat.
#[derive(Debug, Parser)]
#[command(name = "cloner", version)]
pub struct Cli {
    /// URL to clone right away.
    #[arg(long)]
    pub url: Option<String>,

    /// Model used for generate and edit requests.
    #[arg(long, env = "CLONER_MODEL")]
    pub model: Option<String>,

    /// Base URL of the cloning backend.
    #[arg(long, env = "CLONER_BACKEND_URL")]
    pub backend: Option<String>,

    /// RON config file. Defaults to ./cloner.ron when present.
    #[arg(long, env = "CLONER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Where downloads are written.
    #[arg(long)]
    pub download_dir: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub log: Option<LogTarget>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
pub enum LogTarget {
    Off,
    #[default]
    File,
    Terminal,
    Both,
}

impl LogTarget {
    pub fn destination(self) -> Option<cloner_logging::LogDestination> {
        use cloner_logging::LogDestination;
        match self {
            LogTarget::Off => None,
            LogTarget::File => Some(LogDestination::File),
            LogTarget::Terminal => Some(LogDestination::Terminal),
            LogTarget::Both => Some(LogDestination::Both),
        }
    }
}
