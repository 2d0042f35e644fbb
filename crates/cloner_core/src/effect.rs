use std::time::Duration;

use crate::{ModelId, RunId};

/// Work the runtime performs on behalf of [`crate::update`]. Each service effect
/// is answered with exactly one success or failure message for the same run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Scrape {
        run: RunId,
        url: String,
    },
    Generate {
        run: RunId,
        raw_html_path: String,
        model: ModelId,
    },
    Edit {
        run: RunId,
        html_content: String,
        instruction: String,
        model: ModelId,
    },
    /// Deliver `Msg::RevealGenerated { run }` after `delay`.
    ScheduleReveal {
        run: RunId,
        delay: Duration,
    },
    LookupLatestScraped,
    SaveArtifact {
        filename: String,
        content: String,
    },
}
