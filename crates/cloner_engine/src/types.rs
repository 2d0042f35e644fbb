use std::fmt;

pub type RunId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeOutput {
    pub raw_html: String,
    /// Backend-side location of the scraped page; input to generate.
    pub raw_html_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Scraped {
        run: RunId,
        result: Result<ScrapeOutput, ServiceError>,
    },
    Generated {
        run: RunId,
        result: Result<String, ServiceError>,
    },
    Edited {
        run: RunId,
        result: Result<String, ServiceError>,
    },
    LatestScraped(Result<Option<String>, ServiceError>),
    RevealDue {
        run: RunId,
    },
}

/// A failed service call. `message` is what the user sees.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ServiceError {
    pub kind: FailureKind,
    pub message: String,
}

impl ServiceError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    Decode,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "undecodable response"),
        }
    }
}
