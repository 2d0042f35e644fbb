//! Cloner engine: service client, effect execution, and artifact IO.
mod client;
mod engine;
mod persist;
mod preview;
mod types;
mod wire;

pub use client::{ClonerService, ReqwestService, Routes, ServiceSettings};
pub use engine::EngineHandle;
pub use persist::{ensure_output_dir, ArtifactWriter, PersistError};
pub use preview::{render_preview, HtmlPreview, MAX_PREVIEW_CONTENT};
pub use types::{EngineEvent, FailureKind, RunId, ScrapeOutput, ServiceError};
pub use wire::{error_message, UNKNOWN_ERROR};
