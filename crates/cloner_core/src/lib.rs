//! Cloner core: pure clone/generate/edit pipeline controller.
mod artifact;
mod effect;
mod input;
mod model;
mod msg;
mod state;
mod transcript;
mod update;
mod view_model;

pub use artifact::{
    derive_filename, Artifact, ArtifactKind, ArtifactStore, DEFAULT_FILENAME, EDITED_FILENAME,
    GENERATED_FILENAME, RAW_FILENAME,
};
pub use effect::Effect;
pub use input::{validate_instruction, validate_url, InputError};
pub use model::{ModelId, UnknownModel};
pub use msg::Msg;
pub use state::{AppState, RunId, Stage, DEFAULT_REVEAL_DELAY};
pub use transcript::{edit_failed_message, ChatMessage, Sender, Transcript, EDIT_APPLIED_MESSAGE};
pub use update::update;
pub use view_model::AppViewModel;
