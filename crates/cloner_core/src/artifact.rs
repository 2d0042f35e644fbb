use crate::Stage;

/// Provenance of an HTML document held by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Raw,
    Generated,
    Edited,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 3] = [
        ArtifactKind::Raw,
        ArtifactKind::Generated,
        ArtifactKind::Edited,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ArtifactKind::Raw => "raw",
            ArtifactKind::Generated => "generated",
            ArtifactKind::Edited => "edited",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub content: String,
}

/// Holds at most one artifact per kind plus the active reference.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArtifactStore {
    raw: Option<String>,
    generated: Option<String>,
    edited: Option<String>,
    active: Option<ArtifactKind>,
}

impl ArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the artifact of `kind`.
    ///
    /// The active reference follows the new artifact when nothing is active yet
    /// or when the replaced kind is the active one.
    pub fn set_artifact(&mut self, kind: ArtifactKind, content: impl Into<String>) {
        *self.slot_mut(kind) = Some(content.into());
        // Replacing the active kind leaves the reference pointing at the new content.
        if self.active.is_none() {
            self.active = Some(kind);
        }
    }

    /// Switches the active reference. No-op when no artifact of `kind` exists.
    pub fn set_active(&mut self, kind: ArtifactKind) -> bool {
        if self.contains(kind) {
            self.active = Some(kind);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, kind: ArtifactKind) -> bool {
        self.slot(kind).is_some()
    }

    pub fn get(&self, kind: ArtifactKind) -> Option<&str> {
        self.slot(kind).as_deref()
    }

    pub fn active_kind(&self) -> Option<ArtifactKind> {
        self.active
    }

    /// Content of the active artifact, if any.
    pub fn active(&self) -> Option<&str> {
        self.active.and_then(|kind| self.get(kind))
    }

    pub fn active_artifact(&self) -> Option<Artifact> {
        let kind = self.active?;
        self.get(kind).map(|content| Artifact {
            kind,
            content: content.to_string(),
        })
    }

    /// Kinds currently held, in raw/generated/edited order.
    pub fn available(&self) -> Vec<ArtifactKind> {
        ArtifactKind::ALL
            .into_iter()
            .filter(|kind| self.contains(*kind))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_none() && self.generated.is_none() && self.edited.is_none()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn slot(&self, kind: ArtifactKind) -> &Option<String> {
        match kind {
            ArtifactKind::Raw => &self.raw,
            ArtifactKind::Generated => &self.generated,
            ArtifactKind::Edited => &self.edited,
        }
    }

    fn slot_mut(&mut self, kind: ArtifactKind) -> &mut Option<String> {
        match kind {
            ArtifactKind::Raw => &mut self.raw,
            ArtifactKind::Generated => &mut self.generated,
            ArtifactKind::Edited => &mut self.edited,
        }
    }
}

pub const DEFAULT_FILENAME: &str = "cloned_site.html";
pub const RAW_FILENAME: &str = "cloned_site_raw.html";
pub const GENERATED_FILENAME: &str = "cloned_site_generated.html";
pub const EDITED_FILENAME: &str = "cloned_site_edited.html";

/// Download name for the active artifact. Pure in `(stage, active)`.
pub fn derive_filename(stage: Stage, active: Option<ArtifactKind>) -> &'static str {
    match (stage, active) {
        (Stage::Complete, Some(ArtifactKind::Generated)) => GENERATED_FILENAME,
        (_, Some(ArtifactKind::Raw)) => RAW_FILENAME,
        (_, Some(ArtifactKind::Edited)) => EDITED_FILENAME,
        _ => DEFAULT_FILENAME,
    }
}
