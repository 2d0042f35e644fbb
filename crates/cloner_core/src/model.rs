use std::fmt;
use std::str::FromStr;

/// Generation/edit models the backend accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ModelId {
    #[default]
    Gemini25ProPreview,
    Llama2_13b,
}

impl ModelId {
    pub const ALL: [ModelId; 2] = [ModelId::Gemini25ProPreview, ModelId::Llama2_13b];

    /// Identifier sent in the `model` request field.
    pub fn as_str(self) -> &'static str {
        match self {
            ModelId::Gemini25ProPreview => "gemini-2.5-pro-preview-05-06",
            ModelId::Llama2_13b => "meta-llama/Llama-2-13b",
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown model '{0}'")]
pub struct UnknownModel(pub String);

impl FromStr for ModelId {
    type Err = UnknownModel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ModelId::ALL
            .into_iter()
            .find(|model| model.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownModel(wanted.to_string()))
    }
}
