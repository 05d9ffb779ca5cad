//! Model value object representing a hosted completion model

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Models offered in the model picker (Value Object)
///
/// Each variant maps a human-readable name to the identifier the
/// completion provider expects. Anything else is carried as `Custom`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    Nemotron70b,
    YiLarge,
    Mixtral8x22b,
    Llama3_70b,
    MistralLarge2,
    Codellama70b,
    Llama3ChatQa70b,
    Custom(String),
}

impl Model {
    /// Get the provider identifier for this model
    pub fn as_str(&self) -> &str {
        match self {
            Model::Nemotron70b => "nvidia/llama-3.1-nemotron-70b-instruct",
            Model::YiLarge => "01-ai/yi-large",
            Model::Mixtral8x22b => "mistralai/mixtral-8x22b-instruct",
            Model::Llama3_70b => "meta/llama3-70b",
            Model::MistralLarge2 => "mistralai/mistral-large-2-instruct",
            Model::Codellama70b => "meta/codellama-70b",
            Model::Llama3ChatQa70b => "nvidia/llama3-chatqa-1.5-70b",
            Model::Custom(s) => s,
        }
    }

    /// Name shown in the model picker
    pub fn display_name(&self) -> &str {
        match self {
            Model::Nemotron70b => "Nemotron 3.1 70B",
            Model::YiLarge => "Yi Large",
            Model::Mixtral8x22b => "Mixtral 8x22B",
            Model::Llama3_70b => "Llama3 70B",
            Model::MistralLarge2 => "Mistral Large 2",
            Model::Codellama70b => "Codellama 70B",
            Model::Llama3ChatQa70b => "Llama3 ChatQA 70B",
            Model::Custom(s) => s,
        }
    }

    /// The fixed catalog, in picker order
    pub fn catalog() -> Vec<Model> {
        vec![
            Model::Nemotron70b,
            Model::YiLarge,
            Model::Mixtral8x22b,
            Model::Llama3_70b,
            Model::MistralLarge2,
            Model::Codellama70b,
            Model::Llama3ChatQa70b,
        ]
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Model::Custom(_))
    }
}

impl Default for Model {
    /// The first entry of the picker
    fn default() -> Self {
        Model::Nemotron70b
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Model {
    type Err = std::convert::Infallible;

    /// Accepts a provider id or a display name (case-insensitive).
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let needle = s.trim();
        let found = Model::catalog().into_iter().find(|m| {
            m.as_str().eq_ignore_ascii_case(needle) || m.display_name().eq_ignore_ascii_case(needle)
        });
        Ok(found.unwrap_or_else(|| Model::Custom(needle.to_string())))
    }
}

impl Serialize for Model {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        // Infallible
        Ok(s.parse().unwrap_or_default())
    }
}
