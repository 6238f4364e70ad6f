use serde::{Deserialize, Serialize};

/// A creative format's globally-unique identity: the registry agent that
/// defines it plus its id within that registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FormatId {
    pub agent_url: String,
    pub id: String,
}

impl FormatId {
    /// Expands a legacy bare-string format id against `default_agent_url`,
    /// the registry this deployment treats as canonical when a caller
    /// doesn't qualify the id.
    pub fn expand(raw: &str, default_agent_url: &str) -> Self {
        FormatId {
            agent_url: default_agent_url.to_string(),
            id: raw.to_string(),
        }
    }
}

/// Accepts either the canonical `{agent_url, id}` object or a legacy bare
/// string on input; always serializes as the object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FormatIdInput {
    Legacy(String),
    Canonical(FormatId),
}

impl FormatIdInput {
    pub fn normalize(self, default_agent_url: &str) -> FormatId {
        match self {
            FormatIdInput::Legacy(raw) => FormatId::expand(&raw, default_agent_url),
            FormatIdInput::Canonical(id) => id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatType {
    Display,
    Video,
    Audio,
    Native,
    Dooh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreativeFormat {
    pub format_id: FormatId,
    pub name: String,
    pub format_type: FormatType,
    pub is_standard: bool,
    #[serde(default)]
    pub requirements: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_string_expands_against_default_agent() {
        let input: FormatIdInput = serde_json::from_str("\"display_300x250\"").unwrap();
        let id = input.normalize("https://formats.example.com");
        assert_eq!(id.agent_url, "https://formats.example.com");
        assert_eq!(id.id, "display_300x250");
    }

    #[test]
    fn canonical_object_passes_through() {
        let input: FormatIdInput =
            serde_json::from_str(r#"{"agent_url":"https://x.example.com","id":"v1"}"#).unwrap();
        let id = input.normalize("https://formats.example.com");
        assert_eq!(id.agent_url, "https://x.example.com");
    }
}
