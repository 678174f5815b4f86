use serde::{Deserialize, Deserializer, Serialize};

/// What sort of item a memory was ingested from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MemoryKind {
    #[default]
    Text,
    Document,
    Image,
    Email,
    Spreadsheet,
    Audio,
    Video,
    Other,
}

impl MemoryKind {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "text" | "note" => Self::Text,
            "document" | "pdf" => Self::Document,
            "image" | "photo" => Self::Image,
            "email" => Self::Email,
            "spreadsheet" => Self::Spreadsheet,
            "audio" => Self::Audio,
            "video" => Self::Video,
            _ => Self::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Document => "document",
            Self::Image => "image",
            Self::Email => "email",
            Self::Spreadsheet => "spreadsheet",
            Self::Audio => "audio",
            Self::Video => "video",
            Self::Other => "other",
        }
    }
}

impl<'de> Deserialize<'de> for MemoryKind {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(d)?;
        Ok(value.as_str().map(Self::parse).unwrap_or(Self::Other))
    }
}
