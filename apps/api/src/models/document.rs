use serde::{Deserialize, Serialize};

/// Which side of a match a document plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentRole {
    Resume,
    JobDescription,
}

impl std::fmt::Display for DocumentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentRole::Resume => f.write_str("resume"),
            DocumentRole::JobDescription => f.write_str("job_description"),
        }
    }
}

/// Plain text handed over by ingestion, tagged with its role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    role: DocumentRole,
    text: String,
}

impl Document {
    pub fn new(role: DocumentRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }

    pub fn resume(text: impl Into<String>) -> Self {
        Self::new(DocumentRole::Resume, text)
    }

    pub fn job_description(text: impl Into<String>) -> Self {
        Self::new(DocumentRole::JobDescription, text)
    }

    pub fn role(&self) -> DocumentRole {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}
