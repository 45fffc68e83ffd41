use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::resume::sections::{ResumeSection, SectionMap};

/// Declared structure of a stored résumé. Does not affect section matching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResumeFormat {
    Markdown,
    #[default]
    Text,
}

impl ResumeFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ResumeFormat::Markdown => "markdown",
            ResumeFormat::Text => "text",
        }
    }

    /// File extension used for the stored object.
    pub fn extension(self) -> &'static str {
        match self {
            ResumeFormat::Markdown => "md",
            ResumeFormat::Text => "txt",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ResumeFormat::Markdown => "text/markdown; charset=utf-8",
            ResumeFormat::Text => "text/plain; charset=utf-8",
        }
    }
}

impl fmt::Display for ResumeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResumeFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "markdown" => Ok(ResumeFormat::Markdown),
            "text" => Ok(ResumeFormat::Text),
            other => Err(anyhow::anyhow!("unknown resume format '{other}'")),
        }
    }
}

/// A stored résumé. `content` is authoritative; `sections` is a derived view
/// computed at construction and only refreshed by an explicit re-derive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeDocument {
    pub id: Uuid,
    pub name: String,
    pub content: String,
    pub format: ResumeFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<SectionMap>,
    /// RFC 3339 UTC instant, millisecond precision (`2026-10-19T10:00:00.000Z`).
    pub created_at: String,
}

/// Listing view of a stored résumé, without the content body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeSummary {
    pub id: Uuid,
    pub name: String,
    pub format: ResumeFormat,
    pub size_bytes: i64,
    /// Human-readable size, e.g. `"12.4 KB"`.
    pub size: String,
    pub sections_found: Vec<ResumeSection>,
    pub created_at: String,
}
