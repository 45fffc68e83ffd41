use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::job::JobRow;

/// Where a saved job sits in the user's pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[default]
    Saved,
    Applied,
    Interviewing,
    Offer,
    Rejected,
    Archived,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Saved => "saved",
            JobStatus::Applied => "applied",
            JobStatus::Interviewing => "interviewing",
            JobStatus::Offer => "offer",
            JobStatus::Rejected => "rejected",
            JobStatus::Archived => "archived",
        }
    }

    /// Applications still in flight.
    pub fn is_active(self) -> bool {
        matches!(
            self,
            JobStatus::Applied | JobStatus::Interviewing | JobStatus::Offer
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "saved" => Ok(JobStatus::Saved),
            "applied" => Ok(JobStatus::Applied),
            "interviewing" => Ok(JobStatus::Interviewing),
            "offer" => Ok(JobStatus::Offer),
            "rejected" => Ok(JobStatus::Rejected),
            "archived" => Ok(JobStatus::Archived),
            other => Err(anyhow::anyhow!("unknown job status '{other}'")),
        }
    }
}

/// A job posting the user (or the agent on their behalf) saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub url: Option<String>,
    /// Board or career page the posting came from; `"manual"` when entered by hand.
    pub source: String,
    pub status: JobStatus,
    /// Fit against the stored profile, 0 – 100. `None` until scored.
    pub match_score: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<JobRow> for Job {
    type Error = anyhow::Error;

    fn try_from(row: JobRow) -> Result<Self, Self::Error> {
        Ok(Job {
            id: row.id,
            status: row.status.parse()?,
            title: row.title,
            company: row.company,
            location: row.location,
            url: row.url,
            source: row.source,
            match_score: row.match_score,
            created_at: row.created_at,
        })
    }
}
