//! Derived metrics over a user's saved jobs. Single pass, pure.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::jobs::models::{Job, JobStatus};

/// Scores at or above this count as a strong match.
pub const HIGH_MATCH_THRESHOLD: f64 = 80.0;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub saved: usize,
    pub applied: usize,
    pub interviewing: usize,
    pub offer: usize,
    pub rejected: usize,
    pub archived: usize,
}

impl StatusCounts {
    fn bump(&mut self, status: JobStatus) {
        let slot = match status {
            JobStatus::Saved => &mut self.saved,
            JobStatus::Applied => &mut self.applied,
            JobStatus::Interviewing => &mut self.interviewing,
            JobStatus::Offer => &mut self.offer,
            JobStatus::Rejected => &mut self.rejected,
            JobStatus::Archived => &mut self.archived,
        };
        *slot += 1;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobMetrics {
    pub total: usize,
    pub by_status: StatusCounts,
    /// applied + interviewing + offer
    pub active: usize,
    /// Jobs that carry a match score.
    pub scored: usize,
    /// Mean over scored jobs, one decimal place. `None` when nothing is scored.
    pub average_score: Option<f64>,
    pub top_score: Option<f64>,
    pub high_match: usize,
    /// Distinct companies, compared trimmed and case-insensitively.
    pub unique_companies: usize,
}

pub fn compute_job_metrics(jobs: &[Job]) -> JobMetrics {
    let mut metrics = JobMetrics {
        total: jobs.len(),
        ..JobMetrics::default()
    };
    let mut score_sum = 0.0_f64;
    let mut companies = HashSet::new();

    for job in jobs {
        metrics.by_status.bump(job.status);
        if job.status.is_active() {
            metrics.active += 1;
        }

        if let Some(score) = job.match_score {
            metrics.scored += 1;
            score_sum += score;
            metrics.top_score = Some(metrics.top_score.map_or(score, |top| top.max(score)));
            if score >= HIGH_MATCH_THRESHOLD {
                metrics.high_match += 1;
            }
        }

        let company = job.company.trim().to_lowercase();
        if !company.is_empty() {
            companies.insert(company);
        }
    }

    if metrics.scored > 0 {
        let mean = score_sum / metrics.scored as f64;
        metrics.average_score = Some((mean * 10.0).round() / 10.0);
    }
    metrics.unique_companies = companies.len();
    metrics
}
