//! Aggregated job listings and their data-quality numbers

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::backend::{Backend, ItemQuery, RequestStatus};
use crate::interview::round1;
use crate::jobs::matching::{rank_jobs, RankedJob};
use crate::jobs::models::{JobPosting, JobSource};
use crate::profile::UserProfile;
use crate::Result;

pub const JOBS_COLLECTION: &str = "jobs";

/// Share of postings carrying each field, as percentages
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QualityMetrics {
    pub total: usize,
    pub with_salary: f64,
    pub with_description: f64,
    pub with_skills: f64,
    pub active: f64,
    pub by_source: BTreeMap<JobSource, usize>,
}

pub struct JobAggregationStore {
    backend: Arc<dyn Backend>,
    jobs: Vec<JobPosting>,
    last_refreshed: Option<DateTime<Utc>>,
    status: RequestStatus,
}

impl JobAggregationStore {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            jobs: Vec::new(),
            last_refreshed: None,
            status: RequestStatus::default(),
        }
    }

    pub fn jobs(&self) -> &[JobPosting] {
        &self.jobs
    }

    pub fn last_refreshed(&self) -> Option<DateTime<Utc>> {
        self.last_refreshed
    }

    pub fn status(&self) -> &RequestStatus {
        &self.status
    }

    /// Reload postings; returns how many were kept
    pub async fn refresh(&mut self, limit: usize) -> Result<usize> {
        self.status.begin();
        let result = self
            .backend
            .get_items(JOBS_COLLECTION, &ItemQuery::all().limit(limit))
            .await;
        let page = self.status.settle(result)?;

        let mut jobs = Vec::with_capacity(page.items.len());
        for item in page.items {
            match serde_json::from_value::<JobPosting>(item) {
                Ok(job) => jobs.push(job),
                Err(e) => warn!("Skipping malformed job posting: {}", e),
            }
        }

        debug!("Loaded {} job postings", jobs.len());
        self.jobs = jobs;
        self.last_refreshed = Some(Utc::now());
        Ok(self.jobs.len())
    }

    pub fn search(&self, text: &str) -> Vec<&JobPosting> {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            return self.jobs.iter().collect();
        }
        self.jobs.iter().filter(|j| j.matches(&needle)).collect()
    }

    /// Loaded active postings ranked by how well they fit `profile`
    pub fn matches_for(&self, profile: &UserProfile) -> Vec<RankedJob<'_>> {
        rank_jobs(profile, &self.jobs)
    }

    pub fn quality_metrics(&self) -> QualityMetrics {
        let total = self.jobs.len();
        if total == 0 {
            return QualityMetrics::default();
        }

        let percent = |pred: fn(&JobPosting) -> bool| {
            round1(self.jobs.iter().filter(|j| pred(j)).count() as f64 / total as f64 * 100.0)
        };

        let mut by_source = BTreeMap::new();
        for job in &self.jobs {
            *by_source.entry(job.source).or_insert(0) += 1;
        }

        QualityMetrics {
            total,
            with_salary: percent(JobPosting::has_salary),
            with_description: percent(JobPosting::has_description),
            with_skills: percent(|j| !j.skills_required.is_empty()),
            active: percent(|j| j.is_active),
            by_source,
        }
    }
}
