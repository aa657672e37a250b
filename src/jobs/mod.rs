//! Job aggregation

mod matching;
mod models;
mod store;

pub use matching::{rank_jobs, skill_match, RankedJob, SkillMatch};
pub use models::{JobPosting, JobSource, JobType};
pub use store::{JobAggregationStore, QualityMetrics, JOBS_COLLECTION};
