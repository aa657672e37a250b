//! Offline resume review
//!
//! Parsing and ATS-style scoring that work without any backend.

mod analyzer;
mod parser;

pub use analyzer::{AtsAnalysis, JobFit, ResumeAnalyzer, SectionQuality, SectionReport};
pub use parser::{ContactInfo, ExperienceEntry, ParsedResume, ResumeParser};
