//! Audit orchestration
//!
//! - [`AuditSession`]: seed and scope to page targets, sequential analysis
//! - [`PageAnalyzer`]: fetch, parse, evaluate one page
//! - [`DuplicateDetector`]: identical visible text across the page set
//! - [`PageState`]: per-page progress machine

mod analyzer;
mod duplicates;
mod session;
mod state;

pub use analyzer::{PageAnalyzer, PageAuditResult, PageOutcome};
pub use duplicates::{
    content_fingerprint, find_collisions, strip_urls, DuplicateDetector, DuplicatePair, SiblingSet,
};
pub use session::{discover_targets, AuditSession, Scope, SessionReport};
pub use state::PageState;
