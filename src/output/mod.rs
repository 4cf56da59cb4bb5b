//! Output module for building the audit report
//!
//! This module handles:
//! - Rendering one HTML document per completed page
//! - Computing the general information block
//! - Merging page documents into one combined, severity-sorted report
//! - Writing the report (and optionally the page documents) to disk

mod escape;
mod merge;
mod page;
mod summary;

pub use escape::escape_html;
pub use merge::merge_reports;
pub use page::render_page_report;
pub use summary::GeneralInfo;

use crate::audit::SessionReport;
use crate::config::OutputConfig;
use crate::digest::report_file_name;
use crate::AuditError;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Rendered document of one page
#[derive(Debug, Clone)]
pub struct PageReport {
    pub url: String,
    pub html: String,
}

/// Everything produced for one session
#[derive(Debug, Clone)]
pub struct CombinedReport {
    pub general_info: GeneralInfo,
    pub pages: Vec<PageReport>,
    pub html: String,
}

/// Renders and merges the completed pages of a session
///
/// # Returns
///
/// * `Ok(CombinedReport)` - At least one page completed
/// * `Err(AuditError::NothingToReport)` - Every page failed
pub fn build_report(session: &SessionReport) -> Result<CombinedReport, AuditError> {
    let completed: Vec<_> = session.completed().collect();
    if completed.is_empty() {
        return Err(AuditError::NothingToReport);
    }

    let general_info = GeneralInfo::from_results(&completed);

    let pages: Vec<PageReport> = completed
        .iter()
        .map(|result| PageReport {
            url: result.url.clone(),
            html: render_page_report(result),
        })
        .collect();

    let documents: Vec<String> = pages.iter().map(|page| page.html.clone()).collect();
    let html = merge_reports(&documents, &general_info.render());

    Ok(CombinedReport {
        general_info,
        pages,
        html,
    })
}

/// Writes the combined report, plus page documents when configured
///
/// Page documents are named `report_<sha256 of url>.html` and placed next to
/// the combined report.
pub fn write_report(report: &CombinedReport, config: &OutputConfig) -> Result<PathBuf, AuditError> {
    let path = PathBuf::from(&config.report_path);
    write_file(&path, &report.html)?;
    info!("Combined report written to {}", path.display());

    if config.keep_page_reports {
        let dir = path.parent().unwrap_or_else(|| Path::new(""));
        for page in &report.pages {
            let page_path = dir.join(report_file_name(&page.url));
            write_file(&page_path, &page.html)?;
            debug!("Page report for {} written to {}", page.url, page_path.display());
        }
    }

    Ok(path)
}

fn write_file(path: &Path, contents: &str) -> Result<(), AuditError> {
    let mut file = File::create(path)?;
    file.write_all(contents.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{PageAuditResult, PageOutcome};
    use crate::rules::accessibility::AriaCounts;
    use crate::rules::{Category, Finding, FindingSet};
    use std::time::Duration;
    use tempfile::TempDir;
    use url::Url;

    fn completed(url: &str) -> PageOutcome {
        PageOutcome::Completed(PageAuditResult {
            url: url.to_string(),
            title: Some("Home".to_string()),
            meta_description: None,
            findings: vec![Finding::new(Category::EmptyButtons, "<button></button>")]
                .into_iter()
                .collect::<FindingSet>(),
            seo_summary: Vec::new(),
            heading_outline: Vec::new(),
            heading_hierarchy_ok: true,
            sitemap_url: None,
            robots_url: "https://e.com/robots.txt".to_string(),
            aria_counts: AriaCounts::default(),
            load_time: Duration::from_millis(5),
            internal_links: 0,
            external_links: 0,
            server: None,
            google_analytics: false,
        })
    }

    fn session(outcomes: Vec<PageOutcome>) -> SessionReport {
        let seed = Url::parse("https://e.com/").unwrap();
        SessionReport {
            targets: vec![seed.clone()],
            seed,
            outcomes,
        }
    }

    #[test]
    fn test_failed_pages_are_skipped() {
        let report = build_report(&session(vec![
            completed("https://e.com/"),
            PageOutcome::Failed {
                url: "https://e.com/gone".to_string(),
                reason: "HTTP status 500".to_string(),
            },
        ]))
        .unwrap();

        assert_eq!(report.pages.len(), 1);
        assert_eq!(report.general_info.total_urls, 1);
        assert!(!report.html.contains("https://e.com/gone"));
    }

    #[test]
    fn test_nothing_to_report() {
        let result = build_report(&session(vec![PageOutcome::Failed {
            url: "https://e.com/".to_string(),
            reason: "unreachable".to_string(),
        }]));
        assert!(matches!(result, Err(AuditError::NothingToReport)));
    }

    #[test]
    fn test_write_report_with_page_documents() {
        let dir = TempDir::new().unwrap();
        let config = OutputConfig {
            report_path: dir.path().join("combined.html").display().to_string(),
            keep_page_reports: true,
        };
        let report = build_report(&session(vec![completed("https://e.com/")])).unwrap();

        let path = write_report(&report, &config).unwrap();
        assert!(std::fs::read_to_string(path).unwrap().contains("General information"));
        assert!(dir.path().join(report_file_name("https://e.com/")).exists());
    }
}
