//! General information block of the combined report

use crate::audit::PageAuditResult;
use crate::rules::{Category, Severity};
use chrono::Local;

/// Site-wide figures computed from the completed pages
#[derive(Debug, Clone, PartialEq)]
pub struct GeneralInfo {
    pub generated_at: String,
    pub host_os: String,
    pub server: String,
    pub title: String,
    pub meta_description: String,
    pub sitemap_url: String,
    pub robots_url: String,
    pub google_analytics: bool,
    pub total_urls: usize,
    pub aria_elements: usize,
    pub role_elements: usize,
    pub pages_missing_title_or_description: usize,
    /// Non-zero finding totals per category, in category order
    pub category_totals: Vec<(Category, usize)>,
}

impl GeneralInfo {
    /// Aggregates completed page results
    ///
    /// Page-level details (server, title, sitemap, ...) come from the first
    /// result; counts cover every result. `good` categories are not totalled.
    pub fn from_results(results: &[&PageAuditResult]) -> Self {
        let first = results.first();

        let category_totals = Category::ALL
            .iter()
            .filter(|category| category.severity() != Severity::Good)
            .map(|&category| {
                let total = results.iter().map(|r| r.findings.count(category)).sum();
                (category, total)
            })
            .filter(|&(_, total)| total > 0)
            .collect();

        Self {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            host_os: std::env::consts::OS.to_string(),
            server: first
                .and_then(|r| r.server.clone())
                .unwrap_or_else(|| "Unknown".to_string()),
            title: first
                .and_then(|r| r.title.clone())
                .unwrap_or_else(|| "No title found".to_string()),
            meta_description: first
                .and_then(|r| r.meta_description.clone())
                .unwrap_or_else(|| "No meta description found".to_string()),
            sitemap_url: first
                .and_then(|r| r.sitemap_url.clone())
                .unwrap_or_else(|| "None".to_string()),
            robots_url: first.map(|r| r.robots_url.clone()).unwrap_or_default(),
            google_analytics: first.is_some_and(|r| r.google_analytics),
            total_urls: results.len(),
            aria_elements: results.iter().map(|r| r.aria_counts.aria_attributed).sum(),
            role_elements: results.iter().map(|r| r.aria_counts.role_attributed).sum(),
            pages_missing_title_or_description: results
                .iter()
                .filter(|r| r.title.is_none() || r.meta_description.is_none())
                .count(),
            category_totals,
        }
    }

    /// Plain-text rendering; escaped by the merge step
    pub fn render(&self) -> String {
        let mut text = String::new();

        text.push_str("General Information\n");
        text.push_str(&format!("Analysis date: {}\n", self.generated_at));
        text.push_str(&format!("Host operating system: {}\n", self.host_os));
        text.push_str(&format!("Web server: {}\n", self.server));
        text.push_str(&format!("Page title: {}\n", self.title));
        text.push_str(&format!("Page meta description: {}\n", self.meta_description));
        text.push_str(&format!("Sitemap URL: {}\n", self.sitemap_url));
        text.push_str(&format!("Robots.txt URL: {}\n", self.robots_url));
        text.push_str(&format!(
            "Google Analytics: {}\n",
            if self.google_analytics {
                "Found"
            } else {
                "Not found"
            }
        ));
        text.push_str(&format!("Total URLs analyzed: {}\n", self.total_urls));
        text.push_str(&format!("Total elements with 'aria': {}\n", self.aria_elements));
        text.push_str(&format!("Total elements with 'role': {}\n", self.role_elements));

        if self.pages_missing_title_or_description > 0 {
            text.push_str(&format!(
                "Pages without title or meta description: {}\n",
                self.pages_missing_title_or_description
            ));
        }
        for (category, total) in &self.category_totals {
            text.push_str(&format!("{}: {}\n", category.label(), total));
        }

        text
    }
}
