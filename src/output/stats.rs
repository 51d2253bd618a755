//! Run statistics derived from a crawl report

use crate::crawler::CrawlReport;
use std::fmt::Write;

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlStatistics {
    /// Sitemap documents processed
    pub sitemaps_fetched: usize,

    /// Sitemap documents that failed
    pub sitemap_failures: usize,

    /// Page URLs discovered
    pub pages_discovered: usize,

    /// Pages attempted
    pub pages_visited: usize,

    /// Pages that produced a record
    pub records: usize,

    /// Pages that produced no record
    pub page_failures: usize,

    /// Wall-clock duration of the run in milliseconds
    pub duration_ms: i64,
}

impl CrawlStatistics {
    pub fn from_report(report: &CrawlReport) -> Self {
        Self {
            sitemaps_fetched: report.sitemaps_fetched,
            sitemap_failures: report.sitemap_failures,
            pages_discovered: report.frontier_len,
            pages_visited: report.pages_visited,
            records: report.records.len(),
            page_failures: report.page_failures,
            duration_ms: report.duration().num_milliseconds(),
        }
    }

    /// Percentage of visited pages that produced a record
    pub fn success_rate(&self) -> f64 {
        if self.pages_visited > 0 {
            (self.records as f64 / self.pages_visited as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Renders statistics as a human-readable block
pub fn format_statistics(stats: &CrawlStatistics) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== Crawl Statistics ===\n");
    let _ = writeln!(out, "Expansion:");
    let _ = writeln!(out, "  Sitemaps fetched: {}", stats.sitemaps_fetched);
    let _ = writeln!(out, "  Sitemap failures: {}", stats.sitemap_failures);
    let _ = writeln!(out, "  Pages discovered: {}", stats.pages_discovered);
    let _ = writeln!(out);
    let _ = writeln!(out, "Visitation:");
    let _ = writeln!(out, "  Pages visited: {}", stats.pages_visited);
    let _ = writeln!(out, "  Records collected: {}", stats.records);
    let _ = writeln!(out, "  Page failures: {}", stats.page_failures);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Success Rate: {:.1}% ({} / {} pages)",
        stats.success_rate(),
        stats.records,
        stats.pages_visited
    );
    let _ = writeln!(out, "Duration: {:.2}s", stats.duration_ms as f64 / 1000.0);

    out
}

/// Prints statistics to stdout
pub fn print_statistics(stats: &CrawlStatistics) {
    print!("{}", format_statistics(stats));
}
