//! Crawl report rendering
//!
//! Turns a [`CrawlReport`] into a human-readable text document or a JSON
//! document wrapping the serialized report with generator metadata.

use colored::Colorize;
use linkcheck_crawler::result::TRANSPORT_FAILURE_STATUS;
use linkcheck_crawler::CrawlReport;
use std::fs::File;
use std::io::Write;
use std::path::Path;

const RULE: &str =
    "────────────────────────────────────────────────────────────────────────";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

pub fn generate_text_report(report: &CrawlReport) -> String {
    let mut out = String::new();

    out.push_str(RULE);
    out.push_str("\n                      LINKCHECK CRAWL REPORT\n");
    out.push_str(RULE);
    out.push('\n');

    out.push_str(&format!("Root address:  {}\n", report.root_address));
    out.push_str(&format!("Depth:         {}\n", report.depth));
    out.push_str(&format!("Elapsed:       {} ms\n", report.elapsed_millis));
    out.push_str(&format!("Pages crawled: {}\n\n", report.total_pages_crawled));

    out.push_str("Status counts:\n");
    let mut counts: Vec<(&i32, &usize)> = report.status_counts.iter().collect();
    counts.sort_unstable();
    for (status, count) in counts {
        out.push_str(&format!("  {}  {}\n", status_label(*status), count));
    }
    out.push('\n');

    out.push_str("Pages:\n");
    for result in &report.page_results {
        out.push_str(&format!(
            "  {}  {}\n      {}\n",
            status_label(result.status_code),
            result.address,
            result.message
        ));
    }

    out.push_str(RULE);
    out.push('\n');
    out
}

pub fn generate_json_report(report: &CrawlReport) -> Result<String, serde_json::Error> {
    let json_report = serde_json::json!({
        "metadata": {
            "generator": "linkcheck",
            "version": env!("CARGO_PKG_VERSION"),
            "generated_at": chrono::Utc::now().to_rfc3339(),
        },
        "report": report,
    });

    serde_json::to_string_pretty(&json_report)
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

fn status_label(status: i32) -> String {
    let label = if status == TRANSPORT_FAILURE_STATUS {
        "ERR".to_string()
    } else {
        status.to_string()
    };

    let colored = match status {
        200..=299 => label.green(),
        300..=399 => label.cyan(),
        400..=499 => label.yellow(),
        500..=599 => label.red(),
        _ => label.red().bold(),
    };

    format!("[{colored}]")
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkcheck_crawler::PageResult;
    use std::collections::BTreeSet;
    use std::time::Instant;

    fn sample_report() -> CrawlReport {
        let results = vec![
            PageResult::new(
                "http://example.com/",
                200,
                "OK",
                BTreeSet::from(["http://example.com/a".to_string()]),
            ),
            PageResult::leaf("http://example.com/missing", 404, "Not Found"),
            PageResult::leaf(
                "http://example.com/down",
                TRANSPORT_FAILURE_STATUS,
                "ERROR: processing failed due to timeout: deadline elapsed",
            ),
        ];
        CrawlReport::assemble("http://example.com/", 2, Instant::now(), results)
    }

    #[test]
    fn test_report_format_from_str() {
        assert_eq!(ReportFormat::from_str("text"), Some(ReportFormat::Text));
        assert_eq!(ReportFormat::from_str("json"), Some(ReportFormat::Json));
        assert_eq!(ReportFormat::from_str("JSON"), Some(ReportFormat::Json));
        assert_eq!(ReportFormat::from_str("markdown"), None);
    }

    #[test]
    fn test_text_report_lists_every_page() {
        let report = sample_report();
        let text = generate_text_report(&report);

        assert!(text.contains("Root address:  http://example.com/"));
        assert!(text.contains("Pages crawled: 3"));
        assert!(text.contains("http://example.com/missing"));
        assert!(text.contains("Not Found"));
        assert!(text.contains("ERROR: processing failed due to timeout"));
    }

    #[test]
    fn test_json_report_shape() {
        let report = sample_report();
        let json = generate_json_report(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["metadata"]["generator"], "linkcheck");
        assert_eq!(value["report"]["root_address"], "http://example.com/");
        assert_eq!(value["report"]["total_pages_crawled"], 3);
        assert_eq!(value["report"]["status_counts"]["200"], 1);
        assert_eq!(value["report"]["page_results"][0]["status_code"], 200);
        // link sets are internal and stay out of the serialized form
        assert!(value["report"]["page_results"][0].get("links").is_none());
    }

    #[test]
    fn test_save_report_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.txt");

        save_report("crawl complete\n", &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "crawl complete\n");
    }
}
