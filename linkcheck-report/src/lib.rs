pub mod report;

pub use report::{ReportFormat, generate_json_report, generate_text_report, save_report};
