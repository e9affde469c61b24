//! Result rendering for the command line.

use anyhow::Result;
use artisync_reconcile::ReconcileReport;
use serde::Serialize;

use crate::cli::OutputFormat;

/// What a run reports back to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunOutput {
    pub changed: bool,
    pub added_count: usize,
    pub updated_count: usize,
    pub deleted_count: usize,
    pub message: String,
    pub warnings: Vec<String>,
    #[serde(skip)]
    pub planned: String,
}

impl RunOutput {
    pub fn from_report(report: &ReconcileReport, warnings: Vec<String>) -> Self {
        Self {
            changed: report.changed,
            added_count: report.counts.added,
            updated_count: report.counts.updated,
            deleted_count: report.counts.deleted,
            message: report.message.clone(),
            warnings,
            planned: if report.dry_run {
                report.format_actions()
            } else {
                String::new()
            },
        }
    }

    /// Renders stdout and stderr text for `format`.
    pub fn render(&self, format: OutputFormat) -> Result<(String, String)> {
        match format {
            OutputFormat::Json => Ok((serde_json::to_string_pretty(self)?, String::new())),
            OutputFormat::Text => {
                let stderr = self
                    .warnings
                    .iter()
                    .map(|w| format!("WARNING: {w}"))
                    .collect::<Vec<_>>()
                    .join("\n");
                let mut stdout = self.planned.clone();
                stdout.push_str(&self.message);
                Ok((stdout, stderr))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RunOutput {
        RunOutput {
            changed: true,
            added_count: 1,
            updated_count: 0,
            deleted_count: 2,
            message: "1 repositories were added\n0 repositories were updated\n2 repositories were deleted"
                .to_string(),
            warnings: vec!["TLS off".to_string()],
            planned: String::new(),
        }
    }

    #[test]
    fn json_output_has_stable_fields() {
        let (stdout, stderr) = sample().render(OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
        assert_eq!(value["changed"], true);
        assert_eq!(value["added_count"], 1);
        assert_eq!(value["deleted_count"], 2);
        assert_eq!(value["warnings"][0], "TLS off");
        assert!(value.get("planned").is_none());
        assert!(stderr.is_empty());
    }

    #[test]
    fn text_output_sends_warnings_to_stderr() {
        let (stdout, stderr) = sample().render(OutputFormat::Text).unwrap();
        assert!(stdout.starts_with("1 repositories were added"));
        assert_eq!(stderr, "WARNING: TLS off");
    }

    #[test]
    fn text_output_lists_planned_actions_first() {
        let mut output = sample();
        output.planned = "  delete repository 'old'\n".to_string();
        let (stdout, _) = output.render(OutputFormat::Text).unwrap();
        assert!(stdout.starts_with("  delete repository 'old'\n1 repositories"));
    }
}
