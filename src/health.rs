use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};

use crate::ha::{HaClient, SystemInfo};

const STATE_FILE: &str = "latest_state.json";
const SIGNATURE_LEN: usize = 100;
const EXAMPLE_LEN: usize = 200;
const TOP_OFFENDERS: usize = 20;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum LogLevel {
    Error,
    Warning,
    Critical,
}

impl LogLevel {
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "ERROR" => Some(Self::Error),
            "WARNING" => Some(Self::Warning),
            "CRITICAL" => Some(Self::Critical),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Issues,
}

/// One parsed log entry; continuation lines (stack traces) are folded into
/// `message`.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: LogLevel,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureStats {
    pub level: LogLevel,
    pub count: u64,
    pub first_seen: String,
    pub last_seen: String,
    pub example: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Offender {
    pub signature: String,
    #[serde(flatten)]
    pub stats: SignatureStats,
}

/// Aggregated log statistics. This is also the snapshot format persisted to
/// the data directory between runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealthStats {
    pub error_count: u64,
    pub warning_count: u64,
    pub unique_errors: HashMap<String, SignatureStats>,
    pub top_offenders: Vec<Offender>,
}

/// A full diagnostic run: system snapshot, log stats, and the trend note
/// against the previous run.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub date: String,
    pub generated_at: String,
    pub system: SystemInfo,
    pub stats: HealthStats,
    pub trend: String,
}

/// Structured summary for the bridge's `/health` endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct HealthSummary {
    pub status: HealthStatus,
    pub summary: String,
    pub errors: u64,
    pub warnings: u64,
}

impl HealthReport {
    pub fn status(&self) -> HealthStatus {
        if self.stats.error_count == 0 && self.stats.warning_count == 0 {
            HealthStatus::Ok
        } else {
            HealthStatus::Issues
        }
    }

    pub fn summary(&self) -> HealthSummary {
        let (status, summary) = match self.status() {
            HealthStatus::Ok => (
                HealthStatus::Ok,
                "Home Assistant is healthy. No errors or warnings found.".to_string(),
            ),
            HealthStatus::Issues => (
                HealthStatus::Issues,
                format!(
                    "Found {} errors and {} warnings. Check the health report for details.",
                    self.stats.error_count, self.stats.warning_count
                ),
            ),
        };
        HealthSummary {
            status,
            summary,
            errors: self.stats.error_count,
            warnings: self.stats.warning_count,
        }
    }

    pub fn to_markdown(&self) -> String {
        let mut lines = vec![format!("# Home Assistant Health Report: {}", self.date)];

        match self.status() {
            HealthStatus::Ok => lines.push("## Status: All Clear".to_string()),
            HealthStatus::Issues => lines.push(format!(
                "## Issues Detected: {} Errors, {} Warnings",
                self.stats.error_count, self.stats.warning_count
            )),
        }

        if !self.trend.is_empty() {
            lines.push(format!("\n> {}\n", self.trend));
        }

        lines.push("## System Snapshot".to_string());
        lines.push(format!(
            "- **Version**: {}",
            self.system.version.as_deref().unwrap_or("unknown")
        ));
        lines.push(format!(
            "- **State**: {}",
            self.system.state.as_deref().unwrap_or("unknown")
        ));
        lines.push(format!("- **Generated**: {}", self.generated_at));

        if !self.stats.top_offenders.is_empty() {
            lines.push("\n## Top Unique Issues".to_string());
            lines.push("| Count | Level | Signature | Last Seen |".to_string());
            lines.push("| :--- | :--- | :--- | :--- |".to_string());
            for offender in &self.stats.top_offenders {
                let signature = offender.signature.replace('|', "/");
                lines.push(format!(
                    "| {} | {} | `{}` | {} |",
                    offender.stats.count,
                    offender.stats.level,
                    signature,
                    offender.stats.last_seen
                ));
            }
        }

        lines.join("\n")
    }
}

/// Parse raw Home Assistant log text into structured entries.
///
/// A line carrying ` ERROR `, ` WARNING `, or ` CRITICAL ` starts an entry;
/// anything else continues the previous one.
pub fn parse_log(text: &str) -> Vec<LogEntry> {
    let mut entries = Vec::new();
    let mut current: Option<LogEntry> = None;

    for line in text.lines() {
        // 2026-08-06 09:00:00.123 ERROR (MainThread) [component] message
        let mut parts = line.splitn(4, ' ');
        let header = (parts.next(), parts.next(), parts.next(), parts.next());
        let parsed = match header {
            (Some(date), Some(time), Some(token), Some(message)) => LogLevel::from_token(token)
                .map(|level| LogEntry {
                    timestamp: format!("{date} {time}"),
                    level,
                    message: message.to_string(),
                }),
            _ => None,
        };

        match parsed {
            Some(entry) => {
                if let Some(done) = current.take() {
                    entries.push(done);
                }
                current = Some(entry);
            }
            None => {
                if let Some(entry) = current.as_mut() {
                    entry.message.push('\n');
                    entry.message.push_str(line);
                }
            }
        }
    }

    if let Some(done) = current {
        entries.push(done);
    }
    entries
}

/// Aggregate entries: counts, unique signatures, top offenders by count.
pub fn analyze(entries: &[LogEntry]) -> HealthStats {
    let mut stats = HealthStats::default();

    for entry in entries {
        match entry.level {
            LogLevel::Error | LogLevel::Critical => stats.error_count += 1,
            LogLevel::Warning => stats.warning_count += 1,
        }

        // Group on the first line of the message so per-occurrence noise
        // (ids, timestamps in the body) does not split the signature.
        let signature: String = entry
            .message
            .lines()
            .next()
            .unwrap_or("")
            .chars()
            .take(SIGNATURE_LEN)
            .collect();
        let slot = stats
            .unique_errors
            .entry(signature)
            .or_insert_with(|| SignatureStats {
                level: entry.level,
                count: 0,
                first_seen: entry.timestamp.clone(),
                last_seen: entry.timestamp.clone(),
                example: entry.message.chars().take(EXAMPLE_LEN).collect(),
            });
        slot.count += 1;
        slot.last_seen = entry.timestamp.clone();
    }

    let mut offenders: Vec<Offender> = stats
        .unique_errors
        .iter()
        .map(|(signature, s)| Offender {
            signature: signature.clone(),
            stats: s.clone(),
        })
        .collect();
    offenders.sort_by(|a, b| b.stats.count.cmp(&a.stats.count));
    offenders.truncate(TOP_OFFENDERS);
    stats.top_offenders = offenders;

    stats
}

/// Trend note comparing this run's error count with the previous snapshot.
pub fn trend_note(previous: Option<&HealthStats>, current: &HealthStats) -> String {
    match previous {
        None => "First run: No previous data.".to_string(),
        Some(prev) => {
            let delta = current.error_count as i64 - prev.error_count as i64;
            if delta > 0 {
                format!("**Trend**: +{delta} errors since last run.")
            } else if delta < 0 {
                format!("**Trend**: {delta} errors (improvement).")
            } else {
                "**Trend**: Stable error count.".to_string()
            }
        }
    }
}

/// Runs the diagnostic and persists its artifacts to the data directory.
#[derive(Clone)]
pub struct HealthMonitor {
    client: HaClient,
    data_dir: PathBuf,
}

impl HealthMonitor {
    pub fn new(client: HaClient, data_dir: PathBuf) -> Self {
        Self { client, data_dir }
    }

    /// Run a full health diagnostic: fetch system info and the error log,
    /// aggregate, diff against the previous run, persist the dated report and
    /// the refreshed snapshot.
    pub async fn generate(&self) -> Result<HealthReport> {
        let system = match self.client.get_system_info().await {
            Ok(system) => system,
            Err(error) => {
                tracing::warn!(%error, "could not fetch /api/config");
                SystemInfo::unreachable()
            }
        };

        let log_text = match self.client.get_error_log().await {
            Ok(text) => text,
            Err(error) => {
                tracing::warn!(%error, "could not fetch /api/error_log");
                String::new()
            }
        };
        let stats = analyze(&parse_log(&log_text));

        let previous = self.load_previous();
        let trend = trend_note(previous.as_ref(), &stats);

        let now = Local::now();
        let report = HealthReport {
            date: now.format("%Y-%m-%d").to_string(),
            generated_at: now.to_rfc3339(),
            system,
            stats,
            trend,
        };

        if let Err(error) = self.persist(&report) {
            // A read-only filesystem should not take the diagnostic down.
            tracing::error!(%error, "failed to persist health report");
        }

        Ok(report)
    }

    fn load_previous(&self) -> Option<HealthStats> {
        let content = fs::read_to_string(self.data_dir.join(STATE_FILE)).ok()?;
        serde_json::from_str(&content).ok()
    }

    fn persist(&self, report: &HealthReport) -> Result<()> {
        fs::create_dir_all(&self.data_dir).with_context(|| {
            format!("failed to create data directory {}", self.data_dir.display())
        })?;

        let report_path = self.data_dir.join(format!("{}_ha_health.md", report.date));
        fs::write(&report_path, report.to_markdown())
            .with_context(|| format!("failed to write {}", report_path.display()))?;

        let state_path = self.data_dir.join(STATE_FILE);
        let snapshot = serde_json::to_string_pretty(&report.stats)?;
        fs::write(&state_path, snapshot)
            .with_context(|| format!("failed to write {}", state_path.display()))?;

        tracing::info!(report = %report_path.display(), "health report written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_LOG: &str = "\
2026-08-06 07:00:01.123 ERROR (MainThread) [homeassistant.components.zha] Device left the network
Traceback (most recent call last):
  File \"zha.py\", line 10, in handle
2026-08-06 07:01:02.456 WARNING (MainThread) [homeassistant.setup] Setup of cloud is taking over 10 seconds
2026-08-06 07:02:03.789 ERROR (MainThread) [homeassistant.components.zha] Device left the network
";

    #[test]
    fn parse_folds_continuation_lines() {
        let entries = parse_log(SAMPLE_LOG);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].level, LogLevel::Error);
        assert_eq!(entries[0].timestamp, "2026-08-06 07:00:01.123");
        assert!(entries[0].message.contains("Traceback"));
        assert_eq!(entries[1].level, LogLevel::Warning);
        assert!(!entries[1].message.contains('\n'));
    }

    #[test]
    fn analyze_counts_and_ranks_signatures() {
        let stats = analyze(&parse_log(SAMPLE_LOG));
        assert_eq!(stats.error_count, 2);
        assert_eq!(stats.warning_count, 1);
        assert_eq!(stats.unique_errors.len(), 2);

        let top = &stats.top_offenders[0];
        assert_eq!(top.stats.count, 2);
        assert!(top.signature.contains("zha"));
        assert_eq!(top.stats.first_seen, "2026-08-06 07:00:01.123");
        assert_eq!(top.stats.last_seen, "2026-08-06 07:02:03.789");
    }

    #[test]
    fn trend_covers_all_directions() {
        let mut prev = HealthStats::default();
        prev.error_count = 2;
        let mut cur = HealthStats::default();

        assert_eq!(trend_note(None, &cur), "First run: No previous data.");

        cur.error_count = 5;
        assert_eq!(
            trend_note(Some(&prev), &cur),
            "**Trend**: +3 errors since last run."
        );

        cur.error_count = 1;
        assert_eq!(
            trend_note(Some(&prev), &cur),
            "**Trend**: -1 errors (improvement)."
        );

        cur.error_count = 2;
        assert_eq!(trend_note(Some(&prev), &cur), "**Trend**: Stable error count.");
    }

    #[test]
    fn markdown_headline_reflects_status() {
        let stats = analyze(&parse_log(SAMPLE_LOG));
        let report = HealthReport {
            date: "2026-08-06".to_string(),
            generated_at: "2026-08-06T07:05:00+00:00".to_string(),
            system: SystemInfo {
                version: Some("2026.7.1".to_string()),
                state: Some("RUNNING".to_string()),
                time_zone: None,
            },
            stats,
            trend: "First run: No previous data.".to_string(),
        };
        let markdown = report.to_markdown();
        assert!(markdown.contains("## Issues Detected: 2 Errors, 1 Warnings"));
        assert!(markdown.contains("| Count | Level | Signature | Last Seen |"));
        assert!(markdown.contains("2026.7.1"));

        let clean = HealthReport {
            stats: HealthStats::default(),
            ..report
        };
        assert!(clean.to_markdown().contains("## Status: All Clear"));
        assert_eq!(clean.summary().status, HealthStatus::Ok);
    }

    #[test]
    fn snapshot_roundtrips_through_json() {
        let stats = analyze(&parse_log(SAMPLE_LOG));
        let json = serde_json::to_string_pretty(&stats).unwrap();
        let back: HealthStats = serde_json::from_str(&json).unwrap();
        assert_eq!(back.error_count, stats.error_count);
        assert_eq!(back.top_offenders.len(), stats.top_offenders.len());
        assert_eq!(back.top_offenders[0].stats.count, 2);
    }
}
