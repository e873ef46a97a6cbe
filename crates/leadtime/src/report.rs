// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Report rendering

use std::fmt;

use chrono::{DateTime, Utc};
use leadtime_core::{Bucket, PullRequest, ReleaseAnalysis};

use crate::config::OutputFormat;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";
const RELEASE_SEPARATOR: &str = "\n========================================\n\n";

/// Render `analysis` in `format`
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render(analysis: &ReleaseAnalysis, format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Text => Ok(TextReport(analysis).to_string()),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(analysis)?;
            json.push('\n');
            Ok(json)
        }
    }
}

/// Render several releases, newest first
///
/// Text reports are separated by a rule; JSON is an array with one object
/// per release.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_all(analyses: &[ReleaseAnalysis], format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Text => Ok(analyses
            .iter()
            .map(|analysis| TextReport(analysis).to_string())
            .collect::<Vec<_>>()
            .join(RELEASE_SEPARATOR)),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(analyses)?;
            json.push('\n');
            Ok(json)
        }
    }
}

/// Plain-text view of a [`ReleaseAnalysis`]
pub struct TextReport<'a>(pub &'a ReleaseAnalysis);

fn date(at: &DateTime<Utc>) -> String {
    at.format(DATE_FORMAT).to_string()
}

fn hours_and_days(hours: f64) -> String {
    format!("{hours:.1} hours ({:.1} days)", hours / 24.0)
}

fn write_pull_request(f: &mut fmt::Formatter<'_>, pr: &PullRequest) -> fmt::Result {
    writeln!(f, "PR #{} by {}", pr.number, pr.author)?;
    writeln!(f, "  Title: {}", pr.title.lines().next().unwrap_or(""))?;
    if let Some(merged_at) = &pr.merged_at {
        writeln!(f, "  Merged at: {}", date(merged_at))?;
    }
    writeln!(f, "  Lead Time: {:.2} hours", pr.lead_time_hours())?;
    if let Some(target) = &pr.target_branch {
        writeln!(f, "  Target Branch: {target}")?;
    }
    if let Some(source) = &pr.source_branch {
        writeln!(f, "  Source Branch: {source}")?;
    }
    if let Some(sha) = &pr.merge_commit_sha {
        writeln!(f, "  Commit: {sha}")?;
    }
    writeln!(
        f,
        "  Changes: +{} -{} lines in {} files",
        pr.additions, pr.deletions, pr.changed_files
    )
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let analysis = self.0;
        let release = analysis.release();
        let previous = analysis.previous();

        writeln!(
            f,
            "Release Analysis for {} (commit: {})",
            release.tag, release.commit
        )?;
        writeln!(
            f,
            "Previous release {} (commit: {}) on {}",
            previous.tag,
            previous.commit,
            date(&previous.date)
        )?;
        writeln!(f, "Pull request data: {}", analysis.source().as_str())?;

        writeln!(f)?;
        writeln!(f, "Pull Requests:")?;
        if analysis.pull_requests().is_empty() {
            writeln!(f, "  (none)")?;
        }
        for pr in analysis.pull_requests() {
            write_pull_request(f, pr)?;
        }

        let lead_time = analysis.lead_time();
        writeln!(f)?;
        writeln!(f, "Summary:")?;
        writeln!(f, "==========")?;
        writeln!(
            f,
            "- Release {} was made on {}",
            release.tag,
            date(&release.date)
        )?;
        writeln!(f, "- Included {} pull requests", analysis.pr_count())?;
        writeln!(f, "- Lead Time Metrics:")?;
        writeln!(f, "  * Average: {}", hours_and_days(lead_time.mean))?;
        writeln!(f, "  * Median: {}", hours_and_days(lead_time.median))?;
        writeln!(f, "  * 90th percentile: {}", hours_and_days(lead_time.p90))?;
        writeln!(
            f,
            "  * Range: {:.1} - {:.1} hours",
            lead_time.min, lead_time.max
        )?;

        writeln!(f)?;
        writeln!(f, "- Lead Time Distribution:")?;
        for (name, bucket) in [
            ("Fast", Bucket::Fast),
            ("Medium", Bucket::Medium),
            ("Slow", Bucket::Slow),
        ] {
            let share = analysis.distribution().get(bucket);
            writeln!(
                f,
                "  * {name} ({}): {} PRs ({:.1}%)",
                bucket.label(),
                share.count,
                share.percent
            )?;
        }

        let lines = analysis.line_changes();
        writeln!(f)?;
        writeln!(
            f,
            "- Line Changes: +{} -{} ({} total) across {} files",
            lines.additions, lines.deletions, lines.total_changed, lines.changed_files
        )?;

        if analysis.skipped_count() > 0 {
            writeln!(f)?;
            writeln!(f, "- Skipped {} items:", analysis.skipped_count())?;
            for skipped in analysis.skipped() {
                writeln!(f, "  * {}: {}", skipped.item, skipped.reason)?;
            }
        }

        if analysis.depth_limited() {
            writeln!(f)?;
            writeln!(
                f,
                "Note: the merge graph walk stopped at its depth bound; raise --depth to follow nested merges"
            )?;
        }

        Ok(())
    }
}
