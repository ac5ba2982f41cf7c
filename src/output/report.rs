//! Plain-text rendering of lookup results

use crate::fetcher::FetchError;
use crate::processor::Verdict;
use crate::scanner::ScanOutcome;
use crate::subscription::{CheckSummary, Notice};
use crate::DecreeError;
use std::fmt::Write;
use std::time::Duration;

/// Formats a duration as seconds with two decimals
///
/// A zero duration is printed as `0 seconds`.
///
/// # Examples
///
/// ```
/// use decree_scout::output::format_duration;
/// use std::time::Duration;
///
/// assert_eq!(format_duration(Duration::from_millis(1234)), "1.23 seconds");
/// assert_eq!(format_duration(Duration::ZERO), "0 seconds");
/// ```
pub fn format_duration(duration: Duration) -> String {
    if duration.is_zero() {
        return "0 seconds".to_string();
    }
    format!("{:.2} seconds", duration.as_secs_f64())
}

/// Renders the report for a completed lookup
///
/// # Arguments
///
/// * `case_id` - The identifier that was looked up
/// * `verdict` - Outcome and timings of the lookup
pub fn render_verdict(case_id: &str, verdict: &Verdict) -> String {
    let (headline, advice) = match verdict.outcome {
        ScanOutcome::FoundResolved => (
            format!("Case {} was found and resolved.", case_id),
            "You can continue with the next steps of the procedure.",
        ),
        ScanOutcome::FoundUnresolved => (
            format!("Case {} was found but is not resolved yet.", case_id),
            "The case is still being processed; check again later.",
        ),
        ScanOutcome::NotFound => (
            format!("Case {} was not found.", case_id),
            "Check the number and the year, or contact the authorities.",
        ),
    };

    let mut out = String::new();
    let _ = writeln!(out, "{}", headline);
    let _ = writeln!(out, "  Fetch time:    {}", format_duration(verdict.timing.fetch));
    let _ = writeln!(out, "  Analysis time: {}", format_duration(verdict.timing.scan));
    let _ = write!(out, "{}", advice);
    out
}

/// Renders the report for a failed lookup
pub fn render_error(case_id: &str, error: &DecreeError) -> String {
    match error {
        DecreeError::InvalidFormat(e) => {
            format!("Invalid format for '{}': {}", case_id, e)
        }
        DecreeError::Fetch {
            source: FetchError::UnsupportedYear(year),
            ..
        } => format!(
            "No bulletin is configured for {}, so case {} cannot be checked.",
            year, case_id
        ),
        DecreeError::UnknownOutcome(_) => format!(
            "Unknown state for case {}. Try again later or contact the administrator.",
            case_id
        ),
        other => format!(
            "An error occurred while checking {}: {}\nPlease try again later.",
            case_id, other
        ),
    }
}

/// Renders a subscription notice
pub fn render_notice(notice: &Notice) -> String {
    match notice {
        Notice::NotFound { case_id } => format!(
            "Notice: case {} was not found. Check the number and the year, or contact the authorities.",
            case_id
        ),
        Notice::Resolved { case_id } => format!(
            "Notice: case {} was found and resolved! This subscription has been removed.",
            case_id
        ),
    }
}

/// Renders the counters of one subscription sweep
pub fn render_summary(summary: &CheckSummary) -> String {
    format!(
        "Checked {}: {} resolved, {} pending, {} not found, {} failed",
        summary.checked, summary.resolved, summary.pending, summary.not_found, summary.failed
    )
}
