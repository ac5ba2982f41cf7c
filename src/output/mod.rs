//! Output module for lookup reports
//!
//! This module handles:
//! - Rendering verdicts and errors as plain text
//! - Rendering subscription notices and sweep summaries
//! - Printing notices to the console

mod console;
mod report;

pub use console::ConsoleNotifier;
pub use report::{format_duration, render_error, render_notice, render_summary, render_verdict};
