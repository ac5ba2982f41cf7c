//! Per-page classification rule

use crate::scanner::ScanOutcome;

/// Number of characters, counted from the start of a match, inspected for the
/// resolution marker
///
/// The window covers the case number itself plus the columns up to where a
/// resolution reference is printed in the bulletin's table layout. It is a
/// property of the published documents and must not be tuned.
pub const RESOLUTION_WINDOW: usize = 43;

/// Literal that marks a case as resolved when it follows the case number
pub const RESOLUTION_MARKER: &str = "/P/";

/// Classifies a page of text for the given case identifier
///
/// Only the first occurrence of `token` is considered. The window starts at
/// the first character of the match and is counted in characters, not bytes,
/// so diacritics in the surrounding text never split a code point.
///
/// # Arguments
///
/// * `text` - Plain text of one page
/// * `token` - The case identifier to look for
///
/// # Returns
///
/// * `NotFound` - `token` does not occur on the page
/// * `FoundResolved` - [`RESOLUTION_MARKER`] occurs within the
///   [`RESOLUTION_WINDOW`] characters starting at the match
/// * `FoundUnresolved` - otherwise
///
/// # Examples
///
/// ```
/// use decree_scout::scanner::{classify_page, ScanOutcome};
///
/// let line = "123/RD/2023    12.05.2023    45/P/2024";
/// assert_eq!(classify_page(line, "123/RD/2023"), ScanOutcome::FoundResolved);
/// assert_eq!(classify_page("123/RD/2023", "123/RD/2023"), ScanOutcome::FoundUnresolved);
/// assert_eq!(classify_page(line, "999/RD/2023"), ScanOutcome::NotFound);
/// ```
pub fn classify_page(text: &str, token: &str) -> ScanOutcome {
    let Some(index) = text.find(token) else {
        return ScanOutcome::NotFound;
    };

    let from_match = &text[index..];
    let window_end = from_match
        .char_indices()
        .nth(RESOLUTION_WINDOW)
        .map(|(offset, _)| offset)
        .unwrap_or(from_match.len());

    if from_match[..window_end].contains(RESOLUTION_MARKER) {
        ScanOutcome::FoundResolved
    } else {
        ScanOutcome::FoundUnresolved
    }
}
