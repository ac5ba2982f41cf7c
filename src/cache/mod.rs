//! In-memory document cache
//!
//! This module keeps downloaded bulletins in memory for a fixed time-to-live so
//! repeated lookups against the same year do not hit the network again.

mod document_cache;

pub use document_cache::{CachedDocument, DocumentCache, DEFAULT_TTL_HOURS};

use std::sync::Arc;

/// Raw document bytes shared between the cache and its readers
pub type DocumentBytes = Arc<[u8]>;
