//! Link migration comparison between an old and a new page.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::extract::{ExtractionResult, LinkRecord};

/// How much of the old page's link inventory survives on the new page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Links on both pages, as recorded on the new page
    pub shared: Vec<LinkRecord>,
    /// Links on the old page only
    pub missing: Vec<LinkRecord>,
    /// Percentage of old links that are shared, 0-100
    pub similarity: u8,
}

/// Compare two extraction results by canonical link URL.
pub fn compare(old: &ExtractionResult, new: &ExtractionResult) -> ComparisonResult {
    compare_links(&old.links, &new.links)
}

/// Both output lists follow the old page's link order.
pub fn compare_links(old: &[LinkRecord], new: &[LinkRecord]) -> ComparisonResult {
    let new_by_url: HashMap<&str, &LinkRecord> = new.iter().map(|link| (link.url.as_str(), link)).collect();

    let mut seen = HashSet::new();
    let mut shared = Vec::new();
    let mut missing = Vec::new();
    for link in old {
        if !seen.insert(link.url.as_str()) {
            continue;
        }
        match new_by_url.get(link.url.as_str()) {
            Some(current) => shared.push((*current).clone()),
            None => missing.push(link.clone()),
        }
    }

    let similarity = similarity(shared.len(), seen.len());
    ComparisonResult { shared, missing, similarity }
}

/// `round(100 * shared / total)`, half rounding up; 0 when `total` is 0.
pub fn similarity(shared: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let shared = shared.min(total);
    let percent = (200 * shared + total) / (2 * total);
    u8::try_from(percent).unwrap_or(100)
}
