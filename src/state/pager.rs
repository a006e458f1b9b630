use crate::data::record::Record;
use crate::data::summary::{summarize, Summary};

use super::session::SessionState;

/// One rendered page of a result set plus the headline counts for the
/// whole search.
#[derive(Debug, Clone)]
pub struct PageView {
    pub records: Vec<Record>,
    pub page: usize,
    pub total_pages: usize,
    pub summary: Summary,
}

/// Clamp a requested page into `[1, total_pages]` for a result set of
/// `len` records. Out-of-range requests (0, negative, past the end)
/// silently land on the nearest valid page; pagination never errors.
pub fn page_bounds(len: usize, page_size: usize, requested: i64) -> (usize, usize) {
    debug_assert!(page_size >= 1);
    let total_pages = len.div_ceil(page_size).max(1);
    let page = requested.clamp(1, total_pages as i64) as usize;
    (page, total_pages)
}

/// Pagination over the session's stored result set.
pub struct Pager;

impl Pager {
    /// Build the view for `requested_page` and move the session cursor
    /// there. Returns `None` when the session has no result set (nothing
    /// searched yet, or cleared).
    ///
    /// The summary always covers the entire result set, so the headline
    /// counts stay stable while the user pages around. Recomputing from
    /// the session's current results also makes reordered or repeated
    /// navigation events harmless.
    pub fn render_page(
        session: &mut SessionState,
        requested_page: i64,
        page_size: usize,
        required_status: &str,
    ) -> Option<PageView> {
        let results = session.results.as_ref()?;

        let (page, total_pages) = page_bounds(results.len(), page_size, requested_page);
        let start = (page - 1) * page_size;
        let end = (start + page_size).min(results.len());
        let records = results[start..end].to_vec();
        let summary = summarize(results, required_status);

        session.current_page = page;
        Some(PageView {
            records,
            page,
            total_pages,
            summary,
        })
    }
}
