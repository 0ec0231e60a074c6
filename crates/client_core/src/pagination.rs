//! Presentation helpers for a paginated product listing.

use shared::{domain::Product, protocol::PaginatedResult};

/// Number of pages below which every page gets its own link.
const FULL_WINDOW: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    Page(u32),
    Gap,
}

/// Page links to render for `current` out of `total_pages`.
///
/// Nothing is shown for a single page. Up to five pages are all listed;
/// beyond that the first and last page, the current page and its
/// neighbours are kept and the rest collapse into gaps.
pub fn page_window(current: u32, total_pages: usize) -> Vec<PageLink> {
    if total_pages <= 1 {
        return Vec::new();
    }
    let last = u32::try_from(total_pages).unwrap_or(u32::MAX);
    if total_pages <= FULL_WINDOW {
        return (1..=last).map(PageLink::Page).collect();
    }

    let current = current.clamp(1, last);
    let mut links = vec![PageLink::Page(1)];
    if current > 3 {
        links.push(PageLink::Gap);
    }
    let lo = current.saturating_sub(1).max(2);
    let hi = current.saturating_add(1).min(last - 1);
    links.extend((lo..=hi).map(PageLink::Page));
    if current < last - 2 {
        links.push(PageLink::Gap);
    }
    links.push(PageLink::Page(last));
    links
}

pub fn result_summary(result: &PaginatedResult<Product>, search: &str) -> String {
    let search = search.trim();
    let mut summary = format!("Showing {} of {} products", result.data.len(), result.total);
    if !search.is_empty() {
        summary.push_str(&format!(" for \"{search}\""));
    }
    summary
}

pub fn empty_state_message(search: &str) -> String {
    let search = search.trim();
    if search.is_empty() {
        "This vendor has no products yet.".to_string()
    } else {
        format!("No products match \"{search}\". Try a different search term.")
    }
}

#[cfg(test)]
#[path = "tests/pagination_tests.rs"]
mod tests;
