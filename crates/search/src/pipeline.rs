//! Filter, sort, paginate.
//!
//! [`recompute`] is the pure core: the same catalog and state always produce the
//! same slice and metadata. [`ViewPipeline`] owns one `ViewState` and applies
//! the mutator rules (query/sort/page-size changes go back to page 1, page
//! requests are clamped) before recomputing.

#![forbid(unsafe_code)]

use std::cmp::Ordering;
use std::sync::Arc;

use icu_collator::{Collator, CollatorOptions, Strength};
use serde::Serialize;
use shelf_core::{Catalog, PageMeta, Product, SortKey, ViewError, ViewState};
use tracing::{debug, warn};

use crate::paginate::paginate;

/// Ordered page of products borrowed from the catalog. Rebuilt on every recompute.
pub type VisibleSlice<'a> = Vec<&'a Product>;

/// Stage counts for one recompute, for `--explain` style output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ViewDebugInfo {
    pub total: usize,
    pub after_filter: usize,
    pub page_rows: usize,
}

/// Entries whose title contains `query`, case-insensitively, in catalog order.
/// Surrounding whitespace in the query is ignored; an empty query keeps everything.
pub fn filter<'a>(items: &'a [Product], query: &str) -> Vec<&'a Product> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return items.iter().collect();
    }
    items.iter().filter(|p| p.title.to_lowercase().contains(&needle)).collect()
}

/// Stable in-place sort. `SortKey::None` leaves the order alone.
pub fn sort(rows: &mut [&Product], key: SortKey) {
    match key {
        SortKey::None => {}
        SortKey::PriceAsc => rows.sort_by(|a, b| compare_prices(a.price, b.price)),
        SortKey::PriceDesc => rows.sort_by(|a, b| compare_prices(b.price, a.price)),
        SortKey::NameAsc => rows.sort_by(|a, b| compare_titles(&a.title, &b.title)),
        SortKey::NameDesc => rows.sort_by(|a, b| compare_titles(&b.title, &a.title)),
    }
}

/// Numeric order where `-0.0 == 0.0`; incomparable values count as equal.
pub fn compare_prices(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

thread_local! {
    static TITLE_COLLATOR: Option<Collator> = title_collator();
}

fn title_collator() -> Option<Collator> {
    let mut options = CollatorOptions::new();
    options.strength = Some(Strength::Tertiary);
    match Collator::try_new(&Default::default(), options) {
        Ok(c) => Some(c),
        Err(e) => {
            warn!(error = ?e, "root collator unavailable; names sort case-folded");
            None
        }
    }
}

/// Locale-aware title order (root collation, tertiary strength): accents and
/// case are secondary to the base letters, punctuation sorts before letters,
/// lowercase before uppercase.
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    TITLE_COLLATOR.with(|c| match c {
        Some(collator) => collator.compare(a, b),
        None => fold_compare(a, b),
    })
}

fn fold_compare(a: &str, b: &str) -> Ordering {
    let folded = |s: &str| s.chars().flat_map(char::to_lowercase).collect::<Vec<_>>();
    folded(a).cmp(&folded(b)).then_with(|| a.cmp(b))
}

/// Filter, then sort, then paginate. `state.current_page` is clamped in the returned
/// metadata; the caller decides whether to write it back.
pub fn recompute<'a>(catalog: &'a Catalog, state: &ViewState) -> (VisibleSlice<'a>, PageMeta) {
    let (rows, meta, _) = recompute_with_debug(catalog, state);
    (rows, meta)
}

pub fn recompute_with_debug<'a>(catalog: &'a Catalog, state: &ViewState) -> (VisibleSlice<'a>, PageMeta, ViewDebugInfo) {
    let mut rows = filter(&catalog.items, &state.query);
    let after_filter = rows.len();
    sort(&mut rows, state.sort);
    let page = paginate(after_filter, state.page_size, state.current_page);
    let visible: VisibleSlice<'a> = rows[page.range()].to_vec();
    let info = ViewDebugInfo { total: catalog.items.len(), after_filter, page_rows: visible.len() };
    (visible, page.meta(after_filter), info)
}

/// Result of a recompute: the rows to render plus pager/caption metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct View<'a> {
    pub rows: VisibleSlice<'a>,
    pub meta: PageMeta,
}

/// Owns one catalog handle and one view state. Mutators run to completion
/// (`&mut self`), so no two mutations interleave.
pub struct ViewPipeline {
    catalog: Arc<Catalog>,
    state: ViewState,
}

impl ViewPipeline {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self::with_state(catalog, ViewState::default())
    }

    /// Start from an explicit state. A zero page size falls back to the default.
    pub fn with_state(catalog: Arc<Catalog>, mut state: ViewState) -> Self {
        if state.page_size == 0 {
            state.page_size = shelf_core::DEFAULT_PAGE_SIZE;
        }
        let mut me = Self { catalog, state };
        me.clamp_page();
        me
    }

    pub fn catalog(&self) -> &Arc<Catalog> { &self.catalog }
    pub fn state(&self) -> &ViewState { &self.state }

    /// Recompute the current view and write the clamped page back into the state.
    pub fn view(&mut self) -> View<'_> {
        let (rows, meta) = recompute(&self.catalog, &self.state);
        self.state.current_page = meta.current_page;
        metrics::counter!("view_recompute_total", 1u64);
        metrics::gauge!("view_visible_rows", rows.len() as f64);
        debug!(
            query = %self.state.query,
            sort = %self.state.sort,
            page = meta.current_page,
            pages = meta.total_pages,
            rows = rows.len(),
            "view recomputed"
        );
        View { rows, meta }
    }

    pub fn set_query(&mut self, query: impl Into<String>) -> View<'_> {
        self.state.query = query.into();
        self.state.current_page = 1;
        self.view()
    }

    pub fn set_sort(&mut self, key: SortKey) -> View<'_> {
        self.state.sort = key;
        self.state.current_page = 1;
        self.view()
    }

    /// Rejects zero without touching the state.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<View<'_>, ViewError> {
        if page_size == 0 {
            debug!("rejecting zero page size");
            return Err(ViewError::InvalidPageSize(page_size));
        }
        self.state.page_size = page_size;
        self.state.current_page = 1;
        Ok(self.view())
    }

    /// Out-of-range pages are clamped, never rejected.
    pub fn set_page(&mut self, page: usize) -> View<'_> {
        self.state.current_page = page;
        self.view()
    }

    /// Swap in a reloaded catalog. Query, sort and page size survive; the page is clamped.
    pub fn replace_catalog(&mut self, catalog: Arc<Catalog>) -> View<'_> {
        debug!(from = self.catalog.epoch, to = catalog.epoch, "replacing catalog");
        self.catalog = catalog;
        self.view()
    }

    pub fn explain(&self) -> ViewDebugInfo {
        recompute_with_debug(&self.catalog, &self.state).2
    }

    fn clamp_page(&mut self) {
        let count = filter(&self.catalog.items, &self.state.query).len();
        self.state.current_page = paginate(count, self.state.page_size, self.state.current_page).page;
    }
}
