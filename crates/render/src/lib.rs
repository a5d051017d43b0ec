//! Shelf render: turns a visible slice plus page metadata into display-ready
//! rows, a caption and pager buttons. Output backends live in [`text`] and
//! [`html`]; nothing here feeds back into the view state.

#![forbid(unsafe_code)]

use serde::Serialize;
use shelf_core::images::is_renderable;
use shelf_core::{PageMeta, Product};
use smallvec::SmallVec;
use tracing::debug;

pub mod html;
pub mod text;

pub const MAX_DISPLAY_IMAGES: usize = 3;
pub const FALLBACK_IMAGE: &str = "https://dummyimage.com/60x60/667eea/ffffff&text=No+Image";
pub const DESCRIPTION_MAX_CHARS: usize = 120;
pub const NO_CATEGORY: &str = "N/A";

pub type DisplayImages = SmallVec<[String; MAX_DISPLAY_IMAGES]>;

/// One table row, already reduced to what a presenter shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowView {
    pub id: String,
    /// Renderable URLs only, at most [`MAX_DISPLAY_IMAGES`]; exactly one fallback when none qualify.
    pub images: DisplayImages,
    /// True when `images` holds the fallback instead of product images.
    pub images_fallback: bool,
    pub title: String,
    pub price: String,
    pub category: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageButton {
    pub number: usize,
    pub active: bool,
}

/// Everything a presenter needs for one recompute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView {
    pub rows: Vec<RowView>,
    pub meta: PageMeta,
    pub caption: String,
    /// Empty when there is a single page.
    pub pager: Vec<PageButton>,
}

/// What the viewer shows around the table.
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Loading,
    Failed(String),
    Ready(PageView),
}

pub fn present(rows: &[&Product], meta: PageMeta) -> PageView {
    debug!(rows = rows.len(), page = meta.current_page, pages = meta.total_pages, "presenting page");
    PageView {
        rows: rows.iter().map(|p| row_view(p)).collect(),
        meta,
        caption: caption(&meta),
        pager: pager(&meta),
    }
}

pub fn row_view(p: &Product) -> RowView {
    let (images, images_fallback) = display_images(&p.images);
    RowView {
        id: p.id.to_string(),
        images,
        images_fallback,
        title: p.title.clone(),
        price: format_price(p.price),
        category: p.category_name().unwrap_or(NO_CATEGORY).to_string(),
        description: truncate_text(p.description.as_deref().unwrap_or(""), DESCRIPTION_MAX_CHARS),
    }
}

/// Renderable URLs capped for display, or the single fallback.
pub fn display_images(images: &[String]) -> (DisplayImages, bool) {
    let picked: DisplayImages = images.iter().filter(|u| is_renderable(u)).take(MAX_DISPLAY_IMAGES).cloned().collect();
    if picked.is_empty() {
        let mut only = DisplayImages::new();
        only.push(FALLBACK_IMAGE.to_string());
        (only, true)
    } else {
        (picked, false)
    }
}

/// `$90`, `$12.5`: shortest form of the number, like the API prints it.
pub fn format_price(price: f64) -> String {
    if price.fract() == 0.0 && price.abs() < 1e15 {
        format!("${}", price as i64)
    } else {
        format!("${}", price)
    }
}

/// Cut to `max` characters and append `...` when longer.
pub fn truncate_text(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

pub fn caption(meta: &PageMeta) -> String {
    format!("Showing {} - {} of {} products", meta.display_start, meta.display_end, meta.total_count)
}

pub fn pager(meta: &PageMeta) -> Vec<PageButton> {
    if meta.total_pages <= 1 {
        return Vec::new();
    }
    (1..=meta.total_pages).map(|number| PageButton { number, active: number == meta.current_page }).collect()
}
