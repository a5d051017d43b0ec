//! Product table columns.
//!
//! Stable column ids and specs (label, width) shared by every presenter, so a
//! terminal table and an HTML table agree on what is shown and in which order.

#![forbid(unsafe_code)]

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    Id,
    Images,
    Title,
    Price,
    Category,
    Description,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ColumnSpec {
    pub kind: ColumnKind,
    pub label: &'static str,
    /// Width in terminal cells; HTML output ignores it.
    pub width: usize,
}

fn col(kind: ColumnKind, label: &'static str, width: usize) -> ColumnSpec {
    ColumnSpec { kind, label, width }
}

/// Full column set in display order.
pub fn product_columns() -> Vec<ColumnSpec> {
    vec![
        col(ColumnKind::Id, "ID", 6),
        col(ColumnKind::Images, "Images", 8),
        col(ColumnKind::Title, "Title", 32),
        col(ColumnKind::Price, "Price", 10),
        col(ColumnKind::Category, "Category", 16),
        col(ColumnKind::Description, "Description", 48),
    ]
}

/// Columns that fit in `max_width` terminal cells, dropping from the right.
/// Id and Title are always kept.
pub fn columns_for_width(max_width: usize) -> Vec<ColumnSpec> {
    let mut cols = product_columns();
    let total = |cols: &[ColumnSpec]| cols.iter().map(|c| c.width + 1).sum::<usize>();
    while total(&cols) > max_width {
        match cols.iter().rposition(|c| !matches!(c.kind, ColumnKind::Id | ColumnKind::Title)) {
            Some(ix) => { cols.remove(ix); }
            None => break,
        }
    }
    cols
}
