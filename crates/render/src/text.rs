//! Fixed-width terminal table.

#![forbid(unsafe_code)]

use shelf_core::columns::{columns_for_width, ColumnKind, ColumnSpec};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::{PageView, RowView};

pub const DEFAULT_WIDTH: usize = 130;

pub fn render_table(page: &PageView, max_width: usize) -> String {
    let cols = columns_for_width(max_width);
    let mut out = String::new();
    let header: Vec<String> = cols.iter().map(|c| fit(c.label, c.width)).collect();
    out.push_str(header.join(" ").trim_end());
    out.push('\n');
    let rule: Vec<String> = cols.iter().map(|c| "-".repeat(c.width)).collect();
    out.push_str(&rule.join(" "));
    out.push('\n');
    if page.rows.is_empty() {
        out.push_str("(no data)\n");
    }
    for row in &page.rows {
        let cells: Vec<String> = cols.iter().map(|c| fit(&cell(row, c), c.width)).collect();
        out.push_str(cells.join(" ").trim_end());
        out.push('\n');
    }
    out.push_str(&page.caption);
    out.push('\n');
    let pager = render_pager(page);
    if !pager.is_empty() {
        out.push_str(&pager);
        out.push('\n');
    }
    out
}

/// `1 [2] 3`: the active page in brackets. Empty for a single page.
pub fn render_pager(page: &PageView) -> String {
    page.pager
        .iter()
        .map(|b| if b.active { format!("[{}]", b.number) } else { b.number.to_string() })
        .collect::<Vec<_>>()
        .join(" ")
}

fn cell(row: &RowView, spec: &ColumnSpec) -> String {
    match spec.kind {
        ColumnKind::Id => row.id.clone(),
        ColumnKind::Images if row.images_fallback => "none".to_string(),
        ColumnKind::Images => format!("{} img", row.images.len()),
        ColumnKind::Title => row.title.clone(),
        ColumnKind::Price => row.price.clone(),
        ColumnKind::Category => row.category.clone(),
        ColumnKind::Description => row.description.replace(['\n', '\r', '\t'], " "),
    }
}

/// Pad or cut to exactly `width` terminal cells; cut cells end in `~`.
/// Wide characters (CJK, emoji) count as two cells.
fn fit(s: &str, width: usize) -> String {
    let len = UnicodeWidthStr::width(s);
    if len <= width {
        let mut out = s.to_string();
        out.extend(std::iter::repeat(' ').take(width - len));
        return out;
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('~');
    // A wide char that did not fit leaves a one-cell gap.
    out.extend(std::iter::repeat(' ').take(width - 1 - used));
    out
}
