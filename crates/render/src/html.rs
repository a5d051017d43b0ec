//! HTML fragments for the product table, pager and status screens.
//! All product text is escaped; image URLs were already limited to http(s).

#![forbid(unsafe_code)]

use crate::{PageView, RowView, Screen, FALLBACK_IMAGE};

pub const TABLE_COLUMNS: usize = 6;

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render_row(row: &RowView) -> String {
    let fallback = escape_html(FALLBACK_IMAGE);
    let imgs: String = row
        .images
        .iter()
        .map(|src| {
            format!(
                r#"<img src="{}" class="product-image" loading="lazy" referrerpolicy="no-referrer" onerror="this.onerror=null;this.src='{}'">"#,
                escape_html(src),
                fallback
            )
        })
        .collect();
    format!(
        concat!(
            "<tr>",
            "<td>{}</td>",
            r#"<td><div class="product-images">{}</div></td>"#,
            "<td><strong>{}</strong></td>",
            r#"<td><span class="price">{}</span></td>"#,
            r#"<td><span class="category-badge">{}</span></td>"#,
            r#"<td class="description">{}</td>"#,
            "</tr>"
        ),
        escape_html(&row.id),
        imgs,
        escape_html(&row.title),
        escape_html(&row.price),
        escape_html(&row.category),
        escape_html(&row.description),
    )
}

pub fn render_rows(page: &PageView) -> String {
    if page.rows.is_empty() {
        return format!(r#"<tr><td colspan="{}" class="empty">No data</td></tr>"#, TABLE_COLUMNS);
    }
    page.rows.iter().map(render_row).collect::<Vec<_>>().join("\n")
}

/// One button per page; nothing at all for a single page.
pub fn render_pager(page: &PageView) -> String {
    page.pager
        .iter()
        .map(|b| {
            let class = if b.active { "active" } else { "" };
            format!(r#"<button class="{}" data-page="{}">{}</button>"#, class, b.number, b.number)
        })
        .collect()
}

pub fn render_page(page: &PageView) -> String {
    format!(
        concat!(
            r#"<div class="table-container"><table><thead><tr>"#,
            "<th>ID</th><th>Images</th><th>Title</th><th>Price</th><th>Category</th><th>Description</th>",
            "</tr></thead><tbody>\n{}\n</tbody></table></div>\n",
            r#"<div id="paginationInfo">{}</div>"#,
            "\n",
            r#"<div id="pagination">{}</div>"#,
            "\n"
        ),
        render_rows(page),
        escape_html(&page.caption),
        render_pager(page),
    )
}

pub fn render_screen(screen: &Screen) -> String {
    match screen {
        Screen::Loading => r#"<div id="loading">Loading products...</div>"#.to_string() + "\n",
        Screen::Failed(reason) => format!(r#"<div id="error">Could not load products: {}</div>"#, escape_html(reason)) + "\n",
        Screen::Ready(page) => render_page(page),
    }
}
