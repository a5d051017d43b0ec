use serde_json::json;
use shelf_core::{PageMeta, Product};
use shelf_render::html::{escape_html, render_page, render_rows, render_screen};
use shelf_render::text::{render_pager, render_table};
use shelf_render::{caption, display_images, format_price, present, truncate_text, Screen, FALLBACK_IMAGE, NO_CATEGORY};

fn meta(current_page: usize, total_pages: usize, display_start: usize, display_end: usize, total_count: usize) -> PageMeta {
    PageMeta { current_page, total_pages, display_start, display_end, total_count }
}

fn raw(v: serde_json::Value) -> Product {
    Product::from_raw(v)
}

#[test]
fn malformed_images_get_exactly_one_fallback() {
    let p = raw(json!({ "id": 9, "title": "Broken", "price": 1, "images": "[\"https://x.test/a.png\"" }));
    assert!(p.images.is_empty());
    let page = present(&[&p], meta(1, 1, 1, 1, 1));
    assert_eq!(page.rows[0].images.as_slice(), &[FALLBACK_IMAGE.to_string()]);
    assert!(page.rows[0].images_fallback);
}

#[test]
fn images_are_filtered_to_http_and_capped() {
    let imgs: Vec<String> = ["ftp://x/a", "https://x.test/1", "not a url", "http://x.test/2", "https://x.test/3", "https://x.test/4"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let (shown, fallback) = display_images(&imgs);
    assert!(!fallback);
    assert_eq!(shown.as_slice(), &["https://x.test/1".to_string(), "http://x.test/2".to_string(), "https://x.test/3".to_string()]);

    let (only, fallback) = display_images(&["data:image/png;base64,AAAA".to_string()]);
    assert!(fallback);
    assert_eq!(only.len(), 1);
}

#[test]
fn row_fields_are_display_ready() {
    let long = "x".repeat(130);
    let p = raw(json!({ "id": 1, "title": "Hoodie", "price": 12.5, "images": [], "description": long }));
    let row = &present(&[&p], meta(1, 1, 1, 1, 1)).rows[0];
    assert_eq!(row.id, "1");
    assert_eq!(row.price, "$12.5");
    assert_eq!(row.category, NO_CATEGORY);
    assert_eq!(row.description.chars().count(), 123);
    assert!(row.description.ends_with("..."));
}

#[test]
fn text_helpers() {
    assert_eq!(format_price(90.0), "$90");
    assert_eq!(format_price(0.99), "$0.99");
    assert_eq!(truncate_text("short", 10), "short");
    assert_eq!(truncate_text("exactly10!", 10), "exactly10!");
    assert_eq!(truncate_text("héllo wörld", 5), "héllo...");
    assert_eq!(truncate_text("", 3), "");
}

#[test]
fn caption_and_pager() {
    let m = meta(2, 3, 11, 20, 25);
    assert_eq!(caption(&m), "Showing 11 - 20 of 25 products");
    let page = present(&[], m);
    assert_eq!(page.pager.len(), 3);
    assert_eq!(page.pager.iter().filter(|b| b.active).map(|b| b.number).collect::<Vec<_>>(), vec![2]);
    assert_eq!(render_pager(&page), "1 [2] 3");

    let single = present(&[], meta(1, 1, 0, 0, 0));
    assert!(single.pager.is_empty());
    assert_eq!(single.caption, "Showing 0 - 0 of 0 products");
}

#[test]
fn html_escapes_product_text() {
    assert_eq!(escape_html(r#"<b>"Tom" & 'Jerry'</b>"#), "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;");
    let p = raw(json!({ "id": 3, "title": "<script>alert(1)</script>", "price": 5, "images": ["https://x.test/a.png"], "category": { "name": "A&B" } }));
    let html = render_page(&present(&[&p], meta(1, 1, 1, 1, 1)));
    assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(!html.contains("<script>"));
    assert!(html.contains("A&amp;B"));
    assert!(html.contains(r#"src="https://x.test/a.png""#));
    assert!(html.contains("Showing 1 - 1 of 1 products"));
}

#[test]
fn empty_slice_renders_no_data() {
    let page = present(&[], meta(1, 1, 0, 0, 0));
    assert!(render_rows(&page).contains("No data"));
    assert!(render_table(&page, 130).contains("(no data)"));
}

#[test]
fn status_screens() {
    assert!(render_screen(&Screen::Loading).contains("Loading"));
    let failed = render_screen(&Screen::Failed("status: upstream answered 500".into()));
    assert!(failed.contains("id=\"error\""));
    assert!(failed.contains("500"));
}

#[test]
fn terminal_table_lists_rows_and_caption() {
    let a = raw(json!({ "id": 1, "title": "Shirt", "price": 10, "images": ["https://x.test/a.png"], "category": { "name": "Clothes" } }));
    let b = raw(json!({ "id": 2, "title": "Mug", "price": 4, "images": "oops" }));
    let out = render_table(&present(&[&a, &b], meta(1, 2, 1, 2, 3)), 130);
    let lines: Vec<&str> = out.lines().collect();
    assert!(lines[0].starts_with("ID"));
    assert!(lines[2].contains("Shirt") && lines[2].contains("$10") && lines[2].contains("1 img") && lines[2].contains("Clothes"));
    assert!(lines[3].contains("Mug") && lines[3].contains("none") && lines[3].contains("N/A"));
    assert_eq!(lines[4], "Showing 1 - 2 of 3 products");
    assert_eq!(lines[5], "[1] 2");
}

#[test]
fn wide_titles_keep_columns_aligned() {
    use unicode_width::UnicodeWidthStr;
    let a = raw(json!({ "id": 1, "title": "Shirt", "price": 10 }));
    let b = raw(json!({ "id": 2, "title": "和風シャツ", "price": 12 }));
    let c = raw(json!({ "id": 3, "title": "長い名前の商品です長い名前の商品です長い名前の商品です", "price": 14 }));
    let out = render_table(&present(&[&a, &b, &c], meta(1, 1, 1, 3, 3)), 130);
    let lines: Vec<&str> = out.lines().collect();
    let price_col = |line: &str| line.find('$').map(|ix| UnicodeWidthStr::width(&line[..ix]));
    let expected = price_col(lines[2]);
    assert!(expected.is_some());
    assert_eq!(price_col(lines[3]), expected);
    assert_eq!(price_col(lines[4]), expected);
    assert!(lines[4].contains('~'));
}
