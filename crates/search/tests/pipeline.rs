use std::sync::Arc;

use shelf_core::{Catalog, PageMeta, Product, ProductId, SortKey, ViewError, ViewState};
use shelf_search::{compare_prices, compare_titles, filter, recompute, sort, ViewPipeline};

fn product(id: u32, title: &str, price: f64) -> Product {
    Product {
        id: ProductId(serde_json::json!(id)),
        title: title.to_string(),
        price,
        ..Product::default()
    }
}

fn catalog(items: Vec<Product>) -> Arc<Catalog> {
    Arc::new(Catalog::from_items(items))
}

fn numbered(n: u32) -> Arc<Catalog> {
    catalog((1..=n).map(|i| product(i, &format!("Item {}", i), i as f64)).collect())
}

fn ids(rows: &[&Product]) -> Vec<String> {
    rows.iter().map(|p| p.id.to_string()).collect()
}

#[test]
fn filter_is_case_insensitive_and_exact_on_both_sides() {
    let items = vec![
        product(1, "Classic Shirt", 1.0),
        product(2, "Hat", 1.0),
        product(3, "T-SHIRT Pack", 1.0),
        product(4, "shirtless mannequin", 1.0),
        product(5, "Shoe", 1.0),
    ];
    for q in ["shirt", "SHIRT", "  Shirt ", "h", "", "zzz", "s"] {
        let kept = filter(&items, q);
        let needle = q.trim().to_lowercase();
        for p in &items {
            let matches = p.title.to_lowercase().contains(&needle);
            assert_eq!(kept.iter().any(|k| std::ptr::eq(*k, p)), matches, "query {:?} title {:?}", q, p.title);
        }
    }
    assert_eq!(ids(&filter(&items, "shirt")), vec!["1", "3", "4"]);
}

#[test]
fn price_sorts_are_ordered_and_stable() {
    let items = vec![product(1, "a", 10.0), product(2, "b", 5.0), product(3, "c", 10.0), product(4, "d", 3.0), product(5, "e", 5.0)];
    let mut rows: Vec<&Product> = items.iter().collect();
    sort(&mut rows, SortKey::PriceAsc);
    assert_eq!(ids(&rows), vec!["4", "2", "5", "1", "3"]);

    let mut rows: Vec<&Product> = items.iter().collect();
    sort(&mut rows, SortKey::PriceDesc);
    assert_eq!(ids(&rows), vec!["1", "3", "2", "5", "4"]);
    assert!(rows.windows(2).all(|w| w[0].price >= w[1].price));
}

#[test]
fn price_desc_ties_keep_input_order() {
    let cat = catalog(vec![product(1, "first ten", 10.0), product(2, "five", 5.0), product(3, "second ten", 10.0), product(4, "three", 3.0)]);
    let state = ViewState { sort: SortKey::PriceDesc, ..ViewState::default() };
    let (rows, _) = recompute(&cat, &state);
    let titles: Vec<_> = rows.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["first ten", "second ten", "five", "three"]);
}

#[test]
fn signed_zero_prices_tie_and_keep_input_order() {
    assert_eq!(compare_prices(-0.0, 0.0), std::cmp::Ordering::Equal);
    let items = vec![product(1, "zero", 0.0), product(2, "negative zero", -0.0), product(3, "one", 1.0)];
    let mut rows: Vec<&Product> = items.iter().collect();
    sort(&mut rows, SortKey::PriceAsc);
    assert_eq!(ids(&rows), vec!["1", "2", "3"]);
    let mut rows: Vec<&Product> = items.iter().collect();
    sort(&mut rows, SortKey::PriceDesc);
    assert_eq!(ids(&rows), vec!["3", "1", "2"]);
}

#[test]
fn accented_and_punctuated_titles_follow_locale_order() {
    use std::cmp::Ordering::Less;
    assert_eq!(compare_titles("école", "zebra"), Less);
    assert_eq!(compare_titles("Éclair", "Fudge"), Less);
    assert_eq!(compare_titles("~Deal", "apple"), Less);
    assert_eq!(compare_titles("Cafe", "Café"), Less);
    assert_eq!(compare_titles("Café", "Cake"), Less);

    let items = vec![product(1, "Zebra Mug", 1.0), product(2, "Éclair Box", 1.0), product(3, "Café Table", 1.0), product(4, "Fudge", 1.0)];
    let mut rows: Vec<&Product> = items.iter().collect();
    sort(&mut rows, SortKey::NameAsc);
    assert_eq!(ids(&rows), vec!["3", "2", "4", "1"]);
}

#[test]
fn name_sorts_ignore_case_and_keep_ties() {
    let items = vec![product(1, "banana", 1.0), product(2, "Apple", 1.0), product(3, "cherry", 1.0), product(4, "apple", 1.0), product(5, "banana", 2.0)];
    let mut rows: Vec<&Product> = items.iter().collect();
    sort(&mut rows, SortKey::NameAsc);
    assert_eq!(ids(&rows), vec!["4", "2", "1", "5", "3"]);

    let mut rows: Vec<&Product> = items.iter().collect();
    sort(&mut rows, SortKey::NameDesc);
    assert_eq!(ids(&rows), vec!["3", "1", "5", "2", "4"]);

    assert_eq!(compare_titles("apple", "Banana"), std::cmp::Ordering::Less);
    assert_eq!(compare_titles("same", "same"), std::cmp::Ordering::Equal);
}

#[test]
fn none_keeps_catalog_order() {
    let cat = catalog(vec![product(3, "c", 3.0), product(1, "a", 1.0), product(2, "b", 2.0)]);
    let (rows, _) = recompute(&cat, &ViewState::default());
    assert_eq!(ids(&rows), vec!["3", "1", "2"]);
}

#[test]
fn recompute_is_idempotent() {
    let cat = numbered(37);
    let state = ViewState { query: "1".into(), sort: SortKey::NameDesc, page_size: 4, current_page: 2 };
    let first = recompute(&cat, &state);
    let second = recompute(&cat, &state);
    assert_eq!(first, second);

    let mut pipe = ViewPipeline::with_state(Arc::clone(&cat), state.clone());
    let a = pipe.view();
    let (a_rows, a_meta) = (ids(&a.rows), a.meta);
    let b = pipe.view();
    assert_eq!((ids(&b.rows), b.meta), (a_rows, a_meta));
    assert_eq!(pipe.state(), &state);
}

#[test]
fn empty_catalog_shows_one_empty_page() {
    let mut pipe = ViewPipeline::new(catalog(Vec::new()));
    let expected = PageMeta { current_page: 1, total_pages: 1, display_start: 0, display_end: 0, total_count: 0 };
    assert_eq!(pipe.view().meta, expected);
    assert!(pipe.set_query("anything").rows.is_empty());
    assert_eq!(pipe.set_sort(SortKey::PriceDesc).meta, expected);
    let v = pipe.set_page(7);
    assert!(v.rows.is_empty());
    assert_eq!(v.meta, expected);
}

#[test]
fn basic_pagination_third_page() {
    let mut pipe = ViewPipeline::new(numbered(25));
    let v = pipe.set_page(3);
    assert_eq!(ids(&v.rows), vec!["21", "22", "23", "24", "25"]);
    assert_eq!(v.meta, PageMeta { current_page: 3, total_pages: 3, display_start: 21, display_end: 25, total_count: 25 });
}

#[test]
fn search_resets_to_first_page() {
    // 30 items; ids 2, 5, 7, 10, ... (i % 5 in {0, 2}) are shirts: 12 matches.
    let items: Vec<Product> = (1..=30)
        .map(|i| if i % 5 == 0 || i % 5 == 2 { product(i, &format!("Shirt {}", i), 1.0) } else { product(i, &format!("Mug {}", i), 1.0) })
        .collect();
    let matches: Vec<String> = items.iter().filter(|p| p.title.starts_with("Shirt")).map(|p| p.id.to_string()).collect();
    assert_eq!(matches.len(), 12);

    let mut pipe = ViewPipeline::new(catalog(items));
    assert_eq!(pipe.set_page(3).meta.current_page, 3);
    let v = pipe.set_query("shirt");
    assert_eq!(v.meta.current_page, 1);
    assert_eq!(v.meta.total_pages, 2);
    assert_eq!(v.meta.total_count, 12);
    assert_eq!(ids(&v.rows), matches[..10].to_vec());
    assert_eq!(pipe.state().current_page, 1);
}

#[test]
fn query_sort_and_page_size_always_reset_page() {
    let mut pipe = ViewPipeline::new(numbered(100));
    pipe.set_page(5);
    assert_eq!(pipe.set_query("").meta.current_page, 1);
    pipe.set_page(5);
    assert_eq!(pipe.set_sort(SortKey::PriceAsc).meta.current_page, 1);
    pipe.set_page(5);
    assert_eq!(pipe.set_page_size(20).unwrap().meta.current_page, 1);
    assert_eq!(pipe.state().page_size, 20);
}

#[test]
fn zero_page_size_is_rejected_without_state_change() {
    let mut pipe = ViewPipeline::new(numbered(30));
    pipe.set_page(2);
    let before = pipe.state().clone();
    assert_eq!(pipe.set_page_size(0).unwrap_err(), ViewError::InvalidPageSize(0));
    assert_eq!(pipe.state(), &before);
}

#[test]
fn set_page_clamps_into_range() {
    let mut pipe = ViewPipeline::new(numbered(25));
    assert_eq!(pipe.set_page(0).meta.current_page, 1);
    let v = pipe.set_page(42);
    assert_eq!(v.meta.current_page, 3);
    assert_eq!(v.rows.len(), 5);
    assert_eq!(pipe.state().current_page, 3);
}

#[test]
fn narrowing_query_never_leaves_a_dangling_page() {
    let mut pipe = ViewPipeline::with_state(numbered(50), ViewState { query: "".into(), sort: SortKey::None, page_size: 10, current_page: 5 });
    assert_eq!(pipe.state().current_page, 5);
    // Item 1, Item 10..19: 11 matches, two pages.
    let v = pipe.set_query("item 1");
    assert_eq!(v.meta.total_pages, 2);
    assert_eq!(v.meta.current_page, 1);
}

#[test]
fn reload_keeps_view_parameters_and_clamps() {
    let mut pipe = ViewPipeline::new(numbered(40));
    pipe.set_sort(SortKey::PriceDesc);
    pipe.set_page(4);
    let v = pipe.replace_catalog(numbered(15));
    assert_eq!(v.meta.total_pages, 2);
    assert_eq!(v.meta.current_page, 2);
    assert_eq!(ids(&v.rows), vec!["5", "4", "3", "2", "1"]);
    assert_eq!(pipe.state().sort, SortKey::PriceDesc);
}

#[test]
fn explain_reports_stage_counts() {
    let mut pipe = ViewPipeline::new(numbered(25));
    pipe.set_query("item 2");
    let info = pipe.explain();
    // Item 2, Item 20..25.
    assert_eq!(info.total, 25);
    assert_eq!(info.after_filter, 7);
    assert_eq!(info.page_rows, 7);
}

#[test]
fn starting_state_is_clamped_and_sanitized() {
    let pipe = ViewPipeline::with_state(numbered(5), ViewState { page_size: 0, current_page: 9, ..ViewState::default() });
    assert_eq!(pipe.state().page_size, 10);
    assert_eq!(pipe.state().current_page, 1);
}
