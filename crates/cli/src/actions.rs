//! Line commands for `shelfctl browse`.

use shelf_core::{SortKey, ALLOWED_PAGE_SIZES};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// `/text` or `search text`; `search` alone clears the query.
    Query(String),
    Sort(SortKey),
    PageSize(usize),
    Page(usize),
    Next,
    Prev,
    Explain,
    Reload,
    Help,
    Quit,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Query(_) => "query",
            Action::Sort(_) => "sort",
            Action::PageSize(_) => "size",
            Action::Page(_) | Action::Next | Action::Prev => "page",
            Action::Explain => "explain",
            Action::Reload => "reload",
            Action::Help => "help",
            Action::Quit => "quit",
        }
    }
}

pub const HELP: &str = "\
commands:
  /TEXT | search [TEXT]   filter titles (empty clears)
  sort KEY                none, price-asc, price-desc, name-asc, name-desc
  size N                  rows per page (10, 20, 50)
  page N | next | prev    move between pages
  explain                 show filter/page counts
  reload                  fetch the catalog again
  help | quit";

/// Clap value parser and `size` command share this check.
pub fn parse_page_size(s: &str) -> Result<usize, String> {
    let n: usize = s.trim().parse().map_err(|_| format!("not a number: {}", s.trim()))?;
    if ALLOWED_PAGE_SIZES.contains(&n) {
        Ok(n)
    } else {
        Err(format!("page size must be one of {:?}", ALLOWED_PAGE_SIZES))
    }
}

pub fn parse_action(line: &str) -> Result<Action, String> {
    let line = line.trim();
    if let Some(q) = line.strip_prefix('/') {
        return Ok(Action::Query(q.to_string()));
    }
    let (cmd, rest) = match line.split_once(char::is_whitespace) {
        Some((c, r)) => (c, r.trim()),
        None => (line, ""),
    };
    match cmd.to_ascii_lowercase().as_str() {
        "search" | "q" => Ok(Action::Query(rest.to_string())),
        "sort" | "s" => rest.parse::<SortKey>().map(Action::Sort),
        "size" => parse_page_size(rest).map(Action::PageSize),
        "page" | "p" => rest
            .parse::<usize>()
            .map(Action::Page)
            .map_err(|_| format!("not a page number: {}", rest)),
        "next" | "n" => Ok(Action::Next),
        "prev" => Ok(Action::Prev),
        "explain" => Ok(Action::Explain),
        "reload" => Ok(Action::Reload),
        "help" | "?" | "" => Ok(Action::Help),
        "quit" | "exit" => Ok(Action::Quit),
        other => Err(format!("unknown command: {} (try help)", other)),
    }
}
