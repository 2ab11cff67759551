//! `Link` header generation for paged collections.

use url::Url;

use crate::Page;

/// Header carrying the total number of elements across all pages.
pub const TOTAL_COUNT_HEADER: &str = "X-Total-Count";

/// Build an RFC 5988 `Link` header value for `page`.
///
/// Relations are emitted in the order `next`, `prev`, `last`, `first`; `next`
/// and `prev` only when such a page exists. Each target keeps the path and
/// the non-paging query parameters of `base` (such as `sort`) and replaces
/// `page` and `size`.
#[must_use]
pub fn link_header<T>(base: &Url, page: &Page<T>) -> String {
    let size = page.request().size();
    let number = page.number();
    let last = page.total_pages().saturating_sub(1);

    let mut links = Vec::with_capacity(4);
    if page.has_next() {
        links.push(relation(base, number.saturating_add(1), size, "next"));
    }
    if page.has_previous() {
        links.push(relation(base, number.saturating_sub(1), size, "prev"));
    }
    links.push(relation(base, last, size, "last"));
    links.push(relation(base, 0, size, "first"));
    links.join(",")
}

fn relation(base: &Url, page: u64, size: u64, rel: &str) -> String {
    let retained: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| key != "page" && key != "size")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut target = base.clone();
    target.set_query(None);
    {
        let mut pairs = target.query_pairs_mut();
        pairs
            .append_pair("page", page.to_string().as_str())
            .append_pair("size", size.to_string().as_str());
        for (key, value) in &retained {
            pairs.append_pair(key, value);
        }
    }
    format!("<{target}>; rel=\"{rel}\"")
}
