//! Offset pagination primitives shared by list endpoints.
//!
//! The crate models three concerns:
//!
//! - [`PageRequest`]: the `page`, `size` and repeated `sort` query parameters
//!   a client sends, parsed from a raw query string so repeated keys survive.
//! - [`Page`]: one slice of results together with the total element count.
//! - [`link_header`]: the RFC 5988 `Link` header advertising `next`, `prev`,
//!   `last` and `first` pages relative to the request URL.
//!
//! # Examples
//!
//! ```
//! use pagination::{Page, PageRequest, link_header};
//! use url::Url;
//!
//! let request = PageRequest::from_query("page=1&size=2&sort=id,desc").expect("valid query");
//! let page = Page::new(vec!["c", "d"], request, 5);
//! assert_eq!(page.total_pages(), 3);
//!
//! let base = Url::parse("http://localhost/api/incomes?page=1&size=2").expect("url");
//! let header = link_header(&base, &page);
//! assert!(header.contains("rel=\"next\""));
//! assert!(header.contains("rel=\"prev\""));
//! ```

mod link;
mod page;
mod request;

pub use link::{TOTAL_COUNT_HEADER, link_header};
pub use page::Page;
pub use request::{
    DEFAULT_PAGE_SIZE, MAX_OFFSET, MAX_PAGE_SIZE, PageRequest, PageRequestError, SortDirection,
    SortOrder,
};
