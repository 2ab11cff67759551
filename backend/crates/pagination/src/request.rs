//! Page request parsing.

use thiserror::Error;

/// Page size used when the client omits `size`.
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Upper bound applied to client supplied page sizes.
pub const MAX_PAGE_SIZE: u64 = 2000;

/// Largest offset a request may address; matches a signed 64-bit SQL bound.
pub const MAX_OFFSET: u64 = u64::MAX >> 1;

/// Errors raised while parsing page request parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageRequestError {
    /// `page` was not a non-negative integer.
    #[error("page must be a non-negative integer, got `{value}`")]
    InvalidPage {
        /// Raw parameter value.
        value: String,
    },
    /// `size` was not a positive integer.
    #[error("size must be a positive integer, got `{value}`")]
    InvalidSize {
        /// Raw parameter value.
        value: String,
    },
    /// `page * size` addresses an offset beyond [`MAX_OFFSET`].
    #[error("page {page} of size {size} is out of range")]
    PageOutOfRange {
        /// Requested page index.
        page: u64,
        /// Effective page size.
        size: u64,
    },
    /// `sort` did not name any property.
    #[error("sort must name at least one property, got `{value}`")]
    InvalidSort {
        /// Raw parameter value.
        value: String,
    },
}

/// Ordering direction for a sort property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Asc,
    /// Largest first.
    Desc,
}

impl SortDirection {
    fn parse(token: &str) -> Option<Self> {
        if token.eq_ignore_ascii_case("asc") {
            Some(Self::Asc)
        } else if token.eq_ignore_ascii_case("desc") {
            Some(Self::Desc)
        } else {
            None
        }
    }

    /// Query-string spelling of the direction.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// A single `property,direction` sort instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder {
    property: String,
    direction: SortDirection,
}

impl SortOrder {
    /// Build a sort order.
    #[must_use]
    pub fn new(property: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            property: property.into(),
            direction,
        }
    }

    /// Property name as supplied by the client.
    #[must_use]
    pub fn property(&self) -> &str {
        self.property.as_str()
    }

    /// Requested direction.
    #[must_use]
    pub const fn direction(&self) -> SortDirection {
        self.direction
    }
}

/// Zero-based page request with optional ordering.
///
/// Parsing accepts the conventional `page`, `size` and repeated `sort`
/// parameters. A `sort` value is a comma separated list of properties with an
/// optional trailing direction, so `sort=name,roll,desc` sorts both `name` and
/// `roll` descending. Unknown parameters are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    size: u64,
    sort: Vec<SortOrder>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_SIZE)
    }
}

impl PageRequest {
    /// Build an unsorted page request, clamping `size` into `1..=MAX_PAGE_SIZE`.
    #[must_use]
    pub fn new(page: u64, size: u64) -> Self {
        Self {
            page,
            size: size.clamp(1, MAX_PAGE_SIZE),
            sort: Vec::new(),
        }
    }

    /// Append a sort order.
    #[must_use]
    pub fn with_sort(mut self, order: SortOrder) -> Self {
        self.sort.push(order);
        self
    }

    /// Parse a raw, still percent-encoded query string.
    ///
    /// # Errors
    ///
    /// Returns [`PageRequestError`] when `page` or `size` is not numeric,
    /// `size` is zero, the page lies beyond [`MAX_OFFSET`], or a `sort`
    /// value names no property.
    pub fn from_query(query: &str) -> Result<Self, PageRequestError> {
        let mut request = Self::default();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match &*key {
                "page" => {
                    request.page = value
                        .trim()
                        .parse()
                        .map_err(|_| PageRequestError::InvalidPage {
                            value: value.clone().into_owned(),
                        })?;
                }
                "size" => {
                    let size: u64 = value.trim().parse().map_err(|_| {
                        PageRequestError::InvalidSize {
                            value: value.clone().into_owned(),
                        }
                    })?;
                    if size == 0 {
                        return Err(PageRequestError::InvalidSize {
                            value: value.into_owned(),
                        });
                    }
                    request.size = size.min(MAX_PAGE_SIZE);
                }
                "sort" => request.sort.extend(parse_sort(&value)?),
                _ => {}
            }
        }
        match request.page.checked_mul(request.size) {
            Some(offset) if offset <= MAX_OFFSET => Ok(request),
            _ => Err(PageRequestError::PageOutOfRange {
                page: request.page,
                size: request.size,
            }),
        }
    }

    /// Zero-based page index.
    #[must_use]
    pub const fn page(&self) -> u64 {
        self.page
    }

    /// Requested page size.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Sort instructions in priority order.
    #[must_use]
    pub fn sort(&self) -> &[SortOrder] {
        self.sort.as_slice()
    }

    /// Number of elements preceding this page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size)
    }
}

fn parse_sort(value: &str) -> Result<Vec<SortOrder>, PageRequestError> {
    let mut tokens: Vec<&str> = value
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect();

    let direction = match tokens.last().copied().and_then(SortDirection::parse) {
        Some(direction) => {
            tokens.pop();
            direction
        }
        None => SortDirection::Asc,
    };

    if tokens.is_empty() {
        return Err(PageRequestError::InvalidSort {
            value: value.to_owned(),
        });
    }

    Ok(tokens
        .into_iter()
        .map(|property| SortOrder::new(property, direction))
        .collect())
}

#[cfg(test)]
mod tests {
    //! Query parsing coverage.

    use super::*;
    use rstest::rstest;

    #[rstest]
    fn empty_query_yields_defaults() {
        let request = PageRequest::from_query("").expect("empty query parses");
        assert_eq!(request, PageRequest::default());
        assert_eq!(request.size(), DEFAULT_PAGE_SIZE);
        assert!(request.sort().is_empty());
    }

    #[rstest]
    fn repeated_sort_parameters_are_kept_in_order() {
        let request =
            PageRequest::from_query("page=2&size=5&sort=name,desc&sort=id").expect("parses");

        assert_eq!(request.page(), 2);
        assert_eq!(request.size(), 5);
        assert_eq!(request.offset(), 10);
        assert_eq!(
            request.sort(),
            &[
                SortOrder::new("name", SortDirection::Desc),
                SortOrder::new("id", SortDirection::Asc),
            ]
        );
    }

    #[rstest]
    fn encoded_commas_are_decoded() {
        let request = PageRequest::from_query("sort=id%2Cdesc").expect("parses");
        assert_eq!(request.sort(), &[SortOrder::new("id", SortDirection::Desc)]);
    }

    #[rstest]
    fn trailing_direction_applies_to_every_property() {
        let request = PageRequest::from_query("sort=name,roll,DESC").expect("parses");
        assert_eq!(
            request.sort(),
            &[
                SortOrder::new("name", SortDirection::Desc),
                SortOrder::new("roll", SortDirection::Desc),
            ]
        );
    }

    #[rstest]
    fn last_addressable_page_is_accepted() {
        let page = MAX_OFFSET / DEFAULT_PAGE_SIZE;
        let request = PageRequest::from_query(&format!("page={page}")).expect("in range");
        assert!(request.offset() <= MAX_OFFSET);
    }

    #[rstest]
    fn oversized_pages_are_clamped() {
        let request = PageRequest::from_query("size=999999").expect("parses");
        assert_eq!(request.size(), MAX_PAGE_SIZE);
    }

    #[rstest]
    #[case("page=-1", PageRequestError::InvalidPage { value: "-1".to_owned() })]
    #[case("page=abc", PageRequestError::InvalidPage { value: "abc".to_owned() })]
    #[case("size=0", PageRequestError::InvalidSize { value: "0".to_owned() })]
    #[case("size=ten", PageRequestError::InvalidSize { value: "ten".to_owned() })]
    #[case("sort=desc", PageRequestError::InvalidSort { value: "desc".to_owned() })]
    #[case("sort=,", PageRequestError::InvalidSort { value: ",".to_owned() })]
    #[case(
        "page=500000000000000000&size=20",
        PageRequestError::PageOutOfRange { page: 500_000_000_000_000_000, size: 20 }
    )]
    #[case(
        "page=18446744073709551615",
        PageRequestError::PageOutOfRange { page: u64::MAX, size: DEFAULT_PAGE_SIZE }
    )]
    fn malformed_parameters_are_rejected(#[case] query: &str, #[case] expected: PageRequestError) {
        let error = PageRequest::from_query(query).expect_err("query should be rejected");
        assert_eq!(error, expected);
    }
}
