//! Pagination handling for the GitLab API.
//!
//! GitLab paginates list endpoints two ways: offset-based, described by the
//! `x-page`/`x-next-page` family of response headers, and keyset-based,
//! described by an opaque `rel="next"` URL in the `Link` header. [`Page`]
//! captures both, and [`Pager`] walks either kind behind a single
//! page-fetching closure.

use crate::errors::GitLabResult;
use futures::future::BoxFuture;
use futures::stream::Stream;
use reqwest::header::HeaderMap;
use serde::Serialize;
use std::collections::VecDeque;

/// Offset pagination state parsed from response headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageInfo {
    /// Current page number (1-indexed).
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
    /// Next page number; absent on the last page.
    pub next_page: Option<u32>,
    /// Previous page number.
    pub prev_page: Option<u32>,
    /// Total item count. GitLab omits this past 10,000 items.
    pub total: Option<u64>,
    /// Total page count.
    pub total_pages: Option<u32>,
}

impl PageInfo {
    /// Parses offset pagination headers from a response.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            page: header_number(headers, "x-page"),
            per_page: header_number(headers, "x-per-page"),
            next_page: header_number(headers, "x-next-page"),
            prev_page: header_number(headers, "x-prev-page"),
            total: header_number(headers, "x-total"),
            total_pages: header_number(headers, "x-total-pages"),
        }
    }
}

fn header_number<N: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<N> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse().ok())
}

/// Pagination links parsed from the `Link` header (RFC 8288).
///
/// Keyset-paginated endpoints only ever advance through `next`; the other
/// relations are kept for completeness.
#[derive(Debug, Clone, Default)]
pub struct PaginationLinks {
    /// URL for the next page.
    pub next: Option<String>,
    /// URL for the previous page.
    pub prev: Option<String>,
    /// URL for the first page.
    pub first: Option<String>,
    /// URL for the last page.
    pub last: Option<String>,
}

impl PaginationLinks {
    /// Parses pagination links from a `Link` header value.
    pub fn from_header(header_value: &str) -> Self {
        let mut links = Self::default();

        for part in header_value.split(',') {
            let mut url = None;
            let mut rel = None;

            for segment in part.split(';') {
                let segment = segment.trim();
                if segment.starts_with('<') && segment.ends_with('>') {
                    url = Some(segment[1..segment.len() - 1].to_string());
                } else if let Some(value) = segment.strip_prefix("rel=") {
                    rel = Some(value.trim_matches('"').to_string());
                }
            }

            if let (Some(url), Some(rel)) = (url, rel) {
                match rel.as_str() {
                    "next" => links.next = Some(url),
                    "prev" => links.prev = Some(url),
                    "first" => links.first = Some(url),
                    "last" => links.last = Some(url),
                    _ => {}
                }
            }
        }

        links
    }

    /// Parses pagination links from response headers.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get("link")
            .and_then(|v| v.to_str().ok())
            .map(Self::from_header)
            .unwrap_or_default()
    }

    /// Returns true if there is a next page.
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }
}

/// Position of the next page to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageCursor {
    /// Offset-based cursor: the next page number.
    Offset(u32),
    /// Keyset-based cursor: the opaque next-page URL.
    Keyset(String),
}

/// A single page of results.
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// The items in this page.
    pub items: Vec<T>,
    /// Offset pagination headers.
    pub info: PageInfo,
    /// `Link` header relations.
    pub links: PaginationLinks,
}

impl<T> Page<T> {
    /// Creates a new page.
    pub fn new(items: Vec<T>, info: PageInfo, links: PaginationLinks) -> Self {
        Self { items, info, links }
    }

    /// Builds a page from a decoded item list and response headers.
    pub fn from_response(items: Vec<T>, headers: &HeaderMap) -> Self {
        Self::new(
            items,
            PageInfo::from_headers(headers),
            PaginationLinks::from_headers(headers),
        )
    }

    /// Returns the cursor for the page after this one, if any.
    ///
    /// A keyset `next` link wins over the offset `x-next-page` header when
    /// both are present, matching what the server intends for keyset
    /// endpoints (which also emit offset headers).
    pub fn next_cursor(&self) -> Option<PageCursor> {
        if let Some(ref url) = self.links.next {
            return Some(PageCursor::Keyset(url.clone()));
        }
        self.info.next_page.map(PageCursor::Offset)
    }

    /// Returns true if there is a next page.
    pub fn has_next(&self) -> bool {
        self.next_cursor().is_some()
    }

    /// Returns the number of items in this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the page is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consumes the page and returns the items.
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Pagination parameters shared by list endpoints.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PaginationParams {
    /// Page number (1-indexed).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Items per page (GitLab caps this at 100).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

impl PaginationParams {
    /// Creates new pagination parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page number.
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Sets items per page, capped at 100.
    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page.min(100));
        self
    }
}

/// The type of page-fetching closures driven by [`Pager`].
///
/// `None` means "fetch the first page"; afterwards the pager feeds back the
/// cursor taken from the previous page.
pub type PageFetcher<T> =
    Box<dyn FnMut(Option<PageCursor>) -> BoxFuture<'static, GitLabResult<Page<T>>> + Send>;

/// Generic iterator over a paginated endpoint.
///
/// Pages are fetched strictly sequentially; there is no prefetching. Two
/// consumption modes exist: [`Pager::collect_all`] aggregates every page and
/// aborts on the first error, while [`Pager::into_stream`] yields items
/// lazily and keeps going after errors (see the method docs for the hazard
/// that implies).
pub struct Pager<T> {
    fetch_fn: PageFetcher<T>,
    cursor: Option<PageCursor>,
    exhausted: bool,
}

impl<T: Send + 'static> Pager<T> {
    /// Creates a new pager from a page-fetching closure.
    pub fn new<F>(fetch_fn: F) -> Self
    where
        F: FnMut(Option<PageCursor>) -> BoxFuture<'static, GitLabResult<Page<T>>> + Send + 'static,
    {
        Self {
            fetch_fn: Box::new(fetch_fn),
            cursor: None,
            exhausted: false,
        }
    }

    /// Fetches the next page, or `None` once every page has been seen.
    ///
    /// On error the cursor does not advance: calling again re-fetches the
    /// same page.
    pub async fn next_page(&mut self) -> GitLabResult<Option<Page<T>>> {
        if self.exhausted {
            return Ok(None);
        }

        let page = (self.fetch_fn)(self.cursor.clone()).await?;

        self.cursor = page.next_cursor();
        if self.cursor.is_none() {
            self.exhausted = true;
        }

        Ok(Some(page))
    }

    /// Collects all items from all pages, in order.
    ///
    /// The first fetch error aborts the walk and becomes the terminal error.
    pub async fn collect_all(mut self) -> GitLabResult<Vec<T>> {
        let mut all_items = Vec::new();

        while let Some(page) = self.next_page().await? {
            all_items.extend(page.into_items());
        }

        Ok(all_items)
    }

    /// Returns true if there are more pages.
    pub fn has_more(&self) -> bool {
        !self.exhausted
    }

    /// Converts the pager into a lazy per-item stream.
    ///
    /// Each element is a `GitLabResult<T>`. A fetch error is yielded as an
    /// `Err` element and the cursor stays put, so a consumer that keeps
    /// polling will retry the same page indefinitely. Stop consuming (or
    /// filter with care) if the error is not transient.
    pub fn into_stream(self) -> impl Stream<Item = GitLabResult<T>> + Send {
        futures::stream::unfold(
            (self, VecDeque::new()),
            |(mut pager, mut buffer)| async move {
                loop {
                    if let Some(item) = buffer.pop_front() {
                        return Some((Ok(item), (pager, buffer)));
                    }
                    if pager.exhausted {
                        return None;
                    }
                    match pager.next_page().await {
                        Ok(Some(page)) => buffer.extend(page.into_items()),
                        Ok(None) => return None,
                        Err(e) => return Some((Err(e), (pager, buffer))),
                    }
                }
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{GitLabError, GitLabErrorKind};
    use futures::FutureExt;
    use futures::StreamExt;
    use reqwest::header::{HeaderMap, HeaderValue};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn offset_headers(page: u32, next: Option<u32>, total: u64) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-page", HeaderValue::from_str(&page.to_string()).unwrap());
        headers.insert("x-per-page", HeaderValue::from_static("2"));
        headers.insert(
            "x-next-page",
            HeaderValue::from_str(&next.map(|n| n.to_string()).unwrap_or_default()).unwrap(),
        );
        headers.insert("x-total", HeaderValue::from_str(&total.to_string()).unwrap());
        headers
    }

    #[test]
    fn test_page_info_from_headers() {
        let info = PageInfo::from_headers(&offset_headers(1, Some(2), 5));
        assert_eq!(info.page, Some(1));
        assert_eq!(info.per_page, Some(2));
        assert_eq!(info.next_page, Some(2));
        assert_eq!(info.total, Some(5));
    }

    #[test]
    fn test_empty_next_page_header_means_last_page() {
        let info = PageInfo::from_headers(&offset_headers(3, None, 5));
        assert_eq!(info.page, Some(3));
        assert!(info.next_page.is_none());
    }

    #[test]
    fn test_parse_link_header() {
        let header = r#"<https://gitlab.com/api/v4/projects?pagination=keyset&id_after=42>; rel="next", <https://gitlab.com/api/v4/projects?pagination=keyset>; rel="first""#;
        let links = PaginationLinks::from_header(header);

        assert_eq!(
            links.next.as_deref(),
            Some("https://gitlab.com/api/v4/projects?pagination=keyset&id_after=42")
        );
        assert!(links.first.is_some());
        assert!(links.prev.is_none());
        assert!(links.last.is_none());
    }

    #[test]
    fn test_keyset_link_wins_over_offset_header() {
        let mut headers = offset_headers(1, Some(2), 5);
        headers.insert(
            "link",
            HeaderValue::from_static(r#"<https://example.com/next>; rel="next""#),
        );
        let page: Page<i32> = Page::from_response(vec![1], &headers);

        assert_eq!(
            page.next_cursor(),
            Some(PageCursor::Keyset("https://example.com/next".to_string()))
        );
    }

    #[test]
    fn test_per_page_cap() {
        let params = PaginationParams::new().per_page(500);
        assert_eq!(params.per_page, Some(100));
    }

    fn mock_pages(pages: Vec<Vec<i32>>) -> Pager<i32> {
        let total: u64 = pages.iter().map(|p| p.len() as u64).sum();
        Pager::new(move |cursor| {
            let pages = pages.clone();
            async move {
                let index = match cursor {
                    None => 0,
                    Some(PageCursor::Offset(n)) => (n - 1) as usize,
                    Some(PageCursor::Keyset(_)) => unreachable!("offset-only mock"),
                };
                let next = if index + 1 < pages.len() {
                    Some(index as u32 + 2)
                } else {
                    None
                };
                let headers = offset_headers(index as u32 + 1, next, total);
                Ok(Page::from_response(pages[index].clone(), &headers))
            }
            .boxed()
        })
    }

    #[tokio::test]
    async fn test_collect_all_concatenates_pages_in_order() {
        let pager = mock_pages(vec![vec![1, 2], vec![3, 4], vec![5]]);
        let items = pager.collect_all().await.unwrap();
        assert_eq!(items, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_collect_all_single_page() {
        let pager = mock_pages(vec![vec![7]]);
        assert_eq!(pager.collect_all().await.unwrap(), vec![7]);
    }

    #[tokio::test]
    async fn test_collect_all_aborts_on_error() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();
        let pager: Pager<i32> = Pager::new(move |_cursor| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
            async move {
                Err(GitLabError::new(
                    GitLabErrorKind::InternalError,
                    "boom",
                ))
            }
            .boxed()
        });

        assert!(pager.collect_all().await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_stream_yields_error_then_resumes_same_page() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();
        let pager: Pager<i32> = Pager::new(move |cursor| {
            let attempt = calls_clone.fetch_add(1, Ordering::SeqCst);
            async move {
                // First call fails; every retry must see the same cursor.
                assert_eq!(cursor, None);
                if attempt == 0 {
                    Err(GitLabError::new(GitLabErrorKind::ServiceUnavailable, "flaky"))
                } else {
                    let headers = offset_headers(1, None, 2);
                    Ok(Page::from_response(vec![10, 20], &headers))
                }
            }
            .boxed()
        });

        let results: Vec<_> = pager.into_stream().collect().await;
        assert_eq!(results.len(), 3);
        assert!(results[0].is_err());
        assert_eq!(*results[1].as_ref().unwrap(), 10);
        assert_eq!(*results[2].as_ref().unwrap(), 20);
    }

    #[tokio::test]
    async fn test_stream_retries_same_page_indefinitely_on_error() {
        let pager: Pager<i32> = Pager::new(move |cursor| {
            async move {
                assert_eq!(cursor, None);
                Err(GitLabError::new(GitLabErrorKind::InternalError, "always"))
            }
            .boxed()
        });

        // Take a handful of elements from an endless error stream.
        let results: Vec<_> = pager.into_stream().take(4).collect().await;
        assert_eq!(results.len(), 4);
        assert!(results.iter().all(|r| r.is_err()));
    }

    #[tokio::test]
    async fn test_next_page_walks_cursors() {
        let mut pager = mock_pages(vec![vec![1], vec![2]]);
        assert!(pager.has_more());

        let first = pager.next_page().await.unwrap().unwrap();
        assert_eq!(first.items, vec![1]);
        assert!(pager.has_more());

        let second = pager.next_page().await.unwrap().unwrap();
        assert_eq!(second.items, vec![2]);
        assert!(!pager.has_more());

        assert!(pager.next_page().await.unwrap().is_none());
    }
}
