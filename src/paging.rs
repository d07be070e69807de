//! Infinite-scroll pagination state.
//!
//! [`PagedList`] never performs I/O itself. Operations that need a page
//! hand back a [`PageRequest`]; the caller fetches it and feeds the result
//! to [`PagedList::complete`]. Every request is tagged with the session it
//! was issued for, so results that arrive after a [`PagedList::reset`] are
//! dropped instead of being merged into the new user's list.

use tracing::debug;

use crate::error::{RepopageError, Result};
use crate::types::validate_user;

/// Default number of items per page, also the look-ahead window.
pub const PAGE_SIZE: usize = 20;

/// GitHub refuses `per_page` above this.
pub const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Loading {
    #[default]
    None,
    First,
    Next,
}

/// A page the caller must fetch and hand back to [`PagedList::complete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub session: u64,
    pub user: String,
    pub page: u32,
}

/// What a completed fetch did to the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Items were appended; `page` is now the current page.
    Appended { page: u32, count: usize },
    /// The source had nothing more. No further requests will be issued.
    Exhausted,
    /// The fetch failed. The list keeps its last good state.
    Failed(String),
    /// The result belonged to an earlier session or an unexpected page.
    Stale,
}

/// True when a visible row at `index` falls inside the last page-size
/// window of loaded items and nothing is in flight.
pub fn should_fetch_next(
    index: usize,
    current_page: u32,
    page_size: usize,
    loading: Loading,
) -> bool {
    loading == Loading::None && index + 1 >= current_page as usize * page_size
}

#[derive(Debug)]
pub struct PagedList<T> {
    items: Vec<T>,
    user: Option<String>,
    page_size: usize,
    current_page: u32,
    loading: Loading,
    first_loaded: bool,
    exhausted: bool,
    last_seen: Option<usize>,
    last_error: Option<String>,
    session: u64,
    in_flight: Option<u32>,
}

impl<T> Default for PagedList<T> {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}

impl<T> PagedList<T> {
    pub fn new(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            user: None,
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
            current_page: 1,
            loading: Loading::None,
            first_loaded: false,
            exhausted: false,
            last_seen: None,
            last_error: None,
            session: 0,
            in_flight: None,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    #[cfg(test)]
    pub fn loading(&self) -> Loading {
        self.loading
    }

    pub fn is_loading_first_page(&self) -> bool {
        self.loading == Loading::First
    }

    pub fn is_loading_next_page(&self) -> bool {
        self.loading == Loading::Next
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Highest row index ever reported visible.
    #[cfg(test)]
    pub fn last_seen(&self) -> Option<usize> {
        self.last_seen
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    #[cfg(test)]
    pub fn session(&self) -> u64 {
        self.session
    }

    /// Begin loading page 1 for `user`.
    pub fn start(&mut self, user: &str) -> Result<PageRequest> {
        let user = validate_user(user)?;
        if self.loading != Loading::None {
            return Err(RepopageError::Busy);
        }

        self.user = Some(user.clone());
        self.loading = Loading::First;
        self.in_flight = Some(1);
        self.last_error = None;
        debug!(session = self.session, user = %user, "requesting first page");

        Ok(PageRequest {
            session: self.session,
            user,
            page: 1,
        })
    }

    /// Record that row `index` is on screen and request the next page if it
    /// is close enough to the end.
    pub fn report_visible(&mut self, index: usize) -> Option<PageRequest> {
        self.last_seen = Some(self.last_seen.map_or(index, |seen| seen.max(index)));

        if self.exhausted
            || !should_fetch_next(index, self.current_page, self.page_size, self.loading)
        {
            return None;
        }
        self.fetch_next_page()
    }

    /// Request `current_page + 1` unless something is in flight, the first
    /// page never loaded, or the list is exhausted.
    pub fn fetch_next_page(&mut self) -> Option<PageRequest> {
        if self.loading != Loading::None || !self.first_loaded || self.exhausted {
            return None;
        }
        let user = self.user.clone()?;
        let page = self.current_page + 1;

        self.loading = Loading::Next;
        self.in_flight = Some(page);
        debug!(session = self.session, user = %user, page, "requesting next page");

        Some(PageRequest {
            session: self.session,
            user,
            page,
        })
    }

    /// Drop everything and start over for `user` in a fresh session.
    ///
    /// The user is validated first; on rejection the current list is kept.
    pub fn reset(&mut self, user: &str) -> Result<PageRequest> {
        validate_user(user)?;

        self.items.clear();
        self.user = None;
        self.current_page = 1;
        self.loading = Loading::None;
        self.first_loaded = false;
        self.exhausted = false;
        self.last_seen = None;
        self.last_error = None;
        self.in_flight = None;
        self.session += 1;

        self.start(user)
    }

    /// Merge the result of a fetch previously handed out by this list.
    pub fn complete(&mut self, request: &PageRequest, result: Result<Vec<T>>) -> PageOutcome {
        if request.session != self.session || self.in_flight != Some(request.page) {
            debug!(
                session = request.session,
                live_session = self.session,
                page = request.page,
                "discarding stale page"
            );
            return PageOutcome::Stale;
        }

        let was = self.loading;
        self.loading = Loading::None;
        self.in_flight = None;

        match result {
            Ok(items) if items.is_empty() => {
                if was == Loading::First {
                    self.first_loaded = true;
                    self.current_page = 1;
                }
                self.exhausted = true;
                self.last_error = None;
                PageOutcome::Exhausted
            }
            Ok(items) => {
                let count = items.len();
                self.items.extend(items);
                if was == Loading::First {
                    self.first_loaded = true;
                    self.current_page = 1;
                } else {
                    self.current_page += 1;
                }
                self.last_error = None;
                PageOutcome::Appended {
                    page: self.current_page,
                    count,
                }
            }
            Err(e) => {
                let msg = e.to_string();
                self.last_error = Some(msg.clone());
                PageOutcome::Failed(msg)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(start: usize, len: usize) -> Vec<usize> {
        (start..start + len).collect()
    }

    fn loaded(first_page_len: usize) -> PagedList<usize> {
        let mut list = PagedList::new(PAGE_SIZE);
        let req = list.start("octocat").unwrap();
        list.complete(&req, Ok(page(0, first_page_len)));
        list
    }

    #[test]
    fn trigger_predicate() {
        assert!(!should_fetch_next(18, 1, 20, Loading::None));
        assert!(should_fetch_next(19, 1, 20, Loading::None));
        assert!(should_fetch_next(25, 1, 20, Loading::None));
        assert!(!should_fetch_next(19, 1, 20, Loading::First));
        assert!(!should_fetch_next(19, 1, 20, Loading::Next));
        assert!(!should_fetch_next(19, 2, 20, Loading::None));
        assert!(should_fetch_next(39, 2, 20, Loading::None));
    }

    #[test]
    fn start_requests_first_page() {
        let mut list: PagedList<usize> = PagedList::default();
        let req = list.start("octocat").unwrap();

        assert_eq!(req.page, 1);
        assert_eq!(req.user, "octocat");
        assert!(list.is_loading_first_page());
        assert!(!list.is_loading_next_page());
    }

    #[test]
    fn start_rejects_invalid_user_without_request() {
        let mut list: PagedList<usize> = PagedList::default();
        assert!(matches!(
            list.start(""),
            Err(RepopageError::InvalidUser(_))
        ));
        assert_eq!(list.loading(), Loading::None);
        assert_eq!(list.user(), None);
    }

    #[test]
    fn start_while_loading_is_busy() {
        let mut list: PagedList<usize> = PagedList::default();
        list.start("octocat").unwrap();
        assert!(matches!(list.start("octocat"), Err(RepopageError::Busy)));
    }

    #[test]
    fn first_page_success_populates() {
        let list = loaded(20);
        assert_eq!(list.len(), 20);
        assert_eq!(list.current_page(), 1);
        assert_eq!(list.loading(), Loading::None);
    }

    #[test]
    fn first_page_failure_keeps_list_empty() {
        let mut list: PagedList<usize> = PagedList::default();
        let req = list.start("octocat").unwrap();
        let outcome = list.complete(&req, Err(RepopageError::Network("timeout".into())));

        assert!(matches!(outcome, PageOutcome::Failed(_)));
        assert!(list.is_empty());
        assert_eq!(list.loading(), Loading::None);
        assert!(list.last_error().unwrap().contains("timeout"));
        assert_eq!(list.fetch_next_page(), None);
    }

    #[test]
    fn empty_first_page_is_exhausted() {
        let list = loaded(0);
        assert!(list.is_exhausted());
        assert!(list.is_empty());
    }

    #[test]
    fn one_fetch_per_page_boundary() {
        let mut list = loaded(20);
        let mut requests = Vec::new();

        for index in 0..20 {
            if let Some(req) = list.report_visible(index) {
                requests.push(req);
            }
        }
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].page, 2);

        // Bursty repeats while the page is in flight collapse to nothing
        for _ in 0..10 {
            assert_eq!(list.report_visible(19), None);
        }
        assert!(list.is_loading_next_page());

        list.complete(&requests[0], Ok(page(20, 20)));
        for index in 19..39 {
            assert_eq!(list.report_visible(index), None, "index {}", index);
        }
        let req = list.report_visible(39).unwrap();
        assert_eq!(req.page, 3);
    }

    #[test]
    fn page_increments_by_one() {
        let mut list = loaded(20);
        for expected in 2..6u32 {
            let index = list.len() - 1;
            let req = list.report_visible(index).unwrap();
            assert_eq!(req.page, expected);
            let start = list.len();
            let outcome = list.complete(&req, Ok(page(start, 20)));
            assert_eq!(
                outcome,
                PageOutcome::Appended {
                    page: expected,
                    count: 20
                }
            );
            assert_eq!(list.current_page(), expected);
        }
        assert_eq!(list.len(), 100);
        assert_eq!(list.items()[57], 57);
    }

    #[test]
    fn scenario_twenty_per_page_until_exhausted() {
        let mut list = loaded(20);

        let req2 = list.report_visible(19).unwrap();
        assert_eq!(req2.page, 2);
        list.complete(&req2, Ok(page(20, 20)));
        assert_eq!(list.current_page(), 2);
        assert_eq!(list.len(), 40);

        let req3 = list.report_visible(39).unwrap();
        assert_eq!(req3.page, 3);
        assert_eq!(list.complete(&req3, Ok(vec![])), PageOutcome::Exhausted);
        assert!(list.is_exhausted());
        assert_eq!(list.current_page(), 2);

        assert_eq!(list.report_visible(59), None);
        assert_eq!(list.report_visible(39), None);
        assert_eq!(list.fetch_next_page(), None);
        assert_eq!(list.last_seen(), Some(59));
    }

    #[test]
    fn failure_leaves_page_and_allows_retry() {
        let mut list = loaded(20);
        let req = list.report_visible(19).unwrap();

        let outcome = list.complete(&req, Err(RepopageError::Network("503".into())));
        assert!(matches!(outcome, PageOutcome::Failed(_)));
        assert_eq!(list.current_page(), 1);
        assert!(!list.is_loading_next_page());
        assert_eq!(list.len(), 20);

        let retry = list.report_visible(19).unwrap();
        assert_eq!(retry.page, 2);
        list.complete(&retry, Ok(page(20, 20)));
        assert_eq!(list.current_page(), 2);
        assert_eq!(list.last_error(), None);
    }

    #[test]
    fn reset_discards_stale_completion() {
        let mut list = loaded(20);
        let stale = list.report_visible(19).unwrap();
        assert_eq!(stale.user, "octocat");

        let fresh = list.reset("newuser").unwrap();
        assert_eq!(fresh.page, 1);
        assert_ne!(fresh.session, stale.session);
        assert!(list.is_empty());

        assert_eq!(list.complete(&stale, Ok(page(20, 20))), PageOutcome::Stale);
        assert!(list.is_empty());
        assert!(list.is_loading_first_page());

        list.complete(&fresh, Ok(page(100, 3)));
        assert_eq!(list.items(), &[100, 101, 102]);
        assert_eq!(list.user(), Some("newuser"));
    }

    #[test]
    fn reset_with_invalid_user_keeps_state() {
        let mut list = loaded(20);
        let session = list.session();
        assert!(list.reset("bad user").is_err());
        assert_eq!(list.len(), 20);
        assert_eq!(list.session(), session);
    }

    #[test]
    fn completion_for_unexpected_page_is_stale() {
        let mut list = loaded(20);
        let req = list.report_visible(19).unwrap();
        let bogus = PageRequest { page: 7, ..req.clone() };
        assert_eq!(list.complete(&bogus, Ok(page(0, 20))), PageOutcome::Stale);
        assert!(list.is_loading_next_page());
        // Duplicate delivery of a finished request is also dropped
        list.complete(&req, Ok(page(20, 20)));
        assert_eq!(list.complete(&req, Ok(page(20, 20))), PageOutcome::Stale);
        assert_eq!(list.len(), 40);
    }

    #[test]
    fn last_seen_tracks_maximum() {
        let mut list = loaded(20);
        assert_eq!(list.last_seen(), None);
        list.report_visible(5);
        list.report_visible(2);
        assert_eq!(list.last_seen(), Some(5));
    }

    #[test]
    fn page_size_is_clamped() {
        assert_eq!(PagedList::<usize>::new(0).page_size(), 1);
        assert_eq!(PagedList::<usize>::new(500).page_size(), MAX_PAGE_SIZE);
    }

    #[test]
    fn never_loading_first_and_next_together() {
        let mut list: PagedList<usize> = PagedList::default();
        let req = list.start("octocat").unwrap();
        assert_eq!(list.fetch_next_page(), None);
        assert_eq!(list.report_visible(100), None);
        list.complete(&req, Ok(page(0, 20)));
        list.report_visible(19).unwrap();
        assert!(list.is_loading_next_page() && !list.is_loading_first_page());
    }
}
