//! Shared list/pagination state for resource screens.
//!
//! DESIGN
//! ======
//! Each fetch takes a [`FetchTicket`] from [`ListState::begin_fetch`]. Only the
//! result carrying the latest ticket is applied; a slow response to an older
//! request is dropped instead of overwriting fresher data. Failures become an
//! inline error and never panic the screen.

#[cfg(test)]
#[path = "list_test.rs"]
mod list_test;

use crate::net::error::ApiError;
use crate::net::types::Page;

/// Generation number of one fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

#[derive(Clone, Debug, PartialEq)]
pub struct ListState<T> {
    pub items: Vec<T>,
    /// Zero-based page currently shown.
    pub page: u32,
    pub total_pages: u32,
    pub total_elements: u64,
    pub loading: bool,
    /// Inline error for the last fetch.
    pub error: Option<String>,
    /// Inline confirmation after a mutation, e.g. a delete.
    pub message: Option<String>,
    fetch_seq: u64,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            page: 0,
            total_pages: 0,
            total_elements: 0,
            loading: false,
            error: None,
            message: None,
            fetch_seq: 0,
        }
    }
}

impl<T> ListState<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fetch. Any ticket issued earlier becomes stale.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.fetch_seq += 1;
        self.loading = true;
        self.error = None;
        FetchTicket(self.fetch_seq)
    }

    #[must_use]
    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        ticket.0 == self.fetch_seq
    }

    /// Apply a paged result for `page`. Returns `false` if the ticket was stale.
    pub fn apply_page(
        &mut self,
        ticket: FetchTicket,
        page: u32,
        result: Result<Page<T>, ApiError>,
        fallback: &str,
    ) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(ticket = ticket.0, latest = self.fetch_seq, "dropping stale page");
            return false;
        }
        self.loading = false;
        match result {
            Ok(data) => {
                self.items = data.content;
                self.total_pages = data.total_pages;
                self.total_elements = data.total_elements;
                self.page = page;
            }
            Err(err) => self.fail(&err, fallback),
        }
        true
    }

    /// Apply an unpaged result. Returns `false` if the ticket was stale.
    pub fn apply_items(&mut self, ticket: FetchTicket, result: Result<Vec<T>, ApiError>, fallback: &str) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(ticket = ticket.0, latest = self.fetch_seq, "dropping stale list");
            return false;
        }
        self.loading = false;
        match result {
            Ok(items) => {
                self.total_elements = items.len() as u64;
                self.total_pages = u32::from(!items.is_empty());
                self.page = 0;
                self.items = items;
            }
            Err(err) => self.fail(&err, fallback),
        }
        true
    }

    fn fail(&mut self, err: &ApiError, fallback: &str) {
        self.items.clear();
        self.error = Some(err.user_message(fallback));
    }

    /// Drop items matching `predicate`; returns how many were removed.
    pub fn remove_where<F>(&mut self, predicate: F) -> usize
    where
        F: Fn(&T) -> bool,
    {
        let before = self.items.len();
        self.items.retain(|item| !predicate(item));
        let removed = before - self.items.len();
        self.total_elements = self.total_elements.saturating_sub(removed as u64);
        removed
    }

    /// Replace the first item matching `predicate`. Returns `false` if none did.
    pub fn replace_where<F>(&mut self, predicate: F, replacement: T) -> bool
    where
        F: Fn(&T) -> bool,
    {
        match self.items.iter_mut().find(|item| predicate(item)) {
            Some(slot) => {
                *slot = replacement;
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.page > 0
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page + 1 < self.total_pages
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
