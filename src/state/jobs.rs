//! Job board view state: query selection, paging, and delete.

#[cfg(test)]
#[path = "jobs_test.rs"]
mod jobs_test;

use crate::net::api::{ApiClient, Operation};
use crate::net::error::ApiError;
use crate::net::types::{Job, JobFilter, JobSearch, Page};
use crate::state::list::{FetchTicket, ListState};

/// Which listing endpoint a job board fetch goes to.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum JobQuery {
    #[default]
    All,
    Search(JobSearch),
    Filter(JobFilter),
}

impl JobQuery {
    /// Pick the query from the list form. Any search text wins; otherwise any
    /// filter field selects the filter; otherwise everything is listed.
    #[must_use]
    pub fn from_form(search: JobSearch, filter: JobFilter) -> Self {
        if !search.is_empty() {
            Self::Search(search)
        } else if !filter.is_empty() {
            Self::Filter(filter)
        } else {
            Self::All
        }
    }

    /// # Errors
    ///
    /// Returns the gateway failure.
    pub async fn fetch(&self, api: &ApiClient, page: u32, size: u32) -> Result<Page<Job>, ApiError> {
        match self {
            Self::All => api.list_jobs(page, size).await,
            Self::Search(search) => api.search_jobs(search, page, size).await,
            Self::Filter(filter) => api.filter_jobs(filter, page, size).await,
        }
    }
}

/// A fetch that has been issued a ticket but not yet run. Holding one does
/// not borrow the board, so several can be in flight at once.
#[derive(Clone, Debug)]
pub struct PendingJobFetch {
    ticket: FetchTicket,
    query: JobQuery,
    page: u32,
    size: u32,
}

impl PendingJobFetch {
    pub async fn run(self, api: &ApiClient) -> CompletedJobFetch {
        let result = self.query.fetch(api, self.page, self.size).await;
        CompletedJobFetch { ticket: self.ticket, page: self.page, result }
    }
}

#[derive(Debug)]
pub struct CompletedJobFetch {
    ticket: FetchTicket,
    page: u32,
    result: Result<Page<Job>, ApiError>,
}

#[derive(Clone, Debug)]
pub struct JobBoard {
    pub query: JobQuery,
    pub list: ListState<Job>,
    page_size: u32,
}

impl JobBoard {
    #[must_use]
    pub fn new(page_size: u32) -> Self {
        Self { query: JobQuery::All, list: ListState::new(), page_size: page_size.max(1) }
    }

    /// Replace the query. The next fetch starts from the first page.
    pub fn set_query(&mut self, query: JobQuery) {
        self.query = query;
        self.list.page = 0;
    }

    pub fn prepare(&mut self, page: u32) -> PendingJobFetch {
        PendingJobFetch { ticket: self.list.begin_fetch(), query: self.query.clone(), page, size: self.page_size }
    }

    /// Apply a finished fetch. Returns `false` if a newer fetch superseded it.
    pub fn complete(&mut self, done: CompletedJobFetch) -> bool {
        let fallback = Operation::ListJobs.failure_message();
        self.list.apply_page(done.ticket, done.page, done.result, fallback)
    }

    pub async fn load_page(&mut self, api: &ApiClient, page: u32) {
        let done = self.prepare(page).run(api).await;
        self.complete(done);
    }

    pub async fn refresh(&mut self, api: &ApiClient) {
        self.load_page(api, self.list.page).await;
    }

    pub async fn next_page(&mut self, api: &ApiClient) {
        if self.list.has_next() {
            self.load_page(api, self.list.page + 1).await;
        }
    }

    pub async fn previous_page(&mut self, api: &ApiClient) {
        if self.list.has_previous() {
            self.load_page(api, self.list.page - 1).await;
        }
    }

    /// Delete a posting and drop it from the current page.
    ///
    /// # Errors
    ///
    /// Returns the gateway failure; the list is left unchanged and shows the
    /// error inline so the user can retry.
    pub async fn delete(&mut self, api: &ApiClient, job_id: &str) -> Result<(), ApiError> {
        self.list.message = None;
        match api.delete_job(job_id).await {
            Ok(()) => {
                self.list.remove_where(|job| job.id == job_id);
                self.list.message = Operation::DeleteJob.success_message().map(str::to_owned);
                Ok(())
            }
            Err(err) => {
                self.list.error = Some(err.user_message(Operation::DeleteJob.failure_message()));
                Err(err)
            }
        }
    }
}
