//! Company directory view state.

#[cfg(test)]
#[path = "companies_test.rs"]
mod companies_test;

use crate::net::api::{ApiClient, Operation};
use crate::net::error::ApiError;
use crate::net::types::{Company, CompanySearch};
use crate::state::list::ListState;

#[derive(Clone, Debug)]
pub struct CompanyDirectory {
    pub search: CompanySearch,
    pub list: ListState<Company>,
    page_size: u32,
}

impl CompanyDirectory {
    #[must_use]
    pub fn new(page_size: u32) -> Self {
        Self { search: CompanySearch::default(), list: ListState::new(), page_size: page_size.max(1) }
    }

    pub fn set_search(&mut self, search: CompanySearch) {
        self.search = search;
        self.list.page = 0;
    }

    pub async fn load_page(&mut self, api: &ApiClient, page: u32) {
        let ticket = self.list.begin_fetch();
        let search = self.search.clone();
        let result = api.search_companies(&search, page, self.page_size).await;
        self.list
            .apply_page(ticket, page, result, Operation::SearchCompanies.failure_message());
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

    /// Mark a company verified and update its row in place.
    ///
    /// # Errors
    ///
    /// Returns the gateway failure; the row is left as it was.
    pub async fn verify(&mut self, api: &ApiClient, company_id: &str) -> Result<(), ApiError> {
        self.list.message = None;
        match api.verify_company(company_id).await {
            Ok(company) => {
                self.list.replace_where(|c| c.id == company_id, company);
                self.list.message = Operation::VerifyCompany.success_message().map(str::to_owned);
                Ok(())
            }
            Err(err) => {
                self.list.error = Some(err.user_message(Operation::VerifyCompany.failure_message()));
                Err(err)
            }
        }
    }
}
