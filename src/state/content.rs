//! Role-tiered content board.
//!
//! Public content is always fetched. Signed-in users also fetch the user tier;
//! employers and admins the employer tier; admins the admin tier. A denied or
//! failed tier shows a fixed denial line and never stops the other tiers.

#[cfg(test)]
#[path = "content_test.rs"]
mod content_test;

use crate::net::api::{ApiClient, Operation};
use crate::net::error::ApiError;
use crate::state::role::{ADMIN_ONLY, EMPLOYER_OR_ADMIN};
use crate::state::session::SessionSnapshot;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TieredContent {
    pub public: String,
    pub user: String,
    pub employer: String,
    pub admin: String,
    /// Set only when the public tier fails.
    pub error: Option<String>,
}

impl TieredContent {
    pub async fn load(api: &ApiClient, snapshot: &SessionSnapshot) -> Self {
        let mut content = Self::default();

        match api.public_content().await {
            Ok(text) => content.public = text,
            Err(err) => content.error = Some(err.user_message(Operation::PublicContent.failure_message())),
        }

        if !snapshot.is_logged_in {
            return content;
        }
        content.user = tier(api.user_content().await, Operation::UserContent);
        if snapshot.has_any_role(EMPLOYER_OR_ADMIN) {
            content.employer = tier(api.employer_content().await, Operation::EmployerContent);
        }
        if snapshot.has_any_role(ADMIN_ONLY) {
            content.admin = tier(api.admin_content().await, Operation::AdminContent);
        }
        content
    }
}

fn tier(result: Result<String, ApiError>, op: Operation) -> String {
    result.unwrap_or_else(|_| op.failure_message().to_owned())
}
