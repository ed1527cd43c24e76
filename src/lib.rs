//! # jobportal
//!
//! Client core for the job portal front end: the persisted session, the
//! bearer-injecting API gateway, the route table with its role guards, and the
//! view state the job/company/application screens render from.
//!
//! SYSTEM CONTEXT
//! ==============
//! Screens call [`net::api::ApiClient`], which reads the current token from
//! [`state::session::SessionStore`] on every request. Navigation and guards in
//! [`util`] read the same store synchronously and never touch the network.
//!
//! Role gating here is a UX convenience only. The remote API is the authority
//! on who may do what; every gated action is re-checked server-side.

pub mod config;
pub mod net;
pub mod routes;
pub mod state;
pub mod util;

#[cfg(test)]
mod test_support;

pub use config::PortalConfig;
pub use net::api::ApiClient;
pub use net::error::ApiError;
pub use state::role::Role;
pub use state::session::{Identity, SessionSnapshot, SessionStore};
