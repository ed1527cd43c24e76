//! Client-side state.
//!
//! DESIGN
//! ======
//! `session` is the single source of truth for who is signed in; everything
//! else reads it. The view-state modules (`list`, `jobs`, `companies`,
//! `applications`, `content`) hold what a screen renders and never own
//! credentials.

pub mod applications;
pub mod companies;
pub mod content;
pub mod jobs;
pub mod list;
pub mod notify;
pub mod role;
pub mod session;
pub mod storage;
