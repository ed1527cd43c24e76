//! Authorization helpers shared by every screen.
//!
//! SYSTEM CONTEXT
//! ==============
//! Both modules read the session synchronously and never touch the network.
//! They decide what a visitor sees and where they are sent; the remote API
//! still checks every request on its own.

pub mod auth;
pub mod nav;
