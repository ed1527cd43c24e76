//! Network layer: the typed gateway, its transport seam, and wire types.

pub mod api;
pub mod error;
pub mod transport;
pub mod types;
