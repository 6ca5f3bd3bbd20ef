//! Client side of the pothole board.
//!
//! [`session::Session`] is the UI root: it owns the
//! [`store::CollectionStore`] (which talks to an [`authority::Authority`])
//! and the board view state.

pub mod api;
pub mod authority;
pub mod command;
pub mod config;
pub mod session;
pub mod store;
