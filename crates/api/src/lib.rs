//! Pothole authority server library.
//!
//! Exposes the building blocks (config, state, error handling, routes) so
//! integration tests, the client's end-to-end tests and the binary
//! entrypoint share them.

pub mod config;
pub mod error;
pub mod handlers;
pub mod report;
pub mod router;
pub mod routes;
pub mod spreadsheet;
pub mod state;
pub mod storage;
