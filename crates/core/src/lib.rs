//! Domain model of the pothole board.
//!
//! Shared by the authority server and the client: measurement records,
//! collection bookkeeping, area summaries, the wire contract, and the board
//! (layout, hit-testing, drag, rasterization).

pub mod board;
pub mod collection;
pub mod error;
pub mod naming;
pub mod pothole;
pub mod summary;
pub mod wire;
