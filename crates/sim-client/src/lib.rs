//! Simulated fsmcp client.
//!
//! Offers the five filesystem tools over an in-memory [`MemoryStore`] instead of a live server.
//! Useful for UI prototyping and tests that should not touch disk.

mod client;
mod store;

pub use client::{SimClientConfig, SimulatedClient};
pub use store::MemoryStore;
