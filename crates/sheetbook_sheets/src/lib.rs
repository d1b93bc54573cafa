// --- File: crates/sheetbook_sheets/src/lib.rs ---
pub mod auth;
pub mod doc;
pub mod handlers;
pub mod logic;
#[cfg(test)]
mod logic_proptest;
pub mod routes;
pub mod service;

pub use routes::{routes, routes_with_connector};
