// touchline-core/src/lib.rs

#![allow(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::perf)]

// --- HEXAGONAL MODULES ---

// 1. Ports (Interfaces / Traits)
// Object storage, statistics sources, warehouse and lookup store contracts.
pub mod ports;

// 2. Domain
// Dataset model, cleaning rules, played-match filter, name matching.
// Depends on nothing else in the crate.
pub mod domain;

// 3. Infrastructure (Adapters)
// Local object store, DataFusion codec, DuckDB warehouse, HTTP sources, config files.
pub mod infrastructure;

// 4. Application (Use Cases)
// Fetch, clean, load, map. Wires the domain to the ports.
pub mod application;

// --- GLOBAL ERROR HANDLING ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
pub use error::TouchlineError;
