//! Core types and services for pgcheck.
//!
//! This crate provides everything behind the terminal:
//!
//! - **error**: Error taxonomy with PostgreSQL-specific classification
//! - **models**: Connection request, probe outcome, probe options
//! - **services**: Input collection, connections, the probe itself
//! - **logging**: Access log setup

pub mod error;
pub mod logging;
pub mod models;
pub mod services;

pub use error::ProbeError;
pub use models::{ConnectionOutcome, ConnectionRequest, ProbeOptions, ServerFacts};
pub use services::{Connector, InputCollector, LineReader, PgConnector, Prober, Session};
