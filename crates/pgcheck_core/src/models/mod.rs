//! Data models for pgcheck.
//!
//! - `request` - ConnectionRequest, the parameters of one probe
//! - `outcome` - ConnectionOutcome, ServerFacts
//! - `options` - ProbeOptions, tunables read from the environment

pub mod options;
pub mod outcome;
pub mod request;

pub use options::ProbeOptions;
pub use outcome::{ConnectionOutcome, ServerFacts};
pub use request::ConnectionRequest;
