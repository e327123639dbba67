//! Services for pgcheck.
//!
//! - `input` - Interactive prompts with re-prompting on empty input
//! - `connection` - Connector/session seams and the tokio-postgres backend
//! - `probe` - One connect, query, report cycle

pub mod connection;
pub mod input;
pub mod probe;

pub use connection::{Connector, PgConnector, PgSession, Session, SessionGuard};
pub use input::{InputCollector, LineReader};
pub use probe::Prober;
