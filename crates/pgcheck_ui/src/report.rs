//! Probe result rendering.

use comfy_table::{presets, Table};
use pgcheck_core::{ConnectionOutcome, ConnectionRequest};

/// Columns of the credential table, in display order.
pub const TABLE_HEADER: [&str; 5] = ["Username", "Database", "Host", "Port", "Password"];

/// Table of the values a successful probe used.
///
/// The password is shown in clear text.
pub fn credentials_table(request: &ConnectionRequest, current_user: &str) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::ASCII_FULL).set_header(TABLE_HEADER).add_row(vec![
        current_user,
        request.database.as_str(),
        request.host.as_str(),
        request.port.as_str(),
        request.password.as_str(),
    ]);
    table
}

/// Text printed after a probe.
pub fn render_outcome(outcome: &ConnectionOutcome, request: &ConnectionRequest) -> String {
    match outcome {
        ConnectionOutcome::Success { server_version, current_user } => format!(
            "Successfully connected to {server_version}\n\nUser information:\n{}\n",
            credentials_table(request, current_user)
        ),
        _ => format!("{}\n", outcome.failure_message().unwrap_or_default()),
    }
}
