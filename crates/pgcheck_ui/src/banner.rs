//! Startup banner.

use owo_colors::OwoColorize;

const BANNER: &str = r"
    ##############################################
    /+/ PostgreSQLChecking /+/
                    pgcheck
    ##############################################
";

/// Startup banner, blue when `colored`.
pub fn banner(colored: bool) -> String {
    if colored {
        BANNER.blue().to_string()
    } else {
        BANNER.to_string()
    }
}
