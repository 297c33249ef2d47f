pub mod account;
pub mod check;
pub mod records;

use serde::Serialize;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Pretty-print `value` as JSON on stdout
pub(crate) fn print_json<T: Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Parse a `--data` argument into a JSON value
pub(crate) fn parse_data(data: &str) -> Result<serde_json::Value, serde_json::Error> {
    serde_json::from_str(data)
}
