pub mod admin;
pub mod bid;
pub mod directory;
pub mod tender;

use std::str::FromStr;

use bidledger_core::errors::LedgerError;
use serde::Serialize;

use crate::error::CliError;

/// Print `value` to stdout as pretty JSON
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Parse a label argument. Unknown labels are validation failures, not
/// usage errors, so they share the exit code of every other bad input.
pub(crate) fn parse_label<L>(raw: &str) -> Result<L, CliError>
where
    L: FromStr<Err = LedgerError>,
{
    Ok(raw.parse::<L>()?)
}
