//! JSON I/O handling for CLI
//!
//! - Input: one query on stdin, either a JSON document or raw template text
//! - Output: one JSON value on stdout, UTF-8

use std::io::{self, Read, Write};

use serde_json::Value;

use super::errors::{CliError, CliResult};

/// Read a query from `reader`.
///
/// Valid JSON is returned as is. Anything else is wrapped as template text,
/// so `{"user_id": {{ current_user }}}` can be piped in directly.
pub fn read_query_from<R: Read>(mut reader: R) -> CliResult<Value> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;

    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::io_error("Empty input"));
    }

    Ok(serde_json::from_str(input).unwrap_or_else(|_| Value::String(input.to_string())))
}

/// Read a query from stdin
pub fn read_query() -> CliResult<Value> {
    read_query_from(io::stdin().lock())
}

/// Write `value` as one line of JSON
pub fn write_json_to<W: Write>(writer: &mut W, value: &Value) -> CliResult<()> {
    serde_json::to_writer(&mut *writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Write `value` to stdout
pub fn write_json(value: &Value) -> CliResult<()> {
    write_json_to(&mut io::stdout().lock(), value)
}
