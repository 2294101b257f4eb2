//! Splits one framed line into comma-separated fields.
//!
//! No trimming and no escaping: `$a,,b\n` is `["a", "", "b"]` and `$\n` is
//! `[""]`. Bytes are taken as ASCII; anything else is replaced lossily.

use crate::error::ParseError;

use super::codec::START_MARKER;

/// Ordered fields of one command line. Field 0 is the command name.
pub type CommandLine = Vec<String>;

/// Parse a complete `$...\n` frame into its fields.
///
/// The framer already guarantees both markers; they are checked again here
/// so the tokenizer can be used on lines from any source.
pub fn parse(line: &[u8]) -> Result<CommandLine, ParseError> {
    let Some((&first, rest)) = line.split_first() else {
        return Err(ParseError::MissingStart);
    };
    if first != START_MARKER {
        return Err(ParseError::MissingStart);
    }
    let Some((&last, body)) = rest.split_last() else {
        return Err(ParseError::MissingTerminator);
    };
    if last != b'\n' {
        return Err(ParseError::MissingTerminator);
    }

    Ok(body
        .split(|&b| b == b',')
        .map(|field| String::from_utf8_lossy(field).into_owned())
        .collect())
}
