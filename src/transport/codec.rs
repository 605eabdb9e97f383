//! Newline-delimited JSON-RPC framing.
//!
//! Each outbound message is one JSON object followed by a single `\n`; the
//! serializer escapes any newline inside string values, so a frame never
//! spans lines. Inbound, empty lines are skipped and anything that fails to
//! parse (or does not claim `jsonrpc: "2.0"`) is a malformed frame the
//! caller reports as a diagnostic and moves past.

use crate::protocol::{ Error, JSONRPCMessage, JSONRPC_VERSION };

/// Serialize a message into a single framed line, including the trailing
/// newline.
pub fn encode(message: &JSONRPCMessage) -> Result<Vec<u8>, Error> {
    let mut bytes = serde_json::to_vec(message)?;
    debug_assert!(!bytes.contains(&b'\n'), "serialized frame must be a single line");
    bytes.push(b'\n');
    Ok(bytes)
}

/// Parse one inbound line (without its newline). `Ok(None)` means the line
/// was empty and should be skipped silently.
pub fn decode(line: &str) -> Result<Option<JSONRPCMessage>, Error> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let message: JSONRPCMessage = serde_json
        ::from_str(line)
        .map_err(|e| Error::MalformedFrame(format!("{e}: {line}")))?;

    if message.jsonrpc() != JSONRPC_VERSION {
        return Err(Error::MalformedFrame(format!("unsupported jsonrpc version in: {line}")));
    }

    Ok(Some(message))
}
