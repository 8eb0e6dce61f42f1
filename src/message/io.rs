//! Stream helpers
//!
//! Thin adapters between [`Message`] and `std::io`. Message errors surface
//! as `io::ErrorKind::InvalidData`.

use std::io::{self, Read, Write};

use crate::config::Config;

use super::{Message, Mode};

/// Read a stream to its end and parse it as one message
pub fn read_message<R: Read>(mut reader: R, config: &Config) -> io::Result<Message> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    tracing::debug!("Read {} bytes from stream", buf.len());
    Ok(Message::parse_with_config(&buf, config.clone())?)
}

/// Write a message's bytes to a stream and flush it
///
/// Build mode writes the serialized buffer; read mode re-encodes the tree.
/// Returns the number of bytes written.
pub fn write_message<W: Write>(mut writer: W, message: &Message) -> io::Result<usize> {
    let written = match message.mode() {
        Mode::Build => {
            let bytes = message.serialize()?;
            writer.write_all(bytes)?;
            bytes.len()
        }
        Mode::Read => {
            let bytes = message.encode()?;
            writer.write_all(&bytes)?;
            bytes.len()
        }
        Mode::Empty => {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "cannot write an empty message",
            ))
        }
    };
    writer.flush()?;
    tracing::debug!("Wrote {} bytes to stream", written);
    Ok(written)
}
