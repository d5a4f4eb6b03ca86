//! Opaque reference values held by the reference store.
//!
//! References are handles, not scalars: frames and items point into the
//! host graph, associations and streams own shared interior state. Handle
//! clones alias the same underlying object, which is what makes reference
//! copy-back at a procedure boundary work.

use std::collections::BTreeMap;
use std::fmt;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::frame::{FrameId, ItemId};
use crate::tag::Tag;
use crate::value::Value;

/// Shared association (key/value map) handle.
///
/// A `BTreeMap` keeps `foreachassociation` iteration deterministic.
pub type AssocRef = Arc<Mutex<BTreeMap<String, Value>>>;

/// Shared stream handle.
pub type StreamRef = Arc<Mutex<Stream>>;

/// An open file stream, reading or writing line-at-a-time.
pub enum Stream {
    Read(BufReader<std::fs::File>),
    Write(BufWriter<std::fs::File>),
    /// Explicitly closed; any further use is a stream error.
    Closed,
}

impl Stream {
    /// Read one line, stripping the trailing newline.
    ///
    /// Returns `Ok(None)` at end of file.
    pub fn read_line(&mut self) -> std::io::Result<Option<String>> {
        match self {
            Stream::Read(reader) => {
                let mut line = String::new();
                if reader.read_line(&mut line)? == 0 {
                    return Ok(None);
                }
                while line.ends_with('\n') || line.ends_with('\r') {
                    line.pop();
                }
                Ok(Some(line))
            }
            Stream::Write(_) => Err(std::io::Error::other("stream is open for writing")),
            Stream::Closed => Err(std::io::Error::other("stream is closed")),
        }
    }

    /// Write one line, appending a newline.
    pub fn write_line(&mut self, text: &str) -> std::io::Result<()> {
        match self {
            Stream::Write(writer) => {
                writer.write_all(text.as_bytes())?;
                writer.write_all(b"\n")
            }
            Stream::Read(_) => Err(std::io::Error::other("stream is open for reading")),
            Stream::Closed => Err(std::io::Error::other("stream is closed")),
        }
    }

    /// Close the stream, flushing a writer.
    pub fn close(&mut self) -> std::io::Result<()> {
        if let Stream::Write(writer) = self {
            writer.flush()?;
        }
        *self = Stream::Closed;
        Ok(())
    }
}

impl fmt::Debug for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self {
            Stream::Read(_) => "read",
            Stream::Write(_) => "write",
            Stream::Closed => "closed",
        };
        f.debug_tuple("Stream").field(&state).finish()
    }
}

/// A typed reference value.
#[derive(Clone, Debug)]
pub enum Reference {
    Frame(FrameId),
    Item(ItemId),
    Assoc(AssocRef),
    Stream(StreamRef),
}

impl Reference {
    /// The tag this reference routes under.
    pub fn tag(&self) -> Tag {
        match self {
            Reference::Frame(_) => Tag::Frame,
            Reference::Item(_) => Tag::Item,
            Reference::Assoc(_) => Tag::Assoc,
            Reference::Stream(_) => Tag::Stream,
        }
    }

    /// A fresh empty association.
    pub fn new_assoc() -> Reference {
        Reference::Assoc(Arc::new(Mutex::new(BTreeMap::new())))
    }

    /// Handle identity: ids compare by value, shared handles by pointer.
    pub fn same_as(&self, other: &Reference) -> bool {
        match (self, other) {
            (Reference::Frame(a), Reference::Frame(b)) => a == b,
            (Reference::Item(a), Reference::Item(b)) => a == b,
            (Reference::Assoc(a), Reference::Assoc(b)) => Arc::ptr_eq(a, b),
            (Reference::Stream(a), Reference::Stream(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}
