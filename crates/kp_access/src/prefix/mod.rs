//! Provide prefix wrappers that root capability objects at a nested path.
//!
//! - [`PrefixedReader`]: read through a prefix; fails on absent segments.
//! - [`PrefixedWriter`]: write through a prefix; `put` creates segments.
//! - [`Prefixed`]: both, sharing one key over one object.
//!
//! Wrappers nested inside wrappers are flattened before each operation:
//! the inner prefix is nearer the base, so it is prepended to the outer
//! one and the walk starts from the innermost non-wrapper object. At most
//! [`MAX_UNWRAP_DEPTH`] layers are unwrapped.

// -----------------------------------------------------------------------------
// Modules

mod dispatch;
mod reader;
mod writer;

// -----------------------------------------------------------------------------
// Exports

pub use reader::PrefixedReader;
pub use writer::PrefixedWriter;

use alloc::string::String;
use alloc::vec::Vec;

use crate::{
    Cause, Error, Key, Kind, Layer, Object, ObjectRef, Op, Reader, SafeReader, SafeWriter, Value,
    Writer,
};

/// The maximum number of prefix layers unwrapped while flattening.
pub const MAX_UNWRAP_DEPTH: usize = 128;

// -----------------------------------------------------------------------------
// Flattening and walking

#[derive(Debug, Clone, Copy)]
enum Side {
    Read,
    Write,
}

/// Collapses the wrappers around `base` into one key over a non-wrapper.
fn flatten(op: Op, key: &Key, base: &ObjectRef, side: Side) -> Result<(Key, ObjectRef), Error> {
    let mut flat = key.clone();
    let mut it = base.clone();

    for _ in 0..MAX_UNWRAP_DEPTH {
        let layer = match side {
            Side::Read => it.reader_layer(),
            Side::Write => it.writer_layer(),
        };
        let Some(layer) = layer else {
            return Ok((flat, it));
        };
        flat.prepend(layer.key);
        let next = layer.base.clone();
        it = next;
    }

    log::warn!("{op} {key}: prefix wrappers nest deeper than {MAX_UNWRAP_DEPTH} layers");
    Err(Error::new(op, key.clone(), Cause::MaxDepthExceeded).with_got(Value::Object(base.clone())))
}

/// Walks `key` from `base`, requiring every step to be an existing reader.
fn resolve(op: Op, key: &Key, base: &ObjectRef) -> Result<ObjectRef, Error> {
    let mut current = base.clone();

    for (i, segment) in key.iter().enumerate() {
        crate::walk_trace!("{op} {key}: step {i} `{segment}`");
        let value = dispatch::lookup(&current, op, segment, || key.truncate(i + 1))?;
        current = dispatch::descend(value, op, || key.truncate(i + 1))?;
    }

    Ok(current)
}

// -----------------------------------------------------------------------------
// Constructors

/// Creates a [`PrefixedReader`] over `base` rooted at `key`.
#[inline]
pub fn prefix_reader(base: ObjectRef, key: impl Into<Key>) -> PrefixedReader {
    PrefixedReader::new(base, key)
}

/// Creates a [`PrefixedWriter`] over `base` rooted at `key`.
#[inline]
pub fn prefix_writer(base: ObjectRef, key: impl Into<Key>) -> PrefixedWriter {
    PrefixedWriter::new(base, key)
}

/// Creates a [`Prefixed`] over `base` rooted at `key`.
#[inline]
pub fn prefix(base: ObjectRef, key: impl Into<Key>) -> Prefixed {
    Prefixed::new(base, key)
}

// -----------------------------------------------------------------------------
// Prefixed

/// A [`PrefixedReader`] and a [`PrefixedWriter`] used as one handle.
///
/// Usually built from one object that is both readable and writable, so
/// it can be handed to code expecting a reader, a writer or both.
#[derive(Debug, Clone)]
pub struct Prefixed {
    reader: PrefixedReader,
    writer: PrefixedWriter,
}

impl Prefixed {
    /// Creates a reader and a writer over `base`, both rooted at `key`.
    pub fn new(base: ObjectRef, key: impl Into<Key>) -> Self {
        let key = key.into();
        Self {
            reader: PrefixedReader::new(base.clone(), key.clone()),
            writer: PrefixedWriter::new(base, key),
        }
    }

    /// Pairs two independently built halves.
    #[inline]
    pub fn from_parts(reader: PrefixedReader, writer: PrefixedWriter) -> Self {
        Self { reader, writer }
    }

    #[inline]
    pub fn reader(&self) -> &PrefixedReader {
        &self.reader
    }

    #[inline]
    pub fn writer(&self) -> &PrefixedWriter {
        &self.writer
    }

    #[inline]
    pub fn into_parts(self) -> (PrefixedReader, PrefixedWriter) {
        (self.reader, self.writer)
    }
}

impl Reader for Prefixed {
    #[inline]
    fn get(&self, key: &str) -> Option<Value> {
        self.reader.get(key)
    }

    #[inline]
    fn list_to(&self, keys: &mut Vec<String>) {
        self.reader.list_to(keys);
    }

    #[inline]
    fn kind(&self) -> Kind {
        self.reader.kind()
    }
}

impl SafeReader for Prefixed {
    #[inline]
    fn safe_get(&self, key: &str) -> Result<Value, Error> {
        self.reader.safe_get(key)
    }
}

impl Writer for Prefixed {
    #[inline]
    fn del(&self, key: &str) -> bool {
        self.writer.del(key)
    }

    #[inline]
    fn set(&self, key: &str, value: Value) -> bool {
        self.writer.set(key, value)
    }

    #[inline]
    fn put(&self, key: &str, hint: Kind) -> Option<ObjectRef> {
        self.writer.put(key, hint)
    }
}

impl SafeWriter for Prefixed {
    #[inline]
    fn safe_del(&self, key: &str) -> Result<(), Error> {
        self.writer.safe_del(key)
    }

    #[inline]
    fn safe_set(&self, key: &str, value: Value) -> Result<bool, Error> {
        self.writer.safe_set(key, value)
    }

    #[inline]
    fn safe_put(&self, key: &str, hint: Kind) -> Result<ObjectRef, Error> {
        self.writer.safe_put(key, hint)
    }
}

impl Object for Prefixed {
    #[inline]
    fn as_reader(&self) -> Option<&dyn Reader> {
        Some(self)
    }

    #[inline]
    fn as_safe_reader(&self) -> Option<&dyn SafeReader> {
        Some(self)
    }

    #[inline]
    fn as_writer(&self) -> Option<&dyn Writer> {
        Some(self)
    }

    #[inline]
    fn as_safe_writer(&self) -> Option<&dyn SafeWriter> {
        Some(self)
    }

    #[inline]
    fn reader_layer(&self) -> Option<Layer<'_>> {
        self.reader.reader_layer()
    }

    #[inline]
    fn writer_layer(&self) -> Option<Layer<'_>> {
        self.writer.writer_layer()
    }
}

// -----------------------------------------------------------------------------
// Tests
