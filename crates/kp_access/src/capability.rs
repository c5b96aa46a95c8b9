//! Provide the capability traits that backing containers implement.
//!
//! ## Menu
//!
//! - [`Reader`]: keyed lookup with a found flag, key listing and a [`Kind`] tag.
//! - [`SafeReader`]: keyed lookup reporting a structured [`Error`].
//! - [`Writer`]: delete, set and put with boolean / optional results.
//! - [`SafeWriter`]: the same three operations reporting a structured [`Error`].
//! - [`Interface`] and [`SafeInterface`]: the read + write combinations.
//!
//! Every capability object also implements [`Object`], which is the only
//! place its capabilities are discovered at run time.

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use bitflags::bitflags;

use crate::{Error, Key, Value};

// -----------------------------------------------------------------------------
// Kind

/// A coarse tag describing what a [`Reader`] is backed by.
///
/// Also used as the type hint of [`Writer::put`], telling the container
/// which concrete container to materialize for a missing key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Map,
    Slice,
    Struct,
    Opaque,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Map => f.pad("Map"),
            Self::Slice => f.pad("Slice"),
            Self::Struct => f.pad("Struct"),
            Self::Opaque => f.pad("Opaque"),
        }
    }
}

// -----------------------------------------------------------------------------
// Capabilities

bitflags! {
    /// The set of capability traits an [`Object`] exposes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        const READER = 1;
        const SAFE_READER = 1 << 1;
        const WRITER = 1 << 2;
        const SAFE_WRITER = 1 << 3;

        const INTERFACE = Self::READER.bits() | Self::WRITER.bits();
        const SAFE_INTERFACE = Self::SAFE_READER.bits() | Self::SAFE_WRITER.bits();
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        const NAMES: [(Capabilities, &str); 4] = [
            (Capabilities::READER, "Reader"),
            (Capabilities::SAFE_READER, "SafeReader"),
            (Capabilities::WRITER, "Writer"),
            (Capabilities::SAFE_WRITER, "SafeWriter"),
        ];

        let mut first = true;
        for (flag, name) in NAMES {
            if !self.contains(flag) {
                continue;
            }
            if !first {
                f.write_str(" + ")?;
            }
            first = false;
            f.write_str(name)?;
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Capability traits

/// Read access by key.
pub trait Reader {
    /// Returns the value stored at `key`, or `None` if absent.
    fn get(&self, key: &str) -> Option<Value>;

    /// Appends every key of this container to `keys`.
    fn list_to(&self, keys: &mut Vec<String>);

    /// Returns every key of this container.
    fn list(&self) -> Vec<String> {
        let mut keys = Vec::new();
        self.list_to(&mut keys);
        keys
    }

    /// Returns the kind of this container.
    fn kind(&self) -> Kind;
}

/// Read access by key, reporting why a lookup failed.
pub trait SafeReader {
    /// Returns the value stored at `key`.
    ///
    /// An absent key is reported as an [`Error`] whose cause is not-found.
    fn safe_get(&self, key: &str) -> Result<Value, Error>;
}

/// Write access by key.
pub trait Writer {
    /// Removes `key`, returning `false` if nothing was removed.
    fn del(&self, key: &str) -> bool;

    /// Stores `value` at `key`.
    ///
    /// Returns `true` if a new entry was created, `false` if an existing
    /// one was overwritten or the write was refused.
    fn set(&self, key: &str, value: Value) -> bool;

    /// Returns a writer rooted at `key`, creating a container of kind
    /// `hint` when the key is absent.
    fn put(&self, key: &str, hint: Kind) -> Option<ObjectRef>;
}

/// Write access by key, reporting why a write failed.
pub trait SafeWriter {
    /// Removes `key`.
    fn safe_del(&self, key: &str) -> Result<(), Error>;

    /// Stores `value` at `key`; `Ok(true)` means a new entry was created.
    fn safe_set(&self, key: &str, value: Value) -> Result<bool, Error>;

    /// Returns a writer rooted at `key`, creating it from `hint` if absent.
    fn safe_put(&self, key: &str, hint: Kind) -> Result<ObjectRef, Error>;
}

/// [`Reader`] + [`Writer`].
pub trait Interface: Reader + Writer {}

impl<T: Reader + Writer + ?Sized> Interface for T {}

/// [`SafeReader`] + [`SafeWriter`].
pub trait SafeInterface: SafeReader + SafeWriter {}

impl<T: SafeReader + SafeWriter + ?Sized> SafeInterface for T {}

// -----------------------------------------------------------------------------
// Object

/// A shared handle to a capability object.
pub type ObjectRef = Arc<dyn Object>;

/// One unwrapped layer of a prefix wrapper: its own key and its base.
#[derive(Debug, Clone, Copy)]
pub struct Layer<'a> {
    pub key: &'a Key,
    pub base: &'a ObjectRef,
}

/// A value that may expose any of the capability traits.
///
/// The `as_*` methods default to `None`; a container overrides the ones
/// it supports by returning `Some(self)`.
///
/// # Examples
///
/// ```
/// use kp_access::{Capabilities, Kind, Object, Reader, Value};
///
/// struct Point { x: i64, y: i64 }
///
/// impl Reader for Point {
///     fn get(&self, key: &str) -> Option<Value> {
///         match key {
///             "x" => Some(Value::Int(self.x)),
///             "y" => Some(Value::Int(self.y)),
///             _ => None,
///         }
///     }
///     fn list_to(&self, keys: &mut Vec<String>) {
///         keys.extend(["x".into(), "y".into()]);
///     }
///     fn kind(&self) -> Kind { Kind::Struct }
/// }
///
/// impl Object for Point {
///     fn as_reader(&self) -> Option<&dyn Reader> { Some(self) }
/// }
///
/// let point = Point { x: 1, y: 2 };
/// assert_eq!(point.capabilities(), Capabilities::READER);
/// assert_eq!(point.get("y"), Some(Value::Int(2)));
/// ```
pub trait Object: Send + Sync + 'static {
    #[inline]
    fn as_reader(&self) -> Option<&dyn Reader> {
        None
    }

    #[inline]
    fn as_safe_reader(&self) -> Option<&dyn SafeReader> {
        None
    }

    #[inline]
    fn as_writer(&self) -> Option<&dyn Writer> {
        None
    }

    #[inline]
    fn as_safe_writer(&self) -> Option<&dyn SafeWriter> {
        None
    }

    /// Returns the prefix layer to unwrap when this object is the base of
    /// a reading wrapper. Only prefix wrappers return `Some`.
    #[inline]
    fn reader_layer(&self) -> Option<Layer<'_>> {
        None
    }

    /// Returns the prefix layer to unwrap when this object is the base of
    /// a writing wrapper. Only prefix wrappers return `Some`.
    #[inline]
    fn writer_layer(&self) -> Option<Layer<'_>> {
        None
    }

    /// Summarises the capabilities this object exposes.
    fn capabilities(&self) -> Capabilities {
        let mut caps = Capabilities::empty();
        caps.set(Capabilities::READER, self.as_reader().is_some());
        caps.set(Capabilities::SAFE_READER, self.as_safe_reader().is_some());
        caps.set(Capabilities::WRITER, self.as_writer().is_some());
        caps.set(Capabilities::SAFE_WRITER, self.as_safe_writer().is_some());
        caps
    }
}

impl fmt::Debug for dyn Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = self.as_reader().map(Reader::kind);
        f.debug_struct("Object")
            .field("kind", &kind)
            .field("capabilities", &self.capabilities())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::Capabilities;
    use alloc::string::ToString;

    #[test]
    fn capabilities_display() {
        assert_eq!(Capabilities::empty().to_string(), "none");
        assert_eq!(Capabilities::READER.to_string(), "Reader");
        assert_eq!(
            Capabilities::INTERFACE.to_string(),
            "Reader + Writer",
        );
        assert_eq!(
            Capabilities::all().to_string(),
            "Reader + SafeReader + Writer + SafeWriter",
        );
    }
}
