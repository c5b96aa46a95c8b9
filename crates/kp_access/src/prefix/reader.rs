use alloc::string::String;
use alloc::vec::Vec;

use super::{Side, dispatch, flatten, resolve};
use crate::{Error, Key, Kind, Layer, Object, ObjectRef, Op, Reader, SafeReader, Value};

// -----------------------------------------------------------------------------
// PrefixedReader

/// A [`Reader`] rooted at the location `key` names inside `base`.
///
/// Every call flattens nested wrappers, walks the prefix against the live
/// `base` and then performs one final lookup. Intermediate containers are
/// never cached, so changes to `base` between calls are always observed.
///
/// A prefix walk only reads: if any segment is absent, or names a value
/// without [`Reader`] capability, the operation fails at that segment.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use kp_access::{Key, Kind, Object, ObjectRef, PrefixedReader, Reader, SafeReader, Value};
///
/// struct Leaf;
///
/// impl Reader for Leaf {
///     fn get(&self, key: &str) -> Option<Value> {
///         (key == "x").then_some(Value::Int(1))
///     }
///     fn list_to(&self, keys: &mut Vec<String>) {
///         keys.push("x".into());
///     }
///     fn kind(&self) -> Kind { Kind::Struct }
/// }
///
/// impl Object for Leaf {
///     fn as_reader(&self) -> Option<&dyn Reader> { Some(self) }
/// }
///
/// let leaf: ObjectRef = Arc::new(Leaf);
/// let reader = PrefixedReader::new(leaf, Key::new());
///
/// assert_eq!(reader.get("x"), Some(Value::Int(1)));
///
/// let err = reader.safe_get("y").unwrap_err();
/// assert!(err.is_not_found());
/// assert_eq!(err.key(), &Key::from("y"));
/// ```
#[derive(Debug, Clone)]
pub struct PrefixedReader {
    key: Key,
    base: ObjectRef,
}

impl PrefixedReader {
    /// Creates a reader over `base` rooted at `key`.
    #[inline]
    pub fn new(base: ObjectRef, key: impl Into<Key>) -> Self {
        Self {
            key: key.into(),
            base,
        }
    }

    /// Returns the prefix of this reader, as given at construction.
    #[inline]
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// Returns the object this reader wraps.
    #[inline]
    pub fn base(&self) -> &ObjectRef {
        &self.base
    }

    /// Returns the flattened prefix and the innermost non-wrapper base.
    ///
    /// Fails if wrappers nest deeper than [`MAX_UNWRAP_DEPTH`](crate::MAX_UNWRAP_DEPTH).
    pub fn flatten(&self, op: Op) -> Result<(Key, ObjectRef), Error> {
        flatten(op, &self.key, &self.base, Side::Read)
    }

    /// Returns the flattened prefix and the container it resolves to.
    pub fn container(&self, op: Op) -> Result<(Key, ObjectRef), Error> {
        let (key, base) = self.flatten(op)?;
        let container = resolve(op, &key, &base)?;
        Ok((key, container))
    }
}

impl SafeReader for PrefixedReader {
    fn safe_get(&self, key: &str) -> Result<Value, Error> {
        let (prefix, container) = self.container(Op::Get)?;
        dispatch::lookup(&container, Op::Get, key, || prefix.append(key))
    }
}

impl Reader for PrefixedReader {
    #[inline]
    fn get(&self, key: &str) -> Option<Value> {
        self.safe_get(key).ok()
    }

    fn list_to(&self, keys: &mut Vec<String>) {
        match self.container(Op::List) {
            Ok((_, container)) => {
                if let Some(reader) = container.as_reader() {
                    reader.list_to(keys);
                }
            }
            Err(err) => log::debug!("listing an unresolved prefix: {err}"),
        }
    }

    #[inline]
    fn kind(&self) -> Kind {
        self.base.as_reader().map_or(Kind::Opaque, Reader::kind)
    }
}

impl Object for PrefixedReader {
    #[inline]
    fn as_reader(&self) -> Option<&dyn Reader> {
        Some(self)
    }

    #[inline]
    fn as_safe_reader(&self) -> Option<&dyn SafeReader> {
        Some(self)
    }

    #[inline]
    fn reader_layer(&self) -> Option<Layer<'_>> {
        Some(Layer {
            key: &self.key,
            base: &self.base,
        })
    }
}
