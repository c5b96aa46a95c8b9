use core::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use kp_access::{Capabilities, Error, Key, Kind, Object, ObjectRef, Op};
use kp_access::{Reader, SafeReader, SafeWriter, Value, Writer};

use crate::{ObjectError, is_writable, make};

// -----------------------------------------------------------------------------
// Slice

/// An index-keyed container exposing every capability.
///
/// Keys are decimal indices. Writing at index `len` appends, writing below
/// it overwrites, and anything further out is an out-of-bounds error.
///
/// # Examples
///
/// ```
/// use kp_access::{Reader, Value, Writer};
/// use kp_objects::Slice;
///
/// let list: Slice = ["x", "y"].into_iter().collect();
///
/// assert_eq!(list.get("1"), Some(Value::from("y")));
/// assert!(list.set("2", Value::from("z")));
/// assert!(!list.set("0", Value::from("w")));
/// assert!(!list.set("9", Value::Null));
///
/// assert_eq!(list.list(), ["0", "1", "2"]);
/// ```
pub struct Slice {
    items: RwLock<Vec<Value>>,
}

impl Slice {
    /// Creates an empty slice.
    #[inline]
    pub const fn new() -> Self {
        Self {
            items: RwLock::new(Vec::new()),
        }
    }

    /// Moves this slice into a [`Value`].
    #[inline]
    pub fn into_value(self) -> Value {
        Value::object(self)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    #[inline]
    fn read(&self) -> RwLockReadGuard<'_, Vec<Value>> {
        self.items.read().unwrap_or_else(PoisonError::into_inner)
    }

    #[inline]
    fn write(&self) -> RwLockWriteGuard<'_, Vec<Value>> {
        self.items.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Slice {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Into<Value>> FromIterator<V> for Slice {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self {
            items: RwLock::new(iter.into_iter().map(Into::into).collect()),
        }
    }
}

impl fmt::Debug for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.read().iter()).finish()
    }
}

// -----------------------------------------------------------------------------
// Index helpers

fn parse_index(op: Op, key: &str) -> Result<usize, Error> {
    key.parse::<usize>()
        .map_err(|err| Error::backend(op, Key::from(key), err))
}

#[cold]
fn out_of_bounds(op: Op, key: &str, index: usize, len: usize) -> Error {
    Error::backend(op, Key::from(key), ObjectError::OutOfBounds { index, len })
}

// -----------------------------------------------------------------------------
// Capabilities

impl Reader for Slice {
    #[inline]
    fn get(&self, key: &str) -> Option<Value> {
        self.safe_get(key).ok()
    }

    fn list_to(&self, keys: &mut Vec<String>) {
        let len = self.len();
        keys.reserve(len);
        keys.extend((0..len).map(|index| index.to_string()));
    }

    #[inline]
    fn kind(&self) -> Kind {
        Kind::Slice
    }
}

impl SafeReader for Slice {
    fn safe_get(&self, key: &str) -> Result<Value, Error> {
        let index = parse_index(Op::Get, key)?;
        let items = self.read();
        match items.get(index) {
            Some(value) => Ok(value.clone()),
            None => Err(out_of_bounds(Op::Get, key, index, items.len())),
        }
    }
}

impl Writer for Slice {
    #[inline]
    fn del(&self, key: &str) -> bool {
        self.safe_del(key).is_ok()
    }

    #[inline]
    fn set(&self, key: &str, value: Value) -> bool {
        self.safe_set(key, value).unwrap_or(false)
    }

    #[inline]
    fn put(&self, key: &str, hint: Kind) -> Option<ObjectRef> {
        self.safe_put(key, hint).ok()
    }
}

impl SafeWriter for Slice {
    fn safe_del(&self, key: &str) -> Result<(), Error> {
        let index = parse_index(Op::Del, key)?;
        let mut items = self.write();
        let len = items.len();
        if index >= len {
            return Err(out_of_bounds(Op::Del, key, index, len));
        }
        items.remove(index);
        Ok(())
    }

    fn safe_set(&self, key: &str, value: Value) -> Result<bool, Error> {
        let index = parse_index(Op::Set, key)?;
        let mut items = self.write();
        let len = items.len();
        if index < len {
            items[index] = value;
            Ok(false)
        } else if index == len {
            items.push(value);
            Ok(true)
        } else {
            Err(out_of_bounds(Op::Set, key, index, len))
        }
    }

    fn safe_put(&self, key: &str, hint: Kind) -> Result<ObjectRef, Error> {
        let index = parse_index(Op::Put, key)?;
        let mut items = self.write();
        let len = items.len();

        if index < len {
            return match &items[index] {
                Value::Object(object) if is_writable(object) => Ok(object.clone()),
                other => Err(Error::unexpected_type(
                    Op::Put,
                    Key::from(key),
                    other.clone(),
                    Capabilities::WRITER,
                )),
            };
        }
        if index > len {
            return Err(out_of_bounds(Op::Put, key, index, len));
        }

        let child = make(hint).ok_or_else(|| {
            Error::backend(Op::Put, Key::from(key), ObjectError::UnsupportedHint(hint))
        })?;
        log::debug!("appended an empty {hint} at index {index}");
        items.push(Value::Object(child.clone()));
        Ok(child)
    }
}

impl Object for Slice {
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
}

// -----------------------------------------------------------------------------
// Tests
