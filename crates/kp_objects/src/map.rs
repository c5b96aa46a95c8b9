use core::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use foldhash::fast::FixedState;
use kp_access::{Capabilities, Error, Key, Kind, Object, ObjectRef, Op};
use kp_access::{Reader, SafeReader, SafeWriter, Value, Writer};

use crate::{ObjectError, is_writable, make};

// -----------------------------------------------------------------------------
// Hash state

/// A fixed hash seed, so listing order only depends on the keys inserted.
const FIXED_HASH_STATE: FixedState = FixedState::with_seed(0x6A09E667F3BCC908);

type Table = hashbrown::HashMap<String, Value, FixedState>;

// -----------------------------------------------------------------------------
// Map

/// A string-keyed container exposing every capability.
///
/// `put` on an absent key materializes an empty container chosen by the
/// hint; `put` on a key holding a writable object returns that object.
///
/// # Examples
///
/// ```
/// use kp_access::{Reader, Value, Writer};
/// use kp_objects::Map;
///
/// let map: Map = [("a", 1), ("b", 2)].into_iter().collect();
///
/// assert_eq!(map.get("a"), Some(Value::Int(1)));
/// assert!(map.set("c", Value::from("new")));
/// assert!(!map.set("c", Value::from("again")));
///
/// let mut keys = map.list();
/// keys.sort();
/// assert_eq!(keys, ["a", "b", "c"]);
/// ```
pub struct Map {
    entries: RwLock<Table>,
}

impl Map {
    /// Creates an empty map.
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Table::with_hasher(FIXED_HASH_STATE)),
        }
    }

    /// Moves this map into a [`Value`].
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
    fn read(&self) -> RwLockReadGuard<'_, Table> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    #[inline]
    fn write(&self) -> RwLockWriteGuard<'_, Table> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Map {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Map {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Table::with_hasher(FIXED_HASH_STATE);
        table.extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
        Self {
            entries: RwLock::new(table),
        }
    }
}

impl fmt::Debug for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.read().iter()).finish()
    }
}

// -----------------------------------------------------------------------------
// Capabilities

impl Reader for Map {
    #[inline]
    fn get(&self, key: &str) -> Option<Value> {
        self.read().get(key).cloned()
    }

    fn list_to(&self, keys: &mut Vec<String>) {
        keys.extend(self.read().keys().cloned());
    }

    #[inline]
    fn kind(&self) -> Kind {
        Kind::Map
    }
}

impl SafeReader for Map {
    fn safe_get(&self, key: &str) -> Result<Value, Error> {
        self.get(key)
            .ok_or_else(|| Error::not_found(Op::Get, Key::from(key)))
    }
}

impl Writer for Map {
    #[inline]
    fn del(&self, key: &str) -> bool {
        self.write().remove(key).is_some()
    }

    #[inline]
    fn set(&self, key: &str, value: Value) -> bool {
        self.write().insert(String::from(key), value).is_none()
    }

    #[inline]
    fn put(&self, key: &str, hint: Kind) -> Option<ObjectRef> {
        self.safe_put(key, hint).ok()
    }
}

impl SafeWriter for Map {
    fn safe_del(&self, key: &str) -> Result<(), Error> {
        match self.del(key) {
            true => Ok(()),
            false => Err(Error::not_found(Op::Del, Key::from(key))),
        }
    }

    #[inline]
    fn safe_set(&self, key: &str, value: Value) -> Result<bool, Error> {
        Ok(self.set(key, value))
    }

    fn safe_put(&self, key: &str, hint: Kind) -> Result<ObjectRef, Error> {
        let mut entries = self.write();

        if let Some(existing) = entries.get(key) {
            return match existing {
                Value::Object(object) if is_writable(object) => Ok(object.clone()),
                other => Err(Error::unexpected_type(
                    Op::Put,
                    Key::from(key),
                    other.clone(),
                    Capabilities::WRITER,
                )),
            };
        }

        let child = make(hint).ok_or_else(|| {
            Error::backend(Op::Put, Key::from(key), ObjectError::UnsupportedHint(hint))
        })?;
        log::debug!("materialized an empty {hint} at `{key}`");
        entries.insert(String::from(key), Value::Object(child.clone()));
        Ok(child)
    }
}

impl Object for Map {
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

#[cfg(test)]
mod tests {
    use super::Map;
    use crate::{ObjectError, Slice};
    use kp_access::{Capabilities, Cause, Kind, Op};
    use kp_access::{Reader, SafeReader, SafeWriter, Value, Writer};

    #[test]
    fn safe_get_miss_is_not_found() {
        let map = Map::new();
        let err = map.safe_get("missing").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.op(), Op::Get);
        assert_eq!(err.key().segments(), ["missing"]);
    }

    #[test]
    fn set_reports_creation() {
        let map = Map::new();
        assert!(map.set("k", Value::Int(1)));
        assert!(!map.set("k", Value::Int(2)));
        assert_eq!(map.get("k"), Some(Value::Int(2)));
        assert_eq!(map.safe_set("j", Value::Null).unwrap(), true);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn del_absent() {
        let map: Map = [("k", true)].into_iter().collect();
        assert!(map.del("k"));
        assert!(!map.del("k"));
        assert!(map.safe_del("k").unwrap_err().is_not_found());
        assert!(map.is_empty());
    }

    #[test]
    fn put_creates_then_reuses() {
        let map = Map::new();

        let first = map.safe_put("m", Kind::Map).unwrap();
        assert_eq!(first.as_reader().map(Reader::kind), Some(Kind::Map));

        let again = map.safe_put("m", Kind::Slice).unwrap();
        assert_eq!(Value::Object(first), Value::Object(again));

        let list = map.put("s", Kind::Slice).unwrap();
        assert_eq!(list.as_reader().map(Reader::kind), Some(Kind::Slice));
    }

    #[test]
    fn put_over_scalar_is_unexpected_type() {
        let map: Map = [("n", 3)].into_iter().collect();
        let err = map.safe_put("n", Kind::Map).unwrap_err();
        assert!(err.is_unexpected_type());
        assert_eq!(err.want(), Some(Capabilities::WRITER));
        assert_eq!(err.got(), Some(&Value::Int(3)));
        assert!(map.put("n", Kind::Map).is_none());
    }

    #[test]
    fn put_unsupported_hint() {
        let map = Map::new();
        let err = map.safe_put("x", Kind::Struct).unwrap_err();
        let Cause::Backend(source) = err.cause() else {
            panic!("expected a backend cause, got {err}");
        };
        assert_eq!(
            source.downcast_ref::<ObjectError>(),
            Some(&ObjectError::UnsupportedHint(Kind::Struct)),
        );
        assert!(map.get("x").is_none());
    }

    #[test]
    fn nested_objects_are_shared() {
        let inner = Slice::new().into_value();
        let map: Map = [("list", inner.clone())].into_iter().collect();
        assert_eq!(map.get("list"), Some(inner));
    }
}
