#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Modules

mod error;
mod map;
mod slice;

// -----------------------------------------------------------------------------
// Top-level exports

pub use error::ObjectError;
pub use map::Map;
pub use slice::Slice;

use std::sync::Arc;

use kp_access::{Capabilities, Kind, ObjectRef};

/// Creates an empty container of the given kind.
///
/// Returns `None` for kinds without a concrete container here
/// ([`Kind::Struct`] and [`Kind::Opaque`]).
///
/// # Examples
///
/// ```
/// use kp_access::{Capabilities, Kind};
///
/// let map = kp_objects::make(Kind::Map).unwrap();
/// assert!(map.capabilities().contains(Capabilities::SAFE_INTERFACE));
///
/// assert!(kp_objects::make(Kind::Opaque).is_none());
/// ```
pub fn make(hint: Kind) -> Option<ObjectRef> {
    match hint {
        Kind::Map => Some(Arc::new(Map::new())),
        Kind::Slice => Some(Arc::new(Slice::new())),
        Kind::Struct | Kind::Opaque => None,
    }
}

/// Whether `put` may hand this object out as a sub-writer.
#[inline]
pub(crate) fn is_writable(object: &ObjectRef) -> bool {
    object
        .capabilities()
        .intersects(Capabilities::WRITER | Capabilities::SAFE_WRITER)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use kp_access::{Cause, Kind, ObjectRef, Op, PrefixedReader, PrefixedWriter, Value};
    use kp_access::{Reader, SafeReader, SafeWriter, Writer};

    use crate::{Map, ObjectError, Slice};

    /// `{ "users": { "ann": { "age": 31 } }, "tags": ["x", "y"] }`
    fn store() -> ObjectRef {
        let ann: Map = [("age", 31)].into_iter().collect();
        let users: Map = [("ann", ann.into_value())].into_iter().collect();
        let tags: Slice = ["x", "y"].into_iter().collect();
        let root: Map = [("users", users.into_value()), ("tags", tags.into_value())]
            .into_iter()
            .collect();
        Arc::new(root)
    }

    #[test]
    fn reads_through_nested_containers() {
        let root = store();

        let ann = PrefixedReader::new(root.clone(), ["users", "ann"]);
        assert_eq!(ann.safe_get("age").unwrap(), Value::Int(31));
        assert_eq!(ann.list(), ["age"]);
        assert_eq!(ann.kind(), Kind::Map);

        let tags = PrefixedReader::new(root, ["tags"]);
        assert_eq!(tags.get("1"), Some(Value::from("y")));
        assert_eq!(tags.list(), ["0", "1"]);
        // The kind is the base's, not the resolved container's.
        assert_eq!(tags.kind(), Kind::Map);
    }

    #[test]
    fn missing_user_reports_absolute_path() {
        let bob = PrefixedReader::new(store(), ["users", "bob"]);
        let err = bob.safe_get("age").unwrap_err();

        assert_eq!(err.op(), Op::Get);
        assert_eq!(err.key().segments(), ["users", "bob"]);
        assert!(err.is_not_found());
        assert!(bob.get("age").is_none());
    }

    #[test]
    fn slice_failure_is_nested_backend_error() {
        let tags = PrefixedReader::new(store(), ["tags"]);
        let err = tags.safe_get("7").unwrap_err();

        assert_eq!(err.key().segments(), ["tags", "7"]);
        let Cause::Nested(inner) = err.cause() else {
            panic!("expected a nested cause, got {err}");
        };
        let Cause::Backend(source) = inner.cause() else {
            panic!("expected a backend cause, got {inner}");
        };
        assert_eq!(
            source.downcast_ref::<ObjectError>(),
            Some(&ObjectError::OutOfBounds { index: 7, len: 2 }),
        );
    }

    #[test]
    fn put_builds_missing_structure() {
        let root: ObjectRef = Arc::new(Map::new());
        let writer = PrefixedWriter::new(root.clone(), ["config", "net"]);

        let proxy = writer.safe_put("proxy", Kind::Map).unwrap();
        assert!(proxy.as_writer().unwrap().set("host", Value::from("localhost")));

        let reader = PrefixedReader::new(root, ["config", "net", "proxy"]);
        assert_eq!(reader.get("host"), Some(Value::from("localhost")));
    }

    #[test]
    fn set_needs_existing_structure() {
        let root: ObjectRef = Arc::new(Map::new());
        let writer = PrefixedWriter::new(root.clone(), ["config"]);

        let err = writer.safe_set("debug", Value::Bool(true)).unwrap_err();
        assert_eq!(err.op(), Op::Set);
        assert!(err.is_not_found());
        assert!(!writer.set("debug", Value::Bool(true)));

        root.as_writer().unwrap().put("config", Kind::Map).unwrap();
        assert!(writer.safe_set("debug", Value::Bool(true)).unwrap());

        let reader = PrefixedReader::new(root, ["config"]);
        assert_eq!(reader.get("debug"), Some(Value::Bool(true)));
    }

    #[test]
    fn put_appends_into_slices() {
        let root = store();
        let writer = PrefixedWriter::new(root.clone(), ["tags"]);

        let extra = writer.safe_put("2", Kind::Map).unwrap();
        extra.as_safe_writer().unwrap().safe_set("k", Value::Int(1)).unwrap();

        let reader = PrefixedReader::new(root, ["tags", "2"]);
        assert_eq!(reader.get("k"), Some(Value::Int(1)));

        let err = writer.safe_put("9", Kind::Map).unwrap_err();
        assert_eq!(err.key().segments(), ["tags", "9"]);
    }

    #[test]
    fn delete_through_prefix() {
        let root = store();
        let writer = PrefixedWriter::new(root.clone(), ["users", "ann"]);

        writer.safe_del("age").unwrap();
        assert!(writer.safe_del("age").unwrap_err().is_not_found());

        let reader = PrefixedReader::new(root, ["users", "ann"]);
        assert!(reader.list().is_empty());
    }
}
