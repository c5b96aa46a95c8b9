//! Capability dispatch for a single step of a prefixed operation.
//!
//! Every helper prefers the safe capability when the object exposes it,
//! falls back to the plain one, and fails with an unexpected-type error
//! when neither is present. `path` builds the absolute path of the step
//! and is only called on failure.

use crate::{Capabilities, Error, Key, Kind, ObjectRef, Op, Value};

// -----------------------------------------------------------------------------
// Read path

/// Looks `key` up in `container`.
pub(super) fn lookup(
    container: &ObjectRef,
    op: Op,
    key: &str,
    path: impl FnOnce() -> Key,
) -> Result<Value, Error> {
    if let Some(reader) = container.as_safe_reader() {
        return reader
            .safe_get(key)
            .map_err(|err| Error::nested(op, path(), err).with_got(Value::Object(container.clone())));
    }

    match container.as_reader() {
        Some(reader) => reader
            .get(key)
            .ok_or_else(|| Error::not_found(op, path()).with_got(Value::Object(container.clone()))),
        None => Err(Error::unexpected_type(
            op,
            path(),
            Value::Object(container.clone()),
            Capabilities::READER,
        )),
    }
}

/// Accepts `value` as the next container of a read walk.
pub(super) fn descend(value: Value, op: Op, path: impl FnOnce() -> Key) -> Result<ObjectRef, Error> {
    match value {
        Value::Object(object) if object.as_reader().is_some() => Ok(object),
        other => Err(Error::unexpected_type(op, path(), other, Capabilities::READER)),
    }
}

// -----------------------------------------------------------------------------
// Write path

/// Deletes `key` from `container`.
pub(super) fn remove(container: &ObjectRef, key: &str, path: impl FnOnce() -> Key) -> Result<(), Error> {
    if let Some(writer) = container.as_safe_writer() {
        return writer
            .safe_del(key)
            .map_err(|err| Error::nested(Op::Del, path(), err).with_got(Value::Object(container.clone())));
    }

    match container.as_writer() {
        Some(writer) if writer.del(key) => Ok(()),
        Some(_) => Err(Error::not_found(Op::Del, path()).with_got(Value::Object(container.clone()))),
        None => Err(Error::unexpected_type(
            Op::Del,
            path(),
            Value::Object(container.clone()),
            Capabilities::WRITER,
        )),
    }
}

/// Stores `value` at `key` in `container`, returning the created flag.
pub(super) fn assign(
    container: &ObjectRef,
    key: &str,
    value: Value,
    path: impl FnOnce() -> Key,
) -> Result<bool, Error> {
    if let Some(writer) = container.as_safe_writer() {
        return writer
            .safe_set(key, value)
            .map_err(|err| Error::nested(Op::Set, path(), err).with_got(Value::Object(container.clone())));
    }

    match container.as_writer() {
        Some(writer) => Ok(writer.set(key, value)),
        None => Err(Error::unexpected_type(
            Op::Set,
            path(),
            Value::Object(container.clone()),
            Capabilities::WRITER,
        )),
    }
}

/// Returns the sub-writer of `container` at `key`, creating it from `hint`.
pub(super) fn materialize(
    container: &ObjectRef,
    key: &str,
    hint: Kind,
    path: impl FnOnce() -> Key,
) -> Result<ObjectRef, Error> {
    if let Some(writer) = container.as_safe_writer() {
        return writer
            .safe_put(key, hint)
            .map_err(|err| Error::nested(Op::Put, path(), err).with_got(Value::Object(container.clone())));
    }

    match container.as_writer() {
        Some(writer) => writer
            .put(key, hint)
            .ok_or_else(|| Error::not_found(Op::Put, path()).with_got(Value::Object(container.clone()))),
        None => Err(Error::unexpected_type(
            Op::Put,
            path(),
            Value::Object(container.clone()),
            Capabilities::WRITER,
        )),
    }
}
