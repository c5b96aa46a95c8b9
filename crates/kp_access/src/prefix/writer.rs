use super::{Side, dispatch, flatten, resolve};
use crate::{Capabilities, Error, Key, Kind, Layer, Object, ObjectRef, Op, SafeWriter, Value, Writer};

// -----------------------------------------------------------------------------
// PrefixedWriter

/// A [`Writer`] rooted at the location `key` names inside `base`.
///
/// `del` and `set` only navigate: the flattened base must also be a
/// [`Reader`](crate::Reader), and every prefix segment must already exist.
/// `put` is the one operation that creates structure, calling `put` on
/// each segment of the prefix in turn.
#[derive(Debug, Clone)]
pub struct PrefixedWriter {
    key: Key,
    base: ObjectRef,
}

impl PrefixedWriter {
    /// Creates a writer over `base` rooted at `key`.
    #[inline]
    pub fn new(base: ObjectRef, key: impl Into<Key>) -> Self {
        Self {
            key: key.into(),
            base,
        }
    }

    /// Returns the prefix of this writer, as given at construction.
    #[inline]
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// Returns the object this writer wraps.
    #[inline]
    pub fn base(&self) -> &ObjectRef {
        &self.base
    }

    /// Returns the flattened prefix and the innermost non-wrapper base.
    pub fn flatten(&self, op: Op) -> Result<(Key, ObjectRef), Error> {
        flatten(op, &self.key, &self.base, Side::Write)
    }

    /// Resolves the prefix for a non-creating write.
    fn container(&self, op: Op) -> Result<(Key, ObjectRef), Error> {
        let (key, base) = self.flatten(op)?;
        if base.as_reader().is_none() {
            return Err(Error::unexpected_type(
                op,
                self.key.clone(),
                Value::Object(self.base.clone()),
                Capabilities::READER,
            ));
        }
        let container = resolve(op, &key, &base)?;
        Ok((key, container))
    }
}

impl SafeWriter for PrefixedWriter {
    fn safe_del(&self, key: &str) -> Result<(), Error> {
        let (prefix, container) = self.container(Op::Del)?;
        dispatch::remove(&container, key, || prefix.append(key))
    }

    fn safe_set(&self, key: &str, value: Value) -> Result<bool, Error> {
        let (prefix, container) = self.container(Op::Set)?;
        dispatch::assign(&container, key, value, || prefix.append(key))
    }

    fn safe_put(&self, key: &str, hint: Kind) -> Result<ObjectRef, Error> {
        let (prefix, mut writer) = self.flatten(Op::Put)?;
        let path = prefix.append(key);

        for (i, segment) in path.iter().enumerate() {
            crate::walk_trace!("Put {path}: step {i} `{segment}`");
            writer = dispatch::materialize(&writer, segment, hint, || path.truncate(i + 1))?;
        }

        Ok(writer)
    }
}

impl Writer for PrefixedWriter {
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

impl Object for PrefixedWriter {
    #[inline]
    fn as_writer(&self) -> Option<&dyn Writer> {
        Some(self)
    }

    #[inline]
    fn as_safe_writer(&self) -> Option<&dyn SafeWriter> {
        Some(self)
    }

    #[inline]
    fn writer_layer(&self) -> Option<Layer<'_>> {
        Some(Layer {
            key: &self.key,
            base: &self.base,
        })
    }
}
