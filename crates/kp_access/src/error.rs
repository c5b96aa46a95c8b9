//! Provide the structured [`Error`] reported by safe operations.

use alloc::boxed::Box;
use core::{error, fmt};

use thiserror::Error as ThisError;

use crate::{Capabilities, Key, MAX_UNWRAP_DEPTH, Value};

// -----------------------------------------------------------------------------
// Op

/// The operation an [`Error`] was raised by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Get,
    Set,
    Del,
    Put,
    List,
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => f.pad("Get"),
            Self::Set => f.pad("Set"),
            Self::Del => f.pad("Del"),
            Self::Put => f.pad("Put"),
            Self::List => f.pad("List"),
        }
    }
}

// -----------------------------------------------------------------------------
// Cause

/// Why an operation failed.
#[derive(Debug, ThisError)]
#[non_exhaustive]
pub enum Cause {
    /// A key is absent at some step of the path.
    #[error("not found")]
    NotFound,

    /// A retrieved value lacks the capability needed to continue.
    #[error("unexpected type")]
    UnexpectedType,

    /// A chain of prefix wrappers nests deeper than [`MAX_UNWRAP_DEPTH`].
    #[error("prefix wrappers nest deeper than {} layers", MAX_UNWRAP_DEPTH)]
    MaxDepthExceeded,

    /// A failure reported by a deeper structured operation.
    #[error(transparent)]
    Nested(Box<Error>),

    /// A failure specific to a backing container.
    #[error(transparent)]
    Backend(Box<dyn error::Error + Send + Sync>),
}

// -----------------------------------------------------------------------------
// Error

/// A failed operation, recorded at the step where it failed.
///
/// `key` is always the absolute path from the root the operation was
/// issued against, up to and including the failing step.
///
/// # Examples
///
/// ```
/// use kp_access::{Error, Key, Op};
///
/// let inner = Error::not_found(Op::Get, Key::from("y"));
/// let outer = Error::nested(Op::Get, Key::from(["a", "y"]), inner);
///
/// assert!(outer.is_not_found());
/// assert_eq!(outer.root().key(), &Key::from("y"));
/// assert_eq!(outer.to_string(), "Get a/y: Get y: not found");
/// ```
#[derive(Debug)]
pub struct Error {
    op: Op,
    key: Key,
    got: Option<Value>,
    want: Option<Capabilities>,
    cause: Cause,
}

impl Error {
    /// Creates an error with no diagnostic value attached.
    #[inline]
    pub fn new(op: Op, key: Key, cause: Cause) -> Self {
        Self {
            op,
            key,
            got: None,
            want: None,
            cause,
        }
    }

    #[inline]
    pub fn not_found(op: Op, key: Key) -> Self {
        Self::new(op, key, Cause::NotFound)
    }

    /// Creates a type-mismatch error: `got` lacks the capability `want`.
    #[inline]
    pub fn unexpected_type(op: Op, key: Key, got: Value, want: Capabilities) -> Self {
        Self::new(op, key, Cause::UnexpectedType)
            .with_got(got)
            .with_want(want)
    }

    /// Wraps a deeper structured error at this layer's path.
    #[inline]
    pub fn nested(op: Op, key: Key, inner: Error) -> Self {
        Self::new(op, key, Cause::Nested(Box::new(inner)))
    }

    /// Wraps a container-specific failure.
    #[inline]
    pub fn backend(op: Op, key: Key, source: impl Into<Box<dyn error::Error + Send + Sync>>) -> Self {
        Self::new(op, key, Cause::Backend(source.into()))
    }

    /// Records the value or container that was found.
    #[inline]
    pub fn with_got(mut self, got: Value) -> Self {
        self.got = Some(got);
        self
    }

    /// Records the capability that was expected.
    #[inline]
    pub fn with_want(mut self, want: Capabilities) -> Self {
        self.want = Some(want);
        self
    }

    #[inline]
    pub fn op(&self) -> Op {
        self.op
    }

    #[inline]
    pub fn key(&self) -> &Key {
        &self.key
    }

    #[inline]
    pub fn got(&self) -> Option<&Value> {
        self.got.as_ref()
    }

    #[inline]
    pub fn want(&self) -> Option<Capabilities> {
        self.want
    }

    #[inline]
    pub fn cause(&self) -> &Cause {
        &self.cause
    }

    /// Returns the innermost structured error of the chain.
    ///
    /// Backend causes that are themselves an [`Error`] are followed too.
    pub fn root(&self) -> &Error {
        let mut it = self;
        while let Some(inner) = it.inner() {
            it = inner;
        }
        it
    }

    /// Returns `true` if the chain ends in a not-found cause.
    #[inline]
    pub fn is_not_found(&self) -> bool {
        matches!(self.root().cause, Cause::NotFound)
    }

    /// Returns `true` if the chain ends in a type mismatch.
    #[inline]
    pub fn is_unexpected_type(&self) -> bool {
        matches!(self.root().cause, Cause::UnexpectedType)
    }

    /// Returns `true` if the chain ends in an exhausted unwrap bound.
    #[inline]
    pub fn is_max_depth_exceeded(&self) -> bool {
        matches!(self.root().cause, Cause::MaxDepthExceeded)
    }

    fn inner(&self) -> Option<&Error> {
        match &self.cause {
            Cause::Nested(inner) => Some(inner.as_ref()),
            Cause::Backend(source) => source.downcast_ref::<Error>(),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.op, self.key, self.cause)?;
        if let Some(want) = self.want {
            write!(f, " (want {want}")?;
            if let Some(got) = &self.got {
                write!(f, ", got {got}")?;
            }
            f.write_str(")")?;
        }
        Ok(())
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match &self.cause {
            Cause::Nested(inner) => Some(&**inner),
            Cause::Backend(source) => Some(&**source),
            _ => None,
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{Cause, Error, Op};
    use crate::{Capabilities, Key, Value};
    use alloc::string::ToString;
    use core::error::Error as _;

    #[derive(Debug, thiserror::Error)]
    #[error("disk on fire")]
    struct Fire;

    #[test]
    fn not_found_through_nesting() {
        let leaf = Error::not_found(Op::Del, Key::from("c"));
        let mid = Error::nested(Op::Del, Key::from(["b", "c"]), leaf);
        let top = Error::nested(Op::Del, Key::from(["a", "b", "c"]), mid);

        assert!(top.is_not_found());
        assert!(!top.is_unexpected_type());
        assert_eq!(top.key(), &Key::from(["a", "b", "c"]));
        assert_eq!(top.root().key(), &Key::from("c"));
        assert!(top.source().is_some());
    }

    #[test]
    fn not_found_through_backend_box() {
        let inner = Error::not_found(Op::Get, Key::from("x"));
        let outer = Error::backend(Op::Get, Key::from(["p", "x"]), inner);
        assert!(outer.is_not_found());
    }

    #[test]
    fn opaque_backend_is_its_own_root() {
        let err = Error::backend(Op::Set, Key::from("k"), Fire);
        assert!(!err.is_not_found());
        assert!(matches!(err.root().cause(), Cause::Backend(_)));
        assert_eq!(err.to_string(), "Set k: disk on fire");
    }

    #[test]
    fn display_unexpected_type() {
        let err = Error::unexpected_type(Op::Get, Key::from("a"), Value::Int(3), Capabilities::READER);
        assert_eq!(err.to_string(), "Get a: unexpected type (want Reader, got 3)");
        assert_eq!(err.want(), Some(Capabilities::READER));
        assert_eq!(err.got(), Some(&Value::Int(3)));
    }
}
