//! Provide [`Value`], the data flowing through get and set.

use alloc::string::String;
use alloc::sync::Arc;
use core::fmt;

use crate::{Object, ObjectRef};

// -----------------------------------------------------------------------------
// Value

/// A value stored in, or retrieved from, a capability object.
///
/// Scalars are held inline; containers are shared [`ObjectRef`] handles,
/// so cloning a `Value` never deep-copies nested data.
///
/// Equality compares scalars by value and objects by identity.
///
/// # Examples
///
/// ```
/// use kp_access::Value;
///
/// let v = Value::from("hello");
/// assert_eq!(v.as_str(), Some("hello"));
/// assert!(v.as_object().is_none());
///
/// assert_eq!(Value::from(3_i32), Value::Int(3));
/// assert!(Value::default().is_null());
/// ```
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Object(ObjectRef),
}

impl Value {
    /// Wraps `object` into a shared handle.
    #[inline]
    pub fn object<T: Object>(object: T) -> Self {
        Self::Object(Arc::new(object))
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[inline]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Self::Object(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn into_object(self) -> Option<ObjectRef> {
        match self {
            Self::Object(v) => Some(v),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => core::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b)),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            Self::Int(v) => f.debug_tuple("Int").field(v).finish(),
            Self::Float(v) => f.debug_tuple("Float").field(v).finish(),
            Self::Str(v) => f.debug_tuple("Str").field(v).finish(),
            Self::Object(v) => fmt::Debug::fmt(&**v, f),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(v) => fmt::Display::fmt(v, f),
            Self::Int(v) => fmt::Display::fmt(v, f),
            Self::Float(v) => fmt::Display::fmt(v, f),
            Self::Str(v) => write!(f, "{v:?}"),
            Self::Object(v) => match v.as_reader() {
                Some(reader) => write!(f, "<{}>", reader.kind()),
                None => write!(f, "<{}>", v.capabilities()),
            },
        }
    }
}

// -----------------------------------------------------------------------------
// Conversions

macro_rules! impl_from {
    ($variant:ident: $($ty:ty),+) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(value: $ty) -> Self {
                    Self::$variant(value.into())
                }
            }
        )+
    };
}

impl_from!(Bool: bool);
impl_from!(Int: i8, i16, i32, i64, u8, u16, u32);
impl_from!(Float: f32, f64);
impl_from!(Str: &str, String);
impl_from!(Object: ObjectRef);

impl<T: Into<Value>> From<Option<T>> for Value {
    #[inline]
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::Value;
    use crate::{Object, ObjectRef};
    use alloc::string::ToString;
    use alloc::sync::Arc;

    struct Opaque;

    impl Object for Opaque {}

    #[test]
    fn object_equality_is_identity() {
        let a: ObjectRef = Arc::new(Opaque);
        let b: ObjectRef = Arc::new(Opaque);

        assert_eq!(Value::from(a.clone()), Value::from(a.clone()));
        assert_ne!(Value::from(a), Value::from(b));
    }

    #[test]
    fn scalars_compare_by_value() {
        assert_eq!(Value::from(7_u8), Value::Int(7));
        assert_eq!(Value::from(1.5_f64), Value::Float(1.5));
        assert_ne!(Value::Int(1), Value::Float(1.0));
        assert_eq!(Value::from(None::<i64>), Value::Null);
    }

    #[test]
    fn display() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::from("x").to_string(), "\"x\"");
        assert_eq!(Value::object(Opaque).to_string(), "<none>");
    }
}
