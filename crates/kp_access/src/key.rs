//! Provide [`Key`], the ordered segment sequence used to address nested values.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::ops::Deref;

use fastvec::FastVec;

// -----------------------------------------------------------------------------
// Key

/// An ordered sequence of opaque string segments, outer to inner.
///
/// The empty key addresses the base object itself.
/// Segments carry no syntax: `"a/b"` is one segment, not two.
///
/// [`prepend`] rewrites the receiver with the other key's segments in
/// front, while [`append`] leaves the receiver alone and returns a new key.
///
/// # Examples
///
/// ```
/// use kp_access::Key;
///
/// let mut key = Key::from(["b", "c"]);
/// key.prepend(&Key::from(["a"]));
/// assert_eq!(key, Key::from(["a", "b", "c"]));
///
/// let leaf = key.append("d");
/// assert_eq!(leaf.len(), 4);
/// assert_eq!(leaf.to_string(), "a/b/c/d");
/// ```
///
/// [`prepend`]: Key::prepend
/// [`append`]: Key::append
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key(Box<[String]>);

impl Key {
    /// Creates an empty key.
    #[inline]
    pub fn new() -> Self {
        Self(Box::default())
    }

    /// Inserts `other`'s segments before this key's own segments.
    pub fn prepend(&mut self, other: &Key) {
        if other.is_empty() {
            return;
        }

        let mut vec: FastVec<String, 8> = FastVec::new();
        let data = vec.get();
        data.extend(other.0.iter().cloned());
        data.extend(core::mem::take(&mut self.0));
        self.0 = vec.into_boxed_slice();
    }

    /// Returns a new key with `segment` added at the end.
    pub fn append(&self, segment: &str) -> Key {
        let mut vec: FastVec<String, 8> = FastVec::new();
        let data = vec.get();
        data.extend(self.0.iter().cloned());
        data.push(String::from(segment));
        Key(vec.into_boxed_slice())
    }

    /// Returns the first `len` segments.
    ///
    /// `len` larger than the key returns a copy of the whole key.
    pub fn truncate(&self, len: usize) -> Key {
        let len = len.min(self.0.len());
        Key(self.0[..len].into())
    }

    /// Returns the segments as a slice.
    #[inline]
    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl Deref for Key {
    type Target = [String];

    #[inline]
    fn deref(&self) -> &[String] {
        &self.0
    }
}

impl<S: Into<String>> FromIterator<S> for Key {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut vec: FastVec<String, 8> = FastVec::new();
        let data = vec.get();
        data.extend(iter.into_iter().map(Into::into));
        Key(vec.into_boxed_slice())
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for Key {
    #[inline]
    fn from(value: [S; N]) -> Self {
        value.into_iter().collect()
    }
}

impl From<&[&str]> for Key {
    #[inline]
    fn from(value: &[&str]) -> Self {
        value.iter().copied().collect()
    }
}

impl From<Vec<String>> for Key {
    #[inline]
    fn from(value: Vec<String>) -> Self {
        Key(value.into_boxed_slice())
    }
}

impl From<&str> for Key {
    #[inline]
    fn from(value: &str) -> Self {
        Key(Box::new([String::from(value)]))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for (i, segment) in self.0.iter().enumerate() {
            if i != 0 {
                f.write_str("/")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Key {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

// -----------------------------------------------------------------------------
// Tests
