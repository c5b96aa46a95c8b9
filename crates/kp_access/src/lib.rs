#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// Compilation config

/// Records one step of a prefix walk at `trace` level.
///
/// Only active with the `debug` feature in debug builds.
macro_rules! walk_trace {
    ($($arg:tt)*) => {
        #[cfg(all(debug_assertions, feature = "debug"))]
        log::trace!($($arg)*);
    };
}

pub(crate) use walk_trace;

// -----------------------------------------------------------------------------
// no_std support

#[cfg(any(test, feature = "std"))]
extern crate std;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod capability;
mod error;
mod key;
mod value;

pub mod prefix;

// -----------------------------------------------------------------------------
// Top-level exports

pub use capability::{Capabilities, Kind, Layer, Object, ObjectRef};
pub use capability::{Interface, Reader, SafeInterface, SafeReader, SafeWriter, Writer};
pub use error::{Cause, Error, Op};
pub use key::Key;
pub use prefix::{MAX_UNWRAP_DEPTH, Prefixed, PrefixedReader, PrefixedWriter};
pub use prefix::{prefix, prefix_reader, prefix_writer};
pub use value::Value;
