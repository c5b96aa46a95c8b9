#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use kp_access as access;

#[cfg(feature = "std")]
pub use kp_objects as objects;
