//! # oxid
//!
//! Globally unique, time-ordered, lexicographically sortable 12-byte
//! identifiers in the ObjectID / xid layout, with a 20-character text form
//! that sorts the same way as the bytes.
//!
//! ```text
//! | timestamp (4) | machine (3) | pid (2) | counter (3) |
//! ```
//!
//! - [`id::Xid`]: the identifier and its fixed-offset [`id::Field`]s.
//! - [`base32`]: the bijective, order-preserving text codec.
//! - [`counter`]: the 24-bit wraparound [`counter::CounterStore`] and its
//!   lock-free and mutex-backed implementations.
//! - [`identity`]: the machine fingerprint and pid, computed once.
//! - [`generator`]: combines the above with a [`time::TimeSource`].
//! - [`inspect`]: reads components back out of encoded strings.
//!
//! ## Example
//!
//! ```
//! use oxid::{
//!     counter::{AtomicCounter, CounterStore},
//!     generator::XidGenerator,
//!     identity::IdentityContext,
//!     inspect,
//!     time::SystemClock,
//! };
//!
//! let generator = XidGenerator::new(IdentityContext::detect(), AtomicCounter::random(), SystemClock);
//! generator.counter().set_counter(16_777_215).unwrap();
//!
//! let a = generator.generate(None).unwrap();
//! let b = generator.generate(None).unwrap();
//! assert_eq!(inspect::counter_of(&a).unwrap(), 0);
//! assert_eq!(inspect::counter_of(&b).unwrap(), 1);
//! ```
//!
//! ## Features
//!
//! - `lock`: adds [`counter::LockCounter`], backed by a std mutex.
//! - `parking-lot`: backs `LockCounter` with `parking_lot` (no poisoning).
//! - `cache-padded`: pads counter state to a cache line.
//! - `tracing`: emits `tracing` spans and events on the hot paths.
//! - `serde`: (de)serializes [`id::Xid`] as text, or raw bytes via
//!   `oxid::serde::as_bytes`.
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod base32;
pub mod counter;
mod error;
pub mod generator;
pub mod id;
pub mod identity;
pub mod inspect;
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
#[cfg(feature = "serde")]
pub mod serde;
pub mod time;

pub use crate::error::*;
