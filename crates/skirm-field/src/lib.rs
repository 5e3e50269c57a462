//! Dense grid fields, stamp kernels, and the per-turn field cache.
//!
//! A [`Field`] is a W×H matrix of `f64`, one value per map cell, with
//! elementwise algebra and local stamp operations. Fields express either
//! attractiveness (target fields) or traversal difficulty (cost fields)
//! and are rebuilt from the visible-world snapshot every turn.
//!
//! A [`Kernel`] is a small immutable square weight pattern describing an
//! area-of-effect shape and falloff, precomputed once at startup and
//! stamped onto fields at unit positions.
//!
//! The [`FieldCache`] memoizes expensive shared field computations within
//! one turn, keyed by (purpose, agent class, damaged flag).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cache;
pub mod error;
pub mod field;
pub mod kernel;

pub use cache::{CacheKey, FieldCache, FieldKind};
pub use error::FieldError;
pub use field::Field;
pub use kernel::Kernel;
