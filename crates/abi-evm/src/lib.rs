//! # abi-evm
//!
//! Loads standard Ethereum ABI JSON into an [`abi_core::AbiSpec`] and runs
//! the head/tail pack/unpack engine against it, plus canonical signature
//! and selector computation.
//!
//! `AbiSpec` lives in `abi-core`, so the pack/unpack/load entry points are
//! free functions here rather than inherent methods on it — Rust's orphan
//! rules forbid implementing methods on a foreign type from a dependent
//! crate (DESIGN.md).

pub mod decode;
pub mod encode;
pub mod schema;
pub mod selector;

pub use decode::unpack;
pub use encode::pack;
pub use schema::{load_spec, packing_types, parse_type};
pub use selector::{selector, signature};
