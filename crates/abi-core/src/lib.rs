//! # abi-core
//!
//! The closed ABI type system, argument/spec model, host-value
//! representations, and error types shared by every other crate in this
//! workspace. Contains no JSON parsing and no head/tail composition logic —
//! those live in `abi-evm`, which depends on this crate.

pub mod args;
pub mod error;
pub mod types;
pub mod value;

pub use args::{AbiSpec, ArrayLen, Argument, Event, Function};
pub use error::{DecodeError, EncodeError, SchemaError};
pub use types::ElementType;
pub use value::{AbiValue, DecodedValue, IntInput, IntOutput, UintInput, UintOutput};
