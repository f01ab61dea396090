//! Error types for the ABI codec.
//!
//! Split by concern rather than one grab-bag enum: schema loading, packing
//! (encode-time), and unpacking (decode-time) fail for different reasons and
//! callers generally only care about the one relevant to the call they made.

use thiserror::Error;

/// Errors raised while parsing an ABI JSON schema or a single type string.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("invalid ABI JSON: {0}")]
    Json(String),

    #[error("unrecognized type `{0}`")]
    UnknownType(String),

    #[error("malformed array suffix in type `{0}`")]
    BadArraySuffix(String),

    #[error("{kind}{bits} has an out-of-range width (must be 8..=256 and divisible by 8)")]
    BadIntWidth { kind: &'static str, bits: u16 },

    #[error("bytes{0} has an out-of-range length (must be 1..=32)")]
    BadBytesLen(u16),

    #[error("{kind}{m}x{n} has an out-of-range scale N (must be 0 < N <= 80)")]
    BadFixedScale { kind: &'static str, m: u16, n: u16 },

    #[error("duplicate {kind} name `{name}`")]
    DuplicateName { kind: &'static str, name: String },
}

/// Errors raised while encoding host values into calldata.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("no function or fallback named `{0}`")]
    UnknownFunction(String),

    #[error("argument count mismatch: expected {expected}, got {got}")]
    ArgCountMismatch { expected: usize, got: usize },

    #[error("argument `{0}` expects an array value")]
    NotAnArray(String),

    #[error("array length mismatch for `{name}`: expected {expected}, got {got}")]
    ArrayLenMismatch { name: String, expected: u32, got: usize },

    #[error("cannot encode `{value}` as {ty}")]
    BadValue { value: String, ty: String },

    #[error("value out of range for {ty}: {detail}")]
    OutOfRange { ty: String, detail: String },

    #[error("{0} is unsupported for encoding")]
    Unsupported(String),
}

/// Errors raised while decoding calldata into host values.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("buffer truncated: need {need} bytes at offset {offset}, have {have}")]
    Truncated { offset: usize, need: usize, have: usize },

    /// Reserved for a decode-to-string target (§4.1, §7): a native bool
    /// decode never raises this — a non-canonical word silently truncates.
    #[error("invalid boolean word at offset {0}")]
    BadBool(usize),

    #[error("decoded value overflows the host width for {ty}")]
    Overflow { ty: String },

    #[error("decoded a negative value for unsigned type {ty}")]
    NegativeForUnsigned { ty: String },

    #[error("{0} is unsupported for decoding")]
    Unsupported(String),
}
