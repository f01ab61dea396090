//! Host-side value representations passed into and returned out of the
//! pack/unpack engine.
//!
//! The reference implementation accepts almost anything via runtime
//! reflection and figures out the right conversion at call time. Per the
//! design note in the core specification, this is inverted here: each
//! numeric family gets its own small input enum (`UintInput`, `IntInput`),
//! and conversion to bytes happens once, in [`crate::types::ElementType`],
//! rather than being scattered across call sites.

use alloy_primitives::{I256, U256};

/// Input for a `uintM` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UintInput {
    /// Fits comfortably in a native integer — the common case.
    Small(u64),
    /// Arbitrary-precision magnitude, needed for `M > 64`.
    Big(U256),
    /// Decimal text, e.g. `"1000000"`.
    Decimal(String),
    /// `0x`-prefixed hex text.
    Hex(String),
}

/// Input for an `intM` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntInput {
    Small(i64),
    Big(I256),
    Decimal(String),
    Hex(String),
}

/// A single host-side value handed to the pack engine.
///
/// Array arguments are represented either as [`AbiValue::Array`] (a native
/// list) or [`AbiValue::ArrayText`] (the `"[a,b,c]"` string form) — both are
/// accepted interchangeably per the array-as-string equivalence property.
#[derive(Debug, Clone, PartialEq)]
pub enum AbiValue {
    Bool(bool),
    Uint(UintInput),
    Int(IntInput),
    Address([u8; 20]),
    /// Used for both `bytesM` and dynamic `bytes` inputs.
    Bytes(Vec<u8>),
    Str(String),
    Array(Vec<AbiValue>),
    ArrayText(String),
}

impl AbiValue {
    /// Convenience constructor for decimal or `0x`-hex unsigned integers.
    pub fn uint_text(s: impl Into<String>) -> Self {
        AbiValue::Uint(UintInput::Decimal(s.into()))
    }

    /// Convenience constructor for decimal or `0x`-hex signed integers.
    pub fn int_text(s: impl Into<String>) -> Self {
        AbiValue::Int(IntInput::Decimal(s.into()))
    }

    /// Convenience constructor from a `0x`-prefixed 20-byte address string.
    pub fn address_text(s: &str) -> Result<Self, crate::error::EncodeError> {
        let hex = s.strip_prefix("0x").unwrap_or(s);
        let decoded = hex::decode(hex).map_err(|_| crate::error::EncodeError::BadValue {
            value: s.to_string(),
            ty: "address".to_string(),
        })?;
        if decoded.len() != 20 {
            return Err(crate::error::EncodeError::OutOfRange {
                ty: "address".to_string(),
                detail: format!("got {} bytes, want 20", decoded.len()),
            });
        }
        let mut out = [0u8; 20];
        out.copy_from_slice(&decoded);
        Ok(AbiValue::Address(out))
    }
}

/// Decoded numeric output for `uintM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UintOutput {
    Small(u64),
    Big(U256),
}

/// Decoded numeric output for `intM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntOutput {
    Small(i64),
    Big(I256),
}

/// A single decoded value produced by the unpack engine.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedValue {
    Bool(bool),
    Uint(UintOutput),
    Int(IntOutput),
    Address([u8; 20]),
    FixedBytes(Vec<u8>),
    Bytes(Vec<u8>),
    Str(String),
    Array(Vec<DecodedValue>),
}

impl DecodedValue {
    /// Human-readable rendering, used by the CLI and by the "array as a
    /// single string" decode mode described in §4.5: arrays render as
    /// `[e1,e2,...]`, fixed-width byte buffers strip leading/trailing zero
    /// padding the way the reference's string conversion does.
    pub fn display_string(&self) -> String {
        match self {
            DecodedValue::Bool(b) => b.to_string(),
            DecodedValue::Uint(UintOutput::Small(v)) => v.to_string(),
            DecodedValue::Uint(UintOutput::Big(v)) => v.to_string(),
            DecodedValue::Int(IntOutput::Small(v)) => v.to_string(),
            DecodedValue::Int(IntOutput::Big(v)) => v.to_string(),
            DecodedValue::Address(a) => format!("0x{}", hex::encode(a)),
            DecodedValue::FixedBytes(b) => {
                let trimmed = trim_zero_padding(b);
                format!("0x{}", hex::encode(trimmed))
            }
            DecodedValue::Bytes(b) => format!("0x{}", hex::encode(b)),
            DecodedValue::Str(s) => s.clone(),
            DecodedValue::Array(items) => {
                let parts: Vec<String> = items.iter().map(DecodedValue::display_string).collect();
                format!("[{}]", parts.join(","))
            }
        }
    }
}

/// Strip leading and trailing zero bytes, matching the `bytesM`-to-string
/// decode rule in §4.1. An all-zero buffer trims to empty.
fn trim_zero_padding(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|&b| b != 0);
    let Some(start) = start else { return &[] };
    let end = bytes.iter().rposition(|&b| b != 0).unwrap();
    &bytes[start..=end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_display_matches_bracket_form() {
        let v = DecodedValue::Array(vec![
            DecodedValue::Uint(UintOutput::Small(1)),
            DecodedValue::Uint(UintOutput::Small(2)),
            DecodedValue::Uint(UintOutput::Small(3)),
        ]);
        assert_eq!(v.display_string(), "[1,2,3]");
    }

    #[test]
    fn trim_zero_padding_strips_both_ends() {
        assert_eq!(trim_zero_padding(&[0, 0, 1, 2, 0]), &[1, 2]);
        assert_eq!(trim_zero_padding(&[0, 0, 0]), &[] as &[u8]);
    }
}
