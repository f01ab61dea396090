//! Head/tail unpack engine (§4.4), the inverse of [`crate::encode`].
//!
//! Mirrors [`crate::encode::pack_args`] slot for slot: a dynamic argument's
//! head slot holds an offset (relative to the start of the argument block)
//! into the tail where its actual payload lives; everything else reads
//! directly out of its head slot.

use abi_core::{ArrayLen, Argument, DecodedValue, DecodeError};
use alloy_primitives::U256;
use tracing::trace;

const WORD: usize = 32;

/// Decode `buf` — the argument block with no selector prefix — against
/// `params`, returning one [`DecodedValue`] per argument in order.
pub fn unpack(params: &[Argument], buf: &[u8]) -> Result<Vec<DecodedValue>, DecodeError> {
    trace!(argc = params.len(), buf_len = buf.len(), "unpacking argument block");
    let mut head_pos = 0usize;
    let mut out = Vec::with_capacity(params.len());

    for param in params {
        let head_size = param.head_size();
        if param.is_dynamic() {
            let offset = read_offset(buf, head_pos)?;
            out.push(unpack_tail_value(param, buf, offset)?);
        } else {
            out.push(unpack_one(param, buf, head_pos)?);
        }
        head_pos += head_size;
    }

    Ok(out)
}

fn read_offset(buf: &[u8], at: usize) -> Result<usize, DecodeError> {
    if buf.len() < at + WORD {
        return Err(DecodeError::Truncated { offset: at, need: WORD, have: buf.len().saturating_sub(at) });
    }
    let word = U256::from_be_slice(&buf[at..at + WORD]);
    word.try_into().map_err(|_| DecodeError::Overflow { ty: "offset".to_string() })
}

/// Decode a single non-dynamic argument (scalar, or a fixed-length array of
/// non-dynamic elements) directly from its head slot.
fn unpack_one(param: &Argument, buf: &[u8], at: usize) -> Result<DecodedValue, DecodeError> {
    match param.array {
        ArrayLen::None => Ok(param.elem.unpack(buf, at)?.0),
        ArrayLen::Fixed(k) => unpack_n(&param.elem, buf, at, k as usize).map(DecodedValue::Array),
        ArrayLen::Dynamic => unreachable!("dynamic arrays are always routed through unpack_tail_value"),
    }
}

/// Decode `count` consecutive elements of `elem` starting at `at`, each
/// consuming however many bytes it reports.
fn unpack_n(
    elem: &abi_core::ElementType,
    buf: &[u8],
    at: usize,
    count: usize,
) -> Result<Vec<DecodedValue>, DecodeError> {
    let mut pos = at;
    let mut items = Vec::with_capacity(count);
    for _ in 0..count {
        let (value, consumed) = elem.unpack(buf, pos)?;
        items.push(value);
        pos += consumed;
    }
    Ok(items)
}

/// Decode the tail payload a dynamic argument's head offset points to.
///
/// A dynamic-length array (`T[]`) is length-prefixed; a fixed-length array
/// of dynamic elements (`T[k]` where `T` is dynamic) is not — it mirrors
/// the inlined, offset-table-free encoding [`crate::encode::pack_array`]
/// produces for that shape (bug-compatible with the reference, DESIGN.md).
fn unpack_tail_value(param: &Argument, buf: &[u8], at: usize) -> Result<DecodedValue, DecodeError> {
    match param.array {
        ArrayLen::None => Ok(param.elem.unpack(buf, at)?.0),
        ArrayLen::Fixed(k) => unpack_n(&param.elem, buf, at, k as usize).map(DecodedValue::Array),
        ArrayLen::Dynamic => {
            if buf.len() < at + WORD {
                return Err(DecodeError::Truncated { offset: at, need: WORD, have: buf.len().saturating_sub(at) });
            }
            let len = U256::from_be_slice(&buf[at..at + WORD]);
            let len: usize =
                len.try_into().map_err(|_| DecodeError::Overflow { ty: "array length".to_string() })?;
            unpack_n(&param.elem, buf, at + WORD, len).map(DecodedValue::Array)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abi_core::{AbiValue, ElementType, UintInput};

    #[test]
    fn transfer_call_roundtrips() {
        let params = vec![
            Argument::scalar("to", ElementType::Address),
            Argument::scalar("amount", ElementType::Uint(256)),
        ];
        let to = AbiValue::address_text("0x00000000000000000000000000000000000042").unwrap();
        let amount = AbiValue::Uint(UintInput::Small(1_000));
        let packed = crate::encode::pack_args(&params, &[to, amount]).unwrap();
        let decoded = unpack(&params, &packed).unwrap();
        assert_eq!(decoded[0].display_string(), "0x0000000000000000000000000000000000000042");
        assert_eq!(decoded[1].display_string(), "1000");
    }

    #[test]
    fn dynamic_string_roundtrips() {
        let params = vec![Argument::scalar("s", ElementType::String)];
        let packed = crate::encode::pack_args(&params, &[AbiValue::Str("dave".into())]).unwrap();
        let decoded = unpack(&params, &packed).unwrap();
        assert_eq!(decoded[0].display_string(), "dave");
    }

    #[test]
    fn dynamic_array_roundtrips() {
        let params = vec![Argument {
            name: "xs".into(),
            elem: ElementType::Uint(256),
            array: abi_core::ArrayLen::Dynamic,
            indexed: false,
        }];
        let packed = crate::encode::pack_args(
            &params,
            &[AbiValue::Array(vec![
                AbiValue::Uint(UintInput::Small(7)),
                AbiValue::Uint(UintInput::Small(8)),
                AbiValue::Uint(UintInput::Small(9)),
            ])],
        )
        .unwrap();
        let decoded = unpack(&params, &packed).unwrap();
        assert_eq!(decoded[0].display_string(), "[7,8,9]");
    }

    #[test]
    fn fixed_array_of_static_elems_is_inline() {
        let params = vec![Argument {
            name: "xs".into(),
            elem: ElementType::Bool,
            array: abi_core::ArrayLen::Fixed(2),
            indexed: false,
        }];
        let packed = crate::encode::pack_args(
            &params,
            &[AbiValue::Array(vec![AbiValue::Bool(true), AbiValue::Bool(false)])],
        )
        .unwrap();
        assert_eq!(packed.len(), 64);
        let decoded = unpack(&params, &packed).unwrap();
        assert_eq!(decoded[0].display_string(), "[true,false]");
    }

    #[test]
    fn truncated_buffer_rejected() {
        let params = vec![Argument::scalar("amount", ElementType::Uint(256))];
        let err = unpack(&params, &[0u8; 10]).unwrap_err();
        assert!(matches!(err, DecodeError::Truncated { .. }));
    }
}
