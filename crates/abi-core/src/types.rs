//! The ABI element type system.
//!
//! Every argument in a Solidity/EVM signature resolves to exactly one of
//! the variants below. This is a closed sum type on purpose: the ABI does
//! not support user-defined scalar types, so there is nothing to gain from
//! an open hierarchy, and a `match` here is exhaustive and compiler-checked.
//!
//! Each variant carries its own pack/unpack routines operating directly on
//! 32-byte words — the unit of the EVM calldata layout. Array-ness is not a
//! variant of this enum; it is a modifier on [`crate::args::Argument`].

use crate::error::{DecodeError, EncodeError};
use crate::value::{AbiValue, DecodedValue, IntInput, IntOutput, UintInput, UintOutput};
use alloy_primitives::{I256, U256};
use std::str::FromStr;

/// One 32-byte EVM word.
pub const WORD: usize = 32;

/// A single ABI element type, independent of any array wrapping.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementType {
    Bool,
    /// `uintM`, `8 <= M <= 256`, `M % 8 == 0`.
    Uint(u16),
    /// `intM`, `8 <= M <= 256`, `M % 8 == 0`.
    Int(u16),
    Address,
    /// `bytesM`, `1 <= M <= 32`.
    BytesN(u8),
    /// Dynamic-length byte string.
    Bytes,
    /// Dynamic-length UTF-8 text, byte-transparent otherwise.
    String,
    /// `fixedMxN` / `ufixedMxN`. Pack/unpack are unimplemented (§4.1); only
    /// signature generation and schema validation are supported.
    Fixed { bits: u16, scale: u16, signed: bool },
}

impl ElementType {
    /// The canonical signature fragment for this element, e.g. `uint256`.
    pub fn signature(&self) -> String {
        match self {
            ElementType::Bool => "bool".to_string(),
            ElementType::Uint(bits) => format!("uint{bits}"),
            ElementType::Int(bits) => format!("int{bits}"),
            ElementType::Address => "address".to_string(),
            ElementType::BytesN(m) => format!("bytes{m}"),
            ElementType::Bytes => "bytes".to_string(),
            ElementType::String => "string".to_string(),
            ElementType::Fixed { bits, scale, signed } => {
                let kind = if *signed { "fixed" } else { "ufixed" };
                format!("{kind}{bits}x{scale}")
            }
        }
    }

    /// Whether this element's encoded length depends on its value.
    pub fn is_dynamic(&self) -> bool {
        matches!(self, ElementType::Bytes | ElementType::String)
    }

    /// Encode a single host value per this element's rules.
    ///
    /// For fixed types the result is always exactly 32 bytes. For dynamic
    /// types (`bytes`, `string`) the result is the length word followed by
    /// the zero-padded payload words — the whole tail contribution, ready
    /// to be placed at the offset recorded in the head.
    pub fn pack(&self, value: &AbiValue) -> Result<Vec<u8>, EncodeError> {
        match self {
            ElementType::Bool => pack_bool(value),
            ElementType::Uint(bits) => pack_uint(*bits, value),
            ElementType::Int(bits) => pack_int(*bits, value),
            ElementType::Address => pack_address(value),
            ElementType::BytesN(m) => pack_bytes_n(*m, value),
            ElementType::Bytes => pack_bytes_dynamic(value),
            ElementType::String => pack_string(value),
            ElementType::Fixed { .. } => {
                Err(EncodeError::Unsupported(self.signature()))
            }
        }
    }

    /// Decode a single value at `offset` in `buf`.
    ///
    /// Returns the decoded value and the number of bytes consumed, counted
    /// from `offset`. Fixed types always consume exactly 32 bytes; dynamic
    /// types consume the length word plus `ceil(len/32)` payload words.
    pub fn unpack(&self, buf: &[u8], offset: usize) -> Result<(DecodedValue, usize), DecodeError> {
        match self {
            ElementType::Bool => unpack_bool(buf, offset),
            ElementType::Uint(bits) => unpack_uint(*bits, buf, offset),
            ElementType::Int(bits) => unpack_int(*bits, buf, offset),
            ElementType::Address => unpack_address(buf, offset),
            ElementType::BytesN(m) => unpack_bytes_n(*m, buf, offset),
            ElementType::Bytes => unpack_bytes_dynamic(buf, offset),
            ElementType::String => unpack_string(buf, offset),
            ElementType::Fixed { .. } => Err(DecodeError::Unsupported(self.signature())),
        }
    }
}

// ─── word helpers ───────────────────────────────────────────────────────────

fn read_word(buf: &[u8], offset: usize) -> Result<[u8; WORD], DecodeError> {
    if buf.len() < offset.saturating_add(WORD) {
        return Err(DecodeError::Truncated {
            offset,
            need: WORD,
            have: buf.len().saturating_sub(offset),
        });
    }
    let mut word = [0u8; WORD];
    word.copy_from_slice(&buf[offset..offset + WORD]);
    Ok(word)
}

fn sign_byte(negative: bool) -> u8 {
    if negative {
        0xFF
    } else {
        0x00
    }
}

// ─── bool ───────────────────────────────────────────────────────────────────

fn pack_bool(value: &AbiValue) -> Result<Vec<u8>, EncodeError> {
    let b = match value {
        AbiValue::Bool(b) => *b,
        AbiValue::Str(s) => match s.to_ascii_lowercase().as_str() {
            "true" | "1" => true,
            "false" | "0" => false,
            other => {
                return Err(EncodeError::BadValue {
                    value: other.to_string(),
                    ty: "bool".to_string(),
                })
            }
        },
        other => {
            return Err(EncodeError::BadValue {
                value: format!("{other:?}"),
                ty: "bool".to_string(),
            })
        }
    };
    let mut word = [0u8; WORD];
    if b {
        word[WORD - 1] = 1;
    }
    Ok(word.to_vec())
}

fn unpack_bool(buf: &[u8], offset: usize) -> Result<(DecodedValue, usize), DecodeError> {
    let word = read_word(buf, offset)?;
    // `DecodeError::BadBool` is reserved for a decode-to-string target (§4.1,
    // §7); there is no such entry point here, only this native-bool decode,
    // so a non-canonical word (anything but exactly 0x00...00/0x00...01)
    // silently truncates to whether the last byte is nonzero.
    Ok((DecodedValue::Bool(word[WORD - 1] != 0), WORD))
}

// ─── uint ───────────────────────────────────────────────────────────────────

fn uint_magnitude(value: &AbiValue) -> Result<U256, EncodeError> {
    match value {
        AbiValue::Uint(UintInput::Small(v)) => Ok(U256::from(*v)),
        AbiValue::Uint(UintInput::Big(v)) => Ok(*v),
        AbiValue::Uint(UintInput::Decimal(s)) | AbiValue::Str(s) => parse_uint_text(s),
        AbiValue::Uint(UintInput::Hex(s)) => parse_uint_text(s),
        other => Err(EncodeError::BadValue {
            value: format!("{other:?}"),
            ty: "uint".to_string(),
        }),
    }
}

fn parse_uint_text(s: &str) -> Result<U256, EncodeError> {
    // `U256::from_str` auto-detects a `0x` prefix, so decimal and hex share
    // one code path.
    U256::from_str(s.trim()).map_err(|_| EncodeError::BadValue {
        value: s.to_string(),
        ty: "uint".to_string(),
    })
}

fn pack_uint(bits: u16, value: &AbiValue) -> Result<Vec<u8>, EncodeError> {
    let magnitude = uint_magnitude(value)?;
    let word: [u8; WORD] = magnitude.to_be_bytes();
    let byte_len = WORD - word.iter().take_while(|&&b| b == 0).count();
    // Byte-length check against `bits` itself, not `bits / 8` — an
    // intentionally permissive carry-over from the reference (DESIGN.md).
    if byte_len > bits as usize {
        return Err(EncodeError::OutOfRange {
            ty: format!("uint{bits}"),
            detail: format!("magnitude needs {byte_len} bytes"),
        });
    }
    Ok(word.to_vec())
}

fn unpack_uint(bits: u16, buf: &[u8], offset: usize) -> Result<(DecodedValue, usize), DecodeError> {
    let word = read_word(buf, offset)?;
    match bits {
        8 | 16 | 32 | 64 => {
            let width = (bits / 8) as usize;
            let window = &word[WORD - width..];
            if window[0] & 0x80 != 0 {
                return Err(DecodeError::Overflow {
                    ty: format!("uint{bits}"),
                });
            }
            let mut small = [0u8; 8];
            small[8 - width..].copy_from_slice(window);
            Ok((
                DecodedValue::Uint(UintOutput::Small(u64::from_be_bytes(small))),
                WORD,
            ))
        }
        _ => Ok((DecodedValue::Uint(UintOutput::Big(U256::from_be_bytes(word))), WORD)),
    }
}

// ─── int ────────────────────────────────────────────────────────────────────

fn int_value(value: &AbiValue) -> Result<I256, EncodeError> {
    match value {
        AbiValue::Int(IntInput::Small(v)) => Ok(I256::try_from(*v).unwrap_or(I256::ZERO)),
        AbiValue::Int(IntInput::Big(v)) => Ok(*v),
        AbiValue::Int(IntInput::Decimal(s)) | AbiValue::Str(s) => parse_int_text(s),
        AbiValue::Int(IntInput::Hex(s)) => parse_int_text(s),
        other => Err(EncodeError::BadValue {
            value: format!("{other:?}"),
            ty: "int".to_string(),
        }),
    }
}

fn parse_int_text(s: &str) -> Result<I256, EncodeError> {
    I256::from_str(s.trim()).map_err(|_| EncodeError::BadValue {
        value: s.to_string(),
        ty: "int".to_string(),
    })
}

fn pack_int(bits: u16, value: &AbiValue) -> Result<Vec<u8>, EncodeError> {
    let v = int_value(value)?;
    let word: [u8; WORD] = v.to_be_bytes();
    let width = (bits / 8) as usize;
    let negative = word[0] & 0x80 != 0;
    let expect = sign_byte(negative);
    if word[..WORD - width].iter().any(|&b| b != expect) {
        return Err(EncodeError::OutOfRange {
            ty: format!("int{bits}"),
            detail: "magnitude overflows declared width".to_string(),
        });
    }
    Ok(word.to_vec())
}

fn unpack_int(bits: u16, buf: &[u8], offset: usize) -> Result<(DecodedValue, usize), DecodeError> {
    let word = read_word(buf, offset)?;
    let negative = word[0] & 0x80 != 0;
    match bits {
        8 | 16 | 32 | 64 => {
            let width = (bits / 8) as usize;
            let expect = sign_byte(negative);
            if word[..WORD - width].iter().any(|&b| b != expect) {
                return Err(DecodeError::Overflow {
                    ty: format!("int{bits}"),
                });
            }
            let mut small = [expect; 8];
            small[8 - width..].copy_from_slice(&word[WORD - width..]);
            Ok((
                DecodedValue::Int(IntOutput::Small(i64::from_be_bytes(small))),
                WORD,
            ))
        }
        _ => Ok((DecodedValue::Int(IntOutput::Big(I256::from_be_bytes(word))), WORD)),
    }
}

// ─── address ────────────────────────────────────────────────────────────────

fn address_bytes(value: &AbiValue) -> Result<[u8; 20], EncodeError> {
    match value {
        AbiValue::Address(bytes) => Ok(*bytes),
        AbiValue::Str(s) => {
            let hex = s.strip_prefix("0x").unwrap_or(s);
            let decoded = hex::decode(hex).map_err(|_| EncodeError::BadValue {
                value: s.clone(),
                ty: "address".to_string(),
            })?;
            if decoded.len() != 20 {
                return Err(EncodeError::OutOfRange {
                    ty: "address".to_string(),
                    detail: format!("got {} bytes, want 20", decoded.len()),
                });
            }
            let mut out = [0u8; 20];
            out.copy_from_slice(&decoded);
            Ok(out)
        }
        AbiValue::Bytes(b) => {
            if b.len() != 20 {
                return Err(EncodeError::OutOfRange {
                    ty: "address".to_string(),
                    detail: format!("got {} bytes, want 20", b.len()),
                });
            }
            let mut out = [0u8; 20];
            out.copy_from_slice(b);
            Ok(out)
        }
        other => Err(EncodeError::BadValue {
            value: format!("{other:?}"),
            ty: "address".to_string(),
        }),
    }
}

fn pack_address(value: &AbiValue) -> Result<Vec<u8>, EncodeError> {
    let addr = address_bytes(value)?;
    let mut word = [0u8; WORD];
    word[12..].copy_from_slice(&addr);
    Ok(word.to_vec())
}

fn unpack_address(buf: &[u8], offset: usize) -> Result<(DecodedValue, usize), DecodeError> {
    let word = read_word(buf, offset)?;
    let mut addr = [0u8; 20];
    addr.copy_from_slice(&word[12..]);
    Ok((DecodedValue::Address(addr), WORD))
}

// ─── bytesN ─────────────────────────────────────────────────────────────────

fn raw_bytes(value: &AbiValue) -> Result<Vec<u8>, EncodeError> {
    match value {
        AbiValue::Bytes(b) => Ok(b.clone()),
        AbiValue::Str(s) => {
            if let Some(hex_str) = s.strip_prefix("0x") {
                hex::decode(hex_str).map_err(|_| EncodeError::BadValue {
                    value: s.clone(),
                    ty: "bytes".to_string(),
                })
            } else {
                Ok(s.as_bytes().to_vec())
            }
        }
        other => Err(EncodeError::BadValue {
            value: format!("{other:?}"),
            ty: "bytes".to_string(),
        }),
    }
}

fn pack_bytes_n(m: u8, value: &AbiValue) -> Result<Vec<u8>, EncodeError> {
    let bytes = raw_bytes(value)?;
    if bytes.len() > m as usize {
        return Err(EncodeError::OutOfRange {
            ty: format!("bytes{m}"),
            detail: format!("got {} bytes, max {m}", bytes.len()),
        });
    }
    let mut word = [0u8; WORD];
    word[..bytes.len()].copy_from_slice(&bytes);
    Ok(word.to_vec())
}

fn unpack_bytes_n(m: u8, buf: &[u8], offset: usize) -> Result<(DecodedValue, usize), DecodeError> {
    let word = read_word(buf, offset)?;
    Ok((DecodedValue::FixedBytes(word[..m as usize].to_vec()), WORD))
}

// ─── bytes / string (dynamic) ───────────────────────────────────────────────

fn words_for(len: usize) -> usize {
    len.div_ceil(WORD) * WORD
}

fn pack_dynamic_payload(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(WORD + words_for(bytes.len()));
    out.extend_from_slice(&U256::from(bytes.len()).to_be_bytes::<WORD>());
    out.extend_from_slice(bytes);
    out.resize(WORD + words_for(bytes.len()), 0);
    out
}

fn pack_bytes_dynamic(value: &AbiValue) -> Result<Vec<u8>, EncodeError> {
    Ok(pack_dynamic_payload(&raw_bytes(value)?))
}

fn pack_string(value: &AbiValue) -> Result<Vec<u8>, EncodeError> {
    let text = match value {
        AbiValue::Str(s) => s.clone(),
        AbiValue::Bytes(b) => String::from_utf8_lossy(b).into_owned(),
        other => {
            return Err(EncodeError::BadValue {
                value: format!("{other:?}"),
                ty: "string".to_string(),
            })
        }
    };
    Ok(pack_dynamic_payload(text.as_bytes()))
}

fn unpack_dynamic_payload(buf: &[u8], offset: usize) -> Result<(Vec<u8>, usize), DecodeError> {
    let len_word = read_word(buf, offset)?;
    let len = U256::from_be_bytes(len_word);
    let len: usize = len.try_into().map_err(|_| DecodeError::Overflow {
        ty: "dynamic length".to_string(),
    })?;
    let data_start = offset + WORD;
    let padded = words_for(len);
    if buf.len() < data_start + padded {
        return Err(DecodeError::Truncated {
            offset: data_start,
            need: padded,
            have: buf.len().saturating_sub(data_start),
        });
    }
    let bytes = buf[data_start..data_start + len].to_vec();
    Ok((bytes, WORD + padded))
}

fn unpack_bytes_dynamic(buf: &[u8], offset: usize) -> Result<(DecodedValue, usize), DecodeError> {
    let (bytes, consumed) = unpack_dynamic_payload(buf, offset)?;
    Ok((DecodedValue::Bytes(bytes), consumed))
}

fn unpack_string(buf: &[u8], offset: usize) -> Result<(DecodedValue, usize), DecodeError> {
    let (bytes, consumed) = unpack_dynamic_payload(buf, offset)?;
    Ok((DecodedValue::Str(String::from_utf8_lossy(&bytes).into_owned()), consumed))
}
