//! Canonical signature strings and the 4-byte function selector (§4.3).

use abi_core::Argument;
use tiny_keccak::{Hasher, Keccak};

/// Build the canonical signature `name(t1,t2,...)` for a function or event.
///
/// Built by joining the comma-separated inner list once rather than
/// concatenating incrementally with a first-argument special case (§9) —
/// that keeps the result canonical regardless of argument count.
pub fn signature(name: &str, inputs: &[Argument]) -> String {
    let inner = inputs.iter().map(Argument::signature).collect::<Vec<_>>().join(",");
    format!("{name}({inner})")
}

/// The first four bytes of `Keccak256(signature)`.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    let mut out = [0u8; 4];
    out.copy_from_slice(&hash[..4]);
    out
}

fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut out = [0u8; 32];
    hasher.finalize(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use abi_core::{ArrayLen, ElementType};

    fn arg(elem: ElementType) -> Argument {
        Argument { name: String::new(), elem, array: ArrayLen::None, indexed: false }
    }

    #[test]
    fn transfer_selector_matches_known_value() {
        let inputs = vec![arg(ElementType::Address), arg(ElementType::Uint(256))];
        let sig = signature("transfer", &inputs);
        assert_eq!(sig, "transfer(address,uint256)");
        assert_eq!(hex::encode(selector(&sig)), "a9059cbb");
    }

    #[test]
    fn array_modifiers_appear_in_signature() {
        let arg = Argument {
            name: String::new(),
            elem: ElementType::Uint(256),
            array: ArrayLen::Fixed(3),
            indexed: false,
        };
        assert_eq!(signature("f", &[arg]), "f(uint256[3])");
    }

    #[test]
    fn no_args_signature() {
        assert_eq!(signature("g", &[]), "g()");
    }
}
