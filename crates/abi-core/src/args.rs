//! The argument / spec model: wraps an [`ElementType`] with a name and an
//! optional array modifier, and groups arguments into the function, event,
//! constructor and fallback descriptors that make up an [`AbiSpec`].

use crate::types::ElementType;
use std::collections::HashMap;

/// Array modifier on an [`Argument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayLen {
    /// Scalar — not an array.
    None,
    /// `elem[k]`.
    Fixed(u32),
    /// `elem[]`.
    Dynamic,
}

/// One entry in a function's `inputs`/`outputs` or an event's `inputs`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Argument {
    pub name: String,
    pub elem: ElementType,
    pub array: ArrayLen,
    /// EVM event topic flag; meaningless outside `Event::inputs`.
    pub indexed: bool,
}

impl Argument {
    pub fn scalar(name: impl Into<String>, elem: ElementType) -> Self {
        Argument { name: name.into(), elem, array: ArrayLen::None, indexed: false }
    }

    /// The canonical signature fragment, e.g. `uint256[3]` or `string[]`.
    pub fn signature(&self) -> String {
        let base = self.elem.signature();
        match self.array {
            ArrayLen::None => base,
            ArrayLen::Fixed(k) => format!("{base}[{k}]"),
            ArrayLen::Dynamic => format!("{base}[]"),
        }
    }

    /// Whether this argument's encoded length depends on its value.
    ///
    /// A dynamic-length array is always dynamic. A fixed-length array is
    /// dynamic iff its element type is (§3): its head slots are only inline
    /// when every element packs to a fixed number of words.
    pub fn is_dynamic(&self) -> bool {
        match self.array {
            ArrayLen::Dynamic => true,
            ArrayLen::Fixed(_) | ArrayLen::None => self.elem.is_dynamic(),
        }
    }

    /// Bytes this argument contributes to the head block (§4.4).
    pub fn head_size(&self) -> usize {
        match self.array {
            ArrayLen::None => 32,
            ArrayLen::Fixed(k) => {
                if self.elem.is_dynamic() {
                    32
                } else {
                    32 * k as usize
                }
            }
            ArrayLen::Dynamic => 32,
        }
    }
}

/// A function, constructor, or fallback descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Function {
    pub inputs: Vec<Argument>,
    pub outputs: Vec<Argument>,
}

/// An event descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Event {
    pub inputs: Vec<Argument>,
    pub anonymous: bool,
}

/// A fully parsed contract ABI.
///
/// Constructed once from JSON (see [`crate::error::SchemaError`] callers in
/// `abi-evm::schema`) and read-only thereafter; safe to share across
/// threads (§5).
#[derive(Debug, Clone, Default)]
pub struct AbiSpec {
    pub constructor: Function,
    pub fallback: Function,
    pub functions: HashMap<String, Function>,
    pub events: HashMap<String, Event>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ElementType;

    #[test]
    fn array_signature_suffixes() {
        let arg = Argument {
            name: "amounts".into(),
            elem: ElementType::Uint(256),
            array: ArrayLen::Fixed(3),
            indexed: false,
        };
        assert_eq!(arg.signature(), "uint256[3]");

        let dyn_arg = Argument {
            name: "names".into(),
            elem: ElementType::String,
            array: ArrayLen::Dynamic,
            indexed: false,
        };
        assert_eq!(dyn_arg.signature(), "string[]");
    }

    #[test]
    fn fixed_array_of_fixed_elems_is_not_dynamic() {
        let arg = Argument {
            name: "xs".into(),
            elem: ElementType::Uint(256),
            array: ArrayLen::Fixed(4),
            indexed: false,
        };
        assert!(!arg.is_dynamic());
        assert_eq!(arg.head_size(), 128);
    }

    #[test]
    fn fixed_array_of_dynamic_elems_is_dynamic() {
        let arg = Argument {
            name: "xs".into(),
            elem: ElementType::String,
            array: ArrayLen::Fixed(4),
            indexed: false,
        };
        assert!(arg.is_dynamic());
        assert_eq!(arg.head_size(), 32);
    }
}
