//! A typed representation of Michelson data, used to build contract storage
//! and entrypoint parameters without string interpolation.
//!
//! Values render to the Michelson text notation accepted by the Octez client,
//! e.g. `(Pair "tz1..." 1000)`.

use std::fmt::{self, Display, Formatter};

use itertools::Itertools;
use num_bigint::BigUint;

use crate::types::{Address, TokenAmount};

/// A Michelson data value
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MichelsonValue {
    /// `Unit`
    Unit,
    /// `True` or `False`
    Bool(bool),
    /// A natural number
    Nat(BigUint),
    /// A string literal, escaped on rendering
    String(String),
    /// A byte sequence, rendered as `0x`-prefixed hex
    Bytes(Vec<u8>),
    /// `Pair a b`
    Pair(Box<MichelsonValue>, Box<MichelsonValue>),
    /// `Some v`
    Some(Box<MichelsonValue>),
    /// `None`
    None,
    /// A map or big map literal, rendered as `Elt` entries in insertion order
    Map(Vec<(MichelsonValue, MichelsonValue)>),
}

impl MichelsonValue {
    /// A natural number
    pub fn nat(value: impl Into<BigUint>) -> Self {
        MichelsonValue::Nat(value.into())
    }

    /// A string literal
    pub fn string(value: impl Into<String>) -> Self {
        MichelsonValue::String(value.into())
    }

    /// An address, which Michelson represents as a string literal
    pub fn address(address: &Address) -> Self {
        MichelsonValue::String(address.to_string())
    }

    /// A token amount in base units
    pub fn amount(amount: &TokenAmount) -> Self {
        MichelsonValue::Nat(amount.base_units().clone())
    }

    /// A byte sequence
    pub fn bytes(value: impl Into<Vec<u8>>) -> Self {
        MichelsonValue::Bytes(value.into())
    }

    /// `Pair left right`
    pub fn pair(left: MichelsonValue, right: MichelsonValue) -> Self {
        MichelsonValue::Pair(Box::new(left), Box::new(right))
    }

    /// `Some value`
    pub fn some(value: MichelsonValue) -> Self {
        MichelsonValue::Some(Box::new(value))
    }

    /// An empty map or big map
    pub fn empty_map() -> Self {
        MichelsonValue::Map(Vec::new())
    }

    /// Nests the values into right-combed pairs, i.e. `[a, b, c]` becomes
    /// `Pair a (Pair b c)`. A single value is returned as is and an empty
    /// input yields `Unit`.
    pub fn right_comb(values: impl IntoIterator<Item = MichelsonValue>) -> Self {
        let values: Vec<MichelsonValue> = values.into_iter().collect();
        values
            .into_iter()
            .rev()
            .reduce(|acc, value| MichelsonValue::pair(value, acc))
            .unwrap_or(MichelsonValue::Unit)
    }
}

/// Escapes a string for inclusion in a Michelson string literal
fn escape_string(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            _ => escaped.push(c),
        }
    }
    escaped
}

impl Display for MichelsonValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            MichelsonValue::Unit => write!(f, "Unit"),
            MichelsonValue::Bool(true) => write!(f, "True"),
            MichelsonValue::Bool(false) => write!(f, "False"),
            MichelsonValue::Nat(n) => write!(f, "{}", n),
            MichelsonValue::String(s) => write!(f, "\"{}\"", escape_string(s)),
            MichelsonValue::Bytes(b) => write!(f, "0x{}", hex::encode(b)),
            MichelsonValue::Pair(left, right) => write!(f, "(Pair {} {})", left, right),
            MichelsonValue::Some(value) => write!(f, "(Some {})", value),
            MichelsonValue::None => write!(f, "None"),
            MichelsonValue::Map(entries) => write!(
                f,
                "{{{}}}",
                entries
                    .iter()
                    .map(|(key, value)| format!("Elt {} {}", key, value))
                    .join("; ")
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MichelsonValue;
    use crate::types::TokenAmount;

    #[test]
    fn test_render_scalars() {
        assert_eq!(MichelsonValue::Unit.to_string(), "Unit");
        assert_eq!(MichelsonValue::Bool(false).to_string(), "False");
        assert_eq!(MichelsonValue::nat(480u64).to_string(), "480");
        assert_eq!(MichelsonValue::bytes(b"18".to_vec()).to_string(), "0x3138");
        assert_eq!(MichelsonValue::None.to_string(), "None");
        assert_eq!(
            MichelsonValue::amount(&TokenAmount::from_tokens(3)).to_string(),
            "3000000000000000000"
        );
    }

    #[test]
    fn test_render_escapes_strings() {
        let value = MichelsonValue::string("a \"quoted\" \\ value\n");
        assert_eq!(value.to_string(), r#""a \"quoted\" \\ value\n""#);
    }

    #[test]
    fn test_render_nested() {
        let value = MichelsonValue::pair(
            MichelsonValue::some(MichelsonValue::string("tz1")),
            MichelsonValue::Map(vec![
                (MichelsonValue::nat(0u64), MichelsonValue::Unit),
                (MichelsonValue::nat(1u64), MichelsonValue::Bool(true)),
            ]),
        );
        assert_eq!(
            value.to_string(),
            r#"(Pair (Some "tz1") {Elt 0 Unit; Elt 1 True})"#
        );
        assert_eq!(MichelsonValue::empty_map().to_string(), "{}");
    }

    #[test]
    fn test_right_comb() {
        let comb = MichelsonValue::right_comb([
            MichelsonValue::nat(1u64),
            MichelsonValue::nat(2u64),
            MichelsonValue::nat(3u64),
        ]);
        assert_eq!(comb.to_string(), "(Pair 1 (Pair 2 3))");

        let single = MichelsonValue::right_comb([MichelsonValue::nat(7u64)]);
        assert_eq!(single, MichelsonValue::nat(7u64));

        assert_eq!(MichelsonValue::right_comb([]), MichelsonValue::Unit);
    }
}
