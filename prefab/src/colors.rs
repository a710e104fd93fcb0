//! Fixed red and black sentinels for primitive kinds.
//!
//! Colors are chosen once per kind and reused for the whole run, so every red
//! `i32` anywhere in a synthesized graph is the same number.

use num_traits::{One, Zero};

use crate::value::Value;

/// Red string sentinel
pub const RED_TEXT: &str = "one";
/// Black string sentinel
pub const BLACK_TEXT: &str = "two";

/// Primitive kinds with fixed color constants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    I128,
    Isize,
    U8,
    U16,
    U32,
    U64,
    U128,
    Usize,
    F32,
    F64,
}

impl Primitive {
    pub const ALL: [Primitive; 16] = [
        Primitive::Bool,
        Primitive::Char,
        Primitive::I8,
        Primitive::I16,
        Primitive::I32,
        Primitive::I64,
        Primitive::I128,
        Primitive::Isize,
        Primitive::U8,
        Primitive::U16,
        Primitive::U32,
        Primitive::U64,
        Primitive::U128,
        Primitive::Usize,
        Primitive::F32,
        Primitive::F64,
    ];

    /// The primitive kind named by a type identity, if any
    pub fn from_identity(identity: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|primitive| primitive.identity() == identity)
    }

    pub fn identity(self) -> &'static str {
        match self {
            Primitive::Bool => "bool",
            Primitive::Char => "char",
            Primitive::I8 => "i8",
            Primitive::I16 => "i16",
            Primitive::I32 => "i32",
            Primitive::I64 => "i64",
            Primitive::I128 => "i128",
            Primitive::Isize => "isize",
            Primitive::U8 => "u8",
            Primitive::U16 => "u16",
            Primitive::U32 => "u32",
            Primitive::U64 => "u64",
            Primitive::U128 => "u128",
            Primitive::Usize => "usize",
            Primitive::F32 => "f32",
            Primitive::F64 => "f64",
        }
    }

    pub fn red(self) -> Value {
        match self {
            Primitive::Bool => Value::Bool(true),
            Primitive::Char => Value::Char('a'),
            Primitive::I8 => Value::I8(red()),
            Primitive::I16 => Value::I16(red()),
            Primitive::I32 => Value::I32(red()),
            Primitive::I64 => Value::I64(red()),
            Primitive::I128 => Value::I128(red()),
            Primitive::Isize => Value::Isize(red()),
            Primitive::U8 => Value::U8(red()),
            Primitive::U16 => Value::U16(red()),
            Primitive::U32 => Value::U32(red()),
            Primitive::U64 => Value::U64(red()),
            Primitive::U128 => Value::U128(red()),
            Primitive::Usize => Value::Usize(red()),
            Primitive::F32 => Value::F32(red()),
            Primitive::F64 => Value::F64(red()),
        }
    }

    pub fn black(self) -> Value {
        match self {
            Primitive::Bool => Value::Bool(false),
            Primitive::Char => Value::Char('b'),
            Primitive::I8 => Value::I8(black()),
            Primitive::I16 => Value::I16(black()),
            Primitive::I32 => Value::I32(black()),
            Primitive::I64 => Value::I64(black()),
            Primitive::I128 => Value::I128(black()),
            Primitive::Isize => Value::Isize(black()),
            Primitive::U8 => Value::U8(black()),
            Primitive::U16 => Value::U16(black()),
            Primitive::U32 => Value::U32(black()),
            Primitive::U64 => Value::U64(black()),
            Primitive::U128 => Value::U128(black()),
            Primitive::Usize => Value::Usize(black()),
            Primitive::F32 => Value::F32(black()),
            Primitive::F64 => Value::F64(black()),
        }
    }

    /// The value a freshly allocated field of this kind holds
    pub fn zero(self) -> Value {
        match self {
            Primitive::Bool => Value::Bool(false),
            Primitive::Char => Value::Char('\0'),
            Primitive::I8 => Value::I8(Zero::zero()),
            Primitive::I16 => Value::I16(Zero::zero()),
            Primitive::I32 => Value::I32(Zero::zero()),
            Primitive::I64 => Value::I64(Zero::zero()),
            Primitive::I128 => Value::I128(Zero::zero()),
            Primitive::Isize => Value::Isize(Zero::zero()),
            Primitive::U8 => Value::U8(Zero::zero()),
            Primitive::U16 => Value::U16(Zero::zero()),
            Primitive::U32 => Value::U32(Zero::zero()),
            Primitive::U64 => Value::U64(Zero::zero()),
            Primitive::U128 => Value::U128(Zero::zero()),
            Primitive::Usize => Value::Usize(Zero::zero()),
            Primitive::F32 => Value::F32(Zero::zero()),
            Primitive::F64 => Value::F64(Zero::zero()),
        }
    }
}

fn red<T: One>() -> T {
    T::one()
}

fn black<T: One + std::ops::Add<Output = T>>() -> T {
    T::one() + T::one()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colors_are_distinct() {
        for primitive in Primitive::ALL {
            assert_ne!(primitive.red(), primitive.black(), "{:?}", primitive);
            assert_ne!(primitive.red(), primitive.zero(), "{:?}", primitive);
        }
    }

    #[test]
    fn test_from_identity_round_trips() {
        for primitive in Primitive::ALL {
            assert_eq!(Primitive::from_identity(primitive.identity()), Some(primitive));
        }
        assert_eq!(Primitive::from_identity("String"), None);
    }

    #[test]
    fn test_integer_colors() {
        assert_eq!(Primitive::I32.red(), Value::I32(1));
        assert_eq!(Primitive::I32.black(), Value::I32(2));
        assert_eq!(Primitive::F64.black(), Value::F64(2.0));
        assert_eq!(Primitive::U8.red(), Value::U8(1));
        assert_eq!(Primitive::Usize.black(), Value::Usize(2));
        assert_eq!(Primitive::U128.zero(), Value::U128(0));
    }

    #[test]
    fn test_every_integer_width_is_covered() {
        for identity in [
            "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64", "u128",
            "usize",
        ] {
            assert!(Primitive::from_identity(identity).is_some(), "{}", identity);
        }
    }
}
