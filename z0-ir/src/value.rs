//! IR values and the bit-widths the checker understands.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The only two bit-widths the source language's compiled IR ever uses:
/// 1 for booleans (comparison results, contract conditions) and 32 for the
/// source language's only integer type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Width {
    W1,
    W32,
}

impl Width {
    pub fn bits(self) -> u32 {
        match self {
            Width::W1 => 1,
            Width::W32 => 32,
        }
    }

    /// Parse a raw bit-width, as it would arrive from an IR producer that
    /// doesn't know about this analyser's restrictions.
    pub fn from_bits(bits: u32) -> Option<Width> {
        match bits {
            1 => Some(Width::W1),
            32 => Some(Width::W32),
            _ => None,
        }
    }
}

/// Accepts either the tagged form (`"W1"` / `"W32"`) or a raw bit count, so
/// a hand-written fixture can say `"width": 32` the way an IR producer
/// naturally would. Any other bit count is rejected here, at load time,
/// rather than deep inside the expression builder.
impl<'de> Deserialize<'de> for Width {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Tag(TagForm),
            Bits(u32),
        }
        #[derive(Deserialize)]
        enum TagForm {
            W1,
            W32,
        }

        match Repr::deserialize(deserializer)? {
            Repr::Tag(TagForm::W1) => Ok(Width::W1),
            Repr::Tag(TagForm::W32) => Ok(Width::W32),
            Repr::Bits(n) => Width::from_bits(n)
                .ok_or_else(|| serde::de::Error::custom(format!("unsupported bit width {n}; z0 only supports 1 and 32"))),
        }
    }
}

impl fmt::Display for Width {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "i{}", self.bits())
    }
}

/// A function-scoped identifier for an instruction that produces a value.
/// Doubles as the handle other instructions use to reference that result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct InstId(pub u32);

impl fmt::Display for InstId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

/// An immutable reference to an operand, mirroring the external IR's Value:
/// a constant, a function argument, or the result of an earlier instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Value {
    pub kind: ValueKind,
    pub width: Width,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValueKind {
    /// A compile-time integer constant, sign-extended from its source width.
    ConstInt(i64),
    /// The `index`-th parameter of the enclosing function.
    Argument(usize),
    /// The result of a previously defined instruction.
    Instr(InstId),
}

impl Value {
    pub fn const_int(width: Width, v: i64) -> Self {
        Value {
            kind: ValueKind::ConstInt(v),
            width,
        }
    }

    pub fn argument(width: Width, index: usize) -> Self {
        Value {
            kind: ValueKind::Argument(index),
            width,
        }
    }

    pub fn from_inst(width: Width, id: InstId) -> Self {
        Value {
            kind: ValueKind::Instr(id),
            width,
        }
    }

    pub fn is_constant(&self) -> bool {
        matches!(self.kind, ValueKind::ConstInt(_))
    }

    pub fn as_const_int(&self) -> Option<i64> {
        match self.kind {
            ValueKind::ConstInt(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ValueKind::ConstInt(v) => write!(f, "{}:{}", v, self.width),
            ValueKind::Argument(i) => write!(f, "arg{}:{}", i, self.width),
            ValueKind::Instr(id) => write!(f, "{}:{}", id, self.width),
        }
    }
}
