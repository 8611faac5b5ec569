//! Numeric element kinds for embedding components.

use std::fmt;
use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// The numeric kind of the components of an embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    F32,
    F64,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
}

impl ElementKind {
    /// Returns true for floating-point kinds.
    #[inline]
    pub fn is_float(&self) -> bool {
        matches!(self, ElementKind::F32 | ElementKind::F64)
    }

    /// Short lowercase name, e.g. `"f32"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::F32 => "f32",
            ElementKind::F64 => "f64",
            ElementKind::I8 => "i8",
            ElementKind::I16 => "i16",
            ElementKind::I32 => "i32",
            ElementKind::I64 => "i64",
            ElementKind::U8 => "u8",
            ElementKind::U16 => "u16",
            ElementKind::U32 => "u32",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scalar type that can be stored as an embedding component.
///
/// All rows of one store share a single `Element` type, so mixing kinds is
/// a compile error rather than a runtime check. Similarity arithmetic is
/// carried out in `f64` regardless of the storage kind.
pub trait Element:
    Copy + PartialEq + Debug + Send + Sync + Serialize + DeserializeOwned + 'static
{
    /// The runtime tag for this kind.
    const KIND: ElementKind;

    /// Widens the value to `f64` for similarity computations.
    fn to_f64(self) -> f64;
}

macro_rules! impl_element {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Element for $ty {
                const KIND: ElementKind = ElementKind::$kind;

                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_element! {
    f32 => F32,
    f64 => F64,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
}
