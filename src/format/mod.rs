//! Format descriptors for volume element layouts.
//!
//! Every representation of a volume carries a [`FormatId`] naming its
//! element layout: a scalar or 2/3/4-channel vector of one of thirteen
//! numeric kinds. [`FormatId::descriptor`] is a total, allocation-free
//! lookup returning the immutable metadata for that layout (bit widths,
//! numeric range, canonical name). Unspecialized ids degrade to a zeroed
//! sentinel descriptor instead of failing, so lookup never errors.

pub mod codec;

pub use codec::ScalarKind;

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::error::MultirepError;

/// Identifier for one element layout: channel count times numeric kind.
///
/// The enumeration is closed; converters and codecs match on it instead of
/// inspecting runtime types. `NotSpecialized` is the sentinel for "no
/// concrete layout known".
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormatId {
    NotSpecialized,
    Float16,
    Float32,
    Float64,
    Int8,
    Int12,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt12,
    UInt16,
    UInt32,
    UInt64,
    Vec2Float16,
    Vec2Float32,
    Vec2Float64,
    Vec2Int8,
    Vec2Int12,
    Vec2Int16,
    Vec2Int32,
    Vec2Int64,
    Vec2UInt8,
    Vec2UInt12,
    Vec2UInt16,
    Vec2UInt32,
    Vec2UInt64,
    Vec3Float16,
    Vec3Float32,
    Vec3Float64,
    Vec3Int8,
    Vec3Int12,
    Vec3Int16,
    Vec3Int32,
    Vec3Int64,
    Vec3UInt8,
    Vec3UInt12,
    Vec3UInt16,
    Vec3UInt32,
    Vec3UInt64,
    Vec4Float16,
    Vec4Float32,
    Vec4Float64,
    Vec4Int8,
    Vec4Int12,
    Vec4Int16,
    Vec4Int32,
    Vec4Int64,
    Vec4UInt8,
    Vec4UInt12,
    Vec4UInt16,
    Vec4UInt32,
    Vec4UInt64,
}

/// Immutable metadata for one [`FormatId`].
///
/// Descriptors are values, not registry entries: two lookups of the same id
/// return equal descriptors, and equality is by id.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct FormatDescriptor {
    pub id: FormatId,
    /// Channels per element (1 for scalars, 2-4 for vectors, 0 for the sentinel).
    pub components: u32,
    /// Bits occupied in memory per element.
    pub bits_allocated: u32,
    /// Bits carrying data per element (12-bit kinds store 12 in 16).
    pub bits_stored: u32,
    /// Smallest representable per-channel value.
    pub min: f64,
    /// Largest representable per-channel value.
    pub max: f64,
    /// Canonical name, stable across releases; used in descriptor files.
    pub name: &'static str,
}

impl PartialEq for FormatDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for FormatDescriptor {}

impl FormatDescriptor {
    /// Bytes occupied in memory per element, partial bytes rounded up.
    pub fn bytes_allocated(&self) -> usize {
        (self.bits_allocated as usize).div_ceil(8)
    }

    /// Bytes carrying data per element, partial bytes rounded up.
    ///
    /// A scalar 12-bit format reports 2: the stored bits do not pack
    /// tighter than their allocation unit on disk or in memory.
    pub fn bytes_stored(&self) -> usize {
        (self.bits_stored as usize).div_ceil(8)
    }
}

impl FormatId {
    /// All concrete format ids, in declaration order (sentinel excluded).
    pub const ALL: [FormatId; 52] = [
        FormatId::Float16,
        FormatId::Float32,
        FormatId::Float64,
        FormatId::Int8,
        FormatId::Int12,
        FormatId::Int16,
        FormatId::Int32,
        FormatId::Int64,
        FormatId::UInt8,
        FormatId::UInt12,
        FormatId::UInt16,
        FormatId::UInt32,
        FormatId::UInt64,
        FormatId::Vec2Float16,
        FormatId::Vec2Float32,
        FormatId::Vec2Float64,
        FormatId::Vec2Int8,
        FormatId::Vec2Int12,
        FormatId::Vec2Int16,
        FormatId::Vec2Int32,
        FormatId::Vec2Int64,
        FormatId::Vec2UInt8,
        FormatId::Vec2UInt12,
        FormatId::Vec2UInt16,
        FormatId::Vec2UInt32,
        FormatId::Vec2UInt64,
        FormatId::Vec3Float16,
        FormatId::Vec3Float32,
        FormatId::Vec3Float64,
        FormatId::Vec3Int8,
        FormatId::Vec3Int12,
        FormatId::Vec3Int16,
        FormatId::Vec3Int32,
        FormatId::Vec3Int64,
        FormatId::Vec3UInt8,
        FormatId::Vec3UInt12,
        FormatId::Vec3UInt16,
        FormatId::Vec3UInt32,
        FormatId::Vec3UInt64,
        FormatId::Vec4Float16,
        FormatId::Vec4Float32,
        FormatId::Vec4Float64,
        FormatId::Vec4Int8,
        FormatId::Vec4Int12,
        FormatId::Vec4Int16,
        FormatId::Vec4Int32,
        FormatId::Vec4Int64,
        FormatId::Vec4UInt8,
        FormatId::Vec4UInt12,
        FormatId::Vec4UInt16,
        FormatId::Vec4UInt32,
        FormatId::Vec4UInt64,
    ];

    /// Channels per element.
    pub fn components(&self) -> u32 {
        use FormatId::*;
        match self {
            NotSpecialized => 0,
            Float16 | Float32 | Float64 | Int8 | Int12 | Int16 | Int32 | Int64 | UInt8 | UInt12
            | UInt16 | UInt32 | UInt64 => 1,
            Vec2Float16 | Vec2Float32 | Vec2Float64 | Vec2Int8 | Vec2Int12 | Vec2Int16
            | Vec2Int32 | Vec2Int64 | Vec2UInt8 | Vec2UInt12 | Vec2UInt16 | Vec2UInt32
            | Vec2UInt64 => 2,
            Vec3Float16 | Vec3Float32 | Vec3Float64 | Vec3Int8 | Vec3Int12 | Vec3Int16
            | Vec3Int32 | Vec3Int64 | Vec3UInt8 | Vec3UInt12 | Vec3UInt16 | Vec3UInt32
            | Vec3UInt64 => 3,
            Vec4Float16 | Vec4Float32 | Vec4Float64 | Vec4Int8 | Vec4Int12 | Vec4Int16
            | Vec4Int32 | Vec4Int64 | Vec4UInt8 | Vec4UInt12 | Vec4UInt16 | Vec4UInt32
            | Vec4UInt64 => 4,
        }
    }

    /// Numeric kind shared by all channels, `None` for the sentinel.
    pub fn scalar_kind(&self) -> Option<ScalarKind> {
        use FormatId::*;
        Some(match self {
            NotSpecialized => return None,
            Float16 | Vec2Float16 | Vec3Float16 | Vec4Float16 => ScalarKind::Float16,
            Float32 | Vec2Float32 | Vec3Float32 | Vec4Float32 => ScalarKind::Float32,
            Float64 | Vec2Float64 | Vec3Float64 | Vec4Float64 => ScalarKind::Float64,
            Int8 | Vec2Int8 | Vec3Int8 | Vec4Int8 => ScalarKind::Int8,
            Int12 | Vec2Int12 | Vec3Int12 | Vec4Int12 => ScalarKind::Int12,
            Int16 | Vec2Int16 | Vec3Int16 | Vec4Int16 => ScalarKind::Int16,
            Int32 | Vec2Int32 | Vec3Int32 | Vec4Int32 => ScalarKind::Int32,
            Int64 | Vec2Int64 | Vec3Int64 | Vec4Int64 => ScalarKind::Int64,
            UInt8 | Vec2UInt8 | Vec3UInt8 | Vec4UInt8 => ScalarKind::UInt8,
            UInt12 | Vec2UInt12 | Vec3UInt12 | Vec4UInt12 => ScalarKind::UInt12,
            UInt16 | Vec2UInt16 | Vec3UInt16 | Vec4UInt16 => ScalarKind::UInt16,
            UInt32 | Vec2UInt32 | Vec3UInt32 | Vec4UInt32 => ScalarKind::UInt32,
            UInt64 | Vec2UInt64 | Vec3UInt64 | Vec4UInt64 => ScalarKind::UInt64,
        })
    }

    /// Canonical name. Stable; descriptor files and reports use it.
    pub fn name(&self) -> &'static str {
        use FormatId::*;
        match self {
            NotSpecialized => "NOT_SPECIALIZED",
            Float16 => "FLOAT16",
            Float32 => "FLOAT32",
            Float64 => "FLOAT64",
            Int8 => "INT8",
            Int12 => "INT12",
            Int16 => "INT16",
            Int32 => "INT32",
            Int64 => "INT64",
            UInt8 => "UINT8",
            UInt12 => "UINT12",
            UInt16 => "UINT16",
            UInt32 => "UINT32",
            UInt64 => "UINT64",
            Vec2Float16 => "Vec2FLOAT16",
            Vec2Float32 => "Vec2FLOAT32",
            Vec2Float64 => "Vec2FLOAT64",
            Vec2Int8 => "Vec2INT8",
            Vec2Int12 => "Vec2INT12",
            Vec2Int16 => "Vec2INT16",
            Vec2Int32 => "Vec2INT32",
            Vec2Int64 => "Vec2INT64",
            Vec2UInt8 => "Vec2UINT8",
            Vec2UInt12 => "Vec2UINT12",
            Vec2UInt16 => "Vec2UINT16",
            Vec2UInt32 => "Vec2UINT32",
            Vec2UInt64 => "Vec2UINT64",
            Vec3Float16 => "Vec3FLOAT16",
            Vec3Float32 => "Vec3FLOAT32",
            Vec3Float64 => "Vec3FLOAT64",
            Vec3Int8 => "Vec3INT8",
            Vec3Int12 => "Vec3INT12",
            Vec3Int16 => "Vec3INT16",
            Vec3Int32 => "Vec3INT32",
            Vec3Int64 => "Vec3INT64",
            Vec3UInt8 => "Vec3UINT8",
            Vec3UInt12 => "Vec3UINT12",
            Vec3UInt16 => "Vec3UINT16",
            Vec3UInt32 => "Vec3UINT32",
            Vec3UInt64 => "Vec3UINT64",
            Vec4Float16 => "Vec4FLOAT16",
            Vec4Float32 => "Vec4FLOAT32",
            Vec4Float64 => "Vec4FLOAT64",
            Vec4Int8 => "Vec4INT8",
            Vec4Int12 => "Vec4INT12",
            Vec4Int16 => "Vec4INT16",
            Vec4Int32 => "Vec4INT32",
            Vec4Int64 => "Vec4INT64",
            Vec4UInt8 => "Vec4UINT8",
            Vec4UInt12 => "Vec4UINT12",
            Vec4UInt16 => "Vec4UINT16",
            Vec4UInt32 => "Vec4UINT32",
            Vec4UInt64 => "Vec4UINT64",
        }
    }

    /// The descriptor for this id.
    ///
    /// Total: `NotSpecialized` (and nothing else) yields the zeroed
    /// sentinel descriptor rather than an error.
    pub fn descriptor(&self) -> FormatDescriptor {
        match self.scalar_kind() {
            Some(kind) => {
                let n = self.components();
                FormatDescriptor {
                    id: *self,
                    components: n,
                    bits_allocated: n * kind.bits_allocated(),
                    bits_stored: n * kind.bits_stored(),
                    min: kind.min(),
                    max: kind.max(),
                    name: self.name(),
                }
            }
            None => FormatDescriptor {
                id: FormatId::NotSpecialized,
                components: 0,
                bits_allocated: 0,
                bits_stored: 0,
                min: 0.0,
                max: 0.0,
                name: "NOT_SPECIALIZED (no descriptor for this id)",
            },
        }
    }

    /// Bytes per element in memory.
    pub fn bytes_allocated(&self) -> usize {
        self.descriptor().bytes_allocated()
    }

    /// Bytes per element carrying data.
    pub fn bytes_stored(&self) -> usize {
        self.descriptor().bytes_stored()
    }
}

impl fmt::Display for FormatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FormatId {
    type Err = MultirepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormatId::ALL
            .iter()
            .copied()
            .find(|id| id.name() == s)
            .ok_or_else(|| MultirepError::UnknownFormat(s.to_string()))
    }
}

impl Serialize for FormatId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for FormatId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct NameVisitor;

        impl Visitor<'_> for NameVisitor {
            type Value = FormatId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a canonical format name such as 'UINT16'")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<FormatId, E> {
                v.parse().map_err(|_| E::custom(format!("unknown format name '{v}'")))
            }
        }

        deserializer.deserialize_str(NameVisitor)
    }
}
