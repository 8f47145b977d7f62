//! Element codecs: numeric kind strategies for raw buffers.
//!
//! A [`ScalarKind`] is selected once per representation (from its
//! [`FormatId`](super::FormatId)) and then reads and writes individual
//! channels of the raw byte buffer as `f64`, normalized so that converter
//! code can be written once against a float-valued accessor instead of
//! once per storage width. Integer kinds map their representable range
//! onto [0, 1]; float kinds pass through unchanged.

use serde::Serialize;

/// Numeric kind of one channel. Closed set; every format id maps to one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ScalarKind {
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
}

impl ScalarKind {
    /// Bits carrying data per channel.
    pub fn bits_stored(&self) -> u32 {
        match self {
            ScalarKind::Float16 => 16,
            ScalarKind::Float32 => 32,
            ScalarKind::Float64 => 64,
            ScalarKind::Int8 => 8,
            ScalarKind::Int12 => 12,
            ScalarKind::Int16 => 16,
            ScalarKind::Int32 => 32,
            ScalarKind::Int64 => 64,
            ScalarKind::UInt8 => 8,
            ScalarKind::UInt12 => 12,
            ScalarKind::UInt16 => 16,
            ScalarKind::UInt32 => 32,
            ScalarKind::UInt64 => 64,
        }
    }

    /// Bits occupied in memory per channel. 12-bit kinds allocate 16.
    pub fn bits_allocated(&self) -> u32 {
        match self {
            ScalarKind::Int12 | ScalarKind::UInt12 => 16,
            other => other.bits_stored(),
        }
    }

    /// Bytes occupied in memory per channel.
    pub fn bytes(&self) -> usize {
        (self.bits_allocated() as usize) / 8
    }

    /// Smallest representable value.
    pub fn min(&self) -> f64 {
        match self {
            ScalarKind::Float16 => -65504.0,
            ScalarKind::Float32 => -(f32::MAX as f64),
            ScalarKind::Float64 => f64::MIN,
            ScalarKind::Int8 => i8::MIN as f64,
            ScalarKind::Int12 => -2047.0,
            ScalarKind::Int16 => i16::MIN as f64,
            ScalarKind::Int32 => i32::MIN as f64,
            ScalarKind::Int64 => i64::MIN as f64,
            ScalarKind::UInt8
            | ScalarKind::UInt12
            | ScalarKind::UInt16
            | ScalarKind::UInt32
            | ScalarKind::UInt64 => 0.0,
        }
    }

    /// Largest representable value.
    pub fn max(&self) -> f64 {
        match self {
            ScalarKind::Float16 => 65504.0,
            ScalarKind::Float32 => f32::MAX as f64,
            ScalarKind::Float64 => f64::MAX,
            ScalarKind::Int8 => i8::MAX as f64,
            ScalarKind::Int12 => 2047.0,
            ScalarKind::Int16 => i16::MAX as f64,
            ScalarKind::Int32 => i32::MAX as f64,
            ScalarKind::Int64 => i64::MAX as f64,
            ScalarKind::UInt8 => u8::MAX as f64,
            ScalarKind::UInt12 => 4095.0,
            ScalarKind::UInt16 => u16::MAX as f64,
            ScalarKind::UInt32 => u32::MAX as f64,
            ScalarKind::UInt64 => u64::MAX as f64,
        }
    }

    /// Reads the channel starting at `bytes[0]` (native byte order) as its
    /// raw numeric value.
    ///
    /// `bytes` must hold at least [`Self::bytes`] bytes; representations
    /// guarantee this by sizing buffers from the format descriptor.
    pub fn read(&self, bytes: &[u8]) -> f64 {
        match self {
            ScalarKind::Float16 => f16_bits_to_f64(u16::from_ne_bytes([bytes[0], bytes[1]])),
            ScalarKind::Float32 => {
                f32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as f64
            }
            ScalarKind::Float64 => f64::from_ne_bytes([
                bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
            ]),
            ScalarKind::Int8 => i8::from_ne_bytes([bytes[0]]) as f64,
            ScalarKind::Int12 | ScalarKind::Int16 => {
                i16::from_ne_bytes([bytes[0], bytes[1]]) as f64
            }
            ScalarKind::Int32 => i32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as f64,
            ScalarKind::Int64 => i64::from_ne_bytes([
                bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
            ]) as f64,
            ScalarKind::UInt8 => bytes[0] as f64,
            ScalarKind::UInt12 | ScalarKind::UInt16 => {
                u16::from_ne_bytes([bytes[0], bytes[1]]) as f64
            }
            ScalarKind::UInt32 => u32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as f64,
            ScalarKind::UInt64 => u64::from_ne_bytes([
                bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
            ]) as f64,
        }
    }

    /// Writes `value` as the raw channel starting at `out[0]` (native byte
    /// order). Integer kinds clamp to their representable range and round.
    pub fn write(&self, out: &mut [u8], value: f64) {
        match self {
            ScalarKind::Float16 => {
                out[..2].copy_from_slice(&f64_to_f16_bits(value).to_ne_bytes())
            }
            ScalarKind::Float32 => out[..4].copy_from_slice(&(value as f32).to_ne_bytes()),
            ScalarKind::Float64 => out[..8].copy_from_slice(&value.to_ne_bytes()),
            ScalarKind::Int8 => {
                out[0] = (self.clamp_round(value) as i8).to_ne_bytes()[0];
            }
            ScalarKind::Int12 | ScalarKind::Int16 => {
                out[..2].copy_from_slice(&(self.clamp_round(value) as i16).to_ne_bytes())
            }
            ScalarKind::Int32 => {
                out[..4].copy_from_slice(&(self.clamp_round(value) as i32).to_ne_bytes())
            }
            ScalarKind::Int64 => {
                out[..8].copy_from_slice(&(self.clamp_round(value) as i64).to_ne_bytes())
            }
            ScalarKind::UInt8 => {
                out[0] = self.clamp_round(value) as u8;
            }
            ScalarKind::UInt12 | ScalarKind::UInt16 => {
                out[..2].copy_from_slice(&(self.clamp_round(value) as u16).to_ne_bytes())
            }
            ScalarKind::UInt32 => {
                out[..4].copy_from_slice(&(self.clamp_round(value) as u32).to_ne_bytes())
            }
            ScalarKind::UInt64 => {
                out[..8].copy_from_slice(&(self.clamp_round(value) as u64).to_ne_bytes())
            }
        }
    }

    /// Reads the channel at `bytes[0]` normalized: integer kinds map
    /// [min, max] onto [0, 1]; float kinds are returned unchanged.
    pub fn read_normalized(&self, bytes: &[u8]) -> f64 {
        let raw = self.read(bytes);
        if self.is_float() {
            raw
        } else {
            (raw - self.min()) / (self.max() - self.min())
        }
    }

    /// Writes a normalized value, inverting [`Self::read_normalized`].
    pub fn write_normalized(&self, out: &mut [u8], value: f64) {
        if self.is_float() {
            self.write(out, value);
        } else {
            self.write(out, self.min() + value * (self.max() - self.min()));
        }
    }

    fn is_float(&self) -> bool {
        matches!(
            self,
            ScalarKind::Float16 | ScalarKind::Float32 | ScalarKind::Float64
        )
    }

    fn clamp_round(&self, value: f64) -> f64 {
        if value.is_nan() {
            return 0.0;
        }
        value.clamp(self.min(), self.max()).round()
    }
}

/// Decodes IEEE-754 binary16 bits.
fn f16_bits_to_f64(bits: u16) -> f64 {
    let sign = if bits & 0x8000 != 0 { -1.0 } else { 1.0 };
    let exp = ((bits >> 10) & 0x1f) as i32;
    let frac = (bits & 0x03ff) as f64;
    let magnitude = match exp {
        0 => frac * (-24f64).exp2(),
        0x1f => {
            if frac == 0.0 {
                f64::INFINITY
            } else {
                f64::NAN
            }
        }
        _ => (1.0 + frac / 1024.0) * ((exp - 15) as f64).exp2(),
    };
    sign * magnitude
}

/// Encodes to IEEE-754 binary16 bits, round to nearest.
fn f64_to_f16_bits(value: f64) -> u16 {
    let x = (value as f32).to_bits();
    let sign = ((x >> 16) & 0x8000) as u16;
    let mantissa = x & 0x007f_ffff;
    let exp = ((x >> 23) & 0xff) as i32;

    if exp == 0xff {
        if mantissa == 0 {
            return sign | 0x7c00;
        }
        // keep NaN a NaN
        return sign | 0x7c00 | (((mantissa >> 13) as u16) | 1);
    }

    let unbiased = exp - 127;
    if unbiased > 15 {
        return sign | 0x7c00;
    }
    if unbiased >= -14 {
        let half_exp = ((unbiased + 15) as u16) << 10;
        let half_man = (mantissa >> 13) as u16;
        let round = ((mantissa >> 12) & 1) as u16;
        return sign | ((half_exp | half_man) + round);
    }
    if unbiased >= -24 {
        // subnormal half
        let m = mantissa | 0x0080_0000;
        let shift = (-unbiased - 1) as u32;
        let half = (m >> shift) as u16;
        let round = ((m >> (shift - 1)) & 1) as u16;
        return sign | (half + round);
    }
    sign
}

/// Fuzz-only entrypoint for the half-float bit codec.
///
/// Every finite binary16 pattern must survive a decode/encode round trip.
#[cfg(feature = "fuzzing")]
pub fn fuzz_half_roundtrip(bits: u16) {
    let value = f16_bits_to_f64(bits);
    if value.is_finite() {
        assert_eq!(f64_to_f16_bits(value), bits);
    }
}
