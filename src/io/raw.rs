//! Raw volume reading and writing.
//!
//! A volume on disk is a pair of files: a YAML descriptor naming the data
//! file, grid dimensions, element format, and byte order, plus the raw
//! data file itself (elements at their allocated width, x fastest). The
//! reader validates the data size against the descriptor and corrects the
//! byte order per scalar channel when the stored order differs from the
//! host, so in-memory buffers are always native-endian.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dims::Dims3;
use crate::error::MultirepError;
use crate::format::FormatId;

/// Byte order of a raw data file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ByteOrder {
    #[default]
    Little,
    Big,
}

impl ByteOrder {
    /// The byte order of the machine we are running on.
    pub fn host() -> ByteOrder {
        if cfg!(target_endian = "big") {
            ByteOrder::Big
        } else {
            ByteOrder::Little
        }
    }
}

/// Sidecar metadata describing one raw volume file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VolumeDescriptor {
    /// Name of the raw data file, relative to the descriptor file.
    pub data: String,
    pub dimensions: Dims3,
    pub format: FormatId,
    #[serde(default)]
    pub byte_order: ByteOrder,
}

impl VolumeDescriptor {
    /// Expected size of the raw data file in bytes.
    pub fn raw_size(&self) -> usize {
        self.dimensions.num_elements() * self.format.bytes_allocated()
    }

    /// Path of the data file, resolved against the descriptor location.
    pub fn data_path(&self, descriptor_path: &Path) -> PathBuf {
        match descriptor_path.parent() {
            Some(dir) => dir.join(&self.data),
            None => PathBuf::from(&self.data),
        }
    }
}

/// Reads a volume descriptor from a YAML file.
pub fn read_descriptor(path: &Path) -> Result<VolumeDescriptor, MultirepError> {
    let text = fs::read_to_string(path)?;
    from_descriptor_str(&text).map_err(|source| MultirepError::DescriptorParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses a volume descriptor from YAML text.
pub fn from_descriptor_str(text: &str) -> Result<VolumeDescriptor, serde_yaml::Error> {
    serde_yaml::from_str(text)
}

/// Writes a volume descriptor as YAML.
pub fn write_descriptor(path: &Path, desc: &VolumeDescriptor) -> Result<(), MultirepError> {
    let text =
        serde_yaml::to_string(desc).map_err(|source| MultirepError::DescriptorWrite {
            path: path.to_path_buf(),
            source,
        })?;
    fs::write(path, text)?;
    Ok(())
}

/// Reads the raw data named by `desc`, validating its size and converting
/// to host byte order.
///
/// A short or oversized file is an error, never a partial read: loading a
/// volume must not hand out a buffer that disagrees with the descriptor
/// geometry.
pub fn read_volume(descriptor_path: &Path, desc: &VolumeDescriptor) -> Result<Vec<u8>, MultirepError> {
    let data_path = desc.data_path(descriptor_path);
    let mut bytes = fs::read(&data_path)?;
    let expected = desc.raw_size();
    if bytes.len() != expected {
        return Err(MultirepError::RawSizeMismatch {
            path: data_path,
            expected,
            actual: bytes.len(),
        });
    }
    if desc.byte_order != ByteOrder::host() {
        swap_to_host(&mut bytes, desc.format);
    }
    Ok(bytes)
}

/// Writes `bytes` (host byte order) as the raw volume described by `desc`,
/// converting to the descriptor's byte order, and writes the descriptor
/// next to it.
pub fn write_volume(
    descriptor_path: &Path,
    desc: &VolumeDescriptor,
    bytes: &[u8],
) -> Result<(), MultirepError> {
    let expected = desc.raw_size();
    if bytes.len() != expected {
        return Err(MultirepError::BufferSizeMismatch {
            expected,
            actual: bytes.len(),
        });
    }
    let data_path = desc.data_path(descriptor_path);
    if desc.byte_order != ByteOrder::host() {
        let mut swapped = bytes.to_vec();
        swap_to_host(&mut swapped, desc.format);
        fs::write(&data_path, swapped)?;
    } else {
        fs::write(&data_path, bytes)?;
    }
    write_descriptor(descriptor_path, desc)
}

/// Reverses the bytes of every scalar channel in place.
///
/// The swap unit is the per-channel width, not the whole element, so
/// multi-channel formats keep their channel order. Involutive: applying it
/// twice restores the input, which is why one function serves both read
/// and write.
pub fn swap_to_host(bytes: &mut [u8], format: FormatId) {
    let width = match format.scalar_kind() {
        Some(kind) => kind.bytes(),
        None => return,
    };
    if width <= 1 {
        return;
    }
    for chunk in bytes.chunks_exact_mut(width) {
        chunk.reverse();
    }
}

/// Nearest-neighbor rescale of a raw buffer from `src_dims` to `dst_dims`.
///
/// Elements are opaque byte runs of `element_bytes`; no filtering, the
/// nearest source element is copied. Used when a consumer asks for a
/// loaded volume at a different resolution than the file provides.
pub fn rescale_nearest(
    src: &[u8],
    src_dims: Dims3,
    dst_dims: Dims3,
    element_bytes: usize,
) -> Vec<u8> {
    let mut dst = vec![0u8; dst_dims.num_elements() * element_bytes];
    // a degenerate source has nothing to sample; leave the output zeroed
    if src_dims.num_elements() == 0 {
        return dst;
    }
    for z in 0..dst_dims.z {
        let sz = nearest(z, dst_dims.z, src_dims.z);
        for y in 0..dst_dims.y {
            let sy = nearest(y, dst_dims.y, src_dims.y);
            for x in 0..dst_dims.x {
                let sx = nearest(x, dst_dims.x, src_dims.x);
                let s = src_dims.index_of(sx, sy, sz) * element_bytes;
                let d = dst_dims.index_of(x, y, z) * element_bytes;
                dst[d..d + element_bytes].copy_from_slice(&src[s..s + element_bytes]);
            }
        }
    }
    dst
}

fn nearest(i: u32, dst_extent: u32, src_extent: u32) -> u32 {
    // sample at destination element centers
    let pos = (i as f64 + 0.5) / dst_extent as f64;
    let src = (pos * src_extent as f64) as u32;
    src.min(src_extent - 1)
}
