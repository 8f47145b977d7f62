//! On-disk representation: a reference to a descriptor + raw file pair.

use std::path::{Path, PathBuf};

use crate::dims::Dims3;
use crate::error::MultirepError;
use crate::format::FormatId;
use crate::io::raw::{self, ByteOrder, VolumeDescriptor};

/// A volume materialized as files on disk.
///
/// Holds the descriptor location and its parsed contents, never the data
/// itself; [`load`](Self::load) materializes bytes on demand. The nominal
/// dimensions can drift from the file's (after a container resize), in
/// which case loading rescales to the nominal geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct DiskRepresentation {
    descriptor_path: PathBuf,
    descriptor: VolumeDescriptor,
    /// Nominal geometry; starts equal to the descriptor's.
    dims: Dims3,
    state: super::Lifecycle,
}

impl DiskRepresentation {
    /// Opens an existing volume by reading its descriptor. The raw data is
    /// not touched.
    pub fn open(descriptor_path: impl Into<PathBuf>) -> Result<Self, MultirepError> {
        let descriptor_path = descriptor_path.into();
        let descriptor = raw::read_descriptor(&descriptor_path)?;
        Ok(Self {
            dims: descriptor.dimensions,
            descriptor_path,
            descriptor,
            state: super::Lifecycle::Initialized,
        })
    }

    /// Creates a new on-disk volume by writing `bytes` and its descriptor.
    pub fn create(
        descriptor_path: impl Into<PathBuf>,
        descriptor: VolumeDescriptor,
        bytes: &[u8],
    ) -> Result<Self, MultirepError> {
        let descriptor_path = descriptor_path.into();
        raw::write_volume(&descriptor_path, &descriptor, bytes)?;
        Ok(Self {
            dims: descriptor.dimensions,
            descriptor_path,
            descriptor,
            state: super::Lifecycle::Initialized,
        })
    }

    pub fn descriptor_path(&self) -> &Path {
        &self.descriptor_path
    }

    pub fn descriptor(&self) -> &VolumeDescriptor {
        &self.descriptor
    }

    pub fn format(&self) -> FormatId {
        self.descriptor.format
    }

    /// Nominal dimensions (what a load will produce), not necessarily the
    /// file's.
    pub fn dimensions(&self) -> Dims3 {
        self.dims
    }

    pub fn lifecycle(&self) -> super::Lifecycle {
        self.state
    }

    /// The file reference stays valid across init/deinit; only the state
    /// marker moves.
    pub fn initialize(&mut self) {
        self.state = super::Lifecycle::Initialized;
    }

    pub fn deinitialize(&mut self) {
        self.state = super::Lifecycle::Deinitialized;
    }

    /// Records a new nominal geometry. The files are untouched; the next
    /// load rescales.
    pub fn resize(&mut self, dims: Dims3) {
        self.dims = dims;
    }

    /// Loads the raw data in host byte order at the nominal geometry,
    /// rescaling (nearest neighbor) when the nominal dimensions differ
    /// from the file's.
    pub fn load(&self) -> Result<Vec<u8>, MultirepError> {
        let bytes = raw::read_volume(&self.descriptor_path, &self.descriptor)?;
        if self.dims == self.descriptor.dimensions {
            return Ok(bytes);
        }
        Ok(raw::rescale_nearest(
            &bytes,
            self.descriptor.dimensions,
            self.dims,
            self.descriptor.format.bytes_allocated(),
        ))
    }

    /// Loads the raw data rescaled to an explicit geometry.
    pub fn load_rescaled(&self, dims: Dims3) -> Result<Vec<u8>, MultirepError> {
        let bytes = raw::read_volume(&self.descriptor_path, &self.descriptor)?;
        if dims == self.descriptor.dimensions {
            return Ok(bytes);
        }
        Ok(raw::rescale_nearest(
            &bytes,
            self.descriptor.dimensions,
            dims,
            self.descriptor.format.bytes_allocated(),
        ))
    }

    /// Overwrites the on-disk volume with new contents, keeping the file
    /// locations and byte order. Used by converters refreshing a stale
    /// disk entry in place.
    pub fn store(
        &mut self,
        dims: Dims3,
        format: FormatId,
        bytes: &[u8],
    ) -> Result<(), MultirepError> {
        let descriptor = VolumeDescriptor {
            data: self.descriptor.data.clone(),
            dimensions: dims,
            format,
            byte_order: self.descriptor.byte_order,
        };
        raw::write_volume(&self.descriptor_path, &descriptor, bytes)?;
        self.descriptor = descriptor;
        self.dims = dims;
        self.state = super::Lifecycle::Initialized;
        Ok(())
    }

    /// Byte order of the stored data file.
    pub fn byte_order(&self) -> ByteOrder {
        self.descriptor.byte_order
    }
}
