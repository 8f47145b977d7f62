//! In-memory representation: an owned raw buffer with normalized accessors.

use crate::dims::Dims3;
use crate::error::MultirepError;
use crate::format::FormatId;
use crate::io::raw;
use crate::rep::Lifecycle;

/// A volume materialized as one contiguous native-endian buffer.
///
/// Elements are laid out x fastest, z slowest, at their allocated width.
/// Per-position accessors go through the element codec chosen at
/// construction, so callers read and write normalized `f64` values
/// regardless of the storage width; this is what lets a converter be
/// written once instead of once per numeric kind.
#[derive(Clone, Debug)]
pub struct RamRepresentation {
    format: FormatId,
    dims: Dims3,
    state: Lifecycle,
    data: Vec<u8>,
}

impl RamRepresentation {
    /// Creates an uninitialized representation; call
    /// [`initialize`](Self::initialize) to allocate a zeroed buffer.
    pub fn new(format: FormatId, dims: Dims3) -> Self {
        Self {
            format,
            dims,
            state: Lifecycle::Uninitialized,
            data: Vec::new(),
        }
    }

    /// Creates an initialized representation taking ownership of `data`.
    ///
    /// The buffer must match the geometry exactly; on a size mismatch the
    /// buffer is dropped and an error returned.
    pub fn with_data(
        format: FormatId,
        dims: Dims3,
        data: Vec<u8>,
    ) -> Result<Self, MultirepError> {
        let mut rep = Self::new(format, dims);
        rep.set_data(data)?;
        Ok(rep)
    }

    pub fn format(&self) -> FormatId {
        self.format
    }

    pub fn dimensions(&self) -> Dims3 {
        self.dims
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.state
    }

    /// Bytes required by the current geometry.
    pub fn byte_size(&self) -> usize {
        self.dims.num_elements() * self.format.bytes_allocated()
    }

    /// Allocates a zeroed buffer. No-op if already initialized.
    pub fn initialize(&mut self) {
        if self.state == Lifecycle::Initialized {
            return;
        }
        self.data = vec![0u8; self.byte_size()];
        self.state = Lifecycle::Initialized;
    }

    /// Releases the buffer. No-op if already deinitialized.
    pub fn deinitialize(&mut self) {
        if self.state == Lifecycle::Deinitialized {
            return;
        }
        self.data = Vec::new();
        self.state = Lifecycle::Deinitialized;
    }

    /// Takes ownership of a caller-allocated buffer, replacing the current
    /// one. The representation becomes initialized.
    pub fn set_data(&mut self, data: Vec<u8>) -> Result<(), MultirepError> {
        let expected = self.byte_size();
        if data.len() != expected {
            return Err(MultirepError::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        self.data = data;
        self.state = Lifecycle::Initialized;
        Ok(())
    }

    /// Non-owning view of the raw buffer.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Changes the geometry, rescaling the current content (nearest
    /// neighbor) if a buffer is allocated.
    pub fn resize(&mut self, dims: Dims3) {
        if dims == self.dims {
            return;
        }
        if self.state == Lifecycle::Initialized {
            self.data = raw::rescale_nearest(
                &self.data,
                self.dims,
                dims,
                self.format.bytes_allocated(),
            );
        }
        self.dims = dims;
    }

    /// Normalized value of the first channel at a position.
    ///
    /// Reads as 0.0 when no buffer is allocated, like the sentinel format.
    pub fn scalar(&self, x: u32, y: u32, z: u32) -> f64 {
        if self.state != Lifecycle::Initialized {
            return 0.0;
        }
        match self.format.scalar_kind() {
            Some(kind) => kind.read_normalized(&self.data[self.channel_offset(x, y, z, 0)..]),
            None => 0.0,
        }
    }

    /// Writes the first channel at a position from a normalized value.
    /// No-op when no buffer is allocated.
    pub fn set_scalar(&mut self, x: u32, y: u32, z: u32, value: f64) {
        if self.state != Lifecycle::Initialized {
            return;
        }
        if let Some(kind) = self.format.scalar_kind() {
            let offset = self.channel_offset(x, y, z, 0);
            kind.write_normalized(&mut self.data[offset..], value);
        }
    }

    /// Normalized values of all channels at a position; channels beyond
    /// the format's count read as zero, as does an unallocated buffer.
    pub fn vector(&self, x: u32, y: u32, z: u32) -> [f64; 4] {
        let mut out = [0.0; 4];
        if self.state != Lifecycle::Initialized {
            return out;
        }
        if let Some(kind) = self.format.scalar_kind() {
            for (c, slot) in out
                .iter_mut()
                .enumerate()
                .take(self.format.components() as usize)
            {
                *slot = kind.read_normalized(&self.data[self.channel_offset(x, y, z, c as u32)..]);
            }
        }
        out
    }

    /// Writes all channels at a position from normalized values; values
    /// beyond the format's channel count are ignored. No-op when no buffer
    /// is allocated.
    pub fn set_vector(&mut self, x: u32, y: u32, z: u32, values: [f64; 4]) {
        if self.state != Lifecycle::Initialized {
            return;
        }
        if let Some(kind) = self.format.scalar_kind() {
            for c in 0..self.format.components() {
                let offset = self.channel_offset(x, y, z, c);
                kind.write_normalized(&mut self.data[offset..], values[c as usize]);
            }
        }
    }

    fn channel_offset(&self, x: u32, y: u32, z: u32, channel: u32) -> usize {
        let element = self.dims.index_of(x, y, z) * self.format.bytes_allocated();
        element
            + channel as usize
                * self
                    .format
                    .scalar_kind()
                    .map(|k| k.bytes())
                    .unwrap_or(0)
    }
}
