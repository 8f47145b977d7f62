//! Device-domain representation.
//!
//! Stands in for a GPU texture: a staging byte store plus a process-unique
//! texture id. A real GPU backend would replace the staging store with an
//! API handle; the container and converter machinery is unchanged either
//! way, which is the point of modeling the device domain as just another
//! representation kind.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::dims::Dims3;
use crate::error::MultirepError;
use crate::format::FormatId;
use crate::io::raw;
use crate::rep::Lifecycle;

static NEXT_TEXTURE_ID: AtomicU64 = AtomicU64::new(1);

/// A volume materialized in the device domain.
#[derive(Debug)]
pub struct TextureRepresentation {
    format: FormatId,
    dims: Dims3,
    state: Lifecycle,
    texels: Vec<u8>,
    texture_id: u64,
}

impl TextureRepresentation {
    pub fn new(format: FormatId, dims: Dims3) -> Self {
        Self {
            format,
            dims,
            state: Lifecycle::Uninitialized,
            texels: Vec::new(),
            texture_id: 0,
        }
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

    /// Id of the allocated texture, 0 while uninitialized.
    pub fn texture_id(&self) -> u64 {
        self.texture_id
    }

    fn byte_size(&self) -> usize {
        self.dims.num_elements() * self.format.bytes_allocated()
    }

    /// Allocates the texture (staging store + fresh id). No-op if already
    /// initialized.
    pub fn initialize(&mut self) {
        if self.state == Lifecycle::Initialized {
            return;
        }
        self.texels = vec![0u8; self.byte_size()];
        self.texture_id = NEXT_TEXTURE_ID.fetch_add(1, Ordering::Relaxed);
        self.state = Lifecycle::Initialized;
    }

    /// Releases the texture. No-op if already deinitialized.
    pub fn deinitialize(&mut self) {
        if self.state == Lifecycle::Deinitialized {
            return;
        }
        self.texels = Vec::new();
        self.texture_id = 0;
        self.state = Lifecycle::Deinitialized;
    }

    /// Uploads host bytes into the texture. Initializes first if needed.
    pub fn upload(&mut self, bytes: &[u8]) -> Result<(), MultirepError> {
        self.initialize();
        if bytes.len() != self.texels.len() {
            return Err(MultirepError::BufferSizeMismatch {
                expected: self.texels.len(),
                actual: bytes.len(),
            });
        }
        self.texels.copy_from_slice(bytes);
        Ok(())
    }

    /// Reads the texture contents back to host memory.
    pub fn download(&self) -> &[u8] {
        &self.texels
    }

    /// Changes the geometry, rescaling the current content.
    pub fn resize(&mut self, dims: Dims3) {
        if dims == self.dims {
            return;
        }
        if self.state == Lifecycle::Initialized {
            self.texels = raw::rescale_nearest(
                &self.texels,
                self.dims,
                dims,
                self.format.bytes_allocated(),
            );
        }
        self.dims = dims;
    }
}

impl Clone for TextureRepresentation {
    /// Deep copy; an initialized clone gets its own texture id.
    fn clone(&self) -> Self {
        let mut copy = Self {
            format: self.format,
            dims: self.dims,
            state: self.state,
            texels: self.texels.clone(),
            texture_id: 0,
        };
        if copy.state == Lifecycle::Initialized {
            copy.texture_id = NEXT_TEXTURE_ID.fetch_add(1, Ordering::Relaxed);
        }
        copy
    }
}
