//! Representations: one memory domain's materialization of a volume.
//!
//! A logical volume can exist in several domains at once (main memory, a
//! raw file on disk, a device texture). Each materialization is a
//! [`Representation`], a tagged closed set so converters can match on the
//! concrete [`RepresentationKind`] instead of inspecting runtime types.
//! Representations are exclusively owned by one
//! [`VolumeContainer`](crate::container::VolumeContainer), which is the
//! only path allowed to mutate them.

pub mod disk;
pub mod ram;
pub mod texture;

pub use disk::DiskRepresentation;
pub use ram::RamRepresentation;
pub use texture::TextureRepresentation;

use serde::Serialize;

use crate::dims::Dims3;
use crate::format::FormatId;

/// The memory domain a representation lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RepresentationKind {
    Ram,
    Disk,
    Texture,
}

/// Lifecycle of a representation's backing storage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Lifecycle {
    #[default]
    Uninitialized,
    Initialized,
    Deinitialized,
}

/// One materialization of a volume. Cloning produces an independent deep
/// copy with its own storage.
#[derive(Clone, Debug)]
pub enum Representation {
    Ram(RamRepresentation),
    Disk(DiskRepresentation),
    Texture(TextureRepresentation),
}

impl Representation {
    pub fn kind(&self) -> RepresentationKind {
        match self {
            Representation::Ram(_) => RepresentationKind::Ram,
            Representation::Disk(_) => RepresentationKind::Disk,
            Representation::Texture(_) => RepresentationKind::Texture,
        }
    }

    pub fn format(&self) -> FormatId {
        match self {
            Representation::Ram(r) => r.format(),
            Representation::Disk(r) => r.format(),
            Representation::Texture(r) => r.format(),
        }
    }

    pub fn dimensions(&self) -> Dims3 {
        match self {
            Representation::Ram(r) => r.dimensions(),
            Representation::Disk(r) => r.dimensions(),
            Representation::Texture(r) => r.dimensions(),
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        match self {
            Representation::Ram(r) => r.lifecycle(),
            Representation::Disk(r) => r.lifecycle(),
            Representation::Texture(r) => r.lifecycle(),
        }
    }

    /// Moves to `Initialized`, allocating backing storage. No-op if
    /// already initialized.
    pub fn initialize(&mut self) {
        match self {
            Representation::Ram(r) => r.initialize(),
            Representation::Disk(r) => r.initialize(),
            Representation::Texture(r) => r.initialize(),
        }
    }

    /// Moves to `Deinitialized`, releasing backing storage. No-op if
    /// already deinitialized.
    pub fn deinitialize(&mut self) {
        match self {
            Representation::Ram(r) => r.deinitialize(),
            Representation::Disk(r) => r.deinitialize(),
            Representation::Texture(r) => r.deinitialize(),
        }
    }

    /// Changes the nominal grid dimensions. In-memory kinds rescale their
    /// content; the disk kind only records the new nominal geometry and
    /// rescales on the next load.
    pub fn resize(&mut self, dims: Dims3) {
        match self {
            Representation::Ram(r) => r.resize(dims),
            Representation::Disk(r) => r.resize(dims),
            Representation::Texture(r) => r.resize(dims),
        }
    }

    pub fn as_ram(&self) -> Option<&RamRepresentation> {
        match self {
            Representation::Ram(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_ram_mut(&mut self) -> Option<&mut RamRepresentation> {
        match self {
            Representation::Ram(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_disk(&self) -> Option<&DiskRepresentation> {
        match self {
            Representation::Disk(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_disk_mut(&mut self) -> Option<&mut DiskRepresentation> {
        match self {
            Representation::Disk(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_texture(&self) -> Option<&TextureRepresentation> {
        match self {
            Representation::Texture(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_texture_mut(&mut self) -> Option<&mut TextureRepresentation> {
        match self {
            Representation::Texture(r) => Some(r),
            _ => None,
        }
    }
}

impl From<RamRepresentation> for Representation {
    fn from(r: RamRepresentation) -> Self {
        Representation::Ram(r)
    }
}

impl From<DiskRepresentation> for Representation {
    fn from(r: DiskRepresentation) -> Self {
        Representation::Disk(r)
    }
}

impl From<TextureRepresentation> for Representation {
    fn from(r: TextureRepresentation) -> Self {
        Representation::Texture(r)
    }
}
