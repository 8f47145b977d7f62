//! Built-in converters between the Ram and Disk domains.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::convert::Converter;
use crate::error::MultirepError;
use crate::io::raw::{ByteOrder, VolumeDescriptor};
use crate::rep::{DiskRepresentation, RamRepresentation, Representation, RepresentationKind};

fn wrong_source(source: &Representation, target: RepresentationKind) -> MultirepError {
    MultirepError::NoConversionPath {
        from: source.kind(),
        to: target,
    }
}

/// Materializes a disk-referenced volume into main memory.
pub struct DiskToRamConverter;

impl Converter for DiskToRamConverter {
    fn target_kind(&self) -> RepresentationKind {
        RepresentationKind::Ram
    }

    fn can_convert_from(&self, source: &Representation) -> bool {
        source.kind() == RepresentationKind::Disk
    }

    fn create_from(&self, source: &Representation) -> Result<Representation, MultirepError> {
        let disk = source
            .as_disk()
            .ok_or_else(|| wrong_source(source, self.target_kind()))?;
        let bytes = disk.load()?;
        let ram = RamRepresentation::with_data(disk.format(), disk.dimensions(), bytes)?;
        Ok(ram.into())
    }

    fn update(
        &self,
        source: &Representation,
        destination: &mut Representation,
    ) -> Result<(), MultirepError> {
        let disk = source
            .as_disk()
            .ok_or_else(|| wrong_source(source, self.target_kind()))?;
        let bytes = disk.load()?;
        let ram = destination
            .as_ram_mut()
            .ok_or_else(|| wrong_source(source, self.target_kind()))?;
        ram.resize(disk.dimensions());
        ram.set_data(bytes)
    }
}

/// Spools an in-memory volume out to a descriptor + raw file pair.
///
/// Freshly created disk representations are placed in the configured
/// spool directory under counter-derived names; updates rewrite the
/// destination's existing files instead.
pub struct RamToDiskConverter {
    spool_dir: PathBuf,
    next_volume: AtomicU64,
}

impl RamToDiskConverter {
    pub fn new(spool_dir: impl Into<PathBuf>) -> Self {
        Self {
            spool_dir: spool_dir.into(),
            next_volume: AtomicU64::new(0),
        }
    }

    pub fn spool_dir(&self) -> &PathBuf {
        &self.spool_dir
    }
}

impl Converter for RamToDiskConverter {
    fn target_kind(&self) -> RepresentationKind {
        RepresentationKind::Disk
    }

    fn can_convert_from(&self, source: &Representation) -> bool {
        source.kind() == RepresentationKind::Ram
    }

    fn create_from(&self, source: &Representation) -> Result<Representation, MultirepError> {
        let ram = source
            .as_ram()
            .ok_or_else(|| wrong_source(source, self.target_kind()))?;
        let n = self.next_volume.fetch_add(1, Ordering::Relaxed);
        std::fs::create_dir_all(&self.spool_dir)?;
        let descriptor = VolumeDescriptor {
            data: format!("volume-{n}.raw"),
            dimensions: ram.dimensions(),
            format: ram.format(),
            byte_order: ByteOrder::host(),
        };
        let descriptor_path = self.spool_dir.join(format!("volume-{n}.yaml"));
        let disk = DiskRepresentation::create(descriptor_path, descriptor, ram.data())?;
        Ok(disk.into())
    }

    fn update(
        &self,
        source: &Representation,
        destination: &mut Representation,
    ) -> Result<(), MultirepError> {
        let ram = source
            .as_ram()
            .ok_or_else(|| wrong_source(source, self.target_kind()))?;
        let (dims, format, data) = (ram.dimensions(), ram.format(), ram.data().to_vec());
        let disk = destination
            .as_disk_mut()
            .ok_or_else(|| wrong_source(source, self.target_kind()))?;
        disk.store(dims, format, &data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dims::Dims3;
    use crate::format::FormatId;
    use tempfile::tempdir;

    fn ram_fixture() -> Representation {
        RamRepresentation::with_data(FormatId::UInt16, Dims3::new(2, 1, 1), vec![1, 0, 2, 0])
            .unwrap()
            .into()
    }

    #[test]
    fn converters_accept_exactly_their_source_kind() {
        let ram = ram_fixture();
        assert!(RamToDiskConverter::new("/tmp").can_convert_from(&ram));
        assert!(!DiskToRamConverter.can_convert_from(&ram));
    }

    #[test]
    fn ram_spools_to_disk_and_back() {
        let dir = tempdir().unwrap();
        let ram = ram_fixture();

        let to_disk = RamToDiskConverter::new(dir.path());
        let disk = to_disk.create_from(&ram).unwrap();
        assert_eq!(disk.kind(), RepresentationKind::Disk);
        assert_eq!(disk.format(), FormatId::UInt16);

        let back = DiskToRamConverter.create_from(&disk).unwrap();
        assert_eq!(back.as_ram().unwrap().data(), &[1, 0, 2, 0]);
    }

    #[test]
    fn spooled_volumes_get_distinct_names() {
        let dir = tempdir().unwrap();
        let to_disk = RamToDiskConverter::new(dir.path());
        let a = to_disk.create_from(&ram_fixture()).unwrap();
        let b = to_disk.create_from(&ram_fixture()).unwrap();
        assert_ne!(
            a.as_disk().unwrap().descriptor_path(),
            b.as_disk().unwrap().descriptor_path()
        );
    }

    #[test]
    fn update_rewrites_existing_files() {
        let dir = tempdir().unwrap();
        let to_disk = RamToDiskConverter::new(dir.path());
        let mut disk = to_disk.create_from(&ram_fixture()).unwrap();
        let path_before = disk.as_disk().unwrap().descriptor_path().to_path_buf();

        let changed: Representation =
            RamRepresentation::with_data(FormatId::UInt16, Dims3::new(2, 1, 1), vec![9, 0, 8, 0])
                .unwrap()
                .into();
        to_disk.update(&changed, &mut disk).unwrap();

        assert_eq!(disk.as_disk().unwrap().descriptor_path(), path_before);
        let back = DiskToRamConverter.create_from(&disk).unwrap();
        assert_eq!(back.as_ram().unwrap().data(), &[9, 0, 8, 0]);
    }

    #[test]
    fn update_resizes_a_geometry_mismatched_ram_destination() {
        let dir = tempdir().unwrap();
        let to_disk = RamToDiskConverter::new(dir.path());
        let disk = to_disk.create_from(&ram_fixture()).unwrap();

        let mut stale: Representation =
            RamRepresentation::with_data(FormatId::UInt16, Dims3::new(4, 1, 1), vec![0; 8])
                .unwrap()
                .into();
        DiskToRamConverter.update(&disk, &mut stale).unwrap();
        assert_eq!(stale.dimensions(), Dims3::new(2, 1, 1));
        assert_eq!(stale.as_ram().unwrap().data(), &[1, 0, 2, 0]);
    }
}
