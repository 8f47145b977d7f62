//! Container cache behavior: hits, staleness, failure isolation.

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use multirep::container::{EntryStatus, VolumeContainer};
use multirep::convert::{ConverterRegistry, RamToTextureConverter};
use multirep::dims::Dims3;
use multirep::error::MultirepError;
use multirep::format::FormatId;
use multirep::io::raw;
use multirep::rep::{RepresentationKind, TextureRepresentation};

use common::{patterned_ram, CountingConverter};

const DIMS: Dims3 = Dims3 { x: 4, y: 4, z: 2 };

fn counting_texture_registry() -> (ConverterRegistry, Arc<std::sync::atomic::AtomicUsize>) {
    let (counting, calls) = CountingConverter::new(Box::new(RamToTextureConverter));
    let mut registry = ConverterRegistry::new();
    registry
        .register_converter(Arc::new(counting))
        .expect("fresh registry accepts registration");
    registry.finalize();
    (registry, calls)
}

#[test]
fn repeated_requests_hit_the_cache() {
    let (registry, calls) = counting_texture_registry();
    let mut container = VolumeContainer::new(FormatId::UInt8, DIMS);
    container
        .add_representation(patterned_ram(FormatId::UInt8, DIMS))
        .unwrap();

    let first_id = container
        .request_representation(RepresentationKind::Texture, &registry)
        .unwrap()
        .as_texture()
        .unwrap()
        .texture_id();
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // second request: identical instance, no converter invoked
    let second_id = container
        .request_representation(RepresentationKind::Texture, &registry)
        .unwrap()
        .as_texture()
        .unwrap()
        .texture_id();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(first_id, second_id);
}

#[test]
fn derived_copies_do_not_become_authoritative() {
    let (registry, _calls) = counting_texture_registry();
    let mut container = VolumeContainer::new(FormatId::UInt8, DIMS);
    container
        .add_representation(patterned_ram(FormatId::UInt8, DIMS))
        .unwrap();

    container
        .request_representation(RepresentationKind::Texture, &registry)
        .unwrap();
    assert_eq!(container.authoritative_kind(), Some(RepresentationKind::Ram));
    assert_eq!(
        container.status(RepresentationKind::Texture),
        Some(EntryStatus::Valid)
    );
}

#[test]
fn direct_write_stales_derived_entries_and_forces_reconversion() {
    let (registry, calls) = counting_texture_registry();
    let mut container = VolumeContainer::new(FormatId::UInt8, DIMS);
    container
        .add_representation(patterned_ram(FormatId::UInt8, DIMS))
        .unwrap();

    container
        .request_representation(RepresentationKind::Texture, &registry)
        .unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // direct write through the container's accessor
    let rep = container
        .edit_representation(RepresentationKind::Ram)
        .unwrap();
    rep.as_ram_mut().unwrap().set_scalar(0, 0, 0, 1.0);
    assert_eq!(
        container.status(RepresentationKind::Texture),
        Some(EntryStatus::Stale)
    );

    // stale entry is refreshed in place, not reallocated
    let old_id = container
        .representation(RepresentationKind::Texture)
        .unwrap()
        .as_texture()
        .unwrap()
        .texture_id();
    let texture = container
        .request_representation(RepresentationKind::Texture, &registry)
        .unwrap()
        .as_texture()
        .unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(texture.texture_id(), old_id);
    assert_eq!(texture.download()[0], 255);
}

#[test]
fn add_representation_stales_previously_valid_siblings() {
    let (registry, calls) = counting_texture_registry();
    let mut container = VolumeContainer::new(FormatId::UInt8, DIMS);
    container
        .add_representation(patterned_ram(FormatId::UInt8, DIMS))
        .unwrap();
    container
        .request_representation(RepresentationKind::Texture, &registry)
        .unwrap();

    // a new authoritative RAM buffer arrives
    container
        .add_representation(patterned_ram(FormatId::UInt8, DIMS))
        .unwrap();
    assert_eq!(
        container.status(RepresentationKind::Texture),
        Some(EntryStatus::Stale)
    );

    container
        .request_representation(RepresentationKind::Texture, &registry)
        .unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn no_path_failure_leaves_entries_untouched() {
    let registry = {
        let mut r = ConverterRegistry::new();
        r.finalize();
        r
    };
    let mut container = VolumeContainer::new(FormatId::UInt8, DIMS);
    let mut texture = TextureRepresentation::new(FormatId::UInt8, DIMS);
    texture.initialize();
    container.add_representation(texture).unwrap();

    let err = container
        .request_representation(RepresentationKind::Disk, &registry)
        .unwrap_err();
    assert!(matches!(
        err,
        MultirepError::NoConversionPath {
            from: RepresentationKind::Texture,
            to: RepresentationKind::Disk,
        }
    ));

    // the texture entry is still there, still valid, still authoritative
    assert_eq!(
        container.status(RepresentationKind::Texture),
        Some(EntryStatus::Valid)
    );
    assert_eq!(
        container.authoritative_kind(),
        Some(RepresentationKind::Texture)
    );
    assert!(container.representation(RepresentationKind::Disk).is_none());
}

#[test]
fn resize_stales_a_valid_disk_entry_without_touching_its_files() {
    let spool = tempfile::tempdir().unwrap();
    let registry = ConverterRegistry::standard(spool.path());
    let mut container = VolumeContainer::new(FormatId::UInt16, DIMS);
    container
        .add_representation(patterned_ram(FormatId::UInt16, DIMS))
        .unwrap();

    let descriptor_path = container
        .request_representation(RepresentationKind::Disk, &registry)
        .unwrap()
        .as_disk()
        .unwrap()
        .descriptor_path()
        .to_path_buf();

    let new_dims = Dims3::new(2, 2, 2);
    container.resize(new_dims);
    assert_eq!(
        container.status(RepresentationKind::Disk),
        Some(EntryStatus::Stale)
    );

    // the files on disk still describe the old geometry
    let desc = raw::read_descriptor(&descriptor_path).unwrap();
    assert_eq!(desc.dimensions, DIMS);

    // requesting the disk entry rewrites it at the new geometry
    container
        .request_representation(RepresentationKind::Disk, &registry)
        .unwrap();
    let desc = raw::read_descriptor(&descriptor_path).unwrap();
    assert_eq!(desc.dimensions, new_dims);
}
