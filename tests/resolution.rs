//! Converter path resolution: direct preference and deterministic ties.

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use multirep::container::VolumeContainer;
use multirep::convert::{
    Converter, ConverterChain, ConverterRegistry, DiskToRamConverter, RamToDiskConverter,
    RamToTextureConverter, Resolution,
};
use multirep::dims::Dims3;
use multirep::error::MultirepError;
use multirep::format::FormatId;
use multirep::rep::{Representation, RepresentationKind, TextureRepresentation};

use common::{patterned_ram, CountingConverter};

const DIMS: Dims3 = Dims3 { x: 2, y: 2, z: 2 };

/// A single-step Disk -> Texture converter (load + upload in one go).
struct DiskToTextureDirect;

impl Converter for DiskToTextureDirect {
    fn target_kind(&self) -> RepresentationKind {
        RepresentationKind::Texture
    }

    fn can_convert_from(&self, source: &Representation) -> bool {
        source.kind() == RepresentationKind::Disk
    }

    fn create_from(&self, source: &Representation) -> Result<Representation, MultirepError> {
        let disk = source.as_disk().expect("accepts only disk sources");
        let mut texture = TextureRepresentation::new(disk.format(), disk.dimensions());
        texture.upload(&disk.load()?)?;
        Ok(texture.into())
    }

    fn update(
        &self,
        source: &Representation,
        destination: &mut Representation,
    ) -> Result<(), MultirepError> {
        let disk = source.as_disk().expect("accepts only disk sources");
        let bytes = disk.load()?;
        let texture = destination
            .as_texture_mut()
            .expect("produces only textures");
        texture.resize(disk.dimensions());
        texture.upload(&bytes)
    }
}

/// A disk representation spooled from a patterned RAM buffer.
fn disk_source(spool: &std::path::Path) -> Representation {
    let ram: Representation = patterned_ram(FormatId::UInt8, DIMS).into();
    RamToDiskConverter::new(spool)
        .create_from(&ram)
        .expect("spooling to a tempdir succeeds")
}

#[test]
fn direct_converter_beats_a_two_step_chain() {
    let spool = tempfile::tempdir().unwrap();
    let (direct, direct_calls) = CountingConverter::new(Box::new(DiskToTextureDirect));
    let (step, step_calls) = CountingConverter::new(Box::new(DiskToRamConverter));

    let mut registry = ConverterRegistry::new();
    // the chain is registered first; the direct converter must still win
    let step: Arc<dyn Converter> = Arc::new(step);
    registry
        .register_chain(ConverterChain::new(vec![
            step.clone(),
            Arc::new(RamToTextureConverter),
        ]))
        .unwrap();
    registry.register_converter(Arc::new(direct)).unwrap();
    registry.finalize();

    let source = disk_source(spool.path());
    let resolution = registry
        .resolve(RepresentationKind::Texture, &source)
        .unwrap();
    assert!(matches!(resolution, Resolution::Direct(_)));
    assert_eq!(resolution.len(), 1);

    let mut container = VolumeContainer::new(FormatId::UInt8, DIMS);
    container.add_representation(source).unwrap();
    container
        .request_representation(RepresentationKind::Texture, &registry)
        .unwrap();
    assert_eq!(direct_calls.load(Ordering::SeqCst), 1);
    assert_eq!(step_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn equal_length_chains_resolve_to_the_first_registered() {
    let spool = tempfile::tempdir().unwrap();

    // two chains of identical shape and length, separately instrumented
    let (first_step, first_calls) = CountingConverter::new(Box::new(DiskToRamConverter));
    let (second_step, second_calls) = CountingConverter::new(Box::new(DiskToRamConverter));

    let mut registry = ConverterRegistry::new();
    registry
        .register_chain(ConverterChain::new(vec![
            Arc::new(first_step),
            Arc::new(RamToTextureConverter),
        ]))
        .unwrap();
    registry
        .register_chain(ConverterChain::new(vec![
            Arc::new(second_step),
            Arc::new(RamToTextureConverter),
        ]))
        .unwrap();
    registry.finalize();

    // deterministic across repeated resolutions
    for _ in 0..5 {
        let source = disk_source(spool.path());
        let resolution = registry
            .resolve(RepresentationKind::Texture, &source)
            .unwrap();
        resolution.create_from(&source).unwrap();
    }
    assert_eq!(first_calls.load(Ordering::SeqCst), 5);
    assert_eq!(second_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn shorter_chain_wins_regardless_of_registration_order() {
    let spool = tempfile::tempdir().unwrap();

    let (long_step, long_calls) = CountingConverter::new(Box::new(DiskToRamConverter));
    let (short_step, short_calls) = CountingConverter::new(Box::new(DiskToTextureDirect));

    let mut registry = ConverterRegistry::new();
    // 3-step chain registered first
    registry
        .register_chain(ConverterChain::new(vec![
            Arc::new(long_step),
            Arc::new(RamToTextureConverter),
            Arc::new(TextureIdentity),
        ]))
        .unwrap();
    // 1-step chain registered second
    registry
        .register_chain(ConverterChain::new(vec![Arc::new(short_step)]))
        .unwrap();
    registry.finalize();

    let source = disk_source(spool.path());
    let resolution = registry
        .resolve(RepresentationKind::Texture, &source)
        .unwrap();
    assert_eq!(resolution.len(), 1);
    resolution.create_from(&source).unwrap();
    assert_eq!(short_calls.load(Ordering::SeqCst), 1);
    assert_eq!(long_calls.load(Ordering::SeqCst), 0);
}

/// Texture -> Texture pass-through used to pad a chain's length.
struct TextureIdentity;

impl Converter for TextureIdentity {
    fn target_kind(&self) -> RepresentationKind {
        RepresentationKind::Texture
    }

    fn can_convert_from(&self, source: &Representation) -> bool {
        source.kind() == RepresentationKind::Texture
    }

    fn create_from(&self, source: &Representation) -> Result<Representation, MultirepError> {
        Ok(source.clone())
    }

    fn update(
        &self,
        source: &Representation,
        destination: &mut Representation,
    ) -> Result<(), MultirepError> {
        *destination = source.clone();
        Ok(())
    }
}

#[test]
fn chain_steps_compose_left_to_right() {
    let spool = tempfile::tempdir().unwrap();
    let mut registry = ConverterRegistry::new();
    registry
        .register_chain(ConverterChain::new(vec![
            Arc::new(DiskToRamConverter),
            Arc::new(RamToTextureConverter),
        ]))
        .unwrap();
    registry.finalize();

    let source = disk_source(spool.path());
    let expected = source.as_disk().unwrap().load().unwrap();

    let resolution = registry
        .resolve(RepresentationKind::Texture, &source)
        .unwrap();
    let texture = resolution.create_from(&source).unwrap();
    assert_eq!(texture.kind(), RepresentationKind::Texture);
    assert_eq!(texture.as_texture().unwrap().download(), expected.as_slice());
}
