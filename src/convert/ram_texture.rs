//! Built-in converters between the Ram and Texture domains.

use crate::convert::Converter;
use crate::error::MultirepError;
use crate::rep::{RamRepresentation, Representation, RepresentationKind, TextureRepresentation};

fn wrong_source(source: &Representation, target: RepresentationKind) -> MultirepError {
    MultirepError::NoConversionPath {
        from: source.kind(),
        to: target,
    }
}

/// Uploads an in-memory volume to the device domain.
pub struct RamToTextureConverter;

impl Converter for RamToTextureConverter {
    fn target_kind(&self) -> RepresentationKind {
        RepresentationKind::Texture
    }

    fn can_convert_from(&self, source: &Representation) -> bool {
        source.kind() == RepresentationKind::Ram
    }

    fn create_from(&self, source: &Representation) -> Result<Representation, MultirepError> {
        let ram = source
            .as_ram()
            .ok_or_else(|| wrong_source(source, self.target_kind()))?;
        let mut texture = TextureRepresentation::new(ram.format(), ram.dimensions());
        texture.upload(ram.data())?;
        Ok(texture.into())
    }

    fn update(
        &self,
        source: &Representation,
        destination: &mut Representation,
    ) -> Result<(), MultirepError> {
        let ram = source
            .as_ram()
            .ok_or_else(|| wrong_source(source, self.target_kind()))?;
        let (dims, data) = (ram.dimensions(), ram.data().to_vec());
        let texture = destination
            .as_texture_mut()
            .ok_or_else(|| wrong_source(source, self.target_kind()))?;
        texture.resize(dims);
        texture.upload(&data)
    }
}

/// Downloads a device-domain volume back to main memory.
pub struct TextureToRamConverter;

impl Converter for TextureToRamConverter {
    fn target_kind(&self) -> RepresentationKind {
        RepresentationKind::Ram
    }

    fn can_convert_from(&self, source: &Representation) -> bool {
        source.kind() == RepresentationKind::Texture
    }

    fn create_from(&self, source: &Representation) -> Result<Representation, MultirepError> {
        let texture = source
            .as_texture()
            .ok_or_else(|| wrong_source(source, self.target_kind()))?;
        let ram = RamRepresentation::with_data(
            texture.format(),
            texture.dimensions(),
            texture.download().to_vec(),
        )?;
        Ok(ram.into())
    }

    fn update(
        &self,
        source: &Representation,
        destination: &mut Representation,
    ) -> Result<(), MultirepError> {
        let texture = source
            .as_texture()
            .ok_or_else(|| wrong_source(source, self.target_kind()))?;
        let (dims, data) = (texture.dimensions(), texture.download().to_vec());
        let ram = destination
            .as_ram_mut()
            .ok_or_else(|| wrong_source(source, self.target_kind()))?;
        ram.resize(dims);
        ram.set_data(data)
    }
}
