//! The process-wide converter registry.
//!
//! Registration happens during an explicit init phase; [`finalize`]
//! freezes the registry, after which registration fails and lookups are
//! read-only. Lookups are linear scans over the registered converters and
//! chains; the population is small and process-scoped, so no index is
//! warranted.
//!
//! [`finalize`]: ConverterRegistry::finalize

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::convert::{
    Converter, ConverterChain, DiskToRamConverter, RamToDiskConverter, RamToTextureConverter,
    TextureToRamConverter,
};
use crate::error::MultirepError;
use crate::rep::{Representation, RepresentationKind};

/// Append-only collection of converters and chains with a two-phase
/// lifecycle: open for registration until finalized, read-only after.
#[derive(Default)]
pub struct ConverterRegistry {
    converters: Vec<Arc<dyn Converter>>,
    chains: Vec<Arc<ConverterChain>>,
    frozen: bool,
}

/// Outcome of a path resolution: a direct converter or a pre-built chain.
#[derive(Clone)]
pub enum Resolution {
    Direct(Arc<dyn Converter>),
    Chain(Arc<ConverterChain>),
}

impl fmt::Debug for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Direct(c) => f
                .debug_tuple("Direct")
                .field(&c.target_kind())
                .finish(),
            Resolution::Chain(chain) => f
                .debug_struct("Chain")
                .field("len", &chain.len())
                .field("target", &chain.target_kind())
                .finish(),
        }
    }
}

impl Resolution {
    /// Number of conversion steps this resolution will execute.
    pub fn len(&self) -> usize {
        match self {
            Resolution::Direct(_) => 1,
            Resolution::Chain(chain) => chain.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn create_from(&self, source: &Representation) -> Result<Representation, MultirepError> {
        match self {
            Resolution::Direct(c) => c.create_from(source),
            Resolution::Chain(chain) => chain.create_from(source),
        }
    }

    pub fn update(
        &self,
        source: &Representation,
        destination: &mut Representation,
    ) -> Result<(), MultirepError> {
        match self {
            Resolution::Direct(c) => c.update(source, destination),
            Resolution::Chain(chain) => chain.update(source, destination),
        }
    }
}

impl ConverterRegistry {
    /// An empty registry, open for registration.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in converter set (Disk->Ram, Ram->Disk, Ram<->Texture and
    /// the Disk<->Texture chains through Ram), already finalized.
    ///
    /// `spool_dir` is where Ram->Disk conversions place their descriptor
    /// and raw files.
    pub fn standard(spool_dir: impl Into<PathBuf>) -> Self {
        let mut registry = Self::new();

        let disk_to_ram: Arc<dyn Converter> = Arc::new(DiskToRamConverter);
        let ram_to_disk: Arc<dyn Converter> = Arc::new(RamToDiskConverter::new(spool_dir));
        let ram_to_texture: Arc<dyn Converter> = Arc::new(RamToTextureConverter);
        let texture_to_ram: Arc<dyn Converter> = Arc::new(TextureToRamConverter);

        // registration is infallible on a fresh registry
        let _ = registry.register_converter(disk_to_ram.clone());
        let _ = registry.register_converter(ram_to_disk.clone());
        let _ = registry.register_converter(ram_to_texture.clone());
        let _ = registry.register_converter(texture_to_ram.clone());
        let _ = registry.register_chain(ConverterChain::new(vec![
            disk_to_ram,
            ram_to_texture,
        ]));
        let _ = registry.register_chain(ConverterChain::new(vec![
            texture_to_ram,
            ram_to_disk,
        ]));

        registry.finalize();
        registry
    }

    /// Registers a single-step converter. Fails once finalized.
    pub fn register_converter(
        &mut self,
        converter: Arc<dyn Converter>,
    ) -> Result<(), MultirepError> {
        if self.frozen {
            return Err(MultirepError::RegistryFrozen);
        }
        self.converters.push(converter);
        Ok(())
    }

    /// Registers a pre-built chain. Fails once finalized or if the chain
    /// is empty.
    pub fn register_chain(&mut self, chain: ConverterChain) -> Result<(), MultirepError> {
        if self.frozen {
            return Err(MultirepError::RegistryFrozen);
        }
        if chain.is_empty() {
            return Err(MultirepError::NoConversionPath {
                from: RepresentationKind::Ram,
                to: chain.target_kind(),
            });
        }
        self.chains.push(Arc::new(chain));
        Ok(())
    }

    /// Freezes the registry. Idempotent.
    pub fn finalize(&mut self) {
        self.frozen = true;
    }

    pub fn is_finalized(&self) -> bool {
        self.frozen
    }

    pub fn num_converters(&self) -> usize {
        self.converters.len()
    }

    pub fn num_chains(&self) -> usize {
        self.chains.len()
    }

    /// First registered single-step converter producing `target` that
    /// accepts `source`.
    pub fn find_converter(
        &self,
        target: RepresentationKind,
        source: &Representation,
    ) -> Option<Arc<dyn Converter>> {
        self.converters
            .iter()
            .find(|c| c.target_kind() == target && c.can_convert_from(source))
            .cloned()
    }

    /// Shortest registered chain producing `target` that accepts `source`.
    ///
    /// Ties go to the first registered chain: the comparison is strictly
    /// less-than, so an equally short later registration never displaces
    /// an earlier one. Deterministic across runs.
    pub fn find_chain(
        &self,
        target: RepresentationKind,
        source: &Representation,
    ) -> Option<Arc<ConverterChain>> {
        let mut best: Option<&Arc<ConverterChain>> = None;
        for chain in &self.chains {
            if chain.target_kind() != target || !chain.can_convert_from(source) {
                continue;
            }
            match best {
                Some(current) if chain.len() >= current.len() => {}
                _ => best = Some(chain),
            }
        }
        best.cloned()
    }

    /// Resolves a conversion from `source` to `target`, preferring a
    /// direct converter over any chain regardless of chain length.
    pub fn resolve(
        &self,
        target: RepresentationKind,
        source: &Representation,
    ) -> Result<Resolution, MultirepError> {
        if let Some(converter) = self.find_converter(target, source) {
            return Ok(Resolution::Direct(converter));
        }
        if let Some(chain) = self.find_chain(target, source) {
            return Ok(Resolution::Chain(chain));
        }
        Err(MultirepError::NoConversionPath {
            from: source.kind(),
            to: target,
        })
    }
}
