//! Converters: producing one representation kind from another.
//!
//! A [`Converter`] is a stateless predicate + action pair specialized to
//! one target [`RepresentationKind`]. It can allocate a fresh destination
//! ([`Converter::create_from`]) or refresh an existing one in place
//! ([`Converter::update`]), which is what a container uses to revalidate a
//! stale cached entry without reallocating it. A [`ConverterChain`]
//! composes converters to bridge kinds with no direct converter; chains
//! are built once by whoever registers them and are immutable afterwards.

pub mod ram_disk;
pub mod ram_texture;
pub mod registry;

pub use ram_disk::{DiskToRamConverter, RamToDiskConverter};
pub use ram_texture::{RamToTextureConverter, TextureToRamConverter};
pub use registry::{ConverterRegistry, Resolution};

use std::sync::Arc;

use crate::error::MultirepError;
use crate::rep::{Representation, RepresentationKind};

/// A single-step conversion toward one representation kind.
///
/// Implementations hold no per-dataset state; any configuration (such as a
/// spool directory) is process-scoped and set at registration time.
pub trait Converter: Send + Sync {
    /// The kind this converter produces.
    fn target_kind(&self) -> RepresentationKind;

    /// Exact-kind acceptance check: true only if this converter is written
    /// against the concrete kind of `source`, never "convertible in
    /// principle".
    fn can_convert_from(&self, source: &Representation) -> bool;

    /// Allocates and populates a new destination from `source`.
    fn create_from(&self, source: &Representation) -> Result<Representation, MultirepError>;

    /// Refreshes an existing destination in place from `source`.
    fn update(
        &self,
        source: &Representation,
        destination: &mut Representation,
    ) -> Result<(), MultirepError>;
}

/// A pre-built ordered composition of converters.
///
/// Step 1 accepts the original source kind, the last step produces the
/// target kind, and every intermediate output kind matches the next step's
/// accepted input. Construction is the registrant's responsibility; the
/// chain itself only executes.
pub struct ConverterChain {
    steps: Vec<Arc<dyn Converter>>,
}

impl ConverterChain {
    /// Builds a chain from its ordered steps. `steps` must be non-empty
    /// and composable; the registry validates this at registration.
    pub fn new(steps: Vec<Arc<dyn Converter>>) -> Self {
        Self { steps }
    }

    /// Number of composed converters; resolution prefers shorter chains.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[Arc<dyn Converter>] {
        &self.steps
    }

    /// The kind the final step produces.
    pub fn target_kind(&self) -> RepresentationKind {
        self.steps
            .last()
            .map(|s| s.target_kind())
            .unwrap_or(RepresentationKind::Ram)
    }

    /// Whether the first step accepts `source`.
    pub fn can_convert_from(&self, source: &Representation) -> bool {
        self.steps
            .first()
            .is_some_and(|s| s.can_convert_from(source))
    }

    /// Runs all steps, materializing intermediates, and returns the final
    /// representation.
    pub fn create_from(&self, source: &Representation) -> Result<Representation, MultirepError> {
        let mut steps = self.steps.iter();
        let first = steps.next().ok_or(MultirepError::NoConversionPath {
            from: source.kind(),
            to: self.target_kind(),
        })?;
        let mut current = first.create_from(source)?;
        for step in steps {
            current = step.create_from(&current)?;
        }
        Ok(current)
    }

    /// Runs all but the last step as creations, then refreshes
    /// `destination` in place with the final step.
    ///
    /// Intermediates are transient by nature; only the destination is a
    /// cached entry worth preserving across refreshes.
    pub fn update(
        &self,
        source: &Representation,
        destination: &mut Representation,
    ) -> Result<(), MultirepError> {
        match self.steps.as_slice() {
            [] => Err(MultirepError::NoConversionPath {
                from: source.kind(),
                to: destination.kind(),
            }),
            [single] => single.update(source, destination),
            [first, mid @ .., last] => {
                let mut current = first.create_from(source)?;
                for step in mid {
                    current = step.create_from(&current)?;
                }
                last.update(&current, destination)
            }
        }
    }
}
