//! Volume containers: one logical dataset, many representations.
//!
//! A [`VolumeContainer`] owns at most one representation per kind, tracks
//! which entry is authoritative (last direct write), and materializes
//! missing or stale entries on demand by resolving a conversion path
//! through a [`ConverterRegistry`]. Authoritative status moves only on
//! direct writes ([`add_representation`], [`edit_representation`]);
//! representations produced by read-only derivation stay valid derived
//! copies.
//!
//! [`add_representation`]: VolumeContainer::add_representation
//! [`edit_representation`]: VolumeContainer::edit_representation

use std::collections::BTreeMap;

use crate::convert::ConverterRegistry;
use crate::dims::Dims3;
use crate::error::MultirepError;
use crate::format::FormatId;
use crate::rep::{Representation, RepresentationKind};

/// Cache state of one representation entry. Absence from the container is
/// the third state of the machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryStatus {
    /// In sync with the authoritative representation.
    Valid,
    /// Out of sync; must be refreshed before use.
    Stale,
}

#[derive(Debug)]
struct Entry {
    rep: Representation,
    status: EntryStatus,
}

/// Owner of all representations of one logical volume.
#[derive(Debug)]
pub struct VolumeContainer {
    format: FormatId,
    dims: Dims3,
    entries: BTreeMap<RepresentationKind, Entry>,
    authoritative: Option<RepresentationKind>,
}

impl VolumeContainer {
    /// An empty container with fixed format and initial geometry.
    pub fn new(format: FormatId, dims: Dims3) -> Self {
        Self {
            format,
            dims,
            entries: BTreeMap::new(),
            authoritative: None,
        }
    }

    pub fn format(&self) -> FormatId {
        self.format
    }

    pub fn dimensions(&self) -> Dims3 {
        self.dims
    }

    /// Kind of the entry holding the most recent direct write, if any.
    pub fn authoritative_kind(&self) -> Option<RepresentationKind> {
        self.authoritative
    }

    /// Cache status of a kind's entry, `None` if absent.
    pub fn status(&self, kind: RepresentationKind) -> Option<EntryStatus> {
        self.entries.get(&kind).map(|e| e.status)
    }

    /// Cached representation of a kind, regardless of staleness. Never
    /// converts.
    pub fn representation(&self, kind: RepresentationKind) -> Option<&Representation> {
        self.entries.get(&kind).map(|e| &e.rep)
    }

    /// Kinds currently materialized, in deterministic order.
    pub fn kinds(&self) -> impl Iterator<Item = RepresentationKind> + '_ {
        self.entries.keys().copied()
    }

    /// Inserts a representation directly. It becomes the authoritative
    /// entry; every other entry is marked stale. Replaces any existing
    /// entry of the same kind.
    pub fn add_representation(
        &mut self,
        rep: impl Into<Representation>,
    ) -> Result<(), MultirepError> {
        let rep = rep.into();
        if rep.format() != self.format {
            return Err(MultirepError::FormatMismatch {
                expected: self.format,
                actual: rep.format(),
            });
        }
        if rep.dimensions() != self.dims {
            return Err(MultirepError::GeometryMismatch {
                expected: self.dims,
                actual: rep.dimensions(),
            });
        }
        let kind = rep.kind();
        self.entries.insert(
            kind,
            Entry {
                rep,
                status: EntryStatus::Valid,
            },
        );
        self.authoritative = Some(kind);
        for (k, entry) in self.entries.iter_mut() {
            if *k != kind {
                entry.status = EntryStatus::Stale;
            }
        }
        Ok(())
    }

    /// Returns the representation of `kind`, converting if necessary.
    ///
    /// Valid entries are returned as-is (no converter runs). Stale entries
    /// are refreshed in place from the authoritative entry. Absent entries
    /// are created by resolving a conversion path and cached as valid
    /// derived copies; the authoritative marker does not move. On failure
    /// the container's entries are left exactly as they were.
    pub fn request_representation(
        &mut self,
        kind: RepresentationKind,
        registry: &ConverterRegistry,
    ) -> Result<&Representation, MultirepError> {
        match self.status(kind) {
            Some(EntryStatus::Valid) => {}
            Some(EntryStatus::Stale) => self.refresh(kind, registry)?,
            None => self.derive(kind, registry)?,
        }
        match self.entries.get(&kind) {
            Some(entry) => Ok(&entry.rep),
            None => Err(MultirepError::MissingRepresentation(kind)),
        }
    }

    /// Mutable access to an existing entry for a direct write. The entry
    /// becomes authoritative and valid; every sibling is marked stale.
    pub fn edit_representation(
        &mut self,
        kind: RepresentationKind,
    ) -> Result<&mut Representation, MultirepError> {
        if !self.entries.contains_key(&kind) {
            return Err(MultirepError::MissingRepresentation(kind));
        }
        self.authoritative = Some(kind);
        for (k, entry) in self.entries.iter_mut() {
            entry.status = if *k == kind {
                EntryStatus::Valid
            } else {
                EntryStatus::Stale
            };
        }
        match self.entries.get_mut(&kind) {
            Some(entry) => Ok(&mut entry.rep),
            None => Err(MultirepError::MissingRepresentation(kind)),
        }
    }

    /// Changes the container geometry. The authoritative entry is resized
    /// in place; every other entry becomes stale unconditionally, since
    /// its geometry now disagrees, and is re-derived on next request.
    pub fn resize(&mut self, dims: Dims3) {
        self.dims = dims;
        let authoritative = self.authoritative;
        for (kind, entry) in self.entries.iter_mut() {
            if Some(*kind) == authoritative {
                entry.rep.resize(dims);
            } else {
                entry.status = EntryStatus::Stale;
            }
        }
    }

    /// Removes and returns a kind's entry. Removing the authoritative
    /// entry leaves the container without one.
    pub fn remove_representation(&mut self, kind: RepresentationKind) -> Option<Representation> {
        let entry = self.entries.remove(&kind)?;
        if self.authoritative == Some(kind) {
            self.authoritative = None;
        }
        Some(entry.rep)
    }

    fn source_kind(&self) -> Result<RepresentationKind, MultirepError> {
        self.authoritative.ok_or(MultirepError::NoAuthoritative)
    }

    /// Re-runs conversion into the existing stale entry, without
    /// reallocating it. The entry is taken out of the map for the duration
    /// so the authoritative entry can be borrowed as the source; it is
    /// reinserted unchanged if conversion fails.
    fn refresh(
        &mut self,
        kind: RepresentationKind,
        registry: &ConverterRegistry,
    ) -> Result<(), MultirepError> {
        let source_kind = self.source_kind()?;
        if source_kind == kind {
            // the authoritative entry is the truth by definition
            if let Some(entry) = self.entries.get_mut(&kind) {
                entry.status = EntryStatus::Valid;
            }
            return Ok(());
        }
        let mut entry = match self.entries.remove(&kind) {
            Some(entry) => entry,
            None => return Err(MultirepError::MissingRepresentation(kind)),
        };
        let outcome = match self.entries.get(&source_kind) {
            Some(source) => registry
                .resolve(kind, &source.rep)
                .and_then(|resolution| resolution.update(&source.rep, &mut entry.rep)),
            None => Err(MultirepError::NoAuthoritative),
        };
        match outcome {
            Ok(()) => {
                entry.status = EntryStatus::Valid;
                self.entries.insert(kind, entry);
                Ok(())
            }
            Err(err) => {
                self.entries.insert(kind, entry);
                Err(err)
            }
        }
    }

    fn derive(
        &mut self,
        kind: RepresentationKind,
        registry: &ConverterRegistry,
    ) -> Result<(), MultirepError> {
        let source_kind = self.source_kind()?;
        let source = self
            .entries
            .get(&source_kind)
            .ok_or(MultirepError::NoAuthoritative)?;
        let resolution = registry.resolve(kind, &source.rep)?;
        let rep = resolution.create_from(&source.rep)?;
        self.entries.insert(
            kind,
            Entry {
                rep,
                status: EntryStatus::Valid,
            },
        );
        Ok(())
    }
}
