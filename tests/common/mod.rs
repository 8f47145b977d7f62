use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use multirep::convert::Converter;
use multirep::dims::Dims3;
use multirep::error::MultirepError;
use multirep::format::FormatId;
use multirep::rep::{RamRepresentation, Representation, RepresentationKind};

/// An initialized RAM representation filled with a deterministic pattern.
pub fn patterned_ram(format: FormatId, dims: Dims3) -> RamRepresentation {
    let size = dims.num_elements() * format.bytes_allocated();
    let bytes: Vec<u8> = (0..size).map(|i| (i % 251) as u8).collect();
    RamRepresentation::with_data(format, dims, bytes).expect("pattern buffer matches geometry")
}

/// Wraps a converter and counts how many times it actually runs.
pub struct CountingConverter {
    inner: Box<dyn Converter>,
    calls: Arc<AtomicUsize>,
}

impl CountingConverter {
    pub fn new(inner: Box<dyn Converter>) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                inner,
                calls: calls.clone(),
            },
            calls,
        )
    }
}

impl Converter for CountingConverter {
    fn target_kind(&self) -> RepresentationKind {
        self.inner.target_kind()
    }

    fn can_convert_from(&self, source: &Representation) -> bool {
        self.inner.can_convert_from(source)
    }

    fn create_from(&self, source: &Representation) -> Result<Representation, MultirepError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.create_from(source)
    }

    fn update(
        &self,
        source: &Representation,
        destination: &mut Representation,
    ) -> Result<(), MultirepError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.update(source, destination)
    }
}
