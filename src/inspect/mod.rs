//! Volume inspection: descriptor summary and raw size verification.

pub mod report;

pub use report::{DataSection, FormatSection, InspectReport};

use std::fs;
use std::path::Path;

use crate::error::MultirepError;
use crate::io::raw;

/// Inspects an on-disk volume without loading its data.
///
/// Reads the descriptor, derives the expected raw size, and compares it
/// against the data file's actual size. A missing or mis-sized data file
/// is reported, not an error; callers decide how strict to be.
pub fn inspect_volume(descriptor_path: &Path) -> Result<InspectReport, MultirepError> {
    let desc = raw::read_descriptor(descriptor_path)?;
    let data_path = desc.data_path(descriptor_path);
    let descriptor = desc.format.descriptor();

    let actual_bytes = fs::metadata(&data_path).ok().map(|m| m.len() as usize);

    Ok(InspectReport {
        descriptor_path: descriptor_path.to_path_buf(),
        data_path,
        format: FormatSection {
            id: desc.format,
            name: descriptor.name,
            components: descriptor.components,
            bits_allocated: descriptor.bits_allocated,
            bits_stored: descriptor.bits_stored,
            bytes_per_element: descriptor.bytes_allocated(),
            min: descriptor.min,
            max: descriptor.max,
        },
        data: DataSection {
            dimensions: desc.dimensions,
            elements: desc.dimensions.num_elements(),
            byte_order: desc.byte_order,
            expected_bytes: desc.raw_size(),
            actual_bytes,
        },
    })
}
