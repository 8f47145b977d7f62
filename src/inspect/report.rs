//! Inspect report types and terminal formatting.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::dims::Dims3;
use crate::format::FormatId;
use crate::io::raw::ByteOrder;

/// The result of inspecting an on-disk volume.
#[derive(Clone, Debug, Serialize)]
pub struct InspectReport {
    pub descriptor_path: PathBuf,
    pub data_path: PathBuf,
    pub format: FormatSection,
    pub data: DataSection,
}

/// Element format details.
#[derive(Clone, Debug, Serialize)]
pub struct FormatSection {
    pub id: FormatId,
    pub name: &'static str,
    pub components: u32,
    pub bits_allocated: u32,
    pub bits_stored: u32,
    pub bytes_per_element: usize,
    pub min: f64,
    pub max: f64,
}

/// Geometry and raw file details.
#[derive(Clone, Debug, Serialize)]
pub struct DataSection {
    pub dimensions: Dims3,
    pub elements: usize,
    pub byte_order: ByteOrder,
    pub expected_bytes: usize,
    /// Size of the raw file on disk, `None` if it is missing.
    pub actual_bytes: Option<usize>,
}

impl InspectReport {
    /// Whether the raw file exists and matches the descriptor geometry.
    pub fn size_matches(&self) -> bool {
        self.data.actual_bytes == Some(self.data.expected_bytes)
    }
}

impl fmt::Display for InspectReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Volume: {}", self.descriptor_path.display())?;
        writeln!(f, "  data file:   {}", self.data_path.display())?;
        writeln!(f)?;
        writeln!(f, "Format: {}", self.format.name)?;
        writeln!(f, "  components:  {}", self.format.components)?;
        writeln!(
            f,
            "  bits:        {} stored / {} allocated",
            self.format.bits_stored, self.format.bits_allocated
        )?;
        writeln!(f, "  range:       [{}, {}]", self.format.min, self.format.max)?;
        writeln!(f)?;
        writeln!(f, "Data:")?;
        writeln!(f, "  dimensions:  {}", self.data.dimensions)?;
        writeln!(f, "  elements:    {}", self.data.elements)?;
        writeln!(f, "  byte order:  {:?}", self.data.byte_order)?;
        writeln!(f, "  expected:    {} bytes", self.data.expected_bytes)?;
        match self.data.actual_bytes {
            Some(actual) if actual == self.data.expected_bytes => {
                writeln!(f, "  on disk:     {} bytes (ok)", actual)?;
            }
            Some(actual) => {
                writeln!(f, "  on disk:     {} bytes (MISMATCH)", actual)?;
            }
            None => {
                writeln!(f, "  on disk:     missing")?;
            }
        }
        Ok(())
    }
}
