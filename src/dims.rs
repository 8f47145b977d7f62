//! Three-dimensional extents for volume data.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MultirepError;

/// Grid dimensions of a volume (number of elements along each axis).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dims3 {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl Dims3 {
    pub fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }

    /// Total number of elements in the grid.
    pub fn num_elements(&self) -> usize {
        self.x as usize * self.y as usize * self.z as usize
    }

    /// Linear index of a position, x fastest, z slowest.
    pub fn index_of(&self, x: u32, y: u32, z: u32) -> usize {
        debug_assert!(x < self.x && y < self.y && z < self.z);
        x as usize + self.x as usize * (y as usize + self.y as usize * z as usize)
    }
}

impl fmt::Display for Dims3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.x, self.y, self.z)
    }
}

impl FromStr for Dims3 {
    type Err = MultirepError;

    /// Parses `XxYxZ`, e.g. `64x64x32`. All axes must be non-zero.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('x').collect();
        if parts.len() != 3 {
            return Err(MultirepError::InvalidDims(format!(
                "'{}' (expected XxYxZ)",
                s
            )));
        }
        let mut axes = [0u32; 3];
        for (axis, part) in axes.iter_mut().zip(&parts) {
            *axis = part
                .trim()
                .parse()
                .map_err(|_| MultirepError::InvalidDims(format!("'{}' (expected XxYxZ)", s)))?;
            if *axis == 0 {
                return Err(MultirepError::InvalidDims(format!(
                    "'{}' (axes must be non-zero)",
                    s
                )));
            }
        }
        Ok(Dims3::new(axes[0], axes[1], axes[2]))
    }
}
