//! On-disk volume I/O: YAML descriptors plus raw data files.

pub mod raw;
