//! Property tests for raw volume I/O and element codecs.

use proptest::prelude::*;

use multirep::dims::Dims3;
use multirep::format::{FormatId, ScalarKind};
use multirep::io::raw::{self, ByteOrder, VolumeDescriptor};
use multirep::rep::RamRepresentation;

fn arb_dims() -> impl Strategy<Value = Dims3> {
    (1u32..=6, 1u32..=6, 1u32..=4).prop_map(|(x, y, z)| Dims3::new(x, y, z))
}

fn arb_format() -> impl Strategy<Value = FormatId> {
    prop_oneof![
        Just(FormatId::UInt8),
        Just(FormatId::UInt16),
        Just(FormatId::Int16),
        Just(FormatId::UInt32),
        Just(FormatId::Float32),
        Just(FormatId::Float64),
        Just(FormatId::Vec2UInt16),
        Just(FormatId::Vec3UInt8),
        Just(FormatId::Vec4Float32),
    ]
}

fn arb_order() -> impl Strategy<Value = ByteOrder> {
    prop_oneof![Just(ByteOrder::Little), Just(ByteOrder::Big)]
}

proptest! {
    #[test]
    fn write_read_round_trips_any_buffer(
        dims in arb_dims(),
        format in arb_format(),
        order in arb_order(),
        seed in any::<u64>(),
    ) {
        let size = dims.num_elements() * format.bytes_allocated();
        let bytes: Vec<u8> = (0..size)
            .map(|i| (seed.wrapping_mul(i as u64 + 1).wrapping_add(i as u64)) as u8)
            .collect();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("v.yaml");
        let desc = VolumeDescriptor {
            data: "v.raw".to_string(),
            dimensions: dims,
            format,
            byte_order: order,
        };
        raw::write_volume(&path, &desc, &bytes).unwrap();
        let reloaded = raw::read_volume(&path, &raw::read_descriptor(&path).unwrap()).unwrap();
        prop_assert_eq!(reloaded, bytes);
    }

    #[test]
    fn double_swap_is_identity(
        format in arb_format(),
        bytes in proptest::collection::vec(any::<u8>(), 0..256),
    ) {
        // truncate to whole scalars so chunks_exact covers everything
        let width = format.scalar_kind().map(|k| k.bytes()).unwrap_or(1);
        let mut buf = bytes;
        buf.truncate(buf.len() / width * width);
        let original = buf.clone();
        raw::swap_to_host(&mut buf, format);
        raw::swap_to_host(&mut buf, format);
        prop_assert_eq!(buf, original);
    }

    #[test]
    fn rescale_output_has_target_size(
        src in arb_dims(),
        dst in arb_dims(),
        element_bytes in 1usize..=8,
    ) {
        let bytes = vec![0xabu8; src.num_elements() * element_bytes];
        let out = raw::rescale_nearest(&bytes, src, dst, element_bytes);
        prop_assert_eq!(out.len(), dst.num_elements() * element_bytes);
    }

    #[test]
    fn normalized_write_then_read_is_close(
        format in arb_format(),
        value in 0.0f64..=1.0,
    ) {
        let mut rep = RamRepresentation::new(format, Dims3::new(1, 1, 1));
        rep.initialize();
        rep.set_scalar(0, 0, 0, value);
        let got = rep.scalar(0, 0, 0);
        // quantization error is bounded by one step of the storage width
        let kind = format.scalar_kind().unwrap();
        let tolerance = match kind {
            ScalarKind::Float16 => 5e-4,
            ScalarKind::Float32 | ScalarKind::Float64 => 1e-6,
            _ => 1.0 / (kind.max() - kind.min()),
        };
        prop_assert!((got - value).abs() <= tolerance, "{} -> {}", value, got);
    }
}
