//! End-to-end mapping tests for rgbmap.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use rgbmap::{
    ChannelOrder, ColorMapper, ColorTable, Error, HashAlgorithm, IndexArray, IntensityTable,
    MapperSettings, PixelPlanes, SettingsError, ShiftTable, MAX_HASH_SIZE,
};

fn black_white() -> ColorTable {
    ColorTable::new("bw", vec![[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]]).unwrap()
}

fn orders() -> Vec<ChannelOrder> {
    ["RGB", "BGR", "RGBA", "BGRA", "ARGB", "abgr"]
        .iter()
        .map(|s| s.parse().unwrap())
        .collect()
}

/// Asserts every pixel is `rgb` with opaque alpha where present.
fn assert_solid(out: &PixelPlanes, rgb: [u8; 3]) {
    let order = out.order();
    for (name, value) in ['r', 'g', 'b'].into_iter().zip(rgb) {
        let slice = out.slice(name).unwrap();
        assert!(slice.iter().all(|v| v == value), "{order}: channel {name} != {value}");
    }
    if out.has_alpha() {
        assert!(out.slice('A').unwrap().iter().all(|v| v == 255), "{order}: alpha not opaque");
    }
}

#[test]
fn test_distribution_tables_are_valid() {
    for alg in HashAlgorithm::ALL {
        let mut mapper = ColorMapper::new();
        mapper.set_hash_algorithm(alg, false).unwrap();
        for size in [256, 300, 1024, 4099, 65536, 200_000, MAX_HASH_SIZE] {
            mapper.set_hash_size(size, false).unwrap();
            let table = mapper.hash_table();
            assert_eq!(table.len(), size, "{alg} {size}");
            assert!(table.windows(2).all(|w| w[0] <= w[1]), "{alg} {size} not monotonic");
        }
    }
}

#[test]
fn test_shift_table_length_and_reset() {
    let mut mapper = ColorMapper::new();
    mapper.scale_and_shift(3.0, -0.2, false).unwrap();
    assert_eq!(mapper.shift_table().as_slice().len(), 256);
    mapper.shift(0.7, true, false).unwrap();
    assert_eq!(mapper.shift_table().as_slice().len(), 256);
    mapper.scale_and_shift(0.2, 0.4, false).unwrap();
    assert_eq!(mapper.shift_table().as_slice().len(), 256);

    mapper.reset_shift_table(false);
    let identity: Vec<u8> = (0..=255).collect();
    assert_eq!(mapper.shift_table().as_slice(), identity.as_slice());
}

#[test]
fn test_zero_shift_is_noop() {
    for scale in [0.3, 1.0, 2.5, 40.0] {
        let plain = ShiftTable::scale_and_shift(scale, 0.0).unwrap();
        let mut shifted = plain.clone();
        shifted.shift(0.0, false).unwrap();
        assert_eq!(shifted, plain, "scale {scale}");
    }
}

#[test]
fn test_unit_scale_is_identity() {
    let mut mapper = ColorMapper::new();
    mapper.shift(0.3, false, false).unwrap();
    mapper.scale_and_shift(1.0, 0.0, false).unwrap();
    assert!(mapper.shift_table().is_identity());
}

#[test]
fn test_black_white_round_trip() {
    for alg in HashAlgorithm::ALL {
        let mut mapper = ColorMapper::new();
        mapper.set_color_table(black_white(), false);
        mapper.set_intensity_table(IntensityTable::ramp(), false);
        mapper.set_hash_algorithm(alg, true).unwrap();
        let last = (mapper.hash_size() - 1) as u32;

        let zeros = vec![0u32; 6 * 5];
        let tops = vec![last; 6 * 5];
        for order in orders() {
            let out = mapper
                .map_pixels(&IndexArray::new(&zeros, 6, 5).unwrap(), order, ChannelOrder::RGB)
                .unwrap();
            assert_eq!(out.shape(), (6, 5, order.len()));
            assert_solid(&out, [0, 0, 0]);

            let out = mapper
                .map_pixels(&IndexArray::new(&tops, 6, 5).unwrap(), order, ChannelOrder::RGB)
                .unwrap();
            assert_solid(&out, [255, 255, 255]);
        }
    }
}

#[test]
fn test_out_of_range_indices_clamp() {
    let mut mapper = ColorMapper::new();
    mapper.set_color_table(black_white(), false);
    let data = [u32::MAX, 70_000];
    let out = mapper
        .map_pixels(&IndexArray::new(&data, 1, 2).unwrap(), ChannelOrder::RGB, ChannelOrder::RGB)
        .unwrap();
    assert_eq!(out.as_bytes(), &[255; 6]);
}

#[test]
fn test_rgba_bgra_swap() {
    let mut mapper = ColorMapper::new();
    let colors = (0..256)
        .map(|i| {
            let t = i as f32 / 255.0;
            [t, 1.0 - t, (t * 0.5).min(1.0)]
        })
        .collect();
    mapper.set_color_table(ColorTable::new("ramp3", colors).unwrap(), false);
    mapper.set_hash_algorithm(HashAlgorithm::Logarithmic, false).unwrap();
    mapper.scale_and_shift(1.7, 0.1, true).unwrap();

    let data: Vec<u32> = (0..32 * 17).map(|i| (i * 131) % 65536).collect();
    let index = IndexArray::new(&data, 32, 17).unwrap();
    let rgba = mapper.map_pixels(&index, ChannelOrder::RGBA, ChannelOrder::RGB).unwrap();
    let bgra = mapper.map_pixels(&index, ChannelOrder::BGRA, ChannelOrder::RGB).unwrap();

    let mut swapped = bgra.as_bytes().to_vec();
    for px in swapped.chunks_exact_mut(4) {
        px.swap(0, 2);
    }
    assert_eq!(rgba.as_bytes(), swapped.as_slice());
    assert_eq!(bgra.to_order(ChannelOrder::RGBA).unwrap(), rgba);
}

#[test]
fn test_rejected_hash_size_keeps_table() {
    let mut mapper = ColorMapper::new();
    mapper.set_hash_algorithm(HashAlgorithm::Exponential, false).unwrap();
    mapper.set_hash_size(2048, false).unwrap();
    let before = mapper.hash_table().to_vec();

    let err = mapper.set_hash_size(100, true).unwrap_err();
    assert!(err.is_configuration());
    assert_eq!(mapper.hash_size(), 2048);
    assert_eq!(mapper.hash_table(), before.as_slice());
}

#[test]
fn test_linear_1024_blocks() {
    let mut mapper = ColorMapper::new();
    mapper.set_hash_size(1024, false).unwrap();
    assert_eq!(mapper.hash_table()[512], 128);

    let data = [512u32];
    let out = mapper
        .map_pixels(&IndexArray::new(&data, 1, 1).unwrap(), ChannelOrder::RGB, ChannelOrder::RGB)
        .unwrap();
    assert_eq!(out.as_bytes(), &[128, 128, 128]);
}

#[test]
fn test_map_into_reuses_buffer() {
    let mapper = ColorMapper::new();
    let data = vec![0u32; 8];
    let index = IndexArray::new(&data, 2, 4).unwrap();
    let mut out = PixelPlanes::from_vec(vec![9; 2 * 4 * 4], 2, 4, ChannelOrder::ARGB).unwrap();
    mapper.map_pixels_into(&index, &mut out, ChannelOrder::RGB).unwrap();
    assert!(out.as_bytes().chunks_exact(4).all(|px| px == [255, 0, 0, 0]));

    let mut wrong = PixelPlanes::new(4, 2, ChannelOrder::RGB).unwrap();
    assert!(matches!(
        mapper.map_pixels_into(&index, &mut wrong, ChannelOrder::RGB),
        Err(Error::ShapeMismatch { .. })
    ));
}

#[test]
fn test_bad_channel_order() {
    assert!("RGBX".parse::<ChannelOrder>().unwrap_err().is_configuration());
    assert!(ChannelOrder::parse("RRG").is_err());

    let mapper = ColorMapper::new();
    let data = [0u32];
    let index = IndexArray::new(&data, 1, 1).unwrap();
    let alpha_only = ChannelOrder::parse("A").unwrap();
    assert!(mapper.map_pixels(&index, alpha_only, ChannelOrder::RGB).is_err());
}

#[test]
fn test_multichannel_source() {
    let mut mapper = ColorMapper::new();
    mapper.set_hash_size(256, false).unwrap();
    // ARGB source, BGR output
    let data = [7u32, 10, 20, 30, 7, 40, 50, 60];
    let index = IndexArray::with_channels(&data, 1, 2, 4).unwrap();
    let out = mapper.map_pixels(&index, ChannelOrder::BGR, ChannelOrder::ARGB).unwrap();
    assert_eq!(out.as_bytes(), &[30, 20, 10, 60, 50, 40]);
}

#[test]
fn test_pass_through() {
    let mapper = ColorMapper::pass_through();
    let data = [0u32, 128, 255, 4000];
    let index = IndexArray::new(&data, 2, 2).unwrap();
    let out = mapper.map_pixels(&index, ChannelOrder::RGBA, ChannelOrder::RGB).unwrap();
    assert_eq!(
        out.as_bytes(),
        &[0, 0, 0, 255, 128, 128, 128, 255, 255, 255, 255, 255, 255, 255, 255, 255]
    );

    let rgb = [1u32, 2, 3];
    let index = IndexArray::with_channels(&rgb, 1, 1, 3).unwrap();
    let out = mapper.map_pixels(&index, ChannelOrder::BGR, ChannelOrder::RGB).unwrap();
    assert_eq!(out.as_bytes(), &[3, 2, 1]);
}

#[test]
fn test_pass_through_ignores_color_tables() {
    let mut mapper = ColorMapper::pass_through();
    mapper.set_color_table(black_white(), false);
    let data = [100u32];
    let index = IndexArray::new(&data, 1, 1).unwrap();
    let out = mapper.map_pixels(&index, ChannelOrder::RGB, ChannelOrder::RGB).unwrap();
    assert_eq!(out.as_bytes(), &[100, 100, 100]);
}

#[test]
fn test_batched_notifications() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let mut mapper = ColorMapper::new();
    for tag in ["first", "second"] {
        let events = Arc::clone(&events);
        mapper.on_changed(move |m| {
            events.lock().unwrap().push((tag, m.hash_size(), m.color_table().name().to_string()));
        });
    }

    mapper.set_color_table(black_white(), false);
    mapper.set_intensity_table(IntensityTable::ramp(), false);
    mapper.set_hash_size(4096, true).unwrap();

    let events = events.lock().unwrap();
    assert_eq!(
        *events,
        vec![("first", 4096, "bw".to_string()), ("second", 4096, "bw".to_string())]
    );
}

#[test]
fn test_listener_may_query_tables() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut mapper = ColorMapper::new();
    let c = Arc::clone(&calls);
    mapper.on_changed(move |m| {
        assert_eq!(m.get_rgb_value(0).unwrap(), m.active_colors().rgb(m.shift_table().get(0)));
        c.fetch_add(1, Ordering::SeqCst);
    });
    mapper.scale_and_shift(2.0, 0.3, true).unwrap();
    mapper.shift(-0.1, false, true).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_settings_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mapper.yaml");
    std::fs::write(
        &path,
        "color_algorithm: exponential\ncolor_hashsize: 8192\nexponent: 3.0\ncolor_table:\n  - [0, 0, 0]\n  - [1, 1, 1]\n",
    )
    .unwrap();

    let settings = MapperSettings::from_file(&path).unwrap();
    let mapper = ColorMapper::from_settings(&settings).unwrap();
    assert_eq!(mapper.hash_algorithm(), HashAlgorithm::Exponential);
    assert_eq!(mapper.hash_size(), 8192);
    assert_eq!(mapper.exponent(), 3.0);
    assert_eq!(mapper.get_rgb_value(0).unwrap(), [0, 0, 0]);
    assert_eq!(mapper.get_rgb_value(255).unwrap(), [255, 255, 255]);

    let saved = dir.path().join("saved.yaml");
    mapper.settings().save(&saved).unwrap();
    let reloaded = ColorMapper::from_settings(&MapperSettings::from_file(&saved).unwrap()).unwrap();
    assert_eq!(reloaded.hash_table(), mapper.hash_table());
    assert_eq!(reloaded.active_colors(), mapper.active_colors());

    assert!(matches!(
        MapperSettings::from_file(dir.path().join("missing.yaml")),
        Err(SettingsError::NotFound { .. })
    ));
}

#[test]
fn test_apply_settings_notifies_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut mapper = ColorMapper::new();
    let c = Arc::clone(&calls);
    mapper.on_changed(move |_| {
        c.fetch_add(1, Ordering::SeqCst);
    });
    let settings = MapperSettings {
        color_algorithm: "logarithmic".into(),
        color_hashsize: 1024,
        color_table: Some(vec![[1.0, 0.0, 0.0]]),
        ..Default::default()
    };
    mapper.apply_settings(&settings, true).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(mapper.get_rgb_value(10).unwrap(), [255, 0, 0]);
}
