//! # rgbmap
//!
//! Color mapping for astronomical image display.
//!
//! Upstream stages cut and scale raw pixel data into integer indices; this
//! crate turns those indices into 8-bit RGB(A) display buffers through a
//! chain of lookup tables:
//!
//! ```text
//! index -> distribution (hash) -> shift (contrast/brightness) -> color
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use rgbmap::{ChannelOrder, ColorMapper, HashAlgorithm, IndexArray};
//!
//! let mut mapper = ColorMapper::new();
//! mapper.set_hash_algorithm(HashAlgorithm::Logarithmic, false).unwrap();
//! mapper.scale_and_shift(1.5, 0.0, true).unwrap();
//!
//! let data: Vec<u32> = (0..64 * 64).map(|i| i * 16).collect();
//! let index = IndexArray::new(&data, 64, 64).unwrap();
//! let rgba = mapper
//!     .map_pixels(&index, ChannelOrder::RGBA, ChannelOrder::RGB)
//!     .unwrap();
//! assert_eq!(rgba.shape(), (64, 64, 4));
//! ```
//!
//! # Modules
//!
//! - [`mapper`] - [`ColorMapper`], configuration and bulk mapping
//! - [`strategy`] - Lookup-table and pass-through kernels
//! - [`settings`] - YAML settings files
//! - [`callback`] - Change notification
//! - [`profile`] - Device profile correction (`icc` feature)
//!
//! # Feature Flags
//!
//! - `icc` - `IccProfileCorrection`, monitor profile conversion via Little CMS

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod callback;
pub mod mapper;
pub mod profile;
pub mod settings;
pub mod strategy;

pub use callback::{CallbackId, Callbacks};
pub use mapper::ColorMapper;
pub use profile::ProfileCorrection;
pub use settings::{MapperSettings, SettingsError, SettingsResult};
pub use strategy::MappingStrategy;

#[cfg(feature = "icc")]
pub use profile::{IccProfileCorrection, RenderingIntent};

pub use rgbmap_core::{
    Channel, ChannelOrder, ChannelSlice, Error, IndexArray, PixelPlanes, Result, MAX_CHANNELS,
};
pub use rgbmap_lut::{
    ColorArray, ColorTable, DistributionTable, HashAlgorithm, IntensityTable, ShiftTable,
    DEFAULT_EXPONENT, DEFAULT_HASH_SIZE, MAX_HASH_SIZE, MIN_HASH_SIZE, MIN_SCALE, TABLE_SIZE,
};
