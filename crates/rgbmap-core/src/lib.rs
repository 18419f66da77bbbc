//! # rgbmap-core
//!
//! Core types shared by the rgbmap crates.
//!
//! - [`Error`], [`Result`] - Error taxonomy for configuration, internal
//!   consistency and index failures
//! - [`Channel`], [`ChannelOrder`] - Named channel layouts (`"RGBA"`, `"BGRA"`, ...)
//! - [`IndexArray`] - Borrowed scalar or multi-channel index input
//! - [`PixelPlanes`] - Interleaved `u8` output addressed by channel name
//!
//! ## Crate Structure
//!
//! ```text
//! rgbmap-core (this crate)
//!    ^
//!    |
//!    +-- rgbmap-lut (color, intensity, distribution and shift tables)
//!    +-- rgbmap (ColorMapper)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod channel;
pub mod error;
pub mod index;
pub mod planes;

pub use channel::{Channel, ChannelOrder, MAX_CHANNELS};
pub use error::{Error, Result};
pub use index::IndexArray;
pub use planes::{ChannelSlice, PixelPlanes};
