//! Device profile correction.
//!
//! After multi-channel sources are mapped, their RGB triples can be run
//! through a working-space to monitor-profile conversion. The mapper only
//! sees the [`ProfileCorrection`] trait; an implementation backed by Little
//! CMS is available with the `icc` feature.

use rgbmap_core::Result;

/// Converts 8-bit RGB triples in place.
pub trait ProfileCorrection: Send + Sync {
    /// Converts `pixels` in place.
    fn convert(&self, pixels: &mut [[u8; 3]]) -> Result<()>;

    /// Short description for logs.
    fn name(&self) -> &str {
        "profile"
    }
}

#[cfg(feature = "icc")]
pub use icc::{IccProfileCorrection, RenderingIntent};

#[cfg(feature = "icc")]
mod icc {
    use std::path::Path;
    use std::sync::Mutex;

    use lcms2::{PixelFormat, Profile, Transform};
    use rgbmap_core::{Error, Result};
    use tracing::debug;

    use super::ProfileCorrection;

    /// ICC rendering intent.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub enum RenderingIntent {
        /// Perceptual mapping of out-of-gamut colors.
        #[default]
        Perceptual,
        /// In-gamut colors preserved relative to the white point.
        RelativeColorimetric,
        /// Saturation preserved.
        Saturation,
        /// In-gamut colors preserved exactly.
        AbsoluteColorimetric,
    }

    impl From<RenderingIntent> for lcms2::Intent {
        fn from(intent: RenderingIntent) -> Self {
            match intent {
                RenderingIntent::Perceptual => lcms2::Intent::Perceptual,
                RenderingIntent::RelativeColorimetric => lcms2::Intent::RelativeColorimetric,
                RenderingIntent::Saturation => lcms2::Intent::Saturation,
                RenderingIntent::AbsoluteColorimetric => lcms2::Intent::AbsoluteColorimetric,
            }
        }
    }

    /// Working-space to monitor conversion through Little CMS.
    ///
    /// A cached lcms2 transform is `Send` but not `Sync`, and
    /// [`ProfileCorrection`] must be both, so conversions are serialized
    /// through a lock. Each call converts a whole mapped buffer at once.
    pub struct IccProfileCorrection {
        name: String,
        transform: Mutex<Transform<[u8; 3], [u8; 3]>>,
    }

    impl IccProfileCorrection {
        /// Builds a conversion between two loaded profiles.
        pub fn new(working: &Profile, monitor: &Profile, intent: RenderingIntent) -> Result<Self> {
            let transform = Transform::new(
                working,
                PixelFormat::RGB_8,
                monitor,
                PixelFormat::RGB_8,
                intent.into(),
            )
            .map_err(|e| Error::Profile(e.to_string()))?;
            Ok(Self {
                name: format!("icc:{intent:?}"),
                transform: Mutex::new(transform),
            })
        }

        /// sRGB working space to the monitor profile at `monitor`.
        pub fn srgb_to_file(monitor: &Path, intent: RenderingIntent) -> Result<Self> {
            let monitor_profile = Profile::new_file(monitor)
                .map_err(|e| Error::Profile(format!("{}: {e}", monitor.display())))?;
            debug!(path = %monitor.display(), ?intent, "loaded monitor profile");
            let mut out = Self::new(&Profile::new_srgb(), &monitor_profile, intent)?;
            out.name = format!("icc:{}", monitor.display());
            Ok(out)
        }
    }

    impl std::fmt::Debug for IccProfileCorrection {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("IccProfileCorrection")
                .field("name", &self.name)
                .finish_non_exhaustive()
        }
    }

    impl ProfileCorrection for IccProfileCorrection {
        fn convert(&self, pixels: &mut [[u8; 3]]) -> Result<()> {
            let transform = self
                .transform
                .lock()
                .map_err(|_| Error::Profile("transform lock poisoned".into()))?;
            transform.transform_in_place(pixels);
            Ok(())
        }

        fn name(&self) -> &str {
            &self.name
        }
    }

}
