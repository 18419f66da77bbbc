//! The color mapper.
//!
//! [`ColorMapper`] owns every lookup stage between scaled indices and
//! display colors:
//!
//! ```text
//! index --hash--> band --shift--> band' --active colors--> RGB
//!                                        ^
//!            composite[c][intensity[i]] -+
//! ```
//!
//! Every mutation validates and generates its new tables first and commits
//! only on success, so a failed call leaves the mapper as it was. Mutations
//! take a `notify` flag; pass `false` on all but the last call of a batch to
//! get a single change notification.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, trace};

use rgbmap_core::{Channel, ChannelOrder, Error, IndexArray, PixelPlanes, Result};
use rgbmap_lut::{
    ColorArray, ColorTable, DistributionTable, HashAlgorithm, IntensityTable, ShiftTable,
    MAX_HASH_SIZE, MIN_HASH_SIZE, TABLE_SIZE,
};

use crate::callback::{CallbackId, Callbacks};
use crate::profile::ProfileCorrection;
use crate::strategy::{rgb_positions, Lookup, MappingStrategy};

/// Maps scaled pixel indices to 8-bit RGB(A).
///
/// # Example
///
/// ```rust
/// use rgbmap::{ChannelOrder, ColorMapper, ColorTable, IndexArray};
///
/// let mut mapper = ColorMapper::new();
/// let bw = ColorTable::new("bw", vec![[0.0; 3], [1.0; 3]]).unwrap();
/// mapper.set_color_table(bw, true);
/// mapper.set_hash_size(256, true).unwrap();
///
/// let data = [0u32, 255];
/// let index = IndexArray::new(&data, 1, 2).unwrap();
/// let out = mapper
///     .map_pixels(&index, ChannelOrder::RGB, ChannelOrder::RGB)
///     .unwrap();
/// assert_eq!(out.as_bytes(), &[0, 0, 0, 255, 255, 255]);
/// ```
pub struct ColorMapper {
    strategy: MappingStrategy,
    color_table: ColorTable,
    intensity_table: IntensityTable,
    composite: ColorArray,
    intensity_index: [u8; TABLE_SIZE],
    active: ColorArray,
    hash: DistributionTable,
    shift: ShiftTable,
    max_hash_size: usize,
    profile: Option<Arc<dyn ProfileCorrection>>,
    callbacks: Callbacks<ColorMapper>,
}

impl std::fmt::Debug for ColorMapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColorMapper")
            .field("strategy", &self.strategy)
            .field("color_table", &self.color_table.name())
            .field("intensity_table", &self.intensity_table.name())
            .field("hash_algorithm", &self.hash.algorithm())
            .field("hash_size", &self.hash.len())
            .field("exponent", &self.hash.exponent())
            .field("max_hash_size", &self.max_hash_size)
            .field("profile", &self.profile.as_ref().map(|p| p.name().to_string()))
            .field("callbacks", &self.callbacks)
            .finish()
    }
}

impl Default for ColorMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorMapper {
    fn with_parts(strategy: MappingStrategy, hash: DistributionTable, max_hash_size: usize) -> Self {
        let color_table = ColorTable::ramp();
        let intensity_table = IntensityTable::ramp();
        let composite = color_table.composite();
        let intensity_index = intensity_table.indexes();
        let active = composite.permute(&intensity_index);
        Self {
            strategy,
            color_table,
            intensity_table,
            composite,
            intensity_index,
            active,
            hash,
            shift: ShiftTable::identity(),
            max_hash_size,
            profile: None,
            callbacks: Callbacks::new(),
        }
    }

    /// Lookup-table mapper: ramp color and intensity tables, linear
    /// distribution of 65536 entries, exponent 10, identity shift.
    pub fn new() -> Self {
        Self::with_parts(
            MappingStrategy::LookupTable,
            DistributionTable::default(),
            MAX_HASH_SIZE,
        )
    }

    /// Mapper for 8-bit sources whose indices are already display values.
    ///
    /// The distribution is fixed at the 256-entry linear identity.
    pub fn pass_through() -> Self {
        Self::with_parts(MappingStrategy::PassThrough, DistributionTable::identity(), MIN_HASH_SIZE)
    }

    pub(crate) fn notify(&self, notify: bool) {
        if notify {
            trace!(listeners = self.callbacks.len(), "color map changed");
            self.callbacks.fire(self);
        }
    }

    fn rebuild_active(&mut self) {
        self.active = self.composite.permute(&self.intensity_index);
        self.shift.reset();
    }

    // --- queries ---

    /// Mapping strategy.
    pub fn strategy(&self) -> MappingStrategy {
        self.strategy
    }

    /// Current color table.
    pub fn color_table(&self) -> &ColorTable {
        &self.color_table
    }

    /// Current intensity table.
    pub fn intensity_table(&self) -> &IntensityTable {
        &self.intensity_table
    }

    /// 8-bit color table before the intensity permutation.
    pub fn composite_colors(&self) -> &ColorArray {
        &self.composite
    }

    /// 8-bit intensity index array.
    pub fn intensity_indexes(&self) -> &[u8; TABLE_SIZE] {
        &self.intensity_index
    }

    /// Colors looked up after the shift table.
    pub fn active_colors(&self) -> &ColorArray {
        &self.active
    }

    /// Distribution table entries.
    pub fn hash_table(&self) -> &[u8] {
        self.hash.as_slice()
    }

    /// Distribution table size.
    pub fn hash_size(&self) -> usize {
        self.hash.len()
    }

    /// Largest size [`set_hash_size`](Self::set_hash_size) accepts.
    pub fn max_hash_size(&self) -> usize {
        self.max_hash_size
    }

    /// Current distribution algorithm.
    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.hash.algorithm()
    }

    /// Names of the distribution algorithms this mapper accepts.
    pub fn hash_algorithms(&self) -> Vec<&'static str> {
        match self.strategy {
            MappingStrategy::LookupTable => HashAlgorithm::names().collect(),
            MappingStrategy::PassThrough => vec![HashAlgorithm::Linear.name()],
        }
    }

    /// Distribution exponent.
    pub fn exponent(&self) -> f64 {
        self.hash.exponent()
    }

    /// Current shift table.
    pub fn shift_table(&self) -> &ShiftTable {
        &self.shift
    }

    /// Installed profile correction, if any.
    pub fn profile_correction(&self) -> Option<&Arc<dyn ProfileCorrection>> {
        self.profile.as_ref()
    }

    /// RGB for band `index` after the shift table.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] if `index > 255`.
    pub fn get_rgb_value(&self, index: usize) -> Result<[u8; 3]> {
        let band = Self::band(index)?;
        Ok(self.active.rgb(self.shift.get(band)))
    }

    /// RGB for band `index`, ignoring the shift table.
    pub fn color_at(&self, index: usize) -> Result<[u8; 3]> {
        Ok(self.active.rgb(Self::band(index)?))
    }

    fn band(index: usize) -> Result<u8> {
        u8::try_from(index).map_err(|_| Error::IndexOutOfRange {
            index,
            max: TABLE_SIZE - 1,
        })
    }

    // --- color and intensity tables ---

    /// Installs a color table; resets the shift table.
    pub fn set_color_table(&mut self, table: ColorTable, notify: bool) {
        debug!(name = table.name(), entries = table.len(), "set color table");
        self.composite = table.composite();
        self.color_table = table;
        self.rebuild_active();
        self.notify(notify);
    }

    /// Installs an intensity table; resets the shift table.
    pub fn set_intensity_table(&mut self, table: IntensityTable, notify: bool) {
        debug!(name = table.name(), "set intensity table");
        self.intensity_index = table.indexes();
        self.intensity_table = table;
        self.rebuild_active();
        self.notify(notify);
    }

    /// Recomputes the active colors and resets the shift table.
    pub fn reset_color_map(&mut self, notify: bool) {
        self.rebuild_active();
        self.notify(notify);
    }

    // --- distribution ---

    fn check_algorithm(&self, algorithm: HashAlgorithm) -> Result<()> {
        if self.strategy == MappingStrategy::PassThrough && algorithm != HashAlgorithm::Linear {
            return Err(Error::InvalidParameter(format!(
                "pass-through mapping is fixed at linear, got {algorithm}"
            )));
        }
        Ok(())
    }

    fn check_size(&self, size: usize) -> Result<()> {
        if !(MIN_HASH_SIZE..=self.max_hash_size).contains(&size) {
            return Err(Error::InvalidHashSize {
                size,
                min: MIN_HASH_SIZE,
                max: self.max_hash_size,
            });
        }
        Ok(())
    }

    fn commit_hash(&mut self, hash: DistributionTable, notify: bool) {
        debug!(
            algorithm = %hash.algorithm(),
            size = hash.len(),
            exponent = hash.exponent(),
            "set distribution"
        );
        self.hash = hash;
        self.notify(notify);
    }

    /// Changes the distribution table size.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidHashSize`] outside `256..=max_hash_size`; the table
    /// is left unchanged.
    pub fn set_hash_size(&mut self, size: usize, notify: bool) -> Result<()> {
        self.check_size(size)?;
        let hash = DistributionTable::generate(self.hash.algorithm(), size, self.hash.exponent())?;
        self.commit_hash(hash, notify);
        Ok(())
    }

    /// Changes the distribution algorithm.
    pub fn set_hash_algorithm(&mut self, algorithm: HashAlgorithm, notify: bool) -> Result<()> {
        self.check_algorithm(algorithm)?;
        let hash = DistributionTable::generate(algorithm, self.hash.len(), self.hash.exponent())?;
        self.commit_hash(hash, notify);
        Ok(())
    }

    /// Changes the distribution algorithm by name (case-insensitive).
    ///
    /// # Errors
    ///
    /// [`Error::UnknownAlgorithm`] for a name outside
    /// [`hash_algorithms`](Self::hash_algorithms).
    pub fn set_hash_algorithm_by_name(&mut self, name: &str, notify: bool) -> Result<()> {
        self.set_hash_algorithm(name.parse()?, notify)
    }

    /// Changes the distribution exponent.
    pub fn set_exponent(&mut self, exponent: f64, notify: bool) -> Result<()> {
        let hash = DistributionTable::generate(self.hash.algorithm(), self.hash.len(), exponent)?;
        self.commit_hash(hash, notify);
        Ok(())
    }

    /// Changes algorithm, size and exponent together.
    pub fn set_distribution(
        &mut self,
        algorithm: HashAlgorithm,
        size: usize,
        exponent: f64,
        notify: bool,
    ) -> Result<()> {
        self.check_algorithm(algorithm)?;
        self.check_size(size)?;
        let hash = DistributionTable::generate(algorithm, size, exponent)?;
        self.commit_hash(hash, notify);
        Ok(())
    }

    /// Installs a pre-generated table together with a new size cap.
    pub(crate) fn replace_distribution(
        &mut self,
        hash: DistributionTable,
        max_hash_size: usize,
        notify: bool,
    ) -> Result<()> {
        let limit = self.hash_size_limit();
        if !(MIN_HASH_SIZE..=limit).contains(&max_hash_size) {
            return Err(Error::InvalidHashSize {
                size: max_hash_size,
                min: MIN_HASH_SIZE,
                max: limit,
            });
        }
        if hash.len() > max_hash_size {
            return Err(Error::InvalidHashSize {
                size: hash.len(),
                min: MIN_HASH_SIZE,
                max: max_hash_size,
            });
        }
        self.check_algorithm(hash.algorithm())?;
        self.max_hash_size = max_hash_size;
        self.commit_hash(hash, notify);
        Ok(())
    }

    /// Upper bound for the size cap: 256 for pass-through mappers.
    pub(crate) fn hash_size_limit(&self) -> usize {
        match self.strategy {
            MappingStrategy::LookupTable => MAX_HASH_SIZE,
            MappingStrategy::PassThrough => MIN_HASH_SIZE,
        }
    }

    // --- shift table ---

    /// Shifts the current curve by `fraction` of its length.
    ///
    /// Without `rotate`, vacated entries keep the edge value.
    pub fn shift(&mut self, fraction: f64, rotate: bool, notify: bool) -> Result<()> {
        let mut shifted = self.shift.clone();
        shifted.shift(fraction, rotate)?;
        trace!(fraction, rotate, "shift color map");
        self.shift = shifted;
        self.notify(notify);
        Ok(())
    }

    /// Replaces the shift table with a ds9-style contrast/brightness curve.
    pub fn scale_and_shift(&mut self, scale: f64, shift: f64, notify: bool) -> Result<()> {
        let curve = ShiftTable::scale_and_shift(scale, shift)?;
        trace!(scale, shift, "scale and shift color map");
        self.shift = curve;
        self.notify(notify);
        Ok(())
    }

    /// Replaces the shift table with caller-supplied values.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidTable`] unless `values` has 256 entries.
    pub fn set_shift_table(&mut self, values: &[u8], notify: bool) -> Result<()> {
        self.shift = ShiftTable::from_slice(values)?;
        self.notify(notify);
        Ok(())
    }

    /// Resets the shift table to identity.
    pub fn reset_shift_table(&mut self, notify: bool) {
        self.shift.reset();
        self.notify(notify);
    }

    // --- configuration ---

    /// Installs or removes device profile correction for multi-channel sources.
    pub fn set_profile_correction(&mut self, profile: Option<Arc<dyn ProfileCorrection>>) {
        debug!(
            profile = profile.as_ref().map(|p| p.name()).unwrap_or("none"),
            "set profile correction"
        );
        self.profile = profile;
    }

    /// Copies color table, intensity table and distribution algorithm
    /// onto `other`, which is notified once.
    ///
    /// The size and exponent of `other` are kept.
    pub fn copy_configuration(&self, other: &mut ColorMapper) -> Result<()> {
        other.set_hash_algorithm(self.hash.algorithm(), false)?;
        other.set_color_table(self.color_table.clone(), false);
        other.set_intensity_table(self.intensity_table.clone(), false);
        other.notify(true);
        Ok(())
    }

    /// Registers a change listener.
    pub fn on_changed(&mut self, listener: impl Fn(&ColorMapper) + Send + Sync + 'static) -> CallbackId {
        self.callbacks.add(listener)
    }

    /// Unregisters a change listener.
    pub fn remove_callback(&mut self, id: CallbackId) -> bool {
        self.callbacks.remove(id)
    }

    // --- mapping ---

    /// Maps `index` into a new buffer laid out as `order`.
    ///
    /// `source_order` names the channels of a multi-channel index array and
    /// is ignored for scalar input. Alpha, if present, is filled with 255.
    ///
    /// # Errors
    ///
    /// Configuration errors if `order` lacks R, G or B, or `source_order`
    /// does not describe the index channels.
    pub fn map_pixels(
        &self,
        index: &IndexArray<'_>,
        order: ChannelOrder,
        source_order: ChannelOrder,
    ) -> Result<PixelPlanes> {
        let mut out = PixelPlanes::new(index.rows(), index.cols(), order)?;
        self.map_pixels_into(index, &mut out, source_order)?;
        Ok(out)
    }

    /// Maps `index` into an existing buffer.
    ///
    /// # Errors
    ///
    /// [`Error::ShapeMismatch`] if `out` is not `index.rows() x index.cols()`,
    /// plus the errors of [`map_pixels`](Self::map_pixels).
    pub fn map_pixels_into(
        &self,
        index: &IndexArray<'_>,
        out: &mut PixelPlanes,
        source_order: ChannelOrder,
    ) -> Result<()> {
        if out.size() != (index.rows(), index.cols()) {
            return Err(Error::ShapeMismatch {
                expected: (index.rows(), index.cols(), out.depth()),
                got: out.shape(),
            });
        }
        let start = Instant::now();

        let tables = Lookup {
            hash: self.hash.as_slice(),
            shift: &self.shift,
            colors: &self.active,
        };
        self.strategy.fill(&tables, index, out, source_order)?;

        if out.has_alpha() {
            out.fill_channel(Channel::A, u8::MAX)?;
        }

        if index.is_multichannel() && self.strategy == MappingStrategy::LookupTable {
            if let Some(profile) = &self.profile {
                apply_profile(profile.as_ref(), out)?;
            }
        }

        debug!(
            rows = index.rows(),
            cols = index.cols(),
            channels = index.channels(),
            order = %out.order(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "map pixels"
        );
        Ok(())
    }
}

fn apply_profile(profile: &dyn ProfileCorrection, out: &mut PixelPlanes) -> Result<()> {
    let pos = rgb_positions(out.order(), "output")?;
    let depth = out.depth();
    let mut rgb: Vec<[u8; 3]> = out
        .as_bytes()
        .chunks_exact(depth)
        .map(|px| [px[pos[0]], px[pos[1]], px[pos[2]]])
        .collect();
    profile.convert(&mut rgb)?;
    for (px, v) in out.as_bytes_mut().chunks_exact_mut(depth).zip(&rgb) {
        for c in 0..3 {
            px[pos[c]] = v[c];
        }
    }
    trace!(profile = profile.name(), pixels = rgb.len(), "applied profile correction");
    Ok(())
}
