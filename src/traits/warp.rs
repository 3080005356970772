//! Volume warping and augmentation-driver traits.

use numr::runtime::Runtime;
use numr::tensor::Tensor;

use crate::error::DeformResult;
use crate::params::DeformParams;
use crate::progress::StageObserver;
use crate::traits::deform::ResampleOrder;
use crate::volume::Volume;

/// Algorithmic contract for applying deformation fields to volumes.
///
/// All backends implementing these operations MUST use the EXACT SAME
/// ALGORITHMS to ensure numerical parity.
pub trait VolumeWarpAlgorithms<R: Runtime> {
    /// Resample one volume through a deformation field, writing into
    /// `target` in place.
    ///
    /// The interpolation order and out-of-bounds fill value are selected by
    /// the volume's kind: continuous volumes use linear interpolation and
    /// fill with `0`; label volumes use nearest-neighbor and fill with the
    /// maximum representable value of their element type. 64-bit label
    /// volumes are resampled through the 32-bit downcast sub-procedure and
    /// must not hold values above `u32::MAX`.
    ///
    /// An output voxel whose sampling coordinate falls outside
    /// `[0, shape[d] - 1]` on any axis is set to the fill value exactly.
    ///
    /// # Arguments
    ///
    /// * `source` - Volume to read from
    /// * `field` - Sampling map of shape `[dims, ...shape]` holding
    ///   absolute source coordinates per output voxel
    /// * `target` - Volume written in place; must match the source's shape
    ///   and element type
    fn warp_volume(
        &self,
        source: &Volume,
        field: &Tensor<R>,
        target: &mut Volume,
    ) -> DeformResult<()>;

    /// Resample one volume with an explicit interpolation order and fill
    /// value, bypassing kind-based selection.
    ///
    /// Supports orders 0 (nearest) and 1 (linear). Linear resampling of
    /// u64 volumes is rejected: their values cannot round-trip through the
    /// f64 accumulator.
    fn warp_volume_with(
        &self,
        source: &Volume,
        field: &Tensor<R>,
        order: ResampleOrder,
        fill: f64,
        target: &mut Volume,
    ) -> DeformResult<()>;

    /// Augment a batch of volumes with one shared transformation.
    ///
    /// Validates that sources and targets are non-empty, equally long, and
    /// all of one shape, builds a single deformation field from `params`,
    /// and warps each (source, target) pair in input order, writing into
    /// the targets in place. Reusing one transformation guarantees that an
    /// image and its label mask deform identically.
    ///
    /// Pairs are processed sequentially; a failure on pair `k` (e.g. a
    /// label-range overflow) leaves targets `0..k` already written.
    ///
    /// # Errors
    ///
    /// * Configuration error for an empty batch or length mismatch
    /// * Shape mismatch before any transformation is built
    /// * Element-type mismatch between a source and its target
    fn augment_volumes(
        &self,
        sources: &[Volume],
        targets: &mut [Volume],
        params: &DeformParams,
        seed: Option<u64>,
    ) -> DeformResult<()>;

    /// Same as [`augment_volumes`](Self::augment_volumes), reporting each
    /// pipeline stage to `observer`.
    fn augment_volumes_observed(
        &self,
        sources: &[Volume],
        targets: &mut [Volume],
        params: &DeformParams,
        seed: Option<u64>,
        observer: &mut dyn StageObserver,
    ) -> DeformResult<()>;
}
