//! Deformation field algorithm traits.
//!
//! Provides the construction pipeline for dense per-voxel displacement
//! fields: identity coordinate grids, elastic control-point jitter, rigid
//! corner rotation, lattice upscaling, and their composition into a single
//! sampling map.

use numr::runtime::Runtime;
use numr::tensor::Tensor;

use crate::error::DeformResult;
use crate::params::{AxisParam, DeformParams};
use crate::progress::StageObserver;

/// Interpolation order used when resampling lattices and volumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResampleOrder {
    /// Nearest neighbor (order 0).
    Nearest,
    /// Multilinear (order 1).
    #[default]
    Linear,
    /// Cubic (order 3).
    Cubic,
}

/// Algorithmic contract for deformation-field construction.
///
/// All fields are tensors of shape `[dims, ...lattice]` where axis 0
/// indexes the spatial dimension being displaced. Fields of matching
/// lattice shape may be summed; coarse fields must be upscaled first.
///
/// All backends implementing these operations MUST use the EXACT SAME
/// ALGORITHMS to ensure numerical parity.
pub trait DeformFieldAlgorithms<R: Runtime> {
    /// Build the identity coordinate grid for a shape.
    ///
    /// For each dimension `d` the output holds that dimension's absolute
    /// coordinate at every lattice position. With `subsample > 1` the
    /// lattice has `max(1, shape[d] / subsample)` points per axis, spaced
    /// so that the first and last lattice points map exactly onto the
    /// first and last voxel coordinates of the full-resolution volume.
    ///
    /// # Arguments
    ///
    /// * `shape` - Full-resolution volume shape (all extents positive)
    /// * `subsample` - Working-resolution divisor (>= 1)
    ///
    /// # Returns
    ///
    /// Tensor of shape `[dims, ...subsampled_lattice]` holding absolute
    /// coordinates.
    fn identity_grid(&self, shape: &[usize], subsample: usize) -> DeformResult<Tensor<R>>;

    /// Build a smooth random displacement field from jittered control
    /// points, dense at the subsampled lattice resolution.
    ///
    /// A coarse lattice with `max(1, round(shape[d] / spacing[d]))` control
    /// points per axis is filled with independent `Normal(0, sigma[d])`
    /// offsets (axes with zero sigma stay zero), then upscaled to the
    /// subsampled lattice with cubic interpolation. Cubic is used because
    /// the control lattice is typically very sparse; it yields smooth
    /// deformation without creases at control points.
    ///
    /// # Arguments
    ///
    /// * `shape` - Full-resolution volume shape
    /// * `spacing` - Control-point spacing in voxels, scalar or per axis
    /// * `sigma` - Jitter standard deviation, scalar or per axis, >= 0
    /// * `subsample` - Working-resolution divisor (>= 1)
    /// * `seed` - Seed for the jitter sampler; `None` draws from entropy
    fn elastic_offsets(
        &self,
        shape: &[usize],
        spacing: &AxisParam<f64>,
        sigma: &AxisParam<f64>,
        subsample: usize,
        seed: Option<u64>,
    ) -> DeformResult<Tensor<R>>;

    /// Build a rotational displacement field from corner control points,
    /// dense at the subsampled lattice resolution.
    ///
    /// Represents a pure rotation by `angle` radians about the volume
    /// center (the midpoint of the first and last voxel index), applied to
    /// the last two axes only. Corner displacements of the affine map are
    /// placed on a `2^dims` corner lattice and upscaled linearly, which is
    /// exact for the multilinear interpolation of an affine rotation.
    ///
    /// # Errors
    ///
    /// A nonzero angle on a shape with fewer than two dimensions is an
    /// invalid parameter.
    fn rotation_offsets(
        &self,
        shape: &[usize],
        angle: f64,
        subsample: usize,
    ) -> DeformResult<Tensor<R>>;

    /// Resample a displacement field from its lattice to another lattice.
    ///
    /// Each spatial-dimension channel is resampled independently, axis by
    /// axis (separable). Output position `i` along an axis reads source
    /// position `i * (n_in - 1) / (n_out - 1)`, so lattice endpoints map to
    /// endpoints; taps outside the source lattice use boundary ("nearest")
    /// extension.
    ///
    /// # Arguments
    ///
    /// * `field` - Tensor of shape `[dims, ...source_lattice]`
    /// * `target_lattice` - Lattice shape to resample to
    /// * `order` - Interpolation order (nearest, linear or cubic)
    ///
    /// # Returns
    ///
    /// Tensor of shape `[dims, ...target_lattice]`.
    fn upscale_field(
        &self,
        field: &Tensor<R>,
        target_lattice: &[usize],
        order: ResampleOrder,
    ) -> DeformResult<Tensor<R>>;

    /// Compose the full sampling transformation for one augmentation call.
    ///
    /// Computes `identity_grid + elastic_offsets + rotation_offsets` at the
    /// subsampled lattice, then (only when `subsample > 1`) upscales the
    /// summed field once, linearly, to the full shape. Offsets are summed
    /// before that upscale so a single pass handles both fields. The result
    /// holds absolute sample coordinates, ready for use as a sampling map.
    fn deformation_field(
        &self,
        shape: &[usize],
        params: &DeformParams,
        seed: Option<u64>,
    ) -> DeformResult<Tensor<R>>;

    /// Same as [`deformation_field`](Self::deformation_field), reporting
    /// each pipeline stage to `observer`.
    fn deformation_field_observed(
        &self,
        shape: &[usize],
        params: &DeformParams,
        seed: Option<u64>,
        observer: &mut dyn StageObserver,
    ) -> DeformResult<Tensor<R>>;
}
