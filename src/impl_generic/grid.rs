//! Identity coordinate grids.
//!
//! The identity grid holds, for each spatial dimension, the absolute
//! coordinate of every lattice position. Subsampled grids keep their first
//! and last lattice points on the first and last voxel of the full
//! volume, so upscaling the composed field back to full resolution does
//! not drift at the boundary.

use numr::runtime::{Runtime, RuntimeClient};
use numr::tensor::Tensor;

use crate::error::{DeformError, DeformResult};

/// Lattice shape obtained by subsampling `shape`.
pub(crate) fn subsample_lattice(shape: &[usize], subsample: usize) -> Vec<usize> {
    shape.iter().map(|&s| (s / subsample).max(1)).collect()
}

pub(crate) fn check_shape(shape: &[usize], context: &str) -> DeformResult<()> {
    if shape.is_empty() || shape.contains(&0) {
        return Err(DeformError::InvalidParameter {
            parameter: "shape".to_string(),
            message: format!(
                "shape {:?} must be non-empty with positive extents in {}",
                shape, context
            ),
        });
    }
    Ok(())
}

pub(crate) fn check_subsample(subsample: usize, context: &str) -> DeformResult<()> {
    if subsample == 0 {
        return Err(DeformError::InvalidParameter {
            parameter: "subsample".to_string(),
            message: format!("subsample must be >= 1 in {}", context),
        });
    }
    Ok(())
}

/// Generic identity grid implementation.
///
/// Returns a tensor of shape `[dims, ...lattice]` where channel `d` holds
/// `index[d] * step[d]` with `step[d] = (shape[d] - 1) / (lattice[d] - 1)`
/// for lattices with more than one point, else `1`.
pub fn identity_grid_impl<R, C>(
    client: &C,
    shape: &[usize],
    subsample: usize,
) -> DeformResult<Tensor<R>>
where
    R: Runtime,
    C: RuntimeClient<R>,
{
    check_shape(shape, "identity_grid")?;
    check_subsample(subsample, "identity_grid")?;

    let dims = shape.len();
    let lattice = subsample_lattice(shape, subsample);
    let step: Vec<f64> = (0..dims)
        .map(|d| {
            if lattice[d] > 1 {
                (shape[d] - 1) as f64 / (lattice[d] - 1) as f64
            } else {
                1.0
            }
        })
        .collect();

    let total: usize = lattice.iter().product();
    let mut data = vec![0.0f64; dims * total];
    for d in 0..dims {
        let inner: usize = lattice[d + 1..].iter().product();
        let channel = &mut data[d * total..(d + 1) * total];
        for (i, value) in channel.iter_mut().enumerate() {
            let index = (i / inner) % lattice[d];
            *value = index as f64 * step[d];
        }
    }

    let mut field_shape = vec![dims];
    field_shape.extend_from_slice(&lattice);
    Ok(Tensor::from_slice(&data, &field_shape, client.device()))
}
