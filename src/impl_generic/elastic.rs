//! Elastic displacement fields from jittered control points.

use numr::runtime::{Runtime, RuntimeClient};
use numr::tensor::Tensor;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use crate::error::{DeformError, DeformResult};
use crate::impl_generic::grid::{check_shape, check_subsample, subsample_lattice};
use crate::impl_generic::upscale::upscale_field_impl;
use crate::params::AxisParam;
use crate::traits::deform::ResampleOrder;

/// Generic elastic offset field implementation.
///
/// Draws `Normal(0, sigma[d])` offsets on a coarse control-point lattice
/// and upscales them cubically to the subsampled working lattice. Axes
/// with zero sigma stay zero, leaving that axis undeformed.
pub fn elastic_offsets_impl<R, C>(
    client: &C,
    shape: &[usize],
    spacing: &AxisParam<f64>,
    sigma: &AxisParam<f64>,
    subsample: usize,
    seed: Option<u64>,
) -> DeformResult<Tensor<R>>
where
    R: Runtime,
    C: RuntimeClient<R>,
{
    check_shape(shape, "elastic_offsets")?;
    check_subsample(subsample, "elastic_offsets")?;

    let dims = shape.len();
    let spacing = spacing.per_axis(dims, "control_point_spacing")?;
    let sigma = sigma.per_axis(dims, "jitter_sigma")?;

    for (d, &s) in spacing.iter().enumerate() {
        if !(s > 0.0) || !s.is_finite() {
            return Err(DeformError::InvalidParameter {
                parameter: "control_point_spacing".to_string(),
                message: format!("axis {} spacing {} must be positive and finite", d, s),
            });
        }
    }
    for (d, &s) in sigma.iter().enumerate() {
        if s < 0.0 || !s.is_finite() {
            return Err(DeformError::InvalidParameter {
                parameter: "jitter_sigma".to_string(),
                message: format!("axis {} sigma {} must be >= 0 and finite", d, s),
            });
        }
    }

    let control: Vec<usize> = (0..dims)
        .map(|d| ((shape[d] as f64 / spacing[d]).round() as usize).max(1))
        .collect();
    let total: usize = control.iter().product();

    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    let mut offsets = vec![0.0f64; dims * total];
    for d in 0..dims {
        if sigma[d] > 0.0 {
            let normal = Normal::new(0.0, sigma[d]).map_err(|e| DeformError::InvalidParameter {
                parameter: "jitter_sigma".to_string(),
                message: e.to_string(),
            })?;
            for value in &mut offsets[d * total..(d + 1) * total] {
                *value = normal.sample(&mut rng);
            }
        }
    }

    let mut coarse_shape = vec![dims];
    coarse_shape.extend_from_slice(&control);
    let coarse = Tensor::from_slice(&offsets, &coarse_shape, client.device());

    let lattice = subsample_lattice(shape, subsample);
    upscale_field_impl(client, &coarse, &lattice, ResampleOrder::Cubic)
}
