//! Separable lattice resampling for displacement fields.
//!
//! Each spatial-dimension channel of a field is resampled independently,
//! one axis at a time. Output position `i` along an axis reads source
//! position `i * (n_in - 1) / (n_out - 1)`, so lattice endpoints always map
//! onto endpoints; taps that fall outside the source lattice are clamped to
//! its boundary. This is what lets a tiny control-point lattice be
//! stretched to any denser lattice.

use numr::runtime::{Runtime, RuntimeClient};
use numr::tensor::Tensor;

use crate::error::{DeformError, DeformResult};
use crate::traits::deform::ResampleOrder;

/// Catmull-Rom weights for the four taps around a sample at fraction `t`.
///
/// The kernel interpolates: at `t == 0` the weights collapse to the center
/// tap, so source samples are reproduced exactly at lattice-aligned
/// positions.
fn cubic_weights(t: f64) -> [f64; 4] {
    let t2 = t * t;
    let t3 = t2 * t;
    [
        -0.5 * t3 + t2 - 0.5 * t,
        1.5 * t3 - 2.5 * t2 + 1.0,
        -1.5 * t3 + 2.0 * t2 + 0.5 * t,
        0.5 * t3 - 0.5 * t2,
    ]
}

/// Taps and weights for every output position along one axis.
fn axis_taps(n_in: usize, n_out: usize, order: ResampleOrder) -> Vec<Vec<(usize, f64)>> {
    let scale = if n_in > 1 && n_out > 1 {
        (n_in - 1) as f64 / (n_out - 1) as f64
    } else {
        0.0
    };
    let clamp = |k: isize| -> usize { k.clamp(0, n_in as isize - 1) as usize };

    (0..n_out)
        .map(|j| {
            let x = j as f64 * scale;
            let base = x.floor();
            let t = x - base;
            let base = base as isize;
            match order {
                ResampleOrder::Nearest => vec![(clamp(x.round() as isize), 1.0)],
                ResampleOrder::Linear => {
                    vec![(clamp(base), 1.0 - t), (clamp(base + 1), t)]
                }
                ResampleOrder::Cubic => {
                    let w = cubic_weights(t);
                    (0..4usize)
                        .map(|k| (clamp(base - 1 + k as isize), w[k]))
                        .collect()
                }
            }
        })
        .collect()
}

/// Resample one scalar lattice along a single axis.
fn zoom_axis(
    data: &[f64],
    shape: &[usize],
    axis: usize,
    n_out: usize,
    order: ResampleOrder,
) -> Vec<f64> {
    let n_in = shape[axis];
    let outer: usize = shape[..axis].iter().product();
    let inner: usize = shape[axis + 1..].iter().product();
    let taps = axis_taps(n_in, n_out, order);

    let mut out = vec![0.0f64; outer * n_out * inner];
    for o in 0..outer {
        let src_base = o * n_in * inner;
        let dst_base = o * n_out * inner;
        for (j, taps_j) in taps.iter().enumerate() {
            for i in 0..inner {
                let mut acc = 0.0;
                for &(k, w) in taps_j {
                    acc += w * data[src_base + k * inner + i];
                }
                out[dst_base + j * inner + i] = acc;
            }
        }
    }
    out
}

/// Resample one scalar lattice to a new shape, axis by axis.
pub(crate) fn zoom_lattice(
    src: &[f64],
    in_shape: &[usize],
    out_shape: &[usize],
    order: ResampleOrder,
) -> Vec<f64> {
    let mut data = src.to_vec();
    let mut shape = in_shape.to_vec();
    for axis in 0..shape.len() {
        if shape[axis] != out_shape[axis] {
            data = zoom_axis(&data, &shape, axis, out_shape[axis], order);
            shape[axis] = out_shape[axis];
        }
    }
    data
}

/// Generic field resampling implementation.
///
/// `field` has shape `[dims, ...source_lattice]`; the result has shape
/// `[dims, ...target_lattice]` with each channel resampled independently.
pub fn upscale_field_impl<R, C>(
    client: &C,
    field: &Tensor<R>,
    target_lattice: &[usize],
    order: ResampleOrder,
) -> DeformResult<Tensor<R>>
where
    R: Runtime,
    C: RuntimeClient<R>,
{
    let field_shape = field.shape().to_vec();
    if field_shape.len() < 2 {
        return Err(DeformError::InvalidParameter {
            parameter: "field".to_string(),
            message: format!(
                "displacement field must have shape [dims, ...lattice], got {:?}",
                field_shape
            ),
        });
    }
    let channels = field_shape[0];
    let in_lattice = &field_shape[1..];
    if target_lattice.len() != in_lattice.len() {
        return Err(DeformError::ShapeMismatch {
            expected: in_lattice.to_vec(),
            actual: target_lattice.to_vec(),
            context: "upscale_field (lattice rank)".to_string(),
        });
    }
    if target_lattice.contains(&0) {
        return Err(DeformError::InvalidParameter {
            parameter: "target_lattice".to_string(),
            message: format!("lattice {:?} must have positive extents", target_lattice),
        });
    }

    let per_in: usize = in_lattice.iter().product();
    let per_out: usize = target_lattice.iter().product();
    let data: Vec<f64> = field.to_vec();

    let mut out = vec![0.0f64; channels * per_out];
    for c in 0..channels {
        let channel = zoom_lattice(
            &data[c * per_in..(c + 1) * per_in],
            in_lattice,
            target_lattice,
            order,
        );
        out[c * per_out..(c + 1) * per_out].copy_from_slice(&channel);
    }

    let mut out_shape = vec![channels];
    out_shape.extend_from_slice(target_lattice);
    Ok(Tensor::from_slice(&out, &out_shape, client.device()))
}
