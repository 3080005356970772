//! Rotational displacement fields from corner control points.
//!
//! A rotation about the volume center is an affine map, so its
//! displacement field is fully determined by the displacements of the
//! `2^dims` volume corners: linear interpolation between corners
//! reconstructs the field exactly.

use numr::runtime::{Runtime, RuntimeClient};
use numr::tensor::Tensor;

use crate::error::{DeformError, DeformResult};
use crate::impl_generic::grid::{check_shape, check_subsample, subsample_lattice};
use crate::impl_generic::upscale::upscale_field_impl;
use crate::traits::deform::ResampleOrder;

/// Rotate the last two components of `offset` by `angle` radians.
fn rotate_last_two(offset: &[f64], angle: f64) -> Vec<f64> {
    let mut rotated = offset.to_vec();
    let n = offset.len();
    let (x, y) = (offset[n - 2], offset[n - 1]);
    rotated[n - 2] = angle.sin() * y + angle.cos() * x;
    rotated[n - 1] = -angle.sin() * x + angle.cos() * y;
    rotated
}

/// Generic rotation offset field implementation.
///
/// The center is the midpoint between the first and last voxel index,
/// `0.5 * (shape[d] - 1)`, not the midpoint of the shape extent.
pub fn rotation_offsets_impl<R, C>(
    client: &C,
    shape: &[usize],
    angle: f64,
    subsample: usize,
) -> DeformResult<Tensor<R>>
where
    R: Runtime,
    C: RuntimeClient<R>,
{
    check_shape(shape, "rotation_offsets")?;
    check_subsample(subsample, "rotation_offsets")?;
    if !angle.is_finite() {
        return Err(DeformError::InvalidParameter {
            parameter: "angle".to_string(),
            message: format!("angle {} must be finite", angle),
        });
    }

    let dims = shape.len();
    if angle != 0.0 && dims < 2 {
        return Err(DeformError::InvalidParameter {
            parameter: "angle".to_string(),
            message: "rotation requires at least two dimensions".to_string(),
        });
    }

    let corners = 1usize << dims;
    let center: Vec<f64> = shape.iter().map(|&s| 0.5 * (s - 1) as f64).collect();

    // Corner lattice of shape (2,)*dims, row-major: bit (dims-1-d) of the
    // flat corner index selects the position along axis d.
    let mut offsets = vec![0.0f64; dims * corners];
    for corner in 0..corners {
        let corner_offset: Vec<f64> = (0..dims)
            .map(|d| {
                let bit = (corner >> (dims - 1 - d)) & 1;
                bit as f64 * (shape[d] - 1) as f64 - center[d]
            })
            .collect();

        if dims >= 2 {
            let rotated = rotate_last_two(&corner_offset, angle);
            for d in 0..dims {
                offsets[d * corners + corner] = rotated[d] - corner_offset[d];
            }
        }
    }

    let mut coarse_shape = vec![dims];
    coarse_shape.extend_from_slice(&vec![2; dims]);
    let coarse = Tensor::from_slice(&offsets, &coarse_shape, client.device());

    let lattice = subsample_lattice(shape, subsample);
    upscale_field_impl(client, &coarse, &lattice, ResampleOrder::Linear)
}

#[cfg(test)]
mod tests {
    use super::*;
    use numr::runtime::cpu::{CpuClient, CpuDevice};
    use std::f64::consts::FRAC_PI_2;

    fn setup() -> (CpuClient, CpuDevice) {
        let device = CpuDevice::new();
        let client = CpuClient::new(device.clone());
        (client, device)
    }

    #[test]
    fn test_zero_angle_is_zero_field() {
        let (client, _device) = setup();

        let field = rotation_offsets_impl(&client, &[5, 6], 0.0, 1).unwrap();
        assert_eq!(field.shape(), &[2, 5, 6]);

        let data: Vec<f64> = field.to_vec();
        assert!(data.iter().all(|&v| v.abs() < 1e-12));
    }

    #[test]
    fn test_quarter_turn_corner_displacements() {
        let (client, _device) = setup();

        // shape (10, 10), center (4.5, 4.5): corner (0, 0) has offset
        // (-4.5, -4.5); rotating by pi/2 maps it to (-4.5, 4.5), so its
        // displacement is (0, 9).
        let field = rotation_offsets_impl(&client, &[10, 10], FRAC_PI_2, 1).unwrap();
        let data: Vec<f64> = field.to_vec();
        let total = 100;
        let at = |d: usize, r: usize, c: usize| data[d * total + r * 10 + c];

        assert!((at(0, 0, 0) - 0.0).abs() < 1e-9);
        assert!((at(1, 0, 0) - 9.0).abs() < 1e-9);
        // corner (9, 9): offset (4.5, 4.5) -> rotated (4.5, -4.5)
        assert!((at(0, 9, 9) - 0.0).abs() < 1e-9);
        assert!((at(1, 9, 9) + 9.0).abs() < 1e-9);
        // corner (0, 9): offset (-4.5, 4.5) -> rotated (4.5, 4.5)
        assert!((at(0, 0, 9) - 9.0).abs() < 1e-9);
        assert!((at(1, 0, 9) - 0.0).abs() < 1e-9);
        // the exact center does not move
        let center = |d: usize| {
            0.25 * (at(d, 4, 4) + at(d, 4, 5) + at(d, 5, 4) + at(d, 5, 5))
        };
        assert!(center(0).abs() < 1e-9);
        assert!(center(1).abs() < 1e-9);
    }

    #[test]
    fn test_rotation_acts_on_last_two_axes_only() {
        let (client, _device) = setup();

        let field = rotation_offsets_impl(&client, &[4, 8, 8], 0.7, 1).unwrap();
        assert_eq!(field.shape(), &[3, 4, 8, 8]);

        let data: Vec<f64> = field.to_vec();
        let total = 4 * 8 * 8;
        assert!(data[..total].iter().all(|&v| v.abs() < 1e-12));
        assert!(data[total..].iter().any(|&v| v.abs() > 1e-9));
    }

    #[test]
    fn test_rejects_nonzero_angle_in_one_dimension() {
        let (client, _device) = setup();

        let err = rotation_offsets_impl(&client, &[16], 0.3, 1).unwrap_err();
        assert!(matches!(err, DeformError::InvalidParameter { .. }));
        assert!(rotation_offsets_impl(&client, &[16], 0.0, 1).is_ok());
    }
}
