//! Augmentation parameters and their normalization.
//!
//! All parameters that shape a deformation are collected in [`DeformParams`].
//! Scalar-or-per-axis values are carried as an explicit [`AxisParam`] and
//! normalized once, at the configuration boundary, into a fixed-length
//! per-axis vector before any field construction begins.

use crate::error::{DeformError, DeformResult};

/// A parameter that is either shared by all axes or given per axis.
#[derive(Debug, Clone, PartialEq)]
pub enum AxisParam<T> {
    /// One value broadcast to every axis.
    Uniform(T),
    /// One value per axis, in axis order.
    PerAxis(Vec<T>),
}

impl<T: Copy> AxisParam<T> {
    /// Normalize to exactly one value per axis.
    ///
    /// # Errors
    ///
    /// Returns an error if a per-axis sequence does not have `dims` entries.
    pub fn per_axis(&self, dims: usize, parameter: &str) -> DeformResult<Vec<T>> {
        match self {
            Self::Uniform(value) => Ok(vec![*value; dims]),
            Self::PerAxis(values) => {
                if values.len() != dims {
                    return Err(DeformError::InvalidParameter {
                        parameter: parameter.to_string(),
                        message: format!(
                            "per-axis value has {} entries but the shape has {} dimensions",
                            values.len(),
                            dims
                        ),
                    });
                }
                Ok(values.clone())
            }
        }
    }
}

impl<T: Copy> From<T> for AxisParam<T> {
    fn from(value: T) -> Self {
        Self::Uniform(value)
    }
}

/// Parameters shared, read-only, by one augmentation call.
///
/// # Example
///
/// ```ignore
/// use deformr::{AxisParam, DeformParams};
///
/// let params = DeformParams {
///     jitter_sigma: AxisParam::PerAxis(vec![0.0, 4.0, 4.0]),
///     angle: 0.25,
///     ..DeformParams::default()
/// };
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DeformParams {
    /// Target spacing between elastic control points, in voxels.
    pub control_point_spacing: AxisParam<f64>,
    /// Standard deviation of the random control-point jitter, in voxels.
    /// Axes with zero sigma are left undeformed.
    pub jitter_sigma: AxisParam<f64>,
    /// Integer divisor reducing the working resolution of field
    /// construction; the composed field is upscaled back afterwards.
    pub subsample: usize,
    /// Rotation angle in radians, applied to the last two axes.
    pub angle: f64,
}

impl Default for DeformParams {
    fn default() -> Self {
        Self {
            control_point_spacing: AxisParam::Uniform(100.0),
            jitter_sigma: AxisParam::Uniform(10.0),
            subsample: 1,
            angle: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_broadcasts() {
        let spacing = AxisParam::Uniform(100.0);
        assert_eq!(
            spacing.per_axis(3, "control_point_spacing").unwrap(),
            vec![100.0, 100.0, 100.0]
        );
    }

    #[test]
    fn test_per_axis_passthrough() {
        let sigma = AxisParam::PerAxis(vec![0.0, 4.0]);
        assert_eq!(sigma.per_axis(2, "jitter_sigma").unwrap(), vec![0.0, 4.0]);
    }

    #[test]
    fn test_per_axis_wrong_length() {
        let sigma = AxisParam::PerAxis(vec![1.0, 2.0, 3.0]);
        let err = sigma.per_axis(2, "jitter_sigma").unwrap_err();
        assert!(matches!(err, DeformError::InvalidParameter { .. }));
    }

    #[test]
    fn test_defaults() {
        let params = DeformParams::default();
        assert_eq!(params.control_point_spacing, AxisParam::Uniform(100.0));
        assert_eq!(params.jitter_sigma, AxisParam::Uniform(10.0));
        assert_eq!(params.subsample, 1);
        assert_eq!(params.angle, 0.0);
    }
}
