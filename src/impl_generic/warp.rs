//! Kind-dispatched volume resampling through a deformation field.
//!
//! The deformation field holds one absolute source coordinate per output
//! voxel. Continuous volumes are read with multilinear interpolation and
//! filled with `0` outside the source domain; label volumes are read
//! nearest-neighbor and filled with the maximum representable value of
//! their element type. A sampling coordinate outside `[0, shape[d] - 1]`
//! on any axis yields the fill value for the whole voxel.

use num_traits::{FromPrimitive, ToPrimitive};
use numr::runtime::{Runtime, RuntimeClient};
use numr::tensor::Tensor;

use crate::error::{DeformError, DeformResult};
use crate::traits::deform::ResampleOrder;
use crate::volume::{Volume, VolumeData};

fn row_major_strides(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![1usize; shape.len()];
    for d in (0..shape.len().saturating_sub(1)).rev() {
        strides[d] = strides[d + 1] * shape[d + 1];
    }
    strides
}

/// Nearest-neighbor gather. Exact for any element type.
fn warp_nearest<T: Copy>(src: &[T], out: &mut [T], shape: &[usize], coords: &[f64], fill: T) {
    let dims = shape.len();
    let strides = row_major_strides(shape);
    let total = out.len();

    'voxel: for j in 0..total {
        let mut flat = 0usize;
        for d in 0..dims {
            let c = coords[d * total + j];
            if c < 0.0 || c > (shape[d] - 1) as f64 {
                out[j] = fill;
                continue 'voxel;
            }
            flat += (c.round() as usize).min(shape[d] - 1) * strides[d];
        }
        out[j] = src[flat];
    }
}

/// Multilinear gather accumulating the `2^dims` lattice corners in f64.
fn warp_linear<T>(src: &[T], out: &mut [T], shape: &[usize], coords: &[f64], fill: T)
where
    T: Copy + ToPrimitive + FromPrimitive,
{
    let dims = shape.len();
    let strides = row_major_strides(shape);
    let total = out.len();
    let corners = 1usize << dims;

    let mut floors = vec![0usize; dims];
    let mut fracs = vec![0.0f64; dims];

    'voxel: for j in 0..total {
        for d in 0..dims {
            let c = coords[d * total + j];
            if c < 0.0 || c > (shape[d] - 1) as f64 {
                out[j] = fill;
                continue 'voxel;
            }
            let base = c.floor();
            floors[d] = base as usize;
            fracs[d] = c - base;
        }

        let mut acc = 0.0f64;
        for corner in 0..corners {
            let mut weight = 1.0f64;
            let mut flat = 0usize;
            for d in 0..dims {
                if (corner >> d) & 1 == 1 {
                    weight *= fracs[d];
                    flat += (floors[d] + 1).min(shape[d] - 1) * strides[d];
                } else {
                    weight *= 1.0 - fracs[d];
                    flat += floors[d] * strides[d];
                }
            }
            if weight != 0.0 {
                acc += weight * src[flat].to_f64().unwrap_or(0.0);
            }
        }
        out[j] = T::from_f64(acc).unwrap_or(fill);
    }
}

/// The 64-bit label safety sub-procedure.
///
/// Interpolation kernels address elements through an f64 accumulator, and
/// u64 identifiers above `u32::MAX` cannot round-trip through it. The
/// volume is downcast to u32 (after a fail-fast range check), gathered
/// nearest-neighbor with the u32 sentinel, widened back into the u64
/// target, and every sentinel rewritten to the true u64 sentinel.
fn warp_label64(
    src: &[u64],
    out: &mut [u64],
    shape: &[usize],
    coords: &[f64],
    context: &str,
) -> DeformResult<()> {
    if let Some(&max) = src.iter().max() {
        if max > u64::from(u32::MAX) {
            return Err(DeformError::LabelRangeOverflow {
                max,
                context: context.to_string(),
            });
        }
    }

    let narrowed: Vec<u32> = src.iter().map(|&v| v as u32).collect();
    let mut gathered: Vec<u32> = vec![0; out.len()];
    warp_nearest(&narrowed, &mut gathered, shape, coords, u32::MAX);

    for (o, &v) in out.iter_mut().zip(gathered.iter()) {
        *o = if v == u32::MAX { u64::MAX } else { u64::from(v) };
    }
    Ok(())
}

fn check_warp_shapes<R: Runtime>(
    source: &Volume,
    field: &Tensor<R>,
    target: &Volume,
    context: &str,
) -> DeformResult<()> {
    let field_shape = field.shape().to_vec();
    let mut expected = vec![source.ndim()];
    expected.extend_from_slice(source.shape());
    if field_shape != expected {
        return Err(DeformError::ShapeMismatch {
            expected,
            actual: field_shape,
            context: format!("{} (field lattice)", context),
        });
    }
    if target.shape() != source.shape() {
        return Err(DeformError::ShapeMismatch {
            expected: source.shape().to_vec(),
            actual: target.shape().to_vec(),
            context: format!("{} (target)", context),
        });
    }
    if target.dtype_name() != source.dtype_name() {
        return Err(DeformError::KindMismatch {
            expected: source.dtype_name(),
            actual: target.dtype_name(),
            context: context.to_string(),
        });
    }
    Ok(())
}

/// Generic kind-dispatched warp implementation.
///
/// The volume kind is resolved once; each variant carries its own
/// interpolation order and fill value.
pub fn warp_volume_impl<R, C>(
    _client: &C,
    source: &Volume,
    field: &Tensor<R>,
    target: &mut Volume,
    context: &str,
) -> DeformResult<()>
where
    R: Runtime,
    C: RuntimeClient<R>,
{
    check_warp_shapes(source, field, target, context)?;
    let shape = source.shape().to_vec();
    let coords: Vec<f64> = field.to_vec();
    let (src_name, dst_name) = (source.dtype_name(), target.dtype_name());

    match (source.data(), target.data_mut()) {
        (VolumeData::F32(src), VolumeData::F32(out)) => {
            warp_linear(src, out, &shape, &coords, 0.0f32);
        }
        (VolumeData::F64(src), VolumeData::F64(out)) => {
            warp_linear(src, out, &shape, &coords, 0.0f64);
        }
        (VolumeData::U16(src), VolumeData::U16(out)) => {
            warp_nearest(src, out, &shape, &coords, u16::MAX);
        }
        (VolumeData::U32(src), VolumeData::U32(out)) => {
            warp_nearest(src, out, &shape, &coords, u32::MAX);
        }
        (VolumeData::U64(src), VolumeData::U64(out)) => {
            warp_label64(src, out, &shape, &coords, context)?;
        }
        // check_warp_shapes already matched the element types
        _ => {
            return Err(DeformError::KindMismatch {
                expected: src_name,
                actual: dst_name,
                context: context.to_string(),
            })
        }
    }
    Ok(())
}

/// Generic warp with an explicit order and fill value.
pub fn warp_volume_with_impl<R, C>(
    _client: &C,
    source: &Volume,
    field: &Tensor<R>,
    order: ResampleOrder,
    fill: f64,
    target: &mut Volume,
    context: &str,
) -> DeformResult<()>
where
    R: Runtime,
    C: RuntimeClient<R>,
{
    check_warp_shapes(source, field, target, context)?;
    if order == ResampleOrder::Cubic {
        return Err(DeformError::InvalidParameter {
            parameter: "order".to_string(),
            message: "volume resampling supports nearest and linear orders only".to_string(),
        });
    }

    let shape = source.shape().to_vec();
    let coords: Vec<f64> = field.to_vec();
    let (src_name, dst_name) = (source.dtype_name(), target.dtype_name());

    fn typed_fill<T: FromPrimitive>(fill: f64, context: &str) -> DeformResult<T> {
        T::from_f64(fill).ok_or_else(|| DeformError::InvalidParameter {
            parameter: "fill".to_string(),
            message: format!("fill value {} is not representable in {}", fill, context),
        })
    }

    match (source.data(), target.data_mut(), order) {
        (VolumeData::F32(src), VolumeData::F32(out), ResampleOrder::Nearest) => {
            warp_nearest(src, out, &shape, &coords, typed_fill::<f32>(fill, context)?);
        }
        (VolumeData::F32(src), VolumeData::F32(out), ResampleOrder::Linear) => {
            warp_linear(src, out, &shape, &coords, typed_fill::<f32>(fill, context)?);
        }
        (VolumeData::F64(src), VolumeData::F64(out), ResampleOrder::Nearest) => {
            warp_nearest(src, out, &shape, &coords, fill);
        }
        (VolumeData::F64(src), VolumeData::F64(out), ResampleOrder::Linear) => {
            warp_linear(src, out, &shape, &coords, fill);
        }
        (VolumeData::U16(src), VolumeData::U16(out), ResampleOrder::Nearest) => {
            warp_nearest(src, out, &shape, &coords, typed_fill::<u16>(fill, context)?);
        }
        (VolumeData::U16(src), VolumeData::U16(out), ResampleOrder::Linear) => {
            warp_linear(src, out, &shape, &coords, typed_fill::<u16>(fill, context)?);
        }
        (VolumeData::U32(src), VolumeData::U32(out), ResampleOrder::Nearest) => {
            warp_nearest(src, out, &shape, &coords, typed_fill::<u32>(fill, context)?);
        }
        (VolumeData::U32(src), VolumeData::U32(out), ResampleOrder::Linear) => {
            warp_linear(src, out, &shape, &coords, typed_fill::<u32>(fill, context)?);
        }
        (VolumeData::U64(src), VolumeData::U64(out), ResampleOrder::Nearest) => {
            warp_nearest(src, out, &shape, &coords, typed_fill::<u64>(fill, context)?);
        }
        (VolumeData::U64(_), VolumeData::U64(_), ResampleOrder::Linear) => {
            return Err(DeformError::InvalidParameter {
                parameter: "order".to_string(),
                message: "linear resampling of u64 volumes cannot round-trip through \
                          the f64 accumulator; use nearest or warp_volume"
                    .to_string(),
            });
        }
        _ => {
            return Err(DeformError::KindMismatch {
                expected: src_name,
                actual: dst_name,
                context: context.to_string(),
            })
        }
    }
    Ok(())
}
