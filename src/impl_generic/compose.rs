//! Composition of identity, elastic and rotation fields into one
//! sampling transformation.

use std::time::Instant;

use numr::ops::{ScalarOps, TensorOps};
use numr::runtime::{Runtime, RuntimeClient};
use numr::tensor::Tensor;

use crate::error::DeformResult;
use crate::impl_generic::elastic::elastic_offsets_impl;
use crate::impl_generic::grid::identity_grid_impl;
use crate::impl_generic::rotation::rotation_offsets_impl;
use crate::impl_generic::upscale::upscale_field_impl;
use crate::params::DeformParams;
use crate::progress::StageObserver;
use crate::traits::deform::ResampleOrder;

/// Generic transformation composition.
///
/// All three fields are built at the subsampled working lattice and summed
/// there; the single final upscale to full resolution happens only when
/// `subsample > 1`, so one linear pass covers both offset fields.
pub fn deformation_field_impl<R, C>(
    client: &C,
    shape: &[usize],
    params: &DeformParams,
    seed: Option<u64>,
    observer: &mut dyn StageObserver,
) -> DeformResult<Tensor<R>>
where
    R: Runtime,
    C: TensorOps<R> + ScalarOps<R> + RuntimeClient<R>,
{
    let start = Instant::now();
    let mut field = identity_grid_impl(client, shape, params.subsample)?;
    observer.on_stage("identity", start.elapsed());

    let start = Instant::now();
    let elastic = elastic_offsets_impl(
        client,
        shape,
        &params.control_point_spacing,
        &params.jitter_sigma,
        params.subsample,
        seed,
    )?;
    field = client.add(&field, &elastic)?;
    observer.on_stage("elastic", start.elapsed());

    let start = Instant::now();
    let rotation = rotation_offsets_impl(client, shape, params.angle, params.subsample)?;
    field = client.add(&field, &rotation)?;
    observer.on_stage("rotation", start.elapsed());

    if params.subsample > 1 {
        let start = Instant::now();
        field = upscale_field_impl(client, &field, shape, ResampleOrder::Linear)?;
        observer.on_stage("upscale", start.elapsed());
    }

    Ok(field)
}
