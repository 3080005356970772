use numr::ops::{ScalarOps, TensorOps};
use numr::runtime::{Runtime, RuntimeClient};
use numr::tensor::Tensor;

use crate::error::DeformResult;
use crate::impl_generic::augment::augment_volumes_impl;
use crate::impl_generic::warp::{warp_volume_impl, warp_volume_with_impl};
use crate::params::DeformParams;
use crate::progress::{NullObserver, StageObserver};
use crate::traits::deform::ResampleOrder;
use crate::traits::warp::VolumeWarpAlgorithms;
use crate::volume::Volume;

impl<R, C> VolumeWarpAlgorithms<R> for C
where
    R: Runtime,
    C: TensorOps<R> + ScalarOps<R> + RuntimeClient<R>,
{
    fn warp_volume(
        &self,
        source: &Volume,
        field: &Tensor<R>,
        target: &mut Volume,
    ) -> DeformResult<()> {
        warp_volume_impl(self, source, field, target, "warp_volume")
    }

    fn warp_volume_with(
        &self,
        source: &Volume,
        field: &Tensor<R>,
        order: ResampleOrder,
        fill: f64,
        target: &mut Volume,
    ) -> DeformResult<()> {
        warp_volume_with_impl(self, source, field, order, fill, target, "warp_volume_with")
    }

    fn augment_volumes(
        &self,
        sources: &[Volume],
        targets: &mut [Volume],
        params: &DeformParams,
        seed: Option<u64>,
    ) -> DeformResult<()> {
        augment_volumes_impl(self, sources, targets, params, seed, &mut NullObserver)
    }

    fn augment_volumes_observed(
        &self,
        sources: &[Volume],
        targets: &mut [Volume],
        params: &DeformParams,
        seed: Option<u64>,
        observer: &mut dyn StageObserver,
    ) -> DeformResult<()> {
        augment_volumes_impl(self, sources, targets, params, seed, observer)
    }
}
