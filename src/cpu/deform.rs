use numr::ops::{ScalarOps, TensorOps};
use numr::runtime::{Runtime, RuntimeClient};
use numr::tensor::Tensor;

use crate::error::DeformResult;
use crate::impl_generic::compose::deformation_field_impl;
use crate::impl_generic::elastic::elastic_offsets_impl;
use crate::impl_generic::grid::identity_grid_impl;
use crate::impl_generic::rotation::rotation_offsets_impl;
use crate::impl_generic::upscale::upscale_field_impl;
use crate::params::{AxisParam, DeformParams};
use crate::progress::{NullObserver, StageObserver};
use crate::traits::deform::{DeformFieldAlgorithms, ResampleOrder};

impl<R, C> DeformFieldAlgorithms<R> for C
where
    R: Runtime,
    C: TensorOps<R> + ScalarOps<R> + RuntimeClient<R>,
{
    fn identity_grid(&self, shape: &[usize], subsample: usize) -> DeformResult<Tensor<R>> {
        identity_grid_impl(self, shape, subsample)
    }

    fn elastic_offsets(
        &self,
        shape: &[usize],
        spacing: &AxisParam<f64>,
        sigma: &AxisParam<f64>,
        subsample: usize,
        seed: Option<u64>,
    ) -> DeformResult<Tensor<R>> {
        elastic_offsets_impl(self, shape, spacing, sigma, subsample, seed)
    }

    fn rotation_offsets(
        &self,
        shape: &[usize],
        angle: f64,
        subsample: usize,
    ) -> DeformResult<Tensor<R>> {
        rotation_offsets_impl(self, shape, angle, subsample)
    }

    fn upscale_field(
        &self,
        field: &Tensor<R>,
        target_lattice: &[usize],
        order: ResampleOrder,
    ) -> DeformResult<Tensor<R>> {
        upscale_field_impl(self, field, target_lattice, order)
    }

    fn deformation_field(
        &self,
        shape: &[usize],
        params: &DeformParams,
        seed: Option<u64>,
    ) -> DeformResult<Tensor<R>> {
        deformation_field_impl(self, shape, params, seed, &mut NullObserver)
    }

    fn deformation_field_observed(
        &self,
        shape: &[usize],
        params: &DeformParams,
        seed: Option<u64>,
        observer: &mut dyn StageObserver,
    ) -> DeformResult<Tensor<R>> {
        deformation_field_impl(self, shape, params, seed, observer)
    }
}
