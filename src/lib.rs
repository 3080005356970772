//! deformr - Elastic deformation augmentation for N-dimensional volumes
//!
//! deformr synthesizes smooth, label-safe geometric deformations for
//! training-data augmentation. One dense per-voxel sampling map combines
//! elastic (smooth random) and rigid (rotational) deformation; every
//! volume of a batch is resampled through that one map, so aligned
//! volumes (an intensity image and its label mask) deform identically.
//!
//! # Pipeline
//!
//! ```text
//! shape ──► identity grid ───┐
//!           elastic offsets  ├─ sum ──► (upscale) ──► sampling map
//!           rotation offsets ┘                            │
//!                                        per volume ◄─────┘
//!                                  linear (continuous) / nearest (labels)
//! ```
//!
//! Fields are built at an optionally subsampled working resolution for
//! performance; offsets are summed there and the combined field is
//! upscaled back to full resolution in a single linear pass.
//!
//! # Volumes
//!
//! Volumes carry typed elements: f32/f64 intensities are interpolated
//! linearly and filled with `0` outside the source domain; u16/u32/u64
//! label identifiers are resampled nearest-neighbor and filled with their
//! type's maximum value as a "no label" sentinel. u64 labels are routed
//! through a 32-bit downcast with a fail-fast range check, preserving
//! exact label identity for all in-range values.
//!
//! # Example
//!
//! ```ignore
//! use deformr::{AxisParam, DeformParams, Volume, VolumeWarpAlgorithms};
//! use numr::runtime::cpu::{CpuClient, CpuDevice};
//!
//! let device = CpuDevice::new();
//! let client = CpuClient::new(device.clone());
//!
//! let image = Volume::from_f32(&[64, 64, 64], raw)?;
//! let mask = Volume::from_u64(&[64, 64, 64], labels)?;
//! let mut out_image = image.zeros_like();
//! let mut out_mask = mask.zeros_like();
//!
//! let params = DeformParams {
//!     control_point_spacing: AxisParam::Uniform(16.0),
//!     jitter_sigma: AxisParam::Uniform(2.0),
//!     angle: 0.2,
//!     ..DeformParams::default()
//! };
//! client.augment_volumes(
//!     &[image, mask],
//!     &mut [out_image, out_mask],
//!     &params,
//!     Some(42),
//! )?;
//! ```
//!
//! # Backend Support
//!
//! The algorithms are generic over numr's `Runtime` trait; field math is
//! staged on the host and placed on the client's device, so any client
//! exposing the required op traits works. Feature flags `cuda` and `wgpu`
//! are forwarded to numr.

pub mod cpu;
pub mod error;
pub mod impl_generic;
pub mod params;
pub mod progress;
pub mod traits;
pub mod volume;

// Re-export main types for convenience
pub use error::{DeformError, DeformResult};
pub use params::{AxisParam, DeformParams};
pub use progress::{NullObserver, StageObserver};
pub use traits::deform::{DeformFieldAlgorithms, ResampleOrder};
pub use traits::warp::VolumeWarpAlgorithms;
pub use volume::{Volume, VolumeData, VolumeKind};
