//! Algorithmic contracts for deformation-field construction and volume
//! warping.
//!
//! Every backend implementing these traits MUST use the exact same
//! algorithms so results agree across runtimes.

pub mod deform;
pub mod warp;

pub use deform::{DeformFieldAlgorithms, ResampleOrder};
pub use warp::VolumeWarpAlgorithms;
