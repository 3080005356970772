//! Generic, backend-agnostic implementations of the deformation and
//! warping algorithms.
//!
//! Field construction works on host buffers and hands results to the
//! client's device through `Tensor::from_slice`; composition sums fields
//! with tensor ops so it stays wherever the client's tensors live.

pub mod augment;
pub mod compose;
pub mod elastic;
pub mod grid;
pub mod rotation;
pub mod upscale;
pub mod warp;
