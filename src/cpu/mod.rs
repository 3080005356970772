//! Trait implementations for runtime clients.
//!
//! The algorithms are backend-agnostic: any client exposing the required
//! numr op traits gets both algorithm contracts through the blanket
//! implementations below.

mod deform;
mod warp;
