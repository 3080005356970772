//! Stage observation for augmentation pipelines.
//!
//! The driver and composer report each completed pipeline stage through an
//! injected callback instead of global logging. The default observer is a
//! no-op; callers wanting progress reporting, tracing, or timing metrics
//! implement [`StageObserver`] and pass it to the `_observed` entry points.

use std::time::Duration;

/// Callback invoked once per completed pipeline stage.
///
/// Stage names are `identity`, `elastic`, `rotation`, `upscale` (only when
/// the field is built subsampled) and `warp` (once per volume pair).
pub trait StageObserver {
    /// Report a completed stage and its wall-clock duration.
    fn on_stage(&mut self, name: &str, elapsed: Duration);
}

/// Observer that ignores all stages.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl StageObserver for NullObserver {
    fn on_stage(&mut self, _name: &str, _elapsed: Duration) {}
}
