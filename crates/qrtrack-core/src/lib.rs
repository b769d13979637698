pub mod collab;
pub mod compose;
pub mod error;
pub mod geometry;
pub mod payload;
pub mod scan_loop;

pub use collab::{Analyzer, DisplaySurface, SessionController};
pub use compose::{CategoryColors, Overlay, OverlayOptions, border_only, compose, compose_snapshot};
pub use error::SurfaceError;
pub use geometry::{RectF, Transform, compute_transform, map_rect};
pub use scan_loop::{OverlayState, ScanLoopController, ScanSettings, SingleShotPhase};

#[cfg(test)]
mod tests;
