/// Chart layer: fixed axis layout and per-frame line data.
///
/// ```text
///   ClimateDataset
///        │
///        ├──► layout   axis ranges + x ticks, computed once
///        │
///        └──► frame    FrameUpdater: rows 0..=f → LineBuffers + Annotation
/// ```

pub mod frame;
pub mod layout;

pub use frame::{Axis, FrameState, FrameUpdater, LineStyle};
pub use layout::ChartLayout;
