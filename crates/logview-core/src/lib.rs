// File: crates/logview-core/src/lib.rs
// Summary: Core library entry point; gap-aware downsampling, render binding and
//          linked depth tracks, independent of any rendering technology.

pub mod allocate;
pub mod axis;
pub mod binding;
pub mod chart;
pub mod config;
pub mod correlation;
pub mod downsample;
pub mod error;
pub mod overlay;
pub mod registry;
pub mod renderer;
pub mod scale;
pub mod scheduler;
pub mod series;
pub mod source;
pub mod types;
pub mod view;

pub use allocate::allocate_budget;
pub use axis::{Axis, AxisSet, BoundsPolicy, ScaleKind};
pub use binding::{BindingData, RenderBinding};
pub use chart::ChartView;
pub use config::{Orientation, PresentationConfig, Rgba};
pub use correlation::{CorrelationPanel, CurveSpec, PanelOverlay, WellSpec, TRACK_INSETS};
pub use downsample::{downsample_segment, downsample_series, lttb, lttb_indices};
pub use error::{ChartError, Result};
pub use overlay::{OverlayLine, WellTop};
pub use registry::{ChartSurface, CursorEvent, LinkGroupRegistry, Subscription, SyncOptions, ViewportEvent};
pub use renderer::{ChartOptions, Gesture, RendererAdapter, RendererEvent, RendererHandle, SharedRenderer};
pub use scale::AxisScale;
pub use series::{DepthRange, Sample, Segment, SegmentedSeries};
pub use source::{DataSource, MemorySource};
pub use types::{ContainerSize, DataPoint, Insets, PixelPoint};
pub use view::Viewport;
