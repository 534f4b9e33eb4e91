//! View state: the zoom/pan transform, pointer mapping, zoom animation and
//! surface geometry.

pub mod mapper;
pub mod transform;
pub mod viewport;
pub mod zoom;

pub use mapper::{SurfaceRect, to_client, to_logical};
pub use transform::{ViewTransform, ZoomBounds};
pub use viewport::ViewportManager;
pub use zoom::{FrameRequest, ZoomAnchor, ZoomController, ZoomDirection, ZoomSettings};
