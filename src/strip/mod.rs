//! LED strips: packed pixels, the sink port, and the shared-resource lock.

pub mod pixel;
pub mod resource;
pub mod sink;

pub use pixel::ColorOrder;
pub use resource::{LedStrip, Ownership, StripGuard};
pub use sink::{NullSink, PixelSink};
