//! Common types shared across the part rendering services.

pub mod edge;
pub mod error;
pub mod request;

pub use edge::{EdgeSelection, EdgeType, EdgeTypeFlags, Toggle};
pub use error::{ParamError, ParamResult};
pub use request::{parse_render_request, RenderParams, RenderRequest};
