mod device;
mod raw_context;

pub use device::WebGLDevice;
pub use raw_context::{ContextError, RawWebGLContext, WebGLExtensions};
