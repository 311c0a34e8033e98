pub use self::driver::*;
pub use self::sampler::*;
pub use self::sampler_info::*;
pub use self::error::*;

pub mod gl;
mod driver;
mod sampler;
mod sampler_info;
mod error;
