pub mod gpu;
pub mod headless;
pub mod ui;

pub use self::gpu::{Sampler, SamplerDriver, SamplerError, SamplerId, SamplerInfo};
pub use self::headless::{HeadlessConfig, HeadlessContext};
pub use self::ui::{DrawError, Mesh, MeshWidget, Widget};
