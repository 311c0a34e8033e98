use std::ops::Deref;

use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};

use web_sys::{HtmlCanvasElement, WebGl2RenderingContext};

const ANISOTROPIC_FILTERING_EXTENSION: &str = "EXT_texture_filter_anisotropic";

#[derive(Debug, Error)]
pub enum ContextError {
  #[error("WebGL 2 is not available on this canvas")]
  Unavailable,
  #[error("JavaScript error while creating the context: {0}")]
  Js(String),
}

impl From<JsValue> for ContextError {
  fn from(value: JsValue) -> Self {
    ContextError::Js(format!("{:?}", value))
  }
}

pub struct RawWebGLContext {
  context: WebGl2RenderingContext,
  extensions: WebGLExtensions
}

impl PartialEq for RawWebGLContext {
  fn eq(&self, other: &Self) -> bool {
    self.context == other.context
  }
}

impl Eq for RawWebGLContext {}

pub struct WebGLExtensions {
  pub anisotropic_filtering: bool
}

impl RawWebGLContext {
  pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, ContextError> {
    let options = js_sys::Object::new();
    js_sys::Reflect::set(&options, &JsValue::from_str("antialias"), &JsValue::from_bool(false))?;
    let context_obj = canvas.get_context_with_context_options("webgl2", &options)?
      .ok_or(ContextError::Unavailable)?;
    let context = context_obj.dyn_into::<WebGl2RenderingContext>()
      .map_err(|_| ContextError::Unavailable)?;

    // getExtension enables the extension as a side effect
    let anisotropic_filtering = context.get_extension(ANISOTROPIC_FILTERING_EXTENSION)?.is_some();
    log::info!("Created WebGL 2 context, anisotropic filtering: {}", anisotropic_filtering);

    Ok(Self {
      context,
      extensions: WebGLExtensions {
        anisotropic_filtering
      }
    })
  }

  pub fn extensions(&self) -> &WebGLExtensions {
    &self.extensions
  }
}

impl Deref for RawWebGLContext {
  type Target = WebGl2RenderingContext;

  fn deref(&self) -> &Self::Target {
    &self.context
  }
}
