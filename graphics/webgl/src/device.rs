use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::ops::Deref;

use log::{trace, warn};
use meshview_core::gpu::gl::{self, GLenum, GLfloat, GLint};
use meshview_core::gpu::{SamplerDriver, SamplerError, SamplerId};
use web_sys::{HtmlCanvasElement, WebGl2RenderingContext, WebGlSampler};

use crate::raw_context::{ContextError, RawWebGLContext};

/// WebGL hands out sampler objects instead of integer names, so the device
/// keeps the mapping from the ids given to [`meshview_core::Sampler`].
pub struct WebGLDevice {
  context: RawWebGLContext,
  samplers: RefCell<HashMap<SamplerId, WebGlSampler>>,
  next_sampler_id: Cell<u32>,
}

impl WebGLDevice {
  pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, ContextError> {
    Ok(Self {
      context: RawWebGLContext::new(canvas)?,
      samplers: RefCell::new(HashMap::new()),
      next_sampler_id: Cell::new(1),
    })
  }

  pub fn context(&self) -> &RawWebGLContext {
    &self.context
  }

  // GL error flags stick until read; clear them so `check_error` only
  // reports what the following call caused.
  fn clear_errors(&self) {
    let stale = gl::drain_errors(|| self.context.get_error());
    if stale > 0 {
      warn!("Discarded {} stale GL errors", stale);
    }
  }

  fn check_error(&self, name: GLenum, value: f32) -> Result<(), SamplerError> {
    match SamplerError::from_gl_error(self.context.get_error(), name, value) {
      Some(e) => Err(e),
      None => Ok(())
    }
  }

  fn with_sampler<T>(&self, sampler: SamplerId, f: impl FnOnce(&WebGlSampler) -> T) -> Result<T, SamplerError> {
    let samplers = self.samplers.borrow();
    let gl_sampler = samplers.get(&sampler).ok_or(SamplerError::InvalidOperation)?;
    Ok(f(gl_sampler))
  }
}

impl SamplerDriver for WebGLDevice {
  fn create_sampler(&self) -> Result<SamplerId, SamplerError> {
    let gl_sampler = self.context.create_sampler().ok_or(SamplerError::AllocationFailed)?;
    let id = SamplerId::new(self.next_sampler_id.get()).ok_or(SamplerError::AllocationFailed)?;
    self.next_sampler_id.set(id.get().checked_add(1).ok_or(SamplerError::AllocationFailed)?);
    self.samplers.borrow_mut().insert(id, gl_sampler);
    trace!("Created WebGL sampler {}", id);
    Ok(id)
  }

  fn delete_sampler(&self, sampler: SamplerId) -> Result<(), SamplerError> {
    let gl_sampler = self.samplers.borrow_mut().remove(&sampler);
    match gl_sampler {
      Some(gl_sampler) => {
        self.clear_errors();
        self.context.delete_sampler(Some(&gl_sampler));
        self.check_error(0, 0.0)
      }
      None => {
        warn!("Deleting unknown sampler {}", sampler);
        Ok(())
      }
    }
  }

  fn sampler_parameter_i(&self, sampler: SamplerId, name: GLenum, value: GLint) -> Result<(), SamplerError> {
    if name == gl::TEXTURE_MAX_ANISOTROPY_EXT && !self.context.extensions().anisotropic_filtering {
      return Err(SamplerError::InvalidEnum { name, value: value as f32 });
    }
    self.clear_errors();
    self.with_sampler(sampler, |gl_sampler| self.context.sampler_parameteri(gl_sampler, name, value))?;
    self.check_error(name, value as f32)
  }

  fn sampler_parameter_f(&self, sampler: SamplerId, name: GLenum, value: GLfloat) -> Result<(), SamplerError> {
    if name == gl::TEXTURE_MAX_ANISOTROPY_EXT && !self.context.extensions().anisotropic_filtering {
      return Err(SamplerError::InvalidEnum { name, value });
    }
    self.clear_errors();
    self.with_sampler(sampler, |gl_sampler| self.context.sampler_parameterf(gl_sampler, name, value))?;
    self.check_error(name, value)
  }

  fn get_sampler_parameter_i(&self, sampler: SamplerId, name: GLenum) -> Result<GLint, SamplerError> {
    self.clear_errors();
    let value = self.with_sampler(sampler, |gl_sampler| self.context.get_sampler_parameter(gl_sampler, name))?;
    self.check_error(name, 0.0)?;
    let number = value.as_f64().ok_or(SamplerError::InvalidEnum { name, value: 0.0 })?;
    Ok(number.round() as GLint)
  }

  fn get_sampler_parameter_f(&self, sampler: SamplerId, name: GLenum) -> Result<GLfloat, SamplerError> {
    self.clear_errors();
    let value = self.with_sampler(sampler, |gl_sampler| self.context.get_sampler_parameter(gl_sampler, name))?;
    self.check_error(name, 0.0)?;
    let number = value.as_f64().ok_or(SamplerError::InvalidEnum { name, value: 0.0 })?;
    Ok(number as GLfloat)
  }

  fn bind_sampler(&self, texture_unit: u32, sampler: Option<SamplerId>) -> Result<(), SamplerError> {
    self.clear_errors();
    match sampler {
      Some(sampler) => self.with_sampler(sampler, |gl_sampler| self.context.bind_sampler(texture_unit, Some(gl_sampler)))?,
      None => self.context.bind_sampler(texture_unit, None),
    }
    self.check_error(0, 0.0)
  }
}

impl Drop for WebGLDevice {
  fn drop(&mut self) {
    for (_, gl_sampler) in self.samplers.get_mut().drain() {
      self.context.delete_sampler(Some(&gl_sampler));
    }
  }
}

impl Deref for WebGLDevice {
  type Target = WebGl2RenderingContext;

  fn deref(&self) -> &Self::Target {
    &self.context
  }
}
