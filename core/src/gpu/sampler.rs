use std::rc::Rc;

use log::{trace, warn};

use super::gl::{self, GLenum, GLfloat, GLint};
use super::{address_mode_to_gl, compare_func_to_gl, mag_filter_to_gl, min_filter_to_gl, SamplerDriver, SamplerError, SamplerId, SamplerInfo};

const DEFAULT_MAX_LOD: GLfloat = 1000.0;
const DEFAULT_LOD_BIAS: GLfloat = 0.0;
const DEFAULT_MAX_ANISOTROPY: GLfloat = 1.0;

/// Owns one driver-side sampler object.
///
/// A handle starts out invalid and only refers to a driver object between
/// [`Sampler::create`] and [`Sampler::release`]. Dropping a valid handle
/// releases the object.
pub struct Sampler<D: SamplerDriver + ?Sized> {
  context: Rc<D>,
  id: Option<SamplerId>,
}

impl<D: SamplerDriver + ?Sized> Sampler<D> {
  pub fn new(context: &Rc<D>) -> Self {
    Self {
      context: context.clone(),
      id: None,
    }
  }

  /// Creates the driver object and applies `info` to it. The object is
  /// released again if any of the parameters gets rejected.
  pub fn from_info(context: &Rc<D>, info: &SamplerInfo) -> Result<Self, SamplerError> {
    let mut sampler = Self::new(context);
    sampler.create()?;
    sampler.apply_info(info)?;
    Ok(sampler)
  }

  pub fn create(&mut self) -> Result<(), SamplerError> {
    if self.id.is_some() {
      return Err(SamplerError::AlreadyCreated);
    }
    let id = self.context.create_sampler()?;
    trace!("Created sampler {}", id);
    self.id = Some(id);
    Ok(())
  }

  /// Raw name of the driver object, 0 when the handle is invalid.
  pub fn id(&self) -> u32 {
    self.id.map_or(0, SamplerId::get)
  }

  pub fn sampler_id(&self) -> Option<SamplerId> {
    self.id
  }

  pub fn is_valid(&self) -> bool {
    self.id.is_some()
  }

  pub fn context(&self) -> &Rc<D> {
    &self.context
  }

  fn live_id(&self) -> Result<SamplerId, SamplerError> {
    self.id.ok_or(SamplerError::InvalidHandle)
  }

  pub fn set_interpolation_method(&mut self, method: GLenum) -> Result<(), SamplerError> {
    self.set_interpolation_methods(method, method)
  }

  /// Both methods are checked before either is written, so a rejected call
  /// leaves the sampler unchanged.
  pub fn set_interpolation_methods(&mut self, min_method: GLenum, mag_method: GLenum) -> Result<(), SamplerError> {
    self.live_id()?;
    if !gl::is_min_filter(min_method) {
      return Err(SamplerError::InvalidEnum { name: gl::TEXTURE_MIN_FILTER, value: min_method as f32 });
    }
    if !gl::is_mag_filter(mag_method) {
      return Err(SamplerError::InvalidEnum { name: gl::TEXTURE_MAG_FILTER, value: mag_method as f32 });
    }
    self.set_parameter(gl::TEXTURE_MIN_FILTER, min_method as GLint)?;
    self.set_parameter(gl::TEXTURE_MAG_FILTER, mag_method as GLint)
  }

  pub fn set_wrap_method(&mut self, method: GLenum) -> Result<(), SamplerError> {
    self.set_wrap_methods(method, method, method)
  }

  pub fn set_wrap_methods(&mut self, method_s: GLenum, method_t: GLenum, method_r: GLenum) -> Result<(), SamplerError> {
    self.set_parameter(gl::TEXTURE_WRAP_S, method_s as GLint)?;
    self.set_parameter(gl::TEXTURE_WRAP_T, method_t as GLint)?;
    self.set_parameter(gl::TEXTURE_WRAP_R, method_r as GLint)
  }

  pub fn set_parameter(&mut self, name: GLenum, value: GLint) -> Result<(), SamplerError> {
    let id = self.live_id()?;
    self.context.sampler_parameter_i(id, name, value)
  }

  pub fn set_parameter_f(&mut self, name: GLenum, value: GLfloat) -> Result<(), SamplerError> {
    let id = self.live_id()?;
    self.context.sampler_parameter_f(id, name, value)
  }

  pub fn parameter(&self, name: GLenum) -> Result<GLint, SamplerError> {
    let id = self.live_id()?;
    self.context.get_sampler_parameter_i(id, name)
  }

  pub fn parameter_f(&self, name: GLenum) -> Result<GLfloat, SamplerError> {
    let id = self.live_id()?;
    self.context.get_sampler_parameter_f(id, name)
  }

  pub fn apply_info(&mut self, info: &SamplerInfo) -> Result<(), SamplerError> {
    self.set_interpolation_methods(
      min_filter_to_gl(info.min_filter, info.mip_filter),
      mag_filter_to_gl(info.mag_filter)
    )?;
    self.set_wrap_methods(
      address_mode_to_gl(info.address_mode_u),
      address_mode_to_gl(info.address_mode_v),
      address_mode_to_gl(info.address_mode_w)
    )?;
    self.set_parameter_f(gl::TEXTURE_MIN_LOD, info.min_lod)?;
    self.set_parameter_f(gl::TEXTURE_MAX_LOD, info.max_lod.unwrap_or(DEFAULT_MAX_LOD))?;
    self.set_extension_parameter_f(gl::TEXTURE_LOD_BIAS, info.mip_bias, DEFAULT_LOD_BIAS)?;
    self.set_extension_parameter_f(gl::TEXTURE_MAX_ANISOTROPY_EXT, info.max_anisotropy, DEFAULT_MAX_ANISOTROPY)?;
    match info.compare_op {
      Some(compare_op) => {
        self.set_parameter(gl::TEXTURE_COMPARE_MODE, gl::COMPARE_REF_TO_TEXTURE as GLint)?;
        self.set_parameter(gl::TEXTURE_COMPARE_FUNC, compare_func_to_gl(compare_op) as GLint)
      }
      None => self.set_parameter(gl::TEXTURE_COMPARE_MODE, gl::NONE as GLint)
    }
  }

  // WebGL 2 rejects these parameters unless an extension provides them, so
  // they are only written when either the target or the current value
  // differs from the default. A failed read means the driver lacks them.
  fn set_extension_parameter_f(&mut self, name: GLenum, value: GLfloat, default: GLfloat) -> Result<(), SamplerError> {
    let current = self.parameter_f(name).unwrap_or(default);
    if value == default && current == default {
      return Ok(());
    }
    self.set_parameter_f(name, value)
  }

  /// Does nothing if the handle is invalid.
  pub fn bind(&self, texture_unit: u32) -> Result<(), SamplerError> {
    match self.id {
      Some(id) => self.context.bind_sampler(texture_unit, Some(id)),
      None => {
        trace!("Ignoring bind of invalid sampler to unit {}", texture_unit);
        Ok(())
      }
    }
  }

  /// Binds the sampler until the returned guard is dropped.
  pub fn bind_scoped(&self, texture_unit: u32) -> Result<BoundSampler<'_, D>, SamplerError> {
    self.bind(texture_unit)?;
    Ok(BoundSampler {
      context: &*self.context,
      texture_unit,
      active: self.id.is_some(),
    })
  }

  /// Clears whatever sampler overrides `texture_unit`.
  pub fn unbind(context: &D, texture_unit: u32) -> Result<(), SamplerError> {
    context.bind_sampler(texture_unit, None)
  }

  /// Idempotent. The handle is invalid afterwards even if the driver
  /// reported an error.
  pub fn release(&mut self) -> Result<(), SamplerError> {
    match self.id.take() {
      Some(id) => {
        trace!("Releasing sampler {}", id);
        self.context.delete_sampler(id)
      }
      None => Ok(())
    }
  }
}

impl<D: SamplerDriver + ?Sized> Drop for Sampler<D> {
  fn drop(&mut self) {
    if let Err(e) = self.release() {
      warn!("Failed to release sampler: {}", e);
    }
  }
}

pub struct BoundSampler<'a, D: SamplerDriver + ?Sized> {
  context: &'a D,
  texture_unit: u32,
  active: bool,
}

impl<'a, D: SamplerDriver + ?Sized> BoundSampler<'a, D> {
  pub fn texture_unit(&self) -> u32 {
    self.texture_unit
  }
}

impl<'a, D: SamplerDriver + ?Sized> Drop for BoundSampler<'a, D> {
  fn drop(&mut self) {
    if !self.active {
      return;
    }
    if let Err(e) = self.context.bind_sampler(self.texture_unit, None) {
      warn!("Failed to unbind sampler from unit {}: {}", self.texture_unit, e);
    }
  }
}

/// Stands for "no sampler": units bound to it sample with the state
/// embedded in their texture. It has no driver object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NullSampler;

pub const NULL_SAMPLER: NullSampler = NullSampler;

impl NullSampler {
  pub fn id(&self) -> u32 {
    0
  }

  pub fn bind<D: SamplerDriver + ?Sized>(&self, context: &D, texture_unit: u32) -> Result<(), SamplerError> {
    context.bind_sampler(texture_unit, None)
  }
}
