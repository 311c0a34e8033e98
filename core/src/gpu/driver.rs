use std::fmt;
use std::num::NonZeroU32;

use super::gl::{GLenum, GLfloat, GLint};
use super::SamplerError;

/// Name of a live driver-side sampler object. Zero is reserved for
/// "no sampler" and can't be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SamplerId(NonZeroU32);

impl SamplerId {
  pub fn new(raw: u32) -> Option<Self> {
    NonZeroU32::new(raw).map(SamplerId)
  }

  pub fn get(self) -> u32 {
    self.0.get()
  }
}

impl fmt::Display for SamplerId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// The part of a graphics context that deals with sampler objects.
///
/// Every call is a synchronous driver call that has to happen on the thread
/// that owns the context, which is why everything takes `&self`.
pub trait SamplerDriver {
  fn create_sampler(&self) -> Result<SamplerId, SamplerError>;
  fn delete_sampler(&self, sampler: SamplerId) -> Result<(), SamplerError>;

  fn sampler_parameter_i(&self, sampler: SamplerId, name: GLenum, value: GLint) -> Result<(), SamplerError>;
  fn sampler_parameter_f(&self, sampler: SamplerId, name: GLenum, value: GLfloat) -> Result<(), SamplerError>;
  fn get_sampler_parameter_i(&self, sampler: SamplerId, name: GLenum) -> Result<GLint, SamplerError>;
  fn get_sampler_parameter_f(&self, sampler: SamplerId, name: GLenum) -> Result<GLfloat, SamplerError>;

  /// `None` removes the override so the unit samples with the state
  /// embedded in its texture.
  fn bind_sampler(&self, texture_unit: u32, sampler: Option<SamplerId>) -> Result<(), SamplerError>;
}
