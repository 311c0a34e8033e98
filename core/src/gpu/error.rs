use thiserror::Error;

use super::gl::{self, GLenum};

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SamplerError {
  #[error("the driver could not allocate a sampler object")]
  AllocationFailed,
  #[error("the sampler object has already been created")]
  AlreadyCreated,
  #[error("the sampler handle does not refer to a live sampler object")]
  InvalidHandle,
  #[error("invalid enum for sampler parameter {name:#06x}: {value}")]
  InvalidEnum { name: GLenum, value: f32 },
  #[error("invalid value")]
  InvalidValue,
  #[error("invalid operation")]
  InvalidOperation,
  #[error("driver error {0:#06x}")]
  Driver(GLenum),
}

impl SamplerError {
  /// Maps an error code reported by `glGetError` to an error.
  /// Returns `None` for `GL_NO_ERROR`.
  pub fn from_gl_error(code: GLenum, name: GLenum, value: f32) -> Option<Self> {
    match code {
      gl::NO_ERROR => None,
      gl::INVALID_ENUM => Some(SamplerError::InvalidEnum { name, value }),
      gl::INVALID_VALUE => Some(SamplerError::InvalidValue),
      gl::INVALID_OPERATION => Some(SamplerError::InvalidOperation),
      other => Some(SamplerError::Driver(other))
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn gl_error_codes_map_to_variants() {
    assert_eq!(SamplerError::from_gl_error(gl::NO_ERROR, gl::TEXTURE_MIN_FILTER, 0.0), None);
    assert_eq!(
      SamplerError::from_gl_error(gl::INVALID_ENUM, gl::TEXTURE_MIN_FILTER, 7.0),
      Some(SamplerError::InvalidEnum { name: gl::TEXTURE_MIN_FILTER, value: 7.0 })
    );
    assert_eq!(SamplerError::from_gl_error(gl::OUT_OF_MEMORY, 0, 0.0), Some(SamplerError::Driver(gl::OUT_OF_MEMORY)));
  }
}
