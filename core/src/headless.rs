//! CPU side emulation of the sampler object API.
//!
//! Tracks every live object together with its parameters and the sampler
//! bound to each texture unit, and validates input the way a GL driver does.
//! Nothing is ever rasterized.

use std::cell::RefCell;
use std::collections::HashMap;

use log::trace;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::gpu::gl::{self, GLenum, GLfloat, GLint};
use crate::gpu::{SamplerDriver, SamplerError, SamplerId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadlessConfig {
  pub max_texture_units: u32,
  /// `None` behaves like a context without anisotropic filtering support.
  pub max_anisotropy: Option<f32>,
  /// Allocation fails once this many objects are alive.
  pub max_samplers: Option<usize>,
}

impl Default for HeadlessConfig {
  fn default() -> Self {
    Self {
      max_texture_units: 16,
      max_anisotropy: Some(16.0),
      max_samplers: None,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ParamValue {
  Int(GLint),
  Float(GLfloat),
}

impl ParamValue {
  fn as_int(self) -> GLint {
    match self {
      ParamValue::Int(value) => value,
      ParamValue::Float(value) => value.round() as GLint,
    }
  }

  fn as_float(self) -> GLfloat {
    match self {
      ParamValue::Int(value) => value as GLfloat,
      ParamValue::Float(value) => value,
    }
  }
}

struct SamplerState {
  params: HashMap<GLenum, ParamValue>,
}

impl SamplerState {
  fn new() -> Self {
    let mut params = HashMap::new();
    params.insert(gl::TEXTURE_MIN_FILTER, ParamValue::Int(gl::NEAREST_MIPMAP_LINEAR as GLint));
    params.insert(gl::TEXTURE_MAG_FILTER, ParamValue::Int(gl::LINEAR as GLint));
    params.insert(gl::TEXTURE_WRAP_S, ParamValue::Int(gl::REPEAT as GLint));
    params.insert(gl::TEXTURE_WRAP_T, ParamValue::Int(gl::REPEAT as GLint));
    params.insert(gl::TEXTURE_WRAP_R, ParamValue::Int(gl::REPEAT as GLint));
    params.insert(gl::TEXTURE_MIN_LOD, ParamValue::Float(-1000.0));
    params.insert(gl::TEXTURE_MAX_LOD, ParamValue::Float(1000.0));
    params.insert(gl::TEXTURE_LOD_BIAS, ParamValue::Float(0.0));
    params.insert(gl::TEXTURE_COMPARE_MODE, ParamValue::Int(gl::NONE as GLint));
    params.insert(gl::TEXTURE_COMPARE_FUNC, ParamValue::Int(gl::LEQUAL as GLint));
    params.insert(gl::TEXTURE_MAX_ANISOTROPY_EXT, ParamValue::Float(1.0));
    Self { params }
  }
}

struct HeadlessState {
  next_id: u32,
  samplers: HashMap<SamplerId, SamplerState>,
  units: SmallVec<[Option<SamplerId>; 16]>,
  created: usize,
  deleted: usize,
}

pub struct HeadlessContext {
  config: HeadlessConfig,
  state: RefCell<HeadlessState>,
}

impl Default for HeadlessContext {
  fn default() -> Self {
    Self::new(HeadlessConfig::default())
  }
}

impl HeadlessContext {
  pub fn new(config: HeadlessConfig) -> Self {
    let units = SmallVec::from_elem(None, config.max_texture_units as usize);
    Self {
      config,
      state: RefCell::new(HeadlessState {
        next_id: 1,
        samplers: HashMap::new(),
        units,
        created: 0,
        deleted: 0,
      }),
    }
  }

  pub fn config(&self) -> &HeadlessConfig {
    &self.config
  }

  pub fn live_samplers(&self) -> usize {
    self.state.borrow().samplers.len()
  }

  pub fn created_count(&self) -> usize {
    self.state.borrow().created
  }

  pub fn deleted_count(&self) -> usize {
    self.state.borrow().deleted
  }

  pub fn is_sampler(&self, sampler: SamplerId) -> bool {
    self.state.borrow().samplers.contains_key(&sampler)
  }

  /// Sampler overriding `texture_unit`, `None` for units out of range too.
  pub fn bound_sampler(&self, texture_unit: u32) -> Option<SamplerId> {
    self.state.borrow().units.get(texture_unit as usize).copied().flatten()
  }

  fn validate(&self, name: GLenum, value: ParamValue) -> Result<ParamValue, SamplerError> {
    let invalid_enum = SamplerError::InvalidEnum { name, value: value.as_float() };
    let as_enum = || value.as_int() as GLenum;
    match name {
      gl::TEXTURE_MIN_FILTER if gl::is_min_filter(as_enum()) => Ok(ParamValue::Int(value.as_int())),
      gl::TEXTURE_MAG_FILTER if gl::is_mag_filter(as_enum()) => Ok(ParamValue::Int(value.as_int())),
      gl::TEXTURE_WRAP_S | gl::TEXTURE_WRAP_T | gl::TEXTURE_WRAP_R if gl::is_wrap_mode(as_enum()) => Ok(ParamValue::Int(value.as_int())),
      gl::TEXTURE_COMPARE_MODE if matches!(as_enum(), gl::NONE | gl::COMPARE_REF_TO_TEXTURE) => Ok(ParamValue::Int(value.as_int())),
      gl::TEXTURE_COMPARE_FUNC if gl::is_compare_func(as_enum()) => Ok(ParamValue::Int(value.as_int())),
      gl::TEXTURE_MIN_LOD | gl::TEXTURE_MAX_LOD | gl::TEXTURE_LOD_BIAS => Ok(ParamValue::Float(value.as_float())),
      gl::TEXTURE_MAX_ANISOTROPY_EXT => {
        let max = self.config.max_anisotropy.ok_or(invalid_enum)?;
        let anisotropy = value.as_float();
        if anisotropy < 1.0 {
          return Err(SamplerError::InvalidValue);
        }
        Ok(ParamValue::Float(anisotropy.min(max)))
      }
      _ => Err(invalid_enum),
    }
  }

  fn set_parameter(&self, sampler: SamplerId, name: GLenum, value: ParamValue) -> Result<(), SamplerError> {
    let value = self.validate(name, value)?;
    let mut state = self.state.borrow_mut();
    let sampler_state = state.samplers.get_mut(&sampler).ok_or(SamplerError::InvalidOperation)?;
    sampler_state.params.insert(name, value);
    Ok(())
  }

  fn get_parameter(&self, sampler: SamplerId, name: GLenum) -> Result<ParamValue, SamplerError> {
    let state = self.state.borrow();
    let sampler_state = state.samplers.get(&sampler).ok_or(SamplerError::InvalidOperation)?;
    sampler_state.params.get(&name).copied().ok_or(SamplerError::InvalidEnum { name, value: 0.0 })
  }
}

impl SamplerDriver for HeadlessContext {
  fn create_sampler(&self) -> Result<SamplerId, SamplerError> {
    let mut state = self.state.borrow_mut();
    if let Some(max_samplers) = self.config.max_samplers {
      if state.samplers.len() >= max_samplers {
        return Err(SamplerError::AllocationFailed);
      }
    }
    let id = SamplerId::new(state.next_id).ok_or(SamplerError::AllocationFailed)?;
    state.next_id = state.next_id.checked_add(1).ok_or(SamplerError::AllocationFailed)?;
    state.samplers.insert(id, SamplerState::new());
    state.created += 1;
    Ok(id)
  }

  fn delete_sampler(&self, sampler: SamplerId) -> Result<(), SamplerError> {
    let mut state = self.state.borrow_mut();
    if state.samplers.remove(&sampler).is_none() {
      // glDeleteSamplers silently ignores names that aren't samplers
      trace!("Ignoring delete of unknown sampler {}", sampler);
      return Ok(());
    }
    state.deleted += 1;
    for unit in state.units.iter_mut() {
      if *unit == Some(sampler) {
        *unit = None;
      }
    }
    Ok(())
  }

  fn sampler_parameter_i(&self, sampler: SamplerId, name: GLenum, value: GLint) -> Result<(), SamplerError> {
    self.set_parameter(sampler, name, ParamValue::Int(value))
  }

  fn sampler_parameter_f(&self, sampler: SamplerId, name: GLenum, value: GLfloat) -> Result<(), SamplerError> {
    self.set_parameter(sampler, name, ParamValue::Float(value))
  }

  fn get_sampler_parameter_i(&self, sampler: SamplerId, name: GLenum) -> Result<GLint, SamplerError> {
    self.get_parameter(sampler, name).map(ParamValue::as_int)
  }

  fn get_sampler_parameter_f(&self, sampler: SamplerId, name: GLenum) -> Result<GLfloat, SamplerError> {
    self.get_parameter(sampler, name).map(ParamValue::as_float)
  }

  fn bind_sampler(&self, texture_unit: u32, sampler: Option<SamplerId>) -> Result<(), SamplerError> {
    let mut state = self.state.borrow_mut();
    if let Some(sampler) = sampler {
      if !state.samplers.contains_key(&sampler) {
        return Err(SamplerError::InvalidOperation);
      }
    }
    let unit = state.units.get_mut(texture_unit as usize).ok_or(SamplerError::InvalidValue)?;
    *unit = sampler;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn new_objects_carry_gl_defaults() {
    let context = HeadlessContext::default();
    let id = context.create_sampler().unwrap();
    assert_eq!(context.get_sampler_parameter_i(id, gl::TEXTURE_MIN_FILTER).unwrap(), gl::NEAREST_MIPMAP_LINEAR as GLint);
    assert_eq!(context.get_sampler_parameter_i(id, gl::TEXTURE_WRAP_R).unwrap(), gl::REPEAT as GLint);
    assert_eq!(context.get_sampler_parameter_f(id, gl::TEXTURE_MIN_LOD).unwrap(), -1000.0);
    assert_eq!(context.get_sampler_parameter_i(id, gl::TEXTURE_COMPARE_FUNC).unwrap(), gl::LEQUAL as GLint);
  }

  #[test]
  fn ids_are_never_reused() {
    let context = HeadlessContext::default();
    let first = context.create_sampler().unwrap();
    context.delete_sampler(first).unwrap();
    let second = context.create_sampler().unwrap();
    assert_ne!(first, second);
    assert!(!context.is_sampler(first));
    assert!(context.is_sampler(second));
  }

  #[test]
  fn unknown_names_and_values_are_rejected() {
    let context = HeadlessContext::default();
    let id = context.create_sampler().unwrap();
    assert!(matches!(
      context.sampler_parameter_i(id, 0x1234, 0),
      Err(SamplerError::InvalidEnum { name: 0x1234, .. })
    ));
    assert!(matches!(
      context.sampler_parameter_i(id, gl::TEXTURE_WRAP_S, gl::LINEAR as GLint),
      Err(SamplerError::InvalidEnum { .. })
    ));
    assert_eq!(context.sampler_parameter_f(id, gl::TEXTURE_MAX_ANISOTROPY_EXT, 0.5), Err(SamplerError::InvalidValue));
  }

  #[test]
  fn float_and_int_reads_convert() {
    let context = HeadlessContext::default();
    let id = context.create_sampler().unwrap();
    context.sampler_parameter_f(id, gl::TEXTURE_MAX_LOD, 3.6).unwrap();
    assert_eq!(context.get_sampler_parameter_i(id, gl::TEXTURE_MAX_LOD).unwrap(), 4);
    context.sampler_parameter_f(id, gl::TEXTURE_MAG_FILTER, gl::NEAREST as GLfloat).unwrap();
    assert_eq!(context.get_sampler_parameter_i(id, gl::TEXTURE_MAG_FILTER).unwrap(), gl::NEAREST as GLint);
    assert_eq!(context.get_sampler_parameter_f(id, gl::TEXTURE_MAG_FILTER).unwrap(), gl::NEAREST as GLfloat);
  }

  #[test]
  fn anisotropy_is_clamped_to_limit() {
    let context = HeadlessContext::new(HeadlessConfig {
      max_anisotropy: Some(4.0),
      ..Default::default()
    });
    let id = context.create_sampler().unwrap();
    context.sampler_parameter_f(id, gl::TEXTURE_MAX_ANISOTROPY_EXT, 16.0).unwrap();
    assert_eq!(context.get_sampler_parameter_f(id, gl::TEXTURE_MAX_ANISOTROPY_EXT).unwrap(), 4.0);
  }

  #[test]
  fn deleted_objects_reject_parameters() {
    let context = HeadlessContext::default();
    let id = context.create_sampler().unwrap();
    context.delete_sampler(id).unwrap();
    assert_eq!(context.sampler_parameter_i(id, gl::TEXTURE_MIN_FILTER, gl::LINEAR as GLint), Err(SamplerError::InvalidOperation));
    assert_eq!(context.get_sampler_parameter_f(id, gl::TEXTURE_MIN_LOD), Err(SamplerError::InvalidOperation));
    assert_eq!(context.bind_sampler(0, Some(id)), Err(SamplerError::InvalidOperation));
  }

  #[test]
  fn units_are_bounded() {
    let context = HeadlessContext::new(HeadlessConfig {
      max_texture_units: 2,
      ..Default::default()
    });
    let id = context.create_sampler().unwrap();
    context.bind_sampler(1, Some(id)).unwrap();
    assert_eq!(context.bind_sampler(2, Some(id)), Err(SamplerError::InvalidValue));
    assert_eq!(context.bound_sampler(2), None);
  }

  #[test]
  fn delete_clears_every_binding() {
    let context = HeadlessContext::default();
    let id = context.create_sampler().unwrap();
    context.bind_sampler(0, Some(id)).unwrap();
    context.bind_sampler(5, Some(id)).unwrap();
    context.delete_sampler(id).unwrap();
    assert_eq!(context.bound_sampler(0), None);
    assert_eq!(context.bound_sampler(5), None);
    assert_eq!(context.deleted_count(), 1);
  }

  #[test]
  fn allocation_limit() {
    let context = HeadlessContext::new(HeadlessConfig {
      max_samplers: Some(1),
      ..Default::default()
    });
    let id = context.create_sampler().unwrap();
    assert_eq!(context.create_sampler(), Err(SamplerError::AllocationFailed));
    context.delete_sampler(id).unwrap();
    assert!(context.create_sampler().is_ok());
  }
}
