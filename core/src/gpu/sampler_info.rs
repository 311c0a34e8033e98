use serde::{Deserialize, Serialize};

use super::gl::{self, GLenum};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Filter {
  Linear,
  Nearest,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum AddressMode {
  Repeat,
  MirroredRepeat,
  ClampToEdge,
  ClampToBorder
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum CompareFunc {
  Never,
  Less,
  LessEqual,
  Equal,
  NotEqual,
  GreaterEqual,
  Greater,
  Always
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerInfo {
  pub mag_filter: Filter,
  pub min_filter: Filter,
  pub mip_filter: Filter,
  pub address_mode_u: AddressMode,
  pub address_mode_v: AddressMode,
  pub address_mode_w: AddressMode,
  pub mip_bias: f32,
  pub max_anisotropy: f32,
  pub compare_op: Option<CompareFunc>,
  pub min_lod: f32,
  pub max_lod: Option<f32>,
}

impl Default for SamplerInfo {
  fn default() -> Self {
    Self {
      mag_filter: Filter::Linear,
      min_filter: Filter::Linear,
      mip_filter: Filter::Linear,
      address_mode_u: AddressMode::Repeat,
      address_mode_v: AddressMode::Repeat,
      address_mode_w: AddressMode::Repeat,
      mip_bias: 0.0,
      max_anisotropy: 1.0,
      compare_op: None,
      min_lod: 0.0,
      max_lod: None,
    }
  }
}

pub fn address_mode_to_gl(address_mode: AddressMode) -> GLenum {
  match address_mode {
    AddressMode::ClampToBorder => gl::CLAMP_TO_BORDER,
    AddressMode::ClampToEdge => gl::CLAMP_TO_EDGE,
    AddressMode::Repeat => gl::REPEAT,
    AddressMode::MirroredRepeat => gl::MIRRORED_REPEAT
  }
}

pub fn mag_filter_to_gl(filter: Filter) -> GLenum {
  match filter {
    Filter::Linear => gl::LINEAR,
    Filter::Nearest => gl::NEAREST,
  }
}

pub fn min_filter_to_gl(filter: Filter, mip_filter: Filter) -> GLenum {
  match (filter, mip_filter) {
    (Filter::Linear, Filter::Linear) => gl::LINEAR_MIPMAP_LINEAR,
    (Filter::Linear, Filter::Nearest) => gl::LINEAR_MIPMAP_NEAREST,
    (Filter::Nearest, Filter::Linear) => gl::NEAREST_MIPMAP_LINEAR,
    (Filter::Nearest, Filter::Nearest) => gl::NEAREST_MIPMAP_NEAREST,
  }
}

pub fn compare_func_to_gl(compare_func: CompareFunc) -> GLenum {
  match compare_func {
    CompareFunc::Never => gl::NEVER,
    CompareFunc::Less => gl::LESS,
    CompareFunc::LessEqual => gl::LEQUAL,
    CompareFunc::Equal => gl::EQUAL,
    CompareFunc::NotEqual => gl::NOTEQUAL,
    CompareFunc::GreaterEqual => gl::GEQUAL,
    CompareFunc::Greater => gl::GREATER,
    CompareFunc::Always => gl::ALWAYS,
  }
}
