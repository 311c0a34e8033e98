//! Numeric codes shared by every OpenGL flavour (desktop GL, GLES 3, WebGL 2)
//! for the subset of the API that deals with sampler objects.

pub type GLenum = u32;
pub type GLint = i32;
pub type GLfloat = f32;

pub const NO_ERROR: GLenum = 0;
pub const INVALID_ENUM: GLenum = 0x0500;
pub const INVALID_VALUE: GLenum = 0x0501;
pub const INVALID_OPERATION: GLenum = 0x0502;
pub const OUT_OF_MEMORY: GLenum = 0x0505;

// parameter names
pub const TEXTURE_MAG_FILTER: GLenum = 0x2800;
pub const TEXTURE_MIN_FILTER: GLenum = 0x2801;
pub const TEXTURE_WRAP_S: GLenum = 0x2802;
pub const TEXTURE_WRAP_T: GLenum = 0x2803;
pub const TEXTURE_WRAP_R: GLenum = 0x8072;
pub const TEXTURE_MIN_LOD: GLenum = 0x813A;
pub const TEXTURE_MAX_LOD: GLenum = 0x813B;
pub const TEXTURE_LOD_BIAS: GLenum = 0x8501;
pub const TEXTURE_COMPARE_MODE: GLenum = 0x884C;
pub const TEXTURE_COMPARE_FUNC: GLenum = 0x884D;
pub const TEXTURE_MAX_ANISOTROPY_EXT: GLenum = 0x84FE;

// filters
pub const NEAREST: GLenum = 0x2600;
pub const LINEAR: GLenum = 0x2601;
pub const NEAREST_MIPMAP_NEAREST: GLenum = 0x2700;
pub const LINEAR_MIPMAP_NEAREST: GLenum = 0x2701;
pub const NEAREST_MIPMAP_LINEAR: GLenum = 0x2702;
pub const LINEAR_MIPMAP_LINEAR: GLenum = 0x2703;

// wrap modes
pub const REPEAT: GLenum = 0x2901;
pub const CLAMP_TO_BORDER: GLenum = 0x812D;
pub const CLAMP_TO_EDGE: GLenum = 0x812F;
pub const MIRRORED_REPEAT: GLenum = 0x8370;

// depth comparison
pub const NONE: GLenum = 0;
pub const COMPARE_REF_TO_TEXTURE: GLenum = 0x884E;
pub const NEVER: GLenum = 0x0200;
pub const LESS: GLenum = 0x0201;
pub const EQUAL: GLenum = 0x0202;
pub const LEQUAL: GLenum = 0x0203;
pub const GREATER: GLenum = 0x0204;
pub const NOTEQUAL: GLenum = 0x0205;
pub const GEQUAL: GLenum = 0x0206;
pub const ALWAYS: GLenum = 0x0207;

const MAX_PENDING_ERRORS: usize = 32;

/// Reads error flags until the driver reports none so the next check only
/// sees errors of the following call. Returns how many were pending.
pub fn drain_errors(mut get_error: impl FnMut() -> GLenum) -> usize {
  let mut pending = 0;
  while pending < MAX_PENDING_ERRORS && get_error() != NO_ERROR {
    pending += 1;
  }
  pending
}

pub fn is_mag_filter(value: GLenum) -> bool {
  matches!(value, NEAREST | LINEAR)
}

pub fn is_min_filter(value: GLenum) -> bool {
  matches!(value,
    NEAREST | LINEAR
    | NEAREST_MIPMAP_NEAREST | LINEAR_MIPMAP_NEAREST
    | NEAREST_MIPMAP_LINEAR | LINEAR_MIPMAP_LINEAR
  )
}

pub fn is_wrap_mode(value: GLenum) -> bool {
  matches!(value, REPEAT | CLAMP_TO_BORDER | CLAMP_TO_EDGE | MIRRORED_REPEAT)
}

pub fn is_compare_func(value: GLenum) -> bool {
  matches!(value, NEVER | LESS | EQUAL | LEQUAL | GREATER | NOTEQUAL | GEQUAL | ALWAYS)
}
