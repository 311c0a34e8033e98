use std::rc::Rc;

use log::trace;
use thiserror::Error;

use crate::gpu::{Sampler, SamplerDriver, SamplerError, NULL_SAMPLER};

#[derive(Debug, Error)]
pub enum DrawError {
  #[error(transparent)]
  Sampler(#[from] SamplerError),
  #[error("failed to draw mesh: {0}")]
  Mesh(String),
}

/// Anything that can put itself on screen. `order` is the position of the
/// widget in its parent's draw order.
pub trait Widget<D: ?Sized> {
  fn draw(&mut self, context: &D, order: i32) -> Result<(), DrawError>;
}

/// Issues the draw calls for one piece of geometry. Vertex data and shaders
/// are the implementor's business.
pub trait Mesh<D: ?Sized> {
  fn draw(&self, context: &D) -> Result<(), DrawError>;
}

pub struct MeshWidget<D: SamplerDriver + ?Sized, M: Mesh<D> + ?Sized> {
  mesh: Option<Rc<M>>,
  sampler: Option<Rc<Sampler<D>>>,
  texture_unit: u32,
}

impl<D: SamplerDriver + ?Sized, M: Mesh<D> + ?Sized> MeshWidget<D, M> {
  pub fn new(mesh: Option<Rc<M>>) -> Self {
    Self {
      mesh,
      sampler: None,
      texture_unit: 0,
    }
  }

  pub fn set_mesh(&mut self, mesh: Option<Rc<M>>) {
    self.mesh = mesh;
  }

  pub fn mesh(&self) -> Option<&Rc<M>> {
    self.mesh.as_ref()
  }

  /// Without a sampler the texture on `texture_unit` is sampled with its
  /// own state.
  pub fn set_sampler(&mut self, sampler: Option<Rc<Sampler<D>>>, texture_unit: u32) {
    self.sampler = sampler;
    self.texture_unit = texture_unit;
  }

  pub fn sampler(&self) -> Option<&Rc<Sampler<D>>> {
    self.sampler.as_ref()
  }

  pub fn texture_unit(&self) -> u32 {
    self.texture_unit
  }
}

impl<D: SamplerDriver + ?Sized, M: Mesh<D> + ?Sized> Widget<D> for MeshWidget<D, M> {
  fn draw(&mut self, context: &D, order: i32) -> Result<(), DrawError> {
    let mesh = match &self.mesh {
      Some(mesh) => mesh,
      None => {
        trace!("Skipping draw of mesh widget without mesh (order {})", order);
        return Ok(());
      }
    };
    trace!("Drawing mesh widget (order {})", order);

    let _binding = match &self.sampler {
      Some(sampler) => {
        debug_assert!(
          std::ptr::addr_eq(&**sampler.context(), context),
          "sampler belongs to a different context than the one being drawn to"
        );
        Some(sampler.bind_scoped(self.texture_unit)?)
      }
      None => {
        NULL_SAMPLER.bind(context, self.texture_unit)?;
        None
      }
    };
    mesh.draw(context)
  }
}

#[cfg(test)]
mod tests {
  use std::cell::{Cell, RefCell};

  use super::*;
  use crate::gpu::{gl, SamplerId, SamplerInfo};
  use crate::headless::HeadlessContext;

  struct RecordingMesh {
    texture_unit: u32,
    seen: RefCell<Vec<Option<SamplerId>>>,
    fail: Cell<bool>,
  }

  impl RecordingMesh {
    fn new(texture_unit: u32) -> Self {
      Self {
        texture_unit,
        seen: RefCell::new(Vec::new()),
        fail: Cell::new(false),
      }
    }
  }

  impl Mesh<HeadlessContext> for RecordingMesh {
    fn draw(&self, context: &HeadlessContext) -> Result<(), DrawError> {
      self.seen.borrow_mut().push(context.bound_sampler(self.texture_unit));
      if self.fail.get() {
        return Err(DrawError::Mesh("vertex buffer lost".to_string()));
      }
      Ok(())
    }
  }

  #[test]
  fn widget_without_mesh_draws_nothing() {
    let context = Rc::new(HeadlessContext::default());
    let mut widget = MeshWidget::<HeadlessContext, RecordingMesh>::new(None);
    widget.draw(&*context, 0).unwrap();
    assert!(widget.mesh().is_none());
  }

  #[test]
  fn sampler_is_bound_only_while_drawing() {
    let context = Rc::new(HeadlessContext::default());
    let mut sampler = Sampler::new(&context);
    sampler.create().unwrap();
    sampler.set_interpolation_method(gl::LINEAR).unwrap();
    let sampler = Rc::new(sampler);

    let mesh = Rc::new(RecordingMesh::new(2));
    let mut widget = MeshWidget::<HeadlessContext, RecordingMesh>::new(Some(mesh.clone()));
    widget.set_sampler(Some(sampler.clone()), 2);
    widget.draw(&*context, 1).unwrap();

    assert_eq!(mesh.seen.borrow().as_slice(), &[sampler.sampler_id()]);
    assert_eq!(context.bound_sampler(2), None);
  }

  #[test]
  fn failed_mesh_draw_still_unbinds() {
    let context = Rc::new(HeadlessContext::default());
    let sampler = Rc::new(Sampler::from_info(&context, &SamplerInfo::default()).unwrap());
    let mesh = Rc::new(RecordingMesh::new(0));
    mesh.fail.set(true);

    let mut widget = MeshWidget::<HeadlessContext, RecordingMesh>::new(Some(mesh.clone()));
    widget.set_sampler(Some(sampler), 0);
    assert!(matches!(widget.draw(&*context, 0), Err(DrawError::Mesh(_))));
    assert_eq!(context.bound_sampler(0), None);
  }

  #[test]
  fn widget_without_sampler_clears_override() {
    let context = Rc::new(HeadlessContext::default());
    let stray = Sampler::from_info(&context, &SamplerInfo::default()).unwrap();
    stray.bind(0).unwrap();

    let mesh = Rc::new(RecordingMesh::new(0));
    let mut widget = MeshWidget::<HeadlessContext, RecordingMesh>::new(Some(mesh.clone()));
    widget.draw(&*context, 0).unwrap();
    assert_eq!(mesh.seen.borrow().as_slice(), &[None]);
  }

  #[test]
  #[cfg(debug_assertions)]
  #[should_panic(expected = "different context")]
  fn sampler_from_other_context_is_caught() {
    let context = Rc::new(HeadlessContext::default());
    let other = Rc::new(HeadlessContext::default());
    let sampler = Rc::new(Sampler::from_info(&other, &SamplerInfo::default()).unwrap());

    let mut widget = MeshWidget::<HeadlessContext, RecordingMesh>::new(Some(Rc::new(RecordingMesh::new(0))));
    widget.set_sampler(Some(sampler), 0);
    let _ = widget.draw(&*context, 0);
  }

  #[test]
  fn set_mesh_replaces_mesh() {
    let context = Rc::new(HeadlessContext::default());
    let first = Rc::new(RecordingMesh::new(0));
    let second = Rc::new(RecordingMesh::new(0));
    let mut widget = MeshWidget::<HeadlessContext, RecordingMesh>::new(Some(first.clone()));
    widget.set_mesh(Some(second.clone()));
    widget.draw(&*context, 0).unwrap();
    assert!(first.seen.borrow().is_empty());
    assert_eq!(second.seen.borrow().len(), 1);
  }
}
