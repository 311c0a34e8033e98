use std::path::{Path, PathBuf};
use std::rc::Rc;

use log::{info, LevelFilter};
use thiserror::Error;

use meshview_core::gpu::gl;
use meshview_core::{DrawError, HeadlessContext, Mesh, MeshWidget, Sampler, SamplerError, SamplerInfo, Widget};

#[derive(Debug, Error)]
enum RunError {
  #[error("could not read {}: {source}", path.display())]
  Io { path: PathBuf, source: std::io::Error },
  #[error("could not parse sampler description: {0}")]
  Parse(#[from] ron::error::SpannedError),
  #[error(transparent)]
  Sampler(#[from] SamplerError),
  #[error(transparent)]
  Draw(#[from] DrawError),
  #[error("{0} sampler objects leaked")]
  Leak(usize),
}

/// Stand-in for real geometry, reports which sampler it would sample with.
struct Quad {
  texture_unit: u32,
}

impl Mesh<HeadlessContext> for Quad {
  fn draw(&self, context: &HeadlessContext) -> Result<(), DrawError> {
    match context.bound_sampler(self.texture_unit) {
      Some(sampler) => info!("Drawing quad with sampler {} on unit {}", sampler, self.texture_unit),
      None => info!("Drawing quad with texture sampling state on unit {}", self.texture_unit),
    }
    Ok(())
  }
}

fn load_sampler_info(path: &Path) -> Result<SamplerInfo, RunError> {
  let text = std::fs::read_to_string(path).map_err(|source| RunError::Io { path: path.to_path_buf(), source })?;
  Ok(ron::from_str(&text)?)
}

fn run(info: &SamplerInfo) -> Result<(), RunError> {
  let context = Rc::new(HeadlessContext::default());

  {
    let sampler = Sampler::from_info(&context, info)?;
    info!(
      "Sampler {}: min filter {:#06x}, mag filter {:#06x}",
      sampler.id(),
      sampler.parameter(gl::TEXTURE_MIN_FILTER)?,
      sampler.parameter(gl::TEXTURE_MAG_FILTER)?
    );

    let mut widget = MeshWidget::<HeadlessContext, Quad>::new(Some(Rc::new(Quad { texture_unit: 0 })));
    widget.draw(&*context, 0)?;
    widget.set_sampler(Some(Rc::new(sampler)), 0);
    widget.draw(&*context, 1)?;
  }

  info!(
    "Created {} sampler objects, deleted {}",
    context.created_count(),
    context.deleted_count()
  );
  match context.live_samplers() {
    0 => Ok(()),
    leaked => Err(RunError::Leak(leaked)),
  }
}

fn main() {
  simple_logger::SimpleLogger::new()
    .with_level(LevelFilter::Info)
    .env()
    .init()
    .unwrap();

  let info = match std::env::args_os().nth(1) {
    Some(path) => load_sampler_info(Path::new(&path)),
    None => Ok(SamplerInfo::default()),
  };

  if let Err(e) = info.and_then(|info| run(&info)) {
    log::error!("{}", e);
    std::process::exit(1);
  }
}
