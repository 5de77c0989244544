use std::fmt;

use thiserror::Error;

use crate::gpu::{BackendError, BackendResult, GpuDevice, PipelineDescriptor, RenderView};
use crate::logging::Log;
use crate::render::Uniforms;

use super::{Camera2D, CameraConfig};

/// Named stage of camera construction, in execution order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum FactoryStep {
    ResolveDevice,
    CreateCommandQueue,
    LoadLibrary,
    AssembleDescriptor,
    LookupVertexFunction,
    LookupFragmentFunction,
    CompilePipeline,
}

impl FactoryStep {
    fn success_message(self) -> &'static str {
        match self {
            FactoryStep::ResolveDevice => "Created device",
            FactoryStep::CreateCommandQueue => "Created command queue",
            FactoryStep::LoadLibrary => "Created library",
            FactoryStep::AssembleDescriptor => "Assembled pipeline descriptor",
            FactoryStep::LookupVertexFunction => "Created vertex shader",
            FactoryStep::LookupFragmentFunction => "Created fragment shader",
            FactoryStep::CompilePipeline => "Created pipeline state object (PSO)",
        }
    }
}

impl fmt::Display for FactoryStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FactoryStep::ResolveDevice => "resolve device",
            FactoryStep::CreateCommandQueue => "create command queue",
            FactoryStep::LoadLibrary => "load shader library",
            FactoryStep::AssembleDescriptor => "assemble pipeline descriptor",
            FactoryStep::LookupVertexFunction => "look up vertex function",
            FactoryStep::LookupFragmentFunction => "look up fragment function",
            FactoryStep::CompilePipeline => "compile pipeline state",
        };
        f.write_str(s)
    }
}

/// Camera construction failed at `step`. Nothing after `step` was attempted.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("camera `{camera}` failed to {step}: {source}")]
pub struct CameraError {
    pub camera: String,
    pub step: FactoryStep,
    #[source]
    pub source: BackendError,
}

/// Builds [`Camera2D`]s for a view.
///
/// Each step is logged on the `CAMERA` tag; the first failing step is logged as an error
/// and returned, and no partially-initialized camera escapes.
#[derive(Debug, Clone)]
pub struct Camera2DFactory {
    name: String,
    config: CameraConfig,
}

impl Camera2DFactory {
    pub fn new(name: impl Into<String>, config: CameraConfig) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }

    /// Name given to built cameras and used as the pipeline label.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn create_camera<V: RenderView>(
        &self,
        view: &V,
        log: &Log,
    ) -> Result<Camera2D<V::Device>, CameraError> {
        let device = self.step(log, FactoryStep::ResolveDevice, || {
            view.device().cloned().ok_or(BackendError::DeviceUnavailable)
        })?;

        let command_queue =
            self.step(log, FactoryStep::CreateCommandQueue, || device.make_command_queue())?;

        let library = self.step(log, FactoryStep::LoadLibrary, || {
            device.make_library(&self.config.shader)
        })?;

        let mut descriptor = self.step(log, FactoryStep::AssembleDescriptor, || {
            Ok(PipelineDescriptor::new(self.name.clone(), view.color_format()))
        })?;

        descriptor.vertex_function = Some(self.step(log, FactoryStep::LookupVertexFunction, || {
            device.make_function(&library, &self.config.vertex_function)
        })?);

        descriptor.fragment_function =
            Some(self.step(log, FactoryStep::LookupFragmentFunction, || {
                device.make_function(&library, &self.config.fragment_function)
            })?);

        let pipeline = self.step(log, FactoryStep::CompilePipeline, || {
            device.make_pipeline_state(&descriptor)
        })?;

        let mut camera = Camera2D {
            name: self.name.clone(),
            encoder_label: self.config.encoder_label.clone(),
            device,
            command_queue,
            library,
            descriptor,
            pipeline,
            global_uniforms: Uniforms::default(),
            rotation: 0.0,
            aspect: 1.0,
            log: log.clone(),
        };
        let (width, height) = view.drawable_size();
        camera.resize(width, height);
        camera.update_uniforms();

        Ok(camera)
    }

    fn step<T>(
        &self,
        log: &Log,
        step: FactoryStep,
        run: impl FnOnce() -> BackendResult<T>,
    ) -> Result<T, CameraError> {
        match run() {
            Ok(value) => {
                log.camera(step.success_message());
                Ok(value)
            }
            Err(source) => {
                let err = CameraError {
                    camera: self.name.clone(),
                    step,
                    source,
                };
                log.camera_error(&err);
                Err(err)
            }
        }
    }
}
