//! Error types for yearfall.
//!
//! Everything that can fail happens before the first animation tick:
//! configuration validation, loading the font resource, building the text
//! solid, and sampling particles inside it. Once ticking starts the update
//! path is total and has no error type.

use std::fmt;
use std::path::PathBuf;

/// Invalid animation configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Duration must be strictly positive (it divides the rate constants).
    NonPositiveDuration(f64),
    /// At least one particle is required.
    ZeroParticles,
    /// More lights requested than there are particles to carry them.
    TooManyLights {
        /// Requested light count.
        lights: usize,
        /// Configured particle count.
        particles: usize,
    },
    /// The palette needs at least one color.
    EmptyPalette,
    /// Text glyph height must be positive.
    InvalidTextSize(f32),
    /// A numeric setting was NaN or infinite.
    NonFinite(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositiveDuration(d) => {
                write!(f, "Animation duration must be positive, got {}", d)
            }
            ConfigError::ZeroParticles => write!(f, "Particle count must be at least 1"),
            ConfigError::TooManyLights { lights, particles } => write!(
                f,
                "Cannot bind {} lights to {} particles. Lower the light count or add particles.",
                lights, particles
            ),
            ConfigError::EmptyPalette => write!(f, "Palette size must be at least 1"),
            ConfigError::InvalidTextSize(size) => {
                write!(f, "Text size must be positive, got {}", size)
            }
            ConfigError::NonFinite(field) => write!(f, "Setting `{}` must be finite", field),
        }
    }
}

impl std::error::Error for ConfigError {}

/// The shape sampler could not fill the requested particle set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SamplingError {
    /// The mesh has no triangles, so there is no volume to sample.
    EmptyMesh,
    /// The attempt budget ran out before enough points were accepted.
    AttemptsExhausted {
        /// Points the caller asked for.
        requested: usize,
        /// Points accepted before giving up.
        accepted: usize,
        /// Candidates drawn.
        attempts: usize,
    },
}

impl fmt::Display for SamplingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SamplingError::EmptyMesh => write!(f, "Cannot sample points inside an empty mesh"),
            SamplingError::AttemptsExhausted {
                requested,
                accepted,
                attempts,
            } => write!(
                f,
                "Sampling gave up after {} attempts with {} of {} points inside the solid. \
                 The mesh may be open, flat or extremely thin.",
                attempts, accepted, requested
            ),
        }
    }
}

impl std::error::Error for SamplingError {}

/// The font/outline provider failed to deliver a usable mesh.
#[derive(Debug)]
pub enum ResourceError {
    /// Failed to read the font file from disk.
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// The font file is not valid font JSON.
    Parse(serde_json::Error),
    /// The text uses a character the font does not define.
    MissingGlyph(char),
    /// A glyph definition is malformed.
    InvalidGlyph {
        /// Offending glyph.
        glyph: char,
        /// What is wrong with it.
        reason: String,
    },
    /// Nothing to extrude.
    EmptyText,
    /// The extruded text produced no triangles.
    EmptyMesh(String),
    /// A triangle references a vertex the mesh does not have.
    IndexOutOfRange {
        /// Offending vertex index.
        index: u32,
        /// Number of vertices in the mesh.
        vertices: usize,
    },
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::Io { path, source } => {
                write!(f, "Failed to read font file {}: {}", path.display(), source)
            }
            ResourceError::Parse(e) => write!(f, "Failed to parse font: {}", e),
            ResourceError::MissingGlyph(c) => write!(f, "Font has no glyph for {:?}", c),
            ResourceError::InvalidGlyph { glyph, reason } => {
                write!(f, "Glyph {:?} is invalid: {}", glyph, reason)
            }
            ResourceError::EmptyText => write!(f, "Cannot build geometry for empty text"),
            ResourceError::EmptyMesh(text) => {
                write!(f, "Text {:?} produced a mesh with no triangles", text)
            }
            ResourceError::IndexOutOfRange { index, vertices } => write!(
                f,
                "Triangle references vertex {} but the mesh has {}",
                index, vertices
            ),
        }
    }
}

impl std::error::Error for ResourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResourceError::Io { source, .. } => Some(source),
            ResourceError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ResourceError {
    fn from(e: serde_json::Error) -> Self {
        ResourceError::Parse(e)
    }
}

/// Any failure that prevents the animation from starting.
#[derive(Debug)]
pub enum AnimationError {
    /// Configuration was rejected.
    Config(ConfigError),
    /// Particles could not be sampled.
    Sampling(SamplingError),
    /// Font or text geometry could not be produced.
    Resource(ResourceError),
}

impl fmt::Display for AnimationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnimationError::Config(e) => write!(f, "Invalid configuration: {}", e),
            AnimationError::Sampling(e) => write!(f, "Sampling failed: {}", e),
            AnimationError::Resource(e) => write!(f, "Resource load failed: {}", e),
        }
    }
}

impl std::error::Error for AnimationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AnimationError::Config(e) => Some(e),
            AnimationError::Sampling(e) => Some(e),
            AnimationError::Resource(e) => Some(e),
        }
    }
}

impl From<ConfigError> for AnimationError {
    fn from(e: ConfigError) -> Self {
        AnimationError::Config(e)
    }
}

impl From<SamplingError> for AnimationError {
    fn from(e: SamplingError) -> Self {
        AnimationError::Sampling(e)
    }
}

impl From<ResourceError> for AnimationError {
    fn from(e: ResourceError) -> Self {
        AnimationError::Resource(e)
    }
}

/// Errors that can occur during GPU initialization.
#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    NoAdapter(wgpu::RequestAdapterError),
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            GpuError::NoAdapter(e) => write!(
                f,
                "No compatible GPU adapter found ({}). Ensure your system has a GPU with Vulkan/Metal/DX12 support.",
                e
            ),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::NoAdapter(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestAdapterError> for GpuError {
    fn from(e: wgpu::RequestAdapterError) -> Self {
        GpuError::NoAdapter(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// Errors that can occur when running the windowed animation.
#[derive(Debug)]
pub enum RunError {
    /// Failed to create event loop.
    EventLoop(winit::error::EventLoopError),
    /// Failed to create window.
    Window(winit::error::OsError),
    /// GPU initialization failed.
    Gpu(GpuError),
    /// The animation could not be set up.
    Animation(AnimationError),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::EventLoop(e) => write!(f, "Failed to create event loop: {}", e),
            RunError::Window(e) => write!(f, "Failed to create window: {}", e),
            RunError::Gpu(e) => write!(f, "GPU error: {}", e),
            RunError::Animation(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunError::EventLoop(e) => Some(e),
            RunError::Window(e) => Some(e),
            RunError::Gpu(e) => Some(e),
            RunError::Animation(e) => Some(e),
        }
    }
}

impl From<winit::error::EventLoopError> for RunError {
    fn from(e: winit::error::EventLoopError) -> Self {
        RunError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for RunError {
    fn from(e: winit::error::OsError) -> Self {
        RunError::Window(e)
    }
}

impl From<GpuError> for RunError {
    fn from(e: GpuError) -> Self {
        RunError::Gpu(e)
    }
}

impl From<AnimationError> for RunError {
    fn from(e: AnimationError) -> Self {
        RunError::Animation(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_config_error_messages() {
        let e = ConfigError::TooManyLights {
            lights: 12,
            particles: 3,
        };
        assert!(e.to_string().contains("12 lights to 3 particles"));
        assert!(ConfigError::NonPositiveDuration(0.0).to_string().contains("positive"));
    }

    #[test]
    fn test_animation_error_source_chain() {
        let e: AnimationError = SamplingError::EmptyMesh.into();
        assert!(matches!(e, AnimationError::Sampling(SamplingError::EmptyMesh)));
        assert!(e.source().is_some());
    }

    #[test]
    fn test_resource_io_error_keeps_path() {
        let e = ResourceError::Io {
            path: PathBuf::from("fonts/missing.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(e.to_string().contains("fonts/missing.json"));
        assert!(e.source().is_some());
    }
}
