//! Drawing the board.
//!
//! [`scene`] decides *what* a frame shows; a [`Renderer`] backend decides
//! *how* it reaches the screen. The frame loop owns exactly one renderer
//! value and hands it a fresh [`Scene`] every frame.

pub mod scene;
pub mod wgpu_renderer;

pub use scene::{DrawCommand, Scene};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RendererError {
    #[error("failed to create a drawing surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no graphics adapter can present to this window")]
    NoAdapter,

    #[error("failed to open the graphics device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("the surface has no supported texture format")]
    NoSurfaceFormat,

    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),

    #[error("failed to prepare text: {0}")]
    PrepareText(#[from] glyphon::PrepareError),

    #[error("failed to draw text: {0}")]
    RenderText(#[from] glyphon::RenderError),
}

impl RendererError {
    /// Whether drawing cannot continue after this error.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            RendererError::Surface(
                wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Timeout
            ) | RendererError::PrepareText(_)
                | RendererError::RenderText(_)
        )
    }
}

/// A backend that paints scenes into the window.
pub trait Renderer {
    /// Paint a full frame.
    ///
    /// # Arguments
    /// * `scene` - Draw commands in paint order, in window pixels
    ///
    /// # Errors
    /// Returns an error if the frame could not be presented. Lost or outdated
    /// surfaces are reconfigured before returning, so the next frame can
    /// succeed.
    fn draw(&mut self, scene: &Scene) -> Result<(), RendererError>;

    /// Handle window resize events
    ///
    /// # Arguments
    /// * `new_size` - New window dimensions in pixels
    fn resize(&mut self, new_size: (u32, u32));

    /// Get the current window size
    fn window_size(&self) -> (u32, u32);
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;

    /// Records every scene instead of drawing it.
    #[derive(Default)]
    pub struct MockRenderer {
        pub frames: Vec<Scene>,
        pub size: (u32, u32),
        pub fail_next: Option<wgpu::SurfaceError>,
    }

    impl MockRenderer {
        pub fn new(size: (u32, u32)) -> Self {
            Self {
                size,
                ..Default::default()
            }
        }
    }

    impl Renderer for MockRenderer {
        fn draw(&mut self, scene: &Scene) -> Result<(), RendererError> {
            if let Some(e) = self.fail_next.take() {
                return Err(e.into());
            }
            self.frames.push(scene.clone());
            Ok(())
        }

        fn resize(&mut self, new_size: (u32, u32)) {
            self.size = new_size;
        }

        fn window_size(&self) -> (u32, u32) {
            self.size
        }
    }

    #[test]
    fn test_surface_loss_is_recoverable() {
        assert!(!RendererError::Surface(wgpu::SurfaceError::Lost).is_fatal());
        assert!(!RendererError::Surface(wgpu::SurfaceError::Outdated).is_fatal());
        assert!(RendererError::Surface(wgpu::SurfaceError::OutOfMemory).is_fatal());
        assert!(RendererError::NoAdapter.is_fatal());
    }
}
