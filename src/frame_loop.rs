//! The event loop: window events in, one frame out every 1/60 s.
//!
//! # Architecture
//!
//! [`FrameLoop`] is the winit [`ApplicationHandler`]. It creates the window
//! and the GPU renderer on resume and turns window events into
//! [`InputEvent`]s. It does not act on them immediately. Everything else
//! happens in [`Session::frame`], which runs once per redraw:
//!
//! ```text
//! WindowEvent → FrameLoop::window_event → Session::queue
//!     ↓ (next frame)
//! Session::frame
//!     ↓ drain queued events in arrival order → Controller
//!     ↓ Controller::refresh_status
//!     ↓ Scene::build → Renderer::draw
//! ```
//!
//! Frames are paced with [`ControlFlow::WaitUntil`], so the thread sleeps
//! between frames instead of spinning. Every redraw, scheduled or requested
//! by the OS, goes through one [`FramePacer`], so at most 60 frames run per
//! second.

use crate::assets::Assets;
use crate::config::initial_window_size;
use crate::controller::Controller;
use crate::game_repr::{RulesEngine, ShakmatyEngine};
use crate::geometry::ViewportGeometry;
use crate::renderer::wgpu_renderer::WgpuRenderer;
use crate::renderer::{Renderer, RendererError, Scene};
use log::{debug, error, info, warn};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::window::{Icon, Window, WindowId};

pub const FRAMES_PER_SECOND: u32 = 60;

const WINDOW_TITLE: &str = "Chess";

#[derive(Debug, Error)]
pub enum FrameLoopError {
    #[error("failed to create the window: {0}")]
    CreateWindow(#[from] winit::error::OsError),

    #[error(transparent)]
    Renderer(#[from] RendererError),
}

/// Window input, reduced to what the board reacts to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A pointer button went down at this window position.
    Press { x: f64, y: f64 },
    Resize { width: u32, height: u32 },
}

/// Game state plus renderer, advanced one frame at a time.
///
/// Independent of the window system so it can run against any [`Renderer`].
pub struct Session<E: RulesEngine, R: Renderer> {
    controller: Controller<E>,
    renderer: R,
    geometry: ViewportGeometry,
    queued: VecDeque<InputEvent>,
}

impl<E: RulesEngine, R: Renderer> Session<E, R> {
    pub fn new(controller: Controller<E>, renderer: R) -> Self {
        let (width, height) = renderer.window_size();
        Self {
            controller,
            renderer,
            geometry: ViewportGeometry::recompute(width, height),
            queued: VecDeque::new(),
        }
    }

    pub fn controller(&self) -> &Controller<E> {
        &self.controller
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn geometry(&self) -> &ViewportGeometry {
        &self.geometry
    }

    /// Hold an event until the next frame.
    pub fn queue(&mut self, event: InputEvent) {
        self.queued.push_back(event);
    }

    /// Run one frame: apply queued input in order, check for the end of the
    /// game and draw.
    ///
    /// # Errors
    ///
    /// Only errors drawing cannot recover from. A lost or outdated surface
    /// is logged and the frame skipped.
    pub fn frame(&mut self) -> Result<(), RendererError> {
        while let Some(event) = self.queued.pop_front() {
            match event {
                InputEvent::Press { x, y } => self.controller.handle_pointer(x, y, &self.geometry),
                InputEvent::Resize { width, height } => {
                    self.renderer.resize((width, height));
                    self.geometry = ViewportGeometry::recompute(width, height);
                    debug!("Board geometry now {:?}", self.geometry);
                }
            }
        }

        self.controller.refresh_status();

        let scene = Scene::build(&self.controller, &self.geometry);
        match self.renderer.draw(&scene) {
            Ok(()) => Ok(()),
            Err(e) if !e.is_fatal() => {
                warn!("Skipped frame: {e}");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

/// Frame deadlines, shared by scheduled and OS-requested redraws.
#[derive(Debug, Clone, Copy)]
pub struct FramePacer {
    frame_time: Duration,
    next_frame: Instant,
}

impl FramePacer {
    pub fn new(frames_per_second: u32, now: Instant) -> Self {
        Self {
            frame_time: Duration::from_secs(1) / frames_per_second.max(1),
            next_frame: now,
        }
    }

    pub fn frame_time(&self) -> Duration {
        self.frame_time
    }

    /// When the next frame is due.
    pub fn next_frame(&self) -> Instant {
        self.next_frame
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next_frame
    }

    /// Start a frame if one is due at `now` and move the deadline on.
    ///
    /// Redraws before the deadline are dropped; their queued input waits for
    /// the next frame. A late frame does not cause a burst of catch-up frames.
    pub fn try_begin(&mut self, now: Instant) -> bool {
        if !self.is_due(now) {
            return false;
        }
        self.next_frame += self.frame_time;
        if self.next_frame <= now {
            self.next_frame = now + self.frame_time;
        }
        true
    }
}

/// The winit application: one window, one session.
pub struct FrameLoop {
    assets: Assets,
    requested_size: Option<(u32, u32)>,
    /// Handed to the session once the window exists.
    engine: Option<ShakmatyEngine>,
    window: Option<Arc<Window>>,
    session: Option<Session<ShakmatyEngine, WgpuRenderer>>,
    cursor: (f64, f64),
    pacer: FramePacer,
    failure: Option<FrameLoopError>,
}

impl FrameLoop {
    /// # Arguments
    ///
    /// * `engine` - Starting position
    /// * `assets` - Decoded images for the renderer and window icon
    /// * `requested_size` - Initial window size; `None` fits it to the monitor
    pub fn new(engine: ShakmatyEngine, assets: Assets, requested_size: Option<(u32, u32)>) -> Self {
        Self {
            assets,
            requested_size,
            engine: Some(engine),
            window: None,
            session: None,
            cursor: (0.0, 0.0),
            pacer: FramePacer::new(FRAMES_PER_SECOND, Instant::now()),
            failure: None,
        }
    }

    /// What stopped the loop, if it was an error.
    pub fn into_result(self) -> Result<(), FrameLoopError> {
        match self.failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, e: FrameLoopError) {
        error!("{e}");
        self.failure = Some(e);
        event_loop.exit();
    }

    fn create_window(&self, event_loop: &ActiveEventLoop) -> Result<Arc<Window>, FrameLoopError> {
        let monitor = event_loop.primary_monitor().map(|m| {
            let size = m.size();
            (size.width, size.height)
        });
        let (width, height) = initial_window_size(self.requested_size, monitor);

        let mut attributes = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(PhysicalSize::new(width, height))
            .with_resizable(true);

        if let Some(icon) = self.assets.icon() {
            match Icon::from_rgba(icon.as_raw().clone(), icon.width(), icon.height()) {
                Ok(icon) => attributes = attributes.with_window_icon(Some(icon)),
                Err(e) => warn!("Ignoring window icon: {e}"),
            }
        }

        let window = Arc::new(event_loop.create_window(attributes)?);
        info!("Opened {width}x{height} window");
        Ok(window)
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<(), FrameLoopError> {
        let window = self.create_window(event_loop)?;
        let renderer = pollster::block_on(WgpuRenderer::new(window.clone(), &self.assets))?;

        if let Some(engine) = self.engine.take() {
            self.session = Some(Session::new(Controller::new(engine), renderer));
        }
        window.request_redraw();
        self.window = Some(window);
        Ok(())
    }
}

impl ApplicationHandler for FrameLoop {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        // Only initialize once
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.start(event_loop) {
            self.fail(event_loop, e);
            return;
        }

        event_loop.set_control_flow(ControlFlow::WaitUntil(self.pacer.next_frame()));
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                info!("Window closed");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => session.queue(InputEvent::Resize {
                width: size.width,
                height: size.height,
            }),
            WindowEvent::CursorMoved { position, .. } => self.cursor = (position.x, position.y),
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                ..
            } => {
                let (x, y) = self.cursor;
                session.queue(InputEvent::Press { x, y });
            }
            WindowEvent::RedrawRequested => {
                if !self.pacer.try_begin(Instant::now()) {
                    return;
                }
                if let Err(e) = session.frame() {
                    self.fail(event_loop, e.into());
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = &self.window else {
            return;
        };

        // The deadline moves on when the redraw actually runs a frame. Until
        // then, wake once per frame time rather than spinning on a past deadline.
        let now = Instant::now();
        let wake = if self.pacer.is_due(now) {
            window.request_redraw();
            now + self.pacer.frame_time()
        } else {
            self.pacer.next_frame()
        };
        event_loop.set_control_flow(ControlFlow::WaitUntil(wake));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{GameState, SelectionState};
    use crate::game_repr::{Square, ShakmatyEngine};
    use crate::renderer::mock::MockRenderer;
    use crate::renderer::DrawCommand;

    fn session() -> Session<ShakmatyEngine, MockRenderer> {
        Session::new(
            Controller::new(ShakmatyEngine::new()),
            MockRenderer::new((900, 900)),
        )
    }

    fn press_square(session: &mut Session<ShakmatyEngine, MockRenderer>, index: u8) {
        let (x, y) = session.geometry().square_center(Square::new(index).unwrap());
        session.queue(InputEvent::Press {
            x: x as f64,
            y: y as f64,
        });
    }

    #[test]
    fn test_events_wait_for_frame() {
        let mut session = session();
        press_square(&mut session, 12);

        assert_eq!(
            session.controller().selection().state(),
            &SelectionState::Idle
        );

        session.frame().unwrap();
        assert_eq!(
            session.controller().selection().selected_square(),
            Square::new(12)
        );
        assert_eq!(session.renderer().frames.len(), 1);
    }

    #[test]
    fn test_events_apply_in_order() {
        let mut session = session();
        press_square(&mut session, 12);
        press_square(&mut session, 28);
        press_square(&mut session, 52);
        press_square(&mut session, 36);

        session.frame().unwrap();

        assert_eq!(session.controller().engine().move_count(), 2);
        assert_eq!(session.controller().state(), &GameState::Playing);
    }

    #[test]
    fn test_resize_recomputes_geometry_before_clicks() {
        let mut session = session();
        session.queue(InputEvent::Resize {
            width: 500,
            height: 500,
        });
        // e2 center for a 500x500 window
        session.queue(InputEvent::Press { x: 275.0, y: 375.0 });

        session.frame().unwrap();

        assert_eq!(session.renderer().size, (500, 500));
        assert_eq!(session.geometry().tile_size, 50);
        assert_eq!(
            session.controller().selection().selected_square(),
            Square::new(12)
        );
    }

    #[test]
    fn test_lost_surface_skips_frame() {
        let mut session = session();
        session.renderer.fail_next = Some(wgpu::SurfaceError::Lost);

        assert!(session.frame().is_ok());
        assert!(session.renderer().frames.is_empty());

        session.frame().unwrap();
        assert_eq!(session.renderer().frames.len(), 1);
    }

    #[test]
    fn test_out_of_memory_is_fatal() {
        let mut session = session();
        session.renderer.fail_next = Some(wgpu::SurfaceError::OutOfMemory);

        assert!(session.frame().is_err());
    }

    #[test]
    fn test_pacer_drops_redraws_before_deadline() {
        let start = Instant::now();
        let mut pacer = FramePacer::new(FRAMES_PER_SECOND, start);
        let frame = pacer.frame_time();

        assert!(pacer.try_begin(start));
        assert_eq!(pacer.next_frame(), start + frame);

        // An OS redraw right after a frame does not run another one
        assert!(!pacer.try_begin(start + Duration::from_millis(1)));
        assert!(!pacer.try_begin(start + frame / 2));
        assert_eq!(pacer.next_frame(), start + frame);

        assert!(pacer.try_begin(start + frame));
        assert!(!pacer.try_begin(start + frame + Duration::from_millis(5)));
    }

    #[test]
    fn test_pacer_keeps_cadence_after_late_frame() {
        let start = Instant::now();
        let mut pacer = FramePacer::new(FRAMES_PER_SECOND, start);
        let frame = pacer.frame_time();
        pacer.try_begin(start);

        // A slightly late frame keeps the original schedule
        let late = start + frame + Duration::from_millis(2);
        assert!(pacer.try_begin(late));
        assert_eq!(pacer.next_frame(), start + frame * 2);
        assert!(pacer.try_begin(start + frame * 2));

        // A long stall restarts the schedule instead of bursting
        let stalled = start + frame * 10;
        assert!(pacer.try_begin(stalled));
        assert_eq!(pacer.next_frame(), stalled + frame);
        assert!(!pacer.try_begin(stalled + Duration::from_millis(1)));
    }

    #[test]
    fn test_pacer_frame_time() {
        let now = Instant::now();
        assert_eq!(FramePacer::new(60, now).frame_time(), Duration::from_secs(1) / 60);
        assert_eq!(FramePacer::new(0, now).frame_time(), Duration::from_secs(1));
    }

    #[test]
    fn test_every_frame_is_a_full_repaint() {
        let mut session = session();
        session.frame().unwrap();
        session.frame().unwrap();

        for frame in &session.renderer().frames {
            assert_eq!(frame.commands()[0], DrawCommand::Background);
            assert_eq!(frame.commands().len(), 1 + 64 + 32);
        }
    }
}
