use anyhow::Result;
use clap::Parser;
use glam::{Mat4, Vec3};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use structure_viewer::cli::Cli;
use structure_viewer::config::ControllerConfig;
use structure_viewer::core::{
    BackingSize, CameraController, EventRouter, FrameQueue, SharedController, WindowScheduler,
    WindowViewport, WinitInput,
};
use structure_viewer::traits::StructureRenderer;

const INITIAL_WINDOW_WIDTH: u32 = 800;
const INITIAL_WINDOW_HEIGHT: u32 = 600;

/// Stand-in for the structure renderer: reports the camera in the title bar
struct TitleRenderer {
    window: Arc<Window>,
    backing: BackingSize,
}

impl StructureRenderer for TitleRenderer {
    fn draw(&mut self, view: &Mat4) -> Result<()> {
        let eye = view.inverse().transform_point3(Vec3::ZERO);
        let (width, height) = self.backing.get();
        log::debug!("draw {}x{} eye {:.2}", width, height, eye);
        self.window.set_title(&format!(
            "Structure Viewer - {}x{} - eye ({:.2}, {:.2}, {:.2})",
            width, height, eye.x, eye.y, eye.z
        ));
        Ok(())
    }
}

struct App {
    config: ControllerConfig,
    window: Option<Arc<Window>>,
    controller: Option<SharedController>,
    router: Rc<RefCell<EventRouter>>,
    frames: FrameQueue,
    input: WinitInput,
}

impl App {
    fn new(config: ControllerConfig) -> Self {
        Self {
            config,
            window: None,
            controller: None,
            router: Rc::new(RefCell::new(EventRouter::new())),
            frames: FrameQueue::new(),
            input: WinitInput::new(),
        }
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(controller) = self.controller.take() {
            controller.borrow_mut().detach();
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(
            Window::default_attributes()
                .with_title("Structure Viewer")
                .with_inner_size(winit::dpi::LogicalSize::new(
                    INITIAL_WINDOW_WIDTH,
                    INITIAL_WINDOW_HEIGHT,
                )),
        ) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let backing: BackingSize = Rc::new(Cell::new((0, 0)));
        let renderer = TitleRenderer {
            window: window.clone(),
            backing: backing.clone(),
        };
        let scheduler = WindowScheduler::new(self.frames.clone(), window.clone());

        let controller = CameraController::builder(renderer, scheduler)
            .config(self.config.clone())
            .viewport(Box::new(WindowViewport::new(window.clone(), backing)))
            .attach(&self.router);
        controller.borrow_mut().resize();

        self.window = Some(window);
        self.controller = Some(controller);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => self.shutdown(event_loop),
            WindowEvent::Resized(_) => {
                if let Some(controller) = &self.controller {
                    controller.borrow_mut().resize();
                }
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.frames.run_frame() {
                    log::error!("Render error: {:#}", e);
                    self.shutdown(event_loop);
                }
            }
            event => {
                if let Some(input) = self.input.translate(&event) {
                    self.router.borrow_mut().dispatch(&input);
                }
            }
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => ControllerConfig::load(path)?,
        None => ControllerConfig::default(),
    };
    let config = cli.apply(config);

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config);

    log::info!("Structure Viewer - drag to orbit, wheel to zoom, WASD/Space/Shift to fly, Escape to quit");
    event_loop.run_app(&mut app)?;

    Ok(())
}
