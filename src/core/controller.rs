use anyhow::Result;
use glam::{Mat4, Vec2, Vec3};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::camera::Camera;
use crate::config::ControllerConfig;
use crate::traits::{FrameScheduler, InputSurface, SharedSurface, StructureRenderer, Subscription, Viewport};

use super::input::{EventKind, EventResponse, InputEvent, PointerButton};

/// Controller shared between its listeners, its pending frame and the host
pub type SharedController = Rc<RefCell<CameraController>>;

const POINTER_EVENTS: [EventKind; 4] = [
    EventKind::PointerDown,
    EventKind::PointerMove,
    EventKind::PointerUp,
    EventKind::Wheel,
];
const KEY_EVENTS: [EventKind; 2] = [EventKind::KeyDown, EventKind::KeyUp];

/// Turns drag, wheel and key input into a view matrix and hands it to the renderer
/// once per scheduled frame.
///
/// Listeners and frame callbacks hold weak references only. Dropping the last
/// [`SharedController`] unsubscribes the listeners and turns a pending frame into a no-op.
pub struct CameraController {
    camera: Camera,
    config: ControllerConfig,
    center: Option<Vec3>,
    drag: Option<Vec2>,
    /// Taken out while drawing so the renderer can borrow the controller
    renderer: Option<Box<dyn StructureRenderer>>,
    scheduler: Box<dyn FrameScheduler>,
    viewport: Option<Box<dyn Viewport>>,
    frame_pending: bool,
    frames_rendered: u64,
    subscriptions: Vec<Subscription>,
    this: Weak<RefCell<CameraController>>,
}

impl CameraController {
    pub fn builder<R, S>(renderer: R, scheduler: S) -> ControllerBuilder
    where
        R: StructureRenderer + 'static,
        S: FrameScheduler + 'static,
    {
        ControllerBuilder::new(Box::new(renderer), Box::new(scheduler))
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn center(&self) -> Option<Vec3> {
        self.center
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn frame_pending(&self) -> bool {
        self.frame_pending
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Apply one input event to the interaction state
    pub fn handle_event(&mut self, event: &InputEvent) -> EventResponse {
        match event {
            InputEvent::PointerDown { button: PointerButton::Primary, x, y } => {
                self.drag = Some(Vec2::new(*x, *y));
                EventResponse::Handled
            }
            InputEvent::PointerDown { .. } => EventResponse::Ignored,
            InputEvent::PointerMove { x, y } => {
                let Some(last) = self.drag else {
                    return EventResponse::Ignored;
                };
                let current = Vec2::new(*x, *y);
                let delta = current - last;
                self.camera.rotate(delta.x, delta.y, self.config.drag_divisor);
                self.drag = Some(current);
                self.redraw();
                EventResponse::Handled
            }
            InputEvent::PointerUp { .. } => {
                self.drag = None;
                EventResponse::Handled
            }
            InputEvent::Wheel { delta_y } => {
                self.camera.zoom(*delta_y, self.config.wheel_divisor);
                self.redraw();
                EventResponse::PreventDefault
            }
            InputEvent::KeyDown { key } => self.set_key(key, true),
            InputEvent::KeyUp { key } => self.set_key(key, false),
        }
    }

    fn set_key(&mut self, key: &str, held: bool) -> EventResponse {
        if !self.config.keyboard {
            return EventResponse::Ignored;
        }
        match self.config.bindings.direction(key) {
            Some(direction) => {
                self.camera.movement.set(direction, held);
                self.redraw();
                EventResponse::Handled
            }
            None => EventResponse::Ignored,
        }
    }

    /// Schedule a frame unless one is already pending
    pub fn redraw(&mut self) {
        if self.frame_pending {
            return;
        }
        self.frame_pending = true;

        let this = self.this.clone();
        self.scheduler.request_frame(Box::new(move || match this.upgrade() {
            Some(controller) => CameraController::render_frame(&controller),
            None => Ok(()),
        }));
    }

    /// Run one frame: update the state under a borrow, then draw with the borrow released.
    ///
    /// The renderer may read or redraw the controller. Renderer errors are
    /// returned as-is; state changes made before the draw are kept.
    pub fn render_frame(controller: &SharedController) -> Result<()> {
        let (view, renderer) = {
            let mut inner = controller.borrow_mut();
            let view = inner.prepare_frame();
            (view, inner.renderer.take())
        };

        // Nested frames started from inside `draw` find no renderer and skip drawing
        let Some(mut renderer) = renderer else {
            return Ok(());
        };
        let result = renderer.draw(&view);
        controller.borrow_mut().renderer = Some(renderer);
        result
    }

    /// Per-frame state update: normalize, build the view matrix, advance free-fly movement
    fn prepare_frame(&mut self) -> Mat4 {
        self.frame_pending = false;
        self.camera.normalize(self.config.min_distance);

        let mut view = self.camera.view_matrix();
        let moved = self.camera.integrate_movement(self.config.move_step);
        if let Some(center) = self.center {
            view *= Mat4::from_translation(-center);
        }

        self.frames_rendered += 1;
        log::trace!(
            "frame {}: yaw {:.3} pitch {:.3} distance {:.3} position {}",
            self.frames_rendered,
            self.camera.yaw,
            self.camera.pitch,
            self.camera.distance,
            self.camera.position
        );

        if moved && self.config.fly_while_held {
            self.redraw();
        }

        view
    }

    /// Match the backing store to the window. Returns true if it was resized.
    pub fn resize(&mut self) -> bool {
        let Some(viewport) = self.viewport.as_mut() else {
            return false;
        };

        let backing = viewport.backing_size();
        let window = viewport.viewport_size();
        if backing == window {
            return false;
        }

        log::debug!("resizing backing store {:?} -> {:?}", backing, window);
        viewport.set_backing_size(window.0, window.1);
        true
    }

    /// Remove every listener registered by [`ControllerBuilder::attach`]
    pub fn detach(&mut self) {
        self.subscriptions.clear();
        self.drag = None;
        log::debug!("controller detached");
    }
}

pub struct ControllerBuilder {
    renderer: Box<dyn StructureRenderer>,
    scheduler: Box<dyn FrameScheduler>,
    viewport: Option<Box<dyn Viewport>>,
    config: ControllerConfig,
}

impl ControllerBuilder {
    pub fn new(renderer: Box<dyn StructureRenderer>, scheduler: Box<dyn FrameScheduler>) -> Self {
        Self {
            renderer,
            scheduler,
            viewport: None,
            config: ControllerConfig::default(),
        }
    }

    pub fn config(mut self, config: ControllerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn viewport(mut self, viewport: Box<dyn Viewport>) -> Self {
        self.viewport = Some(viewport);
        self
    }

    /// Build the controller, subscribe its listeners on `surface` and schedule
    /// the first frame
    pub fn attach<S>(self, surface: &Rc<RefCell<S>>) -> SharedController
    where
        S: InputSurface + 'static,
    {
        let surface: SharedSurface = surface.clone();
        let config = self.config;
        let camera = Camera::new(config.pitch, config.yaw, config.distance);
        let keyboard = config.keyboard;

        let controller = Rc::new_cyclic(|this| {
            RefCell::new(CameraController {
                camera,
                center: config.center(),
                config,
                drag: None,
                renderer: Some(self.renderer),
                scheduler: self.scheduler,
                viewport: self.viewport,
                frame_pending: false,
                frames_rendered: 0,
                subscriptions: Vec::new(),
                this: this.clone(),
            })
        });

        let mut kinds = POINTER_EVENTS.to_vec();
        if keyboard {
            kinds.extend(KEY_EVENTS);
        }
        let subscriptions: Vec<Subscription> = kinds
            .into_iter()
            .map(|kind| {
                let weak = Rc::downgrade(&controller);
                Subscription::new(
                    &surface,
                    kind,
                    Box::new(move |event: &InputEvent| match weak.upgrade() {
                        Some(controller) => controller.borrow_mut().handle_event(event),
                        None => EventResponse::Ignored,
                    }),
                )
            })
            .collect();

        {
            let mut inner = controller.borrow_mut();
            log::debug!("controller attached with {} listeners", subscriptions.len());
            inner.subscriptions = subscriptions;
            inner.redraw();
        }

        controller
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EventRouter, FrameQueue};

    type Router = Rc<RefCell<EventRouter>>;

    fn attach(config: ControllerConfig) -> (SharedController, Router, FrameQueue, Rc<RefCell<Vec<Mat4>>>) {
        let drawn = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&drawn);
        let queue = FrameQueue::new();
        let router = Rc::new(RefCell::new(EventRouter::new()));
        let controller = CameraController::builder(
            move |view: &Mat4| -> Result<()> {
                sink.borrow_mut().push(*view);
                Ok(())
            },
            queue.clone(),
        )
        .config(config)
        .attach(&router);
        (controller, router, queue, drawn)
    }

    #[test]
    fn test_attach_subscribes_and_schedules() {
        let (controller, router, queue, drawn) = attach(ControllerConfig::default());
        assert_eq!(router.borrow().listener_count(), 6);
        assert!(controller.borrow().frame_pending());
        assert_eq!(queue.pending(), 1);
        assert!(drawn.borrow().is_empty());
    }

    #[test]
    fn test_keyboard_disabled_skips_key_listeners() {
        let config = ControllerConfig { keyboard: false, ..Default::default() };
        let (controller, router, _queue, _drawn) = attach(config);
        assert_eq!(router.borrow().listener_count(), 4);
        assert_eq!(router.borrow().listener_count_for(EventKind::KeyDown), 0);
        let response = controller.borrow_mut().handle_event(&InputEvent::key_down("w"));
        assert_eq!(response, EventResponse::Ignored);
    }

    #[test]
    fn test_secondary_button_does_not_drag() {
        let (controller, router, _queue, _drawn) = attach(ControllerConfig::default());
        let response = router.borrow_mut().dispatch(&InputEvent::PointerDown {
            button: PointerButton::Secondary,
            x: 10.0,
            y: 10.0,
        });
        assert_eq!(response, EventResponse::Ignored);
        assert!(!controller.borrow().is_dragging());
    }

    #[test]
    fn test_move_without_drag_is_ignored() {
        let (controller, router, queue, _drawn) = attach(ControllerConfig::default());
        queue.run_frame().unwrap();

        let response = router.borrow_mut().dispatch(&InputEvent::PointerMove { x: 50.0, y: 50.0 });
        assert_eq!(response, EventResponse::Ignored);
        assert!(!controller.borrow().frame_pending());
        assert_eq!(controller.borrow().camera().yaw, 0.5);
    }

    #[test]
    fn test_pointer_down_and_up_do_not_redraw() {
        let (controller, router, queue, _drawn) = attach(ControllerConfig::default());
        queue.run_frame().unwrap();

        router.borrow_mut().dispatch(&InputEvent::PointerDown { button: PointerButton::Primary, x: 0.0, y: 0.0 });
        assert!(controller.borrow().is_dragging());
        router.borrow_mut().dispatch(&InputEvent::PointerUp { button: PointerButton::Primary });
        assert!(!controller.borrow().is_dragging());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_center_applied_last() {
        let config = ControllerConfig { center: Some([1.0, 2.0, 3.0]), ..Default::default() };
        let (controller, _router, queue, drawn) = attach(config);
        queue.run_frame().unwrap();

        let expected = controller.borrow().camera().view_matrix()
            * Mat4::from_translation(Vec3::new(-1.0, -2.0, -3.0));
        assert!(drawn.borrow()[0].abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn test_fly_while_held_keeps_scheduling() {
        let config = ControllerConfig { fly_while_held: true, ..Default::default() };
        let (controller, router, queue, drawn) = attach(config);
        router.borrow_mut().dispatch(&InputEvent::key_down("w"));

        for _ in 0..5 {
            assert_eq!(queue.run_frame().unwrap(), 1);
        }
        assert_eq!(drawn.borrow().len(), 5);

        router.borrow_mut().dispatch(&InputEvent::key_up("w"));
        queue.run_frame().unwrap();
        assert!(queue.is_empty());
        assert!(!controller.borrow().frame_pending());
    }

    #[test]
    fn test_dropped_controller_frame_is_noop() {
        let (controller, router, queue, drawn) = attach(ControllerConfig::default());
        drop(controller);

        assert_eq!(router.borrow().listener_count(), 0);
        assert_eq!(router.borrow_mut().dispatch(&InputEvent::Wheel { delta_y: 100.0 }), EventResponse::Ignored);
        assert_eq!(queue.run_frame().unwrap(), 1);
        assert!(drawn.borrow().is_empty());
    }

    #[test]
    fn test_attach_drop_cycles_leave_no_listeners() {
        let router = Rc::new(RefCell::new(EventRouter::new()));
        let queue = FrameQueue::new();
        for _ in 0..100 {
            let controller = CameraController::builder(|_: &Mat4| -> Result<()> { Ok(()) }, queue.clone())
                .attach(&router);
            assert_eq!(router.borrow().listener_count(), 6);
            drop(controller);
        }
        assert_eq!(router.borrow().listener_count(), 0);
        assert_eq!(queue.run_frame().unwrap(), 100);
    }

    #[test]
    fn test_renderer_can_read_controller_while_drawing() {
        let slot: Rc<RefCell<Weak<RefCell<CameraController>>>> = Rc::new(RefCell::new(Weak::new()));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let queue = FrameQueue::new();
        let router = Rc::new(RefCell::new(EventRouter::new()));

        let reader = Rc::clone(&slot);
        let sink = Rc::clone(&seen);
        let controller = CameraController::builder(
            move |_: &Mat4| -> Result<()> {
                if let Some(controller) = reader.borrow().upgrade() {
                    let inner = controller.borrow();
                    sink.borrow_mut().push((inner.camera().distance, inner.frames_rendered()));
                }
                Ok(())
            },
            queue.clone(),
        )
        .attach(&router);
        *slot.borrow_mut() = Rc::downgrade(&controller);

        queue.run_frame().unwrap();
        router.borrow_mut().dispatch(&InputEvent::Wheel { delta_y: 100.0 });
        queue.run_frame().unwrap();

        assert_eq!(*seen.borrow(), vec![(4.0, 1), (5.0, 2)]);
    }

    #[test]
    fn test_renderer_can_redraw_while_drawing() {
        let slot: Rc<RefCell<Weak<RefCell<CameraController>>>> = Rc::new(RefCell::new(Weak::new()));
        let queue = FrameQueue::new();
        let router = Rc::new(RefCell::new(EventRouter::new()));

        let reader = Rc::clone(&slot);
        let controller = CameraController::builder(
            move |_: &Mat4| -> Result<()> {
                if let Some(controller) = reader.borrow().upgrade() {
                    controller.borrow_mut().redraw();
                }
                Ok(())
            },
            queue.clone(),
        )
        .attach(&router);
        *slot.borrow_mut() = Rc::downgrade(&controller);

        assert_eq!(queue.run_frame().unwrap(), 1);
        assert!(controller.borrow().frame_pending());
        assert_eq!(queue.pending(), 1);
    }

    #[test]
    fn test_resize_without_viewport() {
        let (controller, _router, _queue, _drawn) = attach(ControllerConfig::default());
        assert!(!controller.borrow_mut().resize());
    }
}
