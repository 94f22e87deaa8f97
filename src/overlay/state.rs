use anyhow::{anyhow, Result};
use log::debug;
use softbuffer::{Context, Surface};
use std::num::NonZeroU32;
use std::rc::Rc;
use winit::{
    dpi::{PhysicalPosition, PhysicalSize},
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::ActiveEventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorIcon, Window, WindowAttributes, WindowLevel},
};

use crate::capture::Snapshot;
use crate::keys::PAN_KEY;
use crate::overlay::drawing::{Canvas, OUTLINE};
use crate::renderer::{PixelRect, Renderer};
use crate::selection::{Effect, ExportRect, Point, SelectionEvent, SelectionState};
use crate::windows_util::{disable_window_transitions, PointerCapture};

// OverlayAction: what the host has to do after an event
#[derive(Debug, PartialEq, Eq)]
pub enum OverlayAction {
    None,
    /// Button released. `None` when the selection had no area.
    Commit(Option<ExportRect>),
    Canceled,
}

// OverlayState: borderless window spanning every display, showing the
// snapshot taken before it was created.
pub struct OverlayState {
    pub window: Rc<Window>,
    _context: Context<Rc<Window>>,
    surface: Surface<Rc<Window>, Rc<Window>>,
    snapshot: Snapshot,
    renderer: Renderer,
    selection: SelectionState,
    cancel_key: KeyCode,
    /// Unknown until the first `CursorMoved`.
    last_cursor: Option<Point>,
    pointer_capture: Option<PointerCapture>,
}

impl OverlayState {
    /// Create the (still hidden) overlay for `snapshot`. Call [`show`] once
    /// ready; the snapshot has to be taken before that.
    ///
    /// [`show`]: OverlayState::show
    pub fn new(active: &ActiveEventLoop, snapshot: Snapshot, cancel_key: KeyCode) -> Result<Self> {
        let bounds = snapshot.bounds();
        let attrs = WindowAttributes::default()
            .with_title("Region Snip")
            .with_decorations(false)
            .with_resizable(false)
            .with_window_level(WindowLevel::AlwaysOnTop)
            .with_visible(false)
            .with_position(PhysicalPosition::new(bounds.left, bounds.top))
            // physical pixels so the window maps 1:1 onto the snapshot
            .with_inner_size(PhysicalSize::new(bounds.width.max(1), bounds.height.max(1)));
        #[cfg(target_os = "windows")]
        let attrs = {
            use winit::platform::windows::WindowAttributesExtWindows;
            attrs.with_skip_taskbar(true)
        };
        let window = Rc::new(active.create_window(attrs)?);
        disable_window_transitions(&window);

        let context = Context::new(window.clone()).map_err(|e| anyhow!("overlay ctx: {e}"))?;
        let surface =
            Surface::new(&context, window.clone()).map_err(|e| anyhow!("overlay surface: {e}"))?;
        let renderer = Renderer::new(snapshot.image())?;
        Ok(Self {
            window,
            _context: context,
            surface,
            snapshot,
            renderer,
            selection: SelectionState::Idle,
            cancel_key,
            last_cursor: None,
            pointer_capture: None,
        })
    }

    pub fn show(&self) {
        let bounds = self.snapshot.bounds();
        self.window
            .set_outer_position(PhysicalPosition::new(bounds.left, bounds.top));
        self.window.set_cursor(CursorIcon::Crosshair);
        self.window.set_visible(true);
        self.window.focus_window();
        self.window.request_redraw();
    }

    pub fn hide(&mut self) {
        self.pointer_capture = None;
        self.window.set_visible(false);
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn handle_event(&mut self, event: &WindowEvent) -> OverlayAction {
        let input = match event {
            WindowEvent::MouseInput { state, button, .. } => {
                button_input(*button, *state, self.last_cursor)
            }
            WindowEvent::CursorMoved { position, .. } => {
                let p = Point::new(position.x, position.y);
                self.last_cursor = Some(p);
                Some(SelectionEvent::PointerMoved(p))
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => key_input(*code, *state, self.cancel_key),
            _ => None,
        };
        match input {
            Some(input) => self.apply(input),
            None => OverlayAction::None,
        }
    }

    fn apply(&mut self, input: SelectionEvent) -> OverlayAction {
        let bounds = (self.snapshot.width(), self.snapshot.height());
        let (next, effect) = self.selection.step(input, bounds);
        if std::mem::discriminant(&next) != std::mem::discriminant(&self.selection) {
            debug!("selection {:?} -> {:?}", self.selection, next);
        }
        self.selection = next;
        match effect {
            Effect::None => OverlayAction::None,
            Effect::Redraw => {
                self.window.request_redraw();
                OverlayAction::None
            }
            Effect::CapturePointer => {
                self.pointer_capture = Some(PointerCapture::acquire(&self.window));
                self.window.request_redraw();
                OverlayAction::None
            }
            Effect::Commit(rect) => {
                self.pointer_capture = None;
                OverlayAction::Commit(rect)
            }
            Effect::Cancel => {
                self.pointer_capture = None;
                OverlayAction::Canceled
            }
        }
    }

    pub fn redraw(&mut self) {
        let size = self.window.inner_size();
        let (Some(w), Some(h)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) else {
            return;
        };
        if let Err(e) = self.surface.resize(w, h) {
            debug!("overlay resize failed: {e}");
            return;
        }
        let mut frame = match self.surface.buffer_mut() {
            Ok(frame) => frame,
            Err(e) => {
                debug!("overlay buffer unavailable: {e}");
                return;
            }
        };
        let hole = self
            .selection
            .live_rect()
            .map(|(x, y, w, h)| PixelRect::new(x, y, w as i32, h as i32));
        self.renderer
            .compose(&mut frame, size.width, size.height, hole);
        {
            let mut canvas = Canvas::new(&mut frame, size.width, size.height);
            if let Some(r) = hole.filter(|r| !r.is_empty()) {
                canvas.stroke_rect(r.x, r.y, r.w, r.h, OUTLINE);
            }
            if let Some(label) = self.selection.label() {
                canvas.draw_label(&label);
            }
        }
        if let Err(e) = frame.present() {
            debug!("overlay present failed: {e}");
        }
    }
}

// Left button only. A press before any cursor position is known is dropped.
fn button_input(
    button: MouseButton,
    state: ElementState,
    cursor: Option<Point>,
) -> Option<SelectionEvent> {
    if button != MouseButton::Left {
        return None;
    }
    let p = cursor?;
    Some(match state {
        ElementState::Pressed => SelectionEvent::PointerPressed(p),
        ElementState::Released => SelectionEvent::PointerReleased(p),
    })
}

fn key_input(code: KeyCode, state: ElementState, cancel_key: KeyCode) -> Option<SelectionEvent> {
    // cancel wins even when it is also the pan key
    if code == cancel_key {
        return (state == ElementState::Pressed).then_some(SelectionEvent::CancelKey);
    }
    if code == PAN_KEY {
        return Some(match state {
            ElementState::Pressed => SelectionEvent::PanKeyDown,
            ElementState::Released => SelectionEvent::PanKeyUp,
        });
    }
    None
}
