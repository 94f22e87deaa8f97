//! One capture-then-exit session: a dedicated UI thread owns the event loop,
//! the overlay and the snapshot; the caller just waits for its [`Outcome`].

use std::fmt;
use std::path::{Path, PathBuf};

use log::{info, warn};
use winit::{
    error::EventLoopError,
    event::{Event, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::KeyCode,
};

use crate::capture::{capture_all, Snapshot};
use crate::dialog;
use crate::error::SessionError;
use crate::export::export;
use crate::overlay::{OverlayAction, OverlayState};
use crate::selection::ExportRect;

pub const EXIT_SAVED: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_CANCELED: u8 = 2;
pub const EXIT_EMPTY_SELECTION: u8 = 3;
pub const EXIT_ALREADY_RUNNING: u8 = 4;

#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Absolute, validated destination of the PNG.
    pub output: PathBuf,
    pub cancel_key: KeyCode,
}

#[derive(Debug)]
pub enum Outcome {
    Saved(PathBuf),
    Canceled,
    EmptySelection,
    Failed(SessionError),
}

impl Outcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            Outcome::Saved(_) => EXIT_SAVED,
            Outcome::Canceled => EXIT_CANCELED,
            Outcome::EmptySelection => EXIT_EMPTY_SELECTION,
            Outcome::Failed(SessionError::InstanceAlreadyRunning) => EXIT_ALREADY_RUNNING,
            Outcome::Failed(_) => EXIT_ERROR,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Saved(path) => write!(f, "saved to {}", path.display()),
            Outcome::Canceled => write!(f, "canceled"),
            Outcome::EmptySelection => write!(f, "empty selection, nothing saved"),
            Outcome::Failed(err) => write!(f, "failed: {err}"),
        }
    }
}

/// Run the overlay on its own UI thread and block until it closes.
/// macOS only allows an event loop on the main thread, so there it runs inline.
pub fn run(options: SessionOptions) -> Outcome {
    #[cfg(target_os = "macos")]
    {
        run_event_loop(&options)
    }
    #[cfg(not(target_os = "macos"))]
    {
        let spawned = std::thread::Builder::new()
            .name("snip-ui".into())
            .spawn(move || run_event_loop(&options));
        match spawned {
            Ok(handle) => handle.join().unwrap_or_else(|_| {
                Outcome::Failed(SessionError::Window("ui thread panicked".into()))
            }),
            Err(e) => Outcome::Failed(SessionError::Window(format!("spawn ui thread: {e}"))),
        }
    }
}

fn build_event_loop() -> Result<EventLoop<()>, EventLoopError> {
    #[allow(unused_mut)]
    let mut builder = EventLoop::builder();
    #[cfg(target_os = "windows")]
    {
        use winit::platform::windows::EventLoopBuilderExtWindows;
        builder.with_any_thread(true);
    }
    #[cfg(any(
        target_os = "linux",
        target_os = "dragonfly",
        target_os = "freebsd",
        target_os = "netbsd",
        target_os = "openbsd"
    ))]
    {
        winit::platform::x11::EventLoopBuilderExtX11::with_any_thread(&mut builder, true);
    }
    builder.build()
}

/// Runs the whole session on the calling thread.
#[allow(deprecated)]
pub fn run_event_loop(options: &SessionOptions) -> Outcome {
    let event_loop = match build_event_loop() {
        Ok(event_loop) => event_loop,
        Err(e) => return fail(SessionError::Window(format!("event loop: {e}"))),
    };
    let mut overlay: Option<OverlayState> = None;
    let mut outcome: Option<Outcome> = None;

    let result = event_loop.run(|event, elwt| match event {
        Event::Resumed => {
            if overlay.is_some() || outcome.is_some() {
                return;
            }
            match open_overlay(elwt, options) {
                Ok(ov) => overlay = Some(ov),
                Err(err) => {
                    outcome = Some(fail(err));
                    elwt.exit();
                }
            }
        }
        Event::WindowEvent { event, window_id } => {
            let Some(ov) = overlay.as_mut() else {
                return;
            };
            if ov.window.id() != window_id {
                return;
            }
            let action = match event {
                WindowEvent::RedrawRequested => {
                    ov.redraw();
                    OverlayAction::None
                }
                WindowEvent::CloseRequested => OverlayAction::Canceled,
                other => ov.handle_event(&other),
            };
            let finished = match action {
                OverlayAction::None => return,
                OverlayAction::Canceled => Outcome::Canceled,
                OverlayAction::Commit(rect) => {
                    // get out of the way of a possible error dialog
                    ov.hide();
                    commit(ov.snapshot(), rect, &options.output)
                }
            };
            // dropping the overlay frees the snapshot and the window
            overlay = None;
            outcome = Some(finished);
            elwt.exit();
        }
        _ => {}
    });
    drop(overlay);

    if let Err(e) = result {
        warn!("event loop ended with error: {e}");
        if outcome.is_none() {
            return fail(SessionError::Window(format!("event loop: {e}")));
        }
    }
    // the loop can also end without a decision, e.g. when the display goes away
    outcome.unwrap_or(Outcome::Canceled)
}

fn open_overlay(elwt: &ActiveEventLoop, options: &SessionOptions) -> Result<OverlayState, SessionError> {
    // before any window exists, so the overlay never shows up in the snapshot
    let snapshot = capture_all().map_err(|e| SessionError::CaptureFailed(format!("{e:#}")))?;
    let overlay = OverlayState::new(elwt, snapshot, options.cancel_key)
        .map_err(|e| SessionError::Window(format!("{e:#}")))?;
    overlay.show();
    info!("overlay shown, waiting for a selection");
    Ok(overlay)
}

/// Save the released selection. No rectangle means nothing to save.
fn commit(snapshot: &Snapshot, rect: Option<ExportRect>, path: &Path) -> Outcome {
    let Some(rect) = rect else {
        info!("selection has no area, nothing saved");
        return Outcome::EmptySelection;
    };
    match export(snapshot, rect, path) {
        Ok(()) => Outcome::Saved(path.to_path_buf()),
        Err(e) => fail(e.into()),
    }
}

fn fail(err: SessionError) -> Outcome {
    dialog::report(&err);
    Outcome::Failed(err)
}
