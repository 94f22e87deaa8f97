// Windows-specific window helpers: disabling DWM show/hide animations and
// scoped mouse capture. Other platforms get no-ops; X11 and Wayland already
// grab the pointer implicitly while a button is held.

use winit::window::Window;

#[cfg(target_os = "windows")]
fn hwnd_of(window: &Window) -> Option<windows::Win32::Foundation::HWND> {
    use windows::Win32::Foundation::HWND;
    use winit::raw_window_handle::{HasWindowHandle, RawWindowHandle};

    match window.window_handle().ok()?.as_raw() {
        RawWindowHandle::Win32(win) => Some(HWND(win.hwnd.get() as *mut _)),
        _ => None,
    }
}

/// Show the overlay instantly instead of fading it in.
#[cfg(target_os = "windows")]
pub fn disable_window_transitions(window: &Window) {
    use windows::Win32::Graphics::Dwm::{DwmSetWindowAttribute, DWMWA_TRANSITIONS_FORCEDISABLED};

    let Some(hwnd) = hwnd_of(window) else {
        return;
    };
    let value: i32 = 1;
    let hr = unsafe {
        DwmSetWindowAttribute(
            hwnd,
            DWMWA_TRANSITIONS_FORCEDISABLED,
            &value as *const _ as *const _,
            std::mem::size_of_val(&value) as u32,
        )
    };
    match hr {
        Ok(()) => log::debug!("disabled DWM transitions for window: {hwnd:?}"),
        Err(e) => log::debug!("failed to disable DWM transitions ({e}) for window: {hwnd:?}"),
    }
}

#[cfg(not(target_os = "windows"))]
pub fn disable_window_transitions(_window: &Window) {}

/// Exclusive pointer capture for the overlay; released when dropped.
pub struct PointerCapture {
    #[cfg(target_os = "windows")]
    held: bool,
}

impl PointerCapture {
    #[cfg(target_os = "windows")]
    pub fn acquire(window: &Window) -> Self {
        use windows::Win32::UI::Input::KeyboardAndMouse::SetCapture;

        let held = match hwnd_of(window) {
            Some(hwnd) => {
                unsafe {
                    SetCapture(hwnd);
                }
                true
            }
            None => {
                log::warn!("no native handle, pointer capture skipped");
                false
            }
        };
        Self { held }
    }

    #[cfg(not(target_os = "windows"))]
    pub fn acquire(_window: &Window) -> Self {
        Self {}
    }
}

#[cfg(target_os = "windows")]
impl Drop for PointerCapture {
    fn drop(&mut self) {
        use windows::Win32::UI::Input::KeyboardAndMouse::ReleaseCapture;

        if self.held {
            if let Err(e) = unsafe { ReleaseCapture() } {
                log::warn!("failed to release pointer capture: {e}");
            }
        }
    }
}
