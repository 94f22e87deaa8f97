//! Single instance helper.
//! Windows: a named mutex in the Global namespace.
//! Other platforms: an exclusive `fs2` lock on a file in the temp directory.
//! The lock is held for as long as the returned guard lives.

use log::warn;

const LOCK_NAME: &str = "RegionSnipSingletonMutex";

/// Try to become the only running instance. `None` if another one holds the lock.
pub fn acquire_single_instance() -> Option<InstanceGuard> {
    acquire_named(LOCK_NAME)
}

#[cfg(target_os = "windows")]
use windows::core::PCWSTR;
#[cfg(target_os = "windows")]
use windows::Win32::{
    Foundation::{CloseHandle, GetLastError, ERROR_ALREADY_EXISTS, HANDLE},
    System::Threading::CreateMutexW,
};

#[cfg(target_os = "windows")]
pub struct InstanceGuard(Option<HANDLE>);

#[cfg(target_os = "windows")]
impl Drop for InstanceGuard {
    fn drop(&mut self) {
        if let Some(handle) = self.0.take() {
            unsafe {
                let _ = CloseHandle(handle);
            }
        }
    }
}

#[cfg(target_os = "windows")]
pub fn acquire_named(name: &str) -> Option<InstanceGuard> {
    let full = format!("Global\\{name}");
    let wide: Vec<u16> = full.encode_utf16().chain(std::iter::once(0)).collect();
    let result = unsafe { CreateMutexW(None, false, PCWSTR(wide.as_ptr())) };
    let handle = match result {
        Ok(h) => h,
        Err(e) => {
            // could not create the mutex at all: run unguarded
            warn!("single instance mutex unavailable: {e}");
            return Some(InstanceGuard(None));
        }
    };
    unsafe {
        if GetLastError() == ERROR_ALREADY_EXISTS {
            let _ = CloseHandle(handle);
            None
        } else {
            Some(InstanceGuard(Some(handle)))
        }
    }
}

#[cfg(not(target_os = "windows"))]
use fs2::FileExt;
#[cfg(not(target_os = "windows"))]
use std::fs::{File, OpenOptions};

#[cfg(not(target_os = "windows"))]
pub struct InstanceGuard(Option<File>);

#[cfg(not(target_os = "windows"))]
impl Drop for InstanceGuard {
    fn drop(&mut self) {
        if let Some(file) = self.0.take() {
            if let Err(e) = file.unlock() {
                warn!("failed to unlock instance lock: {e}");
            }
        }
    }
}

#[cfg(not(target_os = "windows"))]
pub fn acquire_named(name: &str) -> Option<InstanceGuard> {
    let path = std::env::temp_dir().join(format!("{name}.lock"));
    let file = match OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&path)
    {
        Ok(f) => f,
        Err(e) => {
            warn!("single instance lock {} unavailable: {e}", path.display());
            return Some(InstanceGuard(None));
        }
    };
    match file.try_lock_exclusive() {
        Ok(()) => Some(InstanceGuard(Some(file))),
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_fails_while_first_is_held() {
        let name = format!("RegionSnipTest-{}", std::process::id());
        let first = acquire_named(&name).expect("first acquire");
        assert!(acquire_named(&name).is_none());
        drop(first);
        assert!(acquire_named(&name).is_some());
    }
}
