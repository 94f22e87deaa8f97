// Blocking error notifications. Every message is also logged so it reaches
// stderr when dialogs are switched off.

use log::{error, info};
use rfd::{MessageButtons, MessageDialog, MessageLevel};
use std::env;

use crate::error::SessionError;

/// Set to log errors instead of popping up a dialog.
pub const NO_DIALOG_ENV: &str = "REGION_SNIP_NO_DIALOG";

pub fn report(err: &SessionError) {
    if err.is_silent() {
        info!("{err}");
        return;
    }
    show_error(&err.to_string());
}

pub fn show_error(message: &str) {
    error!("{message}");
    if env::var_os(NO_DIALOG_ENV).is_some() {
        return;
    }
    let _ = MessageDialog::new()
        .set_level(MessageLevel::Error)
        .set_title("Error")
        .set_description(message)
        .set_buttons(MessageButtons::Ok)
        .show();
}
