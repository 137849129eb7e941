use tracing::{debug, warn};

use crate::error::Result;

/// System clipboard, opened on first use and kept for the session.
///
/// On X11/Wayland the copied text only stays available while a handle is alive, so
/// the handle must outlive the copy call.
#[derive(Default)]
pub struct Clipboard {
    inner: Option<arboard::Clipboard>,
}

impl Clipboard {
    pub fn is_open(&self) -> bool {
        self.inner.is_some()
    }

    pub fn copy_text(&mut self, text: &str) -> Result<()> {
        let mut clipboard = match self.inner.take() {
            Some(c) => c,
            None => arboard::Clipboard::new()?,
        };
        if let Err(e) = clipboard.set_text(text.to_string()) {
            warn!("clipboard write failed, reopening on next copy");
            return Err(e.into());
        }
        self.inner = Some(clipboard);
        debug!("copied {} bytes to clipboard", text.len());
        Ok(())
    }
}
