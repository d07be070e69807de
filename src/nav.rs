use crate::error::{RepopageError, Result};

/// Side effects that leave the terminal: the browser and the clipboard.
pub trait Navigator: Send + Sync + std::fmt::Debug {
    fn open_url(&self, url: &str) -> Result<()>;
    fn copy_to_clipboard(&self, text: &str) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct SystemNavigator;

impl Navigator for SystemNavigator {
    fn open_url(&self, url: &str) -> Result<()> {
        open::that_detached(url)?;
        Ok(())
    }

    fn copy_to_clipboard(&self, text: &str) -> Result<()> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| RepopageError::Clipboard(e.to_string()))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|e| RepopageError::Clipboard(e.to_string()))
    }
}
