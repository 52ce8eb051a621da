//! OCR content pack.
//!
//! Text extraction from images and PDF documents. Recognition is delegated
//! to the `tesseract` CLI and PDF pages are rendered with `pdftoppm`; both
//! paths are configurable through [`OcrTools`].

pub mod actions;
pub mod blocks;
pub mod error;
pub mod pdf;
pub mod tools;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use actionpack_action::DynAction;

pub use actions::{ExtractTextFromImage, ExtractTextFromPdf};
pub use blocks::TextBlock;
pub use error::OcrError;
pub use pdf::PageSelection;
pub use tools::OcrTools;

/// Every action of the pack, using tools found on `PATH`.
pub fn actions() -> Vec<Arc<dyn DynAction>> {
    actions_with_tools(&OcrTools::default())
}

/// Every action of the pack, using the given tool paths.
pub fn actions_with_tools(tools: &OcrTools) -> Vec<Arc<dyn DynAction>> {
    vec![
        Arc::new(ExtractTextFromImage::with_tools(tools.clone())),
        Arc::new(ExtractTextFromPdf::with_tools(tools.clone())),
    ]
}
