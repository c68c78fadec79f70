//! PDF bank statements.
//!
//! The document is parsed once when opened. Each page is laid out on demand:
//! glyph positions are captured through a [`pdf_extract::OutputDev`] and
//! handed to [`crate::layout`] to rebuild its tables. Scanned statements have
//! no text layer and yield no tables.

use std::any::Any;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use log::{debug, warn};
use pdf_extract::{Document, MediaBox, OutputDev, OutputError, Transform};

use bankrec_core::{RawPage, ReconcileError, ReconcileResult, TableSource};

use crate::layout::{self, Glyph};

pub struct PdfStatement {
    doc: Document,
    /// Page numbers as stored in the document, in order.
    pages: Vec<u32>,
}

impl PdfStatement {
    pub fn open(path: impl AsRef<Path>) -> ReconcileResult<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)
            .map_err(|e| ReconcileError::Document(format!("reading {}: {e}", path.display())))?;
        Self::from_bytes(&bytes).map_err(|e| match e {
            ReconcileError::Document(msg) => {
                ReconcileError::Document(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> ReconcileResult<Self> {
        let mut doc = guarded(|| Ok(Document::load_mem(bytes)?))?;
        if doc.is_encrypted() {
            // Statements are often "protected" with an empty user password.
            guarded(|| Ok(doc.decrypt("")?))
                .map_err(|_| ReconcileError::Document("encrypted PDF".to_string()))?;
        }
        let pages: Vec<u32> = doc.get_pages().into_keys().collect();
        debug!("pdf: {} page(s)", pages.len());
        Ok(Self { doc, pages })
    }
}

impl TableSource for PdfStatement {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_tables(&mut self, page: usize) -> ReconcileResult<RawPage> {
        let number = *self
            .pages
            .get(page)
            .ok_or_else(|| ReconcileError::Document(format!("page {} out of range", page + 1)))?;

        let mut sink = GlyphSink::default();
        guarded(|| pdf_extract::output_doc_page(&self.doc, &mut sink, number))
            .map_err(|e| ReconcileError::Document(format!("page {number}: {e}")))?;
        debug!("pdf: page {number}: {} glyph(s)", sink.glyphs.len());

        Ok(layout::page_tables(sink.glyphs))
    }
}

/// Run a pdf-extract call, turning its panics on malformed documents into
/// errors.
fn guarded<T>(f: impl FnOnce() -> Result<T, OutputError>) -> ReconcileResult<T> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(ReconcileError::Document(e.to_string())),
        Err(payload) => {
            let msg = panic_message(payload.as_ref());
            warn!("pdf: extraction aborted: {msg}");
            Err(ReconcileError::Document(format!("malformed PDF: {msg}")))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown error")
}

/// Collects every glyph of one page with its position.
#[derive(Default)]
struct GlyphSink {
    /// Top edge of the media box; flips y so it grows downwards.
    top: f64,
    glyphs: Vec<Glyph>,
}

impl OutputDev for GlyphSink {
    fn begin_page(
        &mut self,
        _page_num: u32,
        media_box: &MediaBox,
        _art_box: Option<(f64, f64, f64, f64)>,
    ) -> Result<(), OutputError> {
        self.top = media_box.ury;
        self.glyphs.clear();
        Ok(())
    }

    fn end_page(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn output_character(
        &mut self,
        trm: &Transform,
        width: f64,
        _spacing: f64,
        font_size: f64,
        char: &str,
    ) -> Result<(), OutputError> {
        // Font size in device space: side of the square with the same area.
        let sx = font_size * (trm.m11 + trm.m21);
        let sy = font_size * (trm.m12 + trm.m22);
        let size = (sx * sy).abs().sqrt();

        self.glyphs.push(Glyph {
            x: trm.m31,
            y: self.top - trm.m32,
            width: width * size,
            size,
            text: char.to_string(),
        });
        Ok(())
    }

    fn begin_word(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn end_word(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn end_line(&mut self) -> Result<(), OutputError> {
        Ok(())
    }
}
