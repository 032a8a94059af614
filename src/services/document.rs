//! Printable documents generated from admin form input.

use std::path::PathBuf;

use async_trait::async_trait;
use printpdf::{BuiltinFont, Mm, PdfDocument};
use serde_json::{Map, Value};

pub const ARRANGEMENT_TITLE: &str = "Funeral Arrangement Summary";

/// Fields printed first, in this order, with their labels.
const KNOWN_FIELDS: &[(&str, &str)] = &[
    ("deceasedName", "Deceased"),
    ("refNumber", "Reference"),
    ("serviceDate", "Service date"),
    ("serviceTime", "Service time"),
    ("serviceLocation", "Service location"),
];

const MAX_LINES: usize = 48;

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("document has no content")]
    Empty,
    #[error("failed to render document: {0}")]
    Render(String),
    #[error("failed to write document to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A titled list of `label: value` lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormDocument {
    pub title: String,
    pub lines: Vec<(String, String)>,
}

impl FormDocument {
    /// Build an arrangement summary from submitted form fields. Known fields
    /// come first; any other non-empty scalar fields follow in key order.
    pub fn arrangement_summary(fields: &Map<String, Value>) -> Self {
        let mut lines = Vec::new();

        for (key, label) in KNOWN_FIELDS {
            let value = fields.get(*key).and_then(scalar_text).unwrap_or_default();
            lines.push((label.to_string(), value));
        }

        let mut extras: Vec<_> = fields
            .iter()
            .filter(|(key, _)| !KNOWN_FIELDS.iter().any(|(known, _)| known == key))
            .filter_map(|(key, value)| scalar_text(value).map(|text| (key.clone(), text)))
            .filter(|(_, text)| !text.is_empty())
            .collect();
        extras.sort();
        lines.extend(extras);
        lines.truncate(MAX_LINES);

        Self {
            title: ARRANGEMENT_TITLE.to_string(),
            lines,
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    /// Render to bytes; the file extension the output should be saved with
    /// is given by [`DocumentRenderer::extension`].
    async fn render(&self, document: &FormDocument) -> Result<Vec<u8>, DocumentError>;

    fn extension(&self) -> &'static str;
}

/// Lays a [`FormDocument`] out on A4 pages in Helvetica via `printpdf`,
/// continuing onto further pages when the lines run out of room.
#[derive(Debug, Default, Clone)]
pub struct PdfRenderer;

#[async_trait]
impl DocumentRenderer for PdfRenderer {
    async fn render(&self, document: &FormDocument) -> Result<Vec<u8>, DocumentError> {
        if document.title.trim().is_empty() && document.lines.is_empty() {
            return Err(DocumentError::Empty);
        }
        // printpdf documents are not Send; build and serialize in one go.
        render_pdf(document)
    }

    fn extension(&self) -> &'static str {
        "pdf"
    }
}

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;
const LINE_STEP_MM: f32 = 6.0;
const LINES_PER_PAGE: usize = 40;

fn render_pdf(document: &FormDocument) -> Result<Vec<u8>, DocumentError> {
    let render_err = |e: printpdf::Error| DocumentError::Render(e.to_string());

    let (pdf, page, layer) = PdfDocument::new(
        printable(&document.title),
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "content",
    );
    let font = pdf.add_builtin_font(BuiltinFont::Helvetica).map_err(render_err)?;

    let mut current = pdf.get_page(page).get_layer(layer);
    current.use_text(
        printable(&document.title),
        20.0,
        Mm(MARGIN_MM),
        Mm(PAGE_HEIGHT_MM - MARGIN_MM),
        &font,
    );

    for (i, chunk) in document.lines.chunks(LINES_PER_PAGE).enumerate() {
        if i > 0 {
            let (page, layer) = pdf.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "content");
            current = pdf.get_page(page).get_layer(layer);
        }
        let mut y = PAGE_HEIGHT_MM - MARGIN_MM - 2.0 * LINE_STEP_MM;
        for (label, value) in chunk {
            current.use_text(
                format!("{}: {}", printable(label), printable(value)),
                12.0,
                Mm(MARGIN_MM),
                Mm(y),
                &font,
            );
            y -= LINE_STEP_MM;
        }
    }

    pdf.save_to_bytes().map_err(render_err)
}

/// The built-in fonts only cover a Latin-1 style encoding.
fn printable(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '?' })
        .collect()
}
