//! Printable PDF summary of a stored image analysis.

use std::io::BufWriter;

use printpdf::*;

use crate::models::AnalysisRecord;

const PAGE_WIDTH: Mm = Mm(210.0);
const PAGE_HEIGHT: Mm = Mm(297.0);
const TOP: Mm = Mm(280.0);
const BOTTOM_MARGIN: f32 = 20.0;
const WRAP_CHARS: usize = 85;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("PDF font error: {0}")]
    Font(String),
    #[error("PDF save error: {0}")]
    Save(String),
}

/// Render `record` as a one-or-more page A4 report. Returns PDF bytes.
pub fn generate_analysis_pdf(record: &AnalysisRecord) -> Result<Vec<u8>, ReportError> {
    let title = "Medical Image Analysis Report";
    let (doc, page1, layer1) = PdfDocument::new(title, PAGE_WIDTH, PAGE_HEIGHT, "Layer 1");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ReportError::Font(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ReportError::Font(e.to_string()))?;

    let mut page = PageWriter {
        layer: doc.get_page(page1).get_layer(layer1),
        doc: &doc,
        y: TOP,
    };

    page.line(title, 16.0, Mm(20.0), &bold, 10.0);
    page.line(
        &format!("Generated: {}", record.created_at.format("%Y-%m-%d %H:%M UTC")),
        9.0,
        Mm(20.0),
        &font,
        8.0,
    );

    page.heading("Diagnosis", &bold);
    for line in wrap_text(&record.diagnosis, WRAP_CHARS) {
        page.line(&line, 10.0, Mm(25.0), &font, 5.0);
    }

    for (heading, items) in [
        ("Observations", &record.observations),
        ("Potential Conditions", &record.potential_conditions),
        ("Areas of Concern", &record.areas_of_concern),
    ] {
        page.heading(heading, &bold);
        if items.is_empty() {
            page.line("None reported", 10.0, Mm(25.0), &font, 5.0);
            continue;
        }
        for item in items {
            for (i, line) in wrap_text(item, WRAP_CHARS - 4).into_iter().enumerate() {
                let text = if i == 0 { format!("- {line}") } else { format!("  {line}") };
                page.line(&text, 10.0, Mm(25.0), &font, 5.0);
            }
        }
    }

    page.y -= Mm(6.0);
    page.line(
        "This report is machine-generated and is not a substitute for professional medical advice.",
        8.0,
        Mm(20.0),
        &font,
        4.0,
    );

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| ReportError::Save(e.to_string()))?;
    buf.into_inner()
        .map_err(|e| ReportError::Save(e.to_string()))
}

/// Tracks the cursor and starts a new page when the bottom margin is hit.
struct PageWriter<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    y: Mm,
}

impl PageWriter<'_> {
    fn line(&mut self, text: &str, size: f32, x: Mm, font: &IndirectFontRef, advance: f32) {
        if self.y.0 < BOTTOM_MARGIN {
            let (page, layer) = self.doc.add_page(PAGE_WIDTH, PAGE_HEIGHT, "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = TOP;
        }
        self.layer.use_text(text, size, x, self.y, font);
        self.y -= Mm(advance);
    }

    fn heading(&mut self, text: &str, bold: &IndirectFontRef) {
        self.y -= Mm(4.0);
        self.line(text, 12.0, Mm(20.0), bold, 7.0);
    }
}

fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.chars().count() + word.chars().count() + 1 > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
