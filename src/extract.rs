//! PDF text extraction.
//!
//! Turns raw PDF bytes into a single linear reading-order string. Layout,
//! font, and positional metadata are discarded. Extraction is
//! all-or-nothing per document: an unparseable structure or an
//! undecodable page fails the whole document, but a page with no
//! extractable glyphs (e.g. a scanned image-only page) just contributes
//! nothing.

use crate::error::QueryError;

/// Extract plain text from PDF bytes, pages in ascending order, each
/// page's text joined with a single space. No page-break markers.
pub fn extract_text(bytes: &[u8]) -> Result<String, QueryError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| QueryError::Extraction(e.to_string()))?;

    let mut out = String::new();
    for page in &pages {
        let text = page.trim();
        if !out.is_empty() && !text.is_empty() {
            out.push(' ');
        }
        out.push_str(text);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal valid PDF with one text page per phrase. Builds body then
    /// xref with correct byte offsets so pdf-extract can parse it.
    fn minimal_pdf(phrases: &[&str]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(b"%PDF-1.4\n");

        let n_pages = phrases.len();
        // Object numbering: 1 catalog, 2 pages node, 3..3+n pages,
        // 3+n..3+2n content streams, 3+2n font.
        let font_obj = 3 + 2 * n_pages;
        let mut offsets = Vec::new();

        offsets.push(out.len());
        out.extend_from_slice(b"1 0 obj << /Type /Catalog /Pages 2 0 R >> endobj\n");

        offsets.push(out.len());
        let kids = (0..n_pages)
            .map(|i| format!("{} 0 R", 3 + i))
            .collect::<Vec<_>>()
            .join(" ");
        out.extend_from_slice(
            format!(
                "2 0 obj << /Type /Pages /Kids [{}] /Count {} >> endobj\n",
                kids, n_pages
            )
            .as_bytes(),
        );

        for i in 0..n_pages {
            offsets.push(out.len());
            out.extend_from_slice(
                format!(
                    "{} 0 obj << /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents {} 0 R /Resources << /Font << /F1 {} 0 R >> >> >> endobj\n",
                    3 + i,
                    3 + n_pages + i,
                    font_obj
                )
                .as_bytes(),
            );
        }

        for (i, phrase) in phrases.iter().enumerate() {
            offsets.push(out.len());
            let content = format!("BT /F1 12 Tf 100 700 Td ({}) Tj ET\n", phrase);
            out.extend_from_slice(
                format!(
                    "{} 0 obj << /Length {} >> stream\n{}endstream endobj\n",
                    3 + n_pages + i,
                    content.len(),
                    content
                )
                .as_bytes(),
            );
        }

        offsets.push(out.len());
        out.extend_from_slice(
            format!(
                "{} 0 obj << /Type /Font /Subtype /Type1 /BaseFont /Helvetica >> endobj\n",
                font_obj
            )
            .as_bytes(),
        );

        let xref_start = out.len();
        out.extend_from_slice(format!("xref\n0 {}\n", font_obj + 1).as_bytes());
        out.extend_from_slice(format!("{:010} 65535 f \n", 0).as_bytes());
        for offset in &offsets {
            out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
        }
        out.extend_from_slice(
            format!("trailer << /Size {} /Root 1 0 R >>\nstartxref\n", font_obj + 1).as_bytes(),
        );
        out.extend_from_slice(format!("{}\n", xref_start).as_bytes());
        out.extend_from_slice(b"%%EOF\n");
        out
    }

    #[test]
    fn invalid_bytes_fail_extraction() {
        let err = extract_text(b"not a pdf").unwrap_err();
        assert!(matches!(err, QueryError::Extraction(_)));
    }

    #[test]
    fn single_page_text_survives() {
        let pdf = minimal_pdf(&["the quick brown fox"]);
        let text = extract_text(&pdf).unwrap();
        assert!(text.contains("the quick brown fox"), "got: {text:?}");
    }

    #[test]
    fn pages_come_out_in_order() {
        let pdf = minimal_pdf(&["first page phrase", "second page phrase"]);
        let text = extract_text(&pdf).unwrap();
        let a = text.find("first page phrase").expect("first phrase missing");
        let b = text
            .find("second page phrase")
            .expect("second phrase missing");
        assert!(a < b, "page order lost: {text:?}");
    }

    #[test]
    fn no_double_separator_between_pages() {
        let pdf = minimal_pdf(&["alpha", "beta"]);
        let text = extract_text(&pdf).unwrap();
        assert!(!text.starts_with(' '));
        assert!(!text.ends_with(' '));
    }
}
