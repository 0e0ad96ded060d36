use std::path::Path;

use crate::error::{Error, Result};

/// Collapse whitespace runs inside a page and drop blank lines.
fn clean_page(text: &str) -> String {
    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
        .replace(['\u{0}', '\u{FEFF}'], "")
}

/// Text of each page, in page order.
pub fn extract_pages(bytes: &[u8]) -> Result<Vec<String>> {
    let pages =
        pdf_extract::extract_text_from_mem_by_pages(bytes).map_err(|e| Error::Pdf(e.to_string()))?;
    Ok(pages.iter().map(|p| clean_page(p)).collect())
}

/// All pages joined by a blank line.
pub fn extract_text(bytes: &[u8]) -> Result<String> {
    let pages = extract_pages(bytes)?;
    Ok(pages.join("\n\n").trim().to_string())
}

pub fn extract_file(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    extract_text(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_page_collapses_whitespace() {
        let dirty = "  Hej   där  \n\n\n  Världen \u{FEFF} ";
        assert_eq!(clean_page(dirty), "Hej där\nVärlden");
    }

    #[test]
    fn garbage_is_reported_as_pdf_error() {
        let err = extract_text(b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, Error::Pdf(_)));
    }
}
