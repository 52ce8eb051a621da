use std::path::Path;

use crate::error::OcrError;

/// Number of pages in a PDF document.
pub fn page_count(path: &Path) -> Result<usize, OcrError> {
    let document = lopdf::Document::load(path)?;
    Ok(document.get_pages().len())
}

/// Which pages of a document to recognize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSelection {
    pub from_page: usize,
    pub to_page: usize,
    /// Comma separated 1-based page numbers, or "0" for none.
    pub page_index: String,
}

impl PageSelection {
    /// Resolve the selection to 0-based page numbers of a `count`-page
    /// document.
    ///
    /// An explicit page index wins over the range. A zero `to_page` means the
    /// end of the document.
    pub fn resolve(&self, count: usize) -> Result<Vec<usize>, OcrError> {
        let index = self.page_index.trim();
        if !index.is_empty() && index != "0" {
            return index
                .split(',')
                .map(|token| {
                    let token = token.trim();
                    let page: i64 = token
                        .parse()
                        .map_err(|_| OcrError::InvalidPageIndex(token.to_owned()))?;
                    match usize::try_from(page) {
                        Ok(p) if (1..=count).contains(&p) => Ok(p - 1),
                        _ => Err(OcrError::PageOutOfRange { page, count }),
                    }
                })
                .collect();
        }

        let end = if self.to_page == 0 { count } else { self.to_page };
        if end > count {
            return Err(out_of_range(end, count));
        }
        let start = self.from_page.saturating_sub(1);
        if self.from_page > count {
            return Err(out_of_range(self.from_page, count));
        }
        Ok((start..end).collect())
    }
}

fn out_of_range(page: usize, count: usize) -> OcrError {
    OcrError::PageOutOfRange {
        page: i64::try_from(page).unwrap_or(i64::MAX),
        count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::write_blank_pdf;

    fn selection(from_page: usize, to_page: usize, page_index: &str) -> PageSelection {
        PageSelection {
            from_page,
            to_page,
            page_index: page_index.into(),
        }
    }

    #[test]
    fn whole_document_by_default() {
        assert_eq!(selection(0, 0, "0").resolve(3).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn ranges() {
        assert_eq!(selection(0, 2, "0").resolve(5).unwrap(), vec![0, 1]);
        assert_eq!(selection(2, 4, "0").resolve(5).unwrap(), vec![1, 2, 3]);
        assert_eq!(selection(4, 0, "0").resolve(5).unwrap(), vec![3, 4]);
        assert!(selection(4, 2, "0").resolve(5).unwrap().is_empty());
    }

    #[test]
    fn page_index_overrides_range() {
        assert_eq!(selection(1, 1, "3, 1").resolve(5).unwrap(), vec![2, 0]);
    }

    #[test]
    fn pages_outside_document_fail() {
        assert!(matches!(
            selection(0, 6, "0").resolve(5),
            Err(OcrError::PageOutOfRange { page: 6, count: 5 })
        ));
        assert!(matches!(
            selection(0, 0, "0,2").resolve(5),
            Err(OcrError::PageOutOfRange { page: 0, .. })
        ));
        assert!(matches!(
            selection(0, 0, "two").resolve(5),
            Err(OcrError::InvalidPageIndex(_))
        ));
        assert!(selection(7, 0, "0").resolve(5).is_err());
    }

    #[test]
    fn counts_pages() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("three.pdf");
        write_blank_pdf(&path, 3);
        assert_eq!(page_count(&path).unwrap(), 3);
    }

    #[test]
    fn garbage_is_not_a_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.pdf");
        std::fs::write(&path, b"not a pdf").unwrap();
        assert!(matches!(page_count(&path), Err(OcrError::Pdf(_))));
    }
}
