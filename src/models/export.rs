use clap::ValueEnum;

/// Supported export document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// Portable document, typeset onto A4 pages.
    Pdf,
    /// Plain text, written verbatim.
    Txt,
}

impl ExportFormat {
    /// Returns the fixed output file name for this format.
    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "summary_and_abstracts.pdf",
            ExportFormat::Txt => "summary_and_abstracts.txt",
        }
    }
}

/// A one-shot request to persist report content to disk.
///
/// Created on user action and consumed exactly once by the exporter;
/// nothing is kept beyond the written file.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub format: ExportFormat,
    pub content: String,
}

impl ExportRequest {
    pub fn new(format: ExportFormat, content: impl Into<String>) -> Self {
        Self {
            format,
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_are_fixed_per_format() {
        assert_eq!(ExportFormat::Pdf.file_name(), "summary_and_abstracts.pdf");
        assert_eq!(ExportFormat::Txt.file_name(), "summary_and_abstracts.txt");
    }
}
