//! Output formatting for parsed candidates.

use std::io::Write;

use tracing::debug;

use rescan_core::ParsedCandidate;

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub fn format_candidate(candidate: &ParsedCandidate, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(candidate)?),
        OutputFormat::Csv => format_csv(candidate),
        OutputFormat::Text => Ok(format_text(candidate)),
    }
}

fn format_csv(candidate: &ParsedCandidate) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(ParsedCandidate::summary_header())?;
    wtr.write_record(candidate.summary_row())?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(candidate: &ParsedCandidate) -> String {
    let field = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());
    let mut output = String::new();

    if let Some(source) = &candidate.source_file {
        output.push_str(&format!("Resume: {}\n\n", source));
    }

    output.push_str(&format!("  Name:     {}\n", field(&candidate.name)));
    output.push_str(&format!("  Email:    {}\n", field(&candidate.email)));
    output.push_str(&format!("  Phone:    {}\n", field(&candidate.phone)));
    output.push_str(&format!("  LinkedIn: {}\n", field(&candidate.linkedin)));
    output.push_str(&format!("  GitHub:   {}\n", field(&candidate.github)));
    output.push('\n');
    output.push_str(&format!("Confidence: {:.2}\n", candidate.confidence));
    output.push_str(&format!("OCR used: {}\n", if candidate.ocr_used { "yes" } else { "no" }));

    if candidate.has_errors() {
        output.push_str("\nErrors:\n");
        for error in &candidate.errors {
            output.push_str(&format!("  - {}\n", error));
        }
    }

    output
}

/// Summary CSV written in chunks as candidates arrive.
pub struct SummaryWriter<W: Write> {
    writer: csv::Writer<W>,
    pending: Vec<ParsedCandidate>,
    batch_size: usize,
    written: usize,
}

impl SummaryWriter<std::fs::File> {
    pub fn create(path: &std::path::Path, batch_size: usize) -> anyhow::Result<Self> {
        Self::new(std::fs::File::create(path)?, batch_size)
    }
}

impl<W: Write> SummaryWriter<W> {
    /// Write the header immediately; rows follow every `batch_size` candidates.
    pub fn new(inner: W, batch_size: usize) -> anyhow::Result<Self> {
        let mut writer = csv::Writer::from_writer(inner);
        writer.write_record(ParsedCandidate::summary_header())?;
        writer.flush()?;

        Ok(Self {
            writer,
            pending: Vec::new(),
            batch_size: batch_size.max(1),
            written: 0,
        })
    }

    pub fn push(&mut self, candidate: ParsedCandidate) -> anyhow::Result<()> {
        self.pending.push(candidate);
        if self.pending.len() >= self.batch_size {
            self.flush_pending()?;
        }
        Ok(())
    }

    /// Rows already flushed to the underlying writer.
    pub fn written(&self) -> usize {
        self.written
    }

    fn flush_pending(&mut self) -> anyhow::Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }

        for candidate in self.pending.drain(..) {
            self.writer.write_record(candidate.summary_row())?;
            self.written += 1;
        }
        self.writer.flush()?;

        debug!("Summary now holds {} rows", self.written);
        Ok(())
    }

    /// Flush remaining rows and return the underlying writer.
    pub fn finish(mut self) -> anyhow::Result<W> {
        self.flush_pending()?;
        self.writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to finish summary: {}", e.error()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rescan_core::ExtractionResult;

    fn candidate(source: &str, email: Option<&str>) -> ParsedCandidate {
        let result = ExtractionResult {
            name: Some("Jane Doe".to_string()),
            email: email.map(str::to_string),
            confidence: 0.7,
            ..ExtractionResult::default()
        };
        ParsedCandidate::new(source, result, false, Vec::new())
    }

    #[test]
    fn test_summary_writer_flushes_in_chunks() {
        let mut summary = SummaryWriter::new(Vec::new(), 2).unwrap();

        summary.push(candidate("a.pdf", Some("a@example.com"))).unwrap();
        assert_eq!(summary.written(), 0);
        summary.push(candidate("b.pdf", None)).unwrap();
        assert_eq!(summary.written(), 2);
        summary
            .push(ParsedCandidate::failed("c.txt", "Unsupported file type: c.txt"))
            .unwrap();
        assert_eq!(summary.written(), 2);

        let csv = String::from_utf8(summary.finish().unwrap()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            "Name,Source File,Phone Number,Email ID,LinkedIn,GitHub,Confidence,OCR,Errors"
        );
        assert_eq!(lines[1], "Jane Doe,a.pdf,,a@example.com,,,0.70,false,");
        assert_eq!(lines[3], ",c.txt,,,,,0.00,false,Unsupported file type: c.txt");
    }

    #[test]
    fn test_format_text_marks_missing_fields() {
        let text = format_text(&candidate("a.docx", None));

        assert!(text.contains("Resume: a.docx"));
        assert!(text.contains("Email:    -"));
        assert!(text.contains("Confidence: 0.70"));
        assert!(!text.contains("Errors:"));
    }

    #[test]
    fn test_format_json() {
        let json = format_candidate(&candidate("a.pdf", Some("a@example.com")), OutputFormat::Json)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["email"], "a@example.com");
        assert_eq!(value["source_file"], "a.pdf");
        assert_eq!(value["ocr_used"], false);
    }
}
