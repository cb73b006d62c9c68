//! CLI commands for doclink: scan, classify.

use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::config::Config;
use crate::context::split_paragraphs;
use crate::error::Error;
use crate::extractor::Extractor;
use crate::scanner;
use crate::sink::{JsonLinesSink, MemorySink};
use crate::snippet::{Filters, Notation, ParagraphClassifiers, classify_code_snippet};
use crate::strategy::StrategyTable;
use crate::types::Kind;

/// Extract references from every document under `root` and stream them to
/// stdout as JSON lines.
///
/// # Errors
///
/// Returns errors from config loading, document reading, extraction, or
/// writing to stdout.
pub fn scan(root: &Path, context: Kind) -> Result<(), Error> {
    let config = Config::load(root)?;
    let extractor = Extractor::new(StrategyTable::default(), config.hierarchy.clone(), config.options);

    let stdout = std::io::stdout().lock();
    let mut sink = JsonLinesSink::new(BufWriter::new(stdout));
    scanner::scan(root, &config, &extractor, context, &mut sink)?;
    sink.into_inner().flush()?;

    return Ok(());
}

/// One classified paragraph, as printed by `classify --paragraphs`.
#[derive(Serialize)]
struct ParagraphLine<'a> {
    /// Notation of the paragraph, if any classifier claimed it.
    notation: Option<Notation>,
    /// The paragraph text.
    paragraph: &'a str,
}

/// Print the notation of `path` as a whole, or of each of its paragraphs.
///
/// Paragraph mode stops after the first paragraph classified as `stop`:
/// what follows belongs to an earlier message.
///
/// # Errors
///
/// Returns `Error::FileNotFound` if `path` does not exist, `Error::Io` if
/// it cannot be read, or `Error::Store` if the snippet could not be recorded.
pub fn classify(path: &Path, paragraphs: bool) -> Result<(), Error> {
    let text = scanner::read_document(path)?;

    if !paragraphs {
        let mut sink = MemorySink::new();
        let Some(snippet) = classify_code_snippet(&text, &Filters::default(), &mut sink) else {
            return Err(Error::Store { reason: "snippet could not be classified".to_string() });
        };
        println!("{}", snippet.language);
        return Ok(());
    }

    let classifiers = ParagraphClassifiers::default();
    let mut out = BufWriter::new(std::io::stdout().lock());
    for paragraph in split_paragraphs(&text) {
        let notation = classifiers.classify_paragraph(paragraph);
        serde_json::to_writer(&mut out, &ParagraphLine { notation, paragraph })?;
        out.write_all(b"\n")?;
        if notation == Some(Notation::Stop) {
            break;
        }
    }
    out.flush()?;

    return Ok(());
}
