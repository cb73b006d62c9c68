use std::io::Write;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::Config;
use crate::error::Error;
use crate::extractor::Extractor;
use crate::sink::JsonLinesSink;
use crate::snippet::{Filters, classify_code_snippet};
use crate::types::Kind;

/// Totals for one scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Documents read.
    pub documents: usize,
    /// References streamed, children included.
    pub references: usize,
    /// Fenced blocks classified.
    pub snippets: usize,
}

/// Document files under `root` that the config allows, relative to `root`,
/// in sorted order so output is stable between runs.
pub fn find_documents(root: &Path, config: &Config) -> Vec<PathBuf> {
    let mut documents: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "md" || ext == "txt"))
        .map(|e| e.path().strip_prefix(root).unwrap_or(e.path()).to_path_buf())
        .filter(|relative| config.should_scan(&relative.to_string_lossy()))
        .collect();
    documents.sort();
    documents
}

/// Read a document as UTF-8 text.
///
/// # Errors
///
/// Returns `Error::FileNotFound` if `path` does not exist, or `Error::Io`
/// for any other read failure, including text that is not valid UTF-8.
pub fn read_document(path: &Path) -> Result<String, Error> {
    return match std::fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::FileNotFound { path: path.to_path_buf() }),
        Err(e) => Err(Error::Io(e)),
    };
}

/// Extract references from every document under `root` and classify its
/// fenced code blocks, streaming everything into `sink`.
///
/// # Errors
///
/// Returns the `read_document` error for a document that cannot be read,
/// or any extraction or sink error.
pub fn scan<W: Write>(
    root: &Path,
    config: &Config,
    extractor: &Extractor,
    context: Kind,
    sink: &mut JsonLinesSink<W>,
) -> Result<ScanSummary, Error> {
    let filters = Filters::default();
    let code_words = (!config.code_words.is_empty()).then_some(&config.code_words);
    let mut summary = ScanSummary::default();

    for relative in find_documents(root, config) {
        let path = root.join(&relative);
        let text = read_document(&path)?;
        sink.set_source(relative.to_string_lossy());

        let resolution = extractor.extract(&text, context, code_words, None, sink)?;
        summary.references = summary.references.saturating_add(resolution.references.len());

        for block in fenced_blocks(&text) {
            if classify_code_snippet(block, &filters, sink).is_some() {
                summary.snippets = summary.snippets.saturating_add(1);
            }
        }

        summary.documents = summary.documents.saturating_add(1);
        tracing::debug!(document = %relative.display(), references = resolution.references.len(), "scanned");
    }

    tracing::info!(
        documents = summary.documents,
        references = summary.references,
        snippets = summary.snippets,
        "scan complete"
    );
    Ok(summary)
}

/// Bodies of the ```-fenced blocks in a markdown document. An unclosed
/// fence runs to the end of the text.
pub fn fenced_blocks(text: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut body_start: Option<usize> = None;
    let mut offset: usize = 0;

    for line in text.split_inclusive('\n') {
        let line_start = offset;
        offset = offset.saturating_add(line.len());
        if !line.trim_start().starts_with("```") {
            continue;
        }
        match body_start.take() {
            Some(start) => blocks.extend(text.get(start..line_start)),
            None => body_start = Some(offset),
        }
    }

    if let Some(start) = body_start {
        blocks.extend(text.get(start..));
    }
    blocks.retain(|b| !b.trim().is_empty());
    blocks
}
