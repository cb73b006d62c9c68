use std::path::Path;

use serde::Serialize;

use crate::config::Config;
use crate::hierarchy::KindHierarchy;
use crate::resolver::ResolveOptions;
use crate::types::Kind;

/// Output the doclink reference document for the project at `root`.
pub fn run(root: &Path, json: bool) {
    let state = gather_state(root);

    if json {
        print_json(&state);
    } else {
        print_markdown(&state);
    }
}

// ── State gathering ───────────────────────────────────────────────────

/// What `info` reports about the project at the scan root.
struct CurrentState {
    /// Whether `.doclink.toml` exists.
    config_found: bool,
    /// Set when `.doclink.toml` exists but could not be loaded.
    config_error: Option<String>,
    /// Resolver options in effect.
    options: ResolveOptions,
    /// Number of configured code words.
    code_words: usize,
    /// Kind hierarchy after config overrides.
    hierarchy: KindHierarchy,
}

/// Load the config at `root`, falling back to defaults on error.
fn gather_state(root: &Path) -> CurrentState {
    let config_found = root.join(".doclink.toml").exists();
    let (config, config_error) = match Config::load(root) {
        Ok(c) => (c, None),
        Err(e) => (Config::default(), Some(e.to_string())),
    };

    CurrentState {
        config_found,
        config_error,
        options: config.options,
        code_words: config.code_words.len(),
        hierarchy: config.hierarchy,
    }
}

// ── Markdown output ───────────────────────────────────────────────────

/// Print the full reference document as markdown.
fn print_markdown(state: &CurrentState) {
    let version = env!("CARGO_PKG_VERSION");
    print_markdown_header(version);
    print_markdown_state(state);
    println!();
    print_markdown_kinds(&state.hierarchy);
    println!();
    print_markdown_exit_codes();
}

/// Usage and configuration overview.
fn print_markdown_header(version: &str) {
    print!(
        "\
# doclink {version}

Extract typed references to code elements from free-form documentation.

## Workflow

    doclink scan [--root DIR] [--context KIND]   Stream references and snippets as JSON lines
    doclink classify FILE                         Print the notation of a code block
    doclink classify FILE --paragraphs            Classify each paragraph of a message
    doclink info [--json]                         This document

## Configuration (.doclink.toml)

    include = [\"docs/\"]                 # only scan these paths
    exclude = [\"docs/archive/\"]         # skip these paths
    save_index = true                   # number top-level references
    find_context = true                 # attach sentence and paragraph
    strict = false                      # no whole-text fallback reference
    code_words = [\"sessionfactory\"]     # extra identifiers to look for

    [hierarchy]
    \"enumeration value\" = \"enumeration\" # child kind = parent kind

## Current State

"
    );
}

/// Config status and effective options.
fn print_markdown_state(state: &CurrentState) {
    match (&state.config_error, state.config_found) {
        (Some(e), _) => println!("Config:     .doclink.toml (invalid: {e})"),
        (None, true) => println!("Config:     .doclink.toml (found)"),
        (None, false) => println!("Config:     .doclink.toml (not found)"),
    }

    let ResolveOptions { save_index, find_context, strict } = state.options;
    println!("Options:    save_index={save_index} find_context={find_context} strict={strict}");
    println!("Code words: {}", state.code_words);
}

/// Table of every kind with its role and parent kind.
fn print_markdown_kinds(hierarchy: &KindHierarchy) {
    println!("## Kinds\n");
    println!("| Kind | Role | Parent |");
    println!("|------|------|--------|");
    for kind in Kind::ALL {
        let role = kind.role().unwrap_or_default();
        let parent = hierarchy.parent_of(kind).map_or_else(String::new, |p| p.to_string());
        println!("| {kind} | {role} | {parent} |");
    }
}

/// Exit code table.
fn print_markdown_exit_codes() {
    print!(
        "\
## Exit Codes

| Code | Meaning |
|------|---------|
| 0    | Success |
| 1    | Runtime error |
"
    );
}

// ── JSON output ───────────────────────────────────────────────────────

/// Top-level JSON document.
#[derive(Serialize)]
struct InfoJson {
    /// Crate version.
    version: String,
    /// Every kind with its role and parent.
    kinds: Vec<KindJson>,
    /// Exit code table.
    exit_codes: Vec<ExitCodeInfo>,
    /// Config status and effective options.
    current_state: StateJson,
}

/// One row of the kind table.
#[derive(Serialize)]
struct KindJson {
    /// The kind itself.
    label: Kind,
    /// Coarse grouping of the kind.
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    /// Parent kind in the hierarchy.
    #[serde(skip_serializing_if = "Option::is_none")]
    parent: Option<Kind>,
}

/// One exit code and what it means.
#[derive(Serialize)]
struct ExitCodeInfo {
    /// Process exit code.
    code: u8,
    /// Meaning of the code.
    meaning: String,
}

/// JSON form of [`CurrentState`].
#[derive(Serialize)]
struct StateJson {
    /// Whether `.doclink.toml` exists.
    config_found: bool,
    /// Load error, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    config_error: Option<String>,
    /// Number top-level references.
    save_index: bool,
    /// Attach sentence and paragraph.
    find_context: bool,
    /// No whole-text fallback.
    strict: bool,
    /// Number of configured code words.
    code_words: usize,
}

/// Print the reference document as pretty JSON.
fn print_json(state: &CurrentState) {
    let info = InfoJson {
        version: env!("CARGO_PKG_VERSION").to_string(),
        kinds: Kind::ALL
            .into_iter()
            .map(|label| KindJson { label, role: label.role(), parent: state.hierarchy.parent_of(label) })
            .collect(),
        exit_codes: vec![
            ExitCodeInfo { code: 0, meaning: "Success".to_string() },
            ExitCodeInfo { code: 1, meaning: "Runtime error".to_string() },
        ],
        current_state: StateJson {
            config_found: state.config_found,
            config_error: state.config_error.clone(),
            save_index: state.options.save_index,
            find_context: state.options.find_context,
            strict: state.options.strict,
            code_words: state.code_words,
        },
    };

    // serde_json::to_string_pretty won't fail on this structure.
    let json = serde_json::to_string_pretty(&info).unwrap_or_default();
    println!("{json}");
}
