//! `.doclink.toml` loading and document path filtering.

use std::collections::BTreeMap;
use std::path::Path;

use crate::codewords::CodeWords;
use crate::error::Error;
use crate::hierarchy::KindHierarchy;
use crate::resolver::ResolveOptions;
use crate::types::Kind;

/// Project configuration loaded from `.doclink.toml`.
/// Include/exclude patterns are path prefixes applied to document files.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Path prefixes to scan; empty means everything.
    include: Vec<String>,
    /// Path prefixes to skip, applied after `include`.
    exclude: Vec<String>,
    /// Resolver options for every document.
    pub options: ResolveOptions,
    /// Extra identifiers matched by the dictionary augmenter.
    pub code_words: CodeWords,
    /// Default hierarchy with the file's overrides applied.
    pub hierarchy: KindHierarchy,
}

/// Raw TOML structure for `.doclink.toml`.
#[derive(serde::Deserialize)]
struct DoclinkTomlConfig {
    /// See [`Config::include`].
    #[serde(default)]
    include: Vec<String>,
    /// See [`Config::exclude`].
    #[serde(default)]
    exclude: Vec<String>,
    /// See [`ResolveOptions::save_index`].
    #[serde(default)]
    save_index: bool,
    /// See [`ResolveOptions::find_context`].
    #[serde(default)]
    find_context: bool,
    /// See [`ResolveOptions::strict`].
    #[serde(default)]
    strict: bool,
    /// Code words in any case.
    #[serde(default)]
    code_words: Vec<String>,
    /// Child kind label to parent kind label, layered over the defaults.
    #[serde(default)]
    hierarchy: BTreeMap<String, String>,
}

impl Config {
    /// Load config from `.doclink.toml` in the given root directory.
    /// Returns defaults if the file doesn't exist. A file that exists but
    /// is malformed is an error, never a silent fallback.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// `Error::TomlDe` if the TOML is malformed, or `Error::UnknownKind`
    /// if a hierarchy entry names a kind that doesn't exist.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(".doclink.toml");
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(Error::Io(e)),
        };
        Self::parse(&content)
    }

    /// Parse the contents of a `.doclink.toml` file.
    ///
    /// # Errors
    ///
    /// Returns `Error::TomlDe` for malformed TOML or `Error::UnknownKind`
    /// for an unrecognized hierarchy label.
    pub fn parse(content: &str) -> Result<Self, Error> {
        let raw: DoclinkTomlConfig = toml::from_str(content)?;

        let mut hierarchy = KindHierarchy::default();
        for (child, parent) in &raw.hierarchy {
            hierarchy = hierarchy.with(child.parse::<Kind>()?, parent.parse::<Kind>()?);
        }

        Ok(Self {
            include: raw.include,
            exclude: raw.exclude,
            options: ResolveOptions {
                save_index: raw.save_index,
                find_context: raw.find_context,
                strict: raw.strict,
            },
            code_words: raw.code_words.into_iter().collect(),
            hierarchy,
        })
    }

    /// Check whether a document path should be scanned.
    ///
    /// A path is included if no include patterns are set (scan everything),
    /// or if the path starts with at least one include pattern.
    /// An included path is then excluded if it starts with any exclude pattern.
    pub fn should_scan(&self, relative_path: &str) -> bool {
        let included = self.include.is_empty()
            || self.include.iter().any(|p| relative_path.starts_with(p.as_str()));

        if !included {
            return false;
        }

        !self.exclude.iter().any(|p| relative_path.starts_with(p.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert!(config.should_scan("anything.md"));
        assert_eq!(config.options, ResolveOptions::default());
        assert!(config.code_words.is_empty());
        assert_eq!(config.hierarchy, KindHierarchy::default());
    }

    #[test]
    fn include_then_exclude_prefixes() {
        let config = Config::parse("include = [\"docs/\"]\nexclude = [\"docs/archive/\"]").unwrap();
        assert!(config.should_scan("docs/guide.md"));
        assert!(!config.should_scan("docs/archive/old.md"));
        assert!(!config.should_scan("README.md"));
    }

    #[test]
    fn options_code_words_and_hierarchy() {
        let config = Config::parse(
            "save_index = true\nstrict = true\ncode_words = [\"SessionFactory\"]\n\n[hierarchy]\n\"enumeration value\" = \"enumeration\"\n",
        )
        .unwrap();
        assert!(config.options.save_index);
        assert!(config.options.strict);
        assert!(!config.options.find_context);
        assert!(config.code_words.contains("sessionfactory"));
        assert_eq!(config.hierarchy.parent_of(Kind::EnumerationValue), Some(Kind::Enumeration));
        assert_eq!(config.hierarchy.parent_of(Kind::Field), Some(Kind::Class));
    }

    #[test]
    fn unknown_kind_label_is_rejected() {
        let err = Config::parse("[hierarchy]\n\"widget\" = \"class\"\n").unwrap_err();
        assert!(matches!(err, Error::UnknownKind { label } if label == "widget"));
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".doclink.toml"), "include = [").unwrap();
        assert!(matches!(Config::load(dir.path()), Err(Error::TomlDe(_))));
    }
}
