//! Extract typed, hierarchical references to code elements from free-form
//! documentation.
//!
//! Text goes through a set of [`strategy::Strategy`] matchers chosen by the
//! structural context it came from, optionally extended with dictionary
//! matches from [`codewords::CodeWords`], and the [`resolver::Resolver`]
//! settles conflicts into a tree of [`types::Reference`]s handed to a
//! [`sink::Sink`] one at a time.

pub mod codewords;
pub mod commands;
pub mod config;
pub mod context;
pub mod diagnostics;
pub mod error;
pub mod exclusion;
pub mod extractor;
pub mod hierarchy;
pub mod info;
pub mod resolver;
pub mod scanner;
pub mod sink;
pub mod snippet;
pub mod strategy;
pub mod types;

pub use error::Error;
pub use extractor::Extractor;
pub use types::{Kind, RawMatch, Reference, Span};
