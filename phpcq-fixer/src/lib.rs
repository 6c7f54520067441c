//! # phpcq-fixer
//!
//! A small PHP fixing pipeline: a lossless tokenizer, the [`Fixer`] plugin
//! trait with priorities, and the fixers that make up tab indentation.
//!
//! ```rust
//! use std::path::Path;
//! use phpcq_fixer::FixerPipeline;
//!
//! let pipeline = FixerPipeline::indent_with_tabs();
//! let fixed = pipeline.fix(Path::new("a.php"), "<?php\nif ($a) {\n        echo 1;\n}\n");
//! assert_eq!(fixed, "<?php\nif ($a) {\n\t\techo 1;\n}\n");
//! ```

pub mod error;
pub mod fixers;
pub mod pipeline;
pub mod tokens;

pub use error::FixerError;
pub use fixers::{EofEndingFixer, IndentWithTabsFixer, IndentationFixer};
pub use pipeline::{Fixer, FixerPipeline};
pub use tokens::{Token, TokenKind, Tokens};
