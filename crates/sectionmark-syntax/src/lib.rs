//! # sectionmark-syntax
//!
//! A section-level Markdown parser. It does not render Markdown. It splits a
//! document into sections (a header plus the raw lines under it), reads the
//! typed metadata embedded in header comments, and writes the result back out
//! without changing a byte.
//!
//! ## Architecture Overview
//!
//! ```text
//! Source Text → LineSource → SectionLexer → Lexemes → SectionParser → SectionDocument
//!                                                                          │
//!                                        Markdown ← serialize ─────────────┘
//! ```
//!
//! ### 1. Line Source ([`source`] module)
//!
//! Splits a string or file into lines and remembers the line ending and
//! whether the last line was terminated.
//!
//! ### 2. Lexer ([`lexer`] module)
//!
//! Produces a flat sequence of [`Lexeme`]s: section markers for the three
//! header styles, name runs, metadata property lexemes and opaque `LINE`s.
//! Lexemes are `Copy` values pointing back into the line buffer.
//!
//! ### 3. Parser ([`parser`] module)
//!
//! Builds one [`SectionNode`] per header, plus a synthetic preamble section for
//! content before the first header. Metadata values are converted into typed
//! fields; tag and type strings are interned in a [`SymbolTable`].
//!
//! ### 4. Serializer ([`serializer`] module)
//!
//! The inverse of the parser.
//!
//! ## Module Structure
//!
//! ```text
//! sectionmark-syntax/
//! ├── lib.rs           # This file - public API and integration tests
//! ├── source.rs        # LineSource: lines + framing
//! ├── lexeme.rs        # Lexeme values and the metadata property vocabulary
//! ├── symbol_table.rs  # Interned strings
//! ├── lexer/
//! │   ├── mod.rs       # SectionLexer
//! │   └── metadata.rs  # `<!-- Metadata: -->` recognition (Logos)
//! ├── parser/
//! │   ├── mod.rs       # SectionParser
//! │   └── values.rs    # Typed property values
//! ├── ast.rs           # SectionNode, SectionMetadata, Link, TimeScope
//! ├── serializer.rs    # SectionDocument → Markdown
//! └── outline.rs       # Parent/child view over the flat section list
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use sectionmark_syntax::{parse, serialize};
//!
//! let text = "# Outline <!-- Metadata: tags: idea; -->\nIntro.\n## Note\nBody.\n";
//! let document = parse(text).unwrap();
//!
//! assert_eq!(document.sections[0].name(), "Outline");
//! assert_eq!(document.sections[0].metadata.primary_tag().map(|t| &**t), Some("idea"));
//! assert_eq!(document.sections[1].depth, 1);
//! assert_eq!(serialize(&document), text);
//! ```

pub mod ast;
pub mod error;
pub mod lexeme;
pub mod lexer;
pub mod outline;
pub mod parser;
pub mod serializer;
pub mod source;
pub mod symbol_table;

use std::path::Path;

pub use ast::{HeaderStyle, Link, PREAMBLE, SectionDocument, SectionMetadata, SectionNode, TimeScope};
pub use error::{SourceError, SyntaxError};
pub use lexeme::{Lexeme, LexemeKind, Property};
pub use lexer::SectionLexer;
pub use outline::OutlineTree;
pub use parser::SectionParser;
pub use serializer::serialize;
pub use source::{LineEnding, LineSource};
pub use symbol_table::{Symbol, SymbolTable};

/// Parse a document held in memory.
pub fn parse(text: &str) -> Result<SectionDocument, SyntaxError> {
    let mut symbols = SymbolTable::new();
    SectionParser::new(SectionLexer::from_text(text), &mut symbols).parse()
}

/// Parse a file. A missing or unreadable file parses as an empty document.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<SectionDocument, SyntaxError> {
    let mut symbols = SymbolTable::new();
    SectionParser::new(SectionLexer::from_path(path), &mut symbols).parse()
}
