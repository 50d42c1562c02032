//! PEG-driven Markdown block-and-inline parser core.
//!
//! Converts a Markdown byte source into an AST (see [`ast`]) together with the
//! reference and footnote tables discovered while parsing. The CLI, file I/O, and
//! any HTML/LaTeX/man renderer that consumes the tree are external collaborators.

pub mod arena;
pub mod ast;
pub mod buffer;
pub mod driver;
pub mod engine;
pub mod error;
pub mod grammar;
pub mod options;
pub mod registry;
pub mod validate;

pub use driver::{parse, ParseOutput};
pub use error::ParseError;
pub use options::Options;
