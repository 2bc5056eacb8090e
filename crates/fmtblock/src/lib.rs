#![forbid(unsafe_code)]

//! Escape-code-aware text block formatting.
//!
//! This crate reflows a string into lines no wider than a configured width:
//! - [`wrap`] - wrapping on words or raw characters, newline preservation,
//!   prepend/append decoration, lazy line production
//! - [`fill`] - justification: pad wrapped lines to an exact width by
//!   cycling single spaces across word boundaries
//! - [`escapes`] - the escape-code index that makes wrapping and filling
//!   safe on strings containing terminal color sequences
//!
//! One display character is one column; a recognized escape sequence is
//! zero columns and is never split.
//!
//! # Example
//! ```
//! use fmtblock::{FormatOptions, WrapMode, format, iter_format};
//!
//! // Word wrap (the default)
//! let opts = FormatOptions::new(3);
//! assert_eq!(format("AAA BBB CCC DDD", &opts), "AAA\nBBB\nCCC\nDDD");
//!
//! // Character wrap
//! let opts = FormatOptions::new(3).mode(WrapMode::Char);
//! assert_eq!(format("AAABBBCCC", &opts), "AAA\nBBB\nCCC");
//!
//! // Justified to an exact width
//! let opts = FormatOptions::new(9).fill(true);
//! for line in iter_format("A AA AAA B BB BBB C CC CCC", &opts) {
//!     assert_eq!(line.len(), 9);
//! }
//!
//! // Decorated lines, streamed
//! let opts = FormatOptions::new(4).prepend("> ");
//! let first = iter_format("A AA AAA B", &opts).next();
//! assert_eq!(first.as_deref(), Some("> A AA"));
//! ```

pub mod escapes;
pub mod fill;
pub mod wrap;

pub use escapes::{Unit, code_indices, find_codes, is_escape_code, strip_codes, unit_indices};
pub use fill::{expand_words, find_word_end, squeeze_words};
pub use wrap::{FormatOptions, FormattedLines, WrapMode, WrappedLines, format, iter_format, iter_wrap};
