#![forbid(unsafe_code)]

//! Block wrapping and decoration.
//!
//! This module turns a long string into lines no wider than a configured
//! width. It can wrap on whitespace-delimited words or on raw characters,
//! preserve or collapse newlines, left-strip each line, and decorate every
//! line with prepend/append text. Word wrapping measures *display* length:
//! embedded color escape sequences occupy no columns (see
//! [`crate::escapes`]).
//!
//! Lines are produced lazily; the only path that buffers the whole block is
//! `append` combined with `strip_last`, which needs to know the last line.
//!
//! # Example
//! ```
//! use fmtblock::wrap::{FormatOptions, WrapMode, format};
//!
//! let opts = FormatOptions::new(3);
//! assert_eq!(format("AAA BBB CCC DDD", &opts), "AAA\nBBB\nCCC\nDDD");
//!
//! let opts = FormatOptions::new(3).mode(WrapMode::Char);
//! assert_eq!(format("AAABBBCCC", &opts), "AAA\nBBB\nCCC");
//!
//! let opts = FormatOptions::new(4).prepend("> ");
//! assert_eq!(
//!     format("A AA AAA B", &opts),
//!     "> A AA\n> AAA\n> B",
//! );
//! ```

use std::borrow::Cow;
use std::str::{Split, SplitWhitespace};

use tracing::{debug, trace};

use crate::escapes::find_codes;
use crate::fill::expand_words;

/// Wrapping mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WrapMode {
    /// Wrap on whitespace-delimited words. Words are never split; a single
    /// word longer than the width is emitted alone, over-width.
    #[default]
    Space,
    /// Cut into fixed-size slices of raw characters.
    Char,
}

/// Options for one formatting call.
///
/// Immutable per call; built with chaining setters.
///
/// # Example
/// ```
/// use fmtblock::wrap::{FormatOptions, WrapMode};
///
/// let opts = FormatOptions::new(40)
///     .mode(WrapMode::Char)
///     .newlines(true)
///     .lstrip(true);
/// assert_eq!(opts.width, 40);
/// ```
#[derive(Debug, Clone)]
pub struct FormatOptions {
    /// Maximum display width for each line. Clamped to at least 1.
    pub width: usize,
    /// Wrapping mode.
    pub mode: WrapMode,
    /// Insert spaces between words so each line reaches exactly `width`.
    /// Overrides `mode` to word wrapping.
    pub fill: bool,
    /// Preserve newlines in the source text.
    pub newlines: bool,
    /// Remove leading whitespace from each wrapped line (never from
    /// `prepend`).
    pub lstrip: bool,
    /// Text added before each line, after wrapping.
    pub prepend: Option<String>,
    /// Text added after each line, after wrapping.
    pub append: Option<String>,
    /// Omit `prepend` on the first line. No-op without `prepend`.
    pub strip_first: bool,
    /// Omit `append` on the last line. No-op without `append`.
    pub strip_last: bool,
}

impl FormatOptions {
    /// Create options with the given width and defaults for the rest.
    #[must_use]
    pub fn new(width: usize) -> Self {
        Self {
            width,
            mode: WrapMode::Space,
            fill: false,
            newlines: false,
            lstrip: false,
            prepend: None,
            append: None,
            strip_first: false,
            strip_last: false,
        }
    }

    /// Set the wrap mode.
    #[must_use]
    pub fn mode(mut self, mode: WrapMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set fill (justification) mode.
    #[must_use]
    pub fn fill(mut self, fill: bool) -> Self {
        self.fill = fill;
        self
    }

    /// Set whether newlines are preserved.
    #[must_use]
    pub fn newlines(mut self, newlines: bool) -> Self {
        self.newlines = newlines;
        self
    }

    /// Set whether each line is left-stripped.
    #[must_use]
    pub fn lstrip(mut self, lstrip: bool) -> Self {
        self.lstrip = lstrip;
        self
    }

    /// Set the prepend text.
    #[must_use]
    pub fn prepend(mut self, prepend: impl Into<String>) -> Self {
        self.prepend = Some(prepend.into());
        self
    }

    /// Set the append text.
    #[must_use]
    pub fn append(mut self, append: impl Into<String>) -> Self {
        self.append = Some(append.into());
        self
    }

    /// Omit the prepend text on the first line.
    #[must_use]
    pub fn strip_first(mut self, strip_first: bool) -> Self {
        self.strip_first = strip_first;
        self
    }

    /// Omit the append text on the last line.
    #[must_use]
    pub fn strip_last(mut self, strip_last: bool) -> Self {
        self.strip_last = strip_last;
        self
    }
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self::new(60)
    }
}

/// Display length of `s`: characters minus embedded color-code characters.
fn display_len(s: &str) -> usize {
    let code_len: usize = find_codes(s).iter().map(|code| code.len()).sum();
    s.chars().count() - code_len
}

/// Fixed-size raw-character slices over newline-collapsed text.
///
/// Character mode is defined on raw characters; it does not consult the
/// escape-code index.
struct CharBlocks<'a> {
    text: Cow<'a, str>,
    pos: usize,
    width: usize,
}

impl<'a> CharBlocks<'a> {
    fn new(text: &'a str, width: usize) -> Self {
        // Newlines collapse to single spaces.
        let text = if text.contains('\n') {
            Cow::Owned(text.replace('\n', " "))
        } else {
            Cow::Borrowed(text)
        };
        Self {
            text,
            pos: 0,
            width,
        }
    }
}

impl Iterator for CharBlocks<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.pos >= self.text.len() {
            return None;
        }
        let rest = &self.text[self.pos..];
        let end = rest
            .char_indices()
            .nth(self.width)
            .map_or(rest.len(), |(i, _)| i);
        self.pos += end;
        Some(rest[..end].to_string())
    }
}

/// Greedy word accumulation over whitespace-delimited words.
struct SpaceBlocks<'a> {
    words: SplitWhitespace<'a>,
    line: String,
    width: usize,
    done: bool,
}

impl<'a> SpaceBlocks<'a> {
    fn new(text: &'a str, width: usize) -> Self {
        Self {
            words: text.split_whitespace(),
            line: String::new(),
            width,
            done: false,
        }
    }
}

impl Iterator for SpaceBlocks<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.done {
            return None;
        }
        for word in self.words.by_ref() {
            if self.line.is_empty() {
                self.line.push_str(word);
                continue;
            }
            let mut candidate = String::with_capacity(self.line.len() + 1 + word.len());
            candidate.push_str(&self.line);
            candidate.push(' ');
            candidate.push_str(word);
            if display_len(&candidate) > self.width {
                // The word starts a new line; emit the finished one.
                return Some(std::mem::replace(&mut self.line, word.to_string()));
            }
            self.line = candidate;
        }
        self.done = true;
        if self.line.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.line))
        }
    }
}

/// Per-segment wrapping with newlines preserved.
///
/// Each `\n`-separated segment is wrapped independently with the same mode;
/// an empty segment yields no line.
struct NewlineBlocks<'a> {
    segments: Split<'a, char>,
    current: Option<WrapIter<'a>>,
    width: usize,
    mode: WrapMode,
}

impl Iterator for NewlineBlocks<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            if let Some(inner) = self.current.as_mut() {
                if let Some(line) = inner.next() {
                    return Some(line);
                }
                self.current = None;
            }
            let segment = self.segments.next()?;
            self.current = Some(match self.mode {
                WrapMode::Char => WrapIter::Chars(CharBlocks::new(segment, self.width)),
                WrapMode::Space => WrapIter::Spaces(SpaceBlocks::new(segment, self.width)),
            });
        }
    }
}

enum WrapIter<'a> {
    Chars(CharBlocks<'a>),
    Spaces(SpaceBlocks<'a>),
    Lines(Box<NewlineBlocks<'a>>),
}

impl Iterator for WrapIter<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        match self {
            Self::Chars(it) => it.next(),
            Self::Spaces(it) => it.next(),
            Self::Lines(it) => it.next(),
        }
    }
}

/// Lazy width-constrained line sequence, without decoration or fill.
///
/// Produced by [`iter_wrap`]; uses `width`, `mode`, `newlines`, and
/// `lstrip` from the options and ignores the rest.
pub struct WrappedLines<'a> {
    inner: WrapIter<'a>,
    lstrip: bool,
}

impl Iterator for WrappedLines<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let line = self.inner.next()?;
        if self.lstrip {
            Some(line.trim_start().to_string())
        } else {
            Some(line)
        }
    }
}

/// Wrap `text` into width-constrained lines (no decoration, no fill).
#[must_use]
pub fn iter_wrap<'a>(text: &'a str, options: &FormatOptions) -> WrappedLines<'a> {
    let width = options.width.max(1);
    let inner = if options.newlines {
        WrapIter::Lines(Box::new(NewlineBlocks {
            segments: text.split('\n'),
            current: None,
            width,
            mode: options.mode,
        }))
    } else {
        match options.mode {
            WrapMode::Char => WrapIter::Chars(CharBlocks::new(text, width)),
            WrapMode::Space => WrapIter::Spaces(SpaceBlocks::new(text, width)),
        }
    };
    WrappedLines {
        inner,
        lstrip: options.lstrip,
    }
}

enum Source<'a> {
    Streaming(WrappedLines<'a>),
    Buffered(std::vec::IntoIter<String>),
}

/// Lazy decorated (and optionally filled) line sequence.
///
/// Produced by [`iter_format`]. Streaming except when `append` and
/// `strip_last` are combined, which buffers the wrapped lines up front.
pub struct FormattedLines<'a> {
    source: Source<'a>,
    prepend: Option<String>,
    append: Option<String>,
    strip_first: bool,
    strip_last: bool,
    fill: bool,
    width: usize,
    index: usize,
    last: Option<usize>,
}

impl Iterator for FormattedLines<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let line = match &mut self.source {
            Source::Streaming(it) => it.next(),
            Source::Buffered(it) => it.next(),
        }?;
        let i = self.index;
        self.index += 1;

        let first_stripped = self.strip_first && i == 0;
        let mut out = String::new();
        if let Some(prepend) = &self.prepend {
            if !first_stripped {
                out.push_str(prepend);
            }
        }
        out.push_str(&line);
        if let Some(append) = &self.append {
            let strip_this = self.strip_last && Some(i) == self.last && !first_stripped;
            if !strip_this {
                out.push_str(append);
            }
        }
        if self.fill {
            out = expand_words(&out, self.width);
        }
        Some(out)
    }
}

/// Iterate over the lines of a formatted block.
///
/// Wrapping happens first; decoration (`prepend`/`append`) is applied to
/// each wrapped line afterwards and is not counted against `width`. A
/// caller wanting exact total-width control subtracts the decoration
/// length from `width` before calling. With `fill`, each decorated line is
/// expanded to exactly `width` columns (see [`crate::fill::expand_words`]).
#[must_use]
pub fn iter_format<'a>(text: &'a str, options: &FormatOptions) -> FormattedLines<'a> {
    let width = options.width.max(1);
    // Fill implies word wrapping.
    let mode = if options.fill {
        WrapMode::Space
    } else {
        options.mode
    };
    debug!(
        width,
        ?mode,
        fill = options.fill,
        newlines = options.newlines,
        "formatting block"
    );
    let wrap_options = FormatOptions {
        width,
        mode,
        ..options.clone()
    };
    let wrapped = iter_wrap(text, &wrap_options);

    let strip_first = options.strip_first && options.prepend.is_some();
    let strip_last = options.strip_last && options.append.is_some();

    // Stripping the last append is the one case that needs the whole block.
    let (source, last) = if strip_last {
        let lines: Vec<String> = wrapped.collect();
        trace!(lines = lines.len(), "buffered wrapped lines for strip_last");
        let last = lines.len().checked_sub(1);
        (Source::Buffered(lines.into_iter()), last)
    } else {
        (Source::Streaming(wrapped), None)
    };

    FormattedLines {
        source,
        prepend: options.prepend.clone(),
        append: options.append.clone(),
        strip_first,
        strip_last,
        fill: options.fill,
        width,
        index: 0,
        last,
    }
}

/// Format `text` into a newline-joined block.
#[must_use]
pub fn format(text: &str, options: &FormatOptions) -> String {
    let lines: Vec<String> = iter_format(text, options).collect();
    lines.join("\n")
}
