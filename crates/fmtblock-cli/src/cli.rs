#![forbid(unsafe_code)]

//! Command-line argument parsing.
//!
//! Parses args manually (no external dependencies) to keep the binary lean.
//! Both `--flag value` and `--flag=value` spellings are accepted. Defaults
//! may be overridden by `FMTBLOCK_*` environment variables; explicit flags
//! win over both.

use std::env;
use std::process;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum width for lines unless `-w` is given.
pub const DEFAULT_WIDTH: usize = 79;

/// Spaces per indent level.
const INDENT_UNIT: usize = 4;

const HELP_TEXT: &str = "\
fmtblock — format text, files, or stdin into blocks with a maximum width

Output is printed to stdout.

USAGE:
    fmtblock [WORDS...] [OPTIONS]

ARGS:
    WORDS                 Words to format into a block. A word naming a
                          readable file is replaced by that file's contents.
                          With no words, stdin is read instead.

OPTIONS:
    -a, --append TXT      Append this text after each line.
    -A, --APPEND TXT      Same as --append, but the appended text is not
                          counted against the width.
    -c, --chars           Wrap on characters instead of spaces.
    -D, --debug           Enable diagnostic output on stderr.
    -e, --enumerate       Print line numbers before each line.
    -f, --fill            Insert spaces between words so that each line is
                          the same width.
    -h, --help            Show this help message.
    -i, --indent NUM      Indention level, where 4 spaces is 1 indent.
                          Maximum width includes any indention. Default: 0
    -I, --INDENT NUM      Same as --indent, but the indention is not
                          counted against the width. Default: 0
    -l, --lstrip          Remove leading spaces for each line, before
                          indention.
    -n, --newlines        Preserve newlines.
    -p, --prepend TXT     Prepend this text before each line, after any
                          indents.
    -P, --PREPEND TXT     Same as --prepend, but the prepended text is not
                          counted against the width.
    -s, --stripfirst      Strip the first --prepend.
    -S, --striplast       Strip the last --append.
    -v, --version         Show version.
    -w, --width NUM       Maximum width for the block. Default: 79

ENVIRONMENT VARIABLES:
    FMTBLOCK_WIDTH        Override the default width.
    FMTBLOCK_DEBUG        Enable diagnostic output (any value but 0).";

/// Parsed command-line options.
#[derive(Debug, Clone)]
pub struct Opts {
    /// Maximum block width before indent/decoration charging.
    pub width: usize,
    /// Indention level (1 level = 4 spaces).
    pub indent: usize,
    /// Whether the indent is counted against the width (`-i` vs `-I`).
    pub indent_charged: bool,
    /// Wrap on characters instead of spaces.
    pub chars: bool,
    /// Justify each line to the exact width.
    pub fill: bool,
    /// Preserve newlines.
    pub newlines: bool,
    /// Remove leading spaces from each line.
    pub lstrip: bool,
    /// Print line numbers.
    pub enumerate: bool,
    /// Text prepended after any indent.
    pub prepend: Option<String>,
    /// Whether the prepend text is counted against the width (`-p` vs `-P`).
    pub prepend_charged: bool,
    /// Text appended to each line.
    pub append: Option<String>,
    /// Whether the append text is counted against the width (`-a` vs `-A`).
    pub append_charged: bool,
    /// Omit the prepend on the first line.
    pub strip_first: bool,
    /// Omit the append on the last line.
    pub strip_last: bool,
    /// Diagnostic output.
    pub debug: bool,
    /// Free-form word/file arguments.
    pub words: Vec<String>,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            indent: 0,
            indent_charged: false,
            chars: false,
            fill: false,
            newlines: false,
            lstrip: false,
            enumerate: false,
            prepend: None,
            prepend_charged: false,
            append: None,
            append_charged: false,
            strip_first: false,
            strip_last: false,
            debug: false,
            words: Vec::new(),
        }
    }
}

/// Width and decoration after indent handling and width charging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// Effective wrapping width, clamped to at least 1.
    pub width: usize,
    /// Indent plus user prepend, when either is present.
    pub prepend: Option<String>,
    /// User append, when present.
    pub append: Option<String>,
}

impl Opts {
    /// Parse command-line arguments and environment variables.
    ///
    /// Prints help/version and exits when requested; exits non-zero on
    /// usage errors.
    pub fn parse() -> Self {
        let args: Vec<String> = env::args().skip(1).collect();
        for arg in &args {
            match arg.as_str() {
                "-h" | "--help" => {
                    println!("{HELP_TEXT}");
                    process::exit(0);
                }
                "-v" | "--version" => {
                    println!("fmtblock {VERSION}");
                    process::exit(0);
                }
                _ => {}
            }
        }

        let mut defaults = Self::default();
        if let Ok(val) = env::var("FMTBLOCK_WIDTH")
            && let Ok(n) = val.parse()
        {
            defaults.width = n;
        }
        if let Ok(val) = env::var("FMTBLOCK_DEBUG") {
            defaults.debug = val != "0";
        }

        match Self::try_parse(&args, defaults) {
            Ok(opts) => opts,
            Err(msg) => {
                eprintln!("{msg}");
                process::exit(1);
            }
        }
    }

    /// Parse `args` on top of `defaults`, without touching the process.
    pub fn try_parse(args: &[String], defaults: Self) -> Result<Self, String> {
        let mut opts = defaults;
        let mut indent_charged: Option<usize> = None;
        let mut indent_uncharged: Option<usize> = None;
        let mut prepend_charged: Option<String> = None;
        let mut prepend_uncharged: Option<String> = None;
        let mut append_charged: Option<String> = None;
        let mut append_uncharged: Option<String> = None;

        let mut i = 0;
        while i < args.len() {
            let arg = args[i].as_str();
            match arg {
                "-c" | "--chars" => opts.chars = true,
                "-f" | "--fill" => opts.fill = true,
                "-n" | "--newlines" => opts.newlines = true,
                "-l" | "--lstrip" => opts.lstrip = true,
                "-e" | "--enumerate" => opts.enumerate = true,
                "-s" | "--stripfirst" => opts.strip_first = true,
                "-S" | "--striplast" => opts.strip_last = true,
                "-D" | "--debug" => opts.debug = true,
                "-w" | "--width" => opts.width = parse_int(&take_value(args, &mut i, arg)?)?,
                "-i" | "--indent" => {
                    indent_charged = Some(parse_int(&take_value(args, &mut i, arg)?)?);
                }
                "-I" | "--INDENT" => {
                    indent_uncharged = Some(parse_int(&take_value(args, &mut i, arg)?)?);
                }
                "-p" | "--prepend" => prepend_charged = Some(take_value(args, &mut i, arg)?),
                "-P" | "--PREPEND" => prepend_uncharged = Some(take_value(args, &mut i, arg)?),
                "-a" | "--append" => append_charged = Some(take_value(args, &mut i, arg)?),
                "-A" | "--APPEND" => append_uncharged = Some(take_value(args, &mut i, arg)?),
                other => {
                    if let Some(val) = other.strip_prefix("--width=") {
                        opts.width = parse_int(val)?;
                    } else if let Some(val) = other.strip_prefix("--indent=") {
                        indent_charged = Some(parse_int(val)?);
                    } else if let Some(val) = other.strip_prefix("--INDENT=") {
                        indent_uncharged = Some(parse_int(val)?);
                    } else if let Some(val) = other.strip_prefix("--prepend=") {
                        prepend_charged = Some(val.to_string());
                    } else if let Some(val) = other.strip_prefix("--PREPEND=") {
                        prepend_uncharged = Some(val.to_string());
                    } else if let Some(val) = other.strip_prefix("--append=") {
                        append_charged = Some(val.to_string());
                    } else if let Some(val) = other.strip_prefix("--APPEND=") {
                        append_uncharged = Some(val.to_string());
                    } else if other.starts_with('-') && other.len() > 1 {
                        return Err(format!("Unknown option: {other}"));
                    } else {
                        opts.words.push(other.to_string());
                    }
                }
            }
            i += 1;
        }

        if opts.chars && opts.fill {
            return Err("Options -c and -f cannot be used together.".to_string());
        }
        if indent_charged.is_some() && indent_uncharged.is_some() {
            return Err("Options -i and -I cannot be used together.".to_string());
        }
        if prepend_charged.is_some() && prepend_uncharged.is_some() {
            return Err("Options -p and -P cannot be used together.".to_string());
        }
        if append_charged.is_some() && append_uncharged.is_some() {
            return Err("Options -a and -A cannot be used together.".to_string());
        }

        opts.indent_charged = indent_charged.is_some();
        opts.indent = indent_charged.or(indent_uncharged).unwrap_or(0);
        opts.prepend_charged = prepend_charged.is_some();
        opts.prepend = prepend_charged
            .or(prepend_uncharged)
            .filter(|s| !s.is_empty());
        opts.append_charged = append_charged.is_some();
        opts.append = append_charged
            .or(append_uncharged)
            .filter(|s| !s.is_empty());
        Ok(opts)
    }

    /// Compute the effective width and decoration strings.
    ///
    /// Charged indent/prepend/append lengths are subtracted from the
    /// width, which is then clamped to at least 1.
    #[must_use]
    pub fn resolve(&self) -> Resolved {
        let mut width = self.width.max(1);
        let indent = " ".repeat(self.indent * INDENT_UNIT);
        if !indent.is_empty() && self.indent_charged {
            width = width.saturating_sub(indent.len()).max(1);
        }
        if let Some(prepend) = &self.prepend
            && self.prepend_charged
        {
            width = width.saturating_sub(prepend.chars().count()).max(1);
        }
        if let Some(append) = &self.append
            && self.append_charged
        {
            width = width.saturating_sub(append.chars().count()).max(1);
        }

        let mut prepend = indent;
        if let Some(user) = &self.prepend {
            prepend.push_str(user);
        }
        Resolved {
            width,
            prepend: (!prepend.is_empty()).then_some(prepend),
            append: self.append.clone(),
        }
    }
}

/// The value following a `--flag value` spelling.
fn take_value(args: &[String], i: &mut usize, flag: &str) -> Result<String, String> {
    *i += 1;
    args.get(*i)
        .cloned()
        .ok_or_else(|| format!("Missing value for {flag}"))
}

/// Parse a string as a non-negative integer, with a usage-error message.
fn parse_int(s: &str) -> Result<usize, String> {
    s.trim()
        .parse::<usize>()
        .map_err(|_| format!("Invalid integer: {s}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Opts, String> {
        let args: Vec<String> = args.iter().map(ToString::to_string).collect();
        Opts::try_parse(&args, Opts::default())
    }

    // ==========================================================================
    // Flag parsing
    // ==========================================================================

    #[test]
    fn defaults() {
        let opts = parse(&[]).unwrap();
        assert_eq!(opts.width, DEFAULT_WIDTH);
        assert!(!opts.chars && !opts.fill && !opts.newlines);
        assert!(opts.words.is_empty());
    }

    #[test]
    fn width_both_spellings() {
        assert_eq!(parse(&["-w", "40"]).unwrap().width, 40);
        assert_eq!(parse(&["--width", "40"]).unwrap().width, 40);
        assert_eq!(parse(&["--width=40"]).unwrap().width, 40);
    }

    #[test]
    fn words_are_collected_in_order() {
        let opts = parse(&["alpha", "-w", "10", "beta"]).unwrap();
        assert_eq!(opts.words, vec!["alpha", "beta"]);
        assert_eq!(opts.width, 10);
    }

    #[test]
    fn boolean_flags() {
        let opts = parse(&["-c", "-n", "-l", "-e", "-s", "-S", "-D"]).unwrap();
        assert!(opts.chars && opts.newlines && opts.lstrip && opts.enumerate);
        assert!(opts.strip_first && opts.strip_last && opts.debug);
    }

    #[test]
    fn prepend_variants() {
        let opts = parse(&["-p", "> "]).unwrap();
        assert_eq!(opts.prepend.as_deref(), Some("> "));
        assert!(opts.prepend_charged);

        let opts = parse(&["-P", "> "]).unwrap();
        assert_eq!(opts.prepend.as_deref(), Some("> "));
        assert!(!opts.prepend_charged);
    }

    #[test]
    fn empty_decoration_is_dropped() {
        let opts = parse(&["-p", "", "-a", ""]).unwrap();
        assert_eq!(opts.prepend, None);
        assert_eq!(opts.append, None);
    }

    #[test]
    fn invalid_integer_is_an_error() {
        let err = parse(&["-w", "nope"]).unwrap_err();
        assert_eq!(err, "Invalid integer: nope");
    }

    #[test]
    fn missing_value_is_an_error() {
        assert!(parse(&["-w"]).is_err());
    }

    #[test]
    fn unknown_long_option_is_an_error() {
        assert!(parse(&["--frobnicate"]).is_err());
    }

    #[test]
    fn conflicting_pairs_are_errors() {
        assert!(parse(&["-c", "-f"]).is_err());
        assert!(parse(&["-i", "1", "-I", "2"]).is_err());
        assert!(parse(&["-p", "a", "-P", "b"]).is_err());
        assert!(parse(&["-a", "a", "-A", "b"]).is_err());
    }

    // ==========================================================================
    // Width resolution
    // ==========================================================================

    #[test]
    fn charged_indent_narrows_width() {
        let opts = parse(&["-w", "10", "-i", "1"]).unwrap();
        let resolved = opts.resolve();
        assert_eq!(resolved.width, 6);
        assert_eq!(resolved.prepend.as_deref(), Some("    "));
    }

    #[test]
    fn uncharged_indent_keeps_width() {
        let opts = parse(&["-w", "10", "-I", "1"]).unwrap();
        let resolved = opts.resolve();
        assert_eq!(resolved.width, 10);
        assert_eq!(resolved.prepend.as_deref(), Some("    "));
    }

    #[test]
    fn indent_precedes_user_prepend() {
        let opts = parse(&["-I", "1", "-P", "> "]).unwrap();
        assert_eq!(opts.resolve().prepend.as_deref(), Some("    > "));
    }

    #[test]
    fn charged_decoration_narrows_width() {
        let opts = parse(&["-w", "20", "-p", "> ", "-a", " <"]).unwrap();
        assert_eq!(opts.resolve().width, 16);
    }

    #[test]
    fn width_never_drops_below_one() {
        let opts = parse(&["-w", "2", "-p", "....."]).unwrap();
        assert_eq!(opts.resolve().width, 1);

        let opts = parse(&["-w", "0"]).unwrap();
        assert_eq!(opts.resolve().width, 1);
    }
}
