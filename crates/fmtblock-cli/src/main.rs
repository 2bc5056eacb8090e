#![forbid(unsafe_code)]

//! fmtblock binary entry point.
//!
//! Thin wrapper over the `fmtblock` library: resolves arguments to text,
//! builds the formatting options, and prints each line as it is produced.

mod cli;
mod input;

use std::process;

use fmtblock::{FormatOptions, WrapMode};

fn main() {
    let opts = cli::Opts::parse();
    if opts.debug {
        init_tracing();
    }

    let (text, read_failed) = input::gather(&opts.words);

    let resolved = opts.resolve();
    let mut options = FormatOptions::new(resolved.width)
        .fill(opts.fill)
        .newlines(opts.newlines)
        .lstrip(opts.lstrip)
        .strip_first(opts.strip_first)
        .strip_last(opts.strip_last);
    if opts.chars {
        options = options.mode(WrapMode::Char);
    }
    if let Some(prepend) = resolved.prepend {
        options = options.prepend(prepend);
    }
    if let Some(append) = resolved.append {
        options = options.append(append);
    }
    tracing::debug!(
        width = options.width,
        chars = opts.chars,
        input_len = text.len(),
        "resolved options"
    );

    for (i, line) in fmtblock::iter_format(&text, &options).enumerate() {
        if opts.enumerate {
            // Right-aligned 3-column numbers; alignment degrades past 999.
            println!("{:>3}: {}", i + 1, line);
        } else {
            println!("{line}");
        }
    }

    if read_failed {
        process::exit(1);
    }
}

/// Install a stderr tracing subscriber for `--debug` runs.
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fmtblock=trace")),
        )
        .with_writer(std::io::stderr)
        .init();
}
