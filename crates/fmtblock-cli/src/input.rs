#![forbid(unsafe_code)]

//! Input gathering: file-or-literal arguments and stdin.

use std::fs;
use std::io::{self, ErrorKind, IsTerminal, Read};
use std::process;

/// Arguments at or beyond this length are never probed as file paths.
const FILE_NAME_MAX: usize = 256;

/// Resolve word arguments into the text to format.
///
/// Each word is tried as a file path; readable files substitute their
/// contents. Resolved pieces are joined with single spaces. With no words,
/// stdin is read instead. The flag reports whether any existing file
/// failed to read.
pub fn gather(words: &[String]) -> (String, bool) {
    if words.is_empty() {
        return (read_stdin(), false);
    }
    let mut failed = false;
    let mut pieces = Vec::new();
    for word in words {
        match resolve(word) {
            Some(text) => {
                if !text.is_empty() {
                    pieces.push(text);
                }
            }
            None => failed = true,
        }
    }
    (pieces.join(" "), failed)
}

/// Substitute file contents for an argument naming a readable file.
///
/// A missing path means the argument is literal text. An existing but
/// unreadable file is reported on stderr and contributes nothing.
fn resolve(word: &str) -> Option<String> {
    if word.chars().count() >= FILE_NAME_MAX {
        return Some(word.to_string());
    }
    match fs::read_to_string(word) {
        Ok(data) => Some(data),
        Err(err) if err.kind() == ErrorKind::NotFound => Some(word.to_string()),
        Err(err) => {
            eprintln!("Failed to read file: {word}\n  {err}");
            None
        }
    }
}

/// Read stdin to end, with a notice when attached to a terminal.
fn read_stdin() -> String {
    if io::stdin().is_terminal() && io::stdout().is_terminal() {
        println!("\nReading from stdin until end of file (Ctrl + D)...\n");
    }
    let mut text = String::new();
    if let Err(err) = io::stdin().lock().read_to_string(&mut text) {
        eprintln!("Failed to read stdin: {err}");
        process::exit(1);
    }
    text
}
