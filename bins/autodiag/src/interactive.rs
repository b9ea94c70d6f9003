//! Prompt loop for `--interactive`.

use anyhow::{Context, Result};
use autodiag_cli::render::render;
use autodiag_search::RecordStore;
use std::io::{BufRead, Write};

const EXIT_WORDS: [&str; 3] = ["quit", "exit", "q"];

fn is_exit(input: &str) -> bool {
    EXIT_WORDS.iter().any(|word| input.eq_ignore_ascii_case(word))
}

/// Reads one description per line until an exit word or end of input.
pub fn run<R: BufRead, W: Write>(
    store: &RecordStore,
    top_n: usize,
    input: R,
    mut out: W,
) -> Result<()> {
    writeln!(out, "💬 Interactive mode - describe your vehicle problem")?;
    writeln!(out, "(type 'quit' to leave)")?;
    writeln!(out, "{}", "-".repeat(50))?;

    let mut lines = input.lines();
    loop {
        write!(out, "\n🚗 Your problem: ")?;
        out.flush()?;

        let Some(line) = lines.next() else {
            writeln!(out, "\n👋 Goodbye!")?;
            break;
        };
        let line = line.context("Failed to read from stdin")?;
        let query = line.trim();

        if is_exit(query) {
            writeln!(out, "👋 Goodbye!")?;
            break;
        }
        if query.is_empty() {
            continue;
        }

        let outcome = crate::run_diagnosis(query, store, top_n)?;
        writeln!(out, "\n{}", render(&outcome))?;
    }

    Ok(())
}
