//! annotate.rs
//!
//! Per-file orchestration: locate test blocks, skip the already
//! commented ones, fetch summaries, splice comments in, write back.
//!
//! Blocks are processed in reverse document order. Inserting a comment
//! shifts every later index forward, so walking backwards keeps the
//! not-yet-processed block indices valid.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::error::{GtscribeError, Result};
use crate::llm::OllamaClient;
use crate::report::FileReport;
use crate::scanner::{find_test_blocks, has_preceding_comment};

/// Cap on the number of body lines sent to the model as context.
const CONTEXT_LINES: usize = 200;

/// Target column for the right edge of inserted comments.
const COMMENT_COLUMNS: usize = 100;

pub fn annotate_file(path: &Path, client: &OllamaClient, backup: bool) -> Result<FileReport> {
    annotate_path(path, backup, &mut |code| client.summarize(code))
}

/// Same as [`annotate_file`] but with the summary source injected, so
/// the splice/write logic is testable without a generation service.
pub(crate) fn annotate_path(
    path: &Path,
    backup: bool,
    summarize: &mut dyn FnMut(&str) -> Result<String>,
) -> Result<FileReport> {
    let started = Instant::now();

    let bytes = fs::read(path)?;
    let text = String::from_utf8(bytes).map_err(|_| GtscribeError::Encoding {
        path: path.to_path_buf(),
    })?;
    let mut lines: Vec<String> = text.lines().map(str::to_string).collect();

    let outcome = annotate_lines(&mut lines, summarize)?;

    // The write happens exactly once, after every block succeeded; a
    // generation failure above means the file was never touched.
    if outcome.added > 0 {
        if backup {
            fs::rename(path, backup_path(path))?;
        }
        fs::write(path, lines.join("\n") + "\n")?;
        println!("✔ {} test(s) annotated in {}", outcome.added, path.display());
    } else {
        println!("- {}: nothing to annotate", path.display());
    }

    Ok(FileReport {
        path: path.to_path_buf(),
        annotated: outcome.added,
        generation: outcome.generation,
        elapsed: started.elapsed(),
    })
}

pub(crate) struct SpliceOutcome {
    pub added: usize,
    pub generation: Duration,
}

/// Splices a comment above every uncommented test block, in reverse
/// document order. Mutates `lines` only; writing is the caller's job.
pub(crate) fn annotate_lines(
    lines: &mut Vec<String>,
    summarize: &mut dyn FnMut(&str) -> Result<String>,
) -> Result<SpliceOutcome> {
    let blocks: Vec<_> = find_test_blocks(lines).collect();
    let mut added = 0usize;
    let mut generation = Duration::ZERO;

    for block in blocks.iter().rev() {
        if has_preceding_comment(lines, block.start) {
            continue;
        }

        let context_end = (block.start + CONTEXT_LINES).min(lines.len());
        let context = lines[block.start..context_end].join("\n");

        let asked = Instant::now();
        let summary = summarize(&context)?;
        generation += asked.elapsed();

        let indent = leading_whitespace(&lines[block.start]);
        let comment = build_comment(&summary, &indent);

        println!("----");
        for line in &comment {
            println!("{line}");
        }
        println!("----");

        for (offset, line) in comment.into_iter().enumerate() {
            lines.insert(block.start + offset, line);
        }
        added += 1;
    }

    Ok(SpliceOutcome { added, generation })
}

/* ============================================================
   Comment construction
   ============================================================ */

fn build_comment(summary: &str, indent: &str) -> Vec<String> {
    let width = COMMENT_COLUMNS
        .saturating_sub(indent.width() + 3)
        .max(1);

    let mut out = vec![format!("{indent}/*")];
    for segment in wrap(summary, width) {
        out.push(format!("{indent} * {segment}"));
    }
    out.push(format!("{indent} */"));
    out
}

/// Greedy word wrap by display width. A word wider than `width` is
/// broken at the width boundary so every emitted segment fits.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if word.width() > width {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            for ch in word.chars() {
                if !current.is_empty() && current.width() + ch.width().unwrap_or(0) > width {
                    out.push(std::mem::take(&mut current));
                }
                current.push(ch);
            }
            continue;
        }

        if current.is_empty() {
            current.push_str(word);
        } else if current.width() + 1 + word.width() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            out.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn leading_whitespace(line: &str) -> String {
    line[..line.len() - line.trim_start().len()].to_string()
}

fn backup_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".bak");
    PathBuf::from(os)
}

/* ============================================================
   Tests
   ============================================================ */
