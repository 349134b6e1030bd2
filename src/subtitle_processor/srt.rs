//! SubRip grammar: `index` line, `start --> end` line, text lines, blank line.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{parse_clock, Cue};
use crate::errors::ParseError;

// @const: SRT timing line, arrow spacing optional, trailing coordinates ignored
static TIMING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\S+?)\s*-->\s*(\S+)").expect("Invalid SRT timing regex")
});

/// One blank-line separated block with the 1-based line number of each line
type Block<'a> = Vec<(usize, &'a str)>;

fn split_blocks(content: &str) -> Vec<Block<'_>> {
    let mut blocks = Vec::new();
    let mut current: Block = Vec::new();

    for (i, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push((i + 1, line));
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}

/// Parse SRT content. Cues keep file order; timing defects such as
/// `start >= end` are left for validation to report.
pub(super) fn parse_srt(content: &str) -> Result<Vec<Cue>, ParseError> {
    let blocks = split_blocks(content);
    let mut cues = Vec::with_capacity(blocks.len());

    for block in blocks {
        let (index_line, index_text) = block[0];
        let index_text = index_text.trim();
        if index_text.parse::<usize>().is_err() {
            return Err(ParseError::MissingIndex {
                line: index_line,
                found: index_text.to_string(),
            });
        }

        let (timing_line, timing_text) = match block.get(1) {
            Some(&(line, text)) if text.contains("-->") => (line, text),
            _ => return Err(ParseError::MissingTiming { line: index_line }),
        };

        let caps = TIMING_REGEX
            .captures(timing_text)
            .ok_or_else(|| ParseError::InvalidTimestamp {
                line: timing_line,
                value: timing_text.trim().to_string(),
            })?;
        let start = parse_clock(&caps[1], timing_line)?;
        let end = parse_clock(&caps[2], timing_line)?;

        let text = block[2..]
            .iter()
            .map(|(_, line)| line.trim())
            .collect::<Vec<_>>()
            .join("\n");

        cues.push(Cue::new(cues.len() + 1, start, end, &text));
    }

    Ok(cues)
}
