/*!
 * Shared decoder for event-based subtitle formats.
 *
 * Each format reader yields `SubtitleEvent`s (millisecond start/end plus a
 * text payload); the caller turns them into cues.
 */

use super::{parse_clock, SubtitleFormat, Timecode};
use crate::errors::ParseError;

/// One timed event from an event-based subtitle file
#[derive(Debug, Clone, PartialEq)]
pub(super) struct SubtitleEvent {
    pub start: Timecode,
    pub end: Timecode,
    pub text: String,
}

pub(super) fn decode_events(content: &str, format: SubtitleFormat) -> Result<Vec<SubtitleEvent>, ParseError> {
    match format {
        SubtitleFormat::WebVtt => read_webvtt(content),
        SubtitleFormat::Ass | SubtitleFormat::Ssa => read_event_table(content),
        SubtitleFormat::Srt => Err(ParseError::UnsupportedFormat(
            "srt is not an event-based format".to_string(),
        )),
    }
}

fn read_webvtt(content: &str) -> Result<Vec<SubtitleEvent>, ParseError> {
    let mut lines = content.lines().enumerate().map(|(i, l)| (i + 1, l)).peekable();

    // Signature line, then the rest of the header block
    let header = lines
        .by_ref()
        .find(|(_, l)| !l.trim().is_empty())
        .map(|(_, l)| l.trim())
        .unwrap_or_default();
    if !(header == "WEBVTT" || header.starts_with("WEBVTT ") || header.starts_with("WEBVTT\t")) {
        return Err(ParseError::MissingHeader);
    }
    while lines.next_if(|(_, l)| !l.trim().is_empty()).is_some() {}

    let mut events = Vec::new();
    let mut block: Vec<(usize, &str)> = Vec::new();

    let mut flush = |block: &mut Vec<(usize, &str)>| -> Result<(), ParseError> {
        if block.is_empty() {
            return Ok(());
        }
        let first = block[0].1.trim();
        let skip = ["NOTE", "STYLE", "REGION"]
            .iter()
            .any(|kw| first == *kw || first.starts_with(&format!("{} ", kw)) || first.starts_with(&format!("{}\t", kw)));

        if !skip {
            let timing_pos = block
                .iter()
                .take(2)
                .position(|(_, l)| l.contains("-->"))
                .ok_or(ParseError::MissingTiming { line: block[0].0 })?;
            let (line, timing) = block[timing_pos];
            let (start_text, rest) = timing.split_once("-->").unwrap_or((timing, ""));
            // Cue settings may follow the end time
            let end_text = rest.split_whitespace().next().unwrap_or("");

            let start = parse_clock(start_text.trim(), line)?;
            let end = parse_clock(end_text, line)?;
            let text = block[timing_pos + 1..]
                .iter()
                .map(|(_, l)| l.trim())
                .collect::<Vec<_>>()
                .join("\n");

            events.push(SubtitleEvent { start, end, text });
        }

        block.clear();
        Ok(())
    };

    for (number, line) in lines {
        if line.trim().is_empty() {
            flush(&mut block)?;
        } else {
            block.push((number, line));
        }
    }
    flush(&mut block)?;

    Ok(events)
}

/// Column positions declared by an `[Events]` `Format:` line
struct EventColumns {
    count: usize,
    start: usize,
    end: usize,
    text: usize,
}

impl EventColumns {
    fn from_format_line(fields: &str) -> Result<Self, ParseError> {
        let names: Vec<String> = fields.split(',').map(|f| f.trim().to_lowercase()).collect();
        let find = |name: &str| {
            names.iter().position(|n| n == name).ok_or_else(|| {
                ParseError::MissingEventTable(format!("Format line has no '{}' column", name))
            })
        };

        Ok(Self {
            count: names.len(),
            start: find("start")?,
            end: find("end")?,
            text: find("text")?,
        })
    }
}

/// ASS/SSA payload escapes to plain line breaks and spaces
fn unescape_payload(text: &str) -> String {
    text.replace("\\N", "\n").replace("\\n", "\n").replace("\\h", " ")
}

fn read_event_table(content: &str) -> Result<Vec<SubtitleEvent>, ParseError> {
    let mut in_events = false;
    let mut saw_events = false;
    let mut columns: Option<EventColumns> = None;
    let mut events = Vec::new();

    for (i, raw_line) in content.lines().enumerate() {
        let number = i + 1;
        let line = raw_line.trim();

        if line.starts_with('[') && line.ends_with(']') {
            in_events = line.eq_ignore_ascii_case("[events]");
            saw_events |= in_events;
            continue;
        }
        if !in_events {
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            continue;
        };

        match key.trim().to_lowercase().as_str() {
            "format" => columns = Some(EventColumns::from_format_line(value)?),
            "dialogue" => {
                let cols = columns.as_ref().ok_or_else(|| {
                    ParseError::MissingEventTable(format!(
                        "Dialogue at line {} appears before the Format line",
                        number
                    ))
                })?;

                let fields: Vec<&str> = value.splitn(cols.count, ',').collect();
                if fields.len() < cols.count {
                    return Err(ParseError::MalformedEvent {
                        line: number,
                        message: format!("expected {} fields, found {}", cols.count, fields.len()),
                    });
                }

                let start = parse_clock(fields[cols.start].trim(), number)?;
                let end = parse_clock(fields[cols.end].trim(), number)?;
                let text = unescape_payload(fields[cols.text].trim_start());

                events.push(SubtitleEvent { start, end, text });
            }
            _ => {}
        }
    }

    if !saw_events {
        return Err(ParseError::MissingEventTable("no [Events] section".to_string()));
    }
    if columns.is_none() {
        return Err(ParseError::MissingEventTable(
            "no Format line in [Events] section".to_string(),
        ));
    }

    Ok(events)
}
