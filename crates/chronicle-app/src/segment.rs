// Copyright 2026 The chronicle authors
// Licensed under the Apache License, Version 2.0

//! Splits chapter text into attributed segments for differentiated
//! rendering. Early chapters are transcripts of a human talking to named
//! AI agents; a line that opens with a recognized agent name starts that
//! agent's reply block, everything else belongs to the human. Later
//! chapters are free-form prose and get one paragraph per non-blank line.

use serde::{Deserialize, Serialize};

/// The closed set of assistant names recognized as segment boundaries.
pub const DEFAULT_AGENT_NAMES: [&str; 6] = [
    "ChatGPT",
    "Kimi",
    "Claude",
    "DeepSeek",
    "通义千问",
    "文心一言",
];

/// 1-based chapter number from which chapters are rendered as free-form
/// prose instead of dialogue transcripts.
pub const DEFAULT_PLAIN_TEXT_FROM: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentKind {
    Human,
    Agent,
}

/// A contiguous run of non-blank trimmed lines attributed to one speaker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub kind: SegmentKind,
    pub agent_name: Option<String>,
    pub lines: Vec<String>,
}

impl Segment {
    fn human(lines: Vec<String>) -> Self {
        Self {
            kind: SegmentKind::Human,
            agent_name: None,
            lines,
        }
    }

    fn agent(name: String, lines: Vec<String>) -> Self {
        Self {
            kind: SegmentKind::Agent,
            agent_name: Some(name),
            lines,
        }
    }
}

/// One rendered block in free-form prose mode. Blank source lines survive
/// as explicit spacing markers instead of being dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProseBlock {
    Paragraph(String),
    Blank,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChapterLayout {
    Dialogue,
    Prose,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmenterConfig {
    agent_names: Vec<String>,
    plain_text_from: usize,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            agent_names: DEFAULT_AGENT_NAMES.iter().map(|name| (*name).to_owned()).collect(),
            plain_text_from: DEFAULT_PLAIN_TEXT_FROM,
        }
    }
}

impl SegmenterConfig {
    pub fn new(agent_names: Vec<String>, plain_text_from: usize) -> Self {
        Self {
            agent_names,
            plain_text_from,
        }
    }

    pub fn agent_names(&self) -> &[String] {
        &self.agent_names
    }

    pub const fn plain_text_from(&self) -> usize {
        self.plain_text_from
    }

    /// Layout is chosen by the chapter's 1-based number against the fixed
    /// threshold, never inferred from content.
    pub const fn layout_for(&self, chapter_number: usize) -> ChapterLayout {
        if chapter_number >= self.plain_text_from {
            ChapterLayout::Prose
        } else {
            ChapterLayout::Dialogue
        }
    }

    /// Returns the matched agent name and the rest of the line after the
    /// name. A line matches when it equals the name or continues with `:`
    /// or a space; first name in configuration order wins.
    fn match_agent<'a, 'b>(&'a self, trimmed: &'b str) -> Option<(&'a str, &'b str)> {
        self.agent_names.iter().find_map(|name| {
            let rest = trimmed.strip_prefix(name.as_str())?;
            if rest.is_empty() || rest.starts_with(':') || rest.starts_with(' ') {
                Some((name.as_str(), rest))
            } else {
                None
            }
        })
    }

    /// Single-pass dialogue segmentation. Total over its domain: absent or
    /// empty text produces an empty sequence, nothing fails.
    ///
    /// Blank lines neither start nor end a segment and are not preserved.
    /// A non-matching line inside an open agent block is reclassified as
    /// human when the next non-blank line is an agent header; this catches
    /// the common "prompt line immediately followed by the reply header"
    /// shape. Agent blocks that end up with zero content lines are
    /// suppressed rather than emitted as empty blocks.
    pub fn segment_dialogue(&self, text: Option<&str>) -> Vec<Segment> {
        let Some(text) = text else {
            return Vec::new();
        };

        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let mut segments = Vec::new();
        let mut human_lines: Vec<String> = Vec::new();
        let mut agent_block: Option<(String, Vec<String>)> = None;

        for (position, line) in lines.iter().enumerate() {
            if let Some((name, rest)) = self.match_agent(line) {
                flush_human(&mut segments, &mut human_lines);
                flush_agent(&mut segments, &mut agent_block);

                let content = rest.trim_start_matches(|ch: char| ch == ':' || ch.is_whitespace());
                let mut block_lines = Vec::new();
                if !content.is_empty() {
                    block_lines.push(content.to_owned());
                }
                agent_block = Some((name.to_owned(), block_lines));
            } else if agent_block.is_some() {
                let next_is_agent = lines
                    .get(position + 1)
                    .is_some_and(|next| self.match_agent(next).is_some());
                if next_is_agent {
                    flush_agent(&mut segments, &mut agent_block);
                    human_lines.push((*line).to_owned());
                } else if let Some((_, block_lines)) = agent_block.as_mut() {
                    block_lines.push((*line).to_owned());
                }
            } else {
                human_lines.push((*line).to_owned());
            }
        }

        flush_human(&mut segments, &mut human_lines);
        flush_agent(&mut segments, &mut agent_block);
        segments
    }
}

fn flush_human(segments: &mut Vec<Segment>, human_lines: &mut Vec<String>) {
    if !human_lines.is_empty() {
        segments.push(Segment::human(std::mem::take(human_lines)));
    }
}

fn flush_agent(segments: &mut Vec<Segment>, agent_block: &mut Option<(String, Vec<String>)>) {
    if let Some((name, block_lines)) = agent_block.take()
        && !block_lines.is_empty()
    {
        segments.push(Segment::agent(name, block_lines));
    }
}

/// Free-form prose mode: one paragraph per non-blank line, blank lines kept
/// as spacing markers.
pub fn segment_prose(text: Option<&str>) -> Vec<ProseBlock> {
    let Some(text) = text else {
        return Vec::new();
    };

    text.lines()
        .map(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                ProseBlock::Blank
            } else {
                ProseBlock::Paragraph(trimmed.to_owned())
            }
        })
        .collect()
}
