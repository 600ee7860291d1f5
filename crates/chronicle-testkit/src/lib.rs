// Copyright 2026 The chronicle authors
// Licensed under the Apache License, Version 2.0

//! Deterministic demo archive for `--demo` runs and tests. The generated
//! chapters exercise the shapes the segmenter cares about: bare agent
//! headers, inline `Name: content` remainders, prompt-before-header runs,
//! and free-form prose chapters past the layout threshold.

use anyhow::Result;
use chronicle_app::{Archive, DEFAULT_AGENT_NAMES, DEFAULT_PLAIN_TEXT_FROM, NewChapter};

pub const DEMO_CHAPTER_COUNT: usize = 18;
pub const DEMO_AUTHOR: &str = "吴师傅";

const TITLES: [&str; 18] = [
    "First Contact",
    "The Quiet Commute",
    "Night Shift",
    "Borrowed Words",
    "The Long Answer",
    "Static on the Line",
    "Paper Lanterns",
    "A Question of Taste",
    "The Second Draft",
    "Crosstalk",
    "Low Battery",
    "The Archivist",
    "Winter Prompt",
    "Parallel Replies",
    "After the Transcript",
    "Notes from the Passenger Seat",
    "The Unfinished Chapter",
    "End of Archive",
];

const DATES: [&str; 6] = [
    "2024-03-02",
    "2024-05-18",
    "2024-08-09",
    "2024-11-23",
    "2025-02-14",
    "2025-06-30",
];

const PROLOGUES: [&str; 6] = [
    "A first exchange that went somewhere unexpected.",
    "Two agents disagree about the same question.",
    "The human keeps pushing; the answers keep shifting.",
    "A short prompt, a long reply.",
    "Written after midnight, saved without edits.",
    "The machine gets the last word this time.",
];

const PROMPTS: [&str; 6] = [
    "帮我把今天的想法整理成一段话。",
    "What would you do differently?",
    "Explain it like I was not listening the first time.",
    "这段对话值得保留吗?",
    "Give me one honest sentence about this.",
    "Try again, slower.",
];

const REPLIES: [&str; 6] = [
    "Here is one way to hold that thought without losing it.",
    "慢一点看,答案其实一直都在问题里。",
    "I would keep the question and throw away my first answer.",
    "Some conversations are worth keeping for the silences.",
    "你已经写下的比你以为的更完整。",
    "Slower, then: begin where you stopped trusting yourself.",
];

const PROSE_LINES: [&str; 5] = [
    "后来的章节不再有对话,只有记录。",
    "The passenger seat stayed empty, but the notes kept arriving.",
    "有些回答不需要署名。",
    "What the archive keeps is not the words but the turning toward them.",
    "翻到这里的人,已经读完了最安静的部分。",
];

/// Builds the demo archive: chapters before the prose threshold are
/// dialogue transcripts, the rest free-form prose.
pub fn demo_archive() -> Archive {
    Archive::new(demo_chapters())
}

pub fn demo_chapters() -> Vec<NewChapter> {
    (0..DEMO_CHAPTER_COUNT)
        .map(|position| {
            let chapter_number = position + 1;
            let text = if chapter_number >= DEFAULT_PLAIN_TEXT_FROM {
                prose_text(position)
            } else {
                dialogue_text(position)
            };
            NewChapter {
                title: Some(TITLES[position % TITLES.len()].to_owned()),
                author: Some(DEMO_AUTHOR.to_owned()),
                written_date: Some(DATES[position % DATES.len()].to_owned()),
                prologue: Some(PROLOGUES[position % PROLOGUES.len()].to_owned()),
                text: Some(text),
            }
        })
        .collect()
}

pub fn demo_archive_json() -> String {
    serde_json::to_string_pretty(&demo_chapters()).unwrap_or_else(|_| "[]".to_owned())
}

pub fn write_demo_archive(path: &std::path::Path) -> Result<()> {
    std::fs::write(path, demo_archive_json())?;
    Ok(())
}

fn dialogue_text(position: usize) -> String {
    let first_agent = DEFAULT_AGENT_NAMES[position % DEFAULT_AGENT_NAMES.len()];
    let second_agent = DEFAULT_AGENT_NAMES[(position + 2) % DEFAULT_AGENT_NAMES.len()];
    let prompt = PROMPTS[position % PROMPTS.len()];
    let follow_up = PROMPTS[(position + 3) % PROMPTS.len()];
    let first_reply = REPLIES[position % REPLIES.len()];
    let second_reply = REPLIES[(position + 1) % REPLIES.len()];
    let extra_line = REPLIES[(position + 4) % REPLIES.len()];

    // Bare header, inline remainder, and a prompt line sitting directly
    // before the next header, in one transcript.
    format!(
        "{prompt}\n\n{first_agent}\n{first_reply}\n{extra_line}\n\n{follow_up}\n{second_agent}: {second_reply}\n"
    )
}

fn prose_text(position: usize) -> String {
    let first = PROSE_LINES[position % PROSE_LINES.len()];
    let second = PROSE_LINES[(position + 1) % PROSE_LINES.len()];
    let third = PROSE_LINES[(position + 2) % PROSE_LINES.len()];
    format!("{first}\n\n{second}\n\n{third}\n")
}
