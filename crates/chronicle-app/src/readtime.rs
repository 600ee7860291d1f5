// Copyright 2026 The chronicle authors
// Licensed under the Apache License, Version 2.0

//! Reading-time estimate for mixed Chinese/English chapter text.

const CJK_CHARS_PER_MINUTE: f64 = 250.0;
const ENGLISH_WORDS_PER_MINUTE: f64 = 200.0;

/// Estimated minutes to read. CJK characters and whitespace-delimited
/// words containing ASCII letters are counted separately at their own
/// reading speeds. Non-empty text never estimates below one minute;
/// absent or blank text estimates zero.
pub fn reading_time_minutes(text: Option<&str>) -> usize {
    let Some(text) = text else {
        return 0;
    };
    if text.trim().is_empty() {
        return 0;
    }

    let cjk_chars = text
        .chars()
        .filter(|ch| ('\u{4e00}'..='\u{9fa5}').contains(ch))
        .count();
    let english_words = text
        .split_whitespace()
        .filter(|word| word.chars().any(|ch| ch.is_ascii_alphabetic()))
        .count();

    let minutes = cjk_chars as f64 / CJK_CHARS_PER_MINUTE
        + english_words as f64 / ENGLISH_WORDS_PER_MINUTE;
    (minutes.round() as usize).max(1)
}

pub fn format_reading_time(minutes: usize) -> String {
    if minutes < 1 {
        "< 1 min read".to_owned()
    } else {
        format!("{minutes} min read")
    }
}

#[cfg(test)]
mod tests {
    use super::{format_reading_time, reading_time_minutes};

    #[test]
    fn absent_or_blank_text_reads_in_zero_minutes() {
        assert_eq!(reading_time_minutes(None), 0);
        assert_eq!(reading_time_minutes(Some("")), 0);
        assert_eq!(reading_time_minutes(Some("   \n ")), 0);
    }

    #[test]
    fn short_text_floors_at_one_minute() {
        assert_eq!(reading_time_minutes(Some("hello world")), 1);
        assert_eq!(reading_time_minutes(Some("你好")), 1);
    }

    #[test]
    fn english_words_read_at_two_hundred_per_minute() {
        let text = "word ".repeat(600);
        assert_eq!(reading_time_minutes(Some(&text)), 3);
    }

    #[test]
    fn cjk_chars_read_at_two_hundred_fifty_per_minute() {
        let text = "字".repeat(750);
        assert_eq!(reading_time_minutes(Some(&text)), 3);
    }

    #[test]
    fn mixed_text_sums_both_rates() {
        // 500 CJK chars (2 min) + 400 English words (2 min).
        let text = format!("{} {}", "字".repeat(500), "word ".repeat(400));
        assert_eq!(reading_time_minutes(Some(&text)), 4);
    }

    #[test]
    fn punctuation_only_tokens_are_not_words() {
        assert_eq!(reading_time_minutes(Some("--- ... !!!")), 1);
    }

    #[test]
    fn formatter_shapes() {
        assert_eq!(format_reading_time(0), "< 1 min read");
        assert_eq!(format_reading_time(1), "1 min read");
        assert_eq!(format_reading_time(12), "12 min read");
    }
}
