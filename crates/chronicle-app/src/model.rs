// Copyright 2026 The chronicle authors
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::ids::SourceIndex;

/// One chapter as supplied by the content source. Every metadata field is
/// optional; absence is a valid state, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterRecord {
    pub source_index: SourceIndex,
    pub title: Option<String>,
    pub author: Option<String>,
    pub written_date: Option<String>,
    pub prologue: Option<String>,
    pub text: Option<String>,
}

/// Chapter fields before the archive assigns a `SourceIndex`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewChapter {
    pub title: Option<String>,
    pub author: Option<String>,
    pub written_date: Option<String>,
    pub prologue: Option<String>,
    pub text: Option<String>,
}

/// The full chapter collection, held in canonical (chronological) order.
///
/// The browsing UI shows chapters latest-first; that display ordering is
/// always derived here as the exact reverse of the canonical list, and all
/// translation between the two spaces goes through this type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Archive {
    chapters: Vec<ChapterRecord>,
}

impl Archive {
    pub fn new(drafts: Vec<NewChapter>) -> Self {
        let chapters = drafts
            .into_iter()
            .enumerate()
            .map(|(position, draft)| ChapterRecord {
                source_index: SourceIndex::new(position),
                title: draft.title,
                author: draft.author,
                written_date: draft.written_date,
                prologue: draft.prologue,
                text: draft.text,
            })
            .collect();
        Self { chapters }
    }

    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    /// Canonical ordering, oldest first.
    pub fn chapters(&self) -> &[ChapterRecord] {
        &self.chapters
    }

    pub fn get(&self, index: SourceIndex) -> Option<&ChapterRecord> {
        self.chapters.get(index.get())
    }

    /// Display ordering, latest first.
    pub fn display_order(&self) -> impl Iterator<Item = &ChapterRecord> {
        self.chapters.iter().rev()
    }

    pub fn by_display(&self, display_index: usize) -> Option<&ChapterRecord> {
        let source = self.display_to_source(display_index)?;
        self.get(source)
    }

    pub fn display_to_source(&self, display_index: usize) -> Option<SourceIndex> {
        if display_index >= self.chapters.len() {
            return None;
        }
        Some(SourceIndex::new(self.chapters.len() - 1 - display_index))
    }

    pub fn source_to_display(&self, index: SourceIndex) -> Option<usize> {
        if index.get() >= self.chapters.len() {
            return None;
        }
        Some(self.chapters.len() - 1 - index.get())
    }

    /// 1-based chapter number, always looked up from the canonical list so
    /// reordering the browsing view never changes a chapter's identifier.
    pub fn chapter_number(&self, index: SourceIndex) -> Option<usize> {
        self.get(index).map(|record| record.source_index.chapter_number())
    }

    /// Case-insensitive substring filter over title, prologue, and full
    /// text. Returns matching display indices in display order; an empty or
    /// whitespace-only query matches every chapter. First match in display
    /// order wins ties; there is no relevance ranking.
    pub fn filter(&self, query: &str) -> Vec<usize> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return (0..self.chapters.len()).collect();
        }
        self.display_order()
            .enumerate()
            .filter(|(_, record)| chapter_matches(record, &needle))
            .map(|(display_index, _)| display_index)
            .collect()
    }
}

fn chapter_matches(record: &ChapterRecord, needle_lowercase: &str) -> bool {
    let haystack = format!(
        "{} {} {}",
        record.title.as_deref().unwrap_or(""),
        record.prologue.as_deref().unwrap_or(""),
        record.text.as_deref().unwrap_or(""),
    )
    .to_lowercase();
    haystack.contains(needle_lowercase)
}

#[cfg(test)]
mod tests {
    use super::{Archive, NewChapter};
    use crate::ids::SourceIndex;

    fn titled(title: &str) -> NewChapter {
        NewChapter {
            title: Some(title.to_owned()),
            ..NewChapter::default()
        }
    }

    fn archive_of(titles: &[&str]) -> Archive {
        Archive::new(titles.iter().map(|title| titled(title)).collect())
    }

    #[test]
    fn source_index_is_assigned_by_load_position() {
        let archive = archive_of(&["first", "second", "third"]);
        for (position, record) in archive.chapters().iter().enumerate() {
            assert_eq!(record.source_index, SourceIndex::new(position));
        }
    }

    #[test]
    fn display_order_is_exact_reverse_of_canonical() {
        let archive = archive_of(&["first", "second", "third"]);
        let displayed: Vec<_> = archive
            .display_order()
            .map(|record| record.title.as_deref().unwrap_or(""))
            .collect();
        assert_eq!(displayed, vec!["third", "second", "first"]);
    }

    #[test]
    fn chapter_number_is_stable_under_reordering() {
        let archive = archive_of(&["first", "second", "third", "fourth", "fifth"]);
        for display_index in 0..archive.len() {
            let record = archive.by_display(display_index).expect("display lookup");
            assert_eq!(
                archive.chapter_number(record.source_index),
                Some(record.source_index.get() + 1),
            );
        }
        // Newest chapter sits at display position 0 but keeps its number.
        let newest = archive.by_display(0).expect("newest chapter");
        assert_eq!(newest.source_index.chapter_number(), 5);
    }

    #[test]
    fn display_and_source_translations_round_trip() {
        let archive = archive_of(&["a", "b", "c", "d"]);
        for display_index in 0..archive.len() {
            let source = archive
                .display_to_source(display_index)
                .expect("in-range display index");
            assert_eq!(archive.source_to_display(source), Some(display_index));
        }
        assert_eq!(archive.display_to_source(4), None);
        assert_eq!(archive.source_to_display(SourceIndex::new(9)), None);
    }

    #[test]
    fn empty_query_matches_every_chapter_in_display_order() {
        let archive = archive_of(&["a", "b", "c"]);
        assert_eq!(archive.filter(""), vec![0, 1, 2]);
        assert_eq!(archive.filter("   "), vec![0, 1, 2]);
    }

    #[test]
    fn filter_is_case_insensitive_and_spans_all_text_fields() {
        let archive = Archive::new(vec![
            NewChapter {
                title: Some("Night Shift".to_owned()),
                ..NewChapter::default()
            },
            NewChapter {
                prologue: Some("A quiet morning".to_owned()),
                ..NewChapter::default()
            },
            NewChapter {
                text: Some("ChatGPT: the stars were out".to_owned()),
                ..NewChapter::default()
            },
        ]);

        assert_eq!(archive.filter("NIGHT"), vec![2]);
        assert_eq!(archive.filter("morning"), vec![1]);
        assert_eq!(archive.filter("stars"), vec![0]);
        assert!(archive.filter("absent").is_empty());
    }

    #[test]
    fn filter_treats_missing_fields_as_empty() {
        let archive = Archive::new(vec![NewChapter::default()]);
        assert!(archive.filter("anything").is_empty());
        assert_eq!(archive.filter(""), vec![0]);
    }

    #[test]
    fn filter_preserves_display_order() {
        let archive = archive_of(&["shared word", "other", "shared again"]);
        // Display order is ["shared again", "other", "shared word"].
        assert_eq!(archive.filter("shared"), vec![0, 2]);
    }
}
