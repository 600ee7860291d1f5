// Copyright 2026 The chronicle authors
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

/// Position of a chapter in the canonical (chronological) ordering.
///
/// Assigned once when the archive is loaded and never reused or mutated;
/// this is the only identity that survives display reordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SourceIndex(usize);

impl SourceIndex {
    pub const fn new(value: usize) -> Self {
        Self(value)
    }

    pub const fn get(self) -> usize {
        self.0
    }

    /// 1-based chapter number shown to the reader (`CH 3`, `ARCHIVE_003`).
    pub const fn chapter_number(self) -> usize {
        self.0 + 1
    }
}

impl From<usize> for SourceIndex {
    fn from(value: usize) -> Self {
        Self(value)
    }
}
