// Copyright 2026 The chronicle authors
// Licensed under the Apache License, Version 2.0

//! The one place that owns "what is the reader looking at". Browsing and
//! reading are a single tagged mode, so states like "reading a chapter
//! while also in a gallery view" cannot be represented.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Chapters,
    Designs,
}

impl ViewKind {
    pub const ALL: [Self; 2] = [Self::Chapters, Self::Designs];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Chapters => "chapters",
            Self::Designs => "designs",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Browsing { view: ViewKind },
    Reading { display_index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub mode: AppMode,
    pub status_line: Option<String>,
    chapter_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    OpenChapter(usize),
    CloseChapter,
    MoveBy(isize),
    SwitchView(ViewKind),
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    ChapterOpened { display_index: usize },
    ChapterClosed,
    Moved { display_index: usize },
    /// The presentation layer resets its document scroll on this.
    ScrollReset,
    ViewChanged(ViewKind),
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn new(chapter_count: usize) -> Self {
        Self {
            mode: AppMode::Browsing {
                view: ViewKind::Chapters,
            },
            status_line: None,
            chapter_count,
        }
    }

    pub const fn chapter_count(&self) -> usize {
        self.chapter_count
    }

    pub const fn open_display_index(&self) -> Option<usize> {
        match self.mode {
            AppMode::Reading { display_index } => Some(display_index),
            AppMode::Browsing { .. } => None,
        }
    }

    pub fn has_prev(&self) -> bool {
        matches!(self.mode, AppMode::Reading { display_index } if display_index > 0)
    }

    pub fn has_next(&self) -> bool {
        matches!(
            self.mode,
            AppMode::Reading { display_index } if display_index + 1 < self.chapter_count
        )
    }

    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::OpenChapter(display_index) => {
                if display_index >= self.chapter_count {
                    // Programming error at the boundary: loud in
                    // development, ignored in release so a bad index can
                    // never crash the reading experience.
                    debug_assert!(
                        false,
                        "open index {display_index} out of range 0..{}",
                        self.chapter_count
                    );
                    return Vec::new();
                }
                self.mode = AppMode::Reading { display_index };
                vec![
                    AppEvent::ChapterOpened { display_index },
                    AppEvent::ScrollReset,
                ]
            }
            AppCommand::CloseChapter => match self.mode {
                AppMode::Reading { .. } => {
                    self.mode = AppMode::Browsing {
                        view: ViewKind::Chapters,
                    };
                    vec![AppEvent::ChapterClosed]
                }
                AppMode::Browsing { .. } => Vec::new(),
            },
            AppCommand::MoveBy(delta) => self.move_by(delta),
            AppCommand::SwitchView(view) => match self.mode {
                AppMode::Browsing { view: current } if current != view => {
                    self.mode = AppMode::Browsing { view };
                    vec![AppEvent::ViewChanged(view)]
                }
                _ => Vec::new(),
            },
            AppCommand::SetStatus(message) => {
                self.status_line = Some(message.clone());
                vec![AppEvent::StatusUpdated(message)]
            }
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    fn move_by(&mut self, delta: isize) -> Vec<AppEvent> {
        let AppMode::Reading { display_index } = self.mode else {
            return Vec::new();
        };
        if self.chapter_count == 0 {
            return Vec::new();
        }

        let limit = self.chapter_count as isize - 1;
        let moved = (display_index as isize + delta).clamp(0, limit) as usize;
        if moved == display_index {
            // Past either end: a no-op, not a wraparound and not an error.
            return Vec::new();
        }

        self.mode = AppMode::Reading {
            display_index: moved,
        };
        vec![
            AppEvent::Moved {
                display_index: moved,
            },
            AppEvent::ScrollReset,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::{AppCommand, AppEvent, AppMode, AppState, ViewKind};

    #[test]
    fn initial_state_is_browsing_chapters() {
        let state = AppState::new(5);
        assert_eq!(
            state.mode,
            AppMode::Browsing {
                view: ViewKind::Chapters
            }
        );
        assert_eq!(state.open_display_index(), None);
        assert!(!state.has_prev());
        assert!(!state.has_next());
    }

    #[test]
    fn open_emits_scroll_reset() {
        let mut state = AppState::new(5);
        let events = state.dispatch(AppCommand::OpenChapter(2));
        assert_eq!(
            events,
            vec![
                AppEvent::ChapterOpened { display_index: 2 },
                AppEvent::ScrollReset,
            ],
        );
        assert_eq!(state.open_display_index(), Some(2));
        assert!(state.has_prev());
        assert!(state.has_next());
    }

    #[test]
    fn move_clamps_at_both_ends() {
        let mut state = AppState::new(5);
        state.dispatch(AppCommand::OpenChapter(0));
        assert!(state.dispatch(AppCommand::MoveBy(-1)).is_empty());
        assert_eq!(state.open_display_index(), Some(0));

        state.dispatch(AppCommand::OpenChapter(4));
        assert!(state.dispatch(AppCommand::MoveBy(1)).is_empty());
        assert_eq!(state.open_display_index(), Some(4));
    }

    #[test]
    fn move_steps_and_resets_scroll() {
        let mut state = AppState::new(3);
        state.dispatch(AppCommand::OpenChapter(1));
        let events = state.dispatch(AppCommand::MoveBy(1));
        assert_eq!(
            events,
            vec![
                AppEvent::Moved { display_index: 2 },
                AppEvent::ScrollReset,
            ],
        );
    }

    #[test]
    fn move_is_a_no_op_while_browsing() {
        let mut state = AppState::new(3);
        assert!(state.dispatch(AppCommand::MoveBy(1)).is_empty());
        assert_eq!(state.open_display_index(), None);
    }

    #[test]
    fn close_returns_to_chapter_browsing() {
        let mut state = AppState::new(3);
        state.dispatch(AppCommand::OpenChapter(1));
        let events = state.dispatch(AppCommand::CloseChapter);
        assert_eq!(events, vec![AppEvent::ChapterClosed]);
        assert_eq!(
            state.mode,
            AppMode::Browsing {
                view: ViewKind::Chapters
            }
        );

        // Closing while already browsing changes nothing.
        assert!(state.dispatch(AppCommand::CloseChapter).is_empty());
    }

    #[test]
    fn view_switch_only_applies_while_browsing() {
        let mut state = AppState::new(3);
        let events = state.dispatch(AppCommand::SwitchView(ViewKind::Designs));
        assert_eq!(events, vec![AppEvent::ViewChanged(ViewKind::Designs)]);

        // Same view again is a no-op.
        assert!(
            state
                .dispatch(AppCommand::SwitchView(ViewKind::Designs))
                .is_empty()
        );

        state.dispatch(AppCommand::OpenChapter(0));
        assert!(
            state
                .dispatch(AppCommand::SwitchView(ViewKind::Chapters))
                .is_empty()
        );
    }

    #[test]
    fn status_line_set_and_clear() {
        let mut state = AppState::new(1);
        let events = state.dispatch(AppCommand::SetStatus("archive loaded".to_owned()));
        assert_eq!(
            events,
            vec![AppEvent::StatusUpdated("archive loaded".to_owned())]
        );
        assert_eq!(state.status_line.as_deref(), Some("archive loaded"));

        let events = state.dispatch(AppCommand::ClearStatus);
        assert_eq!(events, vec![AppEvent::StatusCleared]);
        assert_eq!(state.status_line, None);
    }

    #[test]
    fn empty_archive_never_opens() {
        let mut state = AppState::new(0);
        assert!(state.dispatch(AppCommand::MoveBy(1)).is_empty());
        assert_eq!(state.open_display_index(), None);
    }
}
