//! Group the history into themed chapters.

use crate::series::sorted;
use crate::themes::{dominant_theme, Theme};
use nightshift_core::{JsonReport, SessionRecord};
use serde::{Deserialize, Serialize};

/// Tasks quoted per chapter.
pub const MAX_HIGHLIGHTS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    /// 1-based.
    pub index: usize,
    /// `None` when no session in the chapter mentions a known theme.
    pub theme: Option<Theme>,
    pub sessions: Vec<u32>,
    pub first_date: String,
    pub last_date: String,
    pub pr_count: usize,
    pub highlights: Vec<String>,
}

impl Chapter {
    pub fn title(&self) -> String {
        match self.theme {
            Some(theme) => format!("Chapter {}: {}", self.index, theme.title()),
            None => format!("Chapter {}: Beginnings", self.index),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub chapters: Vec<Chapter>,
}

impl JsonReport for Story {}

fn session_theme(r: &SessionRecord) -> Option<Theme> {
    dominant_theme(std::iter::once(r.title.as_str()).chain(r.tasks.iter().map(String::as_str)))
}

/// Consecutive sessions sharing a dominant theme form one chapter.
///
/// A session with no recognizable theme stays in the current chapter.
pub fn build_story(records: &[SessionRecord]) -> Story {
    let mut chapters: Vec<Chapter> = Vec::new();
    for r in sorted(records) {
        let theme = session_theme(r);
        let starts_new = match chapters.last() {
            None => true,
            Some(current) => theme.is_some() && current.theme.is_some() && theme != current.theme,
        };
        if starts_new {
            chapters.push(Chapter {
                index: chapters.len() + 1,
                theme,
                sessions: Vec::new(),
                first_date: r.date.clone(),
                last_date: r.date.clone(),
                pr_count: 0,
                highlights: Vec::new(),
            });
        }
        let Some(current) = chapters.last_mut() else {
            continue;
        };
        if current.theme.is_none() {
            current.theme = theme;
        }
        current.sessions.push(r.number);
        if !r.date.is_empty() {
            if current.first_date.is_empty() {
                current.first_date = r.date.clone();
            }
            current.last_date = r.date.clone();
        }
        current.pr_count += r.pr_count();
        for task in &r.tasks {
            if current.highlights.len() < MAX_HIGHLIGHTS {
                current.highlights.push(task.clone());
            }
        }
    }
    Story { chapters }
}
