use crate::{Markdown, NO_SESSIONS};
use nightshift_aggregate::Story;

impl Markdown for Story {
    fn to_markdown(&self) -> String {
        let mut out = String::from("# The Story So Far\n");
        if self.chapters.is_empty() {
            out.push('\n');
            out.push_str(NO_SESSIONS);
            out.push('\n');
            return out;
        }
        for chapter in &self.chapters {
            out.push_str(&format!("\n## {}\n\n", chapter.title()));
            let (first, last) = (chapter.sessions.first(), chapter.sessions.last());
            let span = match (first, last) {
                (Some(f), Some(l)) if f != l => format!("Sessions {f}\u{2013}{l}"),
                (Some(f), _) => format!("Session {f}"),
                _ => String::new(),
            };
            let dates = match (chapter.first_date.as_str(), chapter.last_date.as_str()) {
                ("", "") => String::new(),
                (f, l) if f == l || l.is_empty() => format!(", {f}"),
                (f, l) => format!(", {f} to {l}"),
            };
            out.push_str(&format!("_{span}{dates}. {} PRs._\n", chapter.pr_count));
            if !chapter.highlights.is_empty() {
                out.push('\n');
                for h in &chapter.highlights {
                    out.push_str(&format!("- {h}\n"));
                }
            }
        }
        out
    }
}
