//! Résumé section extractor. Splits free-text résumés into summary, experience,
//! skills and education using line-anchored heading recognition.
//!
//! Each section is resolved independently against the whole document:
//! 1. Try the section's recognizers in order (markdown `# Label`, then plain `Label:`).
//!    The first recognizer with any match wins; its earliest occurrence is used.
//! 2. The body runs from the end of the matched heading to the start of the next
//!    line that looks like any heading (`#… word` or `word:`), or to end of document.
//! 3. The body is trimmed. A heading with nothing under it yields `Some("")`.
//!
//! Two sections may open at the same line if their labels overlap; no
//! mutual exclusion is applied.

use std::cmp::Reverse;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// The four résumé sections the extractor knows about, in resolution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResumeSection {
    Summary,
    Experience,
    Skills,
    Education,
}

impl ResumeSection {
    pub const ALL: [ResumeSection; 4] = [
        ResumeSection::Summary,
        ResumeSection::Experience,
        ResumeSection::Skills,
        ResumeSection::Education,
    ];

    /// Accepted heading labels, matched case-insensitively as whole words.
    pub fn synonyms(self) -> &'static [&'static str] {
        match self {
            ResumeSection::Summary => &[
                "summary",
                "professional summary",
                "objective",
                "about",
                "profile",
            ],
            ResumeSection::Experience => &[
                "experience",
                "work experience",
                "professional experience",
                "employment",
                "employment history",
                "work history",
            ],
            ResumeSection::Skills => &[
                "skills",
                "technical skills",
                "core competencies",
                "competencies",
                "technologies",
            ],
            ResumeSection::Education => &[
                "education",
                "academic background",
                "academics",
            ],
        }
    }
}

/// Extracted sections. `None` means no heading was recognized; `Some("")` means
/// the heading exists but has no body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionMap {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<String>,
}

impl SectionMap {
    pub fn get(&self, section: ResumeSection) -> Option<&str> {
        match section {
            ResumeSection::Summary => self.summary.as_deref(),
            ResumeSection::Experience => self.experience.as_deref(),
            ResumeSection::Skills => self.skills.as_deref(),
            ResumeSection::Education => self.education.as_deref(),
        }
    }

    fn slot_mut(&mut self, section: ResumeSection) -> &mut Option<String> {
        match section {
            ResumeSection::Summary => &mut self.summary,
            ResumeSection::Experience => &mut self.experience,
            ResumeSection::Skills => &mut self.skills,
            ResumeSection::Education => &mut self.education,
        }
    }

    /// Sections that were recognized, in resolution order.
    pub fn found(&self) -> Vec<ResumeSection> {
        ResumeSection::ALL
            .into_iter()
            .filter(|s| self.get(*s).is_some())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.found().is_empty()
    }
}

struct SectionRecognizers {
    section: ResumeSection,
    /// Tried in order; the first one that matches anywhere wins.
    patterns: [Regex; 2],
}

static RECOGNIZERS: Lazy<Vec<SectionRecognizers>> = Lazy::new(|| {
    ResumeSection::ALL
        .into_iter()
        .map(|section| {
            // Alternation is leftmost-first, so longer labels must come first
            // or "employment" would shadow "employment history".
            let mut synonyms = section.synonyms().to_vec();
            synonyms.sort_by_key(|s| Reverse(s.len()));
            let labels = synonyms
                .iter()
                .map(|s| regex::escape(s))
                .collect::<Vec<_>>()
                .join("|");
            SectionRecognizers {
                section,
                patterns: [
                    heading_regex(&format!(r"(?im)^#+[ \t]*(?:{labels})\b")),
                    heading_regex(&format!(r"(?im)^(?:{labels}):")),
                ],
            }
        })
        .collect()
});

/// Generic "a new section starts here" test, used to find where a body ends.
static NEXT_HEADING: Lazy<Regex> = Lazy::new(|| heading_regex(r"(?m)^(?:#+[ \t]*\w|\w+:)"));

fn heading_regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("section heading patterns are static and valid")
}

/// Partitions `content` into the four known sections. Pure and infallible.
pub fn extract_sections(content: &str) -> SectionMap {
    let mut sections = SectionMap::default();

    for recognizers in RECOGNIZERS.iter() {
        let Some(heading) = recognizers
            .patterns
            .iter()
            .find_map(|pattern| pattern.find(content))
        else {
            continue;
        };

        let body_start = heading.end();
        // `find_at` keeps `^` tied to real line starts, so a heading's own line
        // never terminates its body.
        let body_end = NEXT_HEADING
            .find_at(content, body_start)
            .map_or(content.len(), |next| next.start());

        *sections.slot_mut(recognizers.section) =
            Some(content[body_start..body_end].trim().to_string());
    }

    sections
}
