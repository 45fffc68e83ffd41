//! Record constructor for stored résumés.
//!
//! Identity and time are injected (`IdGenerator`, `Clock`) so construction is a
//! pure function of its arguments. `AppState` carries the production impls.

use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

use crate::resume::models::{ResumeDocument, ResumeFormat};
use crate::resume::sections::extract_sections;

pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> Uuid;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Random v4 identifiers.
pub struct UuidV4Ids;

impl IdGenerator for UuidV4Ids {
    fn next_id(&self) -> Uuid {
        Uuid::new_v4()
    }
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fixed-width RFC 3339 form with a `Z` suffix, so string order is time order.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Builds a record without derived sections.
pub fn create_record(
    name: impl Into<String>,
    content: impl Into<String>,
    format: ResumeFormat,
    ids: &dyn IdGenerator,
    clock: &dyn Clock,
) -> ResumeDocument {
    ResumeDocument {
        id: ids.next_id(),
        name: name.into(),
        content: content.into(),
        format,
        sections: None,
        created_at: format_timestamp(clock.now()),
    }
}

/// Builds a record and runs the section extractor once over its content.
pub fn create_record_with_sections(
    name: impl Into<String>,
    content: impl Into<String>,
    format: ResumeFormat,
    ids: &dyn IdGenerator,
    clock: &dyn Clock,
) -> ResumeDocument {
    let mut record = create_record(name, content, format, ids, clock);
    record.rederive_sections();
    record
}

impl ResumeDocument {
    /// Recomputes `sections` from the current `content`.
    pub fn rederive_sections(&mut self) {
        self.sections = Some(extract_sections(&self.content));
    }

    /// Swaps in edited content and re-derives sections.
    pub fn replace_content(&mut self, content: String) {
        self.content = content;
        self.rederive_sections();
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicU64, Ordering};

    use chrono::TimeZone;

    use super::*;

    /// Hands out `00000000-0000-0000-0000-00000000000N` in sequence, starting at 1.
    #[derive(Default)]
    pub struct SequentialIds {
        next: AtomicU64,
    }

    impl IdGenerator for SequentialIds {
        fn next_id(&self) -> Uuid {
            let n = self.next.fetch_add(1, Ordering::SeqCst) + 1;
            Uuid::from_u128(u128::from(n))
        }
    }

    pub struct FixedClock(pub DateTime<Utc>);

    impl FixedClock {
        pub fn at_test_epoch() -> Self {
            FixedClock(Utc.with_ymd_and_hms(2026, 10, 19, 9, 30, 0).unwrap())
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{FixedClock, SequentialIds};
    use super::*;

    #[test]
    fn test_create_record_uses_injected_id_and_clock() {
        let ids = SequentialIds::default();
        let clock = FixedClock::at_test_epoch();

        let record = create_record("cv.md", "# Summary\nHi", ResumeFormat::Markdown, &ids, &clock);

        assert_eq!(record.id, Uuid::from_u128(1));
        assert_eq!(record.name, "cv.md");
        assert_eq!(record.content, "# Summary\nHi");
        assert_eq!(record.format, ResumeFormat::Markdown);
        assert_eq!(record.created_at, "2026-10-19T09:30:00.000Z");
        assert!(record.sections.is_none());
    }

    #[test]
    fn test_each_record_gets_a_fresh_id() {
        let ids = SequentialIds::default();
        let clock = FixedClock::at_test_epoch();
        let a = create_record("a", "", ResumeFormat::Text, &ids, &clock);
        let b = create_record("b", "", ResumeFormat::Text, &ids, &clock);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_create_record_with_sections_extracts_once() {
        let ids = SequentialIds::default();
        let clock = FixedClock::at_test_epoch();

        let mut record = create_record_with_sections(
            "cv.txt",
            "Skills: Go, Rust\nEducation: BS CS",
            ResumeFormat::Text,
            &ids,
            &clock,
        );
        let sections = record.sections.clone().unwrap();
        assert_eq!(sections.skills.as_deref(), Some("Go, Rust"));
        assert_eq!(sections.education.as_deref(), Some("BS CS"));

        // Editing content directly does not refresh the derived view.
        record.content = "# Objective\nGrow.".to_string();
        assert_eq!(record.sections, Some(sections));

        record.rederive_sections();
        let refreshed = record.sections.unwrap();
        assert_eq!(refreshed.summary.as_deref(), Some("Grow."));
        assert_eq!(refreshed.skills, None);
    }

    #[test]
    fn test_replace_content_rederives() {
        let ids = SequentialIds::default();
        let clock = FixedClock::at_test_epoch();
        let mut record = create_record("cv", "nothing here", ResumeFormat::Text, &ids, &clock);

        record.replace_content("Experience: 10 years".to_string());

        assert_eq!(
            record.sections.unwrap().experience.as_deref(),
            Some("10 years")
        );
    }

    #[test]
    fn test_timestamps_sort_lexically() {
        let earlier = FixedClock::at_test_epoch().0;
        let later = earlier + chrono::Duration::milliseconds(1500);
        assert!(format_timestamp(earlier) < format_timestamp(later));
        assert_eq!(format_timestamp(later), "2026-10-19T09:30:01.500Z");
    }
}
