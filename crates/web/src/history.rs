//! View model for the history page.
//!
//! Records arrive most-recent-first from the repository and are split into
//! fixed-size pages. Each card carries everything its detail modal shows, so
//! the browser never has to parse a result payload itself.

use std::ops::Range;

use {
    chrono::{DateTime, NaiveDateTime},
    lintel_analysis::{AnalysisRecord, Issue, Severity},
};

pub const PAGE_SIZE: usize = 10;

// ── Pagination ───────────────────────────────────────────────────────────────

/// Position of one page within the full record list. Pages are 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub current: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLink {
    pub number: usize,
    pub current: bool,
}

impl Pagination {
    /// `requested` is clamped into `1..=total_pages`.
    pub fn new(total_items: usize, requested: usize) -> Self {
        let total_pages = total_items.div_ceil(PAGE_SIZE);
        Self {
            current: requested.clamp(1, total_pages.max(1)),
            total_pages,
            total_items,
        }
    }

    /// Indices into the full list covered by the current page.
    pub fn range(&self) -> Range<usize> {
        let start = (self.current - 1) * PAGE_SIZE;
        let end = (start + PAGE_SIZE).min(self.total_items);
        start.min(end)..end
    }

    /// 1-based position of the first item on this page, for display.
    pub fn first_item(&self) -> usize {
        let range = self.range();
        if range.is_empty() {
            0
        } else {
            range.start + 1
        }
    }

    pub fn last_item(&self) -> usize {
        self.range().end
    }

    pub fn previous_disabled(&self) -> bool {
        self.current <= 1
    }

    pub fn next_disabled(&self) -> bool {
        self.current >= self.total_pages
    }

    pub fn previous_page(&self) -> usize {
        self.current.saturating_sub(1).max(1)
    }

    pub fn next_page(&self) -> usize {
        (self.current + 1).min(self.total_pages.max(1))
    }

    /// Controls are only rendered when there is more than one page.
    pub fn is_visible(&self) -> bool {
        self.total_pages > 1
    }

    pub fn links(&self) -> Vec<PageLink> {
        (1..=self.total_pages)
            .map(|number| PageLink {
                number,
                current: number == self.current,
            })
            .collect()
    }
}

// ── Severity tone ────────────────────────────────────────────────────────────

/// Display color for an issue severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Red,
    Yellow,
    Blue,
    Gray,
}

impl Tone {
    pub fn for_severity(severity: &Severity) -> Self {
        match severity {
            Severity::Error => Self::Red,
            Severity::Warning => Self::Yellow,
            Severity::Info => Self::Blue,
            Severity::Other(_) => Self::Gray,
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Self::Red => "tone-red",
            Self::Yellow => "tone-yellow",
            Self::Blue => "tone-blue",
            Self::Gray => "tone-gray",
        }
    }
}

// ── Cards and details ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueView {
    pub line: i64,
    pub message: String,
    /// Label as stored, including ones without a dedicated tone.
    pub severity: String,
    pub tone_class: &'static str,
}

impl From<&Issue> for IssueView {
    fn from(issue: &Issue) -> Self {
        Self {
            line: issue.line,
            message: issue.message.clone(),
            severity: issue.severity.as_str().to_owned(),
            tone_class: Tone::for_severity(&issue.severity).css_class(),
        }
    }
}

/// One record as shown in the grid, plus the content of its detail modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub id: i64,
    pub file_path: String,
    pub created_at: String,
    /// ISO-8601 form of `created_at` for `<time datetime>`; empty when the
    /// stored value could not be parsed.
    pub created_at_iso: String,
    pub line_count: i64,
    pub function_count: usize,
    pub import_count: usize,
    pub issue_label: String,
    pub error_badge: Option<String>,
    pub functions: Vec<String>,
    pub imports: Vec<String>,
    pub issues: Vec<IssueView>,
}

impl CardView {
    pub fn from_record(record: &AnalysisRecord) -> Self {
        let result = record.parsed_result();
        let errors = result.error_count();
        let (created_at, created_at_iso) = format_timestamp(&record.created_at);
        Self {
            id: record.id,
            file_path: record.file_path.clone(),
            created_at,
            created_at_iso,
            line_count: result.line_count,
            function_count: result.functions.len(),
            import_count: result.imports.len(),
            issue_label: pluralize(result.issues.len(), "issue"),
            error_badge: (errors > 0).then(|| pluralize(errors, "error")),
            issues: result.issues.iter().map(IssueView::from).collect(),
            functions: result.functions,
            imports: result.imports,
        }
    }
}

/// `1 issue`, `0 issues`, `3 errors`.
pub fn pluralize(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// Human-readable and ISO forms of a stored `createdAt` value.
///
/// The store writes `YYYY-MM-DD HH:MM:SS` in UTC; RFC 3339 is accepted too.
/// Anything else is shown verbatim.
pub fn format_timestamp(raw: &str) -> (String, String) {
    const DISPLAY: &str = "%b %-d, %Y, %-I:%M:%S %p UTC";

    let parsed = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_utc()));

    match parsed {
        Some(dt) => (
            dt.format(DISPLAY).to_string(),
            dt.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        ),
        None => (raw.to_owned(), String::new()),
    }
}

// ── Whole view ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub pagination: Pagination,
    pub cards: Vec<CardView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryView {
    Empty,
    Populated {
        /// Page shown first; the other pages are rendered hidden.
        current: usize,
        pages: Vec<PageView>,
    },
}

impl HistoryView {
    pub fn build(records: &[AnalysisRecord], requested_page: usize) -> Self {
        if records.is_empty() {
            return Self::Empty;
        }

        let first = Pagination::new(records.len(), requested_page);
        let pages = (1..=first.total_pages)
            .map(|number| {
                let pagination = Pagination::new(records.len(), number);
                let cards = records[pagination.range()]
                    .iter()
                    .map(CardView::from_record)
                    .collect();
                PageView { pagination, cards }
            })
            .collect();

        Self::Populated {
            current: first.current,
            pages,
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest};

    fn record(id: i64, result: &str) -> AnalysisRecord {
        AnalysisRecord {
            id,
            file_path: format!("src/file{id}.ts"),
            result: result.to_owned(),
            created_at: "2026-10-16 14:05:09".to_owned(),
        }
    }

    fn records(n: i64) -> Vec<AnalysisRecord> {
        (1..=n).rev().map(|id| record(id, "{}")).collect()
    }

    #[test]
    fn twenty_three_records_make_three_pages() {
        let p1 = Pagination::new(23, 1);
        let p2 = Pagination::new(23, 2);
        let p3 = Pagination::new(23, 3);
        assert_eq!(p1.total_pages, 3);
        assert_eq!(p1.range().len(), 10);
        assert_eq!(p2.range().len(), 10);
        assert_eq!(p3.range(), 20..23);

        assert!(p1.previous_disabled());
        assert!(!p1.next_disabled());
        assert!(!p2.previous_disabled());
        assert!(!p2.next_disabled());
        assert!(p3.next_disabled());
        assert!(!p3.previous_disabled());
        assert_eq!((p3.first_item(), p3.last_item()), (21, 23));
        assert_eq!(Pagination::new(0, 1).first_item(), 0);
    }

    #[rstest]
    #[case(0, 0)]
    #[case(1, 1)]
    #[case(10, 1)]
    #[case(11, 2)]
    #[case(100, 10)]
    #[case(101, 11)]
    fn total_pages_is_ceiling(#[case] total: usize, #[case] pages: usize) {
        assert_eq!(Pagination::new(total, 1).total_pages, pages);
    }

    #[rstest]
    #[case(0, 1)]
    #[case(4, 3)]
    #[case(usize::MAX, 3)]
    fn out_of_range_pages_are_clamped(#[case] requested: usize, #[case] expected: usize) {
        assert_eq!(Pagination::new(23, requested).current, expected);
    }

    #[test]
    fn single_page_hides_controls() {
        let p = Pagination::new(7, 1);
        assert!(!p.is_visible());
        assert!(p.previous_disabled());
        assert!(p.next_disabled());
        assert_eq!(p.range(), 0..7);
    }

    #[test]
    fn links_mark_the_current_page() {
        let links = Pagination::new(23, 2).links();
        let numbers: Vec<usize> = links.iter().map(|l| l.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(
            links.iter().filter(|l| l.current).map(|l| l.number).collect::<Vec<_>>(),
            vec![2]
        );
        assert_eq!(Pagination::new(23, 2).previous_page(), 1);
        assert_eq!(Pagination::new(23, 2).next_page(), 3);
        assert_eq!(Pagination::new(23, 3).next_page(), 3);
    }

    #[rstest]
    #[case(Severity::Error, "tone-red")]
    #[case(Severity::Warning, "tone-yellow")]
    #[case(Severity::Info, "tone-blue")]
    #[case(Severity::Other("critical".into()), "tone-gray")]
    fn severity_maps_to_tone(#[case] severity: Severity, #[case] class: &str) {
        assert_eq!(Tone::for_severity(&severity).css_class(), class);
    }

    #[test]
    fn pluralization() {
        assert_eq!(pluralize(0, "issue"), "0 issues");
        assert_eq!(pluralize(1, "issue"), "1 issue");
        assert_eq!(pluralize(2, "error"), "2 errors");
    }

    #[test]
    fn card_summarizes_result() {
        let raw = r#"{"lineCount":120,"functions":["a","b","c"],"imports":["x"],
            "issues":[
                {"line":1,"message":"bad","severity":"error"},
                {"line":2,"message":"meh","severity":"warning"},
                {"line":3,"message":"worse","severity":"error"},
                {"line":4,"message":"odd","severity":"fatal"}
            ]}"#;
        let card = CardView::from_record(&record(5, raw));
        assert_eq!(card.line_count, 120);
        assert_eq!(card.function_count, 3);
        assert_eq!(card.import_count, 1);
        assert_eq!(card.issue_label, "4 issues");
        assert_eq!(card.error_badge.as_deref(), Some("2 errors"));
        assert_eq!(card.issues[1].tone_class, "tone-yellow");
        assert_eq!(card.issues[3].severity, "fatal");
        assert_eq!(card.issues[3].tone_class, "tone-gray");
    }

    #[test]
    fn negative_issue_line_keeps_the_rest_of_the_card() {
        let raw = r#"{"lineCount":120,"functions":["main","helper"],"imports":["fs"],
            "issues":[{"line":-1,"message":"file header","severity":"error"}]}"#;
        let card = CardView::from_record(&record(2, raw));
        assert_eq!(card.line_count, 120);
        assert_eq!(card.functions, vec!["main", "helper"]);
        assert_eq!(card.imports, vec!["fs"]);
        assert_eq!(card.issues.len(), 1);
        assert_eq!(card.issues[0].line, -1);
        assert_eq!(card.error_badge.as_deref(), Some("1 error"));
    }

    #[test]
    fn single_error_badge_is_singular() {
        let raw = r#"{"lineCount":1,"functions":[],"imports":[],
            "issues":[{"line":1,"message":"bad","severity":"error"}]}"#;
        let card = CardView::from_record(&record(1, raw));
        assert_eq!(card.error_badge.as_deref(), Some("1 error"));
        assert_eq!(card.issue_label, "1 issue");
    }

    #[rstest]
    #[case("{not json")]
    #[case("")]
    #[case("null")]
    #[case(r#"{"lineCount":"many"}"#)]
    fn malformed_result_renders_as_empty(#[case] raw: &str) {
        let card = CardView::from_record(&record(9, raw));
        assert_eq!(card.line_count, 0);
        assert_eq!(card.function_count, 0);
        assert_eq!(card.import_count, 0);
        assert!(card.issues.is_empty());
        assert!(card.functions.is_empty());
        assert!(card.imports.is_empty());
        assert_eq!(card.issue_label, "0 issues");
        assert_eq!(card.error_badge, None);
    }

    #[test]
    fn timestamps_are_formatted() {
        let (display, iso) = format_timestamp("2026-10-16 14:05:09");
        assert_eq!(display, "Oct 16, 2026, 2:05:09 PM UTC");
        assert_eq!(iso, "2026-10-16T14:05:09Z");

        let (display, iso) = format_timestamp("2026-01-02T03:04:05+02:00");
        assert_eq!(display, "Jan 2, 2026, 1:04:05 AM UTC");
        assert_eq!(iso, "2026-01-02T01:04:05Z");

        let (display, iso) = format_timestamp("yesterday");
        assert_eq!(display, "yesterday");
        assert!(iso.is_empty());
    }

    #[test]
    fn empty_store_is_empty_view() {
        assert_eq!(HistoryView::build(&[], 1), HistoryView::Empty);
    }

    #[test]
    fn populated_view_splits_every_page() {
        let all = records(23);
        let HistoryView::Populated { current, pages } = HistoryView::build(&all, 9) else {
            panic!("expected populated view");
        };
        assert_eq!(current, 3);
        let sizes: Vec<usize> = pages.iter().map(|p| p.cards.len()).collect();
        assert_eq!(sizes, vec![10, 10, 3]);
        // Most recent first is preserved across pages.
        assert_eq!(pages[0].cards[0].id, 23);
        assert_eq!(pages[1].cards[0].id, 13);
        assert_eq!(pages[2].cards[2].id, 1);
        assert_eq!(pages[2].pagination.current, 3);
    }
}
