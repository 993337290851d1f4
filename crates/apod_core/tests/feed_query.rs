use apod_core::{
    parse_feed, select_window, ApodEntry, DateRangeNormalizer, DateWindow, Explorer, FeedError,
    FeedResult, FeedSource, FixedClock, MediaType, NormalizerConfig, QueryOutcome,
    StaticFeedSource, MAX_GALLERY_ITEMS,
};
use chrono::{Days, NaiveDate};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn entry(date: &str) -> ApodEntry {
    ApodEntry {
        date: date.to_string(),
        title: format!("Sky on {date}"),
        explanation: String::new(),
        url: format!("https://apod.example/{date}.jpg"),
        hdurl: None,
        media_type: MediaType::Image,
        thumbnail_url: None,
        copyright: None,
    }
}

fn daily_entries(from: NaiveDate, count: u64) -> Vec<ApodEntry> {
    (0..count)
        .map(|offset| {
            let day = from.checked_add_days(Days::new(offset)).unwrap();
            entry(&day.format("%Y-%m-%d").to_string())
        })
        .collect()
}

fn explorer(entries: Vec<ApodEntry>) -> Explorer<StaticFeedSource, FixedClock> {
    let normalizer = DateRangeNormalizer::with_clock(
        NormalizerConfig::default(),
        FixedClock::new(date(2026, 1, 1), 0),
    );
    Explorer::new(normalizer, StaticFeedSource::new(entries))
}

struct BrokenFeed;

impl FeedSource for BrokenFeed {
    fn fetch_all(&self) -> FeedResult<Vec<ApodEntry>> {
        Err(FeedError::Status {
            status: 503,
            body: "Service Unavailable".to_string(),
        })
    }
}

#[test]
fn parse_feed_reads_fields_and_ignores_unknown_ones() {
    let json = r#"[
        {"date":"2025-10-01","title":"Comet","explanation":"Tail","url":"https://a/x.jpg",
         "hdurl":"https://a/x_hd.jpg","media_type":"image","service_version":"v1"},
        {"date":"2025-10-02","title":"Launch","url":"https://www.youtube.com/embed/abcdefghijk",
         "media_type":"video","thumbnail_url":"https://a/thumb.jpg"},
        {"date":"2025-10-03","title":"Mystery","url":"https://a/m","media_type":"other"}
    ]"#;

    let entries = parse_feed(json).unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].hdurl.as_deref(), Some("https://a/x_hd.jpg"));
    assert_eq!(entries[1].media_type, MediaType::Video);
    assert_eq!(entries[1].explanation, "");
    assert_eq!(entries[2].media_type, MediaType::Other);
}

#[test]
fn parse_feed_skips_records_without_date() {
    let json = r#"[
        {"date":"2025-10-01","title":"Comet","url":"https://a/x.jpg"},
        {"title":"No date","url":"https://a/u2.jpg"},
        {"date":42,"title":"Numeric date"}
    ]"#;

    let entries = parse_feed(json).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].date, "2025-10-01");
}

#[test]
fn parse_feed_reads_null_text_fields_as_empty() {
    let json = r#"[{"date":"2025-10-01","title":null,"explanation":null,"url":"https://a/u.jpg","hdurl":null}]"#;

    let entries = parse_feed(json).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].title, "");
    assert_eq!(entries[0].display_title(), "Astronomy Picture of the Day");
    assert_eq!(entries[0].explanation, "");
    assert_eq!(entries[0].hdurl, None);
}

#[test]
fn parse_feed_rejects_non_array_document() {
    assert!(matches!(
        parse_feed(r#"{"date":"2025-10-01"}"#),
        Err(FeedError::Decode(_))
    ));
}

#[test]
fn select_window_filters_sorts_and_caps() {
    let window = DateWindow::new(date(2025, 9, 24), date(2025, 10, 2));
    let mut entries = daily_entries(date(2025, 9, 20), 20);
    entries.push(entry("not-a-date"));
    entries.reverse();

    let selected = select_window(entries, &window);

    assert_eq!(selected.len(), MAX_GALLERY_ITEMS);
    assert_eq!(selected.first().unwrap().date, "2025-10-02");
    assert_eq!(selected.last().unwrap().date, "2025-09-24");
    for pair in selected.windows(2) {
        assert!(pair[0].date > pair[1].date);
    }
}

#[test]
fn select_window_caps_wide_windows_to_newest_entries() {
    let window = DateWindow::new(date(2025, 1, 1), date(2025, 12, 31));
    let selected = select_window(daily_entries(date(2025, 3, 1), 30), &window);

    assert_eq!(selected.len(), MAX_GALLERY_ITEMS);
    assert_eq!(selected[0].date, "2025-03-30");
}

#[test]
fn query_without_dates_uses_default_window() {
    let explorer = explorer(daily_entries(date(2025, 9, 1), 60));

    let outcome = explorer.query(None, None).unwrap();
    assert_eq!(
        outcome.window(),
        DateWindow::new(date(2025, 9, 24), date(2025, 10, 2))
    );
    assert_eq!(outcome.entries().len(), 9);
    assert_eq!(outcome.status_line(), "Successfully loaded 9 space image(s).");
}

#[test]
fn query_with_no_matching_entries_reports_empty_gallery() {
    let explorer = explorer(daily_entries(date(2021, 1, 1), 3));

    let outcome = explorer.query(Some(date(2024, 5, 1)), None).unwrap();
    assert!(matches!(outcome, QueryOutcome::Applied { ref entries, .. } if entries.is_empty()));
    assert_eq!(
        outcome.status_line(),
        "No APOD data available for the selected date range."
    );
}

#[test]
fn superseded_query_does_not_apply() {
    let explorer = explorer(daily_entries(date(2025, 9, 1), 60));

    let older = explorer.begin_query(Some(date(2025, 9, 1)), None);
    let newer = explorer.begin_query(Some(date(2025, 9, 10)), None);
    assert_eq!(
        older.status_line(),
        "Fetching space images from 2025-09-01 to 2025-09-09…"
    );

    let stale = explorer.run(older).unwrap();
    assert_eq!(stale, QueryOutcome::Superseded { window: older.window });
    assert!(stale.entries().is_empty());

    let fresh = explorer.run(newer).unwrap();
    assert_eq!(fresh.entries().len(), 9);
    assert_eq!(fresh.entries()[0].date, "2025-09-18");
}

#[test]
fn feed_errors_propagate_unchanged() {
    let normalizer = DateRangeNormalizer::with_clock(
        NormalizerConfig::default(),
        FixedClock::new(date(2026, 1, 1), 0),
    );
    let explorer = Explorer::new(normalizer, BrokenFeed);

    let err = explorer.query(None, None).unwrap_err();
    assert_eq!(
        err.to_string(),
        "APOD data fetch failed (503): Service Unavailable"
    );
}
