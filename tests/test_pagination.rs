use hemis_bot::data::record::Record;
use hemis_bot::state::pager::{page_bounds, Pager};
use hemis_bot::state::session::SessionState;

const REQUIRED: &str = "faol mehnat shartnomasiga ega";

fn record(n: usize) -> Record {
    Record {
        uid: format!("u{n}"),
        hemis_id: format!("{n}"),
        full_name: format!("Talaba {n}"),
        status: if n % 2 == 0 {
            "faol mehnat shartnomasiga ega".to_string()
        } else {
            "nofaol".to_string()
        },
        personal_number: format!("p{n}"),
        faculty: String::new(),
        specialization: String::new(),
        group: String::new(),
        employment: None,
    }
}

fn session_with(n: usize) -> SessionState {
    let mut session = SessionState::default();
    session.set_results("talaba".to_string(), (0..n).map(record).collect());
    session
}

#[test]
fn page_bounds_always_land_in_range() {
    for len in [0usize, 1, 6, 7, 8, 20, 100] {
        for page_size in [1usize, 3, 7, 50] {
            let expected_total = len.div_ceil(page_size).max(1);
            for requested in [-10i64, -1, 0, 1, 2, 3, 99, i64::MAX] {
                let (page, total) = page_bounds(len, page_size, requested);
                assert_eq!(total, expected_total);
                assert!(page >= 1 && page <= total,
                    "page {page} out of range for len={len} size={page_size} req={requested}");
            }
        }
    }
}

#[test]
fn twenty_records_page_size_seven_gives_three_pages() {
    let mut session = session_with(20);

    let view = Pager::render_page(&mut session, 1, 7, REQUIRED).unwrap();
    assert_eq!(view.total_pages, 3);
    assert_eq!(view.records.len(), 7);

    // Far-out-of-range request clamps to the last page with the 6
    // leftover records.
    let view = Pager::render_page(&mut session, 99, 7, REQUIRED).unwrap();
    assert_eq!(view.page, 3);
    assert_eq!(view.records.len(), 6);
    assert_eq!(session.current_page, 3);
}

#[test]
fn zero_and_negative_requests_clamp_to_first_page() {
    let mut session = session_with(20);

    for requested in [0i64, -1, -99] {
        let view = Pager::render_page(&mut session, requested, 7, REQUIRED).unwrap();
        assert_eq!(view.page, 1);
        assert_eq!(session.current_page, 1);
    }
}

#[test]
fn pages_partition_the_result_set_in_order() {
    let mut session = session_with(23);
    let page_size = 7;

    let total_pages = Pager::render_page(&mut session, 1, page_size, REQUIRED)
        .unwrap()
        .total_pages;

    let mut reassembled = Vec::new();
    for page in 1..=total_pages {
        let view = Pager::render_page(&mut session, page as i64, page_size, REQUIRED).unwrap();
        reassembled.extend(view.records);
    }

    let original = session.results.as_ref().unwrap();
    assert_eq!(&reassembled, original);
}

#[test]
fn summary_covers_the_whole_result_set_on_every_page() {
    let mut session = session_with(20);

    let first = Pager::render_page(&mut session, 1, 7, REQUIRED).unwrap();
    let last = Pager::render_page(&mut session, 3, 7, REQUIRED).unwrap();

    assert_eq!(first.summary, last.summary);
    assert_eq!(first.summary.total, 20);
    assert_eq!(first.summary.active, 10);
    assert_eq!(first.summary.percentage, 50.0);
}

#[test]
fn empty_result_set_still_has_one_page() {
    let mut session = session_with(0);

    let view = Pager::render_page(&mut session, 5, 7, REQUIRED).unwrap();
    assert_eq!(view.page, 1);
    assert_eq!(view.total_pages, 1);
    assert!(view.records.is_empty());
    assert_eq!(view.summary.total, 0);
    assert_eq!(view.summary.percentage, 0.0);
}

#[test]
fn no_search_yet_renders_nothing() {
    let mut session = SessionState::default();
    assert!(Pager::render_page(&mut session, 1, 7, REQUIRED).is_none());
}

#[test]
fn new_results_reset_the_cursor() {
    let mut session = session_with(20);
    Pager::render_page(&mut session, 3, 7, REQUIRED).unwrap();
    assert_eq!(session.current_page, 3);
    session.page_message_id = Some(42);

    session.set_results("boshqa".to_string(), (0..5).map(record).collect());
    assert_eq!(session.current_page, 1);
    assert_eq!(session.page_message_id, None);
    assert_eq!(session.last_query, "boshqa");
}
