use hemis_bot::data::schema::SHEET_SCHEMA_V1;
use hemis_bot::data::search::RecordFilter;
use hemis_bot::data::snapshot::Snapshot;
use hemis_bot::data::summary::summarize;

const REQUIRED: &str = "faol mehnat shartnomasiga ega";

fn row(cells: &[(usize, &str)]) -> Vec<String> {
    let mut out = vec![String::new(); 35];
    for (idx, value) in cells {
        out[*idx] = value.to_string();
    }
    out
}

fn header() -> Vec<String> {
    vec!["header".to_string(); 35]
}

fn student(uid: &str, hemis: &str, name: &str, status: &str, jsh: &str) -> Vec<String> {
    row(&[
        (0, uid),
        (2, hemis),
        (3, name),
        (4, status),
        (5, jsh),
        (29, "Muhandis"),
        (30, "ABC MChJ"),
        (34, "2023-10-01"),
    ])
}

#[test]
fn search_matches_regardless_of_query_case() {
    let snapshot = Snapshot::new(vec![
        header(),
        student("u1", "12345", "Aliyev Ali", "faol", "30101"),
    ]);

    for query in ["aliyev", "ALIYEV", "AlIyEv", "liyev a"] {
        let results = RecordFilter::search(&snapshot, query, &SHEET_SCHEMA_V1, REQUIRED);
        assert_eq!(results.len(), 1, "query {query:?} should match once");
        assert_eq!(results[0].full_name, "Aliyev Ali");
    }
}

#[test]
fn search_matches_on_each_identifier_field() {
    let snapshot = Snapshot::new(vec![
        header(),
        student("UID-77", "H-555", "Karimov Karim", "nofaol", "JSH-901"),
    ]);

    for query in ["uid-77", "h-555", "karimov", "jsh-901"] {
        let results = RecordFilter::search(&snapshot, query, &SHEET_SCHEMA_V1, REQUIRED);
        assert_eq!(results.len(), 1, "query {query:?} should match");
    }

    let results = RecordFilter::search(&snapshot, "yo'q odam", &SHEET_SCHEMA_V1, REQUIRED);
    assert!(results.is_empty());
}

#[test]
fn empty_and_whitespace_queries_return_nothing() {
    let snapshot = Snapshot::new(vec![
        header(),
        student("u1", "1", "Aliyev Ali", "faol", "2"),
    ]);

    assert!(RecordFilter::search(&snapshot, "", &SHEET_SCHEMA_V1, REQUIRED).is_empty());
    assert!(RecordFilter::search(&snapshot, "   \t ", &SHEET_SCHEMA_V1, REQUIRED).is_empty());
}

#[test]
fn rows_with_no_identity_fields_are_skipped() {
    // Status and faculty filled, but name/ids all empty: unmatchable.
    let ghost = row(&[(4, "faol mehnat shartnomasiga ega"), (23, "Fizika")]);
    let snapshot = Snapshot::new(vec![header(), ghost]);

    let results = RecordFilter::search(&snapshot, "fizika", &SHEET_SCHEMA_V1, REQUIRED);
    assert!(results.is_empty());
}

#[test]
fn header_row_is_never_searched() {
    let mut h = header();
    h[3] = "Aliyev".to_string();
    let snapshot = Snapshot::new(vec![h]);

    assert!(RecordFilter::search(&snapshot, "aliyev", &SHEET_SCHEMA_V1, REQUIRED).is_empty());
}

#[test]
fn employment_fields_present_iff_status_is_active() {
    let snapshot = Snapshot::new(vec![
        header(),
        student("u1", "1", "Aliyev A", "Faol mehnat shartnomasiga ega", "11"),
        student("u2", "2", "Aliyev B", "nofaol", "22"),
    ]);

    let results = RecordFilter::search(&snapshot, "aliyev", &SHEET_SCHEMA_V1, REQUIRED);
    assert_eq!(results.len(), 2);
    assert!(results[0].employment.is_some());
    assert!(results[1].employment.is_none());
}

// Only the name/id fields are searched: the middle row mentions
// "Aliyev" in its organization cell but belongs to a different student,
// so the search finds the two real Aliyevs, both with an active
// contract and therefore with employment fields exposed.
#[test]
fn active_contract_scenario() {
    let karimov = row(&[
        (0, "u2"),
        (2, "1002"),
        (3, "Karimov Bobur"),
        (4, "nofaol"),
        (5, "22222"),
        (30, "Aliyev nomidagi maktab"),
    ]);
    let snapshot = Snapshot::new(vec![
        header(),
        student("u1", "1001", "Aliyev Alisher", "faol mehnat shartnomasiga ega", "11111"),
        karimov,
        student("u3", "1003", "Aliyev Davron", "faol mehnat shartnomasiga ega", "33333"),
    ]);

    let results = RecordFilter::search(&snapshot, "aliyev", &SHEET_SCHEMA_V1, REQUIRED);
    assert_eq!(results.len(), 2);
    for record in &results {
        let emp = record.employment.as_ref().expect("active record exposes employment");
        assert_eq!(emp.position, "Muhandis");
        assert_eq!(emp.organization, "ABC MChJ");
        assert_eq!(emp.contract_date, "2023-10-01");
    }

    let summary = summarize(&results, REQUIRED);
    assert_eq!(summary.total, 2);
    assert_eq!(summary.active, 2);
    assert_eq!(summary.percentage, 100.0);
}

#[test]
fn result_order_follows_snapshot_order() {
    let snapshot = Snapshot::new(vec![
        header(),
        student("u1", "1", "Aliyev Zafar", "faol", "1"),
        student("u2", "2", "Aliyev Anvar", "faol", "2"),
        student("u3", "3", "Aliyev Mirza", "faol", "3"),
    ]);

    let results = RecordFilter::search(&snapshot, "aliyev", &SHEET_SCHEMA_V1, REQUIRED);
    let names: Vec<&str> = results.iter().map(|r| r.full_name.as_str()).collect();
    assert_eq!(names, vec!["Aliyev Zafar", "Aliyev Anvar", "Aliyev Mirza"]);
}
