use chrono::NaiveDate;
use dockit_core::date::{extract_date, format_date, parse_date, strip_date, DateError};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

#[test]
fn extracts_exact_token_from_file_names() {
    let cases = [
        ("scan-2024-03-15.pdf", "2024-03-15"),
        ("2023-11-02 chase statement.pdf", "2023-11-02"),
        ("w2_2020-02-29_final", "2020-02-29"),
        ("prefix12024-03-15", "2024-03-15"),
    ];
    for (name, expected) in cases {
        let found = extract_date(name).unwrap_or_else(|| panic!("no date in {name}"));
        assert_eq!(format_date(found), expected, "for {name}");
    }
}

#[test]
fn returns_none_without_token() {
    for name in ["random.pdf", "2024-3-15.pdf", "20240315.pdf", "", "2024_03_15"] {
        assert_eq!(extract_date(name), None, "for {name:?}");
    }
}

#[test]
fn returns_none_for_impossible_dates() {
    for name in [
        "bill-2024-13-40.pdf",
        "2023-02-29-invoice",
        "2024-04-31",
        "2024-00-10",
    ] {
        assert_eq!(extract_date(name), None, "for {name:?}");
    }
}

#[test]
fn only_first_token_is_considered() {
    assert_eq!(extract_date("2024-13-40-and-2024-01-01"), None);
    assert_eq!(
        extract_date("2024-01-01-and-2024-13-40"),
        Some(date(2024, 1, 1))
    );
}

#[test]
fn parse_date_accepts_trimmed_valid_input() {
    assert_eq!(parse_date(" 2023-11-02 "), Ok(date(2023, 11, 2)));
    assert_eq!(parse_date("2024-02-29"), Ok(date(2024, 2, 29)));
}

#[test]
fn parse_date_rejects_bad_format_and_bad_values() {
    assert!(matches!(parse_date("2023/11/02"), Err(DateError::Format(_))));
    assert!(matches!(parse_date("2023-11-2"), Err(DateError::Format(_))));
    assert!(matches!(parse_date("on 2023-11-02"), Err(DateError::Format(_))));
    assert!(matches!(parse_date(""), Err(DateError::Format(_))));
    assert!(matches!(parse_date("2023-02-29"), Err(DateError::OutOfRange(_))));
    assert!(matches!(parse_date("2024-13-40"), Err(DateError::OutOfRange(_))));
}

#[test]
fn strip_date_trims_surrounding_separators() {
    let d = date(2024, 3, 15);
    assert_eq!(strip_date("scan-2024-03-15", d), "scan");
    assert_eq!(strip_date("2024-03-15_receipt", d), "receipt");
    assert_eq!(strip_date("chase-2024-03-15-statement", d), "chase statement");
    assert_eq!(strip_date("2024-03-15", d), "");
}

#[test]
fn only_ascii_digits_form_a_date_token() {
    // Arabic-Indic digits ahead of the real date must not shadow it.
    assert_eq!(
        extract_date("٢٠٢٤-٠٣-١٥ scan-2024-03-15.pdf"),
        Some(date(2024, 3, 15))
    );
    assert_eq!(extract_date("٢٠٢٤-٠٣-١٥.pdf"), None);
    assert!(matches!(parse_date("٢٠٢٤-٠٣-١٥"), Err(DateError::Format(_))));
}
