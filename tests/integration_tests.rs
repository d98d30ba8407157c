use deposit_rater::output::{export_xlsx, render_summary};
use deposit_rater::{
    ColumnConfig, Outcome, ProcessError, ReadError, Session, Upload, aggregate, read_table,
};
use rust_decimal_macros::dec;
use rust_xlsxwriter::Workbook;

/// Builds an xlsx upload whose first sheet holds `header` and `rows`.
/// Numeric-looking strings are written as numbers.
fn xlsx_upload(header: &[&str], rows: &[&[&str]]) -> Upload {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, name) in header.iter().enumerate() {
        sheet.write_string(0, col as u16, *name).unwrap();
    }
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            let (r, c) = (r as u32 + 1, c as u16);
            match value.parse::<f64>() {
                Ok(n) => sheet.write_number(r, c, n).unwrap(),
                Err(_) => sheet.write_string(r, c, *value).unwrap(),
            };
        }
    }
    Upload::new("depositos.xlsx", workbook.save_to_buffer().unwrap())
}

#[test]
fn test_full_pipeline_from_csv_fixture() {
    let bytes = include_bytes!("fixtures/depositos.csv");
    let table = read_table(&Upload::new("depositos.csv", bytes.to_vec())).expect("Failed to read fixture");
    let result = aggregate(&table, &ColumnConfig::default()).expect("Failed to aggregate");

    assert_eq!(result.len(), 3);
    assert_eq!(result.get("Alice"), Some(dec!(30.02)));
    assert_eq!(result.get("Bob"), Some(dec!(100.02)));
    assert_eq!(result.get("Carla"), Some(dec!(-3.99)));
    assert_eq!(result.get("Dario"), None);
    assert_eq!(result.grand_total(), dec!(126.05));

    let stats = result.stats();
    assert_eq!(stats.rows_read, 9);
    assert_eq!(stats.rows_unparseable, 2);
    assert_eq!(stats.rows_counted, 5);
}

#[test]
fn test_xlsx_mixed_deposits() {
    let upload = xlsx_upload(
        &["Iniciador", "Depositar"],
        &[&["Alice", "10.01"], &["Alice", "5.02"], &["Bob", "100.01"]],
    );
    let mut session = Session::new(ColumnConfig::default());

    let Outcome::Matched(result) = session.process(&upload) else {
        panic!("expected matches");
    };
    assert_eq!(result.get("Alice"), Some(dec!(10.01)));
    assert_eq!(result.get("Bob"), Some(dec!(100.01)));
    assert_eq!(result.grand_total(), dec!(110.02));
}

#[test]
fn test_xlsx_unparseable_text_is_dropped() {
    let upload = xlsx_upload(
        &["Iniciador", "Depositar"],
        &[&["Alice", "n/a"], &["Alice", "20.01"]],
    );
    let mut session = Session::new(ColumnConfig::default());

    let Outcome::Matched(result) = session.process(&upload) else {
        panic!("expected matches");
    };
    assert_eq!(result.len(), 1);
    assert_eq!(result.get("Alice"), Some(dec!(20.01)));
}

#[test]
fn test_xlsx_lowercase_header_is_missing_column() {
    let upload = xlsx_upload(&["iniciador", "Depositar"], &[&["Alice", "10.01"]]);
    let mut session = Session::new(ColumnConfig::default());

    let Outcome::Failed(err) = session.process(&upload) else {
        panic!("expected failure");
    };
    let missing = err.missing_column().expect("missing column error");
    assert_eq!(missing.found, vec!["iniciador", "Depositar"]);
}

#[test]
fn test_xlsx_without_matches_is_empty_result() {
    let upload = xlsx_upload(
        &["Iniciador", "Depositar"],
        &[&["Alice", "10"], &["Bob", "10.02"], &["Bob", "10.1"]],
    );
    let mut session = Session::new(ColumnConfig::default());

    let Outcome::NoMatches(result) = session.process(&upload) else {
        panic!("expected an empty result");
    };
    assert!(result.is_empty());
    assert_eq!(result.grand_total(), dec!(0));
}

#[test]
fn test_corrupt_file_never_reaches_aggregation() {
    let mut session = Session::new(ColumnConfig::default());
    let outcome = session.process(&Upload::new("depositos.xls", b"\x00\x01garbage".to_vec()));

    assert!(matches!(outcome, Outcome::Failed(ProcessError::Read(_))));
}

#[test]
fn test_unsupported_extension_is_read_error() {
    let mut session = Session::new(ColumnConfig::default());
    let outcome = session.process(&Upload::new("depositos.ods", vec![]));

    assert!(matches!(
        outcome,
        Outcome::Failed(ProcessError::Read(ReadError::Unsupported { .. }))
    ));
}

#[test]
fn test_export_contains_every_initiator() {
    let upload = xlsx_upload(
        &["Iniciador", "Depositar"],
        &[&["Bob", "100.01"], &["Alice", "10.01"]],
    );
    let mut session = Session::new(ColumnConfig::default());
    let outcome = session.process(&upload);
    let result = outcome.result().expect("result");

    let exported = read_table(&Upload::new(
        "Analisis_Depositos.xlsx",
        export_xlsx(result, "Iniciador").unwrap(),
    ))
    .unwrap();
    assert_eq!(exported.columns(), &["Iniciador", "Suma"]);
    assert_eq!(exported.len(), 2);

    let summary = render_summary(result);
    assert!(summary.contains("**Alice**"));
    assert!(summary.ends_with("**110.02**"));
}
