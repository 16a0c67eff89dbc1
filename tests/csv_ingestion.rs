use movie_refinery::error::{IngestionError, RowError};
use movie_refinery::ingestion::csv::{ingest_csv_from_path, ingest_csv_from_reader};
use movie_refinery::ingestion::ColumnMapping;
use movie_refinery::types::{RecordId, Value};

#[test]
fn ingest_csv_from_path_keeps_every_row() {
    let rows = ingest_csv_from_path("tests/fixtures/movies.csv", &ColumnMapping::default()).unwrap();

    assert_eq!(rows.len(), 8);

    let first = rows[0].as_ref().unwrap();
    assert_eq!(first.id, Some(RecordId::Text("tt01".to_string())));
    let reception = first.reception.as_ref().unwrap();
    assert_eq!(reception.score_a, Value::Float64(9.3));
    assert_eq!(reception.score_b, Value::Float64(8.1));
    assert_eq!(first.cast_names.as_deref(), Some(&["A1".to_string(), "A2".to_string()][..]));
    assert_eq!(first.extra.get("name"), Some(&serde_json::json!("Alpha")));
    assert_eq!(first.extra.get("year"), Some(&serde_json::json!("1994")));

    // Blank score cell and unparsable score cell survive ingestion; the row processor judges them.
    let gamma = rows[2].as_ref().unwrap();
    assert_eq!(gamma.reception.as_ref().unwrap().score_b, Value::Null);
    let delta = rows[3].as_ref().unwrap();
    assert_eq!(delta.reception.as_ref().unwrap().score_a, Value::Utf8("abc".to_string()));

    // Blank id cell.
    assert_eq!(rows[5].as_ref().unwrap().id, None);
}

#[test]
fn short_record_becomes_a_rejected_row() {
    let rows = ingest_csv_from_path("tests/fixtures/movies.csv", &ColumnMapping::default()).unwrap();

    let rejected = rows[7].as_ref().unwrap_err();
    assert_eq!(rejected.id, Some(RecordId::Text("tt08".to_string())));
    assert!(matches!(rejected.reason, RowError::UnexpectedFailure { .. }));
    assert!(rejected.reason.to_string().contains("has 3 field(s), expected 7"));
}

#[test]
fn short_record_without_id_cell_is_rejected_as_unknown() {
    let input = "score_a,score_b,cast,writer,id\n1.0,2.0\n";
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input.as_bytes());

    let rows = ingest_csv_from_reader(&mut rdr, &ColumnMapping::default()).unwrap();
    let rejected = rows[0].as_ref().unwrap_err();
    assert_eq!(rejected.id, None);
}

#[test]
fn ingest_csv_allows_reordered_columns() {
    let input = "writer,score_b,cast,id,score_a\nX,7.0,A,42,8.0\n";
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(input.as_bytes());

    let rows = ingest_csv_from_reader(&mut rdr, &ColumnMapping::default()).unwrap();
    let rec = rows[0].as_ref().unwrap();
    assert_eq!(rec.id, Some(RecordId::Text("42".to_string())));
    assert_eq!(rec.reception.as_ref().unwrap().score_a, Value::Float64(8.0));
    assert!(rec.extra.is_empty());
}

#[test]
fn ingest_csv_missing_required_column_errors() {
    let input = "id,score_a,score_b,cast\n1,8.0,7.0,A\n";
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(input.as_bytes());

    let err = ingest_csv_from_reader(&mut rdr, &ColumnMapping::default()).unwrap_err();
    match err {
        IngestionError::SchemaMismatch { message } => assert!(message.contains("writer")),
        other => panic!("expected SchemaMismatch, got: {other:?}"),
    }
}

#[test]
fn ingest_csv_with_custom_columns_and_no_score_b() {
    let columns = ColumnMapping {
        score_a: "imdb_rating".to_string(),
        score_b: None,
        cast: "cast_name".to_string(),
        writer: "writter_name".to_string(),
        ..ColumnMapping::default()
    };
    let rows = ingest_csv_from_path("tests/fixtures/movies_rated.csv", &columns).unwrap();

    assert_eq!(rows.len(), 4);
    let third = rows[2].as_ref().unwrap();
    assert_eq!(third.reception.as_ref().unwrap().score_b, Value::Null);
    assert_eq!(
        third.writer_names.as_deref(),
        Some(&["Y1".to_string(), "Y2".to_string()][..])
    );
    assert_eq!(third.extra.get("rank"), Some(&serde_json::json!("3")));
}

#[test]
fn ingest_csv_missing_file_is_an_io_error() {
    let err = ingest_csv_from_path("tests/fixtures/does_not_exist.csv", &ColumnMapping::default())
        .unwrap_err();
    assert!(matches!(err, IngestionError::Csv(_) | IngestionError::Io(_)));
}
