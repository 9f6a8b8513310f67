//! Edge case tests for loading input files

use crate::common::{sample_data, CliTestRunner};
use quarterdiff::data::DataProcessor;
use quarterdiff::QuarterdiffError;
use std::fs;

#[test]
fn test_missing_input_file() {
    let runner = CliTestRunner::new().unwrap();
    let q2 = runner.fixture().create_csv("q2.csv", &sample_data::q2_data()).unwrap();
    let missing = runner.fixture().path("nope.csv");

    let error = runner.expect_failure(&["compare", missing.to_str().unwrap(), q2.to_str().unwrap()]);
    assert!(matches!(error, QuarterdiffError::InvalidInput { .. }));
    assert!(error.to_string().contains("File not found"));
}

#[test]
fn test_directory_as_input() {
    let runner = CliTestRunner::new().unwrap();
    let dir = runner.fixture().root().to_str().unwrap().to_string();

    let error = runner.expect_failure(&["headers", &dir]);
    assert!(error.to_string().contains("not a file"));
}

#[test]
fn test_unsupported_extension() {
    let runner = CliTestRunner::new().unwrap();
    let fixture = runner.fixture();
    let q1 = fixture.create_csv("q1.csv", &sample_data::q1_data()).unwrap();
    let workbook = fixture.create_csv_raw("q2.xlsx", "not really a workbook").unwrap();

    let error = runner.expect_failure(&["compare", q1.to_str().unwrap(), workbook.to_str().unwrap()]);
    assert!(error.to_string().contains("Unsupported file format"));
}

#[test]
fn test_invalid_format_flag() {
    let runner = CliTestRunner::new().unwrap();
    let fixture = runner.fixture();
    let q1 = fixture.create_csv("q1.csv", &sample_data::q1_data()).unwrap();

    let error = runner.expect_failure(&[
        "compare",
        q1.to_str().unwrap(),
        q1.to_str().unwrap(),
        "--format",
        "xml",
    ]);
    assert!(error.to_string().contains("Invalid output format"));
}

#[test]
fn test_lookup_error_surfaces_through_cli() {
    let runner = CliTestRunner::new().unwrap();
    let fixture = runner.fixture();
    let q1 = fixture
        .create_csv("q1.csv", &[vec!["Region", "Project"], vec!["North", "1001"]])
        .unwrap();
    let q2 = fixture.create_csv("q2.csv", &sample_data::q2_data()).unwrap();

    let error = runner.expect_failure(&[
        "compare",
        q1.to_str().unwrap(),
        q2.to_str().unwrap(),
        "--columns",
        "A",
    ]);
    assert!(matches!(error, QuarterdiffError::Lookup { .. }));
}

#[test]
fn test_invalid_config_file() {
    let runner = CliTestRunner::new().unwrap();
    let fixture = runner.fixture();
    let q1 = fixture.create_csv("q1.csv", &sample_data::q1_data()).unwrap();
    let config = fixture.create_csv_raw("bad.json", "{ not json").unwrap();

    let error = runner.expect_failure(&[
        "compare",
        q1.to_str().unwrap(),
        q1.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
    ]);
    assert!(matches!(error, QuarterdiffError::Config { .. }));
}

#[test]
fn test_csv_with_malformed_quotes() {
    let runner = CliTestRunner::new().unwrap();

    let malformed_csv = r#"id,name,description
1,"Project A","Good project"
2,"Project B,"Missing closing quote
3,Project C,"Normal project"
"#;

    let csv_path = runner.fixture().root().join("malformed.csv");
    fs::write(&csv_path, malformed_csv).unwrap();

    // Either the sniffer copes or the failure names the problem
    match runner.run_command(&["headers", csv_path.to_str().unwrap()]) {
        Ok(_) => {}
        Err(error) => {
            let message = error.to_string();
            assert!(message.contains("CSV") || message.contains("quote") || message.contains("DuckDB"));
        }
    }
}

#[test]
fn test_leading_zeros_and_blank_cells_survive_loading() {
    let runner = CliTestRunner::new().unwrap();
    let path = runner
        .fixture()
        .create_csv_raw("ids.csv", "Region,OB Main ID,Budget\nNorth,007,\nSouth,0042,1.50\n")
        .unwrap();

    let table = DataProcessor::new().unwrap().load_table(&path).unwrap();

    assert_eq!(table.cell(0, 1), "007");
    assert_eq!(table.cell(0, 2), "");
    assert_eq!(table.cell(1, 1), "0042");
    assert_eq!(table.cell(1, 2), "1.50");
}

#[test]
fn test_header_only_csv() {
    let runner = CliTestRunner::new().unwrap();
    let fixture = runner.fixture();
    let q1 = fixture.create_csv("q1.csv", &sample_data::q1_data()).unwrap();
    let empty = fixture
        .create_csv_raw("empty.csv", "Region,OB Main ID,Status,Notes,Budget\n")
        .unwrap();
    let report_path = fixture.path("report.json");

    runner.expect_success(&[
        "compare",
        q1.to_str().unwrap(),
        empty.to_str().unwrap(),
        "--columns",
        "C",
        "--output",
        report_path.to_str().unwrap(),
        "--quiet",
    ]);

    let report = fixture.read_json("report.json");
    assert_eq!(report["summary"]["total_rows"], 0);
    assert!(report["rows"].as_array().unwrap().is_empty());
}

#[test]
fn test_json_lines_input() {
    let runner = CliTestRunner::new().unwrap();
    let fixture = runner.fixture();
    let q1 = fixture.create_csv("q1.csv", &sample_data::q1_data()).unwrap();
    let json = fixture
        .create_csv_raw(
            "q2.json",
            r#"[{"Region":"North","OB Main ID":"1001","Status":"Closed"}]"#,
        )
        .unwrap();
    let report_path = fixture.path("report.json");

    runner.expect_success(&[
        "compare",
        q1.to_str().unwrap(),
        json.to_str().unwrap(),
        "--columns",
        "name:Status",
        "--output",
        report_path.to_str().unwrap(),
        "--quiet",
    ]);

    let report = fixture.read_json("report.json");
    assert_eq!(report["summary"]["changed_cells"], 1);
}

#[test]
fn test_blank_key_header_in_csv_is_config_error() {
    let runner = CliTestRunner::new().unwrap();
    let fixture = runner.fixture();
    let q1 = fixture
        .create_csv_raw("q1.csv", "Region,,Status\nNorth,1001,Open\n")
        .unwrap();
    let q2 = fixture
        .create_csv_raw("q2.csv", "Region,,Status\nNorth,1001,Closed\n")
        .unwrap();

    let table = DataProcessor::new().unwrap().load_table(&q2).unwrap();
    assert_eq!(table.header(1), "");

    let error = runner.expect_failure(&[
        "compare",
        q1.to_str().unwrap(),
        q2.to_str().unwrap(),
        "--key",
        "B",
        "--columns",
        "C",
    ]);
    assert!(matches!(error, QuarterdiffError::Config { .. }));
    assert!(error.to_string().contains("header is empty"));
}

#[test]
fn test_blank_headers_do_not_match_each_other() {
    let runner = CliTestRunner::new().unwrap();
    let fixture = runner.fixture();
    let q1 = fixture
        .create_csv_raw("q1.csv", "ID,,Status\n1,old,Open\n")
        .unwrap();
    let q2 = fixture
        .create_csv_raw("q2.csv", "ID,,Status\n1,new,Open\n")
        .unwrap();
    let report_path = fixture.path("report.json");

    runner.expect_success(&[
        "compare",
        q1.to_str().unwrap(),
        q2.to_str().unwrap(),
        "--key",
        "A",
        "--columns",
        "B",
        "--output",
        report_path.to_str().unwrap(),
        "--quiet",
    ]);

    let report = fixture.read_json("report.json");
    assert_eq!(report["columns"]["B"]["current_header"], "");
    assert!(report["columns"]["B"]["baseline_header"].is_null());
}
