//! Unit tests for CLI argument parsing and validation

use clap::Parser;
use quarterdiff::cli::{Cli, ColumnList, Commands, OutputFormat};
use quarterdiff::ColumnRef;

fn letters(names: &[&str]) -> ColumnList {
    ColumnList(names.iter().map(|n| ColumnRef::Letter(n.to_string())).collect())
}

#[test]
fn test_cli_compare_defaults() {
    let cli = Cli::try_parse_from(["quarterdiff", "compare", "q1.csv", "q2.csv"]).unwrap();
    match cli.command {
        Commands::Compare {
            baseline,
            current,
            columns,
            key,
            word_diff,
            format,
            output,
            limit,
            quiet,
            no_progress,
        } => {
            assert_eq!(baseline.to_str(), Some("q1.csv"));
            assert_eq!(current.to_str(), Some("q2.csv"));
            assert!(columns.is_none());
            assert!(key.is_none());
            assert!(word_diff.is_none());
            assert_eq!(format, "pretty");
            assert!(output.is_none());
            assert_eq!(limit, 20);
            assert!(!quiet);
            assert!(!no_progress);
        }
        _ => panic!("Expected Compare command"),
    }
}

#[test]
fn test_cli_compare_with_options() {
    let cli = Cli::try_parse_from([
        "quarterdiff", "compare", "q1.csv", "q2.csv",
        "--columns", "i,O,p",
        "--key", "b",
        "--word-diff", "O",
        "--format", "json",
        "--output", "report.json",
        "--quiet",
    ])
    .unwrap();

    match cli.command {
        Commands::Compare { columns, key, word_diff, format, output, quiet, .. } => {
            assert_eq!(columns, Some(letters(&["I", "O", "P"])));
            assert_eq!(key, Some(ColumnRef::Letter("B".to_string())));
            assert_eq!(word_diff, Some(letters(&["O"])));
            assert_eq!(OutputFormat::parse(&format), Ok(OutputFormat::Json));
            assert_eq!(output.unwrap().to_str(), Some("report.json"));
            assert!(quiet);
        }
        _ => panic!("Expected Compare command"),
    }
}

#[test]
fn test_cli_compare_header_columns() {
    let cli = Cli::try_parse_from([
        "quarterdiff", "compare", "a.csv", "b.csv",
        "--columns", "Status,name:ID,12",
    ])
    .unwrap();

    match cli.command {
        Commands::Compare { columns, .. } => {
            let columns = columns.unwrap().0;
            assert_eq!(columns[0], ColumnRef::Header("Status".to_string()));
            assert_eq!(columns[1], ColumnRef::Header("ID".to_string()));
            assert_eq!(columns[2], ColumnRef::Position(12));
        }
        _ => panic!("Expected Compare command"),
    }
}

#[test]
fn test_cli_rejects_bad_column() {
    assert!(Cli::try_parse_from(["quarterdiff", "compare", "a.csv", "b.csv", "--columns", "A,0"]).is_err());
    assert!(Cli::try_parse_from(["quarterdiff", "compare", "a.csv", "b.csv", "--key", "XFZ"]).is_err());
}

#[test]
fn test_cli_missing_inputs() {
    assert!(Cli::try_parse_from(["quarterdiff", "compare", "only_one.csv"]).is_err());
}

#[test]
fn test_cli_headers_and_init() {
    let cli = Cli::try_parse_from(["quarterdiff", "headers", "q2.csv", "--format", "json"]).unwrap();
    assert!(matches!(cli.command, Commands::Headers { ref format, .. } if format == "json"));

    let cli = Cli::try_parse_from(["quarterdiff", "init", "--force"]).unwrap();
    assert!(matches!(cli.command, Commands::Init { force: true, dir: None }));
}

#[test]
fn test_cli_global_flags() {
    let cli = Cli::try_parse_from([
        "quarterdiff", "compare", "a.csv", "b.csv", "--verbose", "--config", "team.json",
    ])
    .unwrap();
    assert!(cli.verbose);
    assert_eq!(cli.config.unwrap().to_str(), Some("team.json"));
}
