//! Integration tests for command dispatch, using a temporary project directory.

use std::fs;

use clap::Parser;
use tempfile::TempDir;

use dtgen::cli::{execute_command, Cli, CliError};
use dtgen::exitcode;
use dtgen::util::testing;

fn run(args: &[&str]) -> Result<(), CliError> {
    testing::init_test_setup();
    let cli = Cli::try_parse_from(args).expect("parse args");
    execute_command(&cli)
}

#[test]
fn given_output_file_when_tree_then_writes_latex_document() {
    let project = TempDir::new().unwrap();
    let out = project.path().join("tree.tex");
    let dir = project.path().to_str().unwrap();
    let out_arg = out.to_str().unwrap();

    run(&["dtgen", "-C", dir, "tree", "-a", "insertion", "-f", "latex", "-o", out_arg, "b", "a"]).unwrap();

    let latex = fs::read_to_string(&out).unwrap();
    assert!(latex.starts_with("\\documentclass[tikz, border=5pt]{standalone}"));
    assert!(latex.contains("[ $b > a$"), "{latex}");
    assert!(latex.trim_end().ends_with("\\end{document}"));
}

#[test]
fn given_local_format_when_tree_then_uses_configured_renderer() {
    let project = TempDir::new().unwrap();
    fs::write(project.path().join(".dtgen.toml"), "format = \"text\"\n").unwrap();
    let out = project.path().join("tree.txt");
    let dir = project.path().to_str().unwrap();

    run(&["dtgen", "-C", dir, "tree", "-a", "bubble", "-o", out.to_str().unwrap(), "c", "b", "a"]).unwrap();

    let text = fs::read_to_string(&out).unwrap();
    assert!(text.starts_with("c > b"), "{text}");
    assert_eq!(text.matches("(pruned)").count(), 2, "{text}");
}

#[test]
fn given_too_many_elements_when_stats_then_exits_with_dataerr() {
    let project = TempDir::new().unwrap();
    fs::write(project.path().join(".dtgen.toml"), "max_elements = 2\n").unwrap();
    let dir = project.path().to_str().unwrap();

    let err = run(&["dtgen", "-C", dir, "stats", "c", "b", "a"]).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::DATAERR);
}

#[test]
fn given_unwritable_output_when_tree_then_exits_with_cantcreat() {
    let project = TempDir::new().unwrap();
    let out = project.path().join("missing").join("tree.tex");
    let dir = project.path().to_str().unwrap();

    let err = run(&["dtgen", "-C", dir, "tree", "-o", out.to_str().unwrap(), "b", "a"]).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::CANTCREAT);
}

#[test]
fn given_project_dir_when_config_init_then_creates_template_once() {
    let project = TempDir::new().unwrap();
    let dir = project.path().to_str().unwrap();

    run(&["dtgen", "-C", dir, "config", "init"]).unwrap();
    let content = fs::read_to_string(project.path().join(".dtgen.toml")).unwrap();
    assert!(content.contains("max_elements"));

    let err = run(&["dtgen", "-C", dir, "config", "init"]).unwrap_err();
    assert!(matches!(err, CliError::Usage(_)));
    assert_eq!(err.exit_code(), exitcode::USAGE);
}

#[test]
fn given_valid_input_when_leaves_stats_trace_then_succeed() {
    let project = TempDir::new().unwrap();
    let dir = project.path().to_str().unwrap();

    run(&["dtgen", "-C", dir, "leaves", "-a", "bubble", "c", "b", "a"]).unwrap();
    run(&["dtgen", "-C", dir, "stats", "-a", "shell", "d", "c", "b", "a"]).unwrap();
    run(&["dtgen", "-C", dir, "trace", "-a", "bubble", "--path", "yes,no", "c", "b", "a"]).unwrap();
    run(&["dtgen", "-C", dir, "config", "show"]).unwrap();
    run(&["dtgen", "-C", dir, "config", "path"]).unwrap();
}
