//! Runs the `gdoc` binary the way a user would.

mod common;

use common::{FMT, GoTree, UNICODE};
use std::process::{Command, Output};

fn gdoc(tree: &GoTree, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_gdoc"))
        .args(args)
        .current_dir(tree.dir.path())
        .env("GOROOT", tree.goroot())
        .env("GOPATH", tree.gopath())
        .env_remove("GDOC_LOG")
        .output()
        .expect("Failed to run gdoc")
}

#[test]
fn three_arguments_print_usage_and_exit_2() {
    let tree = GoTree::new();
    let output = gdoc(&tree, &["a", "b", "c"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Find documentation for names."));
}

#[test]
fn package_flag_with_two_arguments_is_rejected() {
    let tree = GoTree::new();
    let output = gdoc(&tree, &["-package", "fmt", "Printf"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
}

#[test]
fn unknown_flag_prints_usage() {
    let tree = GoTree::new();
    let output = gdoc(&tree, &["-nope", "fmt"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("usage:"));
}

#[test]
fn slash_in_package_exits_2() {
    let tree = GoTree::new();
    let output = gdoc(&tree, &["go/ast", "Node"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("cannot contain slash"));
}

#[test]
fn invalid_pattern_exits_2() {
    let tree = GoTree::new();
    let output = gdoc(&tree, &["-r", "Print("]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("regular expression"));
}

#[test]
fn unreadable_config_file_exits_1() {
    let tree = GoTree::new();
    let config = tree.dir.path().join("broken.toml");
    std::fs::write(&config, "[urls\nstandard = ").expect("Failed to write config");

    let output = gdoc(&tree, &["-config", config.to_str().unwrap(), "fmt.Print"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid configuration"), "{stderr}");
    assert!(!stderr.contains("usage:"));
}

#[test]
fn go_style_flags_select_output() {
    let tree = GoTree::new();
    tree.std_file("unicode/letter.go", UNICODE);

    let output = gdoc(&tree, &["-url", "-f", "unicode.isupper"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "http://golang.org/pkg/unicode/#IsUpper\n"
    );
}

#[test]
fn pkg_alias_prints_package_doc() {
    let tree = GoTree::new();
    tree.std_file("fmt/print.go", FMT);

    let output = gdoc(&tree, &["-pkg", "-doc", "fmt"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "package fmt\nPackage fmt implements formatted I/O with functions analogous\nto C's printf and scanf.\n\n\n"
    );
}

#[test]
fn regex_flag_searches_everywhere() {
    let tree = GoTree::new();
    tree.std_file("fmt/print.go", FMT);
    tree.workspace_file("example.com/log/log.go", "package log\n\n// Print logs.\nfunc Print() {}\n");

    let output = gdoc(&tree, &["-r", "-url", ".?print"]);
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "http://golang.org/pkg/fmt/#Print\n\
         http://golang.org/pkg/fmt/#Fprint\n\
         http://golang.org/pkg/fmt/#Sprint\n\
         http://godoc.org/example.com/log/#Print\n"
    );
}

#[test]
fn no_match_exits_0_silently() {
    let tree = GoTree::new();
    tree.std_file("fmt/print.go", FMT);

    let output = gdoc(&tree, &["Nothing"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(output.stdout.is_empty());
}
