//! Tests for the mdcatalog binary
//!
//! Each test runs the built executable against a catalog in a temporary
//! directory and checks its exit status and output.

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn mdcatalog(root: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mdcatalog"))
        .arg("--uri")
        .arg(root.join("ecommerce"))
        .args(args)
        .env_remove("CATALOG_URI")
        .env_remove("CATALOG_NO_HISTORY")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run mdcatalog")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_seed_prints_summary() {
    let tmp = TempDir::new().unwrap();
    let output = mdcatalog(tmp.path(), &["seed"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("Inserted 3 product(s)"));
    assert!(out.contains("- Winter Jacket (Apparel) - $129.99"));
    assert!(out.contains("  Variants: 2"));
}

#[test]
fn test_seed_with_invalid_file_exits_non_zero() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("seed.json");
    std::fs::write(
        &file,
        r#"[
            { "name": "Lamp", "price": 25.0, "category": "Home", "variants": [] },
            { "name": "Robot", "price": 40.0, "category": "Toys", "variants": [] }
        ]"#,
    )
    .unwrap();

    let output = mdcatalog(tmp.path(), &["seed", "--file", &file.to_string_lossy()]);

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("Error: Seed batch failed"), "stderr: {}", err);
    assert!(err.contains("item 1 ('Robot')"));
    assert!(err.contains("Hint:"));

    // The valid prefix was kept and the catalog can be reopened
    let listed = mdcatalog(tmp.path(), &["list", "--summary"]);
    assert!(listed.status.success(), "stderr: {}", stderr(&listed));
    assert!(stdout(&listed).contains("\"name\": \"Lamp\""));
}

#[test]
fn test_unreachable_catalog_exits_non_zero() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("ecommerce"), "").unwrap();

    let output = mdcatalog(tmp.path(), &["seed"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Cannot connect to catalog"));
}

#[test]
fn test_missing_variant_id_exits_non_zero() {
    let tmp = TempDir::new().unwrap();
    assert!(mdcatalog(tmp.path(), &["seed"]).status.success());

    let output = mdcatalog(
        tmp.path(),
        &["remove-variant-by-id", "00000000-0000-4000-8000-000000000000"],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("No product has a variant with id"));
}
