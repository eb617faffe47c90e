use crate::commands::find_graphql_files;
use crate::Cli;
use clap::Parser;
use std::path::PathBuf;

/// A fresh directory under the system temp dir, removed on drop.
struct TestDir(PathBuf);
impl TestDir {
    fn new(name: &str) -> Self {
        let path = std::env::temp_dir()
            .join(format!("graphql-ir-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&path);
        std::fs::create_dir_all(&path).unwrap();
        Self(path)
    }

    fn write(&self, relative_path: &str, content: &str) -> PathBuf {
        let path = self.0.join(relative_path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }
}
impl Drop for TestDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

const SCHEMA: &str = r#"
    type Query { me: User, product: Product }
    type User { id: ID!, name: String }
    type Product { price(currency: String): Float }
"#;

#[test]
fn finds_files_by_extension() {
    let dir = TestDir::new("find-by-ext");
    dir.write("a.graphql", "query A { me { id } }");
    dir.write("nested/b.graphql", "query B { me { id } }");
    dir.write("nested/c.gql", "query C { me { id } }");
    dir.write("notes.txt", "not graphql");

    let mut found = find_graphql_files(&[dir.0.clone()], &["graphql".to_string()]).unwrap();
    found.sort();
    let names: Vec<_> = found.iter()
        .map(|path| path.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["a.graphql", "b.graphql"]);

    let found = find_graphql_files(
        &[dir.0.clone()],
        &["graphql".to_string(), ".gql".to_string()],
    ).unwrap();
    assert_eq!(found.len(), 3);
}

#[test]
fn single_file_is_used_whatever_its_extension() {
    let dir = TestDir::new("single-file");
    let path = dir.write("operations.txt", "query A { me { id } }");

    let found = find_graphql_files(&[path], &["graphql".to_string()]).unwrap();
    assert_eq!(found.len(), 1);
}

#[test]
fn missing_path_is_an_error() {
    let dir = TestDir::new("missing-path");
    let result = find_graphql_files(&[dir.0.join("missing")], &["graphql".to_string()]);
    assert!(result.is_err());
}

#[tokio::test]
async fn inspect_reports_success() {
    let dir = TestDir::new("inspect-success");
    let schema_path = dir.write("schema.graphqls", SCHEMA);
    dir.write("ops/me.graphql", "query Me { me { ...UserName } } fragment UserName on User { name }");

    let mut cli = Cli::try_parse_from([
        "graphql-ir".into(),
        "inspect".into(),
        "--schema".into(),
        schema_path.into_os_string(),
        dir.0.join("ops").into_os_string(),
    ]).unwrap();
    let result = cli.cmd.take().unwrap().run(cli).await;

    assert!(result.stderr.is_none(), "{:?}", result.stderr);
    let stdout = result.stdout.unwrap();
    assert!(stdout.contains("query Me on Query"));
    assert!(stdout.contains("Inspected 2 definitions from 1 files."));
}

#[tokio::test]
async fn inspect_reports_diagnostics() {
    let dir = TestDir::new("inspect-diagnostics");
    let schema_path = dir.write("schema.graphqls", SCHEMA);
    let ops_path = dir.write("ops.graphql", r#"
        query Q { product { ...Usd ...Eur } }
        fragment Usd on Product { price(currency: "USD") }
        fragment Eur on Product { price(currency: "EUR") }
    "#);

    let mut cli = Cli::try_parse_from([
        "graphql-ir".into(),
        "inspect".into(),
        "--schema".into(),
        schema_path.into_os_string(),
        ops_path.into_os_string(),
    ]).unwrap();
    let result = cli.cmd.take().unwrap().run(cli).await;

    let stderr = result.stderr.unwrap();
    assert!(stderr.contains("Found 1 diagnostics"));
    assert!(stderr.contains("Conflicting selections for `price`"));
    assert!(result.stdout.is_some());
}

#[tokio::test]
async fn inspect_reports_build_errors() {
    let dir = TestDir::new("inspect-errors");
    let schema_path = dir.write("schema.graphqls", SCHEMA);
    let ops_path = dir.write("ops.graphql", "query Q { me { missing } }");

    let mut cli = Cli::try_parse_from([
        "graphql-ir".into(),
        "inspect".into(),
        "--schema".into(),
        schema_path.into_os_string(),
        ops_path.into_os_string(),
    ]).unwrap();
    let result = cli.cmd.take().unwrap().run(cli).await;

    assert!(result.stdout.is_none());
    assert!(result.stderr.unwrap().contains("Failed to build the IR"));
}
