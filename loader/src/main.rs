//! Batch loader: reads theorem files from a directory and writes them into
//! the graph.

mod source;

use anyhow::{bail, Context};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use theograph_config::AppConfig;
use theograph_graph::{Neo4jTheoremStore, TheoremIngestor, TheoremStore};
use theograph_models::IngestReport;
use theograph_observability::{init_tracing, TracingConfig};

use source::Record;

#[derive(Parser, Debug)]
#[command(name = "theograph-loader")]
#[command(about = "Load theorem records into the theorem graph")]
struct Args {
    /// Directory containing *.json and *.jsonl theorem files
    #[arg(long, default_value = "./input/")]
    input: PathBuf,

    /// Do not create uniqueness constraints before loading
    #[arg(long)]
    skip_schema: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = AppConfig::from_env()?;
    init_tracing(TracingConfig::for_service("theograph-loader"));

    let store = Neo4jTheoremStore::connect(&config.neo4j)
        .await
        .with_context(|| format!("connecting to Neo4j at {}", config.neo4j.uri))?;
    tracing::info!("Successfully connected to Neo4j");

    if !args.skip_schema {
        store.initialize().await.context("creating graph constraints")?;
    }

    let store = Arc::new(store);
    let ingestor = TheoremIngestor::new(store.clone());
    let report = load_directory(&ingestor, &args.input).await?;

    tracing::info!(
        total = report.total,
        added = report.added,
        failed = report.failed,
        "Loading finished"
    );
    for failure in &report.failures {
        tracing::warn!("  {}: {}", failure.name, failure.error);
    }

    match store.statistics().await {
        Ok(stats) => tracing::info!(
            theorems = stats.theorems,
            subjects = stats.subjects,
            domains = stats.domains,
            dependencies = stats.dependencies,
            "Graph now holds"
        ),
        Err(e) => tracing::warn!("Could not read graph statistics: {}", e),
    }

    if !report.is_clean() {
        bail!("{} of {} record(s) failed to load", report.failed, report.total);
    }
    Ok(())
}

/// Ingest every theorem file in `dir`. Unreadable files and undecodable
/// entries are counted as failures and loading continues.
async fn load_directory(ingestor: &TheoremIngestor, dir: &Path) -> anyhow::Result<IngestReport> {
    let files = source::discover(dir)?;
    if files.is_empty() {
        tracing::warn!("No theorem files found in {}", dir.display());
    }

    let mut report = IngestReport::default();
    for path in files {
        tracing::info!("Reading {}", path.display());

        let records = match source::read_file(&path) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("Skipping {}: {}", path.display(), e);
                report.record_failure(path.display().to_string(), e.to_string());
                continue;
            }
        };

        let mut theorems = Vec::with_capacity(records.len());
        for record in records {
            match record {
                Record::Valid(theorem) => theorems.push(theorem),
                Record::Invalid { name, error } => {
                    tracing::warn!("Failed to add {}: {}", name, error);
                    report.record_failure(name, error);
                }
            }
        }

        report.merge(ingestor.ingest_batch(theorems).await);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use theograph_graph::InMemoryTheoremStore;

    #[tokio::test]
    async fn test_load_directory_counts_every_failure() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("01-geometry.json"),
            r#"[
                {"name": "Law of Cosines", "statement": "c^2 = a^2 + b^2 - 2ab cos(C)",
                 "subject": "Geometry", "domain": "Trigonometry",
                 "dependencies": ["Pythagorean Theorem"], "t_type": "Theorem"},
                {"name": "Blank", "statement": " ", "subject": "Geometry", "domain": "Trigonometry"}
            ]"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("02-more.jsonl"),
            concat!(
                r#"{"name": "Pythagorean Theorem", "statement": "a^2 + b^2 = c^2", "subject": "Geometry", "domain": "Euclidean Geometry"}"#,
                "\n",
                r#"{"name": "Guess", "statement": "s", "subject": "S", "domain": "D", "type": "Conjecture"}"#,
                "\n"
            ),
        )
        .unwrap();
        fs::write(dir.path().join("03-broken.json"), "{").unwrap();

        let store = Arc::new(InMemoryTheoremStore::new());
        let ingestor = TheoremIngestor::new(store.clone());

        let report = load_directory(&ingestor, dir.path()).await.unwrap();

        assert_eq!(report.added, 2);
        assert_eq!(report.failed, 3);
        let failed: Vec<_> = report.failures.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(failed[0], "Blank");
        assert_eq!(failed[1], "Guess");
        assert!(failed[2].ends_with("03-broken.json"));

        let pythagoras = store.get_theorem("Pythagorean Theorem").await.unwrap().unwrap();
        assert!(!pythagoras.is_stub());
        assert_eq!(store.statistics().await.unwrap().theorems, 2);
    }

    #[tokio::test]
    async fn test_missing_directory_is_an_error() {
        let ingestor = TheoremIngestor::new(Arc::new(InMemoryTheoremStore::new()));
        assert!(load_directory(&ingestor, Path::new("/nonexistent/theorems"))
            .await
            .is_err());
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["theograph-loader"]);
        assert_eq!(args.input, PathBuf::from("./input/"));
        assert!(!args.skip_schema);
    }
}
