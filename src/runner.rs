use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::RunError;
use crate::metrics::collector::RunCollector;
use crate::report::RunReport;
use crate::RunConfig;

// ─── Single run ──────────────────────────────────────────────────

/// Run the engine over an in-memory sequence of lines.
pub fn analyze_lines<'a, I>(lines: I, config: RunConfig) -> RunReport
where
    I: IntoIterator<Item = &'a str>,
{
    let mut collector = RunCollector::new(config);
    for line in lines {
        collector.consume_line(line);
    }
    collector.finish(None)
}

/// Read one log file and run the engine over it.
///
/// An unreadable file is fatal for this run alone; line-level problems
/// inside a readable file never are.
pub async fn analyze_file(
    path: impl AsRef<Path>,
    config: RunConfig,
) -> Result<RunReport, RunError> {
    let path = path.as_ref();
    let contents =
        tokio::fs::read_to_string(path)
            .await
            .map_err(|source| RunError::Io {
                path: path.to_owned(),
                source,
            })?;

    let mut collector = RunCollector::new(config);
    for line in contents.lines() {
        collector.consume_line(line);
    }
    debug!(path = %path.display(), "log file analyzed");
    Ok(collector.finish(Some(path.display().to_string())))
}

// ─── Sweep ───────────────────────────────────────────────────────

/// Outcome of one run within a sweep.
#[derive(Debug)]
pub struct SweepOutcome {
    pub path: PathBuf,
    pub result: Result<RunReport, RunError>,
}

/// Analyze many independent log files concurrently.
///
/// One task per file; runs share nothing, and a failed run (typically
/// a missing file) is reported in place without stopping the others.
/// Outcomes come back in input order.
pub async fn analyze_sweep(
    paths: Vec<PathBuf>,
    config: RunConfig,
) -> Vec<SweepOutcome> {
    let mut handles = Vec::with_capacity(paths.len());
    for path in paths {
        let config = config.clone();
        let task_path = path.clone();
        let handle =
            tokio::spawn(async move { analyze_file(task_path, config).await });
        handles.push((path, handle));
    }

    let mut outcomes = Vec::with_capacity(handles.len());
    for (path, handle) in handles {
        let result = match handle.await {
            Ok(result) => result,
            Err(join_error) => Err(RunError::Join(join_error)),
        };
        outcomes.push(SweepOutcome { path, result });
    }
    outcomes
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_log(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[tokio::test]
    async fn analyzes_a_log_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_log(
            &dir,
            "server.log",
            "R1:0.0,0.5,0.1,0.5,1.0\nR2:1.0,0.8,1.1,1.2,2.0\n",
        );

        let report = analyze_file(&path, RunConfig::default()).await.unwrap();
        assert_eq!(report.lines.requests, 2);
        assert!((report.utilization - 0.65).abs() < 1e-12);
        assert_eq!(report.source.as_deref(), Some(path.to_str().unwrap()));
    }

    #[tokio::test]
    async fn missing_file_fails_that_run_only() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_log(&dir, "a.log", "R1:0.0,0.5,0.1,0.5,1.0\n");
        let missing = dir.path().join("nope.log");
        let also_good = write_log(&dir, "b.log", "R1:0.0,0.5,0.1,0.5,1.0\n");

        let outcomes = analyze_sweep(
            vec![good.clone(), missing.clone(), also_good.clone()],
            RunConfig::default(),
        )
        .await;

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].path, good);
        assert!(outcomes[0].result.is_ok());
        assert!(matches!(
            outcomes[1].result,
            Err(RunError::Io { .. })
        ));
        assert!(outcomes[2].result.is_ok());
    }

    #[test]
    fn analyze_lines_runs_without_a_runtime() {
        let report = analyze_lines(
            ["R1:0.0,0.5,0.1,0.5,1.0"],
            RunConfig::default(),
        );
        assert_eq!(report.lines.requests, 1);
        assert_eq!(report.source, None);
    }
}
