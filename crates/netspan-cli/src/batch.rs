//! Parallel batch processing using Rayon
//!
//! Decomposes many range expressions at once with:
//! - Configurable thread pool
//! - Input order preserved in the output
//! - Individual error handling

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info};

use netspan_cidr::Range;

use crate::report::{BatchRow, RangeReport};

/// Batch processing result
#[derive(Debug, Clone)]
pub struct BatchResult {
    pub input: String,
    pub result: Result<RangeReport, String>,
}

impl From<BatchResult> for BatchRow {
    fn from(res: BatchResult) -> Self {
        match res.result {
            Ok(range) => BatchRow {
                input: res.input,
                range: Some(range),
                error: None,
            },
            Err(error) => BatchRow {
                input: res.input,
                range: None,
                error: Some(error),
            },
        }
    }
}

/// Batch processor with parallel execution
pub struct BatchProcessor {
    thread_pool: rayon::ThreadPool,
}

impl BatchProcessor {
    /// Create a new batch processor
    ///
    /// # Arguments
    ///
    /// * `num_threads` - Number of threads (default: CPU cores)
    pub fn new(num_threads: Option<usize>) -> Result<Self> {
        let num_threads = num_threads.unwrap_or_else(num_cpus::get);

        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build()?;

        Ok(Self { thread_pool })
    }

    /// Decompose a batch of range expressions in parallel
    ///
    /// # Arguments
    ///
    /// * `lines` - One range expression per entry (`"A - B"`, CIDR or address)
    pub fn process_ranges(&self, lines: Vec<String>) -> Vec<BatchResult> {
        let total = lines.len();
        let processed = AtomicUsize::new(0);

        let results: Vec<BatchResult> = self.thread_pool.install(|| {
            lines
                .into_par_iter()
                .map(|line| {
                    let result = Range::parse(line.as_str())
                        .map(RangeReport::from)
                        .map_err(|e| e.to_string());

                    let count = processed.fetch_add(1, Ordering::Relaxed) + 1;
                    if count % 1000 == 0 || count == total {
                        debug!("Processed {}/{} ranges", count, total);
                    }

                    BatchResult {
                        input: line,
                        result,
                    }
                })
                .collect()
        });

        let failed = results.iter().filter(|r| r.result.is_err()).count();
        info!(total, failed, "batch complete");
        results
    }

    /// Get thread pool info
    pub fn thread_count(&self) -> usize {
        self.thread_pool.current_num_threads()
    }
}

/// Read range expressions from a file, or stdin when `path` is `None` or `-`
///
/// Blank lines and `#` comments are skipped.
pub fn read_lines(path: Option<&str>) -> Result<Vec<String>> {
    match path {
        None | Some("-") => collect_lines(io::stdin().lock()),
        Some(path) => {
            let file = File::open(path).with_context(|| format!("Failed to open {}", path))?;
            collect_lines(BufReader::new(file))
        }
    }
}

fn collect_lines(reader: impl BufRead) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        lines.push(line.to_string());
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_processor_creation() {
        let processor = BatchProcessor::new(Some(4));
        assert!(processor.is_ok());
        assert_eq!(processor.unwrap().thread_count(), 4);
    }

    #[test]
    fn test_batch_processor_default_threads() {
        let processor = BatchProcessor::new(None).unwrap();
        assert!(processor.thread_count() > 0);
    }

    #[test]
    fn test_process_ranges_keeps_order_and_errors() {
        let processor = BatchProcessor::new(Some(2)).unwrap();
        let lines = vec![
            "192.168.31.240 - 192.168.35.193".to_string(),
            "not an address".to_string(),
            "10.0.0.0/8".to_string(),
            "10.0.0.1 - ::1".to_string(),
        ];

        let results = processor.process_ranges(lines);
        assert_eq!(results.len(), 4);

        assert_eq!(results[0].input, "192.168.31.240 - 192.168.35.193");
        assert_eq!(results[0].result.as_ref().unwrap().networks.len(), 6);

        assert!(results[1].result.is_err());

        let cidr = results[2].result.as_ref().unwrap();
        assert_eq!(cidr.networks.len(), 1);
        assert_eq!(cidr.count, "16777216");

        let err = results[3].result.as_ref().unwrap_err();
        assert!(err.contains("same version"));
    }

    #[test]
    fn test_collect_lines_skips_blanks_and_comments() {
        let input = "# ranges\n10.0.0.0/8\n\n  192.168.0.1 - 192.168.0.9  \n";
        let lines = collect_lines(input.as_bytes()).unwrap();
        assert_eq!(lines, ["10.0.0.0/8", "192.168.0.1 - 192.168.0.9"]);
    }

    #[test]
    fn test_batch_row_from_result() {
        let row = BatchRow::from(BatchResult {
            input: "x".to_string(),
            result: Err("boom".to_string()),
        });
        assert!(row.range.is_none());
        assert_eq!(row.error.as_deref(), Some("boom"));
    }
}
