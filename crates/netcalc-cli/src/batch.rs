//! Parallel batch calculation using Rayon
//!
//! Provides batch block summaries with:
//! - Thread pool sized by flag, environment or CPU count
//! - Individual error handling per input line
//! - Progress reporting through tracing

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::sync::atomic::{AtomicUsize, Ordering};

use netcalc_cidr::{calculate, Calculation};

/// Outcome for one input line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchResult {
    pub input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Calculation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchResult {
    /// Flat columns for CSV: input, family, network, last, cidrmask, error
    pub fn csv_row(&self) -> [String; 6] {
        let (family, network, last, cidrmask) = match &self.result {
            Some(Calculation::V4(s)) => (
                "ipv4",
                s.network.clone(),
                s.broadcast.clone(),
                s.cidrmask.to_string(),
            ),
            Some(Calculation::V6(s)) => (
                "ipv6",
                s.network.clone(),
                s.last.clone(),
                s.cidrmask.to_string(),
            ),
            None => ("", String::new(), String::new(), String::new()),
        };

        [
            self.input.clone(),
            family.to_string(),
            network,
            last,
            cidrmask,
            self.error.clone().unwrap_or_default(),
        ]
    }
}

/// Summarizes many blocks on a dedicated rayon pool
pub struct BatchProcessor {
    thread_pool: rayon::ThreadPool,
}

impl BatchProcessor {
    /// Pool of `num_threads` workers, or one per CPU core
    pub fn new(num_threads: Option<usize>) -> Result<Self> {
        let num_threads = num_threads.unwrap_or_else(num_cpus::get);

        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build()?;

        Ok(Self { thread_pool })
    }

    /// Summarize every block in parallel, preserving input order
    pub fn process(&self, inputs: Vec<String>) -> Vec<BatchResult> {
        let total = inputs.len();
        let processed = AtomicUsize::new(0);

        self.thread_pool.install(|| {
            inputs
                .into_par_iter()
                .map(|input| {
                    let result = calculate(&input);

                    let count = processed.fetch_add(1, Ordering::Relaxed) + 1;
                    if count % 1000 == 0 || count == total {
                        tracing::info!("Processed {}/{} inputs", count, total);
                    }

                    match result {
                        Ok(calc) => BatchResult {
                            input,
                            result: Some(calc),
                            error: None,
                        },
                        Err(e) => BatchResult {
                            input,
                            result: None,
                            error: Some(e.to_string()),
                        },
                    }
                })
                .collect()
        })
    }

    /// Worker threads in the pool
    pub fn thread_count(&self) -> usize {
        self.thread_pool.current_num_threads()
    }
}

/// Read one block per line from a file, or stdin for `None` / `-`
///
/// Blank lines and `#` comments are skipped.
pub fn read_inputs(file: Option<&str>) -> Result<Vec<String>> {
    let reader: Box<dyn BufRead> = match file {
        None | Some("-") => Box::new(BufReader::new(io::stdin())),
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Failed to open {}", path))?,
        )),
    };

    collect_lines(reader)
}

fn collect_lines<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut inputs = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        inputs.push(line.to_string());
    }
    Ok(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

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
    fn test_process_mixed_inputs() {
        let processor = BatchProcessor::new(Some(2)).unwrap();
        let results = processor.process(vec![
            "212.224.70.222/24".to_string(),
            "bogus".to_string(),
            "2a01:7e0::1/64".to_string(),
        ]);

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].input, "212.224.70.222/24");
        assert!(matches!(results[0].result, Some(Calculation::V4(_))));
        assert!(results[1].error.is_some());
        assert!(matches!(results[2].result, Some(Calculation::V6(_))));
    }

    #[test]
    fn test_csv_row() {
        let processor = BatchProcessor::new(Some(1)).unwrap();
        let results = processor.process(vec!["10.0.0.9/24".to_string()]);
        assert_eq!(
            results[0].csv_row(),
            [
                "10.0.0.9/24".to_string(),
                "ipv4".to_string(),
                "10.0.0.0".to_string(),
                "10.0.0.255".to_string(),
                "24".to_string(),
                String::new(),
            ]
        );
    }

    #[test]
    fn test_collect_lines_skips_blanks_and_comments() {
        let input = Cursor::new("# header\n10.0.0.0/8\n\n  2a01::/16  \n");
        let lines = collect_lines(input).unwrap();
        assert_eq!(lines, vec!["10.0.0.0/8", "2a01::/16"]);
    }
}
