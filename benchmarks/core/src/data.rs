//! Test data generation and management for benchmarks

use crate::error::{BenchmarkError, BenchmarkResult};
use logsum_core::{Input, LogProcessor, StrategyType};
use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

/// An access log held in memory with its known byte total
#[derive(Debug, Clone)]
pub struct TestLog {
    /// Name/identifier for this log
    pub name: String,
    /// Raw file contents
    content: Arc<[u8]>,
    /// Number of lines
    pub line_count: usize,
    /// Sum of the `bytes` field over every line
    pub expected_total: u64,
}

impl TestLog {
    /// Create a log from lines whose total is already known
    pub fn new(name: impl Into<String>, lines: &[String], expected_total: u64) -> Self {
        let mut text = lines.join("\n");
        if !text.is_empty() {
            text.push('\n');
        }

        Self {
            name: name.into(),
            content: Arc::from(text.into_bytes()),
            line_count: lines.len(),
            expected_total,
        }
    }

    /// Load a real log file; the sequential scan supplies the expected total
    pub fn from_file(path: &Path) -> BenchmarkResult<Self> {
        let content = fs::read(path).map_err(|source| BenchmarkError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let content: Arc<[u8]> = Arc::from(content);
        let line_count = content.split(|&b| b == b'\n').filter(|l| !l.is_empty()).count();

        let expected_total = LogProcessor::new(StrategyType::Sequential)
            .process(Input::from_reader(Cursor::new(Arc::clone(&content))))
            .map_err(|source| BenchmarkError::Processing {
                label: format!("{}/baseline", path.display()),
                source,
            })?
            .total_bytes;

        Ok(Self {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            content,
            line_count,
            expected_total,
        })
    }

    /// A fresh streaming input over the contents, without copying them
    pub fn input(&self) -> Input {
        Input::from_reader(Cursor::new(Arc::clone(&self.content)))
    }

    /// Size of the log in bytes
    pub fn size_bytes(&self) -> usize {
        self.content.len()
    }

    /// Write the log to disk
    pub fn write_to(&self, path: &Path) -> BenchmarkResult<()> {
        fs::write(path, &self.content).map_err(|source| BenchmarkError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Generators for synthetic CLF logs
pub mod generators {
    use super::TestLog;

    const METHODS: &[&str] = &["GET", "GET", "GET", "POST", "HEAD"];
    const PATHS: &[&str] = &[
        "/",
        "/index.html",
        "/images/logo.png",
        "/api/v1/items",
        "/blog/2015/05/17/monitoring.html",
        "/favicon.ico",
    ];
    const AGENTS: &[&str] = &[
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36",
        "curl/8.0.1",
        "Googlebot/2.1 (+http://www.google.com/bot.html)",
        "",
    ];

    /// Deterministic xorshift sequence so every run sees the same log
    struct Sequence(u64);

    impl Sequence {
        fn next(&mut self) -> u64 {
            let mut x = self.0;
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            self.0 = x;
            x
        }

        fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
            items[(self.next() % items.len() as u64) as usize]
        }
    }

    /// Generate a well-formed access log where every line matches the grammar
    pub fn well_formed(line_count: usize) -> TestLog {
        generate(format!("well_formed_{line_count}"), line_count, 0, 0)
    }

    /// Generate an access log that mixes in `-` byte fields and malformed lines
    ///
    /// Roughly one line in twenty has `-` and one in fifty is garbage, close to
    /// what a real server log looks like.
    pub fn realistic(line_count: usize) -> TestLog {
        generate(format!("realistic_{line_count}"), line_count, 20, 50)
    }

    /// Generate `line_count` lines that each transfer exactly one byte
    pub fn unit_bytes(line_count: usize) -> TestLog {
        let lines: Vec<String> = (0..line_count)
            .map(|i| {
                format!(
                    r#"10.0.{}.{} - - [01/Jan/2024:00:00:00 +0000] "GET /{i} HTTP/1.1" 200 1 "-" "-""#,
                    (i / 256) % 256,
                    i % 256
                )
            })
            .collect();
        TestLog::new(format!("unit_bytes_{line_count}"), &lines, line_count as u64)
    }

    fn generate(name: String, line_count: usize, dash_every: u64, garbage_every: u64) -> TestLog {
        let mut seq = Sequence(0x9E37_79B9_7F4A_7C15);
        let mut lines = Vec::with_capacity(line_count);
        let mut total = 0u64;

        for i in 0..line_count {
            let roll = seq.next();
            if garbage_every > 0 && roll % garbage_every == 0 {
                lines.push(format!("garbage line {i} without structure"));
                continue;
            }

            let bytes = if dash_every > 0 && (roll >> 8) % dash_every == 0 {
                "-".to_string()
            } else {
                let b = seq.next() % 250_000;
                total += b;
                b.to_string()
            };

            let host = seq.next();
            lines.push(format!(
                r#"{}.{}.{}.{} - - [17/May/2015:10:{:02}:{:02} +0000] "{} {} HTTP/1.1" {} {} "-" "{}""#,
                host & 0xff,
                (host >> 8) & 0xff,
                (host >> 16) & 0xff,
                (host >> 24) & 0xff,
                (i / 60) % 60,
                i % 60,
                seq.pick(METHODS),
                seq.pick(PATHS),
                if seq.next() % 10 == 0 { 404 } else { 200 },
                bytes,
                seq.pick(AGENTS),
            ));
        }

        TestLog::new(name, &lines, total)
    }
}
