//! Batch command implementation
//!
//! Reads one kerning job per JSONL line, solves them in parallel and writes
//! one JSON result per job, in the order the jobs arrived. A bad line or a
//! failed job becomes an error result. Only a failing reader stops the batch.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::time::Instant;

use anyhow::{Context, Result};
use glyphtools_core::kern::{determine_kern_detailed, KernParams, KerningQuery, DEFAULT_MAX_TUCK};
use glyphtools_core::FontSource;
use kurbo::Vec2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::open_font;
use crate::cli::BatchArgs;

fn default_max_tuck() -> f64 {
    DEFAULT_MAX_TUCK
}

/// One kerning request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KernJob {
    /// How to identify this job in the results (line number if omitted)
    #[serde(default)]
    pub id: Option<String>,
    pub left: String,
    pub right: String,
    /// Target ink-to-ink distance
    pub distance: f64,
    #[serde(default = "default_max_tuck")]
    pub max_tuck: f64,
    #[serde(default)]
    pub offset_left: Option<[f64; 2]>,
    #[serde(default)]
    pub offset_right: Option<[f64; 2]>,
}

impl KernJob {
    fn query(&self) -> KerningQuery {
        let to_vec = |offset: Option<[f64; 2]>| offset.map_or(Vec2::ZERO, |[x, y]| Vec2::new(x, y));
        let params = KernParams::new(self.distance)
            .with_offsets(to_vec(self.offset_left), to_vec(self.offset_right))
            .with_max_tuck(Some(self.max_tuck));
        KerningQuery::new(&self.left, &self.right, self.distance).with_params(params)
    }
}

/// What happened to one job
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KernResult {
    pub id: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kern: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl KernResult {
    pub fn error(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: "error".to_string(),
            kern: None,
            distance: None,
            error: Some(message.into()),
        }
    }
}

/// A line of input after parsing, good or bad
type ParsedLine = (usize, std::result::Result<KernJob, String>);

pub fn run(args: &BatchArgs) -> Result<()> {
    let start = Instant::now();

    if args.jobs > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(args.jobs)
            .build_global()
            .context("Failed to initialize thread pool")?;
    }

    let font = open_font(&args.font)?;

    let reader: Box<dyn BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let lines = parse_lines(reader)?;
    log::info!("Processing {} jobs", lines.len());

    let results: Vec<KernResult> = lines
        .par_iter()
        .map(|(line_num, job)| match job {
            Ok(job) => process_job(&font, job, *line_num),
            Err(e) => {
                log::error!("Line {line_num}: Failed to parse JSON: {e}");
                KernResult::error(line_num.to_string(), format!("invalid job: {e}"))
            }
        })
        .collect();

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    for result in &results {
        serde_json::to_writer(&mut handle, result).context("Failed to write JSON result")?;
        writeln!(&mut handle).context("Failed to write newline")?;
    }

    let failed = results.iter().filter(|r| r.status != "success").count();
    log::info!(
        "Completed {} jobs ({} failed) in {:.2}s",
        results.len(),
        failed,
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

/// Split input into numbered jobs, skipping blank lines
///
/// Lines that are not UTF-8 or not a valid job are kept as errors so they
/// still get a result. Only a failing reader stops the batch.
fn parse_lines(reader: impl BufRead) -> Result<Vec<ParsedLine>> {
    let mut lines = Vec::new();
    for (line_num, bytes) in reader.split(b'\n').enumerate() {
        let bytes = bytes.context("Failed to read job line")?;
        let job = match String::from_utf8(bytes) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => serde_json::from_str::<KernJob>(&line).map_err(|e| e.to_string()),
            Err(_) => Err("line is not valid UTF-8".to_string()),
        };
        lines.push((line_num + 1, job));
    }
    Ok(lines)
}

/// Solve one job against the shared font.
pub fn process_job<S: FontSource + ?Sized>(font: &S, job: &KernJob, line_num: usize) -> KernResult {
    let id = job.id.clone().unwrap_or_else(|| line_num.to_string());
    match determine_kern_detailed(font, &job.query()) {
        Ok(solution) => KernResult {
            id,
            status: "success".to_string(),
            kern: Some(solution.kern),
            distance: Some(solution.distance),
            error: None,
        },
        Err(e) => KernResult::error(id, e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphtools_core::geometry::rect_outline;
    use glyphtools_fontdb::{MemoryFont, MemoryGlyph};

    fn font() -> MemoryFont {
        MemoryFont::new()
            .with_glyph("H", MemoryGlyph::new(600.0, vec![rect_outline(50.0, 0.0, 550.0, 700.0)]))
            .with_glyph("I", MemoryGlyph::new(300.0, vec![rect_outline(50.0, 0.0, 250.0, 700.0)]))
            .with_glyph("space", MemoryGlyph::new(250.0, Vec::new()))
    }

    #[test]
    fn test_job_defaults() {
        let job: KernJob = serde_json::from_str(r#"{"left":"H","right":"I","distance":80}"#).unwrap();
        assert_eq!(job.id, None);
        assert_eq!(job.max_tuck, DEFAULT_MAX_TUCK);
        assert_eq!(job.query().params.offset_right, Vec2::ZERO);
    }

    #[test]
    fn test_process_job() {
        let job: KernJob =
            serde_json::from_str(r#"{"id":"HI","left":"H","right":"I","distance":80}"#).unwrap();
        let result = process_job(&font(), &job, 1);
        assert_eq!(result.id, "HI");
        assert_eq!(result.status, "success");
        assert_eq!(result.kern, Some(-20));
    }

    #[test]
    fn test_failed_job_reports_the_error() {
        let job: KernJob =
            serde_json::from_str(r#"{"left":"H","right":"space","distance":80}"#).unwrap();
        let result = process_job(&font(), &job, 7);
        assert_eq!(result.id, "7");
        assert_eq!(result.status, "error");
        assert!(result.error.unwrap().contains("space"));
    }

    #[test]
    fn test_bad_lines_become_errors() {
        let mut input = b"{\"left\":\"H\",\"right\":\"I\",\"distance\":80}\n".to_vec();
        input.extend_from_slice(b"\n");
        input.extend_from_slice(&[0xff, 0xfe, b'{', b'\n']);
        input.extend_from_slice(b"not json\r\n");

        let lines = parse_lines(io::Cursor::new(input)).unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].0, 1);
        assert!(lines[0].1.is_ok());
        assert_eq!(lines[1].0, 3);
        assert_eq!(lines[1].1.as_ref().unwrap_err(), "line is not valid UTF-8");
        assert_eq!(lines[2].0, 4);
        assert!(lines[2].1.is_err());
    }

    #[test]
    fn test_error_result_skips_empty_fields() {
        let json = serde_json::to_string(&KernResult::error("3", "boom")).unwrap();
        assert_eq!(json, r#"{"id":"3","status":"error","error":"boom"}"#);
    }
}
