// law_ingestor/src/source.rs
// Lazy record source over CSV and JSON Lines files.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use futures_util::Stream;
use futures_util::stream;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::error::{IngestorError, Result};
use crate::record::Record;

/// Records buffered between the reader thread and the orchestrator.
const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq,)]
enum SourceFormat {
    Csv,
    JsonLines,
}

impl SourceFormat {
    fn from_path(path: &Path,) -> Option<Self,> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(SourceFormat::Csv,),
            "jsonl" | "ndjson" => Some(SourceFormat::JsonLines,),
            _ => None,
        }
    }
}

/// An ordered set of input files, read one record at a time.
#[derive(Debug, Clone,)]
pub struct RecordSource {
    files: Vec<(PathBuf, SourceFormat,),>,
}

impl RecordSource {
    /// Resolves `path` to the files that will be read.
    ///
    /// Fails when the path does not exist or holds no supported files.
    pub fn open(path: &Path,) -> Result<Self,> {
        if !path.exists() {
            return Err(IngestorError::SourceError(format!(
                "input path {} does not exist",
                path.display()
            ),),);
        }

        let mut files = Vec::new();
        if path.is_file() {
            let format = SourceFormat::from_path(path,).ok_or_else(|| {
                IngestorError::SourceError(format!(
                    "unsupported input file {} (expected .csv, .jsonl or .ndjson)",
                    path.display()
                ),)
            },)?;
            files.push((path.to_path_buf(), format,),);
        } else {
            for entry in walkdir::WalkDir::new(path,)
                .follow_links(true,)
                .sort_by_file_name()
            {
                let entry = entry.map_err(|e| {
                    IngestorError::SourceError(format!(
                        "failed to walk {}: {}",
                        path.display(),
                        e
                    ),)
                },)?;
                if !entry.path().is_file() {
                    continue;
                }
                match SourceFormat::from_path(entry.path(),) {
                    Some(format,) => files.push((entry.path().to_path_buf(), format,),),
                    None => debug!(path = %entry.path().display(), "Ignoring unsupported file"),
                }
            }
        }

        if files.is_empty() {
            return Err(IngestorError::SourceError(format!(
                "no .csv or .jsonl files found under {}",
                path.display()
            ),),);
        }

        info!(files = files.len(), "Resolved record source");
        Ok(RecordSource { files, },)
    }

    pub fn files(&self,) -> impl Iterator<Item = &Path,> {
        self.files.iter().map(|(p, _,)| p.as_path(),)
    }

    /// Streams every record of every file in order.
    ///
    /// Reading happens on a blocking task that feeds a bounded channel, so
    /// only a handful of records are held in memory at any time.
    pub fn into_stream(self,) -> impl Stream<Item = Result<Record,>,> + Send + Unpin {
        record_stream(move |tx| {
            for (path, format,) in &self.files {
                info!(path = %path.display(), "Reading records");
                let sent = match format {
                    SourceFormat::Csv => read_csv(path, tx,),
                    SourceFormat::JsonLines => read_json_lines(path, tx,),
                };
                if !sent {
                    debug!("Record stream receiver dropped, stopping reader");
                    return;
                }
            }
        },)
    }
}

/// Runs `reader` on a blocking task and exposes what it sends as a stream.
///
/// If the reader dies abnormally the stream ends with a `SourceError` item
/// instead of just stopping early.
fn record_stream<F,>(reader: F,) -> impl Stream<Item = Result<Record,>,> + Send + Unpin
where
    F: FnOnce(&mpsc::Sender<Result<Record,>,>,) + Send + 'static,
{
    let (tx, rx,) = mpsc::channel(CHANNEL_CAPACITY,);

    let reader_tx = tx.clone();
    let handle = tokio::task::spawn_blocking(move || reader(&reader_tx,),);
    tokio::spawn(async move {
        if let Err(e,) = handle.await {
            error!(error = %e, "Record reader stopped unexpectedly");
            let _ = tx
                .send(Err(IngestorError::SourceError(format!(
                    "record reader stopped unexpectedly: {}",
                    e
                ),),),)
                .await;
        }
    },);

    Box::pin(stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|item| (item, rx,),)
    },),)
}

/// Returns false once the receiving side has gone away.
fn read_csv(path: &Path, tx: &mpsc::Sender<Result<Record,>,>,) -> bool {
    let mut reader = match csv::ReaderBuilder::new()
        .flexible(true,)
        .trim(csv::Trim::All,)
        .from_path(path,)
    {
        Ok(r,) => r,
        Err(e,) => return tx.blocking_send(Err(e.into(),),).is_ok(),
    };

    let headers = match reader.headers() {
        Ok(h,) => h.clone(),
        Err(e,) => return tx.blocking_send(Err(e.into(),),).is_ok(),
    };

    for row in reader.into_records() {
        let item = row.map_err(IngestorError::from,).map(|row| {
            headers
                .iter()
                .zip(row.iter(),)
                .map(|(h, v,)| (h.to_string(), v.to_string(),),)
                .collect::<Record>()
        },);
        if tx.blocking_send(item,).is_err() {
            return false;
        }
    }
    true
}

fn read_json_lines(path: &Path, tx: &mpsc::Sender<Result<Record,>,>,) -> bool {
    let file = match File::open(path,) {
        Ok(f,) => f,
        Err(e,) => return tx.blocking_send(Err(e.into(),),).is_ok(),
    };

    for (lineno, line,) in BufReader::new(file,).lines().enumerate() {
        let item = match line {
            Ok(line,) if line.trim().is_empty() => continue,
            Ok(line,) => parse_json_record(&line,).map_err(|e| {
                warn!(path = %path.display(), line = lineno + 1, error = %e, "Malformed JSON line");
                e
            },),
            Err(e,) => Err(e.into(),),
        };
        if tx.blocking_send(item,).is_err() {
            return false;
        }
    }
    true
}

/// Flattens one JSON object into string fields.
pub fn parse_json_record(line: &str,) -> Result<Record,> {
    let value: serde_json::Value = serde_json::from_str(line,)?;
    let obj = value.as_object().ok_or_else(|| {
        IngestorError::SourceError("JSON line is not an object".to_string(),)
    },)?;

    Ok(obj
        .iter()
        .filter_map(|(k, v,)| json_to_text(v,).map(|text| (k.clone(), text,),),)
        .collect(),)
}

fn json_to_text(value: &serde_json::Value,) -> Option<String,> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s,) => Some(s.clone(),),
        serde_json::Value::Bool(b,) => Some(b.to_string(),),
        serde_json::Value::Number(n,) => Some(n.to_string(),),
        serde_json::Value::Array(items,) => Some(
            items
                .iter()
                .filter_map(json_to_text,)
                .collect::<Vec<_,>>()
                .join(", ",),
        ),
        other => Some(other.to_string(),),
    }
}
