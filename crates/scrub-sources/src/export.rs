//! Forum export reader.
//!
//! Reads a MongoDB extended-JSON export (`mongoexport`, one document per
//! line). The input may be a single file or a directory; directories are
//! scanned for `.json`, `.jsonl` and `.ndjson` files in sorted order.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use scrub_core::RawPost;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};
use walkdir::WalkDir;

use crate::handler::PostSource;
use crate::{Result, SourceError};

struct OpenFile {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
    line_num: usize,
}

pub struct ExportSource {
    pending: VecDeque<PathBuf>,
    current: Option<OpenFile>,
}

impl ExportSource {
    pub fn open(input: &Path) -> Result<Self> {
        let files = collect_files(input)?;
        tracing::info!("Reading forum export from {} file(s)", files.len());
        Ok(Self {
            pending: files.into(),
            current: None,
        })
    }
}

fn collect_files(input: &Path) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    if !input.is_dir() {
        return Err(SourceError::NotFound(input.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(input).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext == "json" || ext == "jsonl" || ext == "ndjson")
        {
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}

#[async_trait]
impl PostSource for ExportSource {
    fn name(&self) -> &'static str {
        "export"
    }

    async fn next_post(&mut self) -> Result<Option<RawPost>> {
        loop {
            if self.current.is_none() {
                let Some(path) = self.pending.pop_front() else {
                    return Ok(None);
                };
                tracing::debug!("Opening {}", path.display());
                let file = File::open(&path).await?;
                self.current = Some(OpenFile {
                    path,
                    lines: BufReader::new(file).lines(),
                    line_num: 0,
                });
            }

            let Some(open) = self.current.as_mut() else {
                continue;
            };
            match open.lines.next_line().await? {
                Some(line) => {
                    open.line_num += 1;
                    if line.trim().is_empty() {
                        continue;
                    }
                    let post = RawPost::from_json(&line).map_err(|source| SourceError::Malformed {
                        path: open.path.clone(),
                        line: open.line_num,
                        source,
                    })?;
                    return Ok(Some(post));
                }
                None => {
                    self.current = None;
                }
            }
        }
    }
}
