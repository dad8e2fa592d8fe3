//! Line-oriented JSON request adapter.
//!
//! Each input line is one request object carrying an `action`:
//!
//! - `{"action": "list_files"}` → `{"files": [...]}`
//! - `{"action": "predict_column", "file": F, "column": C}` → `{"label": .., "scores": {..}}`
//! - `{"action": "parse_file", "file": F}` → `{"output_file": path}`
//!
//! Files are resolved inside the data directory. Failures never end the loop;
//! they are answered with `{"error": message}`.

use std::{
    fs,
    io::{BufRead, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use encoding_rs::UTF_8;
use log::{info, warn};
use serde_json::{Value, json};

use crate::{
    classify::{Classifier, ColumnClassification},
    cli::ServeArgs,
    error::LookupError,
    io_utils,
    process::{self, FileOptions},
    table::Table,
};

pub const UNKNOWN_ACTION: &str = "Unknown action";

pub struct RequestHandler {
    data_dir: PathBuf,
    classifier: Classifier,
}

impl RequestHandler {
    pub fn new(data_dir: impl Into<PathBuf>, classifier: Classifier) -> Self {
        Self {
            data_dir: data_dir.into(),
            classifier,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// CSV files in the data directory, sorted by name.
    pub fn list_files(&self) -> Result<Vec<String>> {
        if !self.data_dir.is_dir() {
            return Err(LookupError::DataDirNotFound(self.data_dir.clone()).into());
        }
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.data_dir)
            .with_context(|| format!("Listing {:?}", self.data_dir))?
        {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.to_lowercase().ends_with(".csv") {
                files.push(name);
            }
        }
        files.sort();
        Ok(files)
    }

    fn resolve_file(&self, file: &str) -> Result<PathBuf> {
        let path = self.data_dir.join(file);
        if !path.exists() {
            return Err(LookupError::InputNotFound(path).into());
        }
        Ok(path)
    }

    pub fn predict_column(&self, file: &str, column: &str) -> Result<ColumnClassification> {
        let path = self.resolve_file(file)?;
        let delimiter = io_utils::resolve_input_delimiter(&path, None);
        let table = Table::read(&path, delimiter, UTF_8)?;
        let values = table.require_column(column)?;
        self.classifier.classify_column(values, &self.data_dir)
    }

    pub fn parse_file(&self, file: &str) -> Result<PathBuf> {
        let path = self.resolve_file(file)?;
        process::process_file(
            &path,
            &self.data_dir,
            None,
            &self.classifier,
            &FileOptions::default(),
        )
    }

    fn dispatch(&self, request: &Value) -> Result<Value> {
        let action = request.get("action").and_then(Value::as_str);
        let response = match action {
            Some("list_files") => json!({ "files": self.list_files()? }),
            Some("predict_column") => {
                let file = required_str(request, "file")?;
                let column = required_str(request, "column")?;
                serde_json::to_value(self.predict_column(file, column)?)?
            }
            Some("parse_file") => {
                let file = required_str(request, "file")?;
                let output = self.parse_file(file)?;
                json!({ "output_file": output.display().to_string() })
            }
            _ => json!({ "error": UNKNOWN_ACTION }),
        };
        Ok(response)
    }

    pub fn handle(&self, request: &Value) -> Value {
        self.dispatch(request).unwrap_or_else(|err| {
            warn!("Request failed: {err:#}");
            json!({ "error": format!("{err:#}") })
        })
    }

    pub fn handle_line(&self, line: &str) -> Value {
        match serde_json::from_str::<Value>(line) {
            Ok(request) => self.handle(&request),
            Err(err) => json!({ "error": err.to_string() }),
        }
    }
}

fn required_str<'a>(request: &'a Value, key: &'static str) -> Result<&'a str> {
    request
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| LookupError::MissingParameter(key).into())
}

/// Answers every non-blank line of `reader` with one JSON line on `writer`.
pub fn serve<R, W>(handler: &RequestHandler, reader: R, mut writer: W) -> Result<()>
where
    R: BufRead,
    W: Write,
{
    for line in reader.lines() {
        let line = line.context("Reading request line")?;
        if line.trim().is_empty() {
            continue;
        }
        let response = handler.handle_line(&line);
        serde_json::to_writer(&mut writer, &response).context("Writing response")?;
        writer.write_all(b"\n").context("Writing response")?;
        writer.flush().context("Flushing response")?;
    }
    Ok(())
}

pub fn execute(args: &ServeArgs, classifier: Classifier) -> Result<()> {
    info!(
        "Serving requests for data directory {:?}. Listening for JSON requests on stdin",
        args.data_dir
    );
    let handler = RequestHandler::new(args.data_dir.clone(), classifier);
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    serve(&handler, stdin.lock(), stdout.lock())
}
