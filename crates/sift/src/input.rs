//! Reading records from text and JSON-lines input.
//!
//! A record is one non-blank input line. Its searchable fields depend on the format:
//! the `lines` format uses the whole line, or the pieces between delimiters; the `jsonl`
//! format decodes the line as a JSON object and picks values out of it.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
    string::FromUtf8Error,
};

use serde::Serialize;
use serde_json::{Map, Value};
use sift_config::{InputFormat, InputSettings};
use thiserror::Error;
use tracing::trace;

/// Errors raised while reading records.
#[derive(Debug, Error)]
pub enum InputError {
    /// An input file could not be opened.
    #[error("failed to open {path}: {source}")]
    Open {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Reading a line failed.
    #[error("{name}:{line}: read failed: {source}")]
    Read {
        /// Input name.
        name: String,
        /// 1-based line number.
        line: usize,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A line is not valid UTF-8. Later lines are still read.
    #[error("{name}:{line}: invalid UTF-8: {source}")]
    Encoding {
        /// Input name.
        name: String,
        /// 1-based line number.
        line: usize,
        /// Underlying decode error.
        source: FromUtf8Error,
    },

    /// A `jsonl` line is not valid JSON.
    #[error("{name}:{line}: invalid JSON: {source}")]
    Json {
        /// Input name.
        name: String,
        /// 1-based line number.
        line: usize,
        /// Underlying decode error.
        source: serde_json::Error,
    },

    /// A `jsonl` line decoded to something other than an object.
    #[error("{name}:{line}: expected a JSON object")]
    NotObject {
        /// Input name.
        name: String,
        /// 1-based line number.
        line: usize,
    },
}

/// One input record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    /// Name of the input the record came from.
    pub source: String,
    /// 1-based line number within the input.
    pub line: usize,
    /// The line as read.
    pub text: String,
    /// Searchable fields extracted from the line.
    pub fields: Vec<String>,
}

/// Iterator over the records of one input stream.
pub struct Records<'a, R> {
    /// Underlying reader.
    reader: R,
    /// Input name used in records and errors.
    name: String,
    /// How lines become fields.
    settings: &'a InputSettings,
    /// Number of lines consumed so far.
    line: usize,
    /// Set after an I/O error; the stream yields nothing further.
    done: bool,
}

/// Opens a file for reading records.
pub fn open<'a>(
    path: &Path,
    settings: &'a InputSettings,
) -> Result<Records<'a, BufReader<File>>, InputError> {
    let file = File::open(path).map_err(|source| InputError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Records::new(
        BufReader::new(file),
        path.display().to_string(),
        settings,
    ))
}

impl<'a, R: BufRead> Records<'a, R> {
    /// Wraps a reader.
    pub fn new(reader: R, name: impl Into<String>, settings: &'a InputSettings) -> Self {
        Self {
            reader,
            name: name.into(),
            settings,
            line: 0,
            done: false,
        }
    }

    /// Returns the input name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reads the next raw line without its `\n` or `\r\n` terminator.
    fn read_line(&mut self) -> Option<io::Result<Vec<u8>>> {
        let mut buf = Vec::new();
        match self.reader.read_until(b'\n', &mut buf) {
            Ok(0) => None,
            Ok(_) => {
                if buf.last() == Some(&b'\n') {
                    buf.pop();
                    if buf.last() == Some(&b'\r') {
                        buf.pop();
                    }
                }
                Some(Ok(buf))
            }
            Err(e) => Some(Err(e)),
        }
    }

    /// Extracts fields from one line according to the input settings.
    fn fields(&self, text: &str) -> Result<Vec<String>, InputError> {
        match self.settings.format {
            InputFormat::Lines => Ok(split_line(text, self.settings.delimiter.as_deref())),
            InputFormat::Jsonl => {
                let value: Value =
                    serde_json::from_str(text).map_err(|source| InputError::Json {
                        name: self.name.clone(),
                        line: self.line,
                        source,
                    })?;
                let Value::Object(object) = value else {
                    return Err(InputError::NotObject {
                        name: self.name.clone(),
                        line: self.line,
                    });
                };
                Ok(json_fields(&object, &self.settings.fields))
            }
        }
    }
}

impl<R: BufRead> Iterator for Records<'_, R> {
    type Item = Result<Record, InputError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let next = self.read_line()?;
            self.line += 1;

            let bytes = match next {
                Ok(bytes) => bytes,
                Err(source) => {
                    self.done = true;
                    return Some(Err(InputError::Read {
                        name: self.name.clone(),
                        line: self.line,
                        source,
                    }));
                }
            };
            let text = match String::from_utf8(bytes) {
                Ok(text) => text,
                Err(source) => {
                    return Some(Err(InputError::Encoding {
                        name: self.name.clone(),
                        line: self.line,
                        source,
                    }));
                }
            };

            if text.trim().is_empty() {
                trace!(name = %self.name, line = self.line, "skipping blank line");
                continue;
            }

            return Some(self.fields(&text).map(|fields| Record {
                source: self.name.clone(),
                line: self.line,
                text,
                fields,
            }));
        }
    }
}

/// Splits a line into fields. No delimiter, or an empty one, keeps the line whole.
pub fn split_line(line: &str, delimiter: Option<&str>) -> Vec<String> {
    match delimiter {
        Some(delimiter) if !delimiter.is_empty() => {
            line.split(delimiter).map(str::to_string).collect()
        }
        _ => vec![line.to_string()],
    }
}

/// Collects searchable fields from a decoded JSON object.
///
/// With `keys`, each named value contributes: strings as-is, numbers and booleans
/// rendered, arrays flattened one level. Without keys, every top-level string value is
/// used.
pub fn json_fields(object: &Map<String, Value>, keys: &[String]) -> Vec<String> {
    let mut fields = Vec::new();
    if keys.is_empty() {
        fields.extend(object.values().filter_map(|v| v.as_str().map(str::to_string)));
        return fields;
    }

    for key in keys {
        match object.get(key) {
            Some(Value::Array(items)) => {
                for item in items {
                    push_scalar(item, &mut fields);
                }
            }
            Some(value) => push_scalar(value, &mut fields),
            None => {}
        }
    }
    fields
}

/// Pushes the text of a scalar JSON value; nulls and containers are skipped.
fn push_scalar(value: &Value, fields: &mut Vec<String>) {
    match value {
        Value::String(s) => fields.push(s.clone()),
        Value::Number(n) => fields.push(n.to_string()),
        Value::Bool(b) => fields.push(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use std::{
        fs,
        io::{Cursor, Read},
    };

    use serde_json::json;

    use super::*;

    fn lines_settings(delimiter: Option<&str>) -> InputSettings {
        InputSettings {
            delimiter: delimiter.map(str::to_string),
            ..Default::default()
        }
    }

    fn jsonl_settings(fields: &[&str]) -> InputSettings {
        InputSettings {
            format: InputFormat::Jsonl,
            delimiter: None,
            fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn split_line_without_delimiter() {
        assert_eq!(split_line("a\tb", None), vec!["a\tb"]);
        assert_eq!(split_line("a\tb", Some("")), vec!["a\tb"]);
    }

    #[test]
    fn split_line_with_delimiter() {
        assert_eq!(split_line("a\tb\t", Some("\t")), vec!["a", "b", ""]);
        assert_eq!(split_line("x::y", Some("::")), vec!["x", "y"]);
    }

    #[test]
    fn json_fields_all_strings_by_default() {
        let obj = object(json!({"title": "Rust", "count": 3, "body": "async"}));
        let mut fields = json_fields(&obj, &[]);
        fields.sort();
        assert_eq!(fields, vec!["Rust", "async"]);
    }

    #[test]
    fn json_fields_selected_keys() {
        let obj = object(json!({
            "title": "Guide",
            "stars": 42,
            "draft": false,
            "tags": ["rust", "cli", 7, {"nested": "skip"}],
            "meta": {"author": "skip"},
            "gone": null,
        }));
        let keys: Vec<String> = ["title", "stars", "draft", "tags", "meta", "gone", "missing"]
            .iter()
            .map(|k| k.to_string())
            .collect();
        assert_eq!(
            json_fields(&obj, &keys),
            vec!["Guide", "42", "false", "rust", "cli", "7"]
        );
    }

    #[test]
    fn records_from_lines() {
        let settings = lines_settings(None);
        let input = Cursor::new("first\n\n  \nsecond\r\n");
        let records: Vec<Record> = Records::new(input, "mem", &settings)
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].line, 1);
        assert_eq!(records[0].fields, vec!["first"]);
        assert_eq!(records[1].line, 4);
        assert_eq!(records[1].text, "second");
        assert_eq!(records[1].source, "mem");
    }

    #[test]
    fn records_from_delimited_lines() {
        let settings = lines_settings(Some(","));
        let input = Cursor::new("a,b\n");
        let record = Records::new(input, "mem", &settings).next().unwrap().unwrap();
        assert_eq!(record.fields, vec!["a", "b"]);
        assert_eq!(record.text, "a,b");
    }

    #[test]
    fn records_from_jsonl() {
        let settings = jsonl_settings(&["title"]);
        let input = Cursor::new("{\"title\":\"One\",\"body\":\"x\"}\n{\"title\":\"Two\"}\n");
        let records: Vec<Record> = Records::new(input, "data.jsonl", &settings)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(records[0].fields, vec!["One"]);
        assert_eq!(records[1].fields, vec!["Two"]);
        assert_eq!(records[1].line, 2);
    }

    #[test]
    fn invalid_json_names_file_and_line() {
        let settings = jsonl_settings(&[]);
        let input = Cursor::new("{\"a\":\"b\"}\nnot json\n{\"c\":\"d\"}\n");
        let results: Vec<_> = Records::new(input, "data.jsonl", &settings).collect();

        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        let err = results[1].as_ref().unwrap_err();
        assert!(matches!(err, InputError::Json { line: 2, .. }));
        assert!(err.to_string().starts_with("data.jsonl:2:"));
        assert!(results[2].is_ok());
    }

    #[test]
    fn invalid_utf8_line_does_not_end_the_stream() {
        let settings = lines_settings(None);
        let input = Cursor::new(b"alpha\n\xff\xfe bad\nbeta\r\ngamma".to_vec());
        let results: Vec<_> = Records::new(input, "mem", &settings).collect();

        assert_eq!(results.len(), 4);
        let err = results[1].as_ref().unwrap_err();
        assert!(matches!(err, InputError::Encoding { line: 2, .. }));
        assert!(err.to_string().starts_with("mem:2:"));
        let texts: Vec<&str> = results
            .iter()
            .filter_map(|r| r.as_ref().ok())
            .map(|r| r.text.as_str())
            .collect();
        assert_eq!(texts, vec!["alpha", "beta", "gamma"]);
        assert_eq!(results[3].as_ref().unwrap().line, 4);
    }

    /// Reader whose every read fails.
    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("disk gone"))
        }
    }

    #[test]
    fn io_error_ends_the_stream() {
        let settings = lines_settings(None);
        let mut records = Records::new(BufReader::new(FailingReader), "broken", &settings);

        let err = records.next().unwrap().unwrap_err();
        assert!(matches!(err, InputError::Read { line: 1, .. }));
        assert!(records.next().is_none());
    }

    #[test]
    fn non_object_json_is_rejected() {
        let settings = jsonl_settings(&[]);
        let input = Cursor::new("[1, 2]\n");
        let err = Records::new(input, "arr", &settings).next().unwrap().unwrap_err();
        assert!(matches!(err, InputError::NotObject { line: 1, .. }));
    }

    #[test]
    fn open_missing_file() {
        let settings = InputSettings::default();
        let err = open(Path::new("/no/such/file.txt"), &settings)
            .err()
            .unwrap();
        assert!(matches!(err, InputError::Open { .. }));
        assert!(err.to_string().contains("/no/such/file.txt"));
    }

    #[test]
    fn open_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.txt");
        fs::write(&path, "alpha\nbeta\n").unwrap();

        let settings = InputSettings::default();
        let records = open(&path, &settings).unwrap();
        assert!(records.name().ends_with("records.txt"));
        assert_eq!(records.count(), 2);
    }
}
