use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::{multipart, Client};
use serde::Deserialize;
use thiserror::Error;

use crate::data::dataset::Dataset;
use crate::state::filter_state::TimeRange;

pub const DATA_PATH: &str = "/data";
pub const UPLOAD_PATH: &str = "/upload_csv";
/// Multipart field the backend reads the uploaded file from.
pub const UPLOAD_FIELD: &str = "csv_file";

/// Query parameters of one `/data` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataQuery {
    pub time_range: TimeRange,
    pub interval_secs: u32,
    pub num_segments: u32,
    pub segment_index: u32,
}

impl DataQuery {
    pub fn query_pairs(&self) -> [(&'static str, String); 4] {
        [
            ("time_range", self.time_range.token().to_string()),
            ("time_interval", self.interval_secs.to_string()),
            ("num_segments", self.num_segments.to_string()),
            ("segment_index", self.segment_index.to_string()),
        ]
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("HTTP error! status: {status}{}", detail(.message))]
    Status { status: u16, message: Option<String> },
    #[error("malformed response body: {0}")]
    Body(#[source] serde_json::Error),
    #[error("cannot read {}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not start request worker: {0}")]
    Worker(#[source] std::io::Error),
}

fn detail(message: &Option<String>) -> String {
    match message {
        Some(m) if !m.is_empty() => format!(" ({m})"),
        _ => String::new(),
    }
}

/// Body of a JSON error response from the backend.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Pull a readable message out of an error response body.
fn error_message(body: &[u8]) -> Option<String> {
    if let Ok(parsed) = serde_json::from_slice::<ErrorBody>(body) {
        return Some(parsed.error);
    }
    let text = String::from_utf8_lossy(body).trim().to_string();
    if text.is_empty() || text.starts_with('<') {
        None
    } else {
        Some(text)
    }
}

/// Where datasets come from. The dashboard only talks to this trait.
pub trait DataSource: Send + Sync {
    fn fetch(&self, query: &DataQuery) -> Result<Dataset, FetchError>;
    fn upload_csv(&self, path: &Path) -> Result<(), FetchError>;
}

/// `DataSource` backed by the dashboard's HTTP endpoints.
#[derive(Debug, Clone)]
pub struct HttpDataSource {
    client: Client,
    base_url: String,
}

impl HttpDataSource {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, FetchError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|source| FetchError::Transport {
            url: base_url.clone(),
            source,
        })?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl DataSource for HttpDataSource {
    fn fetch(&self, query: &DataQuery) -> Result<Dataset, FetchError> {
        let url = self.endpoint(DATA_PATH);
        let transport = |source| FetchError::Transport {
            url: url.clone(),
            source,
        };

        let response = self
            .client
            .get(&url)
            .query(&query.query_pairs())
            .send()
            .map_err(transport)?;
        let status = response.status();
        let body = response.bytes().map_err(transport)?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        Dataset::from_json_slice(&body).map_err(FetchError::Body)
    }

    fn upload_csv(&self, path: &Path) -> Result<(), FetchError> {
        let url = self.endpoint(UPLOAD_PATH);
        let form = multipart::Form::new()
            .file(UPLOAD_FIELD, path)
            .map_err(|source| FetchError::File {
                path: path.to_path_buf(),
                source,
            })?;

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .map_err(|source| FetchError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.bytes().unwrap_or_default();
        Err(FetchError::Status {
            status: status.as_u16(),
            message: error_message(&body),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread::JoinHandle;

    /// Answer exactly one HTTP request with `status` and `body`, returning
    /// the request head the client sent.
    fn one_shot_server(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = std::thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut head = String::new();
            let mut content_length = 0usize;
            let mut chunked = false;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                let lower = line.to_ascii_lowercase();
                if let Some(v) = lower.strip_prefix("content-length:") {
                    content_length = v.trim().parse().unwrap_or(0);
                }
                if lower.starts_with("transfer-encoding:") && lower.contains("chunked") {
                    chunked = true;
                }
                if line == "\r\n" || line.is_empty() {
                    break;
                }
                head.push_str(&line);
            }
            if chunked {
                loop {
                    let mut line = String::new();
                    if reader.read_line(&mut line).unwrap() == 0 || line == "0\r\n" {
                        break;
                    }
                    head.push_str(&line);
                }
            } else {
                let mut request_body = vec![0u8; content_length];
                reader.read_exact(&mut request_body).unwrap();
                head.push_str(&String::from_utf8_lossy(&request_body));
            }

            let mut stream = stream;
            write!(
                stream,
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )
            .unwrap();
            stream.flush().unwrap();
            head
        });
        (format!("http://{addr}"), handle)
    }

    fn query() -> DataQuery {
        DataQuery {
            time_range: TimeRange::SixHours,
            interval_secs: 60,
            num_segments: 4,
            segment_index: 2,
        }
    }

    #[test]
    fn test_query_pairs() {
        let pairs = query().query_pairs();
        assert_eq!(pairs[0], ("time_range", "6h".to_string()));
        assert_eq!(pairs[1], ("time_interval", "60".to_string()));
        assert_eq!(pairs[2], ("num_segments", "4".to_string()));
        assert_eq!(pairs[3], ("segment_index", "2".to_string()));
    }

    #[test]
    fn test_fetch_sends_all_filters_and_parses_rows() {
        let (base, server) = one_shot_server(
            "200 OK",
            r#"[{"Timestamp":"2024-01-01T00:00:00Z","ID":1,"Value":10,"Value_trend":9.5}]"#,
        );
        let source = HttpDataSource::new(&format!("{base}/"), None).unwrap();
        let dataset = source.fetch(&query()).unwrap();
        let head = server.join().unwrap();

        let request_line = head.lines().next().unwrap();
        assert_eq!(
            request_line,
            "GET /data?time_range=6h&time_interval=60&num_segments=4&segment_index=2 HTTP/1.1"
        );
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.first().unwrap().number("Value_trend"), Some(9.5));
    }

    #[test]
    fn test_fetch_maps_error_status() {
        let (base, server) = one_shot_server(
            "400 Bad Request",
            r#"{"error":"No CSV file has been uploaded yet."}"#,
        );
        let source = HttpDataSource::new(&base, None).unwrap();
        let err = source.fetch(&query()).unwrap_err();
        server.join().unwrap();

        match &err {
            FetchError::Status { status, message } => {
                assert_eq!(*status, 400);
                assert_eq!(message.as_deref(), Some("No CSV file has been uploaded yet."));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(
            err.to_string(),
            "HTTP error! status: 400 (No CSV file has been uploaded yet.)"
        );
    }

    #[test]
    fn test_fetch_rejects_malformed_body() {
        let (base, server) = one_shot_server("200 OK", "not json");
        let source = HttpDataSource::new(&base, None).unwrap();
        let err = source.fetch(&query()).unwrap_err();
        server.join().unwrap();
        assert!(matches!(err, FetchError::Body(_)));
    }

    #[test]
    fn test_fetch_reports_transport_failure() {
        // Bind then drop to get a port nothing listens on.
        let addr = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
        let source = HttpDataSource::new(&format!("http://{addr}"), None).unwrap();
        let err = source.fetch(&query()).unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
    }

    #[test]
    fn test_upload_posts_multipart_file() {
        let dir = std::env::temp_dir().join(format!("trendboard-upload-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("samples.csv");
        std::fs::write(&path, "Timestamp,Value\n2024-01-01 00:00:00,1\n").unwrap();

        let (base, server) = one_shot_server("200 OK", "");
        let source = HttpDataSource::new(&base, None).unwrap();
        source.upload_csv(&path).unwrap();
        let head = server.join().unwrap();

        assert!(head.starts_with("POST /upload_csv HTTP/1.1"));
        assert!(head.contains("name=\"csv_file\""));
        assert!(head.contains("filename=\"samples.csv\""));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_upload_missing_file() {
        let source = HttpDataSource::new("http://127.0.0.1:9", None).unwrap();
        let err = source
            .upload_csv(Path::new("/definitely/not/here.csv"))
            .unwrap_err();
        assert!(matches!(err, FetchError::File { .. }));
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(error_message(br#"{"error":"boom"}"#).as_deref(), Some("boom"));
        assert_eq!(error_message(b"Invalid file type.").as_deref(), Some("Invalid file type."));
        assert_eq!(error_message(b"<html></html>"), None);
        assert_eq!(error_message(b""), None);
    }
}
