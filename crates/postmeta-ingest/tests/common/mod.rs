//! Shared fixtures for ingestion integration tests
#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use serde_json::{json, Value};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use xz2::write::XzEncoder;

pub const HEADER: &str = "id,likes,comments,timestamp,caption,hashtags,pic_dim,pic_url,date";

/// Temporary project with the standard `data/raw` layout and a `.env` marker
pub struct TestProject {
    pub dir: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("data").join("raw")).unwrap();
        std::fs::write(dir.path().join(".env"), "LOG_LEVEL=debug\n").unwrap();
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn raw_dir(&self) -> PathBuf {
        self.root().join("data").join("raw")
    }

    pub fn output_path(&self) -> PathBuf {
        self.root().join("data").join("processed").join("cattownposts.csv")
    }

    /// Write `document` xz-compressed as `data/raw/<name>`
    pub fn add_document(&self, name: &str, document: &Value) -> PathBuf {
        let path = self.raw_dir().join(name);
        std::fs::write(&path, xz_compress(document.to_string().as_bytes())).unwrap();
        path
    }

    pub fn add_raw_file(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.raw_dir().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    pub fn read_output(&self) -> String {
        std::fs::read_to_string(self.output_path()).unwrap()
    }

    pub fn output_records(&self) -> Vec<csv::StringRecord> {
        let mut reader = csv::Reader::from_path(self.output_path()).unwrap();
        reader.records().map(|r| r.unwrap()).collect()
    }
}

pub fn xz_compress(data: &[u8]) -> Vec<u8> {
    let mut encoder = XzEncoder::new(Vec::new(), 6);
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Instaloader document for a single post
pub fn post_document(id: u64, likes: u64, comments: u64, taken_at: i64, caption: Option<&str>) -> Value {
    let caption_edges = match caption {
        Some(text) => json!([ { "node": { "text": text } } ]),
        None => json!([]),
    };

    json!({
        "instaloader": { "node_type": "Post", "version": "4.5.2" },
        "node": {
            "__typename": "GraphImage",
            "id": id.to_string(),
            "shortcode": "CJabc123",
            "edge_media_preview_like": { "count": likes },
            "edge_media_to_comment": { "count": comments },
            "taken_at_timestamp": taken_at,
            "edge_media_to_caption": { "edges": caption_edges },
            "dimensions": { "height": 1080, "width": 1080 },
            "display_url": "http://x/y.jpg",
        }
    })
}

pub fn profile_document(username: &str) -> Value {
    json!({
        "instaloader": { "node_type": "Profile", "version": "4.5.2" },
        "node": { "username": username, "id": "123" }
    })
}
