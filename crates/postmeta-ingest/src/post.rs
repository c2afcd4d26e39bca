//! Post record extraction
//!
//! Instaloader documents look like:
//!
//! ```text
//! {
//!   "instaloader": { "node_type": "Post", ... },
//!   "node": {
//!     "id": "2481234567890123456",
//!     "edge_media_preview_like": { "count": 10 },
//!     "edge_media_to_comment": { "count": 3 },
//!     "taken_at_timestamp": 1609459200,
//!     "edge_media_to_caption": { "edges": [ { "node": { "text": "Happy #newyear" } } ] },
//!     "dimensions": { "height": 1080, "width": 1080 },
//!     "display_url": "https://..."
//!   }
//! }
//! ```
//!
//! Only `Post` documents become records; other node types are skipped.

use crate::error::{IngestError, Result};
use chrono::{DateTime, Local, TimeZone};
use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;

/// `instaloader.node_type` value for single posts
pub const POST_NODE_TYPE: &str = "Post";

const NODE_TYPE_POINTER: &str = "/instaloader/node_type";
const CAPTION_POINTER: &str = "/edge_media_to_caption/edges/0/node/text";

#[allow(clippy::expect_used)]
static HASHTAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#(\w+)").expect("hashtag pattern compiles"));

/// `dimensions` of the first picture, kept exactly as the source wrote it
///
/// Displays as a Python-style literal in source key order, e.g.
/// `{'height': 1080, 'width': 1080}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dimensions(pub Value);

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_literal(f, &self.0)
    }
}

fn write_literal(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    match value {
        Value::Null => f.write_str("None"),
        Value::Bool(true) => f.write_str("True"),
        Value::Bool(false) => f.write_str("False"),
        Value::Number(n) => write!(f, "{}", n),
        Value::String(s) => write_quoted(f, s),
        Value::Array(items) => {
            f.write_str("[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_literal(f, item)?;
            }
            f.write_str("]")
        },
        Value::Object(map) => {
            f.write_str("{")?;
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_quoted(f, key)?;
                f.write_str(": ")?;
                write_literal(f, item)?;
            }
            f.write_str("}")
        },
    }
}

/// Single quotes, or double quotes when the text holds only single quotes
fn write_quoted(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    let quote = if text.contains('\'') && !text.contains('"') { '"' } else { '\'' };
    write!(f, "{}", quote)?;
    for c in text.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if c == quote => write!(f, "\\{}", c)?,
            c => write!(f, "{}", c)?,
        }
    }
    write!(f, "{}", quote)
}

/// One Instagram post
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: u64,
    pub likes: u64,
    pub comments: u64,
    /// `taken_at_timestamp` in the process-local time zone
    pub timestamp: DateTime<Local>,
    /// Empty when the document carries no caption
    pub caption: String,
    /// `#word` tokens of the caption, in order, duplicates kept
    pub hashtags: Vec<String>,
    pub pic_dim: Dimensions,
    /// URL of the first picture or video
    pub pic_url: String,
}

impl Post {
    /// Extract a post from a full metadata document
    ///
    /// Returns `Ok(None)` for documents of any other node type.
    pub fn from_document(document: &Value) -> Result<Option<Self>> {
        let node_type = lookup(document, NODE_TYPE_POINTER)?
            .as_str()
            .ok_or_else(|| IngestError::field(field_name(NODE_TYPE_POINTER), "is not a string"))?;

        if node_type != POST_NODE_TYPE {
            debug!(node_type, "Skipping non-post document");
            return Ok(None);
        }

        let node = lookup(document, "/node")?;
        if !node.is_object() {
            return Err(IngestError::field("node", "is not an object"));
        }

        Self::from_node(node).map(Some)
    }

    /// Extract a post from the `node` mapping
    pub fn from_node(node: &Value) -> Result<Self> {
        let id = count_field(node, "/id")?;
        let likes = count_field(node, "/edge_media_preview_like/count")?;
        let comments = count_field(node, "/edge_media_to_comment/count")?;
        let timestamp = local_timestamp(epoch_field(node, "/taken_at_timestamp")?)?;

        let caption = caption_text(node).unwrap_or_default().to_string();
        let hashtags = extract_hashtags(&caption);

        let pic_dim = Dimensions(lookup(node, "/dimensions")?.clone());

        let pic_url = lookup(node, "/display_url")?
            .as_str()
            .ok_or_else(|| IngestError::field("display_url", "is not a string"))?
            .to_string();

        Ok(Self {
            id,
            likes,
            comments,
            timestamp,
            caption,
            hashtags,
            pic_dim,
            pic_url,
        })
    }
}

/// Caption of the first caption edge, if the document has one
pub fn caption_text(node: &Value) -> Option<&str> {
    node.pointer(CAPTION_POINTER).and_then(Value::as_str)
}

/// Words following a `#`, in order of appearance
pub fn extract_hashtags(caption: &str) -> Vec<String> {
    HASHTAG_PATTERN
        .captures_iter(caption)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

fn lookup<'a>(value: &'a Value, pointer: &str) -> Result<&'a Value> {
    value
        .pointer(pointer)
        .ok_or_else(|| IngestError::field(field_name(pointer), "is missing"))
}

/// `/a/b/c` -> `a.b.c`
fn field_name(pointer: &str) -> String {
    pointer.trim_start_matches('/').replace('/', ".")
}

/// Integer given as a JSON integer, an integral float (`42.0`) or a decimal string
fn as_integer(value: &Value) -> Option<i128> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .map(i128::from)
            .or_else(|| n.as_u64().map(i128::from))
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && f.fract() == 0.0)
                    .map(|f| f as i128)
            }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn count_field(node: &Value, pointer: &str) -> Result<u64> {
    let value = lookup(node, pointer)?;
    as_integer(value)
        .and_then(|n| u64::try_from(n).ok())
        .ok_or_else(|| {
            IngestError::field(field_name(pointer), format!("is not a non-negative integer: {}", value))
        })
}

fn epoch_field(node: &Value, pointer: &str) -> Result<i64> {
    let value = lookup(node, pointer)?;
    as_integer(value)
        .and_then(|n| i64::try_from(n).ok())
        .ok_or_else(|| {
            IngestError::field(field_name(pointer), format!("is not an integer epoch: {}", value))
        })
}

fn local_timestamp(epoch: i64) -> Result<DateTime<Local>> {
    Local
        .timestamp_opt(epoch, 0)
        .earliest()
        .ok_or_else(|| IngestError::field("taken_at_timestamp", format!("is out of range: {}", epoch)))
}
