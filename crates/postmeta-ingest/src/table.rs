//! In-memory post table and CSV serialization

use crate::error::{IngestError, Result};
use crate::post::Post;
use chrono::NaiveDate;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Output columns, in order
pub const COLUMNS: [&str; 9] = [
    "id",
    "likes",
    "comments",
    "timestamp",
    "caption",
    "hashtags",
    "pic_dim",
    "pic_url",
    "date",
];

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Append-only collection of posts, in insertion order
#[derive(Debug, Clone, Default)]
pub struct PostTable {
    posts: Vec<Post>,
}

/// A post as it appears in the output, with its derived columns
#[derive(Debug, Clone, Copy)]
pub struct PostRow<'a> {
    /// Dense 0-based position in the table
    pub index: usize,
    pub post: &'a Post,
    /// Calendar date of `post.timestamp`
    pub date: NaiveDate,
}

impl PostRow<'_> {
    fn to_record(self) -> [String; 9] {
        let post = self.post;
        [
            post.id.to_string(),
            post.likes.to_string(),
            post.comments.to_string(),
            post.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            post.caption.clone(),
            format_hashtags(&post.hashtags),
            post.pic_dim.to_string(),
            post.pic_url.clone(),
            self.date.format(DATE_FORMAT).to_string(),
        ]
    }
}

impl PostTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, post: Post) {
        self.posts.push(post);
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn rows(&self) -> impl Iterator<Item = PostRow<'_>> {
        self.posts.iter().enumerate().map(|(index, post)| PostRow {
            index,
            post,
            date: post.timestamp.date_naive(),
        })
    }

    /// Write the table to `path`, replacing any existing file
    ///
    /// The header row is always written, even for an empty table.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path).map_err(|e| IngestError::filesystem(path, e))?;
        self.write_csv_to(file).map_err(|source| IngestError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(path = %path.display(), rows = self.len(), "Wrote CSV");
        Ok(())
    }

    pub fn write_csv_to<W: Write>(&self, out: W) -> std::result::Result<(), csv::Error> {
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(out);

        writer.write_record(COLUMNS)?;
        for row in self.rows() {
            writer.write_record(row.to_record())?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// `['a', 'b']`, or `[]` when there are no hashtags
fn format_hashtags(hashtags: &[String]) -> String {
    let quoted: Vec<String> = hashtags.iter().map(|tag| format!("'{}'", tag)).collect();
    format!("[{}]", quoted.join(", "))
}
