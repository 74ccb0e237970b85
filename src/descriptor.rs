//! Run descriptors: the persisted settings for one generation run.
//!
//! A descriptor is a flat JSON object:
//!
//! ```json
//! {"site": "air-jordans/air-jordan-1", "dir": "./out/", "exclude_list": ["retro"], "start": 1}
//! ```
//!
//! `site` is appended to the configured base URL (absolute URLs are used as
//! they are), `dir` receives the `<n>.json` files, `exclude_list` holds
//! case-insensitive regular expressions, and `start` is the first file number.

use crate::filters::{ExclusionFilter, TagError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Required keys, in the order they are checked.
pub const REQUIRED_FIELDS: [&str; 4] = ["site", "dir", "exclude_list", "start"];

/// Output directory used when `dir` is empty.
pub const CURRENT_DIR: &str = "./";

/// Errors raised while loading, validating, or building a descriptor.
#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("Missing {0} value")]
    MissingField(&'static str),

    #[error("Descriptor JSON should be an object ( {{}} )")]
    NotAnObject,

    #[error("Malformed descriptor: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Failed to access descriptor {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid exclude tag list: {0}")]
    InvalidTagList(String),

    #[error(transparent)]
    InvalidTag(#[from] TagError),
}

/// Settings for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunDescriptor {
    /// Catalog path (or absolute URL)
    pub site: String,
    /// Output directory for the numbered files
    pub dir: String,
    /// Exclude tags, case-insensitive regular expressions
    pub exclude_list: Vec<String>,
    /// First file number
    pub start: NonZeroU32,
}

impl RunDescriptor {
    /// Creates a descriptor, normalizing an empty `dir` to the current directory.
    pub fn new(
        site: impl Into<String>,
        dir: impl Into<String>,
        exclude_list: Vec<String>,
        start: NonZeroU32,
    ) -> Self {
        let dir = dir.into();
        let dir = if dir.trim().is_empty() { CURRENT_DIR.to_string() } else { dir };
        Self { site: site.into(), dir, exclude_list, start }
    }

    /// Validates a decoded JSON value.
    ///
    /// Reports the first missing key in `site`, `dir`, `exclude_list`,
    /// `start` order. Values are not coerced: a wrong type is malformed input.
    pub fn validate(value: Value) -> Result<Self, DescriptorError> {
        let object = value.as_object().ok_or(DescriptorError::NotAnObject)?;

        if let Some(missing) = REQUIRED_FIELDS.iter().find(|field| !object.contains_key(**field)) {
            return Err(DescriptorError::MissingField(*missing));
        }

        Ok(serde_json::from_value(value)?)
    }

    /// Decodes and validates descriptor JSON text.
    pub fn from_json(text: &str) -> Result<Self, DescriptorError> {
        Self::validate(serde_json::from_str(text)?)
    }

    /// Loads and validates a descriptor file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DescriptorError> {
        let path = path.as_ref();
        debug!("Loading descriptor from: {}", path.display());

        let text = std::fs::read_to_string(path)
            .map_err(|source| DescriptorError::Io { path: path.to_path_buf(), source })?;

        let descriptor = Self::from_json(&text)?;
        debug!("Loaded descriptor: {:?}", descriptor);
        Ok(descriptor)
    }

    /// Writes the descriptor as a flat JSON object, replacing any existing file.
    pub fn persist(&self, path: impl AsRef<Path>) -> Result<(), DescriptorError> {
        let path = path.as_ref();
        let json = serde_json::to_string(self)?;

        std::fs::write(path, json)
            .map_err(|source| DescriptorError::Io { path: path.to_path_buf(), source })?;

        debug!("Wrote descriptor to: {}", path.display());
        Ok(())
    }

    /// Directory the numbered files are written to.
    pub fn output_dir(&self) -> PathBuf {
        if self.dir.trim().is_empty() {
            PathBuf::from(CURRENT_DIR)
        } else {
            PathBuf::from(&self.dir)
        }
    }

    /// Compiles the exclude tags.
    pub fn exclusion_filter(&self) -> Result<ExclusionFilter, DescriptorError> {
        Ok(ExclusionFilter::new(&self.exclude_list)?)
    }
}

/// Parses a typed list of quoted tags such as `'retro', "low"`.
///
/// Surrounding brackets are optional and a trailing comma is allowed. Both
/// quote styles work; inside a tag, `\\` and an escaped quote are unescaped
/// and any other backslash is kept so regex escapes survive. Anything else
/// is rejected; the input is never evaluated.
pub fn parse_tag_list(input: &str) -> Result<Vec<String>, DescriptorError> {
    let trimmed = input.trim();
    let body = match (trimmed.strip_prefix('['), trimmed.ends_with(']')) {
        (Some(rest), true) => &rest[..rest.len() - 1],
        (None, false) => trimmed,
        _ => return Err(DescriptorError::InvalidTagList("unbalanced brackets".to_string())),
    };

    let mut tags = Vec::new();
    let mut chars = body.char_indices().peekable();

    loop {
        while chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}

        let Some((pos, quote)) = chars.next() else {
            break;
        };
        if quote != '\'' && quote != '"' {
            return Err(DescriptorError::InvalidTagList(format!(
                "expected a quoted tag at position {}, found '{}'",
                pos, quote
            )));
        }

        let mut tag = String::new();
        let mut closed = false;
        while let Some((_, c)) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some((_, next)) if next == quote || next == '\\' => tag.push(next),
                    Some((_, next)) => {
                        tag.push('\\');
                        tag.push(next);
                    }
                    None => break,
                },
                c if c == quote => {
                    closed = true;
                    break;
                }
                c => tag.push(c),
            }
        }

        if !closed {
            return Err(DescriptorError::InvalidTagList(format!(
                "unterminated tag starting at position {}",
                pos
            )));
        }
        if tag.is_empty() {
            return Err(DescriptorError::InvalidTagList(
                "empty tag would exclude every shoe".to_string(),
            ));
        }
        tags.push(tag);

        while chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}

        match chars.next() {
            None => break,
            Some((_, ',')) => continue,
            Some((pos, c)) => {
                return Err(DescriptorError::InvalidTagList(format!(
                    "expected ',' at position {}, found '{}'",
                    pos, c
                )));
            }
        }
    }

    Ok(tags)
}
