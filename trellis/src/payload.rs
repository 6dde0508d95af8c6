//! Drag-and-drop payloads.

use std::path::PathBuf;

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::primitives::Point;

pub const URI_LIST: &str = "text/uri-list";
pub const PLAIN_TEXT: &str = "text/plain";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadData {
    Text(String),
    Binary(Vec<u8>),
}

/// MIME type to data, in the order the host offered them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payload {
    entries: IndexMap<String, PayloadData>,
}

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, mime: impl Into<String>, text: impl Into<String>) -> Self {
        self.entries.insert(mime.into(), PayloadData::Text(text.into()));
        self
    }

    pub fn binary(mut self, mime: impl Into<String>, data: Vec<u8>) -> Self {
        self.entries.insert(mime.into(), PayloadData::Binary(data));
        self
    }

    pub fn get(&self, mime: &str) -> Option<&PayloadData> {
        self.entries.get(mime)
    }

    pub fn mime_types(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Local file paths from a `text/uri-list` entry.
    pub fn file_paths(&self) -> Result<Vec<PathBuf>> {
        let Some(PayloadData::Text(list)) = self.entries.get(URI_LIST) else {
            return Err(Error::UnknownMime(URI_LIST.to_owned()));
        };
        Ok(list
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| {
                let path = line.strip_prefix("file://").unwrap_or(line);
                let bytes = urlencoding::decode_binary(path.as_bytes());
                PathBuf::from(String::from_utf8_lossy(&bytes).into_owned())
            })
            .collect())
    }
}

/// A drop in progress or being delivered.
#[derive(Debug, Clone, PartialEq)]
pub struct DropInfo {
    pub payload: Payload,
    pub position: Point,
}

impl DropInfo {
    pub fn new(payload: Payload, position: Point) -> Self {
        Self { payload, position }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uri_list_yields_paths() {
        let payload = Payload::new().text(
            URI_LIST,
            "# comment\r\nfile:///tmp/a%20b.txt\r\nfile:///home/x/y.png\r\n",
        );
        assert_eq!(
            payload.file_paths().unwrap(),
            vec![PathBuf::from("/tmp/a b.txt"), PathBuf::from("/home/x/y.png")]
        );
    }

    #[test]
    fn escaped_bytes_decode_to_utf8() {
        let payload = Payload::new().text(URI_LIST, "file:///tmp/caf%C3%A9%2Bnotes%zz.txt\n");
        assert_eq!(
            payload.file_paths().unwrap(),
            vec![PathBuf::from("/tmp/café+notes%zz.txt")]
        );
    }

    #[test]
    fn missing_uri_list_is_unknown_mime() {
        let payload = Payload::new().text(PLAIN_TEXT, "hello");
        assert!(matches!(payload.file_paths(), Err(Error::UnknownMime(m)) if m == URI_LIST));
    }

    #[test]
    fn keeps_offer_order() {
        let payload = Payload::new()
            .text(PLAIN_TEXT, "x")
            .binary("image/png", vec![1, 2, 3])
            .text(URI_LIST, "");
        let mimes: Vec<_> = payload.mime_types().collect();
        assert_eq!(mimes, vec![PLAIN_TEXT, "image/png", URI_LIST]);
    }
}
