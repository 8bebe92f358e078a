use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What is being dragged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DragPayload {
    Link { url: String, title: String },
    Files { paths: Vec<PathBuf> },
    Fragment { text: String, html: String },
}

impl DragPayload {
    pub fn link(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self::Link {
            url: url.into(),
            title: title.into(),
        }
    }

    pub fn files<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self::Files {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    pub fn fragment(text: impl Into<String>, html: impl Into<String>) -> Self {
        Self::Fragment {
            text: text.into(),
            html: html.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_keep_order() {
        let p = DragPayload::files(["/b.txt", "/a.txt"]);
        let DragPayload::Files { paths } = p else {
            panic!("expected files");
        };
        assert_eq!(paths, vec![PathBuf::from("/b.txt"), PathBuf::from("/a.txt")]);
    }

    #[test]
    fn payload_serializes_tagged() {
        let json = serde_json::to_string(&DragPayload::link("https://x.test", "X")).unwrap();
        assert_eq!(json, r#"{"kind":"link","url":"https://x.test","title":"X"}"#);
    }
}
