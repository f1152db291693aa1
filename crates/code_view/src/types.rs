use std::{
    borrow::Cow,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

pub type StackFrameId = i64;
pub type SourceReference = i64;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub name: Option<String>,
    pub path: Option<PathBuf>,
    pub source_reference: Option<SourceReference>,
}

/// A stack frame as reported by the debug adapter
///
/// `line` and `column` are 1-based. Some adapters report a column of 0 when they have no
/// column information.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StackFrame {
    #[serde(default)]
    pub id: StackFrameId,
    #[serde(default)]
    pub name: String,
    pub source: Option<Source>,
    #[serde(default)]
    pub line: usize,
    #[serde(default)]
    pub column: usize,
}

impl StackFrame {
    /// The source path of this frame, if it has one
    pub fn path(&self) -> Option<&Path> {
        self.source
            .as_ref()
            .and_then(|source| source.path.as_deref())
            .filter(|path| !path.as_os_str().is_empty())
    }
}

/// Where the editor cursor should land for a frame
///
/// Lines stay 1-based but the column is 0-based, which is what the editor expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub path: PathBuf,
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    /// Translate a frame into an editor location, or `None` for frames without a source path
    pub fn from_frame(frame: &StackFrame) -> Option<Self> {
        let path = frame.path()?;
        Some(Self {
            path: expand_home(path).into_owned(),
            line: frame.line,
            column: frame.column.saturating_sub(1),
        })
    }
}

fn expand_home(path: &Path) -> Cow<'_, Path> {
    let Ok(rest) = path.strip_prefix("~") else {
        return Cow::Borrowed(path);
    };
    match dirs::home_dir() {
        Some(home) => Cow::Owned(home.join(rest)),
        None => {
            tracing::warn!(path = %path.display(), "no home directory to expand");
            Cow::Borrowed(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn frame(path: Option<&str>, line: usize, column: usize) -> StackFrame {
        StackFrame {
            source: Some(Source {
                path: path.map(PathBuf::from),
                ..Default::default()
            }),
            line,
            column,
            ..Default::default()
        }
    }

    #[rstest]
    #[case(5, 4)]
    #[case(1, 0)]
    #[case(0, 0)]
    #[case(120, 119)]
    fn column_becomes_zero_based(#[case] reported: usize, #[case] expected: usize) {
        let location = SourceLocation::from_frame(&frame(Some("/tmp/a.py"), 10, reported)).unwrap();
        assert_eq!(location.column, expected);
        assert_eq!(location.line, 10);
    }

    #[test]
    fn frames_without_path_have_no_location() {
        assert_eq!(SourceLocation::from_frame(&frame(None, 1, 1)), None);
        assert_eq!(SourceLocation::from_frame(&frame(Some(""), 1, 1)), None);

        let no_source = StackFrame {
            line: 3,
            ..Default::default()
        };
        assert_eq!(SourceLocation::from_frame(&no_source), None);
    }

    #[test]
    fn tilde_expands_to_home() {
        let location = SourceLocation::from_frame(&frame(Some("~/src/main.go"), 2, 1)).unwrap();
        let home = dirs::home_dir().unwrap();
        assert_eq!(location.path, home.join("src/main.go"));
    }

    #[test]
    fn deserialize_protocol_frame() {
        let frame: StackFrame = serde_json::from_str(
            r#"{
                "id": 3,
                "name": "main",
                "source": {"name": "a.py", "path": "/tmp/a.py", "sourceReference": 0},
                "line": 10,
                "column": 5
            }"#,
        )
        .unwrap();

        assert_eq!(frame.id, 3);
        assert_eq!(frame.path(), Some(Path::new("/tmp/a.py")));
        assert_eq!(frame.source.unwrap().source_reference, Some(0));
    }

    #[test]
    fn deserialize_sparse_frame() {
        let frame: StackFrame = serde_json::from_str(r#"{"source": {}}"#).unwrap();
        assert_eq!(frame.path(), None);
        assert_eq!(frame.line, 0);
    }
}
