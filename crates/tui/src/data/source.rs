// Redex - Abstract Machine Debugger
// Copyright (C) 2025 Zhuo Zhang and Wuqi Zhang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Source overlay resolution.
//!
//! Maps the current frame's `file:line:column` location onto the text of the
//! file it points into. File texts come from one engine round trip per trace
//! (`trace.getSourceFiles`) and are cached until the trace changes; this
//! module only decides what the overlay should show for a given frame and
//! cache state.

use std::collections::BTreeMap;

use redex_common::types::{Frame, SourceLocation};
use tracing::debug;

/// What the source pane should present for the current frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceView {
    /// File text is cached; highlight the parsed location
    Loaded {
        /// Full text of the file the frame points into
        text: String,
        /// 1-based highlight position
        location: SourceLocation,
    },
    /// No files are cached for this trace yet; a root-relative resolution
    /// round trip is required first
    NeedsRoot,
    /// Files are cached but the frame's file is not among them
    Missing {
        /// The file the frame's location names
        file: String,
    },
}

/// Resolve the overlay for a frame against the cached file map.
///
/// The caller guarantees the frame carries a location; frames without one
/// never enter source view in the first place.
pub fn resolve(files: Option<&BTreeMap<String, String>>, frame: &Frame) -> Option<SourceView> {
    let location = frame.location.as_deref()?;
    let location = match SourceLocation::parse(location) {
        Ok(loc) => loc,
        Err(e) => {
            debug!("Unusable frame location: {}", e);
            return None;
        }
    };

    let Some(files) = files else {
        return Some(SourceView::NeedsRoot);
    };

    match files.get(&location.file) {
        Some(text) => Some(SourceView::Loaded { text: text.clone(), location }),
        None => Some(SourceView::Missing { file: location.file }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redex_common::types::ExBudget;

    fn frame_at(location: Option<&str>) -> Frame {
        Frame {
            term: "(lam x x)".into(),
            context: vec!["Root".into()],
            env: vec![],
            budget: ExBudget::default(),
            ret_value: None,
            location: location.map(String::from),
        }
    }

    #[test]
    fn test_resolve_without_cache_requires_root() {
        let frame = frame_at(Some("lib/main.ak:3:7"));
        assert_eq!(resolve(None, &frame), Some(SourceView::NeedsRoot));
    }

    #[test]
    fn test_resolve_cached_file() {
        let mut files = BTreeMap::new();
        files.insert("lib/main.ak".to_string(), "fn main() {}\n".to_string());

        let frame = frame_at(Some("lib/main.ak:3:7"));
        match resolve(Some(&files), &frame) {
            Some(SourceView::Loaded { text, location }) => {
                assert_eq!(text, "fn main() {}\n");
                assert_eq!(location.line, 3);
                assert_eq!(location.column, 7);
            }
            other => panic!("expected loaded view, got {other:?}"),
        }
    }

    #[test]
    fn test_resolve_missing_file() {
        let files = BTreeMap::new();
        let frame = frame_at(Some("lib/other.ak:1:1"));
        assert_eq!(
            resolve(Some(&files), &frame),
            Some(SourceView::Missing { file: "lib/other.ak".to_string() })
        );
    }

    #[test]
    fn test_resolve_without_location() {
        let frame = frame_at(None);
        assert_eq!(resolve(Some(&BTreeMap::new()), &frame), None);
    }
}
