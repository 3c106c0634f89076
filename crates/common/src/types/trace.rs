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

use eyre::{bail, eyre, Result};
use serde::{Deserialize, Serialize};

/// Shape of a trace as reported by the engine before any frame is fetched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceSummary {
    /// Total number of frames in the trace
    pub frame_count: usize,
    /// Indices of frames mapped to source tokens, strictly ascending and
    /// each within `[0, frame_count)`
    pub source_token_indices: Vec<usize>,
}

/// A parsed frame location.
///
/// Locations arrive as opaque `file:line:column` strings; line and column
/// are 1-based. The file component is everything before the first colon,
/// matching how the engine groups source files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Relative path of the source file, as keyed in the engine's file map
    pub file: String,
    /// 1-based line
    pub line: usize,
    /// 1-based column
    pub column: usize,
}

impl SourceLocation {
    /// Parse an opaque location string.
    pub fn parse(location: &str) -> Result<Self> {
        let (file, rest) = location
            .split_once(':')
            .ok_or_else(|| eyre!("malformed location {location:?}: missing line"))?;
        let (line, column) = rest
            .split_once(':')
            .ok_or_else(|| eyre!("malformed location {location:?}: missing column"))?;
        let line: usize = line
            .parse()
            .map_err(|_| eyre!("malformed location {location:?}: bad line number"))?;
        let column: usize = column
            .parse()
            .map_err(|_| eyre!("malformed location {location:?}: bad column number"))?;
        if line == 0 || column == 0 {
            bail!("malformed location {location:?}: line and column are 1-based");
        }
        Ok(Self { file: file.to_string(), line, column })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_location() {
        let loc = SourceLocation::parse("validators/spend.ak:12:3").unwrap();
        assert_eq!(loc.file, "validators/spend.ak");
        assert_eq!(loc.line, 12);
        assert_eq!(loc.column, 3);
    }

    #[test]
    fn test_parse_location_rejects_malformed() {
        assert!(SourceLocation::parse("no-colons").is_err());
        assert!(SourceLocation::parse("file.ak:7").is_err());
        assert!(SourceLocation::parse("file.ak:x:1").is_err());
        assert!(SourceLocation::parse("file.ak:0:1").is_err());
    }
}
