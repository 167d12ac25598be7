//! Source File Resolver
//!
//! Maps positions in a generated file back to the original sources through a
//! version-3 source map. The linker uses this to recover the text of an
//! external template whose declaration was inlined by an earlier build step.
//! Contents are pre-loaded by the surrounding tooling; nothing here touches
//! the file system.

use serde::{Deserialize, Serialize};

const BASE64_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Raw source map (version 3) as serialized next to generated files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSourceMap {
    pub version: u32,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub source_root: Option<String>,
    pub sources: Vec<String>,
    #[serde(default)]
    pub sources_content: Option<Vec<Option<String>>>,
    #[serde(default)]
    pub names: Vec<String>,
    pub mappings: String,
}

/// One original source file referenced by a source map.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFileInfo {
    pub source_path: String,
    pub contents: String,
}

/// An original (file, line, column) position resolved through the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginalLocation {
    pub file: String,
    pub line: usize,
    pub column: usize,
}

/// One decoded mapping segment on a generated line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MappingSegment {
    generated_col: usize,
    source_index: usize,
    original_line: usize,
    original_col: usize,
}

/// A generated file together with its decoded source map.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub source_path: String,
    pub contents: String,
    /// The original sources the map refers to, in map order.
    pub sources: Vec<SourceFileInfo>,
    /// Decoded segments per generated line, sorted by generated column.
    line_mappings: Vec<Vec<MappingSegment>>,
}

impl SourceFile {
    pub fn new(
        source_path: impl Into<String>,
        contents: impl Into<String>,
        map: &RawSourceMap,
    ) -> Result<Self, String> {
        let line_mappings = decode_mappings(&map.mappings)?;

        let empty = vec![];
        let contents_by_index = map.sources_content.as_ref().unwrap_or(&empty);
        let sources = map
            .sources
            .iter()
            .enumerate()
            .map(|(idx, path)| SourceFileInfo {
                source_path: resolve_source_path(map.source_root.as_deref(), path),
                contents: contents_by_index
                    .get(idx)
                    .and_then(|c| c.clone())
                    .unwrap_or_default(),
            })
            .collect();

        Ok(SourceFile {
            source_path: source_path.into(),
            contents: contents.into(),
            sources,
            line_mappings,
        })
    }

    /// Resolves a generated (line, column) to its original location, if the
    /// map covers it. Columns past a segment start are offset by the distance
    /// from that segment.
    pub fn get_original_location(&self, line: usize, column: usize) -> Option<OriginalLocation> {
        let segments = self.line_mappings.get(line)?;
        let segment = segments
            .iter()
            .rev()
            .find(|segment| segment.generated_col <= column)?;
        let source = self.sources.get(segment.source_index)?;
        Some(OriginalLocation {
            file: source.source_path.clone(),
            line: segment.original_line,
            column: segment.original_col + (column - segment.generated_col),
        })
    }

    /// The contents of the original source at `path`, if the map carried them.
    pub fn source_contents(&self, path: &str) -> Option<&str> {
        self.sources
            .iter()
            .find(|src| src.source_path == path)
            .map(|src| src.contents.as_str())
    }
}

fn resolve_source_path(source_root: Option<&str>, path: &str) -> String {
    match source_root {
        Some(root) if !root.is_empty() => format!("{}/{}", root.trim_end_matches('/'), path),
        _ => path.to_string(),
    }
}

/// Decodes a `mappings` string into per-line segments. Only the first four
/// segment fields matter here; name indices are skipped.
fn decode_mappings(mappings: &str) -> Result<Vec<Vec<MappingSegment>>, String> {
    let mut lines = Vec::new();
    let mut source_index = 0i64;
    let mut original_line = 0i64;
    let mut original_col = 0i64;

    for line in mappings.split(';') {
        let mut segments = Vec::new();
        let mut generated_col = 0i64;

        for segment in line.split(',') {
            if segment.is_empty() {
                continue;
            }
            let fields = decode_vlq(segment)?;
            if fields.len() != 1 && fields.len() != 4 && fields.len() != 5 {
                return Err(format!(
                    "Invalid mapping segment '{segment}': expected 1, 4 or 5 fields"
                ));
            }
            generated_col += fields[0];
            if fields.len() == 1 {
                // A generated position with no original mapping.
                continue;
            }
            source_index += fields[1];
            original_line += fields[2];
            original_col += fields[3];
            if generated_col < 0 || source_index < 0 || original_line < 0 || original_col < 0 {
                return Err(format!("Invalid mapping segment '{segment}': negative position"));
            }
            segments.push(MappingSegment {
                generated_col: generated_col as usize,
                source_index: source_index as usize,
                original_line: original_line as usize,
                original_col: original_col as usize,
            });
        }

        segments.sort_by_key(|segment| segment.generated_col);
        lines.push(segments);
    }

    Ok(lines)
}

/// Decodes one base64 VLQ segment into its signed field values.
pub fn decode_vlq(segment: &str) -> Result<Vec<i64>, String> {
    let mut values = Vec::new();
    let mut value = 0i64;
    let mut shift = 0u32;

    for ch in segment.bytes() {
        let digit = BASE64_CHARS
            .iter()
            .position(|&b| b == ch)
            .ok_or_else(|| format!("Invalid base64 character '{}' in VLQ segment", ch as char))?
            as i64;
        value |= (digit & 0x1F) << shift;
        if digit & 0x20 != 0 {
            shift += 5;
        } else {
            let negative = value & 1 != 0;
            let magnitude = value >> 1;
            values.push(if negative { -magnitude } else { magnitude });
            value = 0;
            shift = 0;
        }
    }

    if shift != 0 {
        return Err("Truncated VLQ segment".to_string());
    }
    Ok(values)
}

/// Encodes one signed value as base64 VLQ.
pub fn encode_vlq(value: i64) -> String {
    let mut encoded = String::new();
    let mut vlq = if value < 0 {
        ((-value as u64) << 1) | 1
    } else {
        (value as u64) << 1
    };

    loop {
        let mut digit = (vlq & 0x1F) as usize;
        vlq >>= 5;
        if vlq > 0 {
            digit |= 0x20;
        }
        encoded.push(BASE64_CHARS[digit] as char);
        if vlq == 0 {
            break;
        }
    }
    encoded
}
