//! OBJ source parser
//!
//! Turns OBJ text into an [`ObjModel`]: the three attribute pools, the
//! `mtllib` references and every face tagged with the object and material
//! that were active when it was declared. Attribute payloads are kept as the
//! literal trimmed source line; only face tokens are ever decoded, and only
//! on demand (see [`FaceRecord::vertex_refs`]).

use std::fmt;

use crate::error::ObjError;
use crate::logging::debug;

/// The three kinds of vertex attribute a face can reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    /// `v` records
    Position,
    /// `vt` records
    TexCoord,
    /// `vn` records
    Normal,
}

impl AttributeKind {
    /// All kinds, in the order their pools are written
    pub const ALL: [Self; 3] = [Self::Position, Self::TexCoord, Self::Normal];
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Position => "position",
            Self::TexCoord => "texcoord",
            Self::Normal => "normal",
        };
        f.write_str(name)
    }
}

/// Ordered records of one attribute kind, addressed by 1-based index
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributePool {
    records: Vec<String>,
}

impl AttributePool {
    /// Number of records in the pool
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the pool holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record at a 1-based OBJ index
    pub fn get(&self, index: u32) -> Option<&str> {
        let slot = usize::try_from(index).ok()?.checked_sub(1)?;
        self.records.get(slot).map(String::as_str)
    }

    /// All records in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(String::as_str)
    }

    fn push(&mut self, record: &str) {
        self.records.push(record.to_string());
    }
}

/// One `p[/t][/n]` token of a face, each component a 1-based index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VertexRef {
    /// Position index
    pub position: Option<u32>,
    /// Texture coordinate index
    pub texcoord: Option<u32>,
    /// Normal index
    pub normal: Option<u32>,
}

impl VertexRef {
    /// Index for the given attribute kind, if present
    pub fn component(&self, kind: AttributeKind) -> Option<u32> {
        match kind {
            AttributeKind::Position => self.position,
            AttributeKind::TexCoord => self.texcoord,
            AttributeKind::Normal => self.normal,
        }
    }

    /// Decode a single face token such as `3`, `3/1`, `3//2` or `3/1/2`
    ///
    /// Empty fields are absent. Fields past the third are ignored. Zero,
    /// negative and non-numeric indices are rejected as malformed.
    pub fn parse(token: &str, line: usize) -> Result<Self, ObjError> {
        let mut fields = token.split('/');
        let mut next_index = || -> Result<Option<u32>, ObjError> {
            match fields.next() {
                None | Some("") => Ok(None),
                Some(field) => parse_index(field, token, line).map(Some),
            }
        };

        Ok(Self {
            position: next_index()?,
            texcoord: next_index()?,
            normal: next_index()?,
        })
    }
}

fn parse_index(field: &str, token: &str, line: usize) -> Result<u32, ObjError> {
    if field.starts_with('-') {
        return Err(ObjError::malformed(
            line,
            format!("relative index '{field}' in '{token}' is not supported"),
        ));
    }
    match field.parse::<u32>() {
        Ok(0) => Err(ObjError::malformed(
            line,
            format!("index 0 in '{token}' (OBJ indices start at 1)"),
        )),
        Ok(index) => Ok(index),
        Err(_) => Err(ObjError::malformed(
            line,
            format!("invalid index '{field}' in '{token}'"),
        )),
    }
}

/// A face line together with the context it was declared in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaceRecord {
    /// 1-based source line
    pub line: usize,
    /// The trimmed `f ...` line
    pub text: String,
    /// Object or group name active at declaration
    pub object: Option<String>,
    /// Verbatim `usemtl ...` line active at declaration
    pub material: Option<String>,
}

impl FaceRecord {
    /// Decode every vertex token of the face
    pub fn vertex_refs(&self) -> Result<Vec<VertexRef>, ObjError> {
        self.text
            .split_whitespace()
            .skip(1)
            .map(|token| VertexRef::parse(token, self.line))
            .collect()
    }
}

/// Everything the later stages need from an OBJ source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjModel {
    /// Verbatim `mtllib ...` lines in declaration order
    pub material_libs: Vec<String>,
    /// `v` records
    pub positions: AttributePool,
    /// `vt` records
    pub texcoords: AttributePool,
    /// `vn` records
    pub normals: AttributePool,
    /// Every face, in declaration order
    pub faces: Vec<FaceRecord>,
}

impl ObjModel {
    /// Pool holding the given attribute kind
    pub fn pool(&self, kind: AttributeKind) -> &AttributePool {
        match kind {
            AttributeKind::Position => &self.positions,
            AttributeKind::TexCoord => &self.texcoords,
            AttributeKind::Normal => &self.normals,
        }
    }
}

/// Classification of a single source line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// `mtllib <file>`
    MaterialLib,
    /// `usemtl <name>`
    UseMaterial,
    /// `o <name>` or `g <name>`, carrying the name
    Object(&'a str),
    /// `v ...`
    Position,
    /// `vt ...`
    TexCoord,
    /// `vn ...`
    Normal,
    /// `f ...`
    Face,
    /// Comments, blank lines and unsupported statements
    Other,
}

impl<'a> LineKind<'a> {
    /// Classify a raw (untrimmed) source line by its leading tag
    pub fn classify(line: &'a str) -> Self {
        if line.starts_with("mtllib ") {
            Self::MaterialLib
        } else if line.starts_with("usemtl ") {
            Self::UseMaterial
        } else if line.starts_with("o ") || line.starts_with("g ") {
            let name = line.trim().split_once(' ').map_or("", |(_, name)| name);
            Self::Object(name)
        } else if line.starts_with("v ") {
            Self::Position
        } else if line.starts_with("vt ") {
            Self::TexCoord
        } else if line.starts_with("vn ") {
            Self::Normal
        } else if line.starts_with("f ") {
            Self::Face
        } else {
            Self::Other
        }
    }
}

/// Split source text on `\n`, `\r\n` and lone `\r`
///
/// Files saved with classic Mac line endings have no `\n` at all, which
/// `str::lines` would return as a single line.
pub fn source_lines(source: &str) -> impl Iterator<Item = &str> + '_ {
    let mut rest = source;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let Some(end) = rest.find(|c: char| c == '\n' || c == '\r') else {
            let line = rest;
            rest = "";
            return Some(line);
        };
        let line = &rest[..end];
        let terminator = if rest[end..].starts_with("\r\n") { 2 } else { 1 };
        rest = &rest[end + terminator..];
        Some(line)
    })
}

/// Streaming OBJ parser
pub struct ObjParser;

impl ObjParser {
    /// Parse OBJ source text into a model
    pub fn parse(source: &str) -> ObjModel {
        let mut model = ObjModel::default();
        let mut current_object: Option<String> = None;
        let mut current_material: Option<String> = None;

        for (line_idx, line) in source_lines(source).enumerate() {
            let trimmed = line.trim();
            match LineKind::classify(line) {
                LineKind::MaterialLib => model.material_libs.push(trimmed.to_string()),
                LineKind::UseMaterial => current_material = Some(trimmed.to_string()),
                LineKind::Object(name) => current_object = Some(name.to_string()),
                LineKind::Position => model.positions.push(trimmed),
                LineKind::TexCoord => model.texcoords.push(trimmed),
                LineKind::Normal => model.normals.push(trimmed),
                LineKind::Face => model.faces.push(FaceRecord {
                    line: line_idx + 1,
                    text: trimmed.to_string(),
                    object: current_object.clone(),
                    material: current_material.clone(),
                }),
                LineKind::Other => {}
            }
        }

        debug!(
            "Parsed {} positions, {} texcoords, {} normals, {} faces",
            model.positions.len(),
            model.texcoords.len(),
            model.normals.len(),
            model.faces.len()
        );

        model
    }
}
