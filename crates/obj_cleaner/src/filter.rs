//! Keyword-based face filtering

use crate::logging::debug;
use crate::parser::FaceRecord;

/// Removes faces whose object name contains a keyword, ignoring case
#[derive(Debug, Clone)]
pub struct KeywordFilter {
    keyword: String,
}

impl KeywordFilter {
    /// Create a filter for the given keyword
    pub fn new(keyword: &str) -> Self {
        Self {
            keyword: keyword.to_lowercase(),
        }
    }

    /// Whether the face belongs to an object that should be dropped
    ///
    /// Faces declared outside any object or group are always kept.
    pub fn removes(&self, face: &FaceRecord) -> bool {
        face.object
            .as_deref()
            .is_some_and(|name| name.to_lowercase().contains(&self.keyword))
    }

    /// Surviving faces, in their original order
    pub fn retain<'a>(&self, faces: &'a [FaceRecord]) -> Vec<&'a FaceRecord> {
        let kept: Vec<&FaceRecord> = faces.iter().filter(|face| !self.removes(face)).collect();
        debug!(
            "Keyword '{}' kept {} of {} faces",
            self.keyword,
            kept.len(),
            faces.len()
        );
        kept
    }
}
