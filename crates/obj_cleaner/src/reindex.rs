//! Index compaction
//!
//! Collects the attribute indices referenced by the surviving faces and
//! renumbers them densely, keeping their relative order. Unreferenced
//! records simply have no entry in the resulting [`IndexMap`].

use std::collections::{BTreeMap, BTreeSet};

use crate::error::ObjError;
use crate::logging::debug;
use crate::parser::{AttributeKind, FaceRecord, ObjModel, VertexRef};

/// Monotonic mapping from old 1-based indices to a dense `1..=N` range
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexMap {
    old_to_new: BTreeMap<u32, u32>,
}

impl IndexMap {
    /// Build a map ranking every referenced index
    pub fn from_referenced(referenced: &BTreeSet<u32>) -> Self {
        let old_to_new = referenced
            .iter()
            .zip(1..)
            .map(|(&old, new)| (old, new))
            .collect();
        Self { old_to_new }
    }

    /// New index for an old one, if it was referenced
    pub fn get(&self, old: u32) -> Option<u32> {
        self.old_to_new.get(&old).copied()
    }

    /// Number of referenced indices (size of the compacted pool)
    pub fn len(&self) -> usize {
        self.old_to_new.len()
    }

    /// Whether nothing of this kind was referenced
    pub fn is_empty(&self) -> bool {
        self.old_to_new.is_empty()
    }

    /// Referenced old indices in ascending order, which is also new-index order
    pub fn old_indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.old_to_new.keys().copied()
    }
}

/// One [`IndexMap`] per attribute kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexMaps {
    /// Position renumbering
    pub positions: IndexMap,
    /// Texture coordinate renumbering
    pub texcoords: IndexMap,
    /// Normal renumbering
    pub normals: IndexMap,
}

impl IndexMaps {
    /// Map for the given attribute kind
    pub fn get(&self, kind: AttributeKind) -> &IndexMap {
        match kind {
            AttributeKind::Position => &self.positions,
            AttributeKind::TexCoord => &self.texcoords,
            AttributeKind::Normal => &self.normals,
        }
    }
}

/// A surviving face with its decoded vertex references
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFace<'a> {
    /// The source face
    pub record: &'a FaceRecord,
    /// Decoded `p/t/n` tokens, in source order
    pub vertices: Vec<VertexRef>,
}

/// Output of the reindexing stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reindexed<'a> {
    /// Renumbering per attribute kind
    pub maps: IndexMaps,
    /// Surviving faces, decoded
    pub faces: Vec<ResolvedFace<'a>>,
}

/// Builds index maps from surviving faces
pub struct Reindexer;

impl Reindexer {
    /// Decode the faces, check their references against the model's pools
    /// and compute the compacted numbering
    pub fn reindex<'a>(
        model: &ObjModel,
        faces: &[&'a FaceRecord],
    ) -> Result<Reindexed<'a>, ObjError> {
        let mut referenced: [BTreeSet<u32>; 3] = Default::default();
        let mut resolved = Vec::with_capacity(faces.len());

        for &record in faces {
            let vertices = record.vertex_refs()?;
            for vertex in &vertices {
                for (slot, kind) in AttributeKind::ALL.into_iter().enumerate() {
                    let Some(index) = vertex.component(kind) else {
                        continue;
                    };
                    let pool_len = model.pool(kind).len();
                    if usize::try_from(index).map_or(true, |i| i > pool_len) {
                        return Err(ObjError::DanglingReference {
                            line: record.line,
                            kind,
                            index,
                            pool_len,
                        });
                    }
                    referenced[slot].insert(index);
                }
            }
            resolved.push(ResolvedFace { record, vertices });
        }

        let [positions, texcoords, normals] = referenced;
        let maps = IndexMaps {
            positions: IndexMap::from_referenced(&positions),
            texcoords: IndexMap::from_referenced(&texcoords),
            normals: IndexMap::from_referenced(&normals),
        };

        debug!(
            "Compacted pools: {} -> {} positions, {} -> {} texcoords, {} -> {} normals",
            model.positions.len(),
            maps.positions.len(),
            model.texcoords.len(),
            maps.texcoords.len(),
            model.normals.len(),
            maps.normals.len()
        );

        Ok(Reindexed {
            maps,
            faces: resolved,
        })
    }
}
