//! OBJ serializer for compacted models

use std::io::Write;

use crate::error::ObjError;
use crate::parser::{AttributeKind, ObjModel, VertexRef};
use crate::reindex::{IndexMaps, Reindexed};

/// Writes a filtered model back out as OBJ text
pub struct ObjWriter;

impl ObjWriter {
    /// Emit `mtllib` lines, the compacted `v`/`vt`/`vn` pools and the
    /// surviving faces with `usemtl` switches collapsed into runs
    pub fn write<W: Write>(
        writer: &mut W,
        model: &ObjModel,
        reindexed: &Reindexed<'_>,
    ) -> Result<(), ObjError> {
        for lib in &model.material_libs {
            writeln!(writer, "{lib}")?;
        }

        for kind in AttributeKind::ALL {
            let pool = model.pool(kind);
            for old in reindexed.maps.get(kind).old_indices() {
                // Every index in the map was range-checked by the reindexer
                if let Some(record) = pool.get(old) {
                    writeln!(writer, "{record}")?;
                }
            }
        }

        let mut last_material: Option<&str> = None;
        for face in &reindexed.faces {
            if let Some(material) = face.record.material.as_deref() {
                if last_material != Some(material) {
                    writeln!(writer, "{material}")?;
                    last_material = Some(material);
                }
            }

            let tokens: Vec<String> = face
                .vertices
                .iter()
                .map(|vertex| Self::format_vertex(vertex, &reindexed.maps))
                .collect();
            writeln!(writer, "f {}", tokens.join(" "))?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Render the model to a string
    pub fn render(model: &ObjModel, reindexed: &Reindexed<'_>) -> Result<String, ObjError> {
        let mut buffer = Vec::new();
        Self::write(&mut buffer, model, reindexed)?;
        // Every byte written came from &str slices
        String::from_utf8(buffer).map_err(|e| {
            ObjError::Stream(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })
    }

    /// Render one vertex token through the index maps
    ///
    /// The texcoord slot is written when either texcoord or normal is
    /// present, the normal slot only when the normal is present.
    fn format_vertex(vertex: &VertexRef, maps: &IndexMaps) -> String {
        let remap = |kind: AttributeKind| {
            vertex
                .component(kind)
                .and_then(|old| maps.get(kind).get(old))
                .map(|new| new.to_string())
        };
        let position = remap(AttributeKind::Position);
        let texcoord = remap(AttributeKind::TexCoord);
        let normal = remap(AttributeKind::Normal);

        let mut token = position.unwrap_or_default();
        if texcoord.is_some() || normal.is_some() {
            token.push('/');
            token.push_str(texcoord.as_deref().unwrap_or(""));
        }
        if let Some(normal) = normal {
            token.push('/');
            token.push_str(&normal);
        }
        token
    }
}
