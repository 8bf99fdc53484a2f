//! End-to-end cleaning pipeline
//!
//! [`ObjCleaner`] wires the stages together: parse the whole source, drop
//! faces of objects matching the keyword, compact the attribute pools and
//! write the result. File output goes through a temporary file in the
//! destination directory that only replaces the destination once the whole
//! model has been written.

use std::fmt;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::ObjError;
use crate::filter::KeywordFilter;
use crate::logging::{info, warn};
use crate::parser::{ObjModel, ObjParser};
use crate::reindex::{Reindexed, Reindexer};
use crate::writer::ObjWriter;

/// Counts describing what a cleaning run removed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanStats {
    /// Faces in the source
    pub faces_read: usize,
    /// Faces written to the output
    pub faces_kept: usize,
    /// Position records before and after compaction
    pub positions: (usize, usize),
    /// Texture coordinate records before and after compaction
    pub texcoords: (usize, usize),
    /// Normal records before and after compaction
    pub normals: (usize, usize),
}

impl CleanStats {
    fn collect(model: &ObjModel, reindexed: &Reindexed<'_>) -> Self {
        let maps = &reindexed.maps;
        Self {
            faces_read: model.faces.len(),
            faces_kept: reindexed.faces.len(),
            positions: (model.positions.len(), maps.positions.len()),
            texcoords: (model.texcoords.len(), maps.texcoords.len()),
            normals: (model.normals.len(), maps.normals.len()),
        }
    }

    /// Faces dropped by the keyword
    pub fn faces_removed(&self) -> usize {
        self.faces_read - self.faces_kept
    }
}

impl fmt::Display for CleanStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} faces kept, {}/{} positions, {}/{} texcoords, {}/{} normals",
            self.faces_kept,
            self.faces_read,
            self.positions.1,
            self.positions.0,
            self.texcoords.1,
            self.texcoords.0,
            self.normals.1,
            self.normals.0
        )
    }
}

/// Cleaned OBJ text together with its statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanOutput {
    /// The rewritten OBJ source
    pub text: String,
    /// What was removed
    pub stats: CleanStats,
}

/// Removes every object whose name contains a keyword from OBJ sources
#[derive(Debug, Clone)]
pub struct ObjCleaner {
    keyword: String,
    filter: KeywordFilter,
}

impl ObjCleaner {
    /// Create a cleaner for the given keyword
    pub fn new(keyword: impl Into<String>) -> Self {
        let keyword = keyword.into();
        let filter = KeywordFilter::new(&keyword);
        Self { keyword, filter }
    }

    /// The keyword as given
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Clean OBJ text held in memory
    pub fn clean_str(&self, source: &str) -> Result<CleanOutput, ObjError> {
        let model = ObjParser::parse(source);
        let reindexed = self.compact(&model)?;
        let text = ObjWriter::render(&model, &reindexed)?;
        Ok(CleanOutput {
            text,
            stats: self.report(&model, &reindexed),
        })
    }

    /// Read a whole OBJ source from `reader` and write the cleaned copy to `writer`
    pub fn clean<R: Read, W: Write>(
        &self,
        mut reader: R,
        writer: W,
    ) -> Result<CleanStats, ObjError> {
        let mut source = String::new();
        reader.read_to_string(&mut source)?;
        self.run(&source, writer)
    }

    /// Clean `input` into `output`
    ///
    /// `output` is left untouched if any stage fails.
    pub fn clean_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<CleanStats, ObjError> {
        let input = input.as_ref();
        let output = output.as_ref();

        info!("Reading {}", input.display());
        let source = std::fs::read_to_string(input).map_err(|e| ObjError::io(input, e))?;

        let dir = match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut staged = NamedTempFile::new_in(dir).map_err(|e| ObjError::io(dir, e))?;
        let stats = self.run(&source, staged.as_file_mut())?;
        staged
            .persist(output)
            .map_err(|e| ObjError::io(output, e.error))?;

        info!("Wrote {} ({})", output.display(), stats);
        Ok(stats)
    }

    /// Run the pipeline without producing any output
    pub fn dry_run(&self, input: impl AsRef<Path>) -> Result<CleanStats, ObjError> {
        let input = input.as_ref();
        let source = std::fs::read_to_string(input).map_err(|e| ObjError::io(input, e))?;
        self.run(&source, std::io::sink())
    }

    fn compact<'m>(&self, model: &'m ObjModel) -> Result<Reindexed<'m>, ObjError> {
        let kept = self.filter.retain(&model.faces);
        Reindexer::reindex(model, &kept)
    }

    fn run<W: Write>(&self, source: &str, writer: W) -> Result<CleanStats, ObjError> {
        let model = ObjParser::parse(source);
        let reindexed = self.compact(&model)?;

        // ObjWriter::write flushes before returning
        let mut writer = BufWriter::new(writer);
        ObjWriter::write(&mut writer, &model, &reindexed)?;

        Ok(self.report(&model, &reindexed))
    }

    fn report(&self, model: &ObjModel, reindexed: &Reindexed<'_>) -> CleanStats {
        let stats = CleanStats::collect(model, reindexed);
        if stats.faces_removed() == 0 {
            warn!("No object matched '{}', output keeps every face", self.keyword);
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOM: &str = "\
mtllib room.mtl
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
v 5 5 5
v 6 5 5
v 5 6 5
o Wall
usemtl Plaster
f 1 2 3
f 2 3 4
o Cube.001
usemtl Metal
f 5 6 7
";

    #[test]
    fn test_wall_and_cube_example() {
        let out = ObjCleaner::new("Cube").clean_str(ROOM).unwrap();
        assert_eq!(
            out.text,
            "mtllib room.mtl\nv 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nusemtl Plaster\nf 1 2 3\nf 2 3 4\n"
        );
        assert_eq!(out.stats.faces_read, 3);
        assert_eq!(out.stats.faces_kept, 2);
        assert_eq!(out.stats.faces_removed(), 1);
        assert_eq!(out.stats.positions, (7, 4));
    }

    #[test]
    fn test_no_match_is_identity_on_pools() {
        let out = ObjCleaner::new("Lamp").clean_str(ROOM).unwrap();
        let model = ObjParser::parse(ROOM);
        let cleaned = ObjParser::parse(&out.text);

        assert_eq!(cleaned.faces.len(), model.faces.len());
        assert_eq!(cleaned.positions, model.positions);
        assert_eq!(cleaned.texcoords, model.texcoords);
        assert_eq!(cleaned.normals, model.normals);
        let texts = |m: &ObjModel| m.faces.iter().map(|f| f.text.clone()).collect::<Vec<_>>();
        assert_eq!(texts(&cleaned), texts(&model));
    }

    #[test]
    fn test_removed_objects_never_reach_output() {
        let out = ObjCleaner::new("cube").clean_str(ROOM).unwrap();
        assert!(!out.text.contains("Metal"));
        assert!(!out.text.contains("v 5 5 5"));
    }

    #[test]
    fn test_output_references_stay_in_range() {
        let source = "\
v 0 0 0
v 1 0 0
v 2 0 0
v 3 0 0
vn 0 0 1
vn 0 1 0
o Drop
f 1//1 2//1 3//1
o Keep
f 4//2 3//2 2//2
";
        let out = ObjCleaner::new("drop").clean_str(source).unwrap();
        let cleaned = ObjParser::parse(&out.text);
        for face in &cleaned.faces {
            for vertex in face.vertex_refs().unwrap() {
                let p = vertex.position.unwrap() as usize;
                let n = vertex.normal.unwrap() as usize;
                assert!((1..=cleaned.positions.len()).contains(&p));
                assert!((1..=cleaned.normals.len()).contains(&n));
            }
        }
        assert_eq!(cleaned.positions.len(), 3);
        assert_eq!(cleaned.normals.len(), 1);
    }

    #[test]
    fn test_classic_mac_line_endings() {
        let out = ObjCleaner::new("x")
            .clean_str("v 0 0 0\rv 1 0 0\rv 0 1 0\rf 1 2 3\r")
            .unwrap();
        assert_eq!(out.stats.faces_read, 1);
        assert_eq!(out.text, "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n");
    }

    #[test]
    fn test_reader_writer() {
        let mut output = Vec::new();
        let stats = ObjCleaner::new("Cube")
            .clean(ROOM.as_bytes(), &mut output)
            .unwrap();
        assert_eq!(stats.faces_kept, 2);
        assert!(String::from_utf8(output).unwrap().ends_with("f 2 3 4\n"));
    }

    /// Counts the `write` calls that reach the underlying sink
    struct CountingWriter<'a> {
        bytes: Vec<u8>,
        calls: &'a std::cell::Cell<usize>,
    }

    impl Write for CountingWriter<'_> {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.calls.set(self.calls.get() + 1);
            self.bytes.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_output_is_buffered() {
        let mut source = String::new();
        for i in 0..1000 {
            source.push_str(&format!("v {i} 0 0\n"));
        }
        for i in 1..999 {
            source.push_str(&format!("f {} {} {}\n", i, i + 1, i + 2));
        }

        let calls = std::cell::Cell::new(0);
        let sink = CountingWriter { bytes: Vec::new(), calls: &calls };
        let stats = ObjCleaner::new("x").clean(source.as_bytes(), sink).unwrap();

        assert_eq!(stats.faces_kept, 998);
        // 1998 output lines fit in a handful of 8 KiB buffer flushes
        assert!(calls.get() < 20, "{} write calls", calls.get());
    }

    #[test]
    fn test_clean_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("room.obj");
        let output = dir.path().join("room_clean.obj");
        std::fs::write(&input, ROOM).unwrap();

        let stats = ObjCleaner::new("Cube").clean_file(&input, &output).unwrap();
        assert_eq!(stats.faces_kept, 2);
        let written = std::fs::read_to_string(&output).unwrap();
        assert!(written.starts_with("mtllib room.mtl\n"));
    }

    #[test]
    fn test_failed_run_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("broken.obj");
        let output = dir.path().join("broken_clean.obj");
        std::fs::write(&input, "v 0 0 0\nf 1 2 3\n").unwrap();

        let err = ObjCleaner::new("x").clean_file(&input, &output).unwrap_err();
        assert!(matches!(err, ObjError::DanglingReference { index: 2, .. }));
        assert!(!output.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_missing_input_names_path() {
        let err = ObjCleaner::new("x")
            .clean_file("does/not/exist.obj", "out.obj")
            .unwrap_err();
        match err {
            ObjError::Io { path, .. } => assert_eq!(path, Path::new("does/not/exist.obj")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("room.obj");
        std::fs::write(&input, ROOM).unwrap();

        let stats = ObjCleaner::new("Cube").dry_run(&input).unwrap();
        assert_eq!(stats.faces_removed(), 1);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
