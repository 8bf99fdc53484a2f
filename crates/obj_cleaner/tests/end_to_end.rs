use obj_cleaner::{ObjCleaner, ObjError, ObjParser};

const CLASSROOM: &str = "\
# Blender export
mtllib classroom.mtl
o Floor
v 0 0 0
v 10 0 0
v 10 0 10
v 0 0 10
vt 0 0
vt 1 0
vt 1 1
vn 0 1 0
usemtl Wood
s off
f 1/1/1 2/2/1 3/3/1 4/1/1
o Cube.001
v 4 0 4
v 5 0 4
v 5 1 4
vt 0.5 0.5
vn 0 0 1
usemtl Metal
f 5/4/2 6/4/2 7/4/2
o Desk_Cube.001_top
v 2 1 2
v 3 1 2
v 3 1 3
usemtl Wood
f 8/1/1 9/2/1 10/3/1
o Chair
usemtl Fabric
f 8 9 10
usemtl Wood
f 1 8 9
";

#[test]
fn removes_every_object_containing_keyword() {
    let out = ObjCleaner::new("cube.001").clean_str(CLASSROOM).unwrap();
    let cleaned = ObjParser::parse(&out.text);

    assert_eq!(out.stats.faces_read, 5);
    assert_eq!(out.stats.faces_kept, 3);
    assert_eq!(out.stats.positions, (10, 7));
    assert_eq!(out.stats.texcoords, (4, 3));
    assert_eq!(out.stats.normals, (2, 1));

    assert_eq!(cleaned.material_libs, vec!["mtllib classroom.mtl".to_string()]);
    assert!(!out.text.contains("Metal"));
    assert!(!out.text.contains("v 4 0 4"));
    assert!(!out.text.contains("vt 0.5 0.5"));
    assert!(!out.text.contains("vn 0 0 1"));
}

#[test]
fn rewrites_faces_through_compacted_indices() {
    let out = ObjCleaner::new("Cube.001").clean_str(CLASSROOM).unwrap();
    let expected = "\
mtllib classroom.mtl
v 0 0 0
v 10 0 0
v 10 0 10
v 0 0 10
v 2 1 2
v 3 1 2
v 3 1 3
vt 0 0
vt 1 0
vt 1 1
vn 0 1 0
usemtl Wood
f 1/1/1 2/2/1 3/3/1 4/1/1
usemtl Fabric
f 5 6 7
usemtl Wood
f 1 5 6
";
    assert_eq!(out.text, expected);
}

#[test]
fn cleaning_twice_is_stable() {
    let cleaner = ObjCleaner::new("Cube");
    let once = cleaner.clean_str(CLASSROOM).unwrap();
    let twice = cleaner.clean_str(&once.text).unwrap();
    assert_eq!(once.text, twice.text);
    assert_eq!(twice.stats.faces_removed(), 0);
}

#[test]
fn broken_geometry_in_removed_object_is_ignored() {
    let source = "v 0 0 0\nf 1 1 1\no Cube.001\nf 40 41 0\n";
    let out = ObjCleaner::new("cube").clean_str(source).unwrap();
    assert_eq!(out.text, "v 0 0 0\nf 1 1 1\n");

    let err = ObjCleaner::new("lamp").clean_str(source).unwrap_err();
    assert!(matches!(err, ObjError::MalformedRecord { line: 4, .. }));
}
