use std::fs;
use std::path::Path;
use anyhow::{Context, Result, anyhow, bail};
use rand::Rng;
use rayon::prelude::*;

use crate::point2d::Point2D;
use crate::point3d::Point3D;
use crate::point4d::Point4D;
use crate::triangle::{Mesh, Triangle, Vertex};

/// One `f` line, indices already made zero based
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub v_indices: Vec<usize>,
    pub vt_indices: Vec<Option<usize>>,
    pub vn_indices: Vec<Option<usize>>,
}

#[derive(Debug, Default)]
pub struct ObjData {
    pub positions: Vec<Point3D>,
    pub texcoords: Vec<Point2D>,
    pub normals: Vec<Point3D>,
    pub faces: Vec<Face>,
}

pub fn parse_obj<P: AsRef<Path>>(path: P) -> Result<ObjData> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_obj_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn parse_floats<const N: usize>(tokens: &[&str]) -> Result<[f32; N]> {
    let mut out = [0.0f32; N];
    for (i, slot) in out.iter_mut().enumerate() {
        let token = tokens.get(i).ok_or_else(|| anyhow!("expected {N} numbers"))?;
        *slot = token.parse()?;
    }
    Ok(out)
}

fn parse_line(tokens: &[&str], obj: &mut ObjData) -> Result<()> {
    match tokens[0] {
        "v" => {
            let [x, y, z] = parse_floats::<3>(&tokens[1..])?;
            obj.positions.push(Point3D { x, y, z })
        }
        "vt" => {
            let [u, v] = parse_floats::<2>(&tokens[1..])?;
            obj.texcoords.push(Point2D { x: u, y: v })
        }
        "vn" => {
            let [x, y, z] = parse_floats::<3>(&tokens[1..])?;
            obj.normals.push(Point3D { x, y, z })
        }
        "f" => {
            let mut face = Face { v_indices: Vec::new(), vt_indices: Vec::new(), vn_indices: Vec::new() };
            for part in &tokens[1..] {
                let (v, vt, vn) = parse_face_vertex(part, obj)?;
                face.v_indices.push(v);
                face.vt_indices.push(vt);
                face.vn_indices.push(vn);
            }
            obj.faces.push(face)
        }
        // Groups, materials and smoothing are ignored
        _ => {}
    }
    Ok(())
}

pub fn parse_obj_str(text: &str) -> Result<ObjData> {
    let mut obj = ObjData::default();

    for (line_no, line) in text.lines().enumerate() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() || tokens[0].starts_with('#') {
            continue
        }
        parse_line(&tokens, &mut obj).with_context(|| format!("line {}: {}", line_no + 1, line.trim()))?;
    }

    log::debug!(
        "parsed obj: {} positions, {} texcoords, {} normals, {} faces",
        obj.positions.len(), obj.texcoords.len(), obj.normals.len(), obj.faces.len()
    );
    Ok(obj)
}

/// 1-based OBJ index, or negative relative to the end of what has been read so far
fn resolve_index(token: &str, len: usize) -> Result<usize> {
    let raw: i64 = token.parse()?;
    let idx = match raw {
        0 => bail!("index 0 is not valid in OBJ"),
        r if r > 0 => r - 1,
        r => len as i64 + r,
    };
    if idx < 0 || idx as usize >= len {
        bail!("index {raw} out of range (have {len})");
    }
    Ok(idx as usize)
}

fn parse_face_vertex(s: &str, obj: &ObjData) -> Result<(usize, Option<usize>, Option<usize>)> {
    let parts: Vec<&str> = s.split('/').collect();
    let v = resolve_index(parts[0], obj.positions.len())?;
    let vt = match parts.get(1) {
        Some(&"") | None => None,
        Some(t) => Some(resolve_index(t, obj.texcoords.len())?),
    };
    let vn = match parts.get(2) {
        Some(&"") | None => None,
        Some(n) => Some(resolve_index(n, obj.normals.len())?),
    };
    Ok((v, vt, vn))
}

fn build_vertex(obj: &ObjData, face: &Face, i: usize) -> Vertex {
    let uv = face.vt_indices[i].map(|t| obj.texcoords[t]).unwrap_or_default();
    let normal = face.vn_indices[i].map(|n| obj.normals[n]).unwrap_or(Point3D::ZERO);
    Vertex::new(obj.positions[face.v_indices[i]], uv, normal)
}

pub fn fan_triangulate_faces(obj: &ObjData) -> Vec<Triangle> {
    obj.faces
        .par_iter()
        .flat_map_iter(|face| {
            let n = face.v_indices.len();
            // Points and lines have nothing to fill
            (1..n.saturating_sub(1)).map(move |i| {
                let mut tri = Triangle::new(build_vertex(obj, face, 0), build_vertex(obj, face, i), build_vertex(obj, face, i + 1));
                let face_normal = tri.face_normal();
                for v in [&mut tri.a, &mut tri.b, &mut tri.c] {
                    if v.normal == Point3D::ZERO {
                        v.normal = face_normal;
                    }
                }
                tri
            })
        })
        .collect()
}

/// Give each triangle a random flat colour, handy for seeing the tessellation
pub fn randomise_colours(triangles: &mut [Triangle]) {
    let mut rng = rand::thread_rng();
    for tri in triangles {
        tri.colour = Some(Point4D::new(rng.gen_range(0.2..=1.0), rng.gen_range(0.2..=1.0), rng.gen_range(0.2..=1.0), 1.0));
    }
}

pub fn load_mesh<P: AsRef<Path>>(path: P, texture_index: usize) -> Result<Mesh> {
    let path = path.as_ref();
    let obj = parse_obj(path)?;
    let triangles = fan_triangulate_faces(&obj);
    log::info!("loaded {} ({} triangles)", path.display(), triangles.len());
    Ok(Mesh::new(triangles, texture_index))
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD: &str = "\
# unit quad
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 0 1
f 1/1/1 2/2/1 3/3/1 4/4/1
";

    #[test]
    fn quad_is_fan_triangulated() {
        let obj = parse_obj_str(QUAD).unwrap();
        assert_eq!(obj.faces.len(), 1);
        let tris = fan_triangulate_faces(&obj);
        assert_eq!(tris.len(), 2);
        assert_eq!(tris[0].a.position, Point3D::new(0.0, 0.0, 0.0));
        assert_eq!(tris[1].c.position, Point3D::new(0.0, 1.0, 0.0));
        assert_eq!(tris[1].b.tex, Point3D::new(1.0, 1.0, 1.0));
        assert_eq!(tris[0].a.normal, Point3D::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn missing_normals_use_the_face_normal() {
        let obj = parse_obj_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        let tris = fan_triangulate_faces(&obj);
        assert_eq!(tris[0].b.normal, Point3D::new(0.0, 0.0, 1.0));
        assert_eq!(tris[0].b.tex, Point3D::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn negative_indices_count_from_the_end() {
        let obj = parse_obj_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n").unwrap();
        assert_eq!(obj.faces[0].v_indices, vec![0, 1, 2]);
    }

    #[test]
    fn position_and_normal_without_texcoord() {
        let obj = parse_obj_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 -1\nf 1//1 2//1 3//1\n").unwrap();
        assert_eq!(obj.faces[0].vt_indices, vec![None, None, None]);
        assert_eq!(obj.faces[0].vn_indices, vec![Some(0), Some(0), Some(0)]);
    }

    #[test]
    fn errors_name_the_line() {
        let err = parse_obj_str("v 0 0 0\nv 1 nope 0\n").unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
        let err = parse_obj_str("v 0 0 0\nf 1 2 3\n").unwrap_err();
        assert!(format!("{err:#}").contains("out of range"));
    }

    #[test]
    fn random_colours_are_flat_and_opaque() {
        let mut tris = fan_triangulate_faces(&parse_obj_str(QUAD).unwrap());
        randomise_colours(&mut tris);
        for t in &tris {
            let c = t.colour.unwrap();
            assert_eq!(c.w, 1.0);
            assert!(c.x >= 0.2 && c.x <= 1.0);
        }
    }
}
