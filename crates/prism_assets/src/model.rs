use std::io::Cursor;

#[derive(Clone, Debug, PartialEq)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// One triangulated sub-mesh of an external model.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshData {
    pub name: String,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Everything an OBJ file produced, one entry per object/group.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModelData {
    pub meshes: Vec<MeshData>,
}

impl ModelData {
    /// Parses Wavefront OBJ text. Material libraries are not followed;
    /// scene files assign their own material to every sub-mesh.
    pub fn parse_obj(bytes: &[u8]) -> Result<Self, tobj::LoadError> {
        let mut reader = Cursor::new(bytes);
        let options = tobj::LoadOptions {
            single_index: true,
            triangulate: true,
            ..Default::default()
        };

        let (models, _) =
            tobj::load_obj_buf(&mut reader, &options, |_| Err(tobj::LoadError::OpenFileFailed))?;

        let meshes = models
            .into_iter()
            .map(|model| {
                let mesh = model.mesh;
                let vertex_count = mesh.positions.len() / 3;

                // Missing normals get an up-vector, missing uvs get 0.0
                let vertices = (0..vertex_count)
                    .map(|i| Vertex {
                        position: [
                            mesh.positions[i * 3],
                            mesh.positions[i * 3 + 1],
                            mesh.positions[i * 3 + 2],
                        ],
                        normal: mesh
                            .normals
                            .get(i * 3..i * 3 + 3)
                            .map(|n| [n[0], n[1], n[2]])
                            .unwrap_or([0.0, 1.0, 0.0]),
                        uv: mesh
                            .texcoords
                            .get(i * 2..i * 2 + 2)
                            .map(|t| [t[0], t[1]])
                            .unwrap_or([0.0, 0.0]),
                    })
                    .collect();

                MeshData {
                    name: model.name,
                    vertices,
                    indices: mesh.indices,
                }
            })
            .collect();

        Ok(Self { meshes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_OBJECTS: &str = "\
o first
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1 2 3 4
o second
v 0 0 1
v 1 0 1
v 1 1 1
f 5 6 7
";

    #[test]
    fn parses_objects_and_triangulates() {
        let model = ModelData::parse_obj(TWO_OBJECTS.as_bytes()).unwrap();
        assert_eq!(model.meshes.len(), 2);
        assert_eq!(model.meshes[0].name, "first");
        assert_eq!(model.meshes[0].triangle_count(), 2);
        assert_eq!(model.meshes[1].triangle_count(), 1);
        assert_eq!(model.meshes[1].vertices[0].normal, [0.0, 1.0, 0.0]);
    }
}
