//! CPU face-culling mesher for voxel chunks.
#![forbid(unsafe_code)]

mod build;
mod face;
mod mesh_build;

pub use build::build_chunk_mesh;
pub use face::{FACES, Face, FaceDef};
pub use mesh_build::ChunkMesh;
