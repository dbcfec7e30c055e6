use std::path::Path;

use futures::future::join_all;

use crate::{
    data_structures::material::{MaterialKind, MaterialTable},
    render::GraphicsDevice,
};

/**
 * This module contains all logic for producing meshes and loading textures from files.
 */
pub mod mesh;
pub mod texture;

pub async fn load_binary(root: &Path, file_name: &str) -> anyhow::Result<Vec<u8>> {
    let path = root.join(file_name);
    let data = tokio::fs::read(&path).await.map_err(|e| {
        anyhow::anyhow!("Failed to read {}: {e}", path.display())
    })?;
    Ok(data)
}

async fn read_and_decode(root: &Path, file_name: &str) -> anyhow::Result<image::DynamicImage> {
    let bytes = load_binary(root, file_name).await?;
    texture::decode_texture(&bytes, file_name)
}

/// Loads the texture of every material from `root`.
///
/// Files are read and decoded concurrently, then uploaded in material order. A material whose
/// file is missing or cannot be decoded keeps [`TextureHandle::UNBOUND`](crate::render::TextureHandle::UNBOUND)
/// and the failure is logged; the remaining materials still load.
pub async fn load_material_textures<D: GraphicsDevice + ?Sized>(
    device: &mut D,
    root: &Path,
) -> MaterialTable {
    let decoded = join_all(
        MaterialKind::ALL
            .iter()
            .map(|kind| read_and_decode(root, kind.texture_file())),
    )
    .await;

    let mut table = MaterialTable::unbound();
    for (kind, result) in MaterialKind::ALL.into_iter().zip(decoded) {
        let file_name = kind.texture_file();
        match result.and_then(|img| device.create_texture(file_name, &img)) {
            Ok(handle) => {
                log::debug!("Loaded {file_name} for {kind:?}");
                table.set_texture(kind, handle);
            }
            Err(e) => log::error!("Failed to load texture {file_name}: {e:#}"),
        }
    }
    table
}
