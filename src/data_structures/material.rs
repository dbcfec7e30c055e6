//! Surface finishes and their resources.
//!
//! A [`MaterialKind`] names a finish; it decides the texture an entity is drawn with and how
//! strong its specular highlight is. [`MaterialTable`] holds the texture handle of every kind
//! in an array indexed by the kind, so every kind always resolves to some handle.

use crate::render::{GraphicsDevice, TextureHandle};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MaterialKind {
    None,
    FlatWhite,
    Brick,
    Concrete,
    Door,
    Glass,
    Road,
    Leaf,
    Bark,
    Metal,
}

impl MaterialKind {
    pub const COUNT: usize = 10;

    /// Every kind, in declaration order.
    pub const ALL: [MaterialKind; Self::COUNT] = [
        MaterialKind::None,
        MaterialKind::FlatWhite,
        MaterialKind::Brick,
        MaterialKind::Concrete,
        MaterialKind::Door,
        MaterialKind::Glass,
        MaterialKind::Road,
        MaterialKind::Leaf,
        MaterialKind::Bark,
        MaterialKind::Metal,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Multiplier of the Phong specular term.
    pub fn specular_intensity(self) -> f32 {
        match self {
            MaterialKind::None => 0.8,
            MaterialKind::FlatWhite => 0.8,
            MaterialKind::Brick => 0.2,
            MaterialKind::Concrete => 0.2,
            MaterialKind::Door => 1.0,
            MaterialKind::Glass => 2.0,
            MaterialKind::Road => 0.2,
            MaterialKind::Leaf => 0.2,
            MaterialKind::Bark => 0.0,
            MaterialKind::Metal => 1.5,
        }
    }

    /// Texture file, relative to the asset root.
    pub fn texture_file(self) -> &'static str {
        match self {
            MaterialKind::None => "notexture.png",
            MaterialKind::FlatWhite => "whitetexture.png",
            MaterialKind::Brick => "bricktexture.png",
            MaterialKind::Concrete => "concretetexture.png",
            MaterialKind::Door => "doortexture.png",
            MaterialKind::Glass => "glasstexture.png",
            MaterialKind::Road => "roadtexture.png",
            MaterialKind::Leaf => "leaftexture.png",
            MaterialKind::Bark => "barktexture.png",
            MaterialKind::Metal => "metaltexture.png",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaterialTable {
    textures: [TextureHandle; MaterialKind::COUNT],
}

impl MaterialTable {
    /// A table where no material has a texture yet.
    pub fn unbound() -> Self {
        Self {
            textures: [TextureHandle::UNBOUND; MaterialKind::COUNT],
        }
    }

    pub fn texture(&self, kind: MaterialKind) -> TextureHandle {
        self.textures[kind.index()]
    }

    pub fn set_texture(&mut self, kind: MaterialKind, texture: TextureHandle) {
        self.textures[kind.index()] = texture;
    }

    /// Kinds that did not get a texture of their own.
    pub fn unbound_kinds(&self) -> Vec<MaterialKind> {
        MaterialKind::ALL
            .into_iter()
            .filter(|kind| self.texture(*kind) == TextureHandle::UNBOUND)
            .collect()
    }

    pub fn destroy<D: GraphicsDevice + ?Sized>(self, device: &mut D) {
        for texture in self.textures {
            if texture != TextureHandle::UNBOUND {
                device.destroy_texture(texture);
            }
        }
    }
}

impl Default for MaterialTable {
    fn default() -> Self {
        Self::unbound()
    }
}
