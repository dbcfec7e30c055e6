use anyhow::ensure;

/// Texture (binding 0) and its sampler (binding 1), read by the fragment stage.
pub fn diffuse_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
        label: Some("diffuse_texture_bind_group_layout"),
    })
}

/**
 * Decodes an image file and flips it so its bottom row comes first.
 *
 * Image files store the top row first while texture coordinate v = 0 addresses the bottom of
 * a tile. Only RGB and RGBA images are accepted.
 */
pub fn decode_texture(bytes: &[u8], file_name: &str) -> anyhow::Result<image::DynamicImage> {
    let img = image::load_from_memory(bytes)?;
    let channels = img.color().channel_count();
    ensure!(
        channels == 3 || channels == 4,
        "{file_name}: unsupported image with {channels} channels"
    );
    Ok(img.flipv())
}
