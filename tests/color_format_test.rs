use scene_ngin::{context::pick_surface_format, data_structures::texture::Texture};
use wgpu::TextureFormat;

#[test]
fn textures_are_sampled_as_raw_values() {
    assert_eq!(Texture::COLOR_FORMAT, TextureFormat::Rgba8Unorm);
    assert!(!Texture::COLOR_FORMAT.is_srgb());
}

#[test]
fn surface_prefers_a_format_without_srgb_encoding() {
    let formats = [
        TextureFormat::Bgra8UnormSrgb,
        TextureFormat::Bgra8Unorm,
        TextureFormat::Rgba8UnormSrgb,
    ];
    assert_eq!(pick_surface_format(&formats), Some(TextureFormat::Bgra8Unorm));
}

#[test]
fn surface_falls_back_to_the_first_format() {
    let formats = [TextureFormat::Bgra8UnormSrgb, TextureFormat::Rgba8UnormSrgb];
    assert_eq!(pick_surface_format(&formats), Some(TextureFormat::Bgra8UnormSrgb));
    assert_eq!(pick_surface_format(&[]), None);
}
