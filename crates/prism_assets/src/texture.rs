#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureFormat {
    Rgba8Unorm,     // Standard 32-bit color (0-255)
    Rgba8UnormSrgb, // Standard 32-bit color, sRGB encoded
}

/// Decoded image, always expanded to 8-bit RGBA.
#[derive(Clone, Debug)]
pub struct TextureData {
    pub name: String,
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
}

impl TextureData {
    pub fn decode(name: &str, bytes: &[u8]) -> Result<Self, image::ImageError> {
        let img = image::load_from_memory(bytes)?.to_rgba8();

        let width = img.width();
        let height = img.height();
        let pixels = img.into_raw(); // Get raw pixel data

        Ok(Self {
            name: name.to_owned(),
            pixels,
            width,
            height,
            format: TextureFormat::Rgba8UnormSrgb,
        })
    }
}
