use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::gpu::{BackendError, BackendResult};

/// Resolves texture names to image files and decodes them.
///
/// A name is tried as-is first, then under each root with each extension appended.
#[derive(Debug, Clone)]
pub struct TextureLoader {
    pub roots: Vec<PathBuf>,
    pub extensions: Vec<String>,
}

impl Default for TextureLoader {
    fn default() -> Self {
        Self {
            roots: vec![PathBuf::from("assets"), PathBuf::from(".")],
            extensions: ["png", "jpg", "jpeg", "bmp"].map(String::from).to_vec(),
        }
    }
}

impl TextureLoader {
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.roots.insert(0, root.into());
        self
    }

    /// First existing file for `name`, if any.
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        let direct = Path::new(name);
        if direct.extension().is_some() && direct.is_file() {
            return Some(direct.to_path_buf());
        }

        self.roots.iter().find_map(|root| {
            let bare = root.join(name);
            if bare.extension().is_some() && bare.is_file() {
                return Some(bare);
            }
            self.extensions
                .iter()
                .map(|ext| root.join(format!("{name}.{ext}")))
                .find(|p| p.is_file())
        })
    }

    /// Decodes `name` to tightly packed RGBA8.
    pub fn load_rgba(&self, name: &str) -> BackendResult<RgbaImage> {
        let path = self.resolve(name).ok_or_else(|| BackendError::Texture {
            name: name.to_string(),
            reason: format!("not found under {:?}", self.roots),
        })?;

        let img = image::open(&path).map_err(|e| BackendError::Texture {
            name: name.to_string(),
            reason: format!("{}: {e}", path.display()),
        })?;

        let rgba = img.to_rgba8();
        if rgba.width() == 0 || rgba.height() == 0 {
            return Err(BackendError::Texture {
                name: name.to_string(),
                reason: "image has zero size".into(),
            });
        }
        Ok(rgba)
    }
}

/// Sampled texture plus the bind group exposing it to the shader.
pub struct WgpuTexture {
    name: String,
    size: (u32, u32),
    bind_group: wgpu::BindGroup,
}

impl WgpuTexture {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub(crate) fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

impl std::fmt::Debug for WgpuTexture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WgpuTexture")
            .field("name", &self.name)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

/// Layout and sampler shared by every texture slot.
///
/// Each slot is one bind group: texture at binding 0, sampler at binding 1.
pub(crate) struct TextureBinding {
    layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
}

impl TextureBinding {
    pub fn new(device: &wgpu::Device) -> Self {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("strith texture bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
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
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("strith texture sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        Self { layout, sampler }
    }

    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    /// Uploads `image` into a new sRGB texture and builds its bind group.
    pub fn upload(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        name: &str,
        image: &RgbaImage,
    ) -> WgpuTexture {
        let (width, height) = image.dimensions();
        let extent = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(name),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            image.as_raw(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            extent,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(name),
            layout: &self.layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        WgpuTexture {
            name: name.to_string(),
            size: (width, height),
            bind_group,
        }
    }

    /// 1x1 opaque white texture bound to slots a mesh leaves empty.
    pub fn neutral(&self, device: &wgpu::Device, queue: &wgpu::Queue) -> WgpuTexture {
        let white = RgbaImage::from_pixel(1, 1, image::Rgba([255, 255, 255, 255]));
        self.upload(device, queue, "strith neutral texture", &white)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("strith-texture-{tag}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn resolves_name_with_extension_under_root() {
        let dir = scratch_dir("resolve");
        let file = dir.join("ColorMap.png");
        RgbaImage::from_pixel(2, 2, image::Rgba([255, 0, 0, 255])).save(&file).unwrap();

        let loader = TextureLoader::default().with_root(&dir);

        assert_eq!(loader.resolve("ColorMap"), Some(file.clone()));
        assert_eq!(loader.resolve("ColorMap.png"), Some(file));
        assert_eq!(loader.resolve("Missing"), None);
    }

    #[test]
    fn decodes_to_rgba8() {
        let dir = scratch_dir("decode");
        RgbaImage::from_pixel(3, 1, image::Rgba([1, 2, 3, 4]))
            .save(dir.join("strip.png"))
            .unwrap();

        let img = TextureLoader::default().with_root(&dir).load_rgba("strip").unwrap();

        assert_eq!(img.dimensions(), (3, 1));
        assert_eq!(img.get_pixel(2, 0).0, [1, 2, 3, 4]);
    }

    #[test]
    fn missing_texture_is_a_typed_error() {
        let loader = TextureLoader {
            roots: vec![scratch_dir("empty")],
            extensions: vec!["png".into()],
        };

        let err = loader.load_rgba("nope").unwrap_err();

        assert!(matches!(err, BackendError::Texture { ref name, .. } if name == "nope"));
    }

    #[test]
    fn undecodable_file_is_a_typed_error() {
        let dir = scratch_dir("garbage");
        std::fs::write(dir.join("broken.png"), b"not a png").unwrap();

        let err = TextureLoader::default().with_root(&dir).load_rgba("broken").unwrap_err();

        assert!(matches!(err, BackendError::Texture { .. }));
    }
}
