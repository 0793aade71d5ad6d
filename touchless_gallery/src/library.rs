//! Decoded images and their thumbnails.
//!
//! Pictures are decoded once at startup into packed `0xAARRGGBB` pixels,
//! the format minifb blits directly.  Files that fail to decode are logged
//! and skipped; only an empty result is fatal.

use std::path::{Path, PathBuf};

use image::RgbaImage;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{GalleryError, Result};

// ════════════════════════════════════════════════════════════════════════════
// Picture
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq)]
pub struct Picture {
    path:   PathBuf,
    width:  u32,
    height: u32,
    pixels: Vec<u32>,
}

impl Picture {
    pub fn from_rgba(path: impl Into<PathBuf>, img: &RgbaImage) -> Self {
        let pixels = img.pixels().map(|p| {
            let [r, g, b, a] = p.0;
            (a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32
        }).collect();
        Picture { path: path.into(), width: img.width(), height: img.height(), pixels }
    }

    /// A single-colour picture.
    pub fn solid(path: impl Into<PathBuf>, width: u32, height: u32, color: u32) -> Self {
        Picture {
            path: path.into(),
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    pub fn path(&self) -> &Path { &self.path }

    pub fn width(&self) -> u32 { self.width }

    pub fn height(&self) -> u32 { self.height }

    pub fn pixels(&self) -> &[u32] { &self.pixels }

    /// Pixel at (`x`, `y`); out-of-range coordinates clamp to the edge.
    pub fn pixel(&self, x: u32, y: u32) -> u32 {
        if self.pixels.is_empty() {
            return 0;
        }
        let x = x.min(self.width - 1) as usize;
        let y = y.min(self.height - 1) as usize;
        self.pixels[y * self.width as usize + x]
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ImageLibrary
// ════════════════════════════════════════════════════════════════════════════

/// The ordered image collection shown by the gallery.
#[derive(Clone, Debug)]
pub struct ImageLibrary {
    pictures: Vec<Picture>,
    thumbs:   Vec<Picture>,
}

impl ImageLibrary {
    /// Build from already-decoded pictures; thumbnails share the full images.
    pub fn from_pictures(pictures: Vec<Picture>) -> Self {
        let thumbs = pictures.clone();
        ImageLibrary { pictures, thumbs }
    }

    /// Load every image named by `source`: either a directory (non-recursive,
    /// sorted by file name) or a text file with one path per line.
    pub fn load(source: &Path, thumb_height: u32) -> Result<Self> {
        let paths = collect_paths(source)?;
        let mut pictures = Vec::with_capacity(paths.len());
        let mut thumbs = Vec::with_capacity(paths.len());

        for path in &paths {
            match decode(path) {
                Ok(rgba) => {
                    thumbs.push(thumbnail(path, &rgba, thumb_height));
                    pictures.push(Picture::from_rgba(path.clone(), &rgba));
                    debug!(path = %path.display(), w = rgba.width(), h = rgba.height(), "decoded");
                }
                Err(e) => warn!("skipping image: {e}"),
            }
        }

        if pictures.is_empty() {
            return Err(GalleryError::NoImages(source.to_path_buf()));
        }
        info!(count = pictures.len(), source = %source.display(), "image library loaded");
        Ok(ImageLibrary { pictures, thumbs })
    }

    pub fn len(&self) -> usize { self.pictures.len() }

    pub fn is_empty(&self) -> bool { self.pictures.is_empty() }

    pub fn get(&self, index: usize) -> Option<&Picture> { self.pictures.get(index) }

    pub fn thumb(&self, index: usize) -> Option<&Picture> { self.thumbs.get(index) }
}

fn decode(path: &Path) -> Result<RgbaImage> {
    image::open(path)
        .map(|img| img.to_rgba8())
        .map_err(|source| GalleryError::Decode { path: path.to_path_buf(), source })
}

fn thumbnail(path: &Path, rgba: &RgbaImage, height: u32) -> Picture {
    let height = height.max(1);
    let width = ((rgba.width() as f32 * height as f32 / rgba.height().max(1) as f32).round() as u32).max(1);
    Picture::from_rgba(path, &image::imageops::thumbnail(rgba, width, height))
}

/// Image paths named by a directory or list file, in display order.
pub fn collect_paths(source: &Path) -> Result<Vec<PathBuf>> {
    if source.is_dir() {
        let paths: Vec<PathBuf> = WalkDir::new(source)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(e) => Some(e),
                Err(e) => {
                    warn!("unreadable directory entry: {e}");
                    None
                }
            })
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| image::ImageFormat::from_path(p).is_ok())
            .collect();
        return Ok(paths);
    }

    let text = std::fs::read_to_string(source).map_err(|e| GalleryError::ImageList {
        path:   source.to_path_buf(),
        source: e,
    })?;
    let base = source.parent().unwrap_or_else(|| Path::new("."));
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(|l| {
            let p = PathBuf::from(l);
            if p.is_absolute() { p } else { base.join(p) }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn write_png(dir: &Path, name: &str, w: u32, h: u32) -> PathBuf {
        let path = dir.join(name);
        RgbaImage::from_pixel(w, h, Rgba([255, 0, 0, 255])).save(&path).unwrap();
        path
    }

    #[test]
    fn rgba_packs_to_argb() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([0x11, 0x22, 0x33, 0xFF]));
        let pic = Picture::from_rgba("x.png", &img);
        assert_eq!(pic.pixel(0, 0), 0xFF112233);
    }

    #[test]
    fn pixel_clamps_to_edges() {
        let pic = Picture::solid("s.png", 2, 2, 0xFF00FF00);
        assert_eq!(pic.pixel(10, 10), 0xFF00FF00);
    }

    #[test]
    fn directory_is_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "b.png", 4, 2);
        write_png(dir.path(), "a.png", 2, 2);
        std::fs::write(dir.path().join("notes.txt"), "not an image").unwrap();

        let paths = collect_paths(dir.path()).unwrap();
        let names: Vec<_> = paths.iter().map(|p| p.file_name().unwrap().to_owned()).collect();
        assert_eq!(names, vec!["a.png", "b.png"]);
    }

    #[test]
    fn list_file_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "one.png", 8, 4);
        let list = dir.path().join("list.txt");
        std::fs::write(&list, "# kiosk set\none.png\n\nmissing.png\n").unwrap();

        let paths = collect_paths(&list).unwrap();
        assert_eq!(paths, vec![dir.path().join("one.png"), dir.path().join("missing.png")]);

        // The missing file is skipped, not fatal.
        let lib = ImageLibrary::load(&list, 2).unwrap();
        assert_eq!(lib.len(), 1);
        let thumb = lib.thumb(0).unwrap();
        assert_eq!((thumb.width(), thumb.height()), (4, 2));
    }

    #[test]
    fn empty_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(ImageLibrary::load(dir.path(), 80), Err(GalleryError::NoImages(_))));
    }

    #[test]
    fn missing_list_file_is_an_error() {
        let err = collect_paths(Path::new("/nonexistent/list.txt")).unwrap_err();
        assert!(matches!(err, GalleryError::ImageList { .. }));
    }
}
