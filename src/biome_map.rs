use std::path::Path;

use image::{Rgb, RgbImage};
use strata_world::{Biome, BiomeClassifier};

/// Per-biome pixel counts of a rasterized map, in `Biome::ALL` order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BiomeHistogram(pub [u64; 7]);

impl BiomeHistogram {
    pub fn total(&self) -> u64 {
        self.0.iter().sum()
    }

    pub fn count(&self, biome: Biome) -> u64 {
        Biome::ALL
            .iter()
            .position(|&b| b == biome)
            .map_or(0, |i| self.0[i])
    }
}

/// Rasterizes `classify` over a `size x size` grid centered on `(cx, cz)`,
/// one pixel per `scale` blocks. Optionally shades land by column height.
pub fn render_biome_map(
    classifier: &BiomeClassifier,
    center: (i32, i32),
    size: u32,
    scale: u32,
    shade: bool,
) -> (RgbImage, BiomeHistogram) {
    let scale = scale.max(1) as i32;
    let half = size as i32 / 2;
    let sea = classifier.sea_level() as f32;
    let mut hist = BiomeHistogram::default();
    let mut img = RgbImage::new(size, size);
    for (px, pz, pixel) in img.enumerate_pixels_mut() {
        let wx = center.0 + (px as i32 - half) * scale;
        let wz = center.1 + (pz as i32 - half) * scale;
        let biome = classifier.classify(wx, wz);
        let mut rgb = biome.map_color();
        if shade {
            let h = classifier.height_for(biome, wx, wz);
            let k = (1.0 + (h - sea) / 96.0).clamp(0.6, 1.4);
            for c in &mut rgb {
                *c = (*c as f32 * k).clamp(0.0, 255.0) as u8;
            }
        }
        *pixel = Rgb(rgb);
        if let Some(i) = Biome::ALL.iter().position(|&b| b == biome) {
            hist.0[i] += 1;
        }
    }
    (img, hist)
}

pub fn export_biome_map(
    classifier: &BiomeClassifier,
    center: (i32, i32),
    size: u32,
    scale: u32,
    shade: bool,
    path: &Path,
) -> image::ImageResult<BiomeHistogram> {
    let (img, hist) = render_biome_map(classifier, center, size, scale, shade);
    img.save(path)?;
    Ok(hist)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_world::WorldGenParams;

    #[test]
    fn pixels_follow_classify() {
        let c = BiomeClassifier::new(WorldGenParams::default());
        let (img, hist) = render_biome_map(&c, (100, -40), 16, 32, false);
        assert_eq!(img.dimensions(), (16, 16));
        assert_eq!(hist.total(), 256);
        let expect = c.classify(100 + (3 - 8) * 32, -40 + (11 - 8) * 32).map_color();
        assert_eq!(img.get_pixel(3, 11).0, expect);
    }

    #[test]
    fn writes_a_png() {
        let c = BiomeClassifier::new(WorldGenParams::default());
        let dir = tempfile::tempdir().expect("tmp");
        let path = dir.path().join("map.png");
        let hist = export_biome_map(&c, (0, 0), 8, 64, true, &path).expect("export");
        assert_eq!(hist.total(), 64);
        let back = image::open(&path).expect("open").to_rgb8();
        assert_eq!(back.dimensions(), (8, 8));
    }
}
