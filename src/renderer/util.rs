/// Rectangle of pixels rendered by one worker in one go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Rendered pixels of a tile in row-major order.
pub struct TileResult {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<[u8; 4]>,
}

impl TileResult {
    pub fn write_to(&self, image: &mut image::RgbaImage) {
        for j in 0..self.height {
            for i in 0..self.width {
                let pixel = self.pixels[(j * self.width + i) as usize];
                image.put_pixel(self.x + i, self.y + j, image::Rgba(pixel));
            }
        }
    }
}

/// square tiles in row-major order, the last row and column may be smaller
pub fn create_tiles(width: u32, height: u32, tile_size: u32) -> Vec<Tile> {
    let tile_size = tile_size.max(1);
    let mut tiles = Vec::with_capacity(
        ((width + tile_size - 1) / tile_size * ((height + tile_size - 1) / tile_size)) as usize,
    );
    for y in (0..height).step_by(tile_size as usize) {
        for x in (0..width).step_by(tile_size as usize) {
            tiles.push(Tile {
                x,
                y,
                width: tile_size.min(width - x),
                height: tile_size.min(height - y),
            });
        }
    }
    tiles
}

pub fn render_progress_bar(tile_count: usize) -> indicatif::ProgressBar {
    let progress_bar = indicatif::ProgressBar::new(tile_count as u64);
    progress_bar.set_style(
        indicatif::ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} tiles (eta: {eta})")
            .progress_chars("#>-"),
    );
    progress_bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiles_cover_image_once() {
        for &(width, height, tile_size) in &[(64, 48, 16), (100, 37, 16), (5, 5, 8), (7, 3, 1)] {
            let tiles = create_tiles(width, height, tile_size);
            let mut covered = vec![0; (width * height) as usize];
            for tile in &tiles {
                assert!(tile.width > 0 && tile.height > 0);
                assert!(tile.width <= tile_size && tile.height <= tile_size);
                for y in tile.y..tile.y + tile.height {
                    for x in tile.x..tile.x + tile.width {
                        covered[(y * width + x) as usize] += 1;
                    }
                }
            }
            assert!(covered.iter().all(|&c| c == 1));
        }
    }

    #[test]
    fn empty_image_has_no_tiles() {
        assert!(create_tiles(0, 10, 16).is_empty());
        assert!(create_tiles(10, 0, 16).is_empty());
    }

    #[test]
    fn tile_result_lands_at_its_offset() {
        let mut image = image::RgbaImage::new(4, 4);
        let result = TileResult {
            x: 2,
            y: 1,
            width: 2,
            height: 2,
            pixels: vec![[1, 2, 3, 255], [4, 5, 6, 255], [7, 8, 9, 255], [10, 11, 12, 255]],
        };
        result.write_to(&mut image);
        assert_eq!(image.get_pixel(2, 1).0, [1, 2, 3, 255]);
        assert_eq!(image.get_pixel(3, 2).0, [10, 11, 12, 255]);
        assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0, 0]);
    }
}
