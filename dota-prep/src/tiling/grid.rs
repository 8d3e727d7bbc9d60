use crate::common::*;

/// A pixel window `[x0, x1) × [y0, y1)` at grid cell `(xi, yi)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileWindow {
    pub xi: u32,
    pub yi: u32,
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl TileWindow {
    pub fn width(&self) -> u32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> u32 {
        self.y1 - self.y0
    }

    pub fn to_xyxy(&self) -> XyXy<f64> {
        XyXy::from_xyxy([
            self.x0 as f64,
            self.y0 as f64,
            self.x1 as f64,
            self.y1 as f64,
        ])
    }

    pub fn frame(&self) -> WH<f64> {
        WH::from_wh([self.width() as f64, self.height() as f64])
    }
}

/// The grid of overlapping tiles covering an image.
///
/// Adjacent cells start `stride = tile_size - overlap` pixels apart. Cells on
/// the right and bottom are truncated at the image border, so the last column
/// and row always end exactly at the image edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    image_w: u32,
    image_h: u32,
    tile_size: u32,
    stride: u32,
    x_steps: u32,
    y_steps: u32,
}

impl TileGrid {
    pub fn new(image_w: u32, image_h: u32, tile_size: u32, overlap: u32) -> Result<Self> {
        ensure!(tile_size > 0, "tile_size must be positive");
        ensure!(
            overlap < tile_size,
            "overlap ({}) must be less than tile_size ({})",
            overlap,
            tile_size
        );
        let stride = tile_size - overlap;

        Ok(Self {
            image_w,
            image_h,
            tile_size,
            stride,
            x_steps: Self::steps(image_w, tile_size, stride),
            y_steps: Self::steps(image_h, tile_size, stride),
        })
    }

    /// Number of cells along an axis of length `dim`, at least one.
    pub fn steps(dim: u32, tile_size: u32, stride: u32) -> u32 {
        if dim <= tile_size {
            1
        } else {
            (dim - tile_size).div_ceil(stride) + 1
        }
    }

    pub fn stride(&self) -> u32 {
        self.stride
    }

    pub fn x_steps(&self) -> u32 {
        self.x_steps
    }

    pub fn y_steps(&self) -> u32 {
        self.y_steps
    }

    /// The window of cell `(xi, yi)`, or `None` if it is outside the grid or
    /// has no area.
    pub fn window(&self, xi: u32, yi: u32) -> Option<TileWindow> {
        if xi >= self.x_steps || yi >= self.y_steps {
            return None;
        }

        let x0 = xi * self.stride;
        let y0 = yi * self.stride;
        let x1 = x0.saturating_add(self.tile_size).min(self.image_w);
        let y1 = y0.saturating_add(self.tile_size).min(self.image_h);
        (x1 > x0 && y1 > y0).then(|| TileWindow {
            xi,
            yi,
            x0,
            y0,
            x1,
            y1,
        })
    }

    /// Iterate windows in row-major order.
    pub fn iter(&self) -> TileIter {
        TileIter {
            grid: *self,
            xi: 0,
            yi: 0,
        }
    }
}

impl IntoIterator for &TileGrid {
    type Item = TileWindow;
    type IntoIter = TileIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct TileIter {
    grid: TileGrid,
    xi: u32,
    yi: u32,
}

impl Iterator for TileIter {
    type Item = TileWindow;

    fn next(&mut self) -> Option<Self::Item> {
        while self.yi < self.grid.y_steps {
            let (xi, yi) = (self.xi, self.yi);
            self.xi += 1;
            if self.xi == self.grid.x_steps {
                self.xi = 0;
                self.yi += 1;
            }

            if let Some(window) = self.grid.window(xi, yi) {
                return Some(window);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(grid: &TileGrid) -> Vec<[u32; 4]> {
        grid.iter()
            .map(|window| [window.x0, window.y0, window.x1, window.y1])
            .collect()
    }

    #[test]
    fn stride_reaches_far_edge() {
        let grid = TileGrid::new(2000, 1000, 1024, 200).unwrap();
        assert_eq!(grid.stride(), 824);
        assert_eq!(grid.x_steps(), 3);
        assert_eq!(grid.y_steps(), 1);
        assert_eq!(
            bounds(&grid),
            [
                [0, 0, 1024, 1000],
                [824, 0, 1848, 1000],
                [1648, 0, 2000, 1000]
            ]
        );
    }

    #[test]
    fn row_major_order() {
        let grid = TileGrid::new(1200, 1200, 1024, 200).unwrap();
        let cells: Vec<_> = grid.iter().map(|window| (window.xi, window.yi)).collect();
        assert_eq!(cells, [(0, 0), (1, 0), (0, 1), (1, 1)]);
        assert_eq!(bounds(&grid)[3], [824, 824, 1200, 1200]);
    }

    #[test]
    fn small_image_single_tile() {
        let grid = TileGrid::new(300, 500, 1024, 200).unwrap();
        assert_eq!(bounds(&grid), [[0, 0, 300, 500]]);

        let grid = TileGrid::new(1024, 1024, 1024, 200).unwrap();
        assert_eq!(bounds(&grid), [[0, 0, 1024, 1024]]);
    }

    #[test]
    fn zero_overlap_partitions_image() {
        let grid = TileGrid::new(25, 10, 10, 0).unwrap();
        assert_eq!(
            bounds(&grid),
            [[0, 0, 10, 10], [10, 0, 20, 10], [20, 0, 25, 10]]
        );
    }

    #[test]
    fn restartable_iteration() {
        let grid = TileGrid::new(5000, 3000, 1024, 200).unwrap();
        let first: Vec<_> = grid.iter().collect();
        let second: Vec<_> = (&grid).into_iter().collect();
        assert_eq!(first, second);
        assert_eq!(first.len() as u32, grid.x_steps() * grid.y_steps());
    }

    #[test]
    fn empty_image_has_no_windows() {
        let grid = TileGrid::new(0, 0, 1024, 200).unwrap();
        assert_eq!(grid.iter().count(), 0);
    }

    #[test]
    fn every_pixel_covered() {
        let sizes = [(1, 1), (7, 3), (33, 17), (64, 64), (65, 100), (211, 97)];
        let params = [(16, 0), (16, 4), (16, 15), (10, 3), (64, 1)];

        for (image_w, image_h) in sizes {
            for (tile_size, overlap) in params {
                let grid = TileGrid::new(image_w, image_h, tile_size, overlap).unwrap();
                let mut covered = vec![false; (image_w * image_h) as usize];

                for window in &grid {
                    assert!(window.width() <= tile_size && window.height() <= tile_size);
                    assert!(window.x1 <= image_w && window.y1 <= image_h);
                    for y in window.y0..window.y1 {
                        for x in window.x0..window.x1 {
                            covered[(y * image_w + x) as usize] = true;
                        }
                    }
                }
                assert!(
                    covered.iter().all(|&hit| hit),
                    "image {}x{} with tile {} overlap {} is not covered",
                    image_w,
                    image_h,
                    tile_size,
                    overlap
                );
            }
        }
    }

    #[test]
    fn huge_tile_size_does_not_wrap() {
        let grid = TileGrid::new(100, 100, u32::MAX, 0).unwrap();
        assert_eq!(bounds(&grid), [[0, 0, 100, 100]]);

        let grid = TileGrid::new(u32::MAX, 1, u32::MAX - 1, 0).unwrap();
        assert_eq!(grid.x_steps(), 2);
        assert_eq!(
            bounds(&grid),
            [[0, 0, u32::MAX - 1, 1], [u32::MAX - 1, 0, u32::MAX, 1]]
        );
    }

    #[test]
    fn reject_invalid_parameters() {
        assert!(TileGrid::new(100, 100, 0, 0).is_err());
        assert!(TileGrid::new(100, 100, 64, 64).is_err());
        assert!(TileGrid::new(100, 100, 64, 100).is_err());
    }
}
