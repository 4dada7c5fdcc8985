//! Byte-valued cost grid.

use crate::error::{Error, Result};

/// Rasterized cost model: a row-major grid of scores (higher is better).
///
/// `x0`/`y0` give the absolute coordinate of cell (0, 0) in full-resolution
/// pixels. For a model grid that is simply its pixel offset; coarse pyramid
/// levels keep the same units, so their origin is a multiple of the level's
/// decimation factor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CostGrid {
    width: usize,
    height: usize,
    x0: i32,
    y0: i32,
    data: Vec<u8>,
}

impl CostGrid {
    /// Wrap an existing buffer. Fails if `data.len() != width * height`.
    pub fn new(width: usize, height: usize, x0: i32, y0: i32, data: Vec<u8>) -> Result<Self> {
        if data.len() != width * height {
            return Err(Error::InvalidGrid {
                width,
                height,
                len: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            x0,
            y0,
            data,
        })
    }

    /// All-zero grid.
    pub fn zeros(width: usize, height: usize, x0: i32, y0: i32) -> Self {
        Self {
            width,
            height,
            x0,
            y0,
            data: vec![0; width * height],
        }
    }

    /// Grid filled by evaluating `f(ix, iy)` at each cell.
    pub fn from_fn(
        width: usize,
        height: usize,
        x0: i32,
        y0: i32,
        mut f: impl FnMut(usize, usize) -> u8,
    ) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for iy in 0..height {
            for ix in 0..width {
                data.push(f(ix, iy));
            }
        }
        Self {
            width,
            height,
            x0,
            y0,
            data,
        }
    }

    /// Number of columns.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Absolute full-resolution pixel x of column 0.
    #[inline]
    pub fn x0(&self) -> i32 {
        self.x0
    }

    /// Absolute full-resolution pixel y of row 0.
    #[inline]
    pub fn y0(&self) -> i32 {
        self.y0
    }

    /// Raw row-major scores.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Value at cell (ix, iy). Panics if out of range.
    #[inline]
    pub fn get(&self, ix: usize, iy: usize) -> u8 {
        self.data[iy * self.width + ix]
    }

    /// Value at signed cell index, `None` if outside the grid.
    #[inline]
    pub fn get_checked(&self, ix: i32, iy: i32) -> Option<u8> {
        if ix < 0 || iy < 0 || ix as usize >= self.width || iy as usize >= self.height {
            return None;
        }
        Some(self.data[iy as usize * self.width + ix as usize])
    }

    #[cfg(test)]
    pub(crate) fn set(&mut self, ix: usize, iy: usize, value: u8) {
        self.data[iy * self.width + ix] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_bad_length() {
        let err = CostGrid::new(4, 4, 0, 0, vec![0; 15]).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidGrid {
                width: 4,
                height: 4,
                len: 15
            }
        ));
    }

    #[test]
    fn test_from_fn_row_major() {
        let g = CostGrid::from_fn(3, 2, -1, 5, |x, y| (y * 3 + x) as u8);
        assert_eq!(g.data(), &[0, 1, 2, 3, 4, 5]);
        assert_eq!(g.get(2, 1), 5);
        assert_eq!(g.x0(), -1);
        assert_eq!(g.y0(), 5);
    }

    #[test]
    fn test_get_checked_bounds() {
        let g = CostGrid::from_fn(2, 2, 0, 0, |_, _| 7);
        assert_eq!(g.get_checked(1, 1), Some(7));
        assert_eq!(g.get_checked(-1, 0), None);
        assert_eq!(g.get_checked(0, 2), None);
    }
}
