//! Packed two-dimensional bit field.
//!
//! Stores a `width x height` grid of booleans in a byte buffer, one bit
//! per cell. The bit index of `(x, y)` is `y * width + x`, little-endian
//! within each byte. Neighbor counting understands both bounded grids
//! (off-grid neighbors are permanently dead) and toroidal wraparound.

use std::fmt;

use thiserror::Error;

/// Field result type
pub type Result<T> = std::result::Result<T, FieldError>;

/// Errors from field construction and cell access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("invalid field dimensions: {width}x{height}")]
    InvalidDimension { width: usize, height: usize },

    #[error("cell ({x}, {y}) outside field bounds {width}x{height}")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
}

/// The 8-cell Moore neighborhood, as signed offsets.
const NEIGHBOR_OFFSETS: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// A two-dimensional field of bits with toroidal or bounded edges.
///
/// All cell accessors are bounds-checked and return [`FieldError::OutOfBounds`]
/// for coordinates outside `[0, width) x [0, height)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitField {
    width: usize,
    height: usize,
    /// Toroidal edges when true; bounded (dead beyond the edge) when false.
    wrap_around: bool,
    /// Packed cells, `(width * height).div_ceil(8)` bytes.
    bits: Vec<u8>,
}

impl BitField {
    /// Create a field of the given dimensions with every cell dead.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(FieldError::InvalidDimension { width, height });
        }
        Ok(Self {
            width,
            height,
            wrap_around: false,
            bits: vec![0; (width * height).div_ceil(8)],
        })
    }

    /// Build a field from ASCII rows, `'#'` for alive and `'.'` for dead.
    ///
    /// Rows must be non-empty and uniform in width.
    pub fn from_rows(rows: &[&str]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.len());
        let mut field = Self::new(width, height)?;
        for (y, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(FieldError::InvalidDimension {
                    width: row.len(),
                    height,
                });
            }
            for (x, byte) in row.bytes().enumerate() {
                match byte {
                    b'#' => field.set(x, y)?,
                    b'.' => {}
                    _ => {
                        return Err(FieldError::InvalidDimension { width, height });
                    }
                }
            }
        }
        Ok(field)
    }

    /// Field width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Field height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// Always false; dimensions are validated non-zero at construction.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether neighbor counting wraps at the edges.
    pub fn wrap_around(&self) -> bool {
        self.wrap_around
    }

    /// Set the edge behavior for neighbor counting.
    pub fn set_wrap_around(&mut self, wrap_around: bool) {
        self.wrap_around = wrap_around;
    }

    /// Number of live cells.
    pub fn population(&self) -> usize {
        // Bits past width * height are never set, so raw bytes are safe
        // to count.
        self.bits.iter().map(|byte| byte.count_ones() as usize).sum()
    }

    /// Get the cell at `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> Result<bool> {
        let i = self.index(x, y)?;
        Ok(self.bit(i))
    }

    /// Set the cell at `(x, y)` alive.
    pub fn set(&mut self, x: usize, y: usize) -> Result<()> {
        let i = self.index(x, y)?;
        self.bits[i >> 3] |= 1 << (i & 7);
        Ok(())
    }

    /// Set the cell at `(x, y)` dead.
    pub fn unset(&mut self, x: usize, y: usize) -> Result<()> {
        let i = self.index(x, y)?;
        self.bits[i >> 3] &= !(1 << (i & 7));
        Ok(())
    }

    /// Flip the cell at `(x, y)`.
    pub fn toggle(&mut self, x: usize, y: usize) -> Result<()> {
        let i = self.index(x, y)?;
        self.bits[i >> 3] ^= 1 << (i & 7);
        Ok(())
    }

    /// Count the live cells in the Moore neighborhood of `(x, y)`.
    ///
    /// With wraparound, offsets wrap modulo the field dimensions; without
    /// it, off-grid offsets are skipped and count as dead. The result is
    /// in `[0, 8]`.
    pub fn neighbor_count(&self, x: usize, y: usize) -> Result<u8> {
        self.index(x, y)?;
        let (w, h) = (self.width as i64, self.height as i64);
        let mut count = 0;
        for (dx, dy) in NEIGHBOR_OFFSETS {
            let nx = x as i64 + dx;
            let ny = y as i64 + dy;
            let in_bounds = (0..w).contains(&nx) && (0..h).contains(&ny);
            if !in_bounds && !self.wrap_around {
                continue;
            }
            let nx = nx.rem_euclid(w) as usize;
            let ny = ny.rem_euclid(h) as usize;
            if self.bit(ny * self.width + nx) {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Change the field dimensions in place.
    ///
    /// Cells inside the overlap of the old and new extents are preserved;
    /// cells outside the new extent are discarded; new area starts dead.
    /// No-op when the dimensions are unchanged.
    pub fn resize(&mut self, new_width: usize, new_height: usize) -> Result<()> {
        if new_width == 0 || new_height == 0 {
            return Err(FieldError::InvalidDimension {
                width: new_width,
                height: new_height,
            });
        }
        if new_width == self.width && new_height == self.height {
            return Ok(());
        }
        // Rows are not byte-aligned, so the copy is bitwise.
        let mut new_bits = vec![0u8; (new_width * new_height).div_ceil(8)];
        let min_width = self.width.min(new_width);
        let min_height = self.height.min(new_height);
        for y in 0..min_height {
            for x in 0..min_width {
                if self.bit(y * self.width + x) {
                    let i = y * new_width + x;
                    new_bits[i >> 3] |= 1 << (i & 7);
                }
            }
        }
        self.bits = new_bits;
        self.width = new_width;
        self.height = new_height;
        Ok(())
    }

    /// Bit index of `(x, y)`, or [`FieldError::OutOfBounds`].
    fn index(&self, x: usize, y: usize) -> Result<usize> {
        if x >= self.width || y >= self.height {
            return Err(FieldError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(y * self.width + x)
    }

    /// Read a bit by raw index. Callers guarantee `i < width * height`.
    fn bit(&self, i: usize) -> bool {
        self.bits[i >> 3] & (1 << (i & 7)) != 0
    }
}

impl fmt::Display for BitField {
    /// Renders the field as rows of `'#'` (alive) and `'.'` (dead).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                let alive = self.bit(y * self.width + x);
                f.write_str(if alive { "#" } else { "." })?;
            }
            if y + 1 < self.height {
                f.write_str("\n")?;
            }
        }
        Ok(())
    }
}
