//! Splits secrets into coefficient blocks and carriers into 2x2 pixel blocks.
//!
//! Carrier pixels are stored row by row starting with the bottom row of the
//! image, the way 8-bit bitmaps keep them. Blocks are handed out in
//! horizontal pairs, a band of two rows holds `width / 2` blocks and the next
//! band starts two rows further up. Within a block the upper row holds `X W`
//! and the lower row `V U`.

use std::slice::ChunksExact;

use crate::codec::Xwvu;
use crate::scheme::MAX_SHADOWS;
use crate::{Result, ShadowError};

/// An 8-bit single channel pixel buffer with its dimensions.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Carrier {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Carrier {
    /// `pixels` must hold exactly `width * height` bytes.
    pub fn new(width: usize, height: usize, pixels: Vec<u8>) -> Result<Self> {
        let expected = width.checked_mul(height).ok_or_else(|| {
            ShadowError::invalid("dimensions", format!("{width}x{height}"), "too large")
        })?;
        if pixels.len() != expected {
            return Err(ShadowError::invalid(
                "pixels",
                pixels.len(),
                format!("a {width}x{height} carrier needs {expected} bytes"),
            ));
        }

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Number of complete 2x2 blocks in this carrier.
    pub fn block_capacity(&self) -> usize {
        (self.width / 2) * (self.height / 2)
    }

    /// The block at `position`, `None` when the position lies outside this
    /// carrier.
    pub fn read_block(&self, position: &BlockPosition) -> Option<Xwvu> {
        self.contains(position).then(|| self.block_at(position))
    }

    /// Overwrites the four pixels at `position`.
    pub fn write_block(&mut self, position: &BlockPosition, block: &Xwvu) -> Result<()> {
        if !self.contains(position) {
            let (column, row) = position.coordinates(self.width.max(1));
            return Err(ShadowError::invalid(
                "position",
                format!("({column}, {row})"),
                format!("outside of a {}x{} carrier", self.width, self.height),
            ));
        }
        self.set_block_at(position, block);
        Ok(())
    }

    fn contains(&self, position: &BlockPosition) -> bool {
        position.last() < self.pixels.len()
    }

    /// Unchecked read for positions planned on a carrier of these dimensions.
    pub(crate) fn block_at(&self, position: &BlockPosition) -> Xwvu {
        Xwvu::new(
            self.pixels[position.x],
            self.pixels[position.w],
            self.pixels[position.v],
            self.pixels[position.u],
        )
    }

    pub(crate) fn set_block_at(&mut self, position: &BlockPosition, block: &Xwvu) {
        self.pixels[position.x] = block.x;
        self.pixels[position.w] = block.w;
        self.pixels[position.v] = block.v;
        self.pixels[position.u] = block.u;
    }
}

/// Offsets of the four pixels of one block inside a carrier buffer.
///
/// Positions come from [`partition_carrier`], which checks them against the
/// carrier once. [`Carrier::read_block`] and [`Carrier::write_block`] check
/// them again, a position planned for a larger carrier is refused.
/// No two blocks share a pixel.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct BlockPosition {
    x: usize,
    w: usize,
    v: usize,
    u: usize,
}

impl BlockPosition {
    /// Position of block `index` in a carrier `width` pixels wide, `width`
    /// has to be at least 2.
    fn of(index: usize, width: usize) -> Self {
        let pairs_per_band = width / 2;
        let column = 2 * (index % pairs_per_band);
        let row = 2 * (index / pairs_per_band);
        let lower = row * width + column;
        let upper = lower + width;

        Self {
            x: upper,
            w: upper + 1,
            v: lower,
            u: lower + 1,
        }
    }

    /// Largest buffer offset of the block.
    fn last(&self) -> usize {
        self.w
    }

    /// Pixel coordinate `(column, row)` of `X`, row 0 being the bottom row.
    pub fn coordinates(&self, width: usize) -> (usize, usize) {
        (self.x % width, self.x / width)
    }
}

/// Cuts the secret into consecutive blocks of `k` bytes.
///
/// Trailing bytes that do not fill a block are not part of the result, the
/// caller makes sure the secret length is a multiple of `k`.
pub fn partition_secret(secret: &[u8], k: usize) -> ChunksExact<'_, u8> {
    secret.chunks_exact(k)
}

/// Lays out `block_count` blocks over `carrier`.
pub fn partition_carrier(carrier: &Carrier, block_count: usize) -> Result<Vec<BlockPosition>> {
    let capacity = carrier.block_capacity();
    if block_count > capacity {
        return Err(ShadowError::invalid(
            "carrier",
            format!("{}x{}", carrier.width(), carrier.height()),
            format!("holds {capacity} blocks but {block_count} are needed"),
        ));
    }

    Ok((0..block_count)
        .map(|index| BlockPosition::of(index, carrier.width()))
        .collect())
}

/// Makes the evaluation points of every block pairwise distinct.
///
/// `points[image][block]` is the `X` of `block` in carrier `image`. A point
/// that equals any point of an earlier carrier is incremented (wrapping) and
/// compared again from the first carrier on. Returns the number of
/// increments.
pub fn enforce_distinct_x(points: &mut [Vec<u8>]) -> Result<usize> {
    if points.len() > MAX_SHADOWS {
        return Err(ShadowError::invalid(
            "n",
            points.len(),
            format!("at most {MAX_SHADOWS} distinct points exist"),
        ));
    }
    let block_count = points.first().map_or(0, Vec::len);
    if let Some(ragged) = points.iter().position(|p| p.len() != block_count) {
        return Err(ShadowError::invalid(
            "points",
            ragged,
            format!("every carrier needs {block_count} points"),
        ));
    }

    let mut adjustments = 0;
    for block in 0..block_count {
        for image in 1..points.len() {
            while (0..image).any(|other| points[other][block] == points[image][block]) {
                let bumped = points[image][block].wrapping_add(1);
                log::trace!(
                    "block {block}: X of shadow #{image} collides, {} -> {bumped}",
                    points[image][block]
                );
                points[image][block] = bumped;
                adjustments += 1;
            }
        }
    }

    Ok(adjustments)
}
