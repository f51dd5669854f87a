//! Minimal reader and writer for uncompressed 8-bit BMP files.
//!
//! Everything in front of the pixel data (file header, info header, palette)
//! and anything behind it is kept byte for byte, so writing a bitmap back
//! only changes pixel values. Pixel rows are exposed as a [`Carrier`] whose
//! width is the padded row stride.

use std::fs::{self, File};
use std::io::{Cursor, Write};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::planner::Carrier;
use crate::{Persist, Result, ShadowError};

const MAGIC: &[u8; 2] = b"BM";
const FILE_HEADER_LEN: usize = 14;
const INFO_HEADER_LEN: usize = 40;
const PALETTE_LEN: usize = 256 * 4;

const PIXEL_OFFSET_AT: u64 = 10;
const WIDTH_AT: u64 = 18;
const HEIGHT_AT: u64 = 22;
const BITS_PER_PIXEL_AT: u64 = 28;
const COMPRESSION_AT: u64 = 30;

const BITS_PER_PIXEL: u16 = 8;
const BI_RGB: u32 = 0;

/// An 8-bit bottom-up bitmap.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Bitmap {
    header: Vec<u8>,
    width: usize,
    carrier: Carrier,
    trailer: Vec<u8>,
}

/// Rows of 8-bit pixels are padded to multiples of four bytes.
pub fn row_stride(width: usize) -> usize {
    (width + 3) / 4 * 4
}

impl Bitmap {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| {
            log::error!("Error reading bitmap {path:?}: {source}");
            ShadowError::ReadError { source }
        })?;

        Self::from_bytes(bytes)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        if bytes.len() < FILE_HEADER_LEN + INFO_HEADER_LEN {
            return Err(ShadowError::InvalidBitmap(format!(
                "{} bytes are too short for a bitmap header",
                bytes.len()
            )));
        }
        if &bytes[..2] != MAGIC {
            return Err(ShadowError::InvalidBitmap("missing `BM` signature".into()));
        }

        let mut cursor = Cursor::new(&bytes[..]);
        cursor.set_position(PIXEL_OFFSET_AT);
        let pixel_offset = cursor.read_u32::<LittleEndian>()? as usize;
        cursor.set_position(WIDTH_AT);
        let width = cursor.read_i32::<LittleEndian>()?;
        cursor.set_position(HEIGHT_AT);
        let height = cursor.read_i32::<LittleEndian>()?;
        cursor.set_position(BITS_PER_PIXEL_AT);
        let bits_per_pixel = cursor.read_u16::<LittleEndian>()?;
        cursor.set_position(COMPRESSION_AT);
        let compression = cursor.read_u32::<LittleEndian>()?;

        if bits_per_pixel != BITS_PER_PIXEL || compression != BI_RGB {
            return Err(ShadowError::UnsupportedBitmap {
                bits_per_pixel,
                compression,
            });
        }
        if width <= 0 {
            return Err(ShadowError::InvalidBitmap(format!("width {width}")));
        }
        if height <= 0 {
            return Err(ShadowError::InvalidBitmap(format!(
                "height {height}, only bottom-up bitmaps are supported"
            )));
        }

        let width = width as usize;
        let height = height as usize;
        let stride = row_stride(width);
        let pixel_end = pixel_offset + stride * height;
        if pixel_offset < FILE_HEADER_LEN + INFO_HEADER_LEN || pixel_end > bytes.len() {
            return Err(ShadowError::InvalidBitmap(format!(
                "pixel data {pixel_offset}..{pixel_end} exceeds file of {} bytes",
                bytes.len()
            )));
        }

        let mut bytes = bytes;
        let trailer = bytes.split_off(pixel_end);
        let pixels = bytes.split_off(pixel_offset);

        Ok(Self {
            header: bytes,
            width,
            carrier: Carrier::new(stride, height, pixels)?,
            trailer,
        })
    }

    /// Creates a bitmap with a linear grey palette.
    ///
    /// `pixels` holds `width * height` bytes, bottom row first, rows are padded
    /// here.
    pub fn grayscale(width: usize, height: usize, pixels: &[u8]) -> Result<Self> {
        let too_large = || {
            ShadowError::invalid(
                "dimensions",
                format!("{width}x{height}"),
                "too large for a bitmap",
            )
        };
        let (Ok(declared_width), Ok(declared_height)) = (i32::try_from(width), i32::try_from(height))
        else {
            return Err(too_large());
        };

        let stride = row_stride(width);
        let pixel_offset = FILE_HEADER_LEN + INFO_HEADER_LEN + PALETTE_LEN;
        let image_size = stride.checked_mul(height).ok_or_else(too_large)?;
        let (Ok(declared_image_size), Ok(declared_file_size)) = (
            u32::try_from(image_size),
            u32::try_from(pixel_offset + image_size),
        ) else {
            return Err(too_large());
        };

        if width == 0 || height == 0 || pixels.len() != width * height {
            return Err(ShadowError::invalid(
                "pixels",
                pixels.len(),
                format!("a {width}x{height} bitmap needs {} bytes", width * height),
            ));
        }

        let mut header = Vec::with_capacity(pixel_offset);
        header.write_all(MAGIC)?;
        header.write_u32::<LittleEndian>(declared_file_size)?;
        header.write_u32::<LittleEndian>(0)?;
        header.write_u32::<LittleEndian>(pixel_offset as u32)?;
        header.write_u32::<LittleEndian>(INFO_HEADER_LEN as u32)?;
        header.write_i32::<LittleEndian>(declared_width)?;
        header.write_i32::<LittleEndian>(declared_height)?;
        header.write_u16::<LittleEndian>(1)?;
        header.write_u16::<LittleEndian>(BITS_PER_PIXEL)?;
        header.write_u32::<LittleEndian>(BI_RGB)?;
        header.write_u32::<LittleEndian>(declared_image_size)?;
        // 72 dpi
        header.write_i32::<LittleEndian>(2835)?;
        header.write_i32::<LittleEndian>(2835)?;
        header.write_u32::<LittleEndian>(256)?;
        header.write_u32::<LittleEndian>(0)?;
        for grey in 0..=255u8 {
            header.write_all(&[grey, grey, grey, 0])?;
        }

        let mut padded = Vec::with_capacity(image_size);
        for row in pixels.chunks_exact(width) {
            padded.extend_from_slice(row);
            padded.resize(padded.len() + stride - width, 0);
        }

        Ok(Self {
            header,
            width,
            carrier: Carrier::new(stride, height, padded)?,
            trailer: Vec::new(),
        })
    }

    /// A bitmap with the header and palette of `self` and the given pixels.
    pub fn with_carrier(&self, carrier: Carrier) -> Result<Self> {
        if carrier.dimensions() != self.carrier.dimensions() {
            let (width, height) = carrier.dimensions();
            return Err(ShadowError::invalid(
                "carrier",
                format!("{width}x{height}"),
                format!(
                    "bitmap stores {}x{} pixels",
                    self.carrier.width(),
                    self.carrier.height()
                ),
            ));
        }

        Ok(Self {
            header: self.header.clone(),
            width: self.width,
            carrier,
            trailer: self.trailer.clone(),
        })
    }

    /// Width as declared in the header, without row padding.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.carrier.height()
    }

    /// Bytes per pixel row including padding.
    pub fn stride(&self) -> usize {
        self.carrier.width()
    }

    pub fn carrier(&self) -> &Carrier {
        &self.carrier
    }

    pub fn carrier_mut(&mut self) -> &mut Carrier {
        &mut self.carrier
    }

    pub fn into_carrier(self) -> Carrier {
        self.carrier
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes =
            Vec::with_capacity(self.header.len() + self.carrier.pixels().len() + self.trailer.len());
        bytes.extend_from_slice(&self.header);
        bytes.extend_from_slice(self.carrier.pixels());
        bytes.extend_from_slice(&self.trailer);
        bytes
    }
}

impl Persist for Bitmap {
    fn save_as(&self, file: &Path) -> Result<()> {
        let mut f = File::create(file).map_err(|e| {
            log::error!("Error creating file {file:?}: {e}");
            ShadowError::WriteError { source: e }
        })?;

        f.write_all(&self.to_bytes())
            .map_err(|source| ShadowError::WriteError { source })
    }
}
