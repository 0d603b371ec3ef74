use std::{fs, path::{Path, PathBuf}};

use byteorder::{ByteOrder, LittleEndian};

use crate::errors::RecorderError;

// see https://en.wikipedia.org/wiki/BMP_file_format

const BMP_SIGNATURE: &[u8; 2] = b"BM";
const BMP_HEADERS_SIZE: usize = 54; // file header + BITMAPINFOHEADER
const BITS_PER_PIXEL: u16 = 32;
const COMPRESSION_NONE: u32 = 0;
const COMPRESSION_BITFIELDS: u32 = 3;

/// A captured frame, BGRA pixels starting at the top left.
pub struct BMPFrame {
    pub width: u16,
    pub height: u16,
    pub pixels: Vec<u8>,
}

pub fn frame_file_name(index: usize) -> String {
    format!("frame_{:05}.bmp", index)
}

/// Numbered frames of a recording, in order, up to the first missing index.
pub fn discover_frames(dir: &Path) -> Result<Vec<PathBuf>, RecorderError> {
    if !dir.is_dir() {
        return Err(RecorderError::FramesNotFound {
            description: format!("{} is not a directory", dir.display()),
        });
    }

    let mut frames = Vec::new();
    loop {
        let path = dir.join(frame_file_name(frames.len()));
        if !path.is_file() {
            break;
        }

        frames.push(path);
    }

    if frames.is_empty() {
        return Err(RecorderError::FramesNotFound {
            description: format!("{} does not contain {}", dir.display(), frame_file_name(0)),
        });
    }

    debug!("found {} frames in {}", frames.len(), dir.display());
    Ok(frames)
}

pub fn load_frame(path: &Path) -> Result<BMPFrame, RecorderError> {
    let data = fs::read(path)?;

    read_bmp_frame(&data).map_err(|err| RecorderError::InvalidFrame {
        description: format!("{}: {}", path.display(), err),
    })
}

pub fn read_bmp_frame(data: &[u8]) -> Result<BMPFrame, String> {
    if data.len() < BMP_HEADERS_SIZE || &data[0..2] != BMP_SIGNATURE {
        return Err("not a bmp file".to_string());
    }

    let pixels_offset = LittleEndian::read_u32(&data[10..14]) as usize;
    let width = LittleEndian::read_i32(&data[18..22]);
    let height = LittleEndian::read_i32(&data[22..26]);
    let bits_per_pixel = LittleEndian::read_u16(&data[28..30]);
    let compression = LittleEndian::read_u32(&data[30..34]);

    if bits_per_pixel != BITS_PER_PIXEL {
        return Err(format!("expected {} bits per pixel, got {}", BITS_PER_PIXEL, bits_per_pixel));
    }
    if compression != COMPRESSION_NONE && compression != COMPRESSION_BITFIELDS {
        return Err(format!("unsupported compression {}", compression));
    }
    if width <= 0 || width > u16::MAX as i32 || height == 0 || height.unsigned_abs() > u16::MAX as u32 {
        return Err(format!("unsupported dimensions {}x{}", width, height));
    }

    // negative height means rows are stored top-down
    let top_down = height < 0;
    let width = width as usize;
    let height = height.unsigned_abs() as usize;

    let row_size = width * 4;
    let pixels_end = pixels_offset + row_size * height;
    if pixels_end > data.len() {
        return Err(format!("expected {} bytes of pixel data, file has {}", pixels_end, data.len()));
    }

    let rows = &data[pixels_offset..pixels_end];
    let pixels = if top_down {
        rows.to_vec()
    } else {
        rows.chunks(row_size).rev().flatten().copied().collect()
    };

    Ok(BMPFrame {
        width: width as u16,
        height: height as u16,
        pixels,
    })
}
