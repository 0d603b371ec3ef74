use std::collections::HashMap;

use crate::bits::BitPacker;

// palette indices are 8 bits wide, so codes 0..=255 stand for themselves
pub const MIN_CODE_SIZE: u8 = 8;
pub const CLEAR_CODE: u16 = 1 << MIN_CODE_SIZE;
pub const END_CODE: u16 = CLEAR_CODE + 1;
pub const FIRST_FREE_CODE: u16 = END_CODE + 1;
pub const MAX_CODES: u16 = 4096;
pub const MAX_CODE_SIZE: u8 = 12;

/// Dictionary of one frame (or of one run between two clear codes).
///
/// An entry is keyed by the code of its prefix string plus the index that
/// extends it, which identifies the full index string uniquely.
struct CodeTable {
    entries: HashMap<(u16, u8), u16>,
    next_code: u16,
}

impl CodeTable {

    fn new() -> Self {
        CodeTable {
            entries: HashMap::new(),
            next_code: FIRST_FREE_CODE,
        }
    }

    fn find(&self, prefix: u16, index: u8) -> Option<u16> {
        self.entries.get(&(prefix, index)).copied()
    }

    fn is_full(&self) -> bool {
        self.next_code >= MAX_CODES
    }

    fn insert(&mut self, prefix: u16, index: u8) -> u16 {
        let code = self.next_code;
        self.entries.insert((prefix, index), code);
        self.next_code += 1;
        code
    }
}

/// Compresses the palette indices of a single frame into a GIF LZW code stream.
///
/// The stream starts with a clear code and ends with the end-of-information code.
/// Every frame gets a fresh compressor, nothing is shared between frames.
pub struct LZWCompressor {
    table: CodeTable,
    code_size: u8,
    pattern: Option<u16>,
    packer: BitPacker,
}

impl LZWCompressor {

    pub fn new() -> Self {
        let mut compressor = LZWCompressor {
            table: CodeTable::new(),
            code_size: MIN_CODE_SIZE + 1,
            pattern: None,
            packer: BitPacker::new(),
        };

        compressor.emit(CLEAR_CODE);
        compressor
    }

    pub fn push(&mut self, index: u8) {
        let prefix = match self.pattern {
            Some(v) => v,
            None => {
                self.pattern = Some(index as u16);
                return;
            }
        };

        if let Some(code) = self.table.find(prefix, index) {
            self.pattern = Some(code);
            return;
        }

        self.emit(prefix);

        if self.table.is_full() {
            trace!("code table is full, emitting clear code");
            self.emit(CLEAR_CODE);
            self.table = CodeTable::new();
            self.code_size = MIN_CODE_SIZE + 1;
        } else {
            self.grow_code_size();
            self.table.insert(prefix, index);
        }

        self.pattern = Some(index as u16);
    }

    pub fn finish(mut self) -> Vec<u8> {
        if let Some(prefix) = self.pattern.take() {
            self.emit(prefix);
            self.grow_code_size();
        }

        self.emit(END_CODE);
        self.packer.finish()
    }

    fn emit(&mut self, code: u16) {
        self.packer.append(code, self.code_size);
    }

    // readers widen their codes once the code about to be assigned no longer fits
    fn grow_code_size(&mut self) {
        if self.table.next_code == 1 << self.code_size && self.code_size < MAX_CODE_SIZE {
            self.code_size += 1;
        }
    }
}

/// Compresses a whole frame of palette indices. The result is the packed code
/// stream, not yet split into sub-blocks.
pub fn compress(indices: &[u8]) -> Vec<u8> {
    let mut compressor = LZWCompressor::new();

    for index in indices {
        compressor.push(*index);
    }

    compressor.finish()
}

#[cfg(test)]
mod tests {
    use weezl::{decode::Decoder, BitOrder};

    use super::*;

    fn decompress(data: &[u8]) -> Vec<u8> {
        Decoder::new(BitOrder::Lsb, MIN_CODE_SIZE)
            .decode(data)
            .expect("failed to decode lzw data")
    }

    fn noise(len: usize, seed: u32) -> Vec<u8> {
        let mut state = seed;

        (0..len).map(|_| {
            state = state.wrapping_mul(1103515245).wrapping_add(12345);
            ((state >> 16) % 216) as u8
        }).collect()
    }

    #[test]
    fn test_compress_single_index() {
        // clear, 5, end at 9 bits each
        assert_eq!(compress(&[5]), vec![0x00, 0x0B, 0x04, 0x04]);
        assert_eq!(decompress(&compress(&[5])), vec![5]);
    }

    #[test]
    fn test_compress_empty() {
        let data = compress(&[]);

        // clear, end
        assert_eq!(data, vec![0x00, 0x03, 0x02]);
        assert_eq!(decompress(&data), Vec::<u8>::new());
    }

    #[test]
    fn test_compress_repeated_pattern() {
        let indices = vec![1, 1, 1, 1, 2, 1, 1, 2];
        assert_eq!(decompress(&compress(&indices)), indices);
    }

    #[test]
    fn test_solid_frame_is_smaller() {
        let indices = vec![180u8; 64 * 64];
        let data = compress(&indices);

        assert!(data.len() * 10 < indices.len());
        assert_eq!(decompress(&data), indices);
    }

    #[test]
    fn test_compress_noise() {
        // enough distinct strings to fill the code table several times
        let indices = noise(200_000, 42);
        assert_eq!(decompress(&compress(&indices)), indices);
    }

    #[test]
    fn test_compress_gradient() {
        let indices: Vec<u8> = (0..100_000).map(|v| ((v / 7) % 216) as u8).collect();
        assert_eq!(decompress(&compress(&indices)), indices);
    }

    #[test]
    fn test_code_size_bounds() {
        let mut compressor = LZWCompressor::new();
        let mut saw_max = false;
        let mut saw_reset = false;

        for index in noise(50_000, 7) {
            compressor.push(index);

            assert!(compressor.code_size > MIN_CODE_SIZE);
            assert!(compressor.code_size <= MAX_CODE_SIZE);
            assert!(compressor.table.next_code <= MAX_CODES);

            if compressor.code_size == MAX_CODE_SIZE {
                saw_max = true;
            }
            if saw_max && compressor.code_size == MIN_CODE_SIZE + 1 {
                saw_reset = true;
            }
        }

        assert!(saw_max);
        assert!(saw_reset);
    }

    #[test]
    fn test_code_size_grows_with_table() {
        let mut compressor = LZWCompressor::new();

        for index in noise(10_000, 3) {
            compressor.push(index);

            let next_code = compressor.table.next_code as u32;
            if next_code < MAX_CODES as u32 {
                assert!(next_code <= 1 << compressor.code_size);
                assert!(next_code > 1 << (compressor.code_size - 1));
            }
        }
    }

    #[test]
    fn test_compression_is_deterministic() {
        let indices = noise(20_000, 11);
        assert_eq!(compress(&indices), compress(&indices));
    }
}
