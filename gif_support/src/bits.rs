use std::cmp::min;

pub const MAX_SUB_BLOCK_SIZE: usize = 255;

/// Packs variable width codes least significant bit first, flushing whole bytes
/// as soon as they are complete.
pub struct BitPacker {
    data: Vec<u8>,
    accumulator: u32,
    bits: u8,
}

impl BitPacker {

    pub fn new() -> Self {
        BitPacker {
            data: Vec::new(),
            accumulator: 0,
            bits: 0,
        }
    }

    pub fn append(&mut self, code: u16, code_size: u8) {
        let mask = (1u32 << code_size) - 1;
        self.accumulator |= (code as u32 & mask) << self.bits;
        self.bits += code_size;

        while self.bits >= 8 {
            self.data.push(self.accumulator as u8);
            self.accumulator >>= 8;
            self.bits -= 8;
        }
    }

    /// Pads the last partial byte with zero bits.
    pub fn finish(mut self) -> Vec<u8> {
        if self.bits > 0 {
            self.data.push(self.accumulator as u8);
        }

        self.data
    }
}

/// Splits `data` into length-prefixed sub-blocks of at most 255 bytes, followed
/// by the zero-length block terminator.
pub fn write_sub_blocks(out: &mut Vec<u8>, data: &[u8]) {
    let mut data = data;

    while data.len() > 0 {
        let sub_block_size = min(data.len(), MAX_SUB_BLOCK_SIZE);

        out.push(sub_block_size as u8);
        out.extend_from_slice(&data[..sub_block_size]);

        data = &data[sub_block_size..];
    }

    out.push(0);
}
