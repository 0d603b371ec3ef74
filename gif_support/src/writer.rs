use byteorder::{ByteOrder, LittleEndian};

use crate::{bits::write_sub_blocks, common::ColorTable, lzw::MIN_CODE_SIZE};

pub const SIGNATURE: &[u8; 6] = b"GIF89a";
pub const EXTENSION_INTRODUCER: u8 = 0x21;
pub const APPLICATION_EXTENSION_LABEL: u8 = 0xFF;
pub const GRAPHICS_CONTROL_LABEL: u8 = 0xF9;
pub const IMAGE_SEPARATOR: u8 = 0x2C;
pub const TRAILER: u8 = 0x3B;

pub const NETSCAPE_APPLICATION: &[u8; 11] = b"NETSCAPE2.0";

// previous frame area is cleared to the background color
pub const DISPOSAL_RESTORE_TO_BACKGROUND: u8 = 2;

pub fn write_header(data: &mut Vec<u8>, width: u16, height: u16) {
    data.extend_from_slice(SIGNATURE);
    write_logical_screen_descriptor(data, width, height);
}

fn write_logical_screen_descriptor(data: &mut Vec<u8>, width: u16, height: u16) {
    let mut descriptor = [0u8; 7];

    LittleEndian::write_u16(&mut descriptor[0..2], width);
    LittleEndian::write_u16(&mut descriptor[2..4], height);

    let mut packed: u8 = 0;
    packed |= 0b1000_0000; // use global color table
    packed |= 7 << 4; // color resolution, 8 bits per channel
    packed |= 7; // 2^(7 + 1) = 256 color table entries
    descriptor[4] = packed;

    // descriptor[5] is background color index, 0
    // descriptor[6] is pixel aspect ratio, 0 means no aspect info

    data.extend_from_slice(&descriptor);
}

pub fn write_color_table(data: &mut Vec<u8>, color_table: &ColorTable) {
    data.extend_from_slice(&color_table.to_bytes());
}

/// Netscape looping extension, `loop_count` 0 repeats forever.
pub fn write_loop_extension(data: &mut Vec<u8>, loop_count: u16) {
    data.push(EXTENSION_INTRODUCER);
    data.push(APPLICATION_EXTENSION_LABEL);
    data.push(NETSCAPE_APPLICATION.len() as u8);
    data.extend_from_slice(NETSCAPE_APPLICATION);

    let mut sub_block = [0u8; 4];
    sub_block[0] = 3; // sub-block size
    sub_block[1] = 1; // loop sub-block id
    LittleEndian::write_u16(&mut sub_block[2..4], loop_count);
    data.extend_from_slice(&sub_block);

    data.push(0);
}

pub fn write_graphics_control_extension(data: &mut Vec<u8>, delay: u16) {
    let mut extension = [0u8; 8];
    extension[0] = EXTENSION_INTRODUCER;
    extension[1] = GRAPHICS_CONTROL_LABEL;
    extension[2] = 4; // block size

    // no user input, no transparent color
    extension[3] = DISPOSAL_RESTORE_TO_BACKGROUND << 2;

    LittleEndian::write_u16(&mut extension[4..6], delay);

    // extension[6] is transparent color index, unused
    // extension[7] is block terminator

    data.extend_from_slice(&extension);
}

pub fn write_image_descriptor(data: &mut Vec<u8>, width: u16, height: u16) {
    let mut descriptor = [0u8; 10];
    descriptor[0] = IMAGE_SEPARATOR;

    LittleEndian::write_u16(&mut descriptor[1..3], 0); // left
    LittleEndian::write_u16(&mut descriptor[3..5], 0); // top
    LittleEndian::write_u16(&mut descriptor[5..7], width);
    LittleEndian::write_u16(&mut descriptor[7..9], height);

    let packed = 0; // no local color table, not interlaced
    descriptor[9] = packed;

    data.extend_from_slice(&descriptor);
}

/// `compressed` is the packed lzw code stream of one frame.
pub fn write_image_data(data: &mut Vec<u8>, compressed: &[u8]) {
    data.push(MIN_CODE_SIZE);
    write_sub_blocks(data, compressed);
}

pub fn write_trailer(data: &mut Vec<u8>) {
    data.push(TRAILER);
}

#[cfg(test)]
mod tests {
    use crate::common::COLOR_TABLE_SIZE;

    use super::*;

    #[test]
    fn test_write_header() {
        let mut data = Vec::new();
        write_header(&mut data, 300, 2);

        assert_eq!(data, vec![71, 73, 70, 56, 57, 97, 44, 1, 2, 0, 0xF7, 0, 0]);
    }

    #[test]
    fn test_write_color_table() {
        let mut data = Vec::new();
        write_color_table(&mut data, &ColorTable::web_safe());

        assert_eq!(data.len(), COLOR_TABLE_SIZE);
        assert_eq!(&data[0..6], &[0, 0, 0, 0, 0, 51]);
        assert_eq!(&data[645..648], &[255, 255, 255]);
        assert!(data[648..].iter().all(|v| *v == 0));
    }

    #[test]
    fn test_write_loop_extension() {
        let mut data = Vec::new();
        write_loop_extension(&mut data, 0x0102);

        let mut expected = vec![0x21, 0xFF, 0x0B];
        expected.extend_from_slice(b"NETSCAPE2.0");
        expected.extend_from_slice(&[0x03, 0x01, 0x02, 0x01, 0x00]);
        assert_eq!(data, expected);
    }

    #[test]
    fn test_write_graphics_control_extension() {
        let mut data = Vec::new();
        write_graphics_control_extension(&mut data, 260);

        assert_eq!(data, vec![0x21, 0xF9, 0x04, 0x08, 4, 1, 0x00, 0x00]);
    }

    #[test]
    fn test_write_image_descriptor() {
        let mut data = Vec::new();
        write_image_descriptor(&mut data, 16, 9);

        assert_eq!(data, vec![0x2C, 0, 0, 0, 0, 16, 0, 9, 0, 0]);
    }

    #[test]
    fn test_write_image_data() {
        let mut data = Vec::new();
        write_image_data(&mut data, &[1, 2, 3]);

        assert_eq!(data, vec![8, 3, 1, 2, 3, 0]);
    }
}
