use crate::common::ChannelOrder;

// a channel value below threshold N falls into level N
const LEVEL_THRESHOLDS: [u8; 5] = [26, 77, 128, 179, 230];

fn level(value: u8) -> u8 {
    LEVEL_THRESHOLDS.iter()
        .position(|threshold| value < *threshold)
        .unwrap_or(LEVEL_THRESHOLDS.len()) as u8
}

/// Maps a color to its index in the web safe color table, always in `0..216`.
pub fn quantize(red: u8, green: u8, blue: u8) -> u8 {
    level(red) * 36 + level(green) * 6 + level(blue)
}

pub fn quantize_rgba(red: u8, green: u8, blue: u8, _alpha: u8) -> u8 {
    quantize(red, green, blue)
}

pub fn quantize_bgra(blue: u8, green: u8, red: u8, _alpha: u8) -> u8 {
    quantize(red, green, blue)
}

/// `pixel` is one 4-byte pixel laid out according to `order`. Alpha is ignored.
pub fn quantize_pixel(pixel: &[u8], order: ChannelOrder) -> u8 {
    let (red, green, blue) = order.rgb_offsets();
    quantize(pixel[red], pixel[green], pixel[blue])
}

/// Row-major palette indices for a whole frame. Trailing bytes that do not form
/// a complete pixel are ignored.
pub fn quantize_frame(pixels: &[u8], order: ChannelOrder) -> Vec<u8> {
    pixels.chunks_exact(4)
        .map(|pixel| quantize_pixel(pixel, order))
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::common::{ColorTable, COLOR_CUBE_ENTRIES};

    use super::*;

    #[test]
    fn test_quantize_extremes() {
        assert_eq!(quantize(0, 0, 0), 0);
        assert_eq!(quantize(255, 255, 255), 215);
        assert_eq!(quantize(255, 0, 0), 180);
        assert_eq!(quantize(0, 255, 0), 30);
        assert_eq!(quantize(0, 0, 255), 5);
    }

    #[test]
    fn test_quantize_thresholds() {
        assert_eq!(quantize(0, 0, 25), 0);
        assert_eq!(quantize(0, 0, 26), 1);
        assert_eq!(quantize(0, 0, 76), 1);
        assert_eq!(quantize(0, 0, 77), 2);
        assert_eq!(quantize(0, 0, 127), 2);
        assert_eq!(quantize(0, 0, 128), 3);
        assert_eq!(quantize(0, 0, 178), 3);
        assert_eq!(quantize(0, 0, 179), 4);
        assert_eq!(quantize(0, 0, 229), 4);
        assert_eq!(quantize(0, 0, 230), 5);
    }

    #[test]
    fn test_quantize_is_total() {
        for value in 0..=255u8 {
            assert!((quantize(value, value, value) as usize) < COLOR_CUBE_ENTRIES);
            assert!((quantize(value, 255 - value, value / 2) as usize) < COLOR_CUBE_ENTRIES);
        }
    }

    #[test]
    fn test_quantize_maps_cube_colors_to_themselves() {
        let table = ColorTable::web_safe();

        for index in 0..COLOR_CUBE_ENTRIES {
            let color = table.color(index as u8);
            assert_eq!(quantize(color.red, color.green, color.blue) as usize, index);
        }
    }

    #[test]
    fn test_channel_orders_agree() {
        let colors = [(0, 0, 0), (200, 10, 90), (12, 250, 180), (255, 128, 77)];

        for &(red, green, blue) in &colors {
            let expected = quantize_rgba(red, green, blue, 255);
            assert_eq!(quantize_bgra(blue, green, red, 255), expected);
            assert_eq!(quantize_pixel(&[red, green, blue, 0], ChannelOrder::RGBA), expected);
            assert_eq!(quantize_pixel(&[blue, green, red, 0], ChannelOrder::BGRA), expected);
        }
    }

    #[test]
    fn test_quantize_frame() {
        let pixels = vec![
            255, 0, 0, 255,
            0, 0, 255, 0,
            255, 255, 255, 128,
        ];

        assert_eq!(quantize_frame(&pixels, ChannelOrder::RGBA), vec![180, 5, 215]);
        assert_eq!(quantize_frame(&pixels, ChannelOrder::BGRA), vec![5, 180, 215]);
    }
}
