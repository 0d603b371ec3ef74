// see https://www.w3.org/Graphics/GIF/spec-gif89a.txt

pub const COLOR_TABLE_ENTRIES: usize = 256;
pub const COLOR_TABLE_SIZE: usize = COLOR_TABLE_ENTRIES * 3;

// 6 levels per channel, 6 * 6 * 6 = 216 colors
pub const COLOR_CUBE_LEVELS: [u8; 6] = [0, 51, 102, 153, 204, 255];
pub const COLOR_CUBE_ENTRIES: usize = 216;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {

    pub fn black() -> Self {
        Self::from_rgb(0, 0, 0)
    }

    pub fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Color {
            red,
            green,
            blue,
        }
    }
}

/// Byte layout of the 4-byte pixels handed to the encoder. There is no default:
/// pixel sources have to say which one they produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelOrder {
    RGBA,
    BGRA,
}

impl ChannelOrder {

    /// Offsets of the red, green and blue bytes inside one pixel.
    pub fn rgb_offsets(&self) -> (usize, usize, usize) {
        match self {
            ChannelOrder::RGBA => (0, 1, 2),
            ChannelOrder::BGRA => (2, 1, 0),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().trim() {
            "rgba" => Some(ChannelOrder::RGBA),
            "bgra" => Some(ChannelOrder::BGRA),
            _ => None,
        }
    }
}

/// Global color table shared by every frame of a session.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorTable {

    pub colors: Vec<Color>,
}

impl ColorTable {

    /// The 6x6x6 color cube, red-major, padded with black up to 256 entries.
    pub fn web_safe() -> Self {
        let mut colors = Vec::with_capacity(COLOR_TABLE_ENTRIES);

        for &red in &COLOR_CUBE_LEVELS {
            for &green in &COLOR_CUBE_LEVELS {
                for &blue in &COLOR_CUBE_LEVELS {
                    colors.push(Color::from_rgb(red, green, blue));
                }
            }
        }

        while colors.len() < COLOR_TABLE_ENTRIES {
            colors.push(Color::black());
        }

        ColorTable {
            colors,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(COLOR_TABLE_SIZE);

        for color in &self.colors {
            data.push(color.red);
            data.push(color.green);
            data.push(color.blue);
        }

        data
    }

    pub fn color(&self, index: u8) -> Color {
        self.colors[index as usize]
    }
}
