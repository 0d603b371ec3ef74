use custom_error::custom_error;

use gif_support::GIFEncoderError;

use crate::options::OptionsError;

custom_error! {pub RecorderError
    FramesNotFound {description: String} = "No frames to export: {description}",
    InvalidFrame {description: String} = "Invalid frame: {description}",
    Options {source: OptionsError} = "{source}",
    Encoding {source: GIFEncoderError} = "Failed to encode gif: {source}",
    Io {source: std::io::Error} = "Failed to read frames: {source}",
}
