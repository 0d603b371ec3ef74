#[macro_use]
extern crate log;
extern crate custom_error;

pub mod bits;
pub mod common;
pub mod encoder;
pub mod errors;
pub mod lzw;
pub mod quantize;
pub mod writer;

pub use common::{ChannelOrder, Color, ColorTable};
pub use encoder::{Frame, GIFEncoder};
pub use errors::GIFEncoderError;
pub use quantize::{quantize, quantize_bgra, quantize_frame, quantize_pixel, quantize_rgba};
