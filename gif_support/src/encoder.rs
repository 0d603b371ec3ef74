use std::{fs::{self, File}, io::{self, Write}, path::{Path, PathBuf}};

use rayon::prelude::*;

use crate::{
    common::{ChannelOrder, ColorTable},
    errors::GIFEncoderError,
    lzw::compress,
    quantize::quantize_frame,
    writer::{
        write_color_table,
        write_graphics_control_extension,
        write_header,
        write_image_data,
        write_image_descriptor,
        write_loop_extension,
        write_trailer,
    },
};

const BYTES_PER_PIXEL: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq)]
enum SessionState {
    Created,
    Started,
    Finished,
}

/// One animation frame as produced by a pixel source.
#[derive(Clone, Copy, Debug)]
pub struct Frame<'a> {
    pub pixels: &'a [u8], // 4 bytes per pixel, starting at top left, pos = (y * width + x) * 4
    pub width: u16,
    pub height: u16,
    pub delay: u16, // in 1/100 of a second
    pub channel_order: ChannelOrder,
}

impl<'a> Frame<'a> {

    pub fn new(pixels: &'a [u8], width: u16, height: u16, delay: u16, channel_order: ChannelOrder) -> Self {
        Frame {
            pixels,
            width,
            height,
            delay,
            channel_order,
        }
    }
}

/// Animated GIF89a encoder.
///
/// A session is driven strictly in order: `start` once, `add_frame` for every
/// frame in playback order, then `finish` once. Every frame is quantized to the
/// same web safe global color table and compressed with its own lzw dictionary.
pub struct GIFEncoder {
    width: u16,
    height: u16,
    loop_count: Option<u16>,
    color_table: ColorTable,
    data: Vec<u8>,
    state: SessionState,
    frame_count: usize,
}

impl GIFEncoder {

    /// `loop_count` below zero disables looping, zero loops forever, anything
    /// else is the number of repetitions.
    pub fn new(width: u16, height: u16, loop_count: i32) -> Self {
        GIFEncoder {
            width,
            height,
            loop_count: loop_count_field(loop_count),
            color_table: ColorTable::web_safe(),
            data: Vec::new(),
            state: SessionState::Created,
            frame_count: 0,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn start(&mut self) -> Result<(), GIFEncoderError> {
        if self.state != SessionState::Created {
            return Err(GIFEncoderError::SequenceError {
                description: format!("start called on a {:?} session", self.state),
            });
        }

        info!("starting gif session {}x{}", self.width, self.height);

        write_header(&mut self.data, self.width, self.height);
        write_color_table(&mut self.data, &self.color_table);
        if let Some(loop_count) = self.loop_count {
            write_loop_extension(&mut self.data, loop_count);
        }

        self.state = SessionState::Started;
        Ok(())
    }

    pub fn add_frame(
        &mut self,
        pixels: &[u8],
        width: u16,
        height: u16,
        delay: u16,
        channel_order: ChannelOrder,
    ) -> Result<(), GIFEncoderError> {
        let frame = Frame::new(pixels, width, height, delay, channel_order);

        self.ensure_started("add_frame")?;
        self.validate_frame(&frame)?;

        let frame_data = encode_frame(&frame);
        self.append_frame(&frame, &frame_data);

        Ok(())
    }

    /// Encodes a batch of frames concurrently and appends them in the order given.
    /// If any frame is invalid the whole batch is rejected and nothing is appended.
    pub fn add_frames(&mut self, frames: &[Frame]) -> Result<(), GIFEncoderError> {
        self.ensure_started("add_frames")?;
        for frame in frames {
            self.validate_frame(frame)?;
        }

        let encoded: Vec<Vec<u8>> = frames.par_iter()
            .map(encode_frame)
            .collect();

        for (frame, frame_data) in frames.iter().zip(encoded.iter()) {
            self.append_frame(frame, frame_data);
        }

        Ok(())
    }

    /// Writes the complete gif, trailer included, to `sink`.
    ///
    /// When writing fails the session stays open, so `finish` may be retried with
    /// another sink.
    pub fn finish<W: Write>(&mut self, sink: &mut W) -> Result<(), GIFEncoderError> {
        self.ensure_started("finish")?;

        self.write_to(sink).map_err(|err| GIFEncoderError::SinkWriteError { source: err })?;
        self.seal();

        Ok(())
    }

    /// Like `finish`, but the gif only appears at `path` once it has been written
    /// completely. A failed write leaves nothing behind.
    pub fn finish_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), GIFEncoderError> {
        self.ensure_started("finish_to_file")?;

        let path = path.as_ref();
        let temp_path = temporary_path(path);

        let result = self.write_to_file(&temp_path)
            .and_then(|_| fs::rename(&temp_path, path));

        if let Err(err) = result {
            if let Err(remove_err) = fs::remove_file(&temp_path) {
                debug!("failed to remove {}: {}", temp_path.display(), remove_err);
            }

            return Err(GIFEncoderError::SinkWriteError { source: err });
        }

        self.seal();
        info!("saved gif to {}", path.display());

        Ok(())
    }

    fn write_to<W: Write>(&self, sink: &mut W) -> io::Result<()> {
        let mut trailer = Vec::with_capacity(1);
        write_trailer(&mut trailer);

        sink.write_all(&self.data)?;
        sink.write_all(&trailer)?;
        sink.flush()
    }

    fn write_to_file(&self, path: &Path) -> io::Result<()> {
        let mut file = File::create(path)?;
        self.write_to(&mut file)?;
        file.sync_all()
    }

    fn seal(&mut self) {
        write_trailer(&mut self.data);
        self.state = SessionState::Finished;

        info!("gif finished: {} frames, {} bytes", self.frame_count, self.data.len());
    }

    fn append_frame(&mut self, frame: &Frame, frame_data: &[u8]) {
        self.data.extend_from_slice(frame_data);
        self.frame_count += 1;

        debug!(
            "added frame {} ({}x{}, delay {}cs, {} bytes)",
            self.frame_count,
            frame.width,
            frame.height,
            frame.delay,
            frame_data.len()
        );
    }

    fn ensure_started(&self, operation: &str) -> Result<(), GIFEncoderError> {
        match self.state {
            SessionState::Started => Ok(()),
            SessionState::Created => Err(GIFEncoderError::SequenceError {
                description: format!("{} called before start", operation),
            }),
            SessionState::Finished => Err(GIFEncoderError::SequenceError {
                description: format!("{} called after finish", operation),
            }),
        }
    }

    fn validate_frame(&self, frame: &Frame) -> Result<(), GIFEncoderError> {
        if frame.width != self.width || frame.height != self.height {
            return Err(GIFEncoderError::InvalidFrameSize {
                description: format!(
                    "frame is {}x{}, expected {}x{}",
                    frame.width, frame.height, self.width, self.height
                ),
            });
        }

        let expected_len = frame.width as usize * frame.height as usize * BYTES_PER_PIXEL;
        if frame.pixels.len() != expected_len {
            return Err(GIFEncoderError::InvalidFrameSize {
                description: format!(
                    "expected {} bytes of pixel data, got {}",
                    expected_len,
                    frame.pixels.len()
                ),
            });
        }

        Ok(())
    }
}

/// Graphics control extension, image descriptor and image data of one frame.
fn encode_frame(frame: &Frame) -> Vec<u8> {
    let indices = quantize_frame(frame.pixels, frame.channel_order);
    let compressed = compress(&indices);

    let mut data = Vec::with_capacity(compressed.len() + compressed.len() / 255 + 20);
    write_graphics_control_extension(&mut data, frame.delay);
    write_image_descriptor(&mut data, frame.width, frame.height);
    write_image_data(&mut data, &compressed);

    data
}

fn loop_count_field(loop_count: i32) -> Option<u16> {
    if loop_count < 0 {
        return None;
    }

    if loop_count > u16::MAX as i32 {
        warn!("loop count {} does not fit into gif, using {}", loop_count, u16::MAX);
        return Some(u16::MAX);
    }

    Some(loop_count as u16)
}

fn temporary_path(path: &Path) -> PathBuf {
    match path.file_name() {
        Some(name) => path.with_file_name(format!(".{}.tmp", name.to_string_lossy())),
        None => path.with_extension("tmp"),
    }
}
