use std::path::{Path, PathBuf};

use gif_support::{Frame, GIFEncoder};

use crate::{
    errors::RecorderError,
    frames::{discover_frames, load_frame, BMPFrame},
    options::ExportConfig,
};

// frames decoded and held in memory at once when encoding in parallel
const PARALLEL_BATCH_SIZE: usize = 32;

/// Encodes the recorded frame sequence in `config.source` into `config.output`.
/// Returns the number of frames written.
pub fn export_recording(config: &ExportConfig) -> Result<usize, RecorderError> {
    let frame_paths = discover_frames(&config.source)?;

    let first = load_frame(&frame_paths[0])?;
    let delay = config.frame_delay();

    info!(
        "exporting {} frames of {}x{} at {} fps (delay {}cs)",
        frame_paths.len(),
        first.width,
        first.height,
        config.fps,
        delay
    );

    let mut encoder = GIFEncoder::new(first.width, first.height, config.loop_count);
    encoder.start()?;

    if config.parallel {
        let mut loaded = vec![first];
        for batch in frame_paths[1..].chunks(PARALLEL_BATCH_SIZE) {
            for path in batch {
                loaded.push(load_matching_frame(path, &encoder)?);
            }

            add_batch(&mut encoder, &loaded, delay, config)?;
            loaded.clear();
        }
        add_batch(&mut encoder, &loaded, delay, config)?;
    } else {
        add_frame(&mut encoder, &first, delay, config)?;
        for path in &frame_paths[1..] {
            let frame = load_matching_frame(path, &encoder)?;
            add_frame(&mut encoder, &frame, delay, config)?;
        }
    }

    encoder.finish_to_file(&config.output)?;
    info!("exported {} frames to {}", encoder.frame_count(), config.output.display());

    Ok(encoder.frame_count())
}

/// Default location for exports: the desktop when there is one, the current
/// directory otherwise.
pub fn default_output_dir(home: Option<PathBuf>) -> PathBuf {
    home.map(|home| home.join("Desktop"))
        .filter(|desktop| desktop.is_dir())
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn default_output_path(home: Option<PathBuf>, timestamp: u64) -> PathBuf {
    default_output_dir(home).join(format!("recording_{}.gif", timestamp))
}

fn load_matching_frame(path: &Path, encoder: &GIFEncoder) -> Result<BMPFrame, RecorderError> {
    let frame = load_frame(path)?;

    if frame.width != encoder.width() || frame.height != encoder.height() {
        return Err(RecorderError::InvalidFrame {
            description: format!(
                "{} is {}x{}, recording is {}x{}",
                path.display(),
                frame.width,
                frame.height,
                encoder.width(),
                encoder.height()
            ),
        });
    }

    Ok(frame)
}

fn add_frame(encoder: &mut GIFEncoder, frame: &BMPFrame, delay: u16, config: &ExportConfig) -> Result<(), RecorderError> {
    encoder.add_frame(&frame.pixels, frame.width, frame.height, delay, config.channel_order)?;
    Ok(())
}

fn add_batch(encoder: &mut GIFEncoder, batch: &[BMPFrame], delay: u16, config: &ExportConfig) -> Result<(), RecorderError> {
    if batch.is_empty() {
        return Ok(());
    }

    let frames: Vec<Frame> = batch.iter()
        .map(|frame| Frame::new(&frame.pixels, frame.width, frame.height, delay, config.channel_order))
        .collect();

    encoder.add_frames(&frames)?;
    Ok(())
}
