use custom_error::custom_error;

custom_error! {pub GIFEncoderError
    InvalidFrameSize {description: String} = "Invalid frame size: {description}",
    SequenceError {description: String} = "Encoder used out of sequence: {description}",
    SinkWriteError {source: std::io::Error} = "Failed to write gif: {source}",
}
