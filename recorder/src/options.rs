use std::{collections::HashMap, path::PathBuf};

use custom_error::custom_error;

use gif_support::ChannelOrder;

pub const OPTION_SOURCE: &str = "source";
pub const OPTION_OUTPUT: &str = "output";
pub const OPTION_FPS: &str = "fps";
pub const OPTION_LOOP: &str = "loop";
pub const OPTION_CHANNEL_ORDER: &str = "channel-order";
pub const OPTION_PARALLEL: &str = "parallel";

const DEFAULT_FPS: u32 = 10;
const DEFAULT_LOOP_COUNT: i32 = 0;

custom_error! {pub OptionsError
    InvalidOptions {description: String} = "Invalid options are set for this export: {description}",
}

/// Raw `--key=value` options as given on the command line.
#[derive(Clone, Debug, Default)]
pub struct ExportOptions {

    options: HashMap<String, String>,
}

impl ExportOptions {

    pub fn from_args(args: &[String]) -> Self {
        let mut options = HashMap::new();

        for arg in args {
            if !arg.starts_with("--") {
                continue;
            }

            if let Some(separator) = arg.find('=') {
                options.insert(arg[2..separator].to_string(), arg[separator + 1..].to_string());
            }
        }

        Self {
            options,
        }
    }

    pub fn with_option(&self, key: &str, value: &str) -> Self {
        let mut options = self.options.clone();
        options.insert(key.to_string(), value.to_string());

        Self {
            options,
        }
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.options.get(key).map(|v| v.trim().to_string())
    }

    pub fn get_bool(&self, key: &str, default: bool) -> Result<bool, OptionsError> {
        let value = match self.get_string(key) {
            Some(v) => v,
            None => return Ok(default),
        };

        match value.to_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(OptionsError::InvalidOptions {
                description: format!("failed to parse {} as a bool: {}", key, other),
            }),
        }
    }

    pub fn get_u32(&self, key: &str, default: u32) -> Result<u32, OptionsError> {
        match self.get_string(key) {
            Some(v) => v.parse().map_err(|err| OptionsError::InvalidOptions {
                description: format!("failed to parse {} as u32: {}", key, err),
            }),
            None => Ok(default),
        }
    }

    pub fn get_i32(&self, key: &str, default: i32) -> Result<i32, OptionsError> {
        match self.get_string(key) {
            Some(v) => v.parse().map_err(|err| OptionsError::InvalidOptions {
                description: format!("failed to parse {} as i32: {}", key, err),
            }),
            None => Ok(default),
        }
    }
}

/// Settings of one export, resolved from `ExportOptions`.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportConfig {
    pub source: PathBuf,
    pub output: PathBuf,
    pub fps: u32,
    pub loop_count: i32,
    pub channel_order: ChannelOrder,
    pub parallel: bool,
}

impl ExportConfig {

    /// `default_output` is used when no output path is given.
    pub fn from_options(options: &ExportOptions, default_output: PathBuf) -> Result<Self, OptionsError> {
        let source = options.get_string(OPTION_SOURCE)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| OptionsError::InvalidOptions {
                description: format!("--{} is required", OPTION_SOURCE),
            })?;

        let output = options.get_string(OPTION_OUTPUT)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or(default_output);

        let fps = options.get_u32(OPTION_FPS, DEFAULT_FPS)?;
        if fps == 0 {
            return Err(OptionsError::InvalidOptions {
                description: format!("--{} must be positive", OPTION_FPS),
            });
        }

        // bmp frames are stored as bgra
        let channel_order = match options.get_string(OPTION_CHANNEL_ORDER) {
            Some(name) => ChannelOrder::from_name(&name).ok_or_else(|| OptionsError::InvalidOptions {
                description: format!("unknown channel order: {}", name),
            })?,
            None => ChannelOrder::BGRA,
        };

        Ok(ExportConfig {
            source: PathBuf::from(source),
            output,
            fps,
            loop_count: options.get_i32(OPTION_LOOP, DEFAULT_LOOP_COUNT)?,
            channel_order,
            parallel: options.get_bool(OPTION_PARALLEL, true)?,
        })
    }

    /// Frame delay in centiseconds, rounded to the nearest one and never zero.
    pub fn frame_delay(&self) -> u16 {
        let delay = (100 + self.fps / 2) / self.fps;
        delay.max(1).min(u16::MAX as u32) as u16
    }
}
