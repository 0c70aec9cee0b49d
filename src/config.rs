//! Command-line configuration for the `czi-tiles` binary.
//!
//! Arguments can be given on the command line or through environment
//! variables with the `CZI_` prefix:
//!
//! - `CZI_PLANE` - Plane coordinate to render (default: C0)
//! - `CZI_PIXEL_TYPE` - Output pixel type (default: gray8)
//! - `CZI_OUTPUT` - Output image path (default: out.png)
//! - `CZI_BACKGROUND` - Background color as `r,g,b` in `[0, 1]`
//! - `CZI_JPEG_QUALITY` - JPEG quality (default: 80)
//! - `CZI_CACHE_MB` - Decoded sub-block cache size, 0 disables (default: 256)
//!
//! # Example
//!
//! ```text
//! czi-tiles info slide.czi --json
//! czi-tiles render slide.czi --roi 0,0,1024,1024 --plane C1 --pixel-type bgr24 -o tile.jpg
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::accessor::{AccessorOptions, SubBlockCache};
use crate::codec::DecodeOptions;
use crate::dimension::DimCoordinate;
use crate::export::{OutputFormat, DEFAULT_JPEG_QUALITY};
use crate::format::{OpenOptions, Precedence, SubBlockInfoPolicy};
use crate::geometry::IntRect;
use crate::pixel::{Background, PixelType};

// =============================================================================
// Default Values
// =============================================================================

/// Default plane coordinate.
pub const DEFAULT_PLANE: &str = "C0";

/// Default output path.
pub const DEFAULT_OUTPUT: &str = "out.png";

/// Default decoded sub-block cache size in megabytes.
pub const DEFAULT_CACHE_MB: usize = 256;

// =============================================================================
// CLI Arguments
// =============================================================================

/// czi-tiles - Inspect CZI documents and composite regions of them.
#[derive(Parser, Debug, Clone)]
#[command(name = "czi-tiles")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print sub-block and pyramid statistics.
    Info(InfoArgs),

    /// Composite a region of one plane and write it as an image.
    Render(RenderArgs),
}

/// How to reconcile the directory with sub-block headers.
#[derive(Args, Debug, Clone, Default)]
pub struct OpenArgs {
    /// Trust sub-block headers over the directory.
    #[arg(long, default_value_t = false)]
    pub header_precedence: bool,

    /// Do not report differences between directory and sub-block headers.
    #[arg(long, default_value_t = false)]
    pub ignore_discrepancy: bool,
}

impl OpenArgs {
    pub fn open_options(&self) -> OpenOptions {
        OpenOptions {
            sub_block_info_policy: SubBlockInfoPolicy {
                precedence: if self.header_precedence {
                    Precedence::SubBlockHeader
                } else {
                    Precedence::Directory
                },
                ignore_discrepancy: self.ignore_discrepancy,
            },
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct InfoArgs {
    /// CZI file to inspect.
    pub file: PathBuf,

    /// Print JSON instead of text.
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Also print the raw XML metadata.
    #[arg(long, default_value_t = false)]
    pub metadata: bool,

    #[command(flatten)]
    pub open: OpenArgs,
}

#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// CZI file to read.
    pub file: PathBuf,

    /// Region of interest as `x,y,w,h` in logical coordinates.
    #[arg(long, value_parser = parse_roi, allow_hyphen_values = true)]
    pub roi: IntRect,

    /// Plane coordinate, e.g. `C0T2`.
    #[arg(long, default_value = DEFAULT_PLANE, env = "CZI_PLANE")]
    pub plane: DimCoordinate,

    /// Pixel type of the composed image.
    #[arg(long, default_value = "gray8", env = "CZI_PIXEL_TYPE")]
    pub pixel_type: PixelType,

    /// Output image (.png, .jpg or .jpeg).
    #[arg(short, long, default_value = DEFAULT_OUTPUT, env = "CZI_OUTPUT")]
    pub output: PathBuf,

    /// Background color `r,g,b`, components in `[0, 1]`.
    #[arg(long, value_parser = parse_background, env = "CZI_BACKGROUND")]
    pub background: Option<Background>,

    /// Fail on size mismatches instead of clipping or padding.
    #[arg(long, default_value_t = false)]
    pub strict: bool,

    /// Paint in M-index order instead of directory order.
    #[arg(long, default_value_t = false)]
    pub sort_by_m: bool,

    /// Decode every matching sub-block, even fully covered ones.
    #[arg(long, default_value_t = false)]
    pub no_visibility_check: bool,

    /// Also use pyramid sub-blocks (default: layer 0 only).
    #[arg(long, default_value_t = false)]
    pub all_layers: bool,

    /// JPEG quality (1-100).
    #[arg(long, default_value_t = DEFAULT_JPEG_QUALITY, env = "CZI_JPEG_QUALITY")]
    pub quality: u8,

    /// Decoded sub-block cache size in megabytes; 0 disables the cache.
    #[arg(long, default_value_t = DEFAULT_CACHE_MB, env = "CZI_CACHE_MB")]
    pub cache_mb: usize,

    #[command(flatten)]
    pub open: OpenArgs,
}

impl RenderArgs {
    /// Validate the arguments and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.roi.w <= 0 || self.roi.h <= 0 {
            return Err(format!(
                "ROI must have positive width and height, got {}x{}",
                self.roi.w, self.roi.h
            ));
        }

        if self.quality == 0 || self.quality > 100 {
            return Err("quality must be between 1 and 100".to_string());
        }

        if let Some(bg) = self.background {
            if [bg.r, bg.g, bg.b].iter().any(|c| !(0.0..=1.0).contains(c)) {
                return Err("background components must be between 0 and 1".to_string());
            }
        }

        OutputFormat::from_path(&self.output, self.quality).map_err(|e| e.to_string())?;

        Ok(())
    }

    pub fn decode_options(&self) -> DecodeOptions {
        if self.strict {
            DecodeOptions::strict()
        } else {
            DecodeOptions::default()
        }
    }

    /// Accessor options for this render, with a fresh cache if enabled.
    pub fn accessor_options(&self) -> AccessorOptions {
        let sub_block_cache = (self.cache_mb > 0)
            .then(|| std::sync::Arc::new(SubBlockCache::with_capacity(self.cache_mb * 1024 * 1024)));

        AccessorOptions {
            background: self.background,
            sort_by_m: self.sort_by_m,
            use_visibility_check_optimization: !self.no_visibility_check,
            only_layer0: !self.all_layers,
            sub_block_cache,
            decode_options: self.decode_options(),
            ..Default::default()
        }
    }
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        match &self.command {
            Command::Info(_) => Ok(()),
            Command::Render(args) => args.validate(),
        }
    }
}

// =============================================================================
// Value Parsers
// =============================================================================

fn parse_components<const N: usize, T: std::str::FromStr>(
    s: &str,
    what: &str,
) -> Result<[T; N], String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != N {
        return Err(format!("{} needs {} comma-separated values, got '{}'", what, N, s));
    }

    let mut values = Vec::with_capacity(N);
    for part in parts {
        let value = part
            .parse::<T>()
            .map_err(|_| format!("invalid {} component '{}'", what, part))?;
        values.push(value);
    }
    values
        .try_into()
        .map_err(|_| format!("{} needs {} values", what, N))
}

/// Parse `x,y,w,h`.
pub fn parse_roi(s: &str) -> Result<IntRect, String> {
    let [x, y, w, h] = parse_components::<4, i32>(s, "ROI")?;
    Ok(IntRect::new(x, y, w, h))
}

/// Parse `r,g,b` or a single gray value.
pub fn parse_background(s: &str) -> Result<Background, String> {
    if !s.contains(',') {
        let v = s
            .trim()
            .parse::<f32>()
            .map_err(|_| format!("invalid background '{}'", s))?;
        return Ok(Background::gray(v));
    }
    let [r, g, b] = parse_components::<3, f32>(s, "background")?;
    Ok(Background::new(r, g, b))
}

// =============================================================================
// Tests
// =============================================================================
