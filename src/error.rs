use thiserror::Error;

use crate::pixel::PixelType;

/// I/O errors that can occur when reading from a byte source
#[derive(Debug, Clone, Error)]
pub enum IoError {
    /// Error reported by the underlying file or stream
    #[error("Read error: {0}")]
    Read(String),

    /// Requested range exceeds resource bounds
    #[error("Range out of bounds: requested {requested} bytes at offset {offset}, size is {size}")]
    RangeOutOfBounds {
        offset: u64,
        requested: u64,
        size: u64,
    },

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Errors from parsing a dimension coordinate string such as `"C0T1"`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinateParseError {
    /// Character is not a known dimension letter
    #[error("Unknown dimension '{found}' at position {position}")]
    UnknownDimension { position: usize, found: char },

    /// Dimension letter without a valid integer after it
    #[error("Missing or invalid value for dimension '{0}'")]
    InvalidValue(char),

    /// Dimension given more than once
    #[error("Dimension '{0}' specified more than once")]
    DuplicateDimension(char),
}

/// Errors raised while building or querying the sub-block directory
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    /// Operation is not allowed in the directory's current state
    /// (adding after finalize, querying before finalize, finalizing twice)
    #[error("Invalid directory state: {0}")]
    InvalidState(&'static str),

    /// Descriptor violates the size invariants
    #[error("Invalid sub-block descriptor: {0}")]
    InvalidDescriptor(String),
}

/// Errors from bitmap operations (fill, copy, pixel type conversion)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BitmapError {
    /// No conversion is defined between the two pixel types
    #[error("Unsupported pixel type conversion: {from:?} -> {to:?}")]
    UnsupportedConversion { from: PixelType, to: PixelType },

    /// Operation is not defined for the pixel type
    #[error("Unsupported pixel type for this operation: {0}")]
    UnsupportedPixelType(PixelType),

    /// Bitmap dimensions are invalid
    #[error("Invalid bitmap size: {width}x{height}")]
    InvalidSize { width: i64, height: i64 },

    /// Buffer does not hold enough bytes for the declared geometry
    #[error("Buffer too small: need {required} bytes, got {actual}")]
    BufferTooSmall { required: usize, actual: usize },
}

/// Errors produced by codec dispatch
#[derive(Debug, Clone, Error)]
pub enum DecodeError {
    /// Payload is smaller than the format guarantees
    #[error("Corrupt data: {0}")]
    CorruptData(String),

    /// Compression code is unknown or not supported
    #[error("Unsupported compression mode: {0}")]
    UnsupportedCompression(i32),

    /// The codec is supported but no decoder backend was configured
    #[error("No decoder available for {0}")]
    DecoderUnavailable(&'static str),

    /// Decoded data disagrees with the declared sub-block information and
    /// the discrepancy policy is strict
    #[error("Sub-block mismatch: {0}")]
    Mismatch(String),

    /// Error from the zstd decompressor
    #[error("zstd error: {0}")]
    Zstd(String),

    /// Error from the JPEG XR backend
    #[error("JPEG XR error: {0}")]
    JpegXr(String),

    /// Error from a bitmap operation during decode
    #[error("Bitmap error: {0}")]
    Bitmap(#[from] BitmapError),
}

/// Errors that can occur when parsing a CZI container
#[derive(Debug, Clone, Error)]
pub enum CziError {
    /// I/O error while reading the file
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// Segment header carries an unexpected id
    #[error("Invalid segment at offset {offset}: expected {expected}, found {found:?}")]
    InvalidSegmentId {
        offset: u64,
        expected: &'static str,
        found: String,
    },

    /// File is too small to contain the structure being read
    #[error("File too small: need at least {required} bytes, got {actual}")]
    FileTooSmall { required: u64, actual: u64 },

    /// A segment or directory entry is malformed
    #[error("Corrupt segment: {0}")]
    CorruptSegment(String),

    /// Pixel type code is not known
    #[error("Unsupported pixel type: {0}")]
    UnsupportedPixelType(i32),

    /// Directory rejected an entry or was queried in the wrong state
    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),

    /// Sub-block header disagrees with the directory entry and the
    /// configured policy does not ignore discrepancies
    #[error("Sub-block {index}: directory and header disagree on {field}")]
    Discrepancy { index: usize, field: &'static str },
}

/// Errors returned by the tile accessor
#[derive(Debug, Clone, Error)]
pub enum AccessorError {
    /// Malformed request (ROI, pixel type)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Directory was not usable
    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),

    /// Reading a sub-block from the repository failed
    #[error("Read error: {0}")]
    Read(#[from] CziError),

    /// Sub-block listed by the directory could not be read
    #[error("Sub-block {0} not found in repository")]
    SubBlockMissing(usize),

    /// Decoding a sub-block failed
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Painting onto the canvas failed
    #[error("Bitmap error: {0}")]
    Bitmap(#[from] BitmapError),

    /// A decode task panicked or was cancelled
    #[error("Decode task failed: {0}")]
    Task(String),
}

/// Errors from encoding a bitmap into an image file format
#[derive(Debug, Clone, Error)]
pub enum ExportError {
    /// Pixel type has no image file representation
    #[error("Cannot export pixel type {0}")]
    UnsupportedPixelType(PixelType),

    /// Output format is not known
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    /// Encoder failed
    #[error("Failed to encode image: {message}")]
    Encode { message: String },

    /// Pixel conversion before encoding failed
    #[error("Bitmap error: {0}")]
    Bitmap(#[from] BitmapError),
}
