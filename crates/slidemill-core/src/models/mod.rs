pub mod outcome;
pub mod slide;
pub mod status;

pub use outcome::{CompressionMethod, CompressionOutcome, UploadErrorKind, UploadOutcome};
pub use slide::{MediaKind, SlideRequest};
pub use status::SlideStatus;
