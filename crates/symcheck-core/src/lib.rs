//! Symcheck Core Library
//!
//! Pixel-classification and contrast-statistics engine for auditing
//! symbol artwork against solid backgrounds (WCAG 2.1 non-text contrast).

pub mod analyze;
pub mod color;
pub mod config;
pub mod decoders;
pub mod diagnostics;
pub mod mask;
pub mod models;
pub mod report;
pub mod sample;
pub mod segment;
pub mod stats;

// Re-export commonly used types
pub use analyze::{analyze_image, analyze_image_detailed, AnalysisOutput};
pub use color::{contrast_ratio, parse_color, relative_luminance};
pub use mask::Mask;
pub use models::{
    AnalysisResult, AnalyzeOptions, BackgroundOutcome, BackgroundSpec, BackgroundStats,
    PixelBuffer, RatioSample, SampleMode,
};
