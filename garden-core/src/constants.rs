//! Fixed values shared across crates.

/// Tags that mark a memory as sentimental. The heuristic never lets these
/// fall below `compress`.
pub const SENTIMENTAL_TAGS: [&str; 3] = ["childhood", "family", "wedding"];

/// Metadata flag that forces `low_relevance` in the heuristic.
pub const BLURRY_FLAG: &str = "blurry";

/// Metadata flag on a stand-in for a stored row whose payload no longer
/// decodes.
pub const UNREADABLE_FLAG: &str = "unreadable";

/// Length of a "month" when computing memory age.
pub const DAYS_PER_MONTH: i64 = 30;

/// Excerpt length used in the classifier context summary.
pub const CONTEXT_EXCERPT_CHARS: usize = 280;

/// Default relevance/attachment when a verdict field is missing or invalid.
pub const DEFAULT_SCORE: f64 = 0.5;

/// Default confidence when a verdict omits it.
pub const DEFAULT_CONFIDENCE: f64 = 0.6;

/// Confidence assigned to heuristic verdicts.
pub const HEURISTIC_CONFIDENCE: f64 = 0.4;

/// Attachment floor for memories carrying a sentimental tag.
pub const SENTIMENTAL_ATTACHMENT: f64 = 0.9;

/// Mask that keeps a derived seed inside the positive 31-bit range.
pub const SEED_MASK: u32 = 0x7FFF_FFFF;
