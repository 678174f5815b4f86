// Single source of truth for all default values.

// --- Storage ---
pub const DEFAULT_DB_FILENAME: &str = "garden.db";
pub const DEFAULT_READ_POOL_SIZE: usize = 4;
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5_000;
pub const DEFAULT_UPLOADS_DIR: &str = "uploads";

// --- Cache ---
pub const DEFAULT_CACHE_TTL_SECS: u64 = 7 * 24 * 3600; // 7 days
pub const DEFAULT_L1_CAPACITY: u64 = 10_000;
pub const DEFAULT_L2_ENABLED: bool = true;
pub const MAX_CACHE_TTL_SECS: u64 = 10 * 365 * 24 * 3600; // 10 years

// --- Classifier ---
pub const DEFAULT_API_URL: &str = "https://integrate.api.nvidia.com/v1";
pub const DEFAULT_MODEL: &str = "meta/llama-3.1-70b-instruct";
pub const DEFAULT_BATCH_SIZE: usize = 5;
pub const DEFAULT_BATCH_DELAY_MS: u64 = 1_000;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_TEMPERATURE: f64 = 0.0;
pub const DEFAULT_TOP_P: f64 = 0.9;
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 500;
pub const DEFAULT_CONTENT_PREVIEW_CHARS: usize = 1_000;
pub const DEFAULT_MIN_EXPLANATION_CHARS: usize = 20;
pub const DEFAULT_REFRESH_DAYS: u64 = 7;
pub const MAX_REFRESH_DAYS: u64 = 10 * 365;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = false;
pub const DEFAULT_DEGRADATION_HISTORY: usize = 256;
