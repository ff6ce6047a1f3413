use std::time::Duration;

/// Remote storage API configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the storage API (e.g. "https://drive.example.com/api/v1")
    pub base_url: String,
    /// Bearer token sent with every request, when set
    pub bearer_token: Option<String>,
    /// Timeout for remote requests (ms)
    pub request_timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api/v1".to_string(),
            bearer_token: None,
            request_timeout_ms: 15_000,
        }
    }
}

impl ApiConfig {
    /// Duration for remote request timeouts
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// List pagination configuration
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// Items requested per page
    pub per_page: usize,
    /// Upper bound accepted for per_page
    pub max_per_page: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            per_page: 20,
            max_per_page: 100,
        }
    }
}

impl PaginationConfig {
    /// Clamps per_page into the accepted range
    pub fn effective_per_page(&self) -> usize {
        self.per_page.clamp(1, self.max_per_page)
    }
}

/// Search input configuration
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke before the query commits (ms)
    pub debounce_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { debounce_ms: 300 }
    }
}

impl SearchConfig {
    /// Duration of the search debounce window
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Configuration for concurrent remote mutations
#[derive(Debug, Clone)]
pub struct ConcurrencyConfig {
    /// Maximum in-flight mutations during a bulk operation
    pub max_concurrent_mutations: usize,
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self {
            max_concurrent_mutations: 10,
        }
    }
}

/// Global configuration of the client core
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Remote API configuration
    pub api: ApiConfig,
    /// Pagination configuration
    pub pagination: PaginationConfig,
    /// Search configuration
    pub search: SearchConfig,
    /// Concurrency configuration
    pub concurrency: ConcurrencyConfig,
}
