use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// How the bootstrap object is located inside a storefront page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractStrategy {
    /// Scan from the global's name to the next `</script>` and evaluate
    /// everything in between.
    #[default]
    MarkerScan,
    /// Capture `<name> = { ... };` with a regular expression and evaluate
    /// only the captured literal.
    PatternCapture,
}

impl std::fmt::Display for ExtractStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractStrategy::MarkerScan => write!(f, "marker"),
            ExtractStrategy::PatternCapture => write!(f, "pattern"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub base_url: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    /// Storefront model pages fetched for every catalog request, e.g. `iphone-16-pro`.
    pub model_slugs: Vec<String>,
    /// Name of the global the storefront assigns its bootstrap object to.
    pub bootstrap_global: String,
    pub extract_strategy: ExtractStrategy,
    /// Image URL template; `{key}` is replaced with the image key.
    pub image_url_template: String,
    pub locale_directory_path: String,
    /// Feature flag in the per-locale config document that marks a locale as
    /// having an online store.
    pub availability_flag: String,
    pub availability_concurrency: usize,
    pub availability_cron: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("base_url", &self.base_url)
            .field("user_agent", &self.user_agent)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("model_slugs", &self.model_slugs)
            .field("bootstrap_global", &self.bootstrap_global)
            .field("extract_strategy", &self.extract_strategy.to_string())
            .field("image_url_template", &self.image_url_template)
            .field("locale_directory_path", &self.locale_directory_path)
            .field("availability_flag", &self.availability_flag)
            .field("availability_concurrency", &self.availability_concurrency)
            .field("availability_cron", &self.availability_cron)
            .finish()
    }
}
