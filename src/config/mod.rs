use std::env;

/// Path the FaceLens frontend posts uploads to.
pub const DEFAULT_UPLOAD_PATH: &str = "/upload_image/";

/// Branding strings for the admin site, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSiteConfig {
    /// Header shown at the top of every admin page
    pub site_header: String,

    /// Browser tab title
    pub site_title: String,

    /// Heading of the admin index page
    pub index_title: String,
}

impl Default for AdminSiteConfig {
    fn default() -> Self {
        Self {
            site_header: "FaceLens Admin".to_string(),
            site_title: "FaceLens Portal".to_string(),
            index_title: "Welcome to FaceLens Dashboard".to_string(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Database connection URL (default: "sqlite://facelens.db?mode=rwc")
    pub database_url: String,

    /// Path of the upload endpoint (default: "/upload_image/")
    pub upload_path: String,

    /// Path prefix of the admin pages (default: "/admin")
    pub admin_path: String,

    /// Maximum request body size in bytes. `None` disables the limit.
    pub max_upload_size: Option<usize>,

    /// Allowed CORS Origins (comma separated, "*" for any, empty disables CORS)
    pub allowed_origins: Vec<String>,

    /// Records per admin list page (default: 100)
    pub admin_page_size: u64,

    pub admin_site: AdminSiteConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://facelens.db?mode=rwc".to_string(),
            upload_path: DEFAULT_UPLOAD_PATH.to_string(),
            admin_path: "/admin".to_string(),
            max_upload_size: None,
            allowed_origins: vec![
                "http://localhost:5173".to_string(), // Vite default
                "http://127.0.0.1:5173".to_string(),
                "http://localhost:3000".to_string(),
            ],
            admin_page_size: 100,
            admin_site: AdminSiteConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            database_url: env::var("DATABASE_URL").unwrap_or(default.database_url),

            upload_path: env::var("UPLOAD_PATH")
                .map(|v| normalize_path(&v))
                .unwrap_or(default.upload_path),

            admin_path: env::var("ADMIN_PATH")
                .map(|v| normalize_prefix(&v))
                .unwrap_or(default.admin_path),

            max_upload_size: env::var("MAX_UPLOAD_SIZE")
                .ok()
                .and_then(|v| v.parse().ok()),

            allowed_origins: env::var("ALLOWED_ORIGINS")
                .ok()
                .map(|v| {
                    v.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or(default.allowed_origins),

            admin_page_size: env::var("ADMIN_PAGE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&v: &u64| v > 0)
                .unwrap_or(default.admin_page_size),

            admin_site: AdminSiteConfig {
                site_header: env::var("ADMIN_SITE_HEADER")
                    .unwrap_or(default.admin_site.site_header),
                site_title: env::var("ADMIN_SITE_TITLE").unwrap_or(default.admin_site.site_title),
                index_title: env::var("ADMIN_INDEX_TITLE")
                    .unwrap_or(default.admin_site.index_title),
            },
        }
    }

    /// Create config for development and tests (in-memory database, CORS disabled)
    pub fn development() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            allowed_origins: Vec::new(),
            ..Self::default()
        }
    }

    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }

    /// Absolute path of an admin page, `suffix` being "" or starting with '/'.
    pub fn admin_url(&self, suffix: &str) -> String {
        match (self.admin_path.as_str(), suffix) {
            ("/", "") => "/".to_string(),
            ("/", _) => suffix.to_string(),
            (prefix, _) => format!("{}{}", prefix, suffix),
        }
    }
}

/// Ensure a route path starts with a single leading slash.
fn normalize_path(path: &str) -> String {
    let trimmed = path.trim().trim_start_matches('/');
    format!("/{}", trimmed)
}

/// Like `normalize_path`, but also strips trailing slashes so sub-routes can be appended.
fn normalize_prefix(path: &str) -> String {
    let normalized = normalize_path(path);
    let trimmed = normalized.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.upload_path, "/upload_image/");
        assert_eq!(config.admin_path, "/admin");
        assert_eq!(config.max_upload_size, None);
        assert_eq!(config.admin_page_size, 100);
        assert!(!config.allows_any_origin());
    }

    #[test]
    fn test_default_admin_branding() {
        let site = AdminSiteConfig::default();
        assert_eq!(site.site_header, "FaceLens Admin");
        assert_eq!(site.site_title, "FaceLens Portal");
        assert_eq!(site.index_title, "Welcome to FaceLens Dashboard");
    }

    #[test]
    fn test_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.database_url, "sqlite::memory:");
        assert!(config.allowed_origins.is_empty());
        assert_eq!(config.upload_path, "/upload_image/");
    }

    #[test]
    fn test_path_normalization() {
        assert_eq!(normalize_path("upload_image/"), "/upload_image/");
        assert_eq!(normalize_path("//upload"), "/upload");
        assert_eq!(normalize_prefix("admin/"), "/admin");
        assert_eq!(normalize_prefix("/backoffice//"), "/backoffice");
        assert_eq!(normalize_prefix("/"), "/");
    }

    #[test]
    fn test_admin_url() {
        let mut config = AppConfig::default();
        assert_eq!(config.admin_url(""), "/admin");
        assert_eq!(config.admin_url("/images/3"), "/admin/images/3");

        config.admin_path = "/".to_string();
        assert_eq!(config.admin_url(""), "/");
        assert_eq!(config.admin_url("/images/3"), "/images/3");
    }
}
