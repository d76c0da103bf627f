use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;

/// Static-server settings, resolved from the environment with explicit
/// defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServeSettings {
    pub port: u16,
    pub web_root: PathBuf,
    pub model_base_url: Option<String>,
}

impl ServeSettings {
    pub fn from_env() -> Self {
        resolve_serve_settings(|key| std::env::var(key).ok())
    }
}

pub fn resolve_serve_settings<F>(mut get_env: F) -> ServeSettings
where
    F: FnMut(&str) -> Option<String>,
{
    let port = get_env("PORT")
        .and_then(|value| value.parse().ok())
        .unwrap_or(DEFAULT_PORT);
    let web_root = get_env("DEMO_WEB_ROOT")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("web"));
    let model_base_url = get_env("DEMO_MODEL_URL").filter(|value| !value.trim().is_empty());
    ServeSettings {
        port,
        web_root,
        model_base_url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_default_to_port_3000_and_the_web_directory() {
        let settings = resolve_serve_settings(|_| None);
        assert_eq!(settings.port, 3000);
        assert_eq!(settings.web_root, PathBuf::from("web"));
        assert_eq!(settings.model_base_url, None);
    }

    #[test]
    fn port_env_overrides_the_default() {
        let settings = resolve_serve_settings(|key| match key {
            "PORT" => Some("8080".to_string()),
            _ => None,
        });
        assert_eq!(settings.port, 8080);
    }

    #[test]
    fn unparseable_port_falls_back_to_the_default() {
        let settings = resolve_serve_settings(|key| match key {
            "PORT" => Some("not-a-port".to_string()),
            _ => None,
        });
        assert_eq!(settings.port, 3000);
    }

    #[test]
    fn blank_model_url_is_treated_as_unset() {
        let settings = resolve_serve_settings(|key| match key {
            "DEMO_MODEL_URL" => Some("   ".to_string()),
            _ => None,
        });
        assert_eq!(settings.model_base_url, None);
    }

    #[test]
    fn web_root_and_model_url_come_from_the_environment() {
        let settings = resolve_serve_settings(|key| match key {
            "DEMO_WEB_ROOT" => Some("public".to_string()),
            "DEMO_MODEL_URL" => Some("http://localhost:8081/models/m1".to_string()),
            _ => None,
        });
        assert_eq!(settings.web_root, PathBuf::from("public"));
        assert_eq!(
            settings.model_base_url.as_deref(),
            Some("http://localhost:8081/models/m1")
        );
    }
}
