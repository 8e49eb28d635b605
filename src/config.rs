use std::time::Duration;

/// Credentials for the external collaborators, loaded from environment variables.
///
/// Every credential is optional. A missing one disables the collaborator it
/// belongs to and is reported through [`Settings::status`].
///
/// | Env Var                    | Used by               |
/// |----------------------------|-----------------------|
/// | `SUPABASE_URL`             | property store        |
/// | `SUPABASE_ANON_KEY`        | property store        |
/// | `MAPBOX_TOKEN`             | geocoding             |
/// | `CLOUDINARY_CLOUD_NAME`    | image upload          |
/// | `CLOUDINARY_UPLOAD_PRESET` | image upload          |
/// | `HTTP_TIMEOUT_SECS`        | all clients (`30`)    |
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub supabase_url: Option<String>,
    pub supabase_key: Option<String>,
    pub mapbox_token: Option<String>,
    pub cloudinary_cloud: Option<String>,
    pub cloudinary_preset: Option<String>,
    pub http_timeout_secs: u64,
}

/// Whether a collaborator can be reached at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceStatus {
    Configured,
    NotConfigured(&'static str),
}

impl ServiceStatus {
    pub fn is_configured(&self) -> bool {
        matches!(self, ServiceStatus::Configured)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub store: ServiceStatus,
    pub geocoding: ServiceStatus,
    pub media: ServiceStatus,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let http_timeout_secs = get("HTTP_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        Self {
            supabase_url: get("SUPABASE_URL").map(|u| u.trim_end_matches('/').to_string()),
            supabase_key: get("SUPABASE_ANON_KEY"),
            mapbox_token: get("MAPBOX_TOKEN"),
            cloudinary_cloud: get("CLOUDINARY_CLOUD_NAME"),
            cloudinary_preset: get("CLOUDINARY_UPLOAD_PRESET"),
            http_timeout_secs,
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs.max(1))
    }

    pub fn status(&self) -> StatusReport {
        let store = if self.supabase_url.is_none() {
            ServiceStatus::NotConfigured("SUPABASE_URL")
        } else if self.supabase_key.is_none() {
            ServiceStatus::NotConfigured("SUPABASE_ANON_KEY")
        } else {
            ServiceStatus::Configured
        };

        let geocoding = if self.mapbox_token.is_none() {
            ServiceStatus::NotConfigured("MAPBOX_TOKEN")
        } else {
            ServiceStatus::Configured
        };

        let media = if self.cloudinary_cloud.is_none() {
            ServiceStatus::NotConfigured("CLOUDINARY_CLOUD_NAME")
        } else if self.cloudinary_preset.is_none() {
            ServiceStatus::NotConfigured("CLOUDINARY_UPLOAD_PRESET")
        } else {
            ServiceStatus::Configured
        };

        StatusReport {
            store,
            geocoding,
            media,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Settings {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn nothing_set_reports_every_service_missing() {
        let report = settings(&[]).status();
        assert_eq!(report.store, ServiceStatus::NotConfigured("SUPABASE_URL"));
        assert_eq!(report.geocoding, ServiceStatus::NotConfigured("MAPBOX_TOKEN"));
        assert_eq!(
            report.media,
            ServiceStatus::NotConfigured("CLOUDINARY_CLOUD_NAME")
        );
    }

    #[test]
    fn partial_credentials_name_the_missing_variable() {
        let report = settings(&[
            ("SUPABASE_URL", "https://db.example.co/"),
            ("CLOUDINARY_CLOUD_NAME", "demo"),
            ("CLOUDINARY_UPLOAD_PRESET", "  "),
        ])
        .status();
        assert_eq!(report.store, ServiceStatus::NotConfigured("SUPABASE_ANON_KEY"));
        assert_eq!(
            report.media,
            ServiceStatus::NotConfigured("CLOUDINARY_UPLOAD_PRESET")
        );
    }

    #[test]
    fn url_trailing_slash_and_timeout_default() {
        let s = settings(&[("SUPABASE_URL", "https://db.example.co/")]);
        assert_eq!(s.supabase_url.as_deref(), Some("https://db.example.co"));
        assert_eq!(s.http_timeout(), Duration::from_secs(30));

        let s = settings(&[("HTTP_TIMEOUT_SECS", "5")]);
        assert_eq!(s.http_timeout(), Duration::from_secs(5));
    }
}
