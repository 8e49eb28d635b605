/// Failures of the property persistence boundary.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Not configured: {0} is not set")]
    ConfigMissing(&'static str),

    #[error("Not a persisted record: {0}")]
    NotPersisted(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Could not decode response: {0}")]
    Decode(String),
}

impl StoreError {
    /// Text shown to the person who triggered the action.
    pub fn user_message(&self) -> String {
        match self {
            StoreError::ConfigMissing(_) => {
                "Property database is not configured. Listings are read-only sample data.".into()
            }
            StoreError::NotPersisted(_) => {
                "This listing is local sample data and cannot be changed. Create a real listing first."
                    .into()
            }
            StoreError::Validation(msg) => msg.clone(),
            StoreError::Backend(_) | StoreError::Decode(_) => {
                "Something went wrong while saving. Please try again.".into()
            }
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StoreError::Decode(err.to_string())
        } else {
            StoreError::Backend(err.to_string())
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("Not configured: {0} is not set")]
    ConfigMissing(&'static str),

    #[error("Geocoding request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Geocoding service returned status {0}")]
    Status(u16),

    #[error("Invalid geocoding URL: {0}")]
    InvalidUrl(String),
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Not configured: {0} is not set")]
    ConfigMissing(&'static str),

    #[error("{file_name} is not an image ({mime_type})")]
    InvalidType { file_name: String, mime_type: String },

    #[error("{file_name} is {size} bytes, the limit is {limit} bytes")]
    TooLarge {
        file_name: String,
        size: usize,
        limit: usize,
    },

    #[error("Upload failed: {0}")]
    Backend(String),
}

impl From<reqwest::Error> for UploadError {
    fn from(err: reqwest::Error) -> Self {
        UploadError::Backend(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_data_and_real_errors_read_differently() {
        let mock = StoreError::NotPersisted("abc-123".into()).user_message();
        let real = StoreError::Backend("500".into()).user_message();
        assert!(mock.contains("sample data"));
        assert!(real.contains("try again"));
        assert_ne!(mock, real);
    }

    #[test]
    fn validation_message_is_passed_through() {
        let err = StoreError::Validation("Please pick a location on the map".into());
        assert_eq!(err.user_message(), "Please pick a location on the map");
    }
}
