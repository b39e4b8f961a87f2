use anyhow::{anyhow, Result};
use secrecy::SecretString;
use url::Url;

pub const DEFAULT_CLIENT_ID: &str = "your-client-id";

/// Issuer wiring shared with every request handler.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub issuer_url: Url,
    pub public_url: Url,
    pub client_id: String,
    pub issuer_secret: Option<SecretString>,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(issuer_url: Url, public_url: Url) -> Self {
        Self {
            issuer_url,
            public_url,
            client_id: DEFAULT_CLIENT_ID.to_string(),
            issuer_secret: None,
        }
    }

    #[must_use]
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }

    #[must_use]
    pub fn with_issuer_secret(mut self, secret: SecretString) -> Self {
        self.issuer_secret = Some(secret);
        self
    }

    /// Issuer authorization endpoint.
    ///
    /// # Errors
    /// Returns an error if the issuer URL cannot carry a path.
    pub fn authorize_url(&self) -> Result<Url> {
        join_segment(&self.issuer_url, "authorize")
    }

    /// Where the issuer sends the browser back after login.
    ///
    /// # Errors
    /// Returns an error if the public URL cannot carry a path.
    pub fn callback_url(&self) -> Result<Url> {
        join_segment(&self.public_url, "callback")
    }
}

fn join_segment(base: &Url, segment: &str) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| anyhow!("URL cannot be a base: {base}"))?
        .pop_if_empty()
        .push(segment);
    url.set_query(None);
    url.set_fragment(None);

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn globals(issuer: &str, public: &str) -> Result<GlobalArgs> {
        Ok(GlobalArgs::new(Url::parse(issuer)?, Url::parse(public)?))
    }

    #[test]
    fn test_global_args() -> Result<()> {
        let args = globals("https://auth.example.com", "http://localhost:8080")?
            .with_issuer_secret(SecretString::from("s3cret".to_string()));

        assert_eq!(args.client_id, DEFAULT_CLIENT_ID);
        assert_eq!(
            args.issuer_secret.as_ref().map(|s| s.expose_secret().to_string()),
            Some("s3cret".to_string())
        );
        Ok(())
    }

    #[test]
    fn test_authorize_url() -> Result<()> {
        let args = globals("https://auth.example.com", "http://localhost:8080")?;
        assert_eq!(args.authorize_url()?.as_str(), "https://auth.example.com/authorize");

        let args = globals("https://auth.example.com/tenant/?x=1", "http://localhost:8080")?;
        assert_eq!(
            args.authorize_url()?.as_str(),
            "https://auth.example.com/tenant/authorize"
        );

        let args = globals("https://auth.example.com/tenant", "http://localhost:8080")?;
        assert_eq!(
            args.authorize_url()?.as_str(),
            "https://auth.example.com/tenant/authorize"
        );
        Ok(())
    }

    #[test]
    fn test_callback_url() -> Result<()> {
        let args = globals("https://auth.example.com", "http://localhost:8080")?;
        assert_eq!(args.callback_url()?.as_str(), "http://localhost:8080/callback");
        Ok(())
    }

    #[test]
    fn test_cannot_be_base() -> Result<()> {
        let args = globals("mailto:auth@example.com", "http://localhost:8080")?;
        assert!(args.authorize_url().is_err());
        Ok(())
    }
}
