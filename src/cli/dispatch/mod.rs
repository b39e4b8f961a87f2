use crate::{
    cli::{
        actions::Action,
        commands::{
            issuer::{ARG_CLIENT_ID, ARG_ISSUER_SECRET, ARG_ISSUER_URL, ARG_PUBLIC_URL},
            ARG_DSN, ARG_MAX_CONNECTIONS, ARG_PORT,
        },
        globals::GlobalArgs,
    },
    identity::Backend,
};
use anyhow::{anyhow, bail, Context, Result};
use secrecy::SecretString;
use url::Url;

fn http_url(matches: &clap::ArgMatches, arg: &str) -> Result<Url> {
    let raw = matches
        .get_one::<String>(arg)
        .ok_or_else(|| anyhow!("missing required argument: --{arg}"))?;

    let url = Url::parse(raw).with_context(|| format!("Invalid --{arg}: {raw}"))?;

    match url.scheme() {
        "http" | "https" if url.host().is_some() => Ok(url),
        _ => bail!("--{arg} must be an http(s) URL with a host: {raw}"),
    }
}

/// Turn parsed arguments into the action to run.
///
/// # Errors
/// Returns an error if a required argument is missing or a URL/DSN is invalid.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let dsn = matches
        .get_one::<String>(ARG_DSN)
        .cloned()
        .ok_or_else(|| anyhow!("missing required argument: --{ARG_DSN}"))?;

    // reject unsupported backends before anything connects
    Backend::from_dsn(&dsn)?;

    let mut globals = GlobalArgs::new(
        http_url(matches, ARG_ISSUER_URL)?,
        http_url(matches, ARG_PUBLIC_URL)?,
    );

    if let Some(client_id) = matches.get_one::<String>(ARG_CLIENT_ID) {
        globals = globals.with_client_id(client_id.clone());
    }

    if let Some(secret) = matches.get_one::<String>(ARG_ISSUER_SECRET) {
        if secret.is_empty() {
            bail!("--{ARG_ISSUER_SECRET} must not be empty");
        }
        globals = globals.with_issuer_secret(SecretString::from(secret.clone()));
    }

    Ok(Action::Server {
        port: matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080),
        dsn: SecretString::from(dsn),
        max_connections: matches
            .get_one::<u32>(ARG_MAX_CONNECTIONS)
            .copied()
            .unwrap_or(5),
        globals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;
    use secrecy::ExposeSecret;

    fn matches_from(args: &[&str]) -> clap::ArgMatches {
        temp_env::with_vars(
            [
                ("IDBIND_PORT", None::<&str>),
                ("IDBIND_DSN", None::<&str>),
                ("IDBIND_ISSUER_URL", None::<&str>),
                ("IDBIND_PUBLIC_URL", None::<&str>),
                ("IDBIND_CLIENT_ID", None::<&str>),
                ("IDBIND_ISSUER_SECRET", None::<&str>),
                ("IDBIND_MAX_CONNECTIONS", None::<&str>),
            ],
            || commands::new().get_matches_from(args),
        )
    }

    #[test]
    fn test_handler_builds_server_action() -> Result<()> {
        let matches = matches_from(&[
            "idbind",
            "--port",
            "9000",
            "--dsn",
            "sqlite::memory:",
            "--issuer-url",
            "https://auth.example.com",
            "--client-id",
            "web",
            "--issuer-secret",
            "s3cret",
        ]);

        let Action::Server {
            port,
            dsn,
            max_connections,
            globals,
        } = handler(&matches)?;

        assert_eq!(port, 9000);
        assert_eq!(dsn.expose_secret(), "sqlite::memory:");
        assert_eq!(max_connections, 5);
        assert_eq!(globals.issuer_url.as_str(), "https://auth.example.com/");
        assert_eq!(globals.public_url.as_str(), "http://localhost:8080/");
        assert_eq!(globals.client_id, "web");
        assert!(globals.issuer_secret.is_some());
        Ok(())
    }

    #[test]
    fn test_handler_rejects_unknown_dsn_scheme() {
        let matches = matches_from(&[
            "idbind",
            "--dsn",
            "mysql://localhost/idbind",
            "--issuer-url",
            "https://auth.example.com",
        ]);
        assert!(handler(&matches).is_err());
    }

    #[test]
    fn test_handler_rejects_non_http_issuer() {
        let matches = matches_from(&[
            "idbind",
            "--dsn",
            "memory:",
            "--issuer-url",
            "ftp://auth.example.com",
        ]);
        assert!(handler(&matches).is_err());

        let matches = matches_from(&["idbind", "--dsn", "memory:", "--issuer-url", "not a url"]);
        assert!(handler(&matches).is_err());
    }

    #[test]
    fn test_handler_rejects_empty_secret() {
        let matches = matches_from(&[
            "idbind",
            "--dsn",
            "memory:",
            "--issuer-url",
            "https://auth.example.com",
            "--issuer-secret",
            "",
        ]);
        assert!(handler(&matches).is_err());
    }
}
