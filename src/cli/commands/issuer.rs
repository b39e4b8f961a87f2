use crate::cli::globals::DEFAULT_CLIENT_ID;
use clap::{Arg, Command};

pub const ARG_ISSUER_URL: &str = "issuer-url";
pub const ARG_PUBLIC_URL: &str = "public-url";
pub const ARG_CLIENT_ID: &str = "client-id";
pub const ARG_ISSUER_SECRET: &str = "issuer-secret";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_ISSUER_URL)
                .long(ARG_ISSUER_URL)
                .help("Base URL of the OAuth/OpenID issuer, example: https://auth.example.com")
                .env("IDBIND_ISSUER_URL")
                .required(true),
        )
        .arg(
            Arg::new(ARG_PUBLIC_URL)
                .long(ARG_PUBLIC_URL)
                .help("Public base URL of this service, used to build the callback URL")
                .env("IDBIND_PUBLIC_URL")
                .default_value("http://localhost:8080"),
        )
        .arg(
            Arg::new(ARG_CLIENT_ID)
                .long(ARG_CLIENT_ID)
                .help("OAuth client id sent to the issuer on login")
                .env("IDBIND_CLIENT_ID")
                .default_value(DEFAULT_CLIENT_ID),
        )
        .arg(
            Arg::new(ARG_ISSUER_SECRET)
                .long(ARG_ISSUER_SECRET)
                .help("Shared secret the issuer must send as a bearer token to /subject")
                .env("IDBIND_ISSUER_SECRET")
                .hide_env_values(true),
        )
}
