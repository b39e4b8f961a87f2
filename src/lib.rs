//! # idbind (identity binding for an external OAuth/OpenID issuer)
//!
//! `idbind` sits next to an external issuer. The issuer runs the whole
//! authorization-code flow; once a user has proven control of an email address
//! it calls back into `idbind`, which maps that email to a durable user id and
//! returns the `user` subject the issuer embeds into the tokens it mints.
//!
//! ## Identity binding
//!
//! - **Canonical emails:** emails are trimmed and lowercased before they reach
//!   storage, so case and whitespace variants resolve to one user.
//! - **Atomic upsert:** a single `INSERT ... ON CONFLICT (email) DO UPDATE ...
//!   RETURNING id` statement creates or fetches the row. Concurrent first logins
//!   for the same email converge on one id without application-level locking.
//! - **Fail closed:** if the store cannot produce an id, no subject is returned.
//!
//! ## Edge routes
//!
//! A home page, a `/login` redirect into the issuer's `/authorize` endpoint and a
//! `/callback` landing page, plus `/health`, `/subject` and `/openapi.json`.

pub mod api;
pub mod cli;
pub mod identity;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }
}
