//! Static demo pages and the login hand-off to the issuer.

use crate::cli::globals::GlobalArgs;
use axum::{
    extract::{Extension, RawQuery},
    http::{header::LOCATION, StatusCode},
    response::{Html, IntoResponse, Response},
};
use tracing::{debug, error};
use url::form_urlencoded;

pub const HOME_MESSAGE: &str =
    "Welcome to the OpenAuth demonstration. Use the links below to test the authentication flow.";

pub const CALLBACK_MESSAGE: &str =
    "Welcome to the OpenAuth demonstration. You have successfully logged in!";

// Parameters owned by this service; incoming values are replaced.
const OVERRIDDEN_PARAMS: [&str; 3] = ["redirect_uri", "client_id", "response_type"];

pub async fn home() -> Html<String> {
    Html(render_page(HOME_MESSAGE))
}

pub async fn callback() -> Html<String> {
    Html(render_page(CALLBACK_MESSAGE))
}

/// Redirect the browser to the issuer's authorization endpoint.
pub async fn login(globals: Extension<GlobalArgs>, RawQuery(query): RawQuery) -> Response {
    match authorize_location(&globals, query.as_deref()) {
        Ok(location) => {
            debug!("redirecting to {}", location);
            (StatusCode::FOUND, [(LOCATION, location)]).into_response()
        }
        Err(err) => {
            error!("Error building authorize URL: {:?}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error building authorize URL".to_string(),
            )
                .into_response()
        }
    }
}

/// `{issuer}/authorize` with the caller's query plus the code-flow parameters.
pub fn authorize_location(globals: &GlobalArgs, query: Option<&str>) -> anyhow::Result<String> {
    let mut url = globals.authorize_url()?;
    let callback = globals.callback_url()?;

    {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
            if !OVERRIDDEN_PARAMS.contains(&key.as_ref()) {
                pairs.append_pair(&key, &value);
            }
        }
        pairs
            .append_pair("redirect_uri", callback.as_str())
            .append_pair("client_id", &globals.client_id)
            .append_pair("response_type", "code");
    }

    Ok(url.to_string())
}

#[must_use]
pub fn render_page(message: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>OpenAuth Demo</title>
  <style>
    body {{
      font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Helvetica, Arial, sans-serif;
      max-width: 800px;
      margin: 0 auto;
      padding: 2rem;
      line-height: 1.6;
    }}
    h1 {{ color: #0051c3; }}
    .btn {{
      display: inline-block;
      background: #0051c3;
      color: white;
      padding: 0.5rem 1rem;
      text-decoration: none;
      border-radius: 4px;
      margin-right: 1rem;
    }}
    .btn:hover {{ background: #003d97; }}
  </style>
</head>
<body>
  <h1>OpenAuth Demo</h1>
  <p>{message}</p>
  <div>
    <a href="/login" class="btn">Log In</a>
    <a href="#" class="btn" onclick="logout(); return false;">Log Out</a>
  </div>
  <script>
    function logout() {{
      document.cookie.split(';').forEach(function (cookie) {{
        var name = cookie.trim().split('=')[0];
        document.cookie = name + '=; expires=Thu, 01 Jan 1970 00:00:00 UTC; path=/;';
      }});
      window.location.reload();
      alert('Logged out successfully!');
    }}
  </script>
</body>
</html>
"##
    )
}
