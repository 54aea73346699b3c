use crate::error::{AppError, Result};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use snip_core::{ShortCode, Visit};
use std::borrow::Cow;

/// Follows a short link with a `302 Found`.
pub async fn redirect_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response> {
    let code = ShortCode::new(short_code)?;

    match state.shortener().visit(&code).await? {
        Visit::Redirect(url) => {
            let location = HeaderValue::from_str(&encode_location(&url))
                .map_err(|e| AppError::Internal(e.to_string()))?;
            Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
        }
        Visit::Expired => Err(AppError::Expired),
        Visit::NotFound => Err(AppError::NotFound),
    }
}

/// Percent-encodes everything that may not appear in a URL as-is.
///
/// Reserved characters and existing `%XX` escapes are kept, so an already
/// encoded URL passes through unchanged. The output is visible ASCII and
/// always a valid header value.
fn encode_location(url: &str) -> Cow<'_, str> {
    if url.char_indices().all(|(i, c)| keeps_as_is(url, i, c)) {
        return Cow::Borrowed(url);
    }

    let mut encoded = String::with_capacity(url.len() + 8);
    let mut buf = [0u8; 4];
    for (i, c) in url.char_indices() {
        if keeps_as_is(url, i, c) {
            encoded.push(c);
        } else {
            encoded.push_str(&urlencoding::encode(c.encode_utf8(&mut buf)));
        }
    }
    Cow::Owned(encoded)
}

fn keeps_as_is(url: &str, index: usize, c: char) -> bool {
    match c {
        '%' => url
            .as_bytes()
            .get(index + 1..index + 3)
            .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit)),
        '"' | '<' | '>' | '\\' | '^' | '`' | '{' | '|' | '}' => false,
        _ => c.is_ascii_graphic(),
    }
}
