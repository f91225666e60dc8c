//! HAR adapter producing a [`CaptureLog`].
//!
//! Only the handful of fields the pipeline reads are modelled; everything
//! else in the archive is ignored by `serde`.

use serde::Deserialize;

use super::{CaptureError, CaptureLog, Observation, PageContext};

#[derive(Deserialize)]
struct HarFile {
    log: HarLog,
}

#[derive(Deserialize)]
struct HarLog {
    #[serde(default)]
    pages: Vec<HarPage>,
    #[serde(default)]
    entries: Vec<HarEntry>,
}

#[derive(Deserialize)]
struct HarPage {
    #[serde(default)]
    title: String,
}

#[derive(Deserialize)]
struct HarEntry {
    request: HarRequest,
    #[serde(default)]
    response: HarResponse,
}

#[derive(Deserialize)]
struct HarRequest {
    url: String,
    #[serde(default, rename = "queryString")]
    query_string: Vec<HarQuery>,
}

#[derive(Deserialize)]
struct HarQuery {
    name: String,
    value: String,
}

#[derive(Default, Deserialize)]
struct HarResponse {
    #[serde(default)]
    content: HarContent,
}

#[derive(Default, Deserialize)]
struct HarContent {
    #[serde(default)]
    text: Option<String>,
}

/// Parse HAR JSON text into a [`CaptureLog`].
///
/// # Errors
///
/// Returns [`CaptureError::Malformed`] when `text` is not a HAR document.
pub fn parse_har(text: &str) -> Result<CaptureLog, CaptureError> {
    let har: HarFile = serde_json::from_str(text)?;
    let pages = har
        .log
        .pages
        .into_iter()
        .map(|page| PageContext { title: page.title })
        .collect();
    let observations = har
        .log
        .entries
        .into_iter()
        .map(|entry| {
            let tags = entry
                .request
                .query_string
                .into_iter()
                .map(|q| (q.name, q.value))
                .collect();
            Observation::from_request(&entry.request.url, entry.response.content.text, tags)
        })
        .collect();
    Ok(CaptureLog {
        pages,
        observations,
    })
}
