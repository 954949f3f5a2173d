//! Routes from the "start a family" form to the family page.
//!
//! The form submits as soon as the head-of-family name is followed by a
//! space, so only the first word usually ends up in the route. Names that
//! reach the route some other way are percent-encoded as one path segment.

use reqwest::Url;
use uuid::Uuid;

/// Routes are built on a throwaway base and only the path is kept
const ROUTE_BASE: &str = "http://route.invalid/";

/// Whether the form should submit on this keystroke
pub fn should_submit(input: &str) -> bool {
    input.trim_start().contains(' ')
}

/// `"{prefix}/{name}"`, or `None` for a blank name
pub fn family_route(prefix: &str, input: &str) -> Option<String> {
    route_url(prefix, input).map(|url| url.path().trim_start_matches('/').to_string())
}

/// Route to a stored family, hydrated from the member API by `id`
pub fn family_route_with_id(prefix: &str, input: &str, id: Uuid) -> Option<String> {
    let mut url = route_url(prefix, input)?;
    url.query_pairs_mut().append_pair("id", &id.to_string());
    Some(format!(
        "{}?{}",
        url.path().trim_start_matches('/'),
        url.query().unwrap_or_default()
    ))
}

fn route_url(prefix: &str, input: &str) -> Option<Url> {
    let name = input.trim();
    if name.is_empty() {
        return None;
    }
    let mut url = Url::parse(ROUTE_BASE).ok()?;
    url.path_segments_mut()
        .ok()?
        .clear()
        .extend(prefix.split('/').filter(|segment| !segment.is_empty()))
        .push(name);
    Some(url)
}
