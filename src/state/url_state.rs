//! URL query parameters for configuring the web build.
//!
//! Example: `?page_size=25&zoom=3&radius=40&cluster=off&basemap=vector`
//!
//! Natively the same keys are accepted as arguments, e.g.
//! `detonation-atlas page_size=25 cluster=off`.

/// Parsed URL parameters.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct UrlParams {
    pub data: Option<String>,
    pub page_size: Option<usize>,
    pub zoom: Option<f32>,
    pub radius: Option<f64>,
    pub max_zoom: Option<u8>,
    pub min_points: Option<usize>,
    pub cluster: Option<bool>,
    pub basemap: Option<String>,
    pub basemap_url: Option<String>,
}

/// Parses a query string (with or without the leading `?`).
///
/// Unknown keys and unparseable values are ignored.
pub fn parse_query(search: &str) -> UrlParams {
    let mut params = UrlParams::default();

    let query = search.trim_start_matches('?');
    if query.is_empty() {
        return params;
    }

    for pair in query.split('&') {
        let mut kv = pair.splitn(2, '=');
        let key = kv.next().unwrap_or("");
        let value = kv.next().unwrap_or("");
        match key {
            "data" => params.data = Some(value.to_string()),
            "page_size" => params.page_size = value.parse().ok(),
            "zoom" => params.zoom = value.parse().ok(),
            "radius" => params.radius = value.parse().ok(),
            "max_zoom" => params.max_zoom = value.parse().ok(),
            "min_points" => params.min_points = value.parse().ok(),
            "cluster" => params.cluster = parse_flag(value),
            "basemap" => params.basemap = Some(value.to_string()),
            "basemap_url" => params.basemap_url = Some(value.to_string()),
            _ => {}
        }
    }

    params
}

fn parse_flag(value: &str) -> Option<bool> {
    match value {
        "1" | "on" | "true" => Some(true),
        "0" | "off" | "false" => Some(false),
        _ => None,
    }
}

/// Parse URL query parameters from the current browser URL.
#[cfg(target_arch = "wasm32")]
pub fn parse_from_url() -> UrlParams {
    let search = web_sys::window()
        .and_then(|window| window.location().search().ok())
        .unwrap_or_default();
    parse_query(&search)
}

/// Native builds take the same overrides as `key=value` command-line arguments.
#[cfg(not(target_arch = "wasm32"))]
pub fn parse_from_url() -> UrlParams {
    let pairs: Vec<String> = std::env::args()
        .skip(1)
        .filter(|arg| arg.contains('='))
        .collect();
    parse_query(&pairs.join("&"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query() {
        let params = parse_query("?page_size=10&zoom=3.5&max_zoom=12&min_points=2&cluster=1");
        assert_eq!(params.page_size, Some(10));
        assert_eq!(params.zoom, Some(3.5));
        assert_eq!(params.max_zoom, Some(12));
        assert_eq!(params.min_points, Some(2));
        assert_eq!(params.cluster, Some(true));
    }

    #[test]
    fn test_parse_query_ignores_junk() {
        let params = parse_query("page_size=many&unknown=1&cluster=maybe&&");
        assert_eq!(params, UrlParams::default());
        assert_eq!(parse_query(""), UrlParams::default());
    }
}
