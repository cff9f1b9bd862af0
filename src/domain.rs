use crate::constants::UNKNOWN_DOMAIN;
use url::Url;

/// Map a tab URL to the domain its time is recorded under.
///
/// Anything that is not an `http`/`https` URL with a host collapses to
/// [`UNKNOWN_DOMAIN`]. Never fails; parse errors are logged and swallowed.
pub fn extract_domain(url: Option<&str>) -> String {
    let Some(url) = url.map(str::trim).filter(|u| !u.is_empty()) else {
        return UNKNOWN_DOMAIN.to_string();
    };

    if !url.starts_with("http") {
        return UNKNOWN_DOMAIN.to_string();
    }

    match Url::parse(url) {
        Ok(parsed) if !matches!(parsed.scheme(), "http" | "https") => {
            log::debug!("Not an http(s) URL: {url}");
            UNKNOWN_DOMAIN.to_string()
        }
        Ok(parsed) => match parsed.host_str() {
            Some(host) => host.strip_prefix("www.").unwrap_or(host).to_string(),
            None => {
                log::warn!("URL has no host: {url}");
                UNKNOWN_DOMAIN.to_string()
            }
        },
        Err(e) => {
            log::warn!("Could not parse URL {url}: {e}");
            UNKNOWN_DOMAIN.to_string()
        }
    }
}
