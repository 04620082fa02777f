//! Shape checks for resource locators (contact images, linked documents).
//!
//! Locators are never fetched. A locator is accepted when it is an absolute
//! `http`, `https` or `data` URL, or a relative reference that resolves
//! against a base URL.

use url::Url;

const ALLOWED_SCHEMES: &[&str] = &["http", "https", "data"];

/// Check that a locator is present and well formed.
pub fn check_locator(locator: &str) -> Result<(), String> {
    if locator.trim().is_empty() {
        return Err("locator is empty".to_string());
    }
    if locator.chars().any(char::is_whitespace) {
        return Err("locator contains whitespace".to_string());
    }

    match Url::parse(locator) {
        Ok(url) => {
            if ALLOWED_SCHEMES.contains(&url.scheme()) {
                Ok(())
            } else {
                Err(format!("unsupported scheme '{}'", url.scheme()))
            }
        }
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let base = Url::parse("http://localhost/").map_err(|e| e.to_string())?;
            base.join(locator).map(|_| ()).map_err(|e| e.to_string())
        }
        Err(e) => Err(e.to_string()),
    }
}
