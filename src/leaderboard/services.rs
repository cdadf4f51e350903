use lazy_static::lazy_static;
use regex::Regex;

pub(crate) fn is_valid_username(username: &str) -> bool {
    lazy_static! {
        static ref USERNAME_RE: Regex = Regex::new(r"^[\p{L}\p{N}_.\- ]{1,40}$").unwrap();
    }
    USERNAME_RE.is_match(username)
}

/// Trims surrounding whitespace; `None` when the result is not a usable name.
pub(crate) fn normalize_username(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    is_valid_username(trimmed).then_some(trimmed)
}
