//! URI and host functions

use super::{expect_args, opt_bool, opt_str};
use crate::registry::{Function, FunctionError};
use regex::Regex;
use terminus_core::{UrlParts, Value};
use url::{Position, Url};

/// `uri_encode(value)` — RFC 3986 percent-encoding of everything outside
/// the unreserved set
pub struct UriEncode;

impl Function for UriEncode {
    fn evaluate(&self, args: &[Option<Value>]) -> Result<Option<Value>, FunctionError> {
        expect_args(args, 1)?;
        Ok(opt_str(args, 0)?
            .map(|input| Value::String(urlencoding::encode(input).into_owned())))
    }
}

/// `is_valid_host_label(value, allow_subdomains)` — DNS host label check:
/// 1-63 characters, alphanumeric or hyphen, leading character alphanumeric.
/// With `allow_subdomains`, each dot-separated label is checked.
pub struct ValidHostLabel {
    label: Regex,
}

impl ValidHostLabel {
    pub fn new() -> Self {
        // Compiled once at registry construction; the pattern is a constant.
        Self {
            label: Regex::new("^[A-Za-z0-9][A-Za-z0-9-]{0,62}$").expect("valid host label pattern"),
        }
    }
}

impl Default for ValidHostLabel {
    fn default() -> Self {
        Self::new()
    }
}

impl Function for ValidHostLabel {
    fn evaluate(&self, args: &[Option<Value>]) -> Result<Option<Value>, FunctionError> {
        expect_args(args, 2)?;
        let (Some(value), Some(allow_subdomains)) = (opt_str(args, 0)?, opt_bool(args, 1)?) else {
            return Ok(None);
        };

        let valid = if allow_subdomains {
            !value.is_empty() && value.split('.').all(|label| self.label.is_match(label))
        } else {
            self.label.is_match(value)
        };
        Ok(Some(Value::Bool(valid)))
    }
}

/// `parse_url(value)` — split an http(s) URL into its endpoint-relevant
/// parts. Absent for other schemes, URLs with a query, or anything
/// unparseable.
pub struct ParseUrl;

impl Function for ParseUrl {
    fn evaluate(&self, args: &[Option<Value>]) -> Result<Option<Value>, FunctionError> {
        expect_args(args, 1)?;
        let Some(input) = opt_str(args, 0)? else {
            return Ok(None);
        };
        Ok(parse_url_parts(input).map(Value::Url))
    }
}

fn parse_url_parts(input: &str) -> Option<UrlParts> {
    let parsed = Url::parse(input).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    if parsed.query().is_some() {
        return None;
    }
    parsed.host_str()?;

    let authority = parsed[Position::BeforeHost..Position::AfterPort].to_string();
    let path = parsed.path().to_string();
    let mut normalized_path = path.clone();
    if !normalized_path.starts_with('/') {
        normalized_path.insert(0, '/');
    }
    if !normalized_path.ends_with('/') {
        normalized_path.push('/');
    }
    let is_ip = matches!(
        parsed.host(),
        Some(url::Host::Ipv4(_)) | Some(url::Host::Ipv6(_))
    );

    Some(UrlParts {
        scheme: parsed.scheme().to_string(),
        authority,
        path,
        normalized_path,
        is_ip,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn present(value: Value) -> Option<Value> {
        Some(value)
    }

    #[test]
    fn test_uri_encode() {
        assert_eq!(
            UriEncode
                .evaluate(&[present(Value::from("a b/c~d"))])
                .unwrap(),
            Some(Value::from("a%20b%2Fc~d"))
        );
        assert_eq!(UriEncode.evaluate(&[None]).unwrap(), None);
    }

    #[test]
    fn test_host_label_single() {
        let f = ValidHostLabel::new();
        let check = |label: &str| {
            f.evaluate(&[present(Value::from(label)), present(Value::Bool(false))])
                .unwrap()
        };
        assert_eq!(check("bucket-1"), Some(Value::Bool(true)));
        assert_eq!(check("-bucket"), Some(Value::Bool(false)));
        assert_eq!(check("has.dot"), Some(Value::Bool(false)));
        assert_eq!(check(""), Some(Value::Bool(false)));
        assert_eq!(check(&"a".repeat(64)), Some(Value::Bool(false)));
        assert_eq!(check(&"a".repeat(63)), Some(Value::Bool(true)));
    }

    #[test]
    fn test_host_label_subdomains() {
        let f = ValidHostLabel::new();
        let check = |label: &str| {
            f.evaluate(&[present(Value::from(label)), present(Value::Bool(true))])
                .unwrap()
        };
        assert_eq!(check("api.example.com"), Some(Value::Bool(true)));
        assert_eq!(check("api..com"), Some(Value::Bool(false)));
        assert_eq!(check("api.example."), Some(Value::Bool(false)));
    }

    #[test]
    fn test_parse_url_https() {
        let parts = parse_url_parts("https://example.com/v1/items").unwrap();
        assert_eq!(parts.scheme, "https");
        assert_eq!(parts.authority, "example.com");
        assert_eq!(parts.path, "/v1/items");
        assert_eq!(parts.normalized_path, "/v1/items/");
        assert!(!parts.is_ip);
    }

    #[test]
    fn test_parse_url_port_and_ip() {
        let parts = parse_url_parts("http://127.0.0.1:8080").unwrap();
        assert_eq!(parts.authority, "127.0.0.1:8080");
        assert_eq!(parts.path, "/");
        assert_eq!(parts.normalized_path, "/");
        assert!(parts.is_ip);

        // Default port is dropped from the authority.
        let parts = parse_url_parts("https://example.com:443/x").unwrap();
        assert_eq!(parts.authority, "example.com");
    }

    #[test]
    fn test_parse_url_rejections() {
        assert!(parse_url_parts("ftp://example.com").is_none());
        assert!(parse_url_parts("https://example.com/path?query=1").is_none());
        assert!(parse_url_parts("not a url").is_none());
    }
}
