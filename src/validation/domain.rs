//! Allowed-domain validation

use super::{fields, FieldErrors};

/// Lower-case a domain and strip a leading `@`
pub fn normalize_domain(domain: &str) -> String {
    domain.trim().trim_start_matches('@').to_lowercase()
}

pub fn validate(domain: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();
    let domain = normalize_domain(domain);
    errors.require(fields::DOMAIN, &domain, "Domain");
    if !domain.is_empty()
        && (domain.contains('@') || domain.contains(char::is_whitespace) || !domain.contains('.'))
    {
        errors.add(fields::DOMAIN, "Domain must look like example.com");
    }
    errors
}
