//! Identifier case conversions used by the generated Kotlin code
//!
//! `upper_snake` must produce exactly the constant names grpc-java's own
//! generator emits (`METHODID_*`), which differ from conventional
//! SCREAMING_SNAKE_CASE around digits and acronyms.

/// Lowercase only the first character of `s`
pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Uppercase only the first character of `s`
pub fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Convert a lower-camel identifier to the upper-underscore form grpc-java uses
///
/// Every character is uppercased, and an underscore is inserted after any
/// lowercase character that is immediately followed by an uppercase one.
/// Nothing else introduces an underscore, so `getHTTPStatus` becomes
/// `GET_HTTPSTATUS` and `v2Api` becomes `V2API`.
pub fn upper_snake(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        out.extend(c.to_uppercase());
        if c.is_lowercase() && chars.peek().is_some_and(|next| next.is_uppercase()) {
            out.push('_');
        }
    }

    out
}
