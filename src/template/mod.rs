#![warn(clippy::all, clippy::pedantic)]

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::PLACEHOLDER;

/// Bytes left untouched by query encoding; everything else is escaped.
const FORM_QUERY: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~');

/// Encode a string for use inside a query component, with spaces as `+`.
#[must_use]
pub fn encode_query_component(input: &str) -> String {
    input
        .split(' ')
        .map(|part| utf8_percent_encode(part, FORM_QUERY).to_string())
        .collect::<Vec<_>>()
        .join("+")
}

/// Replace every `%s` in `url_template` with the encoded `args`.
///
/// Empty arguments clear the placeholder. A template without a placeholder
/// is returned unchanged and the arguments are dropped.
#[must_use]
pub fn substitute_args(url_template: &str, args: &str) -> String {
    if args.is_empty() {
        return url_template.replace(PLACEHOLDER, "");
    }

    url_template.replace(PLACEHOLDER, &encode_query_component(args))
}
