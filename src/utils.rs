use url::Url;

/// String utilities for parsing and displaying humanly readable values.
pub fn to_human_readable_string(value: impl Into<String>) -> String {
    value
        .into()
        .chars()
        .fold(String::new(), |mut acc, c| {
            // Convert camelCase to space-separated words with capitalized first letter.
            if c.is_uppercase() {
                acc.push(' ');
            }

            // Check if the field is snake_case and convert to
            // space-separated words with capitalized first letter.
            if c == '_' {
                acc.push(' ');
                return acc;
            }

            acc.push(c);
            acc
        })
        // Split the path based on empty spaces and uppercase the first letter of each word.
        .split(' ')
        .fold(String::new(), |desc, word| {
            let word = word
                .chars()
                .enumerate()
                .fold(String::new(), |mut acc, (i, c)| {
                    // Capitalize the first letter of the word.
                    if i == 0 {
                        if let Some(c) = c.to_uppercase().next() {
                            acc.push(c);
                            return acc;
                        }
                    }
                    acc.push(c);
                    acc
                });

            format!("{desc} {}", word.trim_end())
        })
        .trim()
        .to_string()
}

/// Returns true if the value looks like a base64 data URI for an image,
/// e.g. `data:image/png;base64,...`.
pub fn is_image_data_uri(value: &str) -> bool {
    let Some(rest) = value.strip_prefix("data:image/") else {
        return false;
    };
    let Some((subtype, _)) = rest.split_once(";base64,") else {
        return false;
    };
    !subtype.is_empty() && subtype.chars().all(|c| c.is_ascii_alphabetic())
}

/// Extracts the host name from a URL-shaped identifier, used as a last-resort
/// issuer display name. Returns `None` when the input does not parse as a URL
/// or has no host component.
pub fn host_name_from_url(value: &str) -> Option<String> {
    Url::parse(value)
        .ok()
        .and_then(|url| url.host_str().map(ToOwned::to_owned))
}
