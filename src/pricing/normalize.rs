//! Label to backend-key normalization.
//!
//! Turns free-form selector labels ("Car / Cab", "Key Unlocker Services") into
//! the lower-camel-case keys the pricing backend uses as object keys and URL
//! segments (`carCab`, `keyUnlockerServices`).

/// Normalize a label into a lower-camel-case key.
///
/// Returns an empty string when the label carries no alphanumeric content.
pub fn normalize(label: &str) -> String {
    let cleaned: String = label
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c.is_whitespace() {
                c
            } else {
                // `/ & _ ( ) -` and anything outside the key alphabet split words.
                ' '
            }
        })
        .collect();

    let tokens: Vec<&str> = cleaned.split_whitespace().collect();

    match tokens.as_slice() {
        [] => String::new(),
        // Already-normalized keys are fixed points.
        [single] if !single.starts_with(|c: char| c.is_ascii_uppercase()) => single.to_string(),
        [first, rest @ ..] => {
            let mut key = first.to_ascii_lowercase();
            for token in rest {
                push_capitalized(&mut key, token);
            }
            key
        }
    }
}

fn push_capitalized(out: &mut String, token: &str) {
    let mut chars = token.chars();
    if let Some(head) = chars.next() {
        out.push(head.to_ascii_uppercase());
        out.push_str(&chars.as_str().to_ascii_lowercase());
    }
}
