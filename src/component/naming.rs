// ============================================================================
// spark-panel - Naming
// Class name → tag name, custom element name rules, dataset keys
// ============================================================================

/// Convert a class name to its kebab-case tag.
///
/// Acronyms stay together: `HSVPicker` becomes `hsv-picker`.
///
/// ```
/// use spark_panel::component::naming::to_kebab_case;
///
/// assert_eq!(to_kebab_case("ColourWheel"), "colour-wheel");
/// ```
pub fn to_kebab_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == ' ' {
            if !out.is_empty() && !out.ends_with('-') {
                out.push('-');
            }
            continue;
        }
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary && !out.ends_with('-') {
                out.push('-');
            }
        }
        out.extend(c.to_lowercase());
    }

    out
}

/// Whether `tag` may be used as a custom element name: starts with a
/// lowercase ASCII letter, contains a hyphen, and has no uppercase letters.
pub fn is_valid_custom_element_name(tag: &str) -> bool {
    let mut chars = tag.chars();
    let starts_ok = chars.next().is_some_and(|c| c.is_ascii_lowercase());
    starts_ok
        && tag.contains('-')
        && tag
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '.' | '_'))
}

/// The dataset key of a `data-*` attribute (`data-static-colour` →
/// `staticColour`), or `None` for any other attribute.
pub fn dataset_key(attribute: &str) -> Option<String> {
    let rest = attribute.strip_prefix("data-")?;
    let mut key = String::with_capacity(rest.len());
    let mut upper_next = false;
    for c in rest.chars() {
        if c == '-' {
            upper_next = true;
        } else if upper_next {
            key.extend(c.to_uppercase());
            upper_next = false;
        } else {
            key.push(c);
        }
    }
    Some(key)
}

/// Last path segment of a type name, used as the default class name.
pub(crate) fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
