// FILE: src/core/util.rs

/// Check if a string is a valid identifier (dynamic parameter names)
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let first = match chars.next() {
        Some(c) => c,
        None => return false,
    };

    if !first.is_ascii_alphabetic() && first != '_' && first != '$' {
        return false;
    }

    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Check that a class name prefix keeps generated names valid CSS identifiers
pub fn is_valid_class_prefix(prefix: &str) -> bool {
    let mut chars = prefix.chars();
    let first = match chars.next() {
        Some(c) => c,
        None => return false,
    };

    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Format a number the way JavaScript stringifies it after rounding to
/// four decimals: `5` not `5.0`, `0.25` stays `0.25`.
pub fn format_number(value: f64) -> String {
    let rounded = (value * 10000.0).round() / 10000.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    if rounded.fract() == 0.0 && rounded.abs() < 1e15 {
        format!("{}", rounded as i64)
    } else {
        format!("{}", rounded)
    }
}

/// Convert a camelCase style key to its CSS property name
pub fn dashify(key: &str) -> String {
    if key.starts_with("--") {
        return key.to_string();
    }

    let mut out = String::with_capacity(key.len() + 4);
    // Vendor prefixes: WebkitX -> -webkit-x, msX -> -ms-x
    let starts_upper = key.chars().next().map_or(false, |c| c.is_ascii_uppercase());
    let ms_prefixed =
        key.starts_with("ms") && key[2..].starts_with(|c: char| c.is_ascii_uppercase());
    if starts_upper || ms_prefixed {
        out.push('-');
    }

    for (i, c) in key.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Split a CSS value on top-level whitespace, keeping function arguments
/// and quoted strings together.
pub fn split_top_level(value: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for c in value.chars() {
        match quote {
            Some(q) => {
                current.push(c);
                if c == q {
                    quote = None;
                }
            }
            None => match c {
                '"' | '\'' => {
                    quote = Some(c);
                    current.push(c);
                }
                '(' => {
                    depth += 1;
                    current.push(c);
                }
                ')' => {
                    depth = depth.saturating_sub(1);
                    current.push(c);
                }
                c if c.is_whitespace() && depth == 0 => {
                    if !current.is_empty() {
                        tokens.push(std::mem::take(&mut current));
                    }
                }
                _ => current.push(c),
            },
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Drop the leading zero of a decimal number token: `0.5` -> `.5`
pub fn strip_leading_zero(token: &str) -> String {
    if let Some(rest) = token.strip_prefix("0.") {
        format!(".{}", rest)
    } else if let Some(rest) = token.strip_prefix("-0.") {
        format!("-.{}", rest)
    } else {
        token.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(5.0), "5");
        assert_eq!(format_number(0.25), "0.25");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(1.000049), "1");
        assert_eq!(format_number(1.23456), "1.2346");
        assert_eq!(format_number(-0.0), "0");
    }

    #[test]
    fn test_dashify() {
        let cases = vec![
            ("color", "color"),
            ("backgroundColor", "background-color"),
            ("borderTopLeftRadius", "border-top-left-radius"),
            ("WebkitAppearance", "-webkit-appearance"),
            ("msTransform", "-ms-transform"),
            ("--customProp", "--customProp"),
            ("margin-top", "margin-top"),
        ];
        for (input, expected) in cases {
            assert_eq!(dashify(input), expected, "Failed for input: '{}'", input);
        }
    }

    #[test]
    fn test_split_top_level() {
        assert_eq!(split_top_level("10px 20px"), vec!["10px", "20px"]);
        assert_eq!(
            split_top_level("  calc(100% - 10px)   var(--x)"),
            vec!["calc(100% - 10px)", "var(--x)"]
        );
        assert_eq!(split_top_level("\"a b\" c"), vec!["\"a b\"", "c"]);
        assert!(split_top_level("   ").is_empty());
    }

    #[test]
    fn test_identifiers() {
        assert!(is_valid_identifier("width"));
        assert!(is_valid_identifier("_size2"));
        assert!(!is_valid_identifier("2size"));
        assert!(!is_valid_identifier(""));

        assert!(is_valid_class_prefix("x"));
        assert!(is_valid_class_prefix("app-"));
        assert!(!is_valid_class_prefix("1x"));
        assert!(!is_valid_class_prefix(""));
    }

    #[test]
    fn test_strip_leading_zero() {
        assert_eq!(strip_leading_zero("0.5"), ".5");
        assert_eq!(strip_leading_zero("-0.25em"), "-.25em");
        assert_eq!(strip_leading_zero("10.5"), "10.5");
    }
}
