//! Content-addressed class names

use crate::core::constants::*;
use crate::types::ContextPath;
use radix_fmt::radix;

/// murmur2 (seed 1) rendered in base 36
pub fn create_hash(value: &str) -> String {
    radix(murmur2::murmur2(value.as_bytes(), HASH_SEED), 36).to_string()
}

/// Context component of the hash input. Segments are sorted so nesting
/// order never changes the class name.
pub fn modifiers(context: &ContextPath) -> String {
    if context.is_empty() {
        return EMPTY_MODIFIER.to_string();
    }
    let mut pseudos = context.pseudos();
    pseudos.sort_unstable();
    let mut at_rules = context.at_rules();
    at_rules.sort_unstable();

    let mut out = pseudos.concat();
    out.push_str(&at_rules.concat());
    out
}

/// Class name for one declaration in one context
pub fn class_name(
    prefix: &str,
    property: &str,
    value_text: &str,
    context: &ContextPath,
    direction_sensitive: bool,
) -> String {
    let mut input = format!(
        "{}{}{}{}",
        HASH_INPUT_PREFIX,
        property,
        value_text,
        modifiers(context)
    );
    if direction_sensitive {
        input.push_str(MIRROR_MARKER);
    }
    format!("{}{}", prefix, create_hash(&input))
}

/// Animation name derived from the base-direction keyframes body
pub fn keyframes_name(prefix: &str, ltr_body: &str) -> String {
    format!(
        "{}{}{}",
        prefix,
        create_hash(&format!("{}{}", HASH_INPUT_PREFIX, ltr_body)),
        KEYFRAMES_SUFFIX
    )
}

/// CSS variable carrying a dynamic value. Nested contexts get their own
/// variable so two bindings of one property never share state.
pub fn dynamic_variable(property: &str, context: &ContextPath) -> String {
    let base = property.trim_start_matches('-');
    if context.is_empty() {
        format!("--{}", base)
    } else {
        format!("--{}-{}", base, create_hash(&modifiers(context)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ContextSegment;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn pseudo(p: &str) -> ContextSegment {
        ContextSegment::Pseudo(p.to_string())
    }

    fn media(m: &str) -> ContextSegment {
        ContextSegment::AtRule(m.to_string())
    }

    #[test]
    fn test_observed_class_names() {
        let empty = ContextPath::new();
        assert_eq!(class_name("x", "color", "red", &empty, false), "x1e2nbdu");
        assert_eq!(class_name("x", "height", "5px", &empty, false), "x1ycjhwn");
        assert_eq!(
            class_name("x", "background-color", "red", &empty, false),
            "xrkmrrc"
        );
        assert_eq!(
            class_name(
                "x",
                "inset-inline-start",
                "10px",
                &ContextPath::from_segments(vec![pseudo(":hover")]),
                false
            ),
            "xaiupp8"
        );
        assert_eq!(
            class_name(
                "x",
                "inset-inline-end",
                "5px",
                &ContextPath::from_segments(vec![media("@media (min-width: 1000px)")]),
                false
            ),
            "x1uy60zq"
        );
    }

    #[test]
    fn test_keyframes_name() {
        let body = "from{inset-inline-start:0px;}to{inset-inline-start:100px;}";
        assert_eq!(keyframes_name("x", body), "x1g85oeb-B");
    }

    #[test]
    fn test_context_order_does_not_change_hash() {
        let a = ContextPath::from_segments(vec![media("@media print"), pseudo(":hover")]);
        let b = ContextPath::from_segments(vec![pseudo(":hover"), media("@media print")]);
        assert_eq!(modifiers(&a), ":hover@media print");
        assert_eq!(
            class_name("x", "color", "red", &a, false),
            class_name("x", "color", "red", &b, false)
        );
    }

    #[test]
    fn test_direction_marker_and_prefix() {
        let empty = ContextPath::new();
        let plain = class_name("x", "inset-inline-start", "10px", &empty, false);
        let mirrored = class_name("x", "inset-inline-start", "10px", &empty, true);
        assert_ne!(plain, mirrored);

        let prefixed = class_name("app-", "color", "red", &empty, false);
        assert_eq!(prefixed, "app-1e2nbdu");
    }

    #[test]
    fn test_dynamic_variable() {
        assert_eq!(dynamic_variable("width", &ContextPath::new()), "--width");
        let hover = ContextPath::from_segments(vec![pseudo(":hover")]);
        let name = dynamic_variable("width", &hover);
        assert!(name.starts_with("--width-"));
        assert_ne!(name, "--width");
    }

    const PROPERTIES: &[&str] = &[
        "color",
        "height",
        "width",
        "margin-top",
        "inset-inline-start",
        "opacity",
        "background-color",
    ];

    const CONTEXTS: &[&str] = &["", ":hover", ":focus", "::before", "@media print"];

    fn context_of(key: &str) -> ContextPath {
        match key {
            "" => ContextPath::new(),
            k if k.starts_with('@') => ContextPath::from_segments(vec![media(k)]),
            k => ContextPath::from_segments(vec![pseudo(k)]),
        }
    }

    proptest! {
        #[test]
        fn prop_distinct_triples_get_distinct_names(
            triples in proptest::collection::hash_set(
                (0..PROPERTIES.len(), 0u32..500, 0..CONTEXTS.len()),
                1..40,
            )
        ) {
            let mut names = HashSet::new();
            for (property, value, context) in &triples {
                let name = class_name(
                    "x",
                    PROPERTIES[*property],
                    &format!("{}px", value),
                    &context_of(CONTEXTS[*context]),
                    false,
                );
                prop_assert!(names.insert(name));
            }
        }

        #[test]
        fn prop_hash_is_deterministic(property in "[a-z-]{1,20}", value in "[a-z0-9]{1,10}") {
            let empty = ContextPath::new();
            prop_assert_eq!(
                class_name("x", &property, &value, &empty, false),
                class_name("x", &property, &value, &empty, false)
            );
        }
    }
}
