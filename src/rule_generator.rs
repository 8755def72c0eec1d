//! CSS rule text for atomic declarations

use crate::classifier;
use crate::hasher;
use crate::normalizer::Declaration;
use crate::types::{CompiledRule, ContextPath, CssPair};

/// `.cls` repeated once per at-rule, then the pseudo-classes and finally
/// the pseudo-element.
///
/// Contexts render in the same canonical order the class name hashes them
/// in, so one class name never maps to two rule bodies.
pub fn selector(class_name: &str, context: &ContextPath) -> String {
    let repeats = 1 + context.at_rules().len();
    let mut selector = format!(".{}", class_name).repeat(repeats);
    for pseudo in canonical_pseudos(context) {
        selector.push_str(pseudo);
    }
    selector
}

fn canonical_pseudos(context: &ContextPath) -> Vec<&str> {
    let (mut elements, mut classes): (Vec<&str>, Vec<&str>) = context
        .pseudos()
        .into_iter()
        .partition(|pseudo| pseudo.starts_with("::"));
    classes.sort_unstable();
    elements.sort_unstable();
    classes.extend(elements);
    classes
}

/// Sorted at-rules, the first one outermost
fn wrap(rule: String, context: &ContextPath) -> String {
    let mut at_rules = context.at_rules();
    at_rules.sort_unstable();
    at_rules
        .iter()
        .rev()
        .fold(rule, |inner, at_rule| format!("{}{{{}}}", at_rule, inner))
}

fn rule_text(class_name: &str, declaration: &Declaration, context: &ContextPath) -> String {
    let rule = format!(
        "{}{{{}}}",
        selector(class_name, context),
        declaration.to_css()
    );
    wrap(rule, context)
}

pub fn generate(class_name: &str, declaration: &Declaration, context: &ContextPath) -> CssPair {
    CssPair {
        ltr: rule_text(class_name, declaration, context),
        rtl: declaration
            .mirrored()
            .map(|mirrored| rule_text(class_name, &mirrored, context)),
    }
}

/// Hash, render and prioritize one declaration
pub fn compile_rule(prefix: &str, declaration: &Declaration, context: &ContextPath) -> CompiledRule {
    let class_name = hasher::class_name(
        prefix,
        &declaration.property,
        &declaration.value_text(),
        context,
        declaration.direction_sensitive,
    );
    let css = generate(&class_name, declaration, context);
    let priority = classifier::priority(&declaration.property, context);
    log::trace!("{} -> {} ({})", declaration.to_css(), class_name, priority);

    CompiledRule {
        class_name,
        css,
        priority,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ContextSegment;

    fn context(segments: &[&str]) -> ContextPath {
        ContextPath::from_segments(
            segments
                .iter()
                .map(|s| {
                    if s.starts_with('@') {
                        ContextSegment::AtRule(s.to_string())
                    } else {
                        ContextSegment::Pseudo(s.to_string())
                    }
                })
                .collect(),
        )
    }

    #[test]
    fn test_plain_rule() {
        let rule = compile_rule("x", &Declaration::new("color", "red"), &ContextPath::new());
        assert_eq!(rule.class_name, "x1e2nbdu");
        assert_eq!(rule.css.ltr, ".x1e2nbdu{color:red}");
        assert_eq!(rule.css.rtl, None);
        assert_eq!(rule.priority, 3000);
    }

    #[test]
    fn test_at_rule_wrapping() {
        let rule = compile_rule(
            "x",
            &Declaration::new("inset-inline-end", "5px"),
            &context(&["@media (min-width: 1000px)"]),
        );
        assert_eq!(rule.class_name, "x1uy60zq");
        assert_eq!(
            rule.css.ltr,
            "@media (min-width: 1000px){.x1uy60zq.x1uy60zq{inset-inline-end:5px}}"
        );
        assert_eq!(rule.priority, 3200);
    }

    #[test]
    fn test_nested_contexts() {
        let ctx = context(&["@supports (display: grid)", ":hover", "@media print", "::after"]);
        let css = generate("xabc", &Declaration::new("color", "red"), &ctx);
        assert_eq!(
            css.ltr,
            "@media print{@supports (display: grid){.xabc.xabc.xabc:hover::after{color:red}}}"
        );
    }

    #[test]
    fn test_nesting_order_renders_identically() {
        let declaration = Declaration::new("color", "red");
        let pairs = [
            (context(&[":hover", ":focus"]), context(&[":focus", ":hover"])),
            (
                context(&["@media print", "@supports (display: grid)"]),
                context(&["@supports (display: grid)", "@media print"]),
            ),
            (
                context(&["::before", ":hover", "@media print"]),
                context(&["@media print", ":hover", "::before"]),
            ),
        ];
        for (a, b) in &pairs {
            let rule_a = compile_rule("x", &declaration, a);
            let rule_b = compile_rule("x", &declaration, b);
            assert_eq!(rule_a, rule_b);
        }

        let rule = compile_rule("x", &declaration, &pairs[0].1);
        assert!(rule.css.ltr.ends_with(":focus:hover{color:red}"));
        let rule = compile_rule("x", &declaration, &pairs[2].1);
        assert!(rule.css.ltr.contains(":hover::before{color:red}"));
    }

    #[test]
    fn test_mirrored_rule() {
        let declaration = Declaration {
            property: "margin-inline-start".to_string(),
            values: vec!["4px".to_string()],
            direction_sensitive: true,
        };
        let css = generate("xm", &declaration, &context(&[":hover"]));
        assert_eq!(css.ltr, ".xm:hover{margin-inline-start:4px}");
        assert_eq!(css.rtl.as_deref(), Some(".xm:hover{margin-inline-end:4px}"));
    }

    #[test]
    fn test_fallback_declarations() {
        let declaration = Declaration {
            property: "position".to_string(),
            values: vec!["fixed".to_string(), "sticky".to_string()],
            direction_sensitive: false,
        };
        let css = generate("xp", &declaration, &ContextPath::new());
        assert_eq!(css.ltr, ".xp{position:fixed;position:sticky}");
    }
}
