// FILE: src/core/properties.rs

use super::constants::*;
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Cascade class of a CSS property. Longhands sort after the shorthands
/// that set them so the more specific declaration wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyClass {
    Custom,
    ShorthandOfShorthands,
    ShorthandOfLonghands,
    LogicalLonghand,
    PhysicalLonghand,
}

impl PropertyClass {
    pub fn from_name(name: &str) -> Self {
        if name.starts_with("--") {
            return PropertyClass::Custom;
        }

        match name {
            "all" | "animation" | "background" | "border" | "border-block" | "border-inline"
            | "font" | "grid" | "grid-template" | "inset" | "margin" | "mask" | "padding"
            | "scroll-margin" | "scroll-padding" | "text-decoration" | "text-emphasis" => {
                PropertyClass::ShorthandOfShorthands
            }

            "border-color" | "border-style" | "border-width" | "border-radius"
            | "border-image" | "border-top" | "border-right" | "border-bottom" | "border-left"
            | "border-block-start" | "border-block-end" | "border-inline-start"
            | "border-inline-end" | "border-block-color" | "border-block-style"
            | "border-block-width" | "border-inline-color" | "border-inline-style"
            | "border-inline-width" | "column-rule" | "columns" | "container"
            | "contain-intrinsic-size" | "flex" | "flex-flow" | "font-variant" | "gap"
            | "grid-area" | "grid-column" | "grid-row" | "inset-block" | "inset-inline"
            | "list-style" | "margin-block" | "margin-inline" | "offset" | "outline"
            | "overflow" | "padding-block" | "padding-inline" | "place-content"
            | "place-items" | "place-self" | "scroll-margin-block" | "scroll-margin-inline"
            | "scroll-padding-block" | "scroll-padding-inline" | "transition" => {
                PropertyClass::ShorthandOfLonghands
            }

            "width" | "height" | "min-width" | "min-height" | "max-width" | "max-height"
            | "top" | "right" | "bottom" | "left" | "margin-top" | "margin-right"
            | "margin-bottom" | "margin-left" | "padding-top" | "padding-right"
            | "padding-bottom" | "padding-left" | "border-top-width" | "border-right-width"
            | "border-bottom-width" | "border-left-width" | "border-top-style"
            | "border-right-style" | "border-bottom-style" | "border-left-style"
            | "border-top-color" | "border-right-color" | "border-bottom-color"
            | "border-left-color" | "border-top-left-radius" | "border-top-right-radius"
            | "border-bottom-right-radius" | "border-bottom-left-radius" | "overflow-x"
            | "overflow-y" | "scroll-margin-top" | "scroll-margin-right"
            | "scroll-margin-bottom" | "scroll-margin-left" | "scroll-padding-top"
            | "scroll-padding-right" | "scroll-padding-bottom" | "scroll-padding-left"
            | "contain-intrinsic-width" | "contain-intrinsic-height"
            | "background-position-x" | "background-position-y" => {
                PropertyClass::PhysicalLonghand
            }

            _ => PropertyClass::LogicalLonghand,
        }
    }

    pub fn priority(self) -> u32 {
        match self {
            PropertyClass::Custom => PRIORITY_CUSTOM_PROPERTY,
            PropertyClass::ShorthandOfShorthands => PRIORITY_SHORTHAND_OF_SHORTHANDS,
            PropertyClass::ShorthandOfLonghands => PRIORITY_SHORTHAND_OF_LONGHANDS,
            PropertyClass::LogicalLonghand => PRIORITY_LOGICAL_LONGHAND,
            PropertyClass::PhysicalLonghand => PRIORITY_PHYSICAL_LONGHAND,
        }
    }
}

/// Priority of a dashed property name before context is applied
pub fn property_priority(name: &str) -> u32 {
    PropertyClass::from_name(name).priority()
}

static KNOWN_PROPERTIES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "accent-color", "align-content", "align-items", "align-self", "all", "animation",
        "animation-composition", "animation-delay", "animation-direction",
        "animation-duration", "animation-fill-mode", "animation-iteration-count",
        "animation-name", "animation-play-state", "animation-timeline",
        "animation-timing-function", "appearance", "aspect-ratio", "backdrop-filter",
        "backface-visibility", "background", "background-attachment", "background-blend-mode",
        "background-clip", "background-color", "background-image", "background-origin",
        "background-position", "background-position-x", "background-position-y",
        "background-repeat", "background-size", "block-size", "border", "border-block",
        "border-block-color", "border-block-end", "border-block-end-color",
        "border-block-end-style", "border-block-end-width", "border-block-start",
        "border-block-start-color", "border-block-start-style", "border-block-start-width",
        "border-block-style", "border-block-width", "border-bottom", "border-bottom-color",
        "border-bottom-left-radius", "border-bottom-right-radius", "border-bottom-style",
        "border-bottom-width", "border-collapse", "border-color", "border-end-end-radius",
        "border-end-start-radius", "border-image", "border-image-outset",
        "border-image-repeat", "border-image-slice", "border-image-source",
        "border-image-width", "border-inline", "border-inline-color", "border-inline-end",
        "border-inline-end-color", "border-inline-end-style", "border-inline-end-width",
        "border-inline-start", "border-inline-start-color", "border-inline-start-style",
        "border-inline-start-width", "border-inline-style", "border-inline-width",
        "border-left", "border-left-color", "border-left-style", "border-left-width",
        "border-radius", "border-right", "border-right-color", "border-right-style",
        "border-right-width", "border-spacing", "border-start-end-radius",
        "border-start-start-radius", "border-style", "border-top", "border-top-color",
        "border-top-left-radius", "border-top-right-radius", "border-top-style",
        "border-top-width", "border-width", "bottom", "box-decoration-break", "box-shadow",
        "box-sizing", "break-after", "break-before", "break-inside", "caption-side",
        "caret-color", "clear", "clip", "clip-path", "color", "color-scheme", "column-count",
        "column-fill", "column-gap", "column-rule", "column-rule-color", "column-rule-style",
        "column-rule-width", "column-span", "column-width", "columns", "contain",
        "contain-intrinsic-block-size", "contain-intrinsic-height",
        "contain-intrinsic-inline-size", "contain-intrinsic-size", "contain-intrinsic-width",
        "container", "container-name", "container-type", "content", "content-visibility",
        "counter-increment", "counter-reset", "counter-set", "cursor", "direction",
        "display", "empty-cells", "field-sizing", "fill", "fill-opacity", "fill-rule",
        "filter", "flex", "flex-basis", "flex-direction", "flex-flow", "flex-grow",
        "flex-shrink", "flex-wrap", "float", "flood-color", "flood-opacity", "font",
        "font-family", "font-feature-settings", "font-kerning", "font-language-override",
        "font-optical-sizing", "font-palette", "font-size", "font-size-adjust",
        "font-stretch", "font-style", "font-synthesis", "font-variant",
        "font-variant-alternates", "font-variant-caps", "font-variant-east-asian",
        "font-variant-ligatures", "font-variant-numeric", "font-variant-position",
        "font-variation-settings", "font-weight", "forced-color-adjust", "gap", "grid",
        "grid-area", "grid-auto-columns", "grid-auto-flow", "grid-auto-rows", "grid-column",
        "grid-column-end", "grid-column-start", "grid-row", "grid-row-end", "grid-row-start",
        "grid-template", "grid-template-areas", "grid-template-columns",
        "grid-template-rows", "hanging-punctuation", "height", "hyphenate-character",
        "hyphens", "image-orientation", "image-rendering", "initial-letter", "inline-size",
        "inset", "inset-block", "inset-block-end", "inset-block-start", "inset-inline",
        "inset-inline-end", "inset-inline-start", "isolation", "justify-content",
        "justify-items", "justify-self", "left", "letter-spacing", "line-break",
        "line-clamp", "line-height", "list-style", "list-style-image",
        "list-style-position", "list-style-type", "margin", "margin-block",
        "margin-block-end", "margin-block-start", "margin-bottom", "margin-inline",
        "margin-inline-end", "margin-inline-start", "margin-left", "margin-right",
        "margin-top", "mask", "mask-border", "mask-clip", "mask-composite", "mask-image",
        "mask-mode", "mask-origin", "mask-position", "mask-repeat", "mask-size", "mask-type",
        "math-depth", "math-style", "max-block-size", "max-height", "max-inline-size",
        "max-width", "min-block-size", "min-height", "min-inline-size", "min-width",
        "mix-blend-mode", "object-fit", "object-position", "offset", "offset-anchor",
        "offset-distance", "offset-path", "offset-position", "offset-rotate", "opacity",
        "order", "orphans", "outline", "outline-color", "outline-offset", "outline-style",
        "outline-width", "overflow", "overflow-anchor", "overflow-block", "overflow-clip-margin",
        "overflow-inline", "overflow-wrap", "overflow-x", "overflow-y", "overscroll-behavior",
        "overscroll-behavior-block", "overscroll-behavior-inline", "overscroll-behavior-x",
        "overscroll-behavior-y", "padding", "padding-block", "padding-block-end",
        "padding-block-start", "padding-bottom", "padding-inline", "padding-inline-end",
        "padding-inline-start", "padding-left", "padding-right", "padding-top", "page",
        "page-break-after", "page-break-before", "page-break-inside", "paint-order",
        "perspective", "perspective-origin", "place-content", "place-items", "place-self",
        "pointer-events", "position", "print-color-adjust", "quotes", "resize", "right",
        "rotate", "row-gap", "ruby-align", "ruby-position", "scale", "scroll-behavior",
        "scroll-margin", "scroll-margin-block", "scroll-margin-block-end",
        "scroll-margin-block-start", "scroll-margin-bottom", "scroll-margin-inline",
        "scroll-margin-inline-end", "scroll-margin-inline-start", "scroll-margin-left",
        "scroll-margin-right", "scroll-margin-top", "scroll-padding", "scroll-padding-block",
        "scroll-padding-block-end", "scroll-padding-block-start", "scroll-padding-bottom",
        "scroll-padding-inline", "scroll-padding-inline-end", "scroll-padding-inline-start",
        "scroll-padding-left", "scroll-padding-right", "scroll-padding-top",
        "scroll-snap-align", "scroll-snap-stop", "scroll-snap-type", "scrollbar-color",
        "scrollbar-gutter", "scrollbar-width", "shape-image-threshold", "shape-margin",
        "shape-outside", "speak", "stop-color", "stop-opacity", "stroke", "stroke-dasharray",
        "stroke-dashoffset", "stroke-linecap", "stroke-linejoin", "stroke-miterlimit",
        "stroke-opacity", "stroke-width", "tab-size", "table-layout", "text-align",
        "text-align-last", "text-combine-upright", "text-decoration", "text-decoration-color",
        "text-decoration-line", "text-decoration-skip-ink", "text-decoration-style",
        "text-decoration-thickness", "text-emphasis", "text-emphasis-color",
        "text-emphasis-position", "text-emphasis-style", "text-indent", "text-justify",
        "text-orientation", "text-overflow", "text-rendering", "text-shadow",
        "text-size-adjust", "text-transform", "text-underline-offset",
        "text-underline-position", "text-wrap", "top", "touch-action", "transform",
        "transform-box", "transform-origin", "transform-style", "transition",
        "transition-behavior", "transition-delay", "transition-duration",
        "transition-property", "transition-timing-function", "translate", "unicode-bidi",
        "user-select", "vertical-align", "view-transition-name", "visibility",
        "white-space", "white-space-collapse", "widows", "width", "will-change",
        "word-break", "word-spacing", "word-wrap", "writing-mode", "z-index", "zoom",
    ]
    .into_iter()
    .collect()
});

/// Whether a dashed property name is recognized. Custom properties and
/// vendor-prefixed names always are.
pub fn is_known_property(name: &str) -> bool {
    name.starts_with("--") || name.starts_with('-') || KNOWN_PROPERTIES.contains(name)
}

/// Legacy logical shorthands authors may still write. Targets are already
/// logical, so they are never mirrored.
pub fn legacy_alias(name: &str) -> Option<&'static str> {
    let target = match name {
        "start" => "inset-inline-start",
        "end" => "inset-inline-end",
        "margin-start" => "margin-inline-start",
        "margin-end" => "margin-inline-end",
        "margin-horizontal" => "margin-inline",
        "margin-vertical" => "margin-block",
        "padding-start" => "padding-inline-start",
        "padding-end" => "padding-inline-end",
        "padding-horizontal" => "padding-inline",
        "padding-vertical" => "padding-block",
        "border-start" => "border-inline-start",
        "border-end" => "border-inline-end",
        "border-start-width" => "border-inline-start-width",
        "border-end-width" => "border-inline-end-width",
        "border-start-style" => "border-inline-start-style",
        "border-end-style" => "border-inline-end-style",
        "border-start-color" => "border-inline-start-color",
        "border-end-color" => "border-inline-end-color",
        "border-horizontal" => "border-inline",
        "border-vertical" => "border-block",
        "border-top-start-radius" => "border-start-start-radius",
        "border-top-end-radius" => "border-start-end-radius",
        "border-bottom-start-radius" => "border-end-start-radius",
        "border-bottom-end-radius" => "border-end-end-radius",
        _ => return None,
    };
    Some(target)
}

/// Logical equivalent of a physical, direction-dependent property
pub fn logical_property(name: &str) -> Option<&'static str> {
    let target = match name {
        "left" => "inset-inline-start",
        "right" => "inset-inline-end",
        "margin-left" => "margin-inline-start",
        "margin-right" => "margin-inline-end",
        "padding-left" => "padding-inline-start",
        "padding-right" => "padding-inline-end",
        "border-left" => "border-inline-start",
        "border-right" => "border-inline-end",
        "border-left-width" => "border-inline-start-width",
        "border-right-width" => "border-inline-end-width",
        "border-left-style" => "border-inline-start-style",
        "border-right-style" => "border-inline-end-style",
        "border-left-color" => "border-inline-start-color",
        "border-right-color" => "border-inline-end-color",
        "scroll-margin-left" => "scroll-margin-inline-start",
        "scroll-margin-right" => "scroll-margin-inline-end",
        "scroll-padding-left" => "scroll-padding-inline-start",
        "scroll-padding-right" => "scroll-padding-inline-end",
        "border-top-left-radius" => "border-start-start-radius",
        "border-top-right-radius" => "border-start-end-radius",
        "border-bottom-left-radius" => "border-end-start-radius",
        "border-bottom-right-radius" => "border-end-end-radius",
        _ => return None,
    };
    Some(target)
}

/// Logical keyword for direction-dependent keyword values
pub fn logical_value(name: &str, value: &str) -> Option<&'static str> {
    match (name, value) {
        ("text-align", "left") => Some("start"),
        ("text-align", "right") => Some("end"),
        ("float" | "clear", "left") => Some("inline-start"),
        ("float" | "clear", "right") => Some("inline-end"),
        _ => None,
    }
}

/// Property name in the opposite writing direction
pub fn mirror_property(name: &str) -> String {
    // Corner radii: border-{block}-{inline}-radius flips the inline half
    if let Some(rest) = name.strip_prefix("border-") {
        if let Some(corner) = rest.strip_suffix("-radius") {
            if let Some((block, inline)) = corner.split_once('-') {
                let flipped = match inline {
                    "start" => "end",
                    "end" => "start",
                    _ => return name.to_string(),
                };
                return format!("border-{}-{}-radius", block, flipped);
            }
        }
    }

    if name.contains("inline-start") {
        name.replacen("inline-start", "inline-end", 1)
    } else if name.contains("inline-end") {
        name.replacen("inline-end", "inline-start", 1)
    } else {
        name.to_string()
    }
}

/// Keyword value in the opposite writing direction
pub fn mirror_value(name: &str, value: &str) -> String {
    match (name, value) {
        ("text-align", "start") => "end".to_string(),
        ("text-align", "end") => "start".to_string(),
        ("float" | "clear", "inline-start") => "inline-end".to_string(),
        ("float" | "clear", "inline-end") => "inline-start".to_string(),
        _ => value.to_string(),
    }
}

/// How a shorthand distributes its tokens over longhands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shorthand {
    /// 1-4 values, clockwise from the top (or top-left corner)
    Box([&'static str; 4]),
    /// 1-2 values, start then end (or row then column)
    Axis([&'static str; 2]),
}

impl Shorthand {
    pub fn max_tokens(&self) -> usize {
        match self {
            Shorthand::Box(_) => 4,
            Shorthand::Axis(_) => 2,
        }
    }

    /// Assign tokens to longhands, or `None` when the token count does not fit
    pub fn distribute<'a>(&self, tokens: &'a [String]) -> Option<Vec<(&'static str, &'a str)>> {
        match self {
            Shorthand::Box(longhands) => {
                let picks: [usize; 4] = match tokens.len() {
                    1 => [0, 0, 0, 0],
                    2 => [0, 1, 0, 1],
                    3 => [0, 1, 2, 1],
                    4 => [0, 1, 2, 3],
                    _ => return None,
                };
                Some(
                    longhands
                        .iter()
                        .zip(picks)
                        .map(|(longhand, i)| (*longhand, tokens[i].as_str()))
                        .collect(),
                )
            }
            Shorthand::Axis(longhands) => {
                let picks: [usize; 2] = match tokens.len() {
                    1 => [0, 0],
                    2 => [0, 1],
                    _ => return None,
                };
                Some(
                    longhands
                        .iter()
                        .zip(picks)
                        .map(|(longhand, i)| (*longhand, tokens[i].as_str()))
                        .collect(),
                )
            }
        }
    }
}

/// Expansion table for shorthands split into atomic longhands
pub fn shorthand(name: &str) -> Option<Shorthand> {
    let expansion = match name {
        "margin" => Shorthand::Box(["margin-top", "margin-right", "margin-bottom", "margin-left"]),
        "padding" => Shorthand::Box([
            "padding-top",
            "padding-right",
            "padding-bottom",
            "padding-left",
        ]),
        "inset" => Shorthand::Box(["top", "right", "bottom", "left"]),
        "border-width" => Shorthand::Box([
            "border-top-width",
            "border-right-width",
            "border-bottom-width",
            "border-left-width",
        ]),
        "border-style" => Shorthand::Box([
            "border-top-style",
            "border-right-style",
            "border-bottom-style",
            "border-left-style",
        ]),
        "border-color" => Shorthand::Box([
            "border-top-color",
            "border-right-color",
            "border-bottom-color",
            "border-left-color",
        ]),
        "border-radius" => Shorthand::Box([
            "border-top-left-radius",
            "border-top-right-radius",
            "border-bottom-right-radius",
            "border-bottom-left-radius",
        ]),
        "margin-inline" => Shorthand::Axis(["margin-inline-start", "margin-inline-end"]),
        "margin-block" => Shorthand::Axis(["margin-block-start", "margin-block-end"]),
        "padding-inline" => Shorthand::Axis(["padding-inline-start", "padding-inline-end"]),
        "padding-block" => Shorthand::Axis(["padding-block-start", "padding-block-end"]),
        "inset-inline" => Shorthand::Axis(["inset-inline-start", "inset-inline-end"]),
        "inset-block" => Shorthand::Axis(["inset-block-start", "inset-block-end"]),
        "gap" => Shorthand::Axis(["row-gap", "column-gap"]),
        "overflow" => Shorthand::Axis(["overflow-x", "overflow-y"]),
        _ => return None,
    };
    Some(expansion)
}

/// Suffix appended to bare numbers for a property
pub fn number_suffix(name: &str) -> &'static str {
    if name.starts_with("--") || UNITLESS_NUMBER_PROPERTIES.contains(&name) {
        ""
    } else if TIME_PROPERTIES.contains(&name) {
        TIME_UNIT
    } else {
        DEFAULT_LENGTH_UNIT
    }
}

/// Priority contributed by one pseudo-class segment
pub fn pseudo_class_priority(pseudo: &str) -> u32 {
    let name = match pseudo.find('(') {
        Some(paren) => &pseudo[..paren],
        None => pseudo,
    };
    PSEUDO_CLASS_PRIORITIES
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, priority)| *priority)
        .unwrap_or(PRIORITY_PSEUDO_CLASS_DEFAULT)
}
