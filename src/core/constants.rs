// FILE: src/core/constants.rs

// Class name generation
pub const DEFAULT_CLASS_NAME_PREFIX: &str = "x";
pub const HASH_SEED: u32 = 1;
pub const HASH_INPUT_PREFIX: &str = "<>";
pub const EMPTY_MODIFIER: &str = "null";
pub const MIRROR_MARKER: &str = "~mirror";
pub const KEYFRAMES_SUFFIX: &str = "-B";

// Dynamic values
pub const DEFAULT_DYNAMIC_NULL_FALLBACK: &str = "initial";
pub const DYNAMIC_VARIABLE_FALLBACK: &str = "revert";

// Property priorities
pub const PRIORITY_KEYFRAMES: u32 = 1;
pub const PRIORITY_CUSTOM_PROPERTY: u32 = 1;
pub const PRIORITY_SHORTHAND_OF_SHORTHANDS: u32 = 1000;
pub const PRIORITY_SHORTHAND_OF_LONGHANDS: u32 = 2000;
pub const PRIORITY_LOGICAL_LONGHAND: u32 = 3000;
pub const PRIORITY_PHYSICAL_LONGHAND: u32 = 4000;

// Context priorities, added once per segment
pub const PRIORITY_AT_RULE: u32 = 200;
pub const PRIORITY_PSEUDO_ELEMENT: u32 = 5000;
pub const PRIORITY_PSEUDO_CLASS_DEFAULT: u32 = 40;

/// Pseudo-class priorities (rank x 10). Ordered so later entries win
/// within a single property.
pub const PSEUDO_CLASS_PRIORITIES: &[(&str, u32)] = &[
    (":is", 40),
    (":where", 40),
    (":not", 40),
    (":has", 45),
    (":dir", 50),
    (":lang", 51),
    (":first-child", 52),
    (":first-of-type", 53),
    (":last-child", 54),
    (":last-of-type", 55),
    (":only-child", 56),
    (":only-of-type", 57),
    (":nth-child", 60),
    (":nth-last-child", 61),
    (":nth-of-type", 62),
    (":nth-last-of-type", 63),
    (":empty", 70),
    (":link", 80),
    (":any-link", 81),
    (":local-link", 82),
    (":target-within", 83),
    (":target", 84),
    (":visited", 85),
    (":enabled", 91),
    (":disabled", 92),
    (":required", 93),
    (":optional", 94),
    (":read-only", 95),
    (":read-write", 96),
    (":placeholder-shown", 97),
    (":in-range", 98),
    (":out-of-range", 99),
    (":default", 100),
    (":checked", 101),
    (":indeterminate", 101),
    (":blank", 102),
    (":valid", 103),
    (":invalid", 104),
    (":user-invalid", 105),
    (":autofill", 110),
    (":picture-in-picture", 120),
    (":modal", 121),
    (":fullscreen", 122),
    (":paused", 123),
    (":playing", 124),
    (":current", 125),
    (":past", 126),
    (":future", 127),
    (":hover", 130),
    (":focus-within", 140),
    (":focus", 150),
    (":focus-visible", 160),
    (":active", 170),
];

// At-rules allowed to scope styles
pub const SUPPORTED_AT_RULES: &[&str] = &["@media", "@supports", "@container"];

/// Properties whose numeric values stay unitless
pub const UNITLESS_NUMBER_PROPERTIES: &[&str] = &[
    "animation-iteration-count",
    "aspect-ratio",
    "border-image-outset",
    "border-image-slice",
    "border-image-width",
    "box-flex",
    "box-flex-group",
    "box-ordinal-group",
    "column-count",
    "columns",
    "fill-opacity",
    "flex",
    "flex-grow",
    "flex-negative",
    "flex-order",
    "flex-positive",
    "flex-shrink",
    "flood-opacity",
    "font-size-adjust",
    "font-weight",
    "grid-area",
    "grid-column",
    "grid-column-end",
    "grid-column-start",
    "grid-row",
    "grid-row-end",
    "grid-row-start",
    "initial-letter",
    "line-clamp",
    "line-height",
    "math-depth",
    "opacity",
    "order",
    "orphans",
    "scale",
    "stop-opacity",
    "stroke-dasharray",
    "stroke-dashoffset",
    "stroke-miterlimit",
    "stroke-opacity",
    "stroke-width",
    "tab-size",
    "widows",
    "z-index",
    "zoom",
];

/// Properties whose numeric values are milliseconds
pub const TIME_PROPERTIES: &[&str] = &[
    "animation-delay",
    "animation-duration",
    "transition-delay",
    "transition-duration",
];

pub const DEFAULT_LENGTH_UNIT: &str = "px";
pub const TIME_UNIT: &str = "ms";

/// Units recognized when validating numeric tokens
pub const KNOWN_UNITS: &[&str] = &[
    "%", "px", "em", "rem", "ex", "ch", "cap", "ic", "lh", "rlh", "vh", "vw", "vi", "vb",
    "vmin", "vmax", "dvh", "dvw", "dvi", "dvb", "dvmin", "dvmax", "svh", "svw", "svi", "svb",
    "svmin", "svmax", "lvh", "lvw", "lvi", "lvb", "lvmin", "lvmax", "cqw", "cqh", "cqi", "cqb",
    "cqmin", "cqmax", "cm", "mm", "q", "in", "pt", "pc", "fr", "deg", "grad", "rad", "turn",
    "s", "ms", "hz", "khz", "dpi", "dpcm", "dppx", "x",
];

pub const ANGLE_UNITS: &[&str] = &["deg", "grad", "rad", "turn"];
pub const TIME_UNITS: &[&str] = &["s", "ms"];

// Keyframes
pub const KEYFRAME_KEYWORDS: &[&str] = &["from", "to"];

// Compiler limits
pub const MAX_CONTEXT_DEPTH: usize = 8;
