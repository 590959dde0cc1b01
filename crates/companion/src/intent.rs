use bubble_core::ItemKind;
use once_cell::sync::Lazy;
use regex::Regex;

pub const LABEL_EMAIL: &str = "Detected: Email / Communication";
pub const LABEL_NUMERIC_ID: &str = "Detected: Numeric Identifier";
pub const LABEL_EXTERNAL: &str = "Detected: External Resource";
pub const LABEL_CONTEXTUAL: &str = "Detected: Contextual Text";
pub const LABEL_GENERAL: &str = "Detected: General Data Stream";

/// Texts longer than this many characters count as contextual prose.
const CONTEXTUAL_MIN_CHARS: usize = 50;

static CODE_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(fn|pub fn|const|function|def|import|#include|SELECT)\s").unwrap()
});
static FORM_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[\w .-]{1,40}\s*[:=]\s*\S").unwrap());

enum Matcher {
    Contains(char),
    Pattern(Regex),
    LongerThan(usize),
}

impl Matcher {
    fn matches(&self, content: &str) -> bool {
        match self {
            Matcher::Contains(c) => content.contains(*c),
            Matcher::Pattern(re) => re.is_match(content),
            Matcher::LongerThan(n) => content.chars().count() > *n,
        }
    }
}

struct IntentRule {
    label: &'static str,
    matcher: Matcher,
}

/// Maps captured text to a short heuristic label.
///
/// Rules are checked in declaration order and the first match wins, so a
/// long text containing `@` is still an email.
pub struct IntentClassifier {
    rules: Vec<IntentRule>,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentClassifier {
    pub fn new() -> Self {
        let rules = vec![
            IntentRule {
                label: LABEL_EMAIL,
                matcher: Matcher::Contains('@'),
            },
            IntentRule {
                label: LABEL_NUMERIC_ID,
                matcher: Matcher::Pattern(Regex::new(r"[0-9]{5}").unwrap()),
            },
            IntentRule {
                label: LABEL_EXTERNAL,
                matcher: Matcher::Pattern(Regex::new(r"(?i)http").unwrap()),
            },
            IntentRule {
                label: LABEL_CONTEXTUAL,
                matcher: Matcher::LongerThan(CONTEXTUAL_MIN_CHARS),
            },
        ];

        Self { rules }
    }

    pub fn classify(&self, content: &str) -> &'static str {
        self.rules
            .iter()
            .find(|rule| rule.matcher.matches(content))
            .map(|rule| rule.label)
            .unwrap_or(LABEL_GENERAL)
    }
}

/// Decide what kind of text a capture holds.
///
/// Source-looking text is `Code`, two or more `key: value` lines are
/// `FormData`, everything else is `Text`. Images never come from text.
pub fn classify_kind(content: &str) -> ItemKind {
    let braces = content.contains('{') && content.contains('}');
    let punctuated = content.contains(['(', '{', ';', '=']);
    if (CODE_PREFIX.is_match(content) && punctuated) || (braces && content.contains(';')) {
        return ItemKind::Code;
    }

    let form_lines = content
        .lines()
        .filter(|line| FORM_LINE.is_match(line) && !line.contains("://"))
        .count();
    if form_lines >= 2 {
        return ItemKind::FormData;
    }

    ItemKind::Text
}
