//! Intent Classification using regex patterns.
//!
//! Maps a chat message to the kind of content the assistant should produce.
//! Rules are evaluated in table order and the first rule with a matching
//! pattern wins; no scoring, no confidence.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

use crate::models::ContentType;

/// One row of the dispatch table.
pub struct IntentRule {
    pub content_type: ContentType,
    pub pattern: Regex,
}

/// Which rule fired and on which fragment of the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleMatch {
    pub content_type: ContentType,
    pub fragment: String,
}

// Patterns are literals: a bad one panics on first use.
static INTENT_RULES: LazyLock<Vec<IntentRule>> = LazyLock::new(|| {
    vec![
        IntentRule {
            content_type: ContentType::Image,
            pattern: Regex::new(r"(?i)(картинк|изображени|нарису|фото|рисунок)")
                .expect("Invalid regex: image keywords"),
        },
        IntentRule {
            content_type: ContentType::Video,
            pattern: Regex::new(r"(?i)(видео|ролик|клип|анимаци)")
                .expect("Invalid regex: video keywords"),
        },
        IntentRule {
            content_type: ContentType::Game,
            pattern: Regex::new(r"(?i)(игр|аркад|головоломк|платформер)")
                .expect("Invalid regex: game keywords"),
        },
        IntentRule {
            content_type: ContentType::Code,
            pattern: Regex::new(r"(?i)(код|скрипт|программ|функци)")
                .expect("Invalid regex: code keywords"),
        },
    ]
});

/// Intent classifier backed by the ordered rule table.
pub struct IntentClassifier {
    rules: &'static [IntentRule],
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentClassifier {
    pub fn new() -> Self {
        Self {
            rules: INTENT_RULES.as_slice(),
        }
    }

    /// The rule table in evaluation order.
    pub fn rules(&self) -> &[IntentRule] {
        self.rules
    }

    /// Classify a message. Text that matches no rule (including empty text) is `Text`.
    pub fn classify(&self, text: &str) -> ContentType {
        self.matched_rule(text)
            .map(|m| m.content_type)
            .unwrap_or(ContentType::Text)
    }

    /// The first rule matching `text`, with the matched fragment.
    pub fn matched_rule(&self, text: &str) -> Option<RuleMatch> {
        self.rules.iter().find_map(|rule| {
            rule.pattern.find(text).map(|m| RuleMatch {
                content_type: rule.content_type,
                fragment: m.as_str().to_string(),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_order() {
        let classifier = IntentClassifier::new();
        let order: Vec<ContentType> = classifier.rules().iter().map(|r| r.content_type).collect();
        assert_eq!(
            order,
            vec![ContentType::Image, ContentType::Video, ContentType::Game, ContentType::Code]
        );
    }

    #[test]
    fn test_image_detection() {
        let classifier = IntentClassifier::new();
        assert_eq!(classifier.classify("создай картинку закат над морем"), ContentType::Image);
        assert_eq!(classifier.classify("Нарисуй кота"), ContentType::Image);
        assert_eq!(classifier.classify("ФОТО города"), ContentType::Image);
    }

    #[test]
    fn test_unknown_detection() {
        let classifier = IntentClassifier::new();
        assert_eq!(classifier.classify(""), ContentType::Text);
        assert_eq!(classifier.classify("   "), ContentType::Text);
        assert_eq!(classifier.classify("расскажи о себе"), ContentType::Text);
    }

    #[test]
    fn test_matched_fragment() {
        let classifier = IntentClassifier::new();
        let m = classifier.matched_rule("Сделай Видеоролик").unwrap();
        assert_eq!(m.content_type, ContentType::Video);
        assert_eq!(m.fragment, "Видео");
    }
}
