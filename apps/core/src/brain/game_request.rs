//! Game Request Analysis.
//!
//! Turns a game request into a template choice plus a resolved options record.
//!
//! Two ordered tables drive it:
//! - `TEMPLATE_RULES`: first matching rule picks the template, arcade otherwise.
//! - `OPTION_GROUPS`: applied in order on top of the template defaults. Inside a
//!   group the first matching rule wins; a later group overwrites fields set by
//!   an earlier one. No rule reads a field another rule has written.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

use crate::templates::{Difficulty, GameOptions, GameTemplate, GridSize};

/// Keyword predicate over the lowercased request.
#[derive(Debug, Clone, Copy)]
pub enum Trigger {
    /// Any keyword is a substring.
    AnyOf(&'static [&'static str]),
    /// Every group contributes at least one substring.
    AllOf(&'static [&'static [&'static str]]),
}

impl Trigger {
    pub fn matches(&self, lower: &str) -> bool {
        match self {
            Trigger::AnyOf(words) => words.iter().any(|w| lower.contains(w)),
            Trigger::AllOf(groups) => groups
                .iter()
                .all(|words| words.iter().any(|w| lower.contains(w))),
        }
    }
}

pub struct TemplateRule {
    pub template: GameTemplate,
    pub trigger: Trigger,
}

/// Rewrites option fields. Receives the original-case text and reports whether it applied.
type Apply = fn(&mut GameOptions, &str) -> bool;

pub struct OptionRule {
    pub label: &'static str,
    pub trigger: Trigger,
    apply: Apply,
}

pub struct OptionGroup {
    pub label: &'static str,
    /// Restricts the group to one template.
    pub only: Option<GameTemplate>,
    pub rules: &'static [OptionRule],
}

pub static TEMPLATE_RULES: &[TemplateRule] = &[
    TemplateRule {
        template: GameTemplate::Puzzle,
        trigger: Trigger::AnyOf(&["головолом", "пазл", "puzzle"]),
    },
    TemplateRule {
        template: GameTemplate::Platformer,
        trigger: Trigger::AnyOf(&["платформер", "прыг", "run", "бег"]),
    },
];

const DARK_BACKGROUND: &str = "#1A1F2C";
const LIGHT_BACKGROUND: &str = "#f3f4f6";
const LIGHT_SECONDARY: &str = "#9b87f5";

pub static OPTION_GROUPS: &[OptionGroup] = &[
    OptionGroup {
        label: "name",
        only: None,
        rules: &[OptionRule {
            label: "name",
            trigger: Trigger::AnyOf(&["назв"]),
            apply: apply_name,
        }],
    },
    OptionGroup {
        label: "difficulty",
        only: None,
        rules: &[
            OptionRule {
                label: "easy",
                trigger: Trigger::AnyOf(&["лёгк", "легк", "прост"]),
                apply: |o, _| {
                    o.difficulty = Difficulty::Easy;
                    true
                },
            },
            OptionRule {
                label: "hard",
                trigger: Trigger::AnyOf(&["сложн", "труд"]),
                apply: |o, _| {
                    o.difficulty = Difficulty::Hard;
                    true
                },
            },
        ],
    },
    OptionGroup {
        label: "player_color",
        only: None,
        rules: &[
            OptionRule {
                label: "red",
                trigger: Trigger::AnyOf(&["красн"]),
                apply: |o, _| set_primary(o, "#ff6b6b"),
            },
            OptionRule {
                label: "blue",
                trigger: Trigger::AnyOf(&["син"]),
                apply: |o, _| set_primary(o, "#0ea5e9"),
            },
            OptionRule {
                label: "green",
                trigger: Trigger::AnyOf(&["зелён", "зелен"]),
                apply: |o, _| set_primary(o, "#34d399"),
            },
        ],
    },
    OptionGroup {
        label: "background",
        only: None,
        rules: &[
            OptionRule {
                label: "dark",
                trigger: Trigger::AllOf(&[&["фон"], &["тёмн", "темн", "чёрн", "черн"]]),
                apply: |o, _| {
                    o.background_color = DARK_BACKGROUND.to_string();
                    true
                },
            },
            OptionRule {
                label: "light",
                trigger: Trigger::AllOf(&[&["фон"], &["свет"]]),
                apply: |o, _| {
                    o.background_color = LIGHT_BACKGROUND.to_string();
                    o.secondary_color = LIGHT_SECONDARY.to_string();
                    true
                },
            },
        ],
    },
    OptionGroup {
        label: "grid_size",
        only: Some(GameTemplate::Puzzle),
        rules: &[
            OptionRule {
                label: "3x3",
                trigger: Trigger::AnyOf(&["3x3", "3 на 3"]),
                apply: |o, _| {
                    o.grid_size = GridSize::Three;
                    true
                },
            },
            OptionRule {
                label: "5x5",
                trigger: Trigger::AnyOf(&["5x5", "5 на 5"]),
                apply: |o, _| {
                    o.grid_size = GridSize::Five;
                    true
                },
            },
        ],
    },
];

static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)назв[а-я]+\s+["']?([^"']+)["']?"#).expect("Invalid regex: name pattern")
});

fn set_primary(options: &mut GameOptions, color: &str) -> bool {
    options.primary_color = color.to_string();
    true
}

fn apply_name(options: &mut GameOptions, text: &str) -> bool {
    match extract_name(text) {
        Some(name) => {
            options.name = name;
            true
        }
        None => false,
    }
}

/// Name given after "называется ..." / "под названием ...", quotes optional.
pub fn extract_name(text: &str) -> Option<String> {
    NAME_PATTERN
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|name| !name.is_empty())
}

/// Outcome of analysis: template, resolved options and the rules that fired.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameRequest {
    pub template: GameTemplate,
    pub options: GameOptions,
    pub applied_rules: Vec<&'static str>,
}

#[derive(Default)]
pub struct GameRequestAnalyzer;

impl GameRequestAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn template_rules(&self) -> &'static [TemplateRule] {
        TEMPLATE_RULES
    }

    pub fn option_groups(&self) -> &'static [OptionGroup] {
        OPTION_GROUPS
    }

    pub fn select_template(&self, text: &str) -> GameTemplate {
        let lower = text.to_lowercase();
        TEMPLATE_RULES
            .iter()
            .find(|rule| rule.trigger.matches(&lower))
            .map(|rule| rule.template)
            .unwrap_or(GameTemplate::Arcade)
    }

    pub fn analyze(&self, text: &str) -> GameRequest {
        let lower = text.to_lowercase();
        let template = self.select_template(text);
        let mut options = template.default_options();
        let mut applied_rules = Vec::new();

        for group in OPTION_GROUPS {
            if group.only.is_some_and(|only| only != template) {
                continue;
            }
            let fired = group
                .rules
                .iter()
                .find(|rule| rule.trigger.matches(&lower) && (rule.apply)(&mut options, text));
            if let Some(rule) = fired {
                applied_rules.push(rule.label);
            }
        }

        GameRequest {
            template,
            options,
            applied_rules,
        }
    }
}
