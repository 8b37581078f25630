//! Image prompt analysis.
//!
//! Picks out colors, subjects and styles mentioned in an image or video request
//! so the reply can echo what was understood.

use serde::Serialize;

/// (stem, canonical word). Stems match inflected forms ("закат", "морем").
const COLORS: &[(&str, &str)] = &[
    ("красн", "красный"),
    ("син", "синий"),
    ("зелён", "зелёный"),
    ("зелен", "зелёный"),
    ("жёлт", "жёлтый"),
    ("желт", "жёлтый"),
    ("фиолетов", "фиолетовый"),
    ("оранжев", "оранжевый"),
    ("чёрн", "чёрный"),
    ("черн", "чёрный"),
    ("бел", "белый"),
    ("розов", "розовый"),
    ("голуб", "голубой"),
];

const SUBJECTS: &[(&str, &str)] = &[
    ("пейзаж", "пейзаж"),
    ("портрет", "портрет"),
    ("животн", "животное"),
    ("город", "город"),
    ("мор", "море"),
    ("гор", "горы"),
    ("лес", "лес"),
    ("закат", "закат"),
    ("рассвет", "рассвет"),
    ("космос", "космос"),
    ("цвет", "цветы"),
];

const STYLES: &[(&str, &str)] = &[
    ("акварел", "акварель"),
    ("масл", "масло"),
    ("цифров", "цифровой"),
    ("карандаш", "карандаш"),
    ("аниме", "аниме"),
];

const FALLBACK_CAPTION: &str = "Сгенерированное изображение";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImagePrompt {
    pub colors: Vec<&'static str>,
    pub subjects: Vec<&'static str>,
    pub styles: Vec<&'static str>,
}

impl ImagePrompt {
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty() && self.subjects.is_empty() && self.styles.is_empty()
    }

    /// Subjects first, then colors, then styles, comma separated.
    pub fn caption(&self) -> String {
        if self.is_empty() {
            return FALLBACK_CAPTION.to_string();
        }
        self.subjects
            .iter()
            .chain(self.colors.iter())
            .chain(self.styles.iter())
            .copied()
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Longest ending accepted after a stem ("ого", "ами").
const MAX_ENDING_CHARS: usize = 3;
const VOWELS: &str = "аеёиоуыэюя";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Table {
    Color,
    Subject,
    Style,
}

/// Whether `ending` reads as an inflection of the stem rather than another
/// word sharing its prefix ("морем" vs "мороженое", "белый" vs "белка").
fn is_inflection(table: Table, ending: &str) -> bool {
    if ending.chars().count() > MAX_ENDING_CHARS {
        return false;
    }
    match table {
        // Adjective endings always start with a vowel.
        Table::Color => ending.chars().next().map_or(true, |c| VOWELS.contains(c)),
        Table::Subject | Table::Style => true,
    }
}

/// The longest stem across all tables that `word` inflects, if any.
fn best_match(word: &str) -> Option<(Table, &'static str)> {
    [
        (Table::Color, COLORS),
        (Table::Subject, SUBJECTS),
        (Table::Style, STYLES),
    ]
    .into_iter()
    .flat_map(|(table, entries)| entries.iter().map(move |entry| (table, entry)))
    .filter_map(|(table, (stem, canonical))| {
        word.strip_prefix(stem)
            .filter(|ending| is_inflection(table, ending))
            .map(|_| (table, stem.chars().count(), *canonical))
    })
    .max_by_key(|(_, len, _)| *len)
    .map(|(table, _, canonical)| (table, canonical))
}

#[derive(Default)]
pub struct ImagePromptAnalyzer;

impl ImagePromptAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, text: &str) -> ImagePrompt {
        let words: Vec<String> = text
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(|w| w.to_string())
            .collect();

        let mut prompt = ImagePrompt::default();
        for word in &words {
            if let Some((table, canonical)) = best_match(word) {
                let found = match table {
                    Table::Color => &mut prompt.colors,
                    Table::Subject => &mut prompt.subjects,
                    Table::Style => &mut prompt.styles,
                };
                if !found.contains(&canonical) {
                    found.push(canonical);
                }
            }
        }
        prompt
    }
}
