//! Brain Module Tests
//!
//! Intent priority, game request analysis and image prompt captions.

use crate::brain::{GameRequestAnalyzer, ImagePromptAnalyzer, IntentClassifier};
use crate::models::ContentType;
use crate::templates::{Difficulty, GameTemplate, GridSize};

#[cfg(test)]
mod intent_classifier_tests {
    use super::*;

    #[test]
    fn test_each_type_alone() {
        let classifier = IntentClassifier::new();
        let cases = vec![
            ("нарисуй кота", ContentType::Image),
            ("покажи фото города", ContentType::Image),
            ("сделай короткий ролик", ContentType::Video),
            ("хочу анимацию", ContentType::Video),
            ("сделай аркаду", ContentType::Game),
            ("напиши скрипт", ContentType::Code),
            ("расскажи о себе", ContentType::Text),
        ];

        for (text, expected) in cases {
            assert_eq!(classifier.classify(text), expected, "Wrong type for '{}'", text);
        }
    }

    #[test]
    fn test_priority_order() {
        let classifier = IntentClassifier::new();
        // image > video > game > code
        assert_eq!(classifier.classify("видео с картинкой"), ContentType::Image);
        assert_eq!(classifier.classify("игра про видео"), ContentType::Video);
        assert_eq!(classifier.classify("код для игры"), ContentType::Game);
        assert_eq!(classifier.classify("функция и программа"), ContentType::Code);
    }

    #[test]
    fn test_case_insensitive() {
        let classifier = IntentClassifier::new();
        assert_eq!(classifier.classify("СОЗДАЙ КАРТИНКУ"), ContentType::Image);
        assert_eq!(classifier.classify("Игра"), ContentType::Game);
    }

    #[test]
    fn test_empty_and_unmatched_are_text() {
        let classifier = IntentClassifier::new();
        assert_eq!(classifier.classify(""), ContentType::Text);
        assert_eq!(classifier.classify("hello world"), ContentType::Text);
        assert!(classifier.matched_rule("hello world").is_none());
    }

    #[test]
    fn test_matched_rule_reports_fragment() {
        let classifier = IntentClassifier::new();
        let rule = classifier.matched_rule("Создай головоломку").unwrap();
        assert_eq!(rule.content_type, ContentType::Game);
        assert_eq!(rule.fragment.to_lowercase(), "головоломк");
    }
}

#[cfg(test)]
mod game_request_tests {
    use super::*;

    #[test]
    fn test_default_is_arcade() {
        let request = GameRequestAnalyzer::new().analyze("сделай игру");
        assert_eq!(request.template, GameTemplate::Arcade);
        assert_eq!(request.options, GameTemplate::Arcade.default_options());
        assert!(request.applied_rules.is_empty());
    }

    #[test]
    fn test_hard_puzzle_five_by_five() {
        let request = GameRequestAnalyzer::new().analyze("создай сложную головоломку 5x5");
        assert_eq!(request.template, GameTemplate::Puzzle);
        assert_eq!(request.options.difficulty, Difficulty::Hard);
        assert_eq!(request.options.grid_size, GridSize::Five);
        assert_eq!(request.options.name, "Головоломка");
    }

    #[test]
    fn test_puzzle_wins_over_platformer() {
        let request = GameRequestAnalyzer::new().analyze("головоломка с прыжками");
        assert_eq!(request.template, GameTemplate::Puzzle);
    }

    #[test]
    fn test_platformer_keywords() {
        let analyzer = GameRequestAnalyzer::new();
        assert_eq!(analyzer.select_template("платформер"), GameTemplate::Platformer);
        assert_eq!(analyzer.select_template("игра где надо прыгать"), GameTemplate::Platformer);
    }

    #[test]
    fn test_grid_size_ignored_outside_puzzle() {
        let request = GameRequestAnalyzer::new().analyze("аркада 3x3");
        assert_eq!(request.template, GameTemplate::Arcade);
        assert_eq!(request.options.grid_size, GridSize::Four);
    }

    #[test]
    fn test_easy_red_platformer_on_dark_background() {
        let request = GameRequestAnalyzer::new()
            .analyze("простой платформер, красный игрок, тёмный фон");
        assert_eq!(request.template, GameTemplate::Platformer);
        assert_eq!(request.options.difficulty, Difficulty::Easy);
        assert_eq!(request.options.background_color, "#1A1F2C");
        assert_eq!(request.options.primary_color, "#ff6b6b");
        assert_eq!(request.applied_rules, vec!["easy", "red", "dark"]);
    }

    #[test]
    fn test_name_override() {
        let request = GameRequestAnalyzer::new()
            .analyze("игра с названием \"Космос\"");
        assert_eq!(request.options.name, "Космос");
    }

    #[test]
    fn test_every_field_populated() {
        let analyzer = GameRequestAnalyzer::new();
        for text in ["", "игра", "сложная аркада", "платформер с названием ''", "пазл 3 на 3"] {
            let options = analyzer.analyze(text).options;
            assert!(!options.primary_color.is_empty());
            assert!(!options.secondary_color.is_empty());
            assert!(!options.background_color.is_empty());
            assert!(!options.name.is_empty(), "Empty name for '{}'", text);
        }
    }
}

#[cfg(test)]
mod image_prompt_tests {
    use super::*;

    #[test]
    fn test_scenario_sunset_caption() {
        let prompt = ImagePromptAnalyzer::new().analyze("создай картинку закат над морем");
        assert_eq!(prompt.caption(), "закат, море");
    }

    #[test]
    fn test_unknown_words_fall_back() {
        let prompt = ImagePromptAnalyzer::new().analyze("нарисуй что-нибудь");
        assert!(prompt.is_empty());
        assert_eq!(prompt.caption(), "Сгенерированное изображение");
    }
}
