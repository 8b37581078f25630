//! Template Tests
//!
//! Game documents, the website snippet and the puzzle shuffle model.

use crate::brain::GameRequestAnalyzer;
use crate::templates::code::{CodeKind, CodeSnippet};
use crate::templates::puzzle::Board;
use crate::templates::{
    extract_game_code_snippet, Difficulty, GameTemplate, GridSize, TemplateRenderer, WATERMARK,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[cfg(test)]
mod render_tests {
    use super::*;

    #[test]
    fn test_every_template_is_standalone_and_watermarked() {
        let renderer = TemplateRenderer::new().unwrap();
        for template in GameTemplate::ALL {
            let html = renderer.render_game(template, &template.default_options()).unwrap();
            assert!(html.starts_with("<!DOCTYPE html>"), "{} is not a full document", template);
            assert!(html.contains(WATERMARK), "{} lacks the watermark", template);
            assert!(html.contains("<script>"));
            assert!(!html.contains("{{"), "{} has unrendered placeholders", template);
        }
    }

    #[test]
    fn test_render_is_idempotent() {
        let renderer = TemplateRenderer::new().unwrap();
        let request = GameRequestAnalyzer::new().analyze("создай сложную головоломку 5x5");
        let first = renderer.render_game(request.template, &request.options).unwrap();
        let second = renderer.render_game(request.template, &request.options).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_puzzle_document_carries_options() {
        let renderer = TemplateRenderer::new().unwrap();
        let request = GameRequestAnalyzer::new().analyze("создай сложную головоломку 5x5");
        let html = renderer.render_game(request.template, &request.options).unwrap();

        assert!(html.contains("const SIZE = 5;"));
        assert!(html.contains("const SHUFFLE_MOVES = 150;"));
        assert!(html.contains("<title>Головоломка</title>"));
    }

    #[test]
    fn test_game_name_is_escaped() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut options = GameTemplate::Arcade.default_options();
        options.name = "<b>Бум</b>".to_string();
        let html = renderer.render_game(GameTemplate::Arcade, &options).unwrap();
        assert!(!html.contains("<b>Бум</b>"));
        assert!(html.contains("&lt;b&gt;Бум&lt;&#x2F;b&gt;"));
    }

    #[test]
    fn test_difficulty_changes_arcade_speed() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut options = GameTemplate::Arcade.default_options();
        options.difficulty = Difficulty::Easy;
        let easy = renderer.render_game(GameTemplate::Arcade, &options).unwrap();
        options.difficulty = Difficulty::Hard;
        let hard = renderer.render_game(GameTemplate::Arcade, &options).unwrap();
        assert_ne!(easy, hard);
    }

    #[test]
    fn test_snippet_is_script_head() {
        let renderer = TemplateRenderer::new().unwrap();
        let html = renderer
            .render_game(GameTemplate::Platformer, &GameTemplate::Platformer.default_options())
            .unwrap();
        let snippet = extract_game_code_snippet(&html);
        assert!(snippet.ends_with("// ... (полный код игры)"));
        assert!(snippet.lines().count() <= 16);
        assert!(!snippet.contains("<script>"));
    }
}

#[cfg(test)]
mod code_snippet_tests {
    use super::*;

    #[test]
    fn test_website_snippet() {
        let renderer = TemplateRenderer::new().unwrap();
        assert_eq!(CodeKind::detect("напиши код для сайта"), CodeKind::Website);
        let snippet = CodeSnippet::website(&renderer, None).unwrap();
        assert!(snippet.source.contains("Мой сайт"));
        assert_eq!(snippet.file_name(), "code.txt");
    }
}

#[cfg(test)]
mod puzzle_board_tests {
    use super::*;

    #[test]
    fn test_shuffles_stay_solvable() {
        let mut rng = StdRng::seed_from_u64(42);
        for size in [GridSize::Three, GridSize::Four, GridSize::Five] {
            for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
                let board = Board::shuffled(size, difficulty, &mut rng);
                assert!(board.is_solvable(), "{:?}/{:?} unsolvable", size, difficulty);
                assert_eq!(board.tiles().len(), size.side() * size.side());
            }
        }
    }

    #[test]
    fn test_shuffle_usually_scrambles() {
        let mut rng = StdRng::seed_from_u64(1);
        let scrambled = (0..20)
            .map(|_| Board::shuffled(GridSize::Four, Difficulty::Medium, &mut rng))
            .filter(|b| !b.is_solved())
            .count();
        assert!(scrambled >= 15);
    }
}
