use comfy_table::{Table, ContentArrangement, presets::UTF8_FULL, Cell, Color};

use lotto_db::models::Draw;
use lotto_predict::generator::GeneratedGame;

fn format_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:2}", n))
        .collect::<Vec<_>>()
        .join(" - ")
}

/// Color band of a ball, as printed on the official tickets.
fn ball_color(n: u8) -> Color {
    match n {
        1..=10 => Color::Yellow,
        11..=20 => Color::Blue,
        21..=30 => Color::Red,
        31..=40 => Color::Grey,
        _ => Color::Green,
    }
}

pub fn display_draws(draws: &[Draw]) {
    if draws.is_empty() {
        println!("No draws to show.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Round", "Numbers"]);

    for draw in draws {
        let round = draw.round.map_or("-".to_string(), |r| r.to_string());
        table.add_row(vec![round, format_numbers(&draw.sorted_numbers())]);
    }

    println!("{table}");
}

pub fn display_games(games: &[GeneratedGame], round: u32) {
    println!("\nRound {}\n", round);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Game", "1", "2", "3", "4", "5", "6"]);

    for (i, game) in games.iter().enumerate() {
        let mut row = vec![Cell::new(format!("{}", i + 1))];
        row.extend(game.numbers.iter().map(|&n| Cell::new(n).fg(ball_color(n))));
        table.add_row(row);
    }

    println!("{table}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_numbers() {
        assert_eq!(format_numbers(&[3, 15, 27]), " 3 - 15 - 27");
    }

    #[test]
    fn test_ball_color_bands() {
        assert_eq!(ball_color(1), Color::Yellow);
        assert_eq!(ball_color(20), Color::Blue);
        assert_eq!(ball_color(21), Color::Red);
        assert_eq!(ball_color(40), Color::Grey);
        assert_eq!(ball_color(45), Color::Green);
    }
}
