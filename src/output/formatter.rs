use std::collections::BTreeMap;
use std::io::IsTerminal;

use owo_colors::OwoColorize;
use terminal_size::{terminal_size, Width};

use crate::game::PlayerPrediction;
use crate::history::HistoryState;
use crate::scoring::{display_tenths, PlayerScore, RulePack, ScoreResult};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a point total: no decimals when integral, one decimal otherwise
/// ("10", "10.5", "-0.5"). Rounds the same way the leaderboard ranks.
pub fn format_points(points: f64) -> String {
    let tenths = display_tenths(points);
    if tenths % 10 == 0 {
        format!("{}", tenths / 10)
    } else {
        format!("{:.1}", tenths as f64 / 10.0)
    }
}

/// Format a week-over-week change with an explicit sign ("+2.5", "-1.0").
/// No change renders as "0.0".
pub fn format_delta(delta: f64) -> String {
    if delta.abs() < 0.05 {
        "0.0".to_string()
    } else {
        format!("{:+.1}", delta)
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn achievement_icons(result: &ScoreResult) -> String {
    result.achievements.iter().map(|a| a.icon).collect()
}

/// Format the ranked leaderboard, one line per player:
/// rank, total, movement since the last archive, name, achievement icons.
/// No headers.
pub fn format_leaderboard(
    scores: &[PlayerScore<'_>],
    movement: &BTreeMap<String, Option<f64>>,
    use_colors: bool,
) -> String {
    if scores.is_empty() {
        return "No players found.".to_string();
    }

    let term_width = get_terminal_width();
    let total_width = 7;
    let delta_width = 6;
    let separator = "  ";

    scores
        .iter()
        .map(|entry| {
            let rank_str = format!("{:>3}.", entry.rank);
            let total_str = format!(
                "{:>width$}",
                format_points(entry.result.total),
                width = total_width
            );
            let delta = movement.get(&entry.player.id).copied().flatten();
            let delta_str = format!(
                "{:>width$}",
                delta.map(format_delta).unwrap_or_default(),
                width = delta_width
            );
            let icons = achievement_icons(&entry.result);

            // Icons are wide glyphs; count them double when budgeting the name
            let fixed_width = rank_str.len()
                + 1
                + total_width
                + delta_width
                + separator.len() * 3
                + icons.chars().count() * 2;
            let name = entry.player.display_name();
            let name = match term_width {
                Some(width) if width > fixed_width + 10 => truncate_name(name, width - fixed_width),
                Some(_) => truncate_name(name, 20),
                None => name.to_string(),
            };

            if use_colors {
                let delta_colored = match delta {
                    Some(d) if d >= 0.05 => delta_str.green().to_string(),
                    Some(d) if d <= -0.05 => delta_str.red().to_string(),
                    _ => delta_str.dimmed().to_string(),
                };
                format!(
                    "{} {}{}{}{}{}{}{}",
                    rank_str.dimmed(),
                    total_str.bold(),
                    separator,
                    delta_colored,
                    separator,
                    name,
                    separator,
                    icons
                )
            } else {
                format!(
                    "{} {}{}{}{}{}{}{}",
                    rank_str, total_str, separator, delta_str, separator, name, separator, icons
                )
                .trim_end()
                .to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the leaderboard as tab-separated values for scripting
/// Columns: rank, player id, display name, total (no headers, no colors)
pub fn format_tsv(scores: &[PlayerScore<'_>]) -> String {
    scores
        .iter()
        .map(|entry| {
            format!(
                "{}\t{}\t{}\t{}",
                entry.rank,
                entry.player.id,
                entry.player.display_name(),
                format_points(entry.result.total)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Multi-line breakdown for one player: every rule that fired, then achievements
pub fn format_breakdown(
    player: &PlayerPrediction,
    result: &ScoreResult,
    use_colors: bool,
) -> String {
    let mut lines = Vec::new();

    let header = format!(
        "{} ({}): {} pts [{}]",
        player.display_name(),
        player.id,
        format_points(result.total),
        result.breakdown.rule_pack
    );
    lines.push(if use_colors {
        header.bold().to_string()
    } else {
        header
    });

    lines.push(format!(
        "  Weekly: {}",
        result.breakdown.weekly_status.describe()
    ));

    if result.breakdown.contributions.is_empty() {
        lines.push("  No scoring events.".to_string());
    }
    for c in &result.breakdown.contributions {
        let points = format!("{:>6}", format_delta_or_zero(c.points));
        let points = if !use_colors {
            points
        } else if c.points > 0.0 {
            points.green().to_string()
        } else if c.points < 0.0 {
            points.red().to_string()
        } else {
            points.dimmed().to_string()
        };
        lines.push(format!(
            "  {}  {:<20} {} -> {}",
            points,
            c.rule.label(),
            c.detail,
            format_points(c.after)
        ));
    }

    if !result.achievements.is_empty() {
        lines.push("  Achievements:".to_string());
        for a in &result.achievements {
            lines.push(format!(
                "    {} {} (+{})",
                a.icon,
                a.member,
                format_points(a.points)
            ));
        }
    }

    lines.join("\n")
}

fn format_delta_or_zero(points: f64) -> String {
    if points == 0.0 {
        "0".to_string()
    } else {
        format_delta(points)
    }
}

/// Point table for one rule pack
pub fn format_rule_pack(pack: &RulePack) -> String {
    let rows = [
        ("Draft winner", pack.draft_winner),
        ("Winner prophecy", pack.pred_winner),
        ("First out prophecy", pack.pred_first_out),
        ("Traitor identified", pack.traitor_bonus),
        ("Reversed prophecy", pack.prophecy_reversed_penalty),
        ("Weekly correct", pack.weekly_correct_base),
        ("Weekly incorrect", -pack.weekly_incorrect_base),
        ("Redemption Roulette", pack.redemption_roulette_correct),
        (
            "Redemption Roulette (negative)",
            pack.redemption_roulette_correct_negative,
        ),
        ("Redemption Roulette miss", pack.redemption_roulette_incorrect),
        ("Shield Gambit", pack.shield_gambit_correct),
        ("Shield Gambit (negative)", pack.shield_gambit_correct_negative),
        ("Traitor Trio per match", pack.traitor_trio_partial),
        ("Traitor Trio perfect", pack.traitor_trio_perfect),
    ];

    let mut lines = vec![format!("{} ({})", pack.name, pack.id)];
    for (label, points) in rows {
        lines.push(format!("  {:<32}{:>6}", label, format_points(points)));
    }
    lines.push(format!(
        "  {:<32}{:>6}",
        "Double or Nothing",
        format!("x{}", format_points(pack.double_or_nothing))
    ));
    lines.join("\n")
}

/// One line per archived snapshot, newest last
pub fn format_history(history: &HistoryState) -> String {
    if history.snapshots.is_empty() {
        return "No archived snapshots.".to_string();
    }

    let mut snapshots: Vec<_> = history.snapshots.iter().collect();
    snapshots.sort_by_key(|s| s.taken_at);
    snapshots
        .iter()
        .map(|s| {
            let leader = s
                .totals
                .iter()
                .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
                .map(|(id, total)| format!("{} {}", id, format_points(*total)))
                .unwrap_or_else(|| "-".to_string());
            format!(
                "{}  {:<16} {:>3} players  leader: {}",
                s.taken_at.format("%Y-%m-%d %H:%M"),
                s.label,
                s.totals.len(),
                leader
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{CastStatus, GameState};
    use crate::history::ArchivedSnapshot;
    use crate::scoring::{calculate_score, score_all};

    fn sample_state() -> GameState {
        GameState {
            cast_status: Some(BTreeMap::from([
                (
                    "Alan".to_string(),
                    CastStatus {
                        is_winner: true,
                        ..Default::default()
                    },
                ),
                (
                    "Bea".to_string(),
                    CastStatus {
                        is_first_out: true,
                        ..Default::default()
                    },
                ),
            ])),
            players: vec![
                PlayerPrediction {
                    id: "p1".to_string(),
                    name: Some("Sam".to_string()),
                    pred_winner: Some("Alan".to_string()),
                    pred_first_out: Some("Bea".to_string()),
                    ..Default::default()
                },
                PlayerPrediction {
                    id: "p2".to_string(),
                    pred_winner: Some("Bea".to_string()),
                    ..Default::default()
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_format_points() {
        assert_eq!(format_points(10.0), "10");
        assert_eq!(format_points(10.5), "10.5");
        assert_eq!(format_points(-0.5), "-0.5");
        assert_eq!(format_points(0.0), "0");
        assert_eq!(format_points(-0.0), "0");
        assert_eq!(format_points(0.1 + 0.2), "0.3");
        assert_eq!(format_points(-0.04), "0");
        assert_eq!(format_points(9.96), "10");
        assert_eq!(format_points(-1.5), "-1.5");
    }

    #[test]
    fn test_format_delta() {
        assert_eq!(format_delta(2.5), "+2.5");
        assert_eq!(format_delta(-1.0), "-1.0");
        assert_eq!(format_delta(3.0), "+3.0");
        assert_eq!(format_delta(0.0), "0.0");
    }

    #[test]
    fn test_truncate_name() {
        assert_eq!(truncate_name("Short", 10), "Short");
        assert_eq!(truncate_name("A very long player name", 10), "A very ...");
        assert_eq!(truncate_name("Abcdef", 3), "Abc");
    }

    #[test]
    fn test_format_leaderboard_plain() {
        let state = sample_state();
        let scores = score_all(&state, &RulePack::classic()).unwrap();
        let movement = BTreeMap::from([("p1".to_string(), Some(2.5)), ("p2".to_string(), None)]);

        let output = format_leaderboard(&scores, &movement, false);
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("15"));
        assert!(lines[0].contains("+2.5"));
        assert!(lines[0].contains("Sam"));
        assert!(lines[0].contains("👑"));
        assert!(lines[1].contains("-2"));
        assert!(lines[1].contains("p2"));
    }

    #[test]
    fn test_format_leaderboard_empty() {
        assert_eq!(
            format_leaderboard(&[], &BTreeMap::new(), false),
            "No players found."
        );
    }

    #[test]
    fn test_format_tsv() {
        let state = sample_state();
        let scores = score_all(&state, &RulePack::classic()).unwrap();
        assert_eq!(format_tsv(&scores), "1\tp1\tSam\t15\n2\tp2\tp2\t-2");
    }

    #[test]
    fn test_format_breakdown() {
        let state = sample_state();
        let player = &state.players[0];
        let result = calculate_score(&state, &RulePack::classic(), player).unwrap();

        let output = format_breakdown(player, &result, false);
        assert!(output.starts_with("Sam (p1): 15 pts [classic]"));
        assert!(output.contains("Winner Prophecy"));
        assert!(output.contains("called Alan as winner"));
        assert!(output.contains("+10.0"));
        assert!(output.contains("Achievements:"));
        assert!(output.contains("no weekly prediction"));
    }

    #[test]
    fn test_format_breakdown_no_events() {
        let state = sample_state();
        let player = PlayerPrediction {
            id: "p3".to_string(),
            ..Default::default()
        };
        let result = calculate_score(&state, &RulePack::classic(), &player).unwrap();
        let output = format_breakdown(&player, &result, false);
        assert!(output.contains("No scoring events."));
        assert!(!output.contains("Achievements:"));
    }

    #[test]
    fn test_format_rule_pack() {
        let output = format_rule_pack(&RulePack::classic());
        assert!(output.starts_with("Classic (classic)"));
        assert!(output.contains("Weekly incorrect"));
        assert!(output.contains("-0.5"));
        assert!(output.contains("x2"));
    }

    #[test]
    fn test_format_history() {
        assert_eq!(format_history(&HistoryState::new()), "No archived snapshots.");

        let mut history = HistoryState::new();
        history.archive(ArchivedSnapshot::new(
            "Week 1",
            BTreeMap::from([("p1".to_string(), 12.5), ("p2".to_string(), 3.0)]),
        ));
        let output = format_history(&history);
        assert!(output.contains("Week 1"));
        assert!(output.contains("2 players"));
        assert!(output.contains("leader: p1 12.5"));
    }
}
