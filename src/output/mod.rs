mod formatter;

pub use formatter::{
    format_breakdown, format_delta, format_history, format_leaderboard, format_points,
    format_rule_pack, format_tsv, should_use_colors,
};
