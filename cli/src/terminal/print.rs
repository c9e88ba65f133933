use colored::*;
use pingr_common::candidate::{RankedEntry, RankedList, RunSummary};

pub const TOTAL_WIDTH: usize = 64;

pub fn header(msg: &str) {
    let formatted: String = format!("⟦ {} ⟧", msg);
    let msg_len: usize = formatted.chars().count();

    let dash_count: usize = TOTAL_WIDTH.saturating_sub(msg_len);
    let left: usize = dash_count / 2;
    let right: usize = dash_count - left;

    let line: ColoredString = format!(
        "{}{}{}",
        "─".repeat(left),
        formatted.to_uppercase().bright_green(),
        "─".repeat(right)
    )
    .bright_black();

    println!("{}", line);
}

pub fn fat_separator() {
    println!("{}", "═".repeat(TOTAL_WIDTH).bright_black());
}

pub fn centerln(msg: &str) {
    let width: usize = console::measure_text_width(msg);
    let space: String = " ".repeat(TOTAL_WIDTH.saturating_sub(width) / 2);
    println!("{space}{msg}");
}

/// One shortlist row: rank, identity, latency, contributing sources.
pub fn ranked_entry(idx: usize, entry: &RankedEntry) {
    let rank: String = format!("[{}]", (idx + 1).to_string().cyan());
    let identity: ColoredString = entry.endpoint.to_string().bold();
    let latency: ColoredString = if entry.score.is_unreachable() {
        "unreachable".red().bold()
    } else {
        entry.score.to_string().green().bold()
    };
    let via: String = entry
        .sources
        .iter()
        .cloned()
        .collect::<Vec<String>>()
        .join(", ");

    println!("{} {} {}", rank.bright_black(), identity, latency);
    println!(" {} via {}", "└─".bright_black(), via.bright_black());
}

pub fn ranked_list(list: &RankedList) {
    for (idx, entry) in list.iter().enumerate() {
        ranked_entry(idx, entry);
    }
}

pub fn summary(summary: &RunSummary, total_secs: f64) {
    let candidates: ColoredString = format!("{} candidates", summary.discovered).bold().green();
    let unreachable: ColoredString =
        format!("{} unreachable", summary.unreachable).bold().yellow();
    let elapsed: ColoredString = format!("{total_secs:.2}s").bold().yellow();

    fat_separator();
    centerln(&format!(
        "{candidates} from {} sources, {unreachable}, done in {elapsed}",
        summary.sources_fetched
    ));
}

pub fn no_results() {
    println!("{}", "no candidates survived collection".red().bold());
}
