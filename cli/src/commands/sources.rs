use colored::*;
use pingr_common::source::{ContentKind, default_sources};

use crate::terminal::print;

/// Prints the built-in source list.
pub fn list() {
    print::header("built-in sources");

    for source in default_sources() {
        let kind: ColoredString = match source.kind {
            ContentKind::FreeText => "text".blue(),
            ContentKind::StructuredRecords => "json".magenta(),
        };
        println!(
            "{:<12} {} {}",
            source.tag.bold(),
            kind,
            source.url.bright_black()
        );
    }
}
