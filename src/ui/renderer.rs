//! Plain-text rendering of a [`UIViewModel`].
//!
//! Rendering is a pure function of the view model, so two identical models
//! always produce byte-identical output. Matched name characters are wrapped
//! in brackets.
//!
//! # Example
//!
//! ```
//! use ngo_discovery::app::AppState;
//! use ngo_discovery::ui::render_text;
//!
//! let state = AppState::new(6, 300);
//! let text = render_text(&state.compute_viewmodel());
//! assert!(text.contains("Loading organizations..."));
//! ```

use crate::ui::viewmodel::{EmptyState, FooterInfo, HeaderInfo, OrganizationCard, UIViewModel};
use std::fmt::Write;

const HIGHLIGHT_OPEN: char = '[';
const HIGHLIGHT_CLOSE: char = ']';

/// Renders the view model as a multi-line string.
#[must_use]
pub fn render_text(vm: &UIViewModel) -> String {
    let mut out = String::new();

    render_header(&mut out, &vm.header);

    let _ = write!(out, "Search: {}", vm.search_bar.input);
    if vm.search_bar.pending {
        out.push_str(" (typing)");
    }
    out.push('\n');

    if let Some(banner) = &vm.error_banner {
        let _ = write!(out, "! {}", banner.message);
        if banner.retryable {
            out.push_str(" [refresh to retry]");
        }
        out.push('\n');
    }

    out.push('\n');

    if let Some(empty) = &vm.empty_state {
        render_empty_state(&mut out, empty);
    } else {
        for (position, card) in vm.cards.iter().enumerate() {
            render_card(&mut out, position + 1, card);
        }
    }

    render_footer(&mut out, &vm.footer);
    out
}

fn render_header(out: &mut String, header: &HeaderInfo) {
    let _ = write!(out, "{} | {}", header.title, header.result_count);
    if header.active_filters > 0 {
        let _ = write!(out, " | {} filter(s) active", header.active_filters);
    }
    out.push('\n');
}

fn render_card(out: &mut String, position: usize, card: &OrganizationCard) {
    let star = if card.is_favorite { "*" } else { " " };
    let _ = writeln!(
        out,
        "{position:>2}. {star} {} ({}) - {} - rating {} - {}",
        highlight(&card.name, &card.highlight_ranges),
        card.category,
        card.distance_label,
        card.rating_label,
        card.verification,
    );
    let _ = writeln!(out, "      id: {}", card.id);
    for need in &card.needs {
        let _ = writeln!(
            out,
            "      - {} [{}] {}% ({})",
            need.item, need.urgency, need.progress_percent, need.quantity_label
        );
    }
}

fn render_empty_state(out: &mut String, empty: &EmptyState) {
    let _ = writeln!(out, "  {}", empty.message);
    if !empty.subtitle.is_empty() {
        let _ = writeln!(out, "  {}", empty.subtitle);
    }
}

fn render_footer(out: &mut String, footer: &FooterInfo) {
    out.push('\n');
    let _ = write!(out, "Showing {} of {}", footer.revealed, footer.total);
    if footer.loading_more {
        out.push_str(" | loading more...");
    } else if footer.has_more {
        out.push_str(" | 'more' to load more");
    }
    if footer.refreshing {
        out.push_str(" | refreshing...");
    }
    out.push('\n');
}

/// Wraps the given character ranges of `text` in brackets.
///
/// Ranges are `(start, end)` character indices with an exclusive end, sorted
/// and non-overlapping. Out-of-bounds ends are clamped.
///
/// ```
/// use ngo_discovery::ui::highlight;
///
/// assert_eq!(highlight("Hope Clinic", &[(0, 4)]), "[Hope] Clinic");
/// ```
#[must_use]
pub fn highlight(text: &str, ranges: &[(usize, usize)]) -> String {
    if ranges.is_empty() {
        return text.to_string();
    }

    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + ranges.len() * 2);
    let mut current_pos = 0;

    for &(start, end) in ranges {
        let start = start.min(chars.len()).max(current_pos);
        let end = end.min(chars.len());
        if start >= end {
            continue;
        }
        out.extend(&chars[current_pos..start]);
        out.push(HIGHLIGHT_OPEN);
        out.extend(&chars[start..end]);
        out.push(HIGHLIGHT_CLOSE);
        current_pos = end;
    }

    out.extend(&chars[current_pos..]);
    out
}
