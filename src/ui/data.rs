use ratatui::style::Style;
use ratatui::text::{Line, Span};

use crate::model::types::Candidate;
use crate::ui::components::theme::ThemePalette;

/// Compact rupee label for a price hint, e.g. `₹32.50`.
pub fn price_label(price: f64) -> String {
    format!("₹{price:.2}")
}

/// One suggestion row: name, then organization, price and salts when known.
pub fn candidate_line(candidate: &Candidate, palette: ThemePalette) -> Line<'static> {
    let mut spans = vec![Span::styled(
        candidate.display_name.clone(),
        Style::default().fg(palette.fg),
    )];
    if let Some(org) = candidate.organization.as_deref().filter(|s| !s.is_empty()) {
        spans.push(Span::styled(format!("  {org}"), palette.hint_style()));
    }
    if let Some(price) = candidate.price_hint {
        spans.push(Span::styled(
            format!("  {}", price_label(price)),
            palette.price_style(),
        ));
    }
    if !candidate.aux_tags.is_empty() {
        spans.push(Span::styled(
            format!("  {}", candidate.aux_tags.join(", ")),
            palette.hint_style(),
        ));
    }
    Line::from(spans)
}

/// Plain-text rendering for CLI output.
pub fn candidate_text(candidate: &Candidate) -> String {
    let mut out = candidate.display_name.clone();
    if let Some(org) = candidate.organization.as_deref().filter(|s| !s.is_empty()) {
        out.push_str(&format!(" | {org}"));
    }
    if let Some(price) = candidate.price_hint {
        out.push_str(&format!(" | {}", price_label(price)));
    }
    if !candidate.aux_tags.is_empty() {
        out.push_str(&format!(" | {}", candidate.aux_tags.join(", ")));
    }
    match candidate.usable_signature() {
        Some(sig) => out.push_str(&format!(" [{sig}]")),
        None => out.push_str(" [unresolved]"),
    }
    out
}
