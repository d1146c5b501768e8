//! Terminal rendering for the list and reader views.
//!
//! Cards are built as strings so they can be checked without a terminal;
//! [`TerminalSurface`] prints them to stdout.

use std::fmt::Write;

use bulletin_core::{
    DetailBody, DetailTicket, DetailView, ListModel, MinistryFilter, Surface, snippet,
};

const LABEL_WIDTH: usize = 14;
const BOOKMARK_MARK: &str = "★";
const ROW_PREVIEW_CHARS: usize = 96;

// ── List ──

pub fn render_list(list: &ListModel<'_>) -> String {
    let mut out = String::new();

    if let Some(diag) = list.diagnostic {
        let _ = writeln!(out, "=== Feed unavailable ===");
        let _ = writeln!(out, "  {:<LABEL_WIDTH$} {}", "resource", diag.resource);
        let _ = writeln!(out, "  {:<LABEL_WIDTH$} {}", "error", diag.message);
        let _ = writeln!(
            out,
            "  Check that the site is reachable and serves {}.",
            diag.resource
        );
        return out;
    }
    if list.loading {
        let _ = writeln!(out, "Loading bulletins…");
        return out;
    }

    let _ = writeln!(out, "=== Bulletins ===");
    let _ = writeln!(out, "  {:<LABEL_WIDTH$} {}", "updated", list.meta.updated);
    if let Some(count) = list.meta.count {
        let _ = writeln!(out, "  {:<LABEL_WIDTH$} {}", "published", count);
    }
    if let Some(note) = list.meta.note.as_deref().filter(|n| !n.trim().is_empty()) {
        let _ = writeln!(out, "  {:<LABEL_WIDTH$} {}", "note", note.trim());
    }
    let filters = describe_filters(list);
    if !filters.is_empty() {
        let _ = writeln!(out, "  {:<LABEL_WIDTH$} {}", "filters", filters.join(", "));
    }
    let _ = writeln!(
        out,
        "  {:<LABEL_WIDTH$} {} of {}",
        "showing",
        list.rows.len(),
        list.total
    );
    let _ = writeln!(out);

    if list.rows.is_empty() {
        let _ = writeln!(out, "  No bulletins match.");
    }
    for row in &list.rows {
        let mark = if row.bookmarked { BOOKMARK_MARK } else { " " };
        let _ = writeln!(out, "{:>4}. {} {}", row.position, mark, row.item.title);
        let _ = writeln!(
            out,
            "        {} · {}",
            or_dash(&row.item.ministry),
            or_dash(&row.item.posted_on_raw)
        );
        let preview = snippet(&row.item.snippet, ROW_PREVIEW_CHARS);
        if !preview.is_empty() {
            let _ = writeln!(out, "        {preview}");
        }
    }
    if list.load_more {
        let _ = writeln!(out);
        let _ = writeln!(out, "  … {} more (type `more`)", list.remaining());
    }
    out
}

fn describe_filters(list: &ListModel<'_>) -> Vec<String> {
    let f = list.filter;
    let mut parts = Vec::new();
    if let MinistryFilter::Named(m) = &f.ministry {
        parts.push(format!("ministry={m}"));
    }
    if let Some(chip) = f.chip {
        parts.push(format!("topic={}", chip.label()));
    }
    if !f.query.trim().is_empty() {
        parts.push(format!("search=\"{}\"", f.query.trim()));
    }
    if f.bookmarks_only {
        parts.push("bookmarks only".to_string());
    }
    parts
}

fn or_dash(s: &str) -> &str {
    if s.trim().is_empty() { "—" } else { s }
}

// ── Reader ──

pub fn render_detail(detail: &DetailView) -> String {
    let item = &detail.item;
    let mut out = String::new();

    let _ = writeln!(out, "=== {} ===", item.title);
    let _ = writeln!(out, "  {:<LABEL_WIDTH$} {}", "ministry", or_dash(&item.ministry));
    let _ = writeln!(out, "  {:<LABEL_WIDTH$} {}", "posted", or_dash(&item.posted_on_raw));
    let _ = writeln!(out, "  {:<LABEL_WIDTH$} {}", "id", or_dash(&item.prid));
    if !item.source_url.is_empty() {
        let _ = writeln!(out, "  {:<LABEL_WIDTH$} {}", "source", item.source_url);
    }
    for pdf in item.pdfs.iter().filter(|p| !p.url.is_empty()) {
        let _ = writeln!(out, "  {:<LABEL_WIDTH$} {}", pdf.display_label(), pdf.url);
    }
    out.push_str(&bookmark_line(detail));
    let _ = writeln!(out);

    match &detail.body {
        DetailBody::Loading => {
            let _ = writeln!(out, "Loading full text…");
        }
        DetailBody::Text(text) | DetailBody::Snippet(text) => {
            let _ = writeln!(out, "{text}");
        }
    }
    out
}

fn bookmark_line(detail: &DetailView) -> String {
    let state = if detail.bookmarked {
        format!("{BOOKMARK_MARK} bookmarked")
    } else {
        "not bookmarked".to_string()
    };
    format!("  {:<LABEL_WIDTH$} {state}\n", "bookmark")
}

// ── Surface ──

/// Prints to stdout. Repainting an already settled reader only prints the
/// bookmark line, so a toggle does not scroll the whole text again.
#[derive(Debug, Default)]
pub struct TerminalSurface {
    settled: Option<DetailTicket>,
}

impl TerminalSurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Surface for TerminalSurface {
    fn paint_list(&mut self, list: &ListModel<'_>) {
        print!("{}", render_list(list));
    }

    fn paint_detail(&mut self, detail: &DetailView) {
        if self.settled == Some(detail.ticket) {
            print!("{}", bookmark_line(detail));
            return;
        }
        if !matches!(detail.body, DetailBody::Loading) {
            self.settled = Some(detail.ticket);
        }
        print!("{}", render_detail(detail));
    }
}

#[cfg(test)]
mod tests {
    use bulletin_core::{Action, AppState, BookmarkSet, Diagnostic, IndexDocument, Item, Pdf};

    use super::*;

    fn doc(n: usize) -> IndexDocument {
        IndexDocument {
            updated_at_utc: "2025-02-01T06:30:00+00:00".into(),
            count: Some(n as u64),
            note: Some("Daily digest".into()),
            items: (0..n)
                .map(|i| Item {
                    prid: i.to_string(),
                    ministry: "Ministry of Power".into(),
                    title: format!("Release {i}"),
                    snippet: "Grid   expansion\n plan".into(),
                    posted_on_raw: String::new(),
                    source_url: String::new(),
                    pdfs: Vec::new(),
                })
                .collect(),
        }
    }

    #[test]
    fn list_card_shows_header_rows_and_more_hint() {
        let state = AppState::new(BookmarkSet::from_iter(["1"])).apply(Action::Loaded(doc(45)));
        let out = render_list(&ListModel::from_state(&state));
        assert!(out.contains("2025-02-01 06:30 UTC"));
        assert!(out.contains("Daily digest"));
        assert!(out.contains("showing        40 of 45"));
        assert!(out.contains("   2. ★ Release 1"));
        assert!(out.contains("… 5 more"));
        assert!(out.contains("Ministry of Power · —"));
        assert!(out.contains("        Grid expansion plan\n"));
    }

    #[test]
    fn failed_load_names_the_resource() {
        let state = AppState::new(BookmarkSet::default()).apply(Action::LoadFailed(Diagnostic {
            resource: "/data/index.json".into(),
            message: "status 503".into(),
        }));
        let out = render_list(&ListModel::from_state(&state));
        assert!(out.contains("Feed unavailable"));
        assert!(out.contains("/data/index.json"));
        assert!(!out.contains("more"));
    }

    #[test]
    fn detail_card_lists_pdfs_and_falls_back_quietly() {
        let mut item = doc(1).items.remove(0);
        item.snippet = "Short summary".into();
        item.pdfs = vec![Pdf {
            url: "https://example.org/a.pdf".into(),
            label: String::new(),
        }];
        let mut view = DetailView::open(DetailTicket(1), item, true);
        assert!(render_detail(&view).contains("Loading full text"));

        view.settle(None);
        let out = render_detail(&view);
        assert!(out.contains("=== Release 0 ==="));
        assert!(out.contains("PDF            https://example.org/a.pdf"));
        assert!(out.contains("★ bookmarked"));
        assert!(out.contains("Short summary"));
        assert!(out.ends_with("Short summary\n"));
        assert!(!out.contains("unavailable"));
    }
}
