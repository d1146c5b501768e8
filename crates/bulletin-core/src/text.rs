//! Display text normalisation for bulletin bodies and snippets.
//!
//! Scraped press-release text arrives with ragged indentation, runs of
//! spaces and long stacks of blank lines. [`normalize_text`] folds all of
//! that into a stable shape:
//!
//! - per line: trailing whitespace removed, a leading run of two or more
//!   spaces removed, inner runs of spaces collapsed to one
//! - per document: two or more consecutive blank lines become one blank
//!   line, and the whole text is trimmed
//!
//! Carriage returns are dropped and tabs read as spaces. The routine is
//! idempotent: `normalize_text(&normalize_text(x)) == normalize_text(x)`.

/// Snippet length used by the feed generator.
pub const SNIPPET_CHARS: usize = 420;

/// Normalise body text for display.
pub fn normalize_text(input: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut blank_run = 0usize;

    for raw in input.split('\n') {
        let line = normalize_line(raw);
        if line.is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        lines.push(line);
    }

    lines.join("\n").trim().to_string()
}

fn normalize_line(raw: &str) -> String {
    let line: String = raw
        .chars()
        .filter(|&c| c != '\r')
        .map(|c| if c == '\t' { ' ' } else { c })
        .collect();
    let line = line.trim_end();

    let leading = line.len() - line.trim_start_matches(' ').len();
    let line = if leading >= 2 { &line[leading..] } else { line };

    let mut out = String::with_capacity(line.len());
    let mut prev_space = false;
    for c in line.chars() {
        if c == ' ' {
            if prev_space {
                continue;
            }
            prev_space = true;
        } else {
            prev_space = false;
        }
        out.push(c);
    }
    out
}

/// Collapse all whitespace to single spaces and cut to `max_chars`,
/// appending an ellipsis when truncated.
pub fn snippet(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let mut cut: String = flat.chars().take(max_chars).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_trailing_and_leading_runs() {
        assert_eq!(normalize_text("    Posted On: 01 FEB   \nbody"), "Posted On: 01 FEB\nbody");
    }

    #[test]
    fn single_leading_space_survives_inside_document() {
        assert_eq!(normalize_text("a\n b"), "a\n b");
    }

    #[test]
    fn collapses_inner_runs() {
        assert_eq!(normalize_text("New  Delhi,   1 Feb"), "New Delhi, 1 Feb");
    }

    #[test]
    fn collapses_blank_line_stacks() {
        assert_eq!(normalize_text("a\n\n\n\n\nb"), "a\n\nb");
        assert_eq!(normalize_text("a\n \n\t\n  \nb"), "a\n\nb");
        assert_eq!(normalize_text("a\n\nb"), "a\n\nb");
    }

    #[test]
    fn trims_document() {
        assert_eq!(normalize_text("\n\n   \n  text  \n\n"), "text");
    }

    #[test]
    fn carriage_returns_and_tabs() {
        assert_eq!(normalize_text("a\r\n\tb\t\tc\r\n"), "a\nb c");
    }

    #[test]
    fn idempotent_over_awkward_inputs() {
        let inputs = [
            "",
            "   ",
            " lone leading space",
            "\u{a0}  nbsp then spaces\n\n\n x",
            "line one  \n\n\n\n   line two\t\t end \r\n\r\n\r\n",
            "a\n \n \n \nb\n\n",
            "\t \tmixed\t indent",
            "Ministry of Finance\n\n\n\n\nUnion  Budget   2025\n    Highlights:\n  -  item",
        ];
        for input in inputs {
            let once = normalize_text(input);
            let twice = normalize_text(&once);
            assert_eq!(once, twice, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn snippet_truncates_with_ellipsis() {
        assert_eq!(snippet("a  b\n\nc", 10), "a b c");
        assert_eq!(snippet("abcdef", 3), "abc…");
    }

    #[test]
    fn snippet_counts_chars_not_bytes() {
        assert_eq!(snippet("मंत्रालय", 2).chars().count(), 3);
    }
}
