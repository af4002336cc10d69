//! Re-parse generated markdown into display lines.
//!
//! Models do not follow the requested layout exactly, so the text is
//! classified line by line with a few heuristics rather than parsed as
//! markdown.

use serde::Serialize;

/// Section headings requested by the prompts.
const SECTION_HEADINGS: &[&str] = &[
    "EXECUTIVE SUMMARY",
    "KEY FINDINGS",
    "CRITICAL METRICS",
    "AREAS OF CONCERN",
    "RECOMMENDATIONS",
    "SUCCESS INDICATORS",
    "NEXT STEPS",
    "ENHANCED REPORT SUMMARY",
    "KEY INSIGHTS",
    "EXTRACTED METRICS",
    "IDENTIFIED RISKS",
    "STRATEGIC RECOMMENDATIONS",
    "PROPOSED KPIs",
    "IMPLEMENTATION ROADMAP",
    "FOLLOW-UP REQUIREMENTS",
];

/// Markers that make a line a heading wherever they appear.
const HEADING_MARKERS: &[&str] = &["Priority:", "KPI", "Week", "Month"];

/// One display line of a formatted report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReportLine {
    /// Empty line, rendered as a break.
    Blank,
    /// Emphasized line.
    Heading { text: String },
    /// `label: value` pair, split at the first colon.
    Labeled { label: String, value: String },
    /// Anything else.
    Plain { text: String },
}

/// Classify every line of `content`.
#[must_use]
pub fn format_report(content: &str) -> Vec<ReportLine> {
    content.lines().map(classify).collect()
}

fn classify(line: &str) -> ReportLine {
    if line.trim().is_empty() {
        return ReportLine::Blank;
    }

    let text = clean(line);
    if is_heading(&text) {
        return ReportLine::Heading { text };
    }

    match text.split_once(':') {
        Some((label, value)) => ReportLine::Labeled {
            label: label.to_owned(),
            value: value.to_owned(),
        },
        None => ReportLine::Plain { text },
    }
}

/// Strip up to six leading `#`s, every `**` and a leading bullet.
fn clean(line: &str) -> String {
    let mut text = line;

    let hashes = text.chars().take_while(|&c| c == '#').count().min(6);
    if hashes > 0 {
        text = text[hashes..].trim_start();
    }

    let text = text.replace("**", "");
    let text = text
        .strip_prefix('•')
        .map_or(text.as_str(), str::trim_start);

    text.trim().to_owned()
}

fn is_heading(text: &str) -> bool {
    SECTION_HEADINGS.iter().any(|h| text.contains(h))
        || HEADING_MARKERS.iter().any(|m| text.contains(m))
        || text.starts_with("Insight")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(text: &str) -> ReportLine {
        ReportLine::Plain {
            text: text.to_owned(),
        }
    }

    #[test]
    fn test_blank_lines() {
        assert_eq!(format_report("a\n\n   \nb"), vec![plain("a"), ReportLine::Blank, ReportLine::Blank, plain("b")]);
    }

    #[test]
    fn test_section_heading() {
        assert_eq!(
            format_report("## KEY INSIGHTS"),
            vec![ReportLine::Heading {
                text: "KEY INSIGHTS".to_owned()
            }]
        );
    }

    #[test]
    fn test_markers_make_headings() {
        for line in ["**High Priority**: fix pumps", "• Week 1-2: survey", "Insight 3 shows gains", "Proposed KPI list"] {
            assert!(
                matches!(classify(line), ReportLine::Heading { .. }),
                "{line} should be a heading"
            );
        }
    }

    #[test]
    fn test_labeled_split_at_first_colon() {
        assert_eq!(
            classify("• **Budget**: $45,000: approved"),
            ReportLine::Labeled {
                label: "Budget".to_owned(),
                value: " $45,000: approved".to_owned(),
            }
        );
    }

    #[test]
    fn test_plain_line_cleaned() {
        assert_eq!(classify("### **Crews dispatched**  "), plain("Crews dispatched"));
    }

    #[test]
    fn test_at_most_six_hashes_stripped() {
        assert_eq!(classify("####### deep"), plain("# deep"));
    }
}
