// Mon Oct 19 2026 - Alex

use crate::output::{HitEntry, ScanReport};
use crate::utils::{format_bytes, pluralize};
use colored::*;

pub struct ReportGenerator {
    use_color: bool,
    show_segments: bool,
    show_patterns: bool,
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self {
            use_color: true,
            show_segments: true,
            show_patterns: true,
        }
    }

    pub fn with_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }

    pub fn with_segments(mut self, show: bool) -> Self {
        self.show_segments = show;
        self
    }

    pub fn with_patterns(mut self, show: bool) -> Self {
        self.show_patterns = show;
        self
    }

    pub fn generate(&self, report: &ScanReport) -> String {
        let mut text = String::new();

        text.push_str(&self.header(report));
        text.push('\n');

        if self.show_segments {
            text.push_str(&self.segments(report));
            text.push('\n');
        }

        text.push_str(&self.hits(&report.hits));
        text.push('\n');
        text.push_str(&self.summary(report));
        text
    }

    fn paint(&self, s: &str, style: fn(&str) -> ColoredString) -> String {
        if self.use_color {
            style(s).to_string()
        } else {
            s.to_string()
        }
    }

    fn header(&self, report: &ScanReport) -> String {
        format!(
            "{} {}\n{} {}   {} {}\n",
            self.paint("Target:", |s| s.bold()),
            report.target,
            self.paint("CPU tier:", |s| s.bold()),
            report.tier,
            self.paint("Strategy:", |s| s.bold()),
            report.strategy,
        )
    }

    fn segments(&self, report: &ScanReport) -> String {
        let mut text = self.paint(
            &format!("{} scanned\n", pluralize(report.segments.len(), "segment", "segments")),
            |s| s.cyan(),
        );
        for segment in &report.segments {
            text.push_str(&format!(
                "  {:<24} {:>18}  {}\n",
                segment.name,
                segment.address.to_string(),
                format_bytes(segment.size as u64)
            ));
        }
        text
    }

    fn hits(&self, hits: &[HitEntry]) -> String {
        let name_width = hits.iter().map(|h| h.name.len()).max().unwrap_or(4).max(4);

        let mut text = format!("{:<name_width$}  {:>18}  {:<16}", "NAME", "ADDRESS", "SEGMENT");
        if self.show_patterns {
            text.push_str("  PATTERN");
        }
        text = self.paint(&text, |s| s.bold().underline());
        text.push('\n');

        for hit in hits {
            let (address, segment) = match (&hit.address, &hit.segment) {
                (Some(address), Some(segment)) => (
                    self.paint(&format!("{:>18}", address.to_string()), |s| s.green()),
                    segment.as_str(),
                ),
                _ => (self.paint(&format!("{:>18}", "not found"), |s| s.red()), "-"),
            };

            text.push_str(&format!("{:<name_width$}  {}  {:<16}", hit.name, address, segment));
            if self.show_patterns {
                text.push_str("  ");
                text.push_str(&self.paint(&hit.pattern, |s| s.dimmed()));
            }
            text.push('\n');
        }
        text
    }

    fn summary(&self, report: &ScanReport) -> String {
        let line = format!("{}/{} signatures found", report.found, report.total);
        if report.is_complete() {
            self.paint(&line, |s| s.green().bold())
        } else {
            self.paint(&line, |s| s.yellow().bold())
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}
