//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use anyhow::Result;
use console::Term;
use console::style;
use dirpack_core::ArchiveReport;
use dirpack_core::ExtractionReport;
use dirpack_core::ResolvedName;
use dirpack_core::inspect::MemberInfo;
use dirpack_core::inspect::MemberKind;
use std::path::Path;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.1} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.1} KB", bytes as f64 / KB as f64)
        } else {
            format!("{bytes} B")
        }
    }

    fn format_number(n: usize) -> String {
        let s = n.to_string();
        let mut result = String::new();
        let mut count = 0;

        for c in s.chars().rev() {
            if count == 3 {
                result.push(',');
                count = 0;
            }
            result.push(c);
            count += 1;
        }

        result.chars().rev().collect()
    }

    /// One-character type column, `e` marks an empty-directory member.
    const fn kind_char(kind: MemberKind) -> char {
        match kind {
            MemberKind::File => '-',
            MemberKind::EmptyDir => 'e',
            MemberKind::Dir => 'd',
            MemberKind::Symlink => 'l',
        }
    }

    fn line(&self, text: &str) {
        let _ = self.term.write_line(text);
    }

    /// Writes an indented `label: value` row with values aligned at `width`.
    fn row(&self, label: &str, value: impl std::fmt::Display, width: usize) {
        self.line(&format!("  {:<width$} {value}", format!("{label}:")));
    }

    fn headline(&self, message: &str) {
        if self.use_colors {
            self.line(&format!("{} {message}", style("✓").green().bold()));
        } else {
            self.line(message);
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_archive_result(&self, report: &ArchiveReport) -> Result<()> {
        const W: usize = 17;

        if self.quiet {
            return Ok(());
        }

        self.headline(&format!(
            "Archive created: {}",
            report.archive_path.display()
        ));
        self.line("");
        self.row("Files added", Self::format_number(report.files_added), W);
        self.row("Empty dirs", Self::format_number(report.empty_dirs_added), W);
        if report.symlinks_added > 0 {
            self.row("Symlinks", Self::format_number(report.symlinks_added), W);
        }
        self.row("Total size", Self::format_size(report.bytes_read), W);
        self.row("Archive size", Self::format_size(report.bytes_compressed), W);

        if self.verbose {
            self.row("Format", report.format, W);
            self.row(
                "Compression",
                format!("{:.1}%", report.compression_percentage()),
                W,
            );
            self.row("Duration", format!("{:?}", report.duration), W);
        }

        if report.entries_skipped > 0 {
            self.row("Skipped", report.entries_skipped, W);
        }

        if report.has_warnings() {
            self.line("");
            if self.use_colors {
                self.line(&style("Warnings:").yellow().bold().to_string());
            } else {
                self.line("Warnings:");
            }
            for warning in &report.warnings {
                self.line(&format!("  - {warning}"));
            }
        }

        Ok(())
    }

    fn format_extraction_result(
        &self,
        destination: &Path,
        report: &ExtractionReport,
    ) -> Result<()> {
        const W: usize = 20;

        if self.quiet {
            return Ok(());
        }

        self.headline(&format!(
            "Extraction complete: {} ({} items)",
            destination.display(),
            Self::format_number(report.total_items())
        ));
        self.row("Files extracted", Self::format_number(report.files_extracted), W);
        self.row("Directories", Self::format_number(report.directories_created), W);
        if report.symlinks_created > 0 {
            self.row("Symlinks", Self::format_number(report.symlinks_created), W);
        }
        self.row("Total size", Self::format_size(report.bytes_written), W);

        if self.verbose {
            self.row("Timestamps restored", report.timestamps_restored, W);
            self.row("Duration", format!("{:?}", report.duration), W);
        }

        Ok(())
    }

    fn format_resolved_name(&self, resolved: &ResolvedName) -> Result<()> {
        let archive = resolved.archive_filename.display().to_string();

        if self.quiet {
            self.line(&archive);
            return Ok(());
        }

        let directory = if resolved.directory.as_os_str().is_empty() {
            ".".to_string()
        } else {
            resolved.directory.display().to_string()
        };
        self.line(&format!("Directory: {directory}"));
        self.line(&format!("Archive:   {archive}"));

        Ok(())
    }

    fn format_members_short(&self, members: &[MemberInfo]) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        for member in members {
            self.line(&member.name);
        }

        Ok(())
    }

    fn format_members_long(&self, members: &[MemberInfo], human_readable: bool) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        let mut total_size = 0u64;
        let mut files = 0usize;

        for member in members {
            let size = if human_readable {
                Self::format_size(member.size)
            } else {
                member.size.to_string()
            };
            let modified = member
                .timestamp
                .map_or_else(|| "-".to_string(), |t| t.to_string());

            self.line(&format!(
                "{} {size:>10}  {modified:<19}  {}",
                Self::kind_char(member.kind),
                member.name
            ));

            if member.kind == MemberKind::File {
                files += 1;
                total_size += member.size;
            }
        }

        self.line("");
        self.line(&format!(
            "Total: {} files, {}",
            Self::format_number(files),
            Self::format_size(total_size)
        ));

        Ok(())
    }

    fn format_error(&self, _operation: &str, error: &anyhow::Error) {
        // shown even with --quiet
        let term = Term::stderr();
        let prefix = if self.use_colors {
            style("ERROR:").red().bold().to_string()
        } else {
            "ERROR:".to_string()
        };
        let _ = term.write_line(&format!("{prefix} {error:?}"));
    }
}
