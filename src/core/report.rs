//! Run-wide result accumulation and terminal report rendering.
//!
//! Everything a run finds lands here: errors, warnings, fixes, and info are
//! collected across all files rather than aborting on the first defect. The
//! rendered summary is a parsed surface: the status-reporting tool scrapes
//! the literal `ERRORS (<n>)` and `WARNINGS (<n>)` markers from stdout, so
//! those strings are a compatibility contract.

use std::path::{Path, PathBuf};

#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<(String, Option<PathBuf>)>,
    pub warnings: Vec<(String, Option<PathBuf>)>,
    pub fixes: Vec<(String, Option<PathBuf>)>,
    pub info: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, message: impl Into<String>, path: Option<&Path>) {
        self.errors.push((message.into(), path.map(Path::to_path_buf)));
    }

    pub fn add_warning(&mut self, message: impl Into<String>, path: Option<&Path>) {
        self.warnings
            .push((message.into(), path.map(Path::to_path_buf)));
    }

    pub fn add_fix(&mut self, message: impl Into<String>, path: Option<&Path>) {
        self.fixes.push((message.into(), path.map(Path::to_path_buf)));
    }

    pub fn add_info(&mut self, message: impl Into<String>) {
        self.info.push(message.into());
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn has_fixes(&self) -> bool {
        !self.fixes.is_empty()
    }
}

/// Process exit status for a finished run: errors always fail, warnings only
/// under strict mode.
pub fn exit_code(result: &ValidationResult, strict: bool) -> u8 {
    if result.has_errors() || (strict && result.has_warnings()) {
        1
    } else {
        0
    }
}

fn display_path(path: &Path) -> String {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(&cwd).ok().map(Path::to_path_buf))
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}

fn print_located(messages: &[(String, Option<PathBuf>)], paint: impl Fn(&str) -> String) {
    let mut current: Option<&PathBuf> = None;
    for (message, path) in messages {
        match path {
            Some(p) => {
                if current != Some(p) {
                    println!("{}", paint(&format!("  {}:", display_path(p))));
                    current = Some(p);
                }
                println!("    {message}");
            }
            None => println!("  {message}"),
        }
    }
}

/// Render the full report to stdout.
pub fn print_report(result: &ValidationResult, strict: bool, dry_run: bool) {
    use colored::Colorize;

    let bar = "═".repeat(70);
    println!();
    println!("{}", bar.blue());
    let title = if dry_run {
        "  Planning Structure Validation Results (DRY RUN)"
    } else {
        "  Planning Structure Validation Results"
    };
    println!("{}", title.blue().bold());
    println!("{}", bar.blue());
    println!();

    if result.has_fixes() {
        let verb = if dry_run { "WOULD FIX" } else { "FIXED" };
        println!(
            "{}",
            format!("🔧 {} ({}):", verb, result.fixes.len()).green().bold()
        );
        print_located(&result.fixes, |s| s.green().to_string());
        println!();
    }

    if result.has_errors() {
        println!(
            "{}",
            format!("❌ ERRORS ({}):", result.errors.len()).red().bold()
        );
        print_located(&result.errors, |s| s.red().to_string());
        println!();
    } else {
        println!("{}", "✅ No errors found".green().bold());
        println!();
    }

    if result.has_warnings() {
        // Strict mode renders warnings with the error heading: the exit code
        // treats them identically, so the report does too.
        let (symbol, label) = if strict {
            ("❌", "ERRORS")
        } else {
            ("⚠️ ", "WARNINGS")
        };
        println!(
            "{}",
            format!("{} {} ({}):", symbol, label, result.warnings.len())
                .yellow()
                .bold()
        );
        print_located(&result.warnings, |s| s.yellow().to_string());
        println!();
    } else {
        println!("{}", "✅ No warnings".green().bold());
        println!();
    }

    if !result.info.is_empty() {
        println!("{}", "ℹ️  INFO:".blue().bold());
        for message in &result.info {
            println!("  {message}");
        }
        println!();
    }

    let rule = "─".repeat(70);
    println!("{}", rule.blue());
    if exit_code(result, strict) == 0 {
        println!("{}", "🎉 Validation PASSED!".green().bold());
        println!(
            "{}",
            "   Planning structure conforms to the component schemas".green()
        );
    } else {
        println!("{}", "❌ Validation FAILED".red().bold());
        if strict && result.has_warnings() {
            println!(
                "{}",
                "   (Warnings treated as errors in --strict mode)".red()
            );
        }
    }
    if dry_run && result.has_fixes() {
        println!();
        println!("{}", "   Run without --dry-run to apply fixes".blue());
    }
    println!("{}", rule.blue());
    println!();
}
