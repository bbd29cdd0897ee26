//! OCR toolchain status.

use console::style;

use crate::ocr::{check_tools, OcrBackend, TesseractBackend};

/// Check if required OCR tools are installed.
pub fn cmd_tools() -> anyhow::Result<()> {
    println!("\n{}", style("OCR Tool Status").bold());
    println!("{}", "-".repeat(50));

    let mut all_found = true;
    for (tool, available) in check_tools() {
        let status = if available {
            style("✓ found").green()
        } else {
            all_found = false;
            style("✗ not found").red()
        };
        println!("  {:<15} {}", tool, status);
    }

    let tesseract = TesseractBackend::default();
    println!();
    if tesseract.is_available() {
        println!(
            "  {:<15} {}",
            tesseract.name(),
            style("✓ available").green()
        );
    } else {
        println!(
            "  {:<15} {}",
            tesseract.name(),
            style("✗ not available").red()
        );
        println!("                  {}", style(tesseract.availability_hint()).dim());
    }

    println!();
    if all_found {
        println!("{} All required tools are installed", style("✓").green());
    } else {
        println!(
            "{} Some tools are missing; PDF and image extraction will fail",
            style("!").yellow()
        );
    }

    Ok(())
}
