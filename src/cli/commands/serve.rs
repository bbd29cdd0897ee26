//! Web server command.

use console::style;

use crate::config::Settings;
use crate::ocr::check_tools;

pub const DEFAULT_BIND: &str = "0.0.0.0:8000";
const DEFAULT_PORT: u16 = 8000;

/// Start the web server.
pub async fn cmd_serve(settings: Settings, bind: &str) -> anyhow::Result<()> {
    let (host, port) = parse_bind_address(bind)?;

    let missing: Vec<_> = check_tools()
        .into_iter()
        .filter(|(_, available)| !available)
        .map(|(tool, _)| tool)
        .collect();
    if !missing.is_empty() {
        eprintln!(
            "{} Missing OCR tools: {} (PDF and image requests will fail)",
            style("!").yellow(),
            missing.join(", ")
        );
    }

    println!(
        "{} Starting doctext server at http://{}:{}",
        style("→").cyan(),
        host,
        port
    );
    println!("  Press Ctrl+C to stop");

    crate::server::serve(settings, &format!("{}:{}", host, port)).await
}

/// Parse a bind address that can be:
/// - Just a port: "8000" -> 0.0.0.0:8000
/// - Just a host: "127.0.0.1" -> 127.0.0.1:8000
/// - Host and port: "127.0.0.1:9000" -> 127.0.0.1:9000
fn parse_bind_address(bind: &str) -> anyhow::Result<(String, u16)> {
    let bind = bind.trim();
    if bind.is_empty() {
        anyhow::bail!("Bind address is empty");
    }

    if let Ok(port) = bind.parse::<u16>() {
        return Ok(("0.0.0.0".to_string(), port));
    }

    if let Some((host, port_str)) = bind.rsplit_once(':') {
        if let Ok(port) = port_str.parse::<u16>() {
            return Ok((host.to_string(), port));
        }
    }

    Ok((bind.to_string(), DEFAULT_PORT))
}
