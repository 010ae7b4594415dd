//! One-shot chat command and shared reply rendering.

use anyhow::Result;
use console::style;

use parley_types::chat::ChatResponse;

use crate::state::AppState;

/// Send one message as `user` and print the reply.
pub async fn chat_once(state: &AppState, user: &str, message: &str, json: bool) -> Result<()> {
    let response = state.orchestrator.process_message(user, message).await?;
    print_response(&response, json)
}

/// Print a reply either as JSON or as a styled block.
pub fn print_response(response: &ChatResponse, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(response)?);
        return Ok(());
    }

    println!();
    if response.is_error() {
        println!("  {} {}", style("!").yellow().bold(), style(&response.reply).yellow());
    } else {
        println!("  {}", response.reply);
    }
    println!(
        "  {}",
        style(format!(
            "{} · {}",
            response.intent,
            format_confidence(response.confidence)
        ))
        .dim()
    );
    println!();

    Ok(())
}

/// Render a 0..=1 confidence as a whole percentage.
pub fn format_confidence(confidence: f64) -> String {
    format!("{:.0}%", (confidence * 100.0).clamp(0.0, 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_is_rendered_as_percentage() {
        assert_eq!(format_confidence(0.95), "95%");
        assert_eq!(format_confidence(0.0), "0%");
        assert_eq!(format_confidence(1.0), "100%");
    }

    #[test]
    fn test_confidence_is_clamped() {
        assert_eq!(format_confidence(1.7), "100%");
        assert_eq!(format_confidence(-0.2), "0%");
    }
}
