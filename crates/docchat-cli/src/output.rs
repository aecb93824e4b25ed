use std::io::Write;
use std::time::Duration;

use docchat_core::{DocumentPreview, Message, Model, Role};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print the document name, its first characters and the total count.
pub fn print_preview(
    w: &mut dyn Write,
    preview: &DocumentPreview,
    color: ColorMode,
) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{} {}", "Document:".bold(), preview.name.cyan())?;
    } else {
        writeln!(w, "Document: {}", preview.name)?;
    }
    writeln!(w)?;
    writeln!(w, "{}", preview.preview)?;
    writeln!(w)?;

    let count = format!("Total characters: {}", preview.total_chars);
    if color.enabled() {
        writeln!(w, "{}", count.dimmed())?;
    } else {
        writeln!(w, "{}", count)?;
    }
    Ok(())
}

pub fn print_full_text(
    w: &mut dyn Write,
    name: &str,
    text: &str,
    color: ColorMode,
) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{}", format!("--- {} ---", name).dimmed())?;
    } else {
        writeln!(w, "--- {} ---", name)?;
    }
    writeln!(w, "{}", text)?;
    Ok(())
}

pub fn print_answer(w: &mut dyn Write, answer: &str, color: ColorMode) -> std::io::Result<()> {
    print_message(w, &Message::assistant(answer), color)
}

/// Print one history entry, labelled by who wrote it.
pub fn print_message(w: &mut dyn Write, message: &Message, color: ColorMode) -> std::io::Result<()> {
    match (message.role(), color.enabled()) {
        (Role::User, true) => writeln!(w, "{}", "You:".green().bold())?,
        (Role::User, false) => writeln!(w, "You:")?,
        (Role::Assistant, true) => writeln!(w, "{}", "AI Assistant:".blue().bold())?,
        (Role::Assistant, false) => writeln!(w, "AI Assistant:")?,
    }
    writeln!(w, "{}", message.content())?;
    writeln!(w)?;
    Ok(())
}

/// Print the whole conversation, oldest first.
pub fn print_history(w: &mut dyn Write, messages: &[Message], color: ColorMode) -> std::io::Result<()> {
    if messages.is_empty() {
        return print_notice(
            w,
            "No messages yet. Load a document and start asking questions!",
            color,
        );
    }

    for message in messages {
        print_message(w, message, color)?;
    }
    Ok(())
}

pub fn print_notice(w: &mut dyn Write, text: &str, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{}", text.bright_black())
    } else {
        writeln!(w, "{}", text)
    }
}

pub fn print_error(w: &mut dyn Write, text: &str, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{} {}", "Error:".red().bold(), text)
    } else {
        writeln!(w, "Error: {}", text)
    }
}

pub fn print_banner(
    w: &mut dyn Write,
    model: Model,
    api_key_configured: bool,
    color: ColorMode,
) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{}", "=== AI Document Assistant ===".bright_magenta().bold())?;
    } else {
        writeln!(w, "=== AI Document Assistant ===")?;
    }
    writeln!(w, "Model: {}", model)?;
    if !api_key_configured {
        let msg = "No API key configured. Set GEMINI_API_KEY or pass --api-key.";
        if color.enabled() {
            writeln!(w, "{}", msg.yellow())?;
        } else {
            writeln!(w, "{}", msg)?;
        }
    }
    print_notice(w, "Type /help for commands, /quit to exit.", color)?;
    writeln!(w)?;
    Ok(())
}

pub fn print_help(w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "  /load <path>    Load a PDF, DOCX or text document")?;
    writeln!(w, "  /clear          Forget the conversation and the document")?;
    writeln!(w, "  /history        Show the conversation so far")?;
    writeln!(w, "  /model [name]   Show or change the model")?;
    writeln!(w, "  /help           Show this help")?;
    writeln!(w, "  /quit           Exit")?;
    writeln!(w)?;
    Ok(())
}

/// A spinner shown while waiting on the model. Hidden without color, so
/// piped output stays clean.
pub fn thinking_spinner(color: ColorMode) -> ProgressBar {
    if !color.enabled() {
        return ProgressBar::hidden();
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("AI is thinking...");
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}
