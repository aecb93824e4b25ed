//! Interactive chat loop.

use std::borrow::Cow::{self, Borrowed, Owned};
use std::io::Write;
use std::path::Path;

use docchat_core::{Controller, Model};
use owo_colors::OwoColorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use crate::output::{self, ColorMode};

const COMMANDS: [&str; 6] = ["/load", "/clear", "/history", "/model", "/help", "/quit"];

/// Completes and hints slash commands.
struct ChatHelper {
    color: ColorMode,
}

impl Helper for ChatHelper {}

impl Completer for ChatHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if !line.starts_with('/') || line.contains(' ') {
            return Ok((0, vec![]));
        }

        let candidates = COMMANDS
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for ChatHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if self.color.enabled() && line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        self.color.enabled()
    }
}

impl Hinter for ChatHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if !line.starts_with('/') || line.contains(' ') {
            return None;
        }
        COMMANDS
            .iter()
            .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
            .map(|cmd| cmd[line.len()..].to_string())
    }
}

impl Validator for ChatHelper {}

/// One line of REPL input.
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Question(&'a str),
    Load(&'a str),
    Clear,
    History,
    Model(Option<&'a str>),
    Help,
    Quit,
    Unknown(&'a str),
}

fn parse_input(line: &str) -> Input<'_> {
    let line = line.trim();
    let Some(command) = line.strip_prefix('/') else {
        return Input::Question(line);
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };
    let arg = (!arg.is_empty()).then_some(arg);

    match (name, arg) {
        ("load", Some(path)) => Input::Load(path),
        ("clear", None) => Input::Clear,
        ("history", None) => Input::History,
        ("model", arg) => Input::Model(arg),
        ("help", None) => Input::Help,
        ("quit" | "exit", None) => Input::Quit,
        _ => Input::Unknown(line),
    }
}

/// Run the chat loop until `/quit` or end of input.
pub async fn run(
    controller: &mut Controller,
    initial_file: Option<&Path>,
    color: ColorMode,
) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout();
    output::print_banner(
        &mut stdout,
        controller.settings().model,
        !controller.settings().api_key.is_empty(),
        color,
    )?;

    if let Some(path) = initial_file {
        load(controller, path, &mut stdout, color).await?;
    }

    let mut rl = Editor::new()?;
    rl.set_helper(Some(ChatHelper { color }));

    loop {
        let line = match rl.readline(">> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                output::print_notice(&mut stdout, "Interrupted. Type /quit to exit.", color)?;
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        if line.trim().is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(line.as_str());

        match parse_input(&line) {
            Input::Question(question) => ask(controller, question, &mut stdout, color).await?,
            Input::Load(path) => load(controller, Path::new(path), &mut stdout, color).await?,
            Input::Clear => {
                controller.clear();
                output::print_notice(&mut stdout, "Conversation cleared.", color)?;
            }
            Input::History => {
                output::print_history(&mut stdout, controller.session().messages(), color)?
            }
            Input::Model(None) => {
                writeln!(stdout, "Model: {}", controller.settings().model)?;
                for model in Model::ALL {
                    writeln!(stdout, "  {}", model)?;
                }
            }
            Input::Model(Some(name)) => match name.parse::<Model>() {
                Ok(model) => {
                    controller.set_model(model);
                    writeln!(stdout, "Model: {}", model)?;
                }
                Err(e) => output::print_error(&mut stdout, &e.to_string(), color)?,
            },
            Input::Help => output::print_help(&mut stdout)?,
            Input::Quit => break,
            Input::Unknown(text) => {
                output::print_error(&mut stdout, &format!("unknown command {}", text), color)?
            }
        }
    }

    Ok(())
}

async fn load(
    controller: &mut Controller,
    path: &Path,
    w: &mut dyn Write,
    color: ColorMode,
) -> anyhow::Result<()> {
    let file = match crate::read_document(path).await {
        Ok(file) => file,
        Err(e) => {
            output::print_error(w, &e.to_string(), color)?;
            return Ok(());
        }
    };

    match controller.upload(file).await {
        Ok(preview) => output::print_preview(w, &preview, color)?,
        Err(e) => output::print_error(w, &e.to_string(), color)?,
    }
    writeln!(w)?;
    Ok(())
}

async fn ask(
    controller: &mut Controller,
    question: &str,
    w: &mut dyn Write,
    color: ColorMode,
) -> anyhow::Result<()> {
    let spinner = output::thinking_spinner(color);
    let result = controller.submit(question).await;
    spinner.finish_and_clear();

    match result {
        Ok(answer) => output::print_answer(w, &answer, color)?,
        Err(e) => output::print_error(w, &e.to_string(), color)?,
    }
    Ok(())
}
