//! Interactive chat loop.
//!
//! Reads prompts from stdin one turn at a time, runs them through the
//! request pipeline, and prints the result. Exit keywords and Ctrl-C both
//! end the loop; the transport session is released on every exit path when
//! it drops at the end of [`run`].

use crate::config::Config;
use crate::ollama::{GenerateRequest, RetryPolicy, Session};
use crate::syllabus;
use anyhow::Result;
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

/// Keywords that end the conversation, matched case-insensitively.
const EXIT_WORDS: [&str; 3] = ["quit", "exit", "bye"];

/// What to do with one line of user input.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    /// End the conversation.
    Exit,
    /// Nothing usable typed; prompt again.
    Empty,
    /// A prompt to send to the model.
    Prompt(String),
}

fn parse_input(line: &str) -> Input {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Input::Empty;
    }
    if EXIT_WORDS
        .iter()
        .any(|word| trimmed.eq_ignore_ascii_case(word))
    {
        return Input::Exit;
    }
    Input::Prompt(trimmed.to_string())
}

/// Run the conversation until the user exits.
pub async fn run(config: &Config) -> Result<()> {
    clear_screen();
    println!("Welcome to the EduBot! Type 'quit', 'exit', or 'bye' to end the conversation.");

    let syllabus = syllabus::load(&config.syllabus_path);
    let session = Session::new(RetryPolicy::default());
    info!(url = %config.ollama_url, model = %config.model, "session ready");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("You: ");
        std::io::stdout().flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                println!("\nConversation ended by user.");
                break;
            }
        };

        // EOF on stdin ends the conversation like an exit keyword.
        let Some(line) = line else {
            println!("Goodbye!");
            break;
        };

        let prompt = match parse_input(&line) {
            Input::Exit => {
                println!("Goodbye!");
                break;
            }
            Input::Empty => {
                println!("Please enter a valid input.");
                continue;
            }
            Input::Prompt(prompt) => prompt,
        };

        let request = GenerateRequest::new(&config.model, &prompt, &syllabus);
        let result = tokio::select! {
            result = session.generate(&config.ollama_url, &request) => result,
            _ = tokio::signal::ctrl_c() => {
                println!("\nConversation ended by user.");
                break;
            }
        };

        match result {
            Ok(text) => println!("\nEduBot: {}\n", text),
            Err(err) => println!("\nEduBot: An error occurred: {}\n", err),
        }
    }

    Ok(())
}

/// Clear the screen before the banner, skipped when piped.
fn clear_screen() {
    if atty::is(atty::Stream::Stdout) {
        let _ = execute!(std::io::stdout(), Clear(ClearType::All), MoveTo(0, 0));
    }
}
