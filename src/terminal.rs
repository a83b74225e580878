use std::io::{BufRead, IsTerminal, Write};

use inquire::Text;

use crate::error::BotError;

/// Line-oriented access to the user.
pub trait Terminal {
    /// Show `prompt` and read one line of input, trimmed.
    fn ask(&mut self, prompt: &str) -> Result<String, BotError>;

    /// Print a line of output.
    fn say(&mut self, text: &str);
}

/// Ask a yes/no question. Only "y" or "yes" (any case) count as yes.
pub fn confirm(term: &mut dyn Terminal, question: &str) -> Result<bool, BotError> {
    let answer = term.ask(&format!("{question} (y/n):"))?.to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

/// Block until the user presses Enter.
pub fn pause(term: &mut dyn Terminal, prompt: &str) -> Result<(), BotError> {
    term.ask(prompt).map(|_| ())
}

/// Stdin/stdout terminal. Uses `inquire` prompts on a TTY and plain line
/// reads otherwise, so piped input works.
pub struct ConsoleTerminal {
    rich: bool,
}

impl ConsoleTerminal {
    pub fn new() -> Self {
        Self {
            rich: std::io::stdin().is_terminal() && std::io::stdout().is_terminal(),
        }
    }
}

impl Default for ConsoleTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Terminal for ConsoleTerminal {
    fn ask(&mut self, prompt: &str) -> Result<String, BotError> {
        if self.rich {
            let line = Text::new(prompt).prompt().map_err(map_inquire_err)?;
            return Ok(line.trim().to_string());
        }

        let mut stdout = std::io::stdout();
        let _ = write!(stdout, "{prompt} ");
        let _ = stdout.flush();

        let mut line = String::new();
        let read = std::io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|source| BotError::Io {
                context: "reading from stdin".into(),
                source,
            })?;
        if read == 0 {
            return Err(BotError::InputClosed);
        }
        Ok(line.trim().to_string())
    }

    fn say(&mut self, text: &str) {
        println!("{text}");
    }
}

fn map_inquire_err(e: inquire::InquireError) -> BotError {
    match e {
        inquire::InquireError::OperationCanceled | inquire::InquireError::OperationInterrupted => {
            BotError::Cancelled
        }
        inquire::InquireError::IO(source) => BotError::Io {
            context: "reading from terminal".into(),
            source,
        },
        other => BotError::Validation {
            message: format!("prompt error: {other}"),
        },
    }
}
