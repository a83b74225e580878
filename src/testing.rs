//! Test doubles for the terminal, gcloud and randomness seams.

use std::cell::RefCell;
use std::collections::VecDeque;

use crate::entropy::Entropy;
use crate::error::{BotError, CommandError};
use crate::gcloud::GcloudRunner;
use crate::terminal::Terminal;

/// Replays a fixed list of answers and records everything shown.
pub struct ScriptedTerminal {
    answers: VecDeque<String>,
    pub prompts: Vec<String>,
    pub said: Vec<String>,
}

impl ScriptedTerminal {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
            said: Vec::new(),
        }
    }

    pub fn transcript(&self) -> String {
        self.said.join("\n")
    }
}

impl Terminal for ScriptedTerminal {
    fn ask(&mut self, prompt: &str) -> Result<String, BotError> {
        self.prompts.push(prompt.to_string());
        self.answers
            .pop_front()
            .map(|a| a.trim().to_string())
            .ok_or(BotError::InputClosed)
    }

    fn say(&mut self, text: &str) {
        self.said.push(text.to_string());
    }
}

#[derive(Clone)]
enum Reply {
    Ok(String),
    Fail(String),
}

/// Answers `gcloud` calls by matching a substring of the joined arguments.
/// Replies registered for the same pattern are handed out in order, the last
/// one repeating. Unmatched calls succeed with empty output.
#[derive(Default)]
pub struct FakeGcloud {
    replies: RefCell<Vec<(String, VecDeque<Reply>)>>,
    pub calls: RefCell<Vec<Vec<String>>>,
    pub interactive: RefCell<Vec<Vec<String>>>,
    interactive_fails: bool,
}

impl FakeGcloud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(self, pattern: &str, output: &str) -> Self {
        self.push(pattern, Reply::Ok(output.to_string()))
    }

    pub fn fail_on(self, pattern: &str, output: &str) -> Self {
        self.push(pattern, Reply::Fail(output.to_string()))
    }

    /// Make every interactive command exit non-zero.
    pub fn fail_interactive(mut self) -> Self {
        self.interactive_fails = true;
        self
    }

    fn push(self, pattern: &str, reply: Reply) -> Self {
        {
            let mut replies = self.replies.borrow_mut();
            match replies.iter_mut().find(|(p, _)| p.as_str() == pattern) {
                Some((_, queue)) => queue.push_back(reply),
                None => replies.push((pattern.to_string(), VecDeque::from([reply]))),
            }
        }
        self
    }

    pub fn calls_matching(&self, pattern: &str) -> Vec<Vec<String>> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.join(" ").contains(pattern))
            .cloned()
            .collect()
    }

    fn reply_for(&self, joined: &str) -> Option<Reply> {
        let mut replies = self.replies.borrow_mut();
        let (_, queue) = replies
            .iter_mut()
            .find(|(p, _)| joined.contains(p.as_str()))?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

impl GcloudRunner for FakeGcloud {
    fn run(&self, args: &[&str]) -> Result<String, CommandError> {
        let joined = args.join(" ");
        self.calls
            .borrow_mut()
            .push(args.iter().map(|a| a.to_string()).collect());
        match self.reply_for(&joined) {
            Some(Reply::Ok(out)) => Ok(out),
            Some(Reply::Fail(out)) => Err(CommandError {
                command: format!("gcloud {joined}"),
                reason: "exited with exit status: 1".into(),
                output: out,
            }),
            None => Ok(String::new()),
        }
    }

    fn run_interactive(&self, args: &[&str]) -> Result<(), CommandError> {
        self.interactive
            .borrow_mut()
            .push(args.iter().map(|a| a.to_string()).collect());
        if self.interactive_fails {
            return Err(CommandError {
                command: format!("gcloud {}", args.join(" ")),
                reason: "exited with exit status: 1".into(),
                output: String::new(),
            });
        }
        Ok(())
    }
}

/// Returns queued values (reduced modulo the bound), then zeros.
pub struct FixedEntropy(VecDeque<usize>);

impl FixedEntropy {
    pub fn new(values: impl IntoIterator<Item = usize>) -> Self {
        Self(values.into_iter().collect())
    }
}

impl Entropy for FixedEntropy {
    fn below(&mut self, bound: usize) -> usize {
        self.0.pop_front().unwrap_or(0) % bound
    }
}
