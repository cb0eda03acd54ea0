//! Line-oriented console with interrupt racing

use std::fmt::Display;
use std::future::Future;
use std::io::{self, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

/// What a prompt produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompted {
    Line(String),
    EndOfInput,
    Interrupted,
}

pub struct Console<R, W> {
    lines: Lines<R>,
    out: W,
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(input: R, out: W) -> Self {
        Self {
            lines: input.lines(),
            out,
        }
    }

    pub fn say(&mut self, text: impl Display) -> io::Result<()> {
        writeln!(self.out, "{}", text)?;
        self.out.flush()
    }

    /// Print `text` and wait for the next line, or for `interrupt`
    pub async fn prompt<I>(&mut self, text: &str, interrupt: &mut I) -> io::Result<Prompted>
    where
        I: Future<Output = ()> + Unpin,
    {
        write!(self.out, "{}", text)?;
        self.out.flush()?;

        match or_interrupt(self.lines.next_line(), interrupt).await {
            None => Ok(Prompted::Interrupted),
            Some(Ok(Some(line))) => Ok(Prompted::Line(line)),
            Some(Ok(None)) => Ok(Prompted::EndOfInput),
            Some(Err(e)) => Err(e),
        }
    }

    pub fn into_output(self) -> W {
        self.out
    }
}

/// Run `work` unless `interrupt` fires first; interrupt wins ties
pub async fn or_interrupt<T, F, I>(work: F, interrupt: &mut I) -> Option<T>
where
    F: Future<Output = T>,
    I: Future<Output = ()> + Unpin,
{
    tokio::select! {
        biased;
        _ = interrupt => None,
        value = work => Some(value),
    }
}

/// Resolves on Ctrl+C. Never resolves if the handler cannot be installed.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}

/// `exit` or `quit`, ignoring case and surrounding whitespace
pub fn is_exit_request(line: &str) -> bool {
    let normalized = line.trim().to_ascii_lowercase();
    normalized == "exit" || normalized == "quit"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::{pending, ready};

    #[tokio::test]
    async fn test_prompt_reads_lines_then_end_of_input() {
        let mut console = Console::new("first\nsecond\n".as_bytes(), Vec::new());
        let mut never = Box::pin(pending::<()>());

        assert_eq!(
            console.prompt("> ", &mut never).await.unwrap(),
            Prompted::Line("first".to_string())
        );
        assert_eq!(
            console.prompt("> ", &mut never).await.unwrap(),
            Prompted::Line("second".to_string())
        );
        assert_eq!(console.prompt("> ", &mut never).await.unwrap(), Prompted::EndOfInput);
        assert_eq!(String::from_utf8(console.into_output()).unwrap(), "> > > ");
    }

    #[tokio::test]
    async fn test_interrupt_wins_over_ready_input() {
        let mut console = Console::new("0\n".as_bytes(), Vec::new());
        let mut interrupt = ready(());
        assert_eq!(console.prompt("> ", &mut interrupt).await.unwrap(), Prompted::Interrupted);
    }

    #[test]
    fn test_exit_requests() {
        assert!(is_exit_request(" EXIT \n"));
        assert!(is_exit_request("exit"));
        assert!(is_exit_request("Quit"));
        assert!(!is_exit_request("exits"));
        assert!(!is_exit_request(""));
    }
}
