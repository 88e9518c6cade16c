use super::{convert, parse_amount, ui};
use crate::core::{Converter, CurrencyCode, HistoryStore};
use anyhow::Result;
use std::collections::VecDeque;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

/// Whitespace separated tokens read lazily across input lines.
struct Tokens<R> {
    reader: R,
    pending: VecDeque<String>,
}

impl<R: AsyncBufRead + Unpin> Tokens<R> {
    fn new(reader: R) -> Self {
        Tokens {
            reader,
            pending: VecDeque::new(),
        }
    }

    /// Returns `None` at end of input.
    async fn next(&mut self) -> Result<Option<String>> {
        while self.pending.is_empty() {
            let mut line = String::new();
            if self.reader.read_line(&mut line).await? == 0 {
                return Ok(None);
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_string));
        }
        Ok(self.pending.pop_front())
    }

    /// Drops whatever is left of the current line.
    fn discard_line(&mut self) {
        self.pending.clear();
    }
}

fn prompt<W: Write>(out: &mut W, text: &str) -> Result<()> {
    write!(out, "{}", ui::style_text(text, ui::StyleType::Prompt))?;
    out.flush()?;
    Ok(())
}

/// Runs the prompt loop until the amount `0` is entered or input ends.
pub async fn run<R, W>(
    input: R,
    out: &mut W,
    converter: &Converter,
    history: &dyn HistoryStore,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut tokens = Tokens::new(input);

    loop {
        prompt(out, "\nEnter amount (0 to exit): ")?;
        let Some(token) = tokens.next().await? else {
            break;
        };
        let amount = match parse_amount(&token) {
            Ok(amount) => amount,
            Err(e) => {
                writeln!(out, "{}", ui::style_text(&e.to_string(), ui::StyleType::Error))?;
                tokens.discard_line();
                continue;
            }
        };
        if amount == 0.0 {
            break;
        }

        prompt(out, "From (e.g. USD): ")?;
        let Some(from) = tokens.next().await? else {
            break;
        };
        prompt(out, "To (e.g. INR): ")?;
        let Some(to) = tokens.next().await? else {
            break;
        };

        let codes = from
            .parse::<CurrencyCode>()
            .and_then(|from| Ok((from, to.parse::<CurrencyCode>()?)));
        let outcome = match codes {
            Ok((from, to)) => {
                convert::convert_and_record(out, converter, history, amount, &from, &to).await
            }
            Err(e) => Err(e),
        };

        if let Err(e) = outcome {
            debug!(error = ?e, "Conversion failed");
            writeln!(out, "{}", ui::style_text(&e.to_string(), ui::StyleType::Error))?;
        }
    }

    debug!("Interactive session finished");
    Ok(())
}
