//! Interactive input
//!
//! The menu talks to the user through [`Prompt`]. On a terminal this is
//! dialoguer; with piped stdin (or in tests) it is a plain line reader.

use std::fmt;
use std::io::{BufRead, Write};
use std::str::FromStr;

use anyhow::Result;
use colored::Colorize;
use dialoguer::Input;

/// Input ended (EOF or interrupt) while a prompt was waiting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputClosed;

impl fmt::Display for InputClosed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("input closed")
    }
}

impl std::error::Error for InputClosed {}

/// True when an error came from the input stream ending
pub fn is_input_closed(err: &anyhow::Error) -> bool {
    err.downcast_ref::<InputClosed>().is_some()
}

/// Source of answers and sink for messages
pub trait Prompt {
    /// Show `label` and read one line of input (without the newline)
    fn ask(&mut self, label: &str) -> Result<String>;

    /// Print one line of output
    fn say(&mut self, text: &str);
}

/// dialoguer-backed prompt for interactive terminals
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn ask(&mut self, label: &str) -> Result<String> {
        Input::<String>::new()
            .with_prompt(label)
            .allow_empty(true)
            .interact_text()
            .map_err(|e| {
                log::debug!("prompt aborted: {}", e);
                InputClosed.into()
            })
    }

    fn say(&mut self, text: &str) {
        println!("{}", text);
    }
}

/// Line-based prompt over any reader/writer pair
pub struct LinePrompt<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<R: BufRead, W: Write> Prompt for LinePrompt<R, W> {
    fn ask(&mut self, label: &str) -> Result<String> {
        write!(self.writer, "{}: ", label)?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(InputClosed.into());
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn say(&mut self, text: &str) {
        let _ = writeln!(self.writer, "{}", text);
    }
}

fn complain(prompt: &mut dyn Prompt, message: &str) {
    prompt.say(&message.red().to_string());
}

/// Ask until the answer is not blank
pub fn non_empty(prompt: &mut dyn Prompt, label: &str) -> Result<String> {
    loop {
        let value = prompt.ask(label)?;
        let value = value.trim();
        if !value.is_empty() {
            return Ok(value.to_string());
        }
        complain(prompt, "Input cannot be empty. Please try again.");
    }
}

/// Ask until the answer parses
pub fn number<T: FromStr>(prompt: &mut dyn Prompt, label: &str) -> Result<T> {
    loop {
        match prompt.ask(label)?.trim().parse() {
            Ok(value) => return Ok(value),
            Err(_) => complain(prompt, "Please enter a number."),
        }
    }
}

/// Ask until the answer is a number in `[min, max]`
pub fn float_in_range(prompt: &mut dyn Prompt, label: &str, min: f64, max: f64) -> Result<f64> {
    loop {
        match prompt.ask(label)?.trim().parse::<f64>() {
            Ok(value) if value.is_finite() && (min..=max).contains(&value) => return Ok(value),
            _ => complain(
                prompt,
                &format!("Please enter a number between {:.1} and {:.1}.", min, max),
            ),
        }
    }
}

/// Ask until the answer is a year in `[min, max]`
pub fn year(prompt: &mut dyn Prompt, label: &str, min: i32, max: i32) -> Result<i32> {
    loop {
        match prompt.ask(label)?.trim().parse::<i32>() {
            Ok(value) if (min..=max).contains(&value) => return Ok(value),
            _ => complain(
                prompt,
                &format!("Please enter a valid year between {} and {}.", min, max),
            ),
        }
    }
}

/// Blank means `None`; an unparsable answer is reported and also `None`
pub fn optional<T: FromStr>(prompt: &mut dyn Prompt, label: &str, kind: &str) -> Result<Option<T>> {
    let raw = prompt.ask(label)?;
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    match raw.parse() {
        Ok(value) => Ok(Some(value)),
        Err(_) => {
            complain(prompt, &format!("Invalid {}. Leaving it blank (no filter).", kind));
            Ok(None)
        }
    }
}

/// Ask until the answer is `y` or `n`
pub fn yes_no(prompt: &mut dyn Prompt, label: &str) -> Result<bool> {
    loop {
        match prompt.ask(label)?.trim().to_lowercase().as_str() {
            "y" => return Ok(true),
            "n" => return Ok(false),
            _ => complain(prompt, "Please enter 'y' or 'n'."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn scripted(input: &str) -> LinePrompt<Cursor<Vec<u8>>, Vec<u8>> {
        LinePrompt::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output(prompt: LinePrompt<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(prompt.into_writer()).unwrap()
    }

    #[test]
    fn test_eof_is_input_closed() {
        let mut prompt = scripted("");
        let err = prompt.ask("Anything").unwrap_err();
        assert!(is_input_closed(&err));
    }

    #[test]
    fn test_non_empty_reprompts() {
        let mut prompt = scripted("\n   \nHeat\n");
        assert_eq!(non_empty(&mut prompt, "Title").unwrap(), "Heat");
        assert_eq!(output(prompt).matches("Input cannot be empty").count(), 2);
    }

    #[test]
    fn test_float_in_range_rejects_out_of_range_and_text() {
        let mut prompt = scripted("eleven\n10.5\n-1\n7.5\n");
        assert_eq!(float_in_range(&mut prompt, "Rating", 0.0, 10.0).unwrap(), 7.5);
        assert_eq!(output(prompt).matches("between 0.0 and 10.0").count(), 3);
    }

    #[test]
    fn test_year_bounds() {
        let mut prompt = scripted("1500\n2010\n");
        assert_eq!(year(&mut prompt, "Year", 1888, 2100).unwrap(), 2010);
    }

    #[test]
    fn test_optional_blank_and_invalid() {
        let mut prompt = scripted("\nabc\n9\n");
        assert_eq!(optional::<f64>(&mut prompt, "Min", "number").unwrap(), None);
        assert_eq!(optional::<f64>(&mut prompt, "Min", "number").unwrap(), None);
        assert_eq!(optional::<i32>(&mut prompt, "Year", "integer").unwrap(), Some(9));
        assert!(output(prompt).contains("Invalid number. Leaving it blank (no filter)."));
    }

    #[test]
    fn test_yes_no_loops_until_valid() {
        let mut prompt = scripted("maybe\nY\n");
        assert!(yes_no(&mut prompt, "Latest first?").unwrap());
    }

    #[test]
    fn test_number_eof_mid_loop() {
        let mut prompt = scripted("x\n");
        let err = number::<usize>(&mut prompt, "Choice").unwrap_err();
        assert!(is_input_closed(&err));
    }
}
