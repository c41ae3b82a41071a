//! Line-oriented front end for the quick-setup wizard.
//!
//! Reads one answer per line from any [`BufRead`] and writes prompts to any
//! [`Write`], so the same loop drives a terminal and the tests.

use std::io::{BufRead, Write};
use std::time::Duration;

use comfy_table::{modifiers, presets, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};
use terminal_size::{terminal_size, Width};
use thiserror::Error;

use crate::api::{load_snapshot, NetworkApi};
use crate::services::answer_store::AnswerStore;
use crate::wizard::{
    AdvanceOutcome, AnswerRecord, Choice, QuestionKey, QuestionType, ReviewLine, TourType, WizardSession,
};

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("Console I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// How an interactive run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleOutcome {
    Completed {
        network_id: String,
        tour_type: Option<TourType>,
        answers: Vec<AnswerRecord>,
    },
    Cancelled,
}

enum Command {
    Back,
    Quit,
    Keep,
    /// The reply could not be used; ask again
    Retry,
    Value(String),
}

fn parse_command(line: &str) -> Command {
    match line.trim() {
        "b" | "back" => Command::Back,
        "q" | "quit" => Command::Quit,
        "" => Command::Keep,
        other => Command::Value(other.to_string()),
    }
}

/// Questions whose answer is a list rather than a single token.
fn is_list_answer(key: QuestionKey) -> bool {
    matches!(key, QuestionKey::GatewayUsers | QuestionKey::Hosts | QuestionKey::Ranges)
}

/// Map a comma separated reply onto choice values. Numbers pick by position,
/// anything else must match a value or label exactly.
pub fn parse_selection(input: &str, choices: &[Choice]) -> Result<Vec<String>, String> {
    let mut picked = Vec::new();
    for token in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let value = match token.parse::<usize>() {
            Ok(n) if n >= 1 && n <= choices.len() => choices[n - 1].value.clone(),
            Ok(n) => return Err(format!("{} is not one of the listed options", n)),
            Err(_) => choices
                .iter()
                .find(|c| c.value == token || c.label == token)
                .map(|c| c.value.clone())
                .ok_or_else(|| format!("Unknown option '{}'", token))?,
        };
        if !picked.contains(&value) {
            picked.push(value);
        }
    }
    Ok(picked)
}

fn split_ranges(input: &str) -> Vec<String> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Table of review lines, sized to the terminal when there is one.
pub fn render_review_table(lines: &[ReviewLine]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    if let Some((Width(w), _)) = terminal_size() {
        table.set_width(w.saturating_sub(4));
    }
    table.set_header(vec!["#", "Question", "Answer", "Details"]);
    for line in lines {
        table.add_row(vec![
            (line.index + 1).to_string(),
            line.prompt.clone(),
            line.answer.clone(),
            line.answer2.clone().unwrap_or_default(),
        ]);
    }
    table
}

fn spinner(enabled: bool, message: &str) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub struct Console<R, W> {
    input: R,
    output: W,
    show_spinner: bool,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            show_spinner: true,
        }
    }

    /// Turn off the progress spinner, e.g. when output is not a terminal.
    pub fn without_spinner(mut self) -> Self {
        self.show_spinner = false;
        self
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// `None` at end of input.
    fn read_line(&mut self) -> Result<Option<String>, ConsoleError> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn print_choices(&mut self, choices: &[Choice]) -> Result<(), ConsoleError> {
        for (i, c) in choices.iter().enumerate() {
            writeln!(self.output, "  {}) {}", i + 1, c.label)?;
        }
        Ok(())
    }

    fn error(&mut self, message: &str) -> Result<(), ConsoleError> {
        writeln!(self.output, "{}", yansi::Paint::new(message).red())?;
        Ok(())
    }

    /// Ask for one answer; returns the navigation command the operator gave.
    fn ask(&mut self, session: &mut WizardSession, second: bool) -> Result<Command, ConsoleError> {
        let view = session.view();
        let question = &view.question;
        let (choices, current, list) = if second {
            (
                view.question.choices2.clone(),
                question.selected_answer2.to_list().join(", "),
                true,
            )
        } else {
            (
                view.question.choices.clone(),
                question.selected_answer.to_list().join(", "),
                is_list_answer(question.key),
            )
        };
        let typed_ranges = question.key == QuestionKey::Ranges || (second && question.key == QuestionKey::Router);

        if typed_ranges {
            writeln!(self.output, "Enter address ranges in CIDR form, separated by commas")?;
        } else {
            self.print_choices(&choices)?;
        }
        if current.is_empty() {
            write!(self.output, "> ")?;
        } else {
            write!(self.output, "[{}] > ", current)?;
        }
        self.output.flush()?;

        let Some(line) = self.read_line()? else {
            return Ok(Command::Quit);
        };
        let raw = match parse_command(&line) {
            Command::Value(raw) => raw,
            other => return Ok(other),
        };

        let values = if typed_ranges {
            split_ranges(&raw)
        } else {
            match parse_selection(&raw, &choices) {
                Ok(v) => v,
                Err(message) => {
                    self.error(&message)?;
                    return Ok(Command::Retry);
                }
            }
        };
        if list {
            session.record_answer(values, second);
        } else if let Some(first) = values.into_iter().next() {
            session.record_answer(first, second);
        }
        Ok(Command::Keep)
    }

    /// Drive `session` until it completes or the operator quits.
    pub async fn run<A: NetworkApi, S: AnswerStore>(
        &mut self,
        session: &mut WizardSession,
        api: &A,
        store: &S,
    ) -> Result<ConsoleOutcome, ConsoleError> {
        writeln!(
            self.output,
            "{}",
            yansi::Paint::new("Quick setup. Enter a number to choose, b to go back, q to quit.").bold()
        )?;
        loop {
            let view = session.view();
            writeln!(
                self.output,
                "\n{} {}",
                yansi::Paint::new(format!("[{}/{}]", view.index + 1, view.total)).cyan(),
                yansi::Paint::new(&view.question.prompt).bold()
            )?;
            if !view.question.description.is_empty() {
                writeln!(self.output, "{}", view.question.description)?;
            }

            let command = if view.question.kind == QuestionType::Review {
                writeln!(self.output, "{}", render_review_table(&session.review()))?;
                write!(self.output, "Press enter to apply > ")?;
                self.output.flush()?;
                match self.read_line()? {
                    Some(line) => parse_command(&line),
                    None => Command::Quit,
                }
            } else {
                let first = self.ask(session, false)?;
                if matches!(first, Command::Keep) && view.question.kind == QuestionType::DoubleSelect {
                    self.ask(session, true)?
                } else {
                    first
                }
            };

            match command {
                Command::Quit => {
                    session.cancel();
                    writeln!(self.output, "{}", yansi::Paint::new("Quick setup cancelled").yellow())?;
                    return Ok(ConsoleOutcome::Cancelled);
                }
                Command::Back => {
                    session.retreat();
                    continue;
                }
                Command::Retry => continue,
                Command::Keep | Command::Value(_) => {}
            }

            let pb = spinner(self.show_spinner, "Applying...");
            match load_snapshot(api).await {
                Ok(snapshot) => session.refresh_snapshot(snapshot),
                Err(e) => tracing::warn!(%e, "Could not refresh resources; using the previous snapshot"),
            }
            let result = session.advance(api, store).await;
            pb.finish_and_clear();

            match result {
                Ok(AdvanceOutcome::Moved { .. }) => {}
                Ok(AdvanceOutcome::Completed {
                    network_id,
                    tour_type,
                    answers,
                }) => {
                    writeln!(
                        self.output,
                        "{} {}",
                        yansi::Paint::new("Quick setup completed for network").green(),
                        network_id
                    )?;
                    return Ok(ConsoleOutcome::Completed {
                        network_id,
                        tour_type,
                        answers,
                    });
                }
                Err(e) => self.error(&e.to_string())?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choices() -> Vec<Choice> {
        ["alice", "bob", "carol"]
            .iter()
            .map(|v| Choice {
                value: v.to_string(),
                label: v.to_uppercase(),
            })
            .collect()
    }

    #[test]
    fn selection_accepts_numbers_values_and_labels() {
        let picked = parse_selection("1, bob,CAROL", &choices()).unwrap();
        assert_eq!(picked, vec!["alice", "bob", "carol"]);
    }

    #[test]
    fn selection_rejects_out_of_range_numbers() {
        assert!(parse_selection("4", &choices()).is_err());
        assert!(parse_selection("dave", &choices()).is_err());
    }

    #[test]
    fn selection_drops_duplicates() {
        assert_eq!(parse_selection("2,2,bob", &choices()).unwrap(), vec!["bob"]);
    }

    #[test]
    fn ranges_split_on_commas_and_spaces() {
        assert_eq!(split_ranges("10.0.0.0/8, 192.168.1.0/24  fd00::/64"), vec![
            "10.0.0.0/8",
            "192.168.1.0/24",
            "fd00::/64"
        ]);
    }

    #[test]
    fn review_table_has_a_row_per_line() {
        let lines = vec![ReviewLine {
            index: 0,
            question_key: QuestionKey::PrimaryUsecase,
            prompt: "What would you like to set up?".into(),
            answer: "Remote access".into(),
            answer2: None,
        }];
        let rendered = render_review_table(&lines).to_string();
        assert!(rendered.contains("Remote access"));
    }
}
