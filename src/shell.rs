// 🖥️ Shell - Line-oriented command loop over the AggregationEngine
//
// Commands:
//   summary by zip | summary by naics | general summary | history | quit
//
// Every entered command is kept in history, including unknown ones.
// End of input behaves like quit.

use crate::aggregation::{AggregationEngine, Clock, PostalCodeSummary};
use crate::error::QueryError;
use anyhow::Result;
use serde::Serialize;
use std::collections::VecDeque;
use std::io::{BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SummaryByZip,
    SummaryByNaics,
    GeneralSummary,
    History,
    Quit,
}

impl Command {
    /// Match a trimmed input line against the known commands
    pub fn parse(input: &str) -> Option<Command> {
        match input {
            "summary by zip" => Some(Command::SummaryByZip),
            "summary by naics" => Some(Command::SummaryByNaics),
            "general summary" => Some(Command::GeneralSummary),
            "history" => Some(Command::History),
            "quit" => Some(Command::Quit),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct PostalCodeReport<'a> {
    postal_code: &'a str,
    #[serde(flatten)]
    summary: PostalCodeSummary,
}

pub struct Shell<'a, R, W> {
    engine: AggregationEngine<'a>,
    clock: &'a dyn Clock,
    input: R,
    output: W,
    format: OutputFormat,
    history: VecDeque<String>,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    pub fn new(engine: AggregationEngine<'a>, clock: &'a dyn Clock, input: R, output: W) -> Self {
        Shell {
            engine,
            clock,
            input,
            output,
            format: OutputFormat::Text,
            history: VecDeque::new(),
        }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Commands entered so far, oldest first
    pub fn history(&self) -> impl Iterator<Item = &str> {
        self.history.iter().map(String::as_str)
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Read and dispatch commands until quit or end of input
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.prompt("> ")?;
            let Some(line) = self.read_line()? else {
                break;
            };

            let command = line.trim().to_string();
            self.history.push_back(command.clone());

            match Command::parse(&command) {
                Some(Command::SummaryByZip) => self.summary_by_zip()?,
                Some(Command::SummaryByNaics) => self.summary_by_naics()?,
                Some(Command::GeneralSummary) => self.general_summary()?,
                Some(Command::History) => self.print_history()?,
                Some(Command::Quit) => break,
                None => writeln!(self.output, "Command not recognized.")?,
            }
        }

        self.output.flush()?;
        Ok(())
    }

    // ========================================================================
    // COMMANDS
    // ========================================================================

    fn summary_by_zip(&mut self) -> Result<()> {
        self.prompt("Enter a zip code: ")?;
        let Some(zip) = self.read_line()? else {
            return Ok(());
        };

        let summary = self.engine.summary_by_postal_code(&zip);
        match self.format {
            OutputFormat::Text => {
                writeln!(self.output, "{} Business Summary", zip)?;
                writeln!(self.output, "Total Businesses: {}", summary.total_count)?;
                writeln!(
                    self.output,
                    "Business Types: {}",
                    summary.distinct_classification_code_count
                )?;
                writeln!(self.output, "Neighborhoods: {}", summary.distinct_neighborhood_count)?;
            }
            OutputFormat::Json => {
                let report = PostalCodeReport {
                    postal_code: &zip,
                    summary,
                };
                self.write_json(&report)?;
            }
        }
        Ok(())
    }

    fn summary_by_naics(&mut self) -> Result<()> {
        self.prompt("Enter NAICS code: ")?;
        let Some(code) = self.read_line()? else {
            return Ok(());
        };

        match (self.engine.summary_by_classification_code(&code), self.format) {
            (Ok(summary), OutputFormat::Text) => {
                writeln!(self.output, "Total businesses: {}", summary.total_count)?;
                writeln!(self.output, "Zip Codes: {}", summary.distinct_postal_code_count)?;
                writeln!(self.output, "Neighborhood: {}", summary.distinct_neighborhood_count)?;
            }
            (Ok(summary), OutputFormat::Json) => self.write_json(&summary)?,
            (Err(err @ QueryError::NotFound { .. }), OutputFormat::Text) => {
                writeln!(self.output, "{}", err)?;
            }
            (Err(QueryError::NotFound { code }), OutputFormat::Json) => {
                self.write_json(&serde_json::json!({ "error": "not_found", "code": code }))?;
            }
        }
        Ok(())
    }

    fn general_summary(&mut self) -> Result<()> {
        let summary = self.engine.general_summary_now(self.clock);
        match self.format {
            OutputFormat::Text => {
                writeln!(self.output, "Total Businesses: {}", summary.total_businesses)?;
                writeln!(self.output, "Closed Businesses: {}", summary.closed_businesses)?;
                writeln!(
                    self.output,
                    "New Business in last year: {}",
                    summary.new_businesses_last_year
                )?;
            }
            OutputFormat::Json => self.write_json(&summary)?,
        }
        Ok(())
    }

    fn print_history(&mut self) -> Result<()> {
        writeln!(self.output, "Command history")?;
        for command in &self.history {
            writeln!(self.output, "{}", command)?;
        }
        Ok(())
    }

    // ========================================================================
    // I/O HELPERS
    // ========================================================================

    fn prompt(&mut self, text: &str) -> Result<()> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;
        Ok(())
    }

    /// Next line without its line ending; None at end of input
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let len = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(len);
        Ok(Some(line))
    }

    fn write_json<T: Serialize>(&mut self, value: &T) -> Result<()> {
        serde_json::to_writer(&mut self.output, value)?;
        writeln!(self.output)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::FixedClock;
    use crate::business::BusinessRecord;
    use crate::store::RecordStore;
    use chrono::NaiveDate;
    use std::io::Cursor;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn store() -> RecordStore {
        RecordStore::from_records(vec![
            BusinessRecord::new("Acme", "1 Main St", "Springfield", "IL", "62704", "541110", "Downtown", date(2020, 1, 15)),
            BusinessRecord::new("Beta", "2 Main St", "Springfield", "IL", "62704", "722511", "Eastside", date(2024, 3, 1)),
            BusinessRecord::new("Gamma", "3 Oak Ave", "Springfield", "IL", "62701", "722511", "Uptown", date(2010, 5, 5))
                .with_closure_date(date(2000, 1, 1)),
        ])
    }

    fn run_session(input: &str, format: OutputFormat) -> (String, Vec<String>) {
        let store = store();
        let clock = FixedClock(date(2024, 6, 15));
        let mut shell = Shell::new(
            AggregationEngine::new(&store),
            &clock,
            Cursor::new(input.to_string()),
            Vec::new(),
        )
        .with_format(format);

        shell.run().unwrap();
        let history = shell.history().map(str::to_string).collect();
        let output = String::from_utf8(shell.into_output()).unwrap();
        (output, history)
    }

    #[test]
    fn test_command_parse() {
        assert_eq!(Command::parse("summary by zip"), Some(Command::SummaryByZip));
        assert_eq!(Command::parse("summary by naics"), Some(Command::SummaryByNaics));
        assert_eq!(Command::parse("general summary"), Some(Command::GeneralSummary));
        assert_eq!(Command::parse("history"), Some(Command::History));
        assert_eq!(Command::parse("quit"), Some(Command::Quit));
        assert_eq!(Command::parse("Summary By Zip"), None);
        assert_eq!(Command::parse(""), None);
    }

    #[test]
    fn test_summary_by_zip_text() {
        let (output, _) = run_session("summary by zip\n62704\nquit\n", OutputFormat::Text);

        assert!(output.contains("Enter a zip code: "));
        assert!(output.contains("62704 Business Summary\n"));
        assert!(output.contains("Total Businesses: 2\n"));
        assert!(output.contains("Business Types: 2\n"));
        assert!(output.contains("Neighborhoods: 2\n"));
    }

    #[test]
    fn test_summary_by_zip_no_match() {
        let (output, _) = run_session("summary by zip\n00000\nquit\n", OutputFormat::Text);

        assert!(output.contains("00000 Business Summary\n"));
        assert!(output.contains("Total Businesses: 0\n"));
        assert!(output.contains("Business Types: 0\n"));
    }

    #[test]
    fn test_summary_by_naics_text() {
        let (output, _) = run_session("summary by naics\n 722511 \nquit\n", OutputFormat::Text);

        assert!(output.contains("Enter NAICS code: "));
        assert!(output.contains("Total businesses: 2\n"));
        assert!(output.contains("Zip Codes: 2\n"));
        assert!(output.contains("Neighborhood: 2\n"));
    }

    #[test]
    fn test_summary_by_naics_not_found() {
        let (output, _) = run_session("summary by naics\n999999\nquit\n", OutputFormat::Text);

        assert!(output.contains("No businesses found for NAICS code 999999\n"));
        assert!(!output.contains("Total businesses"));
    }

    #[test]
    fn test_general_summary_text() {
        let (output, _) = run_session("general summary\nquit\n", OutputFormat::Text);

        assert!(output.contains("Total Businesses: 3\n"));
        assert!(output.contains("Closed Businesses: 1\n"));
        assert!(output.contains("New Business in last year: 1\n"));
    }

    #[test]
    fn test_unknown_command_and_history() {
        let (output, history) = run_session(
            "  general summary  \nfoo\nhistory\nquit\n",
            OutputFormat::Text,
        );

        assert!(output.contains("Command not recognized.\n"));
        assert!(output.contains("Command history\ngeneral summary\nfoo\nhistory\n"));
        assert_eq!(history, vec!["general summary", "foo", "history", "quit"]);
    }

    #[test]
    fn test_end_of_input_stops_loop() {
        let (output, history) = run_session("general summary\n", OutputFormat::Text);

        assert!(output.contains("Total Businesses: 3\n"));
        assert!(output.ends_with("> "));
        assert_eq!(history, vec!["general summary"]);
    }

    #[test]
    fn test_json_output() {
        let (output, _) = run_session(
            "summary by zip\n62704\nsummary by naics\n541110\nsummary by naics\nnope\ngeneral summary\nquit\n",
            OutputFormat::Json,
        );

        let values: Vec<serde_json::Value> = output
            .lines()
            .filter_map(|line| line.find('{').map(|start| &line[start..]))
            .map(|json| serde_json::from_str(json).unwrap())
            .collect();

        assert_eq!(values.len(), 4);
        assert_eq!(values[0]["postal_code"], "62704");
        assert_eq!(values[0]["total_count"], 2);
        assert_eq!(values[1]["code"], "541110");
        assert_eq!(values[1]["total_count"], 1);
        assert_eq!(values[2]["error"], "not_found");
        assert_eq!(values[2]["code"], "nope");
        assert_eq!(values[3]["total_businesses"], 3);
        assert_eq!(values[3]["closed_businesses"], 1);
    }
}
