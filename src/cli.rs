//! OpeningTrainer - Text Protocol Module
//!
//! Line-oriented command loop driving a `Trainer`. Every response goes to the
//! output writer, one line per fact, so the loop can sit behind a GUI the
//! same way a UCI engine does.
//!
//! Commands:
//!     new [white|black]   start over, optionally switching sides
//!     move <m> | <m>      submit a move in SAN or coordinates
//!     hint                theoretical moves from here
//!     line                name of the line the position belongs to
//!     legal               all legal moves (for highlighting)
//!     history             moves played so far
//!     lines               names of every configured line
//!     d                   board diagram and FEN
//!     fen                 FEN only
//!     help, quit

use std::io::{self, BufRead, Write};

use rand::rngs::StdRng;

use crate::board::Board;
use crate::graph::OpeningGraph;
use crate::trainer::{Side, Trainer, Verdict};

pub struct TrainerProtocol<'g> {
    trainer: Trainer<'g, StdRng>,
    line_names: Vec<String>,
    running: bool,
}

impl<'g> TrainerProtocol<'g> {
    pub fn new(graph: &'g OpeningGraph, side: Side, rng: StdRng, line_names: Vec<String>) -> Self {
        TrainerProtocol {
            trainer: Trainer::new(graph, side, rng),
            line_names,
            running: true,
        }
    }

    pub fn trainer(&self) -> &Trainer<'g, StdRng> {
        &self.trainer
    }

    /// Read commands until `quit` or end of input.
    pub fn run<In: BufRead, Out: Write>(&mut self, input: In, out: &mut Out) -> io::Result<()> {
        self.greet(out)?;
        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if !line.is_empty() {
                self.process_command(line, out)?;
                out.flush()?;
            }
            if !self.running {
                break;
            }
        }
        Ok(())
    }

    fn greet<Out: Write>(&self, out: &mut Out) -> io::Result<()> {
        writeln!(
            out,
            "info string {} v{} - {} lines loaded, you play {}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            self.line_names.len(),
            self.trainer.side()
        )?;
        self.report_opening_move(out)
    }

    /// When playing Black the opponent has already moved.
    fn report_opening_move<Out: Write>(&self, out: &mut Out) -> io::Result<()> {
        if let Some(first) = self.trainer.history().first() {
            writeln!(out, "reply {}", first)?;
        }
        Ok(())
    }

    pub fn process_command<Out: Write>(&mut self, line: &str, out: &mut Out) -> io::Result<()> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, args)) = parts.split_first() else {
            return Ok(());
        };

        match command {
            "new" => self.cmd_new(args, out),
            "move" => match args.first() {
                Some(mv) => self.cmd_move(mv, out),
                None => writeln!(out, "error move needs an argument"),
            },
            "hint" => self.cmd_hint(out),
            "line" => self.cmd_line(out),
            "legal" => writeln!(out, "legal {}", self.trainer.legal_moves().join(" ")),
            "history" => writeln!(out, "history {}", self.trainer.history().join(" ")),
            "lines" => self.cmd_lines(out),
            "d" => self.cmd_display(out),
            "fen" => writeln!(out, "fen {}", self.trainer.position()),
            "help" => self.cmd_help(out),
            "quit" => {
                self.running = false;
                Ok(())
            }
            _ => self.cmd_move(command, out),
        }
    }

    fn cmd_new<Out: Write>(&mut self, args: &[&str], out: &mut Out) -> io::Result<()> {
        match args.first().map(|s| s.parse::<Side>()) {
            Some(Ok(side)) => self.trainer.restart_as(side),
            Some(Err(message)) => return writeln!(out, "error {}", message),
            None => self.trainer.reset(),
        }
        writeln!(out, "new game, you play {}", self.trainer.side())?;
        self.report_opening_move(out)
    }

    fn cmd_move<Out: Write>(&mut self, mv: &str, out: &mut Out) -> io::Result<()> {
        match self.trainer.submit(mv) {
            Verdict::Correct { played, reply } => {
                writeln!(out, "ok {}", played)?;
                if let Some(reply) = reply {
                    writeln!(out, "reply {}", reply)?;
                }
                if self.trainer.is_finished() {
                    writeln!(out, "line complete")?;
                }
                Ok(())
            }
            Verdict::OffBook { played, expected } => {
                writeln!(out, "offbook {} expected {}", played, expected.join(" "))
            }
            Verdict::Illegal => writeln!(out, "illegal {}", mv),
            Verdict::Finished => writeln!(out, "line complete"),
        }
    }

    fn cmd_hint<Out: Write>(&self, out: &mut Out) -> io::Result<()> {
        let hint = self.trainer.hint();
        if hint.is_empty() {
            writeln!(out, "line complete")
        } else {
            writeln!(out, "hint {}", hint.join(" "))
        }
    }

    fn cmd_line<Out: Write>(&self, out: &mut Out) -> io::Result<()> {
        match self.trainer.current_line() {
            Some(name) => writeln!(out, "line {}", name),
            None => writeln!(out, "line none"),
        }
    }

    fn cmd_lines<Out: Write>(&self, out: &mut Out) -> io::Result<()> {
        for name in &self.line_names {
            writeln!(out, "lines {}", name)?;
        }
        Ok(())
    }

    fn cmd_display<Out: Write>(&self, out: &mut Out) -> io::Result<()> {
        if let Ok(board) = Board::from_fen(self.trainer.position().as_str()) {
            writeln!(out, "{}", board.display())?;
        }
        writeln!(out, "FEN: {}", self.trainer.position())?;
        match self.trainer.current_line() {
            Some(name) => writeln!(out, "Line: {}", name),
            None => Ok(()),
        }
    }

    fn cmd_help<Out: Write>(&self, out: &mut Out) -> io::Result<()> {
        for usage in [
            "new [white|black]",
            "move <m> | <m>",
            "hint",
            "line",
            "legal",
            "history",
            "lines",
            "d",
            "fen",
            "quit",
        ] {
            writeln!(out, "help {}", usage)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repertoire::OpeningLine;
    use rand::SeedableRng;

    fn session(script: &str, side: Side) -> String {
        let mut graph = OpeningGraph::new();
        graph
            .ingest_lines(&[OpeningLine::new("Test Line", ["e4", "e5", "Nf3"])])
            .unwrap();
        let mut protocol =
            TrainerProtocol::new(&graph, side, StdRng::seed_from_u64(1), vec!["Test Line".to_string()]);
        let mut out = Vec::new();
        protocol.run(script.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn plays_a_line_through() {
        let out = session("e4\nline\nNf3\nquit\nhint\n", Side::White);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            &lines[1..],
            &["ok e4", "reply e5", "line Test Line", "ok Nf3", "line complete"]
        );
    }

    #[test]
    fn reports_offbook_and_illegal() {
        let out = session("d4\ne9\nhint\n", Side::White);
        assert!(out.contains("offbook d4 expected e4"));
        assert!(out.contains("illegal e9"));
        assert!(out.contains("hint e4"));
    }

    #[test]
    fn black_sees_opening_reply() {
        let out = session("e5\n", Side::Black);
        assert!(out.contains("you play black"));
        assert!(out.contains("reply e4"));
        assert!(out.contains("ok e5\nreply Nf3\nline complete"));
    }

    #[test]
    fn new_rejects_unknown_side() {
        let out = session("new purple\n", Side::White);
        assert!(out.contains("error unknown side 'purple'"));
    }
}
