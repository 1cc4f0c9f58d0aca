//! UCI command parsing.

use crate::UciError;

/// Commands sent from the GUI to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuiCommand {
    /// Initialize UCI mode.
    Uci,
    /// Check if the engine is ready.
    IsReady,
    /// Set up a position, optionally followed by moves to apply.
    Position {
        fen: Option<String>,
        moves: Vec<String>,
    },
    /// Start calculating.
    Go(GoOptions),
    /// Quit the engine.
    Quit,
    /// Anything else (kept verbatim for diagnostics).
    Unknown(String),
}

/// Options for the `go` command.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GoOptions {
    /// Run divide-perft to this depth.
    pub perft: Option<u32>,
}

impl GuiCommand {
    /// Parses a single UCI command line.
    pub fn parse(input: &str) -> Result<Self, UciError> {
        let input = input.trim();
        let mut parts = input.split_whitespace();

        match parts.next().unwrap_or("") {
            "uci" => Ok(GuiCommand::Uci),
            "isready" => Ok(GuiCommand::IsReady),
            "quit" => Ok(GuiCommand::Quit),
            "position" => Self::parse_position(parts),
            "go" => Self::parse_go(parts),
            "" => Ok(GuiCommand::Unknown(String::new())),
            _ => Ok(GuiCommand::Unknown(input.to_string())),
        }
    }

    fn parse_position<'a>(parts: impl Iterator<Item = &'a str>) -> Result<Self, UciError> {
        let tokens: Vec<&str> = parts.collect();

        let (fen, rest) = match tokens.first() {
            Some(&"startpos") => (None, 1),
            Some(&"fen") => {
                let end = tokens
                    .iter()
                    .position(|&t| t == "moves")
                    .unwrap_or(tokens.len());
                (Some(tokens[1..end].join(" ")), end)
            }
            Some(other) => {
                return Err(UciError::Parse(format!(
                    "expected 'startpos' or 'fen', got '{}'",
                    other
                )));
            }
            None => {
                return Err(UciError::Parse("expected 'startpos' or 'fen'".to_string()));
            }
        };

        let moves = if tokens.get(rest) == Some(&"moves") {
            tokens[rest + 1..].iter().map(|s| s.to_string()).collect()
        } else {
            Vec::new()
        };

        Ok(GuiCommand::Position { fen, moves })
    }

    fn parse_go<'a>(mut parts: impl Iterator<Item = &'a str>) -> Result<Self, UciError> {
        let mut opts = GoOptions::default();

        // Only the first token is inspected; any other go-subcommand leaves
        // the rest of the line unread.
        if parts.next() == Some("perft") {
            opts.perft = parts.next().and_then(|d| d.parse().ok());
        }

        Ok(GuiCommand::Go(opts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_uci() {
        assert_eq!(GuiCommand::parse("uci").unwrap(), GuiCommand::Uci);
    }

    #[test]
    fn parse_isready() {
        assert_eq!(GuiCommand::parse("isready").unwrap(), GuiCommand::IsReady);
    }

    #[test]
    fn parse_quit() {
        assert_eq!(GuiCommand::parse("quit").unwrap(), GuiCommand::Quit);
    }

    #[test]
    fn parse_position_startpos() {
        let cmd = GuiCommand::parse("position startpos").unwrap();
        assert_eq!(
            cmd,
            GuiCommand::Position {
                fen: None,
                moves: vec![]
            }
        );
    }

    #[test]
    fn parse_position_startpos_with_moves() {
        let cmd = GuiCommand::parse("position startpos moves e2e4 e7e5").unwrap();
        assert_eq!(
            cmd,
            GuiCommand::Position {
                fen: None,
                moves: vec!["e2e4".to_string(), "e7e5".to_string()]
            }
        );
    }

    #[test]
    fn parse_position_fen() {
        let cmd = GuiCommand::parse(
            "position fen rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
        )
        .unwrap();
        assert_eq!(
            cmd,
            GuiCommand::Position {
                fen: Some(
                    "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1".to_string()
                ),
                moves: vec![]
            }
        );
    }

    #[test]
    fn parse_position_fen_with_moves() {
        let cmd = GuiCommand::parse(
            "position fen r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1 moves e1g1 e8c8",
        )
        .unwrap();
        assert_eq!(
            cmd,
            GuiCommand::Position {
                fen: Some("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1".to_string()),
                moves: vec!["e1g1".to_string(), "e8c8".to_string()]
            }
        );
    }

    #[test]
    fn parse_position_without_kind() {
        assert!(GuiCommand::parse("position").is_err());
        assert!(GuiCommand::parse("position nonsense").is_err());
    }

    #[test]
    fn parse_go_perft() {
        let cmd = GuiCommand::parse("go perft 5").unwrap();
        assert_eq!(
            cmd,
            GuiCommand::Go(GoOptions { perft: Some(5) })
        );
    }

    #[test]
    fn parse_go_without_perft() {
        let cmd = GuiCommand::parse("go").unwrap();
        assert_eq!(cmd, GuiCommand::Go(GoOptions::default()));

        // unsupported go subcommands are ignored, not errors
        let cmd = GuiCommand::parse("go depth 10").unwrap();
        assert_eq!(cmd, GuiCommand::Go(GoOptions { perft: None }));
    }

    #[test]
    fn parse_go_perft_bad_depth() {
        let cmd = GuiCommand::parse("go perft x").unwrap();
        assert_eq!(cmd, GuiCommand::Go(GoOptions { perft: None }));
    }

    #[test]
    fn parse_go_perft_not_first_token() {
        // perft must be the first subcommand; anything else ends parsing
        let cmd = GuiCommand::parse("go wtime 100 perft 3").unwrap();
        assert_eq!(cmd, GuiCommand::Go(GoOptions { perft: None }));

        let cmd = GuiCommand::parse("go movetime 1000 perft 4").unwrap();
        assert_eq!(cmd, GuiCommand::Go(GoOptions { perft: None }));
    }

    #[test]
    fn parse_unknown() {
        assert_eq!(
            GuiCommand::parse("frobnicate the board").unwrap(),
            GuiCommand::Unknown("frobnicate the board".to_string())
        );
        assert_eq!(
            GuiCommand::parse("   ").unwrap(),
            GuiCommand::Unknown(String::new())
        );
    }
}
