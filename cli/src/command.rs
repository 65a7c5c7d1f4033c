use clap::{Parser, Subcommand};
use excavator_core::TileId;

/// One line of player input.
#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_help_flag = true)]
pub(crate) struct Line {
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub(crate) enum Command {
    /// Excavate a tile, ids run 0..63 row by row
    #[command(alias = "d")]
    Dig { id: TileId },
    /// Discard the grid and start over
    Reset,
    /// Show resources and counters
    Status {
        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the board
    #[command(alias = "g")]
    Grid,
    /// Show treasures found per tier
    #[command(alias = "inv")]
    Inventory,
    #[command(alias = "exit", alias = "q")]
    Quit,
}

impl Line {
    pub(crate) fn parse_line(input: &str) -> Result<Command, clap::Error> {
        Self::try_parse_from(input.split_whitespace()).map(|line| line.command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dig_and_alias() {
        assert_eq!(Line::parse_line("dig 12").unwrap(), Command::Dig { id: 12 });
        assert_eq!(Line::parse_line("d 0").unwrap(), Command::Dig { id: 0 });
    }

    #[test]
    fn parses_status_flags() {
        assert_eq!(
            Line::parse_line("status --json").unwrap(),
            Command::Status { json: true }
        );
        assert_eq!(Line::parse_line("q").unwrap(), Command::Quit);
    }

    #[test]
    fn rejects_garbage() {
        assert!(Line::parse_line("dig many").is_err());
        assert!(Line::parse_line("fly").is_err());
    }
}
