//! Line commands for the live dashboard
//!
//! Each stdin line maps to one `Command`. Card numbers are 1-based and
//! refer to the list as last rendered.

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `d <n>` - view/download card n of the received list
    DownloadReceived(usize),
    /// `s <n>` - view card n of the sent list
    ViewSent(usize),
    /// `u <file> <recipient#> [limit] [days]` - share a file
    Upload {
        file: PathBuf,
        recipient: usize,
        view_limit: Option<u32>,
        expires_in_days: Option<u32>,
    },
    /// `p` - list recipients
    Recipients,
    /// `r` - refresh now
    Refresh,
    /// `?` / `h` - show help
    Help,
    /// `q` - quit
    Quit,
}

/// A single command for display in the help text
pub struct Shortcut {
    pub keys: &'static str,
    pub description: &'static str,
}

pub fn shortcuts() -> Vec<Shortcut> {
    vec![
        Shortcut { keys: "d <n>", description: "View/download received document n" },
        Shortcut { keys: "s <n>", description: "View sent document n" },
        Shortcut {
            keys: "u <file> <recipient#> [limit] [days]",
            description: "Share a file (limit/days: 0 or blank for none)",
        },
        Shortcut { keys: "p", description: "List recipients" },
        Shortcut { keys: "r", description: "Refresh documents" },
        Shortcut { keys: "?", description: "Show this help" },
        Shortcut { keys: "q", description: "Quit" },
    ]
}

impl Command {
    /// Parse one input line; `Err` carries a message for the status line
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut parts = line.split_whitespace();
        let Some(head) = parts.next() else {
            return Err("Empty command (type ? for help)".to_string());
        };
        let args: Vec<&str> = parts.collect();

        match (head, args.as_slice()) {
            ("d", [n]) => index(n).map(Command::DownloadReceived),
            ("s", [n]) => index(n).map(Command::ViewSent),
            ("u", [file, recipient, rest @ ..]) if rest.len() <= 2 => Ok(Command::Upload {
                file: PathBuf::from(file),
                recipient: index(recipient)?,
                view_limit: optional_number(rest.first().copied())?,
                expires_in_days: optional_number(rest.get(1).copied())?,
            }),
            ("p", []) => Ok(Command::Recipients),
            ("r", []) => Ok(Command::Refresh),
            ("?" | "h", []) => Ok(Command::Help),
            ("q", []) => Ok(Command::Quit),
            _ => Err(format!("Unknown command: {} (type ? for help)", line.trim())),
        }
    }
}

fn index(raw: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("Expected a number from 1, got {raw:?}")),
    }
}

fn optional_number(raw: Option<&str>) -> Result<Option<u32>, String> {
    match raw {
        None | Some("-") => Ok(None),
        Some(raw) => raw
            .parse::<u32>()
            .map(|n| (n > 0).then_some(n))
            .map_err(|_| format!("Expected a whole number, got {raw:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_commands() {
        assert_eq!(Command::parse("d 2"), Ok(Command::DownloadReceived(2)));
        assert_eq!(Command::parse("  s 1 "), Ok(Command::ViewSent(1)));
        assert!(Command::parse("d 0").is_err());
        assert!(Command::parse("d x").is_err());
        assert!(Command::parse("d").is_err());
    }

    #[test]
    fn test_upload_command() {
        assert_eq!(
            Command::parse("u ./report.pdf 1 5 7"),
            Ok(Command::Upload {
                file: PathBuf::from("./report.pdf"),
                recipient: 1,
                view_limit: Some(5),
                expires_in_days: Some(7),
            })
        );
        assert_eq!(
            Command::parse("u notes.txt 2 0"),
            Ok(Command::Upload {
                file: PathBuf::from("notes.txt"),
                recipient: 2,
                view_limit: None,
                expires_in_days: None,
            })
        );
        assert!(Command::parse("u notes.txt").is_err());
        assert!(Command::parse("u notes.txt 1 many").is_err());
        assert!(Command::parse("u notes.txt 1 1 1 1").is_err());
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(Command::parse("r"), Ok(Command::Refresh));
        assert_eq!(Command::parse("p"), Ok(Command::Recipients));
        assert_eq!(Command::parse("?"), Ok(Command::Help));
        assert_eq!(Command::parse("q"), Ok(Command::Quit));
        assert!(Command::parse("").is_err());
        assert!(Command::parse("archive").is_err());
    }
}
