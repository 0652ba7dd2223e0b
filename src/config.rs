use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Where the validation service listens unless told otherwise
pub const DEFAULT_SERVER: &str = "http://127.0.0.1:8008";

/// Command-line arguments for rank_uploader
#[derive(Parser, Debug)]
#[command(name = "rank_uploader")]
#[command(about = "Upload rank screenshots for validation")]
#[command(version)]
pub struct Args {
    /// Base URL of the validation service
    #[arg(long, default_value = DEFAULT_SERVER, env = "RANK_UPLOADER_SERVER")]
    pub server: String,

    /// Runs without a window when given
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Upload images once and print the validation result
    Submit {
        #[arg(long)]
        game_id: String,

        #[arg(long)]
        stage: String,

        /// Also write the result as an HTML page
        #[arg(long)]
        report: Option<PathBuf>,

        /// Images in rank order
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_window_mode() {
        let args = Args::try_parse_from(["rank_uploader"]).unwrap();
        assert!(args.command.is_none());
    }

    #[test]
    fn parses_submit() {
        let args = Args::try_parse_from([
            "rank_uploader",
            "--server",
            "http://validator:9000",
            "submit",
            "--game-id",
            "G1",
            "--stage",
            "2",
            "a.png",
            "b.jpg",
        ])
        .unwrap();

        assert_eq!(args.server, "http://validator:9000");
        let Some(Command::Submit {
            game_id,
            stage,
            report,
            files,
        }) = args.command
        else {
            panic!("expected submit");
        };
        assert_eq!(game_id, "G1");
        assert_eq!(stage, "2");
        assert!(report.is_none());
        assert_eq!(files, vec![PathBuf::from("a.png"), PathBuf::from("b.jpg")]);
    }

    #[test]
    fn submit_requires_files() {
        let parsed = Args::try_parse_from([
            "rank_uploader",
            "submit",
            "--game-id",
            "G1",
            "--stage",
            "2",
        ]);
        assert!(parsed.is_err());
    }
}
