pub mod handlers;

use std::process::ExitCode;

use crate::presentation::cli::{Cli, Commands};
use bigsplit_core::SplitStatus;
use clap::Parser;

/// Exit status for a terminal split status; 130 mirrors an interrupted shell job.
pub fn exit_status(status: SplitStatus) -> u8 {
    match status {
        SplitStatus::Success => 0,
        SplitStatus::Cancelled => 130,
        _ => 1,
    }
}

pub fn exit_code(status: SplitStatus) -> ExitCode {
    ExitCode::from(exit_status(status))
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    match cli.command {
        Commands::Split(args) => exit_code(handlers::handle_split(args)),
        Commands::Chunks { source, out } => match handlers::handle_chunks(source, out) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("chunks: {e}");
                exit_code(e.status())
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_status_per_split_status() {
        let cases = [
            (SplitStatus::Success, 0),
            (SplitStatus::Cancelled, 130),
            (SplitStatus::IoError, 1),
            (SplitStatus::UnauthorizedAccessError, 1),
            (SplitStatus::PathTooLongError, 1),
            (SplitStatus::DirectoryNotFoundError, 1),
            (SplitStatus::NotSupportedError, 1),
            (SplitStatus::UnknownError, 1),
        ];
        for (status, code) in cases {
            assert_eq!(exit_status(status), code, "{status:?}");
        }
    }
}
