// src/main.rs

use std::ffi::OsString;

use matrix_runner::{MatrixError, run};

/// Exit code after Ctrl-C, as shells report it.
const INTERRUPTED_EXIT: i32 = 130;

#[tokio::main]
async fn main() {
    let argv: Vec<OsString> = std::env::args_os().skip(1).collect();
    match run(argv).await {
        Ok(code) => std::process::exit(code),
        Err(MatrixError::Usage(err)) => err.exit(),
        Err(MatrixError::Interrupted) => {
            eprintln!("matrix-runner: interrupted");
            std::process::exit(INTERRUPTED_EXIT);
        }
        Err(err) => {
            eprintln!("matrix-runner error: {err}");
            std::process::exit(1);
        }
    }
}
