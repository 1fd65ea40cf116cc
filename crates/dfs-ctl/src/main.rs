//! dfs-ctl — interactive command-line client for the coordinator.

mod cmd;

use std::io::{self, Write};

use dfs_core::config::CtlConfig;

fn print_usage() {
    println!("Commands:");
    println!("  upload <path>              Upload a local file, printing its file_id");
    println!("  download <file_id> [dest]  Download a file by id (default: original name)");
    println!("  delete <file_id>           Delete a file's chunks and metadata");
    println!("  help                       Show this message");
    println!("  exit                       Quit");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CtlConfig::from_env();
    println!("dfs-ctl — coordinator at {}", config.coordinator_addr);
    print_usage();

    let stdin = io::stdin();
    loop {
        print!("dfs> ");
        io::stdout().flush().ok();

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            // EOF on stdin (e.g. piped input exhausted).
            break;
        }
        let parts: Vec<&str> = line.split_whitespace().collect();

        let result = match parts.as_slice() {
            [] => continue,
            ["upload", path] => cmd::upload::cmd_upload(&config.coordinator_addr, path).await,
            ["download", file_id] => cmd::download::cmd_download(&config.coordinator_addr, file_id, None).await,
            ["download", file_id, dest] => {
                cmd::download::cmd_download(&config.coordinator_addr, file_id, Some(dest)).await
            }
            ["delete", file_id] => cmd::delete::cmd_delete(&config.coordinator_addr, file_id).await,
            ["help"] => {
                print_usage();
                Ok(())
            }
            ["exit"] | ["quit"] => break,
            other => {
                eprintln!("Unknown command: {}", other.join(" "));
                print_usage();
                Ok(())
            }
        };

        if let Err(e) = result {
            eprintln!("error: {e:#}");
        }
    }

    Ok(())
}
