use anyhow::{bail, Context};
use std::path::PathBuf;
use vfdedit::config::EditorConfig;
use vfdedit::file::DirectoryStore;
use vfdedit::frontend::{enter_terminal, leave_terminal, setup_panic_handler, TerminalDisplay, TerminalKeySource};
use vfdedit::{logging, EditSession, SessionOptions};

/// コマンドライン引数
#[derive(Debug, Default)]
struct CliArgs {
    config: Option<PathBuf>,
    document_dir: Option<String>,
    document: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = parse_args(&args)?;

    let mut config = EditorConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(dir) = cli.document_dir {
        config.document_dir = dir;
    }

    let log_file = config.log_file().context("invalid log file path")?;
    logging::init(config.log_level(), log_file.as_deref()).context("failed to install logger")?;

    let document_dir = config.document_dir().context("invalid document directory")?;
    let store = DirectoryStore::open(&document_dir)
        .with_context(|| format!("failed to open document directory {}", document_dir.display()))?;
    log::info!("vfdedit {} using {}", env!("CARGO_PKG_VERSION"), document_dir.display());

    setup_panic_handler();
    enter_terminal().context("failed to prepare terminal")?;
    let result = run_session(&config, store, cli.document.as_deref());
    let cleanup = leave_terminal().context("failed to restore terminal");

    if let Err(error) = &result {
        log::error!("session aborted: {:#}", error);
    }
    result.and(cleanup)
}

fn run_session(config: &EditorConfig, store: DirectoryStore, document: Option<&str>) -> anyhow::Result<()> {
    let display = TerminalDisplay::new(config.bus_delay()).context("failed to open panel")?;
    let mut session = EditSession::new(
        display,
        TerminalKeySource::new(),
        store,
        SessionOptions::from_config(config),
    );

    if let Some(name) = document {
        session.open_document(name)?;
    }
    session.run()?;
    Ok(())
}

fn parse_args(args: &[String]) -> anyhow::Result<CliArgs> {
    let mut cli = CliArgs::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter.next().context("--config requires a path")?;
                cli.config = Some(PathBuf::from(path));
            }
            "--dir" => {
                let dir = iter.next().context("--dir requires a path")?;
                cli.document_dir = Some(dir.clone());
            }
            "--help" | "-h" => {
                println!("usage: vfdedit [--config <path>] [--dir <path>] [document]");
                std::process::exit(0);
            }
            other if other.starts_with('-') => bail!("unknown option: {}", other),
            other => {
                if cli.document.is_some() {
                    bail!("only one document can be opened");
                }
                cli.document = Some(other.to_string());
            }
        }
    }

    Ok(cli)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn test_parse_args_options_and_document() {
        let cli = parse_args(&args(&["--config", "c.json", "--dir", "~/docs", "notes.txt"])).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("c.json")));
        assert_eq!(cli.document_dir.as_deref(), Some("~/docs"));
        assert_eq!(cli.document.as_deref(), Some("notes.txt"));
    }

    #[test]
    fn test_parse_args_rejects_bad_input() {
        assert!(parse_args(&args(&["--config"])).is_err());
        assert!(parse_args(&args(&["--verbose"])).is_err());
        assert!(parse_args(&args(&["a.txt", "b.txt"])).is_err());
    }
}
