//! similar-games CLI
//!
//! Scrapes the similar-games suggestions of every title in the input sheet
//! and appends them to the output sheet.

mod error;
mod progress;

use clap::Parser;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use similar_games_core::GameTitle;
use similar_games_lib::{RunMode, Settings, run};
use similar_games_sheets::{SheetsClient, SyncEngine};

use crate::error::CliError;
use crate::progress::{RunProgress, spinner};

/// Fallback for the game title when run from a workflow dispatch.
const ENV_INPUT_GAME: &str = "INPUT_GAME_NAME";

#[derive(Parser)]
#[command(name = "similar-games", version)]
#[command(
    about = "Collect similar-game suggestions for a spreadsheet of titles",
    long_about = None
)]
struct Cli {
    /// Scrape only this game, replacing its existing rows. Without it,
    /// every title not yet in the output sheet is scraped.
    game: Option<String>,
}

impl Cli {
    /// The positional title wins over `INPUT_GAME_NAME`; a blank title from
    /// either source means delta mode.
    fn mode(&self, env: impl Fn(&str) -> Option<String>) -> RunMode {
        self.game
            .clone()
            .or_else(|| env(ENV_INPUT_GAME))
            .and_then(|title| GameTitle::from_cell(&title))
            .map(RunMode::Single)
            .unwrap_or(RunMode::Delta)
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let cli = Cli::parse();

    let result = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::runtime(format!("failed to create tokio runtime: {e}")))
        .and_then(|rt| rt.block_on(run_cli(cli)));

    if let Err(e) = result {
        log::error!(
            "{} {}",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            e
        );
        let hints = e.hints();
        if !hints.is_empty() {
            log::error!("");
            for hint in hints {
                log::error!("{}", hint);
            }
        }
    }
}

async fn run_cli(cli: Cli) -> Result<(), CliError> {
    let settings = Settings::load()?;
    let mode = cli.mode(|key| std::env::var(key).ok());
    let spreadsheet_ref = settings.spreadsheet_ref()?;
    let key = settings.service_account_key()?;

    let pb = spinner("Connecting to Google Sheets...");
    let connected = async {
        let client = SheetsClient::connect(key).await?;
        let spreadsheet = client.open(&spreadsheet_ref).await?;
        let input = spreadsheet.worksheet(&settings.input_worksheet)?;
        let output = spreadsheet.worksheet(&settings.output_worksheet)?;
        Ok::<_, CliError>((spreadsheet, input, output))
    }
    .await;
    pb.finish_and_clear();
    let (spreadsheet, input, output) = connected?;

    log::info!(
        "{} Opened '{}' ({} -> {})",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        spreadsheet.title().if_supports_color(Stdout, |t| t.bold()),
        settings.input_worksheet,
        settings.output_worksheet,
    );
    if let RunMode::Single(ref title) = mode {
        log::info!(
            "{} Single-game mode: '{}'",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            title
        );
    }

    let engine = SyncEngine::new(output);
    let pipeline = settings.pipeline();
    let options = settings.run_options();

    let (event_tx, mut event_rx) = tokio::sync::mpsc::unbounded_channel();
    let mut progress = RunProgress::new();
    // The run owns the only sender, so the channel closes when it returns.
    let (result, ()) = tokio::join!(
        run(&pipeline, &input, &engine, &mode, &options, event_tx),
        async {
            while let Some(event) = event_rx.recv().await {
                progress.handle(event);
            }
        }
    );
    progress.finish();

    let run_log = result?;
    let summary = run_log.summary();
    log::info!("");
    log::info!(
        "{} Done: {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        summary
    );
    if summary.rows_replaced > 0 {
        log::info!("  {} earlier rows replaced", summary.rows_replaced);
    }
    if summary.failed > 0 {
        let followup = match mode {
            RunMode::Delta => "will be retried on the next run",
            RunMode::Single(_) => "kept its earlier rows",
        };
        log::warn!(
            "  {} {} game(s) failed and {}",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
            summary.failed,
            followup
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn positional_game_selects_single_mode() {
        match parse(&["similar-games", "  Hades "]).mode(no_env) {
            RunMode::Single(title) => assert_eq!(title.as_str(), "Hades"),
            RunMode::Delta => panic!("expected single-game mode"),
        }
    }

    #[test]
    fn no_argument_selects_delta_mode() {
        assert_eq!(parse(&["similar-games"]).mode(no_env), RunMode::Delta);
    }

    #[test]
    fn input_game_env_is_the_fallback() {
        let mode = parse(&["similar-games"]).mode(|key| {
            (key == ENV_INPUT_GAME).then(|| "Celeste".to_string())
        });
        assert_eq!(mode, RunMode::Single(GameTitle::new("Celeste")));
    }

    #[test]
    fn argument_wins_over_env() {
        let mode = parse(&["similar-games", "Hades"]).mode(|_| Some("Celeste".to_string()));
        assert_eq!(mode, RunMode::Single(GameTitle::new("Hades")));
    }

    #[test]
    fn blank_env_means_delta() {
        let mode = parse(&["similar-games"]).mode(|_| Some("   ".to_string()));
        assert_eq!(mode, RunMode::Delta);
    }

    #[test]
    fn extra_arguments_are_rejected() {
        assert!(Cli::try_parse_from(["similar-games", "Hades", "Celeste"]).is_err());
    }
}
