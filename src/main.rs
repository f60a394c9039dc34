use clap::{
    CommandFactory, Parser, Subcommand, ValueEnum,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use sporlshuffle::{cli, config, error, management::StrategyChoice, warning};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
  arg_required_else_help = true,
  args_conflicts_with_subcommands = true // a playlist and a subcommand are exclusive
)]
struct Cli {
    /// Playlist URL (https://open.spotify.com/playlist/...) or URI (spotify:playlist:...)
    playlist: Option<String>,

    /// How the shuffled order is written back
    #[clap(long, value_enum, default_value_t = StrategyArg::Auto)]
    strategy: StrategyArg,

    /// Only print the new order, do not modify the playlist
    #[clap(long)]
    dry_run: bool,

    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum StrategyArg {
    /// Replace when supported, clear-then-append otherwise
    Auto,
    /// Replace the playlist content in place
    Replace,
    /// Remove all tracks in batches, then append the new order
    ClearAppend,
}

impl From<StrategyArg> for StrategyChoice {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Auto => StrategyChoice::Auto,
            StrategyArg::Replace => StrategyChoice::Replace,
            StrategyArg::ClearAppend => StrategyChoice::ClearThenAppend,
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        warning!("{}", e);
    }

    let cli = Cli::parse();

    let result = match (cli.command, cli.playlist) {
        (Some(Command::Auth), _) => cli::auth().await,
        (Some(Command::Completions(opt)), _) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
        (None, Some(playlist)) => {
            cli::shuffle(playlist, cli.strategy.into(), cli.dry_run).await
        }
        (None, None) => {
            let _ = Cli::command().print_help();
            Ok(())
        }
    };

    if let Err(e) = result {
        error!("{}", e);
    }
}
