use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use keyword_highlight::{
    ADD_FROM_EDITOR, FileHost, KeywordHighlightPlugin, Message, Result, SettingChange,
};

/// Render a Markdown note with its front matter keywords highlighted.
#[derive(Parser)]
#[command(name = "keyword-highlight", version)]
struct Cli {
    /// Note to render
    file: PathBuf,

    /// Add a keyword to the note's front matter before rendering (repeatable)
    #[arg(long = "add", value_name = "KEYWORD")]
    add: Vec<String>,

    /// Front matter property holding the keywords (saved to settings)
    #[arg(long, value_name = "NAME")]
    property: Option<String>,

    /// Comma-separated highlight colors (saved to settings)
    #[arg(long, value_name = "LIST")]
    colors: Option<String>,

    /// Settings file to use instead of the per-user one
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<String> {
    let config = cli.config.unwrap_or_else(FileHost::default_config_path);
    let mut plugin = KeywordHighlightPlugin::new(FileHost::new(config));
    plugin.activate();

    if let Some(property) = cli.property {
        plugin.apply_setting(SettingChange::KeywordPropertyName(property))?;
    }
    if let Some(colors) = cli.colors {
        plugin.apply_setting(SettingChange::Colors(colors))?;
    }

    plugin.host_mut().open(&cli.file)?;
    plugin.handle(Message::FileOpen, Instant::now())?;

    for keyword in cli.add {
        let action = Message::ContextAction {
            id: ADD_FROM_EDITOR.to_string(),
            selection: keyword,
        };
        plugin.handle(action, Instant::now())?;
    }

    let host = plugin.host();
    let output = format!("<style>\n{}</style>\n{}\n", host.stylesheet(), host.view_html());
    plugin.deactivate();
    Ok(output)
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match run(cli) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
