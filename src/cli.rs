// cli.rs - Command line flags
use clap::Parser;
use std::path::PathBuf;

use crate::ui::theme::ThemeName;

#[derive(Debug, Default, Parser)]
#[command(name = "writeonly")]
#[command(version = "0.1.0")]
#[command(about = "A distraction-free, write-only text capture tool")]
pub struct CliArgs {
    /// Theme preset (default, mauve or night-mode)
    #[arg(long, short = 'T')]
    pub theme: Option<ThemeName>,

    /// Plugin configuration preset as JSON, e.g. '{"pomodoroTimer":{"enabled":true}}'
    #[arg(long)]
    pub plugins: Option<String>,

    /// Directory for the session store, exports and the log file
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Keep everything in memory; nothing is read from or written to disk
    #[arg(long)]
    pub ephemeral: bool,

    /// Print the available themes and exit
    #[arg(long)]
    pub list_themes: bool,
}

pub fn parse_args() -> Result<CliArgs, Box<dyn std::error::Error>> {
    Ok(CliArgs::parse())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_no_args() {
        let args = CliArgs::parse_from(["writeonly"]);
        assert!(args.theme.is_none());
        assert!(args.plugins.is_none());
        assert!(!args.ephemeral);
    }

    #[test]
    fn test_parse_presets() {
        let args = CliArgs::parse_from([
            "writeonly",
            "--theme",
            "night-mode",
            "--plugins",
            r#"{"syntaxHighlighting":{"enabled":true}}"#,
            "--ephemeral",
        ]);
        assert_eq!(args.theme, Some(ThemeName::NightMode));
        assert!(args.plugins.unwrap().contains("syntaxHighlighting"));
        assert!(args.ephemeral);
    }

    #[test]
    fn test_unknown_theme_is_rejected() {
        assert!(CliArgs::try_parse_from(["writeonly", "--theme", "monokai"]).is_err());
    }
}
