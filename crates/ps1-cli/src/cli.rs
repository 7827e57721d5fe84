use std::fs;
use std::io::{
    self,
    Read,
};

use clap::{
    ArgAction,
    Args,
    Parser,
    Subcommand,
};
use eyre::{
    Result,
    WrapErr,
    eyre,
};
use ps1_codec::{
    BuilderState,
    ElementKind,
    PALETTE,
    PresetManager,
    color,
};
use strum::IntoEnumIterator;
use tracing::debug;

/// Build, decode and export bash PS1 prompts.
#[derive(Debug, Parser, PartialEq)]
#[command(name = "ps1", version, about)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum Command {
    /// Generate a PS1 string from a JSON builder state
    Generate {
        /// File holding the state, `-` for stdin
        #[arg(short, long, default_value = "-")]
        state: String,
    },
    /// Decode a PS1 string into a JSON builder state
    Parse {
        /// Prompt string to decode
        ps1: Option<String>,
        /// Read the prompt from a file instead, `-` for stdin
        #[arg(short, long, conflicts_with = "ps1")]
        input: Option<String>,
        /// Print single-line JSON
        #[arg(long)]
        compact: bool,
    },
    /// Print a bash script exporting the prompt
    Export {
        /// File holding the state, `-` for stdin
        #[arg(short, long, conflicts_with = "raw")]
        state: Option<String>,
        /// Export this prompt string as is
        #[arg(long)]
        raw: Option<String>,
    },
    /// List every element kind
    Kinds,
    /// List the named palette colors
    Palette {
        /// Show a single color, matched ignoring case, spaces and dashes
        name: Option<String>,
    },
    /// Built-in prompt presets
    Presets(PresetsArgs),
}

#[derive(Debug, Args, PartialEq)]
pub struct PresetsArgs {
    #[command(subcommand)]
    pub command: PresetsSubcommand,
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum PresetsSubcommand {
    /// List available presets
    List,
    /// Show the prompt string of a preset
    Show {
        /// Preset name
        name: String,
        /// Print the decoded builder state instead
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub fn execute(self) -> Result<()> {
        match self.command {
            Command::Generate { state } => {
                let state = read_state(&state)?;
                println!("{}", ps1_codec::generate(&state)?);
            },
            Command::Parse { ps1, input, compact } => {
                let raw = match ps1 {
                    Some(ps1) => ps1,
                    None => read_prompt(input.as_deref().unwrap_or("-"))?,
                };
                print_state(&ps1_codec::parse(&raw), compact)?;
            },
            Command::Export { state, raw } => {
                let ps1 = match raw {
                    Some(raw) => raw,
                    None => ps1_codec::generate(&read_state(state.as_deref().unwrap_or("-"))?)?,
                };
                print!("{}", ps1_codec::export_script(&ps1));
            },
            Command::Kinds => {
                for kind in ElementKind::iter() {
                    // Free-form kinds take their text from the element
                    let marker = if kind.is_free_form() { "*" } else { "" };
                    println!(
                        "{:<29} {:<30} {:<12} {:<22} {}",
                        format!("{}{marker}", kind.name()),
                        kind.label(),
                        kind.category(),
                        kind.canonical_value(),
                        kind.description()
                    );
                }
            },
            Command::Palette { name } => {
                let colors = match name {
                    Some(name) => {
                        vec![color::named(&name).ok_or_else(|| eyre!("Unknown palette color '{name}'"))?]
                    },
                    None => PALETTE.to_vec(),
                };
                for named in colors {
                    let code = color::encode_foreground(&named.color())?;
                    println!("{:>2}  {:<15} {}  {}", named.index, named.name, named.hex, code);
                }
            },
            Command::Presets(args) => args.execute()?,
        }

        Ok(())
    }
}

impl PresetsArgs {
    pub fn execute(self) -> Result<()> {
        let manager = PresetManager::new();

        match self.command {
            PresetsSubcommand::List => {
                println!("Available presets:");
                for name in manager.list_presets() {
                    println!("  {name}");
                }
            },
            PresetsSubcommand::Show { name, json } => {
                if json {
                    print_state(&manager.load_preset(&name)?, false)?;
                } else {
                    println!("{}", manager.load_raw(&name)?);
                }
            },
        }

        Ok(())
    }
}

fn read_source(path: &str) -> Result<String> {
    if path == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).wrap_err("failed to read stdin")?;
        return Ok(buf);
    }

    debug!(path, "reading input file");
    fs::read_to_string(path).wrap_err_with(|| format!("failed to read {path}"))
}

fn read_state(path: &str) -> Result<BuilderState> {
    let json = read_source(path)?;
    serde_json::from_str(&json).wrap_err("invalid builder state")
}

/// Reads a prompt, dropping the single line break editors append to files.
fn read_prompt(path: &str) -> Result<String> {
    let mut raw = read_source(path)?;
    if raw.ends_with('\n') {
        raw.pop();
        if raw.ends_with('\r') {
            raw.pop();
        }
    }
    Ok(raw)
}

fn print_state(state: &BuilderState, compact: bool) -> Result<()> {
    let json = if compact {
        serde_json::to_string(state)?
    } else {
        serde_json::to_string_pretty(state)?
    };
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_generate_args() {
        assert_eq!(Cli::parse_from(["ps1", "generate"]), Cli {
            verbose: 0,
            command: Command::Generate { state: "-".to_string() },
        });
    }

    #[test]
    fn test_parse_verbose_after_subcommand() {
        let cli = Cli::parse_from(["ps1", "kinds", "-vv"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.command, Command::Kinds);
    }

    #[test]
    fn test_parse_prompt_args() {
        assert_eq!(Cli::parse_from(["ps1", "parse", "\\u", "--compact"]).command, Command::Parse {
            ps1: Some("\\u".to_string()),
            input: None,
            compact: true,
        });
        assert!(Cli::try_parse_from(["ps1", "parse", "\\u", "--input", "file"]).is_err());
    }

    #[test]
    fn test_export_args_conflict() {
        assert!(Cli::try_parse_from(["ps1", "export", "--state", "a.json", "--raw", "\\$ "]).is_err());
    }

    #[test]
    fn test_presets_show_args() {
        assert_eq!(
            Cli::parse_from(["ps1", "presets", "show", "git", "--json"]).command,
            Command::Presets(PresetsArgs {
                command: PresetsSubcommand::Show {
                    name: "git".to_string(),
                    json: true,
                },
            })
        );
    }
}
