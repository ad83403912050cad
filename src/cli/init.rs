//! Interactive first-run setup.

use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::core::config::{path_display, Config};

/// Write a default configuration and offer to capture the API key.
pub fn run_init(config_path: &Path) -> Result<(), Box<dyn Error>> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    run_init_with(config_path, &mut input, &mut output)
}

/// Prompt-driven body, split out so tests can script the dialogue.
fn run_init_with(
    config_path: &Path,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<(), Box<dyn Error>> {
    let mut config = Config::default();
    config.save_to_path(config_path)?;
    writeln!(
        output,
        "Saved configuration file to {}",
        path_display(config_path)
    )?;

    write!(output, "Do you want to add an api key? (y/n, default y): ")?;
    output.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    if answer.trim().eq_ignore_ascii_case("n") {
        return Ok(());
    }

    writeln!(output, "Please provide your OpenAI API key")?;
    write!(output, "API key: ")?;
    output.flush()?;
    let mut key = String::new();
    input.read_line(&mut key)?;
    config.openai_api_key = key.trim().to_string();
    config.save_to_path(config_path)?;

    writeln!(output)?;
    writeln!(output, "All good, you can start using explain now!")?;
    writeln!(
        output,
        "Example usage: `$ explain what is the meaning of life`"
    )?;
    Ok(())
}
