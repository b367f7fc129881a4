use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::{get_config_path, Config, ExportConfig};
use crate::dataset::DEFAULT_INPUT_FILE;
use crate::export::{BadNumberPolicy, KeyStyle, DEFAULT_EXPORT_INPUT, DEFAULT_EXPORT_OUTPUT};
use crate::scoring::{Criterion, WeightMap, DEFAULT_WEIGHT, MAX_SUGGESTED_WEIGHT};

/// Line-oriented prompts over any reader/writer pair.
struct Prompter<'a, R: BufRead, W: Write> {
    input: &'a mut R,
    output: &'a mut W,
    /// Print explanatory text one character at a time
    animate: bool,
}

impl<'a, R: BufRead, W: Write> Prompter<'a, R, W> {
    /// Prompt user with a message and return their trimmed input.
    fn prompt(&mut self, message: &str) -> Result<String> {
        write!(self.output, "{}", message)?;
        self.output.flush().context("Failed to flush output")?;
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read input")?;
        if read == 0 {
            anyhow::bail!("Input closed before the wizard finished");
        }
        Ok(line.trim().to_string())
    }

    /// Prompt user with a message and a default value. Returns default if input is empty.
    fn prompt_with_default(&mut self, message: &str, default: &str) -> Result<String> {
        let input = self.prompt(&format!("{} [{}]: ", message, default))?;
        if input.is_empty() {
            Ok(default.to_string())
        } else {
            Ok(input)
        }
    }

    /// Prompt user with a yes/no question. Returns bool based on input and default.
    fn prompt_yes_no(&mut self, message: &str, default_yes: bool) -> Result<bool> {
        let hint = if default_yes { "Y/n" } else { "y/N" };
        let input = self.prompt(&format!("{} [{}]: ", message, hint))?;
        let input = input.to_lowercase();
        if input.is_empty() {
            Ok(default_yes)
        } else {
            Ok(input == "y" || input == "yes")
        }
    }

    /// Print text, with a typewriter effect when animating.
    fn say(&mut self, text: &str) -> Result<()> {
        if self.animate {
            use std::thread;
            use std::time::Duration;
            for c in text.chars() {
                write!(self.output, "{}", c)?;
                self.output.flush().ok();
                thread::sleep(Duration::from_millis(12));
            }
            writeln!(self.output)?;
        } else {
            writeln!(self.output, "{}", text)?;
        }
        Ok(())
    }

    fn prompt_weight(&mut self, criterion: Criterion) -> Result<f64> {
        loop {
            let input =
                self.prompt_with_default(criterion.name(), &format!("{}", DEFAULT_WEIGHT))?;
            match input.parse::<f64>() {
                Ok(v) if v.is_finite() && v >= 0.0 => return Ok(v),
                _ => writeln!(
                    self.output,
                    "  Invalid: enter a number from 0 to {}. Try again.",
                    MAX_SUGGESTED_WEIGHT
                )?,
            }
        }
    }
}

/// Run the interactive init wizard on stdin/stdout to create a config file.
///
/// If `default_path` is Some, uses that as the suggested config file path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut output = std::io::stdout();
    let suggested = match default_path {
        Some(p) => p,
        None => get_config_path()?,
    };
    run_wizard(&mut input, &mut output, suggested, true)
}

fn run_wizard<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    suggested_path: PathBuf,
    animate: bool,
) -> Result<()> {
    let mut p = Prompter {
        input,
        output,
        animate,
    };

    writeln!(p.output)?;
    p.say("Centre Rank Configuration Wizard")?;
    writeln!(p.output, "================================")?;
    writeln!(p.output)?;

    // 1. Weights
    p.say("Each centre is scored on six criteria. Give each one a weight:")?;
    p.say(&format!(
        "  0 means you don't care, {} means high priority.",
        MAX_SUGGESTED_WEIGHT
    ))?;
    let mut weights = WeightMap::new();
    for criterion in Criterion::ALL {
        let w = p.prompt_weight(criterion)?;
        weights.insert(criterion.name().to_string(), w);
    }
    if weights.values().all(|w| *w == 0.0) {
        p.say("All weights are zero: every composite score will be 0 and only pairwise wins separate centres.")?;
    }

    // 2. Input CSV
    writeln!(p.output)?;
    let rank_input = p.prompt_with_default("CSV to rank", DEFAULT_INPUT_FILE)?;

    // 3. Export
    writeln!(p.output)?;
    p.say("The export command turns an enriched CSV into JSON for the web app.")?;
    let export_input = p.prompt_with_default("Export input CSV", DEFAULT_EXPORT_INPUT)?;
    let export_output = p.prompt_with_default("Export output JSON", DEFAULT_EXPORT_OUTPUT)?;
    let key_style = if p.prompt_yes_no(
        "Lower-case keys and rename centre/latitude/longitude to name/lat/lng?",
        true,
    )? {
        KeyStyle::Normalized
    } else {
        KeyStyle::Preserve
    };
    let on_bad_number = if p.prompt_yes_no(
        "Drop rows with unreadable numbers? (n keeps the row and nulls the field)",
        false,
    )? {
        BadNumberPolicy::SkipRow
    } else {
        BadNumberPolicy::NullField
    };

    // 4. Config path
    writeln!(p.output)?;
    let path_str = p.prompt_with_default(
        "Where should the config be saved?",
        &suggested_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    // Check if file already exists
    if config_path.exists() {
        let overwrite = p.prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            writeln!(p.output, "Aborted.")?;
            return Ok(());
        }
    }

    // 5. Write config
    let config = Config {
        input: Some(PathBuf::from(rank_input)),
        weights: Some(weights),
        export: Some(ExportConfig {
            input: Some(PathBuf::from(export_input)),
            output: Some(PathBuf::from(export_output)),
            key_style: Some(key_style),
            on_bad_number: Some(on_bad_number),
        }),
    };

    let yaml = serde_saphyr::to_string(&config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    // Create parent directories
    if let Some(parent) = config_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }

    std::fs::write(&config_path, &yaml)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    writeln!(p.output)?;
    writeln!(p.output, "Config written to {}", config_path.display())?;
    writeln!(p.output, "Run `centre-rank` to rank your centres.")?;

    Ok(())
}
