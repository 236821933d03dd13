// src/lib.rs
pub mod application;
pub mod cli;
pub mod constants;
pub mod domain;
pub mod infrastructure;
pub mod ports;
pub mod util;

use std::collections::HashMap;
use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use application::validator::{validate_api_json, validate_paste, validate_template};
use application::{NoteSender, ValidationReport};
use cli::args::{Args, Command, ConfigAction, NoteArgs};
use domain::{apply_template, parse_field, Note};
use infrastructure::{Config, Mode, TanaApiClient};
use ports::{PasteGenerator, PayloadBuilder};
use tracing::{debug, info};

pub fn run(args: Args) -> Result<()> {
    debug!(?args, "Starting tana with arguments");

    match args.command.clone() {
        Command::Paste { content, note } => {
            let note = build_note(&content, &note)?;
            let output = PasteGenerator::new().generate(&note)?;
            print_paste(&output, &args);
            Ok(())
        }
        Command::Add {
            content,
            note,
            api,
            paste,
            target,
            file,
            notes_file,
            batch_size,
        } => {
            let config = Config::load_or_default(config_path(&args)?)?;
            let mode = if api {
                Mode::Api
            } else if paste {
                Mode::Paste
            } else {
                config.default.mode
            };
            let target = target.unwrap_or_else(|| config.default.target.clone());

            if let Some(notes_file) = notes_file {
                let notes = read_notes_file(&notes_file)?;
                return match mode {
                    Mode::Paste => {
                        let output = PasteGenerator::new().generate_many(&notes)?;
                        print_paste(&output, &args);
                        Ok(())
                    }
                    Mode::Api => send_notes(&config, &notes, &target, batch_size, &args),
                };
            }

            let content = acquire_content(content, file.as_deref())?;
            let note = build_note(&content, &note)?;
            match mode {
                Mode::Paste => {
                    let output = PasteGenerator::new().generate(&note)?;
                    print_paste(&output, &args);
                    Ok(())
                }
                Mode::Api => send_note(&config, &note, &target, &args),
            }
        }
        Command::Validate {
            paste_file,
            api_file,
            template,
        } => validate(paste_file.as_deref(), api_file.as_deref(), template.as_deref()),
        Command::Config { action } => handle_config(action, &config_path(&args)?),
    }
}

fn config_path(args: &Args) -> Result<PathBuf> {
    match &args.config {
        Some(path) => {
            debug!(?path, "Using provided config path");
            Ok(path.clone())
        }
        None => Config::default_path(),
    }
}

/// Build the note for `content` from tag/field/template arguments.
///
/// With a template, `--field` values become template data and only fields the
/// template defines are kept; `--tag` values follow the template's tags.
pub fn build_note(content: &str, args: &NoteArgs) -> Result<Note> {
    let fields = args.fields.iter().map(|raw| parse_field(raw));
    let note = match &args.template {
        Some(template) => {
            let data: HashMap<String, String> = fields.map(|f| (f.name, f.value)).collect();
            apply_template(content, template, &data)?.with_tags(args.tags.iter().cloned())
        }
        None => Note::new(content)
            .with_tags(args.tags.iter().cloned())
            .with_fields(fields),
    };
    Ok(note)
}

/// Content priority: file, then piped stdin when no content argument was given, then the argument.
fn acquire_content(content: Option<String>, file: Option<&Path>) -> Result<String> {
    let raw = if let Some(path) = file {
        std::fs::read_to_string(path)
            .with_context(|| format!("File not found: {}", path.display()))?
    } else if content.is_none() && !std::io::stdin().is_terminal() {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read stdin")?;
        buffer
    } else {
        content.unwrap_or_default()
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        bail!("No content provided");
    }
    Ok(trimmed.to_string())
}

fn read_notes_file(path: &Path) -> Result<Vec<Note>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("File not found: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse notes from {}", path.display()))
}

fn print_paste(output: &str, args: &Args) {
    if args.dry_run {
        println!("Dry run - would generate:");
    }
    print!("{output}");
    if !args.quiet && !args.dry_run {
        eprintln!("Paste into Tana to create the note");
    }
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")
}

fn send_note(config: &Config, note: &Note, target: &str, args: &Args) -> Result<()> {
    if args.dry_run {
        let payload = PayloadBuilder::new().create_payload(note, Some(target))?;
        println!("Dry run - would send to API:");
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    let client = TanaApiClient::new(&config.api)?;
    let mut sender = NoteSender::new(client);
    info!(target_node = target, "Sending note to Tana API");
    let response = runtime()?
        .block_on(sender.add_content(note, Some(target)))
        .context("Failed to add to Tana")?;

    println!("Added note \"{}\" to Tana", preview(&note.content));
    debug!(%response, "API response");
    Ok(())
}

fn send_notes(config: &Config, notes: &[Note], target: &str, batch_size: usize, args: &Args) -> Result<()> {
    if args.dry_run {
        let builder = PayloadBuilder::new();
        let nodes = notes
            .iter()
            .map(|note| builder.create_node(note))
            .collect::<Result<Vec<_>, _>>()?;
        println!("Dry run - would send to API:");
        for payload in ports::batch_payloads(nodes, target, batch_size)? {
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        return Ok(());
    }

    let client = TanaApiClient::new(&config.api)?;
    let mut sender = NoteSender::new(client);
    let responses = runtime()?
        .block_on(sender.add_notes(notes, Some(target), batch_size))
        .context("Failed to add notes to Tana")?;

    println!("Added {} note(s) to Tana in {} batch(es)", notes.len(), responses.len());
    Ok(())
}

fn preview(content: &str) -> String {
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(50).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

fn validate(paste_file: Option<&Path>, api_file: Option<&Path>, template: Option<&str>) -> Result<()> {
    let mut reports: Vec<(String, ValidationReport)> = Vec::new();

    if let Some(path) = paste_file {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("File not found: {}", path.display()))?;
        reports.push((format!("Tana Paste file {}", path.display()), validate_paste(&content)));
    }
    if let Some(path) = api_file {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("File not found: {}", path.display()))?;
        reports.push((format!("API JSON file {}", path.display()), validate_api_json(&content)));
    }
    if let Some(name) = template {
        reports.push((format!("template \"{name}\""), validate_template(name)));
    }
    if reports.is_empty() {
        bail!("No validation target specified (use --paste-file, --api-file or --template)");
    }

    let mut failed = false;
    for (subject, report) in &reports {
        println!("Validating {subject}");
        if report.is_clean() {
            println!("  valid");
        }
        for error in &report.errors {
            println!("  error: {error}");
        }
        for warning in &report.warnings {
            println!("  warning: {warning}");
        }
        failed |= !report.is_valid();
    }

    if failed {
        bail!("Validation failed");
    }
    Ok(())
}

fn handle_config(action: Option<ConfigAction>, path: &Path) -> Result<()> {
    match action {
        Some(ConfigAction::Init) => {
            Config::create_default(path)?;
            println!("Configuration initialized at {}", path.display());
        }
        Some(ConfigAction::Get { key }) => match Config::load_or_default(path)?.get(&key)? {
            Some(toml::Value::String(value)) => println!("{value}"),
            Some(value) => println!("{value}"),
            None => bail!("Key '{key}' not found in configuration"),
        },
        Some(ConfigAction::Set { key, value }) => {
            let mut config = Config::load_or_default(path)?;
            config.set(&key, &value)?;
            config.save(path)?;
            println!("Set {key} = {value}");
        }
        Some(ConfigAction::Show) | None => {
            let config = Config::load_or_default(path)?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }
    Ok(())
}
