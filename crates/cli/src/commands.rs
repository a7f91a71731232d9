// FILE: crates/cli/src/commands.rs

use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;
use console::style;
use readerkit_config::{Config, ConfigManager};
use readerkit_feed_parser::{FeedParser, ParsedFeed};
use readerkit_sanitizer::ContentSanitizer;
use std::io::Write;
use std::path::Path;
use url::Url;

/// Parse a feed file and print it as JSON
pub fn parse_feed(config: &Config, matches: &ArgMatches, out: &mut impl Write) -> Result<()> {
    let file = matches
        .get_one::<String>("file")
        .ok_or_else(|| anyhow::anyhow!("Feed file is required"))?;
    let path = Path::new(file);

    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", file))?;
    let origin = match matches.get_one::<String>("origin") {
        Some(origin) => origin.clone(),
        None => file_address(path)?,
    };
    let encoding = matches.get_one::<String>("encoding").map(String::as_str);

    let mut parsed = FeedParser::parse_with_encoding(&bytes, &origin, encoding)
        .with_context(|| format!("Failed to parse feed {}", file))?;

    let raw = matches.get_flag("raw") || !config.sanitizer.sanitize_on_parse;
    if !raw {
        sanitize_articles(&ContentSanitizer::new(config.sanitizer.policy()), &mut parsed);
    }

    write_json(&parsed, config.app.pretty_output, out)?;

    eprintln!(
        "{} Parsed {} articles from {} feed{}",
        style("✓").green().bold(),
        style(parsed.article_count()).bold(),
        parsed.feed.feed_type,
        skipped_note(parsed.skipped)
    );
    Ok(())
}

/// Sanitize a markup file against a base address
pub fn sanitize_file(config: &Config, matches: &ArgMatches, out: &mut impl Write) -> Result<()> {
    let file = matches
        .get_one::<String>("file")
        .ok_or_else(|| anyhow::anyhow!("Markup file is required"))?;
    let base = matches
        .get_one::<String>("base")
        .ok_or_else(|| anyhow::anyhow!("Base address is required"))?;

    let bytes = std::fs::read(file).with_context(|| format!("Failed to read {}", file))?;
    let markup = String::from_utf8_lossy(&bytes);

    let sanitizer = ContentSanitizer::new(config.sanitizer.policy());
    writeln!(out, "{}", sanitizer.sanitize(&markup, base))?;
    Ok(())
}

/// Write a commented default config file
pub fn config_init(manager: &ConfigManager, out: &mut impl Write) -> Result<()> {
    let created = manager
        .initialize()
        .context("Failed to write default config")?;

    if created {
        writeln!(
            out,
            "{} Created {}",
            style("✓").green().bold(),
            manager.config_path().display()
        )?;
    } else {
        writeln!(out, "Config already exists at {}", manager.config_path().display())?;
    }
    Ok(())
}

/// Print the effective configuration as TOML
pub fn config_show(config: &Config, out: &mut impl Write) -> Result<()> {
    let rendered = config
        .to_toml_string()
        .context("Failed to serialize config")?;
    write!(out, "{}", rendered)?;

    if let Err(errors) = config.validate() {
        for error in errors {
            eprintln!("{} {}", style("warning:").yellow().bold(), error);
        }
    }
    Ok(())
}

/// Print the config file location
pub fn config_path(manager: &ConfigManager, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{}", manager.config_path().display())?;
    Ok(())
}

/// Runs the sanitization pass over every article of a parsed feed
///
/// Each article resolves against its own base address, falling back to
/// the feed address.
pub fn sanitize_articles(sanitizer: &ContentSanitizer, parsed: &mut ParsedFeed) {
    for article in &mut parsed.articles {
        let clean = sanitizer.sanitize(&article.raw_description, article.base_address());
        article.set_sanitized_description(clean);
    }
    log::debug!("Sanitized {} articles", parsed.articles.len());
}

fn write_json(parsed: &ParsedFeed, pretty: bool, out: &mut impl Write) -> Result<()> {
    let written = if pretty {
        serde_json::to_writer_pretty(&mut *out, parsed)
    } else {
        serde_json::to_writer(&mut *out, parsed)
    };
    written.context("Failed to serialize to JSON")?;
    writeln!(out)?;
    Ok(())
}

/// `file://` address of a local path, used when no origin is given
fn file_address(path: &Path) -> Result<String> {
    let absolute = std::fs::canonicalize(path)
        .with_context(|| format!("Failed to resolve {}", path.display()))?;
    let address = Url::from_file_path(&absolute)
        .map_err(|()| anyhow!("Cannot express {} as a file URL", absolute.display()))?;
    Ok(address.into())
}

fn skipped_note(skipped: usize) -> String {
    match skipped {
        0 => String::new(),
        1 => " (1 entry skipped)".to_string(),
        n => format!(" ({} entries skipped)", n),
    }
}
