use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use log::{debug, info};

use atom::{Category, XmlWriter};
use atomtools::extract::extract_with_writer;
use atomtools::utils::mutex_bufwriter;
use atomtools::writer::{CategoryWriterJSONL, CategoryWriterTSV, CategoryWriterXML, OutputFormat};
use common::{
    settings::{Settings, DEFAULT_SETTINGS_PATH},
    utils::Timer,
};

/// Extract categories from feeds into the configured output.
fn run_extract(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let settings = Settings::new(matches.value_of("config").unwrap_or(DEFAULT_SETTINGS_PATH))?;
    debug!("settings: {:#?}", settings);

    let format = matches
        .value_of("format")
        .unwrap_or(&settings.output.format)
        .parse::<OutputFormat>()?;
    let feeds = match matches.values_of("FEED") {
        Some(feeds) => feeds.map(PathBuf::from).collect::<Vec<_>>(),
        None => settings.input.feeds.clone(),
    };
    if feeds.is_empty() {
        return Err("no feeds given on the command line or in settings".into());
    }

    let writer = mutex_bufwriter(matches.value_of("output"), settings.output.buffer_size)?;
    let mut timer = Timer::new();
    info!("Extracting categories from {} feeds as {:?}", feeds.len(), format);
    let written = match format {
        OutputFormat::Tsv => extract_with_writer(CategoryWriterTSV, &feeds, &writer)?,
        OutputFormat::Jsonl => extract_with_writer(CategoryWriterJSONL, &feeds, &writer)?,
        OutputFormat::Xml => extract_with_writer(CategoryWriterXML, &feeds, &writer)?,
    };
    writer
        .into_inner()
        .map_err(|_| "output writer poisoned")?
        .flush()?;
    info!("Wrote {} categories", written);
    timer.finish("Extraction");
    Ok(())
}

/// Print one `atom:category` element built from the given attributes.
fn run_write(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let mut category = Category::new();
    category.set_term(matches.value_of("term").map(str::to_owned));
    category.set_scheme(matches.value_of("scheme").map(str::to_owned));
    category.set_label(matches.value_of("label").map(str::to_owned));
    category.set_content(matches.value_of("content").map(str::to_owned));

    let stdout = io::stdout();
    let mut out = stdout.lock();
    category.write_xml(&mut XmlWriter::new(&mut out))?;
    writeln!(out)?;
    Ok(())
}

/// Print the fields parsed from a category fragment.
fn run_parse(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let fragment = matches.value_of("FRAGMENT").unwrap_or_default();
    let category = Category::from_xml(fragment)?;
    println!("term\t{}", category.term().unwrap_or(""));
    println!("scheme\t{}", category.scheme().unwrap_or(""));
    println!("label\t{}", category.label().unwrap_or(""));
    println!("undefined_content\t{}", category.undefined_content());
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let matches = App::new("atomtools")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Read and write ATOM category elements")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("extract")
                .about("Extract every category from one or more ATOM feeds")
                .arg(
                    Arg::with_name("config")
                        .long("config")
                        .short("c")
                        .takes_value(true)
                        .help("Settings file (TOML)"),
                )
                .arg(
                    Arg::with_name("format")
                        .long("format")
                        .short("f")
                        .takes_value(true)
                        .possible_values(&["tsv", "jsonl", "xml"])
                        .help("Output format"),
                )
                .arg(
                    Arg::with_name("output")
                        .long("output")
                        .short("o")
                        .takes_value(true)
                        .help("Output path; defaults to stdout"),
                )
                .arg(
                    Arg::with_name("FEED")
                        .multiple(true)
                        .help("Feed files, optionally bzip2-compressed"),
                ),
        )
        .subcommand(
            SubCommand::with_name("write")
                .about("Print an atom:category element")
                .arg(Arg::with_name("term").long("term").takes_value(true))
                .arg(Arg::with_name("scheme").long("scheme").takes_value(true))
                .arg(Arg::with_name("label").long("label").takes_value(true))
                .arg(
                    Arg::with_name("content")
                        .long("content")
                        .takes_value(true)
                        .help("Inner content, written unescaped"),
                ),
        )
        .subcommand(
            SubCommand::with_name("parse")
                .about("Parse a category fragment and print its fields")
                .arg(Arg::with_name("FRAGMENT").required(true)),
        )
        .get_matches();

    match matches.subcommand() {
        ("extract", Some(sub)) => run_extract(sub),
        ("write", Some(sub)) => run_write(sub),
        ("parse", Some(sub)) => run_parse(sub),
        _ => Ok(()),
    }
}
