//! Command-line interface for markweave
//! This binary merges two annotated markup files that share the same plain
//! text, and can dump the annotation event stream extracted from a file.
//!
//! Usage:
//!   markweave merge `<original>` `<secondary>`  - Merge two annotation markups
//!   markweave events `<path>` [--json]        - Dump extracted events

use clap::{Arg, ArgAction, Command};
use markweave::{extract, merge, parse_markup, Element};
use std::fs;

fn main() {
    let matches = Command::new("markweave")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Merge two independent annotation markups over the same plain text")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("merge")
                .about("Merge an original and a secondary annotated markup file")
                .arg(
                    Arg::new("original")
                        .help("Path to the original annotated markup")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("secondary")
                        .help("Path to the secondary annotated markup")
                        .required(true)
                        .index(2),
                ),
        )
        .subcommand(
            Command::new("events")
                .about("Dump the annotation events extracted from a markup file")
                .arg(
                    Arg::new("path")
                        .help("Path to the annotated markup file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Emit the event sequence as JSON")
                        .action(ArgAction::SetTrue),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("merge", merge_matches)) => {
            let original = merge_matches.get_one::<String>("original").unwrap();
            let secondary = merge_matches.get_one::<String>("secondary").unwrap();
            handle_merge_command(original, secondary);
        }
        Some(("events", events_matches)) => {
            let path = events_matches.get_one::<String>("path").unwrap();
            handle_events_command(path, events_matches.get_flag("json"));
        }
        _ => unreachable!("subcommand required"),
    }
}

fn handle_merge_command(original_path: &str, secondary_path: &str) {
    let original = read_fragment(original_path);
    let secondary = read_fragment(secondary_path);

    let text = original.plain_text();
    if secondary.plain_text() != text {
        eprintln!(
            "Error: {} and {} do not flatten to the same plain text",
            original_path, secondary_path
        );
        std::process::exit(1);
    }

    match merge(extract(&original), extract(&secondary), &text) {
        Ok(merged) => println!("{}", merged),
        Err(err) => {
            eprintln!("Error merging: {}", err);
            std::process::exit(1);
        }
    }
}

fn handle_events_command(path: &str, as_json: bool) {
    let fragment = read_fragment(path);
    let events = extract(&fragment);

    if as_json {
        match serde_json::to_string_pretty(&events) {
            Ok(json) => println!("{}", json),
            Err(err) => {
                eprintln!("Error serializing events: {}", err);
                std::process::exit(1);
            }
        }
    } else {
        for event in events.iter() {
            println!("{:>6}  {:<5?}  <{}>", event.offset, event.kind, event.tag.name);
        }
    }
}

fn read_fragment(path: &str) -> Element {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("Error reading {}: {}", path, err);
            std::process::exit(1);
        }
    };
    // A single trailing newline is file formatting, not annotated text.
    let source = source.strip_suffix('\n').unwrap_or(&source);

    match parse_markup(source) {
        Ok(fragment) => fragment,
        Err(err) => {
            eprintln!("Error parsing {}: {}", path, err);
            std::process::exit(1);
        }
    }
}
