// Command-line interface for styler.
//
// This binary is a thin wrapper over the four programmatic entry points
// `Engine::style_text`/`style_file`/`style_dir`/`style_pkg`, exposed as a
// single `fmt` subcommand.
//
// Usage:
//  styler fmt <path> [--recursive] [--dry <off|on|fail>] [--strict]
//                     [--scope <spaces|indention|line_breaks|tokens>]
//                     [--style <name>]
//
// The host-language parser is a pluggable collaborator; this binary wires up
// `styler_core`'s bundled reference parser so the CLI runs standalone, but a
// real deployment should plug in the target language's own parser.

use clap::{Arg, ArgAction, Command};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use styler_config::Loader;
use styler_core::testing::FlatReferenceParser;
use styler_core::{Dry, Engine, Options, Scope};
use styler_rules::StyleGuideRegistry;

fn build_cli() -> Command {
    Command::new("styler")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A source-code formatter for a token-level parse table")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("fmt")
                .about("Style one file, one directory, or a package tree")
                .arg(Arg::new("path").required(true).index(1).help("File or directory to style"))
                .arg(
                    Arg::new("recursive")
                        .long("recursive")
                        .action(ArgAction::SetTrue)
                        .help("Recurse into subdirectories when <path> is a directory"),
                )
                .arg(
                    Arg::new("pkg")
                        .long("pkg")
                        .action(ArgAction::SetTrue)
                        .help("Treat <path> as a package root (R/, tests/, vignettes/)"),
                )
                .arg(
                    Arg::new("dry")
                        .long("dry")
                        .value_parser(["off", "on", "fail"])
                        .default_value("off")
                        .help("off: write back; on: report only; fail: error if a change was needed"),
                )
                .arg(Arg::new("strict").long("strict").action(ArgAction::SetTrue))
                .arg(
                    Arg::new("scope")
                        .long("scope")
                        .value_parser(["spaces", "indention", "line_breaks", "tokens"])
                        .default_value("tokens"),
                )
                .arg(Arg::new("style").long("style").default_value("tidyverse")),
        )
}

fn parse_dry(s: &str) -> Dry {
    match s {
        "on" => Dry::On,
        "fail" => Dry::Fail,
        _ => Dry::Off,
    }
}

fn parse_scope(s: &str) -> Scope {
    match s {
        "spaces" => Scope::Spaces,
        "indention" => Scope::Indention,
        "line_breaks" => Scope::LineBreaks,
        _ => Scope::Tokens,
    }
}

fn main() -> ExitCode {
    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("fmt", sub)) => run_fmt(sub),
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            ExitCode::FAILURE
        }
    }
}

fn run_fmt(sub: &clap::ArgMatches) -> ExitCode {
    let path = PathBuf::from(sub.get_one::<String>("path").expect("path is required"));
    let recursive = sub.get_flag("recursive");
    let as_pkg = sub.get_flag("pkg");
    let style_name = sub.get_one::<String>("style").map(String::as_str).unwrap_or("tidyverse");

    let registry = StyleGuideRegistry::with_builtins();
    let Some(guide) = registry.get(style_name) else {
        eprintln!("unknown style guide '{}'; available: {:?}", style_name, registry.names());
        return ExitCode::FAILURE;
    };

    let project_root = if path.is_dir() {
        path.as_path()
    } else {
        path.parent().unwrap_or_else(|| Path::new("."))
    };
    let config = match Loader::new()
        .with_optional_file(project_root.join(".styler.toml"))
        .build()
    {
        Ok(c) => c,
        Err(e) => {
            eprintln!("invalid option: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut options: Options = config.formatting.options;
    options.dry = parse_dry(sub.get_one::<String>("dry").unwrap());
    options.scope = parse_scope(sub.get_one::<String>("scope").unwrap());
    if sub.get_flag("strict") {
        options.strict = true;
    }

    let markers = match config.formatting.ignore_markers.compile() {
        Ok(m) => m,
        Err(e) => {
            eprintln!("invalid option: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let parser = FlatReferenceParser;
    let mut engine = match (config.formatting.cache.enabled, styler_cache::DiskCache::from_env_or(config.formatting.cache.root_path())) {
        (true, Some(disk)) => Engine::with_cache(&parser, &guide, Box::new(disk)),
        _ => Engine::new(&parser, &guide),
    }
    .with_markers(markers);

    if as_pkg {
        let code = report_batch(engine.style_pkg(&path, &options));
        print_warnings(&mut engine);
        return code;
    }
    if path.is_dir() {
        if !recursive {
            eprintln!("{} is a directory; pass --recursive or --pkg", path.display());
            return ExitCode::FAILURE;
        }
        let code = report_batch(engine.style_dir(&path, &options));
        print_warnings(&mut engine);
        return code;
    }

    let code = match engine.style_file(&path, &options) {
        Ok(changed) => {
            if changed {
                println!("{}: reformatted", path.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}: {}", path.display(), e);
            ExitCode::FAILURE
        }
    };
    print_warnings(&mut engine);
    code
}

/// Print and drain every warning the engine accumulated over the whole job
/// (unbalanced ignore markers, demoted cache I/O errors). Never fatal; the
/// run's exit code is decided entirely by `report_batch`/`style_file` above.
fn print_warnings(engine: &mut Engine<'_>) {
    for warning in engine.take_warnings() {
        eprintln!("warning: {}", warning);
    }
}

fn report_batch(result: Result<Vec<(PathBuf, bool)>, styler_core::StyleError>) -> ExitCode {
    match result {
        Ok(results) => {
            for (path, changed) in &results {
                if *changed {
                    println!("{}: reformatted", path.display());
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
