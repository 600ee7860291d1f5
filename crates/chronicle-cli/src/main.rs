// Copyright 2026 The chronicle authors
// Licensed under the Apache License, Version 2.0

mod config;

use anyhow::{Context, Result};
use chronicle_app::AppState;
use chronicle_tui::UiOptions;
use config::Config;
use std::env;
use std::path::PathBuf;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `chronicle --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    let archive_path = match &options.archive_path {
        Some(path) => {
            chronicle_store::validate_archive_path(&path.to_string_lossy())?;
            path.clone()
        }
        None => config.archive_path()?,
    };
    if options.print_archive_path {
        println!("{}", archive_path.display());
        return Ok(());
    }

    let archive = if options.demo {
        chronicle_testkit::demo_archive()
    } else {
        chronicle_store::load_archive(&archive_path).with_context(|| {
            format!(
                "open archive {} -- if this path is wrong, set [storage].archive_path or CHRONICLE_ARCHIVE_PATH; run with --demo to try a generated archive",
                archive_path.display()
            )
        })?
    };

    if options.check_only {
        return Ok(());
    }

    let ui_options = UiOptions {
        segmenter: config.segmenter_config(),
        show_reading_time: config.show_reading_time(),
    };
    let mut state = AppState::new(archive.len());
    chronicle_tui::run_app(&mut state, &archive, &ui_options)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    archive_path: Option<PathBuf>,
    print_config_path: bool,
    print_archive_path: bool,
    demo: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        archive_path: None,
        print_config_path: false,
        print_archive_path: false,
        demo: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--archive" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--archive requires a file path"))?;
                options.archive_path = Some(PathBuf::from(value.as_ref()));
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-archive-path" => {
                options.print_archive_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("chronicle");
    println!("  --config <path>          Use a specific config path");
    println!("  --archive <path>         Read chapters from a specific archive file");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-archive-path     Print resolved archive path");
    println!("  --print-example-config   Print a config template");
    println!("  --demo                   Launch with a generated demo archive");
    println!("  --check                  Validate config + archive, then exit");
    println!("  --help                   Show this help");
}

#[cfg(test)]
mod tests {
    use super::{CliOptions, parse_cli_args};
    use anyhow::Result;
    use std::path::PathBuf;

    fn default_options_path() -> PathBuf {
        PathBuf::from("/tmp/chronicle-config.toml")
    }

    #[test]
    fn parse_cli_args_defaults_to_provided_config_path() -> Result<()> {
        let options = parse_cli_args(Vec::<String>::new(), default_options_path())?;
        assert_eq!(
            options,
            CliOptions {
                config_path: default_options_path(),
                archive_path: None,
                print_config_path: false,
                print_archive_path: false,
                demo: false,
                print_example: false,
                check_only: false,
                show_help: false,
            }
        );
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_path_overrides() -> Result<()> {
        let options = parse_cli_args(
            vec!["--config", "/custom/config.toml", "--archive", "/data/a.json"],
            default_options_path(),
        )?;
        assert_eq!(options.config_path, PathBuf::from("/custom/config.toml"));
        assert_eq!(options.archive_path, Some(PathBuf::from("/data/a.json")));
        Ok(())
    }

    #[test]
    fn parse_cli_args_errors_for_missing_values() {
        let error = parse_cli_args(vec!["--config"], default_options_path())
            .expect_err("missing config value should fail");
        assert!(error.to_string().contains("--config requires a file path"));

        let error = parse_cli_args(vec!["--archive"], default_options_path())
            .expect_err("missing archive value should fail");
        assert!(error.to_string().contains("--archive requires a file path"));
    }

    #[test]
    fn parse_cli_args_errors_for_unknown_argument() {
        let error = parse_cli_args(vec!["--wat"], default_options_path())
            .expect_err("unknown arg should fail");
        let message = error.to_string();
        assert!(message.contains("unknown argument"));
        assert!(message.contains("--help"));
    }

    #[test]
    fn parse_cli_args_sets_print_and_check_flags() -> Result<()> {
        let options = parse_cli_args(
            vec!["--print-config-path", "--print-example-config", "--check"],
            default_options_path(),
        )?;
        assert!(options.print_config_path);
        assert!(!options.print_archive_path);
        assert!(!options.demo);
        assert!(options.print_example);
        assert!(options.check_only);
        assert!(!options.show_help);
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_demo_and_archive_path_print_flags() -> Result<()> {
        let options =
            parse_cli_args(vec!["--demo", "--print-archive-path"], default_options_path())?;
        assert!(options.demo);
        assert!(options.print_archive_path);
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_help_flag_for_long_and_short_variants() -> Result<()> {
        let long = parse_cli_args(vec!["--help"], default_options_path())?;
        assert!(long.show_help);

        let short = parse_cli_args(vec!["-h"], default_options_path())?;
        assert!(short.show_help);
        Ok(())
    }
}
