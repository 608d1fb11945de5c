use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use userctl_config::Config;
use userctl_store::perform;
use userctl_types::Arguments;

const MAIN_HELP: &str = r#"Manage a list of user records stored as a JSON array in a single file.

Operations:
  list       print the file contents as-is
  add        add the user given by -item unless its id is already taken
  findById   print the user with the given -id, or nothing
  remove     remove the user with the given -id

Flags may be written with one dash (-fileName users.json) or two
(--fileName users.json)."#;

/// Long flags that may be spelled with a single dash.
const LONG_FLAGS: &[&str] = &[
    "operation",
    "fileName",
    "item",
    "id",
    "config",
    "verbose",
    "help",
    "version",
];

#[derive(Parser, Debug)]
#[command(name = "userctl")]
#[command(about = MAIN_HELP)]
#[command(version)]
struct Cli {
    #[arg(long, value_name = "OPERATION", allow_hyphen_values = true, help = "One of list, add, findById, remove")]
    operation: Option<String>,

    #[arg(long = "fileName", value_name = "PATH", allow_hyphen_values = true, help = "JSON file holding the users")]
    file_name: Option<String>,

    #[arg(long, value_name = "JSON", allow_hyphen_values = true, help = "User to add, e.g. '{\"id\":\"1\",\"email\":\"a@b.c\",\"age\":30}'")]
    item: Option<String>,

    #[arg(long, allow_hyphen_values = true, help = "User id, for findById and remove")]
    id: Option<String>,

    #[arg(long, env = "USERCTL_CONFIG", value_name = "PATH", help = "Config file location")]
    config: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count, help = "Increase log verbosity (-v info, -vv debug, -vvv trace)")]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse_from(normalize_flag_args(std::env::args_os()));

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    init_logging(&config, cli.verbose);

    let args = build_arguments(cli, &config);
    debug!("Arguments: {:?}", args);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    perform(&args, &mut out)?;
    out.flush()?;

    Ok(())
}

fn build_arguments(cli: Cli, config: &Config) -> Arguments {
    Arguments {
        operation: cli.operation,
        file_name: config.resolve_file_name(cli.file_name),
        item: cli.item,
        id: cli.id,
    }
}

fn log_level(config: &Config, verbose: u8) -> &str {
    match verbose {
        0 => &config.logging.level,
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn init_logging(config: &Config, verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level(config, verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

/// Rewrites `-fileName x` and `-fileName=x` to their double-dash form so clap
/// accepts both spellings. Arguments after `--` are left alone.
fn normalize_flag_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut seen_terminator = false;
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            if seen_terminator {
                return arg;
            }
            let Some(s) = arg.to_str() else {
                return arg;
            };
            if s == "--" {
                seen_terminator = true;
                return arg;
            }
            match s.strip_prefix('-') {
                Some(rest) if !rest.starts_with('-') => {
                    let name = rest.split('=').next().unwrap_or(rest);
                    if LONG_FLAGS.contains(&name) {
                        OsString::from(format!("-{}", s))
                    } else {
                        arg
                    }
                }
                _ => arg,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(normalize_flag_args(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_single_dash_flags_are_rewritten() {
        let args = normalize_flag_args(["userctl", "-operation", "list", "-fileName=users.json"]);
        assert_eq!(
            args,
            vec![
                OsString::from("userctl"),
                OsString::from("--operation"),
                OsString::from("list"),
                OsString::from("--fileName=users.json"),
            ]
        );
    }

    #[test]
    fn test_short_and_unknown_flags_are_kept() {
        let args = normalize_flag_args(["userctl", "-vv", "-x", "--id", "1", "--", "-id"]);
        assert_eq!(
            args,
            vec![
                OsString::from("userctl"),
                OsString::from("-vv"),
                OsString::from("-x"),
                OsString::from("--id"),
                OsString::from("1"),
                OsString::from("--"),
                OsString::from("-id"),
            ]
        );
    }

    #[test]
    fn test_both_spellings_parse_the_same() {
        let single = parse(&[
            "userctl",
            "-operation",
            "add",
            "-item",
            r#"{"id":"1","email":"a@b.c","age":2}"#,
            "-fileName",
            "users.json",
        ]);
        let double = parse(&[
            "userctl",
            "--operation=add",
            "--item",
            r#"{"id":"1","email":"a@b.c","age":2}"#,
            "--fileName=users.json",
        ]);

        for cli in [single, double] {
            assert_eq!(cli.operation.as_deref(), Some("add"));
            assert_eq!(cli.file_name.as_deref(), Some("users.json"));
            assert_eq!(
                cli.item.as_deref(),
                Some(r#"{"id":"1","email":"a@b.c","age":2}"#)
            );
            assert!(cli.id.is_none());
        }
    }

    #[test]
    fn test_values_may_start_with_a_hyphen() {
        let cli = parse(&[
            "userctl",
            "-operation",
            "remove",
            "-id",
            "-5",
            "-fileName",
            "f",
        ]);
        assert_eq!(cli.id.as_deref(), Some("-5"));
        assert_eq!(cli.file_name.as_deref(), Some("f"));

        let cli = parse(&["userctl", "--fileName", "-users.json", "--operation", "list"]);
        assert_eq!(cli.file_name.as_deref(), Some("-users.json"));
        assert_eq!(cli.operation.as_deref(), Some("list"));
    }

    #[test]
    fn test_missing_flags_are_left_to_the_dispatcher() {
        let cli = parse(&["userctl", "-id", "7"]);
        let args = build_arguments(cli, &Config::default());
        assert_eq!(args.operation, None);
        assert_eq!(args.file_name, None);
        assert_eq!(args.id.as_deref(), Some("7"));
    }

    #[test]
    fn test_config_default_file() {
        let mut config = Config::default();
        config.storage.default_file = Some("default.json".to_string());

        let args = build_arguments(parse(&["userctl", "-operation", "list"]), &config);
        assert_eq!(args.file_name.as_deref(), Some("default.json"));

        let args = build_arguments(
            parse(&["userctl", "-operation", "list", "-fileName", "cli.json"]),
            &config,
        );
        assert_eq!(args.file_name.as_deref(), Some("cli.json"));
    }

    #[test]
    fn test_verbosity_overrides_config_level() {
        let config = Config::default();
        assert_eq!(log_level(&config, 0), "warn");
        assert_eq!(log_level(&config, 1), "info");
        assert_eq!(log_level(&config, 2), "debug");
        assert_eq!(log_level(&config, 5), "trace");
    }

    #[test]
    fn test_end_to_end_add_then_find() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("users.json");
        let file = file.to_str().unwrap();

        let add = build_arguments(
            parse(&[
                "userctl",
                "-operation",
                "add",
                "-item",
                r#"{"id":"9","email":"n@m.o","age":5}"#,
                "-fileName",
                file,
            ]),
            &Config::default(),
        );
        let mut out = Vec::new();
        perform(&add, &mut out).unwrap();
        assert!(out.is_empty());

        let find = build_arguments(
            parse(&["userctl", "-operation", "findById", "-id", "9", "-fileName", file]),
            &Config::default(),
        );
        let mut out = Vec::new();
        perform(&find, &mut out).unwrap();
        assert_eq!(out, br#"{"id":"9","email":"n@m.o","age":5}"#);
    }
}
