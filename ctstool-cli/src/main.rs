use anyhow::Result;
use clap::{Arg, ArgAction, ArgGroup, ArgMatches, Command};
use ctstool::test_list::identifier;
use ctstool::*;
use std::path::{Path, PathBuf};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let matches = build_cli().get_matches();

    if let Err(err) = run(&matches).await {
        tracing::error!("{:#}", err);
        return Err(err);
    }

    Ok(())
}

async fn run(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("format", sub_matches)) => {
            let config = load_config(sub_matches).await?;
            format_command(&config, sub_matches).await?;
        }
        Some(("gen-test-list", sub_matches)) => {
            let config = load_config(sub_matches).await?;
            gen_test_list_command(&config, sub_matches).await?;
        }
        Some(("case", sub_matches)) => {
            case_command(sub_matches);
        }
        _ => {
            build_cli().print_help()?;
            std::process::exit(1);
        }
    }

    Ok(())
}

fn build_cli() -> Command {
    Command::new("ctstool")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Maintain conformance test expectations and test lists")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("root")
                .long("root")
                .value_name("DIR")
                .help("Checkout root that default paths are relative to")
                .default_value(".")
                .global(true),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("YAML file overriding the default paths")
                .global(true),
        )
        .subcommand(
            Command::new("format")
                .about("Normalize the formatting of an expectations file in place")
                .arg(
                    Arg::new("expectations")
                        .short('e')
                        .long("expectations")
                        .value_name("FILE")
                        .help("Expectations file (defaults to webgpu-cts/expectations.txt)"),
                ),
        )
        .subcommand(
            Command::new("gen-test-list")
                .about("Write the list of test queries found in the CTS sources")
                .arg(
                    Arg::new("cts-dir")
                        .long("cts-dir")
                        .value_name("DIR")
                        .help("CTS checkout (defaults to third_party/webgpu-cts)"),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("FILE")
                        .help("Output file (defaults to third_party/gn/webgpu-cts/test_list.txt)"),
                )
                .arg(
                    Arg::new("suite")
                        .long("suite")
                        .value_name("NAME")
                        .help("Suite to list (defaults to webgpu)"),
                ),
        )
        .subcommand(
            Command::new("case")
                .about("Convert identifiers between PascalCase and snake_case")
                .arg(
                    Arg::new("pascal")
                        .long("pascal")
                        .help("Convert to PascalCase")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("snake")
                        .long("snake")
                        .help("Convert to snake_case")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("query")
                        .long("query")
                        .help("Treat inputs as test queries and print their identifiers")
                        .action(ArgAction::SetTrue),
                )
                .group(
                    ArgGroup::new("target")
                        .args(["pascal", "snake", "query"])
                        .required(true),
                )
                .arg(
                    Arg::new("identifiers")
                        .value_name("IDENT")
                        .required(true)
                        .num_args(1..),
                ),
        )
}

/// Read `--config` if given, otherwise use the built-in defaults
async fn load_config(matches: &ArgMatches) -> Result<Config> {
    match matches.get_one::<String>("config") {
        Some(path) => {
            tracing::info!(config = %path, "using config file");
            parse_config_file(path).await
        }
        None => Ok(Config::default()),
    }
}

fn root_dir(matches: &ArgMatches) -> PathBuf {
    matches
        .get_one::<String>("root")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Flags win over the config file, which wins over the defaults
fn flag_or(matches: &ArgMatches, name: &str, root: &Path, fallback: PathBuf) -> PathBuf {
    match matches.get_one::<String>(name) {
        Some(value) => root.join(value),
        None => fallback,
    }
}

async fn format_command(config: &Config, matches: &ArgMatches) -> Result<()> {
    let root = root_dir(matches);
    let paths = config.resolve(&root);
    let path = flag_or(matches, "expectations", &root, paths.expectations);

    if !path.exists() {
        anyhow::bail!("Expectations file '{}' does not exist", path.display());
    }

    tracing::info!(expectations = %path.display(), "formatting");
    let count = format_expectations(&path).await?;
    println!("✓ Formatted {} expectations in {}", count, path.display());
    Ok(())
}

async fn gen_test_list_command(config: &Config, matches: &ArgMatches) -> Result<()> {
    let root = root_dir(matches);
    let paths = config.resolve(&root);
    let cts_dir = flag_or(matches, "cts-dir", &root, paths.cts_dir);
    let output = flag_or(matches, "output", &root, paths.test_list);
    let suite = matches
        .get_one::<String>("suite")
        .cloned()
        .unwrap_or(paths.suite);

    tracing::info!(cts_dir = %cts_dir.display(), suite = %suite, "listing tests");
    let count = generate_test_list(&cts_dir, &suite, &output).await?;
    println!("✓ Wrote {} test queries to {}", count, output.display());
    Ok(())
}

fn case_command(matches: &ArgMatches) {
    let convert: fn(&str) -> String = if matches.get_flag("pascal") {
        pascal_case
    } else if matches.get_flag("snake") {
        snake_case
    } else {
        identifier
    };

    let idents = matches.get_many::<String>("identifiers").map_or(0, |v| v.len());
    tracing::debug!(count = idents, "converting identifiers");

    for ident in matches.get_many::<String>("identifiers").into_iter().flatten() {
        println!("{}", convert(ident));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_case_requires_a_target() {
        let result = build_cli().try_get_matches_from(["ctstool", "case", "HelloWorld"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_case_targets_are_exclusive() {
        let result = build_cli().try_get_matches_from([
            "ctstool", "case", "--pascal", "--snake", "hello",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_flags_override_config() {
        let matches = build_cli()
            .try_get_matches_from([
                "ctstool",
                "--root",
                "/src/dawn",
                "gen-test-list",
                "--output",
                "list.txt",
            ])
            .unwrap();
        let (_, sub_matches) = matches.subcommand().unwrap();

        let root = root_dir(sub_matches);
        let config = Config {
            test_list: Some(PathBuf::from("from_config.txt")),
            cts_dir: Some(PathBuf::from("cts")),
            ..Config::default()
        };
        let paths = config.resolve(&root);

        assert_eq!(root, PathBuf::from("/src/dawn"));
        assert_eq!(
            flag_or(sub_matches, "output", &root, paths.test_list),
            PathBuf::from("/src/dawn/list.txt")
        );
        assert_eq!(
            flag_or(sub_matches, "cts-dir", &root, paths.cts_dir),
            PathBuf::from("/src/dawn/cts")
        );
    }

    #[tokio::test]
    async fn test_gen_test_list_rejects_parent_suite() {
        let dir = tempfile::tempdir().unwrap();
        let spec = dir.path().join("third_party/webgpu-cts/src/webgpu/api/x.spec.ts");
        std::fs::create_dir_all(spec.parent().unwrap()).unwrap();
        std::fs::write(&spec, "").unwrap();

        let root = dir.path().to_str().unwrap();
        let matches = build_cli()
            .try_get_matches_from(["ctstool", "--root", root, "gen-test-list", "--suite", ".."])
            .unwrap();

        let err = run(&matches).await.unwrap_err();

        assert!(err.to_string().contains("Suite name"));
        assert!(!dir
            .path()
            .join("third_party/gn/webgpu-cts/test_list.txt")
            .exists());
    }

    #[tokio::test]
    async fn test_format_command_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_str().unwrap();
        let matches = build_cli()
            .try_get_matches_from(["ctstool", "--root", root, "format"])
            .unwrap();
        let (_, sub_matches) = matches.subcommand().unwrap();

        let err = format_command(&Config::default(), sub_matches)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
