use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use std::path::PathBuf;

use critic_cli::commands::{run_cross_validation, run_test, run_training};
use critic_cli::config::RunConfig;

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("CRITIC_LOG", "error,critic=info"))
        .init();

    let matches = Command::new("critic")
        .version(clap::crate_version!())
        .about("Complement Naive Bayes for ordinal movie review sentiment")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("cv")
                .about("Cross-validate Complement Naive Bayes on a labelled table")
                .arg(data_arg())
                .arg(
                    Arg::new("folds")
                        .short('k')
                        .long("folds")
                        .help("Number of folds. Overrides the configuration file.")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .help("Seed for the fold assignment. Overrides the configuration file.")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(alpha_arg())
                .arg(label_set_arg())
                .arg(
                    Arg::new("binary")
                        .long("binary")
                        .help("Also report accuracy after collapsing ratings to negative/positive.")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("parallel")
                        .long("parallel")
                        .help("Evaluate folds in parallel.")
                        .action(ArgAction::SetTrue),
                )
                .arg(config_arg()),
        )
        .subcommand(
            Command::new("train")
                .about("Train a model on a whole labelled table and save it as JSON")
                .arg(data_arg())
                .arg(
                    Arg::new("output_file")
                        .short('o')
                        .long("output")
                        .help("Path the model JSON will be written to")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(alpha_arg())
                .arg(label_set_arg())
                .arg(config_arg()),
        )
        .subcommand(
            Command::new("test")
                .about("Score a labelled table with a saved model")
                .arg(
                    Arg::new("model")
                        .help("Path to a model JSON written by `critic train`")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(data_arg())
                .arg(
                    Arg::new("binary")
                        .long("binary")
                        .help("Also report the negative/positive collapsed figures.")
                        .action(ArgAction::SetTrue),
                )
                .arg(label_set_arg())
                .arg(config_arg()),
        )
        .help_template(
            "{usage-heading} {usage}\n\n\
             {about-with-newline}\n\
             Version {version}\n\n\
             {all-args}{after-help}",
        )
        .get_matches();

    match matches.subcommand() {
        Some(("cv", sub_m)) => handle_cv(sub_m),
        Some(("train", sub_m)) => handle_train(sub_m),
        Some(("test", sub_m)) => handle_test(sub_m),
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

fn data_arg() -> Arg {
    Arg::new("data")
        .help("Labelled feature table (*.csv or *.tsv)")
        .required(true)
        .value_parser(clap::value_parser!(PathBuf))
        .value_hint(ValueHint::FilePath)
}

fn alpha_arg() -> Arg {
    Arg::new("alpha")
        .long("alpha")
        .help("Smoothing constant. Overrides the configuration file.")
        .value_parser(clap::value_parser!(f64))
}

fn label_set_arg() -> Arg {
    Arg::new("label_set")
        .long("label-set")
        .help("Label scale of the data. Overrides the configuration file.")
        .value_parser(["four-class", "binary"])
        .value_hint(ValueHint::Other)
}

fn config_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .help("Path to a JSON run configuration file")
        .value_parser(clap::value_parser!(PathBuf))
        .value_hint(ValueHint::FilePath)
}

fn load_config(matches: &ArgMatches) -> Result<RunConfig> {
    let config_path = matches.get_one::<PathBuf>("config");
    match config_path {
        Some(path) => eprintln!("[critic] Using config: {:?}", path),
        None => eprintln!("[critic] No config provided; using defaults."),
    }
    let config = RunConfig::from_arguments(config_path.map(PathBuf::as_path), matches)?;
    if config_path.is_none() {
        let default_json = serde_json::to_string_pretty(&config).unwrap_or_default();
        eprintln!("[critic] Default config:\n{}", default_json);
    }
    Ok(config)
}

fn handle_cv(matches: &ArgMatches) -> Result<()> {
    let data_path: &PathBuf = matches.get_one("data").unwrap();
    let config = load_config(matches)?;
    log::info!("[critic::cv] Cross-validating {:?}", data_path);

    match run_cross_validation(data_path, &config) {
        Ok(report) => {
            println!("{}", report);
            if matches.get_flag("binary") {
                println!("Average binary accuracy: {:.4}", report.mean_binary_accuracy);
            }
            Ok(())
        }
        Err(e) => {
            log::error!("Cross-validation failed: {:#}", e);
            std::process::exit(1)
        }
    }
}

fn handle_train(matches: &ArgMatches) -> Result<()> {
    let data_path: &PathBuf = matches.get_one("data").unwrap();
    let output_path: &PathBuf = matches.get_one("output_file").unwrap();
    let config = load_config(matches)?;
    log::info!("[critic::train] Training on {:?}", data_path);

    match run_training(data_path, output_path, &config) {
        Ok(_) => {
            eprintln!("[critic] Model written to {:?}", output_path);
            Ok(())
        }
        Err(e) => {
            log::error!("Training failed: {:#}", e);
            std::process::exit(1)
        }
    }
}

fn handle_test(matches: &ArgMatches) -> Result<()> {
    let model_path: &PathBuf = matches.get_one("model").unwrap();
    let data_path: &PathBuf = matches.get_one("data").unwrap();
    let config = load_config(matches)?;
    log::info!("[critic::test] Testing {:?} on {:?}", model_path, data_path);

    match run_test(model_path, data_path, &config) {
        Ok(outcome) => {
            println!("{}", outcome.summary);
            if matches.get_flag("binary") {
                println!("Binary:");
                println!("{}", outcome.binary_summary);
            }
            log::debug!("Confusion matrix:\n{}", outcome.confusion);
            Ok(())
        }
        Err(e) => {
            log::error!("Testing failed: {:#}", e);
            std::process::exit(1)
        }
    }
}
