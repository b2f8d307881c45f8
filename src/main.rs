use clap::{
    crate_authors, crate_description, crate_name, crate_version, Arg, ArgAction, ArgMatches,
    Command,
};
use colored::Colorize;
use foldergen::store::DEFAULT_CONFIG_PATH;
use std::path::PathBuf;

const DEFAULT_ASSETS_ROOT: &str = "Assets";

// The CLI layer should only parse inputs and forward them to library code.
fn main() -> miette::Result<()> {
    let root_arg = Arg::new("root").help("Name of the root folder created inside the assets root");

    let matches = Command::new(crate_name!())
        .about(crate_description!())
        .author(crate_authors!())
        .version(crate_version!())
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Folder structure config file")
                .default_value(DEFAULT_CONFIG_PATH)
                .global(true),
        )
        .arg(
            Arg::new("assets")
                .short('a')
                .long("assets")
                .help("Directory the folder structure is generated in")
                .default_value(DEFAULT_ASSETS_ROOT)
                .global(true),
        )
        .subcommand(
            Command::new("generate")
                .about("Creates every missing folder described by the config")
                .arg(root_arg.clone())
                .arg(
                    Arg::new("yes")
                        .short('y')
                        .long("yes")
                        .help("Skip the preview and confirmation")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("preview")
                .about("Shows the folders a generate run would create")
                .arg(root_arg),
        )
        .subcommand(
            Command::new("init")
                .about("Writes the starter folder structure config")
                .arg(
                    Arg::new("force")
                        .short('f')
                        .long("force")
                        .help("Overwrite an existing config")
                        .action(ArgAction::SetTrue),
                ),
        )
        .get_matches();

    init_logging(matches.get_flag("verbose"));

    match matches.subcommand() {
        Some(("generate", args)) => handle_generate(args),
        Some(("preview", args)) => handle_preview(args),
        Some(("init", args)) => handle_init(args),
        _ => unreachable!(),
    }
}

fn init_logging(is_verbose: bool) {
    let level = if is_verbose { "debug" } else { "info" };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    log::debug!("executing in verbose mode");
}

fn paths(args: &ArgMatches) -> (PathBuf, PathBuf) {
    let config = args
        .get_one::<String>("config")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let assets = args
        .get_one::<String>("assets")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ASSETS_ROOT));

    (config, assets)
}

fn handle_generate(args: &ArgMatches) -> miette::Result<()> {
    let (config, assets) = paths(args);
    let root = args.get_one::<String>("root").map(String::as_str);
    let assume_yes = args.get_flag("yes");

    match foldergen::api::generate_folders(&config, &assets, root, assume_yes)? {
        Some(result) => println!("{}", result.message().green()),
        None => println!("{}", "Nothing was created.".yellow()),
    }

    Ok(())
}

fn handle_preview(args: &ArgMatches) -> miette::Result<()> {
    let (config, assets) = paths(args);
    let root = args.get_one::<String>("root").map(String::as_str);

    foldergen::api::preview_folders(&config, &assets, root)?;

    Ok(())
}

fn handle_init(args: &ArgMatches) -> miette::Result<()> {
    let (config, _) = paths(args);

    foldergen::api::init_config(&config, args.get_flag("force"))?;

    Ok(())
}
