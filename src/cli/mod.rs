// FILE: src/cli/mod.rs

mod config;
mod handlers;

use crate::error::Result;
use crate::CompilerOptions;
use clap::{Arg, ArgAction, Command, ValueEnum};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Left-to-right stylesheet
    Css,
    /// Right-to-left stylesheet
    Rtl,
    /// Compiled namespaces and artifact tuples
    Json,
}

pub struct EnhancedCli {
    config: config::ConfigFile,
    start_time: Instant,
}

impl Default for EnhancedCli {
    fn default() -> Self {
        Self::new()
    }
}

impl EnhancedCli {
    pub fn new() -> Self {
        Self {
            config: config::ConfigFile::default(),
            start_time: Instant::now(),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        self.start_time = Instant::now();
        let matches = self.build_cli().get_matches();

        if let Some(config_path) = matches.get_one::<String>("config") {
            self.config = config::load(config_path)?;
        }

        self.setup_logging(matches.get_count("verbose"))?;

        match matches.subcommand() {
            Some(("compile", sub_matches)) => handlers::handle_compile_command(self, sub_matches),
            Some(("check", sub_matches)) => handlers::handle_check_command(self, sub_matches),
            Some(("hash", sub_matches)) => handlers::handle_hash_command(self, sub_matches),
            _ => {
                println!("No subcommand specified. Use --help for usage information.");
                Ok(())
            }
        }
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.start_time.elapsed().as_millis()
    }

    fn build_cli(&self) -> Command {
        Command::new(crate::NAME)
            .version(crate::VERSION)
            .about(crate::DESCRIPTION)
            .author("atomc Development Team")
            .arg(
                Arg::new("config")
                    .short('c')
                    .long("config")
                    .value_name("FILE")
                    .help("Configuration file path (.json or .toml)")
                    .action(ArgAction::Set),
            )
            .arg(
                Arg::new("verbose")
                    .short('v')
                    .long("verbose")
                    .help("Increase verbosity (can be used multiple times)")
                    .action(ArgAction::Count),
            )
            .subcommand(
                Command::new("compile")
                    .about("Compile JSON style sources to atomic CSS")
                    .arg(Arg::new("inputs").help("Input JSON files or directories").required(true).num_args(1..).action(ArgAction::Append))
                    .arg(Arg::new("output").short('o').long("output").value_name("FILE").help("Output file (stdout when omitted)"))
                    .arg(Arg::new("format").short('f').long("format").value_parser(clap::value_parser!(OutputFormat)).default_value("css").help("Output format"))
                    .args(option_args())
                    .arg(Arg::new("jobs").short('j').long("jobs").value_name("N").value_parser(clap::value_parser!(usize)).help("Number of compiler threads"))
                    .arg(Arg::new("stats").long("stats").help("Show detailed compilation statistics").action(ArgAction::SetTrue))
                    .arg(Arg::new("watch").short('w').long("watch").help("Watch for file changes and recompile").action(ArgAction::SetTrue)),
            )
            .subcommand(
                Command::new("check")
                    .about("Validate JSON style sources and report warnings")
                    .arg(Arg::new("input").help("Input JSON file or directory").required(true).index(1))
                    .arg(Arg::new("recursive").short('r').long("recursive").help("Check all JSON files in directory recursively").action(ArgAction::SetTrue))
                    .args(option_args()),
            )
            .subcommand(
                Command::new("hash")
                    .about("Print the class name and rules for one declaration")
                    .arg(Arg::new("property").help("Property name, camelCase or dashed").required(true).index(1))
                    .arg(Arg::new("value").help("Property value; bare numbers get their default unit").required(true).index(2).allow_hyphen_values(true))
                    .arg(Arg::new("context").long("context").value_name("SEG").help("Pseudo-class, pseudo-element or at-rule, outermost first").action(ArgAction::Append))
                    .args(option_args()),
            )
    }

    fn setup_logging(&self, verbose_count: u8) -> Result<()> {
        let log_level = match verbose_count {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };
        env_logger::Builder::from_default_env()
            .filter_level(log_level)
            .format_timestamp_secs()
            .init();
        Ok(())
    }

    /// Defaults, then the config file, then command-line flags
    pub fn build_compiler_options(&self, matches: &clap::ArgMatches) -> Result<CompilerOptions> {
        let mut options = CompilerOptions::default();
        self.config.apply(&mut options);

        if let Some(prefix) = matches.get_one::<String>("prefix") {
            options.class_name_prefix = prefix.clone();
        }
        if matches.get_flag("no-expand") {
            options.expand_shorthands = false;
        }
        if matches.get_flag("no-logical") {
            options.logical_properties = false;
        }
        options.debug_mode = matches.get_flag("debug") || options.debug_mode;

        options.validate()?;
        Ok(options)
    }

    pub fn configured_output(&self) -> Option<&str> {
        self.config.output_file.as_deref()
    }
}

fn option_args() -> [Arg; 4] {
    [
        Arg::new("prefix").long("prefix").value_name("P").help("Class name prefix"),
        Arg::new("no-expand").long("no-expand").help("Keep shorthands unexpanded").action(ArgAction::SetTrue),
        Arg::new("no-logical").long("no-logical").help("Keep physical properties as written").action(ArgAction::SetTrue),
        Arg::new("debug").short('d').long("debug").help("Enable debug mode with extra logging").action(ArgAction::SetTrue),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        EnhancedCli::new().build_cli().debug_assert();
    }

    #[test]
    fn test_flags_overlay_defaults() {
        let cli = EnhancedCli::new();
        let matches = cli
            .build_cli()
            .try_get_matches_from(["atomc", "compile", "a.json", "--prefix", "y", "--no-expand", "-j", "2"])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        assert_eq!(sub.get_one::<usize>("jobs"), Some(&2));
        let options = cli.build_compiler_options(sub).unwrap();

        assert_eq!(options.class_name_prefix, "y");
        assert!(!options.expand_shorthands);
        assert!(options.logical_properties);
    }

    #[test]
    fn test_invalid_prefix_rejected() {
        let cli = EnhancedCli::new();
        let matches = cli
            .build_cli()
            .try_get_matches_from(["atomc", "hash", "color", "red", "--prefix", "1x"])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        assert!(cli.build_compiler_options(sub).is_err());
    }
}
