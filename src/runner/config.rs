use std::path::PathBuf;

use clap::{arg, command, value_parser, ArgAction, ValueEnum};

#[derive(Debug, Clone)]
pub struct ClassyConfig {
    pub paths: Vec<PathBuf>,
    pub stage: Stage,
    pub format: Option<DumpFormat>,
    pub instantiate: Vec<String>,
    pub require_main: bool,
}

/// The last pass to run.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Stage {
    /// Read the files into S-expressions.
    Parse,

    /// Register and check every class.
    Define,

    /// Also check the entry point and build the requested instantiations.
    #[default]
    Check,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DumpFormat {
    Summary,
    Debug,
    Ron,
}

pub fn parse_args_or_exit() -> ClassyConfig {
    use clap::Command;

    fn command() -> Command {
        command!()
            .arg(
                arg!(files: <FILE> ... "input files")
                    .value_parser(value_parser!(PathBuf))
                    .required(true),
            )
            .arg(
                arg!(-s --stage <STAGE> "the last stage to perform")
                    .value_parser(value_parser!(Stage))
                    .required(false),
            )
            .arg(
                arg!(-f --format <FORMAT> "print the result of the last stage in this format")
                    .value_parser(value_parser!(DumpFormat))
                    .required(false),
            )
            .arg(
                arg!(-i --instantiate <TYPE> "instantiate a templated type, e.g. `list@int`")
                    .action(ArgAction::Append)
                    .required(false),
            )
            .arg(arg!(--"no-main" "do not require a `main` class"))
    }

    fn parse_args() -> Result<ClassyConfig, clap::Error> {
        use clap::error::ErrorKind;

        let mut command = command();
        let matches = command.get_matches_mut();

        let paths = matches
            .get_many::<PathBuf>("files")
            .expect("files")
            .cloned()
            .collect();

        let stage = matches.get_one::<Stage>("stage").copied().unwrap_or_default();
        let format = matches.get_one::<DumpFormat>("format").copied();
        let instantiate = matches
            .get_many::<String>("instantiate")
            .map(|types| types.cloned().collect::<Vec<_>>())
            .unwrap_or_default();

        if !instantiate.is_empty() && stage != Stage::Check {
            return Err(command.error(
                ErrorKind::ArgumentConflict,
                "instantiations are only built in the `check` stage",
            ));
        }

        Ok(ClassyConfig {
            paths,
            stage,
            format,
            instantiate,
            require_main: !matches.get_flag("no-main"),
        })
    }

    match parse_args() {
        Ok(cfg) => cfg,

        Err(e) => {
            e.format(&mut command()).exit();
        }
    }
}
