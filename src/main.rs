use clap::Parser;
use relgraph::cli::{BuildArgs, Cli, Command};
use relgraph::{cmd_build, cmd_export, cmd_init, cmd_timeline};

fn main() {
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Some(Command::Build(args)) => cmd_build(args),
        Some(Command::Timeline(args)) => cmd_timeline(args),
        Some(Command::Export(args)) => cmd_export(args),
        Some(Command::Init(args)) => cmd_init(args),
        None => match cli.records {
            // Backward compatibility: treat a bare path as the build command
            Some(records) => cmd_build(BuildArgs {
                records,
                ..Default::default()
            }),
            None => {
                relgraph::style::error("No records file given; see --help");
                1
            }
        },
    };

    std::process::exit(exit_code);
}
