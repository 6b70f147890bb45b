use std::process::ExitCode;

use clap::Parser;
use miette::IntoDiagnostic;
use scm::cli::Options;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // Install the diagnostic handler.
    if let Err(report) = bupropion::install(bupropion::BupropionHandlerOpts::new).into_diagnostic() {
        eprintln!("{report:?}");
        return ExitCode::FAILURE;
    }

    // Parse the command line arguments.
    let options = Options::parse();

    let mut stdout = std::io::stdout().lock();
    match scm::driver::execute(options.command, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            ExitCode::from(code)
        }
    }
}
