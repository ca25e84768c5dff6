use std::process::ExitCode;

use terrorist::{
    cli::{build_cli, execute, setup::init_tracing},
    Registry,
};

fn main() -> ExitCode {
    if let Err(e) = init_tracing() {
        eprintln!("{e}");
    }

    let matches = build_cli().get_matches();

    match execute(Registry::new(), &matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("{e}");
            ExitCode::FAILURE
        }
    }
}
