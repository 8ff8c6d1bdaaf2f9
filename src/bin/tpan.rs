use std::process::ExitCode;

use tpan::Options;

fn main() -> ExitCode {
    let env = env_logger::Env::new()
        .filter("TPAN_LOG")
        .write_style("TPAN_LOG_STYLE");
    env_logger::init_from_env(env);

    let options = match Options::parse_from_args(std::env::args()) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    match tpan::run(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("tpan: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
