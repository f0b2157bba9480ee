use std::process::ExitCode;

fn main() -> ExitCode {
    match penguinview::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
