use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = prunepro_lib::run() {
        eprintln!("Error: {e}");
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}
