use std::process::ExitCode;

fn main() -> ExitCode {
    match symptom_intel_lib::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("symptom-intel: {e}");
            ExitCode::FAILURE
        }
    }
}
