use ucc_drv::DriverError;

fn main() {
    if let Err(err) = ucc_drv::run() {
        if let DriverError::CompilationFailed = err {
            // diagnostics were already printed by the session
        } else {
            eprintln!("ucc: {err}");
        }
        std::process::exit(err.exit_code());
    }
}
