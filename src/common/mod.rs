pub mod io;

/// Format an IO error message without the "(os error N)" suffix.
/// Prints e.g. "No such file or directory" where Rust's Display impl
/// adds " (os error 2)".
pub fn io_error_msg(e: &std::io::Error) -> String {
    if let Some(raw) = e.raw_os_error() {
        let os_err = std::io::Error::from_raw_os_error(raw);
        let msg = format!("{}", os_err);
        msg.replace(&format!(" (os error {})", raw), "")
    } else {
        format!("{}", e)
    }
}
