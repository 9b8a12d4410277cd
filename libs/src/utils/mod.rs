use tracing::Level;

/// Installs the fmt subscriber used by the command-line tools.
///
/// `verbosity` counts `-v` flags: 0 is `info`, 1 is `debug`, more is `trace`.
pub fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    // a subscriber may already be installed when embedded in another tool
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .try_init();
}
