//! Main application entry point.

fn main() {
    env_logger::init();
    log::info!("starting dabble");

    if let Err(err) = dabble_app::App::run() {
        // No window means no drawing context; report as plain text and
        // leave nothing wired up.
        log::error!("{err}");
        eprintln!("dabble: drawing surface unavailable: {err}");
        std::process::exit(1);
    }
}
