use env_logger::Env;
use winit::event_loop::EventLoop;

use gpu_waves::app::App;
use gpu_waves::SimConfig;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    log::info!("Starting GPU wave simulation");

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(err) => {
            log::error!("Failed to create event loop: {}", err);
            std::process::exit(1);
        }
    };

    let mut app = App::new(SimConfig::default());
    if let Err(err) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {}", err);
        std::process::exit(1);
    }

    if app.setup_error().is_some() {
        std::process::exit(1);
    }
}
