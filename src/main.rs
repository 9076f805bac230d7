mod app;
mod audio;
mod cli;
mod config;
mod error;
mod library;
mod logging;
mod playback;
mod runtime;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
