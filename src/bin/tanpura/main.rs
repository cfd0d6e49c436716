//! tanpura - terminal tanpura drone
//!
//! Run with: cargo run --bin tanpura

mod app;
mod ui;

use app::App;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    App::new().run()
}
