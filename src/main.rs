mod app;
mod config;
mod error;
mod input;
mod model;
mod render;
mod session;
mod sim;
mod storage;

use anyhow::Result;

fn main() -> Result<()> {
    app::run()
}
