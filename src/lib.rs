pub mod asset;
pub mod coordinates;
pub mod map;
pub mod obstacles;
pub mod renderer;
pub mod replay;
pub mod scene;
pub mod settings;

pub fn init_logging() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .try_init();
}
