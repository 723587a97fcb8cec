use log::error;
use sprite_runner::EngineBuilder;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let result = EngineBuilder::new().build().and_then(|engine| engine.run());

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}
