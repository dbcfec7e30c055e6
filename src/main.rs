use scene_ngin::{config::Config, flow};

fn main() -> anyhow::Result<()> {
    flow::init_logger();
    flow::run(Config::from_env())
}
