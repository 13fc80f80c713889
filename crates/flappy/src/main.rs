use flappy::Options;

fn main() {
    env_logger::init();

    let options = match Options::from_args(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("{:#}\nUsage: flappy [RES_DIR] [SEED]", err);
            std::process::exit(1);
        }
    };
    log::info!("Loading resources from '{}'", options.res_dir.display());

    if let Err(err) = flappy::run(options) {
        eprintln!("{:#}", err);
        std::process::exit(2);
    }
}
