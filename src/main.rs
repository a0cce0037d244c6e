mod cli;

use clap::Parser;
use cli::Cli;
use faceapi::FaceError;
use faceapi::utils::ResultFormatter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // 初始化日志系统
    faceapi::logger::init_logger(cli.verbose);

    let color = !cli.no_color;
    if let Err(err) = cli::run(cli).await {
        let formatter = ResultFormatter::new(color);
        match err.downcast_ref::<FaceError>() {
            Some(face_err) => eprintln!("{}", formatter.format_error(face_err)),
            None => eprintln!("Error: {:#}", err),
        }
        std::process::exit(1);
    }
}
