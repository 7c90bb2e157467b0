use gaussblur::cli::Args;
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    let args: Args = argh::from_env();
    let job = args.into_job();

    match gaussblur::run(&job) {
        Ok(_) => {
            println!(
                "Successfully applied {}x{} Gaussian filter to {}",
                job.params.width,
                job.params.height,
                job.input.display()
            );
            println!("Output saved to {}", job.output.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            let mut source = err.source();
            while let Some(cause) = source {
                log::debug!("caused by: {}", cause);
                source = cause.source();
            }
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
