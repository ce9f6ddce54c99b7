use eframe::egui;
use image_annotator::config::LogLevel;
use image_annotator::{AnnotatorApp, EditorConfig};
use std::path::PathBuf;

const USAGE: &str = "Usage: image-annotator [--config <settings.json>] [image.png|jpg]";

#[derive(Debug, Default, PartialEq)]
struct Args {
    config: Option<PathBuf>,
    image: Option<PathBuf>,
}

#[derive(Debug, PartialEq)]
enum Command {
    Run(Args),
    Help,
}

fn parse_args(mut iter: impl Iterator<Item = String>) -> Result<Command, String> {
    let mut args = Args::default();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter.next().ok_or("--config needs a path")?;
                args.config = Some(PathBuf::from(path));
            }
            "-h" | "--help" => return Ok(Command::Help),
            flag if flag.starts_with('-') => return Err(format!("Unknown option {flag}")),
            _ if args.image.is_some() => return Err("Only one image can be opened".into()),
            _ => args.image = Some(PathBuf::from(&arg)),
        }
    }
    Ok(Command::Run(args))
}

fn init_logging(level: LogLevel) {
    // RUST_LOG, when set, takes precedence over the configured level.
    let _ = env_logger::Builder::new()
        .filter_level(level.to_level_filter())
        .parse_default_env()
        .try_init();
}

fn main() {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(Command::Run(args)) => args,
        Ok(Command::Help) => {
            println!("{USAGE}");
            return;
        }
        Err(msg) => {
            eprintln!("{msg}");
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    };

    let (config, config_error) = match args.config.as_deref().map(EditorConfig::load) {
        Some(Ok(config)) => (config, None),
        Some(Err(err)) => (EditorConfig::default(), Some(err)),
        None => (EditorConfig::default(), None),
    };
    init_logging(config.log_level);
    if let Some(err) = config_error {
        log::error!("{err}; using default settings");
    }

    let viewport = config.viewport;
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([viewport.width + 16.0, viewport.height + 80.0])
            .with_title("Image Annotation Tool"),
        ..Default::default()
    };

    let result = eframe::run_native(
        "image-annotator",
        options,
        Box::new(move |_cc| Ok(Box::new(AnnotatorApp::new(config, args.image)))),
    );
    if let Err(err) = result {
        log::error!("Application error: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command, String> {
        parse_args(args.iter().map(|a| a.to_string()))
    }

    #[test]
    fn help_flags_ask_for_usage() {
        assert_eq!(parse(&["--help"]), Ok(Command::Help));
        assert_eq!(parse(&["-h"]), Ok(Command::Help));
        assert_eq!(parse(&["photo.png", "-h"]), Ok(Command::Help));
    }

    #[test]
    fn config_and_image_are_parsed() {
        assert_eq!(
            parse(&["--config", "settings.json", "photo.png"]),
            Ok(Command::Run(Args {
                config: Some(PathBuf::from("settings.json")),
                image: Some(PathBuf::from("photo.png")),
            }))
        );
        assert_eq!(parse(&[]), Ok(Command::Run(Args::default())));
    }

    #[test]
    fn bad_arguments_are_errors() {
        assert!(parse(&["--verbose"]).is_err());
        assert!(parse(&["--config"]).is_err());
        assert!(parse(&["a.png", "b.png"]).is_err());
    }
}
