#![allow(non_snake_case)]
use RustedStepCalc::Examples::symbolic_examples::sym_examples;
use RustedStepCalc::Utils::engine_settings::EngineSettings;
use RustedStepCalc::Utils::logger::init_logger;
use log::error;

fn main() {
    // optional path to a settings document, defaults otherwise
    let settings = match std::env::args().nth(1) {
        Some(path) => match EngineSettings::from_file(&path) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("cannot read settings from {}: {}", path, e);
                return;
            }
        },
        None => EngineSettings::default(),
    };
    if let Err(e) = init_logger(&settings.logging) {
        eprintln!("logger not initialized: {}", e);
    }

    let example = 1;
    match example {
        0..=6 => {
            if let Err(e) = sym_examples(example, &settings) {
                error!("example {} failed: {}", example, e);
            }
        }
        // run every example in turn
        100 => {
            for i in 0..=6 {
                if let Err(e) = sym_examples(i, &settings) {
                    error!("example {} failed: {}", i, e);
                }
            }
        }
        _ => {
            println!("example number {} does not exist", example);
        }
    }
}
