mod quote_report;

use partling::{detect_model, price_code, price_text, try_builtin};
use std::io::{self, IsTerminal, Read};

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    if config.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(io::stderr)
            .init();
    }

    if config.list_models {
        match try_builtin() {
            Ok(registry) => {
                for model in registry.known_models() {
                    println!("{model}");
                }
                return;
            }
            Err(err) => {
                eprintln!("error: {err}");
                std::process::exit(1);
            }
        }
    }

    let outcome = if let Some(code) = &config.code {
        // Direct part-number quoting; the model defaults to the code's prefix.
        let model = config
            .model
            .clone()
            .unwrap_or_else(|| code.split('-').next().unwrap_or_default().to_string());
        price_code(&model, code).map(|result| quote_report::print_pricing(&result, config.color))
    } else {
        let text = match &config.text {
            Some(text) => text.clone(),
            None => read_stdin_or_empty(),
        };
        let model = config.model.clone().unwrap_or_else(|| detect_model(&text).to_string());
        price_text(&model, &text).map(|quote| quote_report::print_quote(&quote, config.color))
    };

    if let Err(err) = outcome {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn read_stdin_or_empty() -> String {
    let mut stdin = io::stdin();
    if stdin.is_terminal() {
        return String::new();
    }
    let mut buffer = String::new();
    if stdin.read_to_string(&mut buffer).is_err() {
        return String::new();
    }
    buffer
}

struct CliConfig {
    model: Option<String>,
    code: Option<String>,
    text: Option<String>,
    list_models: bool,
    color: bool,
    verbose: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut model: Option<String> = None;
    let mut code: Option<String> = None;
    let mut text: Option<String> = None;
    let mut list_models = false;
    let mut color = io::stdout().is_terminal();
    let mut verbose = false;
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("partling {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "-v" | "--verbose" => verbose = true,
            "--list-models" => list_models = true,
            "--model" | "-m" => {
                let value = args.next().ok_or_else(|| "error: --model expects a value".to_string())?;
                model = Some(value);
            }
            "--code" | "-c" => {
                let value = args.next().ok_or_else(|| "error: --code expects a value".to_string())?;
                if code.is_some() {
                    return Err("error: code provided multiple times".to_string());
                }
                code = Some(value);
            }
            "--text" | "-t" => {
                let value = args.next().ok_or_else(|| "error: --text expects a value".to_string())?;
                if text.is_some() {
                    return Err("error: text provided multiple times".to_string());
                }
                text = Some(value);
            }
            "--" => {
                let rest = args.collect::<Vec<_>>().join(" ");
                if !rest.trim().is_empty() {
                    if text.is_some() {
                        return Err("error: text provided multiple times".to_string());
                    }
                    text = Some(rest);
                }
                break;
            }
            _ if arg.starts_with("--model=") => {
                model = Some(arg.trim_start_matches("--model=").to_string());
            }
            _ if arg.starts_with("--code=") => {
                code = Some(arg.trim_start_matches("--code=").to_string());
            }
            _ if arg.starts_with("--text=") => {
                text = Some(arg.trim_start_matches("--text=").to_string());
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown flag '{arg}' (see --help)"));
            }
            _ => {
                if text.is_some() {
                    return Err("error: text provided multiple times".to_string());
                }
                text = Some(arg);
            }
        }
    }

    if code.is_some() && text.is_some() {
        return Err("error: provide either --code or --text, not both".to_string());
    }

    Ok(CliConfig { model, code, text, list_models, color, verbose })
}

fn print_help() {
    println!(
        "partling {} - part-number pricing and free-text quoting

Usage:
  partling --code QPMAG-08-PT-SS-F1-C-1-1-C-00
  partling --model QPSAH200S --text \"explosion proof, 0-800 inches of water\"
  echo \"2 inch mag meter\" | partling

Options:
  -c, --code <CODE>    Price an exact part number
  -t, --text <TEXT>    Resolve free text to a part number and price it
  -m, --model <MODEL>  Product model (inferred from the code prefix or the
                       text's keywords when omitted)
      --list-models    Print the built-in model ids and exit
      --color          Force ANSI colors on
      --no-color       Force ANSI colors off
  -v, --verbose        Log resolver and codec traces to stderr
  -h, --help           Show this help
  -V, --version        Show the version

Anything after `--` (or a bare argument, or piped stdin) is treated as the
free-text request.",
        env!("CARGO_PKG_VERSION")
    );
}
