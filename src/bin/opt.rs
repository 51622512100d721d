/*!
 * opt: post-processes a concat snapshot read from stdin
 */

use std::io::{self, Read, Write};
use std::process::ExitCode;

use clap::Parser;

use concat::clipboard::copy_to_clipboard;
use concat::config::OptArgs;
use concat::error::Result;
use concat::tokenizer::{count_tokens, estimate_tokens};
use concat::transform::{TransformOptions, Transformer};
use concat::utils::{decode_text, setup_logging, stdout_is_terminal};

fn main() -> ExitCode {
    let args = OptArgs::parse();
    setup_logging(args.quiet, args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &OptArgs) -> Result<()> {
    let mut input = Vec::new();
    io::stdin().lock().read_to_end(&mut input)?;
    let content = decode_text(&input, "Standard input");

    if args.cost {
        match args.model {
            Some(model) => eprintln!("Tokens: {} ({})", count_tokens(&content, model)?, model),
            None => eprintln!("Tokens: ~{}", estimate_tokens(content.len() as u64)),
        }
    }

    let transformer = Transformer::new(TransformOptions {
        compact: args.compact,
        strip_headers: args.strip_headers,
    });
    let result = transformer.process(&content);
    log::debug!("Transformed {} bytes into {} bytes", content.len(), result.len());

    if args.stdout || !stdout_is_terminal() {
        return write_stdout(&result);
    }

    match copy_to_clipboard(&result) {
        Ok(()) => {
            if !args.quiet {
                eprintln!(
                    "✓ Copied to clipboard ({} bytes, ~{} tokens).",
                    result.len(),
                    estimate_tokens(result.len() as u64)
                );
            }
            Ok(())
        }
        Err(e) => {
            log::warn!("Failed to copy to clipboard: {}. Printing to stdout instead.", e);
            write_stdout(&result)
        }
    }
}

fn write_stdout(text: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
