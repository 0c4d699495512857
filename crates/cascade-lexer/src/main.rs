use cascade_lexer::{tokenize, Input, LexOptions};
use std::env;
use std::fs;
use std::io::{self, Read};
use try_next::TryNextWithContext;

fn main() {
    let args: Vec<String> = env::args().collect();
    let ignore_errors = args.iter().skip(1).any(|a| a == "--ignore-errors");
    let filename = args.iter().skip(1).find(|a| !a.starts_with("--"));

    let css = match filename {
        Some(filename) => fs::read_to_string(filename).unwrap_or_else(|e| {
            eprintln!("Error reading file '{}': {}", filename, e);
            std::process::exit(1);
        }),
        None => {
            // Read from stdin
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).unwrap_or_else(|e| {
                eprintln!("Error reading stdin: {}", e);
                std::process::exit(1);
            });
            buffer
        }
    };

    let input = Input::new(&css);
    let mut tokenizer = tokenize(&input, LexOptions::new().ignore_errors(ignore_errors));

    // Print tokens with location and content
    loop {
        match tokenizer.try_next_with_context(&mut ()) {
            Ok(Some(token)) => {
                println!(
                    "{:?} @ {}-{} = {:?}",
                    token.kind, token.span.start, token.span.end, token.text
                );
            }
            Ok(None) => break,
            Err(e) => {
                eprintln!("Error during tokenization: {}", e);
                std::process::exit(1);
            }
        }
    }
}
