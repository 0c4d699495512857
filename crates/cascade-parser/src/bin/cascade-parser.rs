use cascade_parser::{ast_dump::dump_stylesheet, parse, ParseOptions};
use std::env;
use std::fs;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();
    let json = args.iter().skip(1).any(|a| a == "--json");
    let ignore_errors = args.iter().skip(1).any(|a| a == "--ignore-errors");
    let files: Vec<&String> = args.iter().skip(1).filter(|a| !a.starts_with("--")).collect();

    if files.len() != 1 {
        eprintln!("Usage: {} [--json] [--ignore-errors] <file.css>", args[0]);
        eprintln!();
        eprintln!("Parse a CSS file and dump its AST structure");
        process::exit(1);
    }

    let filename = files[0];

    // Read file
    let input = match fs::read_to_string(filename) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", filename, e);
            process::exit(1);
        }
    };

    // Parse
    let sheet = match parse(&input, ParseOptions::new().ignore_errors(ignore_errors)) {
        Ok(sheet) => sheet,
        Err(e) => {
            eprintln!("Parse error in '{}': {}", filename, e);
            process::exit(1);
        }
    };

    // Dump AST
    if json {
        match serde_json::to_string_pretty(&sheet.to_json()) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error serializing AST: {}", e);
                process::exit(1);
            }
        }
    } else {
        print!("{}", dump_stylesheet(&sheet));
    }
}
