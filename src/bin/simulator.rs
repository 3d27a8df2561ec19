use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::style::Stylize;
use crossterm::terminal::{Clear, ClearType};
use preeti_core::{Condition, Converter, ConverterConfig, ConvertOptions};
use std::io::{stdin, stdout, Write};

fn main() {
    env_logger::init();

    let converter = match ConverterConfig::load(None).and_then(|config| Converter::from_config(&config)) {
        Ok(converter) => converter,
        Err(e) => {
            eprintln!("[ERROR] Could not build converter: {}", e);
            Converter::new()
        }
    };
    let mut options = converter.options;
    let mut history: Vec<(String, String)> = Vec::new();

    println!("Preeti -> Unicode live converter. Type 'exit' to quit.");
    println!("---------------------------------------------------------------");

    loop {
        print_ui(&history, options);

        let mut input = String::new();
        match stdin().read_line(&mut input) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let line = input.trim_end_matches(['\r', '\n']);

        match line {
            "exit" => break,
            ":numbers" => options.convert_numbers = !options.convert_numbers,
            ":clear" => history.clear(),
            "" => {}
            preeti => {
                let conversion = converter.convert_with(preeti, options);
                let mut shown = conversion.text;
                for condition in &conversion.conditions {
                    let Condition::OrphanedMark { position, mark } = condition;
                    shown.push_str(&format!("   [orphaned {} at {}]", mark, position));
                }
                history.push((preeti.to_string(), shown));
            }
        }
    }
}

fn print_ui(history: &[(String, String)], options: ConvertOptions) {
    let mut out = stdout();
    let _ = execute!(out, Clear(ClearType::All), MoveTo(0, 0));
    println!("Preeti -> Unicode live converter");
    println!("---------------------------------------------------------------");
    println!("Type Preeti text and press [Enter].");
    println!("':numbers' toggles numeral conversion, ':clear' clears, 'exit' quits.\n");

    let numbers = if options.convert_numbers { "on".green() } else { "off".yellow() };
    println!("Numeral conversion: {}\n", numbers);

    for (preeti, unicode) in history.iter().rev().take(10).rev() {
        println!("  {} => {}", preeti.as_str().dark_grey(), unicode);
    }
    print!("\n> ");
    let _ = out.flush();
}
