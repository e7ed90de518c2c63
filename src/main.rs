// ptrlab: the C pointers lesson on checked aliases

use std::io::{self, BufRead};
use std::process;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use ptrlab::interpreter::constants::{FAULT_EXIT_CODE, SNAPSHOT_MEMORY_LIMIT};
use ptrlab::interpreter::engine::Interpreter;
use ptrlab::lesson::source::LESSON_SOURCE;
use ptrlab::lesson::{Input, LessonOptions};
use ptrlab::ui::App;

/// Command-line options
#[derive(Debug, Default, PartialEq)]
struct Cli {
    tui: bool,
    fault: bool,
    input: Option<String>,
    help: bool,
}

fn parse_args(args: &[String]) -> Result<Cli, String> {
    let mut cli = Cli::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--tui" => cli.tui = true,
            "--fault" => cli.fault = true,
            "--input" => {
                let value = iter
                    .next()
                    .ok_or_else(|| "--input needs a value".to_string())?;
                cli.input = Some(value.clone());
            }
            "-h" | "--help" => cli.help = true,
            other => return Err(format!("Unknown argument '{}'", other)),
        }
    }
    Ok(cli)
}

fn print_usage(program_name: &str) {
    eprintln!("Usage: {} [--tui] [--fault] [--input <n>]", program_name);
    eprintln!();
    eprintln!("  --tui          step through the lesson in the memory viewer");
    eprintln!("  --fault        dereference the dangling pointer at the end");
    eprintln!("  --input <n>    answer the scanf step with <n> instead of reading stdin");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {}                  # Run the lesson on the console", program_name);
    eprintln!("  {} --tui --fault    # Watch the dangling pointer get caught", program_name);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let program_name = args.first().map(|s| s.as_str()).unwrap_or("ptrlab");

    let cli = match parse_args(args.get(1..).unwrap_or_default()) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            print_usage(program_name);
            process::exit(1);
        }
    };
    if cli.help {
        print_usage(program_name);
        return Ok(());
    }

    let stdin = io::stdin();
    let mut reader = stdin.lock();

    // The viewer owns the screen, so ask for the scanf answer before running
    let input = match cli.input {
        Some(text) => Input::Text(text),
        None if cli.tui => {
            eprint!("Value for scanf(\"%d\", &a): ");
            let mut line = String::new();
            reader.read_line(&mut line)?;
            Input::Text(line.trim_end().to_string())
        }
        None => Input::Reader(&mut reader),
    };

    let mut interpreter = Interpreter::new(LessonOptions {
        trigger_fault: cli.fault,
        echo: !cli.tui,
        snapshot_limit: SNAPSHOT_MEMORY_LIMIT,
    });

    eprintln!("Running pointer lesson...");
    let result = interpreter.run(input);
    match &result {
        Ok(()) => {
            eprintln!("Lesson completed successfully.");
            eprintln!("Total snapshots: {}", interpreter.total_snapshots());
        }
        Err(e) => {
            let line = interpreter.current_location().line;
            let text = LESSON_SOURCE
                .lines()
                .nth(line.saturating_sub(1))
                .unwrap_or("")
                .trim();
            eprintln!("Runtime error: {}", e);
            eprintln!("  at line {}: {}", line, text);
            if e.is_invalid_reference() {
                eprintln!(
                    "  The dereference was stopped. In C this reads dead stack memory: \
                     a segmentation fault, or a value that only looks right by luck."
                );
            }
        }
    }

    if !cli.tui {
        return match result {
            Ok(()) => Ok(()),
            Err(e) if e.is_invalid_reference() => process::exit(FAULT_EXIT_CODE),
            Err(_) => process::exit(1),
        };
    }

    if result.is_err() {
        eprintln!("Entering viewer with partial execution history...");
    }
    if let Err(e) = interpreter.rewind_to_start() {
        eprintln!("Warning: Failed to rewind to start: {}", e);
    }

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(interpreter);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_flags() {
        let cli = parse_args(&args(&["--tui", "--fault", "--input", "7"])).unwrap();
        assert_eq!(
            cli,
            Cli {
                tui: true,
                fault: true,
                input: Some("7".to_string()),
                help: false,
            }
        );
    }

    #[test]
    fn test_parse_defaults() {
        assert_eq!(parse_args(&[]).unwrap(), Cli::default());
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_args(&args(&["--input"])).is_err());
        assert!(parse_args(&args(&["--bogus"])).is_err());
    }
}
