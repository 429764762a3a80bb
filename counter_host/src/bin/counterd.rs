//! # Counter Host Daemon
//!
//! Runs an event window counter either from a script on a simulated clock or
//! interactively from stdin on the system clock.

use counter_host::{
    CounterHost, CounterScript, FrameClock, HostConfig, HostError, ScriptCommand,
    SystemFrameClock,
};
use std::env;
use std::fs;
use std::io::{self, BufRead};
use std::process;
use transition_log::TransitionLog;
use window_counter::CounterSnapshot;

/// Command-line options
#[derive(Debug, Default)]
struct Options {
    config: HostConfig,
    script: Option<String>,
    json: bool,
    log: bool,
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let options = parse_args(&args).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        print_usage(&args[0]);
        process::exit(1);
    });

    let result = match &options.script {
        Some(text) => run_script(text, &options),
        None => run_interactive(&options),
    };

    if let Err(e) = result {
        eprintln!("Runtime error: {}", e);
        process::exit(1);
    }
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut options = Options::default();
    let mut duration_override = None;
    let mut paused = false;
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --config".to_string());
                }
                let text = fs::read_to_string(&args[i])
                    .map_err(|e| format!("Failed to read config file: {}", e))?;
                options.config = HostConfig::from_json(&text).map_err(|e| e.to_string())?;
            }
            "--duration" | "-d" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --duration".to_string());
                }
                let duration_ms: f64 = args[i]
                    .parse()
                    .map_err(|_| format!("Invalid duration value: {}", args[i]))?;
                duration_override = Some(duration_ms);
            }
            "--paused" => {
                paused = true;
            }
            "--script" | "-s" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --script".to_string());
                }
                let text = fs::read_to_string(&args[i])
                    .map_err(|e| format!("Failed to read script file: {}", e))?;
                options.script = Some(text);
            }
            "--json" => {
                options.json = true;
            }
            "--log" => {
                options.log = true;
            }
            "--help" | "-h" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            other => {
                return Err(format!("Unknown option: {}", other));
            }
        }
        i += 1;
    }

    // Flags win over the config file regardless of argument order
    if let Some(duration_ms) = duration_override {
        options.config.counter.duration_ms = duration_ms;
    }
    if paused {
        options.config.counter.moving = false;
    }

    Ok(options)
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} [OPTIONS]", program);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --config <FILE>      Host config (JSON)");
    eprintln!("  -d, --duration <MS>      Window length in milliseconds");
    eprintln!("  --paused                 Start with time frozen");
    eprintln!("  -s, --script <FILE>      Run a counter script on a simulated clock");
    eprintln!("  --json                   Print snapshots as JSON");
    eprintln!("  --log                    Print the transition log on exit");
    eprintln!("  -h, --help               Show this help message");
    eprintln!();
    eprintln!("Without --script, commands are read from stdin and time follows");
    eprintln!("the system clock.");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} --script counter_host/scripts/keystrokes.wcs", program);
    eprintln!("  {} --duration 30000 --json", program);
}

fn run_script(text: &str, options: &Options) -> Result<(), HostError> {
    let mut script = CounterScript::from_text(text)?;
    let mut host = CounterHost::simulated(options.config)?;

    let outcome = host.run_script(&mut script);
    if options.log {
        print_log(host.log());
    }
    let executed = outcome?;

    eprintln!("Executed {} steps", executed);
    print_snapshot(&host.snapshot(), options.json)
}

fn run_interactive(options: &Options) -> Result<(), HostError> {
    let mut host = CounterHost::new(options.config, SystemFrameClock::new())?;
    let stdin = io::stdin();

    for line in stdin.lock().lines() {
        let line = line.map_err(|e| HostError::Io(e.to_string()))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        // Deliver the time spent waiting for input before acting on it
        host.tick();

        let mut script = match CounterScript::from_text(trimmed) {
            Ok(script) => script,
            Err(e) => {
                eprintln!("Error: {}", e);
                continue;
            }
        };
        while let Some(step) = script.next_step() {
            run_live_step(&mut host, step.line, step.command);
        }

        print_snapshot(&host.snapshot(), options.json)?;
    }

    if options.log {
        print_log(host.log());
    }
    Ok(())
}

fn run_live_step<C: FrameClock>(host: &mut CounterHost<C>, line: usize, command: ScriptCommand) {
    match command {
        ScriptCommand::Action(action) => host.apply(action),
        ScriptCommand::Tick => {
            host.tick();
        }
        ScriptCommand::Wait(_) => {
            eprintln!("Error: wait needs a simulated clock; use --script");
        }
        ScriptCommand::Expect(expectation) => {
            if let Err(e) = host.check(line, expectation) {
                eprintln!("Error: {}", e);
            }
        }
    }
}

fn print_snapshot(snapshot: &CounterSnapshot, json: bool) -> Result<(), HostError> {
    if json {
        let text = snapshot
            .to_json()
            .map_err(|e| HostError::Io(e.to_string()))?;
        println!("{}", text);
    } else {
        println!("{}", snapshot);
    }
    Ok(())
}

fn print_log(log: &TransitionLog) {
    for entry in log.entries() {
        eprintln!("{}", entry);
    }
}
