use std::io::{self, IsTerminal, Read};

use keygate::{cache_stats, expr_match};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let matched = expr_match(&config.expression, &config.input);
    match &matched {
        Some(counts) => {
            let mut entries: Vec<_> = counts.iter().collect();
            entries.sort();
            for (keyword, count) in entries {
                println!("{keyword}\t{count}");
            }
        }
        None => println!("no match"),
    }

    if config.stats {
        print_stats();
    }
    if matched.is_none() {
        std::process::exit(1);
    }
}

struct CliConfig {
    expression: String,
    input: String,
    stats: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut expression: Option<String> = None;
    let mut input: Option<String> = None;
    let mut stats = false;
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("keygate {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--stats" => stats = true,
            "--expr" | "-e" => {
                let value = args.next().ok_or_else(|| "error: --expr expects a value".to_string())?;
                if expression.is_some() {
                    return Err("error: expression provided multiple times".to_string());
                }
                expression = Some(value);
            }
            "--input" | "-i" => {
                let value =
                    args.next().ok_or_else(|| "error: --input expects a value".to_string())?;
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(value);
            }
            "--" => {
                let rest = args.collect::<Vec<_>>().join(" ");
                if input.is_none() {
                    input = Some(rest);
                }
                break;
            }
            other if expression.is_none() => expression = Some(other.to_string()),
            other => match &mut input {
                Some(input) => {
                    input.push(' ');
                    input.push_str(other);
                }
                None => input = Some(other.to_string()),
            },
        }
    }

    let expression = expression.ok_or_else(|| {
        "error: no expression given (try: keygate '(airbus|boeing)+safety' 'Boeing safety update')"
            .to_string()
    })?;

    let input = match input {
        Some(input) => input,
        None if !io::stdin().is_terminal() => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|err| format!("error: failed to read stdin: {err}"))?;
            buffer
        }
        None => return Err("error: no input text given (pass it as arguments or on stdin)".to_string()),
    };

    Ok(CliConfig { expression, input, stats })
}

fn print_stats() {
    let stats = cache_stats();
    eprintln!("generation: {}", stats.generation);
    for (name, counters) in [
        ("simple-scan", stats.simple_scan),
        ("regex-scan", stats.regex_scan),
        ("expressions", stats.expressions),
    ] {
        eprintln!(
            "{name}: {}/{} entries, {} hits, {} misses",
            counters.entries, counters.capacity, counters.hits, counters.misses
        );
    }
}

fn print_help() {
    println!(
        "keygate: match a boolean keyword expression against text

USAGE:
    keygate [OPTIONS] EXPRESSION [TEXT...]
    echo TEXT | keygate EXPRESSION

Expressions combine keywords with '+' (AND), '|' (OR) and parentheses,
e.g. '(airbus|boeing)+safety'. Matching is case-insensitive and
substring-based. On a match, each found keyword and its occurrence
count is printed; otherwise 'no match' is printed and the exit code
is 1.

OPTIONS:
    -e, --expr EXPR     Expression (alternative to the positional form)
    -i, --input TEXT    Input text (alternative to positionals/stdin)
        --stats         Print cache statistics to stderr
    -h, --help          Show this help
    -V, --version       Show version"
    );
}
