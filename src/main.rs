extern crate clap;
extern crate float_index;
extern crate rand;

use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, Write};
use std::process;

use clap::{App, Arg, ArgGroup, ArgMatches};
use rand::Rng;

use float_index::{FloatIndex, IndexError};

fn app() -> App<'static, 'static> {
    App::new("findex")
        .version("0.1")
        .about("Count a stream of numbers and print order statistics")
        // Output
        .arg(Arg::with_name("count")
             .short("c")
             .long("count")
             .help("Print number of values"))
        .arg(Arg::with_name("unique")
             .short("u")
             .long("unique")
             .help("Print number of distinct values"))
        .arg(Arg::with_name("min")
             .long("min")
             .help("Print min"))
        .arg(Arg::with_name("max")
             .long("max")
             .help("Print max"))
        .arg(Arg::with_name("mean")
             .short("m")
             .long("mean")
             .help("Print mean"))
        .arg(Arg::with_name("sum")
             .long("sum")
             .help("Print sum"))
        .arg(Arg::with_name("median")
             .long("median")
             .help("Print approximate median (the upper middle value for an even count)"))
        .arg(Arg::with_name("exact-median")
             .long("exact-median")
             .help("Print median, averaging the middle values for an even count"))
        .arg(Arg::with_name("mode")
             .long("mode")
             .help("Print mode (smallest value on ties)"))
        .arg(Arg::with_name("mode-count")
             .long("mode-count")
             .help("Print the number of times the mode occurred"))
        // Listings
        .arg(Arg::with_name("order")
             .long("order")
             .help("Print the distinct values in ascending order"))
        .arg(Arg::with_name("counts")
             .long("counts")
             .help("Print value:count pairs in ascending order"))
        // Formatting
        .group(ArgGroup::with_name("format").args(&["tsv", "json"]))
        .arg(Arg::with_name("tsv")
             .short("t")
             .long("tsv")
             .help("Output as tsv. This will force tsv output even if only one statistic is requested."))
        .arg(Arg::with_name("json")
             .short("j")
             .long("json")
             .help("Output as compressed json"))
        // IO
        .arg(Arg::with_name("input")
             .short("i")
             .long("input")
             .value_name("file")
             .default_value("-")
             .help("Take input from file"))
        .arg(Arg::with_name("random")
             .short("r")
             .long("random")
             .value_name("n")
             .takes_value(true)
             .help("Ignore input and insert n random whole numbers instead"))
        .arg(Arg::with_name("range")
             .long("range")
             .value_name("k")
             .default_value("10")
             .help("Random numbers are drawn from [0, k)"))
        .arg(Arg::with_name("output")
             .short("o")
             .long("output")
             .value_name("file")
             .default_value("-")
             .help("Write output to file"))
}

fn main() {
    let matches = app().get_matches();
    if let Err(err) = run(&matches) {
        eprintln!("findex: {}", err);
        process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let index = match matches.value_of("random") {
        Some(n) => {
            let range = parse_arg(matches.value_of("range").unwrap_or("10"))?;
            random_index(parse_arg(n)?, range)?
        }
        None => read_index(matches.value_of("input").unwrap_or("-"))?,
    };

    let stdout = io::stdout();
    let mut output: Box<dyn Write> = match matches.value_of("output") {
        Some("-") | None => Box::new(stdout.lock()),
        Some(file_name) => Box::new(io::BufWriter::new(File::create(file_name)?)),
    };

    if matches.is_present("order") {
        writeln!(output, "{}", index)?;
    }
    if matches.is_present("counts") {
        writeln!(output, "{}", index.counts_listing())?;
    }

    let results = collect_results(matches, &index);
    if results.is_empty() {
        return Ok(output.flush()?);
    }
    if matches.is_present("tsv") {
        write_tsv(&results, &mut *output)?;
    } else if matches.is_present("json") {
        write_json(&results, &mut *output)?;
    } else if results.len() == 1 {
        writeln!(output, "{}", results[0].1)?;
    } else {
        write_tsv(&results, &mut *output)?;
    }
    output.flush()?;
    Ok(())
}

fn parse_arg(arg: &str) -> Result<u64, IndexError> {
    arg.parse()
        .map_err(|_| IndexError::Input(format!("could not parse \"{}\" as a count", arg)))
}

fn random_index(n: u64, range: u64) -> Result<FloatIndex, IndexError> {
    if range == 0 {
        return Err(IndexError::from("random range must be positive"));
    }
    let mut rng = rand::thread_rng();
    let mut index = FloatIndex::new();
    for _ in 0..n {
        index.insert(rng.gen_range(0..range) as f64)?;
    }
    Ok(index)
}

fn read_index(input: &str) -> Result<FloatIndex, Box<dyn Error>> {
    let stdin = io::stdin();
    let reader: Box<dyn BufRead> = match input {
        "-" => Box::new(stdin.lock()),
        file_name => Box::new(io::BufReader::new(File::open(file_name)?)),
    };
    read_values(reader)
}

/// Insert every whitespace separated number of `reader`
fn read_values<R: BufRead>(reader: R) -> Result<FloatIndex, Box<dyn Error>> {
    let mut index = FloatIndex::new();
    for line in reader.lines() {
        for token in line?.split(char::is_whitespace).filter(|s| !s.is_empty()) {
            let num = token
                .parse()
                .map_err(|_| IndexError::Input(format!("could not parse \"{}\" as float", token)))?;
            index.insert(num)?;
        }
    }
    Ok(index)
}

fn collect_results(matches: &ArgMatches, index: &FloatIndex) -> Vec<(String, f64)> {
    let stats = [
        "count",
        "unique",
        "min",
        "max",
        "mean",
        "sum",
        "median",
        "exact-median",
        "mode",
        "mode-count",
    ];
    let requested: Vec<&str> = stats.iter().cloned().filter(|s| matches.is_present(s)).collect();
    let listing = ["order", "counts"].iter().any(|s| matches.is_present(s));

    // Defaults
    let requested = if requested.is_empty() && !listing {
        vec!["count", "unique", "min", "max", "mean", "median", "mode"]
    } else {
        requested
    };
    requested
        .into_iter()
        .map(|name| (String::from(name), statistic(index, name)))
        .collect()
}

/// Undefined statistics print as NaN
fn statistic(index: &FloatIndex, name: &str) -> f64 {
    let res = match name {
        "count" => Ok(index.count_total() as f64),
        "unique" => Ok(index.count_unique() as f64),
        "min" => index.min(),
        "max" => index.max(),
        "mean" => index.mean(),
        "sum" => Ok(index.sum()),
        "median" => index.median(),
        "exact-median" => index.exact_median(),
        "mode" => index.mode(),
        "mode-count" => Ok(index.mode_count() as f64),
        _ => unreachable!(),
    };
    res.unwrap_or(f64::NAN)
}

fn write_tsv(results: &[(String, f64)], output: &mut dyn Write) -> io::Result<()> {
    for (name, val) in results {
        writeln!(output, "{}\t{}", name, val)?;
    }
    Ok(())
}

fn write_json(results: &[(String, f64)], output: &mut dyn Write) -> io::Result<()> {
    let fields: Vec<String> = results
        .iter()
        .map(|(name, val)| {
            if val.is_finite() {
                format!("\"{}\":{}", name, val)
            } else {
                format!("\"{}\":null", name)
            }
        })
        .collect();
    writeln!(output, "{{{}}}", fields.join(","))
}
