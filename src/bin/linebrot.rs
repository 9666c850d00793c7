extern crate clap;
extern crate linebrot;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use linebrot::{ppm, MandelbrotKernel, RenderParameters, RowRenderer};
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

fn validate_positive_float(s: &str, err: &str) -> Result<(), String> {
    match f64::from_str(s) {
        Ok(f) => {
            if f > 0.0 {
                Ok(())
            } else {
                Err(err.to_string())
            }
        }
        Err(_) => Err(err.to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const ORIGIN: &str = "origin";
const PITCH: &str = "pitch";
const SAMPLES: &str = "samples";
const CHUNKSIZE: &str = "chunk-size";
const WORKERS: &str = "workers";

fn args<'a>() -> ArgMatches<'a> {
    let max_workers = num_cpus::get();

    App::new("linebrot")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Row-parallel Mandelbrot renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file (binary PPM)"),
        )
        .arg(
            Arg::with_name(SIZE)
                .required(false)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("1024x1024")
                .validator(|s| validate_pair::<usize>(&s, 'x', "Could not parse output image size"))
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(ORIGIN)
                .required(false)
                .long(ORIGIN)
                .short("g")
                .takes_value(true)
                .default_value("-0.60,0.48")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse origin point"))
                .help("Coordinates of the upper left pixel"),
        )
        .arg(
            Arg::with_name(PITCH)
                .required(false)
                .long(PITCH)
                .short("p")
                .takes_value(true)
                .validator(|s| validate_positive_float(&s, "Pitch must be a positive number"))
                .help("Distance covered by one pixel (default: 0.15 / width)"),
        )
        .arg(
            Arg::with_name(SAMPLES)
                .required(false)
                .long(SAMPLES)
                .short("n")
                .takes_value(true)
                .default_value("4")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        64,
                        "Could not parse sample count",
                        "Sample count must be between 1 and 64",
                    )
                })
                .help("Supersampling grid edge per pixel"),
        )
        .arg(
            Arg::with_name(CHUNKSIZE)
                .required(false)
                .long(CHUNKSIZE)
                .short("c")
                .takes_value(true)
                .default_value("100")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        1_000_000,
                        "Could not parse chunk size",
                        "Chunk size must be between 1 and 1000000 rows",
                    )
                })
                .help("Rows per work unit"),
        )
        .arg(
            Arg::with_name(WORKERS)
                .required(false)
                .long(WORKERS)
                .short("w")
                .takes_value(true)
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_workers,
                        "Could not parse worker count",
                        &format!("Worker count must be between 1 and {}", max_workers),
                    )
                })
                .help("Maximum concurrent workers (default: all CPUs)"),
        )
        .get_matches()
}

fn main() {
    let matches = args();
    let (width, height) =
        parse_pair(matches.value_of(SIZE).unwrap(), 'x').expect("Error parsing image dimensions");
    let (x_min, y_min) =
        parse_pair(matches.value_of(ORIGIN).unwrap(), ',').expect("Error parsing origin point");
    let pitch = match matches.value_of(PITCH) {
        Some(s) => f64::from_str(s).expect("Could not parse pitch"),
        None => 0.15 / (width as f64),
    };
    let samples =
        u32::from_str(matches.value_of(SAMPLES).unwrap()).expect("Could not parse sample count");
    let chunk_size =
        usize::from_str(matches.value_of(CHUNKSIZE).unwrap()).expect("Could not parse chunk size");
    let workers = match matches.value_of(WORKERS) {
        Some(s) => usize::from_str(s).expect("Could not parse worker count"),
        None => num_cpus::get(),
    };

    let params = RenderParameters {
        x_min,
        y_min,
        pitch,
        samples,
        width,
    };
    let renderer = RowRenderer::new(MandelbrotKernel::new(), params);

    let start = Instant::now();
    match renderer.render(height, chunk_size, workers) {
        Err(e) => {
            eprintln!("Render failure: {}", e);
            std::process::exit(1);
        }
        Ok(frame) => {
            let elapsed = start.elapsed();
            eprintln!(
                "{} workers rendered {}x{} in {}.{:03} seconds",
                workers,
                width,
                height,
                elapsed.as_secs(),
                elapsed.subsec_millis()
            );
            if let Err(e) = ppm::save_ppm(Path::new(matches.value_of(OUTPUT).unwrap()), &frame) {
                eprintln!("Write failure: {}", e);
                std::process::exit(1);
            }
        }
    }
}
