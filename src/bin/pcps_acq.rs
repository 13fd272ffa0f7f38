
use clap::{Arg, App, value_t};
use colored::*;
use log::{debug, error, info};
use serde::{Serialize, Deserialize};

use pcps_acq::AcqErr;
use pcps_acq::gnss::SignalType;
use pcps_acq::gnss::acquisition::{Acquirer, Acquisition, SearchConfig};
use pcps_acq::gnss::acquisition::correlator::Backend;
use pcps_acq::io::{self, SampleFormat};
use pcps_acq::utils;

#[derive(Debug, Serialize, Deserialize)]
struct AcquisitionRecord {
	pub sig:SignalType,
	pub prn:i32,
	pub cn0_db_hz:f64,
	pub doppler_hz:f64,
	pub code_offset_ms:f64,
	pub acquired:bool,
}

fn setup_logging(verbosity:u64) -> Result<(), log::SetLoggerError> {
	let mut builder = env_logger::Builder::from_default_env();
	builder.target(env_logger::Target::Stderr);
	builder.format_target(false);
	match verbosity {
		0 => builder.filter_level(log::LevelFilter::Warn),
		1 => builder.filter_level(log::LevelFilter::Info),
		2 => builder.filter_level(log::LevelFilter::Debug),
		_ => builder.filter_level(log::LevelFilter::Trace),
	};
	builder.try_init()
}

fn main() {

	let matches = App::new("PCPS Acquisition")
		.version("0.1.0")
		.author("John Stanford (johnwstanford@gmail.com)")
		.about("Searches digitized IF data for GNSS signals by parallel code phase search")
		.arg(Arg::with_name("filename")
			.help("Input filename")
			.required(true).index(1))
		.arg(Arg::with_name("fs")
			.short("f").long("fs")
			.help("Sampling frequency [MHz]")
			.takes_value(true).default_value("12.0"))
		.arg(Arg::with_name("fi")
			.long("fi")
			.help("Intermediate frequency [MHz]")
			.takes_value(true).default_value("0.0"))
		.arg(Arg::with_name("sig")
			.short("s").long("sig")
			.takes_value(true).default_value("L1CA")
			.possible_values(&["L1CA", "G1CA", "G2CA"]))
		.arg(Arg::with_name("prn")
			.short("p").long("prn")
			.help("PRN numbers, or frequency channel numbers for GLONASS (e.g. 1-5,7 or -7--1)")
			.takes_value(true).allow_hyphen_values(true))
		.arg(Arg::with_name("toff")
			.long("toff")
			.help("Time offset into the file [ms]")
			.takes_value(true).default_value("0.0"))
		.arg(Arg::with_name("length")
			.short("t").long("length")
			.help("Length of data to search [ms]")
			.takes_value(true).default_value("10.0"))
		.arg(Arg::with_name("max_dop")
			.short("d").long("max_dop")
			.help("Max Doppler frequency [Hz]")
			.takes_value(true))
		.arg(Arg::with_name("no_zero_pad")
			.short("z").long("no_zero_pad")
			.help("Disable zero padding of the code replica"))
		.arg(Arg::with_name("iq")
			.long("iq")
			.help("IQ sampling (interleaved signed bytes)"))
		.arg(Arg::with_name("format")
			.long("format")
			.takes_value(true)
			.possible_values(&["i8", "i8iq", "i16iq"])
			.conflicts_with("iq"))
		.arg(Arg::with_name("backend")
			.short("b").long("backend")
			.takes_value(true)
			.possible_values(&["reference", "native"]))
		.arg(Arg::with_name("config")
			.short("c").long("config")
			.help("JSON search configuration")
			.takes_value(true))
		.arg(Arg::with_name("threshold")
			.long("threshold")
			.help("C/N0 detection threshold [dB-Hz]")
			.takes_value(true))
		.arg(Arg::with_name("json")
			.short("j").long("json")
			.help("Print acquisition records as JSON on stdout"))
		.arg(Arg::with_name("verbose")
			.short("v")
			.multiple(true))
		.get_matches();

	setup_logging(matches.occurrences_of("verbose")).expect("Failed to initialise logging");

	let fname:&str = matches.value_of("filename").unwrap();
	let fs:f64 = value_t!(matches, "fs", f64).unwrap_or_else(|e| e.exit()) * 1.0e6;
	let fi:f64 = value_t!(matches, "fi", f64).unwrap_or_else(|e| e.exit()) * 1.0e6;
	let t:f64 = value_t!(matches, "length", f64).unwrap_or_else(|e| e.exit()) * 1.0e-3;
	let toff:f64 = value_t!(matches, "toff", f64).unwrap_or_else(|e| e.exit()) * 1.0e-3;
	let sig:SignalType = value_t!(matches, "sig", SignalType).unwrap_or_else(|e| e.exit());

	let format:SampleFormat = match (matches.value_of("format"), matches.is_present("iq")) {
		(Some(_), _)  => value_t!(matches, "format", SampleFormat).unwrap_or_else(|e| e.exit()),
		(None, true)  => SampleFormat::I8IQ,
		(None, false) => SampleFormat::I8,
	};

	let prns:Vec<i32> = match matches.value_of("prn") {
		Some(list) => exit_on_err(utils::parse_nums(list)),
		None => match sig {
			SignalType::L1CA => (1..=32).collect(),
			SignalType::G1CA | SignalType::G2CA => (-7..=6).collect(),
		},
	};

	// Config file first, then command line overrides
	let mut config:SearchConfig = match matches.value_of("config") {
		Some(path) => exit_on_err(load_config(path)),
		None => SearchConfig::default(),
	};
	if matches.is_present("max_dop") {
		config.max_dop = value_t!(matches, "max_dop", f64).unwrap_or_else(|e| e.exit());
	}
	if matches.is_present("no_zero_pad") { config.zero_pad = false; }
	if matches.is_present("backend") {
		config.backend = value_t!(matches, "backend", Backend).unwrap_or_else(|e| e.exit());
	}
	if matches.is_present("threshold") {
		config.cn0_threshold = value_t!(matches, "threshold", f64).unwrap_or_else(|e| e.exit());
	}
	debug!("{:?}", config);

	info!("Searching {} for {} at fs={} [Hz], fi={} [Hz], {:?}", fname, sig, fs, fi, format);
	let records = exit_on_err(run(fname, fs, fi, t, toff, format, sig, &prns, config));

	if matches.is_present("json") {
		match serde_json::to_string_pretty(&records) {
			Ok(s) => println!("{}", s),
			Err(e) => error!("Unable to serialize records: {}", e),
		}
	}

}

fn run(fname:&str, fs:f64, fi:f64, t:f64, toff:f64, format:SampleFormat, sig:SignalType, prns:&[i32],
	config:SearchConfig) -> Result<Vec<AcquisitionRecord>, AcqErr> {

	let data = io::read_if_data(fname, fs, format, t, toff)?;
	let threshold:f64 = config.cn0_threshold;
	let acq = Acquirer::new(config)?;
	info!("{} samples, {} correlator", data.len(), acq.correlator().name());

	let sig_str:String = sig.to_string();
	let mut all_records:Vec<AcquisitionRecord> = vec![];
	eprintln!("{:>5} {:>4} {:>8} {:>10} {:>12}", "SIG", "PRN", "C/N0", "DOP(Hz)", "COFF(ms)");

	for &prn in prns {
		let result = match acq.acquire(sig, prn, &data, fs, fi)? {
			Acquisition::Found(r) => r,
			Acquisition::NotFound => {
				error!("No code for {} PRN {}", sig, prn);
				continue;
			}
		};

		let acquired:bool = result.is_acquired(threshold);
		let record = AcquisitionRecord {
			sig, prn,
			cn0_db_hz:      result.cn0_db_hz,
			doppler_hz:     result.doppler_hz,
			code_offset_ms: result.code_offset_sec() * 1.0e3,
			acquired,
		};

		let result_str = format!("{:>8.1} {:>10.1} {:>12.5}", record.cn0_db_hz, record.doppler_hz, record.code_offset_ms);
		if acquired {
			eprintln!("{:>5} {:>4} {}", sig_str, prn, result_str.green());
		} else {
			eprintln!("{:>5} {:>4} {}", sig_str, prn, result_str.yellow());
		}

		all_records.push(record);
	}

	Ok(all_records)
}

fn load_config(path:&str) -> Result<SearchConfig, AcqErr> {
	let text:String = std::fs::read_to_string(path)?;
	Ok(serde_json::from_str(&text)?)
}

fn exit_on_err<T>(ans:Result<T, AcqErr>) -> T {
	match ans {
		Ok(x) => x,
		Err(e) => {
			error!("{}", e);
			std::process::exit(1)
		}
	}
}
