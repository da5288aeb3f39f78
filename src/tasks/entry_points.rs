/* ************************************************************************ **
** This file is part of dmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::config::{Settings, YamlRead};
use crate::logging::GlobalLogger;
use crate::{dataset, FailResult, PcaOutput};

use ::clap::{App, Arg, ArgMatches};
use ::std::ffi::OsStr;
use ::std::fs::File;

fn wrap_result_main<F>(main: F)
where F: FnOnce() -> FailResult<()>,
{
    main().unwrap_or_else(|e| {
        for cause in e.iter_chain() {
            error!("{}", cause);
        }

        if ::std::env::var_os("RUST_BACKTRACE") == Some(OsStr::new("1").to_owned()) {
            error!("{}", e.backtrace());
        } else {
            error!("(for a backtrace, try again with RUST_BACKTRACE=1)");
        }
        ::std::process::exit(1);
    });
}

fn init_global_logger(matches: &ArgMatches<'_>) -> FailResult<()> {
    let mut logger = GlobalLogger::default();
    logger.verbosity(matches.occurrences_of("verbose") as i32);
    if let Some(path) = matches.value_of_os("log") {
        logger.path(path);
    }
    logger.apply()
}

fn print_output(output: &PcaOutput) -> FailResult<()> {
    println!("{}", ::serde_yaml::to_string(output)?);
    Ok(())
}

// -------------------------------------------------------------------------------------

// %% binary: dmat-pca %%
pub fn dmat_pca() {
    let app = App::new("dmat-pca")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Principal component analysis of a whitespace-separated data set.")
        .args(&[
            Arg::with_name("config")
                .short("c").long("config").value_name("CONFIG")
                .takes_value(true).required(true)
                .help("settings yaml"),
            Arg::with_name("verbose")
                .short("v").long("verbose").multiple(true)
                .help("log more (may be repeated)"),
            Arg::with_name("log")
                .long("log").value_name("FILE").takes_value(true)
                .help("also write the log to this file"),
            Arg::with_name("mpi")
                .long("mpi")
                .help("run as one process of the MPI world instead of spawning threads"),
            Arg::with_name("dataset")
                .value_name("DATASET").required(true)
                .help("samples in rows, features in columns"),
        ]);
    let matches = app.get_matches();

    wrap_result_main(|| {
        init_global_logger(&matches)?;

        let settings = Settings::from_reader(File::open(matches.value_of_os("config").unwrap_or_default())?)?;
        let data = dataset::read(File::open(matches.value_of_os("dataset").unwrap_or_default())?)?;
        info!("Read a {}x{} data set", data.nrows(), data.ncols());

        match matches.is_present("mpi") {
            true => run_under_mpi(&settings, &data),
            false => print_output(&crate::run_pca(&settings, &data)?),
        }
    });
}

#[cfg(feature = "mpi-support")]
fn run_under_mpi(settings: &Settings, data: &::ndarray::Array2<f64>) -> FailResult<()> {
    let universe = match ::mpi::initialize() {
        Some(universe) => universe,
        None => bail!("MPI was already initialized"),
    };
    let comm = ::dmat_comm::MpiComm::world(&universe);
    if let Some(output) = crate::run_pca_on(comm, settings, data)? {
        print_output(&output)?;
    }
    Ok(())
}

#[cfg(not(feature = "mpi-support"))]
fn run_under_mpi(_: &Settings, _: &::ndarray::Array2<f64>) -> FailResult<()> {
    bail!("--mpi requires the mpi-support feature")
}
