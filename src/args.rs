use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "magpie",
    about = "Magpie - a printable wall calendar generator."
)]
pub struct Args {
    #[structopt(name = "YEAR", help = "year to generate the calendar for")]
    pub year: i32,

    #[structopt(
        name = "CONFIG",
        short = "c",
        long = "config",
        help = "path to config file",
        parse(from_os_str)
    )]
    pub configfile: Option<PathBuf>,

    #[structopt(
        short = "n",
        long = "names",
        help = "name-day table (JSON keyed by \"day.month\")",
        parse(from_os_str)
    )]
    pub names: Option<PathBuf>,

    #[structopt(
        short = "i",
        long = "images",
        help = "directory with per-month background images (01.png .. 12.png)",
        parse(from_os_str)
    )]
    pub images: Option<PathBuf>,

    #[structopt(long = "font", help = "TTF font to embed", parse(from_os_str))]
    pub font: Option<PathBuf>,

    #[structopt(
        short = "o",
        long = "output",
        help = "output file (defaults to calendar-<year>.pdf)",
        parse(from_os_str)
    )]
    pub output: Option<PathBuf>,

    #[structopt(long = "log-file", help = "path to log file", parse(from_os_str))]
    pub log_file: Option<PathBuf>,
}
