use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "emissions-monitor")]
#[command(about = "HTTP API for emissions monitoring spreadsheet data")]
#[command(version)]
pub struct Cli {
    #[arg(short, long, help = "Configuration file path")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Bind address [default: 127.0.0.1]")]
    pub host: Option<String>,

    #[arg(short, long, help = "Bind port [default: 5000]")]
    pub port: Option<u16>,

    #[arg(long, help = "Dataset file path [default: SoLieuKhiThai.xlsx]")]
    pub data_file: Option<PathBuf>,

    #[arg(long, help = "Static assets directory [default: static]")]
    pub static_dir: Option<PathBuf>,

    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,
}
