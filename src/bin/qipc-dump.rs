use anyhow::{Context, Result};
use qipc_decode::{read, ReadOptions};
use std::fs::File;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(
    about = "A decoder for the q/kdb+ IPC wire format. Reads one or more concatenated IPC frames from a file and prints the decoded value of each."
)]
struct Opt {
    #[structopt(long = "--raw")]
    raw: bool,

    #[structopt(long = "--numpy-temporals")]
    numpy_temporals: bool,

    #[structopt(name = "FILE", parse(from_os_str), help = "File of concatenated IPC frames.")]
    file: PathBuf,
}

fn main() -> Result<()> {
    let opt = Opt::from_args();

    let mut file = File::open(&opt.file).context("failed to open file")?;
    let options = ReadOptions {
        raw: opt.raw,
        numpy_temporals: opt.numpy_temporals,
        ..ReadOptions::default()
    };

    loop {
        match read(&mut file, options) {
            Ok(message) => println!("{:?}", message),
            Err(e) => {
                if is_eof(&e) {
                    break;
                }
                return Err(e).context("decoder error");
            }
        }
    }

    Ok(())
}

fn is_eof(e: &qipc_decode::DecoderError) -> bool {
    matches!(
        e,
        qipc_decode::DecoderError::SourceError(io)
            if io.kind() == std::io::ErrorKind::UnexpectedEof
    )
}
