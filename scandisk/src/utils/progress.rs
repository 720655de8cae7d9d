use indicatif::{ProgressBar, ProgressStyle};
use std::io::{Read, Write};

/// Images below this size load and save without a progress bar.
pub const PROGRESS_THRESHOLD: u64 = 8 * 1024 * 1024;

const CHUNK: usize = 64 * 1024;

fn bar(total_size: u64, message: &str) -> anyhow::Result<ProgressBar> {
    if total_size < PROGRESS_THRESHOLD
        || crate::utils::log_level() == crate::utils::LogLevel::Quiet
    {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new(total_size);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.white}] {bytes}/{total_bytes} (ETA {eta_precise}) {msg}")?
            .progress_chars("█░░"),
    );
    pb.set_message(message.to_string());
    Ok(pb)
}

pub fn read_with_progress<R: Read>(
    reader: &mut R,
    total_size: u64,
    message: &str,
) -> anyhow::Result<Vec<u8>> {
    let pb = bar(total_size, message)?;
    let mut data = Vec::with_capacity(total_size as usize);
    let mut buffer = [0u8; CHUNK];

    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buffer[..n]);
        pb.inc(n as u64);
    }

    pb.finish_and_clear();
    Ok(data)
}

pub fn write_with_progress<W: Write>(
    writer: &mut W,
    data: &[u8],
    message: &str,
) -> anyhow::Result<u64> {
    let pb = bar(data.len() as u64, message)?;
    for part in data.chunks(CHUNK) {
        writer.write_all(part)?;
        pb.inc(part.len() as u64);
    }
    writer.flush()?;
    pb.finish_and_clear();
    Ok(data.len() as u64)
}
