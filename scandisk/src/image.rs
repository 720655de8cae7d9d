use anyhow::Context;
use std::fs::{File, OpenOptions};
use std::path::Path;

use scanfs::fat12::*;

use crate::utils::{read_with_progress, write_with_progress};

/// Reads the whole image into memory.
pub fn load(path: &Path) -> anyhow::Result<Vec<u8>> {
    let mut file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let size = file.metadata()?.len();
    let data = read_with_progress(&mut file, size, "loading image")
        .with_context(|| format!("reading {}", path.display()))?;
    crate::log_verbose!("Loaded {} bytes from {}", data.len(), path.display());
    Ok(data)
}

/// Writes the repaired image back in place.
pub fn save(path: &Path, data: &[u8]) -> anyhow::Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(path)
        .with_context(|| format!("opening {} for writing", path.display()))?;
    write_with_progress(&mut file, data, "saving image")
        .with_context(|| format!("writing {}", path.display()))?;
    file.sync_all()?;
    crate::log_verbose!("Wrote {} bytes to {}", data.len(), path.display());
    Ok(())
}

/// Parses the boot sector and derives the volume geometry.
pub fn geometry(data: &mut [u8]) -> anyhow::Result<Fat12Meta> {
    let len = data.len() as u64;
    let mut io = MemScanIO::new(data);
    let bpb: Fat12Bpb = io.read_struct(0).context("reading boot sector")?;
    let meta = Fat12Meta::from_bpb(&bpb).context("parsing boot sector")?;
    if meta.size_bytes() > len {
        anyhow::bail!(
            "image is truncated: boot sector describes {} bytes, file holds {len}",
            meta.size_bytes()
        );
    }
    Ok(meta)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_floppy() -> Vec<u8> {
        let meta = Fat12Meta::floppy_1440k();
        let mut buf = vec![0u8; meta.size_bytes() as usize];
        let mut io = MemScanIO::new(&mut buf);
        Fat12Formatter::new(&mut io, &meta).format(false).unwrap();
        buf
    }

    #[test]
    fn test_geometry_of_formatted_floppy() {
        let mut buf = blank_floppy();
        let meta = geometry(&mut buf).unwrap();
        assert_eq!(meta.cluster_count, 2847);
        assert_eq!(meta.root_entry_count, 224);
    }

    #[test]
    fn test_truncated_image_is_rejected() {
        let mut buf = blank_floppy();
        buf.truncate(100 * 1024);
        assert!(geometry(&mut buf).is_err());
    }

    #[test]
    fn test_load_save_roundtrip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("floppy.img");
        let buf = blank_floppy();
        std::fs::write(&path, &buf).unwrap();

        let mut loaded = load(&path).unwrap();
        assert_eq!(loaded, buf);
        loaded[600] = 0xAB;
        save(&path, &loaded).unwrap();
        assert_eq!(std::fs::read(&path).unwrap()[600], 0xAB);
    }
}
