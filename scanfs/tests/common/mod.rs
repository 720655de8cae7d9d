// SPDX-License-Identifier: MIT
#![allow(dead_code)]

use scanfs::fat12::*;
use scanfs::fs::fat12::{fat::chain, utils::to_short_name};

/// A blank, formatted 1.44 MB floppy held in memory.
pub struct Image {
    pub buf: Vec<u8>,
    pub meta: Fat12Meta,
}

impl Image {
    pub fn floppy() -> Self {
        let meta = Fat12Meta::floppy_1440k();
        let mut buf = vec![0u8; meta.size_bytes() as usize];
        {
            let mut io = MemScanIO::new(&mut buf);
            Fat12Formatter::new(&mut io, &meta)
                .format(false)
                .expect("format failed");
        }
        Self { buf, meta }
    }

    pub fn with_io<R>(&mut self, f: impl FnOnce(&mut MemScanIO<'_>, &Fat12Meta) -> R) -> R {
        let mut io = MemScanIO::new(&mut self.buf);
        f(&mut io, &self.meta)
    }

    pub fn root(&self) -> DirRegion {
        DirRegion::root(&self.meta)
    }

    /// Links `clusters` in the FAT (if any) and adds a file entry to `dir`.
    pub fn add_file(&mut self, dir: DirRegion, name: &str, clusters: &[u16], size: u32) -> usize {
        self.with_io(|io, meta| {
            if !clusters.is_empty() {
                chain::write_chain(io, meta, clusters).expect("write_chain failed");
            }
            let start = clusters.first().copied().unwrap_or(0);
            let entry = Fat12Entry::file(&to_short_name(name), start, size);
            dir.allocate_entry(io, &entry).expect("allocate failed")
        })
    }

    pub fn add_root_file(&mut self, name: &str, clusters: &[u16], size: u32) -> usize {
        let root = self.root();
        self.add_file(root, name, clusters, size)
    }

    /// Creates a one-cluster subdirectory with `.` and `..` and returns its region.
    pub fn add_dir(&mut self, parent: DirRegion, parent_cluster: u16, name: &[u8; 8], cluster: u16) -> DirRegion {
        self.add_dir_with_attr(parent, parent_cluster, name, cluster, Fat12Attributes::DIRECTORY)
    }

    pub fn add_dir_with_attr(
        &mut self,
        parent: DirRegion,
        parent_cluster: u16,
        name: &[u8; 8],
        cluster: u16,
        attr: Fat12Attributes,
    ) -> DirRegion {
        self.with_io(|io, meta| {
            chain::write_chain(io, meta, &[cluster]).expect("write_chain failed");
            io.zero_fill(meta.unit_offset(cluster), meta.unit_size())
                .expect("zero_fill failed");

            let entry = Fat12Entry::new(*name, [b' '; 3], attr, cluster, 0);
            parent.allocate_entry(io, &entry).expect("allocate failed");

            let region = DirRegion::cluster(meta, cluster);
            region.write_slot(io, 0, &Fat12Entry::dot(cluster)).expect("dot");
            region
                .write_slot(io, 1, &Fat12Entry::dotdot(parent_cluster))
                .expect("dotdot");
            region
        })
    }

    /// Links clusters in the FAT without any directory entry.
    pub fn add_orphan(&mut self, clusters: &[u16]) {
        self.with_io(|io, meta| chain::write_chain(io, meta, clusters).expect("write_chain failed"));
    }

    pub fn set_fat(&mut self, cluster: u16, value: u16) {
        self.with_io(|io, meta| chain::write_entry(io, meta, cluster, value).expect("write_entry failed"));
    }

    pub fn fat(&mut self, cluster: u16) -> u16 {
        self.with_io(|io, meta| chain::read_entry(io, meta, cluster, 0).expect("read_entry failed"))
    }

    pub fn fat_copy(&mut self, cluster: u16, fat_index: u8) -> u16 {
        self.with_io(|io, meta| chain::read_entry(io, meta, cluster, fat_index).expect("read_entry failed"))
    }

    pub fn entry(&mut self, dir: DirRegion, slot: usize) -> Fat12Entry {
        self.with_io(|io, _| dir.read_slot(io, slot).expect("read_slot failed"))
    }

    pub fn root_entry(&mut self, slot: usize) -> Fat12Entry {
        let root = self.root();
        self.entry(root, slot)
    }

    pub fn check(&mut self, opts: &Fat12CheckOptions) -> FsCheckerResult<VerifyReport> {
        self.with_io(|io, meta| Fat12Checker::new(io, meta).check_with(opts))
    }

    pub fn check_and_repair(&mut self) -> VerifyReport {
        self.with_io(|io, meta| {
            Fat12Checker::new(io, meta)
                .check_and_repair()
                .expect("check failed")
        })
    }
}

pub fn codes(rep: &VerifyReport, sev: Severity) -> Vec<&'static str> {
    rep.findings
        .iter()
        .filter(|f| f.sev == sev)
        .map(|f| f.code)
        .collect()
}
