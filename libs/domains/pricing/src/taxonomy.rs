//! Instance family naming taxonomy.
//!
//! Every EC2 family code (`m5`, `c6gd`, `x2iezn`, ...) is a category prefix,
//! a generation number and a set of attribute suffixes. [`FAMILIES`] records
//! each known family with the year it was introduced. The table is
//! append-only: new families go at the end.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use strum::{Display, EnumString};

use crate::error::{PricingError, PricingResult};

/// Category encoded by the leading letters of a family code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
pub enum PrefixCategory {
    /// a
    #[strum(serialize = "arm")]
    Arm,
    /// t
    #[strum(serialize = "burst")]
    Burst,
    /// m
    #[strum(serialize = "main")]
    Main,
    /// c
    #[strum(serialize = "cpu")]
    Cpu,
    /// r
    #[strum(serialize = "more-mem")]
    MemMore,
    /// x
    #[strum(serialize = "mem-xtreme")]
    MemXtreme,
    /// z
    #[strum(serialize = "high-freq")]
    HighFreq,
    /// p, g
    #[strum(serialize = "gpu")]
    Gpu,
    /// inf, trn
    #[strum(serialize = "inference")]
    Inference,
    /// f
    #[strum(serialize = "fpga")]
    Fpga,
    /// i
    #[strum(serialize = "ssd")]
    Ssd,
    /// d, h
    #[strum(serialize = "dense-hdd")]
    DenseHdd,
    /// cc, cr
    #[strum(serialize = "cluster-compute")]
    ClusterCompute,
    /// vt
    #[strum(serialize = "video-transcode")]
    VideoTranscode,
    /// hpc
    #[strum(serialize = "hpc")]
    Hpc,
    /// x2i
    #[strum(serialize = "xeon")]
    XeonScalable,
}

bitflags! {
    /// Attribute suffixes of a family code.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SuffixFlags: u16 {
        /// g
        const GRAVITON = 1 << 0;
        /// a
        const AMD = 1 << 1;
        /// d
        const NVME = 1 << 2;
        /// n
        const NETWORK = 1 << 3;
        /// dn on GPU families
        const GPU_NVIDIA = 1 << 4;
        /// ad on GPU families
        const GPU_AMD = 1 << 5;
        /// z
        const HIGH_FREQ = 1 << 6;
        /// b
        const EBS_OPTIMIZED = 1 << 7;
        /// i
        const INTEL = 1 << 8;
        /// e on memory optimized families
        const EXTENDED_MEMORY = 1 << 9;
        /// -flex
        const FLEX = 1 << 10;
    }
}

/// Output labels, in stringification order.
const SUFFIX_LABELS: [(SuffixFlags, &str); 11] = [
    (SuffixFlags::GRAVITON, "graviton"),
    (SuffixFlags::AMD, "amd"),
    (SuffixFlags::NVME, "nvme"),
    (SuffixFlags::NETWORK, "net"),
    (SuffixFlags::GPU_NVIDIA, "gpu-nvidia"),
    (SuffixFlags::GPU_AMD, "gpu-amd"),
    (SuffixFlags::HIGH_FREQ, "high-freq"),
    (SuffixFlags::EBS_OPTIMIZED, "ebs-optimized"),
    (SuffixFlags::INTEL, "intel"),
    (SuffixFlags::EXTENDED_MEMORY, "extend-mem"),
    (SuffixFlags::FLEX, "flex"),
];

impl SuffixFlags {
    /// Labels of the set flags, in stringification order
    pub fn labels(&self) -> Vec<&'static str> {
        SUFFIX_LABELS
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, label)| *label)
            .collect()
    }
}

impl fmt::Display for SuffixFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.labels().join(","))
    }
}

/// A known instance family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FamilyEntry {
    pub code: &'static str,
    pub year: u16,
    pub prefix: PrefixCategory,
    pub flags: SuffixFlags,
}

impl fmt::Display for FamilyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.code, self.year, self.prefix, self.flags)
    }
}

macro_rules! family {
    ($code:literal, $year:literal, $prefix:ident) => {
        FamilyEntry {
            code: $code,
            year: $year,
            prefix: PrefixCategory::$prefix,
            flags: SuffixFlags::empty(),
        }
    };
    ($code:literal, $year:literal, $prefix:ident, $($flag:ident)|+) => {
        FamilyEntry {
            code: $code,
            year: $year,
            prefix: PrefixCategory::$prefix,
            flags: SuffixFlags::empty()$(.union(SuffixFlags::$flag))+,
        }
    };
}

/// Every instance family known to this build, oldest first.
pub static FAMILIES: &[FamilyEntry] = &[
    family!("m1", 2006, Main),
    family!("c1", 2008, Cpu),
    family!("m2", 2009, Main),
    family!("cc1", 2010, ClusterCompute),
    family!("t1", 2010, Burst),
    family!("cg1", 2010, Gpu),
    family!("cc2", 2011, ClusterCompute),
    family!("hi1", 2012, Ssd),
    family!("m3", 2012, Main),
    family!("hs1", 2012, DenseHdd),
    family!("cr1", 2013, ClusterCompute),
    family!("c3", 2013, Cpu),
    family!("g2", 2013, Gpu),
    family!("i2", 2013, Ssd),
    family!("r3", 2014, MemMore),
    family!("t2", 2014, Burst),
    family!("c4", 2015, Cpu),
    family!("d2", 2015, DenseHdd),
    family!("m4", 2015, Main),
    family!("x1", 2016, MemXtreme),
    family!("p2", 2016, Gpu),
    family!("f1", 2016, Fpga),
    family!("r4", 2016, MemMore),
    family!("i3", 2016, Ssd),
    family!("c5", 2016, Cpu),
    family!("g3", 2017, Gpu),
    family!("x1e", 2017, MemXtreme),
    family!("p3", 2017, Gpu),
    family!("m5", 2017, Main),
    family!("h1", 2017, DenseHdd),
    family!("c5d", 2018, Cpu, NVME),
    family!("m5d", 2018, Main, NVME),
    family!("z1d", 2018, HighFreq),
    family!("r5", 2018, MemMore),
    family!("t3", 2018, Burst),
    family!("g3s", 2018, Gpu),
    family!("m5a", 2018, Main, AMD),
    family!("r5a", 2018, MemMore, AMD),
    family!("c5n", 2018, Cpu, NETWORK),
    family!("a1", 2018, Arm),
    family!("p3dn", 2018, Gpu, NVME | NETWORK),
    family!("g4", 2019, Gpu),
    family!("m5ad", 2019, Main, AMD | NVME),
    family!("r5d", 2019, MemMore, NVME),
    family!("r5ad", 2019, MemMore, AMD | NVME),
    family!("i3en", 2019, Ssd, NETWORK),
    family!("g4dn", 2019, Gpu, GPU_NVIDIA),
    family!("r5dn", 2019, MemMore, NVME | NETWORK),
    family!("r5n", 2019, MemMore, NETWORK),
    family!("m5dn", 2019, Main, NVME | NETWORK),
    family!("m5n", 2019, Main, NETWORK),
    family!("inf1", 2019, Inference),
    family!("t3a", 2019, Burst, AMD),
    family!("c5a", 2020, Cpu, AMD),
    family!("c5ad", 2020, Cpu, AMD | NVME),
    family!("c6g", 2020, Cpu, GRAVITON),
    family!("c6gn", 2020, Cpu, GRAVITON | NETWORK),
    family!("c6gd", 2020, Cpu, GRAVITON | NVME),
    family!("d3", 2020, DenseHdd),
    family!("d3en", 2020, DenseHdd, NETWORK),
    family!("g4ad", 2020, Gpu, GPU_AMD),
    family!("m5zn", 2020, Main, HIGH_FREQ | NETWORK),
    family!("m6g", 2020, Main, GRAVITON),
    family!("m6gn", 2020, Main, GRAVITON | NETWORK),
    family!("p4d", 2020, Gpu, NVME),
    family!("r5b", 2020, MemMore, EBS_OPTIMIZED),
    family!("r6g", 2020, MemMore, GRAVITON),
    family!("r6gd", 2020, MemMore, GRAVITON | NVME),
    family!("t4g", 2020, Burst, GRAVITON),
    family!("x2gd", 2021, MemXtreme, GRAVITON | NVME),
    family!("m6i", 2022, Main, INTEL),
    family!("vt1", 2021, VideoTranscode),
    family!("c6i", 2022, Cpu, INTEL),
    family!("g5", 2021, Gpu),
    family!("r6i", 2021, MemMore, INTEL),
    family!("m6a", 2021, Main, AMD),
    family!("g5g", 2021, Gpu, GRAVITON),
    // Graviton3
    family!("c7g", 2021, Cpu, GRAVITON),
    family!("im4gn", 2021, Ssd, GRAVITON | NVME),
    family!("is4gn", 2021, Ssd, GRAVITON | NVME),
    // Trainium
    family!("trn1", 2021, Inference),
    family!("hpc6a", 2022, Hpc, AMD),
    family!("x2iezn", 2022, XeonScalable, INTEL | EXTENDED_MEMORY | HIGH_FREQ | NVME),
    family!("c6a", 2022, Cpu, AMD),
    family!("x2iedn", 2022, XeonScalable, INTEL | EXTENDED_MEMORY | NETWORK | NVME),
    family!("x2idn", 2022, XeonScalable, INTEL | NETWORK | NVME),
    family!("i4i", 2022, Ssd, INTEL),
    family!("p4de", 2022, Gpu, NVME | EXTENDED_MEMORY),
    family!("c6id", 2022, Cpu, INTEL | NVME),
    family!("m6id", 2022, Main, INTEL | NVME),
    family!("r6id", 2022, MemMore, INTEL | NVME),
    family!("r6a", 2022, MemMore, AMD),
    family!("r7iz", 2022, MemMore, INTEL | HIGH_FREQ),
    family!("m6in", 2022, Main, INTEL | NETWORK),
    family!("m6idn", 2022, Main, INTEL | NVME | NETWORK),
    family!("c6in", 2022, Cpu, INTEL | NETWORK),
    family!("r6in", 2022, MemMore, INTEL | NETWORK),
    family!("r6idn", 2022, MemMore, INTEL | NVME | NETWORK),
    family!("c7gn", 2022, Cpu, GRAVITON | NETWORK),
    family!("hpc7g", 2022, Hpc, GRAVITON),
    family!("hpc6id", 2022, Hpc, INTEL | NVME),
    family!("m7g", 2023, Main, GRAVITON),
    family!("r7g", 2023, MemMore, GRAVITON),
    family!("inf2", 2023, Inference),
    family!("i4g", 2023, Ssd, GRAVITON),
    family!("p5", 2023, Gpu),
    family!("c7gd", 2023, Cpu, GRAVITON | NVME),
    family!("m7gd", 2023, Main, GRAVITON | NVME),
    family!("r7gd", 2023, MemMore, GRAVITON | NVME),
    family!("m7i", 2023, Main, INTEL),
    family!("m7i-flex", 2023, Main, INTEL | FLEX),
    family!("m7a", 2023, Main, AMD),
    family!("hpc7a", 2023, Hpc, AMD),
    family!("r7a", 2023, MemMore, AMD),
];

/// Family codes that appear more than once, one item per repeat, in table order.
pub fn find_duplicates(entries: &[FamilyEntry]) -> Vec<&'static str> {
    let mut seen = HashSet::with_capacity(entries.len());
    entries
        .iter()
        .filter(|entry| !seen.insert(entry.code))
        .map(|entry| entry.code)
        .collect()
}

/// Indexed view over a family table
#[derive(Debug, Clone)]
pub struct Taxonomy {
    entries: &'static [FamilyEntry],
    index: HashMap<&'static str, usize>,
}

impl Taxonomy {
    /// Index a family table. When a code repeats, the first entry wins.
    pub fn new(entries: &'static [FamilyEntry]) -> Self {
        let mut index = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            index.entry(entry.code).or_insert(i);
        }
        Self { entries, index }
    }

    /// The built-in [`FAMILIES`] table
    pub fn builtin() -> Self {
        Self::new(FAMILIES)
    }

    pub fn entries(&self) -> &'static [FamilyEntry] {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lookup(&self, code: &str) -> Option<&'static FamilyEntry> {
        let entries = self.entries;
        self.index.get(code).map(|&i| &entries[i])
    }

    pub fn contains(&self, code: &str) -> bool {
        self.index.contains_key(code)
    }

    /// Duplicated family codes in this table
    pub fn duplicates(&self) -> Vec<&'static str> {
        find_duplicates(self.entries)
    }

    /// Integrity check: fails on the first duplicated family code
    pub fn validate(&self) -> PricingResult<()> {
        match self.duplicates().first() {
            Some(code) => Err(PricingError::DuplicateFamily((*code).to_string())),
            None => Ok(()),
        }
    }

    /// Codes not present in the table, sorted and deduplicated
    pub fn unknown_families<'a, I>(&self, codes: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut unknown: Vec<String> = codes
            .into_iter()
            .filter(|code| !self.contains(code))
            .map(str::to_string)
            .collect();
        unknown.sort();
        unknown.dedup();
        unknown
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::builtin()
    }
}
