//! Parsers for the free-text attribute fields of catalog products.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::error::{PricingError, PricingResult};
use crate::models::{Disk, NetworkPerf};

const EBS_ONLY: &str = "EBS only";

/// `[<count> x ]<size>[ GB][ NVMe] <SSD|HDD>`
static STORAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:(\d+) [xX] )?(\d+)(?: ?GB)?( NVMe)? (SSD|HDD)").unwrap()
});

/// `<count> x <size>GB` with no media marker
static LEGACY_STORAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+) [xX] (\d+) ?GB").unwrap());

static NET_PERF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(Up to )?(\d+) (Gigabit|Megabit)").unwrap());

/// Qualitative network performance labels from older catalog generations.
const NET_PERF_WORDS: &[(&str, NetworkPerf)] = &[
    (
        "Very Low",
        NetworkPerf {
            cap_gb: 0.01,
            bursting: true,
        },
    ),
    (
        "Low",
        NetworkPerf {
            cap_gb: 0.01,
            bursting: true,
        },
    ),
    (
        "Low to Moderate",
        NetworkPerf {
            cap_gb: 0.01,
            bursting: true,
        },
    ),
    (
        "Moderate",
        NetworkPerf {
            cap_gb: 0.1,
            bursting: true,
        },
    ),
    (
        "High",
        NetworkPerf {
            cap_gb: 1.0,
            bursting: false,
        },
    ),
    (
        "NA",
        NetworkPerf {
            cap_gb: 1.0,
            bursting: false,
        },
    ),
];

/// Parse a memory attribute such as `"1,952 GiB"` into GiB.
///
/// Malformed input yields `0.0`; check the raw string before treating zero as
/// "no memory".
pub fn parse_memory(s: &str) -> f64 {
    let cleaned = s.trim().trim_end_matches("GiB").trim().replace(',', "");
    match cleaned.parse::<f64>() {
        Ok(gib) => gib,
        Err(_) => {
            debug!(raw = s, "Unparseable memory attribute");
            0.0
        }
    }
}

/// Parse a storage attribute into a [`Disk`].
pub fn parse_storage(s: &str) -> PricingResult<Disk> {
    if s == EBS_ONLY {
        return Ok(Disk::default());
    }

    let err = || PricingError::StorageParse { raw: s.to_string() };

    if let Some(caps) = STORAGE_RE.captures(s) {
        let count = match caps.get(1) {
            Some(m) => m.as_str().parse().map_err(|_| err())?,
            None => 1,
        };
        if count == 0 {
            return Ok(Disk::default());
        }
        let per_disk_gb = caps[2].parse().map_err(|_| err())?;
        let nvme = caps.get(3).is_some();
        let ssd = nvme || &caps[4] == "SSD";

        return Ok(Disk {
            count,
            per_disk_gb,
            ssd,
            nvme,
        });
    }

    // Unmarked local storage is flash in every catalog entry seen so far.
    if let Some(caps) = LEGACY_STORAGE_RE.captures(s) {
        let count = caps[1].parse().map_err(|_| err())?;
        if count == 0 {
            return Ok(Disk::default());
        }
        return Ok(Disk {
            count,
            per_disk_gb: caps[2].parse().map_err(|_| err())?,
            ssd: true,
            nvme: false,
        });
    }

    Err(err())
}

/// Parse a network performance attribute into a [`NetworkPerf`].
pub fn parse_net_perf(s: &str) -> PricingResult<NetworkPerf> {
    if let Some(caps) = NET_PERF_RE.captures(s) {
        let value: f64 = caps[2]
            .parse()
            .map_err(|_| PricingError::NetworkPerfParse { raw: s.to_string() })?;
        let cap_gb = if &caps[3] == "Megabit" {
            value / 1000.0
        } else {
            value
        };

        return Ok(NetworkPerf {
            cap_gb,
            bursting: caps.get(1).is_some(),
        });
    }

    NET_PERF_WORDS
        .iter()
        .find(|(word, _)| *word == s)
        .map(|(_, perf)| *perf)
        .ok_or_else(|| PricingError::NetworkPerfParse { raw: s.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disk(count: u32, per_disk_gb: u32, ssd: bool, nvme: bool) -> Disk {
        Disk {
            count,
            per_disk_gb,
            ssd,
            nvme,
        }
    }

    fn net(cap_gb: f64, bursting: bool) -> NetworkPerf {
        NetworkPerf { cap_gb, bursting }
    }

    #[test]
    fn test_parse_memory() {
        assert_eq!(parse_memory("8 GiB"), 8.0);
        assert_eq!(parse_memory("0.5 GiB"), 0.5);
        assert_eq!(parse_memory("1,952 GiB"), 1952.0);
        assert_eq!(parse_memory("24,576 GiB"), 24576.0);
    }

    #[test]
    fn test_parse_memory_malformed_is_zero() {
        assert_eq!(parse_memory(""), 0.0);
        assert_eq!(parse_memory("NA"), 0.0);
    }

    #[test]
    fn test_parse_storage_table() {
        let cases = [
            ("1200 GB NVMe SSD", disk(1, 1200, true, true)),
            ("125 GB NVMe SSD", disk(1, 125, true, true)),
            ("12 x 14000 HDD", disk(12, 14000, false, false)),
            ("12 x 2000 HDD", disk(12, 2000, false, false)),
            ("16 x 14000 HDD", disk(16, 14000, false, false)),
            ("1 x 100 NVMe SSD", disk(1, 100, true, true)),
            ("1 x 118 SSD", disk(1, 118, true, false)),
            ("1 x 1900 GB NVMe SSD", disk(1, 1900, true, true)),
            ("1 x 2000 HDD", disk(1, 2000, false, false)),
            ("1 x 250 GB NVMe SSD", disk(1, 250, true, true)),
            ("1 x 4 SSD", disk(1, 4, true, false)),
            ("1 x 3800 GB NVMe SSD", disk(1, 3800, true, true)),
            ("225 GB NVMe SSD", disk(1, 225, true, true)),
            ("24 x 14000 HDD", disk(24, 14000, false, false)),
            ("2 x 16 SSD", disk(2, 16, true, false)),
            ("2 x 900 GB NVMe SSD", disk(2, 900, true, true)),
            ("3 x 2000 HDD", disk(3, 2000, false, false)),
            ("4 x 1000 GB NVMe SSD", disk(4, 1000, true, true)),
            ("8 x 7500 NVMe SSD", disk(8, 7500, true, true)),
            ("8 x 1000 SSD", disk(8, 1000, true, false)),
            ("900 GB NVMe SSD", disk(1, 900, true, true)),
            ("EBS only", Disk::default()),
        ];

        for (input, expected) in cases {
            let got = parse_storage(input).unwrap_or_else(|e| panic!("parse {input:?}: {e}"));
            assert_eq!(got, expected, "{input:?} parse mismatch");
        }
    }

    #[test]
    fn test_parse_storage_uppercase_separator() {
        assert_eq!(
            parse_storage("4 X 940 GB NVMe SSD").unwrap(),
            disk(4, 940, true, true)
        );
    }

    #[test]
    fn test_parse_storage_unmarked_is_ssd() {
        assert_eq!(parse_storage("6 x 3750GB").unwrap(), disk(6, 3750, true, false));
        assert_eq!(parse_storage("1 x 468GB").unwrap(), disk(1, 468, true, false));
        assert_eq!(parse_storage("2 x 3750GB").unwrap(), disk(2, 3750, true, false));
    }

    #[test]
    fn test_parse_storage_ebs_only_invariant() {
        let d = parse_storage("EBS only").unwrap();
        assert!(d.is_ebs_only());
        assert_eq!(d.per_disk_gb, 0);
        assert!(!d.ssd);
        assert!(!d.nvme);
    }

    #[test]
    fn test_parse_storage_zero_count_is_ebs_only() {
        for input in ["0 x 100 SSD", "0 x 100 NVMe SSD", "0 x 100GB"] {
            let d = parse_storage(input).unwrap();
            assert_eq!(d, Disk::default(), "{input}");
            assert_eq!(d.to_string(), "EBS");
        }
    }

    #[test]
    fn test_parse_storage_rejects_unknown() {
        for input in ["", "ebs only", "Instance store", "lots of disks"] {
            let err = parse_storage(input).unwrap_err();
            assert_eq!(
                err,
                PricingError::StorageParse {
                    raw: input.to_string()
                }
            );
        }
    }

    #[test]
    fn test_parse_net_perf_sustained() {
        let cases = [
            ("100000 Megabit", net(100.0, false)),
            ("100 Gigabit", net(100.0, false)),
            ("10 Gigabit", net(10.0, false)),
            ("12500 Megabit", net(12.5, false)),
            ("18750 Megabit", net(18.75, false)),
            ("22500 Megabit", net(22.5, false)),
            ("3125 Megabit", net(3.125, false)),
            ("1600 Gigabit", net(1600.0, false)),
            ("6250 Megabit", net(6.25, false)),
            ("800 Gigabit", net(800.0, false)),
        ];

        for (input, expected) in cases {
            assert_eq!(parse_net_perf(input).unwrap(), expected, "{input:?}");
        }
    }

    #[test]
    fn test_parse_net_perf_bursting() {
        let cases = [
            ("Up to 10 Gigabit", net(10.0, true)),
            ("Up to 12500 Megabit", net(12.5, true)),
            ("Up to 25 Gigabit", net(25.0, true)),
            ("Up to 30000 Megabit", net(30.0, true)),
            ("Up to 5 Gigabit", net(5.0, true)),
        ];

        for (input, expected) in cases {
            assert_eq!(parse_net_perf(input).unwrap(), expected, "{input:?}");
        }
    }

    #[test]
    fn test_parse_net_perf_qualitative() {
        let cases = [
            ("Very Low", net(0.01, true)),
            ("Low", net(0.01, true)),
            ("Low to Moderate", net(0.01, true)),
            ("Moderate", net(0.1, true)),
            ("High", net(1.0, false)),
            ("NA", net(1.0, false)),
        ];

        for (input, expected) in cases {
            assert_eq!(parse_net_perf(input).unwrap(), expected, "{input:?}");
        }
    }

    #[test]
    fn test_parse_net_perf_rejects_unknown() {
        let err = parse_net_perf("Extreme").unwrap_err();
        assert_eq!(err.raw_input(), Some("Extreme"));
        assert!(parse_net_perf("very low").is_err());
        assert!(parse_net_perf("").is_err());
    }
}
