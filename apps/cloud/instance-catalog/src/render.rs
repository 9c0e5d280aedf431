//! Output formatting for the instance table, family check and taxonomy listing

use clap::ValueEnum;
use domain_pricing::{FamilyCheck, FamilyEntry, NormalizedInstance};
use eyre::Result;
use std::collections::HashSet;
use std::io::Write;

pub const FIELD_NAMES: [&str; 9] = [
    "type",
    "mem",
    "vcpu",
    "disk",
    "mfg",
    "net",
    "hourly",
    "annual",
    "annual-reserved",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Fixed-width columns
    #[default]
    Col,
    Csv,
    /// One JSON object per line
    Json,
}

/// Write the instance table in the requested format.
pub fn write_instances<W: Write>(
    out: W,
    format: OutputFormat,
    instances: &[NormalizedInstance],
) -> Result<()> {
    match format {
        OutputFormat::Col => write_columns(out, instances),
        OutputFormat::Csv => write_csv(out, instances),
        OutputFormat::Json => write_json_lines(out, instances),
    }
}

fn write_columns<W: Write>(mut out: W, instances: &[NormalizedInstance]) -> Result<()> {
    let [name, mem, vcpu, disk, mfg, net, hourly, annual, reserved] = FIELD_NAMES;
    writeln!(
        out,
        "{name:>17} {mem:>10} {vcpu:>6} {disk:>15} {mfg:>3} {net:>6} {hourly:>9} {annual:>9} {reserved}"
    )?;

    for instance in instances {
        writeln!(
            out,
            "{:>17} {:>10.1} {:>6} {:>15} {:>3} {:>6} {:>9.4} {:>9.2} {:.2}",
            instance.name,
            instance.memory_gib,
            instance.vcpu,
            instance.disk.to_string(),
            instance.cpu_manufacturer.to_string(),
            instance.network_perf.to_string(),
            instance.hourly,
            instance.on_demand_annual,
            instance.reserved_annual,
        )?;
    }

    out.flush()?;
    Ok(())
}

fn write_csv<W: Write>(out: W, instances: &[NormalizedInstance]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(FIELD_NAMES)?;

    for instance in instances {
        writer.write_record([
            instance.name.clone(),
            format!("{:.3}", instance.memory_gib),
            instance.vcpu.clone(),
            instance.disk.to_string(),
            instance.cpu_manufacturer.to_string(),
            instance.network_perf.to_string(),
            format!("{:.3}", instance.hourly),
            format!("{:.3}", instance.on_demand_annual),
            format!("{:.3}", instance.reserved_annual),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

fn write_json_lines<W: Write>(mut out: W, instances: &[NormalizedInstance]) -> Result<()> {
    for instance in instances {
        serde_json::to_writer(&mut out, instance)?;
        out.write_all(b"\n")?;
    }

    out.flush()?;
    Ok(())
}

/// One line per family check: the taxonomy entry, or a `!!!missing` marker.
pub fn write_checks<W: Write>(mut out: W, checks: &[FamilyCheck]) -> Result<()> {
    for check in checks {
        writeln!(out, "{check}")?;
    }
    out.flush()?;
    Ok(())
}

/// Print every taxonomy entry in table order.
///
/// A repeated family code is reported on `err` just before its row; the row
/// itself is still printed.
pub fn write_families<W: Write, E: Write>(
    mut out: W,
    mut err: E,
    entries: &[FamilyEntry],
) -> Result<()> {
    let mut seen = HashSet::with_capacity(entries.len());

    for entry in entries {
        if !seen.insert(entry.code) {
            writeln!(err, "!!! Duplicate family type found: {entry}")?;
        }
        writeln!(
            out,
            "{:>5.5} {:>4} {:>10.10} {}",
            entry.code,
            entry.year,
            entry.prefix.to_string(),
            entry.flags
        )?;
    }

    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_pricing::{CpuManufacturer, Disk, NetworkPerf, PrefixCategory, SuffixFlags, Taxonomy};

    fn instances() -> Vec<NormalizedInstance> {
        vec![
            NormalizedInstance {
                name: "c6gd.medium".to_string(),
                family: "c6gd".to_string(),
                vcpu: "1".to_string(),
                memory_gib: 2.0,
                disk: Disk {
                    count: 1,
                    per_disk_gb: 59,
                    ssd: true,
                    nvme: true,
                },
                cpu_manufacturer: CpuManufacturer::Aws,
                network_perf: NetworkPerf {
                    cap_gb: 10.0,
                    bursting: true,
                },
                hourly: 0.0384,
                on_demand_annual: 336.384,
                reserved_annual: 0.0,
            },
            NormalizedInstance {
                name: "m5.large".to_string(),
                family: "m5".to_string(),
                vcpu: "2".to_string(),
                memory_gib: 8.0,
                disk: Disk::default(),
                cpu_manufacturer: CpuManufacturer::Intel,
                network_perf: NetworkPerf {
                    cap_gb: 10.0,
                    bursting: true,
                },
                hourly: 0.096,
                on_demand_annual: 840.96,
                reserved_annual: 621.96,
            },
        ]
    }

    fn render(format: OutputFormat) -> String {
        let mut buf = Vec::new();
        write_instances(&mut buf, format, &instances()).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_columns() {
        let output = render(OutputFormat::Col);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "             type        mem   vcpu            disk mfg    net    hourly    annual annual-reserved"
        );
        assert_eq!(
            lines[1],
            "      c6gd.medium        2.0      1       59GB-NVMe arm  10.0*    0.0384    336.38 0.00"
        );
        assert_eq!(
            lines[2],
            "         m5.large        8.0      2             EBS int  10.0*    0.0960    840.96 621.96"
        );
    }

    #[test]
    fn test_csv() {
        let output = render(OutputFormat::Csv);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(
            lines,
            vec![
                "type,mem,vcpu,disk,mfg,net,hourly,annual,annual-reserved",
                "c6gd.medium,2.000,1,59GB-NVMe,arm,10.0*,0.038,336.384,0.000",
                "m5.large,8.000,2,EBS,int,10.0*,0.096,840.960,621.960",
            ]
        );
    }

    #[test]
    fn test_json_lines() {
        let output = render(OutputFormat::Json);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["name"], "c6gd.medium");
        assert_eq!(first["family"], "c6gd");
        assert_eq!(first["hourly"], 0.0384);

        let decoded: NormalizedInstance = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(decoded.name, "m5.large");
        assert_eq!(decoded.disk, Disk::default());
        assert_eq!(decoded.cpu_manufacturer, CpuManufacturer::Intel);
    }

    #[test]
    fn test_empty_table_keeps_header() {
        let mut buf = Vec::new();
        write_instances(&mut buf, OutputFormat::Col, &[]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap().lines().count(), 1);

        let mut buf = Vec::new();
        write_instances(&mut buf, OutputFormat::Json, &[]).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn test_checks() {
        let taxonomy = Taxonomy::builtin();
        let checks = vec![
            FamilyCheck::Known(taxonomy.lookup("m5").unwrap()),
            FamilyCheck::Missing("q9z".to_string()),
        ];

        let mut buf = Vec::new();
        write_checks(&mut buf, &checks).unwrap();

        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "m5 2017 main \n!!!missing q9z\n"
        );
    }

    #[test]
    fn test_families_listing() {
        let taxonomy = Taxonomy::builtin();
        let mut out = Vec::new();
        let mut err = Vec::new();
        write_families(&mut out, &mut err, taxonomy.entries()).unwrap();

        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.lines().count(), taxonomy.len());
        assert!(out.lines().any(|l| l == " c6gd 2020        cpu graviton,nvme"));
        assert!(err.is_empty());
    }

    #[test]
    fn test_families_listing_reports_duplicates() {
        static ENTRIES: [FamilyEntry; 3] = [
            FamilyEntry {
                code: "m5",
                year: 2017,
                prefix: PrefixCategory::Main,
                flags: SuffixFlags::empty(),
            },
            FamilyEntry {
                code: "m5",
                year: 2018,
                prefix: PrefixCategory::Main,
                flags: SuffixFlags::empty(),
            },
            FamilyEntry {
                code: "inf2xl",
                year: 2022,
                prefix: PrefixCategory::Inference,
                flags: SuffixFlags::empty(),
            },
        ];

        let mut out = Vec::new();
        let mut err = Vec::new();
        write_families(&mut out, &mut err, &ENTRIES).unwrap();

        let out = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "   m5 2018       main ");
        assert_eq!(lines[2], "inf2x 2022  inference ");
        assert_eq!(
            String::from_utf8(err).unwrap(),
            "!!! Duplicate family type found: m5 2018 main \n"
        );
    }
}
