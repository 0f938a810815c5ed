//! # info / validate 命令实现
//!
//! - `info`: 以表格显示 OUTCAR 与 WAVECAR 中的计算信息
//! - `validate`: 检查输入文件存在且可读
//!
//! ## 依赖关系
//! - 使用 `cli/info.rs` 定义的参数
//! - 使用 `runner/session.rs`, `utils/output.rs`

use super::{EXIT_FAILURE, EXIT_SUCCESS};
use crate::cli::info::{InfoArgs, ValidateArgs};
use crate::error::Result;
use crate::models::CalculationMetadata;
use crate::runner::{validate_inputs, Session};
use crate::utils::output;

use tabled::{Table, Tabled};

/// 表格行
#[derive(Debug, Clone, Tabled)]
struct InfoRow {
    #[tabled(rename = "Field")]
    field: String,
    #[tabled(rename = "OUTCAR")]
    outcar: String,
    #[tabled(rename = "WAVECAR")]
    wavecar: String,
}

impl InfoRow {
    fn new(field: &str, outcar: impl Into<String>, wavecar: impl Into<String>) -> Self {
        InfoRow {
            field: field.to_string(),
            outcar: outcar.into(),
            wavecar: wavecar.into(),
        }
    }
}

/// 执行 info 命令
pub fn execute(args: InfoArgs) -> Result<i32> {
    output::print_header("VASP Calculation Info");

    let session = Session::open(&args.work_dir, &args.files.to_inputs())?;
    let meta = session.metadata();
    let header = session.wavecar();
    let dash = || "-".to_string();

    let mut rows = vec![
        InfoRow::new("Title", meta.title.clone(), dash()),
        InfoRow::new(
            "k-points",
            meta.num_k.to_string(),
            header.map(|h| h.num_k.to_string()).unwrap_or_else(dash),
        ),
        InfoRow::new(
            "Bands",
            meta.num_bands.to_string(),
            header.map(|h| h.num_bands.to_string()).unwrap_or_else(dash),
        ),
        InfoRow::new(
            "Spin channels",
            meta.nspin.to_string(),
            header.map(|h| h.nspin.to_string()).unwrap_or_else(dash),
        ),
    ];

    if let Some(h) = header {
        rows.push(InfoRow::new("Record length", dash(), format!("{} bytes", h.record_length)));
        rows.push(InfoRow::new("Precision", dash(), h.precision.to_string()));
        rows.push(InfoRow::new("ENCUT", dash(), format!("{:.2} eV", h.ecut)));
    }

    println!("{}", Table::new(&rows));

    match meta.lattice_vectors {
        Some(lattice) => {
            output::print_header("Lattice");
            for (label, row) in ["a", "b", "c"].iter().zip(lattice.matrix.iter()) {
                println!(
                    "    {}  {:14.8} {:14.8} {:14.8}",
                    label, row[0], row[1], row[2]
                );
            }
            let (a, b, c, alpha, beta, gamma) = lattice.parameters();
            println!();
            output::print_field("a, b, c (Å)", &format!("{:.5} {:.5} {:.5}", a, b, c));
            output::print_field(
                "alpha, beta, gamma (°)",
                &format!("{:.3} {:.3} {:.3}", alpha, beta, gamma),
            );
            output::print_field("Volume (Å³)", &format!("{:.4}", lattice.volume().abs()));
        }
        None => output::print_warning("No lattice vectors found"),
    }

    Ok(EXIT_SUCCESS)
}

/// 执行 validate 命令
pub fn validate(args: ValidateArgs, verbose: bool) -> Result<i32> {
    let inputs = args.files.to_inputs();
    match validate_inputs(&args.work_dir, &inputs) {
        Ok(()) => {
            if verbose {
                output::print_info(&format!(
                    "Checked {} and {}",
                    inputs.outcar_in(&args.work_dir).display(),
                    inputs.wavecar_in(&args.work_dir).display()
                ));
            }
            output::print_success("Input files are valid");
            Ok(EXIT_SUCCESS)
        }
        Err(e) => {
            output::print_error(&format!("Input files are invalid: {}", e));
            Ok(EXIT_FAILURE)
        }
    }
}

/// run 命令开头的元数据摘要
pub(crate) fn print_metadata_summary(session: &Session) {
    let meta: &CalculationMetadata = session.metadata();
    output::print_info("VASP calculation info:");
    if !meta.title.is_empty() {
        output::print_field("Title", &meta.title);
    }
    output::print_field("Number of k-points", &meta.num_k.to_string());
    output::print_field("Number of bands", &meta.num_bands.to_string());
    output::print_field(
        "Spin polarization",
        if meta.is_spin_polarized() { "yes (ISPIN = 2)" } else { "no (ISPIN = 1)" },
    );
    if !meta.has_bounds() {
        output::print_warning("NKPTS/NBANDS missing from OUTCAR");
    }
    if session.wavecar().is_none() {
        output::print_warning("WAVECAR header unavailable, using OUTCAR only");
    }
}
